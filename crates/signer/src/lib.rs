//! Key management and signing for the Token SDK.
//!
//! This crate provides:
//!
//! - [`KeyLevel`] / [`KeyInfo`] -- the public description of a member key
//! - [`Signer`] / [`Verifier`] traits -- what the SDK needs from a key backend
//! - [`ed25519`] module -- Ed25519 sign/verify primitives and encodings
//! - [`KeyStore`] trait with [`InMemoryKeyStore`] -- per-member key storage
//! - [`CryptoEngine`] -- binds a member ID to a key store and hands out
//!   signers and verifiers
//!
//! # Design
//!
//! Each member holds one or more keys at three privilege levels. Privileged
//! keys authorize member updates (keys, aliases); standard keys endorse
//! tokens; low keys authenticate read requests and redeem tokens. The server
//! decides what each level may do; this crate only stores and uses them.

pub mod ed25519;
mod engine;
mod key_store;

pub use engine::{CryptoEngine, Ed25519Signer, Ed25519Verifier};
pub use key_store::{InMemoryKeyStore, KeyPair, KeyStore};

use std::fmt;

// ---------------------------------------------------------------------------
// Key description
// ---------------------------------------------------------------------------

/// Ed25519 public key (32 bytes).
pub type PublicKeyBytes = [u8; 32];

/// Privilege level of a member key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyLevel {
    /// Authorizes member updates.
    Privileged,

    /// Endorses tokens.
    Standard,

    /// Authenticates reads and redemptions.
    Low,
}

impl KeyLevel {
    /// All levels, highest privilege first.
    pub const ALL: [KeyLevel; 3] = [KeyLevel::Privileged, KeyLevel::Standard, KeyLevel::Low];
}

impl fmt::Display for KeyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Privileged => write!(f, "PRIVILEGED"),
            Self::Standard => write!(f, "STANDARD"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// Signature algorithm of a member key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Ed25519,
}

/// Public description of a member key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyInfo {
    /// Key ID, derived from the public key (see [`ed25519::key_id`]).
    pub id: String,

    /// Privilege level.
    pub level: KeyLevel,

    /// Signature algorithm.
    pub algorithm: Algorithm,

    /// Raw public key.
    pub public_key: PublicKeyBytes,

    /// Expiration time in milliseconds since the epoch, if any.
    pub expires_at_ms: Option<i64>,
}

impl KeyInfo {
    /// Returns `true` if the key has an expiration at or before `now_ms`.
    pub fn is_expired(&self, now_ms: i64) -> bool {
        self.expires_at_ms.is_some_and(|t| t <= now_ms)
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from key lookup, signing, and verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// No usable key at the requested level.
    KeyNotFound(KeyLevel),

    /// No key with the given ID.
    UnknownKey(String),

    /// Key bytes could not be decoded.
    InvalidKey,

    /// Signature bytes could not be decoded.
    InvalidSignature,

    /// The signature does not verify.
    VerificationFailed,

    /// The key store failed.
    StoreFailed,
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound(level) => write!(f, "no {level} key available"),
            Self::UnknownKey(id) => write!(f, "unknown key: {id}"),
            Self::InvalidKey => write!(f, "invalid key"),
            Self::InvalidSignature => write!(f, "invalid signature encoding"),
            Self::VerificationFailed => write!(f, "signature verification failed"),
            Self::StoreFailed => write!(f, "key store operation failed"),
        }
    }
}

impl std::error::Error for SignerError {}

impl From<ed25519::EdError> for SignerError {
    fn from(e: ed25519::EdError) -> Self {
        match e {
            ed25519::EdError::VerificationFailed => Self::VerificationFailed,
            ed25519::EdError::InvalidPublicKey => Self::InvalidKey,
            ed25519::EdError::InvalidSignature | ed25519::EdError::InvalidEncoding => {
                Self::InvalidSignature
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Signing capability bound to one member key.
///
/// Implementations handle the cryptographic details so that the SDK remains
/// agnostic to the key backend (in-memory, HSM, ...).
pub trait Signer: Send + Sync {
    /// The key this signer uses.
    fn key(&self) -> &KeyInfo;

    /// Signs `message`, returning the raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot produce a signature.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// Verification capability bound to one public key.
pub trait Verifier: Send + Sync {
    /// Verifies `signature` over `message`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::VerificationFailed`] if the signature is invalid.
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), SignerError>;
}

/// Current time in milliseconds since the epoch.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}
