//! Ed25519 signing and verification.
//!
//! Thin wrappers around `ed25519_dalek` with a unified error type, plus the
//! encodings the Token protocol uses for keys and signatures.
//!
//! # Operations
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`generate_signing_key`] | Fresh key from the OS RNG |
//! | [`sign_message`] | Sign a message |
//! | [`verify_message`] | Verify a signature over a message |
//! | [`key_id`] | Derive the protocol key ID from a public key |
//! | [`to_base64url`] / [`from_base64url`] | Wire encoding of keys and signatures |

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use ed25519_dalek::{Signature, Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand_core::OsRng;
use sha2::{Digest, Sha256};

/// Length of a derived key ID.
pub const KEY_ID_LEN: usize = 16;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors returned by Ed25519 operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdError {
    /// The signature does not verify against the given key and message.
    VerificationFailed,
    /// The bytes are not a valid Ed25519 public key.
    InvalidPublicKey,
    /// The bytes are not a valid 64-byte Ed25519 signature.
    InvalidSignature,
    /// The string is not valid base64url.
    InvalidEncoding,
}

impl fmt::Display for EdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VerificationFailed => write!(f, "Ed25519 signature verification failed"),
            Self::InvalidPublicKey => write!(f, "invalid Ed25519 public key"),
            Self::InvalidSignature => write!(f, "invalid Ed25519 signature"),
            Self::InvalidEncoding => write!(f, "invalid base64url encoding"),
        }
    }
}

impl std::error::Error for EdError {}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Generates a fresh signing key from the OS random number generator.
pub fn generate_signing_key() -> SigningKey {
    SigningKey::generate(&mut OsRng)
}

/// Parses a 32-byte Ed25519 public key.
///
/// # Errors
///
/// Returns [`EdError::InvalidPublicKey`] if the slice has the wrong length
/// or is not a valid curve point.
pub fn verifying_key_from_bytes(bytes: &[u8]) -> Result<VerifyingKey, EdError> {
    let arr: [u8; 32] = bytes.try_into().map_err(|_| EdError::InvalidPublicKey)?;
    VerifyingKey::from_bytes(&arr).map_err(|_| EdError::InvalidPublicKey)
}

/// Derives the protocol key ID: the first [`KEY_ID_LEN`] characters of the
/// base58-encoded SHA-256 of the public key.
pub fn key_id(public_key: &[u8]) -> String {
    let encoded = bs58::encode(Sha256::digest(public_key)).into_string();
    encoded.chars().take(KEY_ID_LEN).collect()
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

/// Signs `message` with `key`.
pub fn sign_message(key: &SigningKey, message: &[u8]) -> Signature {
    key.sign(message)
}

/// Verifies `signature` over `message`.
///
/// # Errors
///
/// Returns [`EdError::VerificationFailed`] if the signature is invalid.
pub fn verify_message(
    public_key: &VerifyingKey,
    message: &[u8],
    signature: &Signature,
) -> Result<(), EdError> {
    public_key
        .verify(message, signature)
        .map_err(|_| EdError::VerificationFailed)
}

/// Decodes a 64-byte signature.
///
/// # Errors
///
/// Returns [`EdError::InvalidSignature`] if the slice has the wrong length.
pub fn signature_from_bytes(bytes: &[u8]) -> Result<Signature, EdError> {
    Signature::from_slice(bytes).map_err(|_| EdError::InvalidSignature)
}

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Unpadded base64url encoding, as used on the wire for keys and signatures.
pub fn to_base64url(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes unpadded base64url.
///
/// # Errors
///
/// Returns [`EdError::InvalidEncoding`] on malformed input.
pub fn from_base64url(encoded: &str) -> Result<Vec<u8>, EdError> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|_| EdError::InvalidEncoding)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
