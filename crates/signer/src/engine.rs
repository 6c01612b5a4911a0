//! Crypto engine: generates member keys and hands out signers.

use std::sync::Arc;

use ed25519_dalek::SigningKey;

use crate::ed25519;
use crate::key_store::{KeyPair, KeyStore};
use crate::{Algorithm, KeyInfo, KeyLevel, Signer, SignerError, Verifier, now_ms};

// ---------------------------------------------------------------------------
// Ed25519Signer
// ---------------------------------------------------------------------------

/// [`Signer`] backed by an in-process Ed25519 secret key.
pub struct Ed25519Signer {
    info: KeyInfo,
    key: SigningKey,
}

impl Ed25519Signer {
    /// Creates a signer from a stored key pair.
    pub fn new(pair: &KeyPair) -> Self {
        Self {
            info: pair.info.clone(),
            key: SigningKey::from_bytes(&pair.secret_key),
        }
    }
}

impl Signer for Ed25519Signer {
    fn key(&self) -> &KeyInfo {
        &self.info
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, SignerError> {
        Ok(ed25519::sign_message(&self.key, message).to_bytes().to_vec())
    }
}

// ---------------------------------------------------------------------------
// Ed25519Verifier
// ---------------------------------------------------------------------------

/// [`Verifier`] for one Ed25519 public key.
pub struct Ed25519Verifier {
    key: ed25519_dalek::VerifyingKey,
}

impl Ed25519Verifier {
    /// Creates a verifier from raw public key bytes.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::InvalidKey`] if the bytes are not a valid key.
    pub fn from_public_key(public_key: &[u8]) -> Result<Self, SignerError> {
        Ok(Self {
            key: ed25519::verifying_key_from_bytes(public_key)?,
        })
    }
}

impl Verifier for Ed25519Verifier {
    fn verify(&self, message: &[u8], signature: &[u8]) -> Result<(), SignerError> {
        let signature = ed25519::signature_from_bytes(signature)?;
        ed25519::verify_message(&self.key, message, &signature)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CryptoEngine
// ---------------------------------------------------------------------------

/// Key management for a single member.
///
/// The engine is cheap to clone; clones share the same key store.
#[derive(Clone)]
pub struct CryptoEngine {
    member_id: String,
    store: Arc<dyn KeyStore>,
}

impl CryptoEngine {
    /// Creates an engine for `member_id` backed by `store`.
    pub fn new(member_id: impl Into<String>, store: Arc<dyn KeyStore>) -> Self {
        Self {
            member_id: member_id.into(),
            store,
        }
    }

    /// The member this engine manages keys for.
    pub fn member_id(&self) -> &str {
        &self.member_id
    }

    /// Generates and stores a new key at `level`.
    pub fn generate_key(&self, level: KeyLevel) -> Result<KeyInfo, SignerError> {
        let secret = ed25519::generate_signing_key();
        let public_key = secret.verifying_key().to_bytes();
        let info = KeyInfo {
            id: ed25519::key_id(&public_key),
            level,
            algorithm: Algorithm::Ed25519,
            public_key,
            expires_at_ms: None,
        };
        self.store.put(
            &self.member_id,
            KeyPair {
                info: info.clone(),
                secret_key: secret.to_bytes(),
            },
        )?;
        Ok(info)
    }

    /// Generates one key at each level, highest privilege first.
    pub fn generate_keys(&self) -> Result<Vec<KeyInfo>, SignerError> {
        KeyLevel::ALL
            .iter()
            .map(|level| self.generate_key(*level))
            .collect()
    }

    /// Returns a signer for the newest usable key at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::KeyNotFound`] if the member has no such key.
    pub fn create_signer(&self, level: KeyLevel) -> Result<Arc<dyn Signer>, SignerError> {
        let pair = self.store.get_by_level(&self.member_id, level, now_ms())?;
        Ok(Arc::new(Ed25519Signer::new(&pair)))
    }

    /// Returns a verifier for the stored key `key_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::UnknownKey`] if the key is not stored.
    pub fn create_verifier(&self, key_id: &str) -> Result<Ed25519Verifier, SignerError> {
        let pair = self.store.get_by_id(&self.member_id, key_id)?;
        Ed25519Verifier::from_public_key(&pair.info.public_key)
    }

    /// Lists the member's stored keys.
    pub fn keys(&self) -> Result<Vec<KeyInfo>, SignerError> {
        self.store.list(&self.member_id)
    }

    /// Deletes the stored keys with the given IDs.
    pub fn delete_keys(&self, key_ids: &[String]) -> Result<(), SignerError> {
        self.store.delete_keys(&self.member_id, key_ids)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
