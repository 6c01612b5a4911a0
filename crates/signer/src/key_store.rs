//! Member key storage.
//!
//! [`CryptoEngine`](crate::CryptoEngine) keeps every key it generates in a
//! [`KeyStore`], keyed by member ID. The store holds secret key material, so
//! production deployments should back it with something persistent and
//! encrypted; [`InMemoryKeyStore`] is for development and tests.

use std::collections::HashMap;
use std::fmt;
use std::sync::RwLock;

use crate::{KeyInfo, KeyLevel, SignerError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A member key with its secret half.
#[derive(Clone)]
pub struct KeyPair {
    /// Public description of the key.
    pub info: KeyInfo,

    /// Ed25519 secret key seed.
    pub secret_key: [u8; 32],
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("info", &self.info)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Stores member key pairs.
///
/// Implementations must be `Send + Sync` for concurrent SDK operations.
pub trait KeyStore: Send + Sync {
    /// Stores `key` for `member_id`, replacing any key with the same ID.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::StoreFailed`] if the backend fails.
    fn put(&self, member_id: &str, key: KeyPair) -> Result<(), SignerError>;

    /// Returns the newest non-expired key at `level`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::KeyNotFound`] if no usable key exists.
    fn get_by_level(
        &self,
        member_id: &str,
        level: KeyLevel,
        now_ms: i64,
    ) -> Result<KeyPair, SignerError>;

    /// Returns the key with ID `key_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError::UnknownKey`] if the key is not stored.
    fn get_by_id(&self, member_id: &str, key_id: &str) -> Result<KeyPair, SignerError>;

    /// Lists all keys stored for `member_id`, oldest first.
    fn list(&self, member_id: &str) -> Result<Vec<KeyInfo>, SignerError>;

    /// Removes the keys with the given IDs. Unknown IDs are ignored.
    fn delete_keys(&self, member_id: &str, key_ids: &[String]) -> Result<(), SignerError>;
}

// ---------------------------------------------------------------------------
// InMemoryKeyStore
// ---------------------------------------------------------------------------

/// In-memory key store backed by `RwLock<HashMap>`.
#[derive(Default)]
pub struct InMemoryKeyStore {
    members: RwLock<HashMap<String, Vec<KeyPair>>>,
}

impl InMemoryKeyStore {
    /// Creates an empty in-memory key store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn put(&self, member_id: &str, key: KeyPair) -> Result<(), SignerError> {
        let mut map = self.members.write().map_err(|_| SignerError::StoreFailed)?;
        let keys = map.entry(member_id.to_owned()).or_default();
        keys.retain(|k| k.info.id != key.info.id);
        keys.push(key);
        Ok(())
    }

    fn get_by_level(
        &self,
        member_id: &str,
        level: KeyLevel,
        now_ms: i64,
    ) -> Result<KeyPair, SignerError> {
        let map = self.members.read().map_err(|_| SignerError::StoreFailed)?;
        map.get(member_id)
            .and_then(|keys| {
                keys.iter()
                    .rev()
                    .find(|k| k.info.level == level && !k.info.is_expired(now_ms))
            })
            .cloned()
            .ok_or(SignerError::KeyNotFound(level))
    }

    fn get_by_id(&self, member_id: &str, key_id: &str) -> Result<KeyPair, SignerError> {
        let map = self.members.read().map_err(|_| SignerError::StoreFailed)?;
        map.get(member_id)
            .and_then(|keys| keys.iter().find(|k| k.info.id == key_id))
            .cloned()
            .ok_or_else(|| SignerError::UnknownKey(key_id.to_owned()))
    }

    fn list(&self, member_id: &str) -> Result<Vec<KeyInfo>, SignerError> {
        let map = self.members.read().map_err(|_| SignerError::StoreFailed)?;
        Ok(map
            .get(member_id)
            .map(|keys| keys.iter().map(|k| k.info.clone()).collect())
            .unwrap_or_default())
    }

    fn delete_keys(&self, member_id: &str, key_ids: &[String]) -> Result<(), SignerError> {
        let mut map = self.members.write().map_err(|_| SignerError::StoreFailed)?;
        if let Some(keys) = map.get_mut(member_id) {
            keys.retain(|k| !key_ids.contains(&k.info.id));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
