//! Shared utility functions: nonces, amount formatting, ref ID checks.
//!
//! Pure helpers used by the builders and by member operations.

use config::constants::REF_ID_MAX_LENGTH;
use rand_core::{OsRng, RngCore};
use tracing::warn;

use crate::SdkError;

// ---------------------------------------------------------------------------
// Nonces
// ---------------------------------------------------------------------------

/// Random base58 string of `len` characters (at most 24).
///
/// Each input byte contributes at least one base58 character, so 24 random
/// bytes always yield 24 or more characters.
pub(crate) fn generate_nonce(len: usize) -> String {
    let mut bytes = [0u8; 24];
    OsRng.fill_bytes(&mut bytes);
    bs58::encode(bytes).into_string().chars().take(len).collect()
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Formats a validated amount for the wire.
pub(crate) fn format_amount(amount: f64) -> Result<String, SdkError> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount.to_string())
    } else {
        Err(SdkError::InvalidAmount)
    }
}

/// Checks `ref_id` against the length limit, generating one if empty.
pub(crate) fn resolve_ref_id(ref_id: &str) -> Result<String, SdkError> {
    let len = ref_id.chars().count();
    if len > REF_ID_MAX_LENGTH {
        return Err(SdkError::RefIdTooLong(len));
    }
    if ref_id.is_empty() {
        let generated = generate_nonce(REF_ID_MAX_LENGTH);
        warn!(ref_id = %generated, "ref id is not set, using a random one");
        return Ok(generated);
    }
    Ok(ref_id.to_owned())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
