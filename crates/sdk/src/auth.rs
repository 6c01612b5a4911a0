//! Request authentication.
//!
//! Authenticated gateway calls carry a member signature in metadata. The
//! signed message is the prost-encoded request followed by `.` and the
//! creation time in milliseconds:
//!
//! ```text
//! request_bytes || "." || created_at_ms
//! ```
//!
//! | Header | Value |
//! |--------|-------|
//! | `token-member-id` | signing member |
//! | `token-key-id` | ID of the signing key |
//! | `token-signature` | base64url signature |
//! | `token-created-at-ms` | signing time |
//! | `token-on-behalf-of` | access token ID, when acting for another member |
//! | `customer-initiated` | `true`, when the grantor is present |

use signer::{Signer, ed25519};
use transport::Metadata;

use crate::SdkError;

pub const MEMBER_ID_HEADER: &str = "token-member-id";
pub const KEY_ID_HEADER: &str = "token-key-id";
pub const SIGNATURE_HEADER: &str = "token-signature";
pub const CREATED_AT_HEADER: &str = "token-created-at-ms";
pub const ON_BEHALF_OF_HEADER: &str = "token-on-behalf-of";
pub const CUSTOMER_INITIATED_HEADER: &str = "customer-initiated";

/// Who a member is acting for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthContext {
    /// Access token the caller is redeeming, if any.
    pub on_behalf_of: Option<String>,

    /// Whether the grantor initiated the call.
    pub customer_initiated: bool,
}

/// Message covered by the request signature.
pub fn signing_message(request_bytes: &[u8], created_at_ms: i64) -> Vec<u8> {
    let suffix = format!(".{created_at_ms}");
    let mut message = Vec::with_capacity(request_bytes.len() + suffix.len());
    message.extend_from_slice(request_bytes);
    message.extend_from_slice(suffix.as_bytes());
    message
}

/// Signs `request_bytes` and returns the authentication metadata.
///
/// # Errors
///
/// Returns [`SdkError::Signer`] if the signer fails.
pub fn auth_metadata(
    member_id: &str,
    signer: &dyn Signer,
    request_bytes: &[u8],
    created_at_ms: i64,
    context: &AuthContext,
) -> Result<Metadata, SdkError> {
    let signature = signer.sign(&signing_message(request_bytes, created_at_ms))?;

    let mut metadata: Metadata = vec![
        (MEMBER_ID_HEADER, member_id.to_owned()),
        (KEY_ID_HEADER, signer.key().id.clone()),
        (SIGNATURE_HEADER, ed25519::to_base64url(&signature)),
        (CREATED_AT_HEADER, created_at_ms.to_string()),
    ];
    if let Some(token_id) = &context.on_behalf_of {
        metadata.push((ON_BEHALF_OF_HEADER, token_id.clone()));
        if context.customer_initiated {
            metadata.push((CUSTOMER_INITIATED_HEADER, "true".to_owned()));
        }
    }
    Ok(metadata)
}
