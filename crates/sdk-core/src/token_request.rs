//! Token request redirect URLs and callback parameters.
//!
//! A third party that wants a member to create a token stores a token
//! request on the gateway, then redirects the user to the Token web app:
//!
//! ```text
//! https://<web-app-host>/request-token/<request-id>?state=<urlencoded-state>
//! ```
//!
//! `state` is the JSON object `{"csrfTokenHash": ..., "innerState": ...}`.
//! When the user finishes, the web app redirects back to the caller with
//! three query parameters:
//!
//! | Key | Value |
//! |-----|-------|
//! | `token-id` | ID of the created token |
//! | `state` | the serialized state, echoed back |
//! | `signature` | JSON `{"memberId","keyId","signature"}` from the Token member |
//!
//! The signature covers the canonical JSON of [`TokenRequestStatePayload`].
//! Verifying it needs the Token member's keys, which is the SDK's job; this
//! module only does the parsing and encoding.
//!
//! # Example
//!
//! ```rust
//! use sdk_core::{TokenRequestState, hash_string, token_request_url};
//!
//! let url = token_request_url("web-app.token.io", "rq:42", "cart=7", "csrf-123");
//! assert!(url.starts_with("https://web-app.token.io/request-token/rq:42?state="));
//!
//! let state = TokenRequestState::new("csrf-123", "cart=7");
//! assert_eq!(state.csrf_token_hash, hash_string("csrf-123"));
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use url::Url;

use crate::canonical::canonicalize_json_value;

/// Query key carrying the created token ID.
pub const TOKEN_ID_PARAM: &str = "token-id";

/// Query key carrying the echoed serialized state.
pub const STATE_PARAM: &str = "state";

/// Query key carrying the Token member's signature.
pub const SIGNATURE_PARAM: &str = "signature";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from parsing or validating a token request callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The callback URL could not be parsed.
    InvalidUrl(String),

    /// A mandatory query parameter is absent.
    MissingParameter(&'static str),

    /// The `state` parameter is not a valid serialized state.
    MalformedState,

    /// The `signature` parameter is not a valid signature object.
    MalformedSignature,

    /// The CSRF token hash in the state does not match the caller's token.
    CsrfMismatch,
}

impl fmt::Display for CallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUrl(reason) => write!(f, "invalid callback url: {reason}"),
            Self::MissingParameter(name) => write!(f, "missing callback parameter: {name}"),
            Self::MalformedState => write!(f, "malformed token request state"),
            Self::MalformedSignature => write!(f, "malformed callback signature"),
            Self::CsrfMismatch => write!(f, "csrf token does not match request state"),
        }
    }
}

impl std::error::Error for CallbackError {}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Base58-encoded SHA-256 of `value`.
pub fn hash_string(value: &str) -> String {
    bs58::encode(Sha256::digest(value.as_bytes())).into_string()
}

/// State carried through the token request redirect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequestState {
    /// [`hash_string`] of the caller's CSRF token.
    pub csrf_token_hash: String,

    /// Opaque state supplied by the caller.
    pub inner_state: String,
}

impl TokenRequestState {
    /// Creates a state, hashing the CSRF token.
    pub fn new(csrf_token: &str, inner_state: impl Into<String>) -> Self {
        Self {
            csrf_token_hash: hash_string(csrf_token),
            inner_state: inner_state.into(),
        }
    }

    /// Serializes the state to its JSON wire form.
    pub fn serialize(&self) -> String {
        json!({
            "csrfTokenHash": self.csrf_token_hash,
            "innerState": self.inner_state,
        })
        .to_string()
    }

    /// Parses a serialized state.
    ///
    /// # Errors
    ///
    /// Returns [`CallbackError::MalformedState`] if `serialized` is not the
    /// expected JSON object.
    pub fn parse(serialized: &str) -> Result<Self, CallbackError> {
        serde_json::from_str(serialized).map_err(|_| CallbackError::MalformedState)
    }

    /// Checks that this state was created with `csrf_token`.
    pub fn verify_csrf(&self, csrf_token: &str) -> Result<(), CallbackError> {
        if self.csrf_token_hash == hash_string(csrf_token) {
            Ok(())
        } else {
            Err(CallbackError::CsrfMismatch)
        }
    }
}

/// Builds the web-app URL that starts the token request flow.
pub fn token_request_url(
    web_app_host: &str,
    request_id: &str,
    inner_state: &str,
    csrf_token: &str,
) -> String {
    let state = TokenRequestState::new(csrf_token, inner_state).serialize();
    format!(
        "https://{web_app_host}/request-token/{request_id}?{STATE_PARAM}={}",
        urlencoding::encode(&state)
    )
}

// ---------------------------------------------------------------------------
// Callback
// ---------------------------------------------------------------------------

/// Signature object carried in the `signature` callback parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackSignature {
    /// Signing member (the Token member).
    pub member_id: String,

    /// ID of the key that produced the signature.
    pub key_id: String,

    /// Base64url-encoded Ed25519 signature.
    pub signature: String,
}

/// The message the Token member signs when completing a token request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequestStatePayload {
    /// ID of the created token.
    pub token_id: String,

    /// URL-encoded serialized state.
    pub state: String,
}

impl TokenRequestStatePayload {
    /// Canonical JSON bytes covered by the signature.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let value = json!({
            "tokenId": self.token_id,
            "state": self.state,
        });
        canonicalize_json_value(&value).to_string().into_bytes()
    }
}

/// Raw parameters extracted from a callback URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequestCallbackParameters {
    /// ID of the created token.
    pub token_id: String,

    /// Serialized [`TokenRequestState`], already URL-decoded.
    pub serialized_state: String,

    /// The Token member's signature over [`TokenRequestStatePayload`].
    pub signature: CallbackSignature,
}

impl TokenRequestCallbackParameters {
    /// Parses callback parameters from a full URL or a bare query string.
    ///
    /// # Errors
    ///
    /// - [`CallbackError::InvalidUrl`] if the input cannot be parsed
    /// - [`CallbackError::MissingParameter`] if any of the three keys is absent
    /// - [`CallbackError::MalformedSignature`] if `signature` is not valid JSON
    pub fn parse(callback_url: &str) -> Result<Self, CallbackError> {
        let url = Url::parse(callback_url)
            .or_else(|_| Url::parse("https://localhost/").and_then(|base| base.join(callback_url)))
            .map_err(|e| CallbackError::InvalidUrl(e.to_string()))?;

        let mut token_id = None;
        let mut state = None;
        let mut signature = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                TOKEN_ID_PARAM => token_id = Some(value.into_owned()),
                STATE_PARAM => state = Some(value.into_owned()),
                SIGNATURE_PARAM => signature = Some(value.into_owned()),
                _ => {}
            }
        }

        let token_id = token_id.ok_or(CallbackError::MissingParameter(TOKEN_ID_PARAM))?;
        let serialized_state = state.ok_or(CallbackError::MissingParameter(STATE_PARAM))?;
        let signature = signature.ok_or(CallbackError::MissingParameter(SIGNATURE_PARAM))?;
        let signature = serde_json::from_str::<CallbackSignature>(&signature)
            .map_err(|_| CallbackError::MalformedSignature)?;

        Ok(Self {
            token_id,
            serialized_state,
            signature,
        })
    }

    /// Decodes the echoed state.
    pub fn state(&self) -> Result<TokenRequestState, CallbackError> {
        TokenRequestState::parse(&self.serialized_state)
    }

    /// The payload whose signature must be verified.
    pub fn state_payload(&self) -> TokenRequestStatePayload {
        TokenRequestStatePayload {
            token_id: self.token_id.clone(),
            state: urlencoding::encode(&self.serialized_state).into_owned(),
        }
    }
}

/// A verified token request callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRequestCallback {
    /// ID of the created token.
    pub token_id: String,

    /// The caller's original inner state.
    pub state: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_json() -> String {
        json!({"memberId": "m:token", "keyId": "k1", "signature": "c2ln"}).to_string()
    }

    fn callback_url(state: &str) -> String {
        format!(
            "https://merchant.example/callback?{TOKEN_ID_PARAM}=tt:abc&{STATE_PARAM}={}&{SIGNATURE_PARAM}={}",
            urlencoding::encode(state),
            urlencoding::encode(&signature_json()),
        )
    }

    #[test]
    fn hash_string_is_stable_base58() {
        let a = hash_string("csrf");
        assert_eq!(a, hash_string("csrf"));
        assert_ne!(a, hash_string("other"));
        assert!(bs58::decode(&a).into_vec().is_ok());
    }

    #[test]
    fn state_serializes_with_camel_case_keys() {
        let state = TokenRequestState::new("csrf", "inner");
        let serialized = state.serialize();
        assert!(serialized.contains("\"csrfTokenHash\""));
        assert!(serialized.contains("\"innerState\":\"inner\""));
        assert_eq!(TokenRequestState::parse(&serialized).unwrap(), state);
    }

    #[test]
    fn malformed_state_rejected() {
        assert_eq!(
            TokenRequestState::parse("not json"),
            Err(CallbackError::MalformedState)
        );
    }

    #[test]
    fn csrf_check() {
        let state = TokenRequestState::new("csrf", "inner");
        assert!(state.verify_csrf("csrf").is_ok());
        assert_eq!(state.verify_csrf("forged"), Err(CallbackError::CsrfMismatch));
    }

    #[test]
    fn request_url_embeds_encoded_state() {
        let url = token_request_url("web-app.sandbox.token.io", "rq:1", "a b&c", "csrf");
        let parsed = Url::parse(&url).unwrap();
        assert_eq!(parsed.host_str(), Some("web-app.sandbox.token.io"));
        assert_eq!(parsed.path(), "/request-token/rq:1");

        let state = parsed
            .query_pairs()
            .find(|(k, _)| k == STATE_PARAM)
            .map(|(_, v)| v.into_owned())
            .unwrap();
        let state = TokenRequestState::parse(&state).unwrap();
        assert_eq!(state.inner_state, "a b&c");
        assert!(state.verify_csrf("csrf").is_ok());
    }

    #[test]
    fn parses_full_callback_url() {
        let serialized = TokenRequestState::new("csrf", "inner").serialize();
        let params = TokenRequestCallbackParameters::parse(&callback_url(&serialized)).unwrap();

        assert_eq!(params.token_id, "tt:abc");
        assert_eq!(params.serialized_state, serialized);
        assert_eq!(params.signature.member_id, "m:token");
        assert_eq!(params.signature.key_id, "k1");
        assert_eq!(params.state().unwrap().inner_state, "inner");
    }

    #[test]
    fn parses_bare_query_string() {
        let serialized = TokenRequestState::new("csrf", "inner").serialize();
        let full = callback_url(&serialized);
        let query = &full[full.find('?').unwrap()..];

        let params = TokenRequestCallbackParameters::parse(query).unwrap();
        assert_eq!(params.token_id, "tt:abc");
    }

    #[test]
    fn missing_parameter_reported_by_name() {
        let url = format!(
            "https://merchant.example/cb?{TOKEN_ID_PARAM}=tt:abc&{SIGNATURE_PARAM}={}",
            urlencoding::encode(&signature_json())
        );
        assert_eq!(
            TokenRequestCallbackParameters::parse(&url),
            Err(CallbackError::MissingParameter(STATE_PARAM))
        );
    }

    #[test]
    fn malformed_signature_rejected() {
        let url = format!(
            "https://merchant.example/cb?{TOKEN_ID_PARAM}=tt:abc&{STATE_PARAM}=x&{SIGNATURE_PARAM}=nope"
        );
        assert_eq!(
            TokenRequestCallbackParameters::parse(&url),
            Err(CallbackError::MalformedSignature)
        );
    }

    #[test]
    fn state_payload_reencodes_state() {
        let serialized = TokenRequestState::new("csrf", "inner").serialize();
        let params = TokenRequestCallbackParameters::parse(&callback_url(&serialized)).unwrap();
        let payload = params.state_payload();

        assert_eq!(payload.token_id, "tt:abc");
        assert_eq!(payload.state, urlencoding::encode(&serialized));

        let bytes = String::from_utf8(payload.canonical_bytes()).unwrap();
        assert!(bytes.starts_with("{\"state\":"));
        assert!(bytes.ends_with("\"tokenId\":\"tt:abc\"}"));
    }
}
