//! Token protocol constants.
//!
//! Limits and defaults shared by the transport and the SDK builders.

/// Default gateway port (gRPC over TLS).
pub const DEFAULT_PORT: u16 = 443;

/// Default connection timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 10_000;

/// Default request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 10_000;

/// Maximum message size for gRPC (50 MiB).
pub const MAX_GRPC_MESSAGE_SIZE: usize = 50 * 1024 * 1024;

/// Maximum length of a token or transfer reference ID.
pub const REF_ID_MAX_LENGTH: usize = 18;

/// Version string stamped into every token payload.
pub const TOKEN_PAYLOAD_VERSION: &str = "1.0";

/// Domain alias under which the Token member is registered.
pub const TOKEN_MEMBER_DOMAIN: &str = "token.io";

/// Value of the `token-sdk` request header.
pub const SDK_NAME: &str = "rust";

/// Page size used when a caller does not choose one.
pub const DEFAULT_PAGE_LIMIT: i32 = 100;

/// ISO 20022 frequency codes accepted for standing orders.
pub const STANDING_ORDER_FREQUENCIES: [&str; 8] = [
    "DAIL", "WEEK", "TOWK", "MNTH", "TOMN", "QUTR", "SEMI", "YEAR",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ref_id_fits_generated_nonce() {
        // Generated ref IDs are truncated to this length; keep it non-trivial.
        assert!(REF_ID_MAX_LENGTH >= 16);
    }

    #[test]
    fn frequencies_are_four_letter_codes() {
        for code in STANDING_ORDER_FREQUENCIES {
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_uppercase()));
        }
    }
}
