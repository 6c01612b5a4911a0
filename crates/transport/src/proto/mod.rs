//! Protobuf messages of the Token gateway protocol.
//!
//! The server owns the schema; these are prost definitions of the subset the
//! SDK exchanges. Field tags must match the server's `.proto` files.
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`common`] | `Money`, `Alias`, `Signature`, `Key`, `Page`, `RequestStatus` |
//! | [`member`] | `Member`, `MemberUpdate` and its operations, `Profile` |
//! | [`account`] | `Account`, `Balance`, `Transaction` |
//! | [`token`] | `Token`, `TokenPayload` and its bodies, endorsement types |
//! | [`transfer`] | `Transfer`, `TransferPayload` |
//! | [`token_request`] | `TokenRequest`, its payload and options |
//! | [`gateway`] | Request/response pair of every gateway RPC |

pub mod account;
pub mod common;
pub mod gateway;
pub mod member;
pub mod token;
pub mod token_request;
pub mod transfer;

#[cfg(test)]
mod tests {
    use prost::Message;

    use super::common::{Key, KeyLevel};
    use super::token::{TokenPayload, TransferBody, token_payload};

    #[test]
    fn enum_accessors_fall_back_to_default() {
        let key = Key {
            level: 42,
            ..Default::default()
        };
        assert_eq!(key.level(), KeyLevel::InvalidLevel);

        let key = Key {
            level: KeyLevel::Low as i32,
            ..Default::default()
        };
        assert_eq!(key.level(), KeyLevel::Low);
    }

    #[test]
    fn payload_encoding_is_deterministic() {
        let payload = TokenPayload {
            version: "1.0".into(),
            ref_id: "ref".into(),
            body: Some(token_payload::Body::Transfer(TransferBody {
                lifetime_amount: "10".into(),
                currency: "EUR".into(),
                ..Default::default()
            })),
            ..Default::default()
        };
        assert_eq!(payload.encode_to_vec(), payload.clone().encode_to_vec());

        let decoded = TokenPayload::decode(payload.encode_to_vec().as_slice()).unwrap();
        assert_eq!(decoded, payload);
    }
}
