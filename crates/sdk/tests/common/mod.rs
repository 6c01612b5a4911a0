//! Shared fixtures for SDK integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use sdk::{Member, TokenIo};
use signer::{InMemoryKeyStore, KeyStore};
use transport::Method;
use transport::mock::MockGateway;
use transport::proto::gateway::{CreateMemberResponse, GetMemberResponse, UpdateMemberResponse};
use transport::proto::member;

pub const WEB_APP_HOST: &str = "web-app.sandbox.token.io";

pub fn tokenio() -> TokenIo<MockGateway> {
    tokenio_with_store(Arc::new(InMemoryKeyStore::new()))
}

pub fn tokenio_with_store(store: Arc<dyn KeyStore>) -> TokenIo<MockGateway> {
    TokenIo::with_gateway(MockGateway::new(), WEB_APP_HOST, store)
}

pub fn member_proto(member_id: &str, last_hash: &str) -> member::Member {
    member::Member {
        id: member_id.into(),
        last_hash: last_hash.into(),
        ..Default::default()
    }
}

/// Queues the two responses `create_member` needs.
pub fn queue_create_member(gateway: &MockGateway, member_id: &str) {
    gateway
        .respond(
            Method::CreateMember,
            CreateMemberResponse {
                member_id: member_id.into(),
            },
        )
        .respond(
            Method::UpdateMember,
            UpdateMemberResponse {
                member: Some(member_proto(member_id, "h1")),
            },
        );
}

/// Queues the responses of one member update (fetch, then update).
pub fn queue_member_update(gateway: &MockGateway, member_id: &str, last_hash: &str) {
    gateway
        .respond(
            Method::GetMember,
            GetMemberResponse {
                member: Some(member_proto(member_id, last_hash)),
            },
        )
        .respond(
            Method::UpdateMember,
            UpdateMemberResponse {
                member: Some(member_proto(member_id, "next")),
            },
        );
}

pub async fn new_member(tokenio: &TokenIo<MockGateway>, member_id: &str) -> Member<MockGateway> {
    queue_create_member(tokenio.gateway(), member_id);
    tokenio.create_member(None).await.unwrap()
}

/// Asserts that `signature` is a valid signature of `message` by the stored
/// key `key_id`.
pub fn assert_signed_by(
    store: &dyn KeyStore,
    member_id: &str,
    key_id: &str,
    message: &[u8],
    signature: &str,
) {
    use signer::{Ed25519Verifier, Verifier, ed25519};

    let pair = store.get_by_id(member_id, key_id).unwrap();
    let signature = ed25519::from_base64url(signature).unwrap();
    Ed25519Verifier::from_public_key(&pair.info.public_key)
        .unwrap()
        .verify(message, &signature)
        .unwrap();
}
