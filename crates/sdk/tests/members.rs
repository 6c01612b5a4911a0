//! Member lifecycle against a scripted gateway.

mod common;

use std::sync::Arc;

use prost::Message;
use sdk::SdkError;
use sdk::alias;
use sdk::auth::{CREATED_AT_HEADER, KEY_ID_HEADER, MEMBER_ID_HEADER, ON_BEHALF_OF_HEADER};
use signer::{InMemoryKeyStore, KeyLevel, KeyStore, now_ms};
use transport::Method;
use transport::proto::gateway::{
    DeleteMemberResponse, GetAliasesResponse, GetMemberResponse, ResolveAliasResponse,
    SetProfileRequest, SetProfileResponse, UpdateMemberRequest,
};
use transport::proto::member::Profile;
use transport::proto::member::member_operation::Operation;
use transport::proto::token::TokenMember;

use common::*;

#[tokio::test]
async fn create_member_registers_keys_and_alias() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    queue_create_member(tokenio.gateway(), "m:alice");

    let member = tokenio
        .create_member(Some(alias::email("alice@example.com")))
        .await
        .unwrap();
    assert_eq!(member.member_id(), "m:alice");
    assert_eq!(store.list("m:alice").unwrap().len(), 3);

    let calls = tokenio.gateway().calls_to(Method::UpdateMember);
    assert_eq!(calls.len(), 1);
    assert!(calls[0].metadata.is_empty());

    let request: UpdateMemberRequest = calls[0].decode().unwrap();
    let update = request.update.unwrap();
    assert_eq!(update.prev_hash, "");
    assert_eq!(update.member_id, "m:alice");
    let adds = update
        .operations
        .iter()
        .filter(|op| matches!(op.operation, Some(Operation::AddKey(_))))
        .count();
    assert_eq!(adds, 3);
    assert!(matches!(
        update.operations.last().and_then(|op| op.operation.as_ref()),
        Some(Operation::AddAlias(_))
    ));
    assert_eq!(request.metadata.len(), 1);

    let signature = request.update_signature.unwrap();
    let privileged = store
        .get_by_level("m:alice", KeyLevel::Privileged, now_ms())
        .unwrap();
    assert_eq!(signature.key_id, privileged.info.id);
    assert_signed_by(
        store.as_ref(),
        "m:alice",
        &signature.key_id,
        &update.encode_to_vec(),
        &signature.signature,
    );
}

#[tokio::test]
async fn get_member_requires_local_keys() {
    let tokenio = tokenio();
    let err = tokenio.get_member("m:stranger").await.unwrap_err();
    assert_eq!(err, SdkError::NoLocalKeys("m:stranger".into()));
    assert!(tokenio.gateway().calls().is_empty());
}

#[tokio::test]
async fn get_member_logs_in_with_stored_keys() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let first = tokenio_with_store(Arc::clone(&store));
    new_member(&first, "m:bob").await;

    let second = tokenio_with_store(store);
    second.gateway().respond(
        Method::GetMember,
        GetMemberResponse {
            member: Some(member_proto("m:bob", "h1")),
        },
    );
    let member = second.get_member("m:bob").await.unwrap();
    assert_eq!(member.member_id(), "m:bob");

    let calls = second.gateway().calls_to(Method::GetMember);
    let call = &calls[0];
    assert_eq!(call.header(MEMBER_ID_HEADER), Some("m:bob"));
    assert!(call.header(KEY_ID_HEADER).is_some());
    assert!(call.header(CREATED_AT_HEADER).is_some());
}

#[tokio::test]
async fn get_member_fails_for_unknown_member() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    new_member(&tokenio, "m:gone").await;

    tokenio
        .gateway()
        .fail(Method::GetMember, tonic::Code::NotFound, "member not found");
    let err = tokenio.get_member("m:gone").await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::NotFound));
}

#[tokio::test]
async fn alias_updates_chain_to_last_hash() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:carol").await;

    queue_member_update(tokenio.gateway(), "m:carol", "h7");
    member
        .add_alias(alias::email("carol@example.com"))
        .await
        .unwrap();

    let call = tokenio.gateway().calls_to(Method::UpdateMember).pop().unwrap();
    let request: UpdateMemberRequest = call.decode().unwrap();
    let update = request.update.unwrap();
    assert_eq!(update.prev_hash, "h7");
    assert_eq!(request.metadata.len(), 1);

    let privileged = store
        .get_by_level("m:carol", KeyLevel::Privileged, now_ms())
        .unwrap();
    assert_eq!(call.header(KEY_ID_HEADER), Some(privileged.info.id.as_str()));
}

#[tokio::test]
async fn remove_keys_drops_local_copies() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:dave").await;

    let low = store.get_by_level("m:dave", KeyLevel::Low, now_ms()).unwrap();
    queue_member_update(tokenio.gateway(), "m:dave", "h2");
    member.remove_key(&low.info.id).await.unwrap();

    let remaining = store.list("m:dave").unwrap();
    assert_eq!(remaining.len(), 2);
    assert!(remaining.iter().all(|k| k.id != low.info.id));
}

#[tokio::test]
async fn provision_device_and_approve() {
    let tokenio = tokenio();
    tokenio
        .gateway()
        .respond(Method::ResolveAlias, ResolveAliasResponse { member: None });
    let err = tokenio
        .provision_device(alias::email("nobody@example.com"))
        .await
        .unwrap_err();
    assert_eq!(err, SdkError::AliasNotFound);

    let owner = new_member(&tokenio, "m:erin").await;
    tokenio.gateway().respond(
        Method::ResolveAlias,
        ResolveAliasResponse {
            member: Some(TokenMember {
                id: "m:erin".into(),
                alias: None,
            }),
        },
    );
    let device = tokenio
        .provision_device(alias::email("erin@example.com"))
        .await
        .unwrap();
    assert_eq!(device.member_id, "m:erin");
    assert_eq!(device.keys.len(), 3);

    queue_member_update(tokenio.gateway(), "m:erin", "h3");
    owner.approve_keys(&device.keys).await.unwrap();
    let request: UpdateMemberRequest = tokenio
        .gateway()
        .calls_to(Method::UpdateMember)
        .pop()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(request.update.unwrap().operations.len(), 3);
}

#[tokio::test]
async fn alias_lookup() {
    let tokenio = tokenio();
    tokenio
        .gateway()
        .respond(
            Method::ResolveAlias,
            ResolveAliasResponse {
                member: Some(TokenMember {
                    id: "m:frank".into(),
                    alias: None,
                }),
            },
        )
        .respond(Method::ResolveAlias, ResolveAliasResponse { member: None });

    assert!(tokenio.alias_exists(alias::domain("frank.example")).await.unwrap());
    assert_eq!(
        tokenio
            .get_member_id(alias::domain("nobody.example"))
            .await
            .unwrap(),
        None
    );
}

#[tokio::test]
async fn access_token_representation_adds_headers() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:tpp").await;
    tokenio.gateway().respond(
        Method::GetAliases,
        GetAliasesResponse {
            aliases: vec![alias::email("grantor@example.com")],
            unverified_aliases: Vec::new(),
        },
    );

    let grantor = member.for_access_token("ta:1", false);
    let first = grantor.first_alias().await.unwrap().unwrap();
    assert_eq!(first.value, "grantor@example.com");

    let calls = tokenio.gateway().calls_to(Method::GetAliases);
    let call = &calls[0];
    assert_eq!(call.header(ON_BEHALF_OF_HEADER), Some("ta:1"));
    assert_eq!(call.header("customer-initiated"), None);
}

#[tokio::test]
async fn gateway_errors_keep_status_code() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:gina").await;
    tokenio
        .gateway()
        .fail(Method::GetAliases, tonic::Code::PermissionDenied, "nope");

    let err = member.aliases().await.unwrap_err();
    assert_eq!(err.code(), Some(tonic::Code::PermissionDenied));
}

#[tokio::test]
async fn set_profile_uses_standard_key() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:gina").await;
    let profile = Profile {
        display_name_first: "Gina".into(),
        display_name_last: "Moss".into(),
    };
    tokenio.gateway().respond(
        Method::SetProfile,
        SetProfileResponse {
            profile: Some(profile.clone()),
        },
    );

    assert_eq!(member.set_profile(profile.clone()).await.unwrap(), profile);

    let calls = tokenio.gateway().calls_to(Method::SetProfile);
    let call = &calls[0];
    let standard = store
        .get_by_level("m:gina", KeyLevel::Standard, now_ms())
        .unwrap();
    assert_eq!(call.header(KEY_ID_HEADER), Some(standard.info.id.as_str()));
    let request: SetProfileRequest = call.decode().unwrap();
    assert_eq!(request.profile, Some(profile));
}

#[tokio::test]
async fn delete_member_drops_local_keys() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:hal").await;
    let other = new_member(&tokenio, "m:ivy").await;
    tokenio
        .gateway()
        .respond(Method::DeleteMember, DeleteMemberResponse {});
    let privileged = store
        .get_by_level("m:hal", KeyLevel::Privileged, now_ms())
        .unwrap();

    member.delete_member().await.unwrap();

    let calls = tokenio.gateway().calls_to(Method::DeleteMember);
    assert_eq!(calls[0].header(KEY_ID_HEADER), Some(privileged.info.id.as_str()));
    assert!(store.list("m:hal").unwrap().is_empty());
    assert_eq!(store.list(other.member_id()).unwrap().len(), 3);
}
