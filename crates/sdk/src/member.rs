//! Authenticated member handle.
//!
//! A [`Member`] signs every call with one of its locally stored keys. This
//! module holds identity, profile, alias and key management; account, token
//! and transfer calls live in [`crate::operations`].
//!
//! # Member updates
//!
//! Aliases and keys change through signed member updates. Each update
//! chains to the member's current `last_hash` and is signed with the
//! privileged key:
//!
//! ```text
//! GetMember -> MemberUpdate { prev_hash: last_hash, operations } -> sign -> UpdateMember
//! ```

use std::fmt;

use prost::Message;
use signer::{KeyInfo, KeyLevel, ed25519};
use tracing::info;
use transport::proto::common::{self, Alias, Key, KeyAlgorithm};
use transport::proto::gateway::{
    DeleteMemberRequest, DeleteMemberResponse, GetAliasesRequest, GetAliasesResponse,
    GetMemberRequest, GetMemberResponse, GetProfileRequest, GetProfileResponse, SetProfileRequest,
    SetProfileResponse, UpdateMemberRequest, UpdateMemberResponse, VerifyAliasRequest,
    VerifyAliasResponse,
};
use transport::proto::member::{
    self as proto, MemberAddKeyOperation, MemberAliasOperation, MemberOperation,
    MemberOperationMetadata, MemberRemoveKeyOperation, MemberUpdate, Profile, member_operation,
    member_operation_metadata,
};
use transport::{Gateway, GrpcTransport, Method};

use crate::SdkError;
use crate::alias::alias_hash;
use crate::rpc::Client;

/// An authenticated member.
///
/// `Clone`-able; clones share the gateway and key store.
pub struct Member<G = GrpcTransport> {
    pub(crate) client: Client<G>,
}

impl<G> Clone for Member<G> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
        }
    }
}

impl<G> fmt::Debug for Member<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("member_id", &self.member_id())
            .finish_non_exhaustive()
    }
}

impl<G> Member<G> {
    pub(crate) fn new(client: Client<G>) -> Self {
        Self { client }
    }

    pub fn member_id(&self) -> &str {
        self.client.member_id()
    }

    /// Returns a handle that acts on behalf of the grantor of access token
    /// `token_id`. `customer_initiated` marks calls made while the grantor
    /// is present.
    pub fn for_access_token(&self, token_id: &str, customer_initiated: bool) -> Self {
        Self {
            client: self.client.for_access_token(token_id, customer_initiated),
        }
    }
}

impl<G: Gateway> Member<G> {
    // -----------------------------------------------------------------------
    // Identity
    // -----------------------------------------------------------------------

    /// Verified aliases of this member.
    pub async fn aliases(&self) -> Result<Vec<Alias>, SdkError> {
        let response: GetAliasesResponse = self
            .client
            .call(Method::GetAliases, GetAliasesRequest {}, KeyLevel::Low)
            .await?;
        Ok(response.aliases)
    }

    /// The first verified alias, if any.
    pub async fn first_alias(&self) -> Result<Option<Alias>, SdkError> {
        Ok(self.aliases().await?.into_iter().next())
    }

    /// Keys registered for this member.
    pub async fn keys(&self) -> Result<Vec<Key>, SdkError> {
        Ok(self.fetch().await?.keys)
    }

    pub async fn get_profile(&self, member_id: &str) -> Result<Profile, SdkError> {
        let response: GetProfileResponse = self
            .client
            .call(
                Method::GetProfile,
                GetProfileRequest {
                    member_id: member_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        response.profile.ok_or(SdkError::InvalidResponse("profile"))
    }

    pub async fn set_profile(&self, profile: Profile) -> Result<Profile, SdkError> {
        let response: SetProfileResponse = self
            .client
            .call(
                Method::SetProfile,
                SetProfileRequest {
                    profile: Some(profile),
                },
                KeyLevel::Standard,
            )
            .await?;
        response.profile.ok_or(SdkError::InvalidResponse("profile"))
    }

    /// Deletes the member. Local keys are removed as well.
    pub async fn delete_member(&self) -> Result<(), SdkError> {
        let _: DeleteMemberResponse = self
            .client
            .call(
                Method::DeleteMember,
                DeleteMemberRequest {},
                KeyLevel::Privileged,
            )
            .await?;

        let engine = self.client.engine();
        let ids: Vec<String> = engine.keys()?.into_iter().map(|k| k.id).collect();
        engine.delete_keys(&ids)?;
        info!(member_id = %self.member_id(), "member deleted");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Aliases
    // -----------------------------------------------------------------------

    pub async fn add_alias(&self, alias: Alias) -> Result<proto::Member, SdkError> {
        self.add_aliases(vec![alias]).await
    }

    /// Adds aliases. They stay unverified until confirmed with
    /// [`verify_alias`](Self::verify_alias).
    pub async fn add_aliases(&self, aliases: Vec<Alias>) -> Result<proto::Member, SdkError> {
        let operations = aliases.iter().map(add_alias_operation).collect();
        let metadata = aliases.iter().map(add_alias_metadata).collect();
        self.update(operations, metadata).await
    }

    pub async fn remove_alias(&self, alias: Alias) -> Result<proto::Member, SdkError> {
        self.remove_aliases(vec![alias]).await
    }

    pub async fn remove_aliases(&self, aliases: Vec<Alias>) -> Result<proto::Member, SdkError> {
        let operations = aliases
            .iter()
            .map(|alias| MemberOperation {
                operation: Some(member_operation::Operation::RemoveAlias(alias_operation(alias))),
            })
            .collect();
        self.update(operations, Vec::new()).await
    }

    /// Confirms an alias with the code sent to it.
    pub async fn verify_alias(&self, verification_id: &str, code: &str) -> Result<(), SdkError> {
        let _: VerifyAliasResponse = self
            .client
            .call(
                Method::VerifyAlias,
                VerifyAliasRequest {
                    verification_id: verification_id.to_owned(),
                    code: code.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Keys
    // -----------------------------------------------------------------------

    /// Registers a key generated elsewhere, e.g. by
    /// [`TokenIo::provision_device`](crate::TokenIo::provision_device).
    pub async fn approve_key(&self, key: &KeyInfo) -> Result<proto::Member, SdkError> {
        self.approve_keys(std::slice::from_ref(key)).await
    }

    pub async fn approve_keys(&self, keys: &[KeyInfo]) -> Result<proto::Member, SdkError> {
        let operations = keys.iter().map(add_key_operation).collect();
        self.update(operations, Vec::new()).await
    }

    pub async fn remove_key(&self, key_id: &str) -> Result<proto::Member, SdkError> {
        self.remove_keys(&[key_id.to_owned()]).await
    }

    /// Unregisters keys and drops any local copies.
    pub async fn remove_keys(&self, key_ids: &[String]) -> Result<proto::Member, SdkError> {
        let operations = key_ids
            .iter()
            .map(|key_id| MemberOperation {
                operation: Some(member_operation::Operation::RemoveKey(
                    MemberRemoveKeyOperation {
                        key_id: key_id.clone(),
                    },
                )),
            })
            .collect();
        let member = self.update(operations, Vec::new()).await?;
        self.client.engine().delete_keys(key_ids)?;
        Ok(member)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    async fn fetch(&self) -> Result<proto::Member, SdkError> {
        let response: GetMemberResponse = self
            .client
            .call(
                Method::GetMember,
                GetMemberRequest {
                    member_id: self.member_id().to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        response.member.ok_or(SdkError::InvalidResponse("member"))
    }

    async fn update(
        &self,
        operations: Vec<MemberOperation>,
        metadata: Vec<MemberOperationMetadata>,
    ) -> Result<proto::Member, SdkError> {
        let current = self.fetch().await?;
        let update = MemberUpdate {
            prev_hash: current.last_hash,
            member_id: self.member_id().to_owned(),
            operations,
        };
        let signature = self
            .client
            .sign(KeyLevel::Privileged, &update.encode_to_vec())?;

        let response: UpdateMemberResponse = self
            .client
            .call(
                Method::UpdateMember,
                UpdateMemberRequest {
                    update: Some(update),
                    update_signature: Some(signature),
                    metadata,
                },
                KeyLevel::Privileged,
            )
            .await?;
        response.member.ok_or(SdkError::InvalidResponse("member"))
    }
}

// ---------------------------------------------------------------------------
// Update operations
// ---------------------------------------------------------------------------

/// Wire form of a locally held key.
pub fn key_to_proto(key: &KeyInfo) -> Key {
    let level = match key.level {
        KeyLevel::Privileged => common::KeyLevel::Privileged,
        KeyLevel::Standard => common::KeyLevel::Standard,
        KeyLevel::Low => common::KeyLevel::Low,
    };
    Key {
        id: key.id.clone(),
        public_key: ed25519::to_base64url(&key.public_key),
        level: level as i32,
        algorithm: KeyAlgorithm::Ed25519 as i32,
        expires_at_ms: key.expires_at_ms.unwrap_or_default(),
    }
}

pub(crate) fn add_key_operation(key: &KeyInfo) -> MemberOperation {
    MemberOperation {
        operation: Some(member_operation::Operation::AddKey(MemberAddKeyOperation {
            key: Some(key_to_proto(key)),
        })),
    }
}

pub(crate) fn add_alias_operation(alias: &Alias) -> MemberOperation {
    MemberOperation {
        operation: Some(member_operation::Operation::AddAlias(alias_operation(alias))),
    }
}

pub(crate) fn add_alias_metadata(alias: &Alias) -> MemberOperationMetadata {
    MemberOperationMetadata {
        r#type: Some(member_operation_metadata::Type::AddAliasMetadata(
            member_operation_metadata::AddAliasMetadata {
                alias_hash: alias_hash(alias),
                alias: Some(alias.clone()),
            },
        )),
    }
}

fn alias_operation(alias: &Alias) -> MemberAliasOperation {
    MemberAliasOperation {
        alias_hash: alias_hash(alias),
        realm: alias.realm.clone(),
    }
}
