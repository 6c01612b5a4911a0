//! Unauthenticated entry-point operations: member creation, login, device
//! provisioning, and the token request redirect flow.

use config::constants::TOKEN_MEMBER_DOMAIN;
use prost::Message;
use sdk_core::{TokenRequestCallback, TokenRequestCallbackParameters, token_request_url};
use signer::{Ed25519Verifier, KeyLevel, Verifier, ed25519};
use tracing::{info, warn};
use transport::proto::common::Alias;
use transport::proto::gateway::{
    CreateMemberRequest, CreateMemberResponse, GetMemberRequest, GetMemberResponse,
    ResolveAliasRequest, ResolveAliasResponse, RetrieveTokenRequestRequest,
    RetrieveTokenRequestResponse, UpdateMemberRequest, UpdateMemberResponse,
};
use transport::proto::member::{self as proto, MemberUpdate};
use transport::proto::token_request::TokenRequest;
use transport::{Gateway, Method};

use crate::alias;
use crate::member::{add_alias_metadata, add_alias_operation, add_key_operation};
use crate::rpc::{Client, call_unauthenticated, sign_with};
use crate::utils::generate_nonce;
use crate::{DeviceInfo, Member, SdkError, TokenIo};

const MEMBER_NONCE_LEN: usize = 18;

impl<G: Gateway> TokenIo<G> {
    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    /// Creates a member with a fresh set of keys, optionally registering
    /// `alias`.
    ///
    /// One key per level is generated locally; the member's first update
    /// adds all of them (plus the alias) and is signed with the privileged
    /// key.
    pub async fn create_member(&self, alias: Option<Alias>) -> Result<Member<G>, SdkError> {
        let response: CreateMemberResponse = call_unauthenticated(
            self.gateway.as_ref(),
            Method::CreateMember,
            CreateMemberRequest {
                nonce: generate_nonce(MEMBER_NONCE_LEN),
            },
        )
        .await?;
        let member_id = response.member_id;
        if member_id.is_empty() {
            return Err(SdkError::InvalidResponse("member_id"));
        }

        let engine = self.engine(&member_id);
        let keys = engine.generate_keys()?;

        let mut operations: Vec<_> = keys.iter().map(add_key_operation).collect();
        let mut metadata = Vec::new();
        if let Some(alias) = &alias {
            operations.push(add_alias_operation(alias));
            metadata.push(add_alias_metadata(alias));
        }
        let update = MemberUpdate {
            prev_hash: String::new(),
            member_id: member_id.clone(),
            operations,
        };
        let signature = sign_with(&engine, KeyLevel::Privileged, &update.encode_to_vec())?;

        let _: UpdateMemberResponse = call_unauthenticated(
            self.gateway.as_ref(),
            Method::UpdateMember,
            UpdateMemberRequest {
                update: Some(update),
                update_signature: Some(signature),
                metadata,
            },
        )
        .await?;

        info!(%member_id, keys = keys.len(), with_alias = alias.is_some(), "member created");
        Ok(Member::new(Client::new(self.gateway.clone(), engine)))
    }

    /// Generates keys on this device for the member registered under
    /// `alias`. The keys must then be approved by a device holding the
    /// member's privileged key.
    pub async fn provision_device(&self, alias: Alias) -> Result<DeviceInfo, SdkError> {
        let member_id = self
            .get_member_id(alias)
            .await?
            .ok_or(SdkError::AliasNotFound)?;
        let keys = self.engine(&member_id).generate_keys()?;
        info!(%member_id, "device provisioned");
        Ok(DeviceInfo { member_id, keys })
    }

    /// Logs in as `member_id` with keys already held in the key store.
    ///
    /// # Errors
    ///
    /// [`SdkError::NoLocalKeys`] if no key is stored for the member, or a
    /// transport error if the gateway does not know the member.
    pub async fn get_member(&self, member_id: &str) -> Result<Member<G>, SdkError> {
        let engine = self.engine(member_id);
        if engine.keys()?.is_empty() {
            warn!(%member_id, "no local keys");
            return Err(SdkError::NoLocalKeys(member_id.to_owned()));
        }

        let client = Client::new(self.gateway.clone(), engine);
        let _: GetMemberResponse = client
            .call(
                Method::GetMember,
                GetMemberRequest {
                    member_id: member_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;

        info!(%member_id, "member logged in");
        Ok(Member::new(client))
    }

    /// Whether a member is registered under `alias`.
    pub async fn alias_exists(&self, alias: Alias) -> Result<bool, SdkError> {
        Ok(self.get_member_id(alias).await?.is_some())
    }

    /// The ID of the member registered under `alias`, if any.
    pub async fn get_member_id(&self, alias: Alias) -> Result<Option<String>, SdkError> {
        let response: ResolveAliasResponse = call_unauthenticated(
            self.gateway.as_ref(),
            Method::ResolveAlias,
            ResolveAliasRequest { alias: Some(alias) },
        )
        .await?;
        Ok(response
            .member
            .map(|m| m.id)
            .filter(|id| !id.is_empty()))
    }

    /// The Token member, whose keys sign token request callbacks.
    pub async fn get_token_member(&self) -> Result<proto::Member, SdkError> {
        let member_id = self
            .get_member_id(alias::domain(TOKEN_MEMBER_DOMAIN))
            .await?
            .ok_or(SdkError::AliasNotFound)?;
        let response: GetMemberResponse = call_unauthenticated(
            self.gateway.as_ref(),
            Method::GetMember,
            GetMemberRequest { member_id },
        )
        .await?;
        response.member.ok_or(SdkError::InvalidResponse("member"))
    }

    // -----------------------------------------------------------------------
    // Token requests
    // -----------------------------------------------------------------------

    /// URL that starts the web-app flow for a stored token request.
    ///
    /// `state` is returned verbatim on the callback; `csrf_token` must be
    /// passed again to
    /// [`parse_token_request_callback_url`](Self::parse_token_request_callback_url).
    pub fn generate_token_request_url(
        &self,
        request_id: &str,
        state: &str,
        csrf_token: &str,
    ) -> String {
        token_request_url(&self.web_app_host, request_id, state, csrf_token)
    }

    /// Parses and verifies a token request callback.
    ///
    /// Checks that the echoed state was created with `csrf_token` and that
    /// the Token member signed the token ID together with the state.
    ///
    /// # Errors
    ///
    /// - [`SdkError::Callback`] for malformed URLs or a CSRF mismatch
    /// - [`SdkError::InvalidCallbackSignature`] if the signature does not
    ///   verify against a key of the Token member
    pub async fn parse_token_request_callback_url(
        &self,
        callback_url: &str,
        csrf_token: &str,
    ) -> Result<TokenRequestCallback, SdkError> {
        let params = TokenRequestCallbackParameters::parse(callback_url)?;
        let state = params.state()?;
        state.verify_csrf(csrf_token)?;

        let token_member = self.get_token_member().await?;
        if params.signature.member_id != token_member.id {
            warn!(signer = %params.signature.member_id, "callback not signed by the Token member");
            return Err(SdkError::InvalidCallbackSignature);
        }
        let key = token_member
            .keys
            .iter()
            .find(|k| k.id == params.signature.key_id)
            .ok_or(SdkError::InvalidCallbackSignature)?;

        let public_key =
            ed25519::from_base64url(&key.public_key).map_err(|_| SdkError::InvalidCallbackSignature)?;
        let signature = ed25519::from_base64url(&params.signature.signature)
            .map_err(|_| SdkError::InvalidCallbackSignature)?;
        Ed25519Verifier::from_public_key(&public_key)
            .and_then(|v| v.verify(&params.state_payload().canonical_bytes(), &signature))
            .map_err(|_| SdkError::InvalidCallbackSignature)?;

        Ok(TokenRequestCallback {
            token_id: params.token_id,
            state: state.inner_state,
        })
    }

    /// Fetches a stored token request.
    pub async fn retrieve_token_request(&self, request_id: &str) -> Result<TokenRequest, SdkError> {
        let response: RetrieveTokenRequestResponse = call_unauthenticated(
            self.gateway.as_ref(),
            Method::RetrieveTokenRequest,
            RetrieveTokenRequestRequest {
                request_id: request_id.to_owned(),
            },
        )
        .await?;
        response
            .token_request
            .ok_or(SdkError::InvalidResponse("token_request"))
    }
}
