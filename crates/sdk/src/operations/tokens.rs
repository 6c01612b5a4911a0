//! Token creation, endorsement, cancellation and lookup.
//!
//! # Token signatures
//!
//! Endorsing or cancelling a token signs the prost-encoded payload followed
//! by the action:
//!
//! ```text
//! payload_bytes || "." || "endorsed" | "cancelled"
//! ```

use prost::Message;
use signer::KeyLevel;
use tracing::info;
use transport::proto::common::Signature;
use transport::proto::gateway::{
    CancelTokenRequest, CancelTokenResponse, CreateAccessTokenRequest, CreateAccessTokenResponse,
    CreateStandingOrderTokenRequest, CreateStandingOrderTokenResponse, CreateTransferTokenRequest,
    CreateTransferTokenResponse, EndorseTokenRequest, EndorseTokenResponse, GetTokenRequest,
    GetTokenResponse, GetTokensRequest, GetTokensResponse, ReplaceTokenRequest,
    ReplaceTokenResponse, SignTokenRequestStateRequest, SignTokenRequestStateResponse,
    StoreTokenRequestRequest, StoreTokenRequestResponse, TokenRequestStatePayload,
};
use transport::proto::token::{
    Token, TokenAction, TokenMember, TokenOperationResult, TokenPayload, TokenType,
    TransferTokenStatus,
};
use transport::proto::token_request::TokenRequest;
use transport::{Gateway, Method};

use crate::paging::{PagedList, page};
use crate::token::{
    AccessTokenBuilder, StandingOrderTokenBuilder, TokenRequestBuilder, TransferTokenBuilder,
};
use crate::{Member, SdkError};

/// Message signed to endorse or cancel a token.
pub fn token_action_message(payload: &TokenPayload, action: TokenAction) -> Vec<u8> {
    let mut message = payload.encode_to_vec();
    message.push(b'.');
    message.extend_from_slice(action.suffix().as_bytes());
    message
}

impl<G: Gateway> Member<G> {
    // -----------------------------------------------------------------------
    // Builders
    // -----------------------------------------------------------------------

    /// Transfer token builder paying from this member.
    pub fn transfer_token_builder(&self, amount: f64, currency: &str) -> TransferTokenBuilder {
        TransferTokenBuilder::new(amount, currency).from(self.member_id())
    }

    /// Access token builder granting `to` access to this member's data.
    pub fn access_token_builder(&self, to: TokenMember) -> AccessTokenBuilder {
        AccessTokenBuilder::to(to).from(self.member_id())
    }

    /// Standing order builder paying from this member.
    pub fn standing_order_token_builder(
        &self,
        amount: f64,
        currency: &str,
        frequency: &str,
        start_date: &str,
        end_date: &str,
    ) -> StandingOrderTokenBuilder {
        StandingOrderTokenBuilder::new(amount, currency, frequency, start_date, end_date)
            .from(self.member_id())
    }

    /// Transfer token builder prefilled from a stored token request.
    pub fn transfer_token_builder_from_request(
        &self,
        request: &TokenRequest,
    ) -> Result<TransferTokenBuilder, SdkError> {
        let builder = TransferTokenBuilder::from_token_request(request)?;
        Ok(builder.issued_by(self.member_id()))
    }

    /// Access token builder prefilled from a stored token request.
    pub fn access_token_builder_from_request(
        &self,
        request: &TokenRequest,
    ) -> Result<AccessTokenBuilder, SdkError> {
        let builder = AccessTokenBuilder::from_token_request(request)?;
        Ok(builder.issued_by(self.member_id()))
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    /// Creates an unendorsed transfer token.
    ///
    /// # Errors
    ///
    /// Builder validation errors, or [`SdkError::TransferTokenFailed`] if the
    /// bank rejects the transfer terms.
    pub async fn create_transfer_token(
        &self,
        builder: TransferTokenBuilder,
    ) -> Result<Token, SdkError> {
        let builder = builder.issued_by(self.member_id());
        let payload = builder.build_payload()?;

        let response: CreateTransferTokenResponse = self
            .client
            .call(
                Method::CreateTransferToken,
                CreateTransferTokenRequest {
                    payload: Some(payload),
                    token_request_id: builder.token_request().to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        let token = created(response.token, response.status)?;
        info!(token_id = %token.id, "transfer token created");
        Ok(token)
    }

    /// Creates an unendorsed access token.
    pub async fn create_access_token(&self, builder: AccessTokenBuilder) -> Result<Token, SdkError> {
        let builder = builder.issued_by(self.member_id());
        let payload = builder.build()?;

        let response: CreateAccessTokenResponse = self
            .client
            .call(
                Method::CreateAccessToken,
                CreateAccessTokenRequest {
                    payload: Some(payload),
                    token_request_id: builder.token_request().to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        let token = response.token.ok_or(SdkError::InvalidResponse("token"))?;
        info!(token_id = %token.id, "access token created");
        Ok(token)
    }

    /// Creates an unendorsed standing order token.
    pub async fn create_standing_order_token(
        &self,
        builder: StandingOrderTokenBuilder,
    ) -> Result<Token, SdkError> {
        let builder = builder.issued_by(self.member_id());
        let payload = builder.build_payload()?;

        let response: CreateStandingOrderTokenResponse = self
            .client
            .call(
                Method::CreateStandingOrderToken,
                CreateStandingOrderTokenRequest {
                    payload: Some(payload),
                    token_request_id: builder.token_request().to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        let token = created(response.token, response.status)?;
        info!(token_id = %token.id, "standing order token created");
        Ok(token)
    }

    // -----------------------------------------------------------------------
    // Token requests
    // -----------------------------------------------------------------------

    /// Stores a token request and returns its ID. The request is addressed
    /// to this member unless the builder names another.
    pub async fn store_token_request(&self, builder: TokenRequestBuilder) -> Result<String, SdkError> {
        let builder = if builder.has_to() {
            builder
        } else {
            builder.set_to(self.member_id())
        };
        let request = builder.build()?;

        let response: StoreTokenRequestResponse = self
            .client
            .call(
                Method::StoreTokenRequest,
                StoreTokenRequestRequest {
                    request_payload: request.request_payload,
                    request_options: request.request_options,
                },
                KeyLevel::Low,
            )
            .await?;
        let stored = response
            .token_request
            .ok_or(SdkError::InvalidResponse("token_request"))?;
        info!(request_id = %stored.id, "token request stored");
        Ok(stored.id)
    }

    /// Asks the gateway to sign `state` for the callback of a completed
    /// token request.
    pub async fn sign_token_request_state(
        &self,
        token_request_id: &str,
        token_id: &str,
        state: &str,
    ) -> Result<Signature, SdkError> {
        let response: SignTokenRequestStateResponse = self
            .client
            .call(
                Method::SignTokenRequestState,
                SignTokenRequestStateRequest {
                    payload: Some(TokenRequestStatePayload {
                        token_id: token_id.to_owned(),
                        state: state.to_owned(),
                    }),
                    token_request_id: token_request_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        response.signature.ok_or(SdkError::InvalidResponse("signature"))
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    pub async fn get_token(&self, token_id: &str) -> Result<Token, SdkError> {
        let response: GetTokenResponse = self
            .client
            .call(
                Method::GetToken,
                GetTokenRequest {
                    token_id: token_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        response.token.ok_or(SdkError::InvalidResponse("token"))
    }

    pub async fn get_transfer_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.get_tokens(TokenType::Transfer, offset, limit).await
    }

    pub async fn get_access_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.get_tokens(TokenType::Access, offset, limit).await
    }

    pub async fn get_standing_order_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.get_tokens(TokenType::StandingOrder, offset, limit)
            .await
    }

    async fn get_tokens(
        &self,
        kind: TokenType,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        let response: GetTokensResponse = self
            .client
            .call(
                Method::GetTokens,
                GetTokensRequest {
                    r#type: kind as i32,
                    page: Some(page(offset, limit)),
                },
                KeyLevel::Low,
            )
            .await?;
        Ok(PagedList::new(response.tokens, response.offset))
    }

    // -----------------------------------------------------------------------
    // Endorse, cancel, replace
    // -----------------------------------------------------------------------

    /// Endorses `token` with the key at `level`.
    ///
    /// The result status is `MORE_SIGNATURES_NEEDED` when the bank requires
    /// a higher key level; endorse again with that level.
    pub async fn endorse_token(
        &self,
        token: &Token,
        level: KeyLevel,
    ) -> Result<TokenOperationResult, SdkError> {
        let payload = token.payload.as_ref().ok_or(SdkError::InvalidResponse("payload"))?;
        let signature = self
            .client
            .sign(level, &token_action_message(payload, TokenAction::Endorsed))?;

        let response: EndorseTokenResponse = self
            .client
            .call(
                Method::EndorseToken,
                EndorseTokenRequest {
                    token_id: token.id.clone(),
                    signature: Some(signature),
                },
                level,
            )
            .await?;
        let result = response.result.ok_or(SdkError::InvalidResponse("result"))?;
        info!(token_id = %token.id, %level, status = result.status, "token endorsed");
        Ok(result)
    }

    /// Cancels `token`.
    pub async fn cancel_token(&self, token: &Token) -> Result<TokenOperationResult, SdkError> {
        let response: CancelTokenResponse = self
            .client
            .call(
                Method::CancelToken,
                self.cancel_request(token)?,
                KeyLevel::Low,
            )
            .await?;
        let result = response.result.ok_or(SdkError::InvalidResponse("result"))?;
        info!(token_id = %token.id, "token cancelled");
        Ok(result)
    }

    /// Cancels access token `token` and creates its replacement in one
    /// step. Build the replacement with [`AccessTokenBuilder::from_payload`].
    pub async fn replace_access_token(
        &self,
        token: &Token,
        builder: AccessTokenBuilder,
    ) -> Result<TokenOperationResult, SdkError> {
        let builder = builder.issued_by(self.member_id());
        let create_token = builder.build()?;

        let response: ReplaceTokenResponse = self
            .client
            .call(
                Method::ReplaceToken,
                ReplaceTokenRequest {
                    cancel_token: Some(self.cancel_request(token)?),
                    create_token: Some(create_token),
                },
                KeyLevel::Low,
            )
            .await?;
        let result = response.result.ok_or(SdkError::InvalidResponse("result"))?;
        info!(token_id = %token.id, "access token replaced");
        Ok(result)
    }

    fn cancel_request(&self, token: &Token) -> Result<CancelTokenRequest, SdkError> {
        let payload = token.payload.as_ref().ok_or(SdkError::InvalidResponse("payload"))?;
        let signature = self.client.sign(
            KeyLevel::Low,
            &token_action_message(payload, TokenAction::Cancelled),
        )?;
        Ok(CancelTokenRequest {
            token_id: token.id.clone(),
            signature: Some(signature),
        })
    }
}

fn created(token: Option<Token>, status: i32) -> Result<Token, SdkError> {
    let status = TransferTokenStatus::try_from(status)
        .unwrap_or(TransferTokenStatus::InvalidTransferStatus);
    if status != TransferTokenStatus::Success {
        return Err(SdkError::TransferTokenFailed(status));
    }
    token.ok_or(SdkError::InvalidResponse("token"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_message_appends_suffix() {
        let payload = TokenPayload {
            ref_id: "r".into(),
            ..Default::default()
        };
        let mut expected = payload.encode_to_vec();
        expected.extend_from_slice(b".endorsed");
        assert_eq!(token_action_message(&payload, TokenAction::Endorsed), expected);
        assert!(
            token_action_message(&payload, TokenAction::Cancelled).ends_with(b".cancelled")
        );
    }

    #[test]
    fn non_success_status_fails() {
        assert_eq!(
            created(None, TransferTokenStatus::FailureInsufficientFunds as i32),
            Err(SdkError::TransferTokenFailed(
                TransferTokenStatus::FailureInsufficientFunds
            ))
        );
        assert_eq!(
            created(None, 99),
            Err(SdkError::TransferTokenFailed(
                TransferTokenStatus::InvalidTransferStatus
            ))
        );
        let token = Token {
            id: "tt:1".into(),
            ..Default::default()
        };
        assert_eq!(
            created(Some(token.clone()), TransferTokenStatus::Success as i32),
            Ok(token)
        );
    }
}
