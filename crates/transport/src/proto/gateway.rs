//! Request and response messages of `GatewayService`.

use super::account::{Account, Balance, Transaction};
use super::common::{Alias, Page, RequestStatus, Signature};
use super::member::{Member, MemberOperationMetadata, MemberUpdate, Profile};
use super::token::{Token, TokenOperationResult, TokenPayload, TokenType, TransferTokenStatus};
use super::token_request::{TokenRequest, TokenRequestOptions, TokenRequestPayload};
use super::transfer::{Transfer, TransferPayload};

// ---------------------------------------------------------------------------
// Members
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateMemberRequest {
    #[prost(string, tag = "1")]
    pub nonce: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateMemberResponse {
    #[prost(string, tag = "1")]
    pub member_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateMemberRequest {
    #[prost(message, optional, tag = "1")]
    pub update: Option<MemberUpdate>,
    #[prost(message, optional, tag = "2")]
    pub update_signature: Option<Signature>,
    #[prost(message, repeated, tag = "3")]
    pub metadata: Vec<MemberOperationMetadata>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UpdateMemberResponse {
    #[prost(message, optional, tag = "1")]
    pub member: Option<Member>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMemberRequest {
    #[prost(string, tag = "1")]
    pub member_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetMemberResponse {
    #[prost(message, optional, tag = "1")]
    pub member: Option<Member>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResolveAliasRequest {
    #[prost(message, optional, tag = "1")]
    pub alias: Option<Alias>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ResolveAliasResponse {
    /// Unset when the alias is not registered.
    #[prost(message, optional, tag = "1")]
    pub member: Option<super::token::TokenMember>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAliasesRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAliasesResponse {
    #[prost(message, repeated, tag = "1")]
    pub aliases: Vec<Alias>,
    #[prost(message, repeated, tag = "2")]
    pub unverified_aliases: Vec<Alias>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VerifyAliasRequest {
    #[prost(string, tag = "1")]
    pub verification_id: String,
    #[prost(string, tag = "2")]
    pub code: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct VerifyAliasResponse {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProfileRequest {
    #[prost(string, tag = "1")]
    pub member_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetProfileResponse {
    #[prost(message, optional, tag = "1")]
    pub profile: Option<Profile>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetProfileRequest {
    #[prost(message, optional, tag = "1")]
    pub profile: Option<Profile>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetProfileResponse {
    #[prost(message, optional, tag = "1")]
    pub profile: Option<Profile>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteMemberRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct DeleteMemberResponse {}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAccountsRequest {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAccountsResponse {
    #[prost(message, repeated, tag = "1")]
    pub accounts: Vec<Account>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAccountRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetAccountResponse {
    #[prost(message, optional, tag = "1")]
    pub account: Option<Account>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetDefaultAccountRequest {
    #[prost(string, tag = "1")]
    pub member_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetDefaultAccountResponse {
    #[prost(message, optional, tag = "1")]
    pub account: Option<Account>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetDefaultAccountRequest {
    #[prost(string, tag = "1")]
    pub member_id: String,
    #[prost(string, tag = "2")]
    pub account_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SetDefaultAccountResponse {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UnlinkAccountsRequest {
    #[prost(string, repeated, tag = "1")]
    pub account_ids: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct UnlinkAccountsResponse {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetBalanceRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetBalanceResponse {
    #[prost(message, optional, tag = "1")]
    pub balance: Option<Balance>,
    #[prost(enumeration = "RequestStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetBalancesRequest {
    #[prost(string, repeated, tag = "1")]
    pub account_ids: Vec<String>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetBalancesResponse {
    #[prost(message, repeated, tag = "1")]
    pub responses: Vec<GetBalanceResponse>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransactionRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(string, tag = "2")]
    pub transaction_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransactionResponse {
    #[prost(message, optional, tag = "1")]
    pub transaction: Option<Transaction>,
    #[prost(enumeration = "RequestStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransactionsRequest {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(message, optional, tag = "2")]
    pub page: Option<Page>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransactionsResponse {
    #[prost(message, repeated, tag = "1")]
    pub transactions: Vec<Transaction>,
    #[prost(string, tag = "2")]
    pub offset: String,
    #[prost(enumeration = "RequestStatus", tag = "3")]
    pub status: i32,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateTransferTokenRequest {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<TokenPayload>,
    #[prost(string, tag = "2")]
    pub token_request_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateTransferTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub token: Option<Token>,
    #[prost(enumeration = "TransferTokenStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateAccessTokenRequest {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<TokenPayload>,
    #[prost(string, tag = "2")]
    pub token_request_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateAccessTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub token: Option<Token>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateStandingOrderTokenRequest {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<TokenPayload>,
    #[prost(string, tag = "2")]
    pub token_request_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateStandingOrderTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub token: Option<Token>,
    #[prost(enumeration = "TransferTokenStatus", tag = "2")]
    pub status: i32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTokenRequest {
    #[prost(string, tag = "1")]
    pub token_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub token: Option<Token>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTokensRequest {
    #[prost(enumeration = "TokenType", tag = "1")]
    pub r#type: i32,
    #[prost(message, optional, tag = "2")]
    pub page: Option<Page>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTokensResponse {
    #[prost(message, repeated, tag = "1")]
    pub tokens: Vec<Token>,
    #[prost(string, tag = "2")]
    pub offset: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EndorseTokenRequest {
    #[prost(string, tag = "1")]
    pub token_id: String,
    #[prost(message, optional, tag = "2")]
    pub signature: Option<Signature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct EndorseTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub result: Option<TokenOperationResult>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CancelTokenRequest {
    #[prost(string, tag = "1")]
    pub token_id: String,
    #[prost(message, optional, tag = "2")]
    pub signature: Option<Signature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CancelTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub result: Option<TokenOperationResult>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReplaceTokenRequest {
    #[prost(message, optional, tag = "1")]
    pub cancel_token: Option<CancelTokenRequest>,
    #[prost(message, optional, tag = "2")]
    pub create_token: Option<TokenPayload>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ReplaceTokenResponse {
    #[prost(message, optional, tag = "1")]
    pub result: Option<TokenOperationResult>,
}

// ---------------------------------------------------------------------------
// Token requests
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct StoreTokenRequestRequest {
    #[prost(message, optional, tag = "1")]
    pub request_payload: Option<TokenRequestPayload>,
    #[prost(message, optional, tag = "2")]
    pub request_options: Option<TokenRequestOptions>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct StoreTokenRequestResponse {
    #[prost(message, optional, tag = "1")]
    pub token_request: Option<TokenRequest>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RetrieveTokenRequestRequest {
    #[prost(string, tag = "1")]
    pub request_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RetrieveTokenRequestResponse {
    #[prost(message, optional, tag = "1")]
    pub token_request: Option<TokenRequest>,
}

/// The callback payload the Token member signs for a completed request.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenRequestStatePayload {
    #[prost(string, tag = "1")]
    pub token_id: String,
    #[prost(string, tag = "2")]
    pub state: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SignTokenRequestStateRequest {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<TokenRequestStatePayload>,
    #[prost(string, tag = "2")]
    pub token_request_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct SignTokenRequestStateResponse {
    #[prost(message, optional, tag = "1")]
    pub signature: Option<Signature>,
}

// ---------------------------------------------------------------------------
// Transfers
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateTransferRequest {
    #[prost(message, optional, tag = "1")]
    pub payload: Option<TransferPayload>,
    #[prost(message, optional, tag = "2")]
    pub payload_signature: Option<Signature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct CreateTransferResponse {
    #[prost(message, optional, tag = "1")]
    pub transfer: Option<Transfer>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransferRequest {
    #[prost(string, tag = "1")]
    pub transfer_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransferResponse {
    #[prost(message, optional, tag = "1")]
    pub transfer: Option<Transfer>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransfersRequest {
    /// Restricts the listing to one token when non-empty.
    #[prost(string, tag = "1")]
    pub token_id: String,
    #[prost(message, optional, tag = "2")]
    pub page: Option<Page>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct GetTransfersResponse {
    #[prost(message, repeated, tag = "1")]
    pub transfers: Vec<Transfer>,
    #[prost(string, tag = "2")]
    pub offset: String,
}
