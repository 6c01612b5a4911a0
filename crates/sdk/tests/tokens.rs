//! Accounts, tokens and transfers against a scripted gateway.

mod common;

use std::sync::Arc;

use prost::Message;
use sdk::auth::KEY_ID_HEADER;
use sdk::operations::tokens::token_action_message;
use sdk::token::{AccessTokenBuilder, TokenRequestBuilder, iban_account, member_by_id, token_account};
use sdk::{RedeemOptions, SdkError, alias};
use signer::{InMemoryKeyStore, KeyLevel, KeyStore, now_ms};
use transport::Method;
use transport::proto::account::{Account, Balance, Transaction};
use transport::proto::common::{Money, RequestStatus, Signature};
use transport::proto::gateway::{
    CancelTokenRequest, CancelTokenResponse, CreateAccessTokenRequest, CreateAccessTokenResponse,
    CreateStandingOrderTokenRequest, CreateStandingOrderTokenResponse, CreateTransferRequest,
    CreateTransferResponse, CreateTransferTokenRequest, CreateTransferTokenResponse,
    EndorseTokenRequest, EndorseTokenResponse, GetAccountsResponse, GetBalanceResponse,
    GetBalancesResponse, GetTokensRequest, GetTokensResponse, GetTransactionsRequest,
    GetTransactionsResponse, GetTransfersRequest, GetTransfersResponse, ReplaceTokenRequest,
    ReplaceTokenResponse, SignTokenRequestStateRequest, SignTokenRequestStateResponse,
    StoreTokenRequestRequest, StoreTokenRequestResponse,
};
use transport::proto::token::{
    Token, TokenAction, TokenOperationResult, TokenOperationStatus, TokenType,
    TransferTokenStatus, token_payload,
};
use transport::proto::token_request::TokenRequest;
use transport::proto::token_request::token_request_payload::ResourceType;
use transport::proto::transfer::{Transfer, TransferPayload};

use common::*;

fn balance_response(status: RequestStatus) -> GetBalanceResponse {
    GetBalanceResponse {
        balance: Some(Balance {
            account_id: "a:1".into(),
            current: Some(Money {
                currency: "EUR".into(),
                value: "100".into(),
            }),
            available: None,
            updated_at_ms: 1,
        }),
        status: status as i32,
    }
}

#[tokio::test]
async fn accounts_and_balances() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:alice").await;
    tokenio
        .gateway()
        .respond(
            Method::GetAccounts,
            GetAccountsResponse {
                accounts: vec![Account {
                    id: "a:1".into(),
                    name: "Checking".into(),
                    bank_id: "iron".into(),
                    is_locked: false,
                }],
            },
        )
        .respond(
            Method::GetBalance,
            balance_response(RequestStatus::SuccessfulRequest),
        );

    let accounts = member.get_accounts().await.unwrap();
    assert_eq!(accounts.len(), 1);
    let account = &accounts[0];
    assert_eq!((account.id(), account.name(), account.bank_id()), ("a:1", "Checking", "iron"));
    assert_eq!(account.member().member_id(), "m:alice");

    let balance = account.get_balance(KeyLevel::Low).await.unwrap();
    assert_eq!(balance.current.unwrap().value, "100");
}

#[tokio::test]
async fn step_up_is_reported() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:alice").await;
    tokenio
        .gateway()
        .respond(
            Method::GetBalance,
            balance_response(RequestStatus::MoreSignaturesNeeded),
        )
        .respond(
            Method::GetBalances,
            GetBalancesResponse {
                responses: vec![
                    balance_response(RequestStatus::SuccessfulRequest),
                    balance_response(RequestStatus::MoreSignaturesNeeded),
                ],
            },
        );

    assert_eq!(
        member.get_balance("a:1", KeyLevel::Low).await,
        Err(SdkError::StepUpRequired)
    );
    assert_eq!(
        member
            .get_balances(&["a:1".into(), "a:2".into()], KeyLevel::Low)
            .await,
        Err(SdkError::StepUpRequired)
    );
}

#[tokio::test]
async fn create_and_endorse_transfer_token() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:payer").await;

    let builder = member
        .transfer_token_builder(25.0, "EUR")
        .account_id("a:1")
        .add_destination(iban_account("DE89370400440532013000", ""))
        .redeemer_member_id("m:shop")
        .ref_id("order-77");

    // Echo the submitted payload back as the created token.
    let payload = builder.clone().build_payload().unwrap();
    let token = Token {
        id: "tt:1".into(),
        payload: Some(payload.clone()),
        ..Default::default()
    };
    tokenio
        .gateway()
        .respond(
            Method::CreateTransferToken,
            CreateTransferTokenResponse {
                token: Some(token.clone()),
                status: TransferTokenStatus::Success as i32,
            },
        )
        .respond(
            Method::EndorseToken,
            EndorseTokenResponse {
                result: Some(TokenOperationResult {
                    token: Some(token.clone()),
                    status: TokenOperationStatus::Success as i32,
                }),
            },
        );

    let created = member.create_transfer_token(builder).await.unwrap();
    assert_eq!(created.id, "tt:1");
    let request: CreateTransferTokenRequest = tokenio.gateway().calls_to(Method::CreateTransferToken)
        [0]
        .decode()
        .unwrap();
    let sent = request.payload.unwrap();
    assert_eq!(sent.from.unwrap().id, "m:payer");
    assert_eq!(sent.ref_id, "order-77");

    let result = member
        .endorse_token(&created, KeyLevel::Standard)
        .await
        .unwrap();
    assert_eq!(result.status(), TokenOperationStatus::Success);

    let calls = tokenio.gateway().calls_to(Method::EndorseToken);
    let call = &calls[0];
    let standard = store
        .get_by_level("m:payer", KeyLevel::Standard, now_ms())
        .unwrap();
    assert_eq!(call.header(KEY_ID_HEADER), Some(standard.info.id.as_str()));
    let request: EndorseTokenRequest = call.decode().unwrap();
    let signature = request.signature.unwrap();
    assert_eq!(signature.key_id, standard.info.id);
    assert_signed_by(
        store.as_ref(),
        "m:payer",
        &signature.key_id,
        &token_action_message(&payload, TokenAction::Endorsed),
        &signature.signature,
    );
}

#[tokio::test]
async fn rejected_transfer_token() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:payer").await;
    tokenio.gateway().respond(
        Method::CreateTransferToken,
        CreateTransferTokenResponse {
            token: None,
            status: TransferTokenStatus::FailureInsufficientFunds as i32,
        },
    );

    let builder = member
        .transfer_token_builder(1_000_000.0, "EUR")
        .account_id("a:1")
        .redeemer_member_id("m:shop");
    assert_eq!(
        member.create_transfer_token(builder).await,
        Err(SdkError::TransferTokenFailed(
            TransferTokenStatus::FailureInsufficientFunds
        ))
    );
}

#[tokio::test]
async fn invalid_builder_makes_no_call() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:payer").await;
    let builder = member
        .transfer_token_builder(10.0, "EUR")
        .redeemer_member_id("m:shop");

    assert_eq!(
        member.create_transfer_token(builder).await,
        Err(SdkError::MissingSource)
    );
    assert!(tokenio.gateway().calls_to(Method::CreateTransferToken).is_empty());
}

#[tokio::test]
async fn cancel_signs_with_low_key() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:grantor").await;

    let payload = member
        .access_token_builder(member_by_id("m:tpp"))
        .for_all_accounts()
        .build()
        .unwrap();
    let token = Token {
        id: "ta:1".into(),
        payload: Some(payload.clone()),
        ..Default::default()
    };
    tokenio.gateway().respond(
        Method::CancelToken,
        CancelTokenResponse {
            result: Some(TokenOperationResult {
                token: Some(token.clone()),
                status: TokenOperationStatus::Success as i32,
            }),
        },
    );

    member.cancel_token(&token).await.unwrap();
    let request: CancelTokenRequest = tokenio.gateway().calls_to(Method::CancelToken)[0]
        .decode()
        .unwrap();
    let signature = request.signature.unwrap();
    let low = store
        .get_by_level("m:grantor", KeyLevel::Low, now_ms())
        .unwrap();
    assert_eq!(signature.key_id, low.info.id);
    assert_signed_by(
        store.as_ref(),
        "m:grantor",
        &signature.key_id,
        &token_action_message(&payload, TokenAction::Cancelled),
        &signature.signature,
    );
}

#[tokio::test]
async fn token_listing_pages() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:alice").await;
    tokenio
        .gateway()
        .respond(
            Method::GetTokens,
            GetTokensResponse {
                tokens: vec![Token {
                    id: "tt:1".into(),
                    ..Default::default()
                }],
                offset: "cursor-1".into(),
            },
        )
        .respond(
            Method::GetTokens,
            GetTokensResponse {
                tokens: Vec::new(),
                offset: "cursor-1".into(),
            },
        );

    let first = member.get_transfer_tokens(None, 1).await.unwrap();
    assert_eq!(first.items().len(), 1);
    let second = member
        .get_transfer_tokens(Some(first.offset()), 1)
        .await
        .unwrap();
    assert!(second.is_empty());

    let calls = tokenio.gateway().calls_to(Method::GetTokens);
    let requests: Vec<GetTokensRequest> = calls.iter().map(|c| c.decode().unwrap()).collect();
    assert_eq!(requests[0].r#type(), TokenType::Transfer);
    assert_eq!(requests[0].page.as_ref().unwrap().offset, "");
    assert_eq!(requests[1].page.as_ref().unwrap().offset, "cursor-1");
    assert_eq!(requests[1].page.as_ref().unwrap().limit, 1);
}

#[tokio::test]
async fn store_token_request_defaults_to_self() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:tpp").await;
    tokenio.gateway().respond(
        Method::StoreTokenRequest,
        StoreTokenRequestResponse {
            token_request: Some(TokenRequest {
                id: "rq:1".into(),
                ..Default::default()
            }),
        },
    );

    let id = member
        .store_token_request(
            TokenRequestBuilder::transfer(10.0, "EUR").redirect_url("https://tpp.example/cb"),
        )
        .await
        .unwrap();
    assert_eq!(id, "rq:1");

    let request: StoreTokenRequestRequest = tokenio.gateway().calls_to(Method::StoreTokenRequest)
        [0]
        .decode()
        .unwrap();
    assert_eq!(request.request_payload.unwrap().to.unwrap().id, "m:tpp");
}

#[tokio::test]
async fn redeem_signs_transfer_payload() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let payer = new_member(&tokenio, "m:payer").await;
    let payload = payer
        .transfer_token_builder(50.0, "GBP")
        .account_id("a:1")
        .redeemer_member_id("m:shop")
        .build_payload()
        .unwrap();
    let token = Token {
        id: "tt:9".into(),
        payload: Some(payload),
        ..Default::default()
    };

    let shop = new_member(&tokenio, "m:shop").await;
    tokenio.gateway().respond(
        Method::CreateTransfer,
        CreateTransferResponse {
            transfer: Some(Transfer {
                id: "t:1".into(),
                ..Default::default()
            }),
        },
    );

    let transfer = shop
        .redeem_token(
            &token,
            RedeemOptions {
                amount: Some(20.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(transfer.id, "t:1");

    let request: CreateTransferRequest = tokenio.gateway().calls_to(Method::CreateTransfer)[0]
        .decode()
        .unwrap();
    let sent: TransferPayload = request.payload.unwrap();
    assert_eq!(sent.token_id, "tt:9");
    assert_eq!(sent.amount.as_ref().unwrap().currency, "GBP");
    let signature = request.payload_signature.unwrap();
    assert_eq!(signature.member_id, "m:shop");
    assert_signed_by(
        store.as_ref(),
        "m:shop",
        &signature.key_id,
        &sent.encode_to_vec(),
        &signature.signature,
    );
}

#[tokio::test]
async fn transfer_request_from_alias_names_payer() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:payer").await;
    let request = TokenRequestBuilder::transfer(10.0, "EUR")
        .to_member_id("m:tpp")
        .from_alias(alias::email("payer@example.com"))
        .source_account_id("a:9")
        .redirect_url("https://tpp.example/cb")
        .build()
        .unwrap();

    let payload = member
        .transfer_token_builder_from_request(&request)
        .unwrap()
        .build_payload()
        .unwrap();
    let from = payload.from.as_ref().unwrap();
    assert_eq!(from.id, "m:payer");
    assert_eq!(from.alias.as_ref().unwrap().value, "payer@example.com");
    let Some(token_payload::Body::Transfer(body)) = payload.body else {
        panic!("not a transfer body");
    };
    assert_eq!(
        body.instructions.unwrap().source,
        Some(token_account("m:payer", "a:9"))
    );
}

#[tokio::test]
async fn access_request_is_issued_by_member() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:grantor").await;
    let request = TokenRequestBuilder::access(&[ResourceType::Balances])
        .to_member_id("m:tpp")
        .redirect_url("https://tpp.example/cb")
        .build()
        .unwrap();

    let payload = member
        .access_token_builder_from_request(&request)
        .unwrap()
        .build()
        .unwrap();
    assert_eq!(payload.from.unwrap().id, "m:grantor");
    assert_eq!(payload.to.unwrap().id, "m:tpp");
}

#[tokio::test]
async fn create_access_token_sends_payload() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:grantor").await;
    tokenio.gateway().respond(
        Method::CreateAccessToken,
        CreateAccessTokenResponse {
            token: Some(Token {
                id: "ta:1".into(),
                ..Default::default()
            }),
        },
    );

    let builder = AccessTokenBuilder::to_member_id("m:tpp")
        .for_all_accounts()
        .token_request_id("rq:4");
    let token = member.create_access_token(builder).await.unwrap();
    assert_eq!(token.id, "ta:1");

    let request: CreateAccessTokenRequest = tokenio.gateway().calls_to(Method::CreateAccessToken)
        [0]
        .decode()
        .unwrap();
    assert_eq!(request.token_request_id, "rq:4");
    let sent = request.payload.unwrap();
    assert_eq!(sent.from.unwrap().id, "m:grantor");
    assert_eq!(sent.to.unwrap().id, "m:tpp");
}

#[tokio::test]
async fn standing_order_token_created_or_rejected() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:payer").await;
    tokenio
        .gateway()
        .respond(
            Method::CreateStandingOrderToken,
            CreateStandingOrderTokenResponse {
                token: Some(Token {
                    id: "ts:1".into(),
                    ..Default::default()
                }),
                status: TransferTokenStatus::Success as i32,
            },
        )
        .respond(
            Method::CreateStandingOrderToken,
            CreateStandingOrderTokenResponse {
                token: None,
                status: TransferTokenStatus::FailureSourceAccountNotFound as i32,
            },
        );

    let builder = || {
        member
            .standing_order_token_builder(25.0, "EUR", "MNTH", "2026-01-01", "2026-12-31")
            .account_id("a:1")
            .redeemer_member_id("m:gym")
    };
    let token = member.create_standing_order_token(builder()).await.unwrap();
    assert_eq!(token.id, "ts:1");

    let request: CreateStandingOrderTokenRequest = tokenio
        .gateway()
        .calls_to(Method::CreateStandingOrderToken)[0]
        .decode()
        .unwrap();
    let sent = request.payload.unwrap();
    assert_eq!(sent.from.unwrap().id, "m:payer");
    assert!(matches!(sent.body, Some(token_payload::Body::StandingOrder(_))));

    assert_eq!(
        member.create_standing_order_token(builder()).await,
        Err(SdkError::TransferTokenFailed(
            TransferTokenStatus::FailureSourceAccountNotFound
        ))
    );
}

#[tokio::test]
async fn replace_cancels_with_low_key() {
    let store: Arc<dyn KeyStore> = Arc::new(InMemoryKeyStore::new());
    let tokenio = tokenio_with_store(Arc::clone(&store));
    let member = new_member(&tokenio, "m:grantor").await;

    let payload = member
        .access_token_builder(member_by_id("m:tpp"))
        .for_all_accounts()
        .build()
        .unwrap();
    let token = Token {
        id: "ta:1".into(),
        payload: Some(payload.clone()),
        ..Default::default()
    };
    tokenio.gateway().respond(
        Method::ReplaceToken,
        ReplaceTokenResponse {
            result: Some(TokenOperationResult {
                token: Some(Token {
                    id: "ta:2".into(),
                    ..Default::default()
                }),
                status: TokenOperationStatus::Success as i32,
            }),
        },
    );

    let replacement = AccessTokenBuilder::from_payload(&payload)
        .unwrap()
        .for_all_balances();
    let result = member
        .replace_access_token(&token, replacement)
        .await
        .unwrap();
    assert_eq!(result.token.unwrap().id, "ta:2");

    let request: ReplaceTokenRequest = tokenio.gateway().calls_to(Method::ReplaceToken)[0]
        .decode()
        .unwrap();
    let created = request.create_token.unwrap();
    assert_eq!(created.from.unwrap().id, "m:grantor");
    assert_ne!(created.ref_id, payload.ref_id);

    let cancel = request.cancel_token.unwrap();
    assert_eq!(cancel.token_id, "ta:1");
    let signature = cancel.signature.unwrap();
    let low = store
        .get_by_level("m:grantor", KeyLevel::Low, now_ms())
        .unwrap();
    assert_eq!(signature.key_id, low.info.id);
    assert_signed_by(
        store.as_ref(),
        "m:grantor",
        &signature.key_id,
        &token_action_message(&payload, TokenAction::Cancelled),
        &signature.signature,
    );
}

#[tokio::test]
async fn token_request_state_is_signed_by_gateway() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:tpp").await;
    tokenio.gateway().respond(
        Method::SignTokenRequestState,
        SignTokenRequestStateResponse {
            signature: Some(Signature {
                member_id: "m:token".into(),
                key_id: "k:1".into(),
                signature: "c2ln".into(),
            }),
        },
    );

    let signature = member
        .sign_token_request_state("rq:1", "tt:1", "state-1")
        .await
        .unwrap();
    assert_eq!(signature.key_id, "k:1");

    let request: SignTokenRequestStateRequest = tokenio
        .gateway()
        .calls_to(Method::SignTokenRequestState)[0]
        .decode()
        .unwrap();
    assert_eq!(request.token_request_id, "rq:1");
    let payload = request.payload.unwrap();
    assert_eq!((payload.token_id.as_str(), payload.state.as_str()), ("tt:1", "state-1"));
}

#[tokio::test]
async fn transfer_listing_pages() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:shop").await;
    tokenio
        .gateway()
        .respond(
            Method::GetTransfers,
            GetTransfersResponse {
                transfers: vec![Transfer {
                    id: "t:1".into(),
                    ..Default::default()
                }],
                offset: "cursor-t".into(),
            },
        )
        .respond(
            Method::GetTransfers,
            GetTransfersResponse {
                transfers: Vec::new(),
                offset: "cursor-t".into(),
            },
        );

    let first = member.get_transfers(Some("tt:9"), None, 1).await.unwrap();
    assert_eq!(first.items()[0].id, "t:1");
    assert_eq!(first.offset(), "cursor-t");
    let second = member
        .get_transfers(None, Some(first.offset()), 1)
        .await
        .unwrap();
    assert!(second.is_empty());

    let calls = tokenio.gateway().calls_to(Method::GetTransfers);
    let requests: Vec<GetTransfersRequest> = calls.iter().map(|c| c.decode().unwrap()).collect();
    assert_eq!(requests[0].token_id, "tt:9");
    assert_eq!(requests[0].page.as_ref().unwrap().offset, "");
    assert_eq!(requests[1].token_id, "");
    assert_eq!(requests[1].page.as_ref().unwrap().offset, "cursor-t");
}

#[tokio::test]
async fn transaction_listing_pages_and_steps_up() {
    let tokenio = tokenio();
    let member = new_member(&tokenio, "m:alice").await;
    tokenio
        .gateway()
        .respond(
            Method::GetTransactions,
            GetTransactionsResponse {
                transactions: vec![Transaction {
                    id: "tx:1".into(),
                    ..Default::default()
                }],
                offset: "cursor-x".into(),
                status: RequestStatus::SuccessfulRequest as i32,
            },
        )
        .respond(
            Method::GetTransactions,
            GetTransactionsResponse {
                transactions: Vec::new(),
                offset: String::new(),
                status: RequestStatus::MoreSignaturesNeeded as i32,
            },
        );

    let first = member
        .get_transactions("a:1", None, 10, KeyLevel::Low)
        .await
        .unwrap();
    assert_eq!(first.items()[0].id, "tx:1");
    assert_eq!(
        member
            .get_transactions("a:1", Some(first.offset()), 10, KeyLevel::Low)
            .await,
        Err(SdkError::StepUpRequired)
    );

    let calls = tokenio.gateway().calls_to(Method::GetTransactions);
    let request: GetTransactionsRequest = calls[1].decode().unwrap();
    assert_eq!(request.account_id, "a:1");
    let page = request.page.unwrap();
    assert_eq!((page.offset.as_str(), page.limit), ("cursor-x", 10));
}
