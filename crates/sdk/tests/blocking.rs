//! The blocking facade drives the same calls on its own runtime.

mod common;

use std::sync::Arc;

use sdk::SdkError;
use sdk::blocking::TokenIo;
use signer::{InMemoryKeyStore, KeyLevel};
use transport::Method;
use transport::mock::MockGateway;
use transport::proto::account::Account;
use transport::proto::common::RequestStatus;
use transport::proto::gateway::{GetAccountsResponse, GetBalanceResponse};

use common::{WEB_APP_HOST, queue_create_member};

fn blocking_tokenio() -> TokenIo<MockGateway> {
    TokenIo::with_gateway(
        MockGateway::new(),
        WEB_APP_HOST,
        Arc::new(InMemoryKeyStore::new()),
    )
    .unwrap()
}

#[test]
fn create_member_and_list_accounts() {
    let tokenio = blocking_tokenio();
    let gateway = tokenio.as_async().gateway();
    queue_create_member(gateway, "m:sync");
    gateway.respond(
        Method::GetAccounts,
        GetAccountsResponse {
            accounts: vec![Account {
                id: "a:1".into(),
                name: "Savings".into(),
                bank_id: "iron".into(),
                is_locked: true,
            }],
        },
    );

    let member = tokenio.create_member(None).unwrap();
    assert_eq!(member.member_id(), "m:sync");

    let accounts = member.get_accounts().unwrap();
    assert_eq!(accounts.len(), 1);
    assert!(accounts[0].is_locked());
    assert_eq!(accounts[0].member().member_id(), "m:sync");
}

#[test]
fn errors_pass_through() {
    let tokenio = blocking_tokenio();
    let gateway = tokenio.as_async().gateway();
    queue_create_member(gateway, "m:sync");
    gateway.respond(
        Method::GetBalance,
        GetBalanceResponse {
            balance: None,
            status: RequestStatus::MoreSignaturesNeeded as i32,
        },
    );

    let member = tokenio.create_member(None).unwrap();
    assert_eq!(
        member.get_balance("a:1", KeyLevel::Standard),
        Err(SdkError::StepUpRequired)
    );
    assert!(matches!(
        tokenio.get_member("m:unknown"),
        Err(SdkError::NoLocalKeys(_))
    ));
}

#[test]
fn clones_share_the_runtime() {
    let tokenio = blocking_tokenio();
    let copy = tokenio.clone();
    let url = copy.generate_token_request_url("rq:7", "s", "csrf");
    assert!(url.starts_with(&format!("https://{WEB_APP_HOST}/request-token/rq:7?")));
}
