//! Live tests against the Token sandbox.
//!
//! These need network access and a developer key:
//!
//! ```bash
//! export TOKEN_DEV_KEY="..."
//! cargo test -p sdk --test sandbox -- --ignored --nocapture
//! ```

use std::env;

use rand_core::{OsRng, RngCore};
use sdk::{SdkError, TokenIo, alias};
use sdk_core::Cluster;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn sandbox() -> TokenIo {
    let dev_key = env::var("TOKEN_DEV_KEY").unwrap_or_else(|_| panic!("TOKEN_DEV_KEY is not set"));
    TokenIo::builder()
        .cluster(Cluster::Sandbox)
        .dev_key(dev_key)
        .build()
        .expect("sandbox client")
}

/// A fresh email alias, unique per run.
fn random_email() -> String {
    format!("sdk-test-{:016x}@token.io", OsRng.next_u64())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
#[ignore = "requires network and TOKEN_DEV_KEY"]
async fn create_member_and_resolve_alias() {
    let tokenio = sandbox();
    let email = alias::email(&random_email());

    let member = tokenio.create_member(Some(email.clone())).await.unwrap();
    assert_eq!(
        tokenio.get_member_id(email.clone()).await.unwrap().as_deref(),
        Some(member.member_id())
    );
    assert!(tokenio.alias_exists(email).await.unwrap());

    let keys = member.keys().await.unwrap();
    assert_eq!(keys.len(), 3);
}

#[tokio::test]
#[ignore = "requires network and TOKEN_DEV_KEY"]
async fn login_with_stored_keys() {
    let tokenio = sandbox();
    let member = tokenio.create_member(None).await.unwrap();

    let again = tokenio.get_member(member.member_id()).await.unwrap();
    assert_eq!(again.member_id(), member.member_id());
    assert!(matches!(
        tokenio.get_member("m:nobody").await,
        Err(SdkError::NoLocalKeys(_))
    ));
}

#[tokio::test]
#[ignore = "requires network and TOKEN_DEV_KEY"]
async fn token_member_is_resolvable() {
    let tokenio = sandbox();
    let token_member = tokenio.get_token_member().await.unwrap();
    assert!(!token_member.keys.is_empty());
}
