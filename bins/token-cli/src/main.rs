//! Token SDK walkthrough.
//!
//! Connects to a Token cluster, then either logs in as an existing member
//! (keys must be in the local key store, so in practice only within one
//! run) or creates a new one. Lists the member's linked accounts with their
//! balances and prints a token request redirect URL.
//!
//! # Configuration
//!
//! | Variable | Meaning |
//! |----------|---------|
//! | `TOKEN_CLUSTER` | cluster name, default `sandbox` |
//! | `TOKEN_DEV_KEY` | developer key sent with every call |
//! | `TOKEN_ALIAS` | email alias for a new member |
//! | `TOKEN_MEMBER_ID` | existing member to log in as |
//!
//! ```bash
//! export TOKEN_DEV_KEY="..."
//! RUST_LOG=info cargo run --release -p token-cli
//! ```

use std::env;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use config::ClusterConfig;
use sdk::token::TokenRequestBuilder;
use sdk::{Member, SdkError, TokenIo, alias};
use sdk_core::Cluster;
use signer::KeyLevel;

const CSRF_TOKEN: &str = "token-cli";
const REDIRECT_URL: &str = "https://localhost/token-cli/callback";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "token-cli failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), SdkError> {
    // -----------------------------------------------------------------------
    // SDK init
    // -----------------------------------------------------------------------

    let cluster = resolve_cluster("TOKEN_CLUSTER");
    let endpoint = ClusterConfig::for_cluster(cluster);
    tracing::info!(%cluster, gateway = %endpoint.gateway_url(), "token-cli starting");

    let mut builder = TokenIo::builder().cluster(cluster);
    if let Ok(dev_key) = env::var("TOKEN_DEV_KEY") {
        builder = builder.dev_key(dev_key);
    } else {
        tracing::warn!("TOKEN_DEV_KEY is not set, the gateway may reject calls");
    }
    let tokenio = builder.build()?;

    // -----------------------------------------------------------------------
    // Member
    // -----------------------------------------------------------------------

    let member = match env::var("TOKEN_MEMBER_ID") {
        Ok(member_id) => tokenio.get_member(&member_id).await?,
        Err(_) => {
            let alias = env::var("TOKEN_ALIAS").ok().map(|email| alias::email(&email));
            tokenio.create_member(alias).await?
        }
    };
    tracing::info!(member_id = %member.member_id(), "member ready");
    for key in member.keys().await? {
        tracing::info!(key_id = %key.id, level = ?key.level(), "member key");
    }

    // -----------------------------------------------------------------------
    // Accounts
    // -----------------------------------------------------------------------

    print_accounts(&member).await?;

    // -----------------------------------------------------------------------
    // Token request
    // -----------------------------------------------------------------------

    let request_id = member
        .store_token_request(
            TokenRequestBuilder::transfer(1.0, "EUR")
                .redirect_url(REDIRECT_URL)
                .description("token-cli demo"),
        )
        .await?;
    let url = tokenio.generate_token_request_url(&request_id, "demo", CSRF_TOKEN);
    tracing::info!(%request_id, %url, "open the URL to complete the token request");

    Ok(())
}

async fn print_accounts(member: &Member) -> Result<(), SdkError> {
    let accounts = member.get_accounts().await?;
    if accounts.is_empty() {
        tracing::info!("no linked accounts");
        return Ok(());
    }
    for account in &accounts {
        match account.get_balance(KeyLevel::Low).await {
            Ok(balance) => {
                let current = balance.current.unwrap_or_default();
                tracing::info!(
                    account_id = account.id(),
                    name = account.name(),
                    balance = %current.value,
                    currency = %current.currency,
                    "account"
                );
            }
            Err(SdkError::StepUpRequired) => {
                tracing::warn!(account_id = account.id(), "balance needs a higher key level");
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Reads a cluster name from an env var, falling back to the sandbox.
fn resolve_cluster(env_key: &str) -> Cluster {
    match env::var(env_key) {
        Ok(name) => Cluster::from_name(&name)
            .unwrap_or_else(|| panic!("{env_key}={name} is not a known cluster")),
        Err(_) => Cluster::Sandbox,
    }
}
