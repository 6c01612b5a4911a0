//! Blocking facade over the async SDK.
//!
//! Each blocking type owns a handle to a shared multi-threaded tokio
//! runtime and delegates to its async counterpart with `block_on`. Do not
//! call these from inside an async context.
//!
//! ```no_run
//! use sdk::blocking::TokenIo;
//!
//! # fn example() -> Result<(), sdk::SdkError> {
//! let tokenio = TokenIo::new(sdk::TokenIo::builder().config())?;
//! let member = tokenio.create_member(None)?;
//! for account in member.get_accounts()? {
//!     println!("{} {}", account.id(), account.name());
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use sdk_core::TokenRequestCallback;
use signer::{KeyInfo, KeyLevel, KeyStore};
use tokio::runtime::{Builder, Runtime};
use transport::proto::account::{self as proto_account, Balance, Transaction};
use transport::proto::common::{Alias, Key, Signature};
use transport::proto::member::{self as proto_member, Profile};
use transport::proto::token::{Token, TokenMember, TokenOperationResult};
use transport::proto::token_request::TokenRequest;
use transport::proto::transfer::Transfer;
use transport::{Gateway, GrpcTransport};

use crate::token::{
    AccessTokenBuilder, StandingOrderTokenBuilder, TokenRequestBuilder, TransferTokenBuilder,
};
use crate::{DeviceInfo, PagedList, RedeemOptions, SdkError, TokenIoConfig};

fn new_runtime() -> Result<Arc<Runtime>, SdkError> {
    Builder::new_multi_thread()
        .enable_all()
        .build()
        .map(Arc::new)
        .map_err(|e| SdkError::Runtime(e.to_string()))
}

// ---------------------------------------------------------------------------
// TokenIo
// ---------------------------------------------------------------------------

/// Blocking [`crate::TokenIo`].
pub struct TokenIo<G = GrpcTransport> {
    inner: crate::TokenIo<G>,
    runtime: Arc<Runtime>,
}

impl<G> Clone for TokenIo<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl TokenIo {
    /// Creates a runtime and connects lazily to the configured gateway.
    pub fn new(config: TokenIoConfig) -> Result<Self, SdkError> {
        let runtime = new_runtime()?;
        let inner = {
            let _guard = runtime.enter();
            crate::TokenIo::new(config)?
        };
        Ok(Self { inner, runtime })
    }
}

impl<G: Gateway> TokenIo<G> {
    /// Creates a blocking SDK over an arbitrary gateway.
    pub fn with_gateway(
        gateway: G,
        web_app_host: impl Into<String>,
        key_store: Arc<dyn KeyStore>,
    ) -> Result<Self, SdkError> {
        Ok(Self {
            inner: crate::TokenIo::with_gateway(gateway, web_app_host, key_store),
            runtime: new_runtime()?,
        })
    }

    /// The async SDK this facade drives.
    pub fn as_async(&self) -> &crate::TokenIo<G> {
        &self.inner
    }

    fn member(&self, inner: crate::Member<G>) -> Member<G> {
        Member {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }

    pub fn create_member(&self, alias: Option<Alias>) -> Result<Member<G>, SdkError> {
        let inner = self.runtime.block_on(self.inner.create_member(alias))?;
        Ok(self.member(inner))
    }

    pub fn provision_device(&self, alias: Alias) -> Result<DeviceInfo, SdkError> {
        self.runtime.block_on(self.inner.provision_device(alias))
    }

    pub fn get_member(&self, member_id: &str) -> Result<Member<G>, SdkError> {
        let inner = self.runtime.block_on(self.inner.get_member(member_id))?;
        Ok(self.member(inner))
    }

    pub fn alias_exists(&self, alias: Alias) -> Result<bool, SdkError> {
        self.runtime.block_on(self.inner.alias_exists(alias))
    }

    pub fn get_member_id(&self, alias: Alias) -> Result<Option<String>, SdkError> {
        self.runtime.block_on(self.inner.get_member_id(alias))
    }

    pub fn get_token_member(&self) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.get_token_member())
    }

    pub fn generate_token_request_url(
        &self,
        request_id: &str,
        state: &str,
        csrf_token: &str,
    ) -> String {
        self.inner
            .generate_token_request_url(request_id, state, csrf_token)
    }

    pub fn parse_token_request_callback_url(
        &self,
        callback_url: &str,
        csrf_token: &str,
    ) -> Result<TokenRequestCallback, SdkError> {
        self.runtime.block_on(
            self.inner
                .parse_token_request_callback_url(callback_url, csrf_token),
        )
    }

    pub fn retrieve_token_request(&self, request_id: &str) -> Result<TokenRequest, SdkError> {
        self.runtime
            .block_on(self.inner.retrieve_token_request(request_id))
    }
}

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// Blocking [`crate::Member`].
pub struct Member<G = GrpcTransport> {
    inner: crate::Member<G>,
    runtime: Arc<Runtime>,
}

impl<G> Clone for Member<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<G: Gateway> Member<G> {
    pub fn as_async(&self) -> &crate::Member<G> {
        &self.inner
    }

    fn account(&self, inner: crate::Account<G>) -> Account<G> {
        Account {
            inner,
            runtime: Arc::clone(&self.runtime),
        }
    }

    pub fn member_id(&self) -> &str {
        self.inner.member_id()
    }

    pub fn for_access_token(&self, token_id: &str, customer_initiated: bool) -> Self {
        Self {
            inner: self.inner.for_access_token(token_id, customer_initiated),
            runtime: Arc::clone(&self.runtime),
        }
    }

    // -- Identity -----------------------------------------------------------

    pub fn aliases(&self) -> Result<Vec<Alias>, SdkError> {
        self.runtime.block_on(self.inner.aliases())
    }

    pub fn first_alias(&self) -> Result<Option<Alias>, SdkError> {
        self.runtime.block_on(self.inner.first_alias())
    }

    pub fn keys(&self) -> Result<Vec<Key>, SdkError> {
        self.runtime.block_on(self.inner.keys())
    }

    pub fn get_profile(&self, member_id: &str) -> Result<Profile, SdkError> {
        self.runtime.block_on(self.inner.get_profile(member_id))
    }

    pub fn set_profile(&self, profile: Profile) -> Result<Profile, SdkError> {
        self.runtime.block_on(self.inner.set_profile(profile))
    }

    pub fn delete_member(&self) -> Result<(), SdkError> {
        self.runtime.block_on(self.inner.delete_member())
    }

    // -- Aliases and keys ---------------------------------------------------

    pub fn add_alias(&self, alias: Alias) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.add_alias(alias))
    }

    pub fn add_aliases(&self, aliases: Vec<Alias>) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.add_aliases(aliases))
    }

    pub fn remove_alias(&self, alias: Alias) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.remove_alias(alias))
    }

    pub fn remove_aliases(&self, aliases: Vec<Alias>) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.remove_aliases(aliases))
    }

    pub fn verify_alias(&self, verification_id: &str, code: &str) -> Result<(), SdkError> {
        self.runtime
            .block_on(self.inner.verify_alias(verification_id, code))
    }

    pub fn approve_key(&self, key: &KeyInfo) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.approve_key(key))
    }

    pub fn approve_keys(&self, keys: &[KeyInfo]) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.approve_keys(keys))
    }

    pub fn remove_key(&self, key_id: &str) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.remove_key(key_id))
    }

    pub fn remove_keys(&self, key_ids: &[String]) -> Result<proto_member::Member, SdkError> {
        self.runtime.block_on(self.inner.remove_keys(key_ids))
    }

    // -- Accounts -----------------------------------------------------------

    pub fn get_accounts(&self) -> Result<Vec<Account<G>>, SdkError> {
        let accounts = self.runtime.block_on(self.inner.get_accounts())?;
        Ok(accounts.into_iter().map(|a| self.account(a)).collect())
    }

    pub fn get_account(&self, account_id: &str) -> Result<Account<G>, SdkError> {
        let account = self.runtime.block_on(self.inner.get_account(account_id))?;
        Ok(self.account(account))
    }

    pub fn get_default_account(&self) -> Result<Account<G>, SdkError> {
        let account = self.runtime.block_on(self.inner.get_default_account())?;
        Ok(self.account(account))
    }

    pub fn set_default_account(&self, account_id: &str) -> Result<(), SdkError> {
        self.runtime
            .block_on(self.inner.set_default_account(account_id))
    }

    pub fn unlink_accounts(&self, account_ids: &[String]) -> Result<(), SdkError> {
        self.runtime.block_on(self.inner.unlink_accounts(account_ids))
    }

    pub fn get_balance(&self, account_id: &str, level: KeyLevel) -> Result<Balance, SdkError> {
        self.runtime
            .block_on(self.inner.get_balance(account_id, level))
    }

    pub fn get_balances(
        &self,
        account_ids: &[String],
        level: KeyLevel,
    ) -> Result<Vec<Balance>, SdkError> {
        self.runtime
            .block_on(self.inner.get_balances(account_ids, level))
    }

    pub fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
        level: KeyLevel,
    ) -> Result<Transaction, SdkError> {
        self.runtime.block_on(
            self.inner
                .get_transaction(account_id, transaction_id, level),
        )
    }

    pub fn get_transactions(
        &self,
        account_id: &str,
        offset: Option<&str>,
        limit: i32,
        level: KeyLevel,
    ) -> Result<PagedList<Transaction>, SdkError> {
        self.runtime.block_on(
            self.inner
                .get_transactions(account_id, offset, limit, level),
        )
    }

    // -- Tokens -------------------------------------------------------------

    pub fn transfer_token_builder(&self, amount: f64, currency: &str) -> TransferTokenBuilder {
        self.inner.transfer_token_builder(amount, currency)
    }

    pub fn access_token_builder(&self, to: TokenMember) -> AccessTokenBuilder {
        self.inner.access_token_builder(to)
    }

    pub fn standing_order_token_builder(
        &self,
        amount: f64,
        currency: &str,
        frequency: &str,
        start_date: &str,
        end_date: &str,
    ) -> StandingOrderTokenBuilder {
        self.inner
            .standing_order_token_builder(amount, currency, frequency, start_date, end_date)
    }

    pub fn transfer_token_builder_from_request(
        &self,
        request: &TokenRequest,
    ) -> Result<TransferTokenBuilder, SdkError> {
        self.inner.transfer_token_builder_from_request(request)
    }

    pub fn access_token_builder_from_request(
        &self,
        request: &TokenRequest,
    ) -> Result<AccessTokenBuilder, SdkError> {
        self.inner.access_token_builder_from_request(request)
    }

    pub fn create_transfer_token(&self, builder: TransferTokenBuilder) -> Result<Token, SdkError> {
        self.runtime
            .block_on(self.inner.create_transfer_token(builder))
    }

    pub fn create_access_token(&self, builder: AccessTokenBuilder) -> Result<Token, SdkError> {
        self.runtime.block_on(self.inner.create_access_token(builder))
    }

    pub fn create_standing_order_token(
        &self,
        builder: StandingOrderTokenBuilder,
    ) -> Result<Token, SdkError> {
        self.runtime
            .block_on(self.inner.create_standing_order_token(builder))
    }

    pub fn store_token_request(&self, builder: TokenRequestBuilder) -> Result<String, SdkError> {
        self.runtime.block_on(self.inner.store_token_request(builder))
    }

    pub fn sign_token_request_state(
        &self,
        token_request_id: &str,
        token_id: &str,
        state: &str,
    ) -> Result<Signature, SdkError> {
        self.runtime.block_on(
            self.inner
                .sign_token_request_state(token_request_id, token_id, state),
        )
    }

    pub fn get_token(&self, token_id: &str) -> Result<Token, SdkError> {
        self.runtime.block_on(self.inner.get_token(token_id))
    }

    pub fn get_transfer_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.runtime
            .block_on(self.inner.get_transfer_tokens(offset, limit))
    }

    pub fn get_access_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.runtime
            .block_on(self.inner.get_access_tokens(offset, limit))
    }

    pub fn get_standing_order_tokens(
        &self,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Token>, SdkError> {
        self.runtime
            .block_on(self.inner.get_standing_order_tokens(offset, limit))
    }

    pub fn endorse_token(
        &self,
        token: &Token,
        level: KeyLevel,
    ) -> Result<TokenOperationResult, SdkError> {
        self.runtime.block_on(self.inner.endorse_token(token, level))
    }

    pub fn cancel_token(&self, token: &Token) -> Result<TokenOperationResult, SdkError> {
        self.runtime.block_on(self.inner.cancel_token(token))
    }

    pub fn replace_access_token(
        &self,
        token: &Token,
        builder: AccessTokenBuilder,
    ) -> Result<TokenOperationResult, SdkError> {
        self.runtime
            .block_on(self.inner.replace_access_token(token, builder))
    }

    // -- Transfers ----------------------------------------------------------

    pub fn redeem_token(&self, token: &Token, options: RedeemOptions) -> Result<Transfer, SdkError> {
        self.runtime.block_on(self.inner.redeem_token(token, options))
    }

    pub fn get_transfer(&self, transfer_id: &str) -> Result<Transfer, SdkError> {
        self.runtime.block_on(self.inner.get_transfer(transfer_id))
    }

    pub fn get_transfers(
        &self,
        token_id: Option<&str>,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Transfer>, SdkError> {
        self.runtime
            .block_on(self.inner.get_transfers(token_id, offset, limit))
    }
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

/// Blocking [`crate::Account`].
pub struct Account<G = GrpcTransport> {
    inner: crate::Account<G>,
    runtime: Arc<Runtime>,
}

impl<G> Clone for Account<G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            runtime: Arc::clone(&self.runtime),
        }
    }
}

impl<G: Gateway> Account<G> {
    pub fn id(&self) -> &str {
        self.inner.id()
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn bank_id(&self) -> &str {
        self.inner.bank_id()
    }

    pub fn is_locked(&self) -> bool {
        self.inner.is_locked()
    }

    /// The owning member, as a blocking handle.
    pub fn member(&self) -> Member<G> {
        Member {
            inner: self.inner.member().clone(),
            runtime: Arc::clone(&self.runtime),
        }
    }

    pub fn proto(&self) -> &proto_account::Account {
        self.inner.proto()
    }

    pub fn get_balance(&self, level: KeyLevel) -> Result<Balance, SdkError> {
        self.runtime.block_on(self.inner.get_balance(level))
    }

    pub fn get_transaction(
        &self,
        transaction_id: &str,
        level: KeyLevel,
    ) -> Result<Transaction, SdkError> {
        self.runtime
            .block_on(self.inner.get_transaction(transaction_id, level))
    }

    pub fn get_transactions(
        &self,
        offset: Option<&str>,
        limit: i32,
        level: KeyLevel,
    ) -> Result<PagedList<Transaction>, SdkError> {
        self.runtime
            .block_on(self.inner.get_transactions(offset, limit, level))
    }
}
