//! Token SDK: members, accounts, tokens, transfers and the token request
//! flow.
//!
//! The SDK combines:
//! - **Transport** ([`Gateway`], [`GrpcTransport`]) for gateway calls
//! - **Signing** ([`CryptoEngine`]) for member keys and request signatures
//! - **Key storage** ([`KeyStore`]) for keys held on this device
//!
//! # Architecture
//!
//! [`TokenIo`] is the unauthenticated entry point: it creates members,
//! logs in with locally stored keys, and handles token request redirects.
//! [`Member`] is an authenticated handle for one member; every call it
//! makes is signed with one of the member's keys. Builders in [`token`]
//! assemble token payloads locally before a member submits them.
//!
//! # Usage
//!
//! ```no_run
//! use sdk::{TokenIo, alias};
//! use sdk_core::Cluster;
//!
//! # async fn example() -> Result<(), sdk::SdkError> {
//! let tokenio = TokenIo::builder()
//!     .cluster(Cluster::Sandbox)
//!     .dev_key("my-dev-key")
//!     .build()?;
//!
//! let member = tokenio.create_member(Some(alias::email("alice@example.com"))).await?;
//! let accounts = member.get_accounts().await?;
//!
//! // Member is Clone -- share across tasks.
//! let member2 = member.clone();
//! # let _ = (accounts, member2);
//! # Ok(())
//! # }
//! ```

pub mod account;
pub mod alias;
pub mod auth;
pub mod blocking;
pub mod error;
pub mod member;
pub mod operations;
pub mod paging;
pub(crate) mod rpc;
pub mod token;
pub(crate) mod utils;

pub use account::Account;
pub use error::SdkError;
pub use member::Member;
pub use operations::transfers::RedeemOptions;
pub use paging::PagedList;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use config::ClusterConfig;
use sdk_core::Cluster;
use signer::{CryptoEngine, InMemoryKeyStore, KeyInfo, KeyStore};
use transport::{Gateway, GrpcConfig, GrpcTransport};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// SDK configuration.
#[derive(Clone)]
pub struct TokenIoConfig {
    /// Gateway URL, e.g. `https://api-grpc.sandbox.token.io:443`.
    pub gateway_url: String,

    /// Host of the web app serving token request redirects.
    pub web_app_host: String,

    /// Transport settings (timeouts, TLS, developer key).
    pub grpc: GrpcConfig,

    /// Where member keys are kept.
    pub key_store: Arc<dyn KeyStore>,
}

impl fmt::Debug for TokenIoConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIoConfig")
            .field("gateway_url", &self.gateway_url)
            .field("web_app_host", &self.web_app_host)
            .field("grpc", &self.grpc)
            .finish_non_exhaustive()
    }
}

/// Builder for [`TokenIo`].
///
/// Defaults to the sandbox cluster, its standard port with TLS, and an
/// in-memory key store.
#[derive(Default)]
pub struct TokenIoBuilder {
    cluster: Option<Cluster>,
    host: Option<String>,
    port: Option<u16>,
    use_tls: Option<bool>,
    timeout: Option<Duration>,
    dev_key: Option<String>,
    key_store: Option<Arc<dyn KeyStore>>,
}

impl TokenIoBuilder {
    /// Selects one of the built-in clusters.
    pub fn cluster(mut self, cluster: Cluster) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Overrides the gateway host of the cluster.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Overrides the gateway port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Enables or disables TLS.
    pub fn use_tls(mut self, use_tls: bool) -> Self {
        self.use_tls = Some(use_tls);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the developer key sent with every call.
    pub fn dev_key(mut self, dev_key: impl Into<String>) -> Self {
        self.dev_key = Some(dev_key.into());
        self
    }

    /// Keeps member keys in `key_store`.
    pub fn key_store(mut self, key_store: Arc<dyn KeyStore>) -> Self {
        self.key_store = Some(key_store);
        self
    }

    /// Resolves the configuration without connecting.
    pub fn config(self) -> TokenIoConfig {
        let cluster = ClusterConfig::for_cluster(self.cluster.unwrap_or(Cluster::Sandbox));
        let host = self.host.unwrap_or_else(|| cluster.gateway_host.to_owned());
        let port = self.port.unwrap_or(cluster.port);
        let use_tls = self.use_tls.unwrap_or(cluster.use_tls);
        let scheme = if use_tls { "https" } else { "http" };

        let mut grpc = GrpcConfig::builder().use_tls(use_tls);
        if let Some(timeout) = self.timeout {
            grpc = grpc.request_timeout(timeout);
        }
        if let Some(dev_key) = self.dev_key {
            grpc = grpc.dev_key(dev_key);
        }

        TokenIoConfig {
            gateway_url: format!("{scheme}://{host}:{port}"),
            web_app_host: cluster.web_app_host.to_owned(),
            grpc: grpc.build(),
            key_store: self
                .key_store
                .unwrap_or_else(|| Arc::new(InMemoryKeyStore::new())),
        }
    }

    /// Builds a [`TokenIo`] over gRPC.
    ///
    /// Must be called within a tokio runtime (the channel connects lazily).
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the gateway URL or developer key
    /// is invalid.
    pub fn build(self) -> Result<TokenIo, SdkError> {
        TokenIo::new(self.config())
    }
}

// ---------------------------------------------------------------------------
// TokenIo
// ---------------------------------------------------------------------------

/// Keys generated on this device for an existing member, to be approved
/// by a device that already holds a privileged key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub member_id: String,
    pub keys: Vec<KeyInfo>,
}

/// The Token SDK entry point.
///
/// `Clone`-able (wraps an `Arc<G>`). Generic over the [`Gateway`] so tests
/// can substitute a mock.
pub struct TokenIo<G = GrpcTransport> {
    pub(crate) gateway: Arc<G>,
    pub(crate) web_app_host: String,
    pub(crate) key_store: Arc<dyn KeyStore>,
}

// Manual Clone: we don't require G to be Clone.
impl<G> Clone for TokenIo<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            web_app_host: self.web_app_host.clone(),
            key_store: Arc::clone(&self.key_store),
        }
    }
}

impl<G: fmt::Debug> fmt::Debug for TokenIo<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenIo")
            .field("gateway", &self.gateway)
            .field("web_app_host", &self.web_app_host)
            .finish_non_exhaustive()
    }
}

impl TokenIo {
    /// Creates a builder.
    pub fn builder() -> TokenIoBuilder {
        TokenIoBuilder::default()
    }

    /// Creates an SDK instance from a resolved configuration.
    ///
    /// No network I/O happens here; the connection is made on first use.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the transport cannot be created.
    pub fn new(config: TokenIoConfig) -> Result<Self, SdkError> {
        let transport = GrpcTransport::new(&config.gateway_url, config.grpc)?;
        Ok(Self::with_gateway(
            transport,
            config.web_app_host,
            config.key_store,
        ))
    }
}

impl<G: Gateway> TokenIo<G> {
    /// Creates an SDK instance over an arbitrary gateway.
    pub fn with_gateway(
        gateway: G,
        web_app_host: impl Into<String>,
        key_store: Arc<dyn KeyStore>,
    ) -> Self {
        Self {
            gateway: Arc::new(gateway),
            web_app_host: web_app_host.into(),
            key_store,
        }
    }

    /// The underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// The key store member keys are kept in.
    pub fn key_store(&self) -> &Arc<dyn KeyStore> {
        &self.key_store
    }

    pub(crate) fn engine(&self, member_id: &str) -> CryptoEngine {
        CryptoEngine::new(member_id, Arc::clone(&self.key_store))
    }
}
