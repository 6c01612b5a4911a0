//! Token cluster configuration.
//!
//! This crate provides static, per-cluster configuration for the Token SDK:
//!
//! - [`ClusterConfig`] -- gateway and web-app endpoints for a given cluster
//! - [`constants`] -- protocol-level limits and defaults (ref ID length,
//!   timeouts, header values)
//!
//! All data is compile-time constant (`&'static str`). Zero heap allocations
//! except [`ClusterConfig::gateway_url`]. Types are `Copy`.
//!
//! `config` depends only on [`sdk_core::Cluster`]. It does **not** depend on
//! transport, signing, or any runtime crate, so it can be used freely as a
//! leaf dependency.

pub mod constants;

use sdk_core::Cluster;

use constants::DEFAULT_PORT;

// ---------------------------------------------------------------------------
// ClusterConfig
// ---------------------------------------------------------------------------

/// Endpoints of one Token cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClusterConfig {
    /// The cluster this configuration is for.
    pub cluster: Cluster,

    /// Host name of the gRPC gateway.
    pub gateway_host: &'static str,

    /// Host name of the web app serving token request redirects.
    pub web_app_host: &'static str,

    /// Gateway port.
    pub port: u16,

    /// Whether the gateway is reached over TLS.
    pub use_tls: bool,
}

impl ClusterConfig {
    /// Get the configuration for a specific cluster.
    pub const fn for_cluster(cluster: Cluster) -> Self {
        match cluster {
            Cluster::Production => Self::PRODUCTION,
            Cluster::Sandbox => Self::SANDBOX,
            Cluster::Staging => Self::STAGING,
            Cluster::Integration => Self::INTEGRATION,
            Cluster::Performance => Self::PERFORMANCE,
            Cluster::Development => Self::DEVELOPMENT,
        }
    }

    /// Returns the gateway URL, e.g. `https://api-grpc.token.io:443`.
    pub fn gateway_url(&self) -> String {
        let scheme = if self.use_tls { "https" } else { "http" };
        format!("{scheme}://{}:{}", self.gateway_host, self.port)
    }

    // -----------------------------------------------------------------------
    // Built-in cluster configurations
    // -----------------------------------------------------------------------

    /// Live environment.
    pub const PRODUCTION: Self = Self {
        cluster: Cluster::Production,
        gateway_host: "api-grpc.token.io",
        web_app_host: "web-app.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };

    /// Public sandbox.
    pub const SANDBOX: Self = Self {
        cluster: Cluster::Sandbox,
        gateway_host: "api-grpc.sandbox.token.io",
        web_app_host: "web-app.sandbox.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };

    /// Staging.
    pub const STAGING: Self = Self {
        cluster: Cluster::Staging,
        gateway_host: "api-grpc.stg.token.io",
        web_app_host: "web-app.stg.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };

    /// Integration.
    pub const INTEGRATION: Self = Self {
        cluster: Cluster::Integration,
        gateway_host: "api-grpc.int.token.io",
        web_app_host: "web-app.int.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };

    /// Load testing.
    pub const PERFORMANCE: Self = Self {
        cluster: Cluster::Performance,
        gateway_host: "api-grpc.perf.token.io",
        web_app_host: "web-app.perf.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };

    /// Internal development.
    pub const DEVELOPMENT: Self = Self {
        cluster: Cluster::Development,
        gateway_host: "api-grpc.dev.token.io",
        web_app_host: "web-app.dev.token.io",
        port: DEFAULT_PORT,
        use_tls: true,
    };
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
