//! Core types and utilities for the Token SDK.
//!
//! This crate provides foundational types used across the SDK:
//!
//! - [`Cluster`] -- Token environment identifier (Production, Sandbox, ...)
//! - [`token_request`] -- redirect URL generation and callback parsing for
//!   token requests
//! - [`canonical`] -- canonical JSON serialization for signed payloads

pub mod canonical;
pub mod token_request;

pub use token_request::{
    CallbackError, CallbackSignature, TokenRequestCallback, TokenRequestCallbackParameters,
    TokenRequestState, TokenRequestStatePayload, SIGNATURE_PARAM, STATE_PARAM, TOKEN_ID_PARAM,
    hash_string, token_request_url,
};

// ---------------------------------------------------------------------------
// Cluster
// ---------------------------------------------------------------------------

/// Token environment identifier.
///
/// Determines which gateway and web-app hosts the SDK talks to. Endpoint
/// tables live in the `config` crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cluster {
    /// Live environment.
    Production,

    /// Public sandbox backed by simulated banks.
    Sandbox,

    /// Pre-release staging environment.
    Staging,

    /// Integration environment for partner testing.
    Integration,

    /// Load-testing environment.
    Performance,

    /// Internal development environment.
    Development,
}

impl Cluster {
    /// Lower-case cluster name, as used in environment variables and logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Sandbox => "sandbox",
            Self::Staging => "staging",
            Self::Integration => "integration",
            Self::Performance => "performance",
            Self::Development => "development",
        }
    }

    /// Parses a cluster from its lower-case name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "production" | "prd" => Some(Self::Production),
            "sandbox" => Some(Self::Sandbox),
            "staging" | "stg" => Some(Self::Staging),
            "integration" | "int" => Some(Self::Integration),
            "performance" | "perf" => Some(Self::Performance),
            "development" | "dev" => Some(Self::Development),
            _ => None,
        }
    }
}

impl std::fmt::Display for Cluster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
