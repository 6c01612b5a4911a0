//! Transport layer for the Token SDK.
//!
//! Provides the gateway protocol messages and a gRPC client for
//! `io.token.proto.gateway.GatewayService`.
//!
//! # Feature flags
//!
//! - **`mock`**: Enables [`mock::MockGateway`], an in-process [`Gateway`]
//!   with scripted responses (testing).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`proto`] | Prost message definitions |
//! | [`service`] | [`Method`] names and the [`Gateway`] trait |
//! | [`grpc`] | [`GrpcTransport`](grpc::GrpcTransport), the tonic-backed gateway |
//! | `mock` | Scripted gateway (feature `mock`) |

pub mod grpc;
pub mod proto;
pub mod service;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use grpc::{GrpcConfig, GrpcError, GrpcTransport};
pub use service::{Gateway, Metadata, Method};
