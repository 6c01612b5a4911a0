//! gRPC transport to the Token gateway.
//!
//! [`GrpcTransport`] holds a single lazily connected tonic channel. Calls
//! are multiplexed over it, and tonic re-dials after a dropped connection.
//!
//! # SDK headers
//!
//! Every call passes through [`SdkHeaderInterceptor`], which adds:
//!
//! | Header | Value |
//! |--------|-------|
//! | `token-sdk` | `rust` |
//! | `token-sdk-version` | crate version |
//! | `token-dev-key` | developer key, when configured |
//!
//! Request authentication headers are per call and supplied by the caller as
//! [`Metadata`].
//!
//! # Example
//!
//! ```no_run
//! use transport::grpc::{GrpcConfig, GrpcTransport};
//!
//! # async fn example() -> Result<(), transport::grpc::GrpcError> {
//! let config = GrpcConfig::builder().dev_key("my-dev-key").build();
//! let transport = GrpcTransport::new("https://api-grpc.sandbox.token.io:443", config)?;
//! # let _ = transport;
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::time::Duration;

use config::constants::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_REQUEST_TIMEOUT_MS, MAX_GRPC_MESSAGE_SIZE, SDK_NAME,
};
use tonic::codegen::http::uri::PathAndQuery;
use tonic::metadata::{Ascii, MetadataValue};
use tonic::service::Interceptor;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};

use crate::service::{Gateway, Metadata, Method};

/// Version reported in the `token-sdk-version` header.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from the gRPC transport layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrpcError {
    /// The endpoint URL is invalid.
    InvalidEndpoint { url: String, reason: String },

    /// A gRPC call returned an error status.
    Status { code: tonic::Code, message: String },

    /// A metadata value is not valid ASCII.
    InvalidMetadata(String),
}

impl GrpcError {
    /// The status code, for [`GrpcError::Status`].
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            Self::Status { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for GrpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEndpoint { url, reason } => {
                write!(f, "invalid endpoint '{url}': {reason}")
            }
            Self::Status { code, message } => {
                write!(f, "gRPC error ({code}): {message}")
            }
            Self::InvalidMetadata(key) => write!(f, "invalid metadata value for '{key}'"),
        }
    }
}

impl std::error::Error for GrpcError {}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Connection settings for [`GrpcTransport`].
///
/// Timeouts default to the SDK constants. TLS is on by default but only
/// applies to `https://` addresses, so a plain `http://` local gateway works
/// without switching it off.
#[derive(Debug, Clone)]
pub struct GrpcConfig {
    pub connect_timeout: Duration,

    /// Deadline for a whole unary call, including the gateway's own work.
    pub request_timeout: Duration,

    pub use_tls: bool,

    /// Sent as `token-dev-key` on every call when set.
    pub dev_key: Option<String>,
}

impl Default for GrpcConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS),
            use_tls: true,
            dev_key: None,
        }
    }
}

impl GrpcConfig {
    pub fn builder() -> GrpcConfigBuilder {
        GrpcConfigBuilder::default()
    }

    /// Endpoint for `address` with these settings applied. Nothing connects
    /// until the channel is first used.
    fn endpoint(&self, address: &str) -> Result<Endpoint, GrpcError> {
        let invalid = |reason: String| GrpcError::InvalidEndpoint {
            url: address.to_owned(),
            reason,
        };
        let endpoint = Endpoint::from_shared(address.to_owned())
            .map_err(|e| invalid(e.to_string()))?
            .connect_timeout(self.connect_timeout)
            .timeout(self.request_timeout);

        if !(self.use_tls && address.starts_with("https://")) {
            return Ok(endpoint);
        }
        endpoint
            .tls_config(ClientTlsConfig::new().with_native_roots())
            .map_err(|e| invalid(format!("TLS setup failed: {e}")))
    }
}

/// Builder for [`GrpcConfig`]. Unset values keep their defaults.
#[derive(Debug, Default)]
pub struct GrpcConfigBuilder {
    config: Option<GrpcConfig>,
}

impl GrpcConfigBuilder {
    pub fn connect_timeout(self, timeout: Duration) -> Self {
        self.with(|c| c.connect_timeout = timeout)
    }

    pub fn request_timeout(self, timeout: Duration) -> Self {
        self.with(|c| c.request_timeout = timeout)
    }

    pub fn use_tls(self, use_tls: bool) -> Self {
        self.with(|c| c.use_tls = use_tls)
    }

    pub fn dev_key(self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.with(|c| c.dev_key = Some(key))
    }

    pub fn build(self) -> GrpcConfig {
        self.config.unwrap_or_default()
    }

    fn with(mut self, update: impl FnOnce(&mut GrpcConfig)) -> Self {
        update(self.config.get_or_insert_with(GrpcConfig::default));
        self
    }
}

// ---------------------------------------------------------------------------
// SDK header interceptor
// ---------------------------------------------------------------------------

/// Interceptor that stamps SDK identification headers onto every request.
///
/// Cheap to clone: the values are reference-counted bytes.
#[derive(Clone)]
pub struct SdkHeaderInterceptor {
    sdk_name: MetadataValue<Ascii>,
    sdk_version: MetadataValue<Ascii>,
    dev_key: Option<MetadataValue<Ascii>>,
}

impl SdkHeaderInterceptor {
    /// Creates an interceptor, optionally carrying a developer key.
    ///
    /// # Errors
    ///
    /// Returns [`GrpcError::InvalidMetadata`] if the developer key is not
    /// valid ASCII.
    pub fn new(dev_key: Option<&str>) -> Result<Self, GrpcError> {
        let dev_key = dev_key
            .map(|k| ascii_value("token-dev-key", k))
            .transpose()?;
        Ok(Self {
            sdk_name: MetadataValue::from_static(SDK_NAME),
            sdk_version: MetadataValue::from_static(SDK_VERSION),
            dev_key,
        })
    }
}

impl Interceptor for SdkHeaderInterceptor {
    fn call(&mut self, mut req: tonic::Request<()>) -> Result<tonic::Request<()>, tonic::Status> {
        let metadata = req.metadata_mut();
        metadata.insert("token-sdk", self.sdk_name.clone());
        metadata.insert("token-sdk-version", self.sdk_version.clone());
        if let Some(dev_key) = &self.dev_key {
            metadata.insert("token-dev-key", dev_key.clone());
        }
        Ok(req)
    }
}

// ---------------------------------------------------------------------------
// Transport
// ---------------------------------------------------------------------------

/// [`Gateway`] over gRPC. Shared freely between tasks; the channel clones
/// cheaply per call.
pub struct GrpcTransport {
    address: String,
    channel: Channel,
    interceptor: SdkHeaderInterceptor,
    config: GrpcConfig,
}

impl fmt::Debug for GrpcTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GrpcTransport")
            .field("address", &self.address)
            .field("use_tls", &self.config.use_tls)
            .field("dev_key", &self.config.dev_key.is_some())
            .finish()
    }
}

impl GrpcTransport {
    /// Transport for `address`. The handshake happens on the first call, but
    /// a tokio runtime must already be running.
    ///
    /// # Errors
    ///
    /// [`GrpcError::InvalidEndpoint`] for an unparsable address and
    /// [`GrpcError::InvalidMetadata`] for a non-ASCII developer key.
    pub fn new(address: &str, config: GrpcConfig) -> Result<Self, GrpcError> {
        let channel = config.endpoint(address)?.connect_lazy();
        let interceptor = SdkHeaderInterceptor::new(config.dev_key.as_deref())?;
        Ok(Self {
            address: address.to_owned(),
            channel,
            interceptor,
            config,
        })
    }

    /// The gateway address this transport talks to.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Transport configuration.
    pub fn config(&self) -> &GrpcConfig {
        &self.config
    }

    async fn call<Req, Resp>(
        &self,
        method: Method,
        request: Req,
        metadata: Metadata,
    ) -> Result<Resp, GrpcError>
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        let mut req = tonic::Request::new(request);
        for (key, value) in metadata {
            req.metadata_mut().insert(key, ascii_value(key, &value)?);
        }

        let service = InterceptedService::new(self.channel.clone(), self.interceptor.clone());
        let mut grpc = tonic::client::Grpc::new(service)
            .max_decoding_message_size(MAX_GRPC_MESSAGE_SIZE);
        grpc.ready().await.map_err(|e| GrpcError::Status {
            code: tonic::Code::Unavailable,
            message: format!(
                "service was not ready: {}",
                Into::<tonic::codegen::StdError>::into(e)
            ),
        })?;

        let codec = tonic_prost::ProstCodec::<Req, Resp>::default();
        grpc.unary(req, PathAndQuery::from_static(method.path()), codec)
            .await
            .map(tonic::Response::into_inner)
            .map_err(grpc_status_to_error)
    }
}

impl Gateway for GrpcTransport {
    fn unary<Req, Resp>(
        &self,
        method: Method,
        request: Req,
        metadata: Metadata,
    ) -> impl std::future::Future<Output = Result<Resp, GrpcError>> + Send
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static,
    {
        self.call(method, request, metadata)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn ascii_value(key: &str, value: &str) -> Result<MetadataValue<Ascii>, GrpcError> {
    value
        .parse()
        .map_err(|_| GrpcError::InvalidMetadata(key.to_owned()))
}

/// Converts a tonic `Status` into a `GrpcError`.
pub fn grpc_status_to_error(status: tonic::Status) -> GrpcError {
    GrpcError::Status {
        code: status.code(),
        message: status.message().to_owned(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
