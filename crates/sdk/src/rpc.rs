//! Gateway client used by [`Member`](crate::Member) and
//! [`TokenIo`](crate::TokenIo).
//!
//! Wraps a shared [`Gateway`] with logging, error conversion, and request
//! signing for authenticated calls.

use std::sync::Arc;

use prost::Message;
use signer::{CryptoEngine, KeyLevel, Signer, ed25519, now_ms};
use tracing::{debug, error};
use transport::proto::common::Signature;
use transport::{Gateway, Method};

use crate::SdkError;
use crate::auth::{AuthContext, auth_metadata};

/// Sends a call that needs no member signature.
pub(crate) async fn call_unauthenticated<G, Req, Resp>(
    gateway: &G,
    method: Method,
    request: Req,
) -> Result<Resp, SdkError>
where
    G: Gateway,
    Req: Message + Send + Sync + 'static,
    Resp: Message + Default + Send + Sync + 'static,
{
    debug!(%method, "gateway call");
    gateway
        .unary(method, request, Vec::new())
        .await
        .map_err(|e| {
            error!("{method} failed: {e}");
            SdkError::Transport(e)
        })
}

/// Authenticated client bound to one member.
pub(crate) struct Client<G> {
    gateway: Arc<G>,
    engine: CryptoEngine,
    context: AuthContext,
}

// Manual Clone: G itself need not be Clone.
impl<G> Clone for Client<G> {
    fn clone(&self) -> Self {
        Self {
            gateway: Arc::clone(&self.gateway),
            engine: self.engine.clone(),
            context: self.context.clone(),
        }
    }
}

impl<G> Client<G> {
    pub(crate) fn new(gateway: Arc<G>, engine: CryptoEngine) -> Self {
        Self {
            gateway,
            engine,
            context: AuthContext::default(),
        }
    }

    pub(crate) fn member_id(&self) -> &str {
        self.engine.member_id()
    }

    pub(crate) fn engine(&self) -> &CryptoEngine {
        &self.engine
    }

    /// Returns a client that acts under the access token `token_id`.
    pub(crate) fn for_access_token(&self, token_id: &str, customer_initiated: bool) -> Self {
        Self {
            context: AuthContext {
                on_behalf_of: Some(token_id.to_owned()),
                customer_initiated,
            },
            ..self.clone()
        }
    }

    /// Signs `message` with the member's key at `level`.
    pub(crate) fn sign(&self, level: KeyLevel, message: &[u8]) -> Result<Signature, SdkError> {
        sign_with(&self.engine, level, message)
    }
}

impl<G: Gateway> Client<G> {
    /// Sends a call authenticated with the member's key at `level`.
    pub(crate) async fn call<Req, Resp>(
        &self,
        method: Method,
        request: Req,
        level: KeyLevel,
    ) -> Result<Resp, SdkError>
    where
        Req: Message + Send + Sync + 'static,
        Resp: Message + Default + Send + Sync + 'static,
    {
        let signer = self.engine.create_signer(level)?;
        let metadata = auth_metadata(
            self.member_id(),
            signer.as_ref(),
            &request.encode_to_vec(),
            now_ms(),
            &self.context,
        )?;

        debug!(%method, member_id = %self.member_id(), %level, "gateway call");
        self.gateway
            .unary(method, request, metadata)
            .await
            .map_err(|e| {
                error!("{method} failed: {e}");
                SdkError::Transport(e)
            })
    }
}

/// Signs `message` with `engine`'s key at `level`, as a protocol signature.
pub(crate) fn sign_with(
    engine: &CryptoEngine,
    level: KeyLevel,
    message: &[u8],
) -> Result<Signature, SdkError> {
    let signer = engine.create_signer(level)?;
    let bytes = signer.sign(message)?;
    Ok(Signature {
        member_id: engine.member_id().to_owned(),
        key_id: signer.key().id.clone(),
        signature: ed25519::to_base64url(&bytes),
    })
}
