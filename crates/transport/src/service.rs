//! Gateway RPC names and the [`Gateway`] seam.
//!
//! The SDK never talks to tonic directly. Every call goes through
//! [`Gateway::unary`] with a [`Method`], a prost request and per-call
//! metadata. [`GrpcTransport`](crate::grpc::GrpcTransport) sends it over the
//! network; `MockGateway` (feature `mock`) answers from a queue.

use std::fmt;
use std::future::Future;

use crate::grpc::GrpcError;

/// Fully qualified name of the gateway service.
pub const GATEWAY_SERVICE: &str = "io.token.proto.gateway.GatewayService";

/// Per-call metadata entries (`key`, `value`). Keys must be lowercase ASCII.
pub type Metadata = Vec<(&'static str, String)>;

macro_rules! methods {
    ($($variant:ident),+ $(,)?) => {
        /// A gateway RPC.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Method {
            $($variant,)+
        }

        impl Method {
            /// Every gateway RPC, in declaration order.
            pub const ALL: &'static [Method] = &[$(Method::$variant,)+];

            /// RPC name as declared in the service.
            pub const fn name(self) -> &'static str {
                match self {
                    $(Method::$variant => stringify!($variant),)+
                }
            }

            /// HTTP/2 path of the RPC.
            pub const fn path(self) -> &'static str {
                match self {
                    $(Method::$variant => concat!(
                        "/io.token.proto.gateway.GatewayService/",
                        stringify!($variant)
                    ),)+
                }
            }
        }
    };
}

methods! {
    // Members
    CreateMember,
    UpdateMember,
    GetMember,
    ResolveAlias,
    GetAliases,
    VerifyAlias,
    GetProfile,
    SetProfile,
    DeleteMember,
    // Accounts
    GetAccounts,
    GetAccount,
    GetDefaultAccount,
    SetDefaultAccount,
    UnlinkAccounts,
    GetBalance,
    GetBalances,
    GetTransaction,
    GetTransactions,
    // Tokens
    CreateTransferToken,
    CreateAccessToken,
    CreateStandingOrderToken,
    GetToken,
    GetTokens,
    EndorseToken,
    CancelToken,
    ReplaceToken,
    // Token requests
    StoreTokenRequest,
    RetrieveTokenRequest,
    SignTokenRequestState,
    // Transfers
    CreateTransfer,
    GetTransfer,
    GetTransfers,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Sends unary RPCs to the Token gateway.
///
/// Implementations must be `Send + Sync`; one instance is shared by a
/// `TokenIo` and every `Member` it creates.
pub trait Gateway: Send + Sync + 'static {
    /// Sends `request` to `method` with the given extra metadata and decodes
    /// the response.
    ///
    /// # Errors
    ///
    /// Returns [`GrpcError::Status`] for any non-OK status and
    /// [`GrpcError::InvalidMetadata`] if a metadata value is not valid ASCII.
    fn unary<Req, Resp>(
        &self,
        method: Method,
        request: Req,
        metadata: Metadata,
    ) -> impl Future<Output = Result<Resp, GrpcError>> + Send
    where
        Req: prost::Message + Send + Sync + 'static,
        Resp: prost::Message + Default + Send + Sync + 'static;
}
