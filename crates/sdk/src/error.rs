//! SDK error types.
//!
//! [`SdkError`] is the unified error type for all SDK operations. Builder
//! validation failures are local; everything else wraps the error of the
//! layer it came from (transport, signer, callback parsing) so callers can
//! still see the gRPC status code.

use std::fmt;

use sdk_core::CallbackError;
use signer::SignerError;
use transport::GrpcError;
use transport::proto::token::TransferTokenStatus;

// ---------------------------------------------------------------------------
// SdkError
// ---------------------------------------------------------------------------

/// Errors from SDK operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SdkError {
    // -- Builder validation -------------------------------------------------
    /// An amount is not a finite positive number.
    InvalidAmount,

    /// A transfer or standing order has no source account.
    MissingSource,

    /// The token has no redeemer.
    MissingRedeemer,

    /// An access token grants no resources.
    MissingResources,

    /// The ref ID is longer than the protocol allows (length given).
    RefIdTooLong(usize),

    /// The token request body does not match the builder.
    WrongTokenRequestBody,

    /// The token body does not match the requested operation.
    WrongTokenBody,

    /// The standing-order frequency is not an ISO 20022 code.
    InvalidFrequency(String),

    /// A date is not `YYYY-MM-DD`.
    InvalidDate(String),

    /// The end date precedes the start date.
    InvalidDateRange,

    /// A token request has no redirect URL.
    MissingRedirectUrl,

    /// The redirect URL is not an absolute http(s) URL.
    InvalidRedirectUrl(String),

    // -- Remote results -----------------------------------------------------
    /// Creating a transfer or standing-order token did not succeed.
    TransferTokenFailed(TransferTokenStatus),

    /// The bank requires additional consent for this read.
    StepUpRequired,

    /// The gateway response lacks a mandatory field.
    InvalidResponse(&'static str),

    /// No member is registered under the alias.
    AliasNotFound,

    /// No key for the member is held locally.
    NoLocalKeys(String),

    /// The callback was not signed by the Token member.
    InvalidCallbackSignature,

    // -- Wrapped ------------------------------------------------------------
    /// A gateway call failed.
    Transport(GrpcError),

    /// Key lookup or signing failed.
    Signer(SignerError),

    /// A token request callback could not be parsed.
    Callback(CallbackError),

    /// The blocking runtime could not be created.
    Runtime(String),
}

impl SdkError {
    /// The gRPC status code, when the error came from the gateway.
    pub fn code(&self) -> Option<tonic::Code> {
        match self {
            Self::Transport(e) => e.code(),
            _ => None,
        }
    }
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidAmount => write!(f, "amount must be a finite positive number"),
            Self::MissingSource => write!(f, "no source on token"),
            Self::MissingRedeemer => write!(f, "no redeemer on token"),
            Self::MissingResources => write!(f, "access token has no resources"),
            Self::RefIdTooLong(len) => write!(
                f,
                "ref id is {len} characters, maximum is {}",
                config::constants::REF_ID_MAX_LENGTH
            ),
            Self::WrongTokenRequestBody => write!(f, "token request has the wrong body type"),
            Self::WrongTokenBody => write!(f, "token has the wrong body type"),
            Self::InvalidFrequency(freq) => write!(f, "invalid standing order frequency: {freq}"),
            Self::InvalidDate(date) => write!(f, "invalid date (expected YYYY-MM-DD): {date}"),
            Self::InvalidDateRange => write!(f, "end date precedes start date"),
            Self::MissingRedirectUrl => write!(f, "token request has no redirect url"),
            Self::InvalidRedirectUrl(url) => write!(f, "invalid redirect url: {url}"),
            Self::TransferTokenFailed(status) => {
                write!(f, "transfer token creation failed: {}", status.as_str_name())
            }
            Self::StepUpRequired => write!(f, "additional signatures required (step up)"),
            Self::InvalidResponse(field) => write!(f, "gateway response missing {field}"),
            Self::AliasNotFound => write!(f, "alias not found"),
            Self::NoLocalKeys(member_id) => write!(f, "no local keys for member {member_id}"),
            Self::InvalidCallbackSignature => write!(f, "invalid token request callback signature"),
            Self::Transport(e) => write!(f, "{e}"),
            Self::Signer(e) => write!(f, "{e}"),
            Self::Callback(e) => write!(f, "{e}"),
            Self::Runtime(reason) => write!(f, "failed to start runtime: {reason}"),
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Signer(e) => Some(e),
            Self::Callback(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GrpcError> for SdkError {
    fn from(e: GrpcError) -> Self {
        Self::Transport(e)
    }
}

impl From<SignerError> for SdkError {
    fn from(e: SignerError) -> Self {
        Self::Signer(e)
    }
}

impl From<CallbackError> for SdkError {
    fn from(e: CallbackError) -> Self {
        Self::Callback(e)
    }
}
