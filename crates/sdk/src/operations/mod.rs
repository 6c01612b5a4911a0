//! SDK operations.
//!
//! Each submodule adds one family of gateway operations to [`TokenIo`] or
//! [`Member`]. Authenticated operations follow the same pattern:
//!
//! 1. Build (and, for tokens and transfers, sign) the request payload
//! 2. Sign the encoded request with the member key at the call's level
//! 3. Send it through the [`Gateway`] and unwrap the mandatory response fields
//!
//! [`TokenIo`]: crate::TokenIo
//! [`Member`]: crate::Member
//! [`Gateway`]: transport::Gateway

pub mod accounts;
pub mod onboarding;
pub mod tokens;
pub mod transfers;
