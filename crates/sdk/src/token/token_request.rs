//! Token request builder.
//!
//! A token request describes a token a third party wants a member to create.
//! The third party stores it, sends the member to the web app, and receives
//! the resulting token ID on its redirect URL.

use transport::proto::common::Alias;
use transport::proto::token::{TokenMember, TransferEndpoint};
use transport::proto::token_request::token_request_payload::{
    AccessBody, RequestBody, ResourceType, TransferBody,
};
use transport::proto::token_request::{TokenRequest, TokenRequestOptions, TokenRequestPayload};
use url::Url;

use super::{member_by_alias, member_by_id};
use crate::SdkError;
use crate::utils::{format_amount, resolve_ref_id};

#[derive(Debug, Clone)]
enum Body {
    Transfer {
        lifetime_amount: f64,
        currency: String,
        charge_amount: Option<f64>,
        destinations: Vec<TransferEndpoint>,
    },
    Access(Vec<ResourceType>),
}

/// Builds a [`TokenRequest`] for storing with
/// [`Member::store_token_request`](crate::Member::store_token_request).
#[derive(Debug, Clone)]
pub struct TokenRequestBuilder {
    body: Body,
    redirect_url: Option<String>,
    to: Option<TokenMember>,
    from: Option<TokenMember>,
    ref_id: String,
    user_ref_id: String,
    description: String,
    callback_state: String,
    bank_id: String,
    source_account_id: String,
    receipt_requested: bool,
}

impl TokenRequestBuilder {
    /// Requests a transfer token of up to `amount` in `currency`.
    pub fn transfer(amount: f64, currency: &str) -> Self {
        Self::with_body(Body::Transfer {
            lifetime_amount: amount,
            currency: currency.to_owned(),
            charge_amount: None,
            destinations: Vec::new(),
        })
    }

    /// Requests an access token for `resource_types`.
    pub fn access(resource_types: &[ResourceType]) -> Self {
        Self::with_body(Body::Access(resource_types.to_vec()))
    }

    fn with_body(body: Body) -> Self {
        Self {
            body,
            redirect_url: None,
            to: None,
            from: None,
            ref_id: String::new(),
            user_ref_id: String::new(),
            description: String::new(),
            callback_state: String::new(),
            bank_id: String::new(),
            source_account_id: String::new(),
            receipt_requested: false,
        }
    }

    /// Where the web app sends the member once the token is created.
    pub fn redirect_url(mut self, url: &str) -> Self {
        self.redirect_url = Some(url.to_owned());
        self
    }

    /// Member the token is requested for. Filled with the storing member
    /// when unset.
    pub fn to_member_id(mut self, member_id: &str) -> Self {
        self.to = Some(member_by_id(member_id));
        self
    }

    pub fn to_alias(mut self, alias: Alias) -> Self {
        self.to = Some(member_by_alias(alias));
        self
    }

    /// Member expected to create the token, when known.
    pub fn from_member_id(mut self, member_id: &str) -> Self {
        self.from = Some(member_by_id(member_id));
        self
    }

    pub fn from_alias(mut self, alias: Alias) -> Self {
        self.from = Some(member_by_alias(alias));
        self
    }

    pub fn ref_id(mut self, ref_id: &str) -> Self {
        self.ref_id = ref_id.to_owned();
        self
    }

    pub fn user_ref_id(mut self, user_ref_id: &str) -> Self {
        self.user_ref_id = user_ref_id.to_owned();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    /// Opaque state returned on the callback.
    pub fn callback_state(mut self, state: &str) -> Self {
        self.callback_state = state.to_owned();
        self
    }

    /// Skips bank selection in the web app.
    pub fn bank_id(mut self, bank_id: &str) -> Self {
        self.bank_id = bank_id.to_owned();
        self
    }

    pub fn source_account_id(mut self, account_id: &str) -> Self {
        self.source_account_id = account_id.to_owned();
        self
    }

    pub fn receipt_requested(mut self, requested: bool) -> Self {
        self.receipt_requested = requested;
        self
    }

    /// Single-charge amount of a transfer request. Ignored for access.
    pub fn charge_amount(mut self, amount: f64) -> Self {
        if let Body::Transfer { charge_amount, .. } = &mut self.body {
            *charge_amount = Some(amount);
        }
        self
    }

    /// Adds a destination to a transfer request. Ignored for access.
    pub fn add_destination(mut self, destination: TransferEndpoint) -> Self {
        if let Body::Transfer { destinations, .. } = &mut self.body {
            destinations.push(destination);
        }
        self
    }

    pub(crate) fn has_to(&self) -> bool {
        super::is_set(&self.to)
    }

    pub(crate) fn set_to(mut self, member_id: &str) -> Self {
        self.to = Some(member_by_id(member_id));
        self
    }

    /// Validates the builder and returns an unstored request (empty ID).
    ///
    /// # Errors
    ///
    /// - [`SdkError::MissingRedirectUrl`] / [`SdkError::InvalidRedirectUrl`]
    /// - [`SdkError::InvalidAmount`] for a bad transfer amount
    /// - [`SdkError::RefIdTooLong`] if the ref ID exceeds the limit
    pub fn build(&self) -> Result<TokenRequest, SdkError> {
        let redirect_url = self.redirect_url.as_deref().ok_or(SdkError::MissingRedirectUrl)?;
        validate_redirect_url(redirect_url)?;

        let request_body = match &self.body {
            Body::Transfer {
                lifetime_amount,
                currency,
                charge_amount,
                destinations,
            } => {
                let lifetime_amount = format_amount(*lifetime_amount)?;
                let amount = match charge_amount {
                    Some(charge) => format_amount(*charge)?,
                    None => lifetime_amount.clone(),
                };
                RequestBody::TransferBody(TransferBody {
                    lifetime_amount,
                    currency: currency.clone(),
                    amount,
                    destinations: destinations.clone(),
                    instructions: None,
                })
            }
            Body::Access(types) => RequestBody::AccessBody(AccessBody {
                resource_types: types.iter().map(|t| *t as i32).collect(),
            }),
        };
        let ref_id = resolve_ref_id(&self.ref_id)?;

        Ok(TokenRequest {
            id: String::new(),
            request_payload: Some(TokenRequestPayload {
                user_ref_id: self.user_ref_id.clone(),
                redirect_url: redirect_url.to_owned(),
                to: self.to.clone(),
                ref_id,
                description: self.description.clone(),
                callback_state: self.callback_state.clone(),
                request_body: Some(request_body),
            }),
            request_options: Some(TokenRequestOptions {
                bank_id: self.bank_id.clone(),
                from: self.from.clone(),
                source_account_id: self.source_account_id.clone(),
                receipt_requested: self.receipt_requested,
            }),
        })
    }
}

fn validate_redirect_url(redirect_url: &str) -> Result<(), SdkError> {
    let invalid = || SdkError::InvalidRedirectUrl(redirect_url.to_owned());
    let url = Url::parse(redirect_url).map_err(|_| invalid())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        _ => Err(invalid()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::iban_account;

    #[test]
    fn builds_transfer_request() {
        let request = TokenRequestBuilder::transfer(40.0, "EUR")
            .redirect_url("https://tpp.example/callback")
            .to_member_id("m:tpp")
            .bank_id("iron")
            .callback_state("cart=42")
            .add_destination(iban_account("DE89370400440532013000", ""))
            .ref_id("order-9")
            .build()
            .unwrap();

        assert!(request.id.is_empty());
        let payload = request.request_payload.unwrap();
        assert_eq!(payload.redirect_url, "https://tpp.example/callback");
        assert_eq!(payload.callback_state, "cart=42");
        assert_eq!(payload.ref_id, "order-9");
        let Some(RequestBody::TransferBody(body)) = payload.request_body else {
            panic!("not a transfer request");
        };
        assert_eq!(body.lifetime_amount, "40");
        assert_eq!(body.amount, "40");
        assert_eq!(body.destinations.len(), 1);
        assert_eq!(request.request_options.unwrap().bank_id, "iron");
    }

    #[test]
    fn builds_access_request() {
        let request = TokenRequestBuilder::access(&[ResourceType::Accounts, ResourceType::Balances])
            .redirect_url("http://localhost:3000/done")
            .charge_amount(5.0)
            .build()
            .unwrap();
        let Some(RequestBody::AccessBody(body)) = request.request_payload.unwrap().request_body
        else {
            panic!("not an access request");
        };
        assert_eq!(
            body.resource_types,
            vec![ResourceType::Accounts as i32, ResourceType::Balances as i32]
        );
    }

    #[test]
    fn redirect_url_is_required_and_http() {
        assert_eq!(
            TokenRequestBuilder::transfer(1.0, "EUR").build(),
            Err(SdkError::MissingRedirectUrl)
        );
        for bad in ["not a url", "ftp://tpp.example/cb", "/relative/path"] {
            assert_eq!(
                TokenRequestBuilder::transfer(1.0, "EUR").redirect_url(bad).build(),
                Err(SdkError::InvalidRedirectUrl(bad.into()))
            );
        }
    }

    #[test]
    fn transfer_amount_is_validated() {
        assert_eq!(
            TokenRequestBuilder::transfer(0.0, "EUR")
                .redirect_url("https://tpp.example/cb")
                .build(),
            Err(SdkError::InvalidAmount)
        );
    }
}
