//! Transfer token builder.

use config::constants::TOKEN_PAYLOAD_VERSION;
use transport::proto::common::Alias;
use transport::proto::token::{
    ActingAs, PurposeOfPayment, TokenMember, TokenPayload, TransferBody, TransferEndpoint,
    TransferInstructions, token_payload,
};
use transport::proto::token_request::{TokenRequest, token_request_payload::RequestBody};

use super::{is_set, member_by_alias, member_by_id, token_account, with_issuer};
use crate::SdkError;
use crate::utils::{format_amount, resolve_ref_id};

/// Builds the payload of a transfer token.
///
/// ```
/// use sdk::token::{TransferTokenBuilder, iban_account, token_account};
///
/// let payload = TransferTokenBuilder::new(100.0, "EUR")
///     .source(token_account("m:payer", "a:checking"))
///     .add_destination(iban_account("DE89370400440532013000", "COBADEFFXXX"))
///     .redeemer_member_id("m:merchant")
///     .ref_id("order-1234")
///     .build_payload()
///     .unwrap();
/// assert_eq!(payload.ref_id, "order-1234");
/// ```
#[derive(Debug, Clone)]
pub struct TransferTokenBuilder {
    lifetime_amount: f64,
    currency: String,
    charge_amount: Option<f64>,
    source: Option<TransferEndpoint>,
    source_account_id: Option<String>,
    destinations: Vec<TransferEndpoint>,
    redeemer: Option<TokenMember>,
    payee: Option<TokenMember>,
    from: Option<TokenMember>,
    effective_at_ms: i64,
    expires_at_ms: i64,
    endorse_until_ms: i64,
    description: String,
    ref_id: String,
    purpose_of_payment: PurposeOfPayment,
    acting_as: Option<ActingAs>,
    token_request_id: String,
    receipt_requested: bool,
}

impl TransferTokenBuilder {
    /// Starts a transfer of up to `amount` in `currency` over the token's
    /// lifetime.
    pub fn new(amount: f64, currency: &str) -> Self {
        Self {
            lifetime_amount: amount,
            currency: currency.to_owned(),
            charge_amount: None,
            source: None,
            source_account_id: None,
            destinations: Vec::new(),
            redeemer: None,
            payee: None,
            from: None,
            effective_at_ms: 0,
            expires_at_ms: 0,
            endorse_until_ms: 0,
            description: String::new(),
            ref_id: String::new(),
            purpose_of_payment: PurposeOfPayment::InvalidPurpose,
            acting_as: None,
            token_request_id: String::new(),
            receipt_requested: false,
        }
    }

    /// Prefills a builder from a stored transfer token request.
    ///
    /// # Errors
    ///
    /// [`SdkError::WrongTokenRequestBody`] if the request is not for a
    /// transfer, [`SdkError::InvalidAmount`] if its amount does not parse.
    pub fn from_token_request(request: &TokenRequest) -> Result<Self, SdkError> {
        let payload = request.request_payload.clone().unwrap_or_default();
        let Some(RequestBody::TransferBody(body)) = payload.request_body else {
            return Err(SdkError::WrongTokenRequestBody);
        };
        let options = request.request_options.clone().unwrap_or_default();

        let lifetime_amount = parse_amount(&body.lifetime_amount)?;
        let mut builder = Self::new(lifetime_amount, &body.currency)
            .description(&payload.description)
            .ref_id(&payload.ref_id)
            .token_request_id(&request.id)
            .receipt_requested(options.receipt_requested);

        if !body.amount.is_empty() {
            builder = builder.charge_amount(parse_amount(&body.amount)?);
        }
        builder.redeemer = payload.to;
        builder.from = options.from;
        if !options.source_account_id.is_empty() {
            builder.source_account_id = Some(options.source_account_id);
        }

        // Newer requests carry instructions; older ones list destinations
        // directly on the body.
        match body.instructions {
            Some(instructions) => {
                builder.source = instructions.source;
                builder.destinations = instructions.destinations;
                builder.purpose_of_payment = PurposeOfPayment::try_from(
                    instructions.purpose_of_payment,
                )
                .unwrap_or(PurposeOfPayment::InvalidPurpose);
            }
            None => builder.destinations = body.destinations,
        }
        Ok(builder)
    }

    /// Account the funds are drawn from.
    pub fn source(mut self, source: TransferEndpoint) -> Self {
        self.source = Some(source);
        self
    }

    /// Draws funds from the issuer's linked account `account_id`.
    pub fn account_id(mut self, account_id: &str) -> Self {
        self.source_account_id = Some(account_id.to_owned());
        self
    }

    pub fn add_destination(mut self, destination: TransferEndpoint) -> Self {
        self.destinations.push(destination);
        self
    }

    /// Member allowed to redeem the token.
    pub fn redeemer_member_id(mut self, member_id: &str) -> Self {
        self.redeemer = Some(member_by_id(member_id));
        self
    }

    pub fn redeemer_alias(mut self, alias: Alias) -> Self {
        self.redeemer = Some(member_by_alias(alias));
        self
    }

    /// Payee of the transfer, when different from the redeemer.
    pub fn to_member_id(mut self, member_id: &str) -> Self {
        self.payee = Some(member_by_id(member_id));
        self
    }

    pub fn to_alias(mut self, alias: Alias) -> Self {
        self.payee = Some(member_by_alias(alias));
        self
    }

    /// Payer of the transfer. Filled with the issuing member when unset.
    pub fn from(mut self, member_id: &str) -> Self {
        self.from = Some(member_by_id(member_id));
        self
    }

    pub fn effective_at_ms(mut self, at_ms: i64) -> Self {
        self.effective_at_ms = at_ms;
        self
    }

    pub fn expires_at_ms(mut self, at_ms: i64) -> Self {
        self.expires_at_ms = at_ms;
        self
    }

    pub fn endorse_until_ms(mut self, at_ms: i64) -> Self {
        self.endorse_until_ms = at_ms;
        self
    }

    /// Amount of a single charge. Defaults to the lifetime amount.
    pub fn charge_amount(mut self, amount: f64) -> Self {
        self.charge_amount = Some(amount);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = description.to_owned();
        self
    }

    pub fn ref_id(mut self, ref_id: &str) -> Self {
        self.ref_id = ref_id.to_owned();
        self
    }

    pub fn purpose_of_payment(mut self, purpose: PurposeOfPayment) -> Self {
        self.purpose_of_payment = purpose;
        self
    }

    pub fn acting_as(mut self, acting_as: ActingAs) -> Self {
        self.acting_as = Some(acting_as);
        self
    }

    pub fn token_request_id(mut self, token_request_id: &str) -> Self {
        self.token_request_id = token_request_id.to_owned();
        self
    }

    pub fn receipt_requested(mut self, requested: bool) -> Self {
        self.receipt_requested = requested;
        self
    }

    /// Fills in the issuing member when the payer is not named by ID.
    pub(crate) fn issued_by(mut self, member_id: &str) -> Self {
        self.from = with_issuer(self.from.take(), member_id);
        self
    }

    pub(crate) fn token_request(&self) -> &str {
        &self.token_request_id
    }

    /// Validates the builder and returns the token payload.
    ///
    /// # Errors
    ///
    /// - [`SdkError::InvalidAmount`] if an amount is not finite and positive
    /// - [`SdkError::MissingSource`] if no source account is set
    /// - [`SdkError::MissingRedeemer`] if no redeemer is set
    /// - [`SdkError::RefIdTooLong`] if the ref ID exceeds the limit
    pub fn build_payload(&self) -> Result<TokenPayload, SdkError> {
        let lifetime_amount = format_amount(self.lifetime_amount)?;
        let amount = match self.charge_amount {
            Some(charge) => format_amount(charge)?,
            None => lifetime_amount.clone(),
        };

        let source = match (&self.source, &self.source_account_id) {
            (Some(source), _) => source.clone(),
            (None, Some(account_id)) => {
                let member_id = self.from.as_ref().map(|m| m.id.as_str()).unwrap_or_default();
                token_account(member_id, account_id)
            }
            (None, None) => return Err(SdkError::MissingSource),
        };
        if !is_set(&self.redeemer) {
            return Err(SdkError::MissingRedeemer);
        }
        let ref_id = resolve_ref_id(&self.ref_id)?;

        let body = TransferBody {
            lifetime_amount,
            currency: self.currency.clone(),
            amount,
            instructions: Some(TransferInstructions {
                source: Some(source),
                destinations: self.destinations.clone(),
                purpose_of_payment: self.purpose_of_payment as i32,
            }),
            payee: self.payee.clone(),
        };

        Ok(TokenPayload {
            version: TOKEN_PAYLOAD_VERSION.to_owned(),
            ref_id,
            issuer: None,
            from: self.from.clone(),
            to: self.redeemer.clone(),
            effective_at_ms: self.effective_at_ms,
            expires_at_ms: self.expires_at_ms,
            endorse_until_ms: self.endorse_until_ms,
            description: self.description.clone(),
            body: Some(token_payload::Body::Transfer(body)),
            acting_as: self.acting_as.clone(),
            receipt_requested: self.receipt_requested,
            token_request_id: self.token_request_id.clone(),
        })
    }
}

fn parse_amount(value: &str) -> Result<f64, SdkError> {
    value.parse().map_err(|_| SdkError::InvalidAmount)
}
