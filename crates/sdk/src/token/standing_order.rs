//! Standing order token builder.

use chrono::NaiveDate;
use config::constants::{STANDING_ORDER_FREQUENCIES, TOKEN_PAYLOAD_VERSION};
use transport::proto::common::Alias;
use transport::proto::token::{
    ActingAs, PurposeOfPayment, StandingOrderBody, TokenMember, TokenPayload, TransferEndpoint,
    TransferInstructions, token_payload,
};

use super::{is_set, member_by_alias, member_by_id, token_account, with_issuer};
use crate::SdkError;
use crate::utils::{format_amount, resolve_ref_id};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Builds the payload of a standing order token: `amount` charged every
/// `frequency` period between `start_date` and `end_date`.
///
/// Frequencies are ISO 20022 codes (`DAIL`, `WEEK`, `TOWK`, `MNTH`, `TOMN`,
/// `QUTR`, `SEMI`, `YEAR`). Dates are `YYYY-MM-DD`; an empty end date leaves
/// the order open-ended.
#[derive(Debug, Clone)]
pub struct StandingOrderTokenBuilder {
    amount: f64,
    currency: String,
    frequency: String,
    start_date: String,
    end_date: String,
    source: Option<TransferEndpoint>,
    source_account_id: Option<String>,
    destinations: Vec<TransferEndpoint>,
    redeemer: Option<TokenMember>,
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

impl StandingOrderTokenBuilder {
    pub fn new(
        amount: f64,
        currency: &str,
        frequency: &str,
        start_date: &str,
        end_date: &str,
    ) -> Self {
        Self {
            amount,
            currency: currency.to_owned(),
            frequency: frequency.to_owned(),
            start_date: start_date.to_owned(),
            end_date: end_date.to_owned(),
            source: None,
            source_account_id: None,
            destinations: Vec::new(),
            redeemer: None,
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

    pub fn source(mut self, source: TransferEndpoint) -> Self {
        self.source = Some(source);
        self
    }

    /// Charges the issuer's linked account `account_id`.
    pub fn account_id(mut self, account_id: &str) -> Self {
        self.source_account_id = Some(account_id.to_owned());
        self
    }

    pub fn add_destination(mut self, destination: TransferEndpoint) -> Self {
        self.destinations.push(destination);
        self
    }

    pub fn redeemer_member_id(mut self, member_id: &str) -> Self {
        self.redeemer = Some(member_by_id(member_id));
        self
    }

    pub fn redeemer_alias(mut self, alias: Alias) -> Self {
        self.redeemer = Some(member_by_alias(alias));
        self
    }

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
    /// - [`SdkError::InvalidAmount`] if the amount is not finite and positive
    /// - [`SdkError::InvalidFrequency`] for an unknown frequency code
    /// - [`SdkError::InvalidDate`] / [`SdkError::InvalidDateRange`] for bad dates
    /// - [`SdkError::MissingSource`], [`SdkError::MissingRedeemer`]
    /// - [`SdkError::RefIdTooLong`] if the ref ID exceeds the limit
    pub fn build_payload(&self) -> Result<TokenPayload, SdkError> {
        let amount = format_amount(self.amount)?;
        if !STANDING_ORDER_FREQUENCIES.contains(&self.frequency.as_str()) {
            return Err(SdkError::InvalidFrequency(self.frequency.clone()));
        }
        let start = parse_date(&self.start_date)?;
        if !self.end_date.is_empty() && parse_date(&self.end_date)? < start {
            return Err(SdkError::InvalidDateRange);
        }

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

        let body = StandingOrderBody {
            amount,
            currency: self.currency.clone(),
            frequency: self.frequency.clone(),
            start_date: self.start_date.clone(),
            end_date: self.end_date.clone(),
            instructions: Some(TransferInstructions {
                source: Some(source),
                destinations: self.destinations.clone(),
                purpose_of_payment: self.purpose_of_payment as i32,
            }),
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
            body: Some(token_payload::Body::StandingOrder(body)),
            acting_as: self.acting_as.clone(),
            receipt_requested: self.receipt_requested,
            token_request_id: self.token_request_id.clone(),
        })
    }
}

fn parse_date(date: &str) -> Result<NaiveDate, SdkError> {
    NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| SdkError::InvalidDate(date.to_owned()))
}
