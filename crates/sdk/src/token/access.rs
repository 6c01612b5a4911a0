//! Access token builder.

use config::constants::TOKEN_PAYLOAD_VERSION;
use transport::proto::common::Alias;
use transport::proto::token::access_body::{Resource, resource};
use transport::proto::token::{AccessBody, ActingAs, TokenMember, TokenPayload, token_payload};
use transport::proto::token_request::TokenRequest;
use transport::proto::token_request::token_request_payload::{RequestBody, ResourceType};

use super::{member_by_alias, member_by_id, with_issuer};
use crate::SdkError;
use crate::utils::resolve_ref_id;

/// Builds the payload of an access token granting `to` read access to the
/// issuer's resources.
#[derive(Debug, Clone)]
pub struct AccessTokenBuilder {
    payload: TokenPayload,
    resources: Vec<Resource>,
}

impl AccessTokenBuilder {
    /// Grants access to the member registered under `alias`.
    pub fn to_alias(alias: Alias) -> Self {
        Self::to(member_by_alias(alias))
    }

    /// Grants access to the member `member_id`.
    pub fn to_member_id(member_id: &str) -> Self {
        Self::to(member_by_id(member_id))
    }

    pub(crate) fn to(member: TokenMember) -> Self {
        Self {
            payload: TokenPayload {
                version: TOKEN_PAYLOAD_VERSION.to_owned(),
                to: Some(member),
                ..Default::default()
            },
            resources: Vec::new(),
        }
    }

    /// Starts from an existing access token payload, for replacing that
    /// token. Resources are cleared and the ref ID regenerated.
    ///
    /// # Errors
    ///
    /// [`SdkError::WrongTokenBody`] if `payload` is not an access token.
    pub fn from_payload(payload: &TokenPayload) -> Result<Self, SdkError> {
        let Some(token_payload::Body::Access(_)) = payload.body else {
            return Err(SdkError::WrongTokenBody);
        };
        Ok(Self {
            payload: TokenPayload {
                ref_id: String::new(),
                body: None,
                ..payload.clone()
            },
            resources: Vec::new(),
        })
    }

    /// Prefills a builder from a stored access token request. Every
    /// requested resource type becomes an all-accounts grant.
    ///
    /// # Errors
    ///
    /// [`SdkError::WrongTokenRequestBody`] if the request is not for access.
    pub fn from_token_request(request: &TokenRequest) -> Result<Self, SdkError> {
        let payload = request.request_payload.clone().unwrap_or_default();
        let Some(RequestBody::AccessBody(body)) = payload.request_body else {
            return Err(SdkError::WrongTokenRequestBody);
        };
        let options = request.request_options.clone().unwrap_or_default();

        let mut builder = Self::to(payload.to.unwrap_or_default());
        builder.payload.ref_id = payload.ref_id;
        builder.payload.description = payload.description;
        builder.payload.from = options.from;
        builder.payload.receipt_requested = options.receipt_requested;
        builder.payload.token_request_id = request.id.clone();

        for kind in body.resource_types() {
            builder = match kind {
                ResourceType::Accounts => builder.for_all_accounts(),
                ResourceType::Balances => builder.for_all_balances(),
                ResourceType::Transactions => builder.for_all_transactions(),
                ResourceType::TransferDestinations => builder.for_all_transfer_destinations(),
                ResourceType::InvalidResource => builder,
            };
        }
        Ok(builder)
    }

    // -- Resources ----------------------------------------------------------

    pub fn for_all_addresses(self) -> Self {
        self.grant(resource::Resource::AllAddresses(resource::AllAddresses {}))
    }

    pub fn for_address(self, address_id: &str) -> Self {
        self.grant(resource::Resource::Address(resource::Address {
            address_id: address_id.to_owned(),
        }))
    }

    pub fn for_all_accounts(self) -> Self {
        self.grant(resource::Resource::AllAccounts(resource::AllAccounts {}))
    }

    pub fn for_account(self, account_id: &str) -> Self {
        self.grant(resource::Resource::Account(resource::Account {
            account_id: account_id.to_owned(),
        }))
    }

    pub fn for_all_transactions(self) -> Self {
        self.grant(resource::Resource::AllTransactions(resource::AllTransactions {}))
    }

    pub fn for_account_transactions(self, account_id: &str) -> Self {
        self.grant(resource::Resource::AccountTransactions(
            resource::AccountTransactions {
                account_id: account_id.to_owned(),
            },
        ))
    }

    pub fn for_all_balances(self) -> Self {
        self.grant(resource::Resource::AllBalances(resource::AllBalances {}))
    }

    pub fn for_account_balances(self, account_id: &str) -> Self {
        self.grant(resource::Resource::AccountBalance(resource::AccountBalance {
            account_id: account_id.to_owned(),
        }))
    }

    pub fn for_all_transfer_destinations(self) -> Self {
        self.grant(resource::Resource::AllTransferDestinations(
            resource::AllTransferDestinations {},
        ))
    }

    pub fn for_transfer_destinations(self, account_id: &str) -> Self {
        self.grant(resource::Resource::TransferDestinations(
            resource::TransferDestinations {
                account_id: account_id.to_owned(),
            },
        ))
    }

    fn grant(mut self, resource: resource::Resource) -> Self {
        self.resources.push(Resource {
            resource: Some(resource),
        });
        self
    }

    // -- Other fields -------------------------------------------------------

    /// Marks the token as issued on behalf of a third party.
    pub fn act_as(mut self, acting_as: ActingAs) -> Self {
        self.payload.acting_as = Some(acting_as);
        self
    }

    /// Grantor of the token. Filled with the issuing member when unset.
    pub fn from(mut self, member_id: &str) -> Self {
        self.payload.from = Some(member_by_id(member_id));
        self
    }

    pub fn ref_id(mut self, ref_id: &str) -> Self {
        self.payload.ref_id = ref_id.to_owned();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.payload.description = description.to_owned();
        self
    }

    pub fn effective_at_ms(mut self, at_ms: i64) -> Self {
        self.payload.effective_at_ms = at_ms;
        self
    }

    pub fn expires_at_ms(mut self, at_ms: i64) -> Self {
        self.payload.expires_at_ms = at_ms;
        self
    }

    pub fn token_request_id(mut self, token_request_id: &str) -> Self {
        self.payload.token_request_id = token_request_id.to_owned();
        self
    }

    /// Fills in the issuing member when the payer is not named by ID.
    pub(crate) fn issued_by(mut self, member_id: &str) -> Self {
        self.payload.from = with_issuer(self.payload.from.take(), member_id);
        self
    }

    pub(crate) fn token_request(&self) -> &str {
        &self.payload.token_request_id
    }

    /// Validates the builder and returns the token payload.
    ///
    /// # Errors
    ///
    /// [`SdkError::MissingResources`] if nothing is granted,
    /// [`SdkError::RefIdTooLong`] if the ref ID exceeds the limit.
    pub fn build(&self) -> Result<TokenPayload, SdkError> {
        if self.resources.is_empty() {
            return Err(SdkError::MissingResources);
        }
        let ref_id = resolve_ref_id(&self.payload.ref_id)?;
        Ok(TokenPayload {
            ref_id,
            body: Some(token_payload::Body::Access(AccessBody {
                resources: self.resources.clone(),
            })),
            ..self.payload.clone()
        })
    }
}
