//! Token payload builders.
//!
//! Each builder collects the fields of one token type and validates them in
//! `build_payload()` / `build()`. Builders never talk to the gateway; the
//! member fills in the issuer and submits the payload.

mod access;
mod standing_order;
mod token_request;
mod transfer;

pub use access::AccessTokenBuilder;
pub use standing_order::StandingOrderTokenBuilder;
pub use token_request::TokenRequestBuilder;
pub use transfer::TransferTokenBuilder;

use transport::proto::common::Alias;
use transport::proto::token::{
    BankAccount, IbanAccount, TokenAccount, TokenMember, TransferEndpoint, bank_account,
};

/// Token member referenced by ID.
pub fn member_by_id(member_id: &str) -> TokenMember {
    TokenMember {
        id: member_id.to_owned(),
        alias: None,
    }
}

/// Token member referenced by alias.
pub fn member_by_alias(alias: Alias) -> TokenMember {
    TokenMember {
        id: String::new(),
        alias: Some(alias),
    }
}

/// Endpoint for an account linked to a Token member.
pub fn token_account(member_id: &str, account_id: &str) -> TransferEndpoint {
    endpoint(bank_account::Account::Token(TokenAccount {
        member_id: member_id.to_owned(),
        account_id: account_id.to_owned(),
    }))
}

/// Endpoint for an IBAN account.
pub fn iban_account(iban: &str, bic: &str) -> TransferEndpoint {
    endpoint(bank_account::Account::Iban(IbanAccount {
        iban: iban.to_owned(),
        bic: bic.to_owned(),
    }))
}

fn endpoint(account: bank_account::Account) -> TransferEndpoint {
    TransferEndpoint {
        account: Some(BankAccount {
            account: Some(account),
        }),
        bank_id: String::new(),
    }
}

/// A member reference is usable when it names an ID or carries an alias.
pub(crate) fn is_set(member: &Option<TokenMember>) -> bool {
    member
        .as_ref()
        .is_some_and(|m| !m.id.is_empty() || m.alias.is_some())
}

/// Fills in `member_id` as the issuer when `from` names no member ID. An
/// alias already on `from` is kept.
pub(crate) fn with_issuer(from: Option<TokenMember>, member_id: &str) -> Option<TokenMember> {
    let mut member = from.unwrap_or_default();
    if member.id.is_empty() {
        member.id = member_id.to_owned();
    }
    Some(member)
}
