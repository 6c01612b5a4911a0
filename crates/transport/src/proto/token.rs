//! Tokens: payloads, bodies, endorsements.

use super::common::Signature;

/// A party named in a token payload.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenMember {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    pub alias: Option<super::common::Alias>,
}

/// Identifies the party a token is issued on behalf of.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ActingAs {
    #[prost(string, tag = "1")]
    pub display_name: String,
    #[prost(string, tag = "2")]
    pub ref_id: String,
    #[prost(string, tag = "3")]
    pub logo_url: String,
    #[prost(string, tag = "4")]
    pub secondary_name: String,
}

// ---------------------------------------------------------------------------
// Bank accounts and transfer endpoints
// ---------------------------------------------------------------------------

/// An account linked to a Token member.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenAccount {
    #[prost(string, tag = "1")]
    pub member_id: String,
    #[prost(string, tag = "2")]
    pub account_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct IbanAccount {
    #[prost(string, tag = "1")]
    pub iban: String,
    #[prost(string, tag = "2")]
    pub bic: String,
}

/// Bank-specific account reference.
#[derive(Clone, PartialEq, prost::Message)]
pub struct CustomAccount {
    #[prost(string, tag = "1")]
    pub bank_id: String,
    #[prost(string, tag = "2")]
    pub payload: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct BankAccount {
    #[prost(oneof = "bank_account::Account", tags = "1, 2, 3")]
    pub account: Option<bank_account::Account>,
}

pub mod bank_account {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Account {
        #[prost(message, tag = "1")]
        Token(super::TokenAccount),
        #[prost(message, tag = "2")]
        Iban(super::IbanAccount),
        #[prost(message, tag = "3")]
        Custom(super::CustomAccount),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransferEndpoint {
    #[prost(message, optional, tag = "1")]
    pub account: Option<BankAccount>,
    #[prost(string, tag = "2")]
    pub bank_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum PurposeOfPayment {
    InvalidPurpose = 0,
    Other = 1,
    PersonalExpenses = 2,
    PurchaseOfGoods = 3,
    PurchaseOfServices = 4,
    Education = 5,
    Rent = 6,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransferInstructions {
    #[prost(message, optional, tag = "1")]
    pub source: Option<TransferEndpoint>,
    #[prost(message, repeated, tag = "2")]
    pub destinations: Vec<TransferEndpoint>,
    #[prost(enumeration = "PurposeOfPayment", tag = "3")]
    pub purpose_of_payment: i32,
}

// ---------------------------------------------------------------------------
// Bodies
// ---------------------------------------------------------------------------

/// Authorizes moving up to `lifetime_amount` from the source account.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TransferBody {
    #[prost(string, tag = "1")]
    pub lifetime_amount: String,
    #[prost(string, tag = "2")]
    pub currency: String,
    /// Maximum per-redemption charge. Empty means the lifetime amount.
    #[prost(string, tag = "3")]
    pub amount: String,
    #[prost(message, optional, tag = "4")]
    pub instructions: Option<TransferInstructions>,
    /// Final recipient of the funds, when different from the redeemer.
    #[prost(message, optional, tag = "5")]
    pub payee: Option<TokenMember>,
}

/// Grants the redeemer read access to the listed resources.
#[derive(Clone, PartialEq, prost::Message)]
pub struct AccessBody {
    #[prost(message, repeated, tag = "1")]
    pub resources: Vec<access_body::Resource>,
}

pub mod access_body {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct Resource {
        #[prost(oneof = "resource::Resource", tags = "1, 2, 3, 4, 5, 6, 7, 8, 9, 10")]
        pub resource: Option<resource::Resource>,
    }

    pub mod resource {
        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AllAddresses {}

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Address {
            #[prost(string, tag = "1")]
            pub address_id: String,
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AllAccounts {}

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct Account {
            #[prost(string, tag = "1")]
            pub account_id: String,
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AllTransactions {}

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AccountTransactions {
            #[prost(string, tag = "1")]
            pub account_id: String,
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AllBalances {}

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AccountBalance {
            #[prost(string, tag = "1")]
            pub account_id: String,
        }

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct AllTransferDestinations {}

        #[derive(Clone, PartialEq, prost::Message)]
        pub struct TransferDestinations {
            #[prost(string, tag = "1")]
            pub account_id: String,
        }

        #[derive(Clone, PartialEq, prost::Oneof)]
        pub enum Resource {
            #[prost(message, tag = "1")]
            AllAddresses(AllAddresses),
            #[prost(message, tag = "2")]
            Address(Address),
            #[prost(message, tag = "3")]
            AllAccounts(AllAccounts),
            #[prost(message, tag = "4")]
            Account(Account),
            #[prost(message, tag = "5")]
            AllTransactions(AllTransactions),
            #[prost(message, tag = "6")]
            AccountTransactions(AccountTransactions),
            #[prost(message, tag = "7")]
            AllBalances(AllBalances),
            #[prost(message, tag = "8")]
            AccountBalance(AccountBalance),
            #[prost(message, tag = "9")]
            AllTransferDestinations(AllTransferDestinations),
            #[prost(message, tag = "10")]
            TransferDestinations(TransferDestinations),
        }
    }
}

/// Authorizes a recurring charge of `amount` between two dates.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StandingOrderBody {
    #[prost(string, tag = "1")]
    pub amount: String,
    #[prost(string, tag = "2")]
    pub currency: String,
    /// ISO 20022 frequency code.
    #[prost(string, tag = "3")]
    pub frequency: String,
    /// `YYYY-MM-DD`.
    #[prost(string, tag = "4")]
    pub start_date: String,
    /// `YYYY-MM-DD`. Empty for an open-ended order.
    #[prost(string, tag = "5")]
    pub end_date: String,
    #[prost(message, optional, tag = "6")]
    pub instructions: Option<TransferInstructions>,
}

// ---------------------------------------------------------------------------
// Token
// ---------------------------------------------------------------------------

#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenPayload {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(string, tag = "2")]
    pub ref_id: String,
    #[prost(message, optional, tag = "3")]
    pub issuer: Option<TokenMember>,
    #[prost(message, optional, tag = "4")]
    pub from: Option<TokenMember>,
    /// The redeemer.
    #[prost(message, optional, tag = "5")]
    pub to: Option<TokenMember>,
    #[prost(int64, tag = "6")]
    pub effective_at_ms: i64,
    #[prost(int64, tag = "7")]
    pub expires_at_ms: i64,
    #[prost(int64, tag = "8")]
    pub endorse_until_ms: i64,
    #[prost(string, tag = "9")]
    pub description: String,
    #[prost(oneof = "token_payload::Body", tags = "10, 11, 12")]
    pub body: Option<token_payload::Body>,
    #[prost(message, optional, tag = "13")]
    pub acting_as: Option<ActingAs>,
    #[prost(bool, tag = "14")]
    pub receipt_requested: bool,
    #[prost(string, tag = "15")]
    pub token_request_id: String,
}

pub mod token_payload {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Body {
        #[prost(message, tag = "10")]
        Transfer(super::TransferBody),
        #[prost(message, tag = "11")]
        Access(super::AccessBody),
        #[prost(message, tag = "12")]
        StandingOrder(super::StandingOrderBody),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TokenAction {
    InvalidAction = 0,
    Endorsed = 1,
    Cancelled = 2,
}

impl TokenAction {
    /// Suffix appended to the payload bytes before signing.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::InvalidAction => "invalid",
            Self::Endorsed => "endorsed",
            Self::Cancelled => "cancelled",
        }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenSignature {
    #[prost(enumeration = "TokenAction", tag = "1")]
    pub action: i32,
    #[prost(message, optional, tag = "2")]
    pub signature: Option<Signature>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Token {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    pub payload: Option<TokenPayload>,
    #[prost(message, repeated, tag = "3")]
    pub payload_signatures: Vec<TokenSignature>,
    #[prost(string, tag = "4")]
    pub replaced_by_token_id: String,
    #[prost(string, tag = "5")]
    pub token_request_id: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TokenOperationStatus {
    InvalidOperation = 0,
    Success = 1,
    MoreSignaturesNeeded = 2,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenOperationResult {
    #[prost(message, optional, tag = "1")]
    pub token: Option<Token>,
    #[prost(enumeration = "TokenOperationStatus", tag = "2")]
    pub status: i32,
}

/// Result of submitting a transfer or standing-order payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TransferTokenStatus {
    InvalidTransferStatus = 0,
    Success = 1,
    FailureRejected = 2,
    FailureInsufficientFunds = 3,
    FailureInvalidCurrency = 4,
    FailureSourceAccountNotFound = 5,
    FailureDestinationAccountNotFound = 6,
    FailureInvalidAmount = 7,
    FailureExternalAuthorizationRequired = 8,
    FailureGeneric = 9,
}

impl TransferTokenStatus {
    /// Enum value name as it appears in the `.proto` file.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            Self::InvalidTransferStatus => "INVALID_TRANSFER_STATUS",
            Self::Success => "SUCCESS",
            Self::FailureRejected => "FAILURE_REJECTED",
            Self::FailureInsufficientFunds => "FAILURE_INSUFFICIENT_FUNDS",
            Self::FailureInvalidCurrency => "FAILURE_INVALID_CURRENCY",
            Self::FailureSourceAccountNotFound => "FAILURE_SOURCE_ACCOUNT_NOT_FOUND",
            Self::FailureDestinationAccountNotFound => "FAILURE_DESTINATION_ACCOUNT_NOT_FOUND",
            Self::FailureInvalidAmount => "FAILURE_INVALID_AMOUNT",
            Self::FailureExternalAuthorizationRequired => {
                "FAILURE_EXTERNAL_AUTHORIZATION_REQUIRED"
            }
            Self::FailureGeneric => "FAILURE_GENERIC",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TokenType {
    InvalidTokenType = 0,
    Transfer = 1,
    Access = 2,
    StandingOrder = 3,
}
