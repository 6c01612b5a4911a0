//! Linked bank accounts, balances and transactions.

use super::common::Money;

#[derive(Clone, PartialEq, prost::Message)]
pub struct Account {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub bank_id: String,
    #[prost(bool, tag = "4")]
    pub is_locked: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Balance {
    #[prost(string, tag = "1")]
    pub account_id: String,
    #[prost(message, optional, tag = "2")]
    pub current: Option<Money>,
    #[prost(message, optional, tag = "3")]
    pub available: Option<Money>,
    #[prost(int64, tag = "4")]
    pub updated_at_ms: i64,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Transaction {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "TransactionType", tag = "2")]
    pub r#type: i32,
    #[prost(enumeration = "TransactionStatus", tag = "3")]
    pub status: i32,
    #[prost(message, optional, tag = "4")]
    pub amount: Option<Money>,
    #[prost(string, tag = "5")]
    pub description: String,
    #[prost(string, tag = "6")]
    pub token_id: String,
    #[prost(string, tag = "7")]
    pub token_transfer_id: String,
    #[prost(int64, tag = "8")]
    pub created_at_ms: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TransactionType {
    InvalidType = 0,
    Debit = 1,
    Credit = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum TransactionStatus {
    InvalidStatus = 0,
    Pending = 1,
    Processing = 2,
    Success = 3,
    PendingExternalAuthorization = 4,
    FailureGeneric = 5,
    FailureInsufficientFunds = 6,
    FailureCanceled = 7,
    FailureExpired = 8,
    Sent = 9,
}
