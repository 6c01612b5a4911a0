//! Transfers: redemptions of transfer tokens.

use super::account::TransactionStatus;
use super::common::{Money, Signature};
use super::token::TransferEndpoint;

#[derive(Clone, PartialEq, prost::Message)]
pub struct TransferPayload {
    #[prost(string, tag = "1")]
    pub ref_id: String,
    #[prost(string, tag = "2")]
    pub token_id: String,
    #[prost(message, optional, tag = "3")]
    pub amount: Option<Money>,
    #[prost(message, repeated, tag = "4")]
    pub destinations: Vec<TransferEndpoint>,
    #[prost(string, tag = "5")]
    pub description: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Transfer {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub transaction_id: String,
    #[prost(int64, tag = "3")]
    pub created_at_ms: i64,
    #[prost(message, optional, tag = "4")]
    pub payload: Option<TransferPayload>,
    #[prost(message, repeated, tag = "5")]
    pub payload_signatures: Vec<Signature>,
    #[prost(enumeration = "TransactionStatus", tag = "6")]
    pub status: i32,
}
