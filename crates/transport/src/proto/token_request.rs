//! Stored token requests, completed through the web-app redirect flow.

use super::token::{TokenMember, TransferEndpoint, TransferInstructions};

#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenRequestPayload {
    #[prost(string, tag = "1")]
    pub user_ref_id: String,
    #[prost(string, tag = "2")]
    pub redirect_url: String,
    /// The requesting party, who will redeem the token.
    #[prost(message, optional, tag = "3")]
    pub to: Option<TokenMember>,
    #[prost(string, tag = "4")]
    pub ref_id: String,
    #[prost(string, tag = "5")]
    pub description: String,
    #[prost(string, tag = "6")]
    pub callback_state: String,
    #[prost(oneof = "token_request_payload::RequestBody", tags = "7, 8")]
    pub request_body: Option<token_request_payload::RequestBody>,
}

pub mod token_request_payload {
    use super::{TransferEndpoint, TransferInstructions};

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct TransferBody {
        #[prost(string, tag = "1")]
        pub lifetime_amount: String,
        #[prost(string, tag = "2")]
        pub currency: String,
        #[prost(string, tag = "3")]
        pub amount: String,
        #[prost(message, repeated, tag = "4")]
        pub destinations: Vec<TransferEndpoint>,
        #[prost(message, optional, tag = "5")]
        pub instructions: Option<TransferInstructions>,
    }

    /// Resource types the requester wants access to.
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AccessBody {
        #[prost(enumeration = "ResourceType", repeated, tag = "1")]
        pub resource_types: Vec<i32>,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
    #[repr(i32)]
    pub enum ResourceType {
        InvalidResource = 0,
        Accounts = 1,
        Balances = 2,
        Transactions = 3,
        TransferDestinations = 4,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum RequestBody {
        #[prost(message, tag = "7")]
        TransferBody(TransferBody),
        #[prost(message, tag = "8")]
        AccessBody(AccessBody),
    }
}

/// Options the member may still change when completing the request.
#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenRequestOptions {
    #[prost(string, tag = "1")]
    pub bank_id: String,
    #[prost(message, optional, tag = "2")]
    pub from: Option<TokenMember>,
    #[prost(string, tag = "3")]
    pub source_account_id: String,
    #[prost(bool, tag = "4")]
    pub receipt_requested: bool,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct TokenRequest {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, optional, tag = "2")]
    pub request_payload: Option<TokenRequestPayload>,
    #[prost(message, optional, tag = "3")]
    pub request_options: Option<TokenRequestOptions>,
}
