//! Member records and signed member updates.

use super::common::{Alias, Key};

#[derive(Clone, PartialEq, prost::Message)]
pub struct Member {
    #[prost(string, tag = "1")]
    pub id: String,
    /// Hash of the last applied update; the next update must reference it.
    #[prost(string, tag = "2")]
    pub last_hash: String,
    #[prost(string, repeated, tag = "3")]
    pub alias_hashes: Vec<String>,
    #[prost(message, repeated, tag = "4")]
    pub keys: Vec<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberAddKeyOperation {
    #[prost(message, optional, tag = "1")]
    pub key: Option<Key>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberRemoveKeyOperation {
    #[prost(string, tag = "1")]
    pub key_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberAliasOperation {
    #[prost(string, tag = "1")]
    pub alias_hash: String,
    #[prost(string, tag = "2")]
    pub realm: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberOperation {
    #[prost(oneof = "member_operation::Operation", tags = "1, 2, 3, 4")]
    pub operation: Option<member_operation::Operation>,
}

pub mod member_operation {
    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Operation {
        #[prost(message, tag = "1")]
        AddKey(super::MemberAddKeyOperation),
        #[prost(message, tag = "2")]
        RemoveKey(super::MemberRemoveKeyOperation),
        #[prost(message, tag = "3")]
        AddAlias(super::MemberAliasOperation),
        #[prost(message, tag = "4")]
        RemoveAlias(super::MemberAliasOperation),
    }
}

/// A batch of member operations. Signed with a privileged key.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberUpdate {
    #[prost(string, tag = "1")]
    pub prev_hash: String,
    #[prost(string, tag = "2")]
    pub member_id: String,
    #[prost(message, repeated, tag = "3")]
    pub operations: Vec<MemberOperation>,
}

/// Unsigned side data for an update, e.g. the plaintext of an added alias.
#[derive(Clone, PartialEq, prost::Message)]
pub struct MemberOperationMetadata {
    #[prost(oneof = "member_operation_metadata::Type", tags = "1")]
    pub r#type: Option<member_operation_metadata::Type>,
}

pub mod member_operation_metadata {
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct AddAliasMetadata {
        #[prost(string, tag = "1")]
        pub alias_hash: String,
        #[prost(message, optional, tag = "2")]
        pub alias: Option<super::Alias>,
    }

    #[derive(Clone, PartialEq, prost::Oneof)]
    pub enum Type {
        #[prost(message, tag = "1")]
        AddAliasMetadata(AddAliasMetadata),
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct Profile {
    #[prost(string, tag = "1")]
    pub display_name_first: String,
    #[prost(string, tag = "2")]
    pub display_name_last: String,
}
