//! Messages shared by every gateway call.

/// A monetary amount. `value` is a decimal string to avoid float rounding on
/// the wire.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Money {
    #[prost(string, tag = "1")]
    pub currency: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

/// A human-readable member handle.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Alias {
    #[prost(enumeration = "AliasType", tag = "1")]
    pub r#type: i32,
    #[prost(string, tag = "2")]
    pub value: String,
    #[prost(string, tag = "3")]
    pub realm: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum AliasType {
    Invalid = 0,
    Unknown = 1,
    Email = 2,
    Phone = 3,
    Domain = 4,
    Bank = 5,
    Custom = 6,
}

/// A member signature over some payload.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Signature {
    #[prost(string, tag = "1")]
    pub member_id: String,
    #[prost(string, tag = "2")]
    pub key_id: String,
    /// Unpadded base64url signature bytes.
    #[prost(string, tag = "3")]
    pub signature: String,
}

/// A member public key.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Key {
    #[prost(string, tag = "1")]
    pub id: String,
    /// Unpadded base64url public key bytes.
    #[prost(string, tag = "2")]
    pub public_key: String,
    #[prost(enumeration = "KeyLevel", tag = "3")]
    pub level: i32,
    #[prost(enumeration = "KeyAlgorithm", tag = "4")]
    pub algorithm: i32,
    /// Zero when the key does not expire.
    #[prost(int64, tag = "5")]
    pub expires_at_ms: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyLevel {
    InvalidLevel = 0,
    Privileged = 1,
    Standard = 2,
    Low = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum KeyAlgorithm {
    InvalidAlgorithm = 0,
    Ed25519 = 1,
}

/// Cursor for list calls. An empty `offset` starts from the beginning.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Page {
    #[prost(string, tag = "1")]
    pub offset: String,
    #[prost(int32, tag = "2")]
    pub limit: i32,
}

/// Outcome of a read that may need additional consent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, prost::Enumeration)]
#[repr(i32)]
pub enum RequestStatus {
    InvalidRequest = 0,
    SuccessfulRequest = 1,
    MoreSignaturesNeeded = 2,
}
