//! A linked bank account.

use std::fmt;

use signer::KeyLevel;
use transport::proto::account::{self as proto, Balance, Transaction};
use transport::{Gateway, GrpcTransport};

use crate::{Member, PagedList, SdkError};

/// A bank account linked to a member. Reads go through the owning member.
pub struct Account<G = GrpcTransport> {
    member: Member<G>,
    proto: proto::Account,
}

impl<G> Clone for Account<G> {
    fn clone(&self) -> Self {
        Self {
            member: self.member.clone(),
            proto: self.proto.clone(),
        }
    }
}

impl<G> fmt::Debug for Account<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("member_id", &self.member.member_id())
            .field("proto", &self.proto)
            .finish()
    }
}

impl<G: Gateway> Account<G> {
    pub(crate) fn new(member: Member<G>, proto: proto::Account) -> Self {
        Self { member, proto }
    }

    pub fn id(&self) -> &str {
        &self.proto.id
    }

    pub fn name(&self) -> &str {
        &self.proto.name
    }

    pub fn bank_id(&self) -> &str {
        &self.proto.bank_id
    }

    pub fn is_locked(&self) -> bool {
        self.proto.is_locked
    }

    /// The member that owns this account.
    pub fn member(&self) -> &Member<G> {
        &self.member
    }

    pub fn proto(&self) -> &proto::Account {
        &self.proto
    }

    pub async fn get_balance(&self, level: KeyLevel) -> Result<Balance, SdkError> {
        self.member.get_balance(self.id(), level).await
    }

    pub async fn get_transaction(
        &self,
        transaction_id: &str,
        level: KeyLevel,
    ) -> Result<Transaction, SdkError> {
        self.member
            .get_transaction(self.id(), transaction_id, level)
            .await
    }

    pub async fn get_transactions(
        &self,
        offset: Option<&str>,
        limit: i32,
        level: KeyLevel,
    ) -> Result<PagedList<Transaction>, SdkError> {
        self.member
            .get_transactions(self.id(), offset, limit, level)
            .await
    }
}
