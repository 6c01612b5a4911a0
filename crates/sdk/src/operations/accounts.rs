//! Linked bank accounts, balances and transactions.
//!
//! Reads default to the low key; a bank may still demand more consent, in
//! which case the gateway answers `MORE_SIGNATURES_NEEDED` and the call
//! fails with [`SdkError::StepUpRequired`]. Retry with a higher key level.

use signer::KeyLevel;
use transport::proto::account::{Balance, Transaction};
use transport::proto::common::RequestStatus;
use transport::proto::gateway::{
    GetAccountRequest, GetAccountResponse, GetAccountsRequest, GetAccountsResponse,
    GetBalanceRequest, GetBalanceResponse, GetBalancesRequest, GetBalancesResponse,
    GetDefaultAccountRequest, GetDefaultAccountResponse, GetTransactionRequest,
    GetTransactionResponse, GetTransactionsRequest, GetTransactionsResponse,
    SetDefaultAccountRequest, SetDefaultAccountResponse, UnlinkAccountsRequest,
    UnlinkAccountsResponse,
};
use transport::{Gateway, Method};

use crate::paging::{PagedList, page};
use crate::{Account, Member, SdkError};

impl<G: Gateway> Member<G> {
    pub async fn get_accounts(&self) -> Result<Vec<Account<G>>, SdkError> {
        let response: GetAccountsResponse = self
            .client
            .call(Method::GetAccounts, GetAccountsRequest {}, KeyLevel::Low)
            .await?;
        Ok(response
            .accounts
            .into_iter()
            .map(|proto| Account::new(self.clone(), proto))
            .collect())
    }

    pub async fn get_account(&self, account_id: &str) -> Result<Account<G>, SdkError> {
        let response: GetAccountResponse = self
            .client
            .call(
                Method::GetAccount,
                GetAccountRequest {
                    account_id: account_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        let proto = response.account.ok_or(SdkError::InvalidResponse("account"))?;
        Ok(Account::new(self.clone(), proto))
    }

    pub async fn get_default_account(&self) -> Result<Account<G>, SdkError> {
        let response: GetDefaultAccountResponse = self
            .client
            .call(
                Method::GetDefaultAccount,
                GetDefaultAccountRequest {
                    member_id: self.member_id().to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        let proto = response.account.ok_or(SdkError::InvalidResponse("account"))?;
        Ok(Account::new(self.clone(), proto))
    }

    pub async fn set_default_account(&self, account_id: &str) -> Result<(), SdkError> {
        let _: SetDefaultAccountResponse = self
            .client
            .call(
                Method::SetDefaultAccount,
                SetDefaultAccountRequest {
                    member_id: self.member_id().to_owned(),
                    account_id: account_id.to_owned(),
                },
                KeyLevel::Standard,
            )
            .await?;
        Ok(())
    }

    pub async fn unlink_accounts(&self, account_ids: &[String]) -> Result<(), SdkError> {
        let _: UnlinkAccountsResponse = self
            .client
            .call(
                Method::UnlinkAccounts,
                UnlinkAccountsRequest {
                    account_ids: account_ids.to_vec(),
                },
                KeyLevel::Standard,
            )
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Balances and transactions
    // -----------------------------------------------------------------------

    pub async fn get_balance(&self, account_id: &str, level: KeyLevel) -> Result<Balance, SdkError> {
        let response: GetBalanceResponse = self
            .client
            .call(
                Method::GetBalance,
                GetBalanceRequest {
                    account_id: account_id.to_owned(),
                },
                level,
            )
            .await?;
        balance_of(response)
    }

    /// Balances of several accounts, in request order.
    ///
    /// Fails with [`SdkError::StepUpRequired`] if any account needs more
    /// consent.
    pub async fn get_balances(
        &self,
        account_ids: &[String],
        level: KeyLevel,
    ) -> Result<Vec<Balance>, SdkError> {
        let response: GetBalancesResponse = self
            .client
            .call(
                Method::GetBalances,
                GetBalancesRequest {
                    account_ids: account_ids.to_vec(),
                },
                level,
            )
            .await?;
        response.responses.into_iter().map(balance_of).collect()
    }

    pub async fn get_transaction(
        &self,
        account_id: &str,
        transaction_id: &str,
        level: KeyLevel,
    ) -> Result<Transaction, SdkError> {
        let response: GetTransactionResponse = self
            .client
            .call(
                Method::GetTransaction,
                GetTransactionRequest {
                    account_id: account_id.to_owned(),
                    transaction_id: transaction_id.to_owned(),
                },
                level,
            )
            .await?;
        check_status(response.status)?;
        response
            .transaction
            .ok_or(SdkError::InvalidResponse("transaction"))
    }

    /// One page of an account's transactions. Pass `None` as `offset` for
    /// the first page.
    pub async fn get_transactions(
        &self,
        account_id: &str,
        offset: Option<&str>,
        limit: i32,
        level: KeyLevel,
    ) -> Result<PagedList<Transaction>, SdkError> {
        let response: GetTransactionsResponse = self
            .client
            .call(
                Method::GetTransactions,
                GetTransactionsRequest {
                    account_id: account_id.to_owned(),
                    page: Some(page(offset, limit)),
                },
                level,
            )
            .await?;
        check_status(response.status)?;
        Ok(PagedList::new(response.transactions, response.offset))
    }
}

fn balance_of(response: GetBalanceResponse) -> Result<Balance, SdkError> {
    check_status(response.status)?;
    response.balance.ok_or(SdkError::InvalidResponse("balance"))
}

fn check_status(status: i32) -> Result<(), SdkError> {
    match RequestStatus::try_from(status) {
        Ok(RequestStatus::MoreSignaturesNeeded) => Err(SdkError::StepUpRequired),
        _ => Ok(()),
    }
}
