//! Redeeming transfer tokens.

use prost::Message;
use signer::KeyLevel;
use tracing::info;
use transport::proto::common::Money;
use transport::proto::gateway::{
    CreateTransferRequest, CreateTransferResponse, GetTransferRequest, GetTransferResponse,
    GetTransfersRequest, GetTransfersResponse,
};
use transport::proto::token::{Token, TransferEndpoint, token_payload};
use transport::proto::transfer::{Transfer, TransferPayload};
use transport::{Gateway, Method};

use crate::paging::{PagedList, page};
use crate::utils::{format_amount, resolve_ref_id};
use crate::{Member, SdkError};

/// Options for [`Member::redeem_token`]. Everything defaults to the
/// token's own terms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RedeemOptions {
    /// Amount to charge. Defaults to the token's charge amount.
    pub amount: Option<f64>,

    /// Currency of `amount`. Defaults to the token's currency. Ignored
    /// when `amount` is unset, since the charge then follows the token.
    pub currency: Option<String>,

    /// Defaults to the token's description.
    pub description: Option<String>,

    /// Destinations, when the token leaves them to the redeemer.
    pub destinations: Vec<TransferEndpoint>,

    /// Idempotency key. Generated when unset.
    pub ref_id: Option<String>,
}

impl<G: Gateway> Member<G> {
    /// Redeems a transfer token, moving funds.
    pub async fn redeem_token(
        &self,
        token: &Token,
        options: RedeemOptions,
    ) -> Result<Transfer, SdkError> {
        let payload = transfer_payload(token, options)?;
        let signature = self.client.sign(KeyLevel::Low, &payload.encode_to_vec())?;

        let response: CreateTransferResponse = self
            .client
            .call(
                Method::CreateTransfer,
                CreateTransferRequest {
                    payload: Some(payload),
                    payload_signature: Some(signature),
                },
                KeyLevel::Low,
            )
            .await?;
        let transfer = response
            .transfer
            .ok_or(SdkError::InvalidResponse("transfer"))?;
        info!(token_id = %token.id, transfer_id = %transfer.id, "token redeemed");
        Ok(transfer)
    }

    pub async fn get_transfer(&self, transfer_id: &str) -> Result<Transfer, SdkError> {
        let response: GetTransferResponse = self
            .client
            .call(
                Method::GetTransfer,
                GetTransferRequest {
                    transfer_id: transfer_id.to_owned(),
                },
                KeyLevel::Low,
            )
            .await?;
        response
            .transfer
            .ok_or(SdkError::InvalidResponse("transfer"))
    }

    /// One page of transfers, optionally only those redeeming `token_id`.
    pub async fn get_transfers(
        &self,
        token_id: Option<&str>,
        offset: Option<&str>,
        limit: i32,
    ) -> Result<PagedList<Transfer>, SdkError> {
        let response: GetTransfersResponse = self
            .client
            .call(
                Method::GetTransfers,
                GetTransfersRequest {
                    token_id: token_id.unwrap_or_default().to_owned(),
                    page: Some(page(offset, limit)),
                },
                KeyLevel::Low,
            )
            .await?;
        Ok(PagedList::new(response.transfers, response.offset))
    }
}

fn transfer_payload(token: &Token, options: RedeemOptions) -> Result<TransferPayload, SdkError> {
    let Some(terms) = token.payload.as_ref() else {
        return Err(SdkError::WrongTokenBody);
    };
    let token_currency = match terms.body.as_ref() {
        Some(token_payload::Body::Transfer(body)) => body.currency.clone(),
        _ => return Err(SdkError::WrongTokenBody),
    };

    let amount = options
        .amount
        .map(|value| {
            Ok::<_, SdkError>(Money {
                currency: options.currency.clone().unwrap_or(token_currency),
                value: format_amount(value)?,
            })
        })
        .transpose()?;

    Ok(TransferPayload {
        ref_id: resolve_ref_id(options.ref_id.as_deref().unwrap_or_default())?,
        token_id: token.id.clone(),
        amount,
        destinations: options.destinations,
        description: options
            .description
            .unwrap_or_else(|| terms.description.clone()),
    })
}

#[cfg(test)]
mod tests {
    use transport::proto::token::{TokenPayload, TransferBody};

    use super::*;

    fn transfer_token() -> Token {
        Token {
            id: "tt:1".into(),
            payload: Some(TokenPayload {
                description: "monthly box".into(),
                body: Some(token_payload::Body::Transfer(TransferBody {
                    currency: "EUR".into(),
                    lifetime_amount: "100".into(),
                    amount: "100".into(),
                    ..Default::default()
                })),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn defaults_to_token_terms() {
        let payload = transfer_payload(&transfer_token(), RedeemOptions::default()).unwrap();
        assert_eq!(payload.token_id, "tt:1");
        assert!(payload.amount.is_none());
        assert_eq!(payload.description, "monthly box");
        assert_eq!(payload.ref_id.len(), 18);
    }

    #[test]
    fn currency_without_amount_is_ignored() {
        let options = RedeemOptions {
            currency: Some("USD".into()),
            ..Default::default()
        };
        let payload = transfer_payload(&transfer_token(), options).unwrap();
        assert!(payload.amount.is_none());

        let options = RedeemOptions {
            amount: Some(5.0),
            currency: Some("USD".into()),
            ..Default::default()
        };
        let payload = transfer_payload(&transfer_token(), options).unwrap();
        assert_eq!(payload.amount.unwrap().currency, "USD");
    }

    #[test]
    fn amount_takes_token_currency() {
        let options = RedeemOptions {
            amount: Some(12.5),
            ref_id: Some("redeem-1".into()),
            description: Some("first charge".into()),
            ..Default::default()
        };
        let payload = transfer_payload(&transfer_token(), options).unwrap();
        assert_eq!(
            payload.amount,
            Some(Money {
                currency: "EUR".into(),
                value: "12.5".into()
            })
        );
        assert_eq!(payload.ref_id, "redeem-1");
        assert_eq!(payload.description, "first charge");
    }

    #[test]
    fn rejects_bad_input() {
        let bad_amount = RedeemOptions {
            amount: Some(0.0),
            ..Default::default()
        };
        assert_eq!(
            transfer_payload(&transfer_token(), bad_amount),
            Err(SdkError::InvalidAmount)
        );
        assert_eq!(
            transfer_payload(&Token::default(), RedeemOptions::default()),
            Err(SdkError::WrongTokenBody)
        );
    }
}
