//! Funding: deposits and withdrawals that bridge the chain and the ledger.
//!
//! Deposits credit the ledger only after on-chain confirmation, so a failed
//! submission leaves the balance untouched. Withdrawals debit optimistically
//! before calling the withdrawal endpoint and roll the debit back on any
//! failure, mirroring the settlement discipline.

use serde::{Deserialize, Serialize};

use shared::{SubunitAmount, GAS_RESERVE_SUBUNITS, MIN_WITHDRAW_SUBUNITS};

use crate::errors::{EngineError, Result};
use crate::gateway::ChainGateway;
use crate::ledger::storage::BalanceStorage;
use crate::ledger::BalanceStore;

#[derive(Debug, Serialize)]
struct WithdrawEndpointRequest<'a> {
    user_address: &'a str,
    amount_subunits: u64,
}

#[derive(Debug, Deserialize)]
struct WithdrawEndpointResponse {
    transaction_hash: String,
}

#[derive(Debug, Deserialize)]
struct EndpointErrorBody {
    error: EndpointErrorDetail,
}

#[derive(Debug, Deserialize)]
struct EndpointErrorDetail {
    message: String,
}

pub struct FundingService<G: ChainGateway> {
    gateway: G,
    http: reqwest::Client,
    withdraw_api_base_url: String,
    treasury_address: String,
    user_address: String,
}

impl<G: ChainGateway> FundingService<G> {
    pub fn new(
        gateway: G,
        withdraw_api_base_url: impl Into<String>,
        treasury_address: impl Into<String>,
        user_address: impl Into<String>,
    ) -> Self {
        Self {
            gateway,
            http: reqwest::Client::new(),
            withdraw_api_base_url: withdraw_api_base_url.into().trim_end_matches('/').to_string(),
            treasury_address: treasury_address.into(),
            user_address: user_address.into(),
        }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// On-chain wallet balance of the connected user ("0" when the account
    /// does not exist yet).
    pub async fn wallet_balance(&self) -> Result<SubunitAmount> {
        self.gateway.account_balance(&self.user_address).await
    }

    /// Move funds wallet -> treasury, then credit the house balance.
    ///
    /// The ledger is only credited after the transfer confirms; failures
    /// before that leave it untouched.
    pub async fn deposit<S: BalanceStorage>(
        &self,
        ledger: &mut BalanceStore<S>,
        amount: SubunitAmount,
    ) -> Result<String> {
        if amount.is_zero() {
            return Err(EngineError::InvalidWager(
                "deposit amount must be positive".to_string(),
            ));
        }

        let tx_hash = self
            .gateway
            .submit_transfer(&self.treasury_address, amount)
            .await?;
        self.gateway.wait_for_confirmation(&tx_hash).await?;

        ledger.credit(amount);
        metrics::counter!("deposits_total").increment(1);
        tracing::info!(tx_hash = %tx_hash, amount = amount.as_u64(), "Deposit credited");
        Ok(tx_hash)
    }

    /// Move house credit back to the user's wallet via the withdrawal
    /// endpoint. The debit is optimistic and rolled back on any failure.
    pub async fn withdraw<S: BalanceStorage>(
        &self,
        ledger: &mut BalanceStore<S>,
        amount: SubunitAmount,
    ) -> Result<String> {
        if amount.as_u64() < MIN_WITHDRAW_SUBUNITS {
            return Err(EngineError::InvalidWager(format!(
                "minimum withdrawal is {} subunits",
                MIN_WITHDRAW_SUBUNITS
            )));
        }
        let available = ledger.balance();
        let max_withdraw = available.saturating_sub(SubunitAmount::new(GAS_RESERVE_SUBUNITS));
        if amount > max_withdraw {
            return Err(EngineError::InsufficientBalance {
                required: amount,
                available: max_withdraw,
            });
        }

        let prior_balance = ledger.balance();
        ledger.debit(amount);

        match self.call_withdraw_endpoint(amount).await {
            Ok(tx_hash) => {
                metrics::counter!("withdrawals_total").increment(1);
                tracing::info!(tx_hash = %tx_hash, amount = amount.as_u64(), "Withdrawal settled");
                Ok(tx_hash)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Withdrawal failed, restoring balance");
                ledger.set_balance(prior_balance.as_u64() as i64);
                Err(e)
            }
        }
    }

    async fn call_withdraw_endpoint(&self, amount: SubunitAmount) -> Result<String> {
        let url = format!("{}/api/withdraw", self.withdraw_api_base_url);
        let response = self
            .http
            .post(&url)
            .json(&WithdrawEndpointRequest {
                user_address: &self.user_address,
                amount_subunits: amount.as_u64(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<EndpointErrorBody>().await {
                Ok(body) => body.error.message,
                Err(_) => format!("withdrawal endpoint returned {}", status),
            };
            return Err(EngineError::Endpoint(message));
        }

        let body: WithdrawEndpointResponse = response.json().await?;
        Ok(body.transaction_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockChainGateway;
    use crate::ledger::storage::MemoryStorage;

    const TREASURY: &str = "0xtreasury";
    const USER: &str = "0xuser";

    fn service() -> FundingService<MockChainGateway> {
        FundingService::new(
            MockChainGateway::new(),
            // Unroutable endpoint: withdrawal calls in these tests either
            // never reach it or are expected to fail.
            "http://127.0.0.1:1",
            TREASURY,
            USER,
        )
    }

    fn ledger_with(subunits: u64) -> BalanceStore<MemoryStorage> {
        let mut ledger = BalanceStore::open(MemoryStorage::new());
        ledger.set_balance(subunits as i64);
        ledger
    }

    #[tokio::test]
    async fn test_deposit_credits_after_confirmation() {
        let service = service();
        let mut ledger = ledger_with(0);

        let tx = service
            .deposit(&mut ledger, SubunitAmount::new(500_000_000))
            .await
            .unwrap();

        assert!(tx.starts_with("0xmock"));
        assert_eq!(ledger.balance().as_u64(), 500_000_000);
        assert_eq!(
            service.gateway().transfers(),
            vec![(TREASURY.to_string(), 500_000_000)]
        );
    }

    #[tokio::test]
    async fn test_failed_deposit_leaves_ledger_untouched() {
        let service = service();
        service.gateway().set_fail_transfers(true);
        let mut ledger = ledger_with(100);

        assert!(service
            .deposit(&mut ledger, SubunitAmount::new(500))
            .await
            .is_err());
        assert_eq!(ledger.balance().as_u64(), 100);
    }

    #[tokio::test]
    async fn test_zero_deposit_rejected() {
        let service = service();
        let mut ledger = ledger_with(0);
        assert!(service
            .deposit(&mut ledger, SubunitAmount::ZERO)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_withdraw_validates_minimum_and_gas_reserve() {
        let service = service();
        let mut ledger = ledger_with(10_000_000);

        // Below the withdrawal minimum
        let err = service
            .withdraw(&mut ledger, SubunitAmount::new(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidWager(_)));

        // The gas reserve keeps the full balance unwithdrawable
        let err = service
            .withdraw(&mut ledger, SubunitAmount::new(10_000_000))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::InsufficientBalance { .. }));
        assert_eq!(ledger.balance().as_u64(), 10_000_000);
    }

    #[tokio::test]
    async fn test_failed_endpoint_call_rolls_back_debit() {
        // The endpoint is unreachable, so the optimistic debit must be
        // restored exactly.
        let service = service();
        let mut ledger = ledger_with(1_000_000_000);

        let err = service
            .withdraw(&mut ledger, SubunitAmount::new(100_000_000))
            .await
            .unwrap_err();

        assert!(err.is_transport());
        assert_eq!(ledger.balance().as_u64(), 1_000_000_000);
    }
}
