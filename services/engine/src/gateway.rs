//! Chain gateway
//!
//! The chain is consumed as an opaque REST service: balance reads, transfer
//! submission, and confirmation polling. Everything beyond that (signing,
//! fee markets, mempools) is the node's problem.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use shared::{SubunitAmount, CONFIRMATION_TIMEOUT_SECS};

use crate::errors::{EngineError, Result};

#[async_trait]
pub trait ChainGateway: Send + Sync {
    /// Subunit balance of an account. A missing on-chain account reads as
    /// zero rather than an error.
    async fn account_balance(&self, address: &str) -> Result<SubunitAmount>;

    /// Submit a transfer from the connected wallet, returning the
    /// transaction hash.
    async fn submit_transfer(&self, to: &str, amount: SubunitAmount) -> Result<String>;

    /// Poll until the transaction confirms, fails, or times out.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    /// Decimal-string subunit balance
    balance: String,
}

#[derive(Debug, Serialize)]
struct TransferRequest<'a> {
    to: &'a str,
    amount_subunits: u64,
}

#[derive(Debug, Deserialize)]
struct TransferResponse {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct TransactionStatusResponse {
    status: TransactionStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// Gateway over a node's JSON REST API
pub struct HttpChainGateway {
    http: reqwest::Client,
    base_url: String,
}

impl HttpChainGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChainGateway for HttpChainGateway {
    async fn account_balance(&self, address: &str) -> Result<SubunitAmount> {
        let url = format!("{}/v1/accounts/{}/balance", self.base_url, address);
        let response = self.http.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            // Account resource does not exist yet
            return Ok(SubunitAmount::ZERO);
        }
        if !response.status().is_success() {
            return Err(EngineError::Transport(format!(
                "balance read failed with status {}",
                response.status()
            )));
        }

        let body: BalanceResponse = response.json().await?;
        let balance = body
            .balance
            .parse::<u64>()
            .map_err(|_| EngineError::Transport(format!("malformed balance: {}", body.balance)))?;
        Ok(SubunitAmount::new(balance))
    }

    async fn submit_transfer(&self, to: &str, amount: SubunitAmount) -> Result<String> {
        let url = format!("{}/v1/transfers", self.base_url);
        let response = self
            .http
            .post(&url)
            .json(&TransferRequest {
                to,
                amount_subunits: amount.as_u64(),
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(EngineError::Transport(format!(
                "transfer submission failed with status {}",
                response.status()
            )));
        }

        let body: TransferResponse = response.json().await?;
        tracing::debug!(tx_hash = %body.hash, amount = amount.as_u64(), "Transfer submitted");
        Ok(body.hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<()> {
        let url = format!("{}/v1/transactions/{}", self.base_url, tx_hash);
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_interval(Duration::from_secs(5))
            .with_max_elapsed_time(Some(Duration::from_secs(CONFIRMATION_TIMEOUT_SECS)))
            .build();

        backoff::future::retry(policy, || async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| backoff::Error::permanent(EngineError::from(e)))?;

            if response.status() == StatusCode::NOT_FOUND {
                // Not yet indexed; keep polling
                return Err(backoff::Error::transient(EngineError::Transport(
                    "transaction not yet visible".to_string(),
                )));
            }

            let body: TransactionStatusResponse = response
                .json()
                .await
                .map_err(|e| backoff::Error::permanent(EngineError::from(e)))?;

            match body.status {
                TransactionStatus::Confirmed => Ok(()),
                TransactionStatus::Pending => Err(backoff::Error::transient(
                    EngineError::Transport("transaction pending".to_string()),
                )),
                TransactionStatus::Failed => Err(backoff::Error::permanent(
                    EngineError::Transport(format!("transaction {} failed on-chain", tx_hash)),
                )),
            }
        })
        .await
    }
}

/// In-memory gateway for tests and simulations
#[derive(Default)]
pub struct MockChainGateway {
    state: std::sync::Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    balances: std::collections::HashMap<String, u64>,
    transfers: Vec<(String, u64)>,
    fail_transfers: bool,
    next_tx: u64,
}

impl MockChainGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, address: &str, subunits: u64) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(address.to_string(), subunits);
    }

    pub fn set_fail_transfers(&self, fail: bool) {
        self.state.lock().unwrap().fail_transfers = fail;
    }

    pub fn transfers(&self) -> Vec<(String, u64)> {
        self.state.lock().unwrap().transfers.clone()
    }
}

#[async_trait]
impl ChainGateway for MockChainGateway {
    async fn account_balance(&self, address: &str) -> Result<SubunitAmount> {
        let state = self.state.lock().unwrap();
        Ok(SubunitAmount::new(
            state.balances.get(address).copied().unwrap_or(0),
        ))
    }

    async fn submit_transfer(&self, to: &str, amount: SubunitAmount) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        if state.fail_transfers {
            return Err(EngineError::Transport("mock transfer failure".to_string()));
        }
        state.transfers.push((to.to_string(), amount.as_u64()));
        state.next_tx += 1;
        Ok(format!("0xmock{:08x}", state.next_tx))
    }

    async fn wait_for_confirmation(&self, _tx_hash: &str) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_missing_account_reads_zero() {
        let gateway = MockChainGateway::new();
        assert_eq!(
            gateway.account_balance("0xnobody").await.unwrap(),
            SubunitAmount::ZERO
        );
    }

    #[tokio::test]
    async fn test_mock_transfer_records_and_fails_on_demand() {
        let gateway = MockChainGateway::new();
        let hash = gateway
            .submit_transfer("0xabc", SubunitAmount::new(500))
            .await
            .unwrap();
        assert!(hash.starts_with("0xmock"));
        assert_eq!(gateway.transfers(), vec![("0xabc".to_string(), 500)]);

        gateway.set_fail_transfers(true);
        assert!(gateway
            .submit_transfer("0xabc", SubunitAmount::new(1))
            .await
            .is_err());
    }
}
