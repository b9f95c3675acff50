//! Chain client used by the treasury service
//!
//! Thin JSON REST client against the node: balance reads, treasury-signed
//! transfer submission, and confirmation polling with exponential backoff.

use async_trait::async_trait;
use backoff::ExponentialBackoffBuilder;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use shared::CONFIRMATION_TIMEOUT_SECS;

use crate::errors::{AppError, Result};

#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Subunit balance of an account; `None` when the account is not yet
    /// readable on-chain.
    async fn account_balance(&self, address: &str) -> Result<Option<u64>>;

    /// Transfer out of the treasury account, returning the transaction hash.
    async fn transfer_from_treasury(&self, to: &str, amount_subunits: u64) -> Result<String>;

    /// Poll until the transaction confirms, fails, or times out.
    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<()>;
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
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
    status: String,
}

pub struct HttpChainClient {
    http: reqwest::Client,
    base_url: String,
    treasury_key: String,
}

impl HttpChainClient {
    pub fn new(base_url: impl Into<String>, treasury_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            treasury_key: treasury_key.into(),
        }
    }
}

#[async_trait]
impl ChainClient for HttpChainClient {
    async fn account_balance(&self, address: &str) -> Result<Option<u64>> {
        let url = format!("{}/v1/accounts/{}/balance", self.base_url, address);
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::ChainUnavailable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(AppError::ChainUnavailable(format!(
                "balance read returned {}",
                response.status()
            )));
        }

        let body: BalanceResponse = response
            .json()
            .await
            .map_err(|e| AppError::ChainUnavailable(e.to_string()))?;
        let balance = body
            .balance
            .parse::<u64>()
            .map_err(|_| AppError::ChainUnavailable(format!("malformed balance: {}", body.balance)))?;
        Ok(Some(balance))
    }

    async fn transfer_from_treasury(&self, to: &str, amount_subunits: u64) -> Result<String> {
        let url = format!("{}/v1/transfers", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.treasury_key)
            .json(&TransferRequest {
                to,
                amount_subunits,
            })
            .send()
            .await
            .map_err(|e| AppError::ChainUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::TransferFailed(format!(
                "node returned {}",
                response.status()
            )));
        }

        let body: TransferResponse = response
            .json()
            .await
            .map_err(|e| AppError::TransferFailed(e.to_string()))?;
        Ok(body.hash)
    }

    async fn wait_for_confirmation(&self, tx_hash: &str) -> Result<()> {
        let url = format!("{}/v1/transactions/{}", self.base_url, tx_hash);
        let policy = ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(500))
            .with_max_interval(Duration::from_secs(5))
            .with_max_elapsed_time(Some(Duration::from_secs(CONFIRMATION_TIMEOUT_SECS)))
            .build();

        let tx = tx_hash.to_string();
        backoff::future::retry(policy, || async {
            let response = self
                .http
                .get(&url)
                .send()
                .await
                .map_err(|e| backoff::Error::permanent(AppError::ChainUnavailable(e.to_string())))?;

            if response.status() == StatusCode::NOT_FOUND {
                return Err(backoff::Error::transient(AppError::ConfirmationTimeout(
                    tx.clone(),
                )));
            }

            let body: TransactionStatusResponse = response.json().await.map_err(|e| {
                backoff::Error::permanent(AppError::ChainUnavailable(e.to_string()))
            })?;

            match body.status.as_str() {
                "confirmed" => Ok(()),
                "failed" => Err(backoff::Error::permanent(AppError::TransferFailed(
                    format!("transaction {} failed on-chain", tx),
                ))),
                _ => Err(backoff::Error::transient(AppError::ConfirmationTimeout(
                    tx.clone(),
                ))),
            }
        })
        .await
    }
}
