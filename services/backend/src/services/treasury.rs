//! Treasury withdrawals: validate, check funding, transfer, confirm.

use std::sync::Arc;

use crate::domain::{TreasuryResponse, TreasuryStatus, WithdrawResponse};
use crate::errors::{AppError, Result};
use crate::services::chain::ChainClient;

pub struct TreasuryService {
    chain: Arc<dyn ChainClient>,
    treasury_address: String,
}

impl TreasuryService {
    pub fn new(chain: Arc<dyn ChainClient>, treasury_address: impl Into<String>) -> Self {
        Self {
            chain,
            treasury_address: treasury_address.into(),
        }
    }

    pub fn treasury_address(&self) -> &str {
        &self.treasury_address
    }

    /// Move funds treasury -> user and wait for on-chain confirmation.
    ///
    /// An unreadable treasury balance is tolerated: the transfer is still
    /// attempted and the node has the final word.
    pub async fn process_withdrawal(
        &self,
        user_address: &str,
        amount_subunits: u64,
    ) -> Result<WithdrawResponse> {
        if amount_subunits == 0 {
            return Err(AppError::InvalidAmount(
                "withdrawal amount must be positive".to_string(),
            ));
        }
        let user_address = normalize_address(user_address)?;

        tracing::info!(
            user_address = %user_address,
            amount_subunits,
            treasury = %self.treasury_address,
            "Processing withdrawal"
        );

        match self.chain.account_balance(&self.treasury_address).await {
            Ok(Some(balance)) if balance < amount_subunits => {
                return Err(AppError::InsufficientTreasury {
                    available: balance,
                    requested: amount_subunits,
                });
            }
            Ok(Some(balance)) => {
                tracing::debug!(treasury_balance = balance, "Treasury funding verified");
            }
            Ok(None) | Err(_) => {
                tracing::warn!("Could not read treasury balance, proceeding with transfer attempt");
            }
        }

        let tx_hash = self
            .chain
            .transfer_from_treasury(&user_address, amount_subunits)
            .await?;
        self.chain.wait_for_confirmation(&tx_hash).await?;

        tracing::info!(
            tx_hash = %tx_hash,
            user_address = %user_address,
            amount_subunits,
            "Withdrawal confirmed"
        );

        Ok(WithdrawResponse {
            success: true,
            transaction_hash: tx_hash,
            amount_subunits,
            user_address,
            treasury_address: self.treasury_address.clone(),
        })
    }

    /// Current treasury balance; `initializing` while the account is not
    /// yet readable on-chain.
    pub async fn status(&self) -> Result<TreasuryResponse> {
        let response = match self.chain.account_balance(&self.treasury_address).await? {
            Some(balance) => TreasuryResponse {
                treasury_address: self.treasury_address.clone(),
                balance_subunits: balance.to_string(),
                status: TreasuryStatus::Active,
            },
            None => TreasuryResponse {
                treasury_address: self.treasury_address.clone(),
                balance_subunits: "0".to_string(),
                status: TreasuryStatus::Initializing,
            },
        };
        Ok(response)
    }

    /// Chain connectivity probe for the detailed health endpoint
    pub async fn probe(&self) -> bool {
        self.chain
            .account_balance(&self.treasury_address)
            .await
            .is_ok()
    }
}

/// Accepts `0x`-prefixed or bare hex addresses, normalizing to the prefixed
/// lowercase form.
fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let hex = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex.is_empty() || hex.len() > 64 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(AppError::InvalidAddress(address.to_string()));
    }
    Ok(format!("0x{}", hex.to_ascii_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("0xAB12").unwrap(), "0xab12");
        assert_eq!(normalize_address("ab12").unwrap(), "0xab12");
        assert!(normalize_address("0xzz").is_err());
        assert!(normalize_address("").is_err());
        assert!(normalize_address(&"a".repeat(65)).is_err());
    }
}
