/// Common test utilities and fixtures for integration tests
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use backend::config::{ChainConfig, Config, TreasuryConfig};
use backend::errors::{AppError, Result};
use backend::services::chain::ChainClient;
use backend::services::treasury::TreasuryService;
use backend::state::AppState;

pub const TREASURY_ADDRESS: &str =
    "0x421055ba162a1f697532e79ea9a6852422d311f0993eb880c75110218d7f52c0";

/// Scriptable in-memory chain client
#[derive(Default)]
pub struct MockChainClient {
    /// `None` models a treasury account that is not yet readable on-chain
    pub treasury_balance: Mutex<Option<u64>>,
    pub fail_transfers: Mutex<bool>,
    pub transfers: Mutex<Vec<(String, u64)>>,
}

impl MockChainClient {
    pub fn with_treasury_balance(subunits: u64) -> Arc<Self> {
        let mock = Arc::new(Self::default());
        *mock.treasury_balance.lock().unwrap() = Some(subunits);
        mock
    }

    pub fn with_unreadable_treasury() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn account_balance(&self, _address: &str) -> Result<Option<u64>> {
        Ok(*self.treasury_balance.lock().unwrap())
    }

    async fn transfer_from_treasury(&self, to: &str, amount_subunits: u64) -> Result<String> {
        if *self.fail_transfers.lock().unwrap() {
            return Err(AppError::TransferFailed("mock transfer failure".to_string()));
        }
        let mut transfers = self.transfers.lock().unwrap();
        transfers.push((to.to_string(), amount_subunits));
        Ok(format!("0xmock{:08x}", transfers.len()))
    }

    async fn wait_for_confirmation(&self, _tx_hash: &str) -> Result<()> {
        Ok(())
    }
}

pub fn test_config() -> Config {
    Config {
        api_port: 0,
        metrics_port: 0,
        chain: ChainConfig {
            network: "testnet".to_string(),
            rpc_url: "http://127.0.0.1:1".to_string(),
        },
        treasury: TreasuryConfig {
            address: TREASURY_ADDRESS.to_string(),
            private_key: "test-key".to_string(),
        },
    }
}

pub fn test_state(chain: Arc<MockChainClient>) -> AppState {
    let treasury = TreasuryService::new(chain, TREASURY_ADDRESS);
    AppState::new(test_config(), treasury)
}

/// Helper function to parse error response
pub fn parse_error(body: &str) -> Option<(String, String, String)> {
    let json: Value = serde_json::from_str(body).ok()?;
    let error = json.get("error")?;

    Some((
        error.get("code")?.as_str()?.to_string(),
        error.get("message")?.as_str()?.to_string(),
        error.get("category")?.as_str()?.to_string(),
    ))
}
