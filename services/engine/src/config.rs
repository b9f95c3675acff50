use serde::Deserialize;
use std::env;
use std::path::PathBuf;

use shared::{MAX_WAGER_SUBUNITS, MIN_WAGER_SUBUNITS};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage_path: PathBuf,
    pub chain: ChainConfig,
    pub withdraw_api_base_url: String,
    pub wagering: WageringConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub rpc_url: String,
    pub network: String,
    pub treasury_address: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WageringConfig {
    pub min_wager_subunits: u64,
    pub max_wager_subunits: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TimingConfig {
    /// Animation delay awaited between debit and result reveal
    pub reveal_delay_ms: u64,
    /// Delay between auto-play rounds; cancellation is checked after it
    pub round_delay_ms: u64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            storage_path: env::var("ENGINE_STORAGE_PATH")
                .unwrap_or_else(|_| "casino-balance.json".to_string())
                .into(),
            chain: ChainConfig {
                rpc_url: env::var("CHAIN_RPC_URL")
                    .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string()),
                network: env::var("CHAIN_NETWORK")
                    .unwrap_or_else(|_| "testnet".to_string()),
                treasury_address: env::var("TREASURY_ADDRESS")
                    .unwrap_or_else(|_| {
                        "0x421055ba162a1f697532e79ea9a6852422d311f0993eb880c75110218d7f52c0"
                            .to_string()
                    }),
            },
            withdraw_api_base_url: env::var("WITHDRAW_API_URL")
                .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            wagering: WageringConfig {
                min_wager_subunits: env::var("MIN_WAGER_SUBUNITS")
                    .unwrap_or_else(|_| MIN_WAGER_SUBUNITS.to_string())
                    .parse()?,
                max_wager_subunits: env::var("MAX_WAGER_SUBUNITS")
                    .unwrap_or_else(|_| MAX_WAGER_SUBUNITS.to_string())
                    .parse()?,
            },
            timing: TimingConfig {
                reveal_delay_ms: env::var("REVEAL_DELAY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()?,
                round_delay_ms: env::var("ROUND_DELAY_MS")
                    .unwrap_or_else(|_| "2000".to_string())
                    .parse()?,
            },
        })
    }
}
