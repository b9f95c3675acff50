use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api_port: u16,
    pub metrics_port: u16,
    pub chain: ChainConfig,
    pub treasury: TreasuryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub network: String,
    pub rpc_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TreasuryConfig {
    pub address: String,
    /// Credential authorizing transfers out of the treasury account
    pub private_key: String,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "3001".to_string())
                .parse()?,
            metrics_port: env::var("METRICS_PORT")
                .unwrap_or_else(|_| "9090".to_string())
                .parse()?,
            chain: ChainConfig {
                network: env::var("CHAIN_NETWORK")
                    .unwrap_or_else(|_| "testnet".to_string()),
                rpc_url: env::var("CHAIN_RPC_URL")
                    .expect("CHAIN_RPC_URL must be set"),
            },
            treasury: TreasuryConfig {
                address: env::var("TREASURY_ADDRESS")
                    .expect("TREASURY_ADDRESS must be set"),
                private_key: env::var("TREASURY_PRIVATE_KEY")
                    .expect("TREASURY_PRIVATE_KEY must be set"),
            },
        })
    }
}
