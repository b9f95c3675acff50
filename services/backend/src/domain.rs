use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WithdrawRequest {
    #[validate(length(min = 3, max = 66))]
    pub user_address: String,
    #[validate(range(min = 1))]
    pub amount_subunits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawResponse {
    pub success: bool,
    pub transaction_hash: String,
    pub amount_subunits: u64,
    pub user_address: String,
    pub treasury_address: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreasuryStatus {
    Active,
    Initializing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreasuryResponse {
    pub treasury_address: String,
    /// Decimal-string subunit balance ("0" while initializing)
    pub balance_subunits: String,
    pub status: TreasuryStatus,
}
