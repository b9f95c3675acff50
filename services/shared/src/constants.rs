/// Shared constants for the casino settlement services
///
/// This module centralizes all magic numbers and configuration constants
/// to prevent inconsistencies between the engine and the withdrawal backend.

/// Subunits per unit of the base currency (8 decimal places)
pub const SUBUNITS_PER_UNIT: u64 = 100_000_000;

/// Minimum wager in subunits (0.01 units)
///
/// Rationale: below this amount a round is noise; the original product
/// exposed 0.1 units as its smallest bet preset.
pub const MIN_WAGER_SUBUNITS: u64 = 1_000_000;

/// Maximum wager in subunits (10,000 units)
///
/// Rationale: anti-whale limit so a single round cannot drain the treasury.
pub const MAX_WAGER_SUBUNITS: u64 = 1_000_000_000_000;

/// Minimum withdrawal in subunits (0.001 units)
pub const MIN_WITHDRAW_SUBUNITS: u64 = 100_000;

/// Gas reserve kept back from withdrawals (0.01 units)
///
/// The full balance is never withdrawable; this margin covers network fees
/// on the user's side.
pub const GAS_RESERVE_SUBUNITS: u64 = 1_000_000;

/// Durable-storage key holding the balance as a decimal-string integer
pub const BALANCE_STORAGE_KEY: &str = "user_balance";

/// Durable-storage key holding the loading flag as a boolean string
pub const LOADING_STORAGE_KEY: &str = "is_loading";

/// Maximum round-history entries retained before the oldest is evicted
pub const DEFAULT_HISTORY_CAPACITY: usize = 1_000;

/// Default history display cursor ("show 10 of M")
pub const HISTORY_PAGE_STEP: usize = 10;

/// Number of tiles on the mines grid (5x5)
pub const MINES_GRID_TILES: u8 = 25;

/// Maximum time to wait for on-chain transaction confirmation
pub const CONFIRMATION_TIMEOUT_SECS: u64 = 60;
