/// Type-safe wrappers for domain primitives
///
/// These types prevent common errors by enforcing validation at construction
/// time and providing checked arithmetic operations.
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Wager amount out of range: {amount} (min: {min}, max: {max})")]
    WagerOutOfRange { amount: u64, min: u64, max: u64 },

    #[error("Amount overflow in operation")]
    AmountOverflow,

    #[error("Invalid amount string: {0}")]
    InvalidAmountString(String),

    #[error("Invalid game identifier: {0}")]
    InvalidGameKind(String),

    #[error("Invalid adjustment rule: {0}")]
    InvalidAdjustRule(String),
}

/// Type-safe subunit amount with overflow protection
///
/// One unit of the base currency is 10^8 subunits. All balances, wagers and
/// payouts are held in subunits; floating point never touches settlement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubunitAmount(u64);

impl SubunitAmount {
    pub const ZERO: SubunitAmount = SubunitAmount(0);

    /// Create from a raw subunit count
    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Create a wager-sized amount, validated against the wager bounds
    pub fn new_wager(amount: u64) -> Result<Self, ValidationError> {
        if !(MIN_WAGER_SUBUNITS..=MAX_WAGER_SUBUNITS).contains(&amount) {
            return Err(ValidationError::WagerOutOfRange {
                amount,
                min: MIN_WAGER_SUBUNITS,
                max: MAX_WAGER_SUBUNITS,
            });
        }
        Ok(Self(amount))
    }

    /// Get the raw subunit value
    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(&self, other: SubunitAmount) -> Result<Self, ValidationError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Checked subtraction
    pub fn checked_sub(&self, other: SubunitAmount) -> Result<Self, ValidationError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Subtraction clamped at zero
    pub fn saturating_sub(&self, other: SubunitAmount) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Convert to whole units (display only)
    pub fn to_units(&self) -> f64 {
        self.0 as f64 / SUBUNITS_PER_UNIT as f64
    }

    /// Create from a whole-unit count
    pub fn from_units(units: u64) -> Result<Self, ValidationError> {
        units
            .checked_mul(SUBUNITS_PER_UNIT)
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }

    /// Parse a free-form decimal-unit string ("5", "0.5", "1.25") into
    /// subunits. Digits past the eighth decimal place are rejected rather
    /// than silently truncated.
    pub fn parse_units(value: &str) -> Result<Self, ValidationError> {
        let value = value.trim();
        let invalid = || ValidationError::InvalidAmountString(value.to_string());

        let (whole, frac) = match value.split_once('.') {
            Some((whole, frac)) => (whole, frac),
            None => (value, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if frac.len() > 8 || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let whole: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_subunits: u64 = if frac.is_empty() {
            0
        } else {
            // Right-pad to 8 decimal places
            let scale = 10u64.pow(8 - frac.len() as u32);
            frac.parse::<u64>().map_err(|_| invalid())? * scale
        };

        whole
            .checked_mul(SUBUNITS_PER_UNIT)
            .and_then(|w| w.checked_add(frac_subunits))
            .map(Self)
            .ok_or(ValidationError::AmountOverflow)
    }
}

impl From<SubunitAmount> for u64 {
    fn from(amount: SubunitAmount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for SubunitAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} subunits ({:.8} units)", self.0, self.to_units())
    }
}

/// Payout ratio in fixed-point hundredths (150 = 1.50x)
///
/// Every observed multiplier has at most two decimal places, so hundredths
/// keep payout arithmetic exact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Multiplier(u32);

impl Multiplier {
    pub const ZERO: Multiplier = Multiplier(0);
    pub const EVEN: Multiplier = Multiplier(100);

    pub fn from_hundredths(hundredths: u32) -> Self {
        Self(hundredths)
    }

    pub fn as_hundredths(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// A round pays out at all (multiplier > 0)
    pub fn is_payout(&self) -> bool {
        self.0 > 0
    }

    /// A round counts as a win for wager-adjustment purposes (multiplier > 1)
    pub fn is_win(&self) -> bool {
        self.0 > 100
    }

    /// Compute wager x multiplier, truncating sub-subunit remainders
    pub fn payout_on(&self, wager: SubunitAmount) -> Result<SubunitAmount, ValidationError> {
        let raw = wager.as_u64() as u128 * self.0 as u128 / 100;
        u64::try_from(raw)
            .map(SubunitAmount::new)
            .map_err(|_| ValidationError::AmountOverflow)
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}x", self.as_f64())
    }
}

/// Game identifier carried on wagers and history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Wheel,
    Mines,
    Plinko,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Wheel => "wheel",
            GameKind::Mines => "mines",
            GameKind::Plinko => "plinko",
        }
    }
}

impl std::str::FromStr for GameKind {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "wheel" => Ok(GameKind::Wheel),
            "mines" => Ok(GameKind::Mines),
            "plinko" => Ok(GameKind::Plinko),
            other => Err(ValidationError::InvalidGameKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for GameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
