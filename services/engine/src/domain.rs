use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{GameKind, Multiplier, SubunitAmount};
use uuid::Uuid;

/// A single staked round, consumed by the settlement flow
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wager {
    pub amount: SubunitAmount,
    pub game: GameKind,
}

impl Wager {
    pub fn new(amount: SubunitAmount, game: GameKind) -> Self {
        Self { amount, game }
    }
}

/// A determinate game result produced by an outcome source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub multiplier: Multiplier,
    /// Display detail: wheel segment color, plinko bucket, mines verdict
    pub label: Option<String>,
}

impl Outcome {
    pub fn new(multiplier: Multiplier) -> Self {
        Self {
            multiplier,
            label: None,
        }
    }

    pub fn with_label(multiplier: Multiplier, label: impl Into<String>) -> Self {
        Self {
            multiplier,
            label: Some(label.into()),
        }
    }
}

/// One settled round, immutable once recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundResult {
    pub round_id: Uuid,
    pub settled_at: DateTime<Utc>,
    pub game: GameKind,
    pub wager_amount: SubunitAmount,
    pub multiplier: Multiplier,
    pub payout: SubunitAmount,
    pub label: Option<String>,
}

impl RoundResult {
    pub fn is_win(&self) -> bool {
        self.multiplier.is_win()
    }

    /// Signed profit in subunits: payout - wager
    pub fn profit(&self) -> i64 {
        self.payout.as_u64() as i64 - self.wager_amount.as_u64() as i64
    }
}
