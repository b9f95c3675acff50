//! Wheel outcome sampling
//!
//! The wheel is divided into `segments` equally likely positions; the
//! multiplier layout per position depends on the risk tier. Labels carry the
//! segment color the display layer renders.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use shared::Multiplier;

use crate::domain::Outcome;
use crate::errors::{EngineError, Result};
use crate::games::OutcomeSource;

const VALID_SEGMENTS: [u32; 5] = [10, 20, 30, 40, 50];

const COLOR_MISS: &str = "#333947";
const COLOR_HIGH_WIN: &str = "#D72E60";

/// Medium-risk winning segments cycle through these (multiplier, color) pairs
const MEDIUM_WINS: [(u32, &str); 5] = [
    (150, "#00E403"),
    (170, "#D9D9D9"),
    (200, "#FDE905"),
    (300, "#7F46FD"),
    (400, "#FCA32F"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WheelRisk {
    Low,
    Medium,
    High,
}

pub struct WheelGame {
    segments: u32,
    risk: WheelRisk,
    rng: StdRng,
}

impl WheelGame {
    pub fn new(segments: u32, risk: WheelRisk) -> Result<Self> {
        if !VALID_SEGMENTS.contains(&segments) {
            return Err(EngineError::InvalidWager(format!(
                "unsupported segment count: {}",
                segments
            )));
        }
        Ok(Self {
            segments,
            risk,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(segments: u32, risk: WheelRisk, seed: u64) -> Result<Self> {
        let mut game = Self::new(segments, risk)?;
        game.rng = StdRng::seed_from_u64(seed);
        Ok(game)
    }

    /// Multiplier and color for a landed position
    pub fn segment(risk: WheelRisk, segments: u32, position: u32) -> (Multiplier, &'static str) {
        let (hundredths, color) = match risk {
            WheelRisk::Low => {
                if position % 2 == 0 {
                    (120, "#D9D9D9")
                } else if position % 4 == 1 {
                    (0, COLOR_MISS)
                } else {
                    (150, "#00E403")
                }
            }
            WheelRisk::Medium => {
                if position % 2 == 0 {
                    (0, COLOR_MISS)
                } else {
                    let (m, c) = MEDIUM_WINS[(position as usize / 2) % MEDIUM_WINS.len()];
                    (m, c)
                }
            }
            WheelRisk::High => {
                // One winning band; the rest of the wheel pays nothing.
                if position < segments - 1 {
                    (0, COLOR_MISS)
                } else {
                    (Self::high_risk_multiplier(segments), COLOR_HIGH_WIN)
                }
            }
        };
        (Multiplier::from_hundredths(hundredths), color)
    }

    /// High-risk payout: 0.98 x segment count, in hundredths
    pub fn high_risk_multiplier(segments: u32) -> u32 {
        segments * 98
    }
}

#[async_trait]
impl OutcomeSource for WheelGame {
    async fn next_outcome(&mut self) -> Result<Option<Outcome>> {
        let position = self.rng.gen_range(0..self.segments);
        let (multiplier, color) = Self::segment(self.risk, self.segments, position);
        Ok(Some(Outcome::with_label(multiplier, color)))
    }
}
