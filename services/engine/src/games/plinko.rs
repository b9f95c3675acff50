//! Plinko outcome sampling
//!
//! The ball takes `rows` independent left/right steps; the landing bucket is
//! the number of rights (a binomial draw), and the bucket indexes a per-risk
//! multiplier table. Tables are symmetric and edge-heavy: center buckets pay
//! below even, edge buckets pay the headline multipliers.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use shared::Multiplier;

use crate::domain::Outcome;
use crate::errors::{EngineError, Result};
use crate::games::OutcomeSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlinkoRisk {
    Low,
    Medium,
    High,
}

// Multiplier tables in hundredths, one entry per bucket (rows + 1 buckets).

const LOW_8: [u32; 9] = [560, 210, 110, 100, 50, 100, 110, 210, 560];
const MEDIUM_8: [u32; 9] = [1300, 300, 130, 70, 40, 70, 130, 300, 1300];
const HIGH_8: [u32; 9] = [2900, 400, 150, 30, 20, 30, 150, 400, 2900];

const LOW_12: [u32; 13] = [
    1000, 300, 160, 140, 110, 100, 50, 100, 110, 140, 160, 300, 1000,
];
const MEDIUM_12: [u32; 13] = [
    3300, 1100, 400, 200, 110, 60, 30, 60, 110, 200, 400, 1100, 3300,
];
const HIGH_12: [u32; 13] = [
    17000, 2400, 810, 200, 70, 20, 0, 20, 70, 200, 810, 2400, 17000,
];

const LOW_16: [u32; 17] = [
    1600, 900, 200, 140, 140, 120, 110, 100, 50, 100, 110, 120, 140, 140, 200, 900, 1600,
];
const MEDIUM_16: [u32; 17] = [
    11000, 4100, 1000, 500, 300, 150, 100, 50, 30, 50, 100, 150, 300, 500, 1000, 4100, 11000,
];
const HIGH_16: [u32; 17] = [
    100000, 13000, 2600, 900, 400, 200, 20, 20, 0, 20, 20, 200, 400, 900, 2600, 13000, 100000,
];

pub struct PlinkoGame {
    rows: u8,
    risk: PlinkoRisk,
    rng: StdRng,
}

impl PlinkoGame {
    pub fn new(rows: u8, risk: PlinkoRisk) -> Result<Self> {
        if !matches!(rows, 8 | 12 | 16) {
            return Err(EngineError::InvalidWager(format!(
                "unsupported row count: {}",
                rows
            )));
        }
        Ok(Self {
            rows,
            risk,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(rows: u8, risk: PlinkoRisk, seed: u64) -> Result<Self> {
        let mut game = Self::new(rows, risk)?;
        game.rng = StdRng::seed_from_u64(seed);
        Ok(game)
    }

    pub fn table(rows: u8, risk: PlinkoRisk) -> &'static [u32] {
        match (rows, risk) {
            (8, PlinkoRisk::Low) => &LOW_8,
            (8, PlinkoRisk::Medium) => &MEDIUM_8,
            (8, PlinkoRisk::High) => &HIGH_8,
            (12, PlinkoRisk::Low) => &LOW_12,
            (12, PlinkoRisk::Medium) => &MEDIUM_12,
            (12, PlinkoRisk::High) => &HIGH_12,
            (16, PlinkoRisk::Low) => &LOW_16,
            (16, PlinkoRisk::Medium) => &MEDIUM_16,
            (16, PlinkoRisk::High) => &HIGH_16,
            // new() gates the row count
            _ => unreachable!("unsupported plinko configuration"),
        }
    }

    pub fn bucket_multiplier(rows: u8, risk: PlinkoRisk, bucket: usize) -> Multiplier {
        Multiplier::from_hundredths(Self::table(rows, risk)[bucket])
    }
}

#[async_trait]
impl OutcomeSource for PlinkoGame {
    async fn next_outcome(&mut self) -> Result<Option<Outcome>> {
        let bucket = (0..self.rows)
            .filter(|_| self.rng.gen_bool(0.5))
            .count();
        let multiplier = Self::bucket_multiplier(self.rows, self.risk, bucket);
        Ok(Some(Outcome::with_label(
            multiplier,
            format!("bucket {}", bucket),
        )))
    }
}
