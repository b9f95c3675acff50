//! Mines outcome sampling
//!
//! A 5x5 grid hides `mines` mines; the round reveals `reveals` tiles and
//! wins only if every revealed tile is safe. The winning multiplier is the
//! fair hypergeometric value scaled by a 0.97 house factor.

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use shared::{Multiplier, MINES_GRID_TILES};

use crate::domain::Outcome;
use crate::errors::{EngineError, Result};
use crate::games::OutcomeSource;

const HOUSE_FACTOR: f64 = 0.97;

pub struct MinesGame {
    mines: u8,
    reveals: u8,
    rng: StdRng,
}

impl MinesGame {
    pub fn new(mines: u8, reveals: u8) -> Result<Self> {
        if !(1..MINES_GRID_TILES).contains(&mines) {
            return Err(EngineError::InvalidWager(format!(
                "mine count must be 1..={}, got {}",
                MINES_GRID_TILES - 1,
                mines
            )));
        }
        if reveals == 0 || reveals > MINES_GRID_TILES - mines {
            return Err(EngineError::InvalidWager(format!(
                "reveal count must be 1..={}, got {}",
                MINES_GRID_TILES - mines,
                reveals
            )));
        }
        Ok(Self {
            mines,
            reveals,
            rng: StdRng::from_entropy(),
        })
    }

    pub fn with_seed(mines: u8, reveals: u8, seed: u64) -> Result<Self> {
        let mut game = Self::new(mines, reveals)?;
        game.rng = StdRng::seed_from_u64(seed);
        Ok(game)
    }

    /// Winning multiplier in hundredths for surviving `reveals` picks.
    ///
    /// Fair value is the inverse survival probability:
    /// prod (tiles - i) / (tiles - mines - i) for i in 0..reveals.
    pub fn win_multiplier(mines: u8, reveals: u8) -> Multiplier {
        let tiles = MINES_GRID_TILES as f64;
        let mines = mines as f64;
        let mut fair = 1.0_f64;
        for i in 0..reveals {
            let i = i as f64;
            fair *= (tiles - i) / (tiles - mines - i);
        }
        Multiplier::from_hundredths((fair * HOUSE_FACTOR * 100.0).round() as u32)
    }
}

#[async_trait]
impl OutcomeSource for MinesGame {
    async fn next_outcome(&mut self) -> Result<Option<Outcome>> {
        // Draw tiles without replacement; a single mine ends the round.
        let mut remaining = MINES_GRID_TILES;
        let mut safe_remaining = MINES_GRID_TILES - self.mines;
        for _ in 0..self.reveals {
            let pick = self.rng.gen_range(0..remaining);
            if pick >= safe_remaining {
                return Ok(Some(Outcome::with_label(Multiplier::ZERO, "mine")));
            }
            remaining -= 1;
            safe_remaining -= 1;
        }
        Ok(Some(Outcome::with_label(
            Self::win_multiplier(self.mines, self.reveals),
            "clear",
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parameter_validation() {
        assert!(MinesGame::new(0, 1).is_err());
        assert!(MinesGame::new(25, 1).is_err());
        assert!(MinesGame::new(24, 2).is_err());
        assert!(MinesGame::new(24, 1).is_ok());
        assert!(MinesGame::new(5, 20).is_ok());
        assert!(MinesGame::new(5, 21).is_err());
    }

    #[test]
    fn test_win_multiplier_values() {
        // One reveal, one mine: fair 25/24, with house factor ~1.01
        assert_eq!(MinesGame::win_multiplier(1, 1).as_hundredths(), 101);
        // One reveal, 24 mines: fair 25x, with house factor 24.25
        assert_eq!(MinesGame::win_multiplier(24, 1).as_hundredths(), 2425);
        // Multiplier grows with each extra reveal
        let m1 = MinesGame::win_multiplier(5, 1);
        let m2 = MinesGame::win_multiplier(5, 5);
        assert!(m2 > m1);
        assert!(m1.is_win());
    }

    #[tokio::test]
    async fn test_outcomes_are_win_or_zero() {
        let mut game = MinesGame::with_seed(5, 3, 99).unwrap();
        let expected_win = MinesGame::win_multiplier(5, 3);
        let mut wins = 0;
        let mut losses = 0;
        for _ in 0..200 {
            let outcome = game.next_outcome().await.unwrap().unwrap();
            if outcome.multiplier.is_payout() {
                assert_eq!(outcome.multiplier, expected_win);
                wins += 1;
            } else {
                losses += 1;
            }
        }
        // With 5 mines and 3 reveals both outcomes occur over 200 rounds
        assert!(wins > 0);
        assert!(losses > 0);
    }

    #[tokio::test]
    async fn test_all_safe_grid_never_loses() {
        let mut game = MinesGame::with_seed(1, 1, 3).unwrap();
        let mut saw_win = false;
        for _ in 0..100 {
            let outcome = game.next_outcome().await.unwrap().unwrap();
            if outcome.multiplier.is_payout() {
                saw_win = true;
            }
        }
        assert!(saw_win);
    }
}
