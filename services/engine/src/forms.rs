//! Betting-form configuration surface
//!
//! The enumerated options the betting panel renders, and the parser that
//! turns a submitted auto-play form into validated session settings. Stop
//! thresholds arrive as free-form decimal-unit strings; everything else is
//! an enumerated preset.

use std::time::Duration;

use shared::{GameKind, SubunitAmount};

use crate::autoplay::{AdjustRule, AutoPlaySettings};
use crate::errors::{EngineError, Result};

/// Wager presets offered by the bet-amount select, in subunits
/// (0.1, 0.5, 1, 2, 5, 10 units)
pub const WAGER_PRESETS: [u64; 6] = [
    10_000_000,
    50_000_000,
    100_000_000,
    200_000_000,
    500_000_000,
    1_000_000_000,
];

/// Win/loss adjustment options offered by the strategy selects
pub const ADJUST_OPTIONS: [&str; 7] = ["Reset", "+10%", "+25%", "+50%", "+100%", "-10%", "-25%"];

/// Upper bound on the round-count field
pub const MAX_ROUNDS: u32 = 1_000;

/// A submitted auto-play form, still in wire shape
#[derive(Debug, Clone)]
pub struct AutoPlayForm {
    pub wager_subunits: u64,
    pub rounds: u32,
    pub on_win: String,
    pub on_loss: String,
    /// Decimal-unit string; empty disables the check
    pub stop_profit_units: String,
    /// Decimal-unit string; empty disables the check
    pub stop_loss_units: String,
}

impl AutoPlayForm {
    /// Validate the form and build session settings from it.
    pub fn into_settings(
        self,
        game: GameKind,
        round_delay: Duration,
    ) -> Result<AutoPlaySettings> {
        if !WAGER_PRESETS.contains(&self.wager_subunits) {
            return Err(EngineError::InvalidWager(format!(
                "wager {} is not an offered preset",
                self.wager_subunits
            )));
        }
        if self.rounds == 0 || self.rounds > MAX_ROUNDS {
            return Err(EngineError::InvalidWager(format!(
                "round count must be 1..={}, got {}",
                MAX_ROUNDS, self.rounds
            )));
        }

        let on_win: AdjustRule = self.on_win.parse()?;
        let on_loss: AdjustRule = self.on_loss.parse()?;
        let stop_profit = parse_threshold(&self.stop_profit_units)?;
        let stop_loss = parse_threshold(&self.stop_loss_units)?;

        let mut settings =
            AutoPlaySettings::new(game, self.rounds, SubunitAmount::new(self.wager_subunits));
        settings.on_win = on_win;
        settings.on_loss = on_loss;
        settings.stop_profit = stop_profit;
        settings.stop_loss = stop_loss;
        settings.round_delay = round_delay;
        Ok(settings)
    }
}

/// Empty or zero disables a threshold; anything else must parse as a
/// decimal-unit amount.
fn parse_threshold(value: &str) -> Result<SubunitAmount> {
    if value.trim().is_empty() {
        return Ok(SubunitAmount::ZERO);
    }
    Ok(SubunitAmount::parse_units(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> AutoPlayForm {
        AutoPlayForm {
            wager_subunits: 100_000_000,
            rounds: 10,
            on_win: "Reset".to_string(),
            on_loss: "+50%".to_string(),
            stop_profit_units: "5".to_string(),
            stop_loss_units: "".to_string(),
        }
    }

    #[test]
    fn test_valid_form_builds_settings() {
        let settings = form()
            .into_settings(GameKind::Mines, Duration::from_millis(500))
            .unwrap();
        assert_eq!(settings.initial_wager.as_u64(), 100_000_000);
        assert_eq!(settings.on_win, AdjustRule::Reset);
        assert_eq!(settings.on_loss, AdjustRule::Percent(50));
        assert_eq!(settings.stop_profit.as_u64(), 500_000_000);
        assert_eq!(settings.stop_loss, SubunitAmount::ZERO);
    }

    #[test]
    fn test_rejects_off_preset_wager() {
        let mut bad = form();
        bad.wager_subunits = 123;
        assert!(bad
            .into_settings(GameKind::Wheel, Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_rejects_round_count_out_of_bounds() {
        let mut bad = form();
        bad.rounds = 0;
        assert!(bad
            .clone()
            .into_settings(GameKind::Wheel, Duration::ZERO)
            .is_err());
        bad.rounds = MAX_ROUNDS + 1;
        assert!(bad
            .into_settings(GameKind::Wheel, Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_rejects_malformed_threshold() {
        let mut bad = form();
        bad.stop_loss_units = "lots".to_string();
        assert!(bad
            .into_settings(GameKind::Wheel, Duration::ZERO)
            .is_err());
    }

    #[test]
    fn test_every_offered_adjust_option_parses() {
        for option in ADJUST_OPTIONS {
            assert!(option.parse::<AdjustRule>().is_ok(), "option: {}", option);
        }
    }
}
