//! Auto-play: a bounded sequence of wagers with win/loss adjustment and
//! stop rules.
//!
//! The loop never overlaps rounds; each round settles fully before the
//! next starts. Cancellation is cooperative: the token is checked after the
//! inter-round delay, and a committed round is never undone.

use std::str::FromStr;
use std::time::Duration;

use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use shared::{GameKind, SubunitAmount, ValidationError};

use crate::domain::Wager;
use crate::errors::Result;
use crate::games::OutcomeSource;
use crate::ledger::storage::BalanceStorage;
use crate::settlement::SettlementFlow;

/// Wager adjustment applied after each round, selected separately for wins
/// and losses ("Reset", "+50%", "-25%", ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustRule {
    Reset,
    Percent(i32),
}

impl AdjustRule {
    /// Next wager from the current one; a non-positive result falls back to
    /// the session's initial wager.
    pub fn apply(&self, current: SubunitAmount, initial: SubunitAmount) -> SubunitAmount {
        match self {
            AdjustRule::Reset => initial,
            AdjustRule::Percent(pct) => {
                let current = current.as_u64() as i128;
                let next = current + current * *pct as i128 / 100;
                if next <= 0 {
                    initial
                } else {
                    SubunitAmount::new(next.min(u64::MAX as i128) as u64)
                }
            }
        }
    }
}

impl FromStr for AdjustRule {
    type Err = ValidationError;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("reset") {
            return Ok(AdjustRule::Reset);
        }
        value
            .strip_suffix('%')
            .and_then(|v| v.strip_prefix('+').unwrap_or(v).parse::<i32>().ok())
            .map(AdjustRule::Percent)
            .ok_or_else(|| ValidationError::InvalidAdjustRule(value.to_string()))
    }
}

#[derive(Debug, Clone)]
pub struct AutoPlaySettings {
    pub game: GameKind,
    pub rounds: u32,
    pub initial_wager: SubunitAmount,
    pub on_win: AdjustRule,
    pub on_loss: AdjustRule,
    /// Stop once cumulative profit reaches this; zero disables the check
    pub stop_profit: SubunitAmount,
    /// Stop once cumulative loss reaches this; zero disables the check
    pub stop_loss: SubunitAmount,
    pub round_delay: Duration,
}

impl AutoPlaySettings {
    pub fn new(game: GameKind, rounds: u32, initial_wager: SubunitAmount) -> Self {
        Self {
            game,
            rounds,
            initial_wager,
            on_win: AdjustRule::Reset,
            on_loss: AdjustRule::Reset,
            stop_profit: SubunitAmount::ZERO,
            stop_loss: SubunitAmount::ZERO,
            round_delay: Duration::from_millis(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Completed,
    StoppedByUser,
    StoppedByThreshold,
    StoppedByInsufficientFunds,
}

#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub status: SessionStatus,
    pub rounds_played: u32,
    /// Cumulative profit in signed subunits
    pub profit: i64,
    pub final_wager: SubunitAmount,
}

pub struct AutoPlayController {
    settings: AutoPlaySettings,
}

impl AutoPlayController {
    pub fn new(settings: AutoPlaySettings) -> Self {
        Self { settings }
    }

    /// Run the session to completion or to its first stop condition.
    ///
    /// The upfront guard refuses to start when the balance cannot cover the
    /// full commitment at the initial wager. Transport errors propagate to
    /// the caller after the settlement flow has rolled the round back.
    pub async fn run<S, O>(
        &self,
        flow: &mut SettlementFlow<S>,
        source: &mut O,
        cancel: CancellationToken,
    ) -> Result<SessionSummary>
    where
        S: BalanceStorage,
        O: OutcomeSource + ?Sized,
    {
        let settings = &self.settings;
        let initial = settings.initial_wager;

        // Coarse upfront check at the initial wager; per-round wagers are
        // re-checked before each debit.
        let commitment = initial.as_u64() as u128 * settings.rounds as u128;
        if commitment > flow.ledger().balance().as_u64() as u128 {
            tracing::warn!(
                commitment = commitment as u64,
                balance = flow.ledger().balance().as_u64(),
                "Refusing to start auto-play: balance below total commitment"
            );
            return Ok(SessionSummary {
                status: SessionStatus::StoppedByInsufficientFunds,
                rounds_played: 0,
                profit: 0,
                final_wager: initial,
            });
        }

        metrics::counter!("autoplay_sessions_total").increment(1);

        let mut wager = initial;
        let mut profit: i64 = 0;
        let mut played: u32 = 0;
        let mut status = SessionStatus::Completed;

        for round in 0..settings.rounds {
            if flow.ledger().balance() < wager {
                status = SessionStatus::StoppedByInsufficientFunds;
                break;
            }

            let result = flow
                .settle(Wager::new(wager, settings.game), source)
                .await?;
            played += 1;
            profit += result.profit();

            tracing::debug!(
                round = round + 1,
                of = settings.rounds,
                profit,
                multiplier = %result.multiplier,
                "Auto-play round settled"
            );

            let rule = if result.is_win() {
                settings.on_win
            } else {
                settings.on_loss
            };
            wager = rule.apply(wager, initial);

            // Termination checks, in order: budget, stop-profit, stop-loss.
            if played == settings.rounds {
                break;
            }
            if !settings.stop_profit.is_zero() && profit >= settings.stop_profit.as_u64() as i64 {
                status = SessionStatus::StoppedByThreshold;
                break;
            }
            if !settings.stop_loss.is_zero() && profit <= -(settings.stop_loss.as_u64() as i64) {
                status = SessionStatus::StoppedByThreshold;
                break;
            }

            sleep(settings.round_delay).await;
            if cancel.is_cancelled() {
                status = SessionStatus::StoppedByUser;
                break;
            }
        }

        let summary = SessionSummary {
            status,
            rounds_played: played,
            profit,
            final_wager: wager,
        };
        tracing::info!(
            status = ?summary.status,
            rounds = summary.rounds_played,
            profit = summary.profit,
            "Auto-play session ended"
        );
        Ok(summary)
    }
}
