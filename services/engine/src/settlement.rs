//! Wager settlement
//!
//! Settlement is two-phase: the wager is debited optimistically as an
//! explicit `Reservation`, and the reservation either commits with the
//! sampled outcome or rolls back to the exact pre-round balance when the
//! outcome transport fails. Rounds settle strictly sequentially; an
//! in-flight guard rejects overlapping rounds.

use chrono::Utc;
use uuid::Uuid;

use shared::{Multiplier, SubunitAmount, MAX_WAGER_SUBUNITS, MIN_WAGER_SUBUNITS};

use crate::domain::{Outcome, RoundResult, Wager};
use crate::errors::{EngineError, Result};
use crate::games::OutcomeSource;
use crate::history::HistoryLog;
use crate::ledger::storage::BalanceStorage;
use crate::ledger::BalanceStore;

#[derive(Debug, Clone, Copy)]
pub struct WagerLimits {
    pub min: SubunitAmount,
    pub max: SubunitAmount,
}

impl Default for WagerLimits {
    fn default() -> Self {
        Self {
            min: SubunitAmount::new(MIN_WAGER_SUBUNITS),
            max: SubunitAmount::new(MAX_WAGER_SUBUNITS),
        }
    }
}

/// An optimistic debit awaiting commit or rollback
struct Reservation {
    amount: SubunitAmount,
    prior_balance: SubunitAmount,
}

pub struct SettlementFlow<S: BalanceStorage> {
    ledger: BalanceStore<S>,
    history: HistoryLog,
    limits: WagerLimits,
    in_flight: bool,
}

impl<S: BalanceStorage> SettlementFlow<S> {
    pub fn new(ledger: BalanceStore<S>) -> Self {
        Self::with_limits(ledger, WagerLimits::default())
    }

    pub fn with_limits(ledger: BalanceStore<S>, limits: WagerLimits) -> Self {
        Self {
            ledger,
            history: HistoryLog::default(),
            limits,
            in_flight: false,
        }
    }

    pub fn ledger(&self) -> &BalanceStore<S> {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut BalanceStore<S> {
        &mut self.ledger
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut HistoryLog {
        &mut self.history
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Settle one round: validate, reserve, sample the outcome, credit the
    /// payout, record history. No state is mutated on validation failure;
    /// a transport failure refunds the reservation.
    pub async fn settle<O>(&mut self, wager: Wager, source: &mut O) -> Result<RoundResult>
    where
        O: OutcomeSource + ?Sized,
    {
        if self.in_flight {
            return Err(EngineError::RoundInFlight);
        }
        self.validate(wager)?;

        let reservation = self.reserve(wager.amount);
        tracing::debug!(
            game = %wager.game,
            wager = wager.amount.as_u64(),
            balance = self.ledger.balance().as_u64(),
            "Wager reserved"
        );

        let outcome = match source.next_outcome().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.rollback(&reservation);
                self.in_flight = false;
                metrics::counter!("rounds_rolled_back_total").increment(1);
                return Err(e);
            }
        };

        // Fallback policy: an indeterminate outcome settles at 0.00x.
        let outcome = outcome.unwrap_or_else(|| Outcome::new(Multiplier::ZERO));

        let payout = match outcome.multiplier.payout_on(wager.amount) {
            Ok(payout) => payout,
            Err(e) => {
                self.rollback(&reservation);
                self.in_flight = false;
                return Err(e.into());
            }
        };

        if outcome.multiplier.is_payout() {
            self.ledger.credit(payout);
        }

        let result = RoundResult {
            round_id: Uuid::new_v4(),
            settled_at: Utc::now(),
            game: wager.game,
            wager_amount: wager.amount,
            multiplier: outcome.multiplier,
            payout,
            label: outcome.label,
        };
        self.history.record(result.clone());
        self.in_flight = false;

        metrics::counter!("rounds_settled_total").increment(1);
        if result.is_win() {
            metrics::counter!("rounds_won_total").increment(1);
            tracing::info!(
                round_id = %result.round_id,
                multiplier = %result.multiplier,
                payout = payout.as_u64(),
                "Round won"
            );
        } else {
            tracing::info!(
                round_id = %result.round_id,
                multiplier = %result.multiplier,
                "Round lost"
            );
        }

        Ok(result)
    }

    fn validate(&self, wager: Wager) -> Result<()> {
        let amount = wager.amount;
        if amount.is_zero() {
            return Err(EngineError::InvalidWager("wager must be positive".to_string()));
        }
        if amount < self.limits.min || amount > self.limits.max {
            return Err(EngineError::InvalidWager(format!(
                "wager {} outside limits [{}, {}]",
                amount.as_u64(),
                self.limits.min.as_u64(),
                self.limits.max.as_u64()
            )));
        }
        let available = self.ledger.balance();
        if amount > available {
            return Err(EngineError::InsufficientBalance {
                required: amount,
                available,
            });
        }
        Ok(())
    }

    fn reserve(&mut self, amount: SubunitAmount) -> Reservation {
        let prior_balance = self.ledger.balance();
        self.ledger.debit(amount);
        self.in_flight = true;
        Reservation {
            amount,
            prior_balance,
        }
    }

    fn rollback(&mut self, reservation: &Reservation) {
        tracing::warn!(
            refunded = reservation.amount.as_u64(),
            "Outcome acquisition failed, restoring pre-round balance"
        );
        self.ledger.set_balance(reservation.prior_balance.as_u64() as i64);
    }
}
