//! Game outcome sources
//!
//! Each game samples a multiplier from its configured distribution with a
//! locally owned RNG. Sources are injectable so settlement can be driven by
//! a chain-backed source or a scripted one in tests.

pub mod mines;
pub mod plinko;
pub mod wheel;

use async_trait::async_trait;
use std::collections::VecDeque;

use crate::domain::Outcome;
use crate::errors::{EngineError, Result};

/// Produces one outcome per settled round.
///
/// `Ok(None)` means the source completed but could not determine a result;
/// settlement treats that as a 0.00x round. `Err` means the transport
/// failed and the round must not settle at all.
#[async_trait]
pub trait OutcomeSource: Send {
    async fn next_outcome(&mut self) -> Result<Option<Outcome>>;
}

/// Scripted source for tests and simulations: yields a fixed sequence of
/// results, then repeats the last entry indefinitely.
pub struct FixedOutcome {
    script: VecDeque<ScriptEntry>,
    last: ScriptEntry,
}

#[derive(Clone)]
enum ScriptEntry {
    Landed(Outcome),
    Indeterminate,
    TransportError,
}

impl FixedOutcome {
    pub fn always(outcome: Outcome) -> Self {
        Self {
            script: VecDeque::new(),
            last: ScriptEntry::Landed(outcome),
        }
    }

    pub fn always_losing() -> Self {
        Self::always(Outcome::new(shared::Multiplier::ZERO))
    }

    /// Yield each outcome once, in order, then repeat the final one.
    pub fn sequence(outcomes: Vec<Outcome>) -> Self {
        let mut script: VecDeque<ScriptEntry> =
            outcomes.into_iter().map(ScriptEntry::Landed).collect();
        let last = script.pop_back().unwrap_or(ScriptEntry::Indeterminate);
        script.push_back(last.clone());
        Self { script, last }
    }

    /// Yield one indeterminate result, then repeat it.
    pub fn indeterminate() -> Self {
        Self {
            script: VecDeque::new(),
            last: ScriptEntry::Indeterminate,
        }
    }

    /// Fail every round with a transport error.
    pub fn failing() -> Self {
        Self {
            script: VecDeque::new(),
            last: ScriptEntry::TransportError,
        }
    }
}

#[async_trait]
impl OutcomeSource for FixedOutcome {
    async fn next_outcome(&mut self) -> Result<Option<Outcome>> {
        let entry = self.script.pop_front().unwrap_or_else(|| self.last.clone());
        match entry {
            ScriptEntry::Landed(outcome) => Ok(Some(outcome)),
            ScriptEntry::Indeterminate => Ok(None),
            ScriptEntry::TransportError => {
                Err(EngineError::Transport("scripted transport failure".to_string()))
            }
        }
    }
}
