use shared::{SubunitAmount, ValidationError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid wager: {0}")]
    InvalidWager(String),

    #[error("Insufficient balance: wager {required} exceeds balance {available}")]
    InsufficientBalance {
        required: SubunitAmount,
        available: SubunitAmount,
    },

    #[error("A round is already in flight")]
    RoundInFlight,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Chain transport error: {0}")]
    Transport(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Withdrawal endpoint error: {0}")]
    Endpoint(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// True when the failure came from the outcome transport rather than
    /// local validation; settlement rolls the optimistic debit back for
    /// these.
    pub fn is_transport(&self) -> bool {
        matches!(self, EngineError::Transport(_) | EngineError::Http(_) | EngineError::Endpoint(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
