use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use shared::errors::ServiceError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Insufficient treasury funds: available {available}, requested {requested}")]
    InsufficientTreasury { available: u64, requested: u64 },

    #[error("Chain node unavailable: {0}")]
    ChainUnavailable(String),

    #[error("Transfer failed: {0}")]
    TransferFailed(String),

    #[error("Confirmation timed out for tx {0}")]
    ConfirmationTimeout(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::InvalidAmount(ref msg) => (
                StatusCode::BAD_REQUEST,
                ServiceError::invalid_amount(msg, "rejected before transfer"),
            ),
            AppError::InvalidAddress(ref addr) => (
                StatusCode::BAD_REQUEST,
                ServiceError::invalid_address(addr),
            ),
            AppError::InsufficientTreasury {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                ServiceError::treasury_unfunded(available, requested),
            ),
            AppError::ChainUnavailable(ref endpoint) => {
                tracing::error!(endpoint = %endpoint, "Chain node unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    ServiceError::node_unavailable(endpoint.clone()),
                )
            }
            AppError::TransferFailed(ref detail) => {
                tracing::error!(detail = %detail, "Treasury transfer failed");
                (
                    StatusCode::BAD_GATEWAY,
                    ServiceError::transfer_failed(detail),
                )
            }
            AppError::ConfirmationTimeout(ref tx) => {
                tracing::error!(tx = %tx, "Transfer confirmation timed out");
                (
                    StatusCode::BAD_GATEWAY,
                    ServiceError::confirmation_timeout(tx),
                )
            }
            AppError::Internal(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ServiceError::internal("Internal server error"),
                )
            }
        };

        let body = Json(json!({
            "error": error,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
