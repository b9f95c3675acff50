/// Shared error types for the settlement services
///
/// Design:
/// - Standardized error codes for consistent handling across services
/// - Categorized by error domain (Validation, Network, Chain, Internal)
/// - Error codes follow the pattern <CATEGORY>_<SPECIFIC>
/// - Context field carries debugging detail that never reaches end users
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error categories that map to HTTP status codes and logging severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    /// Client provided invalid input (400 Bad Request)
    Validation,

    /// External service unavailable or timing out (503)
    Network,

    /// Chain transaction submission or confirmation failed
    Chain,

    /// Unexpected failures, storage issues, programming errors (500)
    Internal,

    /// Resource not found (404)
    NotFound,
}

impl ErrorCategory {
    /// Map error category to HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ErrorCategory::Validation => 400,
            ErrorCategory::Network => 503,
            ErrorCategory::Chain => 502,
            ErrorCategory::Internal => 500,
            ErrorCategory::NotFound => 404,
        }
    }
}

/// Standard error codes used across both services
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    // Validation errors
    pub const VALIDATION_INVALID_AMOUNT: ErrorCode = ErrorCode("VALIDATION_INVALID_AMOUNT");
    pub const VALIDATION_INVALID_ADDRESS: ErrorCode = ErrorCode("VALIDATION_INVALID_ADDRESS");
    pub const VALIDATION_INSUFFICIENT_BALANCE: ErrorCode =
        ErrorCode("VALIDATION_INSUFFICIENT_BALANCE");

    // Network errors
    pub const NETWORK_NODE_UNAVAILABLE: ErrorCode = ErrorCode("NETWORK_NODE_UNAVAILABLE");
    pub const NETWORK_ENDPOINT_UNAVAILABLE: ErrorCode = ErrorCode("NETWORK_ENDPOINT_UNAVAILABLE");

    // Chain errors
    pub const CHAIN_TRANSFER_FAILED: ErrorCode = ErrorCode("CHAIN_TRANSFER_FAILED");
    pub const CHAIN_CONFIRMATION_TIMEOUT: ErrorCode = ErrorCode("CHAIN_CONFIRMATION_TIMEOUT");
    pub const CHAIN_TREASURY_UNFUNDED: ErrorCode = ErrorCode("CHAIN_TREASURY_UNFUNDED");

    // Internal errors
    pub const INTERNAL_UNEXPECTED: ErrorCode = ErrorCode("INTERNAL_UNEXPECTED");
    pub const INTERNAL_STORAGE: ErrorCode = ErrorCode("INTERNAL_STORAGE");
    pub const INTERNAL_CONFIGURATION: ErrorCode = ErrorCode("INTERNAL_CONFIGURATION");

    // Resource errors
    pub const NOT_FOUND_ACCOUNT: ErrorCode = ErrorCode("NOT_FOUND_ACCOUNT");
    pub const NOT_FOUND_TRANSACTION: ErrorCode = ErrorCode("NOT_FOUND_TRANSACTION");

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Standardized error structure carried in API error bodies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceError {
    /// Error category (determines status code)
    pub category: ErrorCategory,

    /// Structured error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Optional additional context (field names, ids, amounts)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ServiceError {
    pub fn new(category: ErrorCategory, code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            category,
            code: code.as_str().to_string(),
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    // Validation error constructors
    pub fn invalid_amount(amount: impl fmt::Display, reason: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_AMOUNT,
            format!("Invalid amount: {}", amount),
        )
        .with_context(reason)
    }

    pub fn invalid_address(address: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INVALID_ADDRESS,
            format!("Invalid account address: {}", address),
        )
    }

    pub fn insufficient_balance(required: u64, available: u64) -> Self {
        Self::new(
            ErrorCategory::Validation,
            ErrorCode::VALIDATION_INSUFFICIENT_BALANCE,
            "Insufficient balance",
        )
        .with_context(format!("required: {}, available: {}", required, available))
    }

    // Network error constructors
    pub fn node_unavailable(endpoint: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Network,
            ErrorCode::NETWORK_NODE_UNAVAILABLE,
            "Chain node unavailable",
        )
        .with_context(endpoint)
    }

    // Chain error constructors
    pub fn transfer_failed(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Chain,
            ErrorCode::CHAIN_TRANSFER_FAILED,
            "On-chain transfer failed",
        )
        .with_context(detail.to_string())
    }

    pub fn confirmation_timeout(tx_hash: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Chain,
            ErrorCode::CHAIN_CONFIRMATION_TIMEOUT,
            "Transaction confirmation timed out",
        )
        .with_context(format!("tx: {}", tx_hash))
    }

    pub fn treasury_unfunded(available: u64, requested: u64) -> Self {
        Self::new(
            ErrorCategory::Chain,
            ErrorCode::CHAIN_TREASURY_UNFUNDED,
            "Insufficient treasury funds",
        )
        .with_context(format!("available: {}, requested: {}", available, requested))
    }

    // Internal error constructors
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_UNEXPECTED,
            message,
        )
    }

    pub fn storage_error(detail: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::Internal,
            ErrorCode::INTERNAL_STORAGE,
            "Durable storage error",
        )
        .with_context(detail.to_string())
    }

    // Resource constructors
    pub fn account_not_found(address: impl fmt::Display) -> Self {
        Self::new(
            ErrorCategory::NotFound,
            ErrorCode::NOT_FOUND_ACCOUNT,
            format!("Account not found: {}", address),
        )
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "[{}] {}: {}", self.code, self.message, context)
        } else {
            write!(f, "[{}] {}", self.code, self.message)
        }
    }
}

impl std::error::Error for ServiceError {}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_status_codes() {
        assert_eq!(ErrorCategory::Validation.status_code(), 400);
        assert_eq!(ErrorCategory::Network.status_code(), 503);
        assert_eq!(ErrorCategory::Chain.status_code(), 502);
        assert_eq!(ErrorCategory::NotFound.status_code(), 404);
        assert_eq!(ErrorCategory::Internal.status_code(), 500);
    }

    #[test]
    fn test_service_error_creation() {
        let error = ServiceError::invalid_address("not-hex");
        assert_eq!(error.category, ErrorCategory::Validation);
        assert_eq!(error.code, "VALIDATION_INVALID_ADDRESS");
        assert!(error.message.contains("not-hex"));
    }

    #[test]
    fn test_service_error_with_context() {
        let error = ServiceError::insufficient_balance(50_000_000, 30_000_000);
        assert!(error.context.is_some());
        assert!(error.to_string().contains("required: 50000000"));
    }

    #[test]
    fn test_error_serialization() {
        let error = ServiceError::treasury_unfunded(10, 100);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("CHAIN_TREASURY_UNFUNDED"));
        assert!(json.contains("CHAIN"));
    }
}
