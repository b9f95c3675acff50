pub mod health;
pub mod metrics;
pub mod treasury;
pub mod withdraw;
