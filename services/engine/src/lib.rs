// Library interface for the settlement engine - exposes modules for testing

pub mod autoplay;
pub mod config;
pub mod domain;
pub mod errors;
pub mod forms;
pub mod funding;
pub mod games;
pub mod gateway;
pub mod history;
pub mod ledger;
pub mod settlement;
