use crate::config::Config;
use crate::services::treasury::TreasuryService;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub treasury: Arc<TreasuryService>,
}

impl AppState {
    pub fn new(config: Config, treasury: TreasuryService) -> Self {
        Self {
            config: Arc::new(config),
            treasury: Arc::new(treasury),
        }
    }
}
