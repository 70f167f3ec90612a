use crate::prelude::FetchFailure;
use log::{info, warn};

/// Poll-loop logging with a fixed prefix per endpoint.
pub struct LogManager {
    endpoint: String,
}

impl LogManager {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.endpoint, message);
    }

    pub fn record_failure(&self, failure: &FetchFailure) {
        warn!("[{}] could not fetch tracker state: {}", self.endpoint, failure);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("tracker")
    }
}
