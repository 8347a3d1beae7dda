use log::{debug, info, warn};

/// Tagged front for the `log` facade so every core message names its origin.
pub struct LogManager {
    origin: &'static str,
}

impl LogManager {
    pub fn new(origin: &'static str) -> Self {
        Self { origin }
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.origin, message);
    }

    pub fn detail(&self, message: &str) {
        debug!("[{}] {}", self.origin, message);
    }

    pub fn caution(&self, message: &str) {
        warn!("[{}] {}", self.origin, message);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("sailcore")
    }
}
