use serde::Deserialize;

use crate::services::processor::{ProcessingDelay, DEFAULT_DELAY_MAX_MS, DEFAULT_DELAY_MIN_MS};

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    /// Server bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// CSV file listing valid stores; the store ID is the third column.
    #[serde(default = "default_store_master_path")]
    pub store_master_path: String,

    /// Lower bound of the simulated per-image analysis delay, in milliseconds.
    #[serde(default = "default_delay_min_ms")]
    pub processing_delay_min_ms: u64,

    /// Upper bound (inclusive) of the simulated per-image analysis delay.
    #[serde(default = "default_delay_max_ms")]
    pub processing_delay_max_ms: u64,

    /// Largest accepted request body, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_store_master_path() -> String {
    "StoreMaster.csv".to_string()
}

fn default_delay_min_ms() -> u64 {
    DEFAULT_DELAY_MIN_MS
}

fn default_delay_max_ms() -> u64 {
    DEFAULT_DELAY_MAX_MS
}

fn default_max_body_bytes() -> usize {
    10 * 1024 * 1024
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    pub fn processing_delay(&self) -> ProcessingDelay {
        ProcessingDelay::uniform_ms(self.processing_delay_min_ms, self.processing_delay_max_ms)
    }
}
