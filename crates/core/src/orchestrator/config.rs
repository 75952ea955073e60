//! Orchestrator configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::Config;

/// Configuration for the scan orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Root folder all inventory folders are created under.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,

    /// Write `concordance.json` for each inventory.
    #[serde(default = "default_write_concordance")]
    pub write_concordance: bool,

    /// Pause after every request to the image service, failed or not (milliseconds).
    /// Independent of the metadata page delay.
    #[serde(default = "default_scan_delay")]
    pub scan_delay_ms: u64,
}

fn default_output_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_write_concordance() -> bool {
    true
}

fn default_scan_delay() -> u64 {
    1000 // 1 second
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            output_root: default_output_root(),
            write_concordance: default_write_concordance(),
            scan_delay_ms: default_scan_delay(),
        }
    }
}

impl From<&Config> for OrchestratorConfig {
    fn from(config: &Config) -> Self {
        Self {
            output_root: config.output.root.clone(),
            write_concordance: config.output.concordance,
            scan_delay_ms: config.images.scan_delay_ms,
        }
    }
}
