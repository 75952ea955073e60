//! Scan orchestrator.
//!
//! Two entry points share one per-inventory routine:
//! - **Inventory**: a single collection/inventory/path triple
//! - **Finding aid**: every file-level unit of an EAD document, in document
//!   order, with failures isolated per inventory

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::{ProgressCallback, ScanOrchestrator};
pub use types::{
    FailedScan, InventoryReport, InventoryStatus, InventoryTarget, OrchestratorError,
    OutputLayout, ProgressEvent, RunSummary,
};
