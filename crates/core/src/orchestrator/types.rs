//! Types for the scan orchestrator.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ead::FindingAidNode;

/// Errors that can occur during orchestration.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Scan metadata could not be retrieved.
    #[error("metadata error: {0}")]
    Metadata(#[from] crate::metadata::MetadataError),

    /// Finding aid could not be fetched or parsed.
    #[error("finding aid error: {0}")]
    FindingAid(#[from] crate::ead::EadError),

    /// Output folder or file could not be written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An identifier cannot be used as a folder name.
    #[error("invalid inventory target: {0:?}")]
    InvalidTarget(String),
}

impl OrchestratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the service declared scans for the inventory but returned none.
    pub fn is_no_scans(&self) -> bool {
        matches!(self, Self::Metadata(e) if e.is_no_scans())
    }
}

/// One inventory to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTarget {
    /// Collection (finding-aid) identifier used by the metadata service.
    pub collection_id: String,
    /// Inventory number; names the output folder.
    pub inventory_id: String,
    /// Hierarchical path of the inventory, e.g. `"1.6"`.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Known scan count; skips the metadata probe when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub declared_scans: Option<u64>,
}

impl InventoryTarget {
    pub fn new(
        collection_id: impl Into<String>,
        inventory_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            collection_id: collection_id.into(),
            inventory_id: inventory_id.into(),
            path: path.into(),
            title: None,
            declared_scans: None,
        }
    }

    /// Target for a file-level finding-aid node.
    pub fn from_node(collection_id: &str, node: &FindingAidNode) -> Self {
        Self {
            collection_id: collection_id.to_string(),
            inventory_id: node.id.clone(),
            path: node.path.to_string(),
            title: Some(node.title.clone()),
            declared_scans: None,
        }
    }

    pub fn with_declared_scans(mut self, scans: u64) -> Self {
        self.declared_scans = Some(scans);
        self
    }
}

/// How inventory folders are placed under the output root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLayout {
    /// `<root>/<inventory>`
    #[default]
    Flat,
    /// `<root>/<collection>/<inventory>`
    NestedByCollection,
}

/// Final state of one inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InventoryStatus {
    /// All scans were processed (individual scans may still have failed).
    Completed,
    /// The inventory has no scans; nothing was downloaded.
    NoScans,
    /// The inventory could not be processed.
    Failed { reason: String },
}

/// A scan whose image could not be downloaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedScan {
    pub name: String,
    pub id: String,
    pub reason: String,
}

/// Outcome of processing one inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryReport {
    pub target: InventoryTarget,
    pub output_dir: PathBuf,
    #[serde(flatten)]
    pub status: InventoryStatus,
    /// Scan records retrieved from the metadata service.
    pub scans_total: usize,
    pub downloaded: usize,
    pub skipped_existing: usize,
    pub failed_scans: Vec<FailedScan>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concordance_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl InventoryReport {
    pub(crate) fn new(target: InventoryTarget, output_dir: PathBuf) -> Self {
        let now = Utc::now();
        Self {
            target,
            output_dir,
            status: InventoryStatus::Completed,
            scans_total: 0,
            downloaded: 0,
            skipped_existing: 0,
            failed_scans: Vec::new(),
            concordance_path: None,
            started_at: now,
            finished_at: now,
        }
    }

    pub(crate) fn failed(target: InventoryTarget, output_dir: PathBuf, reason: String) -> Self {
        let mut report = Self::new(target, output_dir);
        report.status = InventoryStatus::Failed { reason };
        report
    }

    /// Completed with every scan present on disk.
    pub fn is_clean(&self) -> bool {
        matches!(self.status, InventoryStatus::NoScans)
            || (self.status == InventoryStatus::Completed && self.failed_scans.is_empty())
    }
}

/// Outcome of a whole finding-aid run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub collection_id: String,
    pub title: String,
    pub inventories: Vec<InventoryReport>,
}

impl RunSummary {
    pub fn completed(&self) -> usize {
        self.count(|s| matches!(s, InventoryStatus::Completed))
    }

    pub fn no_scans(&self) -> usize {
        self.count(|s| matches!(s, InventoryStatus::NoScans))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, InventoryStatus::Failed { .. }))
    }

    /// Scans that failed inside otherwise completed inventories.
    pub fn failed_scans(&self) -> usize {
        self.inventories.iter().map(|r| r.failed_scans.len()).sum()
    }

    pub fn downloaded(&self) -> usize {
        self.inventories.iter().map(|r| r.downloaded).sum()
    }

    /// Any inventory or scan failed.
    pub fn has_failures(&self) -> bool {
        self.inventories.iter().any(|r| !r.is_clean())
    }

    fn count(&self, pred: impl Fn(&InventoryStatus) -> bool) -> usize {
        self.inventories.iter().filter(|r| pred(&r.status)).count()
    }
}

/// Progress notifications for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Scan metadata is known; downloads are about to start.
    InventoryStarted {
        inventory_id: String,
        output_dir: PathBuf,
        total: usize,
    },
    /// About to process scan `index` (1-based) of `total`.
    Scan {
        index: usize,
        total: usize,
        name: String,
    },
    /// The inventory was skipped.
    InventorySkipped { inventory_id: String, reason: String },
}
