//! Scan orchestrator implementation.
//!
//! Runs inventories strictly one after another:
//! - Metadata: paged through [`ScanCatalog`], throttled per request
//! - Images: one scan at a time, with a pause after every request to the
//!   image service, failed ones included
//! - Concordance: written once per inventory after its last scan

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::concordance::{Concordance, CONCORDANCE_FILE};
use crate::downloader::{DownloadOutcome, ScanDownloader};
use crate::ead::{leaves, parse_finding_aid, FindingAid, FindingAidSource};
use crate::metadata::ScanCatalog;

use super::config::OrchestratorConfig;
use super::types::{
    FailedScan, InventoryReport, InventoryStatus, InventoryTarget, OrchestratorError,
    OutputLayout, ProgressEvent, RunSummary,
};

/// Callback invoked for every progress step.
pub type ProgressCallback = Arc<dyn Fn(&ProgressEvent) + Send + Sync>;

/// Drives inventories from scan metadata to image files on disk.
pub struct ScanOrchestrator {
    config: OrchestratorConfig,
    catalog: ScanCatalog,
    downloader: ScanDownloader,
    finding_aids: Arc<dyn FindingAidSource>,
    progress: Option<ProgressCallback>,
}

impl ScanOrchestrator {
    /// Create a new orchestrator.
    pub fn new(
        config: OrchestratorConfig,
        catalog: ScanCatalog,
        downloader: ScanDownloader,
        finding_aids: Arc<dyn FindingAidSource>,
    ) -> Self {
        Self {
            config,
            catalog,
            downloader,
            finding_aids,
            progress: None,
        }
    }

    /// Set a callback to be notified of progress.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress = Some(callback);
        self
    }

    /// Folder the scans of `target` are written to.
    pub fn output_dir(
        &self,
        target: &InventoryTarget,
        layout: OutputLayout,
    ) -> Result<PathBuf, OrchestratorError> {
        let mut dir = self.config.output_root.clone();
        if layout == OutputLayout::NestedByCollection {
            dir.push(folder_segment(&target.collection_id)?);
        }
        dir.push(folder_segment(&target.inventory_id)?);
        Ok(dir)
    }

    /// Download every scan of one inventory.
    ///
    /// Metadata failures abort the inventory. Individual image failures are
    /// logged, recorded in the report and do not stop the remaining scans.
    pub async fn run_inventory(
        &self,
        target: &InventoryTarget,
        layout: OutputLayout,
    ) -> Result<InventoryReport, OrchestratorError> {
        let output_dir = self.output_dir(target, layout)?;
        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|e| OrchestratorError::io(&output_dir, e))?;

        info!(
            collection = %target.collection_id,
            inventory = %target.inventory_id,
            path = %target.path,
            metadata = self.catalog.source_name(),
            images = self.downloader.source_name(),
            "Starting inventory"
        );

        let mut report = InventoryReport::new(target.clone(), output_dir.clone());

        let scans = self
            .catalog
            .fetch_all(&target.collection_id, &target.path, target.declared_scans)
            .await?;

        if scans.is_empty() {
            self.emit(ProgressEvent::InventorySkipped {
                inventory_id: target.inventory_id.clone(),
                reason: "no scans".to_string(),
            });
            report.status = InventoryStatus::NoScans;
            report.finished_at = Utc::now();
            return Ok(report);
        }

        let total = scans.len();
        report.scans_total = total;
        self.emit(ProgressEvent::InventoryStarted {
            inventory_id: target.inventory_id.clone(),
            output_dir: output_dir.clone(),
            total,
        });

        let scan_delay = Duration::from_millis(self.config.scan_delay_ms);
        let mut concordance = Concordance::new();

        for (index, scan) in scans.iter().enumerate() {
            let index = index + 1;
            debug!(index, total, name = %scan.name, "Processing scan");
            self.emit(ProgressEvent::Scan {
                index,
                total,
                name: scan.name.clone(),
            });

            let result = self
                .downloader
                .download(&scan.id, &scan.name, &output_dir)
                .await;
            let reached_service = match &result {
                Ok(outcome) => outcome.hit_network(),
                Err(e) => e.reached_service(),
            };

            match result {
                Ok(DownloadOutcome::Downloaded { path, bytes }) => {
                    debug!(path = %path.display(), bytes, "Downloaded scan");
                    report.downloaded += 1;
                }
                Ok(DownloadOutcome::SkippedExisting { .. }) => report.skipped_existing += 1,
                Err(e) => {
                    warn!(
                        inventory = %target.inventory_id,
                        name = %scan.name,
                        id = %scan.id,
                        "Failed to download scan: {}",
                        e
                    );
                    report.failed_scans.push(FailedScan {
                        name: scan.name.clone(),
                        id: scan.id.clone(),
                        reason: e.to_string(),
                    });
                }
            }

            // Pause after every request to the image service, failed ones included
            if reached_service && !scan_delay.is_zero() {
                tokio::time::sleep(scan_delay).await;
            }

            concordance.insert(scan.name.clone(), scan.id.clone());
        }

        if self.config.write_concordance {
            let path = output_dir.join(CONCORDANCE_FILE);
            concordance
                .write(&path)
                .await
                .map_err(|e| OrchestratorError::io(&path, e))?;
            debug!(path = %path.display(), entries = concordance.len(), "Wrote concordance");
            report.concordance_path = Some(path);
        }

        report.finished_at = Utc::now();
        info!(
            inventory = %target.inventory_id,
            downloaded = report.downloaded,
            skipped = report.skipped_existing,
            failed = report.failed_scans.len(),
            "Finished inventory"
        );

        Ok(report)
    }

    /// Fetch a finding aid and download every file-level inventory in it.
    pub async fn run_finding_aid(&self, url: &str) -> Result<RunSummary, OrchestratorError> {
        info!(url = url, source = self.finding_aids.name(), "Fetching finding aid");
        let xml = self.finding_aids.fetch(url).await?;
        let finding_aid = parse_finding_aid(&xml)?;
        Ok(self.run_parsed(&finding_aid).await)
    }

    /// Download every file-level inventory of an already parsed finding aid.
    ///
    /// Inventories are processed in document order. A failing inventory is
    /// recorded in the summary and the batch moves on.
    pub async fn run_parsed(&self, finding_aid: &FindingAid) -> RunSummary {
        let collection_id = finding_aid.collection_id();
        let targets: Vec<InventoryTarget> = leaves(&finding_aid.root)
            .into_iter()
            .map(|node| InventoryTarget::from_node(collection_id, node))
            .collect();

        info!(
            collection = collection_id,
            title = finding_aid.title(),
            inventories = targets.len(),
            "Running finding aid"
        );

        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.inventory_id.as_str()) {
                warn!(
                    collection = collection_id,
                    inventory = %target.inventory_id,
                    path = %target.path,
                    "Inventory id occurs more than once; its folder and concordance are shared"
                );
            }
        }

        let mut inventories = Vec::with_capacity(targets.len());
        for target in targets {
            let layout = OutputLayout::NestedByCollection;
            let report = match self.run_inventory(&target, layout).await {
                Ok(report) => report,
                Err(e) => self.failure_report(target, layout, e),
            };
            inventories.push(report);
        }

        let summary = RunSummary {
            collection_id: collection_id.to_string(),
            title: finding_aid.title().to_string(),
            inventories,
        };
        info!(
            collection = collection_id,
            completed = summary.completed(),
            no_scans = summary.no_scans(),
            failed = summary.failed(),
            failed_scans = summary.failed_scans(),
            "Finding aid run finished"
        );
        summary
    }

    fn failure_report(
        &self,
        target: InventoryTarget,
        layout: OutputLayout,
        err: OrchestratorError,
    ) -> InventoryReport {
        let output_dir = self
            .output_dir(&target, layout)
            .unwrap_or_else(|_| self.config.output_root.clone());
        let reason = err.to_string();

        if err.is_no_scans() {
            warn!(inventory = %target.inventory_id, "Skipping inventory: {}", reason);
            self.emit(ProgressEvent::InventorySkipped {
                inventory_id: target.inventory_id.clone(),
                reason,
            });
            let mut report = InventoryReport::new(target, output_dir);
            report.status = InventoryStatus::NoScans;
            return report;
        }

        error!(inventory = %target.inventory_id, "Inventory failed: {}", reason);
        self.emit(ProgressEvent::InventorySkipped {
            inventory_id: target.inventory_id.clone(),
            reason: reason.clone(),
        });
        InventoryReport::failed(target, output_dir, reason)
    }

    fn emit(&self, event: ProgressEvent) {
        if let Some(ref callback) = self.progress {
            callback(&event);
        }
    }
}

/// Identifiers become folder names; refuse anything that leaves the root.
fn folder_segment(id: &str) -> Result<&str, OrchestratorError> {
    let trimmed = id.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || id.contains(['/', '\\', '\0'])
        || Path::new(id).is_absolute()
    {
        return Err(OrchestratorError::InvalidTarget(id.to_string()));
    }
    Ok(id)
}
