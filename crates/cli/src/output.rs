//! Operator-facing output on stdout.

use std::path::Path;

use archiscan_core::{
    FindingAid, FindingAidNode, InventoryReport, InventoryStatus, ProgressEvent, RunSummary,
};

/// Render a progress event as the line printed for it.
pub fn progress_line(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::InventoryStarted { output_dir, .. } => {
            format!("Downloading scans to {}:", absolute(output_dir))
        }
        ProgressEvent::Scan { index, total, name } => {
            format!("\t{}/{}\t{}.jpg", index, total, name)
        }
        ProgressEvent::InventorySkipped {
            inventory_id,
            reason,
        } => format!("Skipping inventory {}: {}", inventory_id, reason),
    }
}

/// One-paragraph summary of a single inventory.
pub fn inventory_report(report: &InventoryReport) -> String {
    let mut out = String::new();
    match &report.status {
        InventoryStatus::Completed => out.push_str(&format!(
            "Inventory {}: {} downloaded, {} already present, {} failed\n",
            report.target.inventory_id,
            report.downloaded,
            report.skipped_existing,
            report.failed_scans.len()
        )),
        InventoryStatus::NoScans => out.push_str(&format!(
            "Inventory {}: no scans\n",
            report.target.inventory_id
        )),
        InventoryStatus::Failed { reason } => out.push_str(&format!(
            "Inventory {}: FAILED ({})\n",
            report.target.inventory_id, reason
        )),
    }
    for failed in &report.failed_scans {
        out.push_str(&format!("\t{}.jpg ({}): {}\n", failed.name, failed.id, failed.reason));
    }
    out
}

/// End-of-run summary of a finding-aid batch.
pub fn run_summary(summary: &RunSummary) -> String {
    let mut out = format!(
        "\n{} ({}): {} inventories\n",
        summary.title,
        summary.collection_id,
        summary.inventories.len()
    );
    for report in &summary.inventories {
        out.push_str(&inventory_report(report));
    }
    out.push_str(&format!(
        "Completed: {}, without scans: {}, failed: {}, failed scans: {}\n",
        summary.completed(),
        summary.no_scans(),
        summary.failed(),
        summary.failed_scans()
    ));
    out
}

/// Tab-separated `path, unitid, title` rows for the file-level units.
pub fn leaf_listing(finding_aid: &FindingAid, leaves: &[&FindingAidNode]) -> String {
    let mut out = format!("{}\t{}\n", finding_aid.collection_id(), finding_aid.title());
    for node in leaves {
        out.push_str(&format!("{}\t{}\t{}\n", node.path, node.id, node.title));
    }
    out
}

fn absolute(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use archiscan_core::{leaves, parse_finding_aid, testing::fixtures};

    #[test]
    fn test_scan_progress_line() {
        let line = progress_line(&ProgressEvent::Scan {
            index: 3,
            total: 120,
            name: "KLAC00169000003".to_string(),
        });
        assert_eq!(line, "\t3/120\tKLAC00169000003.jpg");
    }

    #[test]
    fn test_leaf_listing() {
        let xml = fixtures::FindingAidXml::new("5075", "Notarissen")
            .series("A", "Protocollen", &[("169", "Akten 1650")])
            .file("200", "Los")
            .build();
        let finding_aid = parse_finding_aid(&xml).unwrap();
        let listing = leaf_listing(&finding_aid, &leaves(&finding_aid.root));
        assert_eq!(
            listing,
            "5075\tNotarissen\n1.1\t169\tAkten 1650\n2\t200\tLos\n"
        );
    }
}
