//! Finding-aid batch integration tests.
//!
//! These tests verify the complete finding-aid flow through the orchestrator:
//! fetch -> parse -> flatten -> per-inventory download -> summary

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use archiscan_core::{
    leaves, parse_finding_aid,
    testing::{fixtures, MockFindingAidSource, MockImageSource, MockScanSource},
    InventoryStatus, OrchestratorConfig, OrchestratorError, ScanCatalog, ScanDownloader,
    ScanOrchestrator, ScanRecord, CONCORDANCE_FILE,
};

const URL: &str = "https://archief.example.org/ead/5075.xml";

struct TestHarness {
    scans: Arc<MockScanSource>,
    images: Arc<MockImageSource>,
    finding_aids: Arc<MockFindingAidSource>,
    root: PathBuf,
    _temp_dir: TempDir,
}

impl TestHarness {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            scans: Arc::new(MockScanSource::new()),
            images: Arc::new(MockImageSource::new()),
            finding_aids: Arc::new(MockFindingAidSource::new()),
            root: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        }
    }

    fn orchestrator(&self) -> ScanOrchestrator {
        let config = OrchestratorConfig {
            output_root: self.root.clone(),
            write_concordance: true,
            scan_delay_ms: 0,
        };
        ScanOrchestrator::new(
            config,
            ScanCatalog::new(self.scans.clone(), 100, Duration::ZERO),
            ScanDownloader::new(self.images.clone()),
            self.finding_aids.clone(),
        )
    }

    async fn serve(&self, path: &str, records: &[ScanRecord]) {
        self.scans
            .set_inventory("5075", path, records.to_vec())
            .await;
        for record in records {
            self.images
                .set_image(&record.id, record.name.as_bytes().to_vec())
                .await;
        }
    }
}

#[tokio::test]
async fn test_series_with_two_files() {
    let harness = TestHarness::new();
    let xml = fixtures::FindingAidXml::new("5075", "Archief van de Notarissen")
        .series("A", "Protocollen", &[("169", "Akten 1650"), ("170", "Akten 1651")])
        .build();
    harness.finding_aids.set_document(URL, &xml).await;
    harness
        .serve("1.1", &fixtures::scan_records("KLAC169", 2))
        .await;
    harness
        .serve("1.2", &fixtures::scan_records("KLAC170", 3))
        .await;

    let summary = harness.orchestrator().run_finding_aid(URL).await.unwrap();

    assert_eq!(summary.collection_id, "5075");
    assert_eq!(summary.title, "Archief van de Notarissen");
    assert_eq!(summary.completed(), 2);
    assert_eq!(summary.downloaded(), 5);
    assert!(!summary.has_failures());

    let collection = harness.root.join("5075");
    for (inventory, first) in [("169", "KLAC16900001"), ("170", "KLAC17000001")] {
        let folder = collection.join(inventory);
        assert!(folder.join(format!("{}.jpg", first)).exists());
        assert!(folder.join(CONCORDANCE_FILE).exists());
    }
    assert!(collection.join("170").join("KLAC17000003.jpg").exists());
    assert_eq!(harness.finding_aids.recorded_fetches().await, vec![URL.to_string()]);
}

#[tokio::test]
async fn test_inventories_run_in_document_order() {
    let harness = TestHarness::new();
    let files: Vec<(String, String)> = (1..=11)
        .map(|i| (format!("{}", 100 + i), format!("Deel {}", i)))
        .collect();
    let refs: Vec<(&str, &str)> = files
        .iter()
        .map(|(id, title)| (id.as_str(), title.as_str()))
        .collect();
    let xml = fixtures::FindingAidXml::new("5075", "T")
        .series("A", "Reeks", &refs)
        .file("200", "Los")
        .build();
    harness.finding_aids.set_document(URL, &xml).await;
    for i in 1..=11 {
        harness.serve(&format!("1.{}", i), &[]).await;
    }
    harness.serve("2", &[]).await;

    let summary = harness.orchestrator().run_finding_aid(URL).await.unwrap();

    let paths: Vec<&str> = summary
        .inventories
        .iter()
        .map(|r| r.target.path.as_str())
        .collect();
    assert_eq!(
        paths,
        vec!["1.1", "1.2", "1.3", "1.4", "1.5", "1.6", "1.7", "1.8", "1.9", "1.10", "1.11", "2"]
    );
    assert_eq!(summary.no_scans(), 12);

    // metadata requests follow the same order
    let probed: Vec<String> = harness
        .scans
        .recorded_requests()
        .await
        .into_iter()
        .map(|r| r.path)
        .collect();
    assert_eq!(probed[9], "1.10");
    assert_eq!(probed[11], "2");
}

#[tokio::test]
async fn test_failing_inventory_does_not_stop_batch() {
    let harness = TestHarness::new();
    let xml = fixtures::FindingAidXml::new("5075", "T")
        .file("1", "een")
        .file("2", "twee")
        .file("3", "drie")
        .build();
    harness.finding_aids.set_document(URL, &xml).await;
    harness.serve("1", &fixtures::scan_records("A", 1)).await;
    harness.scans.fail_inventory("5075", "2", 503).await;
    harness.serve("3", &fixtures::scan_records("C", 1)).await;

    let summary = harness.orchestrator().run_finding_aid(URL).await.unwrap();

    assert_eq!(summary.completed(), 2);
    assert_eq!(summary.failed(), 1);
    assert!(summary.has_failures());
    match &summary.inventories[1].status {
        InventoryStatus::Failed { reason } => assert!(reason.contains("503"), "{}", reason),
        other => panic!("expected failure, got {:?}", other),
    }
    assert!(harness.root.join("5075").join("3").join("C00001.jpg").exists());
}

#[tokio::test]
async fn test_unreachable_finding_aid_is_fatal() {
    let harness = TestHarness::new();
    harness.finding_aids.fail_url(URL, 502).await;

    let err = harness.orchestrator().run_finding_aid(URL).await.unwrap_err();
    assert!(matches!(err, OrchestratorError::FindingAid(_)));
    assert!(harness.scans.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_entry_without_title_aborts_before_downloads() {
    let harness = TestHarness::new();
    let xml = r#"<ead><eadheader><eadid>5075</eadid><titleproper>T</titleproper></eadheader>
        <archdesc><dsc>
            <c><did><unitid>1</unitid><unittitle>ok</unittitle></did></c>
            <c><did><unitid>2</unitid></did></c>
        </dsc></archdesc></ead>"#;
    harness.finding_aids.set_document(URL, xml).await;

    let err = harness.orchestrator().run_finding_aid(URL).await.unwrap_err();
    match err {
        OrchestratorError::FindingAid(e) => {
            assert!(e.is_malformed());
            assert!(e.to_string().contains("unittitle"));
            assert!(e.to_string().contains(" 2"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(harness.scans.recorded_requests().await.is_empty());
}

#[tokio::test]
async fn test_run_parsed_matches_leaves() {
    let harness = TestHarness::new();
    let xml = fixtures::FindingAidXml::new("5075", "T")
        .series("A", "Reeks", &[("10", "x"), ("11", "y")])
        .build();
    let finding_aid = parse_finding_aid(&xml).unwrap();
    harness.serve("1.1", &fixtures::scan_records("X", 1)).await;
    harness.serve("1.2", &fixtures::scan_records("Y", 1)).await;

    let summary = harness.orchestrator().run_parsed(&finding_aid).await;

    let ids: Vec<&str> = summary
        .inventories
        .iter()
        .map(|r| r.target.inventory_id.as_str())
        .collect();
    let expected: Vec<&str> = leaves(&finding_aid.root)
        .iter()
        .map(|n| n.id.as_str())
        .collect();
    assert_eq!(ids, expected);
    assert_eq!(summary.completed(), 2);
}
