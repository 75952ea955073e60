//! Mock scan metadata source for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::metadata::{MetadataError, PageRequest, ScanPage, ScanRecord, ScanSource};

type InventoryKey = (String, String);

/// Internal state for a mock inventory.
#[derive(Debug, Clone, Default)]
struct MockInventory {
    scans: Vec<ScanRecord>,
    /// Overrides the count reported by the service.
    declared: Option<u64>,
}

/// Mock implementation of the ScanSource trait.
///
/// Provides controllable behavior for testing:
/// - Serve configurable scan lists per `(collection, path)`
/// - Report a declared count that differs from the records served
/// - Track page requests for assertions
/// - Simulate failures per inventory or at the n-th request
///
/// Unknown inventories answer with an API 404.
#[derive(Debug)]
pub struct MockScanSource {
    inventories: Arc<RwLock<HashMap<InventoryKey, MockInventory>>>,
    /// Inventories that answer with an error status.
    failing: Arc<RwLock<HashMap<InventoryKey, u16>>>,
    /// Fail the n-th request (1-based) with this error.
    fail_at: Arc<RwLock<Option<(usize, MetadataError)>>>,
    requests: Arc<RwLock<Vec<PageRequest>>>,
}

impl Default for MockScanSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScanSource {
    /// Create a new mock source without inventories.
    pub fn new() -> Self {
        Self {
            inventories: Arc::new(RwLock::new(HashMap::new())),
            failing: Arc::new(RwLock::new(HashMap::new())),
            fail_at: Arc::new(RwLock::new(None)),
            requests: Arc::new(RwLock::new(Vec::new())),
        }
    }

    /// Serve `scans` for an inventory; the declared count is their number.
    pub async fn set_inventory(&self, collection_id: &str, path: &str, scans: Vec<ScanRecord>) {
        self.inventories
            .write()
            .await
            .entry(key(collection_id, path))
            .or_default()
            .scans = scans;
    }

    /// Report `count` as the inventory's scan count regardless of its records.
    pub async fn set_declared_count(&self, collection_id: &str, path: &str, count: u64) {
        self.inventories
            .write()
            .await
            .entry(key(collection_id, path))
            .or_default()
            .declared = Some(count);
    }

    /// Answer every request for an inventory with an API error.
    pub async fn fail_inventory(&self, collection_id: &str, path: &str, status: u16) {
        self.failing
            .write()
            .await
            .insert(key(collection_id, path), status);
    }

    /// Fail the `n`-th request (1-based, across all inventories) with `error`.
    pub async fn fail_request_at(&self, n: usize, error: MetadataError) {
        *self.fail_at.write().await = Some((n, error));
    }

    /// Get all recorded page requests.
    pub async fn recorded_requests(&self) -> Vec<PageRequest> {
        self.requests.read().await.clone()
    }
}

fn key(collection_id: &str, path: &str) -> InventoryKey {
    (collection_id.to_string(), path.to_string())
}

#[async_trait]
impl ScanSource for MockScanSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_page(&self, request: &PageRequest) -> Result<ScanPage, MetadataError> {
        let count = {
            let mut requests = self.requests.write().await;
            requests.push(request.clone());
            requests.len()
        };

        {
            let mut fail_at = self.fail_at.write().await;
            if matches!(*fail_at, Some((n, _)) if n == count) {
                if let Some((_, error)) = fail_at.take() {
                    return Err(error);
                }
            }
        }

        let key = key(&request.collection_id, &request.path);
        if let Some(status) = self.failing.read().await.get(&key) {
            return Err(MetadataError::Api {
                status: *status,
                message: "mock failure".to_string(),
            });
        }

        let inventories = self.inventories.read().await;
        let inventory = inventories.get(&key).ok_or_else(|| MetadataError::Api {
            status: 404,
            message: format!("unknown inventory {}/{}", key.0, key.1),
        })?;

        let len = inventory.scans.len();
        let start = usize::try_from(request.start).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(request.limit as usize).min(len);

        Ok(ScanPage {
            scan_count: inventory.declared.unwrap_or(len as u64),
            scans: inventory.scans[start..end].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    fn request(start: u64, limit: u32) -> PageRequest {
        PageRequest {
            collection_id: "c".to_string(),
            path: "1".to_string(),
            start,
            limit,
        }
    }

    #[tokio::test]
    async fn test_serves_windows() {
        let source = MockScanSource::new();
        source
            .set_inventory("c", "1", fixtures::scan_records("S", 5))
            .await;

        let page = source.fetch_page(&request(3, 10)).await.unwrap();
        assert_eq!(page.scan_count, 5);
        assert_eq!(page.scans.len(), 2);
        assert_eq!(page.scans[0].name, "S00004");

        let page = source.fetch_page(&request(10, 10)).await.unwrap();
        assert!(page.scans.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_inventory_is_404() {
        let source = MockScanSource::new();
        let err = source.fetch_page(&request(0, 1)).await.unwrap_err();
        assert!(matches!(err, MetadataError::Api { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_fail_request_at_only_once() {
        let source = MockScanSource::new();
        source.set_inventory("c", "1", vec![]).await;
        source
            .fail_request_at(1, MetadataError::Envelope("x".to_string()))
            .await;

        assert!(source.fetch_page(&request(0, 1)).await.is_err());
        assert!(source.fetch_page(&request(0, 1)).await.is_ok());
        assert_eq!(source.recorded_requests().await.len(), 2);
    }
}
