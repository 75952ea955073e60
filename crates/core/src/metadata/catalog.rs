//! Complete scan list retrieval for one inventory.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::MetadataConfig;

use super::throttle::RequestThrottle;
use super::types::{PageRequest, ScanPage, ScanRecord};
use super::{MetadataError, ScanSource};

/// Pages through a [`ScanSource`] to collect all scans of an inventory.
///
/// Every request, including the count probe, goes through one
/// [`RequestThrottle`]: after each response, failed ones included, the next
/// call waits at least the configured page delay.
pub struct ScanCatalog {
    source: Arc<dyn ScanSource>,
    page_size: u32,
    throttle: RequestThrottle,
}

impl ScanCatalog {
    pub fn new(source: Arc<dyn ScanSource>, page_size: u32, page_delay: Duration) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            throttle: RequestThrottle::new(page_delay),
        }
    }

    pub fn from_config(source: Arc<dyn ScanSource>, config: &MetadataConfig) -> Self {
        Self::new(
            source,
            config.page_size,
            Duration::from_millis(config.page_delay_ms),
        )
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Name of the underlying metadata source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Ask the service how many scans an inventory has.
    ///
    /// Uses a single-record request so the probe stays cheap.
    pub async fn scan_count(&self, collection_id: &str, path: &str) -> Result<u64, MetadataError> {
        let page = self
            .request(PageRequest {
                collection_id: collection_id.to_string(),
                path: path.to_string(),
                start: 0,
                limit: 1,
            })
            .await?;
        debug!(
            collection = collection_id,
            path = path,
            scan_count = page.scan_count,
            "Probed scan count"
        );
        Ok(page.scan_count)
    }

    /// Retrieve every scan record of an inventory in service order.
    ///
    /// `declared` skips the probe when the count is already known. A count
    /// of zero yields an empty list; a nonzero count with no records at all
    /// is [`MetadataError::NoScans`].
    pub async fn fetch_all(
        &self,
        collection_id: &str,
        path: &str,
        declared: Option<u64>,
    ) -> Result<Vec<ScanRecord>, MetadataError> {
        let count = match declared {
            Some(n) => n,
            None => self.scan_count(collection_id, path).await?,
        };

        if count == 0 {
            info!(collection = collection_id, path = path, "Inventory has no scans");
            return Ok(Vec::new());
        }

        let page_size = u64::from(self.page_size);
        let pages = count.div_ceil(page_size);
        let mut scans = Vec::with_capacity(count.min(10_000) as usize);

        for page in 0..pages {
            let result = self
                .request(PageRequest {
                    collection_id: collection_id.to_string(),
                    path: path.to_string(),
                    start: page * page_size,
                    limit: self.page_size,
                })
                .await?;
            scans.extend(result.scans);
        }

        if scans.is_empty() {
            return Err(MetadataError::NoScans { declared: count });
        }
        if (scans.len() as u64) < count {
            warn!(
                collection = collection_id,
                path = path,
                declared = count,
                received = scans.len(),
                "Service returned fewer scans than declared"
            );
        }

        Ok(scans)
    }

    async fn request(&self, request: PageRequest) -> Result<ScanPage, MetadataError> {
        self.throttle.acquire().await;
        let result = self.source.fetch_page(&request).await;
        self.throttle.complete().await;
        result
    }
}
