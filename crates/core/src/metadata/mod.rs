//! Scan metadata retrieval.
//!
//! The archive's scan service answers paginated requests with a JSON body
//! wrapped in a callback-style envelope. [`PicturaeClient`] speaks that
//! protocol for a single page; [`ScanCatalog`] drives it to retrieve the
//! complete scan list of an inventory, honoring the courtesy delay between
//! requests.

mod catalog;
mod envelope;
mod picturae;
mod throttle;
mod types;

pub use catalog::ScanCatalog;
pub use envelope::{decode_scan_page, strip_callback_envelope};
pub use picturae::PicturaeClient;
pub use throttle::RequestThrottle;
pub use types::{PageRequest, ScanPage, ScanRecord};

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when retrieving scan metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The callback wrapper around the JSON body did not match.
    #[error("Malformed response envelope: {0}")]
    Envelope(String),

    /// The unwrapped body is not the expected JSON.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The service declared scans but returned none.
    #[error("Service declared {declared} scans but returned none")]
    NoScans { declared: u64 },
}

impl MetadataError {
    /// Whether this is the "declared scans, got none" condition.
    pub fn is_no_scans(&self) -> bool {
        matches!(self, Self::NoScans { .. })
    }
}

/// A source of scan metadata pages.
#[async_trait]
pub trait ScanSource: Send + Sync {
    /// Returns the name of this source implementation.
    fn name(&self) -> &str;

    /// Fetch one page of scan records.
    ///
    /// The returned page carries the total scan count declared by the
    /// service alongside the records of the requested window.
    async fn fetch_page(&self, request: &PageRequest) -> Result<ScanPage, MetadataError>;
}
