//! Scan image downloading.
//!
//! [`ScanDownloader`] persists one scan per call as `<name>.jpg`, streaming
//! the body from an [`ImageSource`] to disk. Existing files are skipped.

mod error;
mod memorix;
mod traits;
mod writer;

pub use error::DownloadError;
pub use memorix::MemorixImageSource;
pub use traits::{ImageBody, ImageSource};
pub use writer::{DownloadOutcome, ScanDownloader};
