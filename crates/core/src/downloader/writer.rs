//! Idempotent scan image writer.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, warn};

use super::error::DownloadError;
use super::traits::ImageSource;

/// Buffer size for image writes (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// What happened to one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// The image was fetched and written.
    Downloaded { path: PathBuf, bytes: u64 },
    /// A file with the target name already existed; nothing was fetched.
    SkippedExisting { path: PathBuf },
}

impl DownloadOutcome {
    /// Whether the image service was contacted.
    pub fn hit_network(&self) -> bool {
        matches!(self, Self::Downloaded { .. })
    }
}

/// Writes scan images to `<folder>/<name>.jpg`.
///
/// An existing destination file is never touched and never re-fetched. The
/// check is the only resume mechanism: a file left behind by an interrupted
/// process is not verified.
pub struct ScanDownloader {
    source: Arc<dyn ImageSource>,
}

impl ScanDownloader {
    pub fn new(source: Arc<dyn ImageSource>) -> Self {
        Self { source }
    }

    /// Name of the underlying image source.
    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Destination of a scan image inside `folder`.
    pub fn image_path(folder: &Path, name: &str) -> Result<PathBuf, DownloadError> {
        validate_name(name)?;
        Ok(folder.join(format!("{}.jpg", name)))
    }

    /// Download one scan unless its file already exists.
    pub async fn download(
        &self,
        scan_id: &str,
        name: &str,
        folder: &Path,
    ) -> Result<DownloadOutcome, DownloadError> {
        let path = Self::image_path(folder, name)?;

        if fs::try_exists(&path).await.unwrap_or(false) {
            debug!(path = %path.display(), "Scan already present, skipping");
            return Ok(DownloadOutcome::SkippedExisting { path });
        }

        let mut body = self.source.open(scan_id).await?;

        let file = File::create(&path)
            .await
            .map_err(|e| DownloadError::write_failed(path.clone(), e))?;
        let mut writer = BufWriter::with_capacity(BUFFER_SIZE, file);
        let mut total_bytes = 0u64;

        let result: Result<(), DownloadError> = async {
            while let Some(chunk) = body.next_chunk().await? {
                writer
                    .write_all(&chunk)
                    .await
                    .map_err(|e| DownloadError::write_failed(path.clone(), e))?;
                total_bytes += chunk.len() as u64;
            }
            writer
                .flush()
                .await
                .map_err(|e| DownloadError::write_failed(path.clone(), e))
        }
        .await;

        if let Err(e) = result {
            drop(writer);
            if let Err(remove_err) = fs::remove_file(&path).await {
                warn!(
                    path = %path.display(),
                    "Failed to remove partial scan file: {}",
                    remove_err
                );
            }
            return Err(e);
        }

        debug!(path = %path.display(), bytes = total_bytes, "Scan written");
        Ok(DownloadOutcome::Downloaded {
            path,
            bytes: total_bytes,
        })
    }
}

/// Scan names become file names; reject anything that leaves the folder.
fn validate_name(name: &str) -> Result<(), DownloadError> {
    let trimmed = name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || name.contains(['/', '\\', '\0'])
    {
        return Err(DownloadError::InvalidName(name.to_string()));
    }
    Ok(())
}
