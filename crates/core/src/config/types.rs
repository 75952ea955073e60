use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub images: ImagesConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub finding_aid: FindingAidConfig,
}

/// Scan metadata web service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MetadataConfig {
    /// Base URL; the collection id and inventory path are appended to it.
    #[serde(default = "default_metadata_url")]
    pub base_url: String,
    #[serde(default = "default_api_key")]
    pub api_key: String,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Name of the function the response body is wrapped in.
    #[serde(default = "default_callback")]
    pub callback: String,
    /// Scans requested per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Minimum spacing between two metadata requests, in milliseconds.
    #[serde(default = "default_page_delay")]
    pub page_delay_ms: u64,
    #[serde(default = "default_metadata_timeout")]
    pub timeout_secs: u64,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            base_url: default_metadata_url(),
            api_key: default_api_key(),
            lang: default_lang(),
            callback: default_callback(),
            page_size: default_page_size(),
            page_delay_ms: default_page_delay(),
            timeout_secs: default_metadata_timeout(),
        }
    }
}

fn default_metadata_url() -> String {
    "https://webservices.picturae.com/archives/scans/".to_string()
}

fn default_api_key() -> String {
    "eb37e65a-eb47-11e9-b95c-60f81db16c0e".to_string()
}

fn default_lang() -> String {
    "nl_NL".to_string()
}

fn default_callback() -> String {
    "callback_json8".to_string()
}

fn default_page_size() -> u32 {
    100
}

fn default_page_delay() -> u64 {
    600
}

fn default_metadata_timeout() -> u64 {
    60
}

/// Image download service configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ImagesConfig {
    /// Base URL; `<scan id>.jpg` is appended to it.
    #[serde(default = "default_images_url")]
    pub base_url: String,
    /// Pause after every image request, failed or not, in milliseconds.
    #[serde(default = "default_scan_delay")]
    pub scan_delay_ms: u64,
    #[serde(default = "default_images_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            base_url: default_images_url(),
            scan_delay_ms: default_scan_delay(),
            timeout_secs: default_images_timeout(),
        }
    }
}

fn default_images_url() -> String {
    "https://download-images.memorix.nl/ams/download/fullsize/".to_string()
}

fn default_scan_delay() -> u64 {
    1000
}

fn default_images_timeout() -> u64 {
    120
}

/// Output location configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_root")]
    pub root: PathBuf,
    /// Write `concordance.json` next to the scans of each inventory.
    #[serde(default = "default_concordance")]
    pub concordance: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            root: default_output_root(),
            concordance: default_concordance(),
        }
    }
}

fn default_output_root() -> PathBuf {
    PathBuf::from("data")
}

fn default_concordance() -> bool {
    true
}

/// Finding-aid document retrieval configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FindingAidConfig {
    #[serde(default = "default_finding_aid_timeout")]
    pub timeout_secs: u64,
}

impl Default for FindingAidConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_finding_aid_timeout(),
        }
    }
}

fn default_finding_aid_timeout() -> u64 {
    60
}
