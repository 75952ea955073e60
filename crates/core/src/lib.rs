pub mod concordance;
pub mod config;
pub mod downloader;
pub mod ead;
pub mod metadata;
pub mod orchestrator;
pub mod testing;

pub use concordance::{Concordance, CONCORDANCE_FILE};
pub use config::{
    load_config, load_config_from_env, load_config_from_str, validate_config, Config,
    ConfigError, FindingAidConfig, ImagesConfig, MetadataConfig, OutputConfig,
};
pub use downloader::{
    DownloadError, DownloadOutcome, ImageBody, ImageSource, MemorixImageSource, ScanDownloader,
};
pub use ead::{
    flatten, leaves, parse_finding_aid, EadError, FileFindingAidSource, FindingAid,
    FindingAidNode, FindingAidSource, HttpFindingAidSource, NodeKind, NodePath,
};
pub use metadata::{
    MetadataError, PageRequest, PicturaeClient, ScanCatalog, ScanPage, ScanRecord, ScanSource,
};
pub use orchestrator::{
    FailedScan, InventoryReport, InventoryStatus, InventoryTarget, OrchestratorConfig,
    OrchestratorError, OutputLayout, ProgressCallback, ProgressEvent, RunSummary,
    ScanOrchestrator,
};
