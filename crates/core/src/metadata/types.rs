use serde::{Deserialize, Deserializer, Serialize};

/// One digitized page of an inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRecord {
    /// Opaque upstream identifier (a UUID in practice).
    pub id: String,
    /// Output filename stem, unique within an inventory.
    pub name: String,
}

impl ScanRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Parameters of a single metadata page request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub collection_id: String,
    /// Hierarchical path of the inventory, e.g. `"1.6"`.
    pub path: String,
    pub start: u64,
    pub limit: u32,
}

/// One page of scan metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanPage {
    /// Total number of scans the service declares for the inventory.
    pub scan_count: u64,
    pub scans: Vec<ScanRecord>,
}

/// `{"scans": {"scancount": N, "scans": [...]}}`
#[derive(Debug, Deserialize)]
pub(crate) struct ScansResponse {
    pub scans: ScansBody,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScansBody {
    #[serde(deserialize_with = "lenient_count")]
    pub scancount: u64,
    #[serde(default)]
    pub scans: Vec<ScanRecord>,
}

impl From<ScansResponse> for ScanPage {
    fn from(response: ScansResponse) -> Self {
        Self {
            scan_count: response.scans.scancount,
            scans: response.scans.scans,
        }
    }
}

/// Accepts the count as a JSON number or a numeric string.
fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}
