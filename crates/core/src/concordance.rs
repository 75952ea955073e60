//! Scan name to scan identifier mapping.
//!
//! One concordance is built per inventory while its scans are downloaded and
//! written once at the end as `concordance.json`: a JSON object whose keys
//! are scan names in retrieval order and whose values are scan identifiers.

use std::path::Path;

use serde::ser::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};

/// File name of the concordance inside an inventory folder.
pub const CONCORDANCE_FILE: &str = "concordance.json";

/// Insertion-ordered `name -> id` mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Concordance {
    entries: Map<String, Value>,
}

impl Concordance {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a scan. Re-recording a name replaces its id in place.
    pub fn insert(&mut self, name: impl Into<String>, id: impl Into<String>) {
        self.entries.insert(name.into(), Value::String(id.into()));
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(Value::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Pretty-printed JSON with four-space indentation.
    pub fn to_pretty_json(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.entries.serialize(&mut serializer)?;
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    /// Write the concordance to `path`, replacing any previous file.
    pub async fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_pretty_json().map_err(std::io::Error::other)?;
        tokio::fs::write(path, json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_keys_keep_insertion_order() {
        let mut concordance = Concordance::new();
        concordance.insert("B", "2");
        concordance.insert("A", "1");
        concordance.insert("C", "3");
        assert_eq!(concordance.names().collect::<Vec<_>>(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_pretty_json_layout() {
        let mut concordance = Concordance::new();
        concordance.insert("A", "1");
        concordance.insert("B", "2");
        assert_eq!(
            concordance.to_pretty_json().unwrap(),
            "{\n    \"A\": \"1\",\n    \"B\": \"2\"\n}"
        );
    }

    #[test]
    fn test_reinsert_replaces_in_place() {
        let mut concordance = Concordance::new();
        concordance.insert("A", "1");
        concordance.insert("B", "2");
        concordance.insert("A", "9");
        assert_eq!(concordance.len(), 2);
        assert_eq!(concordance.get("A"), Some("9"));
        assert_eq!(concordance.names().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_concordance() {
        let concordance = Concordance::new();
        assert!(concordance.is_empty());
        assert_eq!(concordance.to_pretty_json().unwrap(), "{}");
    }

    #[tokio::test]
    async fn test_write_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(CONCORDANCE_FILE);

        let mut concordance = Concordance::new();
        concordance.insert("KLAC00169000001", "cb8e6db8-6dc7-50d6-97c1-6d6fa5284ab3");
        concordance.write(&path).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            parsed["KLAC00169000001"],
            "cb8e6db8-6dc7-50d6-97c1-6d6fa5284ab3"
        );
    }
}
