//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of every external service
//! trait, so the metadata paging, the downloader and the orchestrator can be
//! exercised end to end without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use archiscan_core::testing::{fixtures, MockImageSource, MockScanSource};
//!
//! let scans = MockScanSource::new();
//! let images = MockImageSource::new();
//!
//! // Configure an inventory with three scans and serve their images
//! let records = fixtures::scan_records("KLAC", 3);
//! scans.set_inventory("5075", "1.6", records.clone()).await;
//! for record in &records {
//!     images.set_image(&record.id, b"jpeg".to_vec()).await;
//! }
//! ```

mod mock_finding_aid_source;
mod mock_image_source;
mod mock_scan_source;

pub use mock_finding_aid_source::MockFindingAidSource;
pub use mock_image_source::MockImageSource;
pub use mock_scan_source::MockScanSource;

/// Test fixtures and helper functions.
pub mod fixtures {
    use quick_xml::escape::escape;

    use crate::metadata::ScanRecord;

    /// `n` scan records named `<prefix>00001` .. `<prefix>{n:05}`.
    ///
    /// Ids are unique per prefix and index.
    pub fn scan_records(prefix: &str, n: usize) -> Vec<ScanRecord> {
        (1..=n)
            .map(|i| {
                ScanRecord::new(
                    format!("{}-{:08x}-uuid", prefix.to_lowercase(), i),
                    format!("{}{:05}", prefix, i),
                )
            })
            .collect()
    }

    /// Builder for small EAD documents.
    ///
    /// Series become `c` elements with nested file-level `c` children; files
    /// added with [`FindingAidXml::file`] sit directly under `dsc`.
    #[derive(Debug, Clone)]
    pub struct FindingAidXml {
        eadid: String,
        title: String,
        units: Vec<Unit>,
    }

    #[derive(Debug, Clone)]
    struct Unit {
        id: String,
        title: String,
        files: Vec<(String, String)>,
    }

    impl FindingAidXml {
        pub fn new(eadid: &str, title: &str) -> Self {
            Self {
                eadid: eadid.to_string(),
                title: title.to_string(),
                units: Vec::new(),
            }
        }

        /// Add a series holding the given `(unitid, unittitle)` files.
        pub fn series(mut self, id: &str, title: &str, files: &[(&str, &str)]) -> Self {
            self.units.push(Unit {
                id: id.to_string(),
                title: title.to_string(),
                files: files
                    .iter()
                    .map(|(id, title)| (id.to_string(), title.to_string()))
                    .collect(),
            });
            self
        }

        /// Add a file-level unit directly under the collection.
        pub fn file(mut self, id: &str, title: &str) -> Self {
            self.units.push(Unit {
                id: id.to_string(),
                title: title.to_string(),
                files: Vec::new(),
            });
            self
        }

        pub fn build(&self) -> String {
            let mut xml = String::new();
            xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            xml.push_str(r#"<ead xmlns="urn:isbn:1-931666-22-9"><eadheader>"#);
            xml.push_str(&format!("<eadid>{}</eadid>", escape(&self.eadid)));
            xml.push_str(&format!(
                "<filedesc><titlestmt><titleproper>{}</titleproper></titlestmt></filedesc>",
                escape(&self.title)
            ));
            xml.push_str(r#"</eadheader><archdesc level="fonds"><dsc>"#);
            for unit in &self.units {
                if unit.files.is_empty() {
                    push_unit(&mut xml, "file", &unit.id, &unit.title);
                    xml.push_str("</c>");
                    continue;
                }
                push_unit(&mut xml, "series", &unit.id, &unit.title);
                for (id, title) in &unit.files {
                    push_unit(&mut xml, "file", id, title);
                    xml.push_str("</c>");
                }
                xml.push_str("</c>");
            }
            xml.push_str("</dsc></archdesc></ead>");
            xml
        }
    }

    // Opens a `c` element; the caller closes it.
    fn push_unit(xml: &mut String, level: &str, id: &str, title: &str) {
        xml.push_str(&format!(
            r#"<c level="{}"><did><unitid>{}</unitid><unittitle>{}</unittitle></did>"#,
            level,
            escape(id),
            escape(title)
        ));
    }
}
