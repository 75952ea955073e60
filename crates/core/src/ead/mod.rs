//! Finding-aid (EAD) handling.
//!
//! This module turns an Encoded Archival Description document into an owned
//! tree of [`FindingAidNode`]s and flattens that tree into the ordered list
//! of file-level units that can be downloaded as inventories.

mod flatten;
mod parser;
mod source;
mod types;

pub use flatten::{flatten, leaves};
pub use parser::parse_finding_aid;
pub use source::{FileFindingAidSource, FindingAidSource, HttpFindingAidSource};
pub use types::{FindingAid, FindingAidNode, NodeKind, NodePath};

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while fetching or parsing a finding aid.
#[derive(Debug, Error)]
pub enum EadError {
    /// The document is not well-formed XML.
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// The document ended inside an open element.
    #[error("Unexpected end of document inside <{0}>")]
    UnexpectedEof(String),

    /// A structural element the parser relies on is absent.
    #[error("Finding aid has no <{0}> element")]
    MissingElement(&'static str),

    /// A descriptive unit lacks a required identity field.
    #[error("Missing or empty <{field}> for node {path}")]
    MissingField { field: &'static str, path: NodePath },

    /// A dotted path string could not be parsed.
    #[error("Invalid node path: {0:?}")]
    InvalidPath(String),

    /// HTTP request for the document failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A local finding-aid file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The server answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
}

impl EadError {
    /// Whether the error comes from the document contents rather than transport.
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Self::Xml(_)
                | Self::UnexpectedEof(_)
                | Self::MissingElement(_)
                | Self::MissingField { .. }
        )
    }
}
