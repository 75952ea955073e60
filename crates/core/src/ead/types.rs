//! Finding-aid tree model.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::EadError;

/// Position of a node in the finding-aid hierarchy.
///
/// Holds the 1-based sibling ordinals from the root down to the node. The
/// root has no ordinals and displays as `"0"`; every other node displays as
/// its ordinals joined by dots (`"1.2.3"`).
///
/// Ordering compares ordinals segment by segment, so a parent sorts before
/// its descendants and `1.9` sorts before `1.10`. Sorting nodes by path
/// yields depth-first document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodePath(Vec<u32>);

impl NodePath {
    /// The root path (`"0"`).
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Path of the `index`-th (1-based) child of this node.
    pub fn child(&self, index: u32) -> Self {
        let mut ordinals = Vec::with_capacity(self.0.len() + 1);
        ordinals.extend_from_slice(&self.0);
        ordinals.push(index);
        Self(ordinals)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of levels below the root.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn ordinals(&self) -> &[u32] {
        &self.0
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("0");
        }
        for (i, ordinal) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", ordinal)?;
        }
        Ok(())
    }
}

impl FromStr for NodePath {
    type Err = EadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s == "0" {
            return Ok(Self::root());
        }
        s.split('.')
            .map(|part| match part.parse::<u32>() {
                Ok(n) if n > 0 => Ok(n),
                _ => Err(EadError::InvalidPath(s.to_string())),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl Serialize for NodePath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NodePath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Whether a node is a file-level unit or groups further units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// File-level unit; maps to one downloadable inventory.
    Leaf,
    /// Collection, series or subseries with children in document order.
    Branch(Vec<FindingAidNode>),
}

/// One archival description unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingAidNode {
    /// Archival identifier (`unitid`, or `eadid` for the root).
    pub id: String,
    /// Human-readable label.
    pub title: String,
    pub path: NodePath,
    pub kind: NodeKind,
}

impl FindingAidNode {
    pub fn leaf(id: impl Into<String>, title: impl Into<String>, path: NodePath) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path,
            kind: NodeKind::Leaf,
        }
    }

    pub fn branch(
        id: impl Into<String>,
        title: impl Into<String>,
        path: NodePath,
        children: Vec<FindingAidNode>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path,
            kind: NodeKind::Branch(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf)
    }

    /// Children in document order; empty for a leaf.
    pub fn children(&self) -> &[FindingAidNode] {
        match &self.kind {
            NodeKind::Leaf => &[],
            NodeKind::Branch(children) => children,
        }
    }
}

/// A parsed finding-aid document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FindingAid {
    pub root: FindingAidNode,
}

impl FindingAid {
    /// Collection identifier (`eadid`), used as the collection id upstream.
    pub fn collection_id(&self) -> &str {
        &self.root.id
    }

    pub fn title(&self) -> &str {
        &self.root.title
    }
}
