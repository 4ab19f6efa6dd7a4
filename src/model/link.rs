//! Links embedded in element text.

use serde::{Deserialize, Serialize};

/// Where a link points to before it is resolved against the element tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetRef {
    /// A coordinate on a page
    Position {
        /// Page number (1-indexed)
        page: u32,
        /// X coordinate, as given by the document
        x: f64,
        /// Y coordinate, as given by the document
        y: f64,
    },

    /// A named destination missing from the destination table
    Unresolved {
        /// The destination key
        name: String,
    },
}

impl TargetRef {
    /// Create a coordinate target.
    pub fn position(page: u32, x: f64, y: f64) -> Self {
        TargetRef::Position { page, x, y }
    }

    /// Check if this target has a page coordinate.
    pub fn is_resolved(&self) -> bool {
        matches!(self, TargetRef::Position { .. })
    }

    /// Target page, if known.
    pub fn page(&self) -> Option<u32> {
        match self {
            TargetRef::Position { page, .. } => Some(*page),
            TargetRef::Unresolved { .. } => None,
        }
    }
}

/// A link whose source is a character range of an element or cell text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    /// Index of the first linked character
    pub idx_start: usize,

    /// Index after the last linked character
    pub idx_end: usize,

    /// Raw jump target
    pub pos_target: TargetRef,

    /// Resolved path (`chapter.3/chapter.3.2/table.2` or `page.4/56:789`),
    /// set by link resolution
    pub libpdf_target: Option<String>,
}

impl Link {
    /// Create an unresolved link.
    pub fn new(idx_start: usize, idx_end: usize, pos_target: TargetRef) -> Self {
        Self {
            idx_start,
            idx_end,
            pos_target,
            libpdf_target: None,
        }
    }

    /// Check if the link target has been resolved.
    pub fn is_resolved(&self) -> bool {
        self.libpdf_target.is_some()
    }

    /// The linked characters of the owning source text.
    pub fn source_chars(&self, text: &str) -> String {
        text.chars()
            .skip(self.idx_start)
            .take(self.idx_end.saturating_sub(self.idx_start))
            .collect()
    }
}
