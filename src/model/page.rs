//! Page-level types.

use serde::{Deserialize, Serialize};

use super::position::page_id;

/// A single page in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Identifier (`page.<number>`)
    pub id: String,

    /// Page number (1-indexed)
    pub number: u32,

    /// Page width in points (1 point = 1/72 inch)
    pub width: f32,

    /// Page height in points
    pub height: f32,

    /// Paths of the elements positioned on this page, in tree order
    pub content: Vec<String>,
}

impl Page {
    /// Create a new page with the given dimensions.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            id: page_id(number),
            number,
            width,
            height,
            content: Vec::new(),
        }
    }

    /// Check if no element is positioned on the page.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}
