//! Layout provider abstraction layer.
//!
//! Provides a trait-based interface to the low-level layout analysis
//! (text boxes, table grids, images, annotations, outline), isolating the
//! concrete PDF library from the structural resolution logic.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::BBox;

/// Size and number of a physical page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub number: u32,
    /// Page width in points
    pub width: f32,
    /// Page height in points
    pub height: f32,
}

/// A text region found by layout analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTextBox {
    pub bbox: BBox,
    pub text: String,
}

/// A detected table grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub bbox: BBox,
    #[serde(default)]
    pub cells: Vec<RawCell>,
    #[serde(default)]
    pub caption: Option<String>,
}

/// One cell of a table grid; rows and columns are 1-indexed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawCell {
    pub row: u32,
    pub col: u32,
    pub bbox: BBox,
    #[serde(default)]
    pub text: String,
}

/// An image placed on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFigure {
    pub bbox: BBox,
    /// Path or reference of the extracted image
    pub image_ref: String,
    #[serde(default)]
    pub caption: Option<String>,
}

/// A filled rectangle drawn on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRect {
    pub bbox: BBox,
    #[serde(default)]
    pub non_stroking_color: Option<Vec<f32>>,
}

/// Jump target of an outline entry or link annotation.
///
/// In a layout dump a named target is a plain string and an explicit one an
/// object with `page`, `x` and `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTarget {
    Explicit { page: u32, x: f64, y: f64 },
    Named(String),
}

/// A resolved named destination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub page: u32,
    pub x: f64,
    pub y: f64,
}

/// A node of the document outline (bookmarks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOutlineNode {
    pub title: String,
    pub target: RawTarget,
    #[serde(default)]
    pub children: Vec<RawOutlineNode>,
}

impl RawOutlineNode {
    /// Create an outline node without children.
    pub fn new(title: impl Into<String>, target: RawTarget) -> Self {
        Self {
            title: title.into(),
            target,
            children: Vec::new(),
        }
    }

    /// Add a child node and return self.
    pub fn with_child(mut self, child: RawOutlineNode) -> Self {
        self.children.push(child);
        self
    }
}

/// A link annotation. `char_range` is the linked character range of the
/// underlying text, when the layout analysis knows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawLinkAnnotation {
    pub rect: BBox,
    #[serde(default)]
    pub char_range: Option<(usize, usize)>,
    pub target: RawTarget,
}

/// Everything the layout analysis reported for one page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub text_boxes: Vec<RawTextBox>,
    pub tables: Vec<RawTable>,
    pub figures: Vec<RawFigure>,
    pub rects: Vec<RawRect>,
}

/// Abstract interface to layout analysis results.
///
/// Implementations provide page enumeration, per-page regions and the
/// document catalog without exposing any concrete PDF library types.
pub trait LayoutProvider {
    /// Return all pages in page order.
    fn pages(&self) -> Result<Vec<PageInfo>>;

    /// Return the text boxes of a page.
    fn text_boxes(&self, page: u32) -> Result<Vec<RawTextBox>>;

    /// Return the detected tables of a page.
    fn tables(&self, page: u32) -> Result<Vec<RawTable>>;

    /// Return the figures of a page.
    fn figures(&self, page: u32) -> Result<Vec<RawFigure>>;

    /// Return the filled rectangles of a page.
    fn rects(&self, _page: u32) -> Result<Vec<RawRect>> {
        Ok(Vec::new())
    }

    /// Return the document outline.
    fn outline(&self) -> Result<Vec<RawOutlineNode>>;

    /// Return the named destination table.
    fn named_destinations(&self) -> Result<HashMap<String, Destination>>;

    /// Return the link annotations of a page.
    fn link_annotations(&self, page: u32) -> Result<Vec<RawLinkAnnotation>>;

    /// Gather all regions of a page.
    fn page_layout(&self, page: u32) -> Result<PageLayout> {
        Ok(PageLayout {
            text_boxes: self.text_boxes(page)?,
            tables: self.tables(page)?,
            figures: self.figures(page)?,
            rects: self.rects(page)?,
        })
    }
}

// ---------------------------------------------------------------------------
// MemoryProvider: in-memory implementation, loadable from a JSON layout dump
// ---------------------------------------------------------------------------

/// Layout data of one page held by a [`MemoryProvider`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryPage {
    pub number: u32,
    pub width: f32,
    pub height: f32,
    #[serde(default)]
    pub text_boxes: Vec<RawTextBox>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
    #[serde(default)]
    pub figures: Vec<RawFigure>,
    #[serde(default)]
    pub rects: Vec<RawRect>,
    #[serde(default)]
    pub link_annotations: Vec<RawLinkAnnotation>,
}

impl MemoryPage {
    /// Create an empty page.
    pub fn new(number: u32, width: f32, height: f32) -> Self {
        Self {
            number,
            width,
            height,
            text_boxes: Vec::new(),
            tables: Vec::new(),
            figures: Vec::new(),
            rects: Vec::new(),
            link_annotations: Vec::new(),
        }
    }

    /// Add a text box.
    pub fn with_text(mut self, bbox: BBox, text: impl Into<String>) -> Self {
        self.text_boxes.push(RawTextBox {
            bbox,
            text: text.into(),
        });
        self
    }

    /// Add a table.
    pub fn with_table(mut self, table: RawTable) -> Self {
        self.tables.push(table);
        self
    }

    /// Add a figure.
    pub fn with_figure(mut self, figure: RawFigure) -> Self {
        self.figures.push(figure);
        self
    }

    /// Add a rect.
    pub fn with_rect(mut self, rect: RawRect) -> Self {
        self.rects.push(rect);
        self
    }

    /// Add a link annotation.
    pub fn with_link(mut self, link: RawLinkAnnotation) -> Self {
        self.link_annotations.push(link);
        self
    }

    fn info(&self) -> PageInfo {
        PageInfo {
            number: self.number,
            width: self.width,
            height: self.height,
        }
    }
}

/// A [`LayoutProvider`] over in-memory data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemoryProvider {
    #[serde(default)]
    pub pages: Vec<MemoryPage>,
    #[serde(default)]
    pub outline: Vec<RawOutlineNode>,
    #[serde(default)]
    pub named_destinations: HashMap<String, Destination>,
}

impl MemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a layout dump from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let provider: MemoryProvider = serde_json::from_str(json)?;
        log::debug!(
            "Loaded layout dump: {} pages, {} outline roots",
            provider.pages.len(),
            provider.outline.len()
        );
        Ok(provider)
    }

    /// Load a layout dump from a JSON file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add a page and return self.
    pub fn with_page(mut self, page: MemoryPage) -> Self {
        self.pages.push(page);
        self
    }

    /// Add a top-level outline node and return self.
    pub fn with_outline(mut self, node: RawOutlineNode) -> Self {
        self.outline.push(node);
        self
    }

    /// Add a named destination and return self.
    pub fn with_destination(mut self, name: impl Into<String>, dest: Destination) -> Self {
        self.named_destinations.insert(name.into(), dest);
        self
    }

    fn page(&self, number: u32) -> Result<&MemoryPage> {
        self.pages
            .iter()
            .find(|p| p.number == number)
            .ok_or_else(|| Error::Provider(format!("no page {} in layout", number)))
    }
}

impl LayoutProvider for MemoryProvider {
    fn pages(&self) -> Result<Vec<PageInfo>> {
        let mut pages: Vec<PageInfo> = self.pages.iter().map(MemoryPage::info).collect();
        pages.sort_by_key(|p| p.number);
        Ok(pages)
    }

    fn text_boxes(&self, page: u32) -> Result<Vec<RawTextBox>> {
        Ok(self.page(page)?.text_boxes.clone())
    }

    fn tables(&self, page: u32) -> Result<Vec<RawTable>> {
        Ok(self.page(page)?.tables.clone())
    }

    fn figures(&self, page: u32) -> Result<Vec<RawFigure>> {
        Ok(self.page(page)?.figures.clone())
    }

    fn rects(&self, page: u32) -> Result<Vec<RawRect>> {
        Ok(self.page(page)?.rects.clone())
    }

    fn outline(&self) -> Result<Vec<RawOutlineNode>> {
        Ok(self.outline.clone())
    }

    fn named_destinations(&self) -> Result<HashMap<String, Destination>> {
        Ok(self.named_destinations.clone())
    }

    fn link_annotations(&self, page: u32) -> Result<Vec<RawLinkAnnotation>> {
        Ok(self.page(page)?.link_annotations.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_target_untagged() {
        let named: RawTarget = serde_json::from_str(r#""sec:intro""#).unwrap();
        assert_eq!(named, RawTarget::Named("sec:intro".to_string()));

        let explicit: RawTarget = serde_json::from_str(r#"{"page":2,"x":56,"y":700}"#).unwrap();
        assert_eq!(
            explicit,
            RawTarget::Explicit {
                page: 2,
                x: 56.0,
                y: 700.0
            }
        );
    }

    #[test]
    fn test_memory_provider_pages_sorted() {
        let provider = MemoryProvider::new()
            .with_page(MemoryPage::new(2, 595.0, 842.0))
            .with_page(MemoryPage::new(1, 595.0, 842.0));
        let numbers: Vec<u32> = provider.pages().unwrap().iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2]);
    }

    #[test]
    fn test_unknown_page_is_provider_error() {
        let provider = MemoryProvider::new().with_page(MemoryPage::new(1, 595.0, 842.0));
        assert!(matches!(provider.text_boxes(7), Err(Error::Provider(_))));
    }

    #[test]
    fn test_page_layout() {
        let page = MemoryPage::new(1, 595.0, 842.0)
            .with_text(BBox::new(50.0, 700.0, 300.0, 715.0), "Hello")
            .with_rect(RawRect {
                bbox: BBox::new(40.0, 100.0, 500.0, 200.0),
                non_stroking_color: Some(vec![0.9]),
            });
        let provider = MemoryProvider::new().with_page(page);

        let layout = provider.page_layout(1).unwrap();
        assert_eq!(layout.text_boxes.len(), 1);
        assert_eq!(layout.rects.len(), 1);
        assert!(layout.tables.is_empty());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "pages": [{"number": 1, "width": 595, "height": 842,
                       "text_boxes": [{"bbox": {"x0": 1, "y0": 2, "x1": 3, "y1": 4}, "text": "a"}]}],
            "outline": [{"title": "1 Intro", "target": "intro"}],
            "named_destinations": {"intro": {"page": 1, "x": 0, "y": 800}}
        }"#;
        let provider = MemoryProvider::from_json_str(json).unwrap();
        assert_eq!(provider.outline().unwrap().len(), 1);
        assert_eq!(provider.named_destinations().unwrap()["intro"].y, 800.0);
        assert!(matches!(
            MemoryProvider::from_json_str("{"),
            Err(Error::Json(_))
        ));
    }
}
