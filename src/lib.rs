//! # libpdf
//!
//! Structural resolution of PDF documents.
//!
//! This library turns the flat output of a PDF layout analysis (text boxes,
//! table grids, figures, rects, link annotations and the outline) into one
//! hierarchical document tree: chapters, paragraphs, tables, figures and
//! rects, each with an identifier unique in its scope, plus links resolved
//! to the elements they point at.
//!
//! ## Quick Start
//!
//! ```no_run
//! use libpdf::{extract_file, render};
//!
//! fn main() -> libpdf::Result<()> {
//!     // Resolve a layout dump written by the layout analysis
//!     let root = extract_file("layout.json")?;
//!
//!     for (uid, element) in root.elements() {
//!         println!("{} ({})", uid, element.kind().as_str());
//!     }
//!
//!     let json = render::to_json(&root, render::JsonFormat::Pretty)?;
//!     println!("{}", json);
//!     Ok(())
//! }
//! ```
//!
//! ## Pipeline
//!
//! - **Catalog**: outline, named destinations and link annotations
//! - **Classification**: text boxes inside tables, figures and rects are excluded
//! - **Chapters**: outline entries matched to their headings, ghost chapters otherwise
//! - **Running headers** (optional): text, tables and figures repeated in the page margins are removed
//! - **Assembly**: reading order, chapter nesting and scope-unique identifiers
//! - **Links**: link targets resolved to element paths
//!
//! Any layout analysis can feed the pipeline by implementing
//! [`LayoutProvider`]; [`MemoryProvider`] reads JSON layout dumps.

pub mod assemble;
pub mod catalog;
pub mod chapters;
pub mod classify;
pub mod error;
pub mod extract;
pub mod geometry;
pub mod links;
pub mod model;
pub mod options;
pub mod provider;
pub mod render;
pub mod running;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::extract;
pub use geometry::{BBox, Point};
pub use model::{
    Cell, Chapter, Element, ElementKind, Figure, Link, Page, Paragraph, Position, Rect, Root,
    Scope, Table, TargetRef,
};
pub use options::{CropMargins, ExtractOptions, PageSelection};
pub use provider::{LayoutProvider, MemoryPage, MemoryProvider};
pub use render::JsonFormat;

use std::path::Path;

/// Resolve a JSON layout dump with default options.
///
/// # Example
///
/// ```no_run
/// use libpdf::extract_file;
///
/// let root = extract_file("layout.json").unwrap();
/// println!("Pages: {}", root.page_count());
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Root> {
    extract_file_with_options(path, &ExtractOptions::default())
}

/// Resolve a JSON layout dump with custom options.
///
/// # Example
///
/// ```no_run
/// use libpdf::{extract_file_with_options, ExtractOptions};
///
/// let options = ExtractOptions::new()
///     .without_chapters()
///     .sequential();
/// let root = extract_file_with_options("layout.json", &options).unwrap();
/// ```
pub fn extract_file_with_options<P: AsRef<Path>>(path: P, options: &ExtractOptions) -> Result<Root> {
    let provider = MemoryProvider::from_path(path)?;
    extract(&provider, options)
}

/// Resolve a JSON layout dump and render the tree as JSON.
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let root = extract_file(path)?;
    render::to_json(&root, format)
}

/// Builder for resolving documents.
///
/// # Example
///
/// ```no_run
/// use libpdf::{Libpdf, PageSelection};
///
/// let json = Libpdf::new()
///     .with_pages(PageSelection::Range(1..=10))
///     .without_annotations()
///     .extract_file("layout.json")?
///     .to_json(libpdf::JsonFormat::Compact)?;
/// # Ok::<(), libpdf::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Libpdf {
    options: ExtractOptions,
}

impl Libpdf {
    /// Create a new Libpdf builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all options.
    pub fn with_options(mut self, options: ExtractOptions) -> Self {
        self.options = options;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.options = self.options.with_pages(pages);
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.options = self.options.sequential();
        self
    }

    /// Skip chapter detection.
    pub fn without_chapters(mut self) -> Self {
        self.options = self.options.without_chapters();
        self
    }

    /// Skip link annotations.
    pub fn without_annotations(mut self) -> Self {
        self.options = self.options.without_annotations();
        self
    }

    /// Set crop margins.
    pub fn with_crop(mut self, crop: CropMargins) -> Self {
        self.options = self.options.with_crop(crop);
        self
    }

    /// Resolve the layout reported by a provider.
    pub fn extract<P: LayoutProvider + ?Sized>(&self, provider: &P) -> Result<LibpdfResult> {
        let root = extract(provider, &self.options)?;
        Ok(LibpdfResult { root })
    }

    /// Resolve a JSON layout dump.
    pub fn extract_file<P: AsRef<Path>>(&self, path: P) -> Result<LibpdfResult> {
        let provider = MemoryProvider::from_path(path)?;
        self.extract(&provider)
    }

    /// The options this builder extracts with.
    pub fn options(&self) -> &ExtractOptions {
        &self.options
    }
}

/// Result of resolving a document.
#[derive(Debug, Clone)]
pub struct LibpdfResult {
    /// The resolved document
    pub root: Root,
}

impl LibpdfResult {
    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.root, format)
    }

    /// Get the document tree.
    pub fn root(&self) -> &Root {
        &self.root
    }

    /// Take the document tree.
    pub fn into_root(self) -> Root {
        self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_libpdf_builder() {
        let builder = Libpdf::new()
            .with_pages(PageSelection::Range(1..=5))
            .without_chapters()
            .sequential();

        assert_eq!(builder.options().pages, PageSelection::Range(1..=5));
        assert!(builder.options().no_chapters);
        assert!(!builder.options().parallel);
    }

    #[test]
    fn test_libpdf_builder_default() {
        let builder = Libpdf::default();
        assert!(builder.options().parallel);
        assert!(!builder.options().no_annotations);
    }

    #[test]
    fn test_extract_file_missing() {
        let result = extract_file("/nonexistent/layout.json");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_extract_file_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        let result = extract_file(file.path());
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[test]
    fn test_builder_extract() {
        let provider = MemoryProvider::new().with_page(
            MemoryPage::new(1, 595.0, 842.0).with_text(BBox::new(50.0, 700.0, 300.0, 716.0), "Hello"),
        );
        let result = Libpdf::new().extract(&provider).unwrap();
        assert_eq!(result.root().content.len(), 1);

        let json = result.to_json(JsonFormat::Compact).unwrap();
        assert!(json.contains("\"paragraph.1\""));
    }
}
