//! Error types for libpdf.

use std::io;
use thiserror::Error;

/// Result type alias for libpdf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while resolving a document structure.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading a layout dump or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A layout dump or output document could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The layout provider failed to answer a query.
    #[error("Layout provider error: {0}")]
    Provider(String),

    /// The document has no pages left to extract.
    #[error("Document contains no pages to extract")]
    NoPages,

    /// Invalid page range specification.
    #[error("Invalid page range: {0}")]
    InvalidPageRange(String),

    /// A bounding box is zero-area, inverted or not finite.
    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    /// Two outline entries resolve to the same chapter number.
    #[error("Duplicate chapter number \"{0}\" in outline")]
    DuplicateChapterNumber(String),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}
