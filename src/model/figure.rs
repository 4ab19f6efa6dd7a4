//! Figure elements.

use serde::{Deserialize, Serialize};

use super::{Link, Position, Scope};

/// An image area on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    /// Identifier (`figure.<n>`)
    pub id: String,

    /// Owning scope
    pub scope: Scope,

    /// Path or reference of the extracted image
    pub image_ref: String,

    /// Figure caption
    pub caption: Option<String>,

    /// Text found inside the figure area
    pub text: Option<String>,

    /// Location on the page
    pub position: Position,

    /// Links with their source in the figure area
    pub links: Vec<Link>,
}

impl Figure {
    pub fn new(image_ref: impl Into<String>, position: Position) -> Self {
        Self {
            id: String::new(),
            scope: Scope::Root,
            image_ref: image_ref.into(),
            caption: None,
            text: None,
            position,
            links: Vec::new(),
        }
    }
}
