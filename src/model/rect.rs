//! Rect elements: filled boxes drawn on a page.

use serde::{Deserialize, Serialize};

use super::{Link, Position, Scope};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Identifier (`rect.<n>`)
    pub id: String,

    /// Owning scope
    pub scope: Scope,

    /// Fill color components as reported by the layout analysis
    pub non_stroking_color: Option<Vec<f32>>,

    /// Text found inside the rect
    pub text: Option<String>,

    /// Location on the page
    pub position: Position,

    /// Links with their source in the rect
    pub links: Vec<Link>,
}

impl Rect {
    pub fn new(position: Position) -> Self {
        Self {
            id: String::new(),
            scope: Scope::Root,
            non_stroking_color: None,
            text: None,
            position,
            links: Vec::new(),
        }
    }
}
