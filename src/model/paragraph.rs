//! Paragraph elements.

use serde::{Deserialize, Serialize};

use super::{Link, Position, Scope};

/// A paragraph: a text box that is neither a heading nor inside another element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    /// Identifier (`paragraph.<n>`)
    pub id: String,

    /// Owning scope
    pub scope: Scope,

    /// Paragraph text
    pub text: String,

    /// Location on the page
    pub position: Position,

    /// Links with their source in the text
    pub links: Vec<Link>,
}

impl Paragraph {
    /// Create a paragraph without identity; the assembler assigns it.
    pub fn new(text: impl Into<String>, position: Position) -> Self {
        Self {
            id: String::new(),
            scope: Scope::Root,
            text: text.into(),
            position,
            links: Vec::new(),
        }
    }

    /// Number of characters in the text, the unit of link indices.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}
