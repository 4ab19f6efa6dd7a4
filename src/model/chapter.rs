//! Chapters derived from the document outline.

use serde::{Deserialize, Serialize};

use super::{Element, Position, Scope};

/// A chapter: an outline entry, optionally matched to its heading on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    /// Identifier (`chapter.<number>`)
    pub id: String,

    /// Owning scope
    pub scope: Scope,

    /// Title from the outline, without the section number
    pub title: String,

    /// Dotted chapter number, unique in the document
    pub number: String,

    /// Heading location; `None` for ghost chapters
    pub position: Option<Position>,

    /// Text of the matched heading box
    pub text: Option<String>,

    /// Nested content in reading order
    pub content: Vec<Element>,
}

impl Chapter {
    /// Create a chapter with the identifier derived from its number.
    pub fn new(title: impl Into<String>, number: impl Into<String>) -> Self {
        let number = number.into();
        Self {
            id: Self::id_for(&number),
            scope: Scope::Root,
            title: title.into(),
            number,
            position: None,
            text: None,
            content: Vec::new(),
        }
    }

    /// Identifier of the chapter with the given number.
    pub fn id_for(number: &str) -> String {
        format!("chapter.{}", number)
    }

    /// Set the heading location and text.
    pub fn with_heading(mut self, position: Position, text: impl Into<String>) -> Self {
        self.position = Some(position);
        self.text = Some(text.into());
        self
    }

    /// A ghost chapter was not found on any page.
    pub fn is_ghost(&self) -> bool {
        self.position.is_none()
    }

    /// Nested chapters in order.
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> {
        self.content.iter().filter_map(Element::as_chapter)
    }
}
