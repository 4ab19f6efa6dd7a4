//! The element sum type and its ownership scope.

use serde::{Deserialize, Serialize};

use super::{Chapter, Figure, Link, Paragraph, Position, Rect, Table};

/// Kind of an element, used for identifiers and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Chapter,
    Paragraph,
    Table,
    Figure,
    Rect,
}

impl ElementKind {
    /// Identifier prefix of the kind (`paragraph` in `paragraph.3`).
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Chapter => "chapter",
            ElementKind::Paragraph => "paragraph",
            ElementKind::Table => "table",
            ElementKind::Figure => "figure",
            ElementKind::Rect => "rect",
        }
    }
}

/// The scope that owns an element: the document root or a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Top-level content of the document
    #[default]
    Root,
    /// Content of the chapter with the given id
    Chapter(String),
}

impl Scope {
    /// Check if the element belongs to the root.
    pub fn b_root(&self) -> bool {
        matches!(self, Scope::Root)
    }

    /// The owning chapter id, if any.
    pub fn b_chapter(&self) -> Option<&str> {
        match self {
            Scope::Root => None,
            Scope::Chapter(id) => Some(id),
        }
    }
}

/// A typed structural element of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Element {
    Chapter(Chapter),
    Paragraph(Paragraph),
    Table(Table),
    Figure(Figure),
    Rect(Rect),
}

impl Element {
    /// Identifier, unique within the owning scope.
    pub fn id(&self) -> &str {
        match self {
            Element::Chapter(c) => &c.id,
            Element::Paragraph(p) => &p.id,
            Element::Table(t) => &t.id,
            Element::Figure(f) => &f.id,
            Element::Rect(r) => &r.id,
        }
    }

    /// Kind of the element.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Chapter(_) => ElementKind::Chapter,
            Element::Paragraph(_) => ElementKind::Paragraph,
            Element::Table(_) => ElementKind::Table,
            Element::Figure(_) => ElementKind::Figure,
            Element::Rect(_) => ElementKind::Rect,
        }
    }

    /// Owning scope.
    pub fn scope(&self) -> &Scope {
        match self {
            Element::Chapter(c) => &c.scope,
            Element::Paragraph(p) => &p.scope,
            Element::Table(t) => &t.scope,
            Element::Figure(f) => &f.scope,
            Element::Rect(r) => &r.scope,
        }
    }

    /// Position of the element; `None` for ghost chapters.
    pub fn position(&self) -> Option<&Position> {
        match self {
            Element::Chapter(c) => c.position.as_ref(),
            Element::Paragraph(p) => Some(&p.position),
            Element::Table(t) => Some(&t.position),
            Element::Figure(f) => Some(&f.position),
            Element::Rect(r) => Some(&r.position),
        }
    }

    /// Links whose source lies in this element, including table cells.
    pub fn links(&self) -> Vec<&Link> {
        match self {
            Element::Chapter(_) => Vec::new(),
            Element::Paragraph(p) => p.links.iter().collect(),
            Element::Table(t) => t.cells.iter().flat_map(|c| c.links.iter()).collect(),
            Element::Figure(f) => f.links.iter().collect(),
            Element::Rect(r) => r.links.iter().collect(),
        }
    }

    /// Mutable access to the links of this element (not of nested chapters).
    pub(crate) fn links_mut(&mut self) -> Vec<&mut Link> {
        match self {
            Element::Chapter(_) => Vec::new(),
            Element::Paragraph(p) => p.links.iter_mut().collect(),
            Element::Table(t) => t
                .cells
                .iter_mut()
                .flat_map(|c| c.links.iter_mut())
                .collect(),
            Element::Figure(f) => f.links.iter_mut().collect(),
            Element::Rect(r) => r.links.iter_mut().collect(),
        }
    }

    /// Nested elements (only chapters have any).
    pub fn children(&self) -> &[Element] {
        match self {
            Element::Chapter(c) => &c.content,
            _ => &[],
        }
    }

    /// Text carried by the element, if any.
    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Chapter(c) => c.text.as_deref(),
            Element::Paragraph(p) => Some(&p.text),
            Element::Table(_) => None,
            Element::Figure(f) => f.text.as_deref(),
            Element::Rect(r) => r.text.as_deref(),
        }
    }

    pub fn as_chapter(&self) -> Option<&Chapter> {
        match self {
            Element::Chapter(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&Table> {
        match self {
            Element::Table(t) => Some(t),
            _ => None,
        }
    }

    /// Set identifier and owning scope. Called once, during assembly.
    pub(crate) fn set_identity(&mut self, id: String, scope: Scope) {
        let (slot, owner) = match self {
            Element::Chapter(c) => (&mut c.id, &mut c.scope),
            Element::Paragraph(p) => (&mut p.id, &mut p.scope),
            Element::Table(t) => (&mut t.id, &mut t.scope),
            Element::Figure(f) => (&mut f.id, &mut f.scope),
            Element::Rect(r) => (&mut r.id, &mut r.scope),
        };
        *slot = id;
        *owner = scope;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;

    #[test]
    fn test_element_serializes_type_tag() {
        let p = Paragraph::new("Hello", Position::new(1, BBox::new(0.0, 0.0, 10.0, 10.0)));
        let json = serde_json::to_value(Element::Paragraph(p)).unwrap();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["text"], "Hello");
        assert_eq!(json["scope"], "root");
    }

    #[test]
    fn test_scope() {
        assert!(Scope::Root.b_root());
        assert_eq!(Scope::Root.b_chapter(), None);

        let scope = Scope::Chapter("chapter.2".to_string());
        assert!(!scope.b_root());
        assert_eq!(scope.b_chapter(), Some("chapter.2"));
    }

    #[test]
    fn test_set_identity() {
        let p = Paragraph::new("x", Position::new(1, BBox::new(0.0, 0.0, 10.0, 10.0)));
        let mut el = Element::Paragraph(p);
        el.set_identity("paragraph.3".to_string(), Scope::Chapter("chapter.1".into()));
        assert_eq!(el.id(), "paragraph.3");
        assert_eq!(el.scope().b_chapter(), Some("chapter.1"));
        assert_eq!(el.kind().as_str(), "paragraph");
    }
}
