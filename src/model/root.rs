//! Document-level types.

use serde::{Deserialize, Serialize};

use super::{Chapter, Element, Figure, Link, Page, Paragraph, Rect, Table};

/// The resolved document: pages plus the element tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Root {
    /// Extracted pages in page order
    pub pages: Vec<Page>,

    /// Top-level elements in reading order
    pub content: Vec<Element>,
}

/// Elements of a tree grouped by kind, in tree order.
#[derive(Debug, Default)]
pub struct Flattened<'a> {
    pub chapters: Vec<&'a Chapter>,
    pub paragraphs: Vec<&'a Paragraph>,
    pub tables: Vec<&'a Table>,
    pub figures: Vec<&'a Figure>,
    pub rects: Vec<&'a Rect>,
}

impl Root {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of extracted pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by its page number.
    pub fn get_page(&self, number: u32) -> Option<&Page> {
        self.pages.iter().find(|p| p.number == number)
    }

    /// Check if the document has no elements.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Look up an element by its path (`chapter.3/chapter.3.2/table.2`).
    pub fn find(&self, uid: &str) -> Option<&Element> {
        let mut scope = self.content.as_slice();
        let mut found = None;
        for segment in uid.split('/') {
            let element = scope.iter().find(|e| e.id() == segment)?;
            scope = element.children();
            found = Some(element);
        }
        found
    }

    /// All elements with their paths, in tree pre-order.
    pub fn elements(&self) -> Vec<(String, &Element)> {
        let mut out = Vec::new();
        walk(&self.content, None, &mut out);
        out
    }

    /// All elements grouped by kind.
    pub fn flattened(&self) -> Flattened<'_> {
        let mut flat = Flattened::default();
        for (_, element) in self.elements() {
            match element {
                Element::Chapter(c) => flat.chapters.push(c),
                Element::Paragraph(p) => flat.paragraphs.push(p),
                Element::Table(t) => flat.tables.push(t),
                Element::Figure(f) => flat.figures.push(f),
                Element::Rect(r) => flat.rects.push(r),
            }
        }
        flat
    }

    /// All links in the tree, in tree order.
    pub fn links(&self) -> Vec<&Link> {
        self.elements()
            .into_iter()
            .flat_map(|(_, e)| e.links())
            .collect()
    }

    pub(crate) fn links_mut(&mut self) -> Vec<&mut Link> {
        let mut out = Vec::new();
        collect_links_mut(&mut self.content, &mut out);
        out
    }
}

fn walk<'a>(elements: &'a [Element], prefix: Option<&str>, out: &mut Vec<(String, &'a Element)>) {
    for element in elements {
        let uid = match prefix {
            Some(p) => format!("{}/{}", p, element.id()),
            None => element.id().to_string(),
        };
        out.push((uid.clone(), element));
        walk(element.children(), Some(&uid), out);
    }
}

fn collect_links_mut<'a>(elements: &'a mut [Element], out: &mut Vec<&'a mut Link>) {
    for element in elements {
        match element {
            Element::Chapter(chapter) => collect_links_mut(&mut chapter.content, out),
            other => out.extend(other.links_mut()),
        }
    }
}
