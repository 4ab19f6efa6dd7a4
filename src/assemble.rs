//! Element assembly.
//!
//! Classified regions become typed elements, are put in reading order,
//! reparented into the chapter hierarchy and receive identifiers that are
//! unique within their scope. Finally each page lists the elements on it.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::catalog::CatalogLink;
use crate::chapters::DetectedChapter;
use crate::classify::ClassifiedPage;
use crate::links::attach_links;
use crate::model::{
    Cell, Chapter, Element, ElementKind, Figure, Page, Paragraph, Position, Rect, Root, Scope,
    Table,
};
use crate::options::ExtractOptions;

/// Per-scope identifier counters (`paragraph.1`, `paragraph.2`, ...).
#[derive(Debug, Default)]
pub struct IdCounters {
    counts: HashMap<ElementKind, usize>,
}

impl IdCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next identifier for an element of `kind` in this scope.
    pub fn next_id(&mut self, kind: ElementKind) -> String {
        let count = self.counts.entry(kind).or_insert(0);
        *count += 1;
        format!("{}.{}", kind.as_str(), count)
    }
}

/// Turn classified regions into typed elements, in page order.
///
/// Identifiers are left empty; they are assigned once the final order is
/// known. Candidates stay unused when paragraphs are disabled.
pub fn build_elements(pages: Vec<ClassifiedPage>, options: &ExtractOptions) -> Vec<Element> {
    let mut elements = Vec::new();

    for page in pages {
        let number = page.info.number;

        if !options.no_paragraphs {
            for region in page.candidates {
                elements.push(Element::Paragraph(Paragraph::new(
                    region.text,
                    Position::new(number, region.bbox),
                )));
            }
        }

        for raw in page.tables {
            let mut table = Table::new(Position::new(number, raw.bbox));
            table.caption = raw.caption;
            let mut cells = raw.cells;
            cells.sort_by_key(|c| (c.row, c.col));
            for c in cells {
                table.add_cell(Cell::new(c.row, c.col, c.text, Position::new(number, c.bbox)));
            }
            elements.push(Element::Table(table));
        }

        for region in page.figures {
            let mut figure = Figure::new(
                region.figure.image_ref,
                Position::new(number, region.figure.bbox),
            );
            figure.caption = region.figure.caption;
            figure.text = region.text;
            elements.push(Element::Figure(figure));
        }

        for region in page.rects {
            let mut rect = Rect::new(Position::new(number, region.rect.bbox));
            rect.non_stroking_color = region.rect.non_stroking_color;
            rect.text = region.text;
            elements.push(Element::Rect(rect));
        }
    }

    elements
}

/// Something to place in the tree.
enum Item {
    Element(Element),
    Chapter(DetectedChapter),
}

/// Ordering key: page, top edge (descending), left edge, chapters first,
/// then input sequence.
struct Key {
    page: u32,
    top: f32,
    left: f32,
    rank: u8,
    seq: usize,
}

impl Key {
    fn cmp(&self, other: &Key) -> Ordering {
        self.page
            .cmp(&other.page)
            .then_with(|| other.top.total_cmp(&self.top))
            .then_with(|| self.left.total_cmp(&other.left))
            .then_with(|| self.rank.cmp(&other.rank))
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

fn element_key(element: &Element, seq: usize) -> Key {
    match element.position() {
        Some(p) => Key {
            page: p.page,
            top: p.y1,
            left: p.x0,
            rank: 1,
            seq,
        },
        None => Key {
            page: u32::MAX,
            top: f32::NEG_INFINITY,
            left: 0.0,
            rank: 1,
            seq,
        },
    }
}

/// Assemble the document tree.
///
/// `chapters` must hold one entry per outline entry, in outline order, as
/// produced by chapter detection.
pub fn assemble(
    pages: Vec<ClassifiedPage>,
    chapters: Vec<DetectedChapter>,
    links: &[CatalogLink],
    options: &ExtractOptions,
) -> Root {
    let mut root = Root::new();
    root.pages = pages
        .iter()
        .map(|p| Page::new(p.info.number, p.info.width, p.info.height))
        .collect();

    // stable sort; links attach to the first of equally overlapping elements
    let mut elements = build_elements(pages, options);
    elements.sort_by(|a, b| element_key(a, 0).cmp(&element_key(b, 0)));

    let attached = attach_links(&mut elements, links);
    log::debug!("Attached {} of {} links", attached, links.len());

    let ordered = order_items(elements, chapters);
    build_tree(&mut root, ordered);
    fill_pages(&mut root);

    log::info!(
        "Assembled {} top-level elements on {} pages",
        root.content.len(),
        root.pages.len()
    );
    root
}

/// Merge elements (already in reading order) and chapters into one
/// reading-order sequence.
fn order_items(elements: Vec<Element>, chapters: Vec<DetectedChapter>) -> Vec<Item> {
    let mut anchored: Vec<(Key, Item)> = Vec::new();
    let mut floating: Vec<DetectedChapter> = Vec::new();

    for (seq, element) in elements.into_iter().enumerate() {
        anchored.push((element_key(&element, seq), Item::Element(element)));
    }

    for detected in chapters {
        match detected.anchor {
            Some((page, point)) => {
                let key = Key {
                    page,
                    top: point.y,
                    left: point.x,
                    rank: 0,
                    seq: detected.entry,
                };
                anchored.push((key, Item::Chapter(detected)));
            }
            None => floating.push(detected),
        }
    }

    anchored.sort_by(|a, b| a.0.cmp(&b.0));
    let mut items: Vec<Item> = anchored.into_iter().map(|(_, item)| item).collect();

    // chapters without anchor go right after the preceding outline entry
    floating.sort_by_key(|c| c.entry);
    for detected in floating {
        let at = match detected.entry.checked_sub(1) {
            Some(previous) => items
                .iter()
                .position(|item| matches!(item, Item::Chapter(c) if c.entry == previous))
                .map_or(0, |i| i + 1),
            None => 0,
        };
        items.insert(at, Item::Chapter(detected));
    }

    items
}

/// Reparent items into chapters and assign identifiers.
fn build_tree(root: &mut Root, items: Vec<Item>) {
    // owner is an outline entry index; None is the root
    let mut current: Option<usize> = None;
    let mut by_owner: HashMap<Option<usize>, Vec<usize>> = HashMap::new();
    let mut slots: Vec<Option<Item>> = Vec::with_capacity(items.len());

    for (i, item) in items.into_iter().enumerate() {
        let owner = match &item {
            Item::Chapter(c) => {
                if c.anchor.is_some() {
                    current = Some(c.entry);
                }
                c.parent
            }
            Item::Element(_) => current,
        };
        by_owner.entry(owner).or_default().push(i);
        slots.push(Some(item));
    }

    root.content = build_scope(None, Scope::Root, &mut by_owner, &mut slots);
}

fn build_scope(
    owner: Option<usize>,
    scope: Scope,
    by_owner: &mut HashMap<Option<usize>, Vec<usize>>,
    slots: &mut [Option<Item>],
) -> Vec<Element> {
    let members = by_owner.remove(&owner).unwrap_or_default();
    let mut counters = IdCounters::new();
    let mut content = Vec::with_capacity(members.len());

    for index in members {
        let Some(item) = slots[index].take() else {
            continue;
        };
        match item {
            Item::Element(mut element) => {
                let id = counters.next_id(element.kind());
                element.set_identity(id, scope.clone());
                content.push(element);
            }
            Item::Chapter(detected) => {
                let mut chapter: Chapter = detected.chapter;
                chapter.scope = scope.clone();
                chapter.content = build_scope(
                    Some(detected.entry),
                    Scope::Chapter(chapter.id.clone()),
                    by_owner,
                    slots,
                );
                content.push(Element::Chapter(chapter));
            }
        }
    }

    content
}

/// List the paths of the positioned elements on each page, in tree order.
fn fill_pages(root: &mut Root) {
    let mut on_page: HashMap<u32, Vec<String>> = HashMap::new();
    for (uid, element) in root.elements() {
        if let Some(position) = element.position() {
            on_page.entry(position.page).or_default().push(uid);
        }
    }
    for page in &mut root.pages {
        page.content = on_page.remove(&page.number).unwrap_or_default();
    }
}
