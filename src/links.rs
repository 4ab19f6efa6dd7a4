//! Link attachment and resolution.
//!
//! Link annotations are attached to the element (or table cell) they overlap
//! most. Once the tree is assembled, every link target coordinate is resolved
//! to the path of the element found there, or to a page coordinate when no
//! element is close enough.

use crate::catalog::CatalogLink;
use crate::geometry::{nearest, BBox, Located, Point};
use crate::model::{Element, Link, Root, TargetRef};
use crate::options::ExtractOptions;

/// Attach catalog links to the elements of a flat element list.
///
/// Returns the number of attached links.
pub fn attach_links(elements: &mut [Element], links: &[CatalogLink]) -> usize {
    let mut attached = 0;

    for link in links {
        let mut best: Option<(usize, Option<usize>, f32)> = None;
        for (i, element) in elements.iter().enumerate() {
            for (cell, bbox) in link_sources(element, link.page) {
                let overlap = bbox.intersection_area(&link.rect);
                if overlap > 0.0 && best.map_or(true, |(_, _, b)| overlap > b) {
                    best = Some((i, cell, overlap));
                }
            }
        }

        let Some((i, cell, _)) = best else {
            log::debug!(
                "Link annotation {} on page {} has no source element",
                link.rect,
                link.page
            );
            continue;
        };

        let (start, end) = char_span(source_text(&elements[i], cell), link.char_range);
        let new_link = Link::new(start, end, link.target.clone());
        match (&mut elements[i], cell) {
            (Element::Table(t), Some(c)) => t.cells[c].links.push(new_link),
            (Element::Paragraph(p), _) => p.links.push(new_link),
            (Element::Figure(f), _) => f.links.push(new_link),
            (Element::Rect(r), _) => r.links.push(new_link),
            _ => continue,
        }
        attached += 1;
    }

    attached
}

/// Boxes on `page` a link can originate from: cells for tables, the element
/// box otherwise.
fn link_sources(element: &Element, page: u32) -> Vec<(Option<usize>, BBox)> {
    match element {
        Element::Chapter(_) => Vec::new(),
        Element::Table(t) => t
            .cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.position.page == page)
            .map(|(i, c)| (Some(i), c.position.bbox()))
            .collect(),
        other => other
            .position()
            .filter(|p| p.page == page)
            .map(|p| vec![(None, p.bbox())])
            .unwrap_or_default(),
    }
}

fn source_text(element: &Element, cell: Option<usize>) -> &str {
    match (element, cell) {
        (Element::Table(t), Some(c)) => t.cells.get(c).map_or("", |c| c.text.as_str()),
        (other, _) => other.text().unwrap_or(""),
    }
}

/// Clamp a character range to the text, or cover the whole text.
fn char_span(text: &str, range: Option<(usize, usize)>) -> (usize, usize) {
    let len = text.chars().count();
    match range {
        Some((start, end)) => {
            let end = end.min(len);
            (start.min(end), end)
        }
        None => (0, len),
    }
}

/// A positioned element with its path.
struct LinkTarget {
    uid: String,
    page: u32,
    bbox: BBox,
}

impl Located for LinkTarget {
    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// Resolve every link of the tree into a `libpdf_target` path.
///
/// Returns the number of links resolved to an element.
pub fn resolve_links(root: &mut Root, options: &ExtractOptions) -> usize {
    let targets: Vec<LinkTarget> = root
        .elements()
        .into_iter()
        .filter_map(|(uid, element)| {
            element.position().map(|p| LinkTarget {
                uid,
                page: p.page,
                bbox: p.bbox(),
            })
        })
        .collect();

    let mut resolved = 0;
    let mut fallback = 0;
    for link in root.links_mut() {
        let path = match &link.pos_target {
            TargetRef::Position { page, x, y } => {
                let point = Point::new(*x as f32, *y as f32);
                match resolve_position(&targets, *page, point, options) {
                    Some(uid) => {
                        resolved += 1;
                        uid
                    }
                    None => {
                        fallback += 1;
                        coordinate_path(*page, *x, *y)
                    }
                }
            }
            TargetRef::Unresolved { name } => {
                fallback += 1;
                format!("unresolved/{}", name)
            }
        };
        link.libpdf_target = Some(path);
    }

    log::debug!(
        "Resolved {} links to elements, {} to fallback targets",
        resolved,
        fallback
    );
    resolved
}

fn resolve_position(
    targets: &[LinkTarget],
    page: u32,
    point: Point,
    options: &ExtractOptions,
) -> Option<String> {
    let on_page = targets.iter().filter(|t| t.page == page);
    // boxes containing the point have distance 0 and win
    let (hit, distance) = nearest(on_page, point)?;
    (distance <= options.link_target_distance).then(|| hit.uid.clone())
}

/// Fallback path for a link target with no element nearby: `page.4/56:789`.
///
/// Coordinates are printed as given by the document.
pub fn coordinate_path(page: u32, x: f64, y: f64) -> String {
    format!("page.{}/{}:{}", page, x, y)
}
