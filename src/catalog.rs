//! Catalog resolution: outline, named destinations and link annotations.
//!
//! The outline tree is flattened into depth-first pre-order entries, each
//! stamped with its depth, chapter number and resolved target. Named targets
//! are looked up in the destination table; a missing key never fails the run
//! but is carried as [`TargetRef::Unresolved`].

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::error::Result;
use crate::geometry::BBox;
use crate::model::TargetRef;
use crate::options::ExtractOptions;
use crate::provider::{Destination, LayoutProvider, PageInfo, RawOutlineNode, RawTarget};

/// One outline entry, flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineEntry {
    /// Nesting depth, 0 for top-level entries
    pub depth: usize,

    /// Title without the section number
    pub title: String,

    /// Section number from the title, or a virtual number (`virt.2.1`)
    pub number: String,

    /// Whether `number` was derived from the outline position
    pub virtual_number: bool,

    /// Resolved jump target
    pub target: TargetRef,

    /// Index of the parent entry
    pub parent: Option<usize>,
}

/// A link annotation with its target resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogLink {
    /// Page the annotation is placed on
    pub page: u32,

    /// Annotation rectangle, grown by the annotation tolerance
    pub rect: BBox,

    /// Linked character range of the source text, if known
    pub char_range: Option<(usize, usize)>,

    pub target: TargetRef,
}

/// Lookup structures derived from the document catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub outline: Vec<OutlineEntry>,
    pub destinations: HashMap<String, Destination>,
    pub links: Vec<CatalogLink>,
}

impl Catalog {
    /// Query the provider for outline, destinations and the link
    /// annotations of the given pages.
    pub fn resolve<P: LayoutProvider + ?Sized>(
        provider: &P,
        pages: &[PageInfo],
        options: &ExtractOptions,
    ) -> Result<Self> {
        let destinations = provider.named_destinations()?;
        let outline = flatten_outline(&provider.outline()?, &destinations);

        let mut links = Vec::new();
        if options.no_annotations {
            log::info!("Skipping link annotations");
        } else {
            for page in pages {
                for annotation in provider.link_annotations(page.number)? {
                    if let Err(e) = annotation.rect.validate() {
                        log::warn!("Skipping link annotation on page {}: {}", page.number, e);
                        continue;
                    }
                    links.push(CatalogLink {
                        page: page.number,
                        rect: annotation.rect.expand(options.annotation_tolerance),
                        char_range: annotation.char_range,
                        target: resolve_target(&annotation.target, &destinations),
                    });
                }
            }
        }

        log::debug!(
            "Catalog: {} outline entries, {} named destinations, {} links",
            outline.len(),
            destinations.len(),
            links.len()
        );

        Ok(Self {
            outline,
            destinations,
            links,
        })
    }

    /// Check if the document has an outline.
    pub fn has_outline(&self) -> bool {
        !self.outline.is_empty()
    }
}

/// Resolve a raw target; a named target missing from `destinations` becomes
/// [`TargetRef::Unresolved`].
pub fn resolve_target(target: &RawTarget, destinations: &HashMap<String, Destination>) -> TargetRef {
    match target {
        RawTarget::Explicit { page, x, y } => TargetRef::position(*page, *x, *y),
        RawTarget::Named(name) => match destinations.get(name) {
            Some(dest) => TargetRef::position(dest.page, dest.x, dest.y),
            None => {
                log::warn!("Named destination \"{}\" not found", name);
                TargetRef::Unresolved { name: name.clone() }
            }
        },
    }
}

/// Flatten an outline tree into depth-first pre-order entries.
pub fn flatten_outline(
    nodes: &[RawOutlineNode],
    destinations: &HashMap<String, Destination>,
) -> Vec<OutlineEntry> {
    let mut entries = Vec::new();
    let mut stack: Vec<usize> = Vec::new();
    flatten_level(nodes, &[], destinations, &mut stack, &mut entries);
    entries
}

fn flatten_level(
    nodes: &[RawOutlineNode],
    level: &[usize],
    destinations: &HashMap<String, Destination>,
    stack: &mut Vec<usize>,
    entries: &mut Vec<OutlineEntry>,
) {
    for (i, node) in nodes.iter().enumerate() {
        let mut path = level.to_vec();
        path.push(i + 1);
        let depth = level.len();

        // parent is the most recent entry with a smaller depth
        while stack
            .last()
            .map_or(false, |&top| entries[top].depth >= depth)
        {
            stack.pop();
        }
        let parent = stack.last().copied();

        let title = normalize_title(&node.title);
        let (number, title, virtual_number) = match split_number(&title) {
            Some((number, rest)) => (number, rest, false),
            None => (virtual_number(&path), title, true),
        };

        entries.push(OutlineEntry {
            depth,
            title,
            number,
            virtual_number,
            target: resolve_target(&node.target, destinations),
            parent,
        });
        stack.push(entries.len() - 1);

        flatten_level(&node.children, &path, destinations, stack, entries);
    }
}

fn virtual_number(path: &[usize]) -> String {
    let levels: Vec<String> = path.iter().map(|n| n.to_string()).collect();
    format!("virt.{}", levels.join("."))
}

/// Unicode NFKC normalization with surrounding whitespace removed.
pub fn normalize_title(title: &str) -> String {
    title.nfkc().collect::<String>().trim().to_string()
}

const NUMBER_TOKEN: &str = r"(?:[iIvVxX]{1,8}|[a-zA-Z]|[0-9]+)";

fn numbered_title_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(
            r"(?s)^({tok}(?:\.{tok})*)\.?[ \t]+(\S.*)$",
            tok = NUMBER_TOKEN
        );
        Regex::new(&pattern).expect("section number pattern is valid")
    })
}

fn number_only_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"^({tok}(?:\.{tok})*)\.?$", tok = NUMBER_TOKEN);
        Regex::new(&pattern).expect("section number pattern is valid")
    })
}

/// Split a leading section number (`1.2.3`, `2.a.iv`, `A.1`) off a title.
///
/// Returns the number without a trailing dot and the remaining title, or
/// `None` when the title does not start with a number followed by text.
pub fn split_number(title: &str) -> Option<(String, String)> {
    let caps = numbered_title_regex().captures(title.trim())?;
    let number = caps.get(1)?.as_str().to_string();
    let rest = caps.get(2)?.as_str().trim().to_string();
    Some((number, rest))
}

/// Parse a text that consists of a section number only (`3.2` or `3.2.`).
pub fn section_number(text: &str) -> Option<String> {
    let caps = number_only_regex().captures(text.trim())?;
    Some(caps.get(1)?.as_str().to_string())
}
