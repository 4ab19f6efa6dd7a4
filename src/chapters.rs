//! Chapter detection.
//!
//! Each outline entry is matched against the candidate text boxes of its
//! target page: the box whose top-left corner lies nearest to the jump target
//! becomes the chapter heading. Entries without a match become ghost chapters
//! that keep their place in the hierarchy but have no position.

use std::collections::HashSet;

use crate::catalog::{section_number, Catalog};
use crate::classify::{ClassifiedPage, TextRegion};
use crate::error::{Error, Result};
use crate::geometry::{nearest_by, BBox, Point};
use crate::model::{Chapter, Position, TargetRef};
use crate::options::ExtractOptions;

/// A chapter together with its place in the outline.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedChapter {
    /// Index of the outline entry
    pub entry: usize,

    /// Outline depth, 0 for top-level chapters
    pub depth: usize,

    /// Index of the parent chapter (same indexing as the outline)
    pub parent: Option<usize>,

    pub chapter: Chapter,

    /// Page and point used to place the chapter in reading order; for ghost
    /// chapters this is the jump target when it lies on an extracted page
    pub anchor: Option<(u32, Point)>,
}

impl DetectedChapter {
    /// Check if the chapter was found on a page.
    pub fn is_ghost(&self) -> bool {
        self.chapter.is_ghost()
    }
}

/// Match outline entries to candidate boxes, consuming matched boxes.
///
/// Returns one chapter per outline entry, in outline order.
pub fn detect_chapters(
    catalog: &Catalog,
    pages: &mut [ClassifiedPage],
    options: &ExtractOptions,
) -> Result<Vec<DetectedChapter>> {
    let mut chapters = Vec::with_capacity(catalog.outline.len());

    for (index, entry) in catalog.outline.iter().enumerate() {
        let mut chapter = Chapter::new(entry.title.clone(), entry.number.clone());
        let mut anchor = None;

        if let TargetRef::Position { page, x, y } = entry.target {
            let target = Point::new(x as f32, y as f32);
            match pages.iter_mut().find(|p| p.info.number == page) {
                Some(classified) => {
                    anchor = Some((page, target));
                    if let Some(heading) = match_heading(&mut classified.candidates, target, options) {
                        if entry.virtual_number {
                            if let Some(number) = heading.number {
                                chapter = Chapter::new(entry.title.clone(), number);
                            }
                        }
                        let position = Position::new(page, heading.bbox);
                        anchor = Some((page, heading.bbox.top_left()));
                        chapter = chapter.with_heading(position, heading.text);
                    }
                }
                None => log::debug!(
                    "Chapter \"{}\" targets page {} which is not extracted",
                    entry.title,
                    page
                ),
            }
        }

        if chapter.is_ghost() {
            log::info!(
                "No heading found for chapter {} \"{}\", keeping it as ghost chapter",
                chapter.number,
                chapter.title
            );
        }

        chapters.push(DetectedChapter {
            entry: index,
            depth: entry.depth,
            parent: entry.parent,
            chapter,
            anchor,
        });
    }

    check_unique_numbers(&chapters)?;

    log::debug!(
        "Detected {} chapters ({} ghosts)",
        chapters.len(),
        chapters.iter().filter(|c| c.is_ghost()).count()
    );
    Ok(chapters)
}

struct Heading {
    bbox: BBox,
    text: String,
    /// Section number found in a separate number box
    number: Option<String>,
}

/// Find and remove the heading box nearest to `target`, merging a separate
/// number box on the same line.
fn match_heading(
    candidates: &mut Vec<TextRegion>,
    target: Point,
    options: &ExtractOptions,
) -> Option<Heading> {
    let (hit, distance) = nearest_by(candidates.iter(), |c| c.bbox.top_left().distance_to(target))?;
    if distance > options.chapter_match_distance {
        log::debug!(
            "Nearest heading candidate is {:.1}pt from target ({}, {})",
            distance,
            target.x,
            target.y
        );
        return None;
    }
    let index = candidates.iter().position(|c| std::ptr::eq(c, hit))?;
    let matched = candidates.remove(index);

    if let Some(number) = section_number(&matched.text) {
        // number box matched, the title sits to its right
        let title = same_line_neighbor(candidates, &matched.bbox, options, Side::Right)
            .map(|i| candidates.remove(i));
        return Some(match title {
            Some(title) => Heading {
                bbox: matched.bbox.union(&title.bbox),
                text: format!("{} {}", matched.text, title.text),
                number: Some(number),
            },
            None => Heading {
                bbox: matched.bbox,
                text: matched.text,
                number: Some(number),
            },
        });
    }

    let number_box = same_line_neighbor(candidates, &matched.bbox, options, Side::Left)
        .filter(|&i| section_number(&candidates[i].text).is_some())
        .map(|i| candidates.remove(i));

    Some(match number_box {
        Some(number_box) => Heading {
            bbox: matched.bbox.union(&number_box.bbox),
            text: format!("{} {}", number_box.text, matched.text),
            number: section_number(&number_box.text),
        },
        None => Heading {
            bbox: matched.bbox,
            text: matched.text,
            number: None,
        },
    })
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

/// Index of the closest candidate on the same line on the given side.
///
/// Both the top and bottom edges must line up within the line tolerance and
/// the horizontal gap must not exceed `number_box_max_gap`.
fn same_line_neighbor(
    candidates: &[TextRegion],
    of: &BBox,
    options: &ExtractOptions,
    side: Side,
) -> Option<usize> {
    let tolerance = options.number_box_line_tolerance;
    candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| {
            (c.bbox.y1 - of.y1).abs() <= tolerance && (c.bbox.y0 - of.y0).abs() <= tolerance
        })
        .filter_map(|(i, c)| {
            let gap = match side {
                Side::Left => of.x0 - c.bbox.x1,
                Side::Right => c.bbox.x0 - of.x1,
            };
            // allow slight overlap of touching boxes
            (gap >= -tolerance && gap <= options.number_box_max_gap).then_some((i, gap))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(i, _)| i)
}

fn check_unique_numbers(chapters: &[DetectedChapter]) -> Result<()> {
    let mut seen = HashSet::new();
    for detected in chapters {
        if !seen.insert(detected.chapter.number.as_str()) {
            return Err(Error::DuplicateChapterNumber(detected.chapter.number.clone()));
        }
    }
    Ok(())
}
