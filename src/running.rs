//! Running header and footer removal.
//!
//! A region is a header candidate when its bottom edge lies in the top
//! margin of the page and a region at the same height shows up on enough
//! pages; footers mirror this in the bottom margin. Candidates whose height
//! drifts between pages are rejected before anything is removed.

use std::collections::{BTreeMap, BTreeSet};

use crate::classify::{ClassifiedPage, FigureRegion, TextRegion};
use crate::geometry::BBox;
use crate::provider::RawTable;

/// Share of the page height scanned at the top and the bottom
const REL_MARGIN: f32 = 0.2;
/// Share of pages a region must repeat on to be a candidate
const OCCURRENCE_RATIO: f64 = 0.3;
/// Share of pages allowed to miss the header between its first and last page
const MISSING_PAGES_RATIO: f64 = 0.15;
/// Share of pages the lowest header height must cover
const CONTINUOUS_RATIO: f64 = 0.8;
/// Share of pages above which distinct header heights count as drift
const UNIQUE_HEIGHTS_RATIO: f64 = 0.05;
/// Edges closer than this (points) are at the same height
const SAME_HEIGHT: f32 = 1.0;

/// Remove running headers and footers from the candidates, tables and
/// figures of `pages`. Returns the number of removed regions.
///
/// Runs after chapter detection, so headings repeated at the top of every
/// page have already been consumed and are never removed.
pub fn remove_running_headers(pages: &mut [ClassifiedPage]) -> usize {
    let Some(first) = pages.first() else {
        return 0;
    };
    let page_height = first.info.height;

    let removed = crop_regions(pages, page_height, candidates, |t: &TextRegion| t.bbox)
        + crop_regions(pages, page_height, tables, |t: &RawTable| t.bbox)
        + crop_regions(pages, page_height, figures, |f: &FigureRegion| f.figure.bbox);
    log::debug!("Removed {} running header and footer regions", removed);
    removed
}

fn candidates(page: &mut ClassifiedPage) -> &mut Vec<TextRegion> {
    &mut page.candidates
}

fn tables(page: &mut ClassifiedPage) -> &mut Vec<RawTable> {
    &mut page.tables
}

fn figures(page: &mut ClassifiedPage) -> &mut Vec<FigureRegion> {
    &mut page.figures
}

fn crop_regions<T>(
    pages: &mut [ClassifiedPage],
    page_height: f32,
    regions: fn(&mut ClassifiedPage) -> &mut Vec<T>,
    bbox: impl Fn(&T) -> BBox,
) -> usize {
    let page_count = pages.len();
    let boxes: Vec<(u32, BBox)> = pages
        .iter_mut()
        .flat_map(|page| {
            let number = page.info.number;
            regions(page)
                .iter()
                .map(|r| (number, bbox(r)))
                .collect::<Vec<_>>()
        })
        .collect();

    let running = running_boxes(&boxes, page_count, page_height);
    if running.is_empty() {
        return 0;
    }

    let mut offset = 0;
    for page in pages.iter_mut() {
        let number = page.info.number;
        let list = regions(page);
        let start = offset;
        offset += list.len();

        let mut index = start;
        list.retain(|_| {
            let keep = !running.contains(&index);
            if !keep {
                log::trace!("Page {}: {} removed as running header", number, boxes[index].1);
            }
            index += 1;
            keep
        });
    }
    running.len()
}

/// Indices into `boxes` (page number and box) that are running headers or
/// footers.
pub fn running_boxes(boxes: &[(u32, BBox)], page_count: usize, page_height: f32) -> BTreeSet<usize> {
    let header_bottom = (1.0 - REL_MARGIN) * page_height;
    let footer_top = REL_MARGIN * page_height;

    let headers = repeated(boxes, page_count, |b| b.y0 >= header_bottom);
    let footers = repeated(boxes, page_count, |b| b.y1 <= footer_top);

    let mut running = confirm(boxes, headers, page_count);
    running.extend(confirm(boxes, footers, page_count));
    running.into_iter().collect()
}

/// Boxes inside the margin whose height repeats on enough pages.
fn repeated(boxes: &[(u32, BBox)], page_count: usize, in_margin: impl Fn(&BBox) -> bool) -> Vec<usize> {
    let min_pages = OCCURRENCE_RATIO * page_count as f64;
    boxes
        .iter()
        .enumerate()
        .filter(|(_, (_, b))| in_margin(b))
        .filter(|(_, (_, b))| {
            let pages: BTreeSet<u32> = boxes
                .iter()
                .filter(|(_, other)| same_height(b, other))
                .map(|(page, _)| *page)
                .collect();
            pages.len() as f64 >= min_pages
        })
        .map(|(i, _)| i)
        .collect()
}

/// Drop false positives from a list of header (or footer) candidates.
///
/// The lowest candidate of each page must sit at the same height on nearly
/// every page between the first and the last one. While that fails, the
/// candidates at the lowest height are dropped and the rest checked again.
fn confirm(boxes: &[(u32, BBox)], mut list: Vec<usize>, page_count: usize) -> Vec<usize> {
    while !list.is_empty() {
        let mut lowest: BTreeMap<u32, i64> = BTreeMap::new();
        for &i in &list {
            let (page, bbox) = &boxes[i];
            let key = height_key(bbox.y0);
            lowest
                .entry(*page)
                .and_modify(|low| *low = (*low).min(key))
                .or_insert(key);
        }

        let (Some(first), Some(last)) = (lowest.keys().next(), lowest.keys().next_back()) else {
            break;
        };
        let span = f64::from(last - first + 1);
        let breaks = span - lowest.len() as f64;
        let heights: BTreeSet<i64> = lowest.values().copied().collect();
        let Some(&low) = heights.first() else {
            break;
        };

        if breaks / span <= MISSING_PAGES_RATIO {
            if heights.len() == 1 {
                // a single region on a single page is no running header
                if list.len() == 1 {
                    list.clear();
                }
                return list;
            }

            let continuous: Vec<u32> = lowest
                .iter()
                .filter(|(_, &height)| height == low)
                .map(|(&page, _)| page)
                .collect();
            let covered = match (continuous.first(), continuous.last()) {
                (Some(a), Some(b)) => f64::from(b - a + 1),
                _ => 0.0,
            };
            let drifting = (continuous.len() as f64) < covered * CONTINUOUS_RATIO
                && heights.len() as f64 > (UNIQUE_HEIGHTS_RATIO * page_count as f64).max(1.0);
            if !drifting {
                return list;
            }
        }

        list.retain(|&i| height_key(boxes[i].1.y0) != low);
    }
    list
}

fn same_height(a: &BBox, b: &BBox) -> bool {
    (a.y0 - b.y0).abs() < SAME_HEIGHT && (a.y1 - b.y1).abs() < SAME_HEIGHT
}

/// Height rounded to four decimals.
fn height_key(y: f32) -> i64 {
    (f64::from(y) * 10_000.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{PageInfo, RawFigure};

    fn page(number: u32, texts: &[(BBox, &str)]) -> ClassifiedPage {
        ClassifiedPage {
            info: PageInfo {
                number,
                width: 595.0,
                height: 842.0,
            },
            candidates: texts
                .iter()
                .map(|(bbox, text)| TextRegion {
                    page: number,
                    bbox: *bbox,
                    text: text.to_string(),
                })
                .collect(),
            tables: Vec::new(),
            figures: Vec::new(),
            rects: Vec::new(),
            excluded: 0,
        }
    }

    fn texts(pages: &[ClassifiedPage]) -> Vec<Vec<&str>> {
        pages
            .iter()
            .map(|p| p.candidates.iter().map(|c| c.text.as_str()).collect())
            .collect()
    }

    const FOOTER: BBox = BBox {
        x0: 250.0,
        y0: 20.0,
        x1: 345.0,
        y1: 40.0,
    };
    const BODY: BBox = BBox {
        x0: 50.0,
        y0: 600.0,
        x1: 500.0,
        y1: 750.0,
    };

    #[test]
    fn test_footer_on_every_page_removed() {
        let mut pages = vec![
            page(1, &[(BODY, "First"), (FOOTER, "Page 1")]),
            page(2, &[(BODY, "Second"), (FOOTER, "Page 2")]),
            page(3, &[(BODY, "Third"), (FOOTER, "Page 3")]),
        ];

        assert_eq!(remove_running_headers(&mut pages), 3);
        assert_eq!(texts(&pages), vec![vec!["First"], vec!["Second"], vec!["Third"]]);
    }

    #[test]
    fn test_single_bottom_note_kept() {
        let mut pages = vec![
            page(1, &[(BODY, "First"), (FOOTER, "Footnote")]),
            page(2, &[(BODY, "Second")]),
            page(3, &[(BODY, "Third")]),
            page(4, &[(BODY, "Fourth")]),
        ];

        assert_eq!(remove_running_headers(&mut pages), 0);
        assert_eq!(texts(&pages)[0], vec!["First", "Footnote"]);
    }

    #[test]
    fn test_body_text_never_removed() {
        // same height on every page but outside both margins
        let mut pages: Vec<ClassifiedPage> = (1..=5).map(|n| page(n, &[(BODY, "Body")])).collect();
        assert_eq!(remove_running_headers(&mut pages), 0);
    }

    #[test]
    fn test_drifting_header_height_kept() {
        let header = BBox::new(50.0, 800.0, 300.0, 815.0);
        let low = BBox::new(50.0, 780.0, 300.0, 795.0);
        let boxes: Vec<(u32, BBox)> = (1..=10)
            .map(|n| (n, header))
            .chain([1, 5, 10].into_iter().map(|n| (n, low)))
            .collect();

        let running = running_boxes(&boxes, 10, 842.0);
        // the boxes repeated on scattered pages only are dropped
        assert_eq!(running, (0..10).collect());
    }

    #[test]
    fn test_header_missing_on_few_pages() {
        let header = BBox::new(50.0, 800.0, 300.0, 815.0);
        // title page and one more page without header
        let boxes: Vec<(u32, BBox)> = (2..=20).filter(|&n| n != 11).map(|n| (n, header)).collect();

        assert_eq!(running_boxes(&boxes, 20, 842.0).len(), 18);
    }

    #[test]
    fn test_tables_and_figures_removed() {
        let logo = BBox::new(40.0, 790.0, 120.0, 830.0);
        let mut pages: Vec<ClassifiedPage> = (1..=3)
            .map(|n| {
                let mut p = page(n, &[(BODY, "Body")]);
                p.figures.push(FigureRegion {
                    figure: RawFigure {
                        bbox: logo,
                        image_ref: format!("logo-{}.png", n),
                        caption: None,
                    },
                    text: None,
                });
                p.tables.push(RawTable {
                    bbox: BBox::new(50.0, 300.0, 500.0, 500.0),
                    cells: Vec::new(),
                    caption: None,
                });
                p
            })
            .collect();

        assert_eq!(remove_running_headers(&mut pages), 3);
        assert!(pages.iter().all(|p| p.figures.is_empty()));
        assert!(pages.iter().all(|p| p.tables.len() == 1));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(remove_running_headers(&mut []), 0);
    }
}
