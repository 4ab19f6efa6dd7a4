//! Extraction options and configuration.

use std::ops::RangeInclusive;

use crate::error::{Error, Result};

/// Options for resolving the structure of a document.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Tolerance (points) when testing whether a text box lies inside a
    /// table, figure or rect
    pub table_margin: f32,

    /// Maximum distance (points) between an outline target and the top-left
    /// corner of a heading box
    pub chapter_match_distance: f32,

    /// Vertical tolerance (points) for a separate number box to count as being
    /// on the same line as its heading; applies to top and bottom edges
    pub number_box_line_tolerance: f32,

    /// Maximum horizontal gap (points) between a number box and its heading
    pub number_box_max_gap: f32,

    /// Margin (points) added around link annotation rectangles
    pub annotation_tolerance: f32,

    /// Maximum distance (points) between a link target and the element it
    /// resolves to
    pub link_target_distance: f32,

    /// Figures narrower than this are dropped
    pub figure_min_width: f32,

    /// Figures lower than this are dropped
    pub figure_min_height: f32,

    /// Page margins whose text is ignored (headers, footers)
    pub crop: CropMargins,

    /// Remove text, tables and figures repeated at the same height in the
    /// top or bottom margin across pages
    pub smart_page_crop: bool,

    /// Page selection (which pages to extract)
    pub pages: PageSelection,

    /// Whether to classify pages in parallel
    pub parallel: bool,

    pub no_chapters: bool,
    pub no_paragraphs: bool,
    pub no_tables: bool,
    pub no_figures: bool,
    pub no_rects: bool,
    pub no_annotations: bool,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the containment tolerance for tables, figures and rects.
    pub fn with_table_margin(mut self, margin: f32) -> Self {
        self.table_margin = margin;
        self
    }

    /// Set the heading match cutoff.
    pub fn with_chapter_match_distance(mut self, distance: f32) -> Self {
        self.chapter_match_distance = distance;
        self
    }

    /// Set the maximum gap between a heading and its number box.
    pub fn with_number_box_max_gap(mut self, gap: f32) -> Self {
        self.number_box_max_gap = gap;
        self
    }

    /// Set the link target cutoff.
    pub fn with_link_target_distance(mut self, distance: f32) -> Self {
        self.link_target_distance = distance;
        self
    }

    /// Set the annotation rectangle margin.
    pub fn with_annotation_tolerance(mut self, tolerance: f32) -> Self {
        self.annotation_tolerance = tolerance;
        self
    }

    /// Set the minimum figure size.
    pub fn with_figure_min_size(mut self, width: f32, height: f32) -> Self {
        self.figure_min_width = width;
        self.figure_min_height = height;
        self
    }

    /// Set the crop margins.
    pub fn with_crop(mut self, crop: CropMargins) -> Self {
        self.crop = crop;
        self
    }

    /// Remove headers and footers repeated across pages.
    pub fn with_smart_page_crop(mut self) -> Self {
        self.smart_page_crop = true;
        self
    }

    /// Set page selection.
    pub fn with_pages(mut self, pages: PageSelection) -> Self {
        self.pages = pages;
        self
    }

    /// Enable or disable parallel processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Disable parallel processing.
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    /// Skip chapter detection; headings become paragraphs.
    pub fn without_chapters(mut self) -> Self {
        self.no_chapters = true;
        self
    }

    pub fn without_paragraphs(mut self) -> Self {
        self.no_paragraphs = true;
        self
    }

    pub fn without_tables(mut self) -> Self {
        self.no_tables = true;
        self
    }

    pub fn without_figures(mut self) -> Self {
        self.no_figures = true;
        self
    }

    pub fn without_rects(mut self) -> Self {
        self.no_rects = true;
        self
    }

    /// Skip link annotations entirely.
    pub fn without_annotations(mut self) -> Self {
        self.no_annotations = true;
        self
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            table_margin: 8.0,
            chapter_match_distance: 20.0,
            number_box_line_tolerance: 20.0,
            number_box_max_gap: 30.0,
            annotation_tolerance: 3.0,
            link_target_distance: 65.0,
            figure_min_width: 15.0,
            figure_min_height: 15.0,
            crop: CropMargins::default(),
            smart_page_crop: false,
            pages: PageSelection::All,
            parallel: true,
            no_chapters: false,
            no_paragraphs: false,
            no_tables: false,
            no_figures: false,
            no_rects: false,
            no_annotations: false,
        }
    }
}

/// Margins (points) cut from each side of a page before classification.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CropMargins {
    pub top: f32,
    pub bottom: f32,
    pub left: f32,
    pub right: f32,
}

impl CropMargins {
    /// Same margin on every side.
    pub fn uniform(margin: f32) -> Self {
        Self {
            top: margin,
            bottom: margin,
            left: margin,
            right: margin,
        }
    }

    /// Check if any margin is set.
    pub fn is_empty(&self) -> bool {
        self.top == 0.0 && self.bottom == 0.0 && self.left == 0.0 && self.right == 0.0
    }
}

/// Page selection for extraction.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum PageSelection {
    /// Extract all pages
    #[default]
    All,
    /// Extract a range of pages (inclusive, 1-indexed)
    Range(RangeInclusive<u32>),
    /// Extract specific pages (1-indexed)
    Pages(Vec<u32>),
}

impl PageSelection {
    /// Check if a page number should be included.
    pub fn includes(&self, page: u32) -> bool {
        match self {
            PageSelection::All => true,
            PageSelection::Range(range) => range.contains(&page),
            PageSelection::Pages(pages) => pages.contains(&page),
        }
    }

    /// Parse a page selection string (e.g., "1-10", "1,3,5,7-10").
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s == "all" {
            return Ok(PageSelection::All);
        }

        // Simple range (e.g., "1-10")
        if let Some((start, end)) = s.split_once('-') {
            if !start.contains(',') && !end.contains(',') {
                let (start, end) = parse_bounds(s, start, end)?;
                return Ok(PageSelection::Range(start..=end));
            }
        }

        let mut pages = Vec::new();
        for part in s.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let (start, end) = parse_bounds(part, start, end)?;
                pages.extend(start..=end);
            } else {
                pages.push(parse_page(part)?);
            }
        }

        pages.sort_unstable();
        pages.dedup();
        Ok(PageSelection::Pages(pages))
    }
}

fn parse_page(s: &str) -> Result<u32> {
    match s.trim().parse::<u32>() {
        Ok(0) => Err(Error::InvalidPageRange("pages are numbered from 1".to_string())),
        Ok(p) => Ok(p),
        Err(_) => Err(Error::InvalidPageRange(format!("invalid page number \"{}\"", s))),
    }
}

fn parse_bounds(part: &str, start: &str, end: &str) -> Result<(u32, u32)> {
    let start = parse_page(start)?;
    let end = parse_page(end)?;
    if start > end {
        return Err(Error::InvalidPageRange(format!("descending range \"{}\"", part)));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        let options = ExtractOptions::new()
            .with_table_margin(4.0)
            .with_link_target_distance(30.0)
            .with_number_box_max_gap(12.0)
            .with_smart_page_crop()
            .without_chapters()
            .sequential();

        assert_eq!(options.table_margin, 4.0);
        assert_eq!(options.link_target_distance, 30.0);
        assert_eq!(options.number_box_max_gap, 12.0);
        assert!(options.smart_page_crop);
        assert!(options.no_chapters);
        assert!(!options.parallel);
    }

    #[test]
    fn test_default_options() {
        let options = ExtractOptions::default();
        assert_eq!(options.table_margin, 8.0);
        assert_eq!(options.chapter_match_distance, 20.0);
        assert_eq!(options.link_target_distance, 65.0);
        assert!(options.crop.is_empty());
        assert!(!options.smart_page_crop);
        assert!(options.parallel);
    }

    #[test]
    fn test_page_selection_includes() {
        let all = PageSelection::All;
        assert!(all.includes(1));
        assert!(all.includes(100));

        let range = PageSelection::Range(5..=10);
        assert!(!range.includes(4));
        assert!(range.includes(5));
        assert!(range.includes(10));
        assert!(!range.includes(11));

        let pages = PageSelection::Pages(vec![1, 3, 5, 7]);
        assert!(pages.includes(1));
        assert!(!pages.includes(2));
    }

    #[test]
    fn test_page_selection_parse() {
        assert_eq!(PageSelection::parse("all").unwrap(), PageSelection::All);
        assert_eq!(PageSelection::parse("1-10").unwrap(), PageSelection::Range(1..=10));
        assert_eq!(
            PageSelection::parse("1,3,5-7,3").unwrap(),
            PageSelection::Pages(vec![1, 3, 5, 6, 7])
        );
    }

    #[test]
    fn test_page_selection_parse_errors() {
        assert!(matches!(
            PageSelection::parse("0-3"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(matches!(
            PageSelection::parse("7-2"),
            Err(Error::InvalidPageRange(_))
        ));
        assert!(matches!(
            PageSelection::parse("1,x"),
            Err(Error::InvalidPageRange(_))
        ));
    }
}
