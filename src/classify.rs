//! Region classification.
//!
//! Every text box of a page is either a candidate (a chapter heading or a
//! paragraph) or excluded because it lies inside a table, figure or rect.
//! Pages are independent and may be classified on the rayon thread pool.

use rayon::prelude::*;

use crate::geometry::{BBox, Located};
use crate::options::{CropMargins, ExtractOptions};
use crate::provider::{PageInfo, PageLayout, RawCell, RawFigure, RawRect, RawTable};

/// A text box that survived classification.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    pub page: u32,
    pub bbox: BBox,
    pub text: String,
}

impl Located for TextRegion {
    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> BBox {
        self.bbox
    }
}

/// A figure with the text found inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureRegion {
    pub figure: RawFigure,
    pub text: Option<String>,
}

/// A rect with the text found inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct RectRegion {
    pub rect: RawRect,
    pub text: Option<String>,
}

/// Classification result of one page.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedPage {
    pub info: PageInfo,

    /// Candidate text boxes in input order
    pub candidates: Vec<TextRegion>,

    pub tables: Vec<RawTable>,
    pub figures: Vec<FigureRegion>,
    pub rects: Vec<RectRegion>,

    /// Number of text boxes excluded by containment
    pub excluded: usize,
}

/// Classify a set of pages, preserving page order.
pub fn classify_pages(
    pages: Vec<(PageInfo, PageLayout)>,
    options: &ExtractOptions,
) -> Vec<ClassifiedPage> {
    if options.parallel {
        pages
            .into_par_iter()
            .map(|(info, layout)| classify_page(info, layout, options))
            .collect()
    } else {
        pages
            .into_iter()
            .map(|(info, layout)| classify_page(info, layout, options))
            .collect()
    }
}

/// Classify the regions of one page.
pub fn classify_page(info: PageInfo, layout: PageLayout, options: &ExtractOptions) -> ClassifiedPage {
    let page = info.number;

    let tables: Vec<RawTable> = layout
        .tables
        .into_iter()
        .filter(|t| valid(page, "table", &t.bbox))
        .map(|mut t| {
            t.cells.retain(|c: &RawCell| valid(page, "table cell", &c.bbox));
            t
        })
        .collect();

    let figures: Vec<RawFigure> = layout
        .figures
        .into_iter()
        .filter(|f| valid(page, "figure", &f.bbox))
        .collect();
    let figures = filter_figures(figures, &info, options);

    let rects: Vec<RawRect> = layout
        .rects
        .into_iter()
        .filter(|r| valid(page, "rect", &r.bbox))
        .collect();

    let crop_area = crop_area(&info, &options.crop);

    let mut figure_text: Vec<Vec<String>> = vec![Vec::new(); figures.len()];
    let mut rect_text: Vec<Vec<String>> = vec![Vec::new(); rects.len()];
    let mut candidates = Vec::new();
    let mut excluded = 0;

    for text_box in layout.text_boxes {
        if !valid(page, "text box", &text_box.bbox) {
            continue;
        }
        let text = text_box.text.trim_end();
        if text.trim().is_empty() {
            continue;
        }
        if let Some(area) = &crop_area {
            if !area.contains(&text_box.bbox, 0.0) {
                log::trace!("Page {}: text box {} cropped", page, text_box.bbox);
                continue;
            }
        }

        let margin = options.table_margin;
        if tables.iter().any(|t| t.bbox.contains(&text_box.bbox, margin)) {
            excluded += 1;
        } else if let Some(i) = figures.iter().position(|f| f.bbox.contains(&text_box.bbox, margin)) {
            figure_text[i].push(text.to_string());
            excluded += 1;
        } else if let Some(i) = rects.iter().position(|r| r.bbox.contains(&text_box.bbox, margin)) {
            rect_text[i].push(text.to_string());
            excluded += 1;
        } else {
            candidates.push(TextRegion {
                page,
                bbox: text_box.bbox,
                text: text.to_string(),
            });
        }
    }

    log::debug!(
        "Page {}: {} candidates, {} excluded, {} tables, {} figures, {} rects",
        page,
        candidates.len(),
        excluded,
        tables.len(),
        figures.len(),
        rects.len()
    );

    ClassifiedPage {
        info,
        candidates,
        tables,
        figures: figures
            .into_iter()
            .zip(figure_text)
            .map(|(figure, text)| FigureRegion {
                figure,
                text: join_text(text),
            })
            .collect(),
        rects: rects
            .into_iter()
            .zip(rect_text)
            .map(|(rect, text)| RectRegion {
                rect,
                text: join_text(text),
            })
            .collect(),
        excluded,
    }
}

/// Remove figures nobody can read or that duplicate another figure.
///
/// Figures not larger than the minimum size are dropped, the rest are clamped
/// to the page. A figure completely inside another one is dropped; of two
/// partially overlapping figures the larger one is kept.
pub fn filter_figures(
    figures: Vec<RawFigure>,
    info: &PageInfo,
    options: &ExtractOptions,
) -> Vec<RawFigure> {
    let mut figures: Vec<RawFigure> = figures
        .into_iter()
        .filter(|f| {
            f.bbox.width() > options.figure_min_width && f.bbox.height() > options.figure_min_height
        })
        .map(|mut f| {
            f.bbox = f.bbox.clamp_to(info.width, info.height);
            f
        })
        .collect();

    let mut removed = vec![false; figures.len()];
    for i in 0..figures.len() {
        for j in (i + 1)..figures.len() {
            if removed[i] || removed[j] {
                continue;
            }
            let (a, b) = (&figures[i].bbox, &figures[j].bbox);
            if a.contains(b, 0.0) {
                removed[j] = true;
            } else if b.contains(a, 0.0) {
                removed[i] = true;
            }
        }
    }
    for i in 0..figures.len() {
        for j in (i + 1)..figures.len() {
            if removed[i] || removed[j] {
                continue;
            }
            let (a, b) = (&figures[i].bbox, &figures[j].bbox);
            if a.overlaps(b) {
                if a.area() <= b.area() {
                    removed[i] = true;
                } else {
                    removed[j] = true;
                }
            }
        }
    }

    let mut keep = removed.into_iter().map(|r| !r);
    figures.retain(|_| keep.next().unwrap_or(false));
    figures
}

fn valid(page: u32, what: &str, bbox: &BBox) -> bool {
    match bbox.validate() {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Page {}: skipping {}: {}", page, what, e);
            false
        }
    }
}

fn crop_area(info: &PageInfo, crop: &CropMargins) -> Option<BBox> {
    if crop.is_empty() {
        return None;
    }
    Some(BBox::new(
        crop.left,
        crop.bottom,
        info.width - crop.right,
        info.height - crop.top,
    ))
}

fn join_text(parts: Vec<String>) -> Option<String> {
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}
