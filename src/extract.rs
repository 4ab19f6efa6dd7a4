//! The extraction driver: runs every resolution stage for one document.

use crate::assemble::assemble;
use crate::catalog::Catalog;
use crate::chapters::detect_chapters;
use crate::classify::classify_pages;
use crate::error::{Error, Result};
use crate::links::resolve_links;
use crate::model::Root;
use crate::options::ExtractOptions;
use crate::provider::{LayoutProvider, PageInfo};
use crate::running::remove_running_headers;

/// Resolve the document structure reported by `provider`.
///
/// Catalog resolution and region classification run first, then chapter
/// detection, optional running header removal, tree assembly and finally
/// link resolution.
///
/// # Errors
///
/// Returns [`Error::NoPages`] when no page is selected,
/// [`Error::DuplicateChapterNumber`] when two outline entries share a
/// number, and any error the provider reports.
pub fn extract<P: LayoutProvider + ?Sized>(provider: &P, options: &ExtractOptions) -> Result<Root> {
    let pages: Vec<PageInfo> = provider
        .pages()?
        .into_iter()
        .filter(|p| options.pages.includes(p.number))
        .collect();
    if pages.is_empty() {
        return Err(Error::NoPages);
    }
    log::info!("Extracting {} pages", pages.len());

    let catalog = Catalog::resolve(provider, &pages, options)?;

    let mut layouts = Vec::with_capacity(pages.len());
    for info in &pages {
        let mut layout = provider.page_layout(info.number)?;
        if options.no_tables {
            layout.tables.clear();
        }
        if options.no_figures {
            layout.figures.clear();
        }
        if options.no_rects {
            layout.rects.clear();
        }
        layouts.push((*info, layout));
    }
    let mut classified = classify_pages(layouts, options);
    log::debug!(
        "Excluded {} text boxes inside tables, figures and rects",
        classified.iter().map(|p| p.excluded).sum::<usize>()
    );

    let chapters = if options.no_chapters {
        log::info!("Skipping chapter detection");
        Vec::new()
    } else if !catalog.has_outline() {
        log::info!("Document has no outline, no chapters detected");
        Vec::new()
    } else {
        detect_chapters(&catalog, &mut classified, options)?
    };

    if options.smart_page_crop {
        let removed = remove_running_headers(&mut classified);
        log::info!("Removed {} running headers and footers", removed);
    }

    let mut root = assemble(classified, chapters, &catalog.links, options);
    resolve_links(&mut root, options);

    Ok(root)
}
