//! Benchmarks for libpdf structure resolution.
//!
//! Run with: cargo bench
//!
//! These benchmarks resolve synthetic layouts held by a `MemoryProvider`.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use libpdf::provider::{RawLinkAnnotation, RawOutlineNode, RawTable, RawTarget};
use libpdf::{BBox, ExtractOptions, MemoryPage, MemoryProvider};

/// Creates a synthetic layout with one chapter, ten paragraphs, a table and
/// a cross-page link per page.
fn create_test_layout(page_count: u32) -> MemoryProvider {
    let mut provider = MemoryProvider::new();

    for number in 1..=page_count {
        let mut page = MemoryPage::new(number, 595.0, 842.0)
            .with_text(BBox::new(50.0, 780.0, 300.0, 796.0), format!("{} Chapter {}", number, number));

        for i in 0..10 {
            let top = 760.0 - i as f32 * 40.0;
            page = page.with_text(
                BBox::new(50.0, top - 30.0, 545.0, top),
                format!("Paragraph {} of page {} - benchmark content for libpdf.", i + 1, number),
            );
        }

        page = page
            .with_table(RawTable {
                bbox: BBox::new(50.0, 100.0, 545.0, 300.0),
                cells: Vec::new(),
                caption: None,
            })
            .with_link(RawLinkAnnotation {
                rect: BBox::new(60.0, 735.0, 120.0, 750.0),
                char_range: Some((0, 9)),
                target: RawTarget::Explicit {
                    page: page_count + 1 - number,
                    x: 100.0,
                    y: 600.0,
                },
            });

        provider = provider.with_page(page).with_outline(RawOutlineNode::new(
            format!("{} Chapter {}", number, number),
            RawTarget::Explicit {
                page: number,
                x: 50.0,
                y: 796.0,
            },
        ));
    }

    provider
}

/// Benchmark full extraction at various sizes.
fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");

    for page_count in [1, 10, 50].iter() {
        let provider = create_test_layout(*page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| libpdf::extract(black_box(&provider), &ExtractOptions::default()).unwrap());
        });
    }

    group.finish();
}

/// Benchmark parallel against sequential page classification.
fn bench_sequential(c: &mut Criterion) {
    let provider = create_test_layout(50);
    let options = ExtractOptions::default().sequential();

    c.bench_function("extract_50_pages_sequential", |b| {
        b.iter(|| libpdf::extract(black_box(&provider), &options).unwrap());
    });
}

/// Benchmark JSON rendering of a resolved tree.
fn bench_to_json(c: &mut Criterion) {
    let root = libpdf::extract(&create_test_layout(10), &ExtractOptions::default()).unwrap();

    c.bench_function("to_json_10_pages", |b| {
        b.iter(|| libpdf::render::to_json(black_box(&root), libpdf::JsonFormat::Compact).unwrap());
    });
}

criterion_group!(benches, bench_extract, bench_sequential, bench_to_json);
criterion_main!(benches);
