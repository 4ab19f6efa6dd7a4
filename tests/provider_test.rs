//! Integration tests for layout dumps and the `LayoutProvider` seam.

use std::collections::HashMap;
use std::fs;

use libpdf::provider::{
    Destination, PageInfo, RawFigure, RawLinkAnnotation, RawOutlineNode, RawTable,
    RawTextBox,
};
use libpdf::{
    extract, extract_file, extract_file_with_options, BBox, Element, Error, ExtractOptions,
    JsonFormat, LayoutProvider, Libpdf, PageSelection,
};

const LAYOUT: &str = r#"{
    "pages": [
        {
            "number": 1, "width": 595, "height": 842,
            "text_boxes": [
                {"bbox": {"x0": 50, "y0": 760, "x1": 80, "y1": 776}, "text": "1"},
                {"bbox": {"x0": 90, "y0": 760, "x1": 300, "y1": 776}, "text": "Overview"},
                {"bbox": {"x0": 50, "y0": 700, "x1": 500, "y1": 750}, "text": "Overview text"},
                {"bbox": {"x0": 110, "y0": 420, "x1": 300, "y1": 480}, "text": "Figure label"},
                {"bbox": {"x0": 50, "y0": 20, "x1": 500, "y1": 40}, "text": "Page footer"}
            ],
            "figures": [
                {"bbox": {"x0": 100, "y0": 400, "x1": 500, "y1": 600}, "image_ref": "img/p1-1.png",
                 "caption": "Figure 1"}
            ],
            "rects": [
                {"bbox": {"x0": 40, "y0": 100, "x1": 550, "y1": 200}, "non_stroking_color": [0.9, 0.9, 0.9]}
            ],
            "link_annotations": [
                {"rect": {"x0": 60, "y0": 710, "x1": 120, "y1": 725}, "char_range": [0, 8],
                 "target": "figures"}
            ]
        }
    ],
    "outline": [
        {"title": "1 Overview", "target": {"page": 1, "x": 90, "y": 776}}
    ],
    "named_destinations": {
        "figures": {"page": 1, "x": 300, "y": 500}
    }
}"#;

fn write_layout() -> tempfile::NamedTempFile {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), LAYOUT).unwrap();
    file
}

#[test]
fn test_extract_file() {
    let file = write_layout();
    let root = extract_file(file.path()).unwrap();

    let chapter = root.find("chapter.1").and_then(Element::as_chapter).unwrap();
    assert_eq!(chapter.title, "Overview");
    // the number box left of the heading is merged into it
    assert_eq!(chapter.text.as_deref(), Some("1 Overview"));
    assert_eq!(chapter.position.map(|p| p.x0), Some(50.0));

    let figure = match root.find("chapter.1/figure.1") {
        Some(Element::Figure(f)) => f,
        other => panic!("expected figure, got {:?}", other),
    };
    assert_eq!(figure.image_ref, "img/p1-1.png");
    assert_eq!(figure.caption.as_deref(), Some("Figure 1"));
    assert_eq!(figure.text.as_deref(), Some("Figure label"));

    assert!(matches!(root.find("chapter.1/rect.1"), Some(Element::Rect(_))));
    assert_eq!(
        root.find("chapter.1/paragraph.2").and_then(Element::text),
        Some("Page footer")
    );

    let link = &root.links()[0];
    assert_eq!((link.idx_start, link.idx_end), (0, 8));
    assert_eq!(link.libpdf_target.as_deref(), Some("chapter.1/figure.1"));
}

#[test]
fn test_extract_file_with_crop() {
    let file = write_layout();
    let options = ExtractOptions::default().with_crop(libpdf::CropMargins {
        top: 0.0,
        bottom: 50.0,
        left: 0.0,
        right: 0.0,
    });
    let root = extract_file_with_options(file.path(), &options).unwrap();

    let flat = root.flattened();
    assert!(flat.paragraphs.iter().all(|p| p.text != "Page footer"));
}

#[test]
fn test_to_json_file() {
    let file = write_layout();
    let json = libpdf::to_json(file.path(), JsonFormat::Compact).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["content"][0]["type"], "chapter");
    assert_eq!(value["content"][0]["id"], "chapter.1");
    assert_eq!(value["pages"][0]["id"], "page.1");
}

#[test]
fn test_builder_with_pages() {
    let file = write_layout();
    let result = Libpdf::new()
        .with_pages(PageSelection::parse("2").unwrap())
        .extract_file(file.path());
    assert!(matches!(result, Err(Error::NoPages)));
}

/// A provider that is not backed by a layout dump.
struct GridProvider {
    rows: usize,
}

impl LayoutProvider for GridProvider {
    fn pages(&self) -> libpdf::Result<Vec<PageInfo>> {
        Ok(vec![PageInfo {
            number: 1,
            width: 595.0,
            height: 842.0,
        }])
    }

    fn text_boxes(&self, _page: u32) -> libpdf::Result<Vec<RawTextBox>> {
        Ok((0..self.rows)
            .map(|i| {
                let top = 800.0 - i as f32 * 30.0;
                RawTextBox {
                    bbox: BBox::new(50.0, top - 20.0, 500.0, top),
                    text: format!("row {}", i + 1),
                }
            })
            .collect())
    }

    fn tables(&self, _page: u32) -> libpdf::Result<Vec<RawTable>> {
        Ok(Vec::new())
    }

    fn figures(&self, _page: u32) -> libpdf::Result<Vec<RawFigure>> {
        Ok(Vec::new())
    }

    fn outline(&self) -> libpdf::Result<Vec<RawOutlineNode>> {
        Ok(Vec::new())
    }

    fn named_destinations(&self) -> libpdf::Result<HashMap<String, Destination>> {
        Ok(HashMap::new())
    }

    fn link_annotations(&self, _page: u32) -> libpdf::Result<Vec<RawLinkAnnotation>> {
        Ok(Vec::new())
    }
}

#[test]
fn test_custom_provider() {
    let provider = GridProvider { rows: 3 };
    assert!(provider.rects(1).unwrap().is_empty());

    let root = extract(&provider, &ExtractOptions::default()).unwrap();
    let ids: Vec<&str> = root.content.iter().map(Element::id).collect();
    assert_eq!(ids, vec!["paragraph.1", "paragraph.2", "paragraph.3"]);
    assert_eq!(root.content[2].text(), Some("row 3"));
}

#[test]
fn test_provider_as_trait_object() {
    let provider: Box<dyn LayoutProvider> = Box::new(GridProvider { rows: 1 });
    let root = extract(provider.as_ref(), &ExtractOptions::default()).unwrap();
    assert_eq!(root.content.len(), 1);
}

#[test]
fn test_rect_color_preserved() {
    let file = write_layout();
    let root = extract_file(file.path()).unwrap();

    let rect = root.flattened().rects[0].clone();
    assert_eq!(rect.non_stroking_color, Some(vec![0.9, 0.9, 0.9]));
    assert_eq!(rect.position.bbox(), BBox::new(40.0, 100.0, 550.0, 200.0));
    assert!(rect.text.is_none());
}
