//! JSON rendering for resolved documents.

use crate::error::{Error, Result};
use crate::model::Root;

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Convert a document tree to JSON.
pub fn to_json(root: &Root, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(root),
        JsonFormat::Compact => serde_json::to_string(root),
    };

    result.map_err(|e| Error::Render(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::BBox;
    use crate::model::{Element, Page, Paragraph, Position};

    fn root() -> Root {
        let mut para = Paragraph::new("Hello", Position::new(1, BBox::new(50.0, 700.0, 300.0, 716.0)));
        para.id = "paragraph.1".to_string();
        let mut page = Page::new(1, 595.0, 842.0);
        page.content.push("paragraph.1".to_string());
        Root {
            pages: vec![page],
            content: vec![Element::Paragraph(para)],
        }
    }

    #[test]
    fn test_to_json_pretty() {
        let json = to_json(&root(), JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"type\": \"paragraph\""));
        assert!(json.contains("\"page\": \"page.1\""));
        assert!(json.contains('\n')); // Pretty has newlines
    }

    #[test]
    fn test_to_json_compact() {
        let json = to_json(&root(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n')); // Compact has no newlines
    }

    #[test]
    fn test_json_roundtrip_keeps_tree() {
        let expected = root();
        let json = to_json(&expected, JsonFormat::Compact).unwrap();
        let back: Root = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expected);
    }
}
