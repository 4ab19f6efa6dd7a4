//! Element and cell locations.

use serde::{Deserialize, Serialize};

use crate::geometry::{BBox, Located};

/// Location of an element or a table cell on a page.
///
/// A position is owned by exactly one element or cell; it is created together
/// with its owner and never shared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,

    /// Page number (1-indexed), serialized as the page id (`page.<n>`)
    #[serde(with = "page_ref")]
    pub page: u32,
}

impl Position {
    /// Create a position from a bounding box on a page.
    pub fn new(page: u32, bbox: BBox) -> Self {
        Self {
            x0: bbox.x0,
            y0: bbox.y0,
            x1: bbox.x1,
            y1: bbox.y1,
            page,
        }
    }

    /// The bounding box of this position.
    pub fn bbox(&self) -> BBox {
        BBox::new(self.x0, self.y0, self.x1, self.y1)
    }
}

impl Located for Position {
    fn page(&self) -> u32 {
        self.page
    }

    fn bbox(&self) -> BBox {
        Position::bbox(self)
    }
}

/// Identifier of a page: `page.<number>`.
pub fn page_id(number: u32) -> String {
    format!("page.{}", number)
}

mod page_ref {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(page: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::page_id(*page))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let id = String::deserialize(deserializer)?;
        id.strip_prefix("page.")
            .and_then(|n| n.parse().ok())
            .ok_or_else(|| de::Error::custom(format!("invalid page id \"{}\"", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_serializes_page_id() {
        let pos = Position::new(4, BBox::new(10.0, 20.0, 110.0, 40.0));
        let json = serde_json::to_string(&pos).unwrap();
        assert!(json.contains("\"page\":\"page.4\""));

        let back: Position = serde_json::from_str(&json).unwrap();
        assert_eq!(back, pos);
    }

    #[test]
    fn test_invalid_page_id() {
        let json = r#"{"x0":0,"y0":0,"x1":1,"y1":1,"page":"sheet.1"}"#;
        assert!(serde_json::from_str::<Position>(json).is_err());
    }
}
