//! Bounding-box geometry shared by every resolution stage.
//!
//! All coordinates are PDF points with the origin at the bottom-left corner of
//! the page, so `y1` is the top edge of a box and `y0` its bottom edge.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An axis-aligned bounding box `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    /// Left edge
    pub x0: f32,
    /// Bottom edge
    pub y0: f32,
    /// Right edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
}

/// A single coordinate on a page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl BBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Reject boxes the layout analysis should never have produced.
    pub fn validate(&self) -> Result<()> {
        if ![self.x0, self.y0, self.x1, self.y1]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(Error::MalformedGeometry(format!(
                "non-finite coordinates in {}",
                self
            )));
        }
        if self.x1 < self.x0 || self.y1 < self.y0 {
            return Err(Error::MalformedGeometry(format!("inverted box {}", self)));
        }
        if self.width() == 0.0 || self.height() == 0.0 {
            return Err(Error::MalformedGeometry(format!("zero-area box {}", self)));
        }
        Ok(())
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// The top-left corner, where PDF jump targets usually point.
    pub fn top_left(&self) -> Point {
        Point::new(self.x0, self.y1)
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f32) -> BBox {
        BBox::new(
            self.x0 - margin,
            self.y0 - margin,
            self.x1 + margin,
            self.y1 + margin,
        )
    }

    /// Smallest box covering both boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox::new(
            self.x0.min(other.x0),
            self.y0.min(other.y0),
            self.x1.max(other.x1),
            self.y1.max(other.y1),
        )
    }

    /// Check whether `inner` lies fully inside this box grown by `tolerance`.
    pub fn contains(&self, inner: &BBox, tolerance: f32) -> bool {
        inner.x0 >= self.x0 - tolerance
            && inner.y0 >= self.y0 - tolerance
            && inner.x1 <= self.x1 + tolerance
            && inner.y1 <= self.y1 + tolerance
    }

    /// Check whether a coordinate lies inside this box grown by `tolerance`.
    pub fn contains_point(&self, point: Point, tolerance: f32) -> bool {
        point.x >= self.x0 - tolerance
            && point.x <= self.x1 + tolerance
            && point.y >= self.y0 - tolerance
            && point.y <= self.y1 + tolerance
    }

    /// Check whether the interiors of two boxes intersect.
    pub fn overlaps(&self, other: &BBox) -> bool {
        self.x0 < other.x1 && other.x0 < self.x1 && self.y0 < other.y1 && other.y0 < self.y1
    }

    /// Area shared by two boxes (0 when they do not overlap).
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        let w = self.x1.min(other.x1) - self.x0.max(other.x0);
        let h = self.y1.min(other.y1) - self.y0.max(other.y0);
        if w <= 0.0 || h <= 0.0 {
            0.0
        } else {
            w * h
        }
    }

    /// Euclidean distance from a point to the closest point of the box.
    ///
    /// Points inside the box have distance 0.
    pub fn distance_to_point(&self, point: Point) -> f32 {
        let dx = (self.x0 - point.x).max(0.0).max(point.x - self.x1);
        let dy = (self.y0 - point.y).max(0.0).max(point.y - self.y1);
        dx.hypot(dy)
    }

    /// Clamp the box to the page area `[0, 0, width, height]`.
    pub fn clamp_to(&self, width: f32, height: f32) -> BBox {
        BBox::new(
            self.x0.clamp(0.0, width),
            self.y0.clamp(0.0, height),
            self.x1.clamp(0.0, width),
            self.y1.clamp(0.0, height),
        )
    }
}

impl fmt::Display for BBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}, {}]", self.x0, self.y0, self.x1, self.y1)
    }
}

/// Something placed on a page.
pub trait Located {
    /// Page number (1-indexed).
    fn page(&self) -> u32;

    /// Bounding box on that page.
    fn bbox(&self) -> BBox;
}

/// Reading order: lower page first, then top-to-bottom, then left-to-right.
pub fn reading_order(a_page: u32, a: &BBox, b_page: u32, b: &BBox) -> Ordering {
    a_page
        .cmp(&b_page)
        .then_with(|| b.y1.total_cmp(&a.y1))
        .then_with(|| a.x0.total_cmp(&b.x0))
}

/// Find the candidate whose box is closest to `point`.
///
/// Returns `None` for an empty candidate list.
pub fn nearest<'a, T, I>(candidates: I, point: Point) -> Option<(&'a T, f32)>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
{
    nearest_by(candidates, |c| c.bbox().distance_to_point(point))
}

/// Find the candidate with the smallest `distance`, ties broken by reading order.
///
/// Candidates whose distance is not finite are ignored.
pub fn nearest_by<'a, T, I, F>(candidates: I, distance: F) -> Option<(&'a T, f32)>
where
    T: Located + 'a,
    I: IntoIterator<Item = &'a T>,
    F: Fn(&T) -> f32,
{
    let mut best: Option<(&'a T, f32)> = None;
    for candidate in candidates {
        let d = distance(candidate);
        if !d.is_finite() {
            continue;
        }
        best = match best {
            None => Some((candidate, d)),
            Some((current, current_d)) => {
                let ord = d.total_cmp(&current_d).then_with(|| {
                    reading_order(
                        candidate.page(),
                        &candidate.bbox(),
                        current.page(),
                        &current.bbox(),
                    )
                });
                if ord == Ordering::Less {
                    Some((candidate, d))
                } else {
                    Some((current, current_d))
                }
            }
        };
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Boxed(u32, BBox);

    impl Located for Boxed {
        fn page(&self) -> u32 {
            self.0
        }

        fn bbox(&self) -> BBox {
            self.1
        }
    }

    #[test]
    fn test_contains_with_tolerance() {
        let table = BBox::new(100.0, 100.0, 300.0, 300.0);
        let inside = BBox::new(120.0, 120.0, 200.0, 140.0);
        let sticking_out = BBox::new(120.0, 120.0, 305.0, 140.0);

        assert!(table.contains(&inside, 0.0));
        assert!(!table.contains(&sticking_out, 0.0));
        assert!(table.contains(&sticking_out, 8.0));
    }

    #[test]
    fn test_validate() {
        assert!(BBox::new(0.0, 0.0, 10.0, 10.0).validate().is_ok());

        let inverted = BBox::new(10.0, 0.0, 0.0, 10.0).validate();
        assert!(matches!(inverted, Err(Error::MalformedGeometry(_))));

        let flat = BBox::new(0.0, 5.0, 10.0, 5.0).validate();
        assert!(matches!(flat, Err(Error::MalformedGeometry(_))));

        let nan = BBox::new(f32::NAN, 0.0, 10.0, 10.0).validate();
        assert!(matches!(nan, Err(Error::MalformedGeometry(_))));
    }

    #[test]
    fn test_distance_to_point() {
        let b = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(b.distance_to_point(Point::new(5.0, 5.0)), 0.0);
        assert_eq!(b.distance_to_point(Point::new(13.0, 14.0)), 5.0);
        assert_eq!(b.distance_to_point(Point::new(-2.0, 5.0)), 2.0);
    }

    #[test]
    fn test_intersection_and_union() {
        let a = BBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BBox::new(5.0, 5.0, 20.0, 20.0);
        assert!(a.overlaps(&b));
        assert_eq!(a.intersection_area(&b), 25.0);
        assert_eq!(a.union(&b), BBox::new(0.0, 0.0, 20.0, 20.0));

        let far = BBox::new(50.0, 50.0, 60.0, 60.0);
        assert!(!a.overlaps(&far));
        assert_eq!(a.intersection_area(&far), 0.0);
    }

    #[test]
    fn test_nearest_empty() {
        let none: Vec<Boxed> = Vec::new();
        assert!(nearest(&none, Point::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_nearest_prefers_closest() {
        let candidates = vec![
            Boxed(1, BBox::new(0.0, 0.0, 10.0, 10.0)),
            Boxed(1, BBox::new(100.0, 100.0, 110.0, 110.0)),
        ];
        let (hit, d) = nearest(&candidates, Point::new(95.0, 105.0)).unwrap();
        assert_eq!(hit.1.x0, 100.0);
        assert_eq!(d, 5.0);
    }

    #[test]
    fn test_nearest_ties_use_reading_order() {
        // both boxes contain the point; the upper one wins
        let candidates = vec![
            Boxed(1, BBox::new(0.0, 0.0, 100.0, 50.0)),
            Boxed(1, BBox::new(0.0, 40.0, 100.0, 80.0)),
        ];
        let (hit, d) = nearest(&candidates, Point::new(50.0, 45.0)).unwrap();
        assert_eq!(d, 0.0);
        assert_eq!(hit.1.y1, 80.0);

        // lower page first
        let candidates = vec![
            Boxed(2, BBox::new(0.0, 0.0, 10.0, 10.0)),
            Boxed(1, BBox::new(0.0, 0.0, 10.0, 10.0)),
        ];
        let (hit, _) = nearest(&candidates, Point::new(5.0, 5.0)).unwrap();
        assert_eq!(hit.0, 1);
    }

    #[test]
    fn test_reading_order() {
        let top = BBox::new(300.0, 700.0, 400.0, 720.0);
        let bottom_left = BBox::new(50.0, 100.0, 150.0, 120.0);
        assert_eq!(reading_order(1, &top, 1, &bottom_left), Ordering::Less);
        assert_eq!(reading_order(2, &top, 1, &bottom_left), Ordering::Greater);

        let left = BBox::new(50.0, 700.0, 100.0, 720.0);
        assert_eq!(reading_order(1, &left, 1, &top), Ordering::Less);
    }
}
