//! Geometry helpers for axis-aligned boxes in image pixel coordinates.
//!
//! Everything here is pure. Hit-testing functions take `(index, box)` pairs so
//! callers can filter the candidate set (for example by label kind) without
//! losing the store index of each box.

use serde::{Deserialize, Serialize};

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Midpoint between two points.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// One of the four corners of a box.
///
/// The order of [`Corner::ALL`] matches [`BoundingBox::corners`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Corner {
    /// All corners in canonical order.
    pub const ALL: [Corner; 4] = [
        Corner::TopLeft,
        Corner::BottomLeft,
        Corner::TopRight,
        Corner::BottomRight,
    ];

    /// Position of this corner in [`Corner::ALL`].
    pub fn index(self) -> usize {
        match self {
            Corner::TopLeft => 0,
            Corner::BottomLeft => 1,
            Corner::TopRight => 2,
            Corner::BottomRight => 3,
        }
    }

    /// The diagonally opposite corner.
    pub fn opposite(self) -> Corner {
        match self {
            Corner::TopLeft => Corner::BottomRight,
            Corner::BottomLeft => Corner::TopRight,
            Corner::TopRight => Corner::BottomLeft,
            Corner::BottomRight => Corner::TopLeft,
        }
    }
}

/// An axis-aligned box stored as two corners.
///
/// Boxes built through [`BoundingBox::normalized`] (and every box held by the
/// store) satisfy `x1 <= x2` and `y1 <= y2`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    /// Build a box from raw coordinates, sorting each axis.
    pub fn normalized(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Build a normalized box spanned by two arbitrary points.
    pub fn from_corners(a: Point, b: Point) -> Self {
        Self::normalized(a.x, a.y, b.x, b.y)
    }

    /// Return this box with each axis sorted.
    pub fn normalize(self) -> Self {
        Self::normalized(self.x1, self.y1, self.x2, self.y2)
    }

    pub fn is_normalized(&self) -> bool {
        self.x1 <= self.x2 && self.y1 <= self.y2
    }

    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    /// Inclusive containment test on all four edges.
    pub fn contains(&self, point: &Point) -> bool {
        self.x1 <= point.x && point.x <= self.x2 && self.y1 <= point.y && point.y <= self.y2
    }

    /// Corner points in the order top-left, bottom-left, top-right, bottom-right.
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x1, self.y1),
            Point::new(self.x1, self.y2),
            Point::new(self.x2, self.y1),
            Point::new(self.x2, self.y2),
        ]
    }

    pub fn corner(&self, corner: Corner) -> Point {
        self.corners()[corner.index()]
    }

    /// Shift the whole box without changing its size.
    pub fn translated(&self, dx: f32, dy: f32) -> Self {
        Self {
            x1: self.x1 + dx,
            y1: self.y1 + dy,
            x2: self.x2 + dx,
            y2: self.y2 + dy,
        }
    }

    /// Move a single corner by `(dx, dy)` and re-normalize.
    ///
    /// The coordinates owned by the opposite corner are left untouched, so
    /// dragging past it flips which corner is "near" instead of inverting
    /// the box.
    pub fn with_corner_moved(&self, corner: Corner, dx: f32, dy: f32) -> Self {
        let (x1, y1, x2, y2) = match corner {
            Corner::TopLeft => (self.x1 + dx, self.y1 + dy, self.x2, self.y2),
            Corner::BottomLeft => (self.x1 + dx, self.y1, self.x2, self.y2 + dy),
            Corner::TopRight => (self.x1, self.y1 + dy, self.x2 + dx, self.y2),
            Corner::BottomRight => (self.x1, self.y1, self.x2 + dx, self.y2 + dy),
        };
        Self::normalized(x1, y1, x2, y2)
    }

    /// Distance from `point` to the closest of the four corners.
    pub fn nearest_corner_distance(&self, point: &Point) -> f32 {
        self.corners()
            .iter()
            .map(|c| c.distance_to(point))
            .fold(f32::INFINITY, f32::min)
    }
}

/// Find the corner closest to `point` among `boxes`, if it lies within `radius`.
///
/// Ties keep the first candidate in iteration order.
pub fn nearest_corner<I>(point: Point, boxes: I, radius: f32) -> Option<(usize, Corner)>
where
    I: IntoIterator<Item = (usize, BoundingBox)>,
{
    let mut best: Option<(usize, Corner)> = None;
    let mut best_distance = f32::INFINITY;

    for (index, bbox) in boxes {
        for (corner, position) in Corner::ALL.iter().zip(bbox.corners()) {
            let distance = position.distance_to(&point);
            if distance <= radius && distance < best_distance {
                best_distance = distance;
                best = Some((index, *corner));
            }
        }
    }

    best
}

/// Indices of every box containing `point`, in iteration order.
pub fn containing_boxes<I>(point: Point, boxes: I) -> Vec<usize>
where
    I: IntoIterator<Item = (usize, BoundingBox)>,
{
    boxes
        .into_iter()
        .filter(|(_, bbox)| bbox.contains(&point))
        .map(|(index, _)| index)
        .collect()
}

/// Among the boxes containing `point`, pick the one with the closest corner.
///
/// Useful when boxes are nested: clicking near the edge of the inner box
/// picks it over the enclosing one. Ties keep iteration order.
pub fn closest_containing_box<I>(point: Point, boxes: I) -> Option<usize>
where
    I: IntoIterator<Item = (usize, BoundingBox)>,
{
    let mut best: Option<usize> = None;
    let mut best_distance = f32::INFINITY;

    for (index, bbox) in boxes {
        if !bbox.contains(&point) {
            continue;
        }
        let distance = bbox.nearest_corner_distance(&point);
        if distance < best_distance {
            best_distance = distance;
            best = Some(index);
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indexed(boxes: &[BoundingBox]) -> impl Iterator<Item = (usize, BoundingBox)> + '_ {
        boxes.iter().copied().enumerate()
    }

    #[test]
    fn test_point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert!((p1.distance_to(&p2) - 5.0).abs() < 0.001);
    }

    #[test]
    fn test_normalize_any_order() {
        let inputs = [
            (10.0, 20.0, 50.0, 80.0),
            (50.0, 80.0, 10.0, 20.0),
            (50.0, 20.0, 10.0, 80.0),
            (10.0, 80.0, 50.0, 20.0),
        ];
        for (x1, y1, x2, y2) in inputs {
            let b = BoundingBox::normalized(x1, y1, x2, y2);
            assert!(b.is_normalized());
            assert_eq!(b, BoundingBox::normalized(10.0, 20.0, 50.0, 80.0));
            // Same unordered point set
            let mut xs = [b.x1, b.x2];
            let mut orig = [x1, x2];
            xs.sort_by(f32::total_cmp);
            orig.sort_by(f32::total_cmp);
            assert_eq!(xs, orig);
        }
    }

    #[test]
    fn test_corner_order() {
        let b = BoundingBox::normalized(1.0, 2.0, 3.0, 4.0);
        assert_eq!(
            b.corners(),
            [
                Point::new(1.0, 2.0),
                Point::new(1.0, 4.0),
                Point::new(3.0, 2.0),
                Point::new(3.0, 4.0),
            ]
        );
        for corner in Corner::ALL {
            assert_eq!(b.corner(corner), b.corners()[corner.index()]);
        }
    }

    #[test]
    fn test_contains_is_inclusive() {
        let b = BoundingBox::normalized(10.0, 10.0, 110.0, 110.0);
        assert!(b.contains(&Point::new(50.0, 50.0)));
        assert!(b.contains(&Point::new(10.0, 10.0)));
        assert!(b.contains(&Point::new(110.0, 110.0)));
        assert!(!b.contains(&Point::new(5.0, 50.0)));
    }

    #[test]
    fn test_resize_keeps_opposite_corner() {
        let original = BoundingBox::normalized(10.0, 10.0, 50.0, 50.0);
        for corner in Corner::ALL {
            let anchor = original.corner(corner.opposite());
            for (dx, dy) in [(5.0, 5.0), (-30.0, 12.0), (100.0, 100.0), (-100.0, -100.0)] {
                let resized = original.with_corner_moved(corner, dx, dy);
                assert!(resized.is_normalized());
                assert!(
                    resized.corners().contains(&anchor),
                    "{:?} moved by ({}, {}) lost anchor {:?}: {:?}",
                    corner,
                    dx,
                    dy,
                    anchor,
                    resized
                );
            }
        }
    }

    #[test]
    fn test_resize_past_opposite_flips() {
        let original = BoundingBox::normalized(10.0, 10.0, 50.0, 50.0);
        let resized = original.with_corner_moved(Corner::TopLeft, 100.0, 100.0);
        assert_eq!(resized, BoundingBox::normalized(50.0, 50.0, 110.0, 110.0));
    }

    #[test]
    fn test_translate_preserves_size() {
        let b = BoundingBox::normalized(10.0, 20.0, 49.0, 59.0);
        let moved = b.translated(-7.0, 13.0);
        assert_eq!(moved.width(), b.width());
        assert_eq!(moved.height(), b.height());
    }

    #[test]
    fn test_nearest_corner_within_radius() {
        let boxes = [
            BoundingBox::normalized(0.0, 0.0, 100.0, 100.0),
            BoundingBox::normalized(95.0, 95.0, 200.0, 200.0),
        ];
        // (97, 97) is 4.24 from box 0 bottom-right, 2.83 from box 1 top-left
        assert_eq!(
            nearest_corner(Point::new(97.0, 97.0), indexed(&boxes), 10.0),
            Some((1, Corner::TopLeft))
        );
        assert_eq!(
            nearest_corner(Point::new(50.0, 50.0), indexed(&boxes), 10.0),
            None
        );
        // Exactly on the radius still counts
        assert_eq!(
            nearest_corner(Point::new(10.0, 0.0), indexed(&boxes), 10.0),
            Some((0, Corner::TopLeft))
        );
    }

    #[test]
    fn test_nearest_corner_tie_keeps_first() {
        let boxes = [
            BoundingBox::normalized(0.0, 0.0, 10.0, 10.0),
            BoundingBox::normalized(0.0, 0.0, 10.0, 10.0),
        ];
        assert_eq!(
            nearest_corner(Point::new(1.0, 1.0), indexed(&boxes), 10.0),
            Some((0, Corner::TopLeft))
        );
    }

    #[test]
    fn test_containing_boxes_in_order() {
        let boxes = [
            BoundingBox::normalized(0.0, 0.0, 100.0, 100.0),
            BoundingBox::normalized(200.0, 200.0, 300.0, 300.0),
            BoundingBox::normalized(40.0, 40.0, 60.0, 60.0),
        ];
        assert_eq!(
            containing_boxes(Point::new(50.0, 50.0), indexed(&boxes)),
            vec![0, 2]
        );
        assert!(containing_boxes(Point::new(150.0, 150.0), indexed(&boxes)).is_empty());
    }

    #[test]
    fn test_closest_containing_box_prefers_nearest_corner() {
        let boxes = [
            BoundingBox::normalized(0.0, 0.0, 100.0, 100.0),
            BoundingBox::normalized(40.0, 40.0, 60.0, 60.0),
        ];
        assert_eq!(
            closest_containing_box(Point::new(42.0, 42.0), indexed(&boxes)),
            Some(1)
        );
        assert_eq!(
            closest_containing_box(Point::new(2.0, 2.0), indexed(&boxes)),
            Some(0)
        );
        assert_eq!(
            closest_containing_box(Point::new(150.0, 150.0), indexed(&boxes)),
            None
        );
    }

    #[test]
    fn test_closest_containing_box_tie_keeps_first() {
        let boxes = [
            BoundingBox::normalized(0.0, 0.0, 100.0, 100.0),
            BoundingBox::normalized(0.0, 0.0, 100.0, 100.0),
        ];
        assert_eq!(
            closest_containing_box(Point::new(50.0, 50.0), indexed(&boxes)),
            Some(0)
        );
    }
}
