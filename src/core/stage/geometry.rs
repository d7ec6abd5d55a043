//=========================================================================
// Geometry
//=========================================================================
//
// 2D shapes used by primitives and for visibility culling.
//
// All coordinates are canvas pixels with a top-left origin. Shapes are
// stored relative to their owning node and moved into stage space with
// `reposition()` when the stage is visited.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::Vec2;

//=== Rect ================================================================

/// Axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size, centered on `center`.
    pub fn around(center: Vec2, width: f32, height: f32) -> Self {
        Self::new(center.x - width / 2.0, center.y - height / 2.0, width, height)
    }

    /// Smallest rectangle containing every point. Empty input yields a
    /// zero-sized rectangle at the origin.
    pub fn bounding(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::new(0.0, 0.0, 0.0, 0.0);
        };

        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));

        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn end_x(&self) -> f32 {
        self.x + self.width
    }

    pub fn end_y(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.end_x() && point.y >= self.y && point.y <= self.end_y()
    }

    /// Edges touching counts as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x <= other.end_x()
            && other.x <= self.end_x()
            && self.y <= other.end_y()
            && other.y <= self.end_y()
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rect({}, {}, {}, {})", self.x, self.y, self.width, self.height)
    }
}

//=== Line / Circle / Polygon / SegmentedLine =============================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Closed polygon.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

impl Polygon {
    /// # Panics
    ///
    /// Panics if fewer than three points are provided.
    pub fn new(points: Vec<Vec2>) -> Self {
        assert!(points.len() >= 3, "Polygon requires at least 3 points, got {}", points.len());
        Self { points }
    }
}

/// Open polyline made of consecutive segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedLine {
    pub points: Vec<Vec2>,
}

impl SegmentedLine {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }
}

//=== Shape ===============================================================

/// Closed set of primitive shapes.
///
/// Renderers receive lines, rectangles, circles and polygons. Segmented
/// lines can be stored on the stage but have no draw callback; the stage
/// skips them during visits.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Line(Line),
    Rect(Rect),
    Circle(Circle),
    Polygon(Polygon),
    SegmentedLine(SegmentedLine),
}

impl Shape {
    /// Returns this shape moved by `offset`.
    pub fn reposition(&self, offset: Vec2) -> Shape {
        match self {
            Shape::Line(line) => Shape::Line(Line::new(line.start + offset, line.end + offset)),
            Shape::Rect(rect) => {
                Shape::Rect(Rect::new(rect.x + offset.x, rect.y + offset.y, rect.width, rect.height))
            }
            Shape::Circle(circle) => Shape::Circle(Circle::new(circle.center + offset, circle.radius)),
            Shape::Polygon(polygon) => Shape::Polygon(Polygon {
                points: polygon.points.iter().map(|p| *p + offset).collect(),
            }),
            Shape::SegmentedLine(line) => Shape::SegmentedLine(SegmentedLine {
                points: line.points.iter().map(|p| *p + offset).collect(),
            }),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            Shape::Line(line) => Rect::bounding(&[line.start, line.end]),
            Shape::Rect(rect) => *rect,
            Shape::Circle(circle) => {
                let diameter = circle.radius * 2.0;
                Rect::around(circle.center, diameter, diameter)
            }
            Shape::Polygon(polygon) => Rect::bounding(&polygon.points),
            Shape::SegmentedLine(line) => Rect::bounding(&line.points),
        }
    }

    /// Short name used in logs and stage dumps.
    pub fn kind(&self) -> &'static str {
        match self {
            Shape::Line(_) => "Line",
            Shape::Rect(_) => "Rect",
            Shape::Circle(_) => "Circle",
            Shape::Polygon(_) => "Polygon",
            Shape::SegmentedLine(_) => "SegmentedLine",
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
