//! Geometry value types: points, segments, polygons, clip regions and the
//! (possibly rotated) viewing window.
//!
//! Everything here is a plain value. Clipping and transforming never mutate
//! a shape; they always build new geometry.

use crate::math::vec2::Vec2;

/// A position in world, window-local or device space.
pub type Point = Vec2;

/// An open line between two endpoints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub const fn new(start: Point, end: Point) -> Self {
        Self { start, end }
    }

    /// The point at parameter `t` along the segment (`0` = start, `1` = end).
    pub fn at(&self, t: f64) -> Point {
        self.start.lerp(self.end, t)
    }
}

/// An implicitly closed polygon. Vertex order is the traversal order and is
/// preserved by every operation in this crate.
#[derive(Clone, Debug, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterates the closed edge list, including the edge from the last vertex
    /// back to the first.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Shoelace area; positive for counter-clockwise (y-up) vertex order.
    pub fn signed_area(&self) -> f64 {
        self.edges()
            .map(|edge| edge.start.cross(edge.end))
            .sum::<f64>()
            * 0.5
    }

    pub fn is_counter_clockwise(&self) -> bool {
        self.signed_area() >= 0.0
    }

    /// Even-odd point-in-polygon test. Points exactly on an edge may land on
    /// either side.
    pub fn contains_point(&self, point: Point) -> bool {
        let mut inside = false;
        for edge in self.edges() {
            let (a, b) = (edge.start, edge.end);
            if (a.y > point.y) != (b.y > point.y) {
                let x_at_y = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x_at_y {
                    inside = !inside;
                }
            }
        }
        inside
    }
}

/// An axis-aligned rectangle given by its `min` and `max` corners.
///
/// Used directly as the viewport and, in the window's local frame, as the
/// clip rectangle. Always satisfies `min.x <= max.x` and `min.y <= max.y`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClipRegion {
    min: Point,
    max: Point,
}

impl ClipRegion {
    /// Creates a region from two opposite corners, in any order.
    pub fn new(a: Point, b: Point) -> Self {
        Self {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn from_center(center: Point, half_width: f64, half_height: f64) -> Self {
        let half = Vec2::new(half_width.abs(), half_height.abs());
        Self::new(center - half, center + half)
    }

    pub fn min(&self) -> Point {
        self.min
    }

    pub fn max(&self) -> Point {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point {
        (self.min + self.max) * 0.5
    }

    /// Corners in counter-clockwise order starting at `min`.
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    pub fn to_polygon(&self) -> Polygon {
        Polygon::new(self.corners().to_vec())
    }
}

/// The rectangular region of world space being viewed.
///
/// Stored as center, half-extents and a rotation (degrees, counter-clockwise,
/// always normalized into `[0, 360)`) applied about the center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    center: Point,
    half_width: f64,
    half_height: f64,
    rotation: f64,
}

impl Window {
    pub fn new(center: Point, half_width: f64, half_height: f64, rotation_degrees: f64) -> Self {
        Self {
            center,
            half_width: half_width.abs(),
            half_height: half_height.abs(),
            rotation: normalize_degrees(rotation_degrees),
        }
    }

    /// An unrotated window covering `region`.
    pub fn from_region(region: &ClipRegion) -> Self {
        Self::new(
            region.center(),
            region.width() * 0.5,
            region.height() * 0.5,
            0.0,
        )
    }

    pub fn center(&self) -> Point {
        self.center
    }

    pub fn half_width(&self) -> f64 {
        self.half_width
    }

    pub fn half_height(&self) -> f64 {
        self.half_height
    }

    /// Rotation in degrees, in `[0, 360)`.
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn rotation_radians(&self) -> f64 {
        self.rotation.to_radians()
    }

    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    pub fn set_half_extents(&mut self, half_width: f64, half_height: f64) {
        self.half_width = half_width.abs();
        self.half_height = half_height.abs();
    }

    pub fn set_rotation(&mut self, degrees: f64) {
        self.rotation = normalize_degrees(degrees);
    }

    /// Center ± half-extents, ignoring rotation. This is the persisted form.
    pub fn region(&self) -> ClipRegion {
        ClipRegion::from_center(self.center, self.half_width, self.half_height)
    }

    /// The four world-space corners with rotation applied, counter-clockwise
    /// starting from the rotated `min` corner.
    pub fn corners(&self) -> [Point; 4] {
        let angle = self.rotation_radians();
        let (hw, hh) = (self.half_width, self.half_height);
        [
            Vec2::new(-hw, -hh),
            Vec2::new(hw, -hh),
            Vec2::new(hw, hh),
            Vec2::new(-hw, hh),
        ]
        .map(|offset| self.center + offset.rotate(angle))
    }
}

/// Wraps an angle in degrees into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// The closed set of shape kinds a scene can hold.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(Point),
    Segment(Segment),
    Polygon(Polygon),
}

impl Geometry {
    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "point",
            Geometry::Segment(_) => "segment",
            Geometry::Polygon(_) => "polygon",
        }
    }

    /// Applies `f` to every coordinate, keeping the shape kind and order.
    pub fn map_points(&self, mut f: impl FnMut(Point) -> Point) -> Geometry {
        match self {
            Geometry::Point(p) => Geometry::Point(f(*p)),
            Geometry::Segment(s) => Geometry::Segment(Segment::new(f(s.start), f(s.end))),
            Geometry::Polygon(poly) => {
                Geometry::Polygon(Polygon::new(poly.vertices().iter().map(|&v| f(v)).collect()))
            }
        }
    }
}

/// A scene element: geometry plus an optional display colour (ARGB).
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub geometry: Geometry,
    pub color: Option<u32>,
}

impl Shape {
    pub fn new(geometry: Geometry, color: Option<u32>) -> Self {
        Self { geometry, color }
    }

    pub fn point(p: Point, color: Option<u32>) -> Self {
        Self::new(Geometry::Point(p), color)
    }

    pub fn segment(start: Point, end: Point, color: Option<u32>) -> Self {
        Self::new(Geometry::Segment(Segment::new(start, end)), color)
    }

    pub fn polygon(vertices: Vec<Point>, color: Option<u32>) -> Self {
        Self::new(Geometry::Polygon(Polygon::new(vertices)), color)
    }
}
