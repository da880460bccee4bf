//! Clipping against the window rectangle.
//!
//! All clipping happens in the window's local frame (see
//! [`ViewTransform::world_to_window`](crate::transform::ViewTransform::world_to_window)),
//! where the window is an axis-aligned [`ClipRegion`] whatever its rotation.
//!
//! - [`contains`]: boundary-inclusive point test.
//! - Line clipping with two interchangeable algorithms behind the
//!   [`LineClipper`] trait: [`CohenSutherland`] (outcodes) and
//!   [`LiangBarsky`] (parametric). Both give the same result up to rounding.
//! - [`clip_polygon`]: Weiler–Atherton clipping of any simple polygon,
//!   producing zero or more polygons.

mod outcode;
mod parametric;
mod polygon;

pub use outcode::{CohenSutherland, Outcode};
pub use parametric::{visible_interval, LiangBarsky};
pub use polygon::clip_polygon;

use std::fmt;
use std::str::FromStr;

use crate::geometry::{ClipRegion, Geometry, Point, Segment};

/// True iff `p` lies inside `region` or on its boundary.
pub fn contains(region: &ClipRegion, p: Point) -> bool {
    let (min, max) = (region.min(), region.max());
    min.x <= p.x && p.x <= max.x && min.y <= p.y && p.y <= max.y
}

/// Trait for line clipping algorithms.
///
/// Implementors return the visible part of a segment, or `None` when the
/// segment lies entirely outside. The result keeps the segment's direction.
pub trait LineClipper {
    fn clip_segment(&self, segment: &Segment, region: &ClipRegion) -> Option<Segment>;
}

/// Available line clipping algorithms.
///
/// Selected through configuration; a session can switch it at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineClipAlgorithm {
    /// Outcode based (Cohen–Sutherland).
    #[default]
    CohenSutherland,
    /// Parametric (Liang–Barsky).
    LiangBarsky,
}

impl fmt::Display for LineClipAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineClipAlgorithm::CohenSutherland => write!(f, "cohen-sutherland"),
            LineClipAlgorithm::LiangBarsky => write!(f, "liang-barsky"),
        }
    }
}

impl FromStr for LineClipAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cohen-sutherland" | "cohen" | "outcode" | "1" => Ok(Self::CohenSutherland),
            "liang-barsky" | "liang" | "parametric" | "2" => Ok(Self::LiangBarsky),
            other => Err(format!(
                "unknown line clipping algorithm '{other}' (expected cohen-sutherland or liang-barsky)"
            )),
        }
    }
}

/// Clips whole shapes against one rectangle with the configured line
/// algorithm.
#[derive(Debug, Clone, Copy)]
pub struct Clipper {
    region: ClipRegion,
    algorithm: LineClipAlgorithm,
}

impl Clipper {
    pub fn new(region: ClipRegion, algorithm: LineClipAlgorithm) -> Self {
        Self { region, algorithm }
    }

    pub fn region(&self) -> &ClipRegion {
        &self.region
    }

    pub fn algorithm(&self) -> LineClipAlgorithm {
        self.algorithm
    }

    pub fn contains(&self, p: Point) -> bool {
        contains(&self.region, p)
    }

    pub fn clip_point(&self, p: Point) -> Option<Point> {
        self.contains(p).then_some(p)
    }

    /// Clips `segment` against this clipper's region with the selected
    /// algorithm.
    #[inline]
    pub fn clip_segment(&self, segment: &Segment) -> Option<Segment> {
        match self.algorithm {
            LineClipAlgorithm::CohenSutherland => CohenSutherland.clip_segment(segment, &self.region),
            LineClipAlgorithm::LiangBarsky => LiangBarsky.clip_segment(segment, &self.region),
        }
    }

    /// Reduces `geometry` to its visible parts. Points and segments give at
    /// most one result, polygons any number.
    pub fn clip_geometry(&self, geometry: &Geometry) -> Vec<Geometry> {
        match geometry {
            Geometry::Point(p) => self.clip_point(*p).map(Geometry::Point).into_iter().collect(),
            Geometry::Segment(s) => self
                .clip_segment(s)
                .map(Geometry::Segment)
                .into_iter()
                .collect(),
            Geometry::Polygon(poly) => clip_polygon(poly, &self.region)
                .into_iter()
                .map(Geometry::Polygon)
                .collect(),
        }
    }
}
