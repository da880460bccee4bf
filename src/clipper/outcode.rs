//! Outcode (Cohen–Sutherland) line clipping.
//!
//! Each endpoint gets a 4-bit code saying which boundary half-planes it lies
//! outside of:
//!
//! ```text
//!   1001 | 1000 | 1010
//!  ------+------+------   TOP    = 8
//!   0001 | 0000 | 0010    BOTTOM = 4
//!  ------+------+------   RIGHT  = 2
//!   0101 | 0100 | 0110    LEFT   = 1
//! ```
//!
//! Both codes zero: the segment is inside. Codes sharing a bit: both
//! endpoints are beyond the same boundary, so the segment is outside.
//! Otherwise an outside endpoint is moved onto the boundary named by its
//! highest set bit and the test repeats.

use tracing::warn;

use super::LineClipper;
use crate::geometry::{ClipRegion, Point, Segment};

/// Each endpoint can be substituted at most twice (once per axis).
const MAX_SUBSTITUTIONS: usize = 4;

/// The 4-bit region code of a point relative to a clip rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Self = Self(0);
    pub const LEFT: Self = Self(1);
    pub const RIGHT: Self = Self(2);
    pub const BOTTOM: Self = Self(4);
    pub const TOP: Self = Self(8);

    /// Classifies `p` against `region`. Points on a boundary are inside.
    pub fn of(p: Point, region: &ClipRegion) -> Self {
        let (min, max) = (region.min(), region.max());
        let mut code = 0;
        if p.x < min.x {
            code |= Self::LEFT.0;
        } else if p.x > max.x {
            code |= Self::RIGHT.0;
        }
        if p.y < min.y {
            code |= Self::BOTTOM.0;
        } else if p.y > max.y {
            code |= Self::TOP.0;
        }
        Self(code)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    /// True when both codes share an outside half-plane.
    pub fn shares_side(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// The boundary named by the highest set bit.
    fn highest(self) -> Self {
        [Self::TOP, Self::BOTTOM, Self::RIGHT, Self::LEFT]
            .into_iter()
            .find(|&bit| self.shares_side(bit))
            .unwrap_or(Self::INSIDE)
    }
}

/// Cohen–Sutherland line clipper.
#[derive(Clone, Copy, Debug, Default)]
pub struct CohenSutherland;

/// Moves `outside` along the line towards `other` until it sits on
/// `boundary`. The coordinate along the boundary axis is set exactly, so the
/// corresponding outcode bit cannot come back from rounding.
fn intersect(outside: Point, other: Point, boundary: Outcode, region: &ClipRegion) -> Point {
    let (min, max) = (region.min(), region.max());
    let d = other - outside;
    if boundary == Outcode::TOP || boundary == Outcode::BOTTOM {
        let y = if boundary == Outcode::TOP { max.y } else { min.y };
        // d.y != 0 here: the endpoints lie on different sides of y
        Point::new(outside.x + d.x * (y - outside.y) / d.y, y)
    } else {
        let x = if boundary == Outcode::RIGHT { max.x } else { min.x };
        Point::new(x, outside.y + d.y * (x - outside.x) / d.x)
    }
}

impl LineClipper for CohenSutherland {
    fn clip_segment(&self, segment: &Segment, region: &ClipRegion) -> Option<Segment> {
        let (mut p0, mut p1) = (segment.start, segment.end);
        let mut code0 = Outcode::of(p0, region);
        let mut code1 = Outcode::of(p1, region);

        for _ in 0..=MAX_SUBSTITUTIONS {
            if code0.is_inside() && code1.is_inside() {
                return Some(Segment::new(p0, p1));
            }
            if code0.shares_side(code1) {
                return None;
            }

            // Replace whichever endpoint is outside, start first.
            if !code0.is_inside() {
                p0 = intersect(p0, p1, code0.highest(), region);
                code0 = Outcode::of(p0, region);
            } else {
                p1 = intersect(p1, p0, code1.highest(), region);
                code1 = Outcode::of(p1, region);
            }
        }

        // Only reachable through floating-point disagreement at a corner,
        // where the visible part is at most a rounding error long.
        warn!(?segment, "outcode clipping did not converge, dropping segment");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn region() -> ClipRegion {
        ClipRegion::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
    }

    #[test]
    fn test_outcodes() {
        let r = region();
        assert_eq!(Outcode::of(Point::new(5.0, 5.0), &r), Outcode::INSIDE);
        assert_eq!(Outcode::of(Point::new(10.0, 0.0), &r), Outcode::INSIDE);
        assert_eq!(Outcode::of(Point::new(-1.0, 5.0), &r), Outcode::LEFT);
        assert_eq!(Outcode::of(Point::new(11.0, 11.0), &r).bits(), 0b1010);
        assert_eq!(Outcode::of(Point::new(-1.0, -1.0), &r).bits(), 0b0101);
    }

    #[test]
    fn test_horizontal_segment_clipped_on_both_ends() {
        let seg = Segment::new(Point::new(-5.0, 5.0), Point::new(15.0, 5.0));
        let clipped = CohenSutherland.clip_segment(&seg, &region()).unwrap();
        assert_eq!(clipped, Segment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0)));
    }

    #[test]
    fn test_inside_segment_is_unchanged() {
        let seg = Segment::new(Point::new(1.0, 2.0), Point::new(9.0, 3.0));
        assert_eq!(CohenSutherland.clip_segment(&seg, &region()), Some(seg));
    }

    #[test]
    fn test_trivial_reject() {
        let seg = Segment::new(Point::new(-5.0, 12.0), Point::new(15.0, 20.0));
        assert_eq!(CohenSutherland.clip_segment(&seg, &region()), None);
    }

    #[test]
    fn test_diagonal_through_corners() {
        let seg = Segment::new(Point::new(-5.0, -5.0), Point::new(15.0, 15.0));
        let clipped = CohenSutherland.clip_segment(&seg, &region()).unwrap();
        assert_relative_eq!(clipped.start.x, 0.0);
        assert_relative_eq!(clipped.start.y, 0.0);
        assert_relative_eq!(clipped.end.x, 10.0);
        assert_relative_eq!(clipped.end.y, 10.0);
    }

    #[test]
    fn test_corner_miss_needs_two_substitutions() {
        // Crosses the top-left outside quadrant without touching the window
        let seg = Segment::new(Point::new(-4.0, 8.0), Point::new(2.0, 14.0));
        assert_eq!(CohenSutherland.clip_segment(&seg, &region()), None);
    }

    #[test]
    fn test_keeps_direction() {
        let seg = Segment::new(Point::new(15.0, 5.0), Point::new(-5.0, 5.0));
        let clipped = CohenSutherland.clip_segment(&seg, &region()).unwrap();
        assert_eq!(clipped.start, Point::new(10.0, 5.0));
        assert_eq!(clipped.end, Point::new(0.0, 5.0));
    }
}
