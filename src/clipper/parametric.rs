//! Parametric (Liang–Barsky) line clipping.
//!
//! The segment is written as `P(t) = P0 + t·(P1 − P0)` for `t ∈ [0, 1]`.
//! Every boundary half-plane `p·t ≤ q` either raises the entering bound
//! (`p < 0`) or lowers the exiting bound (`p > 0`). Once the bounds cross,
//! nothing of the segment is visible.

use super::LineClipper;
use crate::geometry::{ClipRegion, Segment};

/// Liang–Barsky line clipper.
#[derive(Clone, Copy, Debug, Default)]
pub struct LiangBarsky;

/// Returns the visible parameter interval `[t_enter, t_exit]` of `segment`
/// inside `region` (boundary-inclusive), or `None` when nothing is visible.
pub fn visible_interval(segment: &Segment, region: &ClipRegion) -> Option<(f64, f64)> {
    let (min, max) = (region.min(), region.max());
    let p0 = segment.start;
    let d = segment.end - segment.start;

    // (p, q) per boundary: left, right, bottom, top
    let constraints = [
        (-d.x, p0.x - min.x),
        (d.x, max.x - p0.x),
        (-d.y, p0.y - min.y),
        (d.y, max.y - p0.y),
    ];

    let mut t_enter = 0.0_f64;
    let mut t_exit = 1.0_f64;

    for (p, q) in constraints {
        if p == 0.0 {
            // Parallel to this boundary: visible only from the inner side.
            if q < 0.0 {
                return None;
            }
            continue;
        }

        let t = q / p;
        if p < 0.0 {
            t_enter = t_enter.max(t);
        } else {
            t_exit = t_exit.min(t);
        }

        if t_enter > t_exit {
            return None;
        }
    }

    Some((t_enter, t_exit))
}

impl LineClipper for LiangBarsky {
    fn clip_segment(&self, segment: &Segment, region: &ClipRegion) -> Option<Segment> {
        let (t_enter, t_exit) = visible_interval(segment, region)?;
        if t_enter == 0.0 && t_exit == 1.0 {
            return Some(*segment);
        }
        Some(Segment::new(segment.at(t_enter), segment.at(t_exit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use approx::assert_relative_eq;

    fn region() -> ClipRegion {
        ClipRegion::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
    }

    #[test]
    fn test_horizontal_segment_clipped_on_both_ends() {
        let seg = Segment::new(Point::new(-5.0, 5.0), Point::new(15.0, 5.0));
        let clipped = LiangBarsky.clip_segment(&seg, &region()).unwrap();
        assert_relative_eq!(clipped.start.x, 0.0);
        assert_relative_eq!(clipped.start.y, 5.0);
        assert_relative_eq!(clipped.end.x, 10.0);
        assert_relative_eq!(clipped.end.y, 5.0);
    }

    #[test]
    fn test_inside_segment_is_unchanged() {
        let seg = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert_eq!(LiangBarsky.clip_segment(&seg, &region()), Some(seg));
    }

    #[test]
    fn test_parallel_outside_is_rejected() {
        let seg = Segment::new(Point::new(-1.0, 11.0), Point::new(12.0, 11.0));
        assert_eq!(visible_interval(&seg, &region()), None);
    }

    #[test]
    fn test_collinear_with_boundary_is_visible() {
        let seg = Segment::new(Point::new(-5.0, 10.0), Point::new(5.0, 10.0));
        let (t0, t1) = visible_interval(&seg, &region()).unwrap();
        assert_relative_eq!(t0, 0.5);
        assert_relative_eq!(t1, 1.0);
    }

    #[test]
    fn test_corner_touch_is_single_point() {
        let seg = Segment::new(Point::new(-5.0, 5.0), Point::new(5.0, 15.0));
        let clipped = LiangBarsky.clip_segment(&seg, &region()).unwrap();
        assert_relative_eq!(clipped.start.x, 0.0);
        assert_relative_eq!(clipped.start.y, 10.0);
        assert_eq!(clipped.start, clipped.end);
    }

    #[test]
    fn test_entering_only() {
        let seg = Segment::new(Point::new(5.0, -5.0), Point::new(5.0, 5.0));
        let clipped = LiangBarsky.clip_segment(&seg, &region()).unwrap();
        assert_relative_eq!(clipped.start.y, 0.0);
        assert_eq!(clipped.end, Point::new(5.0, 5.0));
    }
}
