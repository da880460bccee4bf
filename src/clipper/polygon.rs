//! Polygon clipping against a rectangle (Weiler–Atherton).
//!
//! Unlike Sutherland–Hodgman, which always yields a single polygon, this
//! traversal splits a concave polygon into as many pieces as the rectangle
//! cuts it into.
//!
//! # Algorithm Overview
//!
//! 1. **Find crossings.** Each polygon edge is clipped parametrically against
//!    the rectangle. Where the boundary goes from outside to inside we record
//!    an *entering* intersection, the reverse gives a *leaving* one. Each
//!    intersection is inserted into the polygon's vertex list (the augmented
//!    list) and tagged with its position along the rectangle perimeter.
//! 2. **No crossings.** The result is the polygon itself, the rectangle (when
//!    the polygon surrounds it) or nothing.
//! 3. **Traverse.** Start at an unvisited entering intersection and follow the
//!    polygon up to the next (leaving) intersection. From there follow the
//!    rectangle perimeter, in the polygon's own winding direction, to the
//!    nearest entering intersection, and continue on the polygon. Arriving
//!    back at the start closes one output polygon.
//!
//! ```text
//!   polygon (ccw)          window            result
//!    _______               +--------+
//!   |   _   |              |  _  _  |        two pieces, both ccw
//!   |  | |  |      ∩       | | || | |   =>   [| |] [| |]
//!   |__| |__|              +--------+
//! ```
//!
//! # Degenerate input
//!
//! - A crossing exactly through a corner is one crossing, not one per
//!   boundary line.
//! - Edges lying on a boundary stay on it (containment is inclusive).
//! - An edge or vertex that only touches the rectangle from outside is not a
//!   crossing.
//! - Zero-area pieces are dropped.
//!
//! Self-intersecting polygons are not supported. The traversal is bounded by
//! the number of intersections and always terminates, but the pieces it
//! produces for such input are unspecified.

use approx::abs_diff_eq;
use tracing::warn;

use super::contains;
use super::parametric::visible_interval;
use crate::geometry::{ClipRegion, Point, Polygon};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Crossing {
    Entering,
    Leaving,
}

/// An intersection vertex between the polygon boundary and the rectangle.
#[derive(Clone, Copy, Debug)]
struct Intersection {
    point: Point,
    kind: Crossing,
    /// Polygon edge the intersection lies on.
    edge: usize,
    /// Distance along the rectangle perimeter, counter-clockwise from `min`.
    perimeter: f64,
}

/// Entry of the augmented polygon vertex list.
#[derive(Clone, Copy, Debug)]
enum Node {
    Vertex(Point),
    Intersection(usize),
}

/// Clips `polygon` against `region`, returning zero or more simple polygons
/// with the same winding as the input.
pub fn clip_polygon(polygon: &Polygon, region: &ClipRegion) -> Vec<Polygon> {
    let vertices = polygon.vertices();
    if vertices.len() < 3 {
        return Vec::new();
    }

    let eps = tolerance(region);
    let inside: Vec<bool> = vertices.iter().map(|&v| contains(region, v)).collect();
    let crossings = find_crossings(polygon, &inside, region, eps);
    let ccw = polygon.is_counter_clockwise();

    if crossings.is_empty() {
        if inside.iter().all(|&v| v) {
            return vec![polygon.clone()];
        }
        if polygon.contains_point(region.center()) {
            return vec![region_polygon(region, ccw)];
        }
        return Vec::new();
    }

    if crossings.len() % 2 != 0 {
        warn!(
            crossings = crossings.len(),
            "odd number of window crossings, polygon is probably self-intersecting"
        );
    }

    let nodes = augmented_nodes(vertices, &crossings);
    let node_of: Vec<usize> = {
        let mut positions = vec![0; crossings.len()];
        for (index, node) in nodes.iter().enumerate() {
            if let Node::Intersection(k) = node {
                positions[*k] = index;
            }
        }
        positions
    };

    let mut visited = vec![false; crossings.len()];
    let mut pieces = Vec::new();

    for start in 0..crossings.len() {
        if visited[start] || crossings[start].kind != Crossing::Entering {
            continue;
        }

        let mut ring = Vec::new();
        let mut current = start;
        let mut closed = false;

        // Every hop consumes one entering intersection.
        for _ in 0..crossings.len() {
            visited[current] = true;
            ring.push(crossings[current].point);

            // Along the polygon to the next intersection.
            let mut index = (node_of[current] + 1) % nodes.len();
            let leave = loop {
                match nodes[index] {
                    Node::Vertex(p) => ring.push(p),
                    Node::Intersection(k) => break k,
                }
                index = (index + 1) % nodes.len();
            };
            visited[leave] = true;
            ring.push(crossings[leave].point);

            // Along the rectangle to the next entering intersection.
            let Some(next) = next_entering(&crossings, leave, start, ccw, region, eps) else {
                break;
            };
            push_corners_between(&mut ring, &crossings[leave], &crossings[next], ccw, region, eps);

            if next == start {
                closed = true;
                break;
            }
            if visited[next] {
                break;
            }
            current = next;
        }

        if !closed {
            warn!("polygon clip traversal did not close, dropping piece");
            continue;
        }
        if let Some(piece) = finish_ring(ring, eps) {
            pieces.push(piece);
        }
    }

    pieces
}

fn tolerance(region: &ClipRegion) -> f64 {
    1e-12 * (region.width() + region.height()).max(1.0)
}

fn perimeter_length(region: &ClipRegion) -> f64 {
    2.0 * (region.width() + region.height())
}

/// Snaps `p` onto the nearest rectangle side and returns it with its
/// counter-clockwise perimeter position measured from `min`.
fn project_to_boundary(p: Point, region: &ClipRegion) -> (Point, f64) {
    let (min, max) = (region.min(), region.max());
    let (w, h) = (region.width(), region.height());
    let x = p.x.clamp(min.x, max.x);
    let y = p.y.clamp(min.y, max.y);

    // bottom, right, top, left; ties go to the earlier side
    let distances = [y - min.y, max.x - x, max.y - y, x - min.x];
    let mut side = 0;
    for (i, &d) in distances.iter().enumerate() {
        if d < distances[side] {
            side = i;
        }
    }

    match side {
        0 => (Point::new(x, min.y), x - min.x),
        1 => (Point::new(max.x, y), w + (y - min.y)),
        2 => (Point::new(x, max.y), w + h + (max.x - x)),
        _ => (Point::new(min.x, y), 2.0 * w + h + (max.y - y)),
    }
}

fn intersection(p: Point, kind: Crossing, edge: usize, region: &ClipRegion) -> Intersection {
    let (point, perimeter) = project_to_boundary(p, region);
    Intersection {
        point,
        kind,
        edge,
        perimeter,
    }
}

fn same_point(a: Point, b: Point, eps: f64) -> bool {
    abs_diff_eq!(a.x, b.x, epsilon = eps) && abs_diff_eq!(a.y, b.y, epsilon = eps)
}

/// Step 1: entering/leaving intersections in polygon order.
fn find_crossings(
    polygon: &Polygon,
    inside: &[bool],
    region: &ClipRegion,
    eps: f64,
) -> Vec<Intersection> {
    let n = inside.len();
    let mut crossings = Vec::new();

    for (i, edge) in polygon.edges().enumerate() {
        let Some((t_enter, t_exit)) = visible_interval(&edge, region) else {
            continue;
        };
        match (inside[i], inside[(i + 1) % n]) {
            (true, true) => {}
            (true, false) => {
                crossings.push(intersection(edge.at(t_exit), Crossing::Leaving, i, region));
            }
            (false, true) => {
                crossings.push(intersection(edge.at(t_enter), Crossing::Entering, i, region));
            }
            (false, false) => {
                // Grazing a corner or a single point is not a crossing.
                if t_exit > t_enter && !same_point(edge.at(t_enter), edge.at(t_exit), eps) {
                    crossings.push(intersection(edge.at(t_enter), Crossing::Entering, i, region));
                    crossings.push(intersection(edge.at(t_exit), Crossing::Leaving, i, region));
                }
            }
        }
    }

    drop_touching_pairs(crossings, polygon.vertices(), eps)
}

/// Removes entering/leaving pairs that enclose a zero-length inside stretch,
/// i.e. the polygon touches the rectangle at a vertex from outside.
fn drop_touching_pairs(
    crossings: Vec<Intersection>,
    vertices: &[Point],
    eps: f64,
) -> Vec<Intersection> {
    let m = crossings.len();
    if m < 2 {
        return crossings;
    }
    let n = vertices.len();
    let mut keep = vec![true; m];

    for k in 0..m {
        let next = (k + 1) % m;
        if !keep[k] || !keep[next] {
            continue;
        }
        let (enter, leave) = (&crossings[k], &crossings[next]);
        if enter.kind != Crossing::Entering || leave.kind != Crossing::Leaving {
            continue;
        }
        if !same_point(enter.point, leave.point, eps) {
            continue;
        }
        // Vertices strictly between the two intersections along the polygon.
        let between = (leave.edge + n - enter.edge) % n;
        let all_same = (1..=between).all(|offset| {
            same_point(vertices[(enter.edge + offset) % n], enter.point, eps)
        });
        if all_same {
            keep[k] = false;
            keep[next] = false;
        }
    }

    crossings
        .into_iter()
        .zip(keep)
        .filter_map(|(crossing, kept)| kept.then_some(crossing))
        .collect()
}

/// Interleaves the polygon vertices with the intersections on each edge.
fn augmented_nodes(vertices: &[Point], crossings: &[Intersection]) -> Vec<Node> {
    let mut nodes = Vec::with_capacity(vertices.len() + crossings.len());
    let mut k = 0;
    for (i, &v) in vertices.iter().enumerate() {
        nodes.push(Node::Vertex(v));
        while k < crossings.len() && crossings[k].edge == i {
            nodes.push(Node::Intersection(k));
            k += 1;
        }
    }
    nodes
}

/// Perimeter distance from `from` to `to` walking in the traversal direction.
fn walk_distance(from: f64, to: f64, ccw: bool, perimeter: f64, eps: f64) -> f64 {
    let d = if ccw {
        (to - from).rem_euclid(perimeter)
    } else {
        (from - to).rem_euclid(perimeter)
    };
    if d > perimeter - eps {
        0.0
    } else {
        d
    }
}

/// The entering intersection reached first when walking the rectangle from
/// `leave`. Ties prefer the traversal start, which closes the piece.
fn next_entering(
    crossings: &[Intersection],
    leave: usize,
    start: usize,
    ccw: bool,
    region: &ClipRegion,
    eps: f64,
) -> Option<usize> {
    let perimeter = perimeter_length(region);
    let from = crossings[leave].perimeter;

    crossings
        .iter()
        .enumerate()
        .filter(|(_, c)| c.kind == Crossing::Entering)
        .map(|(k, c)| (k, walk_distance(from, c.perimeter, ccw, perimeter, eps)))
        .min_by(|(ka, da), (kb, db)| {
            da.total_cmp(db)
                .then_with(|| (*kb == start).cmp(&(*ka == start)))
                .then_with(|| ka.cmp(kb))
        })
        .map(|(k, _)| k)
}

/// Appends the rectangle corners passed when walking from `from` to `to`.
fn push_corners_between(
    ring: &mut Vec<Point>,
    from: &Intersection,
    to: &Intersection,
    ccw: bool,
    region: &ClipRegion,
    eps: f64,
) {
    let perimeter = perimeter_length(region);
    let span = walk_distance(from.perimeter, to.perimeter, ccw, perimeter, eps);
    let (w, h) = (region.width(), region.height());
    let corner_positions = [0.0, w, w + h, 2.0 * w + h];

    let mut passed: Vec<(f64, Point)> = region
        .corners()
        .into_iter()
        .zip(corner_positions)
        .map(|(corner, s)| (walk_distance(from.perimeter, s, ccw, perimeter, eps), corner))
        .filter(|&(d, _)| d > eps && d < span - eps)
        .collect();
    passed.sort_by(|a, b| a.0.total_cmp(&b.0));
    ring.extend(passed.into_iter().map(|(_, corner)| corner));
}

/// Removes repeated vertices and rejects pieces without area.
fn finish_ring(ring: Vec<Point>, eps: f64) -> Option<Polygon> {
    let mut cleaned: Vec<Point> = Vec::with_capacity(ring.len());
    for p in ring {
        if cleaned.last().map_or(true, |&last| !same_point(last, p, eps)) {
            cleaned.push(p);
        }
    }
    while cleaned.len() > 1 && same_point(cleaned[0], cleaned[cleaned.len() - 1], eps) {
        cleaned.pop();
    }
    if cleaned.len() < 3 {
        return None;
    }

    let piece = Polygon::new(cleaned);
    if piece.signed_area().abs() <= eps {
        return None;
    }
    Some(piece)
}

/// The rectangle as a polygon wound like the clipped polygon.
fn region_polygon(region: &ClipRegion, ccw: bool) -> Polygon {
    let [a, b, c, d] = region.corners();
    if ccw {
        Polygon::new(vec![a, b, c, d])
    } else {
        Polygon::new(vec![a, d, c, b])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn region() -> ClipRegion {
        ClipRegion::new(Point::new(0.0, 0.0), Point::new(10.0, 10.0))
    }

    fn poly(points: &[(f64, f64)]) -> Polygon {
        Polygon::new(points.iter().map(|&(x, y)| Point::new(x, y)).collect())
    }

    fn assert_same_vertices(got: &Polygon, want: &[(f64, f64)]) {
        assert_eq!(got.len(), want.len(), "vertex count of {got:?}");
        for (p, &(x, y)) in got.vertices().iter().zip(want) {
            assert_relative_eq!(p.x, x, epsilon = 1e-9);
            assert_relative_eq!(p.y, y, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inside_polygon_is_returned_unchanged() {
        let p = poly(&[(1.0, 1.0), (4.0, 2.0), (3.0, 6.0)]);
        assert_eq!(clip_polygon(&p, &region()), vec![p]);
    }

    #[test]
    fn test_window_sized_rectangle_clips_to_itself() {
        let p = region().to_polygon();
        assert_eq!(clip_polygon(&p, &region()), vec![p]);
    }

    #[test]
    fn test_outside_polygon_is_dropped() {
        let p = poly(&[(20.0, 20.0), (30.0, 20.0), (25.0, 30.0)]);
        assert!(clip_polygon(&p, &region()).is_empty());
    }

    #[test]
    fn test_enclosing_polygon_yields_window() {
        let p = poly(&[(-5.0, -5.0), (15.0, -5.0), (15.0, 15.0), (-5.0, 15.0)]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 1);
        assert_same_vertices(
            &result[0],
            &[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)],
        );
    }

    #[test]
    fn test_enclosing_clockwise_polygon_yields_clockwise_window() {
        let p = poly(&[(-5.0, -5.0), (-5.0, 15.0), (15.0, 15.0), (15.0, -5.0)]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 1);
        assert!(!result[0].is_counter_clockwise());
        assert_relative_eq!(result[0].signed_area(), -100.0);
    }

    #[test]
    fn test_triangle_over_corner_picks_up_window_corner() {
        let p = poly(&[(5.0, 5.0), (15.0, 5.0), (5.0, 15.0)]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 1);
        assert_same_vertices(
            &result[0],
            &[(5.0, 10.0), (5.0, 5.0), (10.0, 5.0), (10.0, 10.0)],
        );
    }

    #[test]
    fn test_concave_polygon_splits_into_pieces() {
        // A "U" whose prongs run through the whole window height
        let p = poly(&[
            (1.0, -5.0),
            (9.0, -5.0),
            (9.0, 15.0),
            (7.0, 15.0),
            (7.0, -2.0),
            (3.0, -2.0),
            (3.0, 15.0),
            (1.0, 15.0),
        ]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 2);
        assert_same_vertices(&result[0], &[(9.0, 0.0), (9.0, 10.0), (7.0, 10.0), (7.0, 0.0)]);
        assert_same_vertices(&result[1], &[(3.0, 0.0), (3.0, 10.0), (1.0, 10.0), (1.0, 0.0)]);
        assert!(result.iter().all(Polygon::is_counter_clockwise));
    }

    #[test]
    fn test_clockwise_concave_polygon_keeps_winding() {
        let p = poly(&[
            (1.0, 15.0),
            (3.0, 15.0),
            (3.0, -2.0),
            (7.0, -2.0),
            (7.0, 15.0),
            (9.0, 15.0),
            (9.0, -5.0),
            (1.0, -5.0),
        ]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 2);
        assert!(result.iter().all(|piece| !piece.is_counter_clockwise()));
        let total: f64 = result.iter().map(|piece| piece.signed_area()).sum();
        assert_relative_eq!(total, -40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_polygon_touching_corner_from_outside_is_dropped() {
        let p = poly(&[(10.0, 10.0), (20.0, 10.0), (20.0, 20.0)]);
        assert!(clip_polygon(&p, &region()).is_empty());
    }

    #[test]
    fn test_polygon_sharing_an_edge_from_outside_is_dropped() {
        let p = poly(&[(-5.0, 10.0), (15.0, 10.0), (15.0, 20.0), (-5.0, 20.0)]);
        assert!(clip_polygon(&p, &region()).is_empty());
    }

    #[test]
    fn test_every_intersection_is_used_once() {
        // A "C" whose two arms cross the whole window
        let p = poly(&[
            (-2.0, 1.0),
            (12.0, 1.0),
            (12.0, 3.0),
            (-2.0, 3.0),
            (-2.0, 5.0),
            (12.0, 5.0),
            (12.0, 7.0),
            (-4.0, 7.0),
            (-4.0, 1.0),
        ]);
        let result = clip_polygon(&p, &region());
        assert_eq!(result.len(), 2);
        assert_same_vertices(&result[0], &[(0.0, 1.0), (10.0, 1.0), (10.0, 3.0), (0.0, 3.0)]);
        assert_same_vertices(&result[1], &[(0.0, 5.0), (10.0, 5.0), (10.0, 7.0), (0.0, 7.0)]);
    }
}
