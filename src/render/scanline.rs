//! Even-odd scanline polygon fill.
//!
//! Each pixel row is sampled at its vertical center. The crossings of every
//! polygon edge with that line are sorted by x, and the pixels whose centers
//! lie between crossing pairs are filled. Edges are half-open in y
//! (`y_min <= y < y_max`) so shared vertices count once and horizontal
//! edges never count.

use super::canvas::Canvas;
use crate::geometry::Point;

pub fn fill_polygon(canvas: &mut Canvas, vertices: &[Point], color: u32) {
    if vertices.len() < 3 {
        return;
    }

    let (y_min, y_max) = vertices
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.y), hi.max(p.y))
        });
    if !(y_min.is_finite() && y_max.is_finite()) {
        return;
    }

    let first_row = ((y_min - 0.5).ceil() as i32).max(0);
    let last_row = ((y_max - 0.5).floor() as i32).min(canvas.height() as i32 - 1);
    let mut crossings: Vec<f64> = Vec::with_capacity(vertices.len());

    for row in first_row..=last_row {
        let sample_y = row as f64 + 0.5;
        crossings.clear();

        for (i, &a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            let (low, high) = if a.y <= b.y { (a, b) } else { (b, a) };
            if low.y <= sample_y && sample_y < high.y {
                let t = (sample_y - low.y) / (high.y - low.y);
                crossings.push(low.x + t * (high.x - low.x));
            }
        }

        crossings.sort_by(f64::total_cmp);
        for pair in crossings.chunks_exact(2) {
            // Pixels whose centers x + 0.5 lie in [pair[0], pair[1])
            let start = (pair[0] - 0.5).ceil() as i32;
            let end = (pair[1] - 0.5).ceil() as i32 - 1;
            if start <= end {
                canvas.draw_span(row, start, end, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILL: u32 = 0xFF00FF00;

    fn filled(canvas: &Canvas) -> usize {
        let mut n = 0;
        for y in 0..canvas.height() as i32 {
            for x in 0..canvas.width() as i32 {
                if canvas.get_pixel(x, y) == Some(FILL) {
                    n += 1;
                }
            }
        }
        n
    }

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<Point> {
        vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]
    }

    #[test]
    fn test_rectangle_fills_exact_pixels() {
        let mut canvas = Canvas::new(20, 20);
        fill_polygon(&mut canvas, &rect(2.0, 3.0, 12.0, 8.0), FILL);
        assert_eq!(filled(&canvas), 10 * 5);
        assert_eq!(canvas.get_pixel(2, 3), Some(FILL));
        assert_eq!(canvas.get_pixel(11, 7), Some(FILL));
        assert_ne!(canvas.get_pixel(12, 7), Some(FILL));
    }

    #[test]
    fn test_orientation_does_not_matter() {
        let mut ccw = Canvas::new(20, 20);
        let mut cw = Canvas::new(20, 20);
        let vertices = vec![Point::new(1.0, 1.0), Point::new(15.0, 4.0), Point::new(6.0, 17.0)];
        let reversed: Vec<Point> = vertices.iter().rev().copied().collect();
        fill_polygon(&mut ccw, &vertices, FILL);
        fill_polygon(&mut cw, &reversed, FILL);
        assert_eq!(ccw.as_bytes(), cw.as_bytes());
        assert!(filled(&ccw) > 0);
    }

    #[test]
    fn test_concave_notch_stays_empty() {
        let mut canvas = Canvas::new(20, 20);
        // U shape opening upward in device space (y down)
        let u = vec![
            Point::new(0.0, 0.0),
            Point::new(3.0, 0.0),
            Point::new(3.0, 7.0),
            Point::new(7.0, 7.0),
            Point::new(7.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        fill_polygon(&mut canvas, &u, FILL);
        assert_eq!(canvas.get_pixel(5, 3), Some(crate::colors::BACKGROUND));
        assert_eq!(canvas.get_pixel(1, 3), Some(FILL));
        assert_eq!(canvas.get_pixel(5, 8), Some(FILL));
        assert_eq!(filled(&canvas), 100 - 4 * 7);
    }

    #[test]
    fn test_even_odd_overlap_is_hollow() {
        let mut canvas = Canvas::new(20, 20);
        // Outer square and inner square joined by a zero-width bridge
        let vertices = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(0.0, 0.0),
            Point::new(3.0, 3.0),
            Point::new(3.0, 7.0),
            Point::new(7.0, 7.0),
            Point::new(7.0, 3.0),
            Point::new(3.0, 3.0),
        ];
        fill_polygon(&mut canvas, &vertices, FILL);
        assert_eq!(canvas.get_pixel(5, 5), Some(crate::colors::BACKGROUND));
        assert_eq!(canvas.get_pixel(1, 5), Some(FILL));
        assert_eq!(filled(&canvas), 100 - 16);
    }

    #[test]
    fn test_clipped_to_canvas() {
        let mut canvas = Canvas::new(5, 5);
        fill_polygon(&mut canvas, &rect(-10.0, -10.0, 10.0, 10.0), FILL);
        assert_eq!(filled(&canvas), 25);
    }

    #[test]
    fn test_degenerate_input() {
        let mut canvas = Canvas::new(5, 5);
        fill_polygon(&mut canvas, &[Point::new(1.0, 1.0), Point::new(3.0, 3.0)], FILL);
        fill_polygon(&mut canvas, &rect(1.0, 2.0, 4.0, 2.0), FILL);
        assert_eq!(filled(&canvas), 0);
    }
}
