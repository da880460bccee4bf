//! Pixel canvas.
//!
//! Provides the [`Canvas`] struct which owns an ARGB8888 color buffer and
//! implements the drawing operations a [`Frame`] needs: points, lines,
//! polygon outlines and filled polygons.

use std::path::Path;

use image::{Rgba, RgbaImage};

use super::scanline;
use crate::colors;
use crate::engine::{Frame, Primitive};
use crate::error::SnapshotError;
use crate::geometry::Point;

/// Side length of the square drawn for a point, in pixels.
const POINT_SIZE: i32 = 3;

pub struct Canvas {
    color_buffer: Vec<u32>,
    width: u32,
    height: u32,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            color_buffer: vec![colors::BACKGROUND; width as usize * height as usize],
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
    }

    /// Silently ignores out-of-bounds coordinates.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let index = self.index(x as u32, y as u32);
            self.color_buffer[index] = color;
        }
    }

    /// Get the color at (x, y), or None if out of bounds.
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            Some(self.color_buffer[self.index(x as u32, y as u32)])
        } else {
            None
        }
    }

    #[inline]
    pub fn draw_rect(&mut self, x: i32, y: i32, width: i32, height: i32, color: u32) {
        for dy in 0..height {
            for dx in 0..width {
                self.set_pixel(x + dx, y + dy, color);
            }
        }
    }

    /// Horizontal run of pixels from `x0` to `x1` inclusive.
    #[inline]
    pub fn draw_span(&mut self, y: i32, x0: i32, x1: i32, color: u32) {
        if y < 0 || y >= self.height as i32 {
            return;
        }
        let start = x0.max(0);
        let end = x1.min(self.width as i32 - 1);
        for x in start..=end {
            self.set_pixel(x, y, color);
        }
    }

    /// Draws a line between two pixel positions using Bresenham's algorithm.
    ///
    /// For each step along the major axis an error term decides whether to
    /// also step along the minor axis, so only integer arithmetic is needed.
    pub fn draw_line_bresenham(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: u32) {
        let dx = (x1 - x0).abs();
        let dy = (y1 - y0).abs();

        let x_incr_direction = if x0 < x1 { 1 } else { -1 };
        let y_incr_direction = if y0 < y1 { 1 } else { -1 };

        // Positive error favors x movement, negative favors y.
        let mut err = dx - dy;
        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel(x, y, color);
            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;
            if e2 > -dy {
                err -= dy;
                x += x_incr_direction;
            }
            // Both conditions can hold, giving a diagonal step.
            if e2 < dx {
                err += dx;
                y += y_incr_direction;
            }
        }
    }

    pub fn draw_line(&mut self, a: Point, b: Point, color: u32) {
        let (x0, y0) = to_pixel(a);
        let (x1, y1) = to_pixel(b);
        self.draw_line_bresenham(x0, y0, x1, y1, color);
    }

    /// A small square marker centred on `p`.
    pub fn draw_point(&mut self, p: Point, color: u32) {
        let (x, y) = to_pixel(p);
        let half = POINT_SIZE / 2;
        self.draw_rect(x - half, y - half, POINT_SIZE, POINT_SIZE, color);
    }

    /// Closed outline through `vertices`.
    pub fn draw_outline(&mut self, vertices: &[Point], color: u32) {
        for (i, &a) in vertices.iter().enumerate() {
            let b = vertices[(i + 1) % vertices.len()];
            self.draw_line(a, b, color);
        }
    }

    /// Fills `vertices` with the even-odd rule.
    pub fn fill_polygon(&mut self, vertices: &[Point], color: u32) {
        scanline::fill_polygon(self, vertices, color);
    }

    /// Copies `source` into this canvas with its top-left corner at `(x, y)`.
    /// Parts falling outside are dropped.
    pub fn blit(&mut self, source: &Canvas, x: i32, y: i32) {
        for sy in 0..source.height as i32 {
            for sx in 0..source.width as i32 {
                if let Some(color) = source.get_pixel(sx, sy) {
                    self.set_pixel(x + sx, y + sy, color);
                }
            }
        }
    }

    /// Clears to the frame's background and paints its commands in order.
    pub fn draw_frame(&mut self, frame: &Frame) {
        self.clear(frame.background());
        for command in frame.commands() {
            match &command.primitive {
                Primitive::Point(p) => self.draw_point(*p, command.color),
                Primitive::Line(a, b) => self.draw_line(*a, *b, command.color),
                Primitive::Polygon(vertices) => {
                    self.fill_polygon(vertices, command.color);
                    self.draw_outline(vertices, command.color);
                }
                Primitive::Outline(vertices) => self.draw_outline(vertices, command.color),
            }
        }
    }

    /// A canvas sized to `frame` with the frame painted on it.
    pub fn from_frame(frame: &Frame) -> Self {
        let mut canvas = Self::new(frame.width(), frame.height());
        canvas.draw_frame(frame);
        canvas
    }

    /// Returns the color buffer as bytes (ARGB8888 in native byte order).
    pub fn as_bytes(&self) -> &[u8] {
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    pub fn to_image(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let argb = self.color_buffer[self.index(x, y)];
            let [a, r, g, b] = argb.to_be_bytes();
            Rgba([r, g, b, a])
        })
    }

    /// Writes the canvas as an image; the format follows the file extension.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        self.to_image()
            .save(path)
            .map_err(|source| SnapshotError::Image {
                path: path.to_path_buf(),
                source,
            })
    }
}

#[inline]
fn to_pixel(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}
