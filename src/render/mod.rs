//! Software drawing backend.
//!
//! [`Canvas`] paints the [`Frame`](crate::engine::Frame)s produced by a
//! render pass into an ARGB8888 buffer that can be shown in a window or
//! written to an image file.

mod canvas;
mod scanline;

pub use canvas::Canvas;

use crate::colors;
use crate::engine::Frame;
use crate::error::SnapshotError;

/// Gap between the main view and the overview, in pixels.
pub const OVERVIEW_MARGIN: u32 = 10;

/// Largest width or height of a composed canvas, in pixels.
pub const MAX_CANVAS_SIZE: u32 = 16_384;

/// Places the overview to the right of the main view, top-aligned, with a
/// separator line in the margin between them.
///
/// Fails without allocating when the result would exceed [`MAX_CANVAS_SIZE`]
/// in either direction.
pub fn compose(main: &Frame, overview: &Frame) -> Result<Canvas, SnapshotError> {
    let width = u64::from(main.width()) + u64::from(OVERVIEW_MARGIN) + u64::from(overview.width());
    let height = u64::from(main.height().max(overview.height()));
    let max = u64::from(MAX_CANVAS_SIZE);
    if width > max || height > max {
        return Err(SnapshotError::TooLarge {
            width,
            height,
            max: MAX_CANVAS_SIZE,
        });
    }

    let main_canvas = Canvas::from_frame(main);
    let overview_canvas = Canvas::from_frame(overview);
    let (width, height) = (width as u32, height as u32);
    let mut canvas = Canvas::new(width, height);
    canvas.clear(colors::BACKGROUND);
    canvas.blit(&main_canvas, 0, 0);

    let separator_x = (main_canvas.width() + OVERVIEW_MARGIN / 2) as i32;
    canvas.draw_line_bresenham(separator_x, 0, separator_x, height as i32 - 1, colors::SEPARATOR);

    canvas.blit(
        &overview_canvas,
        (main_canvas.width() + OVERVIEW_MARGIN) as i32,
        0,
    );
    Ok(canvas)
}
