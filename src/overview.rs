//! The overview ("minimap") view.
//!
//! The overview looks at the same world as the main view through a larger,
//! never-rotating window centred on the main window, and outlines where the
//! main window currently is.

use crate::geometry::{ClipRegion, Point, Polygon, Window};

/// Overview settings: how much surrounding space to show and where to draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Overview {
    padding: f64,
    viewport: ClipRegion,
}

impl Overview {
    /// `padding` is the extra space on each side as a fraction of the main
    /// window's size; 1.0 shows one full window width/height around it.
    pub fn new(padding: f64, viewport: ClipRegion) -> Self {
        Self {
            padding: padding.max(0.0),
            viewport,
        }
    }

    /// Overview of `width` x `height` pixels with its origin at device (0, 0).
    pub fn with_size(padding: f64, width: u32, height: u32) -> Self {
        Self::new(
            padding,
            ClipRegion::new(Point::ZERO, Point::new(width as f64, height as f64)),
        )
    }

    pub fn padding(&self) -> f64 {
        self.padding
    }

    pub fn viewport(&self) -> &ClipRegion {
        &self.viewport
    }

    /// The overview window for the current main window: same center, no
    /// rotation, half-extents scaled by `1 + 2 * padding`.
    pub fn window_for(&self, main: &Window) -> Window {
        let scale = 1.0 + 2.0 * self.padding;
        Window::new(
            main.center(),
            main.half_width() * scale,
            main.half_height() * scale,
            0.0,
        )
    }

    /// The main window's outline in world space, rotation included.
    pub fn footprint(&self, main: &Window) -> Polygon {
        Polygon::new(main.corners().to_vec())
    }
}
