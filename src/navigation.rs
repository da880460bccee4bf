//! Window navigation: pan, zoom and rotate.
//!
//! # Coordinate System
//!
//! Everything happens in world space (y up):
//! - **Pan** moves the window center by a world-space displacement.
//! - **Zoom** scales the half-extents about the center. A factor above 1
//!   shows more of the world, below 1 shows less.
//! - **Rotate** turns the window counter-clockwise by a number of degrees;
//!   the angle is kept in `[0, 360)`.
//!
//! The controller knows nothing about clipping or rendering. Every operation
//! either applies completely or leaves the window untouched.

use tracing::debug;

use crate::error::InvalidZoomFactorError;
use crate::geometry::{normalize_degrees, Window};
use crate::math::vec2::Vec2;

/// Smallest half-extent zooming may reach unless configured otherwise.
pub const DEFAULT_MIN_HALF_EXTENT: f64 = 1e-6;

/// Owns the current window state.
#[derive(Debug, Clone)]
pub struct NavigationController {
    window: Window,
    min_half_extent: f64,
}

impl NavigationController {
    /// Creates a controller for `window` with the default zoom limit.
    pub fn new(window: Window) -> Self {
        Self::with_min_half_extent(window, DEFAULT_MIN_HALF_EXTENT)
    }

    pub fn with_min_half_extent(window: Window, min_half_extent: f64) -> Self {
        Self {
            window,
            min_half_extent: min_half_extent.abs(),
        }
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Replaces the whole window, e.g. to roll back a rejected step.
    pub fn set_window(&mut self, window: Window) {
        self.window = window;
    }

    pub fn min_half_extent(&self) -> f64 {
        self.min_half_extent
    }

    // =========================================================================
    // Pan
    // =========================================================================

    /// Moves the window center by `(dx, dy)` world units. No bounds apply;
    /// the window may leave the scene entirely.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        let center = self.window.center() + Vec2::new(dx, dy);
        self.window.set_center(center);
        debug!(dx, dy, center.x, center.y, "pan");
    }

    /// Pans along the window's own (rotated) axes, so "right" is the
    /// viewport's right edge direction whatever the rotation.
    pub fn pan_local(&mut self, dx: f64, dy: f64) {
        let world = Vec2::new(dx, dy).rotate(self.window.rotation_radians());
        self.pan(world.x, world.y);
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Scales both half-extents by `factor` about the window center.
    ///
    /// Fails without touching the window when `factor` is not a positive,
    /// finite number. Zooming in stops (uniformly, keeping the aspect ratio)
    /// once the smaller half-extent reaches the configured minimum.
    pub fn zoom(&mut self, factor: f64) -> Result<(), InvalidZoomFactorError> {
        if !(factor > 0.0 && factor.is_finite()) {
            return Err(InvalidZoomFactorError(factor));
        }

        let (hw, hh) = (self.window.half_width(), self.window.half_height());
        let smallest = hw.min(hh);
        let mut effective = factor;
        if factor < 1.0 && smallest > 0.0 && smallest * factor < self.min_half_extent {
            effective = (self.min_half_extent / smallest).min(1.0);
        }

        self.window.set_half_extents(hw * effective, hh * effective);
        debug!(
            factor,
            effective,
            half_width = self.window.half_width(),
            half_height = self.window.half_height(),
            "zoom"
        );
        Ok(())
    }

    // =========================================================================
    // Rotate
    // =========================================================================

    /// Adds `delta_degrees` (counter-clockwise) to the window rotation.
    pub fn rotate(&mut self, delta_degrees: f64) {
        let rotation = normalize_degrees(self.window.rotation() + delta_degrees);
        self.window.set_rotation(rotation);
        debug!(delta_degrees, rotation, "rotate");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;
    use approx::assert_relative_eq;

    fn controller() -> NavigationController {
        NavigationController::new(Window::new(Point::new(5.0, 5.0), 5.0, 4.0, 0.0))
    }

    #[test]
    fn test_pan_and_inverse_pan_restore_window() {
        let mut nav = controller();
        let original = *nav.window();
        nav.pan(3.5, -2.25);
        assert_eq!(nav.window().center(), Point::new(8.5, 2.75));
        nav.pan(-3.5, 2.25);
        assert_eq!(*nav.window(), original);
    }

    #[test]
    fn test_pan_is_unbounded() {
        let mut nav = controller();
        nav.pan(1e9, -1e9);
        assert_eq!(nav.window().center(), Point::new(1e9 + 5.0, -1e9 + 5.0));
    }

    #[test]
    fn test_pan_local_follows_rotation() {
        let mut nav = controller();
        nav.rotate(90.0);
        nav.pan_local(1.0, 0.0);
        assert_relative_eq!(nav.window().center().x, 5.0, epsilon = 1e-12);
        assert_relative_eq!(nav.window().center().y, 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zoom_round_trip() {
        let mut nav = controller();
        nav.zoom(1.1).unwrap();
        assert_relative_eq!(nav.window().half_width(), 5.5, epsilon = 1e-12);
        nav.zoom(1.0 / 1.1).unwrap();
        assert_relative_eq!(nav.window().half_width(), 5.0, epsilon = 1e-12);
        assert_relative_eq!(nav.window().half_height(), 4.0, epsilon = 1e-12);
        assert_eq!(nav.window().center(), Point::new(5.0, 5.0));
    }

    #[test]
    fn test_invalid_zoom_leaves_window_unchanged() {
        let mut nav = controller();
        let original = *nav.window();
        for factor in [0.0, -2.0, f64::NAN, f64::INFINITY] {
            let err = nav.zoom(factor).unwrap_err();
            assert!(err.0 == factor || (err.0.is_nan() && factor.is_nan()));
            assert_eq!(*nav.window(), original);
        }
    }

    #[test]
    fn test_zoom_in_stops_at_minimum() {
        let mut nav = NavigationController::with_min_half_extent(
            Window::new(Point::ZERO, 2.0, 1.0, 0.0),
            0.5,
        );
        nav.zoom(0.01).unwrap();
        assert_relative_eq!(nav.window().half_height(), 0.5);
        assert_relative_eq!(nav.window().half_width(), 1.0);

        // Already at the limit: further zooming in is a no-op
        nav.zoom(0.5).unwrap();
        assert_relative_eq!(nav.window().half_height(), 0.5);

        // Zooming out is never limited
        nav.zoom(4.0).unwrap();
        assert_relative_eq!(nav.window().half_height(), 2.0);
    }

    #[test]
    fn test_rotate_wraps() {
        let mut nav = controller();
        nav.rotate(350.0);
        nav.rotate(20.0);
        assert_relative_eq!(nav.window().rotation(), 10.0, epsilon = 1e-9);
        nav.rotate(-30.0);
        assert_relative_eq!(nav.window().rotation(), 340.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rotate_and_complement_restore_rotation() {
        for start in [0.0, 15.0, 359.0] {
            for delta in [10.0, 90.0, 123.4, 359.9] {
                let mut nav = controller();
                nav.rotate(start);
                nav.rotate(delta);
                nav.rotate(360.0 - delta);
                let diff = (nav.window().rotation() - start).rem_euclid(360.0);
                assert!(diff < 1e-9 || 360.0 - diff < 1e-9, "{start} + {delta}");
            }
        }
    }
}
