//! World-to-device viewing transform.
//!
//! [`ViewTransform`] maps world coordinates through a (possibly rotated)
//! [`Window`] onto a viewport rectangle in device space (origin top-left,
//! y growing downward). The mapping is split in two stages so clipping can
//! run in between:
//!
//! ```text
//! world --(translate -c, rotate -θ, translate +c)--> window-local
//! window-local --(translate -c, scale, flip y, translate to viewport center)--> device
//! ```
//!
//! In the window-local frame the window is the axis-aligned rectangle
//! `[c.x - hw, c.x + hw] × [c.y - hh, c.y + hh]`, for every rotation.

use crate::error::DegenerateWindowError;
use crate::geometry::{ClipRegion, Geometry, Point, Window};
use crate::math::mat3::Mat3;

/// The affine mapping from world space onto a viewport for one window state.
///
/// Rebuilt for every render pass; it borrows nothing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
    window: Window,
    viewport: ClipRegion,
    world_to_local: Mat3,
    local_to_device: Mat3,
}

impl ViewTransform {
    /// Builds the transform for `window` onto `viewport`.
    ///
    /// Fails when either half-extent of the window is zero or not finite.
    pub fn new(window: &Window, viewport: &ClipRegion) -> Result<Self, DegenerateWindowError> {
        let (hw, hh) = (window.half_width(), window.half_height());
        if !(hw > 0.0 && hh > 0.0 && hw.is_finite() && hh.is_finite()) {
            return Err(DegenerateWindowError {
                half_width: hw,
                half_height: hh,
            });
        }

        let c = window.center();
        // Rotation is always applied, also for θ == 0.
        let world_to_local = Mat3::rotation_about(c, -window.rotation_radians());

        let vc = viewport.center();
        let sx = viewport.width() / (2.0 * hw);
        let sy = viewport.height() / (2.0 * hh);
        let local_to_device = Mat3::translation(vc.x, vc.y)
            * Mat3::scaling(sx, -sy)
            * Mat3::translation(-c.x, -c.y);

        Ok(Self {
            window: *window,
            viewport: *viewport,
            world_to_local,
            local_to_device,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn viewport(&self) -> &ClipRegion {
        &self.viewport
    }

    /// The window as an axis-aligned rectangle in the window-local frame.
    pub fn clip_bounds(&self) -> ClipRegion {
        ClipRegion::from_center(
            self.window.center(),
            self.window.half_width(),
            self.window.half_height(),
        )
    }

    /// The full world-to-device matrix.
    pub fn matrix(&self) -> Mat3 {
        self.local_to_device * self.world_to_local
    }

    /// The device-to-world matrix, if the viewport has a non-zero area.
    pub fn inverse(&self) -> Option<Mat3> {
        self.matrix().inverse()
    }

    /// Undoes the window rotation around its center.
    pub fn world_to_window(&self, p: Point) -> Point {
        self.world_to_local * p
    }

    /// Scales, flips and places a window-local point on the viewport.
    pub fn window_to_device(&self, p: Point) -> Point {
        self.local_to_device * p
    }

    /// Maps a world point straight to device space.
    pub fn apply(&self, p: Point) -> Point {
        self.window_to_device(self.world_to_window(p))
    }

    /// Maps a device point back to world space.
    pub fn device_to_world(&self, p: Point) -> Option<Point> {
        self.inverse().map(|inv| inv * p)
    }

    /// Maps every coordinate of `geometry` to device space.
    pub fn apply_geometry(&self, geometry: &Geometry) -> Geometry {
        let m = self.matrix();
        geometry.map_points(|p| m * p)
    }
}
