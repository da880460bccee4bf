//! Viewer settings.

use crate::clipper::LineClipAlgorithm;
use crate::navigation::DEFAULT_MIN_HALF_EXTENT;

/// Settings shared by the session and the interactive shell.
///
/// Command-line flags override individual fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerConfig {
    /// Line clipping algorithm used by every render pass.
    pub line_clip: LineClipAlgorithm,
    /// Zooming in stops once a half-extent reaches this size.
    pub min_half_extent: f64,
    /// Extra world space shown around the window in the overview, as a
    /// fraction of the window size on each side.
    pub overview_padding: f64,
    /// Overview viewport size in pixels.
    pub overview_size: (u32, u32),
    /// Arrow-key pan step as a fraction of the window width/height.
    pub pan_fraction: f64,
    /// Zoom factor per keypress (zooming in uses its reciprocal).
    pub zoom_step: f64,
    /// Rotation per keypress in degrees.
    pub rotate_step_degrees: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            line_clip: LineClipAlgorithm::CohenSutherland,
            min_half_extent: DEFAULT_MIN_HALF_EXTENT,
            overview_padding: 1.0,
            overview_size: (160, 120),
            pan_fraction: 0.1,
            zoom_step: 1.1,
            rotate_step_degrees: 10.0,
        }
    }
}

impl ViewerConfig {
    pub fn with_line_clip(mut self, line_clip: LineClipAlgorithm) -> Self {
        self.line_clip = line_clip;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ViewerConfig::default();
        assert_eq!(config.line_clip, LineClipAlgorithm::CohenSutherland);
        assert_eq!(config.overview_size, (160, 120));
        assert!(config.zoom_step > 1.0);
    }

    #[test]
    fn test_line_clip_override() {
        let config = ViewerConfig::default().with_line_clip(LineClipAlgorithm::LiangBarsky);
        assert_eq!(config.line_clip, LineClipAlgorithm::LiangBarsky);
        assert_eq!(config.pan_fraction, 0.1);
    }
}
