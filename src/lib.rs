//! A 2D viewing pipeline with window clipping.
//!
//! A scene of points, segments and polygons in world coordinates is viewed
//! through a movable, zoomable and rotatable window and mapped onto a
//! viewport. Geometry outside the window is clipped away before drawing, and
//! a small overview shows where the window sits in the wider world.
//!
//! # Quick Start
//!
//! ```ignore
//! use viewclip::prelude::*;
//!
//! let file = load_scene("scenes/sample.xml")?;
//! let mut session = Session::new(file, ViewerConfig::default());
//! session.render()?;
//! session.rotate(30.0)?;
//! compose(session.main_frame(), session.overview_frame())?.save_png("view.png")?;
//! ```

// Core: geometry, viewing transform, clipping, navigation
pub mod clipper;
pub mod colors;
pub mod error;
pub mod geometry;
pub mod math;
pub mod navigation;
pub mod overview;
pub mod transform;

// Session and its collaborators
pub mod config;
pub mod engine;
pub mod render;
pub mod scene;
#[cfg(feature = "window")]
pub mod window;

// Re-export commonly needed types at crate root for convenience
pub use engine::{Frame, Session, Step};
pub use error::{
    DegenerateWindowError, InvalidZoomFactorError, LoadError, SaveError, SnapshotError, ViewError,
};
pub use geometry::{ClipRegion, Geometry, Point, Polygon, Segment, Shape, Window};
pub use transform::ViewTransform;

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use viewclip::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use crate::geometry::{ClipRegion, Geometry, Point, Polygon, Segment, Shape, Window};

    // Viewing and clipping
    pub use crate::clipper::{Clipper, LineClipAlgorithm, LineClipper};
    pub use crate::transform::ViewTransform;

    // Navigation
    pub use crate::navigation::NavigationController;
    pub use crate::overview::Overview;

    // Session
    pub use crate::config::ViewerConfig;
    pub use crate::engine::{DrawCommand, Frame, Primitive, Session, Step};
    pub use crate::scene::{load_scene, save_window, Scene, SceneFile};

    // Drawing
    pub use crate::render::{compose, Canvas};

    // Math
    pub use crate::math::mat3::Mat3;
    pub use crate::math::vec2::Vec2;
}

/// Module exposing internals for benchmarking. Not part of the stable API.
pub mod bench {
    pub use crate::clipper::{clip_polygon, CohenSutherland, LiangBarsky, LineClipper};
}
