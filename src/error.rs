//! Error types for the viewing pipeline, navigation and scene I/O.

use std::path::PathBuf;
use thiserror::Error;

/// The window has a zero (or non-finite) half-extent, so no world-to-device
/// scale exists for it.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("degenerate window: half-extents {half_width} x {half_height} must both be positive")]
pub struct DegenerateWindowError {
    pub half_width: f64,
    pub half_height: f64,
}

/// A zoom factor that is zero, negative or not finite.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("invalid zoom factor {0}: must be positive and finite")]
pub struct InvalidZoomFactorError(pub f64);

/// Failures of a navigation step or of the render pass that follows it.
///
/// In both cases the session keeps the window it had before the call.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ViewError {
    #[error(transparent)]
    DegenerateWindow(#[from] DegenerateWindowError),

    #[error(transparent)]
    InvalidZoomFactor(#[from] InvalidZoomFactorError),
}

/// Errors that can occur when loading a scene file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("scene has no <{0}> element")]
    MissingElement(&'static str),

    #[error("<{element}> is missing attribute '{attribute}'")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
    },

    #[error("<{element}> attribute '{attribute}' is not a finite number: '{value}'")]
    InvalidNumber {
        element: String,
        attribute: &'static str,
        value: String,
    },

    #[error("<{element}> needs {expected} points, found {found}")]
    VertexCount {
        element: &'static str,
        expected: &'static str,
        found: usize,
    },
}

/// Errors that can occur when writing the window back into a scene file.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed scene document: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("scene document has no <window> with <wmin> and <wmax>")]
    MissingWindow,
}

/// Errors that can occur when drawing or exporting a rendered canvas.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("canvas of {width} x {height} pixels exceeds the {max} x {max} limit")]
    TooLarge { width: u64, height: u64, max: u32 },

    #[error("failed to encode {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}
