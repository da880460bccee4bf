//! Small 2D math types used by the viewing pipeline.

pub mod mat3;
pub mod vec2;
