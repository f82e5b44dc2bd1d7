//! Error types for geometry construction.

use thiserror::Error;

/// Errors raised when a shape or ray cannot be built.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeomError {
    /// Ray direction has zero length or is not finite.
    #[error("degenerate ray direction ({0}, {1}, {2})")]
    DegenerateRay(f32, f32, f32),

    /// Box has a non-positive or non-finite width along some axis.
    #[error("degenerate box width ({0}, {1}, {2})")]
    DegenerateBox(f32, f32, f32),

    /// Sphere radius is not a positive finite number.
    #[error("degenerate sphere radius {0}")]
    DegenerateSphere(f32),

    /// Camera looks straight up or down, so it has no horizontal right vector.
    #[error("camera view direction is parallel to the world up axis")]
    DegenerateCamera,
}

/// Result type for geometry operations.
pub type Result<T> = std::result::Result<T, GeomError>;
