#![warn(missing_docs)]

//! Math types for the skyline city renderer.
//!
//! Thin wrappers around nalgebra for host-side geometry, plus the
//! fixed-layout vector types in [`layout`] that are shared with the
//! device-side tracing kernel.
//!
//! All geometry is single precision: the host computes the same
//! quantities the kernel does, so the two agree on cell boundaries.

use nalgebra::{Vector2, Vector3};

pub mod layout;

pub use layout::{Float2, Float3, Int2};

/// A point or vector in 3D world space.
pub type Vec3 = Vector3<f32>;

/// A point or vector on the ground plane (world X, world Z).
pub type Vec2 = Vector2<f32>;

/// Integer pair, used for grid cell coordinates and cell counts.
pub type IVec2 = Vector2<i32>;

/// Tolerances shared by the intersection routines.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance;

impl Tolerance {
    /// Slack when deciding which box face a hit point lies on.
    pub const FACE: f32 = 3.0 * f32::EPSILON;

    /// Rays flatter than this never reach the ground plane.
    pub const GROUND_PARALLEL: f32 = 1.0e-5;

    /// Fraction of a cell a traversal step overshoots a boundary by.
    pub const CELL_STEP: f32 = 1.0e-4;

    /// Margin added around the tightest footprint of all boxes.
    pub const GRID_MARGIN: f32 = 0.1;
}

/// Project a world-space vector onto the ground plane, keeping X and Z.
#[inline]
pub fn xz(v: &Vec3) -> Vec2 {
    Vec2::new(v.x, v.z)
}

/// Round each component toward negative infinity and convert to `i32`.
///
/// Out-of-range values saturate to `i32::MIN`/`i32::MAX` and NaN maps to 0,
/// which is what the kernel's saturating round-down conversion does.
/// Positions just left of the grid origin therefore land in cell `-1`,
/// not cell `0`.
#[inline]
pub fn floor_to_cell(v: &Vec2) -> IVec2 {
    IVec2::new(v.x.floor() as i32, v.y.floor() as i32)
}

/// Convert integer cell coordinates to floats.
#[inline]
pub fn to_float(v: &IVec2) -> Vec2 {
    Vec2::new(v.x as f32, v.y as f32)
}

/// Check that every component is finite.
#[inline]
pub fn is_finite(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}
