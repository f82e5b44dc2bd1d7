#![warn(missing_docs)]

//! Uniform grid acceleration for tracing a city of box buildings.
//!
//! Buildings stand on the ground, so the grid partitions only their
//! footprints on the X-Z plane. Each cell lists the boxes whose footprint
//! overlaps it; a box spanning several cells is listed once per cell.
//!
//! # Architecture
//!
//! - [`build_grid`] - Bins boxes into cells and flattens the result into a
//!   [`BuiltGrid`]: the [`Grid`] descriptor, one [`GridCell`] range per cell,
//!   and a shared array of box indices
//! - [`Grid`] - Cell lookup and the per-step traversal math
//!   ([`Grid::position_to_cell`], [`Grid::dist_to_next_cell`], [`Grid::next_cell`])
//! - [`CellWalk`] - Iterator over the cells a ray passes through
//! - [`BuiltGrid::trace_closest`] - Reference traversal loop finding the nearest box
//! - [`gpu`] - Device layouts of the grid arrays
//!
//! # Example
//!
//! ```
//! use skyline_geom::{Aabb, Ray};
//! use skyline_grid::build_grid;
//! use skyline_math::{IVec2, Vec3};
//!
//! let boxes = vec![
//!     Aabb::new(Vec3::new(-5.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 2.0), 0).unwrap(),
//!     Aabb::new(Vec3::new(5.0, 1.0, 0.0), Vec3::new(2.0, 2.0, 2.0), 0).unwrap(),
//! ];
//! let built = build_grid(&boxes, IVec2::new(4, 4)).unwrap();
//!
//! let ray = Ray::new(Vec3::new(-20.0, 1.0, 0.0), Vec3::new(1.0, 0.0, 0.0)).unwrap();
//! let hit = built.trace_closest(&boxes, &ray).unwrap();
//! assert_eq!(hit.box_index, 0);
//! ```

mod build;
mod error;
mod grid;
mod traverse;

pub mod gpu;

pub use build::{build_grid, grid_limits, BuiltGrid, GridCell, GridStats};
pub use error::{GridError, Result};
pub use grid::Grid;
pub use traverse::{scan_closest, CellStep, CellWalk, Hit};
