//! Error types for grid construction.

use skyline_geom::GeomError;
use thiserror::Error;

/// Errors that can occur while building a grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    /// A cell count was zero or negative.
    #[error("invalid grid resolution {0}x{1}: cell counts must be positive")]
    InvalidResolution(i32, i32),

    /// Cell size is not a positive finite number.
    #[error("invalid cell size ({0}, {1})")]
    InvalidCellSize(f32, f32),

    /// A box has zero, negative or non-finite extents.
    #[error("box {index} is degenerate: {source}")]
    DegenerateBox {
        /// Position of the box in the input list.
        index: usize,
        /// Why the box was rejected.
        #[source]
        source: GeomError,
    },

    /// A box's footprint mapped to cells entirely outside the grid.
    ///
    /// The grid bounds are derived from the same boxes, so this points at a
    /// bug in footprint or cell-range computation.
    #[error("box {index} falls outside the grid on axis {axis}")]
    BoxOutsideGrid {
        /// Position of the box in the input list.
        index: usize,
        /// `'x'` or `'z'`.
        axis: char,
    },
}

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;
