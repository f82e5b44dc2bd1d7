//! Grid construction.

use std::collections::BTreeSet;
use std::ops::Range;

use serde::Serialize;
use skyline_geom::Aabb;
use skyline_math::{to_float, xz, IVec2, Tolerance, Vec3};

use crate::{Grid, GridError, Result};

/// Range of a cell's entries in [`BuiltGrid::indices`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct GridCell {
    /// First entry.
    pub begin: u32,
    /// One past the last entry.
    pub end: u32,
}

impl GridCell {
    /// Entries as a slice range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.begin as usize..self.end as usize
    }

    /// Number of boxes in the cell.
    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.begin) as usize
    }

    /// Whether the cell holds no boxes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }
}

/// Occupancy summary of a built grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridStats {
    /// Number of cells.
    pub cells: usize,
    /// Cells holding at least one box.
    pub occupied: usize,
    /// Length of the flattened index array.
    pub indices: usize,
    /// Most boxes in any single cell.
    pub max_per_cell: usize,
    /// Mean boxes per occupied cell.
    pub mean_per_occupied: f32,
}

/// A grid together with its cell ranges and flattened box indices.
///
/// Cell `i`'s boxes are `indices[cells[i].begin..cells[i].end]`. The three
/// parts are derived together from one box list and are only readable from
/// outside; rebuild from scratch whenever the boxes change.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltGrid {
    grid: Grid,
    cells: Vec<GridCell>,
    indices: Vec<u32>,
}

impl BuiltGrid {
    /// Grid descriptor.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// One range per cell, row-major.
    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Box indices of all cells, back to back.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Boxes listed in `cell`; empty outside the grid.
    pub fn cell_boxes(&self, cell: &IVec2) -> &[u32] {
        match self.grid.cell_index(cell) {
            Some(i) => &self.indices[self.cells[i].range()],
            None => &[],
        }
    }

    /// Every cell that lists `box_index`.
    pub fn cells_containing(&self, box_index: u32) -> Vec<IVec2> {
        let mut found = Vec::new();
        for x in 0..self.grid.max.x {
            for y in 0..self.grid.max.y {
                let cell = IVec2::new(x, y);
                if self.cell_boxes(&cell).contains(&box_index) {
                    found.push(cell);
                }
            }
        }
        found
    }

    /// Occupancy summary.
    pub fn stats(&self) -> GridStats {
        let occupied = self.cells.iter().filter(|c| !c.is_empty()).count();
        let max_per_cell = self.cells.iter().map(GridCell::len).max().unwrap_or(0);
        let mean_per_occupied = if occupied == 0 {
            0.0
        } else {
            self.indices.len() as f32 / occupied as f32
        };
        GridStats {
            cells: self.cells.len(),
            occupied,
            indices: self.indices.len(),
            max_per_cell,
            mean_per_occupied,
        }
    }
}

/// Bounds of every box corner, grown by a small margin on all sides.
///
/// The margin keeps boxes on the outer boundary unambiguously inside. An
/// empty box list yields a small cube around the world origin.
pub fn grid_limits(boxes: &[Aabb]) -> (Vec3, Vec3) {
    let margin = Vec3::repeat(Tolerance::GRID_MARGIN);
    if boxes.is_empty() {
        return (-margin, margin);
    }

    let mut min = Vec3::repeat(f32::MAX);
    let mut max = Vec3::repeat(f32::MIN);
    for corner in boxes.iter().flat_map(|b| b.corners()) {
        min = min.inf(&corner);
        max = max.sup(&corner);
    }
    (min - margin, max + margin)
}

/// Build a grid with `resolution` cells over the footprint of `boxes`.
///
/// Each box is listed in every cell its footprint overlaps or touches, once
/// per cell. Within a cell boxes appear in ascending index order.
pub fn build_grid(boxes: &[Aabb], resolution: IVec2) -> Result<BuiltGrid> {
    if resolution.x <= 0 || resolution.y <= 0 {
        return Err(GridError::InvalidResolution(resolution.x, resolution.y));
    }
    for (index, b) in boxes.iter().enumerate() {
        b.validate()
            .map_err(|source| GridError::DegenerateBox { index, source })?;
    }

    let (min, max) = grid_limits(boxes);
    let origin = xz(&min);
    let cell_size = (xz(&max) - origin).component_div(&to_float(&resolution));
    let grid = Grid::new(origin, cell_size, resolution)?;

    let mut per_cell: Vec<BTreeSet<u32>> = vec![BTreeSet::new(); grid.cell_count()];
    for (index, b) in boxes.iter().enumerate() {
        let (lo, hi) = (b.min(), b.max());
        let (x0, x1) = cell_span(lo.x, hi.x, &grid, 0).ok_or(GridError::BoxOutsideGrid {
            index,
            axis: 'x',
        })?;
        let (y0, y1) = cell_span(lo.z, hi.z, &grid, 1).ok_or(GridError::BoxOutsideGrid {
            index,
            axis: 'z',
        })?;

        for y in y0..=y1 {
            for x in x0..=x1 {
                let Some(cell) = grid.cell_index(&IVec2::new(x, y)) else {
                    debug_assert!(false, "clamped cell ({x}, {y}) outside grid");
                    continue;
                };
                per_cell[cell].insert(index as u32);
            }
        }
    }

    let total: usize = per_cell.iter().map(BTreeSet::len).sum();
    let mut indices = Vec::with_capacity(total);
    let mut cells = Vec::with_capacity(per_cell.len());
    for set in &per_cell {
        let begin = indices.len() as u32;
        indices.extend(set.iter().copied());
        cells.push(GridCell {
            begin,
            end: indices.len() as u32,
        });
    }

    let built = BuiltGrid {
        grid,
        cells,
        indices,
    };
    let stats = built.stats();
    log::debug!(
        "built {}x{} grid for {} boxes: {} of {} cells occupied, {} indices, fullest cell has {}",
        resolution.x,
        resolution.y,
        boxes.len(),
        stats.occupied,
        stats.cells,
        stats.indices,
        stats.max_per_cell,
    );
    Ok(built)
}

/// Inclusive range of cells along one axis touched by `[lo, hi]`.
///
/// A bound lying exactly on a cell boundary includes the cells on both
/// sides. `None` if the span misses the grid entirely.
fn cell_span(lo: f32, hi: f32, grid: &Grid, axis: usize) -> Option<(i32, i32)> {
    let origin = grid.origin[axis];
    let size = grid.cell_size[axis];
    let count = grid.max[axis];

    let first = (((lo - origin) / size).ceil() as i32).saturating_sub(1);
    let last = ((hi - origin) / size).floor() as i32;
    if last < 0 || first >= count || first > last {
        debug_assert!(false, "footprint [{lo}, {hi}] maps outside {count} cells");
        return None;
    }
    Some((first.max(0), last.min(count - 1)))
}
