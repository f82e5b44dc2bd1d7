//! Device layouts of the grid arrays.

use bytemuck::{Pod, Zeroable};
use skyline_math::{Float2, Int2};

use crate::{BuiltGrid, Grid, GridCell};

/// GPU-compatible grid descriptor (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct GpuGrid {
    /// Cell counts along X and Z.
    pub max: Int2,
    /// Cell size along X and Z.
    pub cell_size: Float2,
    /// Minimum corner of the footprint.
    pub origin: Float2,
    /// Padding.
    pub _filler: Int2,
}

impl From<&Grid> for GpuGrid {
    fn from(grid: &Grid) -> Self {
        Self {
            max: grid.max.into(),
            cell_size: grid.cell_size.into(),
            origin: grid.origin.into(),
            _filler: Int2::default(),
        }
    }
}

/// GPU-compatible cell range (16 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct GpuGridCell {
    /// First entry in the index array.
    pub begin: i32,
    /// One past the last entry.
    pub end: i32,
    /// Padding.
    pub _filler: [i32; 2],
}

impl From<&GridCell> for GpuGridCell {
    fn from(cell: &GridCell) -> Self {
        Self {
            begin: cell.begin as i32,
            end: cell.end as i32,
            _filler: [0; 2],
        }
    }
}

const _: () = assert!(std::mem::size_of::<GpuGrid>() == 32);
const _: () = assert!(std::mem::offset_of!(GpuGrid, cell_size) == 8);
const _: () = assert!(std::mem::offset_of!(GpuGrid, origin) == 16);
const _: () = assert!(std::mem::size_of::<GpuGridCell>() == 16);

/// All grid buffers, ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct GpuGridBuffers {
    /// Grid descriptor.
    pub grid: GpuGrid,
    /// One range per cell, row-major.
    pub cells: Vec<GpuGridCell>,
    /// Box indices of all cells.
    pub indices: Vec<i32>,
}

impl BuiltGrid {
    /// Convert to device layouts.
    pub fn to_gpu(&self) -> GpuGridBuffers {
        GpuGridBuffers {
            grid: self.grid().into(),
            cells: self.cells().iter().map(GpuGridCell::from).collect(),
            indices: self.indices().iter().map(|&i| i as i32).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_grid;
    use skyline_geom::Aabb;
    use skyline_math::{IVec2, Vec3};

    #[test]
    fn test_grid_bytes() {
        let boxes = [Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0), 0).unwrap()];
        let built = build_grid(&boxes, IVec2::new(3, 5)).unwrap();
        let gpu = GpuGrid::from(built.grid());
        let ints: &[i32] = bytemuck::cast_slice(bytemuck::bytes_of(&gpu));
        assert_eq!(&ints[..2], &[3, 5]);
        assert_eq!(&ints[6..], &[0, 0]);
        let floats: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&gpu));
        assert_eq!(floats[4], built.grid().origin.x);
        assert_eq!(floats[5], built.grid().origin.y);
    }

    #[test]
    fn test_buffers_mirror_built_grid() {
        let boxes = [
            Aabb::new(Vec3::new(-3.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0), 0).unwrap(),
            Aabb::new(Vec3::new(3.0, 1.0, 0.0), Vec3::new(1.0, 2.0, 1.0), 1).unwrap(),
        ];
        let built = build_grid(&boxes, IVec2::new(2, 1)).unwrap();
        let gpu = built.to_gpu();
        assert_eq!(gpu.cells.len(), 2);
        assert_eq!(gpu.indices, vec![0, 1]);
        assert_eq!((gpu.cells[0].begin, gpu.cells[0].end), (0, 1));
        assert_eq!((gpu.cells[1].begin, gpu.cells[1].end), (1, 2));
        let raw: &[i32] = bytemuck::cast_slice(&gpu.cells);
        assert_eq!(raw, &[0, 1, 0, 0, 1, 2, 0, 0]);
    }
}
