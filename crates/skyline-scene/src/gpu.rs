//! Scene data prepared for device upload.

use skyline_geom::gpu::{GpuAabb, GpuMaterial, GpuSphere};
use skyline_grid::gpu::{GpuGrid, GpuGridBuffers, GpuGridCell};
use skyline_math::{Float2, Float3};
use thiserror::Error;

use crate::Scene;

/// Maximum number of boxes in a single scene.
pub const MAX_BOXES: usize = 1 << 16;

/// Maximum number of materials in a single scene.
pub const MAX_MATERIALS: usize = 256;

/// Maximum number of grid cells.
pub const MAX_GRID_CELLS: usize = 1 << 16;

/// Error building GPU scene.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GpuSceneError {
    /// Too many boxes (exceeds GPU limit).
    #[error("too many boxes: {0} (max {max})", max = MAX_BOXES)]
    TooManyBoxes(usize),
    /// Too many materials (exceeds GPU limit).
    #[error("too many materials: {0} (max {max})", max = MAX_MATERIALS)]
    TooManyMaterials(usize),
    /// Too many grid cells.
    #[error("too many grid cells: {0} (max {max})", max = MAX_GRID_CELLS)]
    TooManyGridCells(usize),
    /// The grid does not reflect the current boxes.
    #[error("grid is out of date; call Scene::prepare first")]
    StaleGrid,
}

/// Scene data prepared for GPU upload.
#[derive(Debug, Clone)]
pub struct GpuScene {
    /// Buildings.
    pub boxes: Vec<GpuAabb>,
    /// Materials.
    pub materials: Vec<GpuMaterial>,
    /// Sky dome.
    pub sky: GpuSphere,
    /// Sun.
    pub sun: GpuSphere,
    /// Light emitted by the sun.
    pub sun_emission: Float3,
    /// Ground texture scale.
    pub ground_tex_norm: Float2,
    /// Grid descriptor.
    pub grid: GpuGrid,
    /// One range per cell.
    pub cells: Vec<GpuGridCell>,
    /// Box indices of all cells.
    pub indices: Vec<i32>,
    /// Texture files, in slot order.
    pub texture_files: Vec<String>,
}

impl GpuScene {
    /// Pack a prepared scene.
    ///
    /// The scene's grid must be up to date; see [`Scene::prepare`].
    pub fn from_scene(scene: &Scene) -> Result<Self, GpuSceneError> {
        if scene.boxes().len() > MAX_BOXES {
            return Err(GpuSceneError::TooManyBoxes(scene.boxes().len()));
        }
        if scene.materials().len() > MAX_MATERIALS {
            return Err(GpuSceneError::TooManyMaterials(scene.materials().len()));
        }
        let built = match scene.grid() {
            Some(grid) if !scene.is_grid_stale() => grid,
            _ => return Err(GpuSceneError::StaleGrid),
        };
        if built.cells().len() > MAX_GRID_CELLS {
            return Err(GpuSceneError::TooManyGridCells(built.cells().len()));
        }

        let GpuGridBuffers {
            grid,
            cells,
            indices,
        } = built.to_gpu();

        log::debug!(
            "packed {} boxes, {} materials, {} cells, {} indices",
            scene.boxes().len(),
            scene.materials().len(),
            cells.len(),
            indices.len()
        );

        Ok(Self {
            boxes: scene.boxes().iter().map(GpuAabb::from).collect(),
            materials: scene.materials().iter().map(GpuMaterial::from).collect(),
            sky: scene.sky().into(),
            sun: scene.sun().into(),
            sun_emission: scene.sun_emission().into(),
            ground_tex_norm: scene.ground().tex_norm.into(),
            grid,
            cells,
            indices,
            texture_files: scene.textures().names().to_vec(),
        })
    }

    /// Box buffer as bytes.
    pub fn box_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.boxes)
    }

    /// Material buffer as bytes.
    pub fn material_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.materials)
    }

    /// Cell buffer as bytes.
    pub fn cell_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.cells)
    }

    /// Index buffer as bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
