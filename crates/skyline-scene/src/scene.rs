//! The owned scene registry.

use std::collections::BTreeMap;

use skyline_geom::{Aabb, Camera, GroundPlane, Material, Sphere};
use skyline_grid::{build_grid, BuiltGrid};
use skyline_math::{IVec2, Vec3};

use crate::{Result, SceneError, SceneSettings, TextureRegistry};

/// Buildings, materials and textures of a city, plus the sky, sun and
/// ground.
///
/// Boxes and their names, and materials and their names, are stored side by
/// side and only change together through the methods here. The grid is
/// derived from the boxes; any change to them marks it stale until the next
/// [`Scene::prepare`].
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) boxes: Vec<Aabb>,
    pub(crate) box_names: Vec<String>,
    pub(crate) materials: Vec<Material>,
    material_names: BTreeMap<String, u32>,
    textures: TextureRegistry,
    pub(crate) sky: Sphere,
    sun: Sphere,
    sun_emission: Vec3,
    pub(crate) ground: GroundPlane,
    pub(crate) floor_y: f32,
    cameras: Vec<(String, Camera)>,
    resolution: IVec2,
    pub(crate) grid: Option<BuiltGrid>,
    pub(crate) grid_stale: bool,
}

impl Scene {
    /// Create an empty scene.
    pub fn new(
        settings: &SceneSettings,
        sky_texture: impl Into<String>,
        ground_texture: impl Into<String>,
    ) -> Result<Self> {
        settings.validate()?;
        let sky = Sphere::new(Vec3::zeros(), settings.horizon, 0)?;
        let sun = Sphere::new(settings.sun_center(), settings.sun.radius, 0)?;
        Ok(Self {
            boxes: Vec::new(),
            box_names: Vec::new(),
            materials: Vec::new(),
            material_names: BTreeMap::new(),
            textures: TextureRegistry::new(sky_texture, ground_texture),
            sky,
            sun,
            sun_emission: settings.sun_color(),
            ground: GroundPlane::new(settings.ground_tex_norm()),
            floor_y: 0.0,
            cameras: Vec::new(),
            resolution: settings.resolution(),
            grid: None,
            grid_stale: true,
        })
    }

    /// Define a material with a texture file per face, in
    /// [`BoxFace`](skyline_geom::BoxFace) slot order. Returns its index.
    pub fn add_material(&mut self, name: &str, emission: Vec3, faces: [&str; 6]) -> Result<u32> {
        if self.material_names.contains_key(name) {
            return Err(SceneError::DuplicateMaterial(name.to_owned()));
        }
        let mut textures = [0u8; 6];
        for (slot, file) in textures.iter_mut().zip(faces) {
            *slot = self.textures.find_or_create(file)?;
        }

        let index = self.materials.len() as u32;
        self.materials.push(Material { emission, textures });
        self.material_names.insert(name.to_owned(), index);
        Ok(index)
    }

    /// Add a building. Returns its index.
    pub fn add_box(&mut self, name: impl Into<String>, aabb: Aabb) -> Result<usize> {
        aabb.validate()?;
        if aabb.material as usize >= self.materials.len() {
            return Err(SceneError::MissingMaterial(aabb.material));
        }
        self.boxes.push(aabb);
        self.box_names.push(name.into());
        self.grid_stale = true;
        Ok(self.boxes.len() - 1)
    }

    /// Add a named viewpoint.
    pub fn add_camera(&mut self, name: impl Into<String>, camera: Camera) {
        self.cameras.push((name.into(), camera));
    }

    /// Buildings, in index order.
    pub fn boxes(&self) -> &[Aabb] {
        &self.boxes
    }

    /// Name of each building, parallel to [`Scene::boxes`].
    pub fn box_names(&self) -> &[String] {
        &self.box_names
    }

    /// Materials, in index order.
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    /// Index of the material called `name`.
    pub fn material_index(&self, name: &str) -> Option<u32> {
        self.material_names.get(name).copied()
    }

    /// Name of the material at `index`.
    pub fn material_name(&self, index: u32) -> Option<&str> {
        self.material_names
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(name, _)| name.as_str())
    }

    /// Material names and indices, sorted by name.
    pub fn material_names(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.material_names.iter().map(|(n, i)| (n.as_str(), *i))
    }

    /// Texture file table.
    pub fn textures(&self) -> &TextureRegistry {
        &self.textures
    }

    /// The sky dome.
    pub fn sky(&self) -> &Sphere {
        &self.sky
    }

    /// The sun.
    pub fn sun(&self) -> &Sphere {
        &self.sun
    }

    /// Light emitted by the sun.
    pub fn sun_emission(&self) -> Vec3 {
        self.sun_emission
    }

    /// The ground plane.
    pub fn ground(&self) -> &GroundPlane {
        &self.ground
    }

    /// Height new boxes are centered at.
    pub fn floor_y(&self) -> f32 {
        self.floor_y
    }

    /// Named viewpoints.
    pub fn cameras(&self) -> &[(String, Camera)] {
        &self.cameras
    }

    /// Viewpoint called `name`.
    pub fn camera(&self, name: &str) -> Option<&Camera> {
        self.cameras.iter().find(|(n, _)| n == name).map(|(_, c)| c)
    }

    /// Grid cell counts along X and Z.
    pub fn resolution(&self) -> IVec2 {
        self.resolution
    }

    /// Change the grid resolution.
    pub fn set_resolution(&mut self, resolution: IVec2) -> Result<()> {
        if resolution.x <= 0 || resolution.y <= 0 {
            return Err(SceneError::InvalidSettings(format!(
                "grid resolution {}x{} must be positive",
                resolution.x, resolution.y
            )));
        }
        if resolution != self.resolution {
            self.resolution = resolution;
            self.grid_stale = true;
        }
        Ok(())
    }

    /// Current settings, reflecting any growth of the sky dome.
    pub fn settings(&self) -> SceneSettings {
        let c = self.sun.center;
        let e = self.sun_emission;
        let mut settings = SceneSettings {
            horizon: self.sky.radius,
            grid: [self.resolution.x, self.resolution.y],
            ground_tex_norm: [self.ground.tex_norm.x, self.ground.tex_norm.y],
            ..SceneSettings::default()
        };
        settings.sun.color = [e.x, e.y, e.z];
        settings.sun.center = [c.x, c.y, c.z];
        settings.sun.radius = self.sun.radius;
        settings
    }

    /// The last built grid, which may predate recent edits.
    pub fn grid(&self) -> Option<&BuiltGrid> {
        self.grid.as_ref()
    }

    /// Whether boxes or the resolution changed since the grid was built.
    pub fn is_grid_stale(&self) -> bool {
        self.grid_stale || self.grid.is_none()
    }

    /// Bring derived state up to date before rendering.
    ///
    /// Grows the sky dome to enclose every building, moves the sun onto the
    /// dome, and rebuilds the grid if the boxes changed.
    pub fn prepare(&mut self) -> Result<&BuiltGrid> {
        let before = self.sky.radius;
        for corner in self.boxes.iter().flat_map(Aabb::corners) {
            self.sky.grow_to_enclose(&corner);
        }
        if self.sky.radius > before {
            log::info!("sky dome grew from {before} to {} to enclose the city", self.sky.radius);
        }

        let to_sun = self.sun.center - self.sky.center;
        let direction = match to_sun.try_normalize(f32::EPSILON) {
            Some(d) => d,
            None => {
                log::warn!("sun has no direction from the sky center; placing it overhead");
                Vec3::y()
            }
        };
        self.sun.center = self.sky.center + direction * self.sky.radius;

        let grid = match self.grid.take() {
            Some(grid) if !self.grid_stale => grid,
            previous => match build_grid(&self.boxes, self.resolution) {
                Ok(grid) => {
                    log::info!(
                        "rebuilt {}x{} grid over {} boxes",
                        self.resolution.x,
                        self.resolution.y,
                        self.boxes.len()
                    );
                    grid
                }
                Err(err) => {
                    // Keep the last good grid; it stays stale
                    self.grid = previous;
                    return Err(err.into());
                }
            },
        };
        self.grid_stale = false;
        Ok(self.grid.insert(grid))
    }
}
