//! TOML scene files.
//!
//! ```toml
//! sky = "sky.png"
//! horizon = 40.0
//! grid = [8, 8]
//!
//! [ground]
//! file = "asphalt.png"
//! tex_norm = [4.0, 4.0]
//!
//! [sun]
//! color = [10.0, 8.0, 6.0]
//! center = [1.0, 2.0, 0.5]
//!
//! [materials.brick]
//! left = "brick.png"
//! right = "brick.png"
//! top = "roof.png"
//! bottom = "roof.png"
//! front = "brick.png"
//! back = "brick.png"
//!
//! [geometry.town_hall]
//! width = [6.0, 12.0, 4.0]
//! center = [0.0, 6.0, 0.0]
//! material = "brick"
//!
//! [cameras.street]
//! position = [0.0, 2.0, -20.0]
//! focal = [0.0, 2.0, 0.0]
//! ```
//!
//! Every key except `sky`, `ground.file` and the per-material and per-box
//! fields has a default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use skyline_geom::{Aabb, Camera};
use skyline_math::Vec3;

use crate::{Result, Scene, SceneError, SceneSettings, SunSettings};

/// Contents of a scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    /// Sky texture file.
    pub sky: String,
    /// Initial sky dome radius.
    #[serde(default = "default_horizon")]
    pub horizon: f32,
    /// Grid cell counts along X and Z.
    #[serde(default = "default_grid")]
    pub grid: [i32; 2],
    /// The ground.
    pub ground: GroundDescription,
    /// The sun.
    #[serde(default)]
    pub sun: SunSettings,
    /// Materials by name.
    #[serde(default)]
    pub materials: BTreeMap<String, MaterialDescription>,
    /// Buildings by name.
    #[serde(default)]
    pub geometry: BTreeMap<String, BoxDescription>,
    /// Viewpoints by name.
    #[serde(default)]
    pub cameras: BTreeMap<String, CameraDescription>,
}

fn default_horizon() -> f32 {
    SceneSettings::default().horizon
}

fn default_grid() -> [i32; 2] {
    SceneSettings::default().grid
}

fn default_tex_norm() -> [f32; 2] {
    SceneSettings::default().ground_tex_norm
}

fn default_camera_size() -> f32 {
    1.0
}

/// The ground plane.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundDescription {
    /// Ground texture file.
    pub file: String,
    /// World size covered by one copy of the texture.
    #[serde(default = "default_tex_norm")]
    pub tex_norm: [f32; 2],
}

/// A material: optional emission and a texture file per face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescription {
    /// Emitted color.
    #[serde(default)]
    pub emission: [f32; 3],
    /// Texture on the +X face.
    pub left: String,
    /// Texture on the -X face.
    pub right: String,
    /// Texture on the roof.
    pub top: String,
    /// Texture on the floor.
    pub bottom: String,
    /// Texture on the +Z face.
    pub front: String,
    /// Texture on the -Z face.
    pub back: String,
}

impl MaterialDescription {
    fn faces(&self) -> [&str; 6] {
        [
            &self.left,
            &self.right,
            &self.top,
            &self.bottom,
            &self.front,
            &self.back,
        ]
    }
}

/// A building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxDescription {
    /// Full extents.
    pub width: [f32; 3],
    /// Center.
    pub center: [f32; 3],
    /// Texture scale; the box's width when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tex_norm: Option<[f32; 3]>,
    /// Material name.
    pub material: String,
}

/// A viewpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraDescription {
    /// Eye position.
    pub position: [f32; 3],
    /// Center of the focal plane.
    pub focal: [f32; 3],
    /// Height of the view.
    #[serde(default = "default_camera_size")]
    pub size: f32,
}

impl SceneDescription {
    /// Parse a scene file's contents.
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Render as TOML.
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Read and parse a scene file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    /// Write a scene file.
    pub fn save(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_toml()?).map_err(|source| SceneError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Settings carried by the description.
    pub fn settings(&self) -> SceneSettings {
        SceneSettings {
            horizon: self.horizon,
            grid: self.grid,
            sun: self.sun,
            ground_tex_norm: self.ground.tex_norm,
        }
    }
}

impl Scene {
    /// Build a scene from a parsed description.
    ///
    /// Materials are numbered in name order, then boxes are added in name
    /// order.
    pub fn from_description(desc: &SceneDescription) -> Result<Self> {
        let mut scene = Scene::new(&desc.settings(), desc.sky.as_str(), desc.ground.file.as_str())?;

        for (name, m) in &desc.materials {
            scene.add_material(name, Vec3::from(m.emission), m.faces())?;
        }

        for (name, b) in &desc.geometry {
            let material = scene
                .material_index(&b.material)
                .ok_or_else(|| SceneError::UnknownMaterial {
                    name: name.clone(),
                    material: b.material.clone(),
                })?;
            let width = Vec3::from(b.width);
            let aabb = Aabb::new(Vec3::from(b.center), width, material)?
                .with_tex_norm(b.tex_norm.map_or(width, Vec3::from));
            scene.add_box(name.as_str(), aabb)?;
        }

        for (name, c) in &desc.cameras {
            let camera = Camera::look_at(Vec3::from(c.position), Vec3::from(c.focal), c.size)?;
            scene.add_camera(name.as_str(), camera);
        }

        log::info!(
            "loaded scene with {} boxes, {} materials, {} textures",
            scene.boxes().len(),
            scene.materials().len(),
            scene.textures().len()
        );
        Ok(scene)
    }

    /// Describe the scene for saving.
    ///
    /// Box names repeated within the scene get `_copy` appended until they
    /// are unique, so that every box is written.
    pub fn to_description(&self) -> Result<SceneDescription> {
        let settings = self.settings();
        let textures = self.textures();
        let texture = |slot: u8| -> Result<String> {
            textures
                .name(slot)
                .map(str::to_owned)
                .ok_or_else(|| SceneError::InvalidSettings(format!("no texture in slot {slot}")))
        };

        let mut materials = BTreeMap::new();
        for (name, index) in self.material_names() {
            let m = self
                .materials()
                .get(index as usize)
                .ok_or(SceneError::MissingMaterial(index))?;
            let [left, right, top, bottom, front, back] = m.textures;
            materials.insert(
                name.to_owned(),
                MaterialDescription {
                    emission: m.emission.into(),
                    left: texture(left)?,
                    right: texture(right)?,
                    top: texture(top)?,
                    bottom: texture(bottom)?,
                    front: texture(front)?,
                    back: texture(back)?,
                },
            );
        }

        let mut geometry = BTreeMap::new();
        for (b, name) in self.boxes().iter().zip(self.box_names()) {
            let material = self
                .material_name(b.material)
                .ok_or(SceneError::MissingMaterial(b.material))?;
            let mut unique = name.clone();
            while geometry.contains_key(&unique) {
                unique.push_str("_copy");
            }
            geometry.insert(
                unique,
                BoxDescription {
                    width: b.width.into(),
                    center: b.center.into(),
                    tex_norm: Some(b.tex_norm.into()),
                    material: material.to_owned(),
                },
            );
        }

        let cameras = self
            .cameras()
            .iter()
            .map(|(name, c)| {
                let desc = CameraDescription {
                    position: c.position.into(),
                    focal: c.focal_pos.into(),
                    size: c.size,
                };
                (name.clone(), desc)
            })
            .collect();

        Ok(SceneDescription {
            sky: textures.sky().to_owned(),
            horizon: settings.horizon,
            grid: settings.grid,
            ground: GroundDescription {
                file: textures.ground().to_owned(),
                tex_norm: settings.ground_tex_norm,
            },
            sun: settings.sun,
            materials,
            geometry,
            cameras,
        })
    }
}
