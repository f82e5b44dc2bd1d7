#![warn(missing_docs)]

//! Scene state for the skyline city renderer.
//!
//! A [`Scene`] owns the buildings, their names, the materials and the
//! texture table, and keeps them consistent with each other. It answers
//! picking queries from the editor ([`Scene::select`]), builds the grid
//! acceleration structure on demand ([`Scene::prepare`]), and is packed into
//! device buffers with [`GpuScene::from_scene`].
//!
//! Scenes are persisted as TOML through [`SceneDescription`].
//!
//! # Example
//!
//! ```
//! use skyline_geom::{Aabb, Ray};
//! use skyline_math::Vec3;
//! use skyline_scene::{Scene, SceneSettings};
//!
//! let mut scene = Scene::new(&SceneSettings::default(), "sky.png", "ground.png").unwrap();
//! let brick = scene.add_material("brick", Vec3::zeros(), ["brick.png"; 6]).unwrap();
//! let tower = Aabb::new(Vec3::new(0.0, 2.0, 0.0), Vec3::new(2.0, 4.0, 2.0), brick).unwrap();
//! scene.add_box("tower", tower).unwrap();
//!
//! let ray = Ray::new(Vec3::new(0.0, 2.0, -5.0), Vec3::z()).unwrap();
//! let picked = scene.select(&ray).unwrap().unwrap();
//! assert_eq!(picked.name.as_str(), "tower");
//! assert!(!picked.created);
//! ```

mod description;
mod error;
mod scene;
mod select;
mod settings;
mod textures;

pub mod gpu;

pub use description::{BoxDescription, CameraDescription, GroundDescription, MaterialDescription, SceneDescription};
pub use error::{Result, SceneError};
pub use gpu::{GpuScene, GpuSceneError};
pub use scene::Scene;
pub use select::{Selection, DEFAULT_BOX_NAME, NEW_BOX_WIDTH};
pub use settings::{SceneSettings, SunSettings};
pub use textures::TextureRegistry;
