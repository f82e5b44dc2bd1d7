//! Error types for scene editing and persistence.

use std::path::PathBuf;

use skyline_geom::GeomError;
use skyline_grid::GridError;
use thiserror::Error;

/// Errors that can occur while building, editing or persisting a scene.
#[derive(Error, Debug)]
pub enum SceneError {
    /// Settings out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Invalid box, sphere, ray or camera.
    #[error(transparent)]
    Geom(#[from] GeomError),

    /// Grid construction failed.
    #[error(transparent)]
    Grid(#[from] GridError),

    /// A box names a material that is not defined.
    #[error("box \"{name}\" uses undefined material \"{material}\"")]
    UnknownMaterial {
        /// Box name.
        name: String,
        /// Material name it asked for.
        material: String,
    },

    /// A material index has no material behind it.
    #[error("no material with index {0}")]
    MissingMaterial(u32),

    /// A material name is used twice.
    #[error("material \"{0}\" is already defined")]
    DuplicateMaterial(String),

    /// The texture table is full.
    #[error("more than {} textures", crate::TextureRegistry::MAX_TEXTURES)]
    TooManyTextures,

    /// The grid has not been rebuilt since the boxes last changed.
    #[error("grid is out of date; call Scene::prepare first")]
    StaleGrid,

    /// Scene description could not be parsed.
    #[error("failed to parse scene description: {0}")]
    Parse(#[from] toml::de::Error),

    /// Scene description could not be written.
    #[error("failed to write scene description: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Reading or writing a scene file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for scene operations.
pub type Result<T> = std::result::Result<T, SceneError>;
