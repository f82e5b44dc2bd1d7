//! Scene-wide settings.

use serde::{Deserialize, Serialize};
use skyline_math::{IVec2, Vec2, Vec3};

use crate::{Result, SceneError};

/// The sun: a small emissive sphere placed on the sky dome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SunSettings {
    /// Emitted color.
    pub color: [f32; 3],
    /// Direction of the sun from the dome's center. Only the direction is
    /// kept; the sun is moved onto the dome when the scene is prepared.
    pub center: [f32; 3],
    /// Radius of the sun sphere.
    pub radius: f32,
}

impl Default for SunSettings {
    fn default() -> Self {
        Self {
            color: [10.0, 8.0, 6.0],
            center: [0.0, 1.0, 0.0],
            radius: 0.1,
        }
    }
}

/// Settings that are not tied to individual buildings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    /// Initial sky dome radius. The dome grows to enclose every building.
    pub horizon: f32,
    /// Grid cell counts along X and Z.
    pub grid: [i32; 2],
    /// The sun.
    pub sun: SunSettings,
    /// World size covered by one copy of the ground texture.
    pub ground_tex_norm: [f32; 2],
}

impl Default for SceneSettings {
    fn default() -> Self {
        Self {
            horizon: 10.0,
            grid: [1, 1],
            sun: SunSettings::default(),
            ground_tex_norm: [1.0, 1.0],
        }
    }
}

impl SceneSettings {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if !(self.horizon.is_finite() && self.horizon > 0.0) {
            return Err(SceneError::InvalidSettings("horizon must be positive".into()));
        }
        if self.grid.iter().any(|n| *n <= 0) {
            return Err(SceneError::InvalidSettings(
                "grid must have at least one cell along each axis".into(),
            ));
        }
        if !(self.sun.radius.is_finite() && self.sun.radius > 0.0) {
            return Err(SceneError::InvalidSettings("sun radius must be positive".into()));
        }
        if self.ground_tex_norm.iter().any(|n| !n.is_finite() || *n <= 0.0) {
            return Err(SceneError::InvalidSettings(
                "ground texture scale must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Grid resolution as a vector.
    pub fn resolution(&self) -> IVec2 {
        IVec2::new(self.grid[0], self.grid[1])
    }

    /// Ground texture scale as a vector.
    pub fn ground_tex_norm(&self) -> Vec2 {
        Vec2::from(self.ground_tex_norm)
    }

    pub(crate) fn sun_color(&self) -> Vec3 {
        Vec3::from(self.sun.color)
    }

    pub(crate) fn sun_center(&self) -> Vec3 {
        Vec3::from(self.sun.center)
    }
}
