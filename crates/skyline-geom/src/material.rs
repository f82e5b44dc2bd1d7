//! Surface materials.

use skyline_math::Vec3;

use crate::BoxFace;

/// Texture slot holding the sky image.
pub const SKY_TEXTURE: u8 = 0;

/// Texture slot holding the ground image.
pub const GROUND_TEXTURE: u8 = 1;

/// How light leaves a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Color of light emitted by the surface, if any.
    pub emission: Vec3,
    /// Texture slots per face, indexed by [`BoxFace::slot`]:
    /// +X, -X, +Y (top), -Y (bottom), +Z, -Z.
    pub textures: [u8; 6],
}

impl Material {
    /// A non-emissive material using one texture on every face.
    pub fn uniform(texture: u8) -> Self {
        Self {
            emission: Vec3::zeros(),
            textures: [texture; 6],
        }
    }

    /// Texture slot used on `face`.
    #[inline]
    pub fn texture_for(&self, face: BoxFace) -> u8 {
        self.textures[face.slot()]
    }

    /// Whether the material emits any light.
    pub fn is_emissive(&self) -> bool {
        self.emission.iter().any(|c| *c > 0.0)
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::uniform(SKY_TEXTURE)
    }
}
