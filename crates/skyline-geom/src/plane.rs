//! The ground plane at `y = 0`.

use skyline_math::{Vec2, Vec3};

/// The ground: an infinite plane at `y = 0` facing up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPlane {
    /// Size in world units covered by one copy of the ground texture,
    /// along X and Z.
    pub tex_norm: Vec2,
}

impl GroundPlane {
    /// Create a ground plane with the given texture scale.
    pub fn new(tex_norm: Vec2) -> Self {
        Self { tex_norm }
    }

    /// Normal at any point on the plane.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        Vec3::y()
    }

    /// Texture coordinates at a point on the plane.
    pub fn tex_coords(&self, pos: &Vec3) -> Vec2 {
        Vec2::new(pos.x / self.tex_norm.x, pos.z / self.tex_norm.y)
    }
}

impl Default for GroundPlane {
    fn default() -> Self {
        Self::new(Vec2::new(1.0, 1.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tex_coords() {
        let g = GroundPlane::new(Vec2::new(2.0, 4.0));
        assert_eq!(g.tex_coords(&Vec3::new(3.0, 0.0, -8.0)), Vec2::new(1.5, -2.0));
        assert_eq!(g.normal(), Vec3::y());
    }
}
