//! Axis-aligned box buildings.

use skyline_math::{is_finite, Tolerance, Vec2, Vec3};

use crate::{GeomError, Result};

/// An axis-aligned box, used directly as building geometry.
///
/// `width` holds the full extents, not half extents. Every component must
/// be positive; [`Aabb::new`] and [`Aabb::validate`] enforce this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Full extents along X, Y and Z.
    pub width: Vec3,
    /// Center of the box.
    pub center: Vec3,
    /// Size in world units that one copy of a face texture covers.
    pub tex_norm: Vec3,
    /// Index into the scene's material list.
    pub material: u32,
}

/// One of the six faces of a box.
///
/// The discriminant is the face's slot in [`Material::textures`](crate::Material).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BoxFace {
    /// Face at `center.x + width.x / 2`.
    PosX = 0,
    /// Face at `center.x - width.x / 2`.
    NegX = 1,
    /// Roof.
    PosY = 2,
    /// Floor.
    NegY = 3,
    /// Face at `center.z + width.z / 2`.
    PosZ = 4,
    /// Face at `center.z - width.z / 2`.
    NegZ = 5,
}

impl BoxFace {
    /// All faces, in slot order.
    pub const ALL: [BoxFace; 6] = [
        BoxFace::PosX,
        BoxFace::NegX,
        BoxFace::PosY,
        BoxFace::NegY,
        BoxFace::PosZ,
        BoxFace::NegZ,
    ];

    /// Texture slot of this face within a material.
    #[inline]
    pub fn slot(self) -> usize {
        self as usize
    }

    /// Outward unit normal.
    pub fn normal(self) -> Vec3 {
        match self {
            BoxFace::PosX => Vec3::x(),
            BoxFace::NegX => -Vec3::x(),
            BoxFace::PosY => Vec3::y(),
            BoxFace::NegY => -Vec3::y(),
            BoxFace::PosZ => Vec3::z(),
            BoxFace::NegZ => -Vec3::z(),
        }
    }

    fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => BoxFace::PosX,
            (0, false) => BoxFace::NegX,
            (1, true) => BoxFace::PosY,
            (1, false) => BoxFace::NegY,
            (_, true) => BoxFace::PosZ,
            (_, false) => BoxFace::NegZ,
        }
    }

    /// The two axes spanning this face, in (u, v) order.
    fn tangent_axes(self) -> (usize, usize) {
        match self {
            BoxFace::PosX | BoxFace::NegX => (1, 2),
            BoxFace::PosY | BoxFace::NegY => (0, 2),
            BoxFace::PosZ | BoxFace::NegZ => (0, 1),
        }
    }
}

/// Texture coordinates of a point on a box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoords {
    /// Coordinates on the face. `[0, 1]` when `tex_norm == width`; larger
    /// values repeat the texture.
    pub uv: Vec2,
    /// Face that was struck.
    pub face: BoxFace,
}

impl Aabb {
    /// Create a box whose texture covers each face exactly once.
    pub fn new(center: Vec3, width: Vec3, material: u32) -> Result<Self> {
        let aabb = Self {
            width,
            center,
            tex_norm: width,
            material,
        };
        aabb.validate()?;
        Ok(aabb)
    }

    /// Replace the texture normalization.
    pub fn with_tex_norm(mut self, tex_norm: Vec3) -> Self {
        self.tex_norm = tex_norm;
        self
    }

    /// Check that the box has a positive, finite width and a finite center.
    ///
    /// Fields are public so an editor can change them in place; call this
    /// before handing edited boxes to the grid builder.
    pub fn validate(&self) -> Result<()> {
        let w = &self.width;
        if !is_finite(w) || !is_finite(&self.center) || w.iter().any(|c| *c <= 0.0) {
            return Err(GeomError::DegenerateBox(w.x, w.y, w.z));
        }
        Ok(())
    }

    /// Half extents.
    #[inline]
    pub fn half_width(&self) -> Vec3 {
        self.width * 0.5
    }

    /// Minimum corner.
    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.half_width()
    }

    /// Maximum corner.
    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.half_width()
    }

    /// The eight corners of the box.
    pub fn corners(&self) -> [Vec3; 8] {
        let h = self.half_width();
        let mut out = [Vec3::zeros(); 8];
        for (i, corner) in out.iter_mut().enumerate() {
            let sx = if i & 1 == 0 { 1.0 } else { -1.0 };
            let sy = if i & 2 == 0 { 1.0 } else { -1.0 };
            let sz = if i & 4 == 0 { 1.0 } else { -1.0 };
            *corner = self.center + Vec3::new(sx * h.x, sy * h.y, sz * h.z);
        }
        out
    }

    /// Which face a point on the surface lies on.
    ///
    /// A face matches when the point's offset from the center is within a
    /// few float epsilons of the half extent (scaled by the extent for large
    /// boxes). Points that match no face within tolerance are assigned to
    /// the face of the axis where the point sits farthest out relative to
    /// the half extent.
    pub fn face_at(&self, pos: &Vec3) -> BoxFace {
        let diff = pos - self.center;
        let half = self.half_width();

        for face in BoxFace::ALL {
            let axis = face.slot() / 2;
            let plane = if face.slot() % 2 == 0 { half[axis] } else { -half[axis] };
            let tol = Tolerance::FACE * half[axis].max(1.0);
            if (diff[axis] - plane).abs() < tol {
                return face;
            }
        }

        let mut best = 0;
        let mut best_ratio = f32::NEG_INFINITY;
        for axis in 0..3 {
            let ratio = diff[axis].abs() / half[axis];
            if ratio > best_ratio {
                best_ratio = ratio;
                best = axis;
            }
        }
        BoxFace::from_axis(best, diff[best] >= 0.0)
    }

    /// Outward normal at a point on the surface.
    pub fn normal(&self, pos: &Vec3) -> Vec3 {
        self.face_at(pos).normal()
    }

    /// Normal and texture coordinates at a point on the surface.
    pub fn normal_and_tex_coords(&self, pos: &Vec3) -> (Vec3, TexCoords) {
        let face = self.face_at(pos);
        let diff = pos - self.center;
        let (u, v) = face.tangent_axes();
        let uv = Vec2::new(
            diff[u] / self.tex_norm[u] + 0.5,
            diff[v] / self.tex_norm[v] + 0.5,
        );
        (face.normal(), TexCoords { uv, face })
    }
}
