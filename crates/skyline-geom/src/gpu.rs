//! Device layouts for shapes, materials and rays.
//!
//! Each struct mirrors the layout the tracing kernel declares, including its
//! filler fields, and is checked at compile time.

use bytemuck::{Pod, Zeroable};
use skyline_math::Float3;

use crate::{Aabb, Material, Ray, Sphere};

/// GPU-compatible box (64 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuAabb {
    /// Full extents.
    pub width: Float3,
    /// Center.
    pub center: Float3,
    /// Texture normalization.
    pub tex_norm: Float3,
    /// Material index.
    pub material: i32,
    /// Padding.
    pub _pad: [i32; 3],
}

impl From<&Aabb> for GpuAabb {
    fn from(aabb: &Aabb) -> Self {
        Self {
            width: aabb.width.into(),
            center: aabb.center.into(),
            tex_norm: aabb.tex_norm.into(),
            material: aabb.material as i32,
            _pad: [0; 3],
        }
    }
}

/// GPU-compatible sphere (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuSphere {
    /// Center.
    pub center: Float3,
    /// Radius.
    pub radius: f32,
    /// Padding.
    pub _pad: [f32; 3],
}

impl From<&Sphere> for GpuSphere {
    fn from(sphere: &Sphere) -> Self {
        Self {
            center: sphere.center.into(),
            radius: sphere.radius,
            _pad: [0.0; 3],
        }
    }
}

/// GPU-compatible material (32 bytes).
///
/// Texture slots are an 8-wide byte vector on the device; the last two are
/// unused.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuMaterial {
    /// Emitted color.
    pub emission: Float3,
    /// Texture slots per face, then two unused bytes.
    pub textures: [u8; 8],
    /// Padding.
    pub _pad: [u8; 8],
}

impl From<&Material> for GpuMaterial {
    fn from(material: &Material) -> Self {
        let mut textures = [0u8; 8];
        textures[..6].copy_from_slice(&material.textures);
        Self {
            emission: material.emission.into(),
            textures,
            _pad: [0; 8],
        }
    }
}

/// GPU-compatible ray (32 bytes).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct GpuRay {
    /// Origin.
    pub position: Float3,
    /// Unit direction.
    pub direction: Float3,
}

impl From<&Ray> for GpuRay {
    fn from(ray: &Ray) -> Self {
        Self {
            position: ray.origin.into(),
            direction: ray.direction.into(),
        }
    }
}

const _: () = assert!(std::mem::size_of::<GpuAabb>() == 64);
const _: () = assert!(std::mem::offset_of!(GpuAabb, center) == 16);
const _: () = assert!(std::mem::offset_of!(GpuAabb, tex_norm) == 32);
const _: () = assert!(std::mem::offset_of!(GpuAabb, material) == 48);
const _: () = assert!(std::mem::size_of::<GpuSphere>() == 32);
const _: () = assert!(std::mem::offset_of!(GpuSphere, radius) == 16);
const _: () = assert!(std::mem::size_of::<GpuMaterial>() == 32);
const _: () = assert!(std::mem::offset_of!(GpuMaterial, textures) == 16);
const _: () = assert!(std::mem::size_of::<GpuRay>() == 32);
