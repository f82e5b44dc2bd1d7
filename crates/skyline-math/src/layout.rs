//! Vector layouts shared with the device-side kernel.
//!
//! The kernel's `float3` occupies four floats of storage and is 16-byte
//! aligned. These types reproduce that layout with explicit padding fields
//! so that buffers built on the host can be copied to the device byte for
//! byte. Sizes, alignments and field offsets are checked at compile time
//! below.

use bytemuck::{Pod, Zeroable};

use crate::{IVec2, Vec2, Vec3};

/// Three floats padded to 16 bytes.
///
/// | offset | field  |
/// |--------|--------|
/// | 0      | `x`    |
/// | 4      | `y`    |
/// | 8      | `z`    |
/// | 12     | `_pad` |
#[repr(C, align(16))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Float3 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
    /// Z component.
    pub z: f32,
    /// Padding; always zero when built from a [`Vec3`].
    pub _pad: f32,
}

impl Float3 {
    /// Create a padded vector.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, _pad: 0.0 }
    }
}

impl From<Vec3> for Float3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Float3> for Vec3 {
    fn from(v: Float3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

/// Two floats, 8-byte aligned (`x` at 0, `y` at 4).
#[repr(C, align(8))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Float2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl From<Vec2> for Float2 {
    fn from(v: Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Float2> for Vec2 {
    fn from(v: Float2) -> Self {
        Vec2::new(v.x, v.y)
    }
}

/// Two ints, 8-byte aligned (`x` at 0, `y` at 4).
#[repr(C, align(8))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Int2 {
    /// X component.
    pub x: i32,
    /// Y component.
    pub y: i32,
}

impl From<IVec2> for Int2 {
    fn from(v: IVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl From<Int2> for IVec2 {
    fn from(v: Int2) -> Self {
        IVec2::new(v.x, v.y)
    }
}

const _: () = assert!(std::mem::size_of::<Float3>() == 16);
const _: () = assert!(std::mem::align_of::<Float3>() == 16);
const _: () = assert!(std::mem::offset_of!(Float3, x) == 0);
const _: () = assert!(std::mem::offset_of!(Float3, y) == 4);
const _: () = assert!(std::mem::offset_of!(Float3, z) == 8);
const _: () = assert!(std::mem::size_of::<Float2>() == 8);
const _: () = assert!(std::mem::align_of::<Float2>() == 8);
const _: () = assert!(std::mem::size_of::<Int2>() == 8);
const _: () = assert!(std::mem::align_of::<Int2>() == 8);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float3_round_trip() {
        let v = Vec3::new(1.0, -2.0, 3.5);
        let f = Float3::from(v);
        assert_eq!(f._pad, 0.0);
        assert_eq!(Vec3::from(f), v);
    }

    #[test]
    fn test_float3_bytes() {
        let f = Float3::new(1.0, 2.0, 3.0);
        let bytes = bytemuck::bytes_of(&f);
        assert_eq!(bytes.len(), 16);
        assert_eq!(&bytes[8..12], &3.0f32.to_ne_bytes());
    }

    #[test]
    fn test_slice_stride() {
        let v = [Float3::new(1.0, 2.0, 3.0), Float3::new(4.0, 5.0, 6.0)];
        let floats: &[f32] = bytemuck::cast_slice(&v);
        // Second vector starts at float 4, not float 3
        assert_eq!(floats.len(), 8);
        assert_eq!(floats[4], 4.0);
    }

    #[test]
    fn test_int2_conversion() {
        let i = Int2::from(IVec2::new(-3, 7));
        assert_eq!((i.x, i.y), (-3, 7));
        assert_eq!(IVec2::from(i), IVec2::new(-3, 7));
    }
}
