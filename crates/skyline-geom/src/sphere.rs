//! Spheres: the sky dome and the sun.

use std::f32::consts::PI;

use skyline_math::{is_finite, Vec2, Vec3};

use crate::{GeomError, Result};

/// A sphere.
///
/// The sky dome is a sphere around the whole city; the sun is a small
/// emissive sphere sitting on the dome's surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    /// Center of the sphere.
    pub center: Vec3,
    /// Radius, always positive.
    pub radius: f32,
    /// Index into the scene's material list.
    pub material: u32,
}

impl Sphere {
    /// Create a sphere, rejecting non-positive or non-finite radii.
    pub fn new(center: Vec3, radius: f32, material: u32) -> Result<Self> {
        if !radius.is_finite() || radius <= 0.0 || !is_finite(&center) {
            return Err(GeomError::DegenerateSphere(radius));
        }
        Ok(Self {
            center,
            radius,
            material,
        })
    }

    /// Outward unit normal at a point on the surface.
    #[inline]
    pub fn normal(&self, pos: &Vec3) -> Vec3 {
        (pos - self.center) / self.radius
    }

    /// Equirectangular texture coordinates at a point on the surface.
    ///
    /// `u` wraps once around the Y axis, `v` runs from 0 at the top pole to
    /// 1 at the bottom pole.
    pub fn tex_coords(&self, pos: &Vec3) -> Vec2 {
        let d = self.normal(pos);
        Vec2::new(
            0.5 + d.z.atan2(d.x) / (2.0 * PI),
            0.5 - d.y.clamp(-1.0, 1.0).asin() / PI,
        )
    }

    /// Smallest radius, never below the current one, that encloses `point`.
    pub fn grow_to_enclose(&mut self, point: &Vec3) {
        self.radius = self.radius.max((point - self.center).norm());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_bad_radius() {
        assert_eq!(
            Sphere::new(Vec3::zeros(), 0.0, 0).unwrap_err(),
            GeomError::DegenerateSphere(0.0)
        );
        assert!(Sphere::new(Vec3::zeros(), -2.0, 0).is_err());
        assert!(Sphere::new(Vec3::zeros(), f32::INFINITY, 0).is_err());
    }

    #[test]
    fn test_normal() {
        let s = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 2.0, 0).unwrap();
        assert_relative_eq!(s.normal(&Vec3::new(1.0, 2.0, 0.0)), Vec3::y());
    }

    #[test]
    fn test_tex_coords() {
        let s = Sphere::new(Vec3::zeros(), 10.0, 0).unwrap();
        // Top pole
        assert_relative_eq!(s.tex_coords(&Vec3::new(0.0, 10.0, 0.0)).y, 0.0);
        // Equator along +X
        assert_relative_eq!(s.tex_coords(&Vec3::new(10.0, 0.0, 0.0)), Vec2::new(0.5, 0.5));
        // Equator along +Z is a quarter turn further
        assert_relative_eq!(s.tex_coords(&Vec3::new(0.0, 0.0, 10.0)).x, 0.75);
    }

    #[test]
    fn test_grow_to_enclose() {
        let mut s = Sphere::new(Vec3::zeros(), 10.0, 0).unwrap();
        s.grow_to_enclose(&Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(s.radius, 10.0);
        s.grow_to_enclose(&Vec3::new(0.0, 12.0, 0.0));
        assert_eq!(s.radius, 12.0);
    }
}
