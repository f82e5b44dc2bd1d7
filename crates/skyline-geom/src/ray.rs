//! Ray representation.

use skyline_math::{is_finite, Vec3};

use crate::{GeomError, Result};

/// A ray in world space defined by origin and direction.
///
/// The direction is normalized on construction, so every distance returned
/// by the intersection tests is measured in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Origin point of the ray.
    pub origin: Vec3,
    /// Unit direction of the ray.
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray from origin and direction.
    ///
    /// The direction will be normalized. Zero-length and non-finite
    /// directions are rejected.
    pub fn new(origin: Vec3, direction: Vec3) -> Result<Self> {
        let len = direction.norm();
        if !is_finite(&direction) || !len.is_normal() {
            return Err(GeomError::DegenerateRay(direction.x, direction.y, direction.z));
        }
        Ok(Self {
            origin,
            direction: direction / len,
        })
    }

    /// Evaluate the ray at distance `t`: `origin + t * direction`.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_ray_normalizes() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(3.0, 0.0, 4.0)).unwrap();
        assert_relative_eq!(ray.direction.norm(), 1.0);
        assert_relative_eq!(ray.direction.x, 0.6);
        assert_relative_eq!(ray.direction.z, 0.8);
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.0)).unwrap();
        let p = ray.at(5.0);
        assert_relative_eq!(p, Vec3::new(1.0, 5.0, 0.0));
    }

    #[test]
    fn test_zero_direction_rejected() {
        let err = Ray::new(Vec3::zeros(), Vec3::zeros()).unwrap_err();
        assert_eq!(err, GeomError::DegenerateRay(0.0, 0.0, 0.0));
    }

    #[test]
    fn test_nan_direction_rejected() {
        assert!(Ray::new(Vec3::zeros(), Vec3::new(f32::NAN, 1.0, 0.0)).is_err());
        assert!(Ray::new(Vec3::zeros(), Vec3::new(f32::INFINITY, 0.0, 0.0)).is_err());
    }
}
