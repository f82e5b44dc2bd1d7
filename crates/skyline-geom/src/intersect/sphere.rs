//! Ray-sphere intersection (quadratic equation).

use crate::{Ray, Sphere};

/// Intersect a ray with a sphere.
///
/// Uses the geometric form of the quadratic, which relies on the ray
/// direction being unit length. Returns the near root, or the far root
/// when the origin is inside the sphere.
pub fn intersect_sphere(ray: &Ray, sphere: &Sphere) -> Option<f32> {
    let diff = ray.origin - sphere.center;
    let b = diff.dot(&ray.direction);
    let disc = b * b - diff.dot(&diff) + sphere.radius * sphere.radius;
    if disc < 0.0 {
        return None;
    }

    let sqrt_disc = disc.sqrt();
    let mut dist = -b - sqrt_disc;
    if dist < 0.0 {
        dist = -b + sqrt_disc;
    }
    (dist > 0.0).then_some(dist)
}
