//! Ray-ground intersection.

use skyline_math::Tolerance;

use crate::Ray;

/// Intersect a ray with the ground plane `y = 0`.
///
/// Nearly horizontal rays never reach the ground.
pub fn intersect_ground(ray: &Ray) -> Option<f32> {
    if ray.direction.y.abs() < Tolerance::GROUND_PARALLEL {
        return None;
    }
    let t = -ray.origin.y / ray.direction.y;
    (t > 0.0).then_some(t)
}
