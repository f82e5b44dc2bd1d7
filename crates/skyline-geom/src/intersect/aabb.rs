//! Ray-box intersection (slab method).

use super::{narrow, nearest_forward, slab};
use crate::{Aabb, Ray};

/// Intersect a ray with an axis-aligned box.
///
/// Narrows the parametric interval one axis at a time and bails out as
/// soon as it becomes empty. Returns the entry distance, or the exit
/// distance when the origin is inside the box.
pub fn intersect_aabb(ray: &Ray, aabb: &Aabb) -> Option<f32> {
    let diff = ray.origin - aabb.center;
    let half = aabb.half_width();

    let mut interval = slab(half.x, diff.x, ray.direction.x)?;
    interval = narrow(interval, slab(half.y, diff.y, ray.direction.y)?)?;
    interval = narrow(interval, slab(half.z, diff.z, ray.direction.z)?)?;

    nearest_forward(interval)
}
