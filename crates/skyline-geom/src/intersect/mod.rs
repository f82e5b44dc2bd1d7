//! Ray intersection tests.
//!
//! Every test returns `Some(t)` with `t > 0` when the ray hits the shape in
//! front of its origin, and `None` otherwise. `t` is in world units because
//! [`Ray`](crate::Ray) directions are unit length. When the origin is inside
//! a box or sphere the exit distance is returned.

mod aabb;
mod plane;
mod slab;
mod sphere;

pub use aabb::intersect_aabb;
pub use plane::intersect_ground;
pub use slab::{intersect_rect, narrow, slab, Interval};
pub use sphere::intersect_sphere;

/// Nearest forward distance of a slab interval: entry if it lies ahead of
/// the origin, otherwise exit if that does.
#[inline]
pub fn nearest_forward(interval: Interval) -> Option<f32> {
    let (t_min, t_max) = interval;
    if t_min > 0.0 {
        Some(t_min)
    } else if t_max > 0.0 {
        Some(t_max)
    } else {
        None
    }
}
