//! Per-axis slab intervals.

use skyline_math::Vec2;

use super::nearest_forward;
use crate::Ray;

/// Parametric interval `(t_min, t_max)` along a ray.
pub type Interval = (f32, f32);

/// Interval over which a ray lies between the planes `center - half` and
/// `center + half` along one axis.
///
/// `diff` is `origin - center` on that axis and `dir` the ray's direction
/// component. The entry plane is chosen by the sign of `1 / dir`. A zero
/// direction component is handled explicitly: the ray is inside the slab
/// for all `t` or never, which avoids `0 * inf` when the origin sits
/// exactly on a plane.
#[inline]
pub fn slab(half: f32, diff: f32, dir: f32) -> Option<Interval> {
    if dir == 0.0 {
        return if diff.abs() <= half {
            Some((f32::NEG_INFINITY, f32::INFINITY))
        } else {
            None
        };
    }

    let dir_inv = 1.0 / dir;
    let sign = if dir_inv > 0.0 { 1.0 } else { -1.0 };
    Some((
        (-sign * half - diff) * dir_inv,
        (sign * half - diff) * dir_inv,
    ))
}

/// Intersect two intervals, or `None` if they are disjoint.
#[inline]
pub fn narrow(current: Interval, other: Interval) -> Option<Interval> {
    let (t_min, t_max) = current;
    let (o_min, o_max) = other;
    if t_min > o_max || o_min > t_max {
        return None;
    }
    Some((t_min.max(o_min), t_max.min(o_max)))
}

/// Intersect a ray with the vertical prism over a rectangle on the ground
/// plane, ignoring height.
///
/// `center` and `half` are in (X, Z). This is the slab test restricted to
/// two axes.
pub fn intersect_rect(ray: &Ray, center: &Vec2, half: &Vec2) -> Option<f32> {
    let x = slab(half.x, ray.origin.x - center.x, ray.direction.x)?;
    let z = slab(half.y, ray.origin.z - center.y, ray.direction.z)?;
    nearest_forward(narrow(x, z)?)
}
