//! Pinhole camera.

use skyline_math::{IVec2, Vec3};

use crate::{GeomError, Ray, Result};

/// A pinhole camera looking at a focal plane.
///
/// `right` and `up` span the visible part of the focal plane: a pixel at
/// normalized coordinates `(0.5, 0.5)` lies at `focal_pos`, and moving one
/// unit of normalized height moves one `up` along the plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Eye position.
    pub position: Vec3,
    /// Center of the focal plane.
    pub focal_pos: Vec3,
    /// Horizontal extent of the focal plane per unit of aspect ratio.
    pub right: Vec3,
    /// Vertical extent of the focal plane.
    pub up: Vec3,
    /// Height of the view in world units.
    pub size: f32,
}

impl Camera {
    /// Camera at `position` looking at `focal_pos` with a view `size` tall,
    /// kept level with the ground.
    pub fn look_at(position: Vec3, focal_pos: Vec3, size: f32) -> Result<Self> {
        let forward = focal_pos - position;
        let right = forward.cross(&Vec3::y());
        let len = right.norm();
        if !len.is_normal() {
            return Err(GeomError::DegenerateCamera);
        }
        let right = right / len * size;
        let up = right.cross(&forward).normalize() * size;
        Ok(Self {
            position,
            focal_pos,
            right,
            up,
            size,
        })
    }

    /// Ray through the corner of `pixel` in a `width` x `height` image.
    pub fn generate_ray(&self, pixel: IVec2, width: u32, height: u32) -> Result<Ray> {
        let aspect = width as f32 / height as f32;
        let ndc_x = pixel.x as f32 / width as f32;
        let ndc_y = pixel.y as f32 / height as f32;
        let on_plane =
            self.right * (ndc_x - 0.5) * aspect + self.up * (ndc_y - 0.5) + self.focal_pos;
        Ray::new(self.position, on_plane - self.position)
    }
}
