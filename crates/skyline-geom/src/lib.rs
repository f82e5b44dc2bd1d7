#![warn(missing_docs)]

//! Geometry primitives for the skyline city renderer.
//!
//! Buildings are axis-aligned boxes, the sky is a dome (sphere) centered at
//! the world origin, and the ground is the `y = 0` plane. This crate holds
//! those shapes together with the ray tests the tracer runs against them.
//!
//! # Architecture
//!
//! - [`Ray`] - Origin and unit direction; distances are in world units
//! - [`Aabb`], [`Sphere`], [`GroundPlane`] - Shapes with normals and texture coordinates
//! - [`intersect`] - Slab, quadratic and plane intersection tests
//! - [`Material`] - Emission and per-face texture slots
//! - [`Camera`] - Pinhole camera producing per-pixel rays
//! - [`gpu`] - Fixed layouts of the above for upload to the device
//!
//! # Example
//!
//! ```
//! use skyline_geom::{intersect::intersect_aabb, Aabb, Ray};
//! use skyline_math::Vec3;
//!
//! let building = Aabb::new(Vec3::zeros(), Vec3::new(2.0, 2.0, 2.0), 0).unwrap();
//! let ray = Ray::new(Vec3::new(0.0, 0.0, -5.0), Vec3::new(0.0, 0.0, 1.0)).unwrap();
//!
//! assert_eq!(intersect_aabb(&ray, &building), Some(4.0));
//! ```

mod aabb;
mod camera;
mod error;
mod material;
mod plane;
mod ray;
mod sphere;

pub mod gpu;
pub mod intersect;

pub use aabb::{Aabb, BoxFace, TexCoords};
pub use camera::Camera;
pub use error::{GeomError, Result};
pub use material::{Material, GROUND_TEXTURE, SKY_TEXTURE};
pub use plane::GroundPlane;
pub use ray::Ray;
pub use sphere::Sphere;
