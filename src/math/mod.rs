mod color;
mod ray;

pub use color::{hex_rgb, lerp_rgb, to_rgba8};
pub use ray::{intersect_aabb, intersect_sphere, Ray};
