//! CPU rasterizer for [`Scene`].
//!
//! Triangles are clipped against the near plane in clip space, filled with
//! edge functions over their screen-space bounding box, depth tested, and
//! shaded per pixel with Lambert lighting. World position and normal are
//! interpolated perspective-correctly. When the scene has shadows enabled a
//! shadow ray is cast toward every shadow-casting light.

use glam::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::framebuffer::FrameBuffer;
use crate::math::{to_rgba8, Ray};
use crate::scene::{Scene, SceneObject};

/// Offset along the normal before casting shadow rays, larger than the
/// flat-facet error of the sphere mesh
const SHADOW_BIAS: f32 = 0.01;
const MIN_AREA: f32 = 1e-8;

/// Counters from one [`render`] call
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub triangles_submitted: usize,
    /// Triangles left after near-plane clipping, including fan splits
    pub triangles_rasterized: usize,
    pub fragments_shaded: usize,
}

#[derive(Debug, Clone, Copy)]
struct ClipVertex {
    clip: Vec4,
    world: Vec3,
    normal: Vec3,
}

impl ClipVertex {
    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            clip: self.clip.lerp(other.clip, t),
            world: self.world.lerp(other.world, t),
            normal: self.normal.lerp(other.normal, t),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ScreenVertex {
    pos: Vec2,
    depth: f32,
    inv_w: f32,
    world: Vec3,
    normal: Vec3,
}

/// Draw `scene` from its camera into `target`, clearing it first
pub fn render(scene: &Scene, target: &mut FrameBuffer) -> RenderStats {
    let mut stats = RenderStats::default();
    target.clear(to_rgba8(scene.background));

    let (width, height) = target.dimensions();
    if width == 0 || height == 0 {
        return stats;
    }
    let view_proj = scene.camera.view_projection();

    for object in scene.objects() {
        draw_object(scene, object, view_proj, target, &mut stats);
    }
    stats
}

fn draw_object(
    scene: &Scene,
    object: &SceneObject,
    view_proj: Mat4,
    target: &mut FrameBuffer,
    stats: &mut RenderStats,
) {
    let model = object.transform.matrix();
    let normal_matrix: Mat3 = object.transform.normal_matrix();
    let mvp = view_proj * model;

    let vertices: Vec<ClipVertex> = object
        .mesh
        .positions
        .iter()
        .zip(&object.mesh.normals)
        .map(|(&p, &n)| ClipVertex {
            clip: mvp * p.extend(1.0),
            world: model.transform_point3(p),
            normal: normal_matrix * n,
        })
        .collect();

    let mut polygon = Vec::with_capacity(4);
    for tri in &object.mesh.indices {
        stats.triangles_submitted += 1;
        let Some(corners) = tri
            .iter()
            .map(|&i| vertices.get(i as usize).copied())
            .collect::<Option<Vec<_>>>()
        else {
            continue;
        };

        clip_near(&corners, &mut polygon);
        for i in 1..polygon.len().saturating_sub(1) {
            stats.triangles_rasterized += 1;
            let fan = [polygon[0], polygon[i], polygon[i + 1]];
            stats.fragments_shaded += fill_triangle(scene, object, &fan, target);
        }
    }
}

/// Sutherland-Hodgman against clip-space `z >= 0`
fn clip_near(corners: &[ClipVertex], out: &mut Vec<ClipVertex>) {
    out.clear();
    for (i, a) in corners.iter().enumerate() {
        let b = &corners[(i + 1) % corners.len()];
        let (da, db) = (a.clip.z, b.clip.z);
        if da >= 0.0 {
            out.push(*a);
        }
        if (da >= 0.0) != (db >= 0.0) {
            out.push(a.lerp(b, da / (da - db)));
        }
    }
}

fn to_screen(v: &ClipVertex, width: f32, height: f32) -> ScreenVertex {
    let inv_w = 1.0 / v.clip.w;
    let ndc = v.clip.truncate() * inv_w;
    ScreenVertex {
        pos: Vec2::new(
            (ndc.x * 0.5 + 0.5) * width,
            (0.5 - ndc.y * 0.5) * height,
        ),
        depth: ndc.z,
        inv_w,
        world: v.world * inv_w,
        normal: v.normal * inv_w,
    }
}

fn edge_function(a: Vec2, b: Vec2, c: Vec2) -> f32 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

/// Fill one clipped triangle; returns the number of fragments written
fn fill_triangle(
    scene: &Scene,
    object: &SceneObject,
    tri: &[ClipVertex; 3],
    target: &mut FrameBuffer,
) -> usize {
    let (width, height) = target.dimensions();
    let (w, h) = (width as f32, height as f32);
    let [v0, v1, v2] = tri.map(|v| to_screen(&v, w, h));

    let area = edge_function(v0.pos, v1.pos, v2.pos);
    if area.abs() < MIN_AREA || !area.is_finite() {
        return 0;
    }

    let min = v0.pos.min(v1.pos).min(v2.pos).floor().max(Vec2::ZERO);
    let max = v0.pos.max(v1.pos).max(v2.pos).ceil().min(Vec2::new(w - 1.0, h - 1.0));
    if min.x > max.x || min.y > max.y {
        return 0;
    }

    let mut written = 0;
    for y in min.y as u32..=max.y as u32 {
        for x in min.x as u32..=max.x as u32 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);

            // Normalized barycentrics are all non-negative inside either winding
            let b0 = edge_function(v1.pos, v2.pos, p) / area;
            let b1 = edge_function(v2.pos, v0.pos, p) / area;
            let b2 = edge_function(v0.pos, v1.pos, p) / area;
            if b0 < 0.0 || b1 < 0.0 || b2 < 0.0 {
                continue;
            }

            let depth = b0 * v0.depth + b1 * v1.depth + b2 * v2.depth;
            if !(0.0..=1.0).contains(&depth) || !target.passes_depth(x, y, depth) {
                continue;
            }

            let inv_w = b0 * v0.inv_w + b1 * v1.inv_w + b2 * v2.inv_w;
            let world = (v0.world * b0 + v1.world * b1 + v2.world * b2) / inv_w;
            let normal = (v0.normal * b0 + v1.normal * b1 + v2.normal * b2) / inv_w;

            let color = shade(scene, object, world, normal);
            if target.plot(x, y, depth, to_rgba8(color)) {
                written += 1;
            }
        }
    }
    written
}

/// Lambert shading of `object` at `point`
pub fn shade(scene: &Scene, object: &SceneObject, point: Vec3, normal: Vec3) -> Vec3 {
    let mut n = normal.normalize_or_zero();
    // Single-sided surfaces seen from behind light their visible side
    if n.dot(scene.camera.position - point) < 0.0 {
        n = -n;
    }

    let mut irradiance = Vec3::ZERO;
    for light in scene.lights() {
        if light.is_ambient() {
            irradiance += light.color * light.intensity;
            continue;
        }
        let Some(incidence) = light.incidence(point) else {
            continue;
        };
        let lambert = n.dot(incidence.to_light);
        if lambert <= 0.0 {
            continue;
        }
        if scene.shadows_enabled && light.casts_shadow && object.receives_shadow {
            let ray = Ray::new(point + n * SHADOW_BIAS, incidence.to_light);
            if scene.occluded(&ray, incidence.distance) {
                continue;
            }
        }
        irradiance += incidence.radiance * lambert;
    }

    object.color * irradiance
}
