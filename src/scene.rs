use std::f32::consts::FRAC_PI_2;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::{Camera, DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use crate::light::Light;
use crate::math::{hex_rgb, intersect_aabb, intersect_sphere, Ray};
use crate::mesh::Mesh;
use crate::transform::Transform;
use crate::updater::UpdateTargets;

pub const BACKGROUND: u32 = 0x223344;
pub const FLOOR_COLOR: u32 = 0x88aa33;
pub const CUBE_COLOR: u32 = 0x44aa88;
pub const SPHERE_COLOR: u32 = 0xff00ff;

const FLOOR_SIZE: f32 = 10.0;
const FLOOR_SEGMENTS: u32 = 20;
const SPHERE_RADIUS: f32 = 0.7;
const SPHERE_SEGMENTS: u32 = 32;
const KEY_LIGHT_INTENSITY: f32 = 0.9;

/// Differences between the scene variants, fixed at construction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VariantOptions {
    pub shadows_enabled: bool,
    pub point_light_enabled: bool,
    pub ambient_intensity: f32,
}

impl VariantOptions {
    /// Two directional lights, nothing else
    pub fn basic() -> Self {
        Self {
            shadows_enabled: false,
            point_light_enabled: false,
            ambient_intensity: 0.0,
        }
    }

    /// Shadows, an ambient fill and a pulsing point light above the cube
    pub fn lit() -> Self {
        Self {
            shadows_enabled: true,
            point_light_enabled: true,
            ambient_intensity: 0.35,
        }
    }
}

impl Default for VariantOptions {
    fn default() -> Self {
        Self::basic()
    }
}

/// Analytic shape backing a mesh, used for shadow queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Plane { width: f32, height: f32 },
    Box { size: Vec3 },
    Sphere { radius: f32 },
}

#[derive(Debug, Clone)]
pub struct SceneObject {
    pub name: String,
    pub shape: Shape,
    pub mesh: Mesh,
    pub color: Vec3,
    pub transform: Transform,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
}

impl SceneObject {
    pub fn plane(name: &str, width: f32, height: f32, segments: u32, color: Vec3) -> Self {
        Self::new(
            name,
            Shape::Plane { width, height },
            Mesh::plane(width, height, segments, segments),
            color,
        )
    }

    pub fn cuboid(name: &str, size: Vec3, color: Vec3) -> Self {
        Self::new(
            name,
            Shape::Box { size },
            Mesh::cuboid(size.x, size.y, size.z),
            color,
        )
    }

    pub fn sphere(name: &str, radius: f32, segments: u32, color: Vec3) -> Self {
        Self::new(
            name,
            Shape::Sphere { radius },
            Mesh::uv_sphere(radius, segments, segments),
            color,
        )
    }

    fn new(name: &str, shape: Shape, mesh: Mesh, color: Vec3) -> Self {
        Self {
            name: name.to_string(),
            shape,
            mesh,
            color,
            transform: Transform::IDENTITY,
            casts_shadow: false,
            receives_shadow: false,
        }
    }

    pub fn at(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_shadows(mut self, casts: bool, receives: bool) -> Self {
        self.casts_shadow = casts;
        self.receives_shadow = receives;
        self
    }

    /// Hit distance along `ray` in world units of `ray.dir`; planes never occlude
    pub fn occlusion(&self, ray: &Ray) -> Option<f32> {
        match self.shape {
            Shape::Plane { .. } => None,
            Shape::Box { size } => {
                let inverse = self.transform.matrix().inverse();
                let local = Ray::new(
                    inverse.transform_point3(ray.origin),
                    inverse.transform_vector3(ray.dir),
                );
                intersect_aabb(&local, -size * 0.5, size * 0.5)
            }
            Shape::Sphere { radius } => intersect_sphere(
                ray,
                self.transform.position,
                radius * self.transform.scale.max_element(),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LightId(usize);

/// Which scene entries the frame updater animates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneHandles {
    pub spinner: ObjectId,
    pub orbiter: ObjectId,
    pub pulse_lights: Vec<LightId>,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Vec3,
    pub camera: Camera,
    pub shadows_enabled: bool,
    objects: Vec<SceneObject>,
    lights: Vec<Light>,
}

impl Scene {
    pub fn new(camera: Camera, background: Vec3) -> Self {
        Self {
            background,
            camera,
            shadows_enabled: false,
            objects: Vec::new(),
            lights: Vec::new(),
        }
    }

    pub fn add_object(&mut self, object: SceneObject) -> ObjectId {
        self.objects.push(object);
        ObjectId(self.objects.len() - 1)
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.0)
    }

    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.0)
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Split the scene into the disjoint borrows the updater writes.
    ///
    /// `None` when the handles don't refer to two distinct objects of this scene.
    pub fn update_targets(&mut self, handles: &SceneHandles) -> Option<UpdateTargets<'_>> {
        let (spinner, orbiter) = pair_mut(&mut self.objects, handles.spinner.0, handles.orbiter.0)?;
        let lights = self
            .lights
            .iter_mut()
            .enumerate()
            .filter(|(i, _)| handles.pulse_lights.contains(&LightId(*i)))
            .map(|(_, light)| light)
            .collect();

        Some(UpdateTargets {
            spinner: &mut spinner.transform,
            orbiter: &mut orbiter.transform,
            lights,
        })
    }

    /// Whether anything that casts shadows blocks `ray` before `max_t`
    pub fn occluded(&self, ray: &Ray, max_t: f32) -> bool {
        self.objects
            .iter()
            .filter(|o| o.casts_shadow)
            .filter_map(|o| o.occlusion(ray))
            .any(|t| t < max_t)
    }
}

fn pair_mut<T>(items: &mut [T], a: usize, b: usize) -> Option<(&mut T, &mut T)> {
    if a == b || a >= items.len() || b >= items.len() {
        return None;
    }
    if a < b {
        let (left, right) = items.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = items.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

/// Floor, spinning cube, orbiting sphere and lights
pub fn build_scene(options: &VariantOptions) -> (Scene, SceneHandles) {
    let camera = Camera::perspective(DEFAULT_FOV_DEGREES, 1.0, DEFAULT_NEAR, DEFAULT_FAR)
        .with_position(Vec3::new(3.0, 2.0, 5.0))
        .looking_at(Vec3::ZERO);

    let mut scene = Scene::new(camera, hex_rgb(BACKGROUND));
    scene.shadows_enabled = options.shadows_enabled;

    scene.add_object(
        SceneObject::plane(
            "floor",
            FLOOR_SIZE,
            FLOOR_SIZE,
            FLOOR_SEGMENTS,
            hex_rgb(FLOOR_COLOR),
        )
        .at(Transform::IDENTITY.with_rotation(Vec3::new(-FRAC_PI_2, 0.0, 0.0)))
        .with_shadows(false, true),
    );

    let spinner = scene.add_object(
        SceneObject::cuboid("cube", Vec3::ONE, hex_rgb(CUBE_COLOR))
            .at(Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .with_shadows(true, true),
    );

    let orbiter = scene.add_object(
        SceneObject::sphere("sphere", SPHERE_RADIUS, SPHERE_SEGMENTS, hex_rgb(SPHERE_COLOR))
            .at(Transform::from_position(Vec3::new(2.0, 1.0, 0.0)))
            .with_shadows(true, true),
    );

    let key = scene.add_light(
        Light::directional(Vec3::new(3.0, 5.0, 2.0), Vec3::ZERO, Vec3::ONE, KEY_LIGHT_INTENSITY)
            .with_shadow(options.shadows_enabled),
    );
    scene.add_light(Light::directional(
        Vec3::new(-3.0, 5.0, -2.0),
        Vec3::ZERO,
        Vec3::ONE,
        KEY_LIGHT_INTENSITY,
    ));

    if options.ambient_intensity > 0.0 {
        scene.add_light(Light::ambient(Vec3::ONE, options.ambient_intensity));
    }

    let pulse = if options.point_light_enabled {
        scene.add_light(
            Light::point(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE, 1.0)
                .with_shadow(options.shadows_enabled),
        )
    } else {
        key
    };

    let handles = SceneHandles {
        spinner,
        orbiter,
        pulse_lights: vec![pulse],
    };
    (scene, handles)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_mut_rejects_aliasing() {
        let mut items = [1, 2, 3];
        assert!(pair_mut(&mut items, 1, 1).is_none());
        assert!(pair_mut(&mut items, 0, 3).is_none());

        let (a, b) = pair_mut(&mut items, 2, 0).unwrap();
        std::mem::swap(a, b);
        assert_eq!(items, [3, 2, 1]);
    }

    #[test]
    fn test_box_occlusion_respects_rotation() {
        let cube = SceneObject::cuboid("cube", Vec3::ONE, Vec3::ONE).at(
            Transform::from_position(Vec3::new(0.0, 1.0, 0.0))
                .with_rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0)),
        );

        // Rotated 45 degrees the corner reaches sqrt(0.5) along X
        let ray = Ray::new(Vec3::new(5.0, 1.0, 0.0), -Vec3::X);
        let t = cube.occlusion(&ray).unwrap();
        assert!((t - (5.0 - 0.5f32.sqrt())).abs() < 1e-4);
    }

    #[test]
    fn test_plane_never_occludes() {
        let floor = SceneObject::plane("floor", 10.0, 10.0, 1, Vec3::ONE);
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), -Vec3::Y);
        assert!(floor.occlusion(&ray).is_none());
    }
}
