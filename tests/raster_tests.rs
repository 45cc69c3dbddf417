use glam::Vec3;
use orbit_scene::camera::Camera;
use orbit_scene::config::SceneConfig;
use orbit_scene::core::window::WindowDimensions;
use orbit_scene::framebuffer::FrameBuffer;
use orbit_scene::light::Light;
use orbit_scene::raster::{render, shade};
use orbit_scene::scene::{build_scene, Scene, SceneObject, VariantOptions};
use orbit_scene::{Engine, FrameUpdater};

const WIDTH: u32 = 96;
const HEIGHT: u32 = 72;

fn project(engine: &Engine, point: Vec3) -> (u32, u32) {
    let clip = engine.scene().camera.view_projection() * point.extend(1.0);
    let ndc = clip.truncate() / clip.w;
    let x = (ndc.x * 0.5 + 0.5) * WIDTH as f32;
    let y = (0.5 - ndc.y * 0.5) * HEIGHT as f32;
    (x as u32, y as u32)
}

fn lit_engine() -> Engine {
    let mut engine = Engine::new(&SceneConfig::with_variant(VariantOptions::lit())).unwrap();
    engine.resize(WindowDimensions::new(WIDTH, HEIGHT));
    engine
}

#[cfg(test)]
mod render_tests {
    use super::*;

    #[test]
    fn test_sky_is_background() {
        let engine = lit_engine();
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
        engine.render(&mut fb);

        assert_eq!(fb.pixel(0, 0), Some([0x22, 0x33, 0x44, 255]));
        assert_eq!(fb.pixel(WIDTH - 1, 0), Some([0x22, 0x33, 0x44, 255]));
    }

    #[test]
    fn test_origin_shows_floor() {
        let engine = lit_engine();
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
        engine.render(&mut fb);

        let (x, y) = project(&engine, Vec3::ZERO);
        let pixel = fb.pixel(x, y).unwrap();
        assert_ne!(pixel, [0x22, 0x33, 0x44, 255]);
        // #88aa33 lit by white light keeps green dominant
        assert!(pixel[1] >= pixel[0] && pixel[1] > pixel[2], "{:?}", pixel);
    }

    #[test]
    fn test_sphere_in_front_of_floor() {
        let engine = lit_engine();
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
        engine.render(&mut fb);

        let (x, y) = project(&engine, Vec3::new(2.0, 1.0, 0.0));
        let pixel = fb.pixel(x, y).unwrap();
        // #ff00ff has no green under any light
        assert_eq!(pixel[1], 0, "{:?}", pixel);
        assert!(pixel[0] > 0 && pixel[2] > 0, "{:?}", pixel);
        assert!(fb.depth(x, y).unwrap() < 1.0);
    }

    #[test]
    fn test_every_triangle_is_submitted() {
        let engine = lit_engine();
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
        let stats = engine.render(&mut fb);

        let total: usize = engine
            .scene()
            .objects()
            .iter()
            .map(|o| o.mesh.triangle_count())
            .sum();
        assert_eq!(stats.triangles_submitted, total);
        assert!(stats.fragments_shaded > 0);
    }

    #[test]
    fn test_render_clears_previous_frame() {
        let engine = lit_engine();
        let mut fb = FrameBuffer::new(WIDTH, HEIGHT);
        fb.clear([255, 255, 255, 255]);
        engine.render(&mut fb);
        assert_eq!(fb.pixel(0, 0), Some([0x22, 0x33, 0x44, 255]));
    }

    #[test]
    fn test_zero_sized_target() {
        let (scene, _) = build_scene(&VariantOptions::basic());
        let mut fb = FrameBuffer::new(0, 0);
        let stats = render(&scene, &mut fb);
        assert_eq!(stats.triangles_submitted, 0);
    }

    #[test]
    fn test_camera_inside_geometry_is_clipped() {
        let (mut scene, _) = build_scene(&VariantOptions::basic());
        // Inside the cube; every cube face straddles or sits behind the near plane
        scene.camera.position = Vec3::new(0.0, 1.0, 0.0);
        scene.camera.target = Vec3::new(1.0, 1.0, 1.0);
        let mut fb = FrameBuffer::new(32, 32);
        let stats = render(&scene, &mut fb);
        assert!(stats.triangles_rasterized > 0);
        assert!(fb.as_bytes().len() == 32 * 32 * 4);
    }
}

#[cfg(test)]
mod shading_tests {
    use super::*;

    #[test]
    fn test_cube_shadows_floor_when_enabled() {
        let (mut scene, _) = build_scene(&VariantOptions::lit());
        let floor = scene.objects()[0].clone();
        // Straight below the cube centre along the key light direction
        let point = Vec3::new(0.0, 1.0, 0.0) - Vec3::new(3.0, 5.0, 2.0) / 5.0;

        let shadowed = shade(&scene, &floor, point, Vec3::Y);
        scene.shadows_enabled = false;
        let unshadowed = shade(&scene, &floor, point, Vec3::Y);

        assert!(
            shadowed.element_sum() < unshadowed.element_sum(),
            "{:?} vs {:?}",
            shadowed,
            unshadowed
        );
    }

    #[test]
    fn test_open_floor_is_not_shadowed() {
        let (mut scene, _) = build_scene(&VariantOptions::lit());
        let floor = scene.objects()[0].clone();
        let point = Vec3::new(-3.0, 0.0, 3.0);

        let with = shade(&scene, &floor, point, Vec3::Y);
        scene.shadows_enabled = false;
        let without = shade(&scene, &floor, point, Vec3::Y);

        assert!((with - without).length() < 1e-6);
    }

    #[test]
    fn test_ambient_only_ignores_normal() {
        let mut scene = Scene::new(Camera::default(), Vec3::ZERO);
        scene.add_light(Light::ambient(Vec3::ONE, 0.5));
        let object = SceneObject::cuboid("box", Vec3::ONE, Vec3::new(1.0, 0.5, 0.25));

        for normal in [Vec3::X, Vec3::NEG_Y, Vec3::Z] {
            let color = shade(&scene, &object, Vec3::ZERO, normal);
            assert!((color - Vec3::new(0.5, 0.25, 0.125)).length() < 1e-6);
        }
    }

    #[test]
    fn test_brighter_pulse_brightens_floor() {
        let (mut scene, handles) = build_scene(&VariantOptions::lit());
        let floor = scene.objects()[0].clone();
        let point = Vec3::new(0.0, 0.0, 1.5);

        let dim = {
            let mut updater = FrameUpdater::default();
            // s = 0 at three quarters of the period
            let trough = 3.0 * std::f32::consts::PI / (2.0 * 1.8);
            updater
                .update(trough, scene.update_targets(&handles).unwrap())
                .unwrap();
            shade(&scene, &floor, point, Vec3::Y)
        };
        let bright = {
            let mut updater = FrameUpdater::default();
            let peak = std::f32::consts::PI / (2.0 * 1.8);
            updater
                .update(peak, scene.update_targets(&handles).unwrap())
                .unwrap();
            shade(&scene, &floor, point, Vec3::Y)
        };

        assert!(bright.element_sum() > dim.element_sum());
    }
}
