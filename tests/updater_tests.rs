use glam::Vec3;
use orbit_scene::light::Light;
use orbit_scene::transform::Transform;
use orbit_scene::updater::{FrameUpdater, StepError, UpdateTargets, DEFAULT_ORBIT_RADIUS};

struct Targets {
    spinner: Transform,
    orbiter: Transform,
    light: Light,
}

impl Targets {
    fn at_rest() -> Self {
        Self {
            spinner: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            orbiter: Transform::from_position(Vec3::new(2.0, 1.0, 0.0)),
            light: Light::point(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE, 1.0),
        }
    }

    fn borrow(&mut self) -> UpdateTargets<'_> {
        UpdateTargets {
            spinner: &mut self.spinner,
            orbiter: &mut self.orbiter,
            lights: vec![&mut self.light],
        }
    }

    fn planar_distance(&self) -> f32 {
        let d = self.orbiter.position - self.spinner.position;
        (d.x * d.x + d.z * d.z).sqrt()
    }
}

#[cfg(test)]
mod frame_update_tests {
    use super::*;

    #[test]
    fn test_orbit_distance_is_radius_for_any_step() {
        for dt in [0.0, 1e-4, 0.016, 0.25, 1.0, 7.3, 1000.0] {
            let mut t = Targets::at_rest();
            let mut updater = FrameUpdater::default();
            updater.update(dt, t.borrow()).unwrap();

            assert!(
                (t.planar_distance() - DEFAULT_ORBIT_RADIUS).abs() < 1e-4,
                "dt {} gave distance {}",
                dt,
                t.planar_distance()
            );
            assert_eq!(t.orbiter.position.y, t.spinner.position.y);
        }
    }

    #[test]
    fn test_one_second_from_rest() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        updater.update(1.0, t.borrow()).unwrap();

        let expected = Vec3::new(1.0806, 1.0, 1.6829);
        assert!(
            (t.orbiter.position - expected).length() < 1e-3,
            "orbiter at {:?}",
            t.orbiter.position
        );
        assert!((t.spinner.rotation.x - 0.6).abs() < 1e-6);
        assert!((t.spinner.rotation.y - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_peaks_at_quarter_period() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        let peak = std::f32::consts::PI / (2.0 * 1.8);
        updater.update(peak, t.borrow()).unwrap();

        assert!((updater.blend() - 1.0).abs() < 1e-5);
        assert!((t.light.intensity - 5.0).abs() < 1e-4);
        assert!((t.light.color - updater.config().color_to).length() < 1e-4);
    }

    #[test]
    fn test_blend_and_intensity_stay_in_range() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();

        for _ in 0..2000 {
            updater.update(0.0137, t.borrow()).unwrap();
            let s = updater.blend();
            assert!((0.0..=1.0).contains(&s), "s = {}", s);
            assert!(
                (1.0..=5.0).contains(&t.light.intensity),
                "intensity = {}",
                t.light.intensity
            );
        }
    }

    #[test]
    fn test_zero_step_changes_nothing() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        updater.update(0.7, t.borrow()).unwrap();

        let (spinner, orbiter, light) = (t.spinner, t.orbiter, t.light);
        let state = *updater.state();

        updater.update(0.0, t.borrow()).unwrap();

        assert_eq!(*updater.state(), state);
        assert_eq!(t.spinner, spinner);
        assert_eq!(t.orbiter, orbiter);
        assert_eq!(t.light.intensity, light.intensity);
        assert_eq!(t.light.color, light.color);
    }

    #[test]
    fn test_two_half_steps_match_one_step() {
        let mut split = Targets::at_rest();
        let mut whole = Targets::at_rest();
        let mut a = FrameUpdater::default();
        let mut b = FrameUpdater::default();

        a.update(0.35, split.borrow()).unwrap();
        a.update(0.35, split.borrow()).unwrap();
        b.update(0.7, whole.borrow()).unwrap();

        assert!((a.state().spin - b.state().spin).length() < 1e-6);
        assert!((a.state().orbit_angle - b.state().orbit_angle).abs() < 1e-6);
        assert!((split.orbiter.position - whole.orbiter.position).length() < 1e-5);
    }

    #[test]
    fn test_angles_are_not_wrapped() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        updater.update(20.0, t.borrow()).unwrap();

        assert!((updater.state().orbit_angle - 20.0).abs() < 1e-4);
        assert!((t.spinner.rotation.y - 24.0).abs() < 1e-4);
    }

    #[test]
    fn test_long_running_stays_finite() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        for _ in 0..100 {
            updater.update(1.0e6, t.borrow()).unwrap();
        }

        assert!(updater.state().spin.is_finite());
        assert!(updater.state().orbit_angle.is_finite());
        assert!(t.orbiter.position.is_finite());
        assert!(t.light.intensity.is_finite());
        assert!(t.light.color.is_finite());
        assert!((t.planar_distance() - DEFAULT_ORBIT_RADIUS).abs() < 1e-2);
    }

    #[test]
    fn test_invalid_steps_are_rejected() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();

        assert_eq!(updater.update(-0.016, t.borrow()), Err(StepError::Negative(-0.016)));
        assert!(matches!(
            updater.update(f32::INFINITY, t.borrow()),
            Err(StepError::NonFinite(_))
        ));
        assert_eq!(updater.state().orbit_angle, 0.0);
        assert_eq!(t.orbiter.position, Vec3::new(2.0, 1.0, 0.0));
    }

    #[test]
    fn test_orbit_follows_moved_spinner() {
        let mut t = Targets::at_rest();
        let mut updater = FrameUpdater::default();
        t.spinner.position = Vec3::new(-3.0, 0.5, 4.0);
        updater.update(0.1, t.borrow()).unwrap();

        assert!((t.planar_distance() - DEFAULT_ORBIT_RADIUS).abs() < 1e-5);
        assert_eq!(t.orbiter.position.y, 0.5);
    }
}
