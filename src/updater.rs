//! Per-frame animation of the orbit scene.
//!
//! [`FrameUpdater`] owns the accumulated animation state (spin angles, orbit
//! angle, light phase) and writes the derived values into the handful of
//! scene fields handed to it through [`UpdateTargets`]. It never touches the
//! rest of the scene, so it can be driven by the window loop, the headless
//! runner or a test with plain values.

use std::fmt;

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::light::Light;
use crate::math::{hex_rgb, lerp_rgb};
use crate::transform::Transform;

pub const DEFAULT_SPIN_RATE: Vec2 = Vec2::new(0.6, 1.2);
pub const DEFAULT_ORBIT_RATE: f32 = 1.0;
pub const DEFAULT_ORBIT_RADIUS: f32 = 2.0;
pub const DEFAULT_PULSE_FREQUENCY: f32 = 1.8;
pub const DEFAULT_INTENSITY_RANGE: (f32, f32) = (1.0, 5.0);
pub const DEFAULT_PULSE_FROM: u32 = 0xff8833;
pub const DEFAULT_PULSE_TO: u32 = 0x3388ff;

/// Fixed animation constants, chosen once at startup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdaterConfig {
    /// Spin rates about the X and Y axes, radians per second
    pub spin_rate: Vec2,
    /// Orbit angular speed, radians per second
    pub orbit_rate: f32,
    pub orbit_radius: f32,
    /// Angular frequency of the light pulse, radians per second
    pub pulse_frequency: f32,
    pub intensity_min: f32,
    pub intensity_max: f32,
    pub color_from: Vec3,
    pub color_to: Vec3,
}

impl Default for UpdaterConfig {
    fn default() -> Self {
        Self {
            spin_rate: DEFAULT_SPIN_RATE,
            orbit_rate: DEFAULT_ORBIT_RATE,
            orbit_radius: DEFAULT_ORBIT_RADIUS,
            pulse_frequency: DEFAULT_PULSE_FREQUENCY,
            intensity_min: DEFAULT_INTENSITY_RANGE.0,
            intensity_max: DEFAULT_INTENSITY_RANGE.1,
            color_from: hex_rgb(DEFAULT_PULSE_FROM),
            color_to: hex_rgb(DEFAULT_PULSE_TO),
        }
    }
}

/// Accumulated animation state. Angles are never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationState {
    /// Spin about X (`x`) and Y (`y`), radians
    pub spin: Vec2,
    pub orbit_angle: f32,
    /// Seconds fed into the light pulse
    pub light_phase: f32,
}

impl AnimationState {
    fn advance(&mut self, dt: f32, config: &UpdaterConfig) {
        self.spin += config.spin_rate * dt;
        self.orbit_angle += config.orbit_rate * dt;
        self.light_phase += dt;
    }
}

/// Scene fields written by [`FrameUpdater::update`]
#[derive(Debug)]
pub struct UpdateTargets<'a> {
    /// Rotation is written; position is read as the orbit centre
    pub spinner: &'a mut Transform,
    /// Position is written
    pub orbiter: &'a mut Transform,
    /// Colour and intensity are written
    pub lights: Vec<&'a mut Light>,
}

/// Rejected time step. State is left untouched when this is returned.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepError {
    NonFinite(f32),
    Negative(f32),
}

impl fmt::Display for StepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepError::NonFinite(dt) => write!(f, "time step is not finite: {dt}"),
            StepError::Negative(dt) => write!(f, "time step is negative: {dt}"),
        }
    }
}

impl std::error::Error for StepError {}

/// Accept finite, non-negative time steps
pub fn validate_delta(dt: f32) -> Result<f32, StepError> {
    if !dt.is_finite() {
        Err(StepError::NonFinite(dt))
    } else if dt < 0.0 {
        Err(StepError::Negative(dt))
    } else {
        Ok(dt)
    }
}

/// Point on the horizontal circle of `radius` around `center`
pub fn orbit_position(center: Vec3, angle: f32, radius: f32) -> Vec3 {
    let (sin, cos) = angle.sin_cos();
    Vec3::new(center.x + cos * radius, center.y, center.z + sin * radius)
}

/// Pulse parameter in [0, 1]
pub fn blend_factor(phase: f32, frequency: f32) -> f32 {
    // sin may overshoot 1.0 by an ulp for large arguments
    (((phase * frequency).sin() + 1.0) * 0.5).clamp(0.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct FrameUpdater {
    config: UpdaterConfig,
    state: AnimationState,
}

impl FrameUpdater {
    pub fn new(config: UpdaterConfig) -> Self {
        Self {
            config,
            state: AnimationState::default(),
        }
    }

    pub fn config(&self) -> &UpdaterConfig {
        &self.config
    }

    pub fn state(&self) -> &AnimationState {
        &self.state
    }

    /// Advance by `dt` seconds and write the result into `targets`
    pub fn update(&mut self, dt: f32, targets: UpdateTargets<'_>) -> Result<(), StepError> {
        let dt = validate_delta(dt)?;
        self.state.advance(dt, &self.config);
        self.apply(targets);
        Ok(())
    }

    /// Write the current state without advancing it
    pub fn apply(&self, targets: UpdateTargets<'_>) {
        let UpdateTargets {
            spinner,
            orbiter,
            lights,
        } = targets;

        spinner.rotation.x = self.state.spin.x;
        spinner.rotation.y = self.state.spin.y;

        orbiter.position = orbit_position(
            spinner.position,
            self.state.orbit_angle,
            self.config.orbit_radius,
        );

        let intensity = self.pulse_intensity();
        let color = self.pulse_color();
        for light in lights {
            light.intensity = intensity;
            light.color = color;
        }
    }

    pub fn blend(&self) -> f32 {
        blend_factor(self.state.light_phase, self.config.pulse_frequency)
    }

    pub fn pulse_intensity(&self) -> f32 {
        let UpdaterConfig {
            intensity_min,
            intensity_max,
            ..
        } = self.config;
        intensity_min + (intensity_max - intensity_min) * self.blend()
    }

    pub fn pulse_color(&self) -> Vec3 {
        lerp_rgb(self.config.color_from, self.config.color_to, self.blend())
    }
}

impl Default for FrameUpdater {
    fn default() -> Self {
        Self::new(UpdaterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Rig {
        spinner: Transform,
        orbiter: Transform,
        light: Light,
    }

    impl Rig {
        fn new() -> Self {
            Self {
                spinner: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
                orbiter: Transform::from_position(Vec3::new(2.0, 1.0, 0.0)),
                light: Light::point(Vec3::new(0.0, 3.0, 0.0), Vec3::ONE, 1.0),
            }
        }

        fn targets(&mut self) -> UpdateTargets<'_> {
            UpdateTargets {
                spinner: &mut self.spinner,
                orbiter: &mut self.orbiter,
                lights: vec![&mut self.light],
            }
        }
    }

    #[test]
    fn test_validate_delta() {
        assert_eq!(validate_delta(0.0), Ok(0.0));
        assert_eq!(validate_delta(0.016), Ok(0.016));
        assert_eq!(validate_delta(-0.1), Err(StepError::Negative(-0.1)));
        assert!(matches!(validate_delta(f32::NAN), Err(StepError::NonFinite(_))));
        assert!(matches!(
            validate_delta(f32::INFINITY),
            Err(StepError::NonFinite(_))
        ));
    }

    #[test]
    fn test_rejected_step_leaves_state_untouched() {
        let mut rig = Rig::new();
        let mut updater = FrameUpdater::default();
        updater.update(0.5, rig.targets()).unwrap();

        let state = *updater.state();
        let spinner = rig.spinner;
        assert!(updater.update(f32::NAN, rig.targets()).is_err());
        assert!(updater.update(-1.0, rig.targets()).is_err());
        assert_eq!(*updater.state(), state);
        assert_eq!(rig.spinner, spinner);
    }

    #[test]
    fn test_spin_rates_are_independent() {
        let mut rig = Rig::new();
        let mut updater = FrameUpdater::default();
        updater.update(2.0, rig.targets()).unwrap();

        assert!((rig.spinner.rotation.x - 1.2).abs() < 1e-6);
        assert!((rig.spinner.rotation.y - 2.4).abs() < 1e-6);
        assert_eq!(rig.spinner.rotation.z, 0.0);
    }

    #[test]
    fn test_orbit_position_on_circle() {
        let p = orbit_position(Vec3::new(1.0, 2.0, 3.0), 0.0, 2.0);
        assert_eq!(p, Vec3::new(3.0, 2.0, 3.0));

        let q = orbit_position(Vec3::ZERO, std::f32::consts::FRAC_PI_2, 2.0);
        assert!((q - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-6);
    }

    #[test]
    fn test_blend_factor_extremes() {
        let peak = std::f32::consts::FRAC_PI_2 / 1.8;
        assert!((blend_factor(peak, 1.8) - 1.0).abs() < 1e-6);
        assert!((blend_factor(0.0, 1.8) - 0.5).abs() < 1e-6);
        assert!(blend_factor(3.0 * peak, 1.8).abs() < 1e-6);
    }

    #[test]
    fn test_pulse_writes_every_light() {
        let mut spinner = Transform::default();
        let mut orbiter = Transform::default();
        let mut a = Light::directional(Vec3::Y, Vec3::ZERO, Vec3::ONE, 0.9);
        let mut b = Light::point(Vec3::Y, Vec3::ONE, 1.0);

        let mut updater = FrameUpdater::default();
        updater
            .update(
                0.25,
                UpdateTargets {
                    spinner: &mut spinner,
                    orbiter: &mut orbiter,
                    lights: vec![&mut a, &mut b],
                },
            )
            .unwrap();

        assert_eq!(a.intensity, updater.pulse_intensity());
        assert_eq!(b.intensity, updater.pulse_intensity());
        assert_eq!(a.color, b.color);
    }

    #[test]
    fn test_no_lights_is_fine() {
        let mut spinner = Transform::default();
        let mut orbiter = Transform::default();
        let mut updater = FrameUpdater::default();
        let targets = UpdateTargets {
            spinner: &mut spinner,
            orbiter: &mut orbiter,
            lights: Vec::new(),
        };
        assert!(updater.update(0.1, targets).is_ok());
        assert!((orbiter.position.length() - DEFAULT_ORBIT_RADIUS).abs() < 1e-5);
    }
}
