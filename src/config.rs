//! Startup configuration: JSON file, then command-line overrides, then validation.

use std::path::Path;

use anyhow::{ensure, Context, Result};
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::clock::DEFAULT_MAX_DELTA;
use crate::core::window::DEFAULT_MAX_PIXEL_RATIO;
use crate::scene::VariantOptions;
use crate::updater::UpdaterConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Initial logical size
    pub width: u32,
    pub height: u32,
    pub title: String,
    pub max_pixel_ratio: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            title: "Orbit Scene".to_string(),
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockConfig {
    /// Longest frame delta fed to the animation, seconds
    pub max_delta: f32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            max_delta: DEFAULT_MAX_DELTA,
        }
    }
}

/// Everything fixed at startup. Missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub variant: VariantOptions,
    pub animation: UpdaterConfig,
    pub window: WindowConfig,
    pub clock: ClockConfig,
}

impl SceneConfig {
    pub fn with_variant(variant: VariantOptions) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid scene configuration")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&json).with_context(|| format!("parsing {}", path.display()))?;
        log::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing scene configuration")
    }

    /// Reject values the animation or renderer can't work with
    pub fn validate(&self) -> Result<()> {
        let a = &self.animation;
        ensure!(
            a.orbit_radius.is_finite() && a.orbit_radius > 0.0,
            "orbit radius must be positive, got {}",
            a.orbit_radius
        );
        ensure!(
            a.spin_rate.is_finite() && a.orbit_rate.is_finite() && a.pulse_frequency.is_finite(),
            "animation rates must be finite"
        );
        ensure!(
            a.intensity_min.is_finite() && a.intensity_max.is_finite(),
            "light intensities must be finite"
        );
        ensure!(
            0.0 <= a.intensity_min && a.intensity_min <= a.intensity_max,
            "light intensity range {}..{} must be ordered and non-negative",
            a.intensity_min,
            a.intensity_max
        );
        ensure!(
            unit_color(a.color_from) && unit_color(a.color_to),
            "pulse colours must have components in [0, 1]"
        );

        let ambient = self.variant.ambient_intensity;
        ensure!(
            ambient.is_finite() && ambient >= 0.0,
            "ambient intensity must be non-negative, got {ambient}"
        );

        let w = &self.window;
        ensure!(
            w.width > 0 && w.height > 0,
            "window size must be non-zero, got {}x{}",
            w.width,
            w.height
        );
        ensure!(
            w.max_pixel_ratio.is_finite() && w.max_pixel_ratio > 0.0,
            "max pixel ratio must be positive, got {}",
            w.max_pixel_ratio
        );

        let max_delta = self.clock.max_delta;
        ensure!(
            max_delta.is_finite() && max_delta > 0.0,
            "clock max delta must be positive, got {max_delta}"
        );
        Ok(())
    }
}

fn unit_color(c: Vec3) -> bool {
    c.is_finite() && c.cmpge(Vec3::ZERO).all() && c.cmple(Vec3::ONE).all()
}
