// cli.rs - Command-line interface configuration
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};

use crate::config::SceneConfig;
use crate::scene::VariantOptions;

pub const DEFAULT_HEADLESS_FRAMES: u64 = 120;
pub const DEFAULT_HEADLESS_DT: f32 = 1.0 / 60.0;

/// Preset scene variants
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Two directional lights
    Basic,
    /// Shadows, ambient fill and a point light
    Lit,
}

impl Variant {
    pub fn options(self) -> VariantOptions {
        match self {
            Variant::Basic => VariantOptions::basic(),
            Variant::Lit => VariantOptions::lit(),
        }
    }
}

#[derive(Parser, Debug, Clone)]
#[command(name = "orbit-scene")]
#[command(about = "Spinning cube, orbiting sphere and a pulsing light", long_about = None)]
pub struct Cli {
    /// Disable UI elements and console output
    #[arg(long = "no-ui", default_value = "false")]
    pub no_ui: bool,

    /// JSON scene configuration
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Preset; replaces the variant section of --config
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,

    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub shadows: Option<bool>,

    #[arg(long = "point-light", num_args = 0..=1, default_missing_value = "true")]
    pub point_light: Option<bool>,

    /// Ambient light intensity, 0 disables it
    #[arg(long)]
    pub ambient: Option<f32>,

    /// Run without a window and exit
    #[arg(long)]
    pub headless: bool,

    /// Frames to simulate in headless mode
    #[arg(long, default_value_t = DEFAULT_HEADLESS_FRAMES)]
    pub frames: u64,

    /// Seconds per headless frame
    #[arg(long, default_value_t = DEFAULT_HEADLESS_DT, allow_negative_numbers = true)]
    pub dt: f32,

    /// Write the last headless frame as PNG (file or directory)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    /// Log filter, e.g. "debug" or "orbit_scene=trace"
    #[arg(long = "log")]
    pub log: Option<String>,
}

impl Cli {
    /// Load `--config` (or defaults), apply overrides and validate
    pub fn scene_config(&self) -> Result<SceneConfig> {
        let mut config = match &self.config {
            Some(path) => SceneConfig::load(path)?,
            None => SceneConfig::default(),
        };
        self.apply_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&self, config: &mut SceneConfig) {
        if let Some(variant) = self.variant {
            config.variant = variant.options();
        }
        if let Some(shadows) = self.shadows {
            config.variant.shadows_enabled = shadows;
        }
        if let Some(point_light) = self.point_light {
            config.variant.point_light_enabled = point_light;
        }
        if let Some(ambient) = self.ambient {
            config.variant.ambient_intensity = ambient;
        }
        if let Some(width) = self.width {
            config.window.width = width;
        }
        if let Some(height) = self.height {
            config.window.height = height;
        }
    }
}
