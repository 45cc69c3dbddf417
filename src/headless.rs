//! Windowless runs: fixed time steps through the same engine, optional PNG.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use glam::{Vec2, Vec3};

use crate::config::SceneConfig;
use crate::core::timer::EveryNTicks;
use crate::core::window::WindowDimensions;
use crate::engine::Engine;
use crate::frame::FixedStepFrames;
use crate::framebuffer::FrameBuffer;
use crate::raster::RenderStats;

const PROGRESS_EVERY: u64 = 60;

#[derive(Debug, Clone)]
pub struct HeadlessOptions {
    pub frames: u64,
    pub dt: f32,
    pub size: WindowDimensions,
    pub snapshot: Option<PathBuf>,
}

/// State after the last headless frame
#[derive(Debug, Clone)]
pub struct HeadlessReport {
    pub frames: u64,
    pub elapsed: f32,
    pub spin: Vec2,
    pub orbit_angle: f32,
    pub orbiter_position: Vec3,
    pub light_intensity: f32,
    pub light_color: Vec3,
    pub render: RenderStats,
    pub snapshot: Option<PathBuf>,
}

pub fn run(config: &SceneConfig, options: &HeadlessOptions) -> Result<HeadlessReport> {
    anyhow::ensure!(
        !options.size.is_empty(),
        "headless frame size must be non-zero, got {}x{}",
        options.size.width,
        options.size.height
    );

    let mut engine = Engine::new(config)?;
    engine.resize(options.size);

    let mut progress = EveryNTicks::new(PROGRESS_EVERY);
    let mut elapsed = 0.0;
    for frame in FixedStepFrames::new(options.frames, options.dt) {
        engine
            .step(frame.delta)
            .with_context(|| format!("frame {}", frame.number))?;
        elapsed = frame.time;
        if progress.tick() {
            log::debug!("frame {} at {:.2}s", frame.number, frame.time);
        }
    }

    let mut framebuffer = FrameBuffer::new(options.size.width, options.size.height);
    let render = engine.render(&mut framebuffer);

    let snapshot = match &options.snapshot {
        Some(path) => {
            let path = snapshot_path(path, Local::now());
            write_png(&framebuffer, &path)?;
            log::info!("wrote {}", path.display());
            Some(path)
        }
        None => None,
    };

    let state = engine.state();
    let orbiter_position = engine
        .orbiter()
        .map(|o| o.transform.position)
        .unwrap_or(Vec3::ZERO);
    let (light_intensity, light_color) = engine
        .pulse_light()
        .map(|l| (l.intensity, l.color))
        .unwrap_or((0.0, Vec3::ZERO));

    let report = HeadlessReport {
        frames: options.frames,
        elapsed,
        spin: state.spin,
        orbit_angle: state.orbit_angle,
        orbiter_position,
        light_intensity,
        light_color,
        render,
        snapshot,
    };
    log::info!(
        "{} frames over {:.3}s: spin ({:.4}, {:.4}), orbiter ({:.4}, {:.4}, {:.4}), light {:.3}",
        report.frames,
        report.elapsed,
        report.spin.x,
        report.spin.y,
        report.orbiter_position.x,
        report.orbiter_position.y,
        report.orbiter_position.z,
        report.light_intensity,
    );
    log::debug!("last frame: {:?}", report.render);
    Ok(report)
}

/// A directory gets a timestamped file name inside it
pub fn snapshot_path(path: &Path, now: DateTime<Local>) -> PathBuf {
    if path.is_dir() {
        path.join(format!("orbit-scene-{}.png", now.format("%Y%m%d-%H%M%S")))
    } else {
        path.to_path_buf()
    }
}

pub fn write_png(framebuffer: &FrameBuffer, path: &Path) -> Result<()> {
    let (width, height) = framebuffer.dimensions();
    let image = image::RgbaImage::from_raw(width, height, framebuffer.as_bytes().to_vec())
        .context("framebuffer size mismatch")?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("writing {}", path.display()))
}
