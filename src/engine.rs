//! Scene plus animation, driven one frame at a time.

use anyhow::{Context, Result};

use crate::config::SceneConfig;
use crate::core::window::WindowDimensions;
use crate::framebuffer::FrameBuffer;
use crate::light::Light;
use crate::raster::{self, RenderStats};
use crate::scene::{build_scene, Scene, SceneHandles, SceneObject};
use crate::updater::{AnimationState, FrameUpdater, StepError};

pub struct Engine {
    scene: Scene,
    handles: SceneHandles,
    updater: FrameUpdater,
}

impl Engine {
    /// Build the configured scene and write the initial animation state into it
    pub fn new(config: &SceneConfig) -> Result<Self> {
        let (mut scene, handles) = build_scene(&config.variant);

        for object in scene.objects() {
            object
                .mesh
                .validate()
                .with_context(|| format!("invalid mesh for {}", object.name))?;
        }

        let updater = FrameUpdater::new(config.animation);
        let targets = scene
            .update_targets(&handles)
            .context("scene handles do not resolve")?;
        updater.apply(targets);

        log::info!(
            "scene built: {} objects, {} lights, shadows {}",
            scene.objects().len(),
            scene.lights().len(),
            if scene.shadows_enabled { "on" } else { "off" }
        );

        Ok(Self {
            scene,
            handles,
            updater,
        })
    }

    /// Advance the animation by `dt` seconds
    pub fn step(&mut self, dt: f32) -> Result<(), StepError> {
        match self.scene.update_targets(&self.handles) {
            Some(targets) => self.updater.update(dt, targets),
            // Handles were resolved in `new` and the scene never loses entries
            None => Ok(()),
        }
    }

    /// Match the camera to a new viewport; empty sizes are ignored
    pub fn resize(&mut self, size: WindowDimensions) {
        if let Some(aspect) = size.aspect() {
            self.scene.camera.set_aspect(aspect);
            log::debug!("camera aspect {:.3}", aspect);
        }
    }

    pub fn render(&self, target: &mut FrameBuffer) -> RenderStats {
        raster::render(&self.scene, target)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn state(&self) -> &AnimationState {
        self.updater.state()
    }

    pub fn updater(&self) -> &FrameUpdater {
        &self.updater
    }

    pub fn spinner(&self) -> Option<&SceneObject> {
        self.scene.object(self.handles.spinner)
    }

    pub fn orbiter(&self) -> Option<&SceneObject> {
        self.scene.object(self.handles.orbiter)
    }

    /// First light driven by the pulse
    pub fn pulse_light(&self) -> Option<&Light> {
        self.handles
            .pulse_lights
            .first()
            .and_then(|&id| self.scene.light(id))
    }
}
