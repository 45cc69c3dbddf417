pub mod camera;
pub mod cli;
pub mod config;
pub mod core;
pub mod engine;
pub mod frame;
pub mod framebuffer;
pub mod headless;
pub mod light;
pub mod logging;
pub mod math;
pub mod mesh;
pub mod raster;
pub mod scene;
pub mod transform;
pub mod updater;

pub use engine::Engine;
pub use scene::{build_scene, Scene, SceneHandles, VariantOptions};
pub use updater::{FrameUpdater, StepError, UpdateTargets, UpdaterConfig};
