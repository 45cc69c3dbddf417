use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use orbit_scene::cli::Cli;
use orbit_scene::config::SceneConfig;
use orbit_scene::core::clock::Clock;
use orbit_scene::core::surface_renderer::{Presented, SurfaceRenderer};
use orbit_scene::core::timer::FpsCounter;
use orbit_scene::core::window::{Viewport, WindowDimensions};
use orbit_scene::engine::Engine;
use orbit_scene::frame::FrameCounter;
use orbit_scene::framebuffer::FrameBuffer;
use orbit_scene::headless::{self, HeadlessOptions};
use orbit_scene::logging::{init_logging, LoggingConfig};

const FPS_UPDATE_INTERVAL: f32 = 1.0;

// === Application ===

struct App {
    config: SceneConfig,
    show_fps: bool,
    engine: Engine,
    framebuffer: FrameBuffer,
    window: Option<Arc<Window>>,
    presenter: Option<SurfaceRenderer>,
    viewport: Option<Viewport>,
    clock: Clock,
    frames: FrameCounter,
    fps: FpsCounter,
    error: Option<anyhow::Error>,
}

impl App {
    fn new(config: SceneConfig, show_fps: bool) -> Result<Self> {
        let engine = Engine::new(&config)?;
        let framebuffer = FrameBuffer::new(config.window.width, config.window.height);
        let clock = Clock::new(config.clock.max_delta);

        Ok(Self {
            config,
            show_fps,
            engine,
            framebuffer,
            window: None,
            presenter: None,
            viewport: None,
            clock,
            frames: FrameCounter::new(),
            fps: FpsCounter::new(FPS_UPDATE_INTERVAL),
            error: None,
        })
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{error:#}");
        self.error = Some(error);
        event_loop.exit();
    }

    fn create_window(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(attributes)
                .context("failed to create window")?,
        );

        let size = window.inner_size();
        let viewport = Viewport::new(
            WindowDimensions::new(size.width, size.height),
            window.scale_factor(),
            self.config.window.max_pixel_ratio,
        );
        let render_size = viewport.render_size();

        let presenter = SurfaceRenderer::new(window.clone(), render_size)
            .map_err(|e| anyhow!("failed to initialize presentation: {e}"))?;

        log::info!(
            "window {}x{} at scale {:.2}, rendering {}x{}",
            size.width,
            size.height,
            window.scale_factor(),
            render_size.width,
            render_size.height
        );

        self.engine.resize(viewport.physical());
        self.framebuffer.resize(render_size.width, render_size.height);
        self.viewport = Some(viewport);
        self.presenter = Some(presenter);
        self.window = Some(window);
        self.clock.reset();
        Ok(())
    }

    fn handle_resize(&mut self, physical: WindowDimensions) {
        let Some(viewport) = self.viewport.as_mut() else {
            return;
        };
        viewport.set_physical(physical);
        if physical.is_empty() {
            // Minimized; keep the last sizes until the window comes back
            return;
        }

        let render_size = viewport.render_size();
        self.engine.resize(physical);
        self.framebuffer.resize(render_size.width, render_size.height);
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.resize(physical);
        }
        log::debug!(
            "resized to {}x{}, rendering {}x{}",
            physical.width,
            physical.height,
            render_size.width,
            render_size.height
        );
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let delta = self.clock.tick();
        let frame = self.frames.advance(delta);

        if let Err(e) = self.engine.step(frame.delta) {
            log::warn!("frame {} skipped: {}", frame.number, e);
        }

        if self.show_fps {
            if let Some(fps) = self.fps.tick(frame.delta) {
                log::info!("FPS: {:.1}", fps);
            }
        }

        let Some(render_size) = self.viewport.map(|v| v.render_size()) else {
            return;
        };
        if render_size.is_empty() {
            return;
        }
        self.framebuffer.resize(render_size.width, render_size.height);
        self.engine.render(&mut self.framebuffer);

        let Some(presenter) = self.presenter.as_mut() else {
            return;
        };
        match presenter.present(self.framebuffer.as_bytes(), render_size) {
            Ok(Presented::Shown) => {}
            Ok(Presented::Skipped) => log::debug!("frame {} not presented", frame.number),
            Err(e) => self.fail(event_loop, anyhow!("render error: {e}")),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.create_window(event_loop) {
                self.fail(event_loop, e);
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        state: ElementState::Pressed,
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => event_loop.exit(),
            WindowEvent::Resized(size) => {
                self.handle_resize(WindowDimensions::new(size.width, size.height));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(viewport) = self.viewport.as_mut() {
                    viewport.set_scale_factor(scale_factor);
                }
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.handle_resize(WindowDimensions::new(size.width, size.height));
                }
            }
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(LoggingConfig {
        env_filter: cli.log.clone(),
        ..Default::default()
    });

    let config = cli.scene_config()?;

    if cli.headless {
        let options = HeadlessOptions {
            frames: cli.frames,
            dt: cli.dt,
            size: WindowDimensions::new(config.window.width, config.window.height),
            snapshot: cli.snapshot.clone(),
        };
        headless::run(&config, &options)?;
        return Ok(());
    }

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let mut app = App::new(config, !cli.no_ui)?;

    if !cli.no_ui {
        log::info!("Orbit Scene - Escape to quit");
    }
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
