pub mod clock;
pub mod gpu_context;
pub mod surface_renderer;
pub mod timer;
pub mod window;
