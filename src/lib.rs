//! undula
//!
//! A small cross-platform rendering demo: one subdivided plane, displaced by a
//! height map, masked by an alpha map and lit by a single point light, with a
//! floating panel for tuning light and rotation values at runtime. The crate
//! keeps a minimal surface: a GPU context, one render pipeline, a CPU-side
//! scene and the winit event loop driving it, suitable for native targets and
//! the web.
//!
//! High-level modules
//! - `app`: event loop, pointer tracking and the per-frame render cycle
//! - `camera`: camera uniform and GPU resources for view/projection
//! - `clock`: monotonic elapsed-time source driving the animation
//! - `context`: central GPU and window context that owns device/queue/surface
//! - `data_structures`: CPU scene data (plane grid, material, scene objects, textures)
//! - `panel`: the tuning panel and its field bindings
//! - `pipelines`: the relief render pipeline and its shader
//! - `render`: GPU resources and the draw call for the plane
//! - `resources`: asynchronous texture loading
//! - `uniforms`: plain-old-data uniform blocks shared with the shader
//!

pub mod app;
pub mod camera;
pub mod clock;
pub mod context;
pub mod data_structures;
pub mod panel;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod uniforms;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::WindowEvent;
pub use wgpu::*;
