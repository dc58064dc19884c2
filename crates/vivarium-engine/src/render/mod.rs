//! Windowed wgpu renderer for spawners.
//!
//! This module is feature-gated behind `renderer`. Without the feature it
//! compiles to nothing and the rest of the crate runs headless.
//!
//! [`GpuRenderer`] draws a [`ParticleSystem`](crate::batch::ParticleSystem)
//! as instanced textured meshes and the overlay's
//! [`DrawCommand`](crate::overlay::DrawCommand)s as flat quads on top.
//! [`run_windowed`] drives one spawner inside a winit event loop.

#[cfg(feature = "renderer")]
pub mod app;
#[cfg(feature = "renderer")]
pub mod gpu;

#[cfg(feature = "renderer")]
pub use app::run_windowed;
#[cfg(feature = "renderer")]
pub use gpu::{Camera2D, GpuRenderer};
