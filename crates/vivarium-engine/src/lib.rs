//! Vivarium Engine -- spawners that bridge entity simulations to a batched
//! particle renderer, plus an immediate-mode debug overlay.
//!
//! A [`Spawner`](spawner::Spawner) binds to a
//! [`SpawnerContext`](vivarium_core::context::SpawnerContext), reacts to
//! appearance changes, and owns its selection state. The
//! [`SimulationBridgeSpawner`](bridge::SimulationBridgeSpawner) copies an
//! external simulation's [`EntityRecord`](vivarium_core::record::EntityRecord)s
//! into a fixed-capacity [`ParticleBuffer`](particle::ParticleBuffer) every
//! frame and submits it to a [`BatchedRenderer`](batch::BatchedRenderer).
//!
//! The overlay draws through the [`GuiSurface`](overlay::GuiSurface) trait.
//! [`DrawListSurface`](overlay::DrawListSurface) implements it on the CPU,
//! producing [`DrawCommand`](overlay::DrawCommand)s, so everything except
//! the windowed runner works headless.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use vivarium_core::prelude::*;
//! use vivarium_engine::prelude::*;
//!
//! let context = Rc::new(SceneContext::default());
//! let records: Vec<EntityRecord> = (0..3)
//!     .map(|i| EntityRecord { position: Vec3::new(i as f32, 0.0, 0.0), ..Default::default() })
//!     .collect();
//!
//! let mut spawner = SimulationBridgeSpawner::new(
//!     SpawnerSettings::default(),
//!     records,
//!     ParticleSystem::new(),
//! );
//! spawner.enable(Some(context.clone()));
//! spawner.set_selected(true, RuntimeState::Playing);
//!
//! let report = spawner.update();
//! assert_eq!(report.written, 3);
//! assert_eq!(spawner.entities_count(), 3);
//! ```

#![deny(unsafe_code)]

pub mod batch;
pub mod bridge;
pub mod mesh;
pub mod overlay;
pub mod particle;
pub mod render;
pub mod spawner;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export the core crate for convenience.
pub use vivarium_core;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common engine usage.
pub mod prelude {
    pub use crate::batch::{BatchedRenderer, ParticleSystem};
    pub use crate::bridge::SimulationBridgeSpawner;
    pub use crate::mesh::{MeshError, RenderMaterial, RenderMesh, RenderMode};
    pub use crate::overlay::{
        DrawCommand, DrawListSurface, Drawer, GuiSurface, LabelStyle, OverlayRenderer, Rect,
        TextInput, UiMetrics,
    };
    pub use crate::particle::{Particle, ParticleBuffer, SyncReport};
    pub use crate::spawner::{RuntimeState, Spawner, SpawnerCore};
}
