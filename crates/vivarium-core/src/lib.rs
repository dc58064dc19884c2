//! Vivarium Core -- shared data model for living-entity spawners.
//!
//! This crate holds everything the spawners and their external collaborators
//! agree on: the per-entity records a simulation produces, the appearance
//! configuration (sprite geometry + texture) that defines how one entity
//! looks, the [`SpawnerContext`](context::SpawnerContext) boundary with its
//! change notification, and the tunable [`SpawnerSettings`](settings::SpawnerSettings).
//!
//! Nothing in here renders or simulates. The engine crate consumes these
//! types; simulations and configuration systems produce them.
//!
//! # Quick Start
//!
//! ```
//! use std::rc::Rc;
//! use vivarium_core::prelude::*;
//!
//! let context = Rc::new(SceneContext::new(EntityAppearance::unit_quad()));
//! let subscription = context.appearance_changed().subscribe();
//!
//! context.set_appearance(EntityAppearance::unit_quad());
//! assert_eq!(context.appearance_changed().take_pending(&subscription), 1);
//!
//! context.appearance_changed().unsubscribe(subscription);
//! assert_eq!(context.appearance_changed().subscriber_count(), 0);
//! ```

#![deny(unsafe_code)]

pub mod appearance;
pub mod context;
pub mod notify;
pub mod record;
pub mod settings;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

/// Re-export glam so collaborators build records with the same vector types.
pub use glam;

// ---------------------------------------------------------------------------
// Prelude
// ---------------------------------------------------------------------------

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::appearance::{EntityAppearance, SpriteGeometry, SpriteTexture, TextureError};
    pub use crate::context::{SceneContext, SpawnerContext};
    pub use crate::notify::{ChangeNotifier, Subscription};
    pub use crate::record::{EntityRecord, EntitySimulation};
    pub use crate::settings::{SettingsError, SpawnerSettings, MAX_ENTITIES};
    pub use glam::{Vec2, Vec3};
}
