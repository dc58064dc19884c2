//! The boundary between spawners and the scene that hosts them.
//!
//! A [`SpawnerContext`] answers three questions for a spawner: what do the
//! entities look like right now, has that changed, and should the debug
//! overlay be drawn. [`SceneContext`] is the stock implementation.

use std::cell::{Cell, RefCell};

use crate::appearance::EntityAppearance;
use crate::notify::ChangeNotifier;

/// Services a spawner consumes from its host scene.
pub trait SpawnerContext {
    /// Current entity appearance (pulled on activation and on change).
    fn appearance(&self) -> EntityAppearance;

    /// Notifier raised whenever [`appearance`](Self::appearance) changes.
    fn appearance_changed(&self) -> &ChangeNotifier;

    /// Whether debug overlays should be drawn this frame.
    fn gui_visibility(&self) -> bool;
}

/// A scene-level context shared by every spawner in the scene.
///
/// Interior mutability lets the scene update appearance and overlay
/// visibility while spawners hold `Rc<SceneContext>` references.
#[derive(Debug)]
pub struct SceneContext {
    appearance: RefCell<EntityAppearance>,
    gui_visible: Cell<bool>,
    changed: ChangeNotifier,
}

impl SceneContext {
    /// Create a context with the given appearance. The overlay starts visible.
    pub fn new(appearance: EntityAppearance) -> Self {
        Self {
            appearance: RefCell::new(appearance),
            gui_visible: Cell::new(true),
            changed: ChangeNotifier::new(),
        }
    }

    /// Replace the appearance and broadcast the change.
    ///
    /// Returns the number of subscribers notified.
    pub fn set_appearance(&self, appearance: EntityAppearance) -> usize {
        *self.appearance.borrow_mut() = appearance;
        let notified = self.changed.notify();
        tracing::debug!(notified, "entity appearance changed");
        notified
    }

    /// Show or hide debug overlays.
    pub fn set_gui_visibility(&self, visible: bool) {
        self.gui_visible.set(visible);
    }

    /// Flip overlay visibility and return the new value.
    pub fn toggle_gui_visibility(&self) -> bool {
        let visible = !self.gui_visible.get();
        self.gui_visible.set(visible);
        visible
    }
}

impl Default for SceneContext {
    fn default() -> Self {
        Self::new(EntityAppearance::unit_quad())
    }
}

impl SpawnerContext for SceneContext {
    fn appearance(&self) -> EntityAppearance {
        self.appearance.borrow().clone()
    }

    fn appearance_changed(&self) -> &ChangeNotifier {
        &self.changed
    }

    fn gui_visibility(&self) -> bool {
        self.gui_visible.get()
    }
}
