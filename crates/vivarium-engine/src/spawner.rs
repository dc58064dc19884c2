//! The spawner lifecycle shared by every spawner variant.
//!
//! A spawner is bound to at most one [`SpawnerContext`] at a time and holds
//! at most one change subscription. Selection only changes while the host
//! is [`RuntimeState::Playing`], and every change fires exactly one of the
//! select / deselect hooks.
//!
//! Variants embed a [`SpawnerCore`] and implement the required hooks of
//! [`Spawner`]; everything else (binding, selection, change dispatch, the
//! debug overlay) comes from provided methods.

use std::fmt;
use std::rc::Rc;

use vivarium_core::context::SpawnerContext;
use vivarium_core::notify::Subscription;
use vivarium_core::settings::SpawnerSettings;

use crate::overlay::{Drawer, GuiSurface, OverlayRenderer};

/// Host runtime state. Selection is frozen outside [`Playing`](Self::Playing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeState {
    /// Scene is being edited; spawners exist but do not run.
    #[default]
    Editing,
    /// Scene is running.
    Playing,
}

/// State every spawner carries: settings, selection, context binding and
/// the lazily created overlay.
pub struct SpawnerCore {
    pub settings: SpawnerSettings,
    selected: bool,
    context: Option<Rc<dyn SpawnerContext>>,
    subscription: Option<Subscription>,
    overlay: Option<OverlayRenderer>,
}

impl SpawnerCore {
    pub fn new(settings: SpawnerSettings) -> Self {
        Self {
            settings,
            selected: false,
            context: None,
            subscription: None,
            overlay: None,
        }
    }

    /// The bound context, if any.
    pub fn context(&self) -> Option<&Rc<dyn SpawnerContext>> {
        self.context.as_ref()
    }

    pub fn is_bound(&self) -> bool {
        self.context.is_some()
    }

    pub fn is_selected(&self) -> bool {
        self.selected
    }

    /// The overlay renderer, once the overlay has been drawn at least once.
    pub fn overlay(&self) -> Option<&OverlayRenderer> {
        self.overlay.as_ref()
    }

    /// Attach to `context` and subscribe to its appearance changes. An
    /// existing binding is released first.
    pub fn bind(&mut self, context: Rc<dyn SpawnerContext>) {
        self.unbind();
        let subscription = context.appearance_changed().subscribe();
        tracing::debug!(subscription = subscription.id(), "spawner bound to context");
        self.subscription = Some(subscription);
        self.context = Some(context);
    }

    /// Unsubscribe, then drop the context. No-op when unbound.
    pub fn unbind(&mut self) {
        let Some(context) = self.context.take() else {
            return;
        };
        if let Some(subscription) = self.subscription.take() {
            let id = subscription.id();
            context.appearance_changed().unsubscribe(subscription);
            tracing::debug!(subscription = id, "spawner unbound from context");
        }
    }

    /// Drain change notifications received since the last call.
    pub fn pending_changes(&self) -> u32 {
        match (&self.context, &self.subscription) {
            (Some(context), Some(subscription)) => {
                context.appearance_changed().take_pending(subscription)
            }
            _ => 0,
        }
    }
}

impl Default for SpawnerCore {
    fn default() -> Self {
        Self::new(SpawnerSettings::default())
    }
}

impl fmt::Debug for SpawnerCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpawnerCore")
            .field("settings", &self.settings)
            .field("selected", &self.selected)
            .field("bound", &self.is_bound())
            .field("overlay", &self.overlay)
            .finish()
    }
}

impl Drop for SpawnerCore {
    fn drop(&mut self) {
        self.unbind();
    }
}

/// A unit of selection and lifecycle that renders a population of entities.
pub trait Spawner {
    fn core(&self) -> &SpawnerCore;

    fn core_mut(&mut self) -> &mut SpawnerCore;

    /// Called when the spawner becomes selected.
    fn on_spawner_selected(&mut self);

    /// Called when the spawner becomes deselected.
    fn on_spawner_deselected(&mut self);

    /// Live number of rendered entities. Polled every frame; no side effects.
    fn entities_count(&self) -> usize;

    /// Called once per appearance change notification.
    fn on_living_entity_data_changed(&mut self) {}

    /// Called right after a successful bind.
    fn on_enable(&mut self) {}

    /// Stat lines appended after the built-in four.
    fn extra_stats(&self) -> Vec<String> {
        Vec::new()
    }

    /// Draw this spawner's overlay. Variants extend it by drawing after
    /// [`draw_base_overlay`](Self::draw_base_overlay).
    fn perform_on_gui(&mut self, drawer: &mut dyn Drawer) {
        self.draw_base_overlay(drawer);
    }

    // -- provided ---------------------------------------------------------

    /// Activate: bind to `context` and run [`on_enable`](Self::on_enable).
    /// Silently does nothing without a context.
    fn enable(&mut self, context: Option<Rc<dyn SpawnerContext>>) {
        let Some(context) = context else {
            return;
        };
        self.core_mut().bind(context);
        self.on_enable();
    }

    /// Deactivate: unsubscribe and drop the context.
    fn disable(&mut self) {
        self.core_mut().unbind();
    }

    fn is_selected(&self) -> bool {
        self.core().is_selected()
    }

    /// Change selection. Ignored unless the host is playing; otherwise
    /// fires exactly one of the select / deselect hooks.
    fn set_selected(&mut self, selected: bool, runtime: RuntimeState) {
        if runtime != RuntimeState::Playing {
            return;
        }
        self.core_mut().selected = selected;
        tracing::debug!(selected, "spawner selection changed");
        if selected {
            self.on_spawner_selected();
        } else {
            self.on_spawner_deselected();
        }
    }

    /// Deliver pending appearance changes, one hook call per notification.
    /// Returns the number delivered.
    fn dispatch_context_changes(&mut self) -> u32 {
        let pending = self.core().pending_changes();
        for _ in 0..pending {
            self.on_living_entity_data_changed();
        }
        pending
    }

    /// Draw the debug overlay if the bound context wants it. The overlay
    /// renderer is created on the first visible frame.
    ///
    /// Returns `true` if anything was drawn.
    fn on_gui(&mut self, surface: &mut dyn GuiSurface) -> bool {
        let visible = self
            .core()
            .context()
            .is_some_and(|context| context.gui_visibility());
        if !visible {
            return false;
        }
        let mut overlay = self.core_mut().overlay.take().unwrap_or_default();
        {
            let mut pass = overlay.begin(surface);
            self.perform_on_gui(&mut pass);
        }
        self.core_mut().overlay = Some(overlay);
        true
    }

    /// Stat frame, the four built-in stats, any extra stats, and the
    /// entity-count editor.
    fn draw_base_overlay(&mut self, drawer: &mut dyn Drawer) {
        let extra = self.extra_stats();
        let count = self.entities_count();
        let settings = &self.core().settings;
        let stats = [
            format!("Entities: {count}"),
            format!("Global Scale: {}", settings.reference_scale),
            format!("Global Alpha: {}", settings.reference_alpha),
            format!("Global Speed: {}", settings.reference_speed),
        ];

        drawer.draw_stat_frame(stats.len() + extra.len());
        for (index, text) in stats.iter().chain(extra.iter()).enumerate() {
            drawer.draw_stat(index, text);
        }

        let settings = &mut self.core_mut().settings;
        let label = format!("Number of Entities [{}]:", settings.number_of_entities);
        drawer.draw_get_number(&label, &mut settings.number_of_entities);
    }
}
