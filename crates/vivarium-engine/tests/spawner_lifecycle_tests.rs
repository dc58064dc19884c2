//! Integration tests for the spawner lifecycle: binding, selection and
//! change dispatch. Pure CPU, no GPU context required.

use std::cell::RefCell;
use std::rc::Rc;

use vivarium_core::prelude::*;
use vivarium_engine::prelude::*;

// ---------------------------------------------------------------------------
// Recording spawner
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Selected,
    Deselected,
    DataChanged,
    Enabled,
}

struct Recorder {
    core: SpawnerCore,
    log: Rc<RefCell<Vec<Event>>>,
}

impl Recorder {
    fn new() -> (Self, Rc<RefCell<Vec<Event>>>) {
        let log = Rc::new(RefCell::new(Vec::new()));
        let spawner = Self {
            core: SpawnerCore::default(),
            log: log.clone(),
        };
        (spawner, log)
    }
}

impl Spawner for Recorder {
    fn core(&self) -> &SpawnerCore {
        &self.core
    }
    fn core_mut(&mut self) -> &mut SpawnerCore {
        &mut self.core
    }
    fn on_spawner_selected(&mut self) {
        self.log.borrow_mut().push(Event::Selected);
    }
    fn on_spawner_deselected(&mut self) {
        self.log.borrow_mut().push(Event::Deselected);
    }
    fn entities_count(&self) -> usize {
        42
    }
    fn on_living_entity_data_changed(&mut self) {
        self.log.borrow_mut().push(Event::DataChanged);
    }
    fn on_enable(&mut self) {
        self.log.borrow_mut().push(Event::Enabled);
    }
}

// ---------------------------------------------------------------------------
// Binding
// ---------------------------------------------------------------------------

#[test]
fn enable_binds_and_subscribes_once() {
    let scene = Rc::new(SceneContext::default());
    let (mut spawner, log) = Recorder::new();

    spawner.enable(Some(scene.clone()));

    assert!(spawner.core().is_bound());
    assert_eq!(scene.appearance_changed().subscriber_count(), 1);
    assert_eq!(*log.borrow(), vec![Event::Enabled]);
}

#[test]
fn disable_is_idempotent() {
    let scene = Rc::new(SceneContext::default());
    let (mut spawner, _log) = Recorder::new();

    spawner.disable();
    spawner.enable(Some(scene.clone()));
    spawner.disable();
    spawner.disable();

    assert!(!spawner.core().is_bound());
    assert_eq!(scene.appearance_changed().subscriber_count(), 0);
}

#[test]
fn rebinding_to_another_context_moves_the_subscription() {
    let first = Rc::new(SceneContext::default());
    let second = Rc::new(SceneContext::default());
    let (mut spawner, _log) = Recorder::new();

    spawner.enable(Some(first.clone()));
    spawner.enable(Some(second.clone()));

    assert_eq!(first.appearance_changed().subscriber_count(), 0);
    assert_eq!(second.appearance_changed().subscriber_count(), 1);
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

#[test]
fn select_then_deselect_fires_each_hook_once() {
    let (mut spawner, log) = Recorder::new();

    spawner.set_selected(true, RuntimeState::Playing);
    assert!(spawner.is_selected());
    spawner.set_selected(false, RuntimeState::Playing);
    assert!(!spawner.is_selected());

    assert_eq!(*log.borrow(), vec![Event::Selected, Event::Deselected]);
}

#[test]
fn selection_is_frozen_while_editing() {
    let (mut spawner, log) = Recorder::new();

    spawner.set_selected(true, RuntimeState::Editing);
    spawner.set_selected(false, RuntimeState::Editing);

    assert!(!spawner.is_selected());
    assert!(log.borrow().is_empty());
}

#[test]
fn selection_works_unbound() {
    let (mut spawner, log) = Recorder::new();
    spawner.set_selected(true, RuntimeState::Playing);
    assert_eq!(*log.borrow(), vec![Event::Selected]);
}

// ---------------------------------------------------------------------------
// Change dispatch
// ---------------------------------------------------------------------------

#[test]
fn each_notification_is_dispatched_once() {
    let scene = Rc::new(SceneContext::default());
    let (mut spawner, log) = Recorder::new();
    spawner.enable(Some(scene.clone()));
    log.borrow_mut().clear();

    scene.set_appearance(EntityAppearance::unit_quad());
    scene.set_appearance(EntityAppearance::unit_quad());

    assert_eq!(spawner.dispatch_context_changes(), 2);
    assert_eq!(spawner.dispatch_context_changes(), 0);
    assert_eq!(*log.borrow(), vec![Event::DataChanged, Event::DataChanged]);
}

#[test]
fn changes_after_disable_are_not_delivered() {
    let scene = Rc::new(SceneContext::default());
    let (mut spawner, log) = Recorder::new();
    spawner.enable(Some(scene.clone()));
    spawner.disable();
    log.borrow_mut().clear();

    assert_eq!(scene.set_appearance(EntityAppearance::unit_quad()), 0);
    assert_eq!(spawner.dispatch_context_changes(), 0);
    assert!(log.borrow().is_empty());
}

// ---------------------------------------------------------------------------
// Overlay invocation
// ---------------------------------------------------------------------------

#[test]
fn overlay_is_lazy_and_respects_visibility() {
    let scene = Rc::new(SceneContext::default());
    let (mut spawner, _log) = Recorder::new();
    let mut surface = DrawListSurface::default();

    // Unbound: nothing drawn, nothing created.
    assert!(!spawner.on_gui(&mut surface));
    assert!(spawner.core().overlay().is_none());

    spawner.enable(Some(scene.clone()));
    scene.set_gui_visibility(false);
    assert!(!spawner.on_gui(&mut surface));
    assert!(spawner.core().overlay().is_none());
    assert!(surface.commands().is_empty());

    scene.set_gui_visibility(true);
    assert!(spawner.on_gui(&mut surface));
    assert!(spawner.core().overlay().is_some());
    assert!(!surface.commands().is_empty());
    assert_eq!(spawner.core().overlay().and_then(|o| o.number_text()), Some("10"));
}
