//! Integration tests for the debug overlay: what gets drawn, where, and
//! how the entity-count field reconciles edits.

use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec2;
use vivarium_core::prelude::*;
use vivarium_engine::bridge::BANNER;
use vivarium_engine::overlay::renderer::{NUMBER_FIELD_MAX_LEN, PANEL_COLOR};
use vivarium_engine::overlay::{FontFace, TextAnchor};
use vivarium_engine::prelude::*;

// ---------------------------------------------------------------------------
// Scripted surface
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Box { rect: Rect, color: [f32; 4] },
    Label { rect: Rect, text: String, style: LabelStyle },
    Field { rect: Rect, shown: String, max_len: usize },
}

/// Records every primitive and answers `text_field` from a script. With
/// nothing scripted the field returns its text unchanged.
struct ScriptedSurface {
    screen: Vec2,
    calls: Vec<Call>,
    edits: VecDeque<String>,
}

impl ScriptedSurface {
    fn new() -> Self {
        Self {
            screen: Vec2::new(3840.0, 2160.0),
            calls: Vec::new(),
            edits: VecDeque::new(),
        }
    }

    fn labels(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Label { .. }))
            .collect()
    }

    fn white_texts(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Label { text, style, .. } if style.color == [1.0; 4] => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn shown_in_field(&self) -> Option<String> {
        self.calls.iter().rev().find_map(|c| match c {
            Call::Field { shown, .. } => Some(shown.clone()),
            _ => None,
        })
    }
}

impl GuiSurface for ScriptedSurface {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn draw_box(&mut self, rect: Rect, color: [f32; 4]) {
        self.calls.push(Call::Box { rect, color });
    }

    fn draw_label(&mut self, rect: Rect, text: &str, style: &LabelStyle) {
        self.calls.push(Call::Label {
            rect,
            text: text.to_owned(),
            style: *style,
        });
    }

    fn measure_text(&self, text: &str, style: &LabelStyle) -> Vec2 {
        Vec2::new(text.len() as f32 * style.font_size * 0.5, style.font_size)
    }

    fn text_field(&mut self, rect: Rect, text: &str, max_len: usize, _style: &LabelStyle) -> String {
        self.calls.push(Call::Field {
            rect,
            shown: text.to_owned(),
            max_len,
        });
        self.edits.pop_front().unwrap_or_else(|| text.to_owned())
    }
}

fn bound_bridge(count: i32) -> (SimulationBridgeSpawner<Vec<EntityRecord>>, Rc<SceneContext>) {
    let scene = Rc::new(SceneContext::default());
    let settings = SpawnerSettings {
        number_of_entities: count,
        ..Default::default()
    };
    let spawner = SimulationBridgeSpawner::enabled(
        settings,
        vec![EntityRecord::default(); 3],
        ParticleSystem::new(),
        scene.clone(),
    );
    (spawner, scene)
}

// ---------------------------------------------------------------------------
// Number field
// ---------------------------------------------------------------------------

#[test]
fn typing_12a_keeps_value_and_shows_text() {
    let (mut spawner, _scene) = bound_bridge(7);
    let mut surface = ScriptedSurface::new();

    surface.edits.push_back("12a".to_owned());
    spawner.on_gui(&mut surface);
    assert_eq!(spawner.settings().number_of_entities, 7);

    let mut next = ScriptedSurface::new();
    spawner.on_gui(&mut next);
    assert_eq!(next.shown_in_field().as_deref(), Some("12a"));
    assert_eq!(spawner.settings().number_of_entities, 7);
}

#[test]
fn parseable_edit_updates_value() {
    let (mut spawner, _scene) = bound_bridge(7);
    let mut surface = ScriptedSurface::new();
    surface.edits.push_back(" 25".to_owned());

    spawner.on_gui(&mut surface);

    assert_eq!(spawner.settings().number_of_entities, 25);
    let mut next = ScriptedSurface::new();
    spawner.on_gui(&mut next);
    assert_eq!(next.shown_in_field().as_deref(), Some(" 25"));
}

#[test]
fn external_change_refreshes_field() {
    let (mut spawner, _scene) = bound_bridge(7);
    spawner.on_gui(&mut ScriptedSurface::new());

    spawner.settings_mut().number_of_entities = 99;
    let mut surface = ScriptedSurface::new();
    spawner.on_gui(&mut surface);

    assert_eq!(surface.shown_in_field().as_deref(), Some("99"));
}

#[test]
fn field_is_limited_to_ten_characters() {
    let (mut spawner, _scene) = bound_bridge(7);
    let mut surface = ScriptedSurface::new();
    spawner.on_gui(&mut surface);
    let expected = UiMetrics::new(surface.screen).number_field(60.0);
    assert!(surface.calls.iter().any(|c| matches!(
        c,
        Call::Field { max_len, rect, .. } if *max_len == NUMBER_FIELD_MAX_LEN && *rect == expected
    )));
    assert_eq!(NUMBER_FIELD_MAX_LEN, 10);
}

// ---------------------------------------------------------------------------
// Layout and content
// ---------------------------------------------------------------------------

#[test]
fn base_overlay_draws_stats_label_and_banner() {
    let (mut spawner, _scene) = bound_bridge(10);
    spawner.update();
    let mut surface = ScriptedSurface::new();

    assert!(spawner.on_gui(&mut surface));

    assert_eq!(
        surface.white_texts(),
        vec![
            "Entities: 3".to_owned(),
            "Global Scale: 0.5".to_owned(),
            "Global Alpha: 1".to_owned(),
            "Global Speed: 5".to_owned(),
            "Number of Entities [10]:".to_owned(),
            BANNER.to_owned(),
        ]
    );
}

#[test]
fn every_label_has_a_black_shadow_offset_by_four_units() {
    let (mut spawner, _scene) = bound_bridge(10);
    let mut surface = ScriptedSurface::new();
    spawner.on_gui(&mut surface);

    let labels = surface.labels();
    assert_eq!(labels.len() % 2, 0);
    for pair in labels.chunks(2) {
        let (
            Call::Label {
                rect: shadow,
                style: s,
                text: a,
            },
            Call::Label {
                rect: front,
                style: f,
                text: b,
            },
        ) = (pair[0], pair[1])
        else {
            panic!("expected label pairs");
        };
        assert_eq!(a, b);
        assert_eq!(s.color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(f.color, [1.0; 4]);
        // coeff is 1 at 2160 px.
        assert_eq!(shadow.x - front.x, 4.0);
        assert_eq!(shadow.y - front.y, 4.0);
        assert_eq!(f.font_size, 60.0);
    }
}

#[test]
fn stat_frame_fits_four_lines_plus_dropped_line() {
    let (mut spawner, _scene) = bound_bridge(2);
    spawner.update();
    let mut surface = ScriptedSurface::new();
    spawner.on_gui(&mut surface);

    let metrics = UiMetrics::new(surface.screen);
    let Some(Call::Box { rect, color }) = surface.calls.first() else {
        panic!("stat frame should be drawn first");
    };
    assert_eq!(*color, PANEL_COLOR);
    assert_eq!(*rect, metrics.stat_frame(5));
    assert!(surface
        .white_texts()
        .contains(&"Dropped: 1 over capacity".to_owned()));
}

#[test]
fn name_banner_is_italic_and_bottom_left() {
    let (mut spawner, _scene) = bound_bridge(10);
    let mut surface = ScriptedSurface::new();
    spawner.on_gui(&mut surface);

    let banner = surface
        .calls
        .iter()
        .rev()
        .find_map(|c| match c {
            Call::Label { rect, text, style } if text == BANNER => Some((*rect, *style)),
            _ => None,
        })
        .expect("banner drawn");
    assert_eq!(banner.1.face, FontFace::Italic);
    assert_eq!(banner.1.anchor, TextAnchor::LowerLeft);
    assert!(banner.0.x < surface.screen.x / 2.0);
    assert!(banner.0.y > surface.screen.y / 2.0);
}

#[test]
fn hidden_overlay_draws_nothing() {
    let (mut spawner, scene) = bound_bridge(10);
    scene.set_gui_visibility(false);
    let mut surface = ScriptedSurface::new();
    assert!(!spawner.on_gui(&mut surface));
    assert!(surface.calls.is_empty());
}

// ---------------------------------------------------------------------------
// Draw list surface end to end
// ---------------------------------------------------------------------------

#[test]
fn draw_list_typing_12a_is_shown_verbatim() {
    let (mut spawner, _scene) = bound_bridge(7);
    let mut surface = DrawListSurface::new(Vec2::new(1920.0, 1080.0));

    // Frame 1: click into the field, clear it, type "12a".
    surface.begin_frame(Vec2::new(1920.0, 1080.0));
    let metrics = UiMetrics::new(Vec2::new(1920.0, 1080.0));
    let style = LabelStyle::new(metrics.font_size());
    let label_height = surface.measure_text("Number of Entities [7]:", &style).y;
    let field = metrics.number_field(label_height);
    surface.click(Vec2::new(field.x + 5.0, field.y + 5.0));
    surface.push_input(TextInput::Clear);
    surface.type_str("12a");
    spawner.on_gui(&mut surface);
    surface.finish_frame();

    assert_eq!(surface.focused_field(), Some(0));
    assert_eq!(spawner.settings().number_of_entities, 7);
    assert_eq!(
        spawner.core().overlay().and_then(|o| o.number_text()),
        Some("12a")
    );

    // Frame 2: no input, the text survives.
    surface.begin_frame(Vec2::new(1920.0, 1080.0));
    spawner.on_gui(&mut surface);
    let commands = surface.finish_frame();
    assert!(!commands.is_empty());
    assert_eq!(
        spawner.core().overlay().and_then(|o| o.number_text()),
        Some("12a")
    );
}
