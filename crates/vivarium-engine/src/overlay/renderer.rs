//! The spawner debug overlay: stat panel, name banner, entity-count editor.

use glam::Vec2;

use super::surface::{FontFace, GuiSurface, LabelStyle, Rect, TextAnchor, UiMetrics};
use super::Drawer;

/// Maximum characters accepted by the number field.
pub const NUMBER_FIELD_MAX_LEN: usize = 10;

/// Backing panel color: black at 20% alpha.
pub const PANEL_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 0.2];

const SHADOW_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const TEXT_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Parse user text as an integer. Surrounding whitespace and a leading
/// sign are accepted.
pub fn parse_number(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

/// Per-spawner overlay state.
///
/// Styling and layout are recomputed on every call; only the number
/// field's text survives between frames.
#[derive(Debug, Default)]
pub struct OverlayRenderer {
    number_text: Option<String>,
}

impl OverlayRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently shown in the number field, if it has been drawn.
    pub fn number_text(&self) -> Option<&str> {
        self.number_text.as_deref()
    }

    /// Refresh the cached text from `number` when the cache is unset or
    /// parses to a different value. Unparsable text is kept.
    pub fn reconcile(&mut self, number: i32) -> &str {
        let stale = match self.number_text.as_deref() {
            None => true,
            Some(text) => parse_number(text).is_some_and(|parsed| parsed != number),
        };
        if stale {
            self.number_text = Some(number.to_string());
        }
        self.number_text.as_deref().unwrap_or_default()
    }

    /// Apply the field's text after editing. Parseable text is written to
    /// `number`; the text is cached either way.
    pub fn accept_edit(&mut self, text: String, number: &mut i32) {
        if let Some(parsed) = parse_number(&text) {
            if parsed != *number {
                tracing::debug!(from = *number, to = parsed, "entity count edited");
            }
            *number = parsed;
        }
        self.number_text = Some(text);
    }

    /// Start drawing one frame onto `surface`.
    pub fn begin<'a>(&'a mut self, surface: &'a mut dyn GuiSurface) -> OverlayPass<'a> {
        let metrics = UiMetrics::new(surface.screen_size());
        OverlayPass {
            overlay: self,
            surface,
            metrics,
        }
    }
}

/// One frame of overlay drawing.
pub struct OverlayPass<'a> {
    overlay: &'a mut OverlayRenderer,
    surface: &'a mut dyn GuiSurface,
    metrics: UiMetrics,
}

impl OverlayPass<'_> {
    pub fn metrics(&self) -> &UiMetrics {
        &self.metrics
    }

    fn stat_style(&self) -> LabelStyle {
        LabelStyle::new(self.metrics.font_size())
    }

    fn shadowed_label(&mut self, rect: Rect, text: &str, style: LabelStyle) {
        let offset = Vec2::splat(self.metrics.shadow_offset());
        self.surface
            .draw_label(rect.translate(offset), text, &style.with_color(SHADOW_COLOR));
        self.surface
            .draw_label(rect, text, &style.with_color(TEXT_COLOR));
    }
}

impl Drawer for OverlayPass<'_> {
    fn draw_stat_frame(&mut self, count: usize) {
        let frame = self.metrics.stat_frame(count);
        self.surface.draw_box(frame, PANEL_COLOR);
    }

    fn draw_stat(&mut self, index: usize, text: &str) {
        let rect = self.metrics.stat_line(index);
        let style = self.stat_style();
        self.shadowed_label(rect, text, style);
    }

    fn draw_name(&mut self, label: &str) {
        let style = self
            .stat_style()
            .with_face(FontFace::Italic)
            .with_anchor(TextAnchor::LowerLeft);
        let size = self.surface.measure_text(label, &style);
        self.surface
            .draw_box(self.metrics.name_frame(size), PANEL_COLOR);
        let strip = self.metrics.name_strip();
        self.shadowed_label(strip, label, style);
    }

    fn draw_get_number(&mut self, label: &str, number: &mut i32) {
        let style = self.stat_style();
        let label_height = self.surface.measure_text(label, &style).y;

        self.surface
            .draw_box(self.metrics.number_panel(label_height), PANEL_COLOR);
        let label_rect = self.metrics.number_label();
        self.shadowed_label(label_rect, label, style);

        let field = self.metrics.number_field(label_height);
        let seeded = self.overlay.reconcile(*number).to_owned();
        let field_style = style.with_anchor(TextAnchor::MiddleLeft);
        let edited = self
            .surface
            .text_field(field, &seeded, NUMBER_FIELD_MAX_LEN, &field_style);
        self.overlay.accept_edit(edited, number);
    }
}
