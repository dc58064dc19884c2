//! A CPU [`GuiSurface`] that records the overlay as colored rectangles.
//!
//! Boxes become one [`DrawCommand`] each. Text becomes one square per lit
//! glyph pixel, so the whole overlay goes through a single quad pipeline.
//! The text field takes focus from a click inside it and consumes queued
//! [`TextInput`] while focused.

use glam::Vec2;

use super::glyphs::{GlyphFont, GLYPH_HEIGHT};
use super::surface::{FontFace, GuiSurface, LabelStyle, Rect, TextAnchor};

/// Glyph rows plus one row of leading per line.
const LINE_ROWS: f32 = GLYPH_HEIGHT as f32 + 1.0;

/// Horizontal shift per glyph row for the italic face, in glyph pixels.
const ITALIC_SHEAR: f32 = 0.25;

const FIELD_COLOR: [f32; 4] = [0.1, 0.1, 0.1, 0.8];
const FIELD_FOCUSED_COLOR: [f32; 4] = [0.2, 0.2, 0.25, 0.9];

/// A screen-space colored rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Center X in screen pixels.
    pub x: f32,
    /// Center Y in screen pixels, growing downward.
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// RGBA color (each channel 0.0..1.0).
    pub color: [f32; 4],
}

impl DrawCommand {
    /// Command covering `rect`.
    pub fn from_rect(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            x: rect.x + rect.width / 2.0,
            y: rect.y + rect.height / 2.0,
            width: rect.width,
            height: rect.height,
            color,
        }
    }
}

/// Keyboard input for the focused text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextInput {
    /// Append a character.
    Char(char),
    /// Remove the last character.
    Backspace,
    /// Empty the field.
    Clear,
}

/// Immediate-mode surface producing a [`DrawCommand`] list per frame.
#[derive(Debug)]
pub struct DrawListSurface {
    screen: Vec2,
    font: GlyphFont,
    commands: Vec<DrawCommand>,
    pending_click: Option<Vec2>,
    pending_input: Vec<TextInput>,
    /// Focused field, by draw order within a frame.
    focused: Option<usize>,
    next_field: usize,
}

impl DrawListSurface {
    pub fn new(screen: Vec2) -> Self {
        Self {
            screen,
            font: GlyphFont::new(),
            commands: Vec::new(),
            pending_click: None,
            pending_input: Vec::new(),
            focused: None,
            next_field: 0,
        }
    }

    /// Start a frame at the given screen size, dropping last frame's
    /// commands.
    pub fn begin_frame(&mut self, screen: Vec2) {
        self.screen = screen;
        self.commands.clear();
        self.next_field = 0;
    }

    /// Register a mouse click for this frame. A click inside a text field
    /// focuses it; a click anywhere else drops focus.
    pub fn click(&mut self, position: Vec2) {
        self.pending_click = Some(position);
    }

    /// Queue input for the focused field.
    pub fn push_input(&mut self, input: TextInput) {
        self.pending_input.push(input);
    }

    /// Queue every character of `text`.
    pub fn type_str(&mut self, text: &str) {
        self.pending_input
            .extend(text.chars().map(TextInput::Char));
    }

    /// Focus the `index`-th text field drawn in a frame.
    pub fn focus_field(&mut self, index: usize) {
        self.focused = Some(index);
    }

    pub fn focused_field(&self) -> Option<usize> {
        self.focused
    }

    /// End the frame and hand over its commands. Unclaimed clicks clear
    /// focus; input nobody consumed is discarded.
    pub fn finish_frame(&mut self) -> Vec<DrawCommand> {
        if self.pending_click.take().is_some() {
            self.focused = None;
        }
        self.pending_input.clear();
        std::mem::take(&mut self.commands)
    }

    /// Commands recorded so far this frame.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Screen pixels per glyph pixel at `font_size`.
    pub fn glyph_scale(font_size: f32) -> f32 {
        font_size / LINE_ROWS
    }

    fn push_text(&mut self, origin: Vec2, text: &str, style: &LabelStyle) {
        let scale = Self::glyph_scale(style.font_size);
        let half = scale / 2.0;
        let advance = super::glyphs::GLYPH_ADVANCE as f32 * scale;
        for (index, ch) in text.chars().enumerate() {
            let char_x = origin.x + index as f32 * advance;
            for (row, col) in self.font.lit_pixels(ch) {
                let shear = match style.face {
                    FontFace::Regular => 0.0,
                    FontFace::Italic => (GLYPH_HEIGHT - 1 - row) as f32 * ITALIC_SHEAR * scale,
                };
                self.commands.push(DrawCommand {
                    x: char_x + col as f32 * scale + half + shear,
                    y: origin.y + row as f32 * scale + half,
                    width: scale,
                    height: scale,
                    color: style.color,
                });
            }
        }
    }

    /// Top-left corner of a text line inside `rect`.
    fn text_origin(rect: Rect, style: &LabelStyle) -> Vec2 {
        let y = match style.anchor {
            TextAnchor::UpperLeft => rect.y,
            TextAnchor::MiddleLeft => rect.y + (rect.height - style.font_size) / 2.0,
            TextAnchor::LowerLeft => rect.max_y() - style.font_size,
        };
        Vec2::new(rect.x, y)
    }

    fn apply_input(&mut self, text: &mut String, max_len: usize) {
        for input in self.pending_input.drain(..) {
            match input {
                TextInput::Char(ch) if !ch.is_control() => {
                    if text.chars().count() < max_len {
                        text.push(ch);
                    }
                }
                TextInput::Char(_) => {}
                TextInput::Backspace => {
                    text.pop();
                }
                TextInput::Clear => text.clear(),
            }
        }
    }
}

impl Default for DrawListSurface {
    fn default() -> Self {
        Self::new(Vec2::new(1920.0, 1080.0))
    }
}

impl GuiSurface for DrawListSurface {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn draw_box(&mut self, rect: Rect, color: [f32; 4]) {
        self.commands.push(DrawCommand::from_rect(rect, color));
    }

    fn draw_label(&mut self, rect: Rect, text: &str, style: &LabelStyle) {
        let origin = Self::text_origin(rect, style);
        self.push_text(origin, text, style);
    }

    fn measure_text(&self, text: &str, style: &LabelStyle) -> Vec2 {
        let scale = Self::glyph_scale(style.font_size);
        let slant = match style.face {
            FontFace::Regular => 0.0,
            FontFace::Italic => (GLYPH_HEIGHT - 1) as f32 * ITALIC_SHEAR * scale,
        };
        Vec2::new(self.font.text_width(text, scale) + slant, style.font_size)
    }

    fn text_field(&mut self, rect: Rect, text: &str, max_len: usize, style: &LabelStyle) -> String {
        let index = self.next_field;
        self.next_field += 1;

        if let Some(click) = self.pending_click {
            if rect.contains(click) {
                self.focused = Some(index);
                self.pending_click = None;
            }
        }

        let focused = self.focused == Some(index);
        let mut text = text.to_owned();
        if focused {
            self.apply_input(&mut text, max_len);
        }

        let background = if focused {
            FIELD_FOCUSED_COLOR
        } else {
            FIELD_COLOR
        };
        self.draw_box(rect, background);

        let inset = Self::glyph_scale(style.font_size) * 2.0;
        let inner = Rect::new(rect.x + inset, rect.y, rect.width - 2.0 * inset, rect.height);
        let origin = Self::text_origin(inner, style);
        self.push_text(origin, &text, style);

        if focused {
            let scale = Self::glyph_scale(style.font_size);
            let width = self.measure_text(&text, style).x;
            let caret_x = origin.x + width + if text.is_empty() { 0.0 } else { scale };
            let caret = Rect::new(caret_x, origin.y, scale, GLYPH_HEIGHT as f32 * scale);
            self.draw_box(caret, style.color);
        }

        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> LabelStyle {
        LabelStyle::new(16.0)
    }

    #[test]
    fn box_command_is_centered() {
        let mut surface = DrawListSurface::default();
        surface.draw_box(Rect::new(10.0, 20.0, 100.0, 40.0), [1.0; 4]);
        assert_eq!(
            surface.commands()[0],
            DrawCommand {
                x: 60.0,
                y: 40.0,
                width: 100.0,
                height: 40.0,
                color: [1.0; 4]
            }
        );
    }

    #[test]
    fn label_emits_one_square_per_lit_pixel() {
        let mut surface = DrawListSurface::default();
        let font = GlyphFont::new();
        surface.draw_label(Rect::new(0.0, 0.0, 100.0, 20.0), "1", &style());
        assert_eq!(surface.commands().len(), font.lit_pixels('1').count());
        assert!(surface.commands().iter().all(|c| c.width == 2.0));
    }

    #[test]
    fn italic_shears_top_rows_right() {
        let mut regular = DrawListSurface::default();
        let mut italic = DrawListSurface::default();
        let rect = Rect::new(0.0, 0.0, 100.0, 20.0);
        regular.draw_label(rect, "I", &style());
        italic.draw_label(rect, "I", &style().with_face(FontFace::Italic));
        let top_regular = regular.commands()[0];
        let top_italic = italic.commands()[0];
        assert!(top_italic.x > top_regular.x);
        assert_eq!(top_italic.y, top_regular.y);
    }

    #[test]
    fn lower_left_anchor_sits_on_rect_bottom() {
        let mut surface = DrawListSurface::default();
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        surface.draw_label(rect, "_", &style().with_anchor(TextAnchor::LowerLeft));
        let lowest = surface
            .commands()
            .iter()
            .map(|c| c.y + c.height / 2.0)
            .fold(f32::MIN, f32::max);
        assert!(lowest <= 100.0 && lowest >= 100.0 - 16.0);
    }

    #[test]
    fn typing_requires_focus() {
        let mut surface = DrawListSurface::default();
        let rect = Rect::new(0.0, 0.0, 100.0, 30.0);
        surface.type_str("5");
        assert_eq!(surface.text_field(rect, "1", 10, &style()), "1");
        surface.finish_frame();

        surface.begin_frame(Vec2::new(1920.0, 1080.0));
        surface.click(Vec2::new(5.0, 5.0));
        surface.type_str("5");
        assert_eq!(surface.text_field(rect, "1", 10, &style()), "15");
        surface.finish_frame();
        assert_eq!(surface.focused_field(), Some(0));
    }

    #[test]
    fn max_len_and_editing_keys() {
        let mut surface = DrawListSurface::default();
        surface.focus_field(0);
        surface.push_input(TextInput::Clear);
        surface.type_str("123456");
        surface.push_input(TextInput::Backspace);
        let rect = Rect::new(0.0, 0.0, 100.0, 30.0);
        assert_eq!(surface.text_field(rect, "99", 4, &style()), "123");
    }

    #[test]
    fn click_elsewhere_drops_focus() {
        let mut surface = DrawListSurface::default();
        surface.focus_field(0);
        surface.click(Vec2::new(500.0, 500.0));
        surface.text_field(Rect::new(0.0, 0.0, 10.0, 10.0), "", 10, &style());
        surface.finish_frame();
        assert_eq!(surface.focused_field(), None);
    }

    #[test]
    fn finish_frame_hands_over_commands() {
        let mut surface = DrawListSurface::default();
        surface.draw_box(Rect::new(0.0, 0.0, 1.0, 1.0), [1.0; 4]);
        assert_eq!(surface.finish_frame().len(), 1);
        assert!(surface.commands().is_empty());
    }
}
