//! Host GUI primitives and the overlay's screen layout.

use glam::Vec2;

/// Reference screen height the overlay was laid out for.
pub const REFERENCE_HEIGHT: f32 = 2160.0;

/// Screen-space rectangle, origin at the top-left corner, y pointing down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The same rectangle moved by `offset`.
    pub fn translate(self, offset: Vec2) -> Self {
        Self {
            x: self.x + offset.x,
            y: self.y + offset.y,
            ..self
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }
}

/// Typeface used for a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFace {
    #[default]
    Regular,
    Italic,
}

/// Where text sits inside its rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAnchor {
    #[default]
    UpperLeft,
    MiddleLeft,
    LowerLeft,
}

/// Per-call text styling. Nothing is cached between calls.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelStyle {
    /// Line height in screen pixels.
    pub font_size: f32,
    pub face: FontFace,
    pub color: [f32; 4],
    pub anchor: TextAnchor,
}

impl LabelStyle {
    pub fn new(font_size: f32) -> Self {
        Self {
            font_size,
            face: FontFace::Regular,
            color: [1.0; 4],
            anchor: TextAnchor::UpperLeft,
        }
    }

    pub fn with_color(self, color: [f32; 4]) -> Self {
        Self { color, ..self }
    }

    pub fn with_face(self, face: FontFace) -> Self {
        Self { face, ..self }
    }

    pub fn with_anchor(self, anchor: TextAnchor) -> Self {
        Self { anchor, ..self }
    }
}

/// Immediate-mode GUI primitives supplied by the host.
///
/// Every call draws for the current frame only. `text_field` is the one
/// interactive primitive: it returns the field's text after this frame's
/// input has been applied.
pub trait GuiSurface {
    /// Screen size in pixels.
    fn screen_size(&self) -> Vec2;

    /// Filled rectangle.
    fn draw_box(&mut self, rect: Rect, color: [f32; 4]);

    /// Single-line label positioned by `style.anchor`.
    fn draw_label(&mut self, rect: Rect, text: &str, style: &LabelStyle);

    /// Size `text` would occupy when drawn with `style`.
    fn measure_text(&self, text: &str, style: &LabelStyle) -> Vec2;

    /// Editable single-line field holding at most `max_len` characters.
    fn text_field(&mut self, rect: Rect, text: &str, max_len: usize, style: &LabelStyle) -> String;
}

/// Overlay layout derived from the screen size.
///
/// All distances scale with `coeff = screen_height / 2160`, so the overlay
/// keeps its proportions at any resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiMetrics {
    pub screen: Vec2,
    pub coeff: f32,
}

impl UiMetrics {
    pub fn new(screen: Vec2) -> Self {
        Self {
            screen,
            coeff: screen.y / REFERENCE_HEIGHT,
        }
    }

    pub fn small_margin(&self) -> f32 {
        16.0 * self.coeff
    }

    pub fn medium_margin(&self) -> f32 {
        48.0 * self.coeff
    }

    pub fn small_padding(&self) -> f32 {
        12.0 * self.coeff
    }

    pub fn font_size(&self) -> f32 {
        60.0 * self.coeff
    }

    /// Drop shadow displacement, applied to both axes.
    pub fn shadow_offset(&self) -> f32 {
        4.0 * self.coeff
    }

    /// Top-right rectangle the stat lines start in.
    pub fn stat_rect(&self) -> Rect {
        let width = 800.0 * self.coeff;
        Rect::new(
            self.screen.x - width - self.medium_margin(),
            self.medium_margin(),
            width,
            200.0 * self.coeff,
        )
    }

    /// Vertical distance between stat lines.
    pub fn stat_pitch(&self) -> f32 {
        self.font_size() + 50.0 * self.coeff
    }

    /// Backing panel for `count` stat lines.
    pub fn stat_frame(&self, count: usize) -> Rect {
        let stat = self.stat_rect();
        let small = self.small_margin();
        Rect::new(
            stat.x - small,
            stat.y - small,
            stat.width + 2.0 * small,
            count as f32 * self.stat_pitch() + small,
        )
    }

    /// Rectangle of stat line `index`.
    pub fn stat_line(&self, index: usize) -> Rect {
        self.stat_rect()
            .translate(Vec2::new(0.0, index as f32 * self.stat_pitch()))
    }

    /// Distance from the stat rectangle's top to the number panel.
    pub fn number_panel_offset(&self) -> f32 {
        800.0 * self.coeff
    }

    /// Backing panel for the number editor, given the label's height.
    pub fn number_panel(&self, label_height: f32) -> Rect {
        let stat = self.stat_rect();
        let small = self.small_margin();
        Rect::new(
            stat.x - small,
            stat.y + self.number_panel_offset() - small,
            stat.width + 2.0 * small,
            3.0 * small + self.small_padding() + 2.0 * label_height,
        )
    }

    pub fn number_label(&self) -> Rect {
        self.stat_rect()
            .translate(Vec2::new(0.0, self.number_panel_offset()))
    }

    /// The editable field below the number label.
    pub fn number_field(&self, label_height: f32) -> Rect {
        let stat = self.stat_rect();
        Rect::new(
            stat.x,
            stat.y + self.number_panel_offset() + label_height + self.small_margin(),
            stat.width,
            label_height + self.small_padding(),
        )
    }

    /// Bottom-left strip the name banner text is anchored in.
    pub fn name_strip(&self) -> Rect {
        let medium = self.medium_margin();
        Rect::new(
            medium,
            self.screen.y - 3.0 * medium,
            2000.0 * self.coeff,
            2.0 * medium,
        )
    }

    /// Margin around the name banner text.
    pub fn name_margin(&self) -> f32 {
        32.0 * self.coeff
    }

    /// Frame around a name banner whose text measures `text_size`.
    pub fn name_frame(&self, text_size: Vec2) -> Rect {
        let strip = self.name_strip();
        let margin = self.name_margin();
        Rect::new(
            strip.x - margin,
            strip.max_y() - text_size.y - margin,
            text_size.x + 2.0 * margin,
            text_size.y + 2.0 * margin,
        )
    }
}
