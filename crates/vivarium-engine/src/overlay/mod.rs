//! Immediate-mode debug overlay.
//!
//! - [`Drawer`] is what spawners draw with.
//! - [`OverlayRenderer`] implements it over any [`GuiSurface`], keeping
//!   only the number field's text between frames.
//! - [`DrawListSurface`] is a CPU [`GuiSurface`] that turns the overlay
//!   into [`DrawCommand`] rectangles.

pub mod draw_list;
pub mod glyphs;
pub mod renderer;
pub mod surface;

pub use draw_list::{DrawCommand, DrawListSurface, TextInput};
pub use glyphs::GlyphFont;
pub use renderer::{OverlayPass, OverlayRenderer};
pub use surface::{FontFace, GuiSurface, LabelStyle, Rect, TextAnchor, UiMetrics};

/// Overlay drawing operations available to a spawner.
pub trait Drawer {
    /// Translucent panel behind `count` stat lines.
    fn draw_stat_frame(&mut self, count: usize);

    /// One stat line at slot `index`, with a drop shadow.
    fn draw_stat(&mut self, index: usize, text: &str);

    /// Italic name banner in the bottom-left corner.
    fn draw_name(&mut self, label: &str);

    /// Labelled integer field bound to `number`. Only parseable edits are
    /// written back.
    fn draw_get_number(&mut self, label: &str, number: &mut i32);
}
