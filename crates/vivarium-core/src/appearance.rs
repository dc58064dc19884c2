//! Entity appearance configuration: sprite geometry plus one texture.
//!
//! The configuration system owns these values. Spawners only read them
//! after a change notification and derive their own render assets; they
//! never write back.

use std::sync::Arc;

use glam::Vec2;

/// Errors produced when constructing a [`SpriteTexture`].
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The RGBA byte count does not match `width * height * 4`.
    #[error("texture '{label}' is {width}x{height} and needs {expected} RGBA bytes, got {actual}")]
    SizeMismatch {
        label: String,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    /// A texture must have at least one pixel.
    #[error("texture '{label}' has zero width or height")]
    Empty { label: String },
}

/// Sprite geometry: a 2D triangle mesh with per-vertex UVs.
///
/// `triangles` indexes into `vertices` three at a time. `uv` must have one
/// entry per vertex; the engine rejects the geometry otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpriteGeometry {
    /// Vertex positions in sprite-local units.
    pub vertices: Vec<Vec2>,
    /// Triangle list, three indices per triangle.
    pub triangles: Vec<u16>,
    /// Texture coordinates, one per vertex.
    pub uv: Vec<Vec2>,
}

impl SpriteGeometry {
    /// A unit quad centered on the origin (two triangles, full UV range).
    pub fn unit_quad() -> Self {
        Self {
            vertices: vec![
                Vec2::new(-0.5, -0.5),
                Vec2::new(0.5, -0.5),
                Vec2::new(0.5, 0.5),
                Vec2::new(-0.5, 0.5),
            ],
            triangles: vec![0, 1, 2, 0, 2, 3],
            uv: vec![
                Vec2::new(0.0, 1.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(0.0, 0.0),
            ],
        }
    }
}

/// An RGBA8 texture referenced by an appearance.
///
/// Pixel data sits behind an `Arc`, so cloning a texture reference is
/// cheap and the same pixels can be shared by several materials.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteTexture {
    /// Human-readable name, used in logs.
    pub label: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Raw RGBA bytes, row-major, `width * height * 4` long.
    pub rgba: Arc<[u8]>,
}

impl SpriteTexture {
    /// Wrap raw RGBA data, checking the byte count against the dimensions.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError`] if either dimension is zero or the data
    /// length is not `width * height * 4`.
    pub fn from_rgba(
        label: impl Into<String>,
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    ) -> Result<Self, TextureError> {
        let label = label.into();
        if width == 0 || height == 0 {
            return Err(TextureError::Empty { label });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(TextureError::SizeMismatch {
                label,
                width,
                height,
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Self {
            label,
            width,
            height,
            rgba: rgba.into(),
        })
    }

    /// A 1x1 texture of a single color.
    pub fn solid(label: impl Into<String>, rgba: [u8; 4]) -> Self {
        Self {
            label: label.into(),
            width: 1,
            height: 1,
            rgba: Arc::from(rgba.as_slice()),
        }
    }
}

/// Everything needed to draw one entity: geometry and texture.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityAppearance {
    /// Sprite mesh.
    pub sprite: SpriteGeometry,
    /// Texture sampled by the sprite's UVs.
    pub texture: SpriteTexture,
}

impl EntityAppearance {
    /// A white unit quad. Handy default for scenes and tests.
    pub fn unit_quad() -> Self {
        Self {
            sprite: SpriteGeometry::unit_quad(),
            texture: SpriteTexture::solid("white", [255, 255, 255, 255]),
        }
    }
}
