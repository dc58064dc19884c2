//! Render assets derived from an entity appearance.
//!
//! [`RenderMesh`] is the sprite geometry promoted to 3D with a uniform
//! white vertex color. [`RenderMaterial`] pairs the sprite texture with the
//! instanced sprite shader.

use glam::{Vec2, Vec3};
use vivarium_core::appearance::{SpriteGeometry, SpriteTexture};

/// Shader used for instanced sprite particles.
pub const SPRITE_SHADER: &str = "unlit/simple_sprite";

/// Keyword that switches the sprite shader to per-particle instance data.
pub const PARTICLE_INSTANCING_KEYWORD: &str = "USE_IN_PARTICLE";

/// Geometry invariant violations found while building a [`RenderMesh`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    #[error("sprite geometry has no vertices")]
    Empty,

    #[error("sprite geometry has {vertices} vertices but {uvs} uvs")]
    UvCountMismatch { vertices: usize, uvs: usize },

    #[error("mesh has {vertices} vertices but {colors} vertex colors")]
    ColorCountMismatch { vertices: usize, colors: usize },

    #[error("index count {indices} is not a multiple of 3")]
    IncompleteTriangle { indices: usize },

    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
}

/// A triangle mesh ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMesh {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
    pub uvs: Vec<Vec2>,
    pub colors: Vec<[f32; 4]>,
}

impl RenderMesh {
    /// Build a mesh from sprite geometry.
    ///
    /// Vertices get `z = 0`, indices are widened to `u32`, and every vertex
    /// is colored white so the particle color alone tints the sprite.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError`] if the geometry is inconsistent.
    pub fn from_sprite(sprite: &SpriteGeometry) -> Result<Self, MeshError> {
        let mesh = Self {
            positions: sprite.vertices.iter().map(|v| v.extend(0.0)).collect(),
            indices: sprite.triangles.iter().map(|&i| u32::from(i)).collect(),
            uvs: sprite.uv.clone(),
            colors: vec![[1.0; 4]; sprite.vertices.len()],
        };
        mesh.validate()?;
        Ok(mesh)
    }

    /// Check that vertex, UV and color counts agree and every index is in
    /// range.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> Result<(), MeshError> {
        let vertices = self.positions.len();
        if vertices == 0 {
            return Err(MeshError::Empty);
        }
        if self.uvs.len() != vertices {
            return Err(MeshError::UvCountMismatch {
                vertices,
                uvs: self.uvs.len(),
            });
        }
        if self.colors.len() != vertices {
            return Err(MeshError::ColorCountMismatch {
                vertices,
                colors: self.colors.len(),
            });
        }
        if self.indices.len() % 3 != 0 {
            return Err(MeshError::IncompleteTriangle {
                indices: self.indices.len(),
            });
        }
        if let Some(&index) = self.indices.iter().find(|&&i| i as usize >= vertices) {
            return Err(MeshError::IndexOutOfRange {
                index,
                vertex_count: vertices,
            });
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Material for the mesh render path.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderMaterial {
    /// Shader identifier.
    pub shader: &'static str,
    /// Sprite texture sampled by the mesh UVs.
    pub texture: SpriteTexture,
    /// Tint multiplied with texture and particle color.
    pub color: [f32; 4],
    /// Draw all particles in one instanced call.
    pub enable_instancing: bool,
    /// Enabled shader keywords.
    pub keywords: Vec<&'static str>,
}

impl RenderMaterial {
    /// The instanced sprite material: white tint, instancing on, particle
    /// instancing keyword enabled.
    pub fn instanced_sprite(texture: SpriteTexture) -> Self {
        Self {
            shader: SPRITE_SHADER,
            texture,
            color: [1.0; 4],
            enable_instancing: true,
            keywords: vec![PARTICLE_INSTANCING_KEYWORD],
        }
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.iter().any(|k| *k == keyword)
    }
}

/// How the batched renderer draws each particle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Camera-facing quad. What a renderer does before any mesh is installed.
    #[default]
    Billboard,
    /// The installed [`RenderMesh`], one instance per particle.
    Mesh,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_quad_builds() {
        let mesh = RenderMesh::from_sprite(&SpriteGeometry::unit_quad()).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
        assert!(mesh.colors.iter().all(|c| *c == [1.0; 4]));
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn uv_mismatch_rejected() {
        let mut sprite = SpriteGeometry::unit_quad();
        sprite.uv.pop();
        assert_eq!(
            RenderMesh::from_sprite(&sprite),
            Err(MeshError::UvCountMismatch { vertices: 4, uvs: 3 })
        );
    }

    #[test]
    fn partial_triangle_rejected() {
        let mut sprite = SpriteGeometry::unit_quad();
        sprite.triangles.push(1);
        assert!(matches!(
            RenderMesh::from_sprite(&sprite),
            Err(MeshError::IncompleteTriangle { indices: 7 })
        ));
    }

    #[test]
    fn out_of_range_index_rejected() {
        let mut sprite = SpriteGeometry::unit_quad();
        sprite.triangles[5] = 9;
        assert!(matches!(
            RenderMesh::from_sprite(&sprite),
            Err(MeshError::IndexOutOfRange { index: 9, vertex_count: 4 })
        ));
    }

    #[test]
    fn empty_geometry_rejected() {
        assert_eq!(
            RenderMesh::from_sprite(&SpriteGeometry::default()),
            Err(MeshError::Empty)
        );
    }

    #[test]
    fn instanced_sprite_material_flags() {
        let mat = RenderMaterial::instanced_sprite(SpriteTexture::solid("w", [255; 4]));
        assert_eq!(mat.shader, SPRITE_SHADER);
        assert!(mat.enable_instancing);
        assert!(mat.has_keyword(PARTICLE_INSTANCING_KEYWORD));
        assert_eq!(mat.color, [1.0; 4]);
    }
}
