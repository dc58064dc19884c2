//! Per-entity records produced by an external simulation.
//!
//! A simulation owns its entities entirely. Once per frame a spawner reads
//! the current records, in order, through [`EntitySimulation::entities`]
//! and copies them into its render buffer. The spawner never allocates,
//! mutates, or frees individual records.

use glam::Vec3;

/// The visual state of one living entity for the current frame.
///
/// Records are plain `Copy` values so a simulation may compute them lazily
/// while the spawner iterates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityRecord {
    /// World position. The depth component is replaced by the layer when
    /// the record is rendered.
    pub position: Vec3,
    /// Rotation around the view axis, in degrees.
    pub rotation: f32,
    /// Per-axis scale.
    pub scale: Vec3,
    /// RGBA color, each channel `0.0..=1.0`.
    pub color: [f32; 4],
    /// Depth layer. Higher layers draw on top.
    pub layer: f32,
}

impl Default for EntityRecord {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: 0.0,
            scale: Vec3::ONE,
            color: [1.0, 1.0, 1.0, 1.0],
            layer: 0.0,
        }
    }
}

/// A source of entity records, read once per frame.
///
/// The iteration order defines buffer slot assignment: the i-th record
/// lands in slot i. Implementations must yield a finite sequence.
pub trait EntitySimulation {
    /// Iterate over the current entity records in slot order.
    fn entities(&self) -> impl Iterator<Item = EntityRecord> + '_;
}

impl EntitySimulation for [EntityRecord] {
    fn entities(&self) -> impl Iterator<Item = EntityRecord> + '_ {
        self.iter().copied()
    }
}

impl EntitySimulation for Vec<EntityRecord> {
    fn entities(&self) -> impl Iterator<Item = EntityRecord> + '_ {
        self.iter().copied()
    }
}
