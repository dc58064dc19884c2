//! Render-ready particle slots and the fixed-capacity buffer that holds them.

use glam::Vec3;
use vivarium_core::record::EntityRecord;

/// Lifetime given to every synced particle. Long enough that the renderer
/// never ages a particle out between two syncs.
pub const STATIC_LIFETIME: f32 = 1000.0;

/// One slot of the particle buffer, in the renderer's terms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// World position; `z` carries depth.
    pub position: Vec3,
    /// Rotation in degrees.
    pub rotation: f32,
    /// Always zero for synced particles: motion comes from the simulation.
    pub velocity: Vec3,
    /// RGBA color.
    pub start_color: [f32; 4],
    /// Per-axis size.
    pub start_size: Vec3,
    /// Lifetime the particle was created with.
    pub start_lifetime: f32,
    /// Lifetime left. Zero or less means the slot is dead.
    pub remaining_lifetime: f32,
}

impl Particle {
    /// A dead slot.
    pub const EXPIRED: Particle = Particle {
        position: Vec3::ZERO,
        rotation: 0.0,
        velocity: Vec3::ZERO,
        start_color: [0.0; 4],
        start_size: Vec3::ZERO,
        start_lifetime: 0.0,
        remaining_lifetime: 0.0,
    };

    /// Convert an entity record into a live particle.
    ///
    /// The record's layer replaces the depth component as `z = -layer`,
    /// the convention the simulations are authored against.
    pub fn from_record(record: &EntityRecord) -> Self {
        Self {
            position: record.position.truncate().extend(-record.layer),
            rotation: record.rotation,
            velocity: Vec3::ZERO,
            start_color: record.color,
            start_size: record.scale,
            start_lifetime: STATIC_LIFETIME,
            remaining_lifetime: STATIC_LIFETIME,
        }
    }

    /// Whether the renderer should draw this slot.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.remaining_lifetime > 0.0
    }
}

impl Default for Particle {
    fn default() -> Self {
        Self::EXPIRED
    }
}

/// Records past capacity are counted up to this many plus one; the rest of
/// the simulation iterator is not consumed.
pub const DROPPED_COUNT_LIMIT: usize = 10_000;

/// Outcome of one [`ParticleBuffer::fill_from`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Records copied into slots.
    pub written: usize,
    /// Records that did not fit and were dropped this frame. Saturates at
    /// `DROPPED_COUNT_LIMIT + 1`.
    pub dropped: usize,
}

impl SyncReport {
    /// `true` if more than [`DROPPED_COUNT_LIMIT`] records were dropped and
    /// `dropped` is only a lower bound.
    pub fn dropped_saturated(&self) -> bool {
        self.dropped > DROPPED_COUNT_LIMIT
    }
}

/// A fixed-capacity, reusable particle buffer.
///
/// The length always equals the configured capacity. Changing the capacity
/// reallocates the whole buffer; nothing is ever partially resized.
#[derive(Debug, Clone, Default)]
pub struct ParticleBuffer {
    slots: Vec<Particle>,
}

impl ParticleBuffer {
    /// Allocate `capacity` dead slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![Particle::EXPIRED; capacity],
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// `true` if the buffer has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Reallocate to `capacity` dead slots if the length differs.
    ///
    /// Returns `true` if a reallocation happened.
    pub fn resize(&mut self, capacity: usize) -> bool {
        if self.slots.len() == capacity {
            return false;
        }
        self.slots = vec![Particle::EXPIRED; capacity];
        true
    }

    /// Mark every slot dead without reallocating.
    pub fn expire_all(&mut self) {
        self.slots.fill(Particle::EXPIRED);
    }

    /// Copy records into slots in order: record i goes to slot i.
    ///
    /// Writing stops at capacity; the remaining records are counted as
    /// dropped, up to `DROPPED_COUNT_LIMIT + 1`. Slots past the last written record are marked dead so a
    /// shrinking population leaves nothing stale behind.
    pub fn fill_from<I>(&mut self, records: I) -> SyncReport
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let mut records = records.into_iter();
        let mut written = 0;
        for (slot, record) in self.slots.iter_mut().zip(records.by_ref()) {
            *slot = Particle::from_record(&record);
            written += 1;
        }
        self.slots[written..].fill(Particle::EXPIRED);
        let dropped = records.take(DROPPED_COUNT_LIMIT + 1).count();
        SyncReport { written, dropped }
    }

    /// All slots, dead ones included.
    pub fn as_slice(&self) -> &[Particle] {
        &self.slots
    }
}
