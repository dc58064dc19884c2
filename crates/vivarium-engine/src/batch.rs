//! The batched renderer boundary and its CPU-side implementation.
//!
//! [`BatchedRenderer`] is what a spawner talks to. [`ParticleSystem`] keeps
//! the state a real instanced renderer needs (capacity, live particles,
//! play state, installed mesh/material) and is what the GPU renderer reads
//! from when the `renderer` feature is on.

use crate::mesh::{RenderMaterial, RenderMesh, RenderMode};
use crate::particle::Particle;

/// Operations a spawner needs from an instanced particle renderer.
pub trait BatchedRenderer {
    /// Set the maximum number of particles kept by [`set_particles`](Self::set_particles).
    fn set_max_particles(&mut self, max: usize);

    fn max_particles(&self) -> usize;

    /// Drop every rendered particle.
    fn clear(&mut self);

    /// Start presenting particles.
    fn play(&mut self);

    /// Stop presenting particles. Submitted data is kept.
    fn stop(&mut self);

    fn is_playing(&self) -> bool;

    /// Full-buffer submit. Replaces every particle.
    fn set_particles(&mut self, particles: &[Particle]);

    /// Number of live particles held.
    fn particle_count(&self) -> usize;

    /// Replace the mesh and material used by the mesh render path.
    fn install_mesh(&mut self, mesh: RenderMesh, material: RenderMaterial);
}

/// Headless batched renderer state.
///
/// Starts stopped, in [`RenderMode::Billboard`], with zero capacity.
#[derive(Debug, Default)]
pub struct ParticleSystem {
    max_particles: usize,
    particles: Vec<Particle>,
    playing: bool,
    render_mode: RenderMode,
    mesh: Option<RenderMesh>,
    material: Option<RenderMaterial>,
    mesh_generation: u64,
    submit_count: u64,
}

impl ParticleSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Particles to draw this frame: all live particles while playing,
    /// nothing while stopped.
    pub fn visible_particles(&self) -> &[Particle] {
        if self.playing {
            &self.particles
        } else {
            &[]
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn mesh(&self) -> Option<&RenderMesh> {
        self.mesh.as_ref()
    }

    pub fn material(&self) -> Option<&RenderMaterial> {
        self.material.as_ref()
    }

    /// Incremented on every [`install_mesh`](BatchedRenderer::install_mesh).
    /// GPU code compares it to know when to re-upload.
    pub fn mesh_generation(&self) -> u64 {
        self.mesh_generation
    }

    /// Number of full-buffer submits so far.
    pub fn submit_count(&self) -> u64 {
        self.submit_count
    }

    /// Whether the installed material asks for instanced drawing.
    pub fn gpu_instancing(&self) -> bool {
        self.material.as_ref().is_some_and(|m| m.enable_instancing)
    }
}

impl BatchedRenderer for ParticleSystem {
    fn set_max_particles(&mut self, max: usize) {
        self.max_particles = max;
        self.particles.truncate(max);
    }

    fn max_particles(&self) -> usize {
        self.max_particles
    }

    fn clear(&mut self) {
        self.particles.clear();
    }

    fn play(&mut self) {
        self.playing = true;
    }

    fn stop(&mut self) {
        self.playing = false;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn set_particles(&mut self, particles: &[Particle]) {
        self.submit_count += 1;
        self.particles.clear();
        self.particles.extend(
            particles
                .iter()
                .filter(|p| p.is_alive())
                .take(self.max_particles)
                .copied(),
        );
    }

    fn particle_count(&self) -> usize {
        self.particles.len()
    }

    fn install_mesh(&mut self, mesh: RenderMesh, material: RenderMaterial) {
        self.mesh = Some(mesh);
        self.material = Some(material);
        self.render_mode = RenderMode::Mesh;
        self.mesh_generation += 1;
        tracing::debug!(generation = self.mesh_generation, "particle mesh installed");
    }
}
