//! Spawner that renders an external simulation through a batched renderer.
//!
//! Each frame [`SimulationBridgeSpawner::update`] runs, in order:
//!
//! 1. appearance change dispatch (mesh/material rebuild),
//! 2. simulation init if the entity count changed,
//! 3. draw sync: records → particle buffer → one full-buffer submit.
//!
//! Rebuilds therefore always land before the draw sync of the same frame.

use std::rc::Rc;

use vivarium_core::context::SpawnerContext;
use vivarium_core::record::EntitySimulation;
use vivarium_core::settings::{SpawnerSettings, MAX_ENTITIES};

use crate::batch::{BatchedRenderer, ParticleSystem};
use crate::mesh::{MeshError, RenderMaterial, RenderMesh};
use crate::overlay::Drawer;
use crate::particle::{ParticleBuffer, SyncReport, DROPPED_COUNT_LIMIT};
use crate::spawner::{Spawner, SpawnerCore};

/// Name banner shown in the overlay.
pub const BANNER: &str = "Simulation bridge (CPU particle buffer, instanced mesh renderer)";

/// Copies simulation records into a fixed-capacity particle buffer and
/// hands it to a [`BatchedRenderer`] once per frame.
pub struct SimulationBridgeSpawner<S, R = ParticleSystem> {
    core: SpawnerCore,
    simulation: S,
    renderer: R,
    particles: ParticleBuffer,
    /// Entity count the buffer was last initialized for.
    initialized_for: Option<i32>,
    last_sync: SyncReport,
}

impl<S, R> SimulationBridgeSpawner<S, R>
where
    S: EntitySimulation,
    R: BatchedRenderer,
{
    pub fn new(settings: SpawnerSettings, simulation: S, renderer: R) -> Self {
        Self {
            core: SpawnerCore::new(settings),
            simulation,
            renderer,
            particles: ParticleBuffer::default(),
            initialized_for: None,
            last_sync: SyncReport::default(),
        }
    }

    /// Build a spawner and activate it on `context` in one go.
    pub fn enabled(
        settings: SpawnerSettings,
        simulation: S,
        renderer: R,
        context: Rc<dyn SpawnerContext>,
    ) -> Self {
        let mut spawner = Self::new(settings, simulation, renderer);
        spawner.enable(Some(context));
        spawner
    }

    pub fn simulation(&self) -> &S {
        &self.simulation
    }

    pub fn simulation_mut(&mut self) -> &mut S {
        &mut self.simulation
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn particles(&self) -> &ParticleBuffer {
        &self.particles
    }

    pub fn settings(&self) -> &SpawnerSettings {
        &self.core.settings
    }

    pub fn settings_mut(&mut self) -> &mut SpawnerSettings {
        &mut self.core.settings
    }

    /// Result of the most recent draw sync.
    pub fn last_sync(&self) -> SyncReport {
        self.last_sync
    }

    /// Rebuild mesh and material from the context's current appearance and
    /// install both on the renderer.
    ///
    /// Returns `Ok(false)` when unbound. On error nothing is installed and
    /// the previous mesh/material stay in place.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError`] if the sprite geometry is inconsistent.
    pub fn rebuild_appearance(&mut self) -> Result<bool, MeshError> {
        let Some(context) = self.core.context() else {
            return Ok(false);
        };
        let appearance = context.appearance();
        let mesh = RenderMesh::from_sprite(&appearance.sprite)?;
        let material = RenderMaterial::instanced_sprite(appearance.texture);
        tracing::info!(
            vertices = mesh.vertex_count(),
            triangles = mesh.triangle_count(),
            texture = %material.texture.label,
            "particle appearance rebuilt"
        );
        self.renderer.install_mesh(mesh, material);
        Ok(true)
    }

    /// Size renderer and buffer to the current entity count and clear
    /// rendered particles.
    pub fn init_simulation(&mut self) {
        let requested = self.core.settings.number_of_entities;
        let capacity = self.core.settings.capacity();
        if requested < 0 {
            tracing::warn!(requested, "negative entity count, using capacity 0");
        } else if requested > MAX_ENTITIES {
            tracing::warn!(requested, capacity, "entity count above limit, clamped");
        }
        self.renderer.set_max_particles(capacity);
        if !self.particles.resize(capacity) {
            self.particles.expire_all();
        }
        self.renderer.clear();
        self.initialized_for = Some(requested);
        tracing::debug!(capacity, "simulation initialized");
    }

    /// Copy this frame's records into the buffer and submit it.
    pub fn draw_simulation(&mut self) -> SyncReport {
        let report = self.particles.fill_from(self.simulation.entities());
        if report.dropped != self.last_sync.dropped && report.dropped > 0 {
            tracing::warn!(
                dropped = report.dropped,
                capacity = self.particles.len(),
                "entity records over capacity dropped"
            );
        }
        self.renderer.set_particles(self.particles.as_slice());
        self.last_sync = report;
        report
    }

    /// One frame step: dispatch changes, re-init on count change, sync.
    pub fn update(&mut self) -> SyncReport {
        self.dispatch_context_changes();
        if self.initialized_for != Some(self.core.settings.number_of_entities) {
            self.init_simulation();
        }
        self.draw_simulation()
    }
}

impl<S, R> Spawner for SimulationBridgeSpawner<S, R>
where
    S: EntitySimulation,
    R: BatchedRenderer,
{
    fn core(&self) -> &SpawnerCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SpawnerCore {
        &mut self.core
    }

    fn on_spawner_selected(&mut self) {
        self.renderer.clear();
        self.renderer.play();
    }

    fn on_spawner_deselected(&mut self) {
        self.renderer.stop();
    }

    fn entities_count(&self) -> usize {
        self.renderer.particle_count()
    }

    fn on_enable(&mut self) {
        self.on_living_entity_data_changed();
    }

    fn on_living_entity_data_changed(&mut self) {
        if let Err(error) = self.rebuild_appearance() {
            tracing::warn!(%error, "appearance rejected, keeping previous mesh");
        }
    }

    fn extra_stats(&self) -> Vec<String> {
        let sync = self.last_sync;
        if sync.dropped == 0 {
            return Vec::new();
        }
        if sync.dropped_saturated() {
            return vec![format!("Dropped: {DROPPED_COUNT_LIMIT}+ over capacity")];
        }
        vec![format!("Dropped: {} over capacity", sync.dropped)]
    }

    fn perform_on_gui(&mut self, drawer: &mut dyn Drawer) {
        self.draw_base_overlay(drawer);
        drawer.draw_name(BANNER);
    }
}
