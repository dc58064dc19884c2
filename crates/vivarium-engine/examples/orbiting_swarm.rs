//! A swarm of sprites orbiting the origin, rendered through the simulation
//! bridge with the debug overlay on top.
//!
//! Run with:
//!   cargo run --example orbiting_swarm --features renderer -p vivarium-engine
//!   cargo run --example orbiting_swarm --features renderer -p vivarium-engine -- settings.json
//!
//! Controls:
//!   F1 -- toggle overlay
//!   F2 -- toggle selection (play / stop)
//!   click the entity-count field, type, Backspace / Delete -- edit the count

use std::f32::consts::TAU;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64;
use vivarium_core::prelude::*;
use vivarium_engine::prelude::*;
use vivarium_engine::render::run_windowed;

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// One orbiting agent. Records are derived from these on every frame.
struct Agent {
    angle: f32,
    radius: f32,
    angular_speed: f32,
    hue: f32,
    layer: f32,
}

/// Owns the agents; the renderer only ever sees [`EntityRecord`]s.
struct Swarm {
    agents: Vec<Agent>,
    speed: f32,
    scale: f32,
    alpha: f32,
}

impl Swarm {
    fn new(count: usize, settings: &SpawnerSettings, seed: u64) -> Self {
        let mut rng = Pcg64::seed_from_u64(seed);
        let agents = (0..count)
            .map(|_| Agent {
                angle: rng.gen_range(0.0..TAU),
                radius: rng.gen_range(0.5..4.0),
                angular_speed: rng.gen_range(0.2..1.0),
                hue: rng.gen_range(0.0..1.0),
                layer: rng.gen_range(0..4) as f32,
            })
            .collect();
        Self {
            agents,
            speed: settings.reference_speed,
            scale: settings.reference_scale,
            alpha: settings.reference_alpha,
        }
    }

    fn step(&mut self, dt: f32) {
        for agent in &mut self.agents {
            agent.angle = (agent.angle + agent.angular_speed * self.speed * 0.1 * dt) % TAU;
        }
    }
}

impl EntitySimulation for Swarm {
    fn entities(&self) -> impl Iterator<Item = EntityRecord> + '_ {
        self.agents.iter().map(|agent| {
            let (sin, cos) = agent.angle.sin_cos();
            EntityRecord {
                position: Vec3::new(cos * agent.radius, sin * agent.radius, 0.0),
                rotation: agent.angle.to_degrees(),
                scale: Vec3::splat(self.scale * 0.4),
                color: hue_to_rgba(agent.hue, self.alpha),
                layer: agent.layer,
            }
        })
    }
}

fn hue_to_rgba(hue: f32, alpha: f32) -> [f32; 4] {
    let channel = |offset: f32| 0.5 + 0.5 * (TAU * (hue + offset)).cos();
    [channel(0.0), channel(1.0 / 3.0), channel(2.0 / 3.0), alpha]
}

/// A soft round dot so rotation and layering are visible.
fn dot_texture() -> Result<SpriteTexture, TextureError> {
    const SIZE: u32 = 32;
    let mut rgba = Vec::with_capacity((SIZE * SIZE * 4) as usize);
    for y in 0..SIZE {
        for x in 0..SIZE {
            let dx = (x as f32 + 0.5) / SIZE as f32 - 0.5;
            let dy = (y as f32 + 0.5) / SIZE as f32 - 0.5;
            let falloff = (1.0 - (dx * dx + dy * dy).sqrt() * 2.0).clamp(0.0, 1.0);
            rgba.extend_from_slice(&[255, 255, 255, (falloff * 255.0) as u8]);
        }
    }
    SpriteTexture::from_rgba("dot", SIZE, SIZE, rgba)
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let settings = match std::env::args().nth(1) {
        Some(path) => SpawnerSettings::from_json_str(&std::fs::read_to_string(path)?)?,
        None => SpawnerSettings {
            number_of_entities: 500,
            ..Default::default()
        },
    };

    // More agents than the buffer holds, so the overlay's count field has
    // something to reveal.
    let swarm = Swarm::new(2_000, &settings, 7);

    let context = Rc::new(SceneContext::new(EntityAppearance {
        sprite: SpriteGeometry::unit_quad(),
        texture: dot_texture()?,
    }));
    let spawner = SimulationBridgeSpawner::new(settings, swarm, ParticleSystem::new());

    run_windowed(
        spawner,
        context,
        Swarm::step,
        "Vivarium -- orbiting swarm (F1 overlay, F2 select)",
        1280,
        720,
    )
}
