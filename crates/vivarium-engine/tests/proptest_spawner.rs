//! Property tests for spawner lifecycle and draw sync.
//!
//! - Any sequence of enable / disable / select / notify / update leaves at
//!   most one live subscription per spawner.
//! - Draw sync never writes past capacity, writes exactly
//!   `min(records, capacity)` slots, and keeps slot i equal to record i.

use std::rc::Rc;

use proptest::prelude::*;
use vivarium_core::prelude::*;
use vivarium_engine::prelude::*;

#[derive(Debug, Clone)]
enum LifecycleOp {
    Enable,
    EnableNone,
    Disable,
    Select(bool),
    Notify,
    Update,
    SetCount(i32),
}

fn lifecycle_op_strategy() -> impl Strategy<Value = LifecycleOp> {
    prop_oneof![
        Just(LifecycleOp::Enable),
        Just(LifecycleOp::EnableNone),
        Just(LifecycleOp::Disable),
        any::<bool>().prop_map(LifecycleOp::Select),
        Just(LifecycleOp::Notify),
        Just(LifecycleOp::Update),
        (-2..40i32).prop_map(LifecycleOp::SetCount),
    ]
}

fn record_strategy() -> impl Strategy<Value = EntityRecord> {
    (
        (-100.0f32..100.0, -100.0f32..100.0, -10.0f32..10.0),
        -360.0f32..360.0,
        0.0f32..5.0,
        (0.0f32..1.0, 0.0f32..1.0),
        -10.0f32..10.0,
    )
        .prop_map(|((x, y, z), rotation, scale, (r, a), layer)| EntityRecord {
            position: Vec3::new(x, y, z),
            rotation,
            scale: Vec3::splat(scale),
            color: [r, r, r, a],
            layer,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn at_most_one_subscription(ops in prop::collection::vec(lifecycle_op_strategy(), 1..50)) {
        let scene = Rc::new(SceneContext::default());
        let records = vec![EntityRecord::default(); 16];
        let mut spawner =
            SimulationBridgeSpawner::new(SpawnerSettings::default(), records, ParticleSystem::new());

        for op in ops {
            match op {
                LifecycleOp::Enable => spawner.enable(Some(scene.clone())),
                LifecycleOp::EnableNone => spawner.enable(None),
                LifecycleOp::Disable => spawner.disable(),
                LifecycleOp::Select(selected) => {
                    spawner.set_selected(selected, RuntimeState::Playing);
                    prop_assert_eq!(spawner.is_selected(), selected);
                    prop_assert_eq!(spawner.renderer().is_playing(), selected);
                }
                LifecycleOp::Notify => {
                    scene.set_appearance(EntityAppearance::unit_quad());
                }
                LifecycleOp::Update => {
                    spawner.update();
                    prop_assert_eq!(spawner.particles().len(), spawner.settings().capacity());
                    prop_assert!(spawner.entities_count() <= spawner.settings().capacity());
                }
                LifecycleOp::SetCount(n) => spawner.settings_mut().number_of_entities = n,
            }
            let subscribers = scene.appearance_changed().subscriber_count();
            prop_assert!(subscribers <= 1);
            prop_assert_eq!(subscribers == 1, spawner.core().is_bound());
        }

        drop(spawner);
        prop_assert_eq!(scene.appearance_changed().subscriber_count(), 0);
    }

    #[test]
    fn draw_sync_respects_capacity(
        records in prop::collection::vec(record_strategy(), 0..64),
        capacity in 0..48i32,
    ) {
        let settings = SpawnerSettings { number_of_entities: capacity, ..Default::default() };
        let mut spawner = SimulationBridgeSpawner::new(settings, records.clone(), ParticleSystem::new());

        let report = spawner.update();
        let cap = capacity as usize;

        prop_assert_eq!(spawner.particles().len(), cap);
        prop_assert_eq!(report.written, records.len().min(cap));
        prop_assert_eq!(report.written + report.dropped, records.len());
        prop_assert_eq!(spawner.entities_count(), report.written);

        let slots = spawner.particles().as_slice();
        for (slot, record) in slots.iter().zip(&records) {
            prop_assert_eq!(slot.position.x, record.position.x);
            prop_assert_eq!(slot.position.y, record.position.y);
            prop_assert_eq!(slot.position.z, -record.layer);
            prop_assert_eq!(slot.rotation, record.rotation);
            prop_assert_eq!(slot.start_color, record.color);
            prop_assert_eq!(slot.start_size, record.scale);
            prop_assert_eq!(slot.velocity, Vec3::ZERO);
        }
        for slot in &slots[report.written..] {
            prop_assert!(!slot.is_alive());
        }
    }
}
