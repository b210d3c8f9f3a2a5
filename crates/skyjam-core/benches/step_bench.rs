use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::Vec3;
use skyjam_core::config::SessionConfig;
use skyjam_core::entity::CombatantComponents;
use skyjam_core::field::{ArenaBounds, ArenaLayout, CollisionBox, Pit};
use skyjam_core::session::{CombatSession, StepInput};
use skyjam_core::world::{FlatTerrain, InputSnapshot, PlayerBody};

fn populated_session(entities: usize) -> CombatSession {
    let layout = ArenaLayout {
        bounds: Some(ArenaBounds::new(-40.0, 40.0, -40.0, 40.0)),
        obstacles: vec![
            CollisionBox::wall(-10.0, -8.0, -10.0, 10.0),
            CollisionBox::low(5.0, 9.0, 5.0, 9.0, 1.5),
        ],
        pits: vec![Pit::new(20.0, 25.0, 20.0, 25.0)],
    };
    let mut session =
        CombatSession::with_layout(SessionConfig::default(), layout).expect("valid config");

    // Deterministic scatter with mixed velocities; no RNG so runs compare.
    for i in 0..entities {
        let f = i as f32;
        let mut components = CombatantComponents::at_position(Vec3::new(
            (f * 7.3) % 60.0 - 30.0,
            0.0,
            (f * 11.7) % 60.0 - 30.0,
        ));
        components.physics.velocity = Vec3::new((f % 9.0) - 4.0, 0.0, (f % 7.0) - 3.0);
        session.arena_mut().spawn(components);
    }
    session
}

fn bench_step(c: &mut Criterion) {
    for count in [16usize, 64] {
        let mut session = populated_session(count);
        let mut player = PlayerBody::default();
        let terrain = FlatTerrain::at(0.0);

        c.bench_function(&format!("session_step_{count}_entities"), |b| {
            b.iter(|| {
                session.step(StepInput {
                    dt: black_box(1.0 / 60.0),
                    real_dt_ms: 1000.0 / 60.0,
                    player: &mut player,
                    input: InputSnapshot::default(),
                    terrain: &terrain,
                });
            });
        });
    }
}

fn bench_take_events(c: &mut Criterion) {
    let mut session = populated_session(64);
    let mut player = PlayerBody::default();
    let terrain = FlatTerrain::at(0.0);

    c.bench_function("session_step_and_drain", |b| {
        b.iter(|| {
            session.step(StepInput {
                dt: 1.0 / 60.0,
                real_dt_ms: 1000.0 / 60.0,
                player: &mut player,
                input: InputSnapshot::default(),
                terrain: &terrain,
            });
            black_box(session.take_events());
        });
    });
}

criterion_group!(benches, bench_step, bench_take_events);
criterion_main!(benches);
