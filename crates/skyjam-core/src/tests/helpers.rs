//! Test helper functions for setting up sessions and entities.

use glam::Vec3;

use crate::config::SessionConfig;
use crate::entity::{CombatantComponents, EntityId};
use crate::session::{CombatSession, StepInput};
use crate::world::{FlatTerrain, InputSnapshot, PlayerBody};

/// Standard 60 Hz tick, scaled seconds.
pub const TICK_DT: f32 = 1.0 / 60.0;
/// Standard 60 Hz tick, wall-clock milliseconds.
pub const TICK_MS: f32 = 1000.0 / 60.0;

/// Installs a tracing subscriber so failing tests can be rerun with
/// verb/claim logging visible (`cargo test -- --nocapture`). Safe to call
/// repeatedly; only the first call wins.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Creates a session with default tuning over an unbounded flat arena.
pub fn default_session() -> CombatSession {
    init_test_logging();
    CombatSession::new(SessionConfig::default()).expect("default config is valid")
}

/// Spawns an entity at `position` with the given initial velocity.
pub fn spawn_moving(session: &mut CombatSession, position: Vec3, velocity: Vec3) -> EntityId {
    let mut components = CombatantComponents::at_position(position);
    components.physics.velocity = velocity;
    session.arena_mut().spawn(components)
}

/// Spawns an entity, registers it as launched, and gives it upward velocity.
pub fn spawn_launched(session: &mut CombatSession, position: Vec3, vy: f32) -> EntityId {
    let id = spawn_moving(session, position, Vec3::new(0.0, vy, 0.0));
    session.launch_entity(id);
    id
}

/// Steps the session one 60 Hz tick with the given input.
pub fn step_with_input(session: &mut CombatSession, player: &mut PlayerBody, input: InputSnapshot) {
    let terrain = FlatTerrain::at(0.0);
    session.step(StepInput {
        dt: TICK_DT,
        real_dt_ms: TICK_MS,
        player,
        input,
        terrain: &terrain,
    });
}

/// Steps the session `ticks` times with no input.
pub fn step_idle(session: &mut CombatSession, player: &mut PlayerBody, ticks: usize) {
    for _ in 0..ticks {
        step_with_input(session, player, InputSnapshot::default());
    }
}

/// Input snapshot for the tick the attack button goes down.
#[must_use]
pub fn press_attack() -> InputSnapshot {
    InputSnapshot {
        attack_pressed: true,
        attack_held: true,
        aim_point: Vec3::ZERO,
    }
}

/// Input snapshot for a tick with the attack button still held.
#[must_use]
pub fn hold_attack() -> InputSnapshot {
    InputSnapshot {
        attack_pressed: false,
        attack_held: true,
        aim_point: Vec3::ZERO,
    }
}

/// Input snapshot for a tick after the attack button was released.
#[must_use]
pub fn release_attack() -> InputSnapshot {
    InputSnapshot::default()
}
