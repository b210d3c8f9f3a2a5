//! The seam between the core and the embedding game.
//!
//! The simulation consumes three things from the outside world each tick: a
//! terrain height query, the player's body, and an input snapshot. None of
//! them are owned by the core — the game passes them into
//! [`crate::session::CombatSession::step`] by reference.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Terrain height lookup.
///
/// The arena may have ramps and raised platforms; the integrator and the
/// verbs only ever ask for the ground height under an XZ point.
pub trait TerrainQuery {
    /// Ground height at the given XZ position.
    fn height(&self, x: f32, z: f32) -> f32;
}

/// Flat terrain at a fixed level. The common case for arenas, and the
/// default in tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FlatTerrain {
    /// Ground level.
    pub level: f32,
}

impl FlatTerrain {
    /// Creates flat terrain at the given level.
    #[must_use]
    pub const fn at(level: f32) -> Self {
        Self { level }
    }
}

impl TerrainQuery for FlatTerrain {
    fn height(&self, _x: f32, _z: f32) -> f32 {
        self.level
    }
}

/// The controllable player actor.
///
/// Owned by the embedding game, which drives its horizontal motion. While an
/// aerial verb is active the core owns the vertical motion (and during a
/// dunk, the full position).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// World position, y-up.
    pub position: Vec3,
    /// World velocity.
    pub velocity: Vec3,
    /// Collision circle radius.
    pub radius: f32,
}

impl Default for PlayerBody {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            radius: 0.5,
        }
    }
}

impl PlayerBody {
    /// Creates a player at the given position.
    #[must_use]
    pub fn at_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

/// One tick's worth of player input, already polled by the game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// The attack input became pressed this tick.
    pub attack_pressed: bool,
    /// The attack input is currently held.
    pub attack_held: bool,
    /// World-space aim position (cursor projection or stick direction).
    pub aim_point: Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_terrain_is_uniform() {
        let terrain = FlatTerrain::at(2.0);
        assert_eq!(terrain.height(0.0, 0.0), 2.0);
        assert_eq!(terrain.height(100.0, -55.0), 2.0);
    }

    #[test]
    fn player_at_position() {
        let player = PlayerBody::at_position(Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(player.position, Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(player.velocity, Vec3::ZERO);
    }
}
