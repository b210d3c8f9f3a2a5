//! Component structs for combatant entities.
//!
//! Every entity in the arena carries the same three component blocks:
//! [`TransformState`] (where it is), [`PhysicsState`] (how it moves), and
//! [`CombatState`] (how much punishment it has taken). There is no component
//! registry — the set is fixed and the structs are plain data.

use bitflags::bitflags;
use glam::Vec3;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Mechanical status flags for an entity.
    ///
    /// These are the boolean facts the simulation itself branches on.
    /// Gameplay-visible status markers (stunned, aerial) live in the
    /// hierarchical tag registry instead. Serde impls come from the
    /// `bitflags/serde` feature.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
    pub struct StatusFlags: u32 {
        /// The entity died by falling into a pit.
        const FELL_IN_PIT = 1 << 0;
        /// The entity is currently flying as a thrown carrier payload and
        /// is skipped by the ordinary integrator.
        const CARRIER_PAYLOAD = 1 << 1;
    }
}

impl Default for StatusFlags {
    fn default() -> Self {
        Self::empty()
    }
}

/// World placement of an entity.
///
/// Positions are y-up: the XZ plane is the arena floor, `y` is altitude.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformState {
    /// World position.
    pub position: Vec3,
}

impl TransformState {
    /// Creates a transform at the given position.
    #[must_use]
    pub const fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Motion state and collision shape of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsState {
    /// Current velocity in world units per second.
    pub velocity: Vec3,
    /// Collision circle radius in the XZ plane.
    pub radius: f32,
    /// Vertical extent, used for entity-vs-entity span overlap.
    pub height: f32,
    /// Mass, used to weight push-out and impulse splits.
    pub mass: f32,
}

impl Default for PhysicsState {
    fn default() -> Self {
        Self {
            velocity: Vec3::ZERO,
            radius: 0.5,
            height: 1.8,
            mass: 1.0,
        }
    }
}

/// Health, stun, and status flags.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CombatState {
    /// Current hit points. The entity is alive while this is positive.
    pub hp: f32,
    /// Maximum hit points.
    pub max_hp: f32,
    /// Remaining stun time in seconds. Ticked down once per step.
    pub stun_remaining: f32,
    /// Mechanical status flags.
    pub status_flags: StatusFlags,
}

impl Default for CombatState {
    fn default() -> Self {
        Self {
            hp: 100.0,
            max_hp: 100.0,
            stun_remaining: 0.0,
            status_flags: StatusFlags::empty(),
        }
    }
}

impl CombatState {
    /// Creates a combat state with the given current and maximum HP.
    #[must_use]
    pub fn with_hp(hp: f32, max_hp: f32) -> Self {
        Self {
            hp,
            max_hp,
            ..Self::default()
        }
    }

    /// Returns `true` while the entity has positive HP.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Applies damage, clamping HP at zero.
    pub fn apply_damage(&mut self, amount: f32) {
        self.hp = (self.hp - amount).max(0.0);
    }

    /// Applies a stun, keeping the longer of the current and new duration.
    pub fn apply_stun(&mut self, duration: f32) {
        self.stun_remaining = self.stun_remaining.max(duration);
    }
}

/// The full component block for one combatant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatantComponents {
    /// World placement.
    pub transform: TransformState,
    /// Motion and collision shape.
    pub physics: PhysicsState,
    /// Health and status.
    pub combat: CombatState,
}

impl CombatantComponents {
    /// Creates components at the given position with defaults elsewhere.
    #[must_use]
    pub fn at_position(position: Vec3) -> Self {
        Self {
            transform: TransformState::new(position),
            ..Self::default()
        }
    }
}
