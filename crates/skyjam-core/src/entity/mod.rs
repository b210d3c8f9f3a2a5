//! Entity types for the combat simulation.
//!
//! - [`EntityId`]: unique identifier, ordered for deterministic iteration
//! - [`Entity`]: a combatant — transform, physics, and combat components
//!
//! Unlike engines with heterogeneous entity kinds, every simulated combatant
//! here has the same component set; the player is *not* an entity (it is a
//! [`crate::world::PlayerBody`] owned by the caller and threaded through the
//! step function).

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use components::{
    CombatState, CombatantComponents, PhysicsState, StatusFlags, TransformState,
};

/// Unique identifier for an entity.
///
/// `EntityId` is a newtype wrapper around `u64`. IDs are assigned
/// monotonically by the arena and are never reused; their ordering drives
/// the deterministic iteration order of every simulation stage.
///
/// # Example
///
/// ```
/// use skyjam_core::entity::EntityId;
///
/// let id1 = EntityId::new(1);
/// let id2 = EntityId::new(2);
///
/// assert!(id1 < id2);
/// assert_eq!(id1.as_u64(), 1);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

impl From<EntityId> for u64 {
    fn from(id: EntityId) -> Self {
        id.0
    }
}

/// A combatant in the simulation.
///
/// Owned by the [`crate::arena::Arena`]; despawned on death or pit fall by
/// the session's cleanup phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    components: CombatantComponents,
}

impl Entity {
    /// Creates a new entity with the given ID and components.
    #[must_use]
    pub const fn new(id: EntityId, components: CombatantComponents) -> Self {
        Self { id, components }
    }

    /// Returns the entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Returns the transform component.
    #[must_use]
    pub const fn transform(&self) -> &TransformState {
        &self.components.transform
    }

    /// Returns the mutable transform component.
    #[must_use]
    pub fn transform_mut(&mut self) -> &mut TransformState {
        &mut self.components.transform
    }

    /// Returns the physics component.
    #[must_use]
    pub const fn physics(&self) -> &PhysicsState {
        &self.components.physics
    }

    /// Returns the mutable physics component.
    #[must_use]
    pub fn physics_mut(&mut self) -> &mut PhysicsState {
        &mut self.components.physics
    }

    /// Returns the combat component.
    #[must_use]
    pub const fn combat(&self) -> &CombatState {
        &self.components.combat
    }

    /// Returns the mutable combat component.
    #[must_use]
    pub fn combat_mut(&mut self) -> &mut CombatState {
        &mut self.components.combat
    }

    /// Returns `true` while the entity has positive HP.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.components.combat.is_alive()
    }

    /// Returns `true` while the entity is flying as a thrown carrier payload.
    #[must_use]
    pub fn is_carrier_payload(&self) -> bool {
        self.components
            .combat
            .status_flags
            .contains(StatusFlags::CARRIER_PAYLOAD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn new_creates_id_with_value() {
            let id = EntityId::new(42);
            assert_eq!(id.as_u64(), 42);
        }

        #[test]
        fn ordering() {
            let mut ids = vec![EntityId::new(3), EntityId::new(1), EntityId::new(2)];
            ids.sort();
            assert_eq!(
                ids,
                vec![EntityId::new(1), EntityId::new(2), EntityId::new(3)]
            );
        }

        #[test]
        fn debug_and_display_format() {
            let id = EntityId::new(7);
            assert_eq!(format!("{id:?}"), "EntityId(7)");
            assert_eq!(format!("{id}"), "7");
        }

        #[test]
        fn u64_conversions() {
            let id: EntityId = 42u64.into();
            let value: u64 = id.into();
            assert_eq!(value, 42);
        }

        #[test]
        fn serialization_roundtrip() {
            let id = EntityId::new(12345);
            let json = serde_json::to_string(&id).unwrap();
            let back: EntityId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, back);
        }
    }

    mod entity_tests {
        use super::*;

        #[test]
        fn new_creates_entity() {
            let entity = Entity::new(
                EntityId::new(1),
                CombatantComponents::at_position(Vec3::new(5.0, 0.0, 5.0)),
            );
            assert_eq!(entity.id(), EntityId::new(1));
            assert_eq!(entity.transform().position, Vec3::new(5.0, 0.0, 5.0));
            assert!(entity.is_alive());
        }

        #[test]
        fn carrier_payload_flag() {
            let mut entity = Entity::new(EntityId::new(1), CombatantComponents::default());
            assert!(!entity.is_carrier_payload());
            entity
                .combat_mut()
                .status_flags
                .insert(StatusFlags::CARRIER_PAYLOAD);
            assert!(entity.is_carrier_payload());
        }

        #[test]
        fn dead_after_full_damage() {
            let mut entity = Entity::new(EntityId::new(1), CombatantComponents::default());
            entity.combat_mut().apply_damage(500.0);
            assert!(!entity.is_alive());
            assert_eq!(entity.combat().hp, 0.0);
        }

        #[test]
        fn serialization_roundtrip() {
            let entity = Entity::new(
                EntityId::new(9),
                CombatantComponents::at_position(Vec3::ONE),
            );
            let json = serde_json::to_string(&entity).unwrap();
            let back: Entity = serde_json::from_str(&json).unwrap();
            assert_eq!(entity, back);
        }
    }
}
