//! Arena: entity storage with deterministic iteration order.
//!
//! The arena is the container for all combatants in a session. It uses a
//! `BTreeMap` so that every stage of the step pipeline (integration, pairwise
//! contacts, splash queries, cleanup) walks entities in ascending ID order —
//! a hard requirement, since contact resolutions cascade within a tick and
//! must replay identically for a given frame.
//!
//! # Example
//!
//! ```
//! use skyjam_core::arena::Arena;
//! use skyjam_core::entity::CombatantComponents;
//! use glam::Vec3;
//!
//! let mut arena = Arena::new();
//! let a = arena.spawn(CombatantComponents::at_position(Vec3::ZERO));
//! let b = arena.spawn(CombatantComponents::at_position(Vec3::new(10.0, 0.0, 0.0)));
//!
//! let ids: Vec<_> = arena.entity_ids_sorted().collect();
//! assert_eq!(ids, vec![a, b]);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{CombatantComponents, Entity, EntityId};

/// Entity container for one combat session.
///
/// IDs are assigned monotonically and never reused. The tick counter lives
/// here so serialized arenas carry their own timeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity ID counter.
    next_id: u64,
    /// Entity storage with deterministic iteration order.
    entities: BTreeMap<EntityId, Entity>,
    /// Current simulation tick.
    tick: u64,
}

impl Arena {
    /// Creates a new empty arena at tick 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new entity and returns its assigned ID.
    pub fn spawn(&mut self, components: CombatantComponents) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, Entity::new(id, components));
        id
    }

    /// Removes an entity, returning it if it existed.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Returns a reference to an entity by ID.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by ID.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Returns an iterator over entity IDs in ascending order.
    ///
    /// This is the iteration order every simulation stage must use.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Returns an iterator over entities in ascending ID order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Returns an iterator over mutable entities in ascending ID order.
    pub fn entities_sorted_mut(&mut self) -> impl Iterator<Item = &mut Entity> + '_ {
        self.entities.values_mut()
    }

    /// Returns the number of entities in the arena.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the arena has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the current simulation tick.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter by one.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }
}
