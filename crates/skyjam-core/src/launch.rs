//! Launch registry: which entities are airborne and claimable.
//!
//! An entity becomes *launched* when combat code registers it here (typically
//! the hit that pops it into the air). A launched entity is eligible for
//! exactly one aerial-verb claim at a time; the claim slot on its
//! [`LaunchEntry`] is the simulation's only mutual-exclusion primitive.
//!
//! # Claim discipline
//!
//! [`LaunchRegistry::claim`] performs its check-then-set as one indivisible
//! step within the tick: it either observes a free slot and takes it, or
//! mutates nothing and returns `false`. [`LaunchRegistry::transfer_claim`] is
//! the only other path that changes ownership, and it requires the slot to be
//! held. There is never a tick in which two verbs both believe they own the
//! same entity.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::EntityId;
use crate::verbs::VerbKind;

/// Bookkeeping for one launched entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchEntry {
    /// The launched entity.
    pub entity: EntityId,
    /// Simulation time (seconds) when the launch was registered.
    pub launched_at: f32,
    /// The verb currently owning this entity's motion, if any.
    pub claimed_by: Option<VerbKind>,
    /// Gravity multiplier applied by the integrator while this entry exists.
    pub gravity_mult: f32,
}

/// Registry of launched entities and their claim slots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LaunchRegistry {
    entries: BTreeMap<EntityId, LaunchEntry>,
}

impl LaunchRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `entity` as launched at time `now`.
    ///
    /// A no-op if an entry already exists — re-launching mid-flight must not
    /// reset the timestamp or drop an active claim.
    pub fn register(&mut self, entity: EntityId, now: f32) {
        self.entries.entry(entity).or_insert_with(|| {
            debug!(%entity, now, "entity launched");
            LaunchEntry {
                entity,
                launched_at: now,
                claimed_by: None,
                gravity_mult: 1.0,
            }
        });
    }

    /// Attempts to claim `entity` for `verb`.
    ///
    /// Fails without mutation if the entity is not launched or the claim slot
    /// is already held. The check and the set happen as one step — this is
    /// the mutual-exclusion primitive the verb engine relies on.
    pub fn claim(&mut self, entity: EntityId, verb: VerbKind) -> bool {
        match self.entries.get_mut(&entity) {
            Some(entry) if entry.claimed_by.is_none() => {
                entry.claimed_by = Some(verb);
                debug!(%entity, %verb, "launch claimed");
                true
            }
            _ => false,
        }
    }

    /// Reassigns an existing claim to `verb` in place.
    ///
    /// The entry itself survives — `launched_at` and `gravity_mult` are
    /// untouched. Fails without mutation if the entity is not launched or
    /// the slot is free (a transfer needs a current owner to take from).
    pub fn transfer_claim(&mut self, entity: EntityId, verb: VerbKind) -> bool {
        match self.entries.get_mut(&entity) {
            Some(entry) if entry.claimed_by.is_some() => {
                let previous = entry.claimed_by.replace(verb);
                debug!(%entity, ?previous, %verb, "claim transferred");
                true
            }
            _ => false,
        }
    }

    /// Deletes the entry outright, ending launched status.
    ///
    /// Returns the removed entry, if any.
    pub fn release(&mut self, entity: EntityId) -> Option<LaunchEntry> {
        let removed = self.entries.remove(&entity);
        if removed.is_some() {
            debug!(%entity, "launch released");
        }
        removed
    }

    /// Sets the gravity multiplier on an existing entry. No-op if absent.
    pub fn set_gravity_override(&mut self, entity: EntityId, mult: f32) {
        if let Some(entry) = self.entries.get_mut(&entity) {
            entry.gravity_mult = mult;
        }
    }

    /// Returns the entry for `entity`, if it is launched.
    #[must_use]
    pub fn get(&self, entity: EntityId) -> Option<&LaunchEntry> {
        self.entries.get(&entity)
    }

    /// Gravity multiplier the integrator should apply to `entity`.
    ///
    /// Entities without an entry integrate at multiplier 1.
    #[must_use]
    pub fn gravity_multiplier(&self, entity: EntityId) -> f32 {
        self.entries.get(&entity).map_or(1.0, |e| e.gravity_mult)
    }

    /// Returns `true` if `entity` is launched and currently claimed.
    #[must_use]
    pub fn is_claimed(&self, entity: EntityId) -> bool {
        self.entries
            .get(&entity)
            .map_or(false, |e| e.claimed_by.is_some())
    }

    /// Removes every entry. Claims die with their entries.
    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            debug!(count = self.entries.len(), "launch registry cleared");
        }
        self.entries.clear();
    }

    /// Returns the number of launched entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entity is launched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E: EntityId = EntityId::new(1);

    #[test]
    fn register_creates_unclaimed_entry() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 2.5);
        let entry = registry.get(E).unwrap();
        assert_eq!(entry.claimed_by, None);
        assert!((entry.launched_at - 2.5).abs() < f32::EPSILON);
        assert!((entry.gravity_mult - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn register_twice_keeps_first_timestamp() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 1.0);
        registry.register(E, 9.0);
        assert!((registry.get(E).unwrap().launched_at - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn claim_succeeds_exactly_once() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 0.0);
        assert!(registry.claim(E, VerbKind::FloatSelector));
        assert!(!registry.claim(E, VerbKind::Dunk));
        assert_eq!(registry.get(E).unwrap().claimed_by, Some(VerbKind::FloatSelector));
    }

    #[test]
    fn claim_unregistered_entity_fails() {
        let mut registry = LaunchRegistry::new();
        assert!(!registry.claim(E, VerbKind::Dunk));
        assert!(registry.get(E).is_none());
    }

    #[test]
    fn claim_available_again_after_release_and_relaunch() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 0.0);
        assert!(registry.claim(E, VerbKind::FloatSelector));
        registry.release(E);
        registry.register(E, 3.0);
        assert!(registry.claim(E, VerbKind::Spike));
    }

    #[test]
    fn transfer_requires_existing_claim() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 0.0);
        assert!(!registry.transfer_claim(E, VerbKind::Dunk));
        assert!(registry.claim(E, VerbKind::FloatSelector));
        assert!(registry.transfer_claim(E, VerbKind::Dunk));
        assert_eq!(registry.get(E).unwrap().claimed_by, Some(VerbKind::Dunk));
    }

    #[test]
    fn transfer_preserves_entry_fields() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 4.25);
        registry.set_gravity_override(E, 0.5);
        registry.claim(E, VerbKind::FloatSelector);
        registry.transfer_claim(E, VerbKind::Spike);
        let entry = registry.get(E).unwrap();
        assert!((entry.launched_at - 4.25).abs() < f32::EPSILON);
        assert!((entry.gravity_mult - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn gravity_override_requires_entry() {
        let mut registry = LaunchRegistry::new();
        registry.set_gravity_override(E, 0.0);
        assert!((registry.gravity_multiplier(E) - 1.0).abs() < f32::EPSILON);

        registry.register(E, 0.0);
        registry.set_gravity_override(E, 0.25);
        assert!((registry.gravity_multiplier(E) - 0.25).abs() < f32::EPSILON);
    }

    #[test]
    fn release_deletes_entry() {
        let mut registry = LaunchRegistry::new();
        registry.register(E, 0.0);
        assert!(registry.release(E).is_some());
        assert!(registry.get(E).is_none());
        assert!(registry.release(E).is_none());
    }

    #[test]
    fn clear_empties_registry() {
        let mut registry = LaunchRegistry::new();
        registry.register(EntityId::new(1), 0.0);
        registry.register(EntityId::new(2), 0.0);
        registry.clear();
        assert!(registry.is_empty());
    }
}
