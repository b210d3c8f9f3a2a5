//! Hierarchical status tag registry.
//!
//! Tags are dot-separated strings (`"Aerial.Dunk"`, `"Stunned"`) owned by an
//! actor — the player or an entity. Queries use exact-or-prefix semantics: a
//! stored `"Aerial.Dunk"` satisfies `has_tag(owner, "Aerial")`, so callers can
//! ask the generic question without knowing which specific verb applied the
//! tag.
//!
//! Missing owners always read as an empty set; no operation here can fail.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// An owner of status tags: the player or a simulated entity.
///
/// The player lives outside the arena, so entity IDs alone cannot key the
/// registry.
#[derive(
    Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum ActorId {
    /// The controllable player actor.
    Player,
    /// A simulated combatant.
    Entity(EntityId),
}

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Player => write!(f, "player"),
            Self::Entity(id) => write!(f, "entity:{id}"),
        }
    }
}

/// Per-actor sets of hierarchical string tags.
///
/// Storage is `BTreeMap`/`BTreeSet` so iteration (and thus serialization) is
/// deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TagRegistry {
    tags: BTreeMap<ActorId, BTreeSet<String>>,
}

impl TagRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `tag` to `owner`'s set. Adding an already-present tag is a no-op.
    pub fn add_tag(&mut self, owner: ActorId, tag: &str) {
        self.tags
            .entry(owner)
            .or_default()
            .insert(tag.to_string());
    }

    /// Removes exactly `tag` from `owner`'s set, if present.
    pub fn remove_tag(&mut self, owner: ActorId, tag: &str) {
        if let Some(set) = self.tags.get_mut(&owner) {
            set.remove(tag);
            if set.is_empty() {
                self.tags.remove(&owner);
            }
        }
    }

    /// Returns `true` if `owner` holds `tag` exactly, or any tag nested under
    /// `tag` (a stored `"Aerial.Dunk"` satisfies `has_tag(owner, "Aerial")`).
    #[must_use]
    pub fn has_tag(&self, owner: ActorId, tag: &str) -> bool {
        let Some(set) = self.tags.get(&owner) else {
            return false;
        };
        if set.contains(tag) {
            return true;
        }
        set.iter()
            .any(|stored| stored.len() > tag.len() + 1 && stored.starts_with(tag) && stored.as_bytes()[tag.len()] == b'.')
    }

    /// Removes `prefix` itself and every tag nested under `prefix + "."`.
    pub fn remove_tags_matching(&mut self, owner: ActorId, prefix: &str) {
        if let Some(set) = self.tags.get_mut(&owner) {
            set.retain(|stored| {
                !(stored == prefix
                    || (stored.len() > prefix.len() + 1
                        && stored.starts_with(prefix)
                        && stored.as_bytes()[prefix.len()] == b'.'))
            });
            if set.is_empty() {
                self.tags.remove(&owner);
            }
        }
    }

    /// Removes every tag held by `owner`.
    pub fn clear_tags(&mut self, owner: ActorId) {
        self.tags.remove(&owner);
    }

    /// Removes all tags for all owners.
    pub fn clear_all(&mut self) {
        self.tags.clear();
    }

    /// Returns `true` if `owner` holds no tags at all.
    #[must_use]
    pub fn is_empty_for(&self, owner: ActorId) -> bool {
        self.tags.get(&owner).map_or(true, BTreeSet::is_empty)
    }

    /// Returns the number of tags held by `owner`.
    #[must_use]
    pub fn tag_count(&self, owner: ActorId) -> usize {
        self.tags.get(&owner).map_or(0, BTreeSet::len)
    }
}
