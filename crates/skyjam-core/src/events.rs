//! Combat event records for audio/VFX/UI collaborators.
//!
//! The core never reads these back — they are fire-and-forget. The session
//! pushes into an [`EventLog`] during the step and the embedding game drains
//! it afterwards with [`EventLog::take_events`].

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// A single fire-and-forget combat event.
///
/// Every variant carries the entity reference(s) involved, a numeric
/// magnitude for effect scaling, and a world position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum CombatEvent {
    /// The player grabbed a launched entity to start a dunk.
    Grab {
        /// The grabbed entity.
        target: EntityId,
        /// Arc rise impulse applied to the pair.
        magnitude: f32,
        /// Where the grab happened.
        position: Vec3,
    },
    /// A spike batted an entity away as a carrier payload.
    Strike {
        /// The struck entity.
        target: EntityId,
        /// Launch speed of the payload.
        magnitude: f32,
        /// Where the strike happened.
        position: Vec3,
    },
    /// A dunk slam or carrier payload hit the ground.
    Impact {
        /// The entity that came down.
        source: EntityId,
        /// Direct damage dealt at the point of impact.
        magnitude: f32,
        /// Impact location.
        position: Vec3,
    },
    /// An entity slammed into a wall above the damage threshold.
    WallSlam {
        /// The slammed entity.
        entity: EntityId,
        /// Speed in excess of the slam threshold.
        magnitude: f32,
        /// Contact location.
        position: Vec3,
    },
    /// Two entities collided hard enough to take damage.
    EntityImpact {
        /// Lower-ID participant.
        first: EntityId,
        /// Higher-ID participant (or the through-hit target for carriers).
        second: EntityId,
        /// Closing speed in excess of the impact threshold, or the damage
        /// dealt for carrier through-hits.
        magnitude: f32,
        /// Midpoint of the contact.
        position: Vec3,
    },
    /// A grounded entity fell into a pit and died.
    PitFall {
        /// The doomed entity.
        entity: EntityId,
        /// Horizontal speed at the moment of the fall.
        magnitude: f32,
        /// Where it fell.
        position: Vec3,
    },
}

/// Buffer of events produced during a step.
///
/// Single-threaded by design: the session owns the log and hands out drained
/// vectors, so no locking is needed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventLog {
    events: Vec<CombatEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an event.
    pub fn push(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in push order.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }

    /// Returns the number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Returns `true` if no events are buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Iterates buffered events without draining them.
    pub fn iter(&self) -> impl Iterator<Item = &CombatEvent> + '_ {
        self.events.iter()
    }

    /// Drops all buffered events without returning them.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_take_preserves_order() {
        let mut log = EventLog::new();
        log.push(CombatEvent::Grab {
            target: EntityId::new(1),
            magnitude: 12.0,
            position: Vec3::ZERO,
        });
        log.push(CombatEvent::PitFall {
            entity: EntityId::new(2),
            magnitude: 3.0,
            position: Vec3::ONE,
        });

        let events = log.take_events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CombatEvent::Grab { .. }));
        assert!(matches!(events[1], CombatEvent::PitFall { .. }));
        assert!(log.is_empty());
    }

    #[test]
    fn take_on_empty_returns_empty() {
        let mut log = EventLog::new();
        assert!(log.take_events().is_empty());
    }

    #[test]
    fn serialization_roundtrip() {
        let event = CombatEvent::WallSlam {
            entity: EntityId::new(3),
            magnitude: 4.5,
            position: Vec3::new(1.0, 0.0, -2.0),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: CombatEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }
}
