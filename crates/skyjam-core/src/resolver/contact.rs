//! Pairwise entity contact resolution.
//!
//! Separates overlapping entity circles and applies an elastic impulse with
//! fixed restitution, mass-weighted on both counts: the heavier entity is
//! displaced less and absorbs less of the velocity change. Hard impacts above
//! the damage threshold hurt and stun both participants.
//!
//! Pairs are visited in ascending `(i, j)` ID order; resolutions cascade
//! within the tick, so this order is part of the observable behavior.

use glam::{Vec2, Vec3, Vec3Swizzles};
use tracing::trace;

use crate::arena::Arena;
use crate::config::ImpactTuning;
use crate::entity::EntityId;
use crate::events::{CombatEvent, EventLog};
use crate::launch::LaunchRegistry;

/// Resolves entity-vs-entity overlap and impact damage.
///
/// Skips entities that are dead, flying as carrier payloads, or claimed by
/// the active verb — the claim makes the verb the sole writer of that
/// entity's motion.
#[derive(Debug, Clone)]
pub struct ContactResolver {
    tuning: ImpactTuning,
}

/// Snapshot of the fields a pair resolution reads.
#[derive(Debug, Clone, Copy)]
struct Body {
    position: Vec3,
    velocity: Vec3,
    radius: f32,
    height: f32,
    mass: f32,
}

impl ContactResolver {
    /// Creates a resolver from the impact tuning.
    #[must_use]
    pub const fn new(tuning: ImpactTuning) -> Self {
        Self { tuning }
    }

    /// Resolves all overlapping pairs of physics-active entities.
    pub fn resolve(
        &self,
        arena: &mut Arena,
        launches: &LaunchRegistry,
        events: &mut EventLog,
    ) {
        let ids: Vec<EntityId> = arena
            .entities_sorted()
            .filter(|e| !e.is_carrier_payload() && e.is_alive())
            .map(crate::entity::Entity::id)
            .filter(|id| !launches.is_claimed(*id))
            .collect();

        for i in 0..ids.len() {
            for j in (i + 1)..ids.len() {
                self.resolve_pair(ids[i], ids[j], arena, events);
            }
        }
    }

    fn read_body(arena: &Arena, id: EntityId) -> Option<Body> {
        let entity = arena.get(id)?;
        if !entity.is_alive() {
            return None;
        }
        Some(Body {
            position: entity.transform().position,
            velocity: entity.physics().velocity,
            radius: entity.physics().radius,
            height: entity.physics().height,
            mass: entity.physics().mass.max(1e-3),
        })
    }

    fn resolve_pair(
        &self,
        id_a: EntityId,
        id_b: EntityId,
        arena: &mut Arena,
        events: &mut EventLog,
    ) {
        // Re-read every pair: earlier resolutions this tick may have moved
        // or killed either participant.
        let (Some(a), Some(b)) = (Self::read_body(arena, id_a), Self::read_body(arena, id_b))
        else {
            return;
        };

        // Vertical spans must overlap; a dunked enemy overhead is not a
        // contact with the crowd below it.
        if a.position.y >= b.position.y + b.height || b.position.y >= a.position.y + a.height {
            return;
        }

        let delta = (b.position - a.position).xz();
        let distance = delta.length();
        let overlap = a.radius + b.radius - distance;
        if overlap <= 0.0 {
            return;
        }

        // Degenerate coincident centers: separate along +X, which is as
        // deterministic as any other choice.
        let normal = if distance > 1e-6 {
            delta / distance
        } else {
            Vec2::X
        };

        let total_mass = a.mass + b.mass;
        let push_a = -normal * overlap * (b.mass / total_mass);
        let push_b = normal * overlap * (a.mass / total_mass);

        let relative = (a.velocity - b.velocity).xz();
        let closing = relative.dot(normal);

        let mut velocity_a = a.velocity;
        let mut velocity_b = b.velocity;
        let mut damage_a = 0.0;
        let mut damage_b = 0.0;
        let mut stunned = false;

        if closing > 0.0 {
            let impulse =
                (1.0 + self.tuning.restitution) * closing / (1.0 / a.mass + 1.0 / b.mass);
            let delta_a = normal * (impulse / a.mass);
            let delta_b = normal * (impulse / b.mass);
            velocity_a.x -= delta_a.x;
            velocity_a.z -= delta_a.y;
            velocity_b.x += delta_b.x;
            velocity_b.z += delta_b.y;

            if closing > self.tuning.min_speed {
                let excess = closing - self.tuning.min_speed;
                let total_damage = excess * self.tuning.damage_per_unit;
                damage_a = total_damage * (b.mass / total_mass);
                damage_b = total_damage * (a.mass / total_mass);
                stunned = true;

                trace!(%id_a, %id_b, excess, "entity impact");
                events.push(CombatEvent::EntityImpact {
                    first: id_a,
                    second: id_b,
                    magnitude: excess,
                    position: (a.position + b.position) * 0.5,
                });
            }
        }

        if let Some(entity) = arena.get_mut(id_a) {
            entity.transform_mut().position.x += push_a.x;
            entity.transform_mut().position.z += push_a.y;
            entity.physics_mut().velocity = velocity_a;
            if damage_a > 0.0 {
                entity.combat_mut().apply_damage(damage_a);
            }
            if stunned {
                entity.combat_mut().apply_stun(self.tuning.stun);
            }
        }
        if let Some(entity) = arena.get_mut(id_b) {
            entity.transform_mut().position.x += push_b.x;
            entity.transform_mut().position.z += push_b.y;
            entity.physics_mut().velocity = velocity_b;
            if damage_b > 0.0 {
                entity.combat_mut().apply_damage(damage_b);
            }
            if stunned {
                entity.combat_mut().apply_stun(self.tuning.stun);
            }
        }
    }
}
