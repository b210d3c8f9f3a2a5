//! Carrier sub-simulation: entities thrown as ballistic projectiles.
//!
//! A spiked (or otherwise thrown) entity leaves normal physics entirely: it
//! becomes a *carrier payload*, flying under its own gravity scale, punching
//! through every distinct entity it passes — never the same one twice — and
//! detonating a small area hit where it lands. On landing the entity rejoins
//! ordinary physics.

use std::collections::BTreeSet;

use glam::{Vec3, Vec3Swizzles};
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::config::CarrierTuning;
use crate::entity::{EntityId, StatusFlags};
use crate::events::{CombatEvent, EventLog};
use crate::world::TerrainQuery;

/// One in-flight thrown payload.
#[derive(Debug, Clone)]
struct CarrierState {
    payload: EntityId,
    tuning: CarrierTuning,
    /// Entities already hit by this carrier. Seeded with the payload itself
    /// so it never damages itself.
    already_hit: BTreeSet<EntityId>,
}

/// The set of active carriers, updated once per tick after the contact
/// resolver.
#[derive(Debug, Clone, Default)]
pub struct CarrierSim {
    active: Vec<CarrierState>,
}

impl CarrierSim {
    /// Creates an empty carrier set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts `payload` into a ballistic projectile along `direction`.
    ///
    /// Returns `false` without mutation if the payload does not exist or the
    /// direction is degenerate.
    pub fn launch(
        &mut self,
        arena: &mut Arena,
        payload: EntityId,
        direction: Vec3,
        tuning: CarrierTuning,
    ) -> bool {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return false;
        }
        let Some(entity) = arena.get_mut(payload) else {
            return false;
        };

        entity.physics_mut().velocity = dir * tuning.speed;
        entity
            .combat_mut()
            .status_flags
            .insert(StatusFlags::CARRIER_PAYLOAD);

        debug!(%payload, ?dir, speed = tuning.speed, "carrier launched");
        let mut already_hit = BTreeSet::new();
        already_hit.insert(payload);
        self.active.push(CarrierState {
            payload,
            tuning,
            already_hit,
        });
        true
    }

    /// Returns the number of in-flight carriers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Returns `true` if no carriers are in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Drops all in-flight carriers, clearing their payload flags.
    pub fn clear(&mut self, arena: &mut Arena) {
        for carrier in self.active.drain(..) {
            if let Some(entity) = arena.get_mut(carrier.payload) {
                entity
                    .combat_mut()
                    .status_flags
                    .remove(StatusFlags::CARRIER_PAYLOAD);
            }
        }
    }

    /// Advances every carrier by `dt` seconds.
    pub fn update(
        &mut self,
        dt: f32,
        arena: &mut Arena,
        terrain: &dyn TerrainQuery,
        gravity: f32,
        events: &mut EventLog,
    ) {
        let mut index = 0;
        while index < self.active.len() {
            let finished = Self::update_one(
                &mut self.active[index],
                dt,
                arena,
                terrain,
                gravity,
                events,
            );
            if finished {
                self.active.swap_remove(index);
            } else {
                index += 1;
            }
        }
    }

    /// Advances one carrier. Returns `true` when it should be retired.
    fn update_one(
        carrier: &mut CarrierState,
        dt: f32,
        arena: &mut Arena,
        terrain: &dyn TerrainQuery,
        gravity: f32,
        events: &mut EventLog,
    ) -> bool {
        let payload = carrier.payload;

        // Payload despawned mid-flight (killed by something else): retire.
        let Some(entity) = arena.get_mut(payload) else {
            return true;
        };

        // Ballistic integration under the carrier's own gravity scale.
        let mut velocity = entity.physics().velocity;
        velocity.y -= gravity * carrier.tuning.gravity_mult * dt;
        let position = entity.transform().position + velocity * dt;
        entity.physics_mut().velocity = velocity;
        entity.transform_mut().position = position;

        // Through-hits: damage every living non-payload entity in range that
        // this carrier has not hit before.
        let targets: Vec<(EntityId, Vec3, f32)> = arena
            .entities_sorted()
            .filter(|other| {
                other.id() != payload
                    && other.is_alive()
                    && !other.is_carrier_payload()
                    && !carrier.already_hit.contains(&other.id())
            })
            .map(|other| (other.id(), other.transform().position, other.physics().radius))
            .collect();

        for (other_id, other_pos, other_radius) in targets {
            if position.distance(other_pos) > carrier.tuning.through_radius + other_radius {
                continue;
            }
            carrier.already_hit.insert(other_id);
            trace!(%payload, target = %other_id, "carrier through-hit");

            if let Some(other) = arena.get_mut(other_id) {
                other.combat_mut().apply_damage(carrier.tuning.through_damage);
                let mut knock = (other_pos - position).xz().normalize_or_zero();
                if knock == glam::Vec2::ZERO {
                    knock = velocity.xz().normalize_or_zero();
                }
                other.physics_mut().velocity.x += knock.x * carrier.tuning.through_knockback;
                other.physics_mut().velocity.z += knock.y * carrier.tuning.through_knockback;
            }
            events.push(CombatEvent::EntityImpact {
                first: payload,
                second: other_id,
                magnitude: carrier.tuning.through_damage,
                position,
            });
        }

        // Ground contact: area impact, then hand the payload back to normal
        // physics.
        let ground = terrain.height(position.x, position.z);
        if position.y > ground {
            return false;
        }

        let impact_pos = Vec3::new(position.x, ground, position.z);
        let splash: Vec<(EntityId, Vec3)> = arena
            .entities_sorted()
            .filter(|other| other.id() != payload && other.is_alive())
            .filter(|other| {
                other.transform().position.xz().distance(impact_pos.xz())
                    <= carrier.tuning.impact_radius
            })
            .map(|other| (other.id(), other.transform().position))
            .collect();

        for (other_id, other_pos) in splash {
            if let Some(other) = arena.get_mut(other_id) {
                other.combat_mut().apply_damage(carrier.tuning.impact_damage);
                let knock = (other_pos - impact_pos).xz().normalize_or_zero();
                other.physics_mut().velocity.x += knock.x * carrier.tuning.impact_knockback;
                other.physics_mut().velocity.z += knock.y * carrier.tuning.impact_knockback;
            }
        }

        if let Some(entity) = arena.get_mut(payload) {
            entity.transform_mut().position = impact_pos;
            entity.physics_mut().velocity = Vec3::ZERO;
            entity
                .combat_mut()
                .status_flags
                .remove(StatusFlags::CARRIER_PAYLOAD);
        }
        debug!(%payload, "carrier landed");
        events.push(CombatEvent::Impact {
            source: payload,
            magnitude: carrier.tuning.impact_damage,
            position: impact_pos,
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CombatantComponents;
    use crate::world::FlatTerrain;

    const GRAVITY: f32 = 25.0;

    fn spawn_at(arena: &mut Arena, position: Vec3) -> EntityId {
        arena.spawn(CombatantComponents::at_position(position))
    }

    fn flat_tuning() -> CarrierTuning {
        CarrierTuning {
            gravity_mult: 0.0,
            ..CarrierTuning::default()
        }
    }

    #[test]
    fn launch_sets_velocity_and_flag() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::new(0.0, 2.0, 0.0));
        let mut carriers = CarrierSim::new();

        assert!(carriers.launch(
            &mut arena,
            payload,
            Vec3::new(1.0, 0.0, 0.0),
            flat_tuning()
        ));

        let entity = arena.get(payload).unwrap();
        assert!(entity.is_carrier_payload());
        let speed = entity.physics().velocity.length();
        assert!((speed - flat_tuning().speed).abs() < 1e-4);
        assert_eq!(carriers.len(), 1);
    }

    #[test]
    fn launch_rejects_zero_direction() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::ZERO);
        let mut carriers = CarrierSim::new();
        assert!(!carriers.launch(&mut arena, payload, Vec3::ZERO, flat_tuning()));
        assert!(carriers.is_empty());
        assert!(!arena.get(payload).unwrap().is_carrier_payload());
    }

    #[test]
    fn launch_rejects_missing_payload() {
        let mut arena = Arena::new();
        let mut carriers = CarrierSim::new();
        assert!(!carriers.launch(&mut arena, EntityId::new(9), Vec3::X, flat_tuning()));
    }

    #[test]
    fn through_hit_chains_without_repeats() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::new(0.0, 1.0, 0.0));
        let target = spawn_at(&mut arena, Vec3::new(3.0, 1.0, 0.0));

        let mut carriers = CarrierSim::new();
        assert!(carriers.launch(&mut arena, payload, Vec3::X, flat_tuning()));

        let terrain = FlatTerrain::at(0.0);
        let mut events = EventLog::new();
        // Fly the payload past the target.
        for _ in 0..20 {
            carriers.update(1.0 / 60.0, &mut arena, &terrain, GRAVITY, &mut events);
        }

        let damage = 100.0 - arena.get(target).unwrap().combat().hp;
        assert!(
            (damage - flat_tuning().through_damage).abs() < 1e-3,
            "target hit exactly once, damage={damage}"
        );
        // Knocked away from the flight line.
        assert!(arena.get(target).unwrap().physics().velocity.x > 0.0);
    }

    #[test]
    fn payload_never_hits_itself() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::new(0.0, 1.0, 0.0));
        let mut carriers = CarrierSim::new();
        assert!(carriers.launch(&mut arena, payload, Vec3::X, flat_tuning()));

        let terrain = FlatTerrain::at(0.0);
        let mut events = EventLog::new();
        carriers.update(1.0 / 60.0, &mut arena, &terrain, GRAVITY, &mut events);

        assert_eq!(arena.get(payload).unwrap().combat().hp, 100.0);
    }

    #[test]
    fn ground_impact_splashes_and_retires() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::new(0.0, 3.0, 0.0));
        let bystander = spawn_at(&mut arena, Vec3::new(1.0, 0.0, 0.0));
        let far_away = spawn_at(&mut arena, Vec3::new(50.0, 0.0, 0.0));

        let mut carriers = CarrierSim::new();
        // Straight down.
        let tuning = CarrierTuning {
            through_radius: 0.1,
            ..CarrierTuning::default()
        };
        assert!(carriers.launch(&mut arena, payload, Vec3::NEG_Y, tuning));

        let terrain = FlatTerrain::at(0.0);
        let mut events = EventLog::new();
        for _ in 0..30 {
            carriers.update(1.0 / 60.0, &mut arena, &terrain, GRAVITY, &mut events);
        }

        assert!(carriers.is_empty(), "carrier should retire on landing");
        let payload_entity = arena.get(payload).unwrap();
        assert!(!payload_entity.is_carrier_payload());
        assert_eq!(payload_entity.physics().velocity, Vec3::ZERO);
        assert_eq!(payload_entity.transform().position.y, 0.0);

        assert!(
            arena.get(bystander).unwrap().combat().hp < 100.0,
            "bystander in splash radius takes damage"
        );
        assert_eq!(arena.get(far_away).unwrap().combat().hp, 100.0);
        assert!(events
            .iter()
            .any(|e| matches!(e, CombatEvent::Impact { .. })));
    }

    #[test]
    fn despawned_payload_retires_carrier() {
        let mut arena = Arena::new();
        let payload = spawn_at(&mut arena, Vec3::new(0.0, 5.0, 0.0));
        let mut carriers = CarrierSim::new();
        assert!(carriers.launch(&mut arena, payload, Vec3::X, flat_tuning()));

        arena.despawn(payload);
        let terrain = FlatTerrain::at(0.0);
        carriers.update(1.0 / 60.0, &mut arena, &terrain, GRAVITY, &mut EventLog::new());
        assert!(carriers.is_empty());
    }
}
