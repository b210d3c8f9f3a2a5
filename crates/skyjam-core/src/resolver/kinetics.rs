//! Kinetic integrator: substepped velocity integration for free entities.
//!
//! Drives every velocity-carrying entity that no verb owns: horizontal
//! motion resolved against the collision field in substeps (so a fast entity
//! cannot tunnel through a thin wall), pit deaths, wall slams, vertical
//! gravity with per-entity overrides from the launch registry, and ground
//! friction.

use glam::{Vec2, Vec3Swizzles};
use tracing::trace;

use crate::arena::Arena;
use crate::config::{PhysicsTuning, WallSlamTuning};
use crate::entity::{EntityId, StatusFlags};
use crate::events::{CombatEvent, EventLog};
use crate::field::CollisionField;
use crate::launch::LaunchRegistry;
use crate::world::TerrainQuery;

use super::GROUND_EPSILON;

/// Integrates free entities against the collision field.
///
/// # Ownership
///
/// Entities that are dead, flying as carrier payloads, or claimed by the
/// active verb are skipped entirely — the claim makes the verb the sole
/// writer of that entity's motion for the tick. Launched-but-unclaimed
/// entities still integrate here, with their gravity override applied.
#[derive(Debug, Clone)]
pub struct KineticIntegrator {
    physics: PhysicsTuning,
    wall_slam: WallSlamTuning,
}

impl KineticIntegrator {
    /// Creates an integrator from the physics and wall slam tuning.
    #[must_use]
    pub const fn new(physics: PhysicsTuning, wall_slam: WallSlamTuning) -> Self {
        Self { physics, wall_slam }
    }

    /// Advances all free entities by `dt` seconds.
    pub fn apply_velocities(
        &self,
        dt: f32,
        arena: &mut Arena,
        field: &CollisionField,
        launches: &LaunchRegistry,
        terrain: &dyn TerrainQuery,
        events: &mut EventLog,
    ) {
        if dt <= 0.0 {
            return;
        }

        let ids: Vec<EntityId> = arena.entity_ids_sorted().collect();
        for id in ids {
            let skip = {
                let Some(entity) = arena.get(id) else { continue };
                !entity.is_alive() || entity.is_carrier_payload() || launches.is_claimed(id)
            };
            if skip {
                continue;
            }
            self.integrate_entity(dt, id, arena, field, launches, terrain, events);
        }
    }

    #[allow(clippy::too_many_lines)]
    fn integrate_entity(
        &self,
        dt: f32,
        id: EntityId,
        arena: &mut Arena,
        field: &CollisionField,
        launches: &LaunchRegistry,
        terrain: &dyn TerrainQuery,
        events: &mut EventLog,
    ) {
        let Some(entity) = arena.get_mut(id) else {
            return;
        };

        let radius = entity.physics().radius.max(0.05);
        let mut position = entity.transform().position;
        let mut velocity = entity.physics().velocity;

        let ground = terrain.height(position.x, position.z);
        let grounded = position.y <= ground + GROUND_EPSILON && velocity.y <= 0.0;
        let pre_speed = velocity.xz().length();

        // Rest state: nothing to integrate, nothing to pay for.
        if grounded && pre_speed < self.physics.min_velocity && velocity.y == 0.0 {
            entity.physics_mut().velocity = glam::Vec3::ZERO;
            return;
        }

        // Substepped horizontal advance. The substep count scales with the
        // travel distance relative to the entity radius so a single tick can
        // never step across a wall thinner than the entity.
        let travel = pre_speed * dt;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let substeps = ((travel / radius).ceil() as usize).max(1);
        #[allow(clippy::cast_precision_loss)]
        let sub_dt = dt / substeps as f32;

        let mut contact_normal = Vec2::ZERO;
        let mut hit_wall = false;

        for _ in 0..substeps {
            position.x += velocity.x * sub_dt;
            position.z += velocity.z * sub_dt;

            if grounded && field.point_in_pit(position.x, position.z) {
                trace!(%id, x = position.x, z = position.z, "pit death");
                let combat = entity.combat_mut();
                combat.hp = 0.0;
                combat.status_flags.insert(StatusFlags::FELL_IN_PIT);
                entity.physics_mut().velocity = glam::Vec3::ZERO;
                entity.transform_mut().position = position;
                events.push(CombatEvent::PitFall {
                    entity: id,
                    magnitude: pre_speed,
                    position,
                });
                return;
            }

            if let Some(contact) = field.resolve_circle(position.x, position.z, position.y, radius)
            {
                position.x += contact.push.x;
                position.z += contact.push.y;
                contact_normal += contact.normal;
                hit_wall = true;
                break;
            }
        }

        if hit_wall && pre_speed > self.wall_slam.min_speed {
            let excess = pre_speed - self.wall_slam.min_speed;
            let combat = entity.combat_mut();
            combat.apply_damage(excess * self.wall_slam.damage_per_unit);
            combat.apply_stun(self.wall_slam.stun);

            let normal = contact_normal.normalize_or_zero();
            if normal != Vec2::ZERO {
                let v = velocity.xz();
                let reflected = (v - 2.0 * v.dot(normal) * normal) * self.wall_slam.bounce;
                velocity.x = reflected.x;
                velocity.z = reflected.y;
            }
            trace!(%id, excess, "wall slam");
            events.push(CombatEvent::WallSlam {
                entity: id,
                magnitude: excess,
                position,
            });
        }

        // Vertical integration with the launch registry's gravity override.
        let ground = terrain.height(position.x, position.z);
        if position.y > ground + GROUND_EPSILON || velocity.y > 0.0 {
            position.y += velocity.y * dt;
            velocity.y -= self.physics.gravity * launches.gravity_multiplier(id) * dt;
            velocity.y = velocity.y.max(-self.physics.terminal_fall_speed);
            if position.y <= ground {
                position.y = ground;
                velocity.y = 0.0;
            }
        } else {
            position.y = ground;
            velocity.y = 0.0;
        }

        // Ground friction: linear deceleration, snapped to zero below the
        // rest threshold to stop perpetual creeping.
        let grounded = position.y <= ground + GROUND_EPSILON && velocity.y == 0.0;
        if grounded {
            let horizontal = velocity.xz();
            let speed = horizontal.length();
            if speed > self.physics.min_velocity {
                let mut slowed = (speed - self.physics.ground_friction * dt).max(0.0);
                if slowed < self.physics.min_velocity {
                    slowed = 0.0;
                }
                let scaled = horizontal * (slowed / speed);
                velocity.x = scaled.x;
                velocity.z = scaled.y;
            } else if speed > 0.0 {
                velocity.x = 0.0;
                velocity.z = 0.0;
            }
        }

        entity.transform_mut().position = position;
        entity.physics_mut().velocity = velocity;
    }
}
