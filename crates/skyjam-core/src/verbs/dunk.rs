//! Dunk: carry the enemy up, then slam it into a chosen landing point.
//!
//! Three phases. *Grab* runs for a single tick: it fixes the landing point
//! from the aim direction (clamped to the targeting radius), snaps the enemy
//! onto the player, and kicks both upward. *Wind* rides the arc up while
//! homing the pair toward the landing XZ — the homing speed is chosen so the
//! configured fraction of the horizontal gap closes before the apex. *Slam*
//! drops at a fixed speed, converging harder as the fall progresses, and
//! completes on ground contact with direct damage plus a splash.

use glam::{Vec3, Vec3Swizzles};
use tracing::trace;

use crate::events::CombatEvent;

use super::{VerbContext, VerbStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DunkPhase {
    Grab,
    Wind,
    Slam,
}

/// State machine storage for the dunk.
#[derive(Debug, Clone)]
pub struct DunkState {
    phase: DunkPhase,
    landing: Vec3,
    slam_start_y: f32,
    total_drop: f32,
}

impl DunkState {
    /// Creates the initial grab state.
    #[must_use]
    pub fn new() -> Self {
        Self {
            phase: DunkPhase::Grab,
            landing: Vec3::ZERO,
            slam_start_y: 0.0,
            total_drop: 1.0,
        }
    }

    pub(super) fn update(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        match self.phase {
            DunkPhase::Grab => self.update_grab(ctx),
            DunkPhase::Wind => self.update_wind(ctx),
            DunkPhase::Slam => self.update_slam(ctx),
        }
    }

    /// Single-tick grab: lock the landing point, pick the pair up.
    fn update_grab(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.dunk;

        let to_aim = (ctx.input.aim_point - ctx.player.position).xz();
        let reach = to_aim.length().min(tuning.max_target_radius);
        let direction = to_aim.normalize_or_zero();
        let target = ctx.player.position.xz() + direction * reach;
        let ground = ctx.terrain.height(target.x, target.y);
        self.landing = Vec3::new(target.x, ground, target.y);

        ctx.player.velocity.y = tuning.rise_impulse;
        let carry = ctx.player.position + Vec3::Y * tuning.carry_height;
        if let Some(entity) = ctx.arena.get_mut(ctx.entity) {
            entity.transform_mut().position = carry;
            entity.physics_mut().velocity = Vec3::new(0.0, tuning.rise_impulse, 0.0);
        }

        trace!(entity = %ctx.entity, landing = ?self.landing, "dunk grab");
        ctx.events.push(CombatEvent::Grab {
            target: ctx.entity,
            magnitude: tuning.rise_impulse,
            position: ctx.player.position,
        });

        self.phase = DunkPhase::Wind;
        VerbStatus::Active
    }

    /// Rise under gravity while homing toward the landing XZ.
    fn update_wind(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.dunk;
        let gravity = ctx.config.physics.gravity;

        ctx.player.position.y += ctx.player.velocity.y * ctx.dt;
        ctx.player.velocity.y -= gravity * ctx.dt;

        // Close the configured fraction of the horizontal gap before apex.
        let to_landing = self.landing.xz() - ctx.player.position.xz();
        let gap = to_landing.length();
        if gap > 1e-4 {
            let rise_left = (ctx.player.velocity.y / gravity).max(1e-3);
            let speed = gap * tuning.xz_coverage / rise_left;
            let step = (speed * ctx.dt).min(gap);
            let moved = ctx.player.position.xz() + to_landing / gap * step;
            ctx.player.position.x = moved.x;
            ctx.player.position.z = moved.y;
        }

        self.carry_entity(ctx);

        if ctx.player.velocity.y <= 0.0 {
            ctx.player.velocity.y = -tuning.slam_speed;
            self.slam_start_y = ctx.player.position.y;
            self.total_drop = (self.slam_start_y - self.landing.y).max(1e-3);
            self.phase = DunkPhase::Slam;
            trace!(entity = %ctx.entity, "dunk slam begins");
        }
        VerbStatus::Active
    }

    /// Fixed-speed drop with convergence that hardens near impact.
    fn update_slam(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.dunk;

        ctx.player.position.y += ctx.player.velocity.y * ctx.dt;

        let progress =
            ((self.slam_start_y - ctx.player.position.y) / self.total_drop).clamp(0.0, 1.0);
        let multiplier = 0.3 + 0.7 * progress;

        let to_landing = self.landing.xz() - ctx.player.position.xz();
        let gap = to_landing.length();
        if gap > 1e-4 {
            let fall_left = ((ctx.player.position.y - self.landing.y) / tuning.slam_speed)
                .max(1e-3);
            let speed = gap / fall_left * multiplier;
            let step = (speed * ctx.dt).min(gap);
            let moved = ctx.player.position.xz() + to_landing / gap * step;
            ctx.player.position.x = moved.x;
            ctx.player.position.z = moved.y;
        }

        self.carry_entity(ctx);

        if ctx.player.position.y <= self.landing.y {
            ctx.player.position.y = self.landing.y;
            ctx.player.velocity.y = 0.0;
            return VerbStatus::Complete;
        }
        VerbStatus::Active
    }

    /// Pin the carried entity to the player and mirror the velocity so any
    /// observer reading it sees the true motion.
    fn carry_entity(&self, ctx: &mut VerbContext<'_>) {
        let carry = ctx.player.position + Vec3::Y * ctx.config.dunk.carry_height;
        let velocity = ctx.player.velocity;
        if let Some(entity) = ctx.arena.get_mut(ctx.entity) {
            entity.transform_mut().position = carry;
            entity.physics_mut().velocity = velocity;
        }
    }

    /// Impact effects: direct damage to the carried enemy, splash around the
    /// landing point.
    pub(super) fn on_complete(&mut self, ctx: &mut VerbContext<'_>) {
        let tuning = ctx.config.dunk;

        let Some(entity) = ctx.arena.get_mut(ctx.entity) else {
            return;
        };
        entity.combat_mut().apply_damage(tuning.carry_damage);
        entity.physics_mut().velocity = Vec3::ZERO;
        let mut position = entity.transform().position;
        position.y = ctx.terrain.height(position.x, position.z);
        entity.transform_mut().position = position;

        let splash: Vec<(crate::entity::EntityId, Vec3)> = ctx
            .arena
            .entities_sorted()
            .filter(|other| other.id() != ctx.entity && other.is_alive())
            .filter(|other| {
                other.transform().position.xz().distance(position.xz()) <= tuning.splash_radius
            })
            .map(|other| (other.id(), other.transform().position))
            .collect();

        for (other_id, other_pos) in splash {
            if let Some(other) = ctx.arena.get_mut(other_id) {
                other.combat_mut().apply_damage(tuning.splash_damage);
                let knock = (other_pos - position).xz().normalize_or_zero();
                other.physics_mut().velocity.x += knock.x * tuning.splash_knockback;
                other.physics_mut().velocity.z += knock.y * tuning.splash_knockback;
            }
        }

        trace!(entity = %ctx.entity, position = ?position, "dunk impact");
        ctx.events.push(CombatEvent::Impact {
            source: ctx.entity,
            magnitude: tuning.carry_damage,
            position,
        });
    }
}

impl Default for DunkState {
    fn default() -> Self {
        Self::new()
    }
}
