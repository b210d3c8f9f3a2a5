//! Float selector: hover a launched enemy while the attack input decides.
//!
//! Two phases. *Rising* rides the entity's own launch arc up, keeping it
//! glued to the player's horizontal drift. Once the arc tops out near the
//! hover anchor the verb switches to *floating*: a zero-gravity hover above
//! the player during which exactly one input decision is resolved — a tap
//! transfers the claim to spike, a hold transfers it to dunk, and silence
//! cancels when the hover timer runs out.

use glam::{Vec2, Vec3Swizzles};
use tracing::trace;

use crate::arena::Arena;
use crate::config::FloatTuning;
use crate::entity::EntityId;
use crate::resolver::GROUND_EPSILON;
use crate::world::PlayerBody;

use super::{VerbContext, VerbKind, VerbStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FloatPhase {
    Rising,
    Floating,
}

/// State machine storage for the float selector.
#[derive(Debug, Clone)]
pub struct FloatSelectorState {
    phase: FloatPhase,
    hover_remaining_ms: f32,
    hold_elapsed_ms: f32,
    hold_started: bool,
    /// XZ offset from the player captured at claim time, so the rising pair
    /// drifts together instead of separating.
    follow_offset: Vec2,
}

impl FloatSelectorState {
    /// Creates the initial rising state.
    #[must_use]
    pub fn new(tuning: &FloatTuning) -> Self {
        Self {
            phase: FloatPhase::Rising,
            hover_remaining_ms: tuning.hover_duration_ms,
            hold_elapsed_ms: 0.0,
            hold_started: false,
            follow_offset: Vec2::ZERO,
        }
    }

    pub(super) fn on_claim(&mut self, entity: EntityId, arena: &Arena, player: &PlayerBody) {
        if let Some(e) = arena.get(entity) {
            self.follow_offset = e.transform().position.xz() - player.position.xz();
        }
    }

    pub(super) fn update(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        match self.phase {
            FloatPhase::Rising => self.update_rising(ctx),
            FloatPhase::Floating => self.update_floating(ctx),
        }
    }

    fn update_rising(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.float_selector;
        let gravity = ctx.config.physics.gravity * ctx.launches.gravity_multiplier(ctx.entity);
        let hover_y = ctx.player.position.y + tuning.hover_height;

        let Some(entity) = ctx.arena.get_mut(ctx.entity) else {
            return VerbStatus::Cancel;
        };

        // Ride the launch arc: the verb owns the entity, so it integrates the
        // vertical motion itself.
        let mut position = entity.transform().position;
        let mut velocity = entity.physics().velocity;
        position.y += velocity.y * ctx.dt;
        velocity.y -= gravity * ctx.dt;

        // Follow the player's horizontal drift at the captured offset.
        let follow = ctx.player.position.xz() + self.follow_offset;
        position.x = follow.x;
        position.z = follow.y;

        let ground = ctx.terrain.height(position.x, position.z);
        if position.y <= ground + GROUND_EPSILON && velocity.y <= 0.0 {
            // Arc ended on the floor instead of at the hover point.
            entity.transform_mut().position = position;
            entity.physics_mut().velocity = velocity;
            trace!(entity = %ctx.entity, "float selector grounded during rise");
            return VerbStatus::Cancel;
        }

        if velocity.y <= 0.0 && (position.y - hover_y).abs() <= tuning.converge_threshold {
            velocity.y = 0.0;
            self.phase = FloatPhase::Floating;
            ctx.launches.set_gravity_override(ctx.entity, 0.0);
            trace!(entity = %ctx.entity, "float selector hovering");
        }

        entity.transform_mut().position = position;
        entity.physics_mut().velocity = velocity;
        VerbStatus::Active
    }

    fn update_floating(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.float_selector;
        self.hover_remaining_ms -= ctx.real_dt_ms;

        let hover_y = ctx.player.position.y + tuning.hover_height;
        let player_xz = ctx.player.position.xz();

        if let Some(entity) = ctx.arena.get_mut(ctx.entity) {
            let mut position = entity.transform().position;
            position.y += (hover_y - position.y) * (tuning.ease_rate * ctx.dt).min(1.0);
            let eased = position.xz()
                + (player_xz - position.xz()) * (tuning.xz_converge_rate * ctx.dt).min(1.0);
            position.x = eased.x;
            position.z = eased.y;
            entity.transform_mut().position = position;
            entity.physics_mut().velocity = glam::Vec3::ZERO;
        }

        // One input decision per hover: press starts the hold timer, then
        // either an early release (tap -> spike) or outlasting the threshold
        // (hold -> dunk) resolves it.
        if self.hold_started {
            self.hold_elapsed_ms += ctx.real_dt_ms;
            if self.hold_elapsed_ms >= tuning.hold_threshold_ms {
                return VerbStatus::Transfer(VerbKind::Dunk);
            }
            if !ctx.input.attack_held {
                return VerbStatus::Transfer(VerbKind::Spike);
            }
        } else if ctx.input.attack_pressed {
            self.hold_started = true;
            self.hold_elapsed_ms = 0.0;
        }

        if self.hover_remaining_ms <= 0.0 {
            return VerbStatus::Cancel;
        }
        VerbStatus::Active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn new_state_starts_rising() {
        let config = SessionConfig::default();
        let state = FloatSelectorState::new(&config.float_selector);
        assert_eq!(state.phase, FloatPhase::Rising);
        assert!(!state.hold_started);
        assert!(
            (state.hover_remaining_ms - config.float_selector.hover_duration_ms).abs()
                < f32::EPSILON
        );
    }
}
