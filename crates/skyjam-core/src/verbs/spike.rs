//! Spike: bat the hovering enemy away as a ballistic payload.
//!
//! Two phases, both on wall-clock timers. *Windup* freezes the aim point on
//! its first tick (no re-aiming mid-swing), pins the player's vertical
//! velocity, and on expiry hands the enemy to the carrier sub-simulation
//! along a fixed downward-angled trajectory toward the frozen point.
//! *Recovery* is a short hang with the vertical velocity still pinned.

use glam::{Vec2, Vec3, Vec3Swizzles};
use tracing::trace;

use crate::config::SpikeTuning;
use crate::events::CombatEvent;

use super::{VerbContext, VerbStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpikePhase {
    Windup,
    Recovery,
}

/// State machine storage for the spike.
#[derive(Debug, Clone)]
pub struct SpikeState {
    phase: SpikePhase,
    remaining_ms: f32,
    /// Aim point sampled on the first windup tick and frozen thereafter.
    aim: Option<Vec3>,
}

impl SpikeState {
    /// Creates the initial windup state.
    #[must_use]
    pub fn new(tuning: &SpikeTuning) -> Self {
        Self {
            phase: SpikePhase::Windup,
            remaining_ms: tuning.windup_ms,
            aim: None,
        }
    }

    pub(super) fn update(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        match self.phase {
            SpikePhase::Windup => self.update_windup(ctx),
            SpikePhase::Recovery => self.update_recovery(ctx),
        }
    }

    fn update_windup(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        let tuning = ctx.config.spike;

        if self.aim.is_none() {
            self.aim = Some(ctx.input.aim_point);
        }
        ctx.player.velocity.y = 0.0;

        // Hold the enemy at the hover anchor while the swing charges.
        let anchor =
            ctx.player.position + Vec3::Y * ctx.config.float_selector.hover_height;
        if let Some(entity) = ctx.arena.get_mut(ctx.entity) {
            entity.transform_mut().position = anchor;
            entity.physics_mut().velocity = Vec3::ZERO;
        }

        self.remaining_ms -= ctx.real_dt_ms;
        if self.remaining_ms > 0.0 {
            return VerbStatus::Active;
        }

        // Swing lands: fixed downward angle toward the frozen aim point.
        let aim = self.aim.unwrap_or(ctx.input.aim_point);
        let mut flat = (aim - ctx.player.position).xz().normalize_or_zero();
        if flat == Vec2::ZERO {
            flat = Vec2::X;
        }
        let angle = tuning.descent_angle_deg.to_radians();
        let direction = Vec3::new(
            flat.x * angle.cos(),
            -angle.sin(),
            flat.y * angle.cos(),
        );

        if ctx
            .carriers
            .launch(ctx.arena, ctx.entity, direction, tuning.carrier)
        {
            trace!(entity = %ctx.entity, ?direction, "spike launched");
            ctx.events.push(CombatEvent::Strike {
                target: ctx.entity,
                magnitude: tuning.carrier.speed,
                position: anchor,
            });
        }

        self.phase = SpikePhase::Recovery;
        self.remaining_ms = tuning.recovery_ms;
        VerbStatus::Active
    }

    fn update_recovery(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        ctx.player.velocity.y = 0.0;
        self.remaining_ms -= ctx.real_dt_ms;
        if self.remaining_ms <= 0.0 {
            VerbStatus::Complete
        } else {
            VerbStatus::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;

    #[test]
    fn new_state_starts_in_windup() {
        let config = SessionConfig::default();
        let state = SpikeState::new(&config.spike);
        assert_eq!(state.phase, SpikePhase::Windup);
        assert!(state.aim.is_none());
        assert!((state.remaining_ms - config.spike.windup_ms).abs() < f32::EPSILON);
    }
}
