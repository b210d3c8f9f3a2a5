//! Session tuning.
//!
//! Every gameplay constant lives here as a serde-friendly struct with
//! designer-facing defaults. Construction is the only fallible surface of
//! the crate: [`SessionConfig::validate`] rejects values that would break
//! integrator math (zero gravity, non-positive radii multipliers, bounce
//! factors above 1).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A tuning value failed validation.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    /// A value that must be strictly positive was zero or negative.
    #[error("{name} must be positive (got {value})")]
    NonPositive {
        /// Field path of the offending value.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A fraction that must lie in `(0, 1]` fell outside it.
    #[error("{name} must be in (0, 1] (got {value})")]
    OutOfUnitRange {
        /// Field path of the offending value.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
}

fn require_positive(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn require_unit_fraction(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfUnitRange { name, value })
    }
}

/// Core integrator constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsTuning {
    /// Downward acceleration in units per second squared.
    pub gravity: f32,
    /// Maximum fall speed.
    pub terminal_fall_speed: f32,
    /// Horizontal speed below which a grounded entity is considered at rest.
    pub min_velocity: f32,
    /// Linear horizontal deceleration per second while grounded.
    pub ground_friction: f32,
}

impl Default for PhysicsTuning {
    fn default() -> Self {
        Self {
            gravity: 25.0,
            terminal_fall_speed: 38.0,
            min_velocity: 0.08,
            ground_friction: 11.0,
        }
    }
}

/// Wall slam thresholds and response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSlamTuning {
    /// Minimum pre-collision speed for a slam to hurt.
    pub min_speed: f32,
    /// Damage per unit of speed above the threshold.
    pub damage_per_unit: f32,
    /// Velocity retained by the reflection; must stay below 1 so every slam
    /// is lossy.
    pub bounce: f32,
    /// Stun duration applied by a damaging slam, in seconds.
    pub stun: f32,
}

impl Default for WallSlamTuning {
    fn default() -> Self {
        Self {
            min_speed: 9.0,
            damage_per_unit: 2.5,
            bounce: 0.45,
            stun: 0.7,
        }
    }
}

/// Entity-vs-entity impact response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpactTuning {
    /// Restitution coefficient for the elastic impulse.
    pub restitution: f32,
    /// Minimum closing speed for an impact to deal damage.
    pub min_speed: f32,
    /// Damage per unit of closing speed above the threshold, split by mass.
    pub damage_per_unit: f32,
    /// Stun duration applied to both participants, in seconds.
    pub stun: f32,
}

impl Default for ImpactTuning {
    fn default() -> Self {
        Self {
            restitution: 0.4,
            min_speed: 5.0,
            damage_per_unit: 1.6,
            stun: 0.4,
        }
    }
}

/// Thrown-payload ballistics and damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CarrierTuning {
    /// Launch speed along the throw direction.
    pub speed: f32,
    /// Gravity multiplier while in carrier flight (flat trajectories use
    /// small values).
    pub gravity_mult: f32,
    /// Radius around the payload that through-hits other entities.
    pub through_radius: f32,
    /// Damage dealt to each entity the payload passes through.
    pub through_damage: f32,
    /// Knockback speed applied to through-hit entities.
    pub through_knockback: f32,
    /// Ground-impact splash radius.
    pub impact_radius: f32,
    /// Ground-impact splash damage.
    pub impact_damage: f32,
    /// Ground-impact knockback speed.
    pub impact_knockback: f32,
}

impl Default for CarrierTuning {
    fn default() -> Self {
        Self {
            speed: 32.0,
            gravity_mult: 0.35,
            through_radius: 1.1,
            through_damage: 14.0,
            through_knockback: 8.0,
            impact_radius: 3.0,
            impact_damage: 22.0,
            impact_knockback: 12.0,
        }
    }
}

/// Dunk verb tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DunkTuning {
    /// Maximum distance from the player the landing point may be aimed.
    pub max_target_radius: f32,
    /// Vertical impulse applied to player and entity at the grab.
    pub rise_impulse: f32,
    /// Fixed downward speed of the slam phase.
    pub slam_speed: f32,
    /// Fraction of the horizontal gap to cover during the rise.
    pub xz_coverage: f32,
    /// Vertical offset at which the grabbed entity rides the player.
    pub carry_height: f32,
    /// Direct damage to the carried entity on impact.
    pub carry_damage: f32,
    /// Splash radius around the impact point.
    pub splash_radius: f32,
    /// Splash damage to other entities in radius.
    pub splash_damage: f32,
    /// Splash knockback speed.
    pub splash_knockback: f32,
}

impl Default for DunkTuning {
    fn default() -> Self {
        Self {
            max_target_radius: 7.5,
            rise_impulse: 12.0,
            slam_speed: 30.0,
            xz_coverage: 0.85,
            carry_height: 1.2,
            carry_damage: 28.0,
            splash_radius: 3.5,
            splash_damage: 16.0,
            splash_knockback: 10.0,
        }
    }
}

/// Spike verb tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeTuning {
    /// Windup duration in wall-clock milliseconds.
    pub windup_ms: f32,
    /// Recovery hang duration in wall-clock milliseconds.
    pub recovery_ms: f32,
    /// Downward angle of the batted trajectory, in degrees below horizontal.
    pub descent_angle_deg: f32,
    /// Ballistics of the batted payload.
    pub carrier: CarrierTuning,
}

impl Default for SpikeTuning {
    fn default() -> Self {
        Self {
            windup_ms: 320.0,
            recovery_ms: 260.0,
            descent_angle_deg: 38.0,
            carrier: CarrierTuning::default(),
        }
    }
}

/// Float selector tuning.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FloatTuning {
    /// Hover duration in wall-clock milliseconds before auto-cancel.
    pub hover_duration_ms: f32,
    /// Attack-hold time in wall-clock milliseconds separating tap (spike)
    /// from hold (dunk).
    pub hold_threshold_ms: f32,
    /// Hover anchor height above the player.
    pub hover_height: f32,
    /// Vertical gap under which the rising phase hands over to the hover.
    pub converge_threshold: f32,
    /// Exponential XZ convergence rate toward the player, per second.
    pub xz_converge_rate: f32,
    /// Exponential vertical easing rate toward the hover anchor, per second.
    pub ease_rate: f32,
}

impl Default for FloatTuning {
    fn default() -> Self {
        Self {
            hover_duration_ms: 2400.0,
            hold_threshold_ms: 190.0,
            hover_height: 1.7,
            converge_threshold: 0.8,
            xz_converge_rate: 10.0,
            ease_rate: 9.0,
        }
    }
}

/// Complete tuning for one combat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Core integrator constants.
    pub physics: PhysicsTuning,
    /// Wall slam response.
    pub wall_slam: WallSlamTuning,
    /// Entity-vs-entity impact response.
    pub impact: ImpactTuning,
    /// Dunk verb.
    pub dunk: DunkTuning,
    /// Spike verb.
    pub spike: SpikeTuning,
    /// Float selector verb.
    pub float_selector: FloatTuning,
}

impl SessionConfig {
    /// Checks every tuning value the simulation divides by or assumes a sign
    /// for.
    ///
    /// # Errors
    ///
    /// Returns the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("physics.gravity", self.physics.gravity)?;
        require_positive("physics.terminal_fall_speed", self.physics.terminal_fall_speed)?;
        require_positive("physics.min_velocity", self.physics.min_velocity)?;
        require_positive("physics.ground_friction", self.physics.ground_friction)?;

        require_positive("wall_slam.min_speed", self.wall_slam.min_speed)?;
        require_positive("wall_slam.damage_per_unit", self.wall_slam.damage_per_unit)?;
        require_unit_fraction("wall_slam.bounce", self.wall_slam.bounce)?;

        require_unit_fraction("impact.restitution", self.impact.restitution)?;
        require_positive("impact.min_speed", self.impact.min_speed)?;

        require_positive("spike.carrier.speed", self.spike.carrier.speed)?;
        require_positive("spike.carrier.through_radius", self.spike.carrier.through_radius)?;
        require_positive("spike.carrier.impact_radius", self.spike.carrier.impact_radius)?;
        require_positive("spike.windup_ms", self.spike.windup_ms)?;
        require_positive("spike.recovery_ms", self.spike.recovery_ms)?;

        require_positive("dunk.max_target_radius", self.dunk.max_target_radius)?;
        require_positive("dunk.rise_impulse", self.dunk.rise_impulse)?;
        require_positive("dunk.slam_speed", self.dunk.slam_speed)?;
        require_unit_fraction("dunk.xz_coverage", self.dunk.xz_coverage)?;

        require_positive("float_selector.hover_duration_ms", self.float_selector.hover_duration_ms)?;
        require_positive("float_selector.hold_threshold_ms", self.float_selector.hold_threshold_ms)?;
        require_positive("float_selector.converge_threshold", self.float_selector.converge_threshold)?;

        Ok(())
    }
}
