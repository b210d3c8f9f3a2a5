//! Physics stages of the step pipeline.
//!
//! Each stage is a struct holding its slice of the tuning and a single entry
//! point the session calls in a fixed order every tick:
//!
//! 1. [`KineticIntegrator`] — substepped velocity integration against the
//!    collision field (gravity, friction, wall slam, pit death).
//! 2. [`ContactResolver`] — pairwise entity separation and impulse response.
//! 3. [`CarrierSim`] — independent ballistic thrown payloads.
//!
//! All stages mutate the arena directly and in ascending entity-ID order;
//! within one tick their effects cascade, so the order above is part of the
//! simulation's observable behavior.

mod carrier;
mod contact;
mod kinetics;

pub use carrier::CarrierSim;
pub use contact::ContactResolver;
pub use kinetics::KineticIntegrator;

/// Altitude tolerance for grounded checks, in world units.
pub(crate) const GROUND_EPSILON: f32 = 1e-3;
