//! Aerial verbs: the closed set of behaviors that can claim a launched entity.
//!
//! A verb owns a launched entity's motion (and the player's vertical motion)
//! from claim to completion. The set is fixed at compile time — float
//! selector, dunk, spike — so dispatch is a plain `match` over
//! [`VerbState`]; there is no open plugin mechanism.
//!
//! # Transfer
//!
//! A verb may end its own run by handing the claim to another verb
//! ([`VerbStatus::Transfer`]): the float selector transfers to dunk or spike
//! depending on how the attack input resolves. The launch entry is reassigned
//! in place — same entry, same launch timestamp — and only the player-facing
//! verb tag changes.

mod dunk;
mod float_selector;
mod spike;

pub use dunk::DunkState;
pub use float_selector::FloatSelectorState;
pub use spike::SpikeState;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::arena::Arena;
use crate::config::SessionConfig;
use crate::entity::EntityId;
use crate::events::EventLog;
use crate::launch::LaunchRegistry;
use crate::resolver::CarrierSim;
use crate::world::{InputSnapshot, PlayerBody, TerrainQuery};

/// The closed set of aerial verbs.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VerbKind {
    /// Hover the launched entity beside the player while the attack input
    /// decides between dunk and spike.
    FloatSelector,
    /// Carry the entity up and slam it into a chosen landing point.
    Dunk,
    /// Wind up and bat the entity away as a ballistic carrier payload.
    Spike,
}

impl VerbKind {
    /// The specific player tag this verb applies alongside the generic
    /// `"Aerial"` tag.
    #[must_use]
    pub const fn player_tag(self) -> &'static str {
        match self {
            Self::FloatSelector => "Aerial.Float",
            Self::Dunk => "Aerial.Dunk",
            Self::Spike => "Aerial.Spike",
        }
    }

    /// Whether an external actor may interrupt this verb mid-run.
    ///
    /// Only the float selector is interruptible; dunk and spike are committed
    /// animations.
    #[must_use]
    pub const fn interruptible(self) -> bool {
        matches!(self, Self::FloatSelector)
    }
}

impl fmt::Display for VerbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FloatSelector => write!(f, "float_selector"),
            Self::Dunk => write!(f, "dunk"),
            Self::Spike => write!(f, "spike"),
        }
    }
}

/// Outcome of one verb update tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VerbStatus {
    /// The verb continues next tick.
    Active,
    /// The verb finished; run its completion effects and tear down.
    Complete,
    /// The verb aborted; tear down without completion effects.
    Cancel,
    /// Hand the claim to another verb. The entry is reassigned in place; the
    /// returning verb's completion callback still runs for its own result.
    Transfer(VerbKind),
}

/// Everything a verb may touch during one update tick.
///
/// The session assembles this from its own fields plus the per-tick external
/// inputs; verbs never reach around it to global state.
pub struct VerbContext<'a> {
    /// Scaled elapsed seconds for motion math.
    pub dt: f32,
    /// Unscaled elapsed milliseconds for hold/phase timers.
    pub real_dt_ms: f32,
    /// The claimed entity.
    pub entity: EntityId,
    /// The player body; verbs own its vertical motion while active.
    pub player: &'a mut PlayerBody,
    /// This tick's input snapshot.
    pub input: &'a InputSnapshot,
    /// Terrain height query.
    pub terrain: &'a dyn TerrainQuery,
    /// Entity storage.
    pub arena: &'a mut Arena,
    /// Launch entries (gravity overrides are read and written here).
    pub launches: &'a mut LaunchRegistry,
    /// Thrown-payload sub-simulation (spike hands the entity off here).
    pub carriers: &'a mut CarrierSim,
    /// Fire-and-forget event sink.
    pub events: &'a mut EventLog,
    /// Session tuning.
    pub config: &'a SessionConfig,
}

/// Per-verb state machine storage, one variant per [`VerbKind`].
#[derive(Debug, Clone)]
pub enum VerbState {
    /// Float selector phases and hold timer.
    FloatSelector(FloatSelectorState),
    /// Dunk phases and landing target.
    Dunk(DunkState),
    /// Spike phases and frozen aim point.
    Spike(SpikeState),
}

impl VerbState {
    /// Creates the initial state for the given verb kind.
    #[must_use]
    pub fn for_kind(kind: VerbKind, config: &SessionConfig) -> Self {
        match kind {
            VerbKind::FloatSelector => {
                Self::FloatSelector(FloatSelectorState::new(&config.float_selector))
            }
            VerbKind::Dunk => Self::Dunk(DunkState::new()),
            VerbKind::Spike => Self::Spike(SpikeState::new(&config.spike)),
        }
    }

    /// Returns the kind of verb this state belongs to.
    #[must_use]
    pub const fn kind(&self) -> VerbKind {
        match self {
            Self::FloatSelector(_) => VerbKind::FloatSelector,
            Self::Dunk(_) => VerbKind::Dunk,
            Self::Spike(_) => VerbKind::Spike,
        }
    }

    /// Runs the verb's claim hook right after the registry claim succeeds.
    pub fn on_claim(
        &mut self,
        entity: EntityId,
        arena: &Arena,
        player: &PlayerBody,
    ) {
        match self {
            Self::FloatSelector(state) => state.on_claim(entity, arena, player),
            Self::Dunk(_) | Self::Spike(_) => {}
        }
    }

    /// Advances the verb's state machine by one tick.
    pub fn update(&mut self, ctx: &mut VerbContext<'_>) -> VerbStatus {
        match self {
            Self::FloatSelector(state) => state.update(ctx),
            Self::Dunk(state) => state.update(ctx),
            Self::Spike(state) => state.update(ctx),
        }
    }

    /// Runs the verb's completion effects (slam impact, etc.).
    pub fn on_complete(&mut self, ctx: &mut VerbContext<'_>) {
        match self {
            Self::Dunk(state) => state.on_complete(ctx),
            Self::FloatSelector(_) | Self::Spike(_) => {}
        }
    }

    /// Runs the verb's cancellation hook.
    ///
    /// Teardown itself (entry release, tag clearing) is the engine's job;
    /// verbs only undo motion side effects they own. All current verbs leave
    /// the entity to ordinary physics once the entry is released, so this is
    /// a hook without effects today.
    pub fn on_cancel(&mut self, _entity: EntityId, _arena: &mut Arena) {
        match self {
            Self::FloatSelector(_) | Self::Dunk(_) | Self::Spike(_) => {}
        }
    }
}
