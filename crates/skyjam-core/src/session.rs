//! Combat session: owns the world state and drives the tick pipeline.
//!
//! [`CombatSession`] is the single entry point of the crate. It owns the
//! arena, the tag and launch registries, the collision field, the carrier
//! set, and the active aerial verb — there is no module-level mutable state
//! anywhere. The embedding game calls [`CombatSession::step`] once per fixed
//! tick with the external inputs and drains the event log afterwards.
//!
//! # Tick pipeline
//!
//! 1. Stun timers tick down.
//! 2. The active verb updates (it may override the player's and the claimed
//!    entity's motion directly, bypassing the integrator for both).
//! 3. The kinetic integrator advances every other velocity-driven entity.
//! 4. The contact resolver separates overlapping pairs.
//! 5. The carrier sub-simulation advances thrown payloads.
//! 6. Dead and pit-fallen entities are cleaned up.
//!
//! # Time
//!
//! `dt` is scaled elapsed seconds — a global slow-motion factor flows
//! through every motion computation. `real_dt_ms` is unscaled wall-clock
//! milliseconds, consumed only by the hold-vs-tap decision and verb phase
//! durations, which must feel identical at any time scale.
//!
//! # Example
//!
//! ```
//! use skyjam_core::config::SessionConfig;
//! use skyjam_core::entity::CombatantComponents;
//! use skyjam_core::session::{CombatSession, StepInput};
//! use skyjam_core::verbs::VerbKind;
//! use skyjam_core::world::{FlatTerrain, InputSnapshot, PlayerBody};
//! use glam::Vec3;
//!
//! let mut session = CombatSession::new(SessionConfig::default()).unwrap();
//! let mut player = PlayerBody::default();
//!
//! // Launch an enemy into the air and float-select it.
//! let mut components = CombatantComponents::at_position(Vec3::new(1.0, 0.0, 0.0));
//! components.physics.velocity = Vec3::new(0.0, 12.0, 0.0);
//! let enemy = session.arena_mut().spawn(components);
//! session.launch_entity(enemy);
//! assert!(session.activate_verb(VerbKind::FloatSelector, enemy, &player));
//!
//! let terrain = FlatTerrain::at(0.0);
//! session.step(StepInput {
//!     dt: 1.0 / 60.0,
//!     real_dt_ms: 1000.0 / 60.0,
//!     player: &mut player,
//!     input: InputSnapshot::default(),
//!     terrain: &terrain,
//! });
//!
//! assert_eq!(session.active_verb(), Some((VerbKind::FloatSelector, enemy)));
//! ```

use tracing::debug;

use glam::Vec3;

use crate::arena::Arena;
use crate::config::{CarrierTuning, ConfigError, SessionConfig};
use crate::entity::{EntityId, StatusFlags};
use crate::events::{CombatEvent, EventLog};
use crate::field::{ArenaLayout, CollisionField};
use crate::launch::LaunchRegistry;
use crate::resolver::{CarrierSim, ContactResolver, KineticIntegrator};
use crate::tags::{ActorId, TagRegistry};
use crate::verbs::{VerbContext, VerbKind, VerbState, VerbStatus};
use crate::world::{InputSnapshot, PlayerBody, TerrainQuery};

/// The currently running aerial verb.
#[derive(Debug)]
struct ActiveVerb {
    kind: VerbKind,
    entity: EntityId,
    state: VerbState,
}

/// External inputs for one tick.
pub struct StepInput<'a> {
    /// Scaled elapsed seconds.
    pub dt: f32,
    /// Unscaled elapsed milliseconds for wall-clock timers.
    pub real_dt_ms: f32,
    /// The player body; the session may override its vertical motion.
    pub player: &'a mut PlayerBody,
    /// This tick's input snapshot.
    pub input: InputSnapshot,
    /// Terrain height query.
    pub terrain: &'a dyn TerrainQuery,
}

/// One combat session: world state plus the aerial-verb engine.
#[derive(Debug)]
pub struct CombatSession {
    config: SessionConfig,
    arena: Arena,
    tags: TagRegistry,
    launches: LaunchRegistry,
    field: CollisionField,
    carriers: CarrierSim,
    events: EventLog,
    kinetics: KineticIntegrator,
    contacts: ContactResolver,
    active: Option<ActiveVerb>,
    sim_time: f32,
}

impl CombatSession {
    /// Creates a session over an empty, unbounded arena.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any tuning value fails validation.
    pub fn new(config: SessionConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            kinetics: KineticIntegrator::new(config.physics, config.wall_slam),
            contacts: ContactResolver::new(config.impact),
            config,
            arena: Arena::new(),
            tags: TagRegistry::new(),
            launches: LaunchRegistry::new(),
            field: CollisionField::default(),
            carriers: CarrierSim::new(),
            events: EventLog::new(),
            active: None,
            sim_time: 0.0,
        })
    }

    /// Creates a session with the given arena layout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if any tuning value fails validation.
    pub fn with_layout(config: SessionConfig, layout: ArenaLayout) -> Result<Self, ConfigError> {
        let mut session = Self::new(config)?;
        session.field = CollisionField::new(layout);
        Ok(session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the entity arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the mutable entity arena (spawning, direct state edits).
    #[must_use]
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Returns the tag registry.
    #[must_use]
    pub const fn tags(&self) -> &TagRegistry {
        &self.tags
    }

    /// Returns the mutable tag registry (for gameplay code applying its own
    /// tags).
    #[must_use]
    pub fn tags_mut(&mut self) -> &mut TagRegistry {
        &mut self.tags
    }

    /// Returns the launch registry.
    #[must_use]
    pub const fn launches(&self) -> &LaunchRegistry {
        &self.launches
    }

    /// Returns the session tuning.
    #[must_use]
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Returns elapsed simulation time in scaled seconds.
    #[must_use]
    pub const fn sim_time(&self) -> f32 {
        self.sim_time
    }

    /// Returns the active verb and its claimed entity, if any.
    #[must_use]
    pub fn active_verb(&self) -> Option<(VerbKind, EntityId)> {
        self.active.as_ref().map(|a| (a.kind, a.entity))
    }

    /// Drains the events produced since the last call.
    pub fn take_events(&mut self) -> Vec<CombatEvent> {
        self.events.take_events()
    }

    /// Replaces the arena layout and invalidates the collision cache.
    pub fn set_arena_layout(&mut self, layout: ArenaLayout) {
        self.field.set_layout(layout);
    }

    // =========================================================================
    // Launch and verb surface
    // =========================================================================

    /// Registers `entity` as launched (airborne and claimable).
    ///
    /// A no-op if the entity does not exist, is dead, or is already launched.
    pub fn launch_entity(&mut self, entity: EntityId) {
        if self.arena.get(entity).map_or(false, crate::entity::Entity::is_alive) {
            self.launches.register(entity, self.sim_time);
        }
    }

    /// Sets the gravity multiplier on an existing launch entry.
    pub fn set_launch_gravity(&mut self, entity: EntityId, mult: f32) {
        self.launches.set_gravity_override(entity, mult);
    }

    /// Activates `kind` on a launched entity.
    ///
    /// Fails (returning `false`, mutating nothing) if another verb is already
    /// active, the entity is missing or dead, it has no launch entry, or the
    /// claim slot is taken.
    pub fn activate_verb(&mut self, kind: VerbKind, entity: EntityId, player: &PlayerBody) -> bool {
        if self.active.is_some() {
            return false;
        }
        if !self.arena.get(entity).map_or(false, crate::entity::Entity::is_alive) {
            return false;
        }
        if self.launches.get(entity).is_none() {
            return false;
        }
        if !self.launches.claim(entity, kind) {
            return false;
        }

        self.tags.add_tag(ActorId::Player, "Aerial");
        self.tags.add_tag(ActorId::Player, kind.player_tag());
        self.tags.add_tag(ActorId::Entity(entity), "Stunned");

        let mut state = VerbState::for_kind(kind, &self.config);
        state.on_claim(entity, &self.arena, player);

        debug!(%entity, %kind, "verb activated");
        self.active = Some(ActiveVerb {
            kind,
            entity,
            state,
        });
        true
    }

    /// Force-cancels any active verb and clears the entire launch registry.
    ///
    /// Used on session reset; afterwards no launch, claim, or aerial tag
    /// state remains. In-flight carriers are dropped too — their payloads
    /// simply rejoin ordinary physics wherever they are.
    pub fn reset_aerial_verbs(&mut self) {
        if let Some(mut active) = self.active.take() {
            let entity = active.entity;
            active.state.on_cancel(entity, &mut self.arena);
            self.clear_verb_tags(entity);
            debug!(%entity, kind = %active.kind, "verb force-cancelled by reset");
        }
        self.launches.clear();
        self.carriers.clear(&mut self.arena);
    }

    /// Launches an arbitrary entity as a carrier payload.
    ///
    /// This is the external surface of the carrier sub-simulation; the spike
    /// verb uses the same path internally.
    pub fn launch_carrier(
        &mut self,
        payload: EntityId,
        direction: Vec3,
        tuning: CarrierTuning,
    ) -> bool {
        self.carriers.launch(&mut self.arena, payload, direction, tuning)
    }

    // =========================================================================
    // Tick pipeline
    // =========================================================================

    /// Advances the simulation by one tick.
    pub fn step(&mut self, input: StepInput<'_>) {
        let dt = input.dt.max(0.0);

        for entity in self.arena.entities_sorted_mut() {
            let combat = entity.combat_mut();
            combat.stun_remaining = (combat.stun_remaining - dt).max(0.0);
        }

        self.update_verb(dt, input.real_dt_ms, input.player, &input.input, input.terrain);

        self.kinetics.apply_velocities(
            dt,
            &mut self.arena,
            &self.field,
            &self.launches,
            input.terrain,
            &mut self.events,
        );
        self.contacts
            .resolve(&mut self.arena, &self.launches, &mut self.events);
        self.carriers.update(
            dt,
            &mut self.arena,
            input.terrain,
            self.config.physics.gravity,
            &mut self.events,
        );

        self.cleanup();

        self.sim_time += dt;
        self.arena.advance_tick();
    }

    /// Runs the active verb's guard and state machine for one tick.
    fn update_verb(
        &mut self,
        dt: f32,
        real_dt_ms: f32,
        player: &mut PlayerBody,
        input: &InputSnapshot,
        terrain: &dyn TerrainQuery,
    ) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        let entity = active.entity;

        // Guard: the claimed entity may have despawned, died, or fallen into
        // a pit since last tick. Tear down before running any verb logic.
        let entry_exists = self.launches.get(entity).is_some();
        let healthy = self.arena.get(entity).map_or(false, |e| {
            e.is_alive() && !e.combat().status_flags.contains(StatusFlags::FELL_IN_PIT)
        });
        if !entry_exists || !healthy {
            debug!(%entity, kind = %active.kind, "forced verb teardown");
            active.state.on_cancel(entity, &mut self.arena);
            self.launches.release(entity);
            self.clear_verb_tags(entity);
            return;
        }

        let status = {
            let mut ctx = VerbContext {
                dt,
                real_dt_ms,
                entity,
                player: &mut *player,
                input,
                terrain,
                arena: &mut self.arena,
                launches: &mut self.launches,
                carriers: &mut self.carriers,
                events: &mut self.events,
                config: &self.config,
            };
            active.state.update(&mut ctx)
        };

        match status {
            VerbStatus::Active => {
                self.active = Some(active);
            }
            VerbStatus::Complete => {
                let mut ctx = VerbContext {
                    dt,
                    real_dt_ms,
                    entity,
                    player: &mut *player,
                    input,
                    terrain,
                    arena: &mut self.arena,
                    launches: &mut self.launches,
                    carriers: &mut self.carriers,
                    events: &mut self.events,
                    config: &self.config,
                };
                active.state.on_complete(&mut ctx);
                self.launches.release(entity);
                self.clear_verb_tags(entity);
                debug!(%entity, kind = %active.kind, "verb complete");
            }
            VerbStatus::Cancel => {
                active.state.on_cancel(entity, &mut self.arena);
                self.launches.release(entity);
                self.clear_verb_tags(entity);
                debug!(%entity, kind = %active.kind, "verb cancelled");
            }
            VerbStatus::Transfer(new_kind) => {
                // The finishing verb's completion callback runs for its own
                // result; the entry itself is reassigned in place so the
                // launch timestamp survives the hand-off.
                {
                    let mut ctx = VerbContext {
                        dt,
                        real_dt_ms,
                        entity,
                        player: &mut *player,
                        input,
                        terrain,
                        arena: &mut self.arena,
                        launches: &mut self.launches,
                        carriers: &mut self.carriers,
                        events: &mut self.events,
                        config: &self.config,
                    };
                    active.state.on_complete(&mut ctx);
                }

                if self.launches.transfer_claim(entity, new_kind) {
                    self.tags
                        .remove_tag(ActorId::Player, active.kind.player_tag());
                    self.tags.add_tag(ActorId::Player, new_kind.player_tag());

                    let mut state = VerbState::for_kind(new_kind, &self.config);
                    state.on_claim(entity, &self.arena, player);
                    debug!(%entity, from = %active.kind, to = %new_kind, "claim transferred");
                    self.active = Some(ActiveVerb {
                        kind: new_kind,
                        entity,
                        state,
                    });
                } else {
                    // Entry vanished inside the update; degrade to teardown.
                    self.clear_verb_tags(entity);
                }
            }
        }
    }

    /// Strips every tag the verb engine applied for `entity`.
    fn clear_verb_tags(&mut self, entity: EntityId) {
        self.tags.remove_tags_matching(ActorId::Player, "Aerial");
        self.tags.remove_tag(ActorId::Entity(entity), "Stunned");
    }

    /// Despawns dead and pit-fallen entities.
    ///
    /// A claimed entity survives one extra tick: the verb guard must observe
    /// the death and run its forced teardown before the body disappears.
    fn cleanup(&mut self) {
        let dead: Vec<EntityId> = self
            .arena
            .entities_sorted()
            .filter(|e| !e.is_alive())
            .map(crate::entity::Entity::id)
            .collect();

        for id in dead {
            if self.active.as_ref().map_or(false, |a| a.entity == id) {
                continue;
            }
            self.launches.release(id);
            self.tags.clear_tags(ActorId::Entity(id));
            self.arena.despawn(id);
            debug!(entity = %id, "dead entity despawned");
        }
    }
}
