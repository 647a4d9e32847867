//! The external driver: owns actors, coordinator and collision indices, and
//! runs the two ticks in order.
//!
//! # Simulation tick
//!
//! 1. both clocks advance; the tick is scaled to zero during hitstop
//! 2. every actor runs its state machine (execute → guard/commit → hitbox)
//! 3. queued overlap reports are resolved into damage
//! 4. dead actors still registered are unregistered
//! 5. every actor ticks its resources
//!
//! Actors are visited in id order.

use std::collections::BTreeMap;

use arrayvec::ArrayVec;
use glam::Vec3;

use crate::actor::{Actor, Actors};
use crate::config::CombatConfig;
use crate::coordinator::CombatCoordinator;
use crate::hit::OverlapOutcome;
use crate::input::InputSnapshot;
use crate::types::{
    ActorId, ActorStats, DamageInfo, DamageResult, Faction, HitboxId, HurtboxId, Moveset,
};

/// Everything needed to spawn an actor.
#[derive(Clone, Debug, PartialEq)]
pub struct ActorSpec {
    pub faction: Faction,
    pub stats: ActorStats,
    pub moveset: Moveset,
    pub position: Vec3,
    pub forward: Vec3,
    pub weapon_multiplier: f32,
    /// Hurtbox damage multipliers. Empty means a single body hurtbox at 1.0.
    pub hurtboxes: ArrayVec<f32, { CombatConfig::MAX_HURTBOXES }>,
}

impl ActorSpec {
    pub fn new(faction: Faction) -> Self {
        Self {
            faction,
            stats: ActorStats::default(),
            moveset: Moveset::default(),
            position: Vec3::ZERO,
            forward: Vec3::Z,
            weapon_multiplier: 1.0,
            hurtboxes: ArrayVec::new(),
        }
    }

    pub fn with_stats(mut self, stats: ActorStats) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_moveset(mut self, moveset: Moveset) -> Self {
        self.moveset = moveset;
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn with_forward(mut self, forward: Vec3) -> Self {
        self.forward = forward;
        self
    }

    pub fn with_weapon_multiplier(mut self, multiplier: f32) -> Self {
        self.weapon_multiplier = multiplier;
        self
    }

    /// Adds a hurtbox. Ignored once `MAX_HURTBOXES` are listed.
    pub fn with_hurtbox(mut self, multiplier: f32) -> Self {
        if self.hurtboxes.try_push(multiplier).is_err() {
            tracing::warn!(faction = ?self.faction, multiplier, "hurtbox limit reached");
        }
        self
    }
}

/// Outcome of one simulation tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepReport {
    /// Tick the simulation actually ran with.
    pub dt: f32,
    /// Overlaps that produced a damage dispatch.
    pub dispatched: usize,
}

#[derive(Debug)]
pub struct CombatWorld {
    actors: Actors,
    coordinator: CombatCoordinator,
    hitboxes: BTreeMap<HitboxId, ActorId>,
    hurtboxes: BTreeMap<HurtboxId, ActorId>,
    overlaps: Vec<(HitboxId, HurtboxId)>,
    next_actor: u32,
    next_hurtbox: u32,
}

impl CombatWorld {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            actors: Actors::new(),
            coordinator: CombatCoordinator::new(config),
            hitboxes: BTreeMap::new(),
            hurtboxes: BTreeMap::new(),
            overlaps: Vec::new(),
            next_actor: 1,
            next_hurtbox: 1,
        }
    }

    pub fn config(&self) -> &CombatConfig {
        self.coordinator.config()
    }

    pub fn actors(&self) -> &Actors {
        &self.actors
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(id)
    }

    pub fn actor_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(id)
    }

    pub fn coordinator(&self) -> &CombatCoordinator {
        &self.coordinator
    }

    pub fn coordinator_mut(&mut self) -> &mut CombatCoordinator {
        &mut self.coordinator
    }

    /// Creates, indexes and registers an actor.
    pub fn spawn(&mut self, spec: ActorSpec) -> ActorId {
        let id = ActorId(self.next_actor);
        self.next_actor += 1;

        let mut actor = Actor::new(id, spec.faction, spec.stats, spec.moveset, self.config())
            .with_position(spec.position)
            .with_forward(spec.forward)
            .with_weapon_multiplier(spec.weapon_multiplier);

        let multipliers: &[f32] = if spec.hurtboxes.is_empty() {
            &[1.0]
        } else {
            &spec.hurtboxes
        };
        for multiplier in multipliers {
            let hurtbox = HurtboxId(self.next_hurtbox);
            self.next_hurtbox += 1;
            actor = actor.with_hurtbox(hurtbox, *multiplier);
            self.hurtboxes.insert(hurtbox, id);
        }
        self.hitboxes.insert(actor.hitbox().id, id);

        self.coordinator.register(id, spec.faction);
        self.actors.insert(actor);
        id
    }

    /// Removes an actor and everything indexing it.
    pub fn despawn(&mut self, id: ActorId) -> Option<Actor> {
        let actor = self.actors.remove(id)?;
        self.coordinator.unregister(id);
        self.hitboxes.retain(|_, owner| *owner != id);
        self.hurtboxes.retain(|_, owner| *owner != id);
        Some(actor)
    }

    /// Restores a dead actor at `position` and registers it again.
    pub fn respawn(&mut self, id: ActorId, position: Vec3) -> bool {
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.respawn(position);
        self.coordinator.register(id, actor.faction());
        true
    }

    /// Sampling tick for one actor, stamped with the simulation clock.
    pub fn sample_input(&mut self, id: ActorId, snapshot: &InputSnapshot) -> bool {
        let now = self.coordinator.sim_time();
        let Some(actor) = self.actors.get_mut(id) else {
            return false;
        };
        actor.sample_input(snapshot, now);
        true
    }

    /// Physics callback. Resolved during the next [`CombatWorld::step`].
    pub fn report_overlap(&mut self, hitbox: HitboxId, hurtbox: HurtboxId) {
        self.overlaps.push((hitbox, hurtbox));
    }

    /// Dispatches damage that did not come from a hitbox (projectiles,
    /// hazards, scripted hits). Resolved immediately.
    pub fn apply_damage(
        &mut self,
        attacker: Option<ActorId>,
        target: ActorId,
        info: &DamageInfo,
    ) -> DamageResult {
        self.coordinator
            .process_damage(&mut self.actors, attacker, target, info)
    }

    pub fn step(&mut self, dt: f32) -> StepReport {
        let dt = self.coordinator.advance(dt);

        for actor in self.actors.iter_mut() {
            actor.simulate(dt);
        }
        let dispatched = self.resolve_overlaps();

        for actor in self.actors.iter() {
            if !actor.is_alive() && self.coordinator.is_registered(actor.id()) {
                self.coordinator.unregister(actor.id());
            }
        }
        for actor in self.actors.iter_mut() {
            actor.tick_resources(dt);
        }
        StepReport { dt, dispatched }
    }

    fn resolve_overlaps(&mut self) -> usize {
        let mut overlaps = std::mem::take(&mut self.overlaps);
        let mut dispatched = 0;

        for (hitbox_id, hurtbox_id) in overlaps.drain(..) {
            let (Some(&attacker), Some(&target)) =
                (self.hitboxes.get(&hitbox_id), self.hurtboxes.get(&hurtbox_id))
            else {
                continue;
            };
            let Some((hurtbox, target_position)) = self
                .actors
                .get(target)
                .and_then(|actor| Some((*actor.hurtbox(hurtbox_id)?, actor.position())))
            else {
                continue;
            };
            if !self.coordinator.is_registered(attacker) || !self.coordinator.is_registered(target)
            {
                tracing::trace!(%attacker, %target, "overlap with unregistered actor dropped");
                continue;
            }
            let permitted = self.coordinator.can_damage(attacker, target);
            let Some(actor) = self.actors.get_mut(attacker) else {
                continue;
            };

            let origin = actor.position();
            let info = match actor
                .hitbox_mut()
                .resolve_overlap(&hurtbox, permitted, origin, target_position)
            {
                OverlapOutcome::Hit(info) => info,
                OverlapOutcome::Friendly => {
                    tracing::trace!(%attacker, %target, "friendly hit suppressed");
                    continue;
                }
                _ => continue,
            };

            let result =
                self.coordinator
                    .process_damage(&mut self.actors, Some(attacker), target, &info);
            if result.connected() {
                if let Some(actor) = self.actors.get_mut(attacker) {
                    actor.record_hit_landed();
                }
            }
            dispatched += 1;
        }

        self.overlaps = overlaps;
        dispatched
    }
}

impl Default for CombatWorld {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}
