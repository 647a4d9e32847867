//! Combat-wide coordination.
//!
//! # Architecture
//!
//! The coordinator is an explicitly constructed value owned by the world
//! driver, never a global. It keeps:
//!
//! - a registry of live actors and their factions (hostility queries)
//! - the real and simulation clocks
//! - the hitstop pulse
//! - the [`CombatEvent`] observer list
//!
//! Actors themselves live in an [`Actors`] table passed in by reference, so
//! damage dispatch borrows one actor at a time.

mod hitstop;

pub use hitstop::Hitstop;

use std::collections::BTreeMap;

use crate::actor::Actors;
use crate::config::CombatConfig;
use crate::events::CombatEvent;
use crate::observer::Observers;
use crate::types::{ActorId, DamageInfo, DamageResult, Faction};

/// Real and simulation time, in seconds.
///
/// The real clock always advances by the raw tick; the simulation clock is
/// scaled by hitstop. Input timestamps use the simulation clock so buffered
/// intents survive a hitstop pulse.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Clock {
    pub real: f64,
    pub sim: f64,
}

#[derive(Debug)]
pub struct CombatCoordinator {
    config: CombatConfig,
    registry: BTreeMap<ActorId, Faction>,
    hitstop: Hitstop,
    clock: Clock,
    events: Observers<CombatEvent>,
}

impl CombatCoordinator {
    pub fn new(config: CombatConfig) -> Self {
        Self {
            config,
            registry: BTreeMap::new(),
            hitstop: Hitstop::default(),
            clock: Clock::default(),
            events: Observers::new(),
        }
    }

    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    pub fn events_mut(&mut self) -> &mut Observers<CombatEvent> {
        &mut self.events
    }

    // ===== registry =====

    /// Registers `actor`. Re-registering a known id is a no-op returning `false`.
    pub fn register(&mut self, actor: ActorId, faction: Faction) -> bool {
        if self.registry.contains_key(&actor) {
            return false;
        }
        self.registry.insert(actor, faction);
        tracing::debug!(%actor, %faction, "actor registered");
        self.events.emit(&CombatEvent::Registered { actor, faction });
        true
    }

    /// Unregisters `actor`. Unknown ids are a no-op returning `false`.
    pub fn unregister(&mut self, actor: ActorId) -> bool {
        if self.registry.remove(&actor).is_none() {
            return false;
        }
        tracing::debug!(%actor, "actor unregistered");
        self.events.emit(&CombatEvent::Unregistered { actor });
        true
    }

    pub fn is_registered(&self, actor: ActorId) -> bool {
        self.registry.contains_key(&actor)
    }

    pub fn faction_of(&self, actor: ActorId) -> Option<Faction> {
        self.registry.get(&actor).copied()
    }

    pub fn registered(&self) -> impl Iterator<Item = ActorId> + '_ {
        self.registry.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.registry.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // ===== hostility =====

    /// Distinct registered actors of different factions.
    pub fn is_hostile(&self, a: ActorId, b: ActorId) -> bool {
        if a == b {
            return false;
        }
        match (self.faction_of(a), self.faction_of(b)) {
            (Some(fa), Some(fb)) => fa.differs_from(&fb),
            _ => false,
        }
    }

    /// The same actor, or registered actors sharing a faction.
    pub fn is_allied(&self, a: ActorId, b: ActorId) -> bool {
        if a == b {
            return true;
        }
        match (self.faction_of(a), self.faction_of(b)) {
            (Some(fa), Some(fb)) => fa == fb,
            _ => false,
        }
    }

    /// Whether a hit from `attacker` may land on `target`. Hostile pairs
    /// always may; allied pairs only with friendly fire on, and never
    /// an actor on itself.
    pub fn can_damage(&self, attacker: ActorId, target: ActorId) -> bool {
        if attacker == target {
            return false;
        }
        self.is_hostile(attacker, target)
            || (self.config.friendly_fire
                && self.is_registered(attacker)
                && self.is_registered(target))
    }

    // ===== time =====

    pub fn clock(&self) -> Clock {
        self.clock
    }

    pub fn real_time(&self) -> f64 {
        self.clock.real
    }

    pub fn sim_time(&self) -> f64 {
        self.clock.sim
    }

    pub fn hitstop(&self) -> &Hitstop {
        &self.hitstop
    }

    pub fn time_scale(&self) -> f32 {
        self.hitstop.time_scale(self.clock.real)
    }

    /// Advances both clocks by a raw tick and returns the scaled tick the
    /// simulation should run with.
    pub fn advance(&mut self, dt: f32) -> f32 {
        let scaled = dt * self.time_scale();
        self.clock.real += dt as f64;
        self.clock.sim += scaled as f64;
        scaled
    }

    /// Starts or extends the hitstop pulse.
    pub fn request_hitstop(&mut self, duration: f32) {
        if duration <= 0.0 {
            return;
        }
        let before = self.hitstop.until();
        let until = self.hitstop.request(self.clock.real, duration);
        if until > before {
            tracing::trace!(duration, until, "hitstop extended");
        }
        self.events.emit(&CombatEvent::Hitstop { duration, until });
    }

    // ===== damage =====

    /// Resolves `info` against `target` and broadcasts the consequences.
    ///
    /// Unregistered or missing targets and unregistered attackers yield
    /// [`DamageResult::ignored`]; these calls happen legitimately at the edge
    /// of an actor's lifetime.
    pub fn process_damage(
        &mut self,
        actors: &mut Actors,
        attacker: Option<ActorId>,
        target: ActorId,
        info: &DamageInfo,
    ) -> DamageResult {
        if !self.is_registered(target) || attacker.is_some_and(|id| !self.is_registered(id)) {
            tracing::trace!(?attacker, %target, "stale damage reference");
            return DamageResult::ignored();
        }
        let Some(defender) = actors.get_mut(target) else {
            return DamageResult::ignored();
        };

        let result = defender.handle_damage(info);
        if result.is_ignored() {
            return result;
        }
        self.broadcast(attacker, target, &result);

        if result.is_parried() {
            if let Some(attacker) = attacker.and_then(|id| actors.get_mut(id)) {
                attacker.stagger(self.config.parry_stagger, -info.direction);
            }
        }

        let hitstop = if result.is_parried() {
            self.config.hitstop.perfect_parry
        } else if result.final_damage > 0.0 {
            self.config.hitstop.duration_for(result.final_damage)
        } else {
            0.0
        };
        self.request_hitstop(hitstop);

        if result.caused_death() {
            self.unregister(target);
        }
        result
    }

    fn broadcast(&mut self, attacker: Option<ActorId>, target: ActorId, result: &DamageResult) {
        if result.connected() {
            self.events.emit(&CombatEvent::DamageDealt {
                attacker,
                target,
                result: *result,
            });
        }
        if result.is_parried() || result.is_partially_parried() {
            self.events.emit(&CombatEvent::ParryOccurred {
                defender: target,
                attacker,
                perfect: result.is_parried(),
            });
        }
        if result.caused_guard_break() {
            self.events.emit(&CombatEvent::GuardBreak { actor: target });
        }
        if result.caused_poise_break() {
            tracing::debug!(actor = %target, "poise broken");
            self.events.emit(&CombatEvent::PoiseBreak { actor: target });
        }
        if result.caused_death() {
            tracing::debug!(actor = %target, killer = ?attacker, "actor killed");
            self.events.emit(&CombatEvent::Death {
                actor: target,
                killer: attacker,
            });
        }
    }

    // ===== spatial queries =====

    /// Closest living actor hostile to `from`.
    pub fn nearest_hostile(&self, actors: &Actors, from: ActorId) -> Option<ActorId> {
        let origin = actors.get(from)?.position();
        actors
            .iter()
            .filter(|actor| actor.is_alive() && self.is_hostile(from, actor.id()))
            .map(|actor| (actor.id(), actor.position().distance_squared(origin)))
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(id, _)| id)
    }

    /// Appends every living actor hostile to `from` within `radius` to `out`.
    pub fn hostiles_in_radius_into(
        &self,
        actors: &Actors,
        from: ActorId,
        radius: f32,
        out: &mut Vec<ActorId>,
    ) {
        let Some(origin) = actors.get(from).map(|actor| actor.position()) else {
            return;
        };
        let radius_sq = radius * radius;
        out.extend(
            actors
                .iter()
                .filter(|actor| actor.is_alive() && self.is_hostile(from, actor.id()))
                .filter(|actor| actor.position().distance_squared(origin) <= radius_sq)
                .map(|actor| actor.id()),
        );
    }
}

impl Default for CombatCoordinator {
    fn default() -> Self {
        Self::new(CombatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;

    use super::*;
    use crate::actor::Actor;
    use crate::fsm::StateKind;
    use crate::types::{ActorStats, Moveset};

    fn spawn(
        coordinator: &mut CombatCoordinator,
        actors: &mut Actors,
        id: u32,
        faction: Faction,
        position: Vec3,
    ) -> ActorId {
        let id = ActorId(id);
        let actor = Actor::new(
            id,
            faction,
            ActorStats::default(),
            Moveset::default(),
            coordinator.config(),
        )
        .with_position(position);
        actors.insert(actor);
        coordinator.register(id, faction);
        id
    }

    #[test]
    fn registration_is_idempotent() {
        let mut coordinator = CombatCoordinator::default();
        assert!(coordinator.register(ActorId(1), Faction::Player));
        assert!(!coordinator.register(ActorId(1), Faction::Enemy));
        assert_eq!(coordinator.faction_of(ActorId(1)), Some(Faction::Player));
        assert!(coordinator.unregister(ActorId(1)));
        assert!(!coordinator.unregister(ActorId(1)));
        assert!(coordinator.is_empty());
    }

    #[test]
    fn hostility_needs_distinct_actors_and_factions() {
        let mut coordinator = CombatCoordinator::default();
        coordinator.register(ActorId(1), Faction::Player);
        coordinator.register(ActorId(2), Faction::Ally);
        coordinator.register(ActorId(3), Faction::Player);

        assert!(coordinator.is_hostile(ActorId(1), ActorId(2)));
        assert!(!coordinator.is_hostile(ActorId(1), ActorId(3)));
        assert!(!coordinator.is_hostile(ActorId(1), ActorId(1)));
        assert!(coordinator.is_allied(ActorId(1), ActorId(1)));
        assert!(coordinator.is_allied(ActorId(1), ActorId(3)));
        assert!(!coordinator.can_damage(ActorId(1), ActorId(3)));

        let mut friendly = CombatCoordinator::new(CombatConfig::new().with_friendly_fire(true));
        friendly.register(ActorId(1), Faction::Player);
        friendly.register(ActorId(3), Faction::Player);
        assert!(friendly.can_damage(ActorId(1), ActorId(3)));
        assert!(!friendly.can_damage(ActorId(1), ActorId(1)));
    }

    #[test]
    fn stale_references_are_ignored() {
        let mut coordinator = CombatCoordinator::default();
        let mut actors = Actors::new();
        let target = spawn(&mut coordinator, &mut actors, 1, Faction::Player, Vec3::ZERO);
        let info = DamageInfo::new(10.0, 0.0, Some(ActorId(99)));

        let result = coordinator.process_damage(&mut actors, Some(ActorId(99)), target, &info);
        assert!(result.is_ignored());
        let result = coordinator.process_damage(&mut actors, None, ActorId(42), &info);
        assert!(result.is_ignored());
        assert_eq!(actors.get(target).map(|actor| actor.health()), Some(100.0));
    }

    #[test]
    fn death_broadcasts_and_unregisters() {
        let mut coordinator = CombatCoordinator::default();
        let mut actors = Actors::new();
        let attacker = spawn(&mut coordinator, &mut actors, 1, Faction::Player, Vec3::ZERO);
        let target = spawn(&mut coordinator, &mut actors, 2, Faction::Enemy, Vec3::Z);

        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        coordinator
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let info = DamageInfo::new(500.0, 0.0, Some(attacker));
        let result = coordinator.process_damage(&mut actors, Some(attacker), target, &info);
        assert!(result.caused_death());
        assert!(!coordinator.is_registered(target));
        assert!(coordinator.hitstop().is_active(coordinator.real_time()));

        let events = events.borrow();
        assert!(matches!(events[0], CombatEvent::DamageDealt { .. }));
        assert!(events.contains(&CombatEvent::Death {
            actor: target,
            killer: Some(attacker),
        }));
        assert!(events.contains(&CombatEvent::Unregistered { actor: target }));
    }

    #[test]
    fn perfect_parry_staggers_the_attacker() {
        let mut coordinator = CombatCoordinator::default();
        let mut actors = Actors::new();
        let attacker = spawn(&mut coordinator, &mut actors, 1, Faction::Enemy, Vec3::ZERO);
        let defender = spawn(&mut coordinator, &mut actors, 2, Faction::Player, Vec3::Z);
        assert!(actors.get_mut(defender).is_some_and(|actor| actor.try_parry()));

        let info = DamageInfo::new(30.0, 10.0, Some(attacker)).with_direction(Vec3::Z);
        let result = coordinator.process_damage(&mut actors, Some(attacker), defender, &info);

        assert!(result.is_parried());
        assert_eq!(
            actors.get(attacker).map(|actor| actor.state_kind()),
            Some(StateKind::Stagger)
        );
        let pulse = coordinator.hitstop().remaining(coordinator.real_time());
        assert!((pulse - coordinator.config().hitstop.perfect_parry).abs() < 1e-6);
    }

    #[test]
    fn hitstop_freezes_simulation_time_only() {
        let mut coordinator = CombatCoordinator::default();
        coordinator.request_hitstop(0.05);
        assert_eq!(coordinator.advance(0.02), 0.0);
        assert_eq!(coordinator.advance(0.02), 0.0);
        assert_eq!(coordinator.advance(0.02), 0.0);
        assert_eq!(coordinator.advance(0.02), 0.02);
        assert!((coordinator.real_time() - 0.08).abs() < 1e-6);
        assert!((coordinator.sim_time() - 0.02).abs() < 1e-6);
    }

    #[test]
    fn spatial_queries_skip_allies_and_the_dead() {
        let mut coordinator = CombatCoordinator::default();
        let mut actors = Actors::new();
        let me = spawn(&mut coordinator, &mut actors, 1, Faction::Player, Vec3::ZERO);
        spawn(&mut coordinator, &mut actors, 2, Faction::Player, Vec3::X);
        let near = spawn(&mut coordinator, &mut actors, 3, Faction::Enemy, Vec3::new(2.0, 0.0, 0.0));
        let far = spawn(&mut coordinator, &mut actors, 4, Faction::Undead, Vec3::new(0.0, 0.0, 9.0));

        assert_eq!(coordinator.nearest_hostile(&actors, me), Some(near));

        let mut out = Vec::new();
        coordinator.hostiles_in_radius_into(&actors, me, 5.0, &mut out);
        assert_eq!(out, vec![near]);

        let lethal = DamageInfo::new(1000.0, 0.0, None);
        coordinator.process_damage(&mut actors, None, near, &lethal);
        assert_eq!(coordinator.nearest_hostile(&actors, me), Some(far));
    }
}
