//! Fixed-rate duel loop: sample, detect, step, integrate.

use std::cell::RefCell;
use std::rc::Rc;

use combat_core::{ActorId, ActorSpec, CombatConfig, CombatEvent, CombatWorld};
use glam::Vec3;

use crate::arena::Arena;
use crate::pilot::Pilot;

/// Counters collected from coordinator events.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    pub hits: u32,
    pub perfect_parries: u32,
    pub partial_parries: u32,
    pub poise_breaks: u32,
    pub guard_breaks: u32,
    pub hitstops: u32,
    /// `(victim, killer)` in order of death.
    pub deaths: Vec<(ActorId, Option<ActorId>)>,
}

impl EventLog {
    fn record(&mut self, event: &CombatEvent) {
        match event {
            CombatEvent::DamageDealt { .. } => self.hits += 1,
            CombatEvent::ParryOccurred { perfect: true, .. } => self.perfect_parries += 1,
            CombatEvent::ParryOccurred { perfect: false, .. } => self.partial_parries += 1,
            CombatEvent::PoiseBreak { .. } => self.poise_breaks += 1,
            CombatEvent::GuardBreak { .. } => self.guard_breaks += 1,
            CombatEvent::Hitstop { .. } => self.hitstops += 1,
            CombatEvent::Death { actor, killer } => self.deaths.push((*actor, *killer)),
            CombatEvent::Registered { .. } | CombatEvent::Unregistered { .. } => {}
        }
    }
}

/// One combatant entering the duel.
#[derive(Clone, Debug)]
pub struct Entrant {
    pub label: String,
    pub spec: ActorSpec,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RoundResult {
    pub round: u32,
    pub tick: u32,
    pub winner: Option<ActorId>,
}

pub struct Session {
    world: CombatWorld,
    arena: Arena,
    pilots: Vec<Pilot>,
    labels: Vec<(ActorId, String)>,
    spawn_points: Vec<(ActorId, Vec3)>,
    log: Rc<RefCell<EventLog>>,
    dt: f32,
}

impl Session {
    /// Spawns `entrants` on a circle facing its center, each with its own
    /// pilot seeded from `seed`.
    pub fn new(config: CombatConfig, entrants: Vec<Entrant>, seed: u64, rate: u32) -> Self {
        let mut world = CombatWorld::new(config);
        let log = Rc::new(RefCell::new(EventLog::default()));
        let sink = Rc::clone(&log);
        world
            .coordinator_mut()
            .events_mut()
            .subscribe(move |event| sink.borrow_mut().record(event));

        let arena = Arena::new(2.0, 50.0);
        let count = entrants.len().max(1) as f32;
        let mut pilots = Vec::with_capacity(entrants.len());
        let mut labels = Vec::with_capacity(entrants.len());
        let mut spawn_points = Vec::with_capacity(entrants.len());

        for (index, entrant) in entrants.into_iter().enumerate() {
            let angle = std::f32::consts::TAU * index as f32 / count;
            let position = Vec3::new(angle.cos(), 0.0, angle.sin()) * 4.0;
            let spec = entrant
                .spec
                .with_position(position)
                .with_forward(-position);
            let id = world.spawn(spec);

            pilots.push(Pilot::new(id, seed.wrapping_add(index as u64), arena.reach * 0.8));
            labels.push((id, entrant.label));
            spawn_points.push((id, position));
        }

        Self {
            world,
            arena,
            pilots,
            labels,
            spawn_points,
            log,
            dt: 1.0 / rate.max(1) as f32,
        }
    }

    pub fn world(&self) -> &CombatWorld {
        &self.world
    }

    pub fn log(&self) -> EventLog {
        self.log.borrow().clone()
    }

    pub fn label(&self, id: ActorId) -> &str {
        self.labels
            .iter()
            .find(|(actor, _)| *actor == id)
            .map_or("?", |(_, label)| label.as_str())
    }

    /// Runs one fixed tick. Returns the deaths it produced.
    pub fn tick(&mut self) -> Vec<(ActorId, Option<ActorId>)> {
        let before = self.log.borrow().deaths.len();

        for pilot in &mut self.pilots {
            let snapshot = pilot.decide(&self.world);
            self.world.sample_input(pilot.actor(), &snapshot);
        }
        self.arena.detect(&mut self.world);
        let report = self.world.step(self.dt);
        self.arena.integrate(&mut self.world, report.dt);

        self.log.borrow().deaths[before..].to_vec()
    }

    /// Runs up to `ticks` ticks and `rounds` rounds. A round ends when only
    /// one faction is left standing; everyone is then restored to their spawn
    /// point.
    pub fn run(&mut self, ticks: u32, rounds: u32) -> Vec<RoundResult> {
        let mut results = Vec::new();
        for tick in 0..ticks {
            let deaths = self.tick();
            for (victim, killer) in &deaths {
                tracing::info!(
                    tick,
                    victim = self.label(*victim),
                    killer = killer.map(|id| self.label(id)),
                    "knockout"
                );
            }
            if deaths.is_empty() || self.standing_factions() > 1 {
                continue;
            }

            let winner = self
                .world
                .actors()
                .iter()
                .find(|actor| actor.is_alive())
                .map(|actor| actor.id());
            results.push(RoundResult {
                round: results.len() as u32 + 1,
                tick,
                winner,
            });
            if results.len() as u32 >= rounds {
                break;
            }
            self.reset_round();
        }
        results
    }

    fn standing_factions(&self) -> usize {
        let mut standing = Vec::new();
        for actor in self.world.actors().iter().filter(|actor| actor.is_alive()) {
            if !standing.contains(&actor.faction()) {
                standing.push(actor.faction());
            }
        }
        standing.len()
    }

    fn reset_round(&mut self) {
        for (id, position) in self.spawn_points.clone() {
            let alive = self.world.actor(id).is_some_and(|actor| actor.is_alive());
            if alive {
                if let Some(actor) = self.world.actor_mut(id) {
                    actor.set_position(position);
                }
            } else {
                self.world.respawn(id, position);
            }
        }
        tracing::debug!("round reset");
    }
}
