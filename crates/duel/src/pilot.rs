//! Seeded scripted opponent that turns world state into raw input snapshots.

use combat_core::{ActorId, CombatWorld, InputSnapshot};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// A button press still in progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Press {
    Attack { ticks: u32 },
    Block { ticks: u32 },
}

/// Behavior weights of a pilot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Temperament {
    /// Chance per decision to react to an incoming swing with a defense.
    pub reaction: f64,
    /// Chance that a defensive reaction is a parry rather than a block or dodge.
    pub parry_bias: f64,
    /// Chance that an offensive decision is a heavy attack.
    pub heavy_bias: f64,
    /// Ticks between decisions.
    pub cadence: u32,
}

impl Default for Temperament {
    fn default() -> Self {
        Self {
            reaction: 0.35,
            parry_bias: 0.5,
            heavy_bias: 0.25,
            cadence: 6,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Pilot {
    actor: ActorId,
    rng: StdRng,
    temperament: Temperament,
    press: Option<Press>,
    cooldown: u32,
    /// Range at which the pilot stops closing in.
    engage_range: f32,
}

impl Pilot {
    pub fn new(actor: ActorId, seed: u64, engage_range: f32) -> Self {
        Self {
            actor,
            rng: StdRng::seed_from_u64(seed),
            temperament: Temperament::default(),
            press: None,
            cooldown: 0,
            engage_range,
        }
    }

    pub fn with_temperament(mut self, temperament: Temperament) -> Self {
        self.temperament = temperament;
        self
    }

    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// Produces this tick's snapshot for the pilot's actor.
    pub fn decide(&mut self, world: &CombatWorld) -> InputSnapshot {
        let mut snapshot = InputSnapshot::default();
        let Some(me) = world.actor(self.actor) else {
            return snapshot;
        };
        if !me.is_alive() {
            self.press = None;
            return snapshot;
        }
        let Some(foe) = world
            .coordinator()
            .nearest_hostile(world.actors(), self.actor)
            .and_then(|id| world.actor(id))
        else {
            return snapshot;
        };

        let offset = foe.position() - me.position();
        let distance = offset.length();
        if distance > self.engage_range {
            snapshot.movement = offset.normalize_or_zero();
            snapshot.sprint = distance > self.engage_range * 3.0;
        }

        if let Some(press) = self.press.take() {
            self.continue_press(press, &mut snapshot);
            return snapshot;
        }
        if self.cooldown > 0 {
            self.cooldown -= 1;
            return snapshot;
        }
        self.cooldown = self.temperament.cadence;

        let threatened = foe.state_kind().is_attack() && distance <= self.engage_range * 1.5;
        if threatened && self.rng.random_bool(self.temperament.reaction) {
            self.defend(offset, &mut snapshot);
        } else if distance <= self.engage_range && me.stamina().normalized() > 0.25 {
            let ticks = if self.rng.random_bool(self.temperament.heavy_bias) {
                self.rng.random_range(16..40)
            } else {
                1
            };
            self.continue_press(Press::Attack { ticks }, &mut snapshot);
        }
        snapshot
    }

    fn defend(&mut self, offset: Vec3, snapshot: &mut InputSnapshot) {
        if self.rng.random_bool(self.temperament.parry_bias) {
            snapshot.parry = true;
        } else if self.rng.random_bool(0.5) {
            let ticks = self.rng.random_range(10..30);
            self.continue_press(Press::Block { ticks }, snapshot);
        } else {
            // Sidestep perpendicular to the threat.
            let side = if self.rng.random_bool(0.5) { 1.0 } else { -1.0 };
            snapshot.movement = offset.cross(Vec3::Y).normalize_or_zero() * side;
            snapshot.dodge = true;
        }
    }

    fn continue_press(&mut self, press: Press, snapshot: &mut InputSnapshot) {
        self.press = match press {
            Press::Attack { ticks } => {
                snapshot.attack = true;
                (ticks > 1).then(|| Press::Attack { ticks: ticks - 1 })
            }
            Press::Block { ticks } => {
                snapshot.block = true;
                (ticks > 1).then(|| Press::Block { ticks: ticks - 1 })
            }
        };
    }
}
