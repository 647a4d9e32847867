//! Stand-in physics for the headless duel.
//!
//! Hitboxes are modelled as a cone in front of the attacker on the XZ plane.
//! Every enabled hurtbox of a target inside the cone is reported as an
//! overlap, every tick the hitbox stays live; deduplication is the combat
//! core's job.

use combat_core::{ActorId, CombatWorld, HitboxId, HurtboxId, StateKind};
use glam::Vec3;

/// Ground speeds per locomotion gait, in units per second.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Speeds {
    pub walk: f32,
    pub run: f32,
    pub sprint: f32,
}

impl Default for Speeds {
    fn default() -> Self {
        Self {
            walk: 1.8,
            run: 3.5,
            sprint: 5.5,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Arena {
    /// Weapon reach from the attacker's position.
    pub reach: f32,
    /// Cosine of the cone half-angle.
    pub cone_cos: f32,
    pub speeds: Speeds,
    overlaps: Vec<(HitboxId, HurtboxId)>,
}

impl Arena {
    pub fn new(reach: f32, half_angle_degrees: f32) -> Self {
        Self {
            reach,
            cone_cos: half_angle_degrees.to_radians().cos(),
            speeds: Speeds::default(),
            overlaps: Vec::new(),
        }
    }

    /// Whether `target` lies inside the cone cast from `origin` along `forward`.
    pub fn in_cone(&self, origin: Vec3, forward: Vec3, target: Vec3) -> bool {
        let offset = flatten(target - origin);
        let distance = offset.length();
        if distance > self.reach {
            return false;
        }
        let Some(direction) = offset.try_normalize() else {
            return true;
        };
        flatten(forward).normalize_or_zero().dot(direction) >= self.cone_cos
    }

    /// Reports every hitbox/hurtbox overlap to the world. Returns how many
    /// were reported.
    pub fn detect(&mut self, world: &mut CombatWorld) -> usize {
        self.overlaps.clear();
        for attacker in world.actors().iter().filter(|a| a.hitbox().is_active()) {
            for target in world.actors().iter() {
                if target.id() == attacker.id()
                    || !self.in_cone(attacker.position(), attacker.forward(), target.position())
                {
                    continue;
                }
                self.overlaps.extend(
                    target
                        .hurtboxes()
                        .iter()
                        .filter(|hurtbox| hurtbox.is_enabled())
                        .map(|hurtbox| (attacker.hitbox().id, hurtbox.id)),
                );
            }
        }
        for (hitbox, hurtbox) in &self.overlaps {
            world.report_overlap(*hitbox, *hurtbox);
        }
        self.overlaps.len()
    }

    /// Moves actors by their locomotion and drains dodge/knockback
    /// displacement, then turns neutral actors toward their nearest foe.
    pub fn integrate(&self, world: &mut CombatWorld, dt: f32) {
        let ids: Vec<ActorId> = world.actors().ids().collect();
        for id in &ids {
            let Some(actor) = world.actor_mut(*id) else {
                continue;
            };
            let speed = match actor.state_kind() {
                StateKind::Walk => self.speeds.walk,
                StateKind::Run => self.speeds.run,
                StateKind::Sprint => self.speeds.sprint,
                _ => 0.0,
            };
            let stride = actor.held().direction().unwrap_or(Vec3::ZERO) * speed * dt;
            let correction = actor.take_motion_correction();
            let position = actor.position() + flatten(stride + correction);
            actor.set_position(position);
        }

        for id in ids {
            let Some(foe) = world.coordinator().nearest_hostile(world.actors(), id) else {
                continue;
            };
            let Some(target) = world.actor(foe).map(|actor| actor.position()) else {
                continue;
            };
            let Some(actor) = world.actor_mut(id) else {
                continue;
            };
            if actor.state_kind().is_neutral() {
                let facing = flatten(target - actor.position());
                actor.set_forward(facing);
            }
        }
    }
}

/// Projects onto the XZ plane.
fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

#[cfg(test)]
mod tests {
    use combat_core::{ActorSpec, CombatConfig, Faction, HitstopConfig};

    use super::*;

    #[test]
    fn cone_respects_reach_and_angle() {
        let arena = Arena::new(2.0, 45.0);
        assert!(arena.in_cone(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 1.5)));
        assert!(arena.in_cone(Vec3::ZERO, Vec3::Z, Vec3::new(1.0, 3.0, 1.2)));
        assert!(!arena.in_cone(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 2.5)));
        assert!(!arena.in_cone(Vec3::ZERO, Vec3::Z, Vec3::new(1.5, 0.0, 0.5)));
        assert!(!arena.in_cone(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -1.0)));
    }

    #[test]
    fn live_swing_in_range_lands_once() {
        let mut world = CombatWorld::new(CombatConfig::new().with_hitstop(HitstopConfig::NONE));
        let player = world.spawn(ActorSpec::new(Faction::Player));
        let enemy = world.spawn(
            ActorSpec::new(Faction::Enemy)
                .with_position(Vec3::new(0.0, 0.0, 1.5))
                .with_hurtbox(1.0)
                .with_hurtbox(2.0),
        );
        let mut arena = Arena::new(2.0, 60.0);

        assert!(world.actor_mut(player).unwrap().try_light_attack());
        let mut dispatched = 0;
        for _ in 0..30 {
            arena.detect(&mut world);
            dispatched += world.step(1.0 / 60.0).dispatched;
        }
        assert_eq!(dispatched, 1);
        assert!(world.actor(enemy).unwrap().health() < 100.0);
    }

    #[test]
    fn neutral_actors_turn_toward_their_foe() {
        let mut world = CombatWorld::default();
        let player = world.spawn(ActorSpec::new(Faction::Player));
        world.spawn(ActorSpec::new(Faction::Enemy).with_position(Vec3::new(3.0, 0.0, 0.0)));

        Arena::new(2.0, 45.0).integrate(&mut world, 1.0 / 60.0);
        let forward = world.actor(player).unwrap().forward();
        assert!((forward - Vec3::X).length() < 1e-5);
    }
}
