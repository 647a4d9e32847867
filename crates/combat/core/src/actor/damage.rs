//! Damage intake.
//!
//! Resolution order, first match wins:
//!
//! 1. dead target: ignored
//! 2. dodge invulnerability: dodged, no effect at all
//! 3. parry or block sub-window against a parryable, guardable hit:
//!    perfect (no damage, no poise) or partial (scaled damage and poise)
//! 4. block covering the hit direction: reduced damage, stamina cost,
//!    possible guard break
//! 5. normal hit
//!
//! Health and poise are then applied. Death is committed on the same call;
//! otherwise a poise break or guard break forces a stagger.

use glam::Vec3;

use super::Actor;
use crate::events::ActorEvent;
use crate::fsm::{ActionState, GuardTiming, Transition};
use crate::types::{DamageFlags, DamageInfo, DamageResult, HitOutcome, StaggerTier};

impl Actor {
    /// Resolves one damage request against this actor.
    ///
    /// Usable directly when no coordinator is involved; the coordinator calls
    /// it for every dispatched hit.
    pub fn handle_damage(&mut self, info: &DamageInfo) -> DamageResult {
        if !self.is_alive() {
            return DamageResult::ignored();
        }
        if self.is_invulnerable() {
            self.tally.dodges += 1;
            tracing::debug!(actor = %self.id, source = ?info.source, "hit dodged");
            return DamageResult::dodged();
        }

        let mut result = self.resolve_defense(info);
        self.apply(info, &mut result);

        self.tally.hits_taken += u32::from(result.final_damage > 0.0);
        tracing::debug!(
            actor = %self.id,
            source = ?info.source,
            outcome = %result.outcome,
            damage = result.final_damage,
            poise = result.final_poise_damage,
            health = self.health,
            "damage resolved"
        );
        self.events.emit(&ActorEvent::Damaged {
            actor: self.id,
            result,
        });
        result
    }

    /// Whether a hit travelling along `direction` arrives inside the guard arc.
    fn covers(&self, direction: Vec3) -> bool {
        let Some(incoming) = direction.try_normalize() else {
            return true;
        };
        self.forward.dot(-incoming) >= self.moveset.block.guard_arc_cos
    }

    fn resolve_defense(&mut self, info: &DamageInfo) -> DamageResult {
        let guardable = info.kind.is_guardable();
        let covered = self.covers(info.direction);

        let timing = match self.machine.state() {
            ActionState::Parry(parry) => parry.timing(),
            ActionState::Block(block) if covered => block.timing(),
            _ => None,
        }
        .filter(|_| guardable && info.parryable);
        let parrying = matches!(self.machine.state(), ActionState::Parry(_));

        match timing {
            Some(GuardTiming::Perfect) => {
                self.chain.reset();
                self.machine.open_riposte();
                self.tally.perfect_parries += 1;
                tracing::debug!(actor = %self.id, "perfect parry");
                DamageResult {
                    outcome: HitOutcome::Parried,
                    ..DamageResult::default()
                }
            }
            Some(GuardTiming::Partial) => {
                let (damage_factor, poise_factor) = if parrying {
                    let parry = &self.moveset.parry;
                    let factor = parry.partial_factor(self.chain.count());
                    self.chain.register();
                    (factor, parry.partial_poise_factor)
                } else {
                    let block = &self.moveset.block;
                    (block.partial_damage_factor, block.partial_poise_factor)
                };
                self.tally.partial_parries += 1;
                DamageResult {
                    final_damage: info.amount * damage_factor,
                    final_poise_damage: info.poise_damage * poise_factor,
                    outcome: HitOutcome::PartiallyParried,
                    flags: DamageFlags::empty(),
                }
            }
            None if guardable && covered && self.machine.state().is_blocking() => {
                let block = &self.moveset.block;
                let mut flags = DamageFlags::empty();
                self.stamina.consume(info.amount * block.stamina_per_damage);
                if self.stamina.is_exhausted() {
                    flags |= DamageFlags::GUARD_BREAK;
                }
                self.tally.blocks += 1;
                DamageResult {
                    final_damage: info.amount * (1.0 - block.damage_reduction),
                    final_poise_damage: info.poise_damage * block.poise_factor,
                    outcome: HitOutcome::Blocked,
                    flags,
                }
            }
            None => DamageResult {
                final_damage: info.amount,
                final_poise_damage: info.poise_damage,
                outcome: HitOutcome::Normal,
                flags: DamageFlags::empty(),
            },
        }
    }

    fn apply(&mut self, info: &DamageInfo, result: &mut DamageResult) {
        self.health = (self.health - result.final_damage).max(0.0);

        if result.final_poise_damage > 0.0 && self.poise.apply_damage(result.final_poise_damage) {
            result.flags |= DamageFlags::POISE_BREAK;
        }

        if self.health <= 0.0 {
            result.flags |= DamageFlags::DEATH;
            self.die();
            return;
        }

        let tier = match (result.caused_guard_break(), result.caused_poise_break()) {
            (true, true) => Some(info.stagger.max(StaggerTier::Heavy)),
            (true, false) => Some(StaggerTier::Heavy),
            (false, true) => Some(info.stagger),
            (false, false) => None,
        };
        if let Some(tier) = tier {
            if result.caused_guard_break() {
                tracing::debug!(actor = %self.id, "guard broken");
                self.events.emit(&ActorEvent::GuardBroken { actor: self.id });
            }
            self.request(Transition::stagger(tier, info.direction));
        }
    }

    fn die(&mut self) {
        self.request(Transition::Death);
        for hurtbox in self.hurtboxes.iter_mut() {
            hurtbox.set_enabled(false);
        }
        self.buffer.clear();
        self.tally.deaths += 1;
        tracing::debug!(actor = %self.id, "died");
        self.events.emit(&ActorEvent::Died { actor: self.id });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CombatConfig;
    use crate::fsm::StateKind;
    use crate::types::{ActorId, ActorStats, DamageKind, Faction, Moveset};

    fn actor() -> Actor {
        Actor::new(
            ActorId(1),
            Faction::Player,
            ActorStats::default(),
            Moveset::default(),
            &CombatConfig::default(),
        )
    }

    fn hit(amount: f32, poise: f32) -> DamageInfo {
        DamageInfo::new(amount, poise, Some(ActorId(2))).with_direction(-Vec3::Z)
    }

    #[test]
    fn perfect_parry_negates_everything() {
        let mut actor = actor();
        assert!(actor.try_parry());
        let result = actor.handle_damage(&hit(30.0, 20.0));
        assert!(result.is_parried());
        assert_eq!(result.final_damage, 0.0);
        assert_eq!(actor.health(), 100.0);
        assert_eq!(actor.poise().current(), 0.0);
    }

    #[test]
    fn partial_parry_reduces_without_negating() {
        let mut actor = actor();
        actor.try_parry();
        actor.simulate(0.1);
        let result = actor.handle_damage(&hit(30.0, 20.0));
        assert!(result.is_partially_parried());
        assert!(result.final_damage > 0.0 && result.final_damage < 30.0);
        assert_eq!(result.final_poise_damage, 10.0);
        assert_eq!(actor.deflect_chain(), 1);
    }

    #[test]
    fn unparryable_hit_lands_during_parry() {
        let mut actor = actor();
        actor.try_parry();
        let result = actor.handle_damage(&hit(30.0, 0.0).with_parryable(false));
        assert!(result.is_normal_hit());
        assert_eq!(actor.health(), 70.0);
    }

    #[test]
    fn true_damage_ignores_guard() {
        let mut actor = actor();
        actor.try_parry();
        let result = actor.handle_damage(&hit(30.0, 0.0).with_kind(DamageKind::True));
        assert!(result.is_normal_hit());
    }

    #[test]
    fn lethal_hit_kills_on_the_same_call() {
        let mut actor = actor();
        let result = actor.handle_damage(&hit(150.0, 0.0));
        assert!(result.caused_death());
        assert_eq!(actor.state_kind(), StateKind::Death);
        assert!(!actor.is_alive());
        assert!(actor.hurtboxes().iter().all(|hurtbox| !hurtbox.is_enabled()));

        let after = actor.handle_damage(&hit(10.0, 0.0));
        assert!(after.is_ignored());
    }

    #[test]
    fn passive_block_reduces_and_costs_stamina() {
        let mut actor = actor();
        actor.sample_input(
            &crate::input::InputSnapshot {
                block: true,
                ..Default::default()
            },
            0.0,
        );
        assert!(actor.try_block());
        actor.simulate(0.2);
        assert!(actor.is_blocking());

        let result = actor.handle_damage(&hit(40.0, 20.0));
        assert!(result.is_blocked());
        assert!((result.final_damage - 8.0).abs() < 1e-4);
        assert!((result.final_poise_damage - 5.0).abs() < 1e-4);
        assert!(actor.stamina().current() < 61.0);
        assert!(!result.caused_guard_break());
    }

    #[test]
    fn block_does_not_cover_hits_from_behind() {
        let mut actor = actor();
        actor.sample_input(
            &crate::input::InputSnapshot {
                block: true,
                ..Default::default()
            },
            0.0,
        );
        actor.try_block();
        actor.simulate(0.2);

        // Facing +Z; this hit travels along +Z, so it arrives from behind.
        let from_behind = DamageInfo::new(40.0, 0.0, Some(ActorId(2))).with_direction(Vec3::Z);
        assert!(actor.handle_damage(&from_behind).is_normal_hit());
    }

    #[test]
    fn exhausting_block_breaks_guard() {
        let mut actor = actor();
        actor.sample_input(
            &crate::input::InputSnapshot {
                block: true,
                ..Default::default()
            },
            0.0,
        );
        actor.try_block();
        actor.simulate(0.2);

        let result = actor.handle_damage(&hit(120.0, 0.0));
        assert!(result.is_blocked());
        assert!(result.caused_guard_break());
        assert_eq!(actor.state_kind(), StateKind::Stagger);
    }

    #[test]
    fn dodge_iframes_avoid_all_effects() {
        let mut actor = actor();
        assert!(actor.try_dodge(Vec3::X));
        actor.simulate(0.12);
        assert!(actor.is_invulnerable());
        let result = actor.handle_damage(&hit(50.0, 50.0));
        assert!(result.is_dodged());
        assert_eq!(actor.health(), 100.0);
        assert_eq!(actor.poise().current(), 0.0);
    }
}
