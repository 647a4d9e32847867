use arrayvec::ArrayVec;
use glam::Vec3;

use super::Hurtbox;
use crate::config::CombatConfig;
use crate::types::{ActorId, AttackData, DamageInfo, HitboxId};

/// Result of feeding one overlap callback to a [`Hitbox`].
#[derive(Clone, Debug, PartialEq)]
pub enum OverlapOutcome {
    /// The hitbox is not inside an active window.
    Inactive,
    /// The hurtbox is disabled (its owner is dead or otherwise intangible).
    Intangible,
    /// Attacker and target are allied. The hit-set is left untouched.
    Friendly,
    /// The target was already hit during this activation.
    AlreadyHit,
    /// The activation already hit as many targets as it can hold.
    Saturated,
    /// First contact with this target during this activation.
    Hit(DamageInfo),
}

/// Attacker-owned collision volume.
///
/// `activate` opens a new activation with an empty hit-set; `deactivate`
/// closes it and reports how many targets were hit. The hit-set holds at
/// most `MAX_HITS_PER_ACTIVATION` targets; further targets are refused.
#[derive(Clone, Debug)]
pub struct Hitbox {
    pub id: HitboxId,
    pub owner: ActorId,
    /// Weapon-level damage multiplier.
    pub multiplier: f32,
    active: bool,
    attack: Option<AttackData>,
    hit_set: ArrayVec<ActorId, { CombatConfig::MAX_HITS_PER_ACTIVATION }>,
    activations: u32,
}

impl Hitbox {
    pub fn new(id: HitboxId, owner: ActorId, multiplier: f32) -> Self {
        Self {
            id,
            owner,
            multiplier,
            active: false,
            attack: None,
            hit_set: ArrayVec::new(),
            activations: 0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn attack(&self) -> Option<&AttackData> {
        self.attack.as_ref()
    }

    /// Targets hit during the current activation.
    pub fn hits(&self) -> &[ActorId] {
        &self.hit_set
    }

    pub fn has_hit(&self, target: ActorId) -> bool {
        self.hit_set.contains(&target)
    }

    /// Number of activations so far.
    pub fn activations(&self) -> u32 {
        self.activations
    }

    pub fn activate(&mut self, attack: &AttackData) {
        self.hit_set.clear();
        self.active = true;
        self.attack = Some(attack.clone());
        self.activations = self.activations.wrapping_add(1);
        tracing::trace!(hitbox = %self.id, attack = %attack.name, "hitbox activated");
    }

    /// Closes the activation. Returns the number of targets hit.
    pub fn deactivate(&mut self) -> usize {
        let hits = self.hit_set.len();
        self.active = false;
        self.attack = None;
        self.hit_set.clear();
        hits
    }

    /// Resolves one overlap callback against `hurtbox`.
    ///
    /// `hostile` is the coordinator's verdict for `(owner, hurtbox.owner)`;
    /// allied overlaps are rejected before any damage is computed.
    pub fn resolve_overlap(
        &mut self,
        hurtbox: &Hurtbox,
        hostile: bool,
        attacker_position: Vec3,
        target_position: Vec3,
    ) -> OverlapOutcome {
        let Some(attack) = self.attack.as_ref().filter(|_| self.active) else {
            return OverlapOutcome::Inactive;
        };
        if !hurtbox.is_enabled() {
            return OverlapOutcome::Intangible;
        }
        if !hostile || hurtbox.owner == self.owner {
            return OverlapOutcome::Friendly;
        }
        if self.has_hit(hurtbox.owner) {
            return OverlapOutcome::AlreadyHit;
        }
        if self.hit_set.is_full() {
            tracing::warn!(hitbox = %self.id, target = %hurtbox.owner, "hit-set full");
            return OverlapOutcome::Saturated;
        }

        let amount = attack.damage * self.multiplier * hurtbox.multiplier;
        let poise_damage = attack.poise_damage * self.multiplier;
        let info = DamageInfo::new(amount, poise_damage, Some(self.owner))
            .with_kind(attack.kind)
            .with_parryable(attack.parryable)
            .with_stagger(attack.stagger)
            .with_point(target_position)
            .with_direction(target_position - attacker_position);

        self.hit_set.push(hurtbox.owner);
        tracing::debug!(
            hitbox = %self.id,
            target = %hurtbox.owner,
            amount,
            poise_damage,
            "hit registered"
        );
        OverlapOutcome::Hit(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HurtboxId;

    fn hitbox() -> Hitbox {
        Hitbox::new(HitboxId(1), ActorId(1), 1.5)
    }

    fn attack() -> AttackData {
        AttackData::new("slash", 20.0, 10.0, 1.0)
    }

    #[test]
    fn one_dispatch_per_target_per_activation() {
        let mut hitbox = hitbox();
        let target = Hurtbox::new(HurtboxId(9), ActorId(2), 2.0);
        hitbox.activate(&attack());

        let dispatched = (0..10)
            .map(|_| hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::X))
            .filter(|outcome| matches!(outcome, OverlapOutcome::Hit(_)))
            .count();
        assert_eq!(dispatched, 1);
        assert_eq!(hitbox.deactivate(), 1);

        hitbox.activate(&attack());
        assert!(matches!(
            hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Hit(_)
        ));
    }

    #[test]
    fn damage_applies_both_multipliers_poise_only_hitbox() {
        let mut hitbox = hitbox();
        let target = Hurtbox::new(HurtboxId(9), ActorId(2), 2.0);
        hitbox.activate(&attack());

        let OverlapOutcome::Hit(info) =
            hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::new(3.0, 0.0, 0.0))
        else {
            panic!("expected a hit");
        };
        assert_eq!(info.amount, 60.0);
        assert_eq!(info.poise_damage, 15.0);
        assert_eq!(info.source, Some(ActorId(1)));
        assert_eq!(info.direction, Vec3::X);
    }

    #[test]
    fn friendly_overlap_leaves_hit_set_unchanged() {
        let mut hitbox = hitbox();
        let ally = Hurtbox::new(HurtboxId(3), ActorId(5), 1.0);
        hitbox.activate(&attack());

        assert_eq!(
            hitbox.resolve_overlap(&ally, false, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Friendly
        );
        assert!(hitbox.hits().is_empty());
    }

    #[test]
    fn inactive_and_intangible_overlaps_do_nothing() {
        let mut hitbox = hitbox();
        let mut target = Hurtbox::new(HurtboxId(9), ActorId(2), 1.0);
        assert_eq!(
            hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Inactive
        );

        hitbox.activate(&attack());
        target.set_enabled(false);
        assert_eq!(
            hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Intangible
        );
        assert_eq!(hitbox.deactivate(), 0);
    }

    #[test]
    fn full_hit_set_refuses_new_targets() {
        let mut hitbox = hitbox();
        hitbox.activate(&attack());
        for owner in 0..CombatConfig::MAX_HITS_PER_ACTIVATION as u32 {
            let target = Hurtbox::new(HurtboxId(owner), ActorId(100 + owner), 1.0);
            assert!(matches!(
                hitbox.resolve_overlap(&target, true, Vec3::ZERO, Vec3::X),
                OverlapOutcome::Hit(_)
            ));
        }

        let late = Hurtbox::new(HurtboxId(999), ActorId(999), 1.0);
        assert_eq!(
            hitbox.resolve_overlap(&late, true, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Saturated
        );
        assert_eq!(hitbox.deactivate(), CombatConfig::MAX_HITS_PER_ACTIVATION);

        hitbox.activate(&attack());
        assert!(matches!(
            hitbox.resolve_overlap(&late, true, Vec3::ZERO, Vec3::X),
            OverlapOutcome::Hit(_)
        ));
    }
}
