use super::Swing;
use crate::events::AnimationTrigger;
use crate::fsm::{StateContext, Transition};
use crate::types::ChargeData;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Charge {
    data: ChargeData,
    held: f32,
}

impl Charge {
    fn fraction(&self) -> f32 {
        if self.data.max_charge_time <= 0.0 {
            return 1.0;
        }
        (self.held / self.data.max_charge_time).min(1.0)
    }
}

/// Heavy swing with an optional charge sub-phase.
///
/// Charging lasts while the attack button stays held, up to the full charge
/// time. Releasing (or reaching full charge) starts the swing with damage and
/// poise damage scaled by the charge fraction.
#[derive(Clone, Debug, PartialEq)]
pub struct HeavyAttack {
    swing: Swing,
    charge: Option<Charge>,
}

impl HeavyAttack {
    pub fn enter(ctx: &mut StateContext<'_>) -> Self {
        let heavy = &ctx.moveset.heavy;
        let attack = heavy.attack.clone();
        let charge = heavy
            .charge
            .filter(|_| ctx.held.attack)
            .map(|data| Charge { data, held: 0.0 });

        let name = attack.name.clone();
        if charge.is_some() {
            ctx.animate(AnimationTrigger::HeavyCharge { name });
        } else {
            ctx.animate(AnimationTrigger::HeavyAttack { name, charge: 0.0 });
        }
        let id = ctx.next_swing();
        Self {
            swing: Swing::new(attack, id),
            charge,
        }
    }

    pub fn swing(&self) -> &Swing {
        &self.swing
    }

    pub fn is_charging(&self) -> bool {
        self.charge.is_some()
    }

    /// Charge fraction while charging, `None` once the swing started.
    pub fn charge_fraction(&self) -> Option<f32> {
        self.charge.map(|charge| charge.fraction())
    }

    pub fn execute(&mut self, dt: f32, ctx: &mut StateContext<'_>) -> Option<Transition> {
        if let Some(charge) = self.charge.as_mut() {
            charge.held += dt;
            if ctx.held.attack && charge.held < charge.data.max_charge_time {
                return None;
            }
            let fraction = charge.fraction();
            let (damage, poise) = charge.data.multipliers(fraction);
            let attack = self.swing.attack().scaled(damage, poise);
            tracing::debug!(actor = %ctx.actor, fraction, damage = attack.damage, "heavy attack released");
            ctx.animate(AnimationTrigger::HeavyAttack {
                name: attack.name.clone(),
                charge: fraction,
            });
            let id = ctx.next_swing();
            self.swing = Swing::new(attack, id);
            self.charge = None;
            return None;
        }

        self.swing.advance(dt);
        self.swing.is_finished().then_some(Transition::Idle)
    }
}
