//! The transition table.
//!
//! This is the single authority on which transitions are legal. Resource
//! checks happen afterwards, at commit.

use super::{ActionState, StateKind};

/// Whether `state` may be left for `target` right now.
pub fn can_transition_to(state: &ActionState, target: StateKind) -> bool {
    use StateKind as K;

    match state {
        ActionState::Death => false,
        _ if target.is_forced() => true,

        ActionState::Idle => target != K::Idle,
        ActionState::Locomotion(locomotion) => target != locomotion.kind(),

        // Chaining light swings goes through the combo queue only.
        ActionState::LightAttack(attack) => match target {
            K::LightAttack => false,
            K::HeavyAttack | K::Parry | K::Block | K::Dodge => attack.swing().is_cancellable(),
            _ => attack.swing().is_finished(),
        },
        ActionState::HeavyAttack(attack) => match target {
            K::HeavyAttack => false,
            _ if attack.is_charging() => false,
            K::LightAttack | K::Parry | K::Block | K::Dodge => attack.swing().is_cancellable(),
            _ => attack.swing().is_finished(),
        },

        ActionState::Parry(parry) => match target {
            K::LightAttack | K::HeavyAttack => parry.riposte_open() || parry.is_finished(),
            K::Parry | K::Dodge => parry.is_recovering(),
            _ => parry.is_finished(),
        },
        ActionState::Block(_) => target != K::Block,

        ActionState::Dodge(dodge) => match target {
            K::Dodge | K::LightAttack | K::HeavyAttack | K::Parry => dodge.is_recovering(),
            _ => dodge.is_finished(),
        },
        // Only a dodge in the trailing recovery window cuts a stagger short.
        ActionState::Stagger(stagger) => match target {
            K::Dodge => stagger.allows_dodge_cancel() || stagger.is_finished(),
            _ => stagger.is_finished(),
        },
    }
}
