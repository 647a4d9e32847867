//! Per-actor action state machine.
//!
//! # Architecture
//!
//! States form a closed enum ([`ActionState`]) whose variants own their data.
//! Every legal transition is listed in one table ([`can_transition_to`]);
//! states never decide on their own whether they may be left.
//!
//! A state sees the rest of its actor through a [`StateContext`] built for
//! the duration of a call: resources, the input buffer, the hitbox, the
//! deflect chain and the actor's event list.
//!
//! ```text
//! Idle ⇄ Walk/Run/Sprint ⇄ Block
//!   │         │
//!   ├─ LightAttack ─(combo queue)─┐
//!   ├─ HeavyAttack (charge → swing)│
//!   ├─ Parry ─(riposte)→ attacks   │
//!   └─ Dodge ─(recovery)→ Dodge/attacks/Parry
//! any living state → Stagger → Idle
//! any living state → Death ─(respawn)→ Idle
//! ```

mod context;
mod guard;
mod kind;
mod machine;
mod state;
pub mod states;

pub use context::StateContext;
pub use guard::can_transition_to;
pub use kind::{Gait, StateKind, Transition};
pub use machine::StateMachine;
pub use state::ActionState;
pub use states::{DeflectChain, GuardTiming};
