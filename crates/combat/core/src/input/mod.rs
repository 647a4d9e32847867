//! Input buffering layer.
//!
//! Bridges the display-rate sampling tick to the simulation-rate action
//! layer: [`InputSampler`] turns raw held-button snapshots into discrete
//! intents, and [`InputBuffer`] keeps them alive for a short window so a
//! state can catch an input issued slightly before its cancel window opens.

mod action;
mod buffer;
mod sampler;

pub use action::{BufferedInput, CombatAction};
pub use buffer::InputBuffer;
pub use sampler::{AttackPressTracker, HeldInput, InputSampler, InputSnapshot};
