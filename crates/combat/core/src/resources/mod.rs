//! Depletable and accumulating per-actor counters.
//!
//! - [`Stamina`] depletes on use and regenerates after a delay, with
//!   hysteresis on exhaustion recovery.
//! - [`Poise`] accumulates incoming poise damage toward a sticky break and
//!   decays back to zero after a delay.
//!
//! Both are exclusively owned by their actor and mutated only through their
//! own methods, once per simulation tick via `tick(dt)`.

mod poise;
mod stamina;

pub use poise::{Poise, PoiseEvent};
pub use stamina::{Stamina, StaminaEvent};
