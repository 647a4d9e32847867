//! Hit detection contract.
//!
//! Physics reports `(hitbox, hurtbox)` overlaps; this module decides whether
//! an overlap becomes a [`DamageInfo`]. A hitbox activation registers each
//! target at most once, no matter how many overlap callbacks arrive.
//!
//! [`DamageInfo`]: crate::types::DamageInfo

mod hitbox;
mod hurtbox;

pub use hitbox::{Hitbox, OverlapOutcome};
pub use hurtbox::Hurtbox;
