//! Per-state data and behavior.

mod block;
mod dodge;
mod heavy_attack;
mod light_attack;
mod locomotion;
mod parry;
mod stagger;
mod swing;

pub use block::Block;
pub use dodge::Dodge;
pub use heavy_attack::HeavyAttack;
pub use light_attack::LightAttack;
pub use locomotion::Locomotion;
pub use parry::{DeflectChain, GuardTiming, Parry};
pub use stagger::Stagger;
pub use swing::Swing;
