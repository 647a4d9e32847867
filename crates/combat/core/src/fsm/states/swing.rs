use crate::types::{AttackData, AttackPhase};

/// Progress through one attack's timing table.
#[derive(Clone, Debug, PartialEq)]
pub struct Swing {
    attack: AttackData,
    elapsed: f32,
    id: u32,
}

impl Swing {
    pub fn new(attack: AttackData, id: u32) -> Self {
        Self {
            attack,
            elapsed: 0.0,
            id,
        }
    }

    pub fn attack(&self) -> &AttackData {
        &self.attack
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Normalized time.
    pub fn t(&self) -> f32 {
        self.attack.normalized(self.elapsed)
    }

    pub fn phase(&self) -> AttackPhase {
        self.attack.phase_at(self.t())
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
    }

    pub fn hitbox_live(&self) -> bool {
        self.attack.hitbox_active_at(self.t())
    }

    pub fn accepts_combo(&self) -> bool {
        self.attack.accepts_combo_at(self.t())
    }

    pub fn is_cancellable(&self) -> bool {
        self.attack.cancellable_at(self.t())
    }

    pub fn is_finished(&self) -> bool {
        self.phase() == AttackPhase::Finished
    }
}
