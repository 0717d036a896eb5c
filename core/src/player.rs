use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub level: u32,
    pub health: u32,
    pub max_health: u32,
    pub experience: u32,
    pub exp_to_next_level: u32,
}

impl PlayerStats {
    pub fn new(settings: &PlayerSettings) -> Self {
        let level = settings.starting_level.max(1);
        let max_health = settings.max_health_for(level);
        Self {
            level,
            health: max_health,
            max_health,
            experience: 0,
            exp_to_next_level: settings.exp_requirement_for(level),
        }
    }

    pub const fn is_dead(&self) -> bool {
        self.health == 0
    }

    /// Clamps at zero. Returns whether this hit killed the player.
    pub fn take_damage(&mut self, damage: u32) -> bool {
        let was_alive = !self.is_dead();
        self.health = self.health.saturating_sub(damage);
        was_alive && self.is_dead()
    }

    /// Returns the health actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = self.health.saturating_add(amount).min(self.max_health);
        self.health - before
    }

    pub fn add_experience(&mut self, amount: u32) {
        self.experience = self.experience.saturating_add(amount);
    }

    pub const fn can_level_up(&self) -> bool {
        self.experience >= self.exp_to_next_level
    }

    /// Excess experience carries over into the next level.
    pub fn level_up(&mut self, settings: &PlayerSettings) -> bool {
        if !self.can_level_up() {
            return false;
        }
        self.experience -= self.exp_to_next_level;
        self.level = self.level.saturating_add(1);
        self.max_health = settings.max_health_for(self.level);
        self.exp_to_next_level = settings.exp_requirement_for(self.level);
        self.health = self.max_health;
        log::info!(
            "Level up to {}, max health {}, next level at {} exp",
            self.level,
            self.max_health,
            self.exp_to_next_level
        );
        true
    }
}
