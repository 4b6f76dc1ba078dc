// Character stats - health, mana, lives and experience
//
// Unlike the configuration, stats are owned by exactly one character and
// change during play. Damage and rewards go through these methods only.

use serde::{Deserialize, Serialize};

/// Stats asset validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("max {pool} must not be negative (got {max})")]
    NegativeMax { pool: &'static str, max: i32 },

    #[error("current {pool} {current} is outside 0..={max}")]
    OutOfRange {
        pool: &'static str,
        current: i32,
        max: i32,
    },

    #[error("max health must be greater than zero")]
    NoHealth,
}

/// Mutable resource pool of a single character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterStats {
    /// Whether this pool belongs to a player (mana/lives/experience are player-only)
    pub is_player: bool,

    // Health
    pub max_health: i32,
    pub current_health: i32,

    // Player-only
    pub max_mana: i32,
    pub current_mana: i32,
    pub lives: u32,
    pub experience_points: u32,
}

/// Starting stats for a player character
pub const PLAYER_STATS: CharacterStats = CharacterStats {
    is_player: true,
    max_health: 100,
    current_health: 100,
    max_mana: 100,
    current_mana: 100,
    lives: 3,
    experience_points: 0,
};

/// Starting stats for an enemy (no mana, a single life)
pub const ENEMY_STATS: CharacterStats = CharacterStats {
    is_player: false,
    max_health: 100,
    current_health: 100,
    max_mana: 0,
    current_mana: 0,
    lives: 1,
    experience_points: 0,
};

impl Default for CharacterStats {
    fn default() -> Self {
        PLAYER_STATS
    }
}

impl CharacterStats {
    /// Stats matching the control mode of a configuration
    pub fn for_player(is_player: bool) -> Self {
        if is_player {
            PLAYER_STATS
        } else {
            ENEMY_STATS
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_health > 0
    }

    /// Apply damage. Returns true if this hit brought health to zero.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.current_health = self.current_health.saturating_sub(amount.max(0)).max(0);
        !self.is_alive()
    }

    /// Restore health up to the maximum
    pub fn heal(&mut self, amount: i32) {
        self.current_health = self
            .current_health
            .saturating_add(amount.max(0))
            .min(self.max_health);
    }

    /// Spend mana if enough is available. Negative amounts are refused.
    pub fn spend_mana(&mut self, amount: i32) -> bool {
        if amount < 0 || amount > self.current_mana {
            return false;
        }
        self.current_mana -= amount;
        true
    }

    pub fn restore_mana(&mut self, amount: i32) {
        self.current_mana = self
            .current_mana
            .saturating_add(amount.max(0))
            .min(self.max_mana);
    }

    /// Check that every pool is within `0..=max`
    pub fn validate(&self) -> Result<(), StatsError> {
        let pools = [
            ("health", self.current_health, self.max_health),
            ("mana", self.current_mana, self.max_mana),
        ];
        for (pool, current, max) in pools {
            if max < 0 {
                return Err(StatsError::NegativeMax { pool, max });
            }
            if current < 0 || current > max {
                return Err(StatsError::OutOfRange { pool, current, max });
            }
        }
        if self.max_health == 0 {
            return Err(StatsError::NoHealth);
        }
        Ok(())
    }

    /// Consume a life and refill health. Returns the lives left.
    pub fn lose_life(&mut self) -> u32 {
        self.lives = self.lives.saturating_sub(1);
        if self.lives > 0 {
            self.current_health = self.max_health;
        }
        self.lives
    }

    pub fn gain_experience(&mut self, points: u32) {
        self.experience_points = self.experience_points.saturating_add(points);
    }
}
