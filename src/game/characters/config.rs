// Character configuration assets
//
// A configuration is an immutable bundle of tunables shared by every character
// spawned from it. Characters hold it through `Arc`, so editing an asset means
// loading a new one, never mutating a live instance.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::engine::physics::CollisionLayer;

/// Who drives a character spawned from this configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlMode {
    /// Keyboard input
    Player,
    /// Patrol/chase/attack brain
    Ai,
}

impl Default for ControlMode {
    fn default() -> Self {
        Self::Player
    }
}

/// Which clips an AI character attacks with
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackChoice {
    Throw,
    Push,
    /// Coin flip between the two on every attack
    #[default]
    Either,
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number greater than zero (got {value})")]
    NotPositive { field: &'static str, value: f32 },

    #[error("{field} must be a finite, non-negative number (got {value})")]
    Negative { field: &'static str, value: f32 },

    #[error("attack range {attack} must not exceed chase range {chase}")]
    AttackBeyondChase { attack: f32, chase: f32 },

    #[error("give-up range {give_up} must be greater than chase range {chase}")]
    GiveUpWithinChase { give_up: f32, chase: f32 },

    #[error("ground mask selects no layer")]
    EmptyGroundMask,
}

/// Horizontal speeds and jump forces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Walking speed (units/second)
    pub walk_speed: f32,
    /// Running speed (units/second)
    pub run_speed: f32,
    /// Speed while pushing
    pub push_speed: f32,
    /// Jump velocity when jumping from a walk or standstill
    pub walk_jump_force: f32,
    /// Jump velocity when jumping while running
    pub run_jump_force: f32,
    /// Jump velocity of the optional second jump
    pub double_jump_force: f32,
    pub allow_double_jump: bool,
    /// Gravity multiplier for the character body
    pub gravity_scale: f32,
    /// Horizontal speed while airborne
    pub air_control: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.5,
            run_speed: 6.5,
            push_speed: 2.0,
            walk_jump_force: 11.0,
            run_jump_force: 14.0,
            double_jump_force: 8.0,
            allow_double_jump: true,
            gravity_scale: 3.0,
            air_control: 3.0,
        }
    }
}

/// Ground probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundConfig {
    /// Collision layer bits considered ground
    pub ground_mask: u32,
    /// How far below the feet the probe reaches
    pub check_distance: f32,
    /// Grace period after leaving the ground during which a jump is still honored
    pub coyote_time: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            ground_mask: CollisionLayer::Ground.bits(),
            check_distance: 0.1,
            coyote_time: 0.1,
        }
    }
}

/// Seconds per frame for each animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationRates {
    pub idle: f32,
    pub walk: f32,
    pub run: f32,
    /// Cadence of rise1 → rise2 → rise3 → apex
    pub jump: f32,
    pub rest: f32,
    pub throw: f32,
    pub push: f32,
    pub stunned: f32,
    pub hit_back: f32,
}

impl Default for AnimationRates {
    fn default() -> Self {
        Self {
            idle: 0.30,
            walk: 0.20,
            run: 0.10,
            jump: 0.15,
            rest: 0.40,
            throw: 0.15,
            push: 0.18,
            stunned: 0.25,
            hit_back: 0.20,
        }
    }
}

/// Timed transitions of the animation state machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationDelays {
    /// Idle time before switching to Rest
    pub rest_delay: f32,
    /// How long the land frame shows before returning to the ground state
    pub landing_delay: f32,
    /// How long Stunned holds its last frame before recovering to Idle
    pub stunned_wait_time: f32,
}

impl Default for AnimationDelays {
    fn default() -> Self {
        Self {
            rest_delay: 5.0,
            landing_delay: 0.10,
            stunned_wait_time: 3.0,
        }
    }
}

/// AI ranges and attack timing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Start chasing inside this distance
    pub chase_range: f32,
    /// Hold position and attack inside this distance
    pub attack_range: f32,
    /// Stop chasing beyond this distance
    pub give_up_range: f32,
    /// Extra distance beyond the attack range before chasing resumes
    pub attack_hold_buffer: f32,
    /// Horizontal deceleration while holding (units/second²)
    pub hold_brake: f32,
    /// Distance at which a patrol waypoint counts as reached
    pub waypoint_snap_distance: f32,
    /// Seconds between attacks
    pub attack_cooldown: f32,
    /// Seconds to stand at each patrol waypoint (0 walks straight on)
    pub patrol_wait: f32,
    pub attack_kind: AttackChoice,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            chase_range: 7.0,
            attack_range: 2.2,
            give_up_range: 11.0,
            attack_hold_buffer: 0.25,
            hold_brake: 50.0,
            waypoint_snap_distance: 0.1,
            attack_cooldown: 1.2,
            patrol_wait: 0.0,
            attack_kind: AttackChoice::Either,
        }
    }
}

/// Collider dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self {
            width: 1.0,
            height: 2.0,
        }
    }
}

/// Complete configuration asset for one kind of character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub display_name: String,
    pub control: ControlMode,
    pub movement: MovementConfig,
    pub ground: GroundConfig,
    pub rates: AnimationRates,
    pub delays: AnimationDelays,
    pub ai: AiConfig,
    pub body: BodyConfig,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            display_name: "Default".to_string(),
            control: ControlMode::Player,
            movement: MovementConfig::default(),
            ground: GroundConfig::default(),
            rates: AnimationRates::default(),
            delays: AnimationDelays::default(),
            ai: AiConfig::default(),
            body: BodyConfig::default(),
        }
    }
}

/// Shared, read-only handle to a configuration
pub type SharedConfig = Arc<CharacterConfig>;

impl CharacterConfig {
    /// Default configuration for an AI-driven enemy
    pub fn enemy() -> Self {
        Self {
            display_name: "Enemy".to_string(),
            control: ControlMode::Ai,
            ..Self::default()
        }
    }

    pub fn is_player(&self) -> bool {
        self.control == ControlMode::Player
    }

    /// Parse a configuration from TOML text and validate it
    pub fn from_toml_str(text: &str) -> Result<Self, crate::engine::assets::AssetError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Wrap into a shared handle
    pub fn into_shared(self) -> SharedConfig {
        Arc::new(self)
    }

    /// Check every tunable for values the controllers cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("movement.walk_speed", self.movement.walk_speed),
            ("movement.run_speed", self.movement.run_speed),
            ("movement.walk_jump_force", self.movement.walk_jump_force),
            ("movement.run_jump_force", self.movement.run_jump_force),
            ("rates.idle", self.rates.idle),
            ("rates.walk", self.rates.walk),
            ("rates.run", self.rates.run),
            ("rates.jump", self.rates.jump),
            ("rates.rest", self.rates.rest),
            ("rates.throw", self.rates.throw),
            ("rates.push", self.rates.push),
            ("rates.stunned", self.rates.stunned),
            ("rates.hit_back", self.rates.hit_back),
            ("ai.attack_range", self.ai.attack_range),
            ("ai.chase_range", self.ai.chase_range),
            ("ai.give_up_range", self.ai.give_up_range),
            ("body.width", self.body.width),
            ("body.height", self.body.height),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let non_negative = [
            ("movement.push_speed", self.movement.push_speed),
            ("movement.double_jump_force", self.movement.double_jump_force),
            ("movement.air_control", self.movement.air_control),
            ("movement.gravity_scale", self.movement.gravity_scale),
            ("ground.check_distance", self.ground.check_distance),
            ("ground.coyote_time", self.ground.coyote_time),
            ("delays.rest_delay", self.delays.rest_delay),
            ("delays.landing_delay", self.delays.landing_delay),
            ("delays.stunned_wait_time", self.delays.stunned_wait_time),
            ("ai.attack_hold_buffer", self.ai.attack_hold_buffer),
            ("ai.hold_brake", self.ai.hold_brake),
            ("ai.waypoint_snap_distance", self.ai.waypoint_snap_distance),
            ("ai.attack_cooldown", self.ai.attack_cooldown),
            ("ai.patrol_wait", self.ai.patrol_wait),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        if self.ai.attack_range > self.ai.chase_range {
            return Err(ConfigError::AttackBeyondChase {
                attack: self.ai.attack_range,
                chase: self.ai.chase_range,
            });
        }
        if self.ai.give_up_range <= self.ai.chase_range {
            return Err(ConfigError::GiveUpWithinChase {
                give_up: self.ai.give_up_range,
                chase: self.ai.chase_range,
            });
        }
        if self.ground.ground_mask == 0 {
            return Err(ConfigError::EmptyGroundMask);
        }

        Ok(())
    }
}
