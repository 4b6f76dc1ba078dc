// Character system
//
// - `config` / `stats`: shared configuration assets and per-character stats
// - `state` / `animation`: sprite animation state machine
// - `ai` / `combat` / `controller`: who drives a character and how it attacks
// - `movement`: speeds and ground sensing
// - `character` / `manager`: the entity and the scene that owns them

pub mod ai;
pub mod animation;
pub mod character;
pub mod combat;
pub mod config;
pub mod controller;
pub mod manager;
pub mod movement;
pub mod state;
pub mod stats;

// Re-export commonly used types
pub use ai::{Brain, CharacterAi};
pub use animation::{AnimationStates, FrameRef, SpriteFrames};
pub use character::{Character, CharacterBuilder, CharacterId};
pub use config::{AttackChoice, CharacterConfig, ConfigError, ControlMode, SharedConfig};
pub use controller::Controller;
pub use manager::CharacterManager;
pub use movement::MovementOverride;
pub use state::{AnimState, AttackKind, ClipMode};
pub use stats::{CharacterStats, StatsError};
