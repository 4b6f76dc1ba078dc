//! 2D platformer character controller.
//!
//! Characters are driven by explicit `update` (per frame) and `fixed_update`
//! (per physics step) calls; see [`game::characters::CharacterManager`].

pub mod common;
pub mod engine;
pub mod game;
