// Keyboard input
//
// - `action`: game actions and default key bindings
// - `buffer`: short press buffer so early jumps are not lost
// - `player`: pressed / just-pressed state of the local player
// - `config`: key remapping
// - `manager`: winit event entry point
//
// ```rust,ignore
// let mut input = InputManager::default();
// input.process_keyboard_event(&key_event);
// let axis = input.player().horizontal_axis();
// input.end_frame(dt);
// ```

pub mod action;
pub mod buffer;
pub mod config;
pub mod manager;
pub mod player;

pub use action::Action;
pub use config::InputBindings;
pub use manager::InputManager;
pub use player::PlayerInput;
