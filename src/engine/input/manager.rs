// Input manager - turns winit keyboard events into player actions

use super::action::Action;
use super::config::InputBindings;
use super::player::PlayerInput;
use log::trace;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Owns the key bindings and the local player's input state
#[derive(Debug, Default)]
pub struct InputManager {
    bindings: InputBindings,
    player: PlayerInput,
}

impl InputManager {
    pub fn new(bindings: InputBindings) -> Self {
        Self {
            bindings,
            player: PlayerInput::new(),
        }
    }

    /// Process a keyboard event from winit
    pub fn process_keyboard_event(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(key_code) = event.physical_key {
            self.handle_key(
                key_code,
                event.state == ElementState::Pressed,
                event.repeat,
            );
        }
    }

    /// Apply a key transition. OS key repeats are ignored.
    pub fn handle_key(&mut self, key: KeyCode, pressed: bool, repeat: bool) -> Option<Action> {
        let action = self.bindings.get_action(key)?;
        if pressed {
            if repeat {
                return None;
            }
            trace!("{key:?} -> {action:?}");
            self.player.press(action);
        } else {
            self.player.release(action);
        }
        Some(action)
    }

    /// Call once per frame after the character has read its input
    pub fn end_frame(&mut self, dt: f32) {
        self.player.end_frame(dt);
    }

    pub fn player(&self) -> &PlayerInput {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut PlayerInput {
        &mut self.player
    }

    pub fn bindings(&self) -> &InputBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut InputBindings {
        &mut self.bindings
    }

    /// Drop all held keys (focus loss)
    pub fn reset(&mut self) {
        self.player.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_key_presses_action() {
        let mut manager = InputManager::default();
        assert_eq!(
            manager.handle_key(KeyCode::KeyD, true, false),
            Some(Action::MoveRight)
        );
        assert!(manager.player().is_pressed(Action::MoveRight));

        manager.handle_key(KeyCode::KeyD, false, false);
        assert!(!manager.player().is_pressed(Action::MoveRight));
    }

    #[test]
    fn test_unbound_key_is_ignored() {
        let mut manager = InputManager::default();
        assert_eq!(manager.handle_key(KeyCode::KeyZ, true, false), None);
    }

    #[test]
    fn test_repeat_does_not_rebuffer() {
        let mut manager = InputManager::default();
        manager.handle_key(KeyCode::Space, true, false);
        assert!(manager.player_mut().consume_buffered(Action::Jump));

        assert_eq!(manager.handle_key(KeyCode::Space, true, true), None);
        assert!(!manager.player().is_buffered(Action::Jump));
    }

    #[test]
    fn test_end_frame_clears_edges() {
        let mut manager = InputManager::default();
        manager.handle_key(KeyCode::KeyJ, true, false);
        assert!(manager.player().just_pressed(Action::StrikePush));

        manager.end_frame(0.016);
        assert!(!manager.player().just_pressed(Action::StrikePush));
    }

    #[test]
    fn test_rebinding_through_manager() {
        let mut manager = InputManager::default();
        manager.bindings_mut().bind(KeyCode::KeyW, Action::Jump);
        manager.handle_key(KeyCode::KeyW, true, false);
        assert!(manager.player().is_pressed(Action::Jump));

        manager.reset();
        assert!(!manager.player().is_pressed(Action::Jump));
        assert!(manager.bindings().has_binding(Action::Jump));
    }
}
