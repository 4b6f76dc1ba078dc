// Keyboard state of the local player

use super::action::Action;
use super::buffer::InputBuffer;
use std::collections::HashSet;

/// Pressed/just-pressed tracking plus a press buffer
#[derive(Debug, Default)]
pub struct PlayerInput {
    pressed: HashSet<Action>,
    just_pressed: HashSet<Action>,
    just_released: HashSet<Action>,
    buffer: InputBuffer,
}

impl PlayerInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    /// Pressed since the last `end_frame`
    pub fn just_pressed(&self, action: Action) -> bool {
        self.just_pressed.contains(&action)
    }

    pub fn just_released(&self, action: Action) -> bool {
        self.just_released.contains(&action)
    }

    pub fn is_buffered(&self, action: Action) -> bool {
        self.buffer.has(action)
    }

    /// Take a buffered press. Returns true if one was waiting.
    pub fn consume_buffered(&mut self, action: Action) -> bool {
        self.buffer.consume(action)
    }

    pub fn press(&mut self, action: Action) {
        if self.pressed.insert(action) {
            self.just_pressed.insert(action);
            self.buffer.push(action);
        }
    }

    pub fn release(&mut self, action: Action) {
        if self.pressed.remove(&action) {
            self.just_released.insert(action);
        }
    }

    /// Clear per-frame edges and age the buffer
    pub fn end_frame(&mut self, dt: f32) {
        self.just_pressed.clear();
        self.just_released.clear();
        self.buffer.update(dt);
    }

    pub fn reset(&mut self) {
        self.pressed.clear();
        self.just_pressed.clear();
        self.just_released.clear();
        self.buffer.clear();
    }

    /// Horizontal axis in {-1, 0, 1}. Opposite keys cancel out.
    pub fn horizontal_axis(&self) -> f32 {
        let mut axis = 0.0;
        if self.is_pressed(Action::MoveLeft) {
            axis -= 1.0;
        }
        if self.is_pressed(Action::MoveRight) {
            axis += 1.0;
        }
        axis
    }

    pub fn is_running(&self) -> bool {
        self.is_pressed(Action::Run)
    }
}
