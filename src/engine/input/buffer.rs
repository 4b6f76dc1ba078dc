// Input buffering so presses slightly ahead of time are not lost

use super::action::Action;
use std::collections::VecDeque;

/// Maximum number of buffered presses to keep
const MAX_BUFFER_SIZE: usize = 16;

/// How long a press stays buffered (seconds)
pub const BUFFER_WINDOW: f32 = 0.12;

/// A press waiting to be consumed
#[derive(Debug, Clone, Copy)]
pub struct BufferedInput {
    pub action: Action,
    pub time_remaining: f32,
}

impl BufferedInput {
    pub fn new(action: Action, window: f32) -> Self {
        Self {
            action,
            time_remaining: window,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.time_remaining <= 0.0
    }
}

/// Time-windowed press buffer
///
/// A jump pressed a few frames before landing is still honored once the
/// character touches down, as long as it is consumed inside the window.
#[derive(Debug)]
pub struct InputBuffer {
    buffer: VecDeque<BufferedInput>,
    window: f32,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::with_window(BUFFER_WINDOW)
    }

    pub fn with_window(window: f32) -> Self {
        Self {
            buffer: VecDeque::with_capacity(MAX_BUFFER_SIZE),
            window,
        }
    }

    /// Buffer a press, refreshing the window if it is already buffered
    pub fn push(&mut self, action: Action) {
        if let Some(existing) = self.buffer.iter_mut().find(|input| input.action == action) {
            existing.time_remaining = self.window;
            return;
        }
        self.buffer.push_back(BufferedInput::new(action, self.window));
        if self.buffer.len() > MAX_BUFFER_SIZE {
            self.buffer.pop_front();
        }
    }

    pub fn has(&self, action: Action) -> bool {
        self.buffer.iter().any(|input| input.action == action)
    }

    /// Remove a buffered press. Returns true if one was there.
    pub fn consume(&mut self, action: Action) -> bool {
        match self.buffer.iter().position(|input| input.action == action) {
            Some(pos) => {
                self.buffer.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Age every press by `dt` and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        for input in &mut self.buffer {
            input.time_remaining -= dt;
        }
        self.buffer.retain(|input| !input.is_expired());
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for InputBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_consume() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        assert!(buffer.has(Action::Jump));
        assert!(buffer.consume(Action::Jump));
        assert!(!buffer.consume(Action::Jump));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_no_duplicates() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        buffer.push(Action::Jump);
        assert_eq!(buffer.len(), 1);
    }

    #[test]
    fn test_press_expires_after_window() {
        let mut buffer = InputBuffer::with_window(0.1);
        buffer.push(Action::Jump);

        buffer.update(0.05);
        assert!(buffer.has(Action::Jump));

        buffer.update(0.06);
        assert!(!buffer.has(Action::Jump));
    }

    #[test]
    fn test_repress_refreshes_window() {
        let mut buffer = InputBuffer::with_window(0.1);
        buffer.push(Action::Jump);
        buffer.update(0.08);
        buffer.push(Action::Jump);
        buffer.update(0.08);
        assert!(buffer.has(Action::Jump));
    }

    #[test]
    fn test_max_size() {
        let mut buffer = InputBuffer::new();
        let actions = [Action::Jump, Action::StrikePush, Action::StrikeThrow];
        for i in 0..MAX_BUFFER_SIZE + 5 {
            buffer.push(actions[i % actions.len()]);
        }
        assert!(buffer.len() <= MAX_BUFFER_SIZE);
    }

    #[test]
    fn test_clear() {
        let mut buffer = InputBuffer::new();
        buffer.push(Action::Jump);
        buffer.push(Action::StrikeThrow);
        buffer.clear();
        assert!(buffer.is_empty());
    }
}
