// Game action definitions and default key bindings

use winit::keyboard::KeyCode;

/// Everything a player can ask their character to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Movement
    MoveLeft,
    MoveRight,
    Run,
    Jump,

    // Held animations
    Throw,
    Push,

    // One-shot combat triggers
    StrikePush,
    StrikeThrow,

    /// Debug trigger: knock the player back
    HitBack,

    // Meta
    Pause,
}

impl Action {
    /// Actions that drive the character (everything except meta actions)
    pub fn is_gameplay(&self) -> bool {
        !matches!(self, Self::Pause)
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Action)> {
    vec![
        // Movement (A/D and arrows)
        (KeyCode::KeyA, Action::MoveLeft),
        (KeyCode::ArrowLeft, Action::MoveLeft),
        (KeyCode::KeyD, Action::MoveRight),
        (KeyCode::ArrowRight, Action::MoveRight),
        (KeyCode::ShiftLeft, Action::Run),
        (KeyCode::ShiftRight, Action::Run),
        (KeyCode::Space, Action::Jump),
        // Held
        (KeyCode::KeyF, Action::Throw),
        (KeyCode::KeyE, Action::Push),
        // Strikes
        (KeyCode::KeyJ, Action::StrikePush),
        (KeyCode::KeyK, Action::StrikeThrow),
        (KeyCode::KeyH, Action::HitBack),
        (KeyCode::Escape, Action::Pause),
    ]
}
