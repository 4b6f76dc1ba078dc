// Who drives a character: keyboard or AI brain
//
// The variant is chosen once from the configuration when the character is
// built and never changes afterwards.

use glam::Vec2;

use crate::engine::input::{Action, PlayerInput};

use super::ai::{AiSteering, CharacterAi};
use super::combat::{AiCombat, PlayerCombat};
use super::config::{AiConfig, CharacterConfig, ControlMode};
use super::state::AttackKind;

/// Intent read from the keyboard on the last frame
#[derive(Debug, Default)]
pub struct PlayerController {
    combat: PlayerCombat,
    pub axis: f32,
    pub run_held: bool,
    pub throw_held: bool,
    pub throw_pressed: bool,
    pub push_held: bool,
    pub hit_back_pressed: bool,
    /// Latched until the next physics step
    pub jump_requested: bool,
}

impl PlayerController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read this frame's input. A buffered jump is only taken when `can_jump`.
    pub fn read_input(&mut self, input: &mut PlayerInput, can_jump: bool) -> Vec<AttackKind> {
        self.axis = input.horizontal_axis();
        self.run_held = input.is_running();
        self.throw_held = input.is_pressed(Action::Throw);
        self.throw_pressed = input.just_pressed(Action::Throw);
        self.push_held = input.is_pressed(Action::Push);
        self.hit_back_pressed = input.just_pressed(Action::HitBack);

        if can_jump && input.consume_buffered(Action::Jump) {
            self.jump_requested = true;
        }

        self.combat.poll(input)
    }

    pub fn has_move_input(&self) -> bool {
        self.axis.abs() > 0.01
    }
}

/// AI brain plus its attack trigger
#[derive(Debug)]
pub struct AiController {
    pub brain: CharacterAi,
    pub combat: AiCombat,
    /// Steering from the last physics step
    pub steering: AiSteering,
}

impl AiController {
    pub fn new(waypoints: Vec<Vec2>, config: &AiConfig, seed: u64) -> Self {
        Self {
            brain: CharacterAi::new(waypoints),
            combat: AiCombat::new(config.attack_cooldown, seed).with_choice(config.attack_kind),
            steering: AiSteering {
                velocity_x: 0.0,
                facing: None,
                running: false,
                prevent_rest: false,
            },
        }
    }
}

#[derive(Debug)]
pub enum Controller {
    Player(PlayerController),
    Ai(AiController),
}

impl Controller {
    /// Build the variant the configuration asks for
    pub fn for_config(config: &CharacterConfig, waypoints: Vec<Vec2>, seed: u64) -> Self {
        match config.control {
            ControlMode::Player => Self::Player(PlayerController::new()),
            ControlMode::Ai => Self::Ai(AiController::new(waypoints, &config.ai, seed)),
        }
    }

    pub fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_follows_control_mode() {
        let player = Controller::for_config(&CharacterConfig::default(), Vec::new(), 0);
        assert!(player.is_player());

        let enemy = Controller::for_config(&CharacterConfig::enemy(), vec![Vec2::ZERO, Vec2::X], 0);
        assert!(!enemy.is_player());
        match enemy {
            Controller::Ai(ai) => assert_eq!(ai.brain.waypoints().len(), 2),
            Controller::Player(_) => panic!("expected AI controller"),
        }
    }

    #[test]
    fn test_buffered_jump_waits_until_possible() {
        let mut controller = PlayerController::new();
        let mut input = PlayerInput::new();
        input.press(Action::Jump);

        controller.read_input(&mut input, false);
        assert!(!controller.jump_requested);
        assert!(input.is_buffered(Action::Jump));

        controller.read_input(&mut input, true);
        assert!(controller.jump_requested);
        assert!(!input.is_buffered(Action::Jump));
    }

    #[test]
    fn test_read_input_captures_intent() {
        let mut controller = PlayerController::new();
        let mut input = PlayerInput::new();
        input.press(Action::MoveLeft);
        input.press(Action::Run);
        input.press(Action::StrikeThrow);

        let attacks = controller.read_input(&mut input, true);
        assert_eq!(controller.axis, -1.0);
        assert!(controller.run_held);
        assert!(controller.has_move_input());
        assert_eq!(attacks, vec![AttackKind::Throw]);
    }
}
