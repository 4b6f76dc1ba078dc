// Combat triggers
//
// Both sides only pick which attack clip to play; the animator decides
// whether the current state allows it.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::common::Cooldown;
use crate::engine::input::{Action, PlayerInput};

use super::config::AttackChoice;
use super::state::AttackKind;

/// Cooldown-gated random attacks for AI characters
#[derive(Debug)]
pub struct AiCombat {
    cooldown: Cooldown,
    cooldown_duration: f32,
    choice: AttackChoice,
    rng: ChaCha8Rng,
}

impl AiCombat {
    pub fn new(cooldown_duration: f32, seed: u64) -> Self {
        Self {
            cooldown: Cooldown::new(),
            cooldown_duration,
            choice: AttackChoice::Either,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn with_choice(mut self, choice: AttackChoice) -> Self {
        self.choice = choice;
        self
    }

    /// Advance the cooldown and maybe pick an attack.
    ///
    /// `distance` is None when there is no target; the cooldown is frozen then.
    pub fn tick(&mut self, dt: f32, distance: Option<f32>, attack_range: f32) -> Option<AttackKind> {
        let distance = distance?;
        self.cooldown.tick(dt);

        if distance > attack_range || !self.cooldown.is_ready() {
            return None;
        }

        self.cooldown.trigger(self.cooldown_duration);
        Some(match self.choice {
            AttackChoice::Throw => AttackKind::Throw,
            AttackChoice::Push => AttackKind::Push,
            // Even odds between the two clips
            AttackChoice::Either if self.rng.gen_bool(0.5) => AttackKind::Push,
            AttackChoice::Either => AttackKind::Throw,
        })
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }
}

/// Key-triggered attacks for the player
#[derive(Debug, Default)]
pub struct PlayerCombat;

impl PlayerCombat {
    pub fn new() -> Self {
        Self
    }

    /// Strikes pressed this frame, push first
    pub fn poll(&self, input: &PlayerInput) -> Vec<AttackKind> {
        let mut attacks = Vec::new();
        if input.just_pressed(Action::StrikePush) {
            attacks.push(AttackKind::Push);
        }
        if input.just_pressed(Action::StrikeThrow) {
            attacks.push(AttackKind::Throw);
        }
        attacks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fires_immediately_then_waits_for_cooldown() {
        let mut combat = AiCombat::new(1.2, 7);
        assert!(combat.tick(0.1, Some(1.0), 2.2).is_some());
        assert!((combat.cooldown_remaining() - 1.2).abs() < 1e-6);

        // 0.1 * 11 = 1.1 < 1.2
        for _ in 0..11 {
            assert!(combat.tick(0.1, Some(1.0), 2.2).is_none());
        }
        assert!(combat.tick(0.15, Some(1.0), 2.2).is_some());
    }

    #[test]
    fn test_out_of_range_never_fires() {
        let mut combat = AiCombat::new(1.2, 7);
        for _ in 0..100 {
            assert!(combat.tick(0.1, Some(2.3), 2.2).is_none());
        }
        // Range boundary is inclusive
        assert!(combat.tick(0.1, Some(2.2), 2.2).is_some());
    }

    #[test]
    fn test_no_target_freezes_cooldown() {
        let mut combat = AiCombat::new(1.0, 7);
        combat.tick(0.1, Some(0.5), 2.2);
        combat.tick(5.0, None, 2.2);
        assert!((combat.cooldown_remaining() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_picks_both_attacks() {
        let mut combat = AiCombat::new(0.0, 42);
        let picks: Vec<_> = (0..64)
            .filter_map(|_| combat.tick(0.1, Some(1.0), 2.2))
            .collect();
        assert_eq!(picks.len(), 64);
        assert!(picks.contains(&AttackKind::Push));
        assert!(picks.contains(&AttackKind::Throw));
    }

    #[test]
    fn test_same_seed_same_choices() {
        let mut a = AiCombat::new(0.0, 3);
        let mut b = AiCombat::new(0.0, 3);
        for _ in 0..16 {
            assert_eq!(a.tick(0.1, Some(1.0), 2.2), b.tick(0.1, Some(1.0), 2.2));
        }
    }

    #[test]
    fn test_player_strikes_follow_key_presses() {
        let combat = PlayerCombat::new();
        let mut input = PlayerInput::new();
        assert!(combat.poll(&input).is_empty());

        input.press(Action::StrikeThrow);
        input.press(Action::StrikePush);
        assert_eq!(combat.poll(&input), vec![AttackKind::Push, AttackKind::Throw]);

        input.end_frame(0.016);
        assert!(combat.poll(&input).is_empty());
    }

    #[test]
    fn test_fixed_choice_always_uses_that_clip() {
        let mut throws = AiCombat::new(0.0, 5).with_choice(AttackChoice::Throw);
        let mut pushes = AiCombat::new(0.0, 5).with_choice(AttackChoice::Push);
        for _ in 0..20 {
            assert_eq!(throws.tick(0.1, Some(1.0), 2.2), Some(AttackKind::Throw));
            assert_eq!(pushes.tick(0.1, Some(1.0), 2.2), Some(AttackKind::Push));
        }
    }
}
