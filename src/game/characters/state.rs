// Animation states and how each one behaves

/// The animation state a character is in. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimState {
    /// Standing still
    Idle,
    /// Walking on the ground
    Walk,
    /// Running on the ground
    Run,
    /// Airborne: rising, falling and landing frames
    Jump,
    /// Idle for long enough to sit down
    Rest,
    /// Throwing (looping on the ground, one-shot in the air)
    Throw,
    /// Pushing
    Push,
    /// Knocked back by a hit
    HitBack,
    /// Dazed after a knockback
    Stunned,
}

impl Default for AnimState {
    fn default() -> Self {
        Self::Idle
    }
}

impl AnimState {
    pub const ALL: [AnimState; 9] = [
        AnimState::Idle,
        AnimState::Walk,
        AnimState::Run,
        AnimState::Jump,
        AnimState::Rest,
        AnimState::Throw,
        AnimState::Push,
        AnimState::HitBack,
        AnimState::Stunned,
    ];

    /// Grounded locomotion states remembered across a jump
    pub fn is_ground_motion(&self) -> bool {
        matches!(self, Self::Idle | Self::Walk | Self::Run)
    }

    /// States where the character cannot steer itself
    pub fn is_incapacitated(&self) -> bool {
        matches!(self, Self::HitBack | Self::Stunned)
    }

    /// Check if the character can start a jump from this state
    pub fn can_jump(&self) -> bool {
        !matches!(self, Self::HitBack | Self::Stunned | Self::Push)
    }

    /// Check if the character can start an attack from this state
    pub fn can_attack(&self) -> bool {
        !self.is_incapacitated()
    }

    /// Sprite set name for this state
    pub fn animation_name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Walk => "walk",
            Self::Run => "run",
            Self::Jump => "jump",
            Self::Rest => "rest",
            Self::Throw => "throw",
            Self::Push => "push",
            Self::HitBack => "hit_back",
            Self::Stunned => "stunned",
        }
    }
}

/// How a Throw or Push clip plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipMode {
    /// Repeat while the caller keeps requesting it
    #[default]
    Loop,
    /// Airborne throw: play once, freeze on the last frame, then fall
    AirOnce,
    /// Grounded attack: play once, then return to the interrupted ground state
    Strike,
}

/// Which attack a combat trigger asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Push,
    Throw,
}

impl AttackKind {
    pub fn state(&self) -> AnimState {
        match self {
            Self::Push => AnimState::Push,
            Self::Throw => AnimState::Throw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(AnimState::default(), AnimState::Idle);
    }

    #[test]
    fn test_ground_motion_states() {
        assert!(AnimState::Idle.is_ground_motion());
        assert!(AnimState::Walk.is_ground_motion());
        assert!(AnimState::Run.is_ground_motion());
        assert!(!AnimState::Rest.is_ground_motion());
        assert!(!AnimState::Jump.is_ground_motion());
        assert!(!AnimState::Push.is_ground_motion());
    }

    #[test]
    fn test_incapacitated_states_block_actions() {
        for state in [AnimState::HitBack, AnimState::Stunned] {
            assert!(state.is_incapacitated());
            assert!(!state.can_jump());
            assert!(!state.can_attack());
        }
        assert!(AnimState::Run.can_jump());
        assert!(AnimState::Jump.can_attack());
    }

    #[test]
    fn test_animation_names_are_unique() {
        let mut names = std::collections::HashSet::new();
        for state in AnimState::ALL {
            assert!(names.insert(state.animation_name()));
        }
    }

    #[test]
    fn test_attack_kind_states() {
        assert_eq!(AttackKind::Push.state(), AnimState::Push);
        assert_eq!(AttackKind::Throw.state(), AnimState::Throw);
    }
}
