// AI behavior state machine: patrol, chase and attack-hold
//
// The brain is re-selected from the distance to the target every physics
// step, so it can jump between any two behaviors in a single tick.

use glam::Vec2;
use log::debug;

use crate::common::math::{move_towards, sign};

use super::config::AiConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Brain {
    Idle,
    Patrol,
    Chase,
    AttackHold,
}

/// What the brain wants the body to do this step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AiSteering {
    pub velocity_x: f32,
    /// Direction to face; None keeps the current facing
    pub facing: Option<f32>,
    /// Running (Run animation) rather than walking
    pub running: bool,
    /// Keep Idle from drifting into Rest
    pub prevent_rest: bool,
}

/// Body state the brain reads each step
#[derive(Debug, Clone, Copy)]
pub struct AiSenses {
    pub position: Vec2,
    pub velocity_x: f32,
    pub target: Option<Vec2>,
    pub walk_speed: f32,
    pub run_speed: f32,
}

#[derive(Debug)]
pub struct CharacterAi {
    brain: Brain,
    waypoints: Vec<Vec2>,
    patrol_index: usize,
    /// Time spent standing at the current waypoint
    patrol_wait_timer: f32,
}

impl CharacterAi {
    pub fn new(waypoints: Vec<Vec2>) -> Self {
        let mut ai = Self {
            brain: Brain::Idle,
            waypoints,
            patrol_index: 0,
            patrol_wait_timer: 0.0,
        };
        ai.brain = ai.fallback();
        ai
    }

    pub fn brain(&self) -> Brain {
        self.brain
    }

    pub fn patrol_index(&self) -> usize {
        self.patrol_index
    }

    pub fn waypoints(&self) -> &[Vec2] {
        &self.waypoints
    }

    /// Patrol needs at least two waypoints to go between
    fn fallback(&self) -> Brain {
        if self.waypoints.len() > 1 {
            Brain::Patrol
        } else {
            Brain::Idle
        }
    }

    /// Pick the brain for this distance.
    ///
    /// While holding, the character keeps holding up to `attack_range +
    /// attack_hold_buffer` so it does not flicker at the boundary. Between the
    /// chase and give-up ranges the current brain is kept.
    fn select(&self, distance: f32, config: &AiConfig) -> Brain {
        if self.brain == Brain::AttackHold {
            if distance >= config.give_up_range {
                return self.fallback();
            }
            if distance > config.attack_range + config.attack_hold_buffer {
                return Brain::Chase;
            }
            return Brain::AttackHold;
        }

        if distance <= config.attack_range {
            Brain::AttackHold
        } else if distance <= config.chase_range {
            Brain::Chase
        } else if distance >= config.give_up_range {
            self.fallback()
        } else {
            self.brain
        }
    }

    /// Run one physics step of the brain
    pub fn fixed_update(&mut self, senses: &AiSenses, config: &AiConfig, dt: f32) -> AiSteering {
        if let Some(target) = senses.target {
            let next = self.select(senses.position.distance(target), config);
            if next != self.brain {
                debug!("ai brain {:?} -> {:?}", self.brain, next);
                self.brain = next;
                self.patrol_wait_timer = 0.0;
            }
        }

        match (self.brain, senses.target) {
            (Brain::Patrol, _) => self.patrol(senses, config, dt),
            (Brain::Chase, Some(target)) => Self::chase(senses, target),
            (Brain::AttackHold, Some(target)) => Self::attack_hold(senses, target, config, dt),
            _ => Self::idle(),
        }
    }

    fn idle() -> AiSteering {
        AiSteering {
            velocity_x: 0.0,
            facing: None,
            running: false,
            prevent_rest: false,
        }
    }

    fn patrol(&mut self, senses: &AiSenses, config: &AiConfig, dt: f32) -> AiSteering {
        let Some(waypoint) = self.waypoints.get(self.patrol_index).copied() else {
            return Self::idle();
        };

        let dx = waypoint.x - senses.position.x;
        let dir = sign(dx);
        let arrived = dx.abs() <= config.waypoint_snap_distance;

        if config.patrol_wait > 0.0 {
            // Stand at the waypoint until the wait is over
            if arrived || self.patrol_wait_timer > 0.0 {
                self.patrol_wait_timer += dt;
                if self.patrol_wait_timer >= config.patrol_wait {
                    self.patrol_index = (self.patrol_index + 1) % self.waypoints.len();
                    self.patrol_wait_timer = 0.0;
                }
                return Self::idle();
            }
        } else if arrived {
            self.patrol_index = (self.patrol_index + 1) % self.waypoints.len();
        }

        AiSteering {
            velocity_x: dir * senses.walk_speed,
            facing: Some(dir),
            running: false,
            prevent_rest: false,
        }
    }

    fn chase(senses: &AiSenses, target: Vec2) -> AiSteering {
        let dir = sign(target.x - senses.position.x);
        AiSteering {
            velocity_x: dir * senses.run_speed,
            facing: Some(dir),
            running: true,
            prevent_rest: false,
        }
    }

    fn attack_hold(senses: &AiSenses, target: Vec2, config: &AiConfig, dt: f32) -> AiSteering {
        AiSteering {
            velocity_x: move_towards(senses.velocity_x, 0.0, config.hold_brake * dt),
            facing: Some(sign(target.x - senses.position.x)),
            running: false,
            prevent_rest: true,
        }
    }
}
