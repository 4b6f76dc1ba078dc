// Movement tuning and ground sensing

use super::config::MovementConfig;

/// Upward speed above which ground hits are ignored (just jumped)
const RISING_THRESHOLD: f32 = 0.01;

/// Per-character speeds that replace the configuration's
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovementOverride {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub jump_force: f32,
}

/// Speeds and forces actually used by a character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveMovement {
    pub walk_speed: f32,
    pub run_speed: f32,
    pub push_speed: f32,
    pub air_speed: f32,
    pub walk_jump_force: f32,
    pub run_jump_force: f32,
    pub double_jump_force: f32,
    pub allow_double_jump: bool,
}

impl EffectiveMovement {
    /// Configuration speeds, with walk/run/jump replaced by the override if any
    pub fn resolve(config: &MovementConfig, movement_override: Option<&MovementOverride>) -> Self {
        let mut movement = Self {
            walk_speed: config.walk_speed,
            run_speed: config.run_speed,
            push_speed: config.push_speed,
            air_speed: config.air_control,
            walk_jump_force: config.walk_jump_force,
            run_jump_force: config.run_jump_force,
            double_jump_force: config.double_jump_force,
            allow_double_jump: config.allow_double_jump,
        };
        if let Some(custom) = movement_override {
            movement.walk_speed = custom.walk_speed;
            movement.run_speed = custom.run_speed;
            movement.walk_jump_force = custom.jump_force;
            movement.run_jump_force = custom.jump_force;
        }
        movement
    }

    pub fn ground_speed(&self, running: bool) -> f32 {
        if running {
            self.run_speed
        } else {
            self.walk_speed
        }
    }

    pub fn jump_force(&self, running: bool) -> f32 {
        if running {
            self.run_jump_force
        } else {
            self.walk_jump_force
        }
    }
}

/// Grounded flag with coyote time
#[derive(Debug, Clone)]
pub struct GroundSensor {
    grounded: bool,
    coyote_time: f32,
    coyote_remaining: f32,
}

impl GroundSensor {
    pub fn new(coyote_time: f32) -> Self {
        Self {
            grounded: false,
            coyote_time,
            coyote_remaining: 0.0,
        }
    }

    /// Feed one probe result. Returns true on the step the body lands.
    pub fn sense(&mut self, hit: bool, velocity_y: f32, dt: f32) -> bool {
        let was_grounded = self.grounded;
        self.grounded = hit && velocity_y <= RISING_THRESHOLD;

        if self.grounded {
            self.coyote_remaining = self.coyote_time;
        } else {
            self.coyote_remaining = (self.coyote_remaining - dt).max(0.0);
        }

        self.grounded && !was_grounded
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// On the ground or still inside the coyote window
    pub fn can_jump(&self) -> bool {
        self.grounded || self.coyote_remaining > 0.0
    }

    /// Spend the ground jump
    pub fn consume_jump(&mut self) {
        self.grounded = false;
        self.coyote_remaining = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_resolve_from_config() {
        let config = MovementConfig::default();
        let movement = EffectiveMovement::resolve(&config, None);
        assert_eq!(movement.ground_speed(false), 3.5);
        assert_eq!(movement.ground_speed(true), 6.5);
        assert_eq!(movement.jump_force(false), 11.0);
        assert_eq!(movement.jump_force(true), 14.0);
    }

    #[test]
    fn test_override_replaces_walk_run_jump() {
        let config = MovementConfig::default();
        let custom = MovementOverride {
            walk_speed: 2.0,
            run_speed: 4.0,
            jump_force: 9.0,
        };
        let movement = EffectiveMovement::resolve(&config, Some(&custom));
        assert_eq!(movement.ground_speed(false), 2.0);
        assert_eq!(movement.ground_speed(true), 4.0);
        assert_eq!(movement.jump_force(true), 9.0);
        assert_eq!(movement.push_speed, config.push_speed);
    }

    #[test]
    fn test_sensor_reports_landing_once() {
        let mut sensor = GroundSensor::new(0.1);
        assert!(sensor.sense(true, 0.0, DT));
        assert!(!sensor.sense(true, 0.0, DT));
        assert!(sensor.is_grounded());
    }

    #[test]
    fn test_rising_body_is_not_grounded() {
        let mut sensor = GroundSensor::new(0.1);
        assert!(!sensor.sense(true, 8.0, DT));
        assert!(!sensor.is_grounded());
    }

    #[test]
    fn test_coyote_window() {
        let mut sensor = GroundSensor::new(0.1);
        sensor.sense(true, 0.0, DT);

        // Walked off the ledge
        sensor.sense(false, -0.5, 0.05);
        assert!(!sensor.is_grounded());
        assert!(sensor.can_jump());

        sensor.sense(false, -1.0, 0.06);
        assert!(!sensor.can_jump());
    }

    #[test]
    fn test_consume_jump_closes_coyote() {
        let mut sensor = GroundSensor::new(0.1);
        sensor.sense(true, 0.0, DT);
        sensor.consume_jump();
        assert!(!sensor.can_jump());
    }
}
