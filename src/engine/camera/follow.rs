// Smoothed camera follow with look-ahead, run zoom and landing shake

use glam::Vec2;
use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::common::math::{lerp, smooth_damp_vec2};

use super::view::Camera;

/// Vertical speed below which the target counts as stopped
const STOPPED_EPSILON: f32 = 0.01;
/// Falling faster than this on the previous frame counts as a landing
const LANDING_VELOCITY: f32 = -0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraFollowConfig {
    /// Inverse of the SmoothDamp time
    pub follow_speed: f32,
    pub follow_offset: [f32; 2],
    /// Vertical target changes smaller than this are ignored
    pub vertical_dead_zone: f32,
    pub look_ahead_factor: f32,
    pub look_ahead_speed: f32,
    pub default_zoom: f32,
    pub run_zoom_out: f32,
    pub zoom_lerp_speed: f32,
    /// Horizontal speed above which the camera zooms out
    pub run_zoom_threshold: f32,
    pub small_landing_shake: f32,
    pub big_landing_shake: f32,
    /// Landing speed above which the big shake is used
    pub fall_threshold: f32,
    pub shake_duration: f32,
}

impl Default for CameraFollowConfig {
    fn default() -> Self {
        Self {
            follow_speed: 5.0,
            follow_offset: [2.0, 1.0],
            vertical_dead_zone: 0.5,
            look_ahead_factor: 2.0,
            look_ahead_speed: 3.0,
            default_zoom: 5.0,
            run_zoom_out: 6.0,
            zoom_lerp_speed: 2.0,
            run_zoom_threshold: 2.0,
            small_landing_shake: 0.2,
            big_landing_shake: 0.5,
            fall_threshold: 8.0,
            shake_duration: 0.2,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Shake {
    remaining: f32,
    magnitude: f32,
}

/// Drives a [`Camera`] after characters have moved
#[derive(Debug)]
pub struct CameraFollow {
    config: CameraFollowConfig,
    /// Camera position without shake
    anchor: Vec2,
    velocity: Vec2,
    look_ahead: f32,
    last_velocity_y: f32,
    shake: Option<Shake>,
    rng: ChaCha8Rng,
}

impl CameraFollow {
    pub fn new(config: CameraFollowConfig, start: Vec2, seed: u64) -> Self {
        Self {
            config,
            anchor: start,
            velocity: Vec2::ZERO,
            look_ahead: 0.0,
            last_velocity_y: 0.0,
            shake: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &CameraFollowConfig {
        &self.config
    }

    pub fn is_shaking(&self) -> bool {
        self.shake.is_some()
    }

    pub fn anchor(&self) -> Vec2 {
        self.anchor
    }

    /// Move the camera toward the target.
    ///
    /// `target_velocity` is optional: without it look-ahead decays to zero and
    /// zoom and landing shake are skipped.
    pub fn late_update(
        &mut self,
        camera: &mut Camera,
        target: Vec2,
        target_velocity: Option<Vec2>,
        dt: f32,
    ) {
        let offset = Vec2::from(self.config.follow_offset);
        let mut goal = target + offset;

        let vx = target_velocity.map_or(0.0, |v| v.x);
        let t = (dt * self.config.look_ahead_speed).clamp(0.0, 1.0);
        self.look_ahead = lerp(self.look_ahead, vx * self.config.look_ahead_factor, t);
        goal.x += self.look_ahead;

        if (goal.y - self.anchor.y).abs() < self.config.vertical_dead_zone {
            goal.y = self.anchor.y;
        }

        let smooth_time = 1.0 / self.config.follow_speed.max(f32::EPSILON);
        self.anchor = smooth_damp_vec2(self.anchor, goal, &mut self.velocity, smooth_time, dt);

        if let Some(velocity) = target_velocity {
            let zoom = if velocity.x.abs() > self.config.run_zoom_threshold {
                self.config.run_zoom_out
            } else {
                self.config.default_zoom
            };
            let t = (dt * self.config.zoom_lerp_speed).clamp(0.0, 1.0);
            camera.set_size(lerp(camera.size(), zoom, t));

            self.detect_landing(velocity.y);
        }

        let shake_offset = self.advance_shake(dt);
        camera.set_position(self.anchor + shake_offset);
    }

    fn detect_landing(&mut self, velocity_y: f32) {
        let landed = velocity_y.abs() < STOPPED_EPSILON && self.last_velocity_y < LANDING_VELOCITY;
        if landed && self.shake.is_none() {
            let magnitude = if self.last_velocity_y.abs() > self.config.fall_threshold {
                self.config.big_landing_shake
            } else {
                self.config.small_landing_shake
            };
            debug!("landing shake {:.2} (fell at {:.2})", magnitude, self.last_velocity_y);
            self.shake = Some(Shake {
                remaining: self.config.shake_duration,
                magnitude,
            });
        }
        self.last_velocity_y = velocity_y;
    }

    fn advance_shake(&mut self, dt: f32) -> Vec2 {
        let Some(shake) = self.shake.as_mut() else {
            return Vec2::ZERO;
        };
        if shake.remaining <= 0.0 {
            self.shake = None;
            return Vec2::ZERO;
        }

        shake.remaining -= dt;
        let magnitude = shake.magnitude;
        Vec2::new(
            self.rng.gen_range(-1.0..=1.0) * magnitude,
            self.rng.gen_range(-1.0..=1.0) * magnitude,
        )
    }
}
