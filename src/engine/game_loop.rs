//! Frame pacing for the simulation
//!
//! Characters run two phases: a per-frame `update` with the real frame time
//! and a physics `fixed_update` at a constant rate. `GameLoop` turns wall-clock
//! frame times into the number of fixed steps owed this frame.
use std::collections::VecDeque;
use std::time::{Duration, Instant};

use log::{info, warn};

/// Physics rate (60 steps per second)
pub const FIXED_TIMESTEP: f32 = 1.0 / 60.0;
const FIXED_TIMESTEP_DURATION: Duration = Duration::from_micros(16_667);

/// Cap on fixed steps per frame after a hitch
const MAX_FIXED_STEPS: u32 = 5;

/// Longest frame time fed to per-frame updates (seconds)
const MAX_FRAME_DELTA: f32 = 0.1;

const FPS_WINDOW_SIZE: usize = 60;

/// What the caller should run this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Seconds for per-frame updates (0 while paused)
    pub delta: f32,
    /// Number of fixed steps to run
    pub fixed_steps: u32,
}

pub struct GameLoop {
    accumulator: Duration,
    last_frame_time: Instant,
    paused: bool,
    frame_times: VecDeque<Duration>,
    frame_count: u64,
    fixed_step_count: u64,
    current_fps: f32,
}

impl GameLoop {
    pub fn new() -> Self {
        Self {
            accumulator: Duration::ZERO,
            last_frame_time: Instant::now(),
            paused: false,
            frame_times: VecDeque::with_capacity(FPS_WINDOW_SIZE),
            frame_count: 0,
            fixed_step_count: 0,
            current_fps: 0.0,
        }
    }

    /// Measure the wall-clock time since the last frame and advance by it
    pub fn begin_frame(&mut self) -> FrameTiming {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.advance(frame_time)
    }

    /// Advance by an explicit frame time
    pub fn advance(&mut self, frame_time: Duration) -> FrameTiming {
        self.frame_count += 1;

        self.frame_times.push_back(frame_time);
        if self.frame_times.len() > FPS_WINDOW_SIZE {
            self.frame_times.pop_front();
        }
        if self.frame_count % 10 == 0 {
            self.update_fps();
        }

        if self.paused {
            return FrameTiming {
                delta: 0.0,
                fixed_steps: 0,
            };
        }

        self.accumulator += frame_time;

        let mut steps = 0;
        while self.accumulator >= FIXED_TIMESTEP_DURATION && steps < MAX_FIXED_STEPS {
            self.accumulator -= FIXED_TIMESTEP_DURATION;
            steps += 1;
        }

        // Drop the backlog instead of catching up over several frames
        if self.accumulator >= FIXED_TIMESTEP_DURATION {
            warn!(
                "frame took {:.1} ms, dropping {:.1} ms of simulation",
                frame_time.as_secs_f32() * 1000.0,
                self.accumulator.as_secs_f32() * 1000.0
            );
            self.accumulator = Duration::ZERO;
        }

        self.fixed_step_count += u64::from(steps);
        FrameTiming {
            delta: frame_time.as_secs_f32().min(MAX_FRAME_DELTA),
            fixed_steps: steps,
        }
    }

    pub fn fixed_timestep(&self) -> f32 {
        FIXED_TIMESTEP
    }

    /// Fraction of a fixed step left in the accumulator
    pub fn alpha(&self) -> f32 {
        self.accumulator.as_secs_f32() / FIXED_TIMESTEP
    }

    pub fn fps(&self) -> f32 {
        self.current_fps
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    pub fn fixed_step_count(&self) -> u64 {
        self.fixed_step_count
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        if !self.paused {
            self.paused = true;
            info!("paused");
        }
    }

    pub fn resume(&mut self) {
        if self.paused {
            self.paused = false;
            self.accumulator = Duration::ZERO;
            info!("resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    fn update_fps(&mut self) {
        let total: Duration = self.frame_times.iter().sum();
        let count = self.frame_times.len() as u32;
        if count == 0 || total.is_zero() {
            self.current_fps = 0.0;
            return;
        }
        self.current_fps = count as f32 / total.as_secs_f32();
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::new()
    }
}
