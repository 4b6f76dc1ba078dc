// Cancellable one-shot delays advanced by elapsed time

/// A one-shot delay that fires once its duration has elapsed.
///
/// Replaces suspended coroutines: the owner advances it every tick with
/// [`Delay::tick`] and drops or cancels it when the state that scheduled it
/// is left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Delay {
    remaining: f32,
    cancelled: bool,
}

impl Delay {
    /// Schedule a delay of `seconds` (negative values fire on the next tick)
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            cancelled: false,
        }
    }

    /// Advance by `dt`. Returns true exactly on the tick the delay fires.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.cancelled {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            // Fire only once
            self.cancelled = true;
            return true;
        }
        false
    }

    /// Stop the delay from ever firing
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether the delay can still fire
    pub fn is_pending(&self) -> bool {
        !self.cancelled
    }

    /// Seconds left before firing
    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}

/// Countdown used for cooldowns: ready once it reaches zero, re-armed explicitly
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Cooldown {
    remaining: f32,
}

impl Cooldown {
    pub fn new() -> Self {
        Self { remaining: 0.0 }
    }

    /// Count down by `dt`
    pub fn tick(&mut self, dt: f32) {
        self.remaining -= dt;
    }

    pub fn is_ready(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart the countdown
    pub fn trigger(&mut self, duration: f32) {
        self.remaining = duration;
    }

    pub fn remaining(&self) -> f32 {
        self.remaining.max(0.0)
    }
}
