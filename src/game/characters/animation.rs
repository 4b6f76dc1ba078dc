// Character animation state machine
//
// Maps the active state plus elapsed time to the sprite frame that should be
// displayed. The renderer polls `shown_frame()`; nothing here touches sprites.

use log::{debug, trace};

use crate::common::Delay;

use super::config::SharedConfig;
use super::state::{AnimState, AttackKind, ClipMode};

/// The jump set is rise1, rise2, rise3, apex, fall, land
pub const JUMP_FRAME_COUNT: usize = 6;
const JUMP_APEX_FRAME: usize = 3;
const JUMP_FALL_FRAME: usize = 4;
const JUMP_LAND_FRAME: usize = 5;

/// Number of frames available for each sprite set. Zero means the set is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteFrames {
    pub idle: usize,
    pub walk: usize,
    pub run: usize,
    pub jump: usize,
    pub rest: usize,
    pub throw: usize,
    pub push: usize,
    pub hit_back: usize,
    pub stunned: usize,
}

impl Default for SpriteFrames {
    fn default() -> Self {
        Self::standard()
    }
}

impl SpriteFrames {
    /// Frame counts of the stock character sheet
    pub fn standard() -> Self {
        Self {
            idle: 4,
            walk: 6,
            run: 6,
            jump: JUMP_FRAME_COUNT,
            rest: 4,
            throw: 4,
            push: 4,
            hit_back: 3,
            stunned: 3,
        }
    }

    /// Override the frame count of one set
    pub fn with(mut self, state: AnimState, count: usize) -> Self {
        *self.count_mut(state) = count;
        self
    }

    pub fn count(&self, state: AnimState) -> usize {
        match state {
            AnimState::Idle => self.idle,
            AnimState::Walk => self.walk,
            AnimState::Run => self.run,
            AnimState::Jump => self.jump,
            AnimState::Rest => self.rest,
            AnimState::Throw => self.throw,
            AnimState::Push => self.push,
            AnimState::HitBack => self.hit_back,
            AnimState::Stunned => self.stunned,
        }
    }

    fn count_mut(&mut self, state: AnimState) -> &mut usize {
        match state {
            AnimState::Idle => &mut self.idle,
            AnimState::Walk => &mut self.walk,
            AnimState::Run => &mut self.run,
            AnimState::Jump => &mut self.jump,
            AnimState::Rest => &mut self.rest,
            AnimState::Throw => &mut self.throw,
            AnimState::Push => &mut self.push,
            AnimState::HitBack => &mut self.hit_back,
            AnimState::Stunned => &mut self.stunned,
        }
    }
}

/// The frame currently enabled for display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRef {
    /// Sprite set the frame belongs to
    pub set: AnimState,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClipProgress {
    Running,
    Completed,
}

/// Frame-based animation state machine for one character
#[derive(Debug)]
pub struct AnimationStates {
    config: SharedConfig,
    frames: SpriteFrames,

    state: AnimState,
    /// Ground state to resume after landing
    prev_grounded_state: AnimState,
    /// Ground state to resume after a strike clip
    strike_return: AnimState,
    clip_mode: ClipMode,

    current_frame: usize,
    frame_timer: f32,
    idle_timer: f32,

    grounded: bool,
    /// None until a physics body reports its velocity
    velocity_y: Option<f32>,
    prevent_rest: bool,

    landing: Option<Delay>,
    stun_recovery: Option<Delay>,
    air_throw_done: bool,
    hold_complete: bool,

    shown: Option<FrameRef>,
    flip_horizontal: bool,
}

impl AnimationStates {
    pub fn new(config: SharedConfig, frames: SpriteFrames) -> Self {
        let mut states = Self {
            config,
            frames,
            state: AnimState::Idle,
            prev_grounded_state: AnimState::Idle,
            strike_return: AnimState::Idle,
            clip_mode: ClipMode::Loop,
            current_frame: 0,
            frame_timer: 0.0,
            idle_timer: 0.0,
            grounded: true,
            velocity_y: None,
            prevent_rest: false,
            landing: None,
            stun_recovery: None,
            air_throw_done: false,
            hold_complete: false,
            shown: None,
            flip_horizontal: false,
        };
        states.show(AnimState::Idle, 0);
        states
    }

    // ---------- Queries ----------

    pub fn state(&self) -> AnimState {
        self.state
    }

    pub fn current_frame(&self) -> usize {
        self.current_frame
    }

    pub fn frame_timer(&self) -> f32 {
        self.frame_timer
    }

    pub fn idle_timer(&self) -> f32 {
        self.idle_timer
    }

    pub fn prev_grounded_state(&self) -> AnimState {
        self.prev_grounded_state
    }

    pub fn clip_mode(&self) -> ClipMode {
        self.clip_mode
    }

    /// Frame the renderer should display, if the active set has one
    pub fn shown_frame(&self) -> Option<FrameRef> {
        self.shown
    }

    pub fn is_throwing(&self) -> bool {
        self.state == AnimState::Throw
    }

    /// Whether the land frame is showing and the return to the ground state is pending
    pub fn is_landing(&self) -> bool {
        self.landing.is_some()
    }

    /// States that locomotion requests must not interrupt
    pub fn is_locked(&self) -> bool {
        match self.state {
            AnimState::Jump | AnimState::HitBack | AnimState::Stunned => true,
            AnimState::Throw | AnimState::Push => self.clip_mode != ClipMode::Loop,
            _ => false,
        }
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_flipped_horizontal(&self) -> bool {
        self.flip_horizontal
    }

    // ---------- Inputs from the owning character ----------

    /// Report grounding. Touching down during Jump starts the landing sequence.
    pub fn set_grounded(&mut self, grounded: bool) {
        self.grounded = grounded;
        if grounded && self.state == AnimState::Jump && self.landing.is_none() {
            self.show(AnimState::Jump, JUMP_LAND_FRAME);
            self.landing = Some(Delay::new(self.config.delays.landing_delay));
        }
    }

    /// Report the body's vertical velocity
    pub fn set_velocity_y(&mut self, velocity_y: f32) {
        self.velocity_y = Some(velocity_y);
    }

    /// Keep Idle from drifting into Rest while set
    pub fn set_prevent_rest(&mut self, prevent: bool) {
        self.prevent_rest = prevent;
    }

    pub fn set_flip_horizontal(&mut self, flip: bool) {
        self.flip_horizontal = flip;
    }

    // ---------- State entry ----------

    /// Transition to `new_state` with a looping clip. Same-state requests are ignored.
    pub fn change_state(&mut self, new_state: AnimState) -> bool {
        self.change_state_with(new_state, ClipMode::Loop)
    }

    /// Transition with an explicit clip mode (meaningful for Throw and Push)
    pub fn change_state_with(&mut self, new_state: AnimState, mode: ClipMode) -> bool {
        if new_state == self.state {
            return false;
        }

        if new_state == AnimState::Jump {
            let air_throw = self.state == AnimState::Throw && self.clip_mode == ClipMode::AirOnce;
            if self.state.is_ground_motion() {
                self.prev_grounded_state = self.state;
            } else if !air_throw {
                // Landing from anything else settles into Idle
                self.prev_grounded_state = AnimState::Idle;
            }
        }
        if mode == ClipMode::Strike {
            self.strike_return = if self.state.is_ground_motion() {
                self.state
            } else {
                AnimState::Idle
            };
        }

        // Pending delays belong to the state being left
        if let Some(mut landing) = self.landing.take() {
            landing.cancel();
        }
        if let Some(mut recovery) = self.stun_recovery.take() {
            recovery.cancel();
        }

        debug!("animation {:?} -> {:?} ({:?})", self.state, new_state, mode);

        self.state = new_state;
        self.clip_mode = match (new_state, mode) {
            (AnimState::Throw, mode) => mode,
            (AnimState::Push, ClipMode::Strike) => ClipMode::Strike,
            _ => ClipMode::Loop,
        };
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.idle_timer = 0.0;
        self.air_throw_done = false;
        self.hold_complete = false;

        self.show(new_state, 0);
        true
    }

    /// Enter Jump, remembering the ground state for the landing.
    ///
    /// Already in Jump (double jump, or jumping again during the land frame):
    /// drop the pending landing and restart the rise.
    pub fn start_jump(&mut self) {
        if self.change_state(AnimState::Jump) {
            return;
        }
        if let Some(mut landing) = self.landing.take() {
            landing.cancel();
        }
        self.current_frame = 0;
        self.frame_timer = 0.0;
        self.show(AnimState::Jump, 0);
    }

    /// Enter Jump showing the fall frame (walked off a ledge)
    pub fn start_fall(&mut self) {
        if self.state == AnimState::Throw && self.clip_mode == ClipMode::AirOnce {
            return;
        }
        self.change_state(AnimState::Jump);
        self.show(AnimState::Jump, JUMP_FALL_FRAME);
    }

    /// Held throw: loops on the ground from Idle, plays once in the air from Jump
    pub fn hold_throw(&mut self) -> bool {
        if self.grounded && self.state == AnimState::Idle {
            self.change_state_with(AnimState::Throw, ClipMode::Loop)
        } else if !self.grounded && self.state == AnimState::Jump {
            self.change_state_with(AnimState::Throw, ClipMode::AirOnce)
        } else {
            false
        }
    }

    /// One-shot attack clip from a combat trigger
    pub fn trigger_attack(&mut self, kind: AttackKind) -> bool {
        if !self.state.can_attack() {
            return false;
        }
        match kind {
            AttackKind::Throw if !self.grounded => {
                if self.state == AnimState::Jump {
                    self.change_state_with(AnimState::Throw, ClipMode::AirOnce)
                } else {
                    false
                }
            }
            AttackKind::Push if !self.grounded => false,
            _ => self.change_state_with(kind.state(), ClipMode::Strike),
        }
    }

    /// Force Idle, dropping any pending landing
    pub fn reset_from_stunned(&mut self) {
        if let Some(mut landing) = self.landing.take() {
            landing.cancel();
        }
        self.change_state(AnimState::Idle);
    }

    // ---------- Per-frame update ----------

    pub fn update(&mut self, dt: f32) {
        self.frame_timer += dt;
        self.advance_delays(dt);

        let rates = &self.config.rates;
        let (idle_rate, walk_rate, run_rate, rest_rate) = (rates.idle, rates.walk, rates.run, rates.rest);
        let (push_rate, hit_back_rate, stunned_rate) = (rates.push, rates.hit_back, rates.stunned);

        match self.state {
            AnimState::Idle => {
                self.idle_timer += dt;
                if self.prevent_rest {
                    self.idle_timer = 0.0;
                } else if self.idle_timer >= self.config.delays.rest_delay {
                    self.change_state(AnimState::Rest);
                    return;
                }
                self.animate_loop(AnimState::Idle, idle_rate);
            }
            AnimState::Walk => self.animate_loop(AnimState::Walk, walk_rate),
            AnimState::Run => self.animate_loop(AnimState::Run, run_rate),
            AnimState::Rest => {
                self.animate_once_then_hold(AnimState::Rest, rest_rate);
            }
            AnimState::Jump => self.handle_jump_cycle(),
            AnimState::Throw => self.handle_throw_cycle(),
            AnimState::Push => {
                if self.clip_mode == ClipMode::Strike {
                    self.play_strike(AnimState::Push, push_rate);
                } else {
                    self.animate_loop(AnimState::Push, push_rate);
                }
            }
            AnimState::HitBack => {
                if self.animate_once_then_callback(AnimState::HitBack, hit_back_rate)
                    == ClipProgress::Completed
                {
                    self.change_state(AnimState::Stunned);
                }
            }
            AnimState::Stunned => {
                if self.animate_once_then_hold(AnimState::Stunned, stunned_rate)
                    == ClipProgress::Completed
                {
                    self.stun_recovery = Some(Delay::new(self.config.delays.stunned_wait_time));
                }
            }
        }
    }

    fn advance_delays(&mut self, dt: f32) {
        if let Some(landing) = self.landing.as_mut() {
            if landing.tick(dt) {
                self.landing = None;
                let resume = match self.prev_grounded_state {
                    AnimState::Run => AnimState::Run,
                    AnimState::Walk => AnimState::Walk,
                    _ => AnimState::Idle,
                };
                self.change_state(resume);
            }
        }

        if let Some(recovery) = self.stun_recovery.as_mut() {
            if recovery.tick(dt) {
                self.stun_recovery = None;
                self.change_state(AnimState::Idle);
            }
        }
    }

    // ---------- Jump ----------

    fn handle_jump_cycle(&mut self) {
        if self.frames.jump != JUMP_FRAME_COUNT {
            trace!("jump set has {} frames, skipping", self.frames.jump);
            return;
        }
        let Some(velocity_y) = self.velocity_y else {
            return;
        };
        if self.grounded {
            // Landing sequence owns the display
            return;
        }

        if velocity_y > 0.0 {
            // Rising: rise1 → rise2 → rise3 → apex, then hold the apex
            if self.frame_timer >= self.config.rates.jump {
                self.frame_timer = 0.0;
                if self.current_frame < JUMP_APEX_FRAME {
                    self.current_frame += 1;
                }
                self.show(AnimState::Jump, self.current_frame);
            }
        } else {
            self.show(AnimState::Jump, JUMP_FALL_FRAME);
        }
    }

    // ---------- Throw ----------

    fn handle_throw_cycle(&mut self) {
        let rate = self.config.rates.throw;
        match self.clip_mode {
            ClipMode::AirOnce => {
                if !self.air_throw_done {
                    if self.animate_once_then_callback(AnimState::Throw, rate)
                        == ClipProgress::Completed
                    {
                        self.air_throw_done = true;
                        let last = self.frames.throw.saturating_sub(1);
                        self.show(AnimState::Throw, last);
                    }
                } else {
                    self.change_state(AnimState::Jump);
                    self.show(AnimState::Jump, JUMP_FALL_FRAME);
                }
            }
            ClipMode::Strike => self.play_strike(AnimState::Throw, rate),
            ClipMode::Loop => self.animate_loop(AnimState::Throw, rate),
        }
    }

    fn play_strike(&mut self, set: AnimState, rate: f32) {
        if self.animate_once_then_callback(set, rate) == ClipProgress::Completed {
            let resume = self.strike_return;
            self.change_state(resume);
        }
    }

    // ---------- Frame helpers ----------

    fn animate_loop(&mut self, set: AnimState, rate: f32) {
        let count = self.frames.count(set);
        if count == 0 {
            return;
        }
        if self.frame_timer >= rate {
            self.frame_timer = 0.0;
            self.current_frame = (self.current_frame + 1) % count;
            self.show(set, self.current_frame);
        }
    }

    /// Advance to the last frame and hold it; reports completion once
    fn animate_once_then_hold(&mut self, set: AnimState, rate: f32) -> ClipProgress {
        let count = self.frames.count(set);
        if count == 0 || self.frame_timer < rate {
            return ClipProgress::Running;
        }

        self.frame_timer = 0.0;
        let mut progress = ClipProgress::Running;
        if self.current_frame < count - 1 {
            self.current_frame += 1;
        } else if !self.hold_complete {
            self.hold_complete = true;
            progress = ClipProgress::Completed;
        }
        self.show(set, self.current_frame);
        progress
    }

    /// Advance past the last frame, clamp to it and report completion
    fn animate_once_then_callback(&mut self, set: AnimState, rate: f32) -> ClipProgress {
        let count = self.frames.count(set);
        if count == 0 || self.frame_timer < rate {
            return ClipProgress::Running;
        }

        self.frame_timer = 0.0;
        self.current_frame += 1;
        if self.current_frame >= count {
            self.current_frame = count - 1;
            self.show(set, self.current_frame);
            return ClipProgress::Completed;
        }
        self.show(set, self.current_frame);
        ClipProgress::Running
    }

    fn show(&mut self, set: AnimState, index: usize) {
        self.shown = (index < self.frames.count(set)).then_some(FrameRef { set, index });
    }
}
