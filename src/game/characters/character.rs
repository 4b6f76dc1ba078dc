// Character entity
//
// Ties a shared configuration, its own stats, an animator, a controller and a
// physics body together. The owner drives it with `update` once per frame and
// `fixed_update` once per physics step.

use glam::Vec2;
use log::{debug, info, trace};

use crate::common::math::sign;
use crate::engine::input::PlayerInput;
use crate::engine::physics::{presets, GroundProbe, PhysicsWorld, RigidBodyHandle};

use super::ai::AiSenses;
use super::animation::{AnimationStates, SpriteFrames};
use super::config::SharedConfig;
use super::controller::{AiController, Controller, PlayerController};
use super::movement::{EffectiveMovement, GroundSensor, MovementOverride};
use super::state::AnimState;
use super::stats::CharacterStats;

/// Unique identifier for a character
pub type CharacterId = u32;

/// Horizontal speed below which a grounded AI counts as standing
const MOVING_THRESHOLD: f32 = 0.05;

#[derive(Debug)]
pub struct Character {
    id: CharacterId,
    name: String,
    config: SharedConfig,
    stats: CharacterStats,
    body: RigidBodyHandle,
    animation: AnimationStates,
    controller: Controller,
    ground: GroundSensor,
    movement: EffectiveMovement,

    /// 1 = right, -1 = left
    facing: f32,
    can_double_jump: bool,

    // Body state as of the last physics step
    position: Vec2,
    velocity: Vec2,
}

impl Character {
    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn stats(&self) -> &CharacterStats {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut CharacterStats {
        &mut self.stats
    }

    pub fn body(&self) -> RigidBodyHandle {
        self.body
    }

    pub fn animation(&self) -> &AnimationStates {
        &self.animation
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn is_player(&self) -> bool {
        self.controller.is_player()
    }

    pub fn state(&self) -> AnimState {
        self.animation.state()
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    pub fn facing(&self) -> f32 {
        self.facing
    }

    pub fn is_grounded(&self) -> bool {
        self.ground.is_grounded()
    }

    pub fn movement(&self) -> &EffectiveMovement {
        &self.movement
    }

    /// Apply damage and play the knockback. Returns true if the hit was fatal.
    pub fn take_hit(&mut self, damage: i32) -> bool {
        let died = self.stats.take_damage(damage);
        self.animation.change_state(AnimState::HitBack);
        if died {
            info!("{} was defeated", self.name);
        }
        died
    }

    /// Per-frame phase: read intent, fire combat triggers, advance the animation.
    ///
    /// `input` is only read by player-controlled characters, `target` only by AI.
    pub fn update(&mut self, dt: f32, input: Option<&mut PlayerInput>, target: Option<Vec2>) {
        let grounded = self.ground.is_grounded();

        match &mut self.controller {
            Controller::Player(player) => {
                if let Some(input) = input {
                    let can_jump = self.animation.state().can_jump()
                        && (self.ground.can_jump() || self.can_double_jump);
                    for attack in player.read_input(input, can_jump) {
                        self.animation.trigger_attack(attack);
                    }
                }
                if player.hit_back_pressed {
                    self.animation.change_state(AnimState::HitBack);
                }
                drive_player_animation(&mut self.animation, player, grounded);
            }
            Controller::Ai(ai) => {
                let distance = target.map(|target| self.position.distance(target));
                if let Some(attack) = ai.combat.tick(dt, distance, self.config.ai.attack_range) {
                    debug!("{} attacks with {:?}", self.name, attack);
                    self.animation.trigger_attack(attack);
                }
                drive_ai_animation(&mut self.animation, ai, self.velocity.x, grounded);
            }
        }

        // Walked off a ledge
        let state = self.animation.state();
        if !grounded
            && self.velocity.y < 0.0
            && !matches!(state, AnimState::Jump | AnimState::HitBack | AnimState::Stunned)
        {
            self.animation.start_fall();
        }

        self.animation.set_flip_horizontal(self.facing < 0.0);
        self.animation.update(dt);
    }

    /// Physics phase: probe the ground, steer, and write the body velocity
    pub fn fixed_update(&mut self, dt: f32, physics: &mut PhysicsWorld, target: Option<Vec2>) {
        let (Some(position), Some(velocity)) = (
            physics.body_position(self.body),
            physics.body_velocity(self.body),
        ) else {
            trace!("{} has no body, skipping step", self.name);
            return;
        };
        self.position = position;

        let probe = GroundProbe {
            body: self.body,
            half_width: self.config.body.width / 2.0,
            half_height: self.config.body.height / 2.0,
            distance: self.config.ground.check_distance,
            mask: self.config.ground.ground_mask,
        };
        let hit = physics.probe_ground(&probe).is_some();
        if self.ground.sense(hit, velocity.y, dt) {
            self.can_double_jump = false;
        }
        let grounded = self.ground.is_grounded();

        let state = self.animation.state();
        let mut next = velocity;
        let mut jumped = false;

        match &mut self.controller {
            Controller::Player(player) => {
                next.x = if state.is_incapacitated() {
                    0.0
                } else if !player.has_move_input() {
                    // Keep momentum in the air
                    if grounded {
                        0.0
                    } else {
                        velocity.x
                    }
                } else if state == AnimState::Push {
                    player.axis * self.movement.push_speed
                } else if grounded {
                    player.axis * self.movement.ground_speed(player.run_held)
                } else {
                    player.axis * self.movement.air_speed
                };

                if player.has_move_input() && !state.is_incapacitated() {
                    self.facing = sign(player.axis);
                }

                if std::mem::take(&mut player.jump_requested) && state.can_jump() {
                    if self.ground.can_jump() {
                        next.y = self.movement.jump_force(player.run_held);
                        self.ground.consume_jump();
                        self.can_double_jump = self.movement.allow_double_jump;
                        jumped = true;
                    } else if self.can_double_jump {
                        next.y = self.movement.double_jump_force;
                        self.can_double_jump = false;
                        jumped = true;
                    }
                }
            }
            Controller::Ai(ai) => {
                let senses = AiSenses {
                    position,
                    velocity_x: velocity.x,
                    target,
                    walk_speed: self.movement.walk_speed,
                    run_speed: self.movement.run_speed,
                };
                ai.steering = ai.brain.fixed_update(&senses, &self.config.ai, dt);
                next.x = if state.is_incapacitated() {
                    0.0
                } else {
                    ai.steering.velocity_x
                };
                if let Some(direction) = ai.steering.facing {
                    self.facing = direction;
                }
            }
        }

        physics.set_body_velocity(self.body, next);
        self.velocity = next;

        if jumped {
            debug!("{} jumps ({:.1})", self.name, next.y);
            self.animation.set_grounded(false);
            self.animation.start_jump();
        } else {
            self.animation.set_grounded(grounded);
        }
        self.animation.set_velocity_y(next.y);
    }
}

/// Map keyboard intent onto ground animations
fn drive_player_animation(animation: &mut AnimationStates, player: &PlayerController, grounded: bool) {
    if animation.is_locked() {
        return;
    }

    if !grounded {
        if player.throw_pressed {
            animation.hold_throw();
        }
        return;
    }

    let state = animation.state();
    if player.push_held {
        animation.change_state(AnimState::Push);
    } else if player.throw_held && !player.has_move_input() {
        if state != AnimState::Throw {
            animation.change_state(AnimState::Idle);
            animation.hold_throw();
        }
    } else if player.has_move_input() {
        animation.change_state(if player.run_held {
            AnimState::Run
        } else {
            AnimState::Walk
        });
    } else if state != AnimState::Rest {
        animation.change_state(AnimState::Idle);
    }
}

/// Map AI steering onto ground animations
fn drive_ai_animation(animation: &mut AnimationStates, ai: &AiController, velocity_x: f32, grounded: bool) {
    animation.set_prevent_rest(ai.steering.prevent_rest);
    if animation.is_locked() || !grounded {
        return;
    }

    if velocity_x.abs() > MOVING_THRESHOLD {
        animation.change_state(if ai.steering.running {
            AnimState::Run
        } else {
            AnimState::Walk
        });
    } else if animation.state() != AnimState::Rest {
        animation.change_state(AnimState::Idle);
    }
}

/// Builds a character and its physics body from a configuration
#[derive(Debug, Clone)]
pub struct CharacterBuilder {
    config: SharedConfig,
    name: Option<String>,
    stats: Option<CharacterStats>,
    frames: SpriteFrames,
    waypoints: Vec<Vec2>,
    spawn: Vec2,
    seed: Option<u64>,
    movement_override: Option<MovementOverride>,
}

impl CharacterBuilder {
    pub fn new(config: SharedConfig) -> Self {
        Self {
            config,
            name: None,
            stats: None,
            frames: SpriteFrames::standard(),
            waypoints: Vec::new(),
            spawn: Vec2::ZERO,
            seed: None,
            movement_override: None,
        }
    }

    /// Display name (defaults to the configuration's)
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Starting stats (defaults to player or enemy presets)
    pub fn stats(mut self, stats: CharacterStats) -> Self {
        self.stats = Some(stats);
        self
    }

    pub fn frames(mut self, frames: SpriteFrames) -> Self {
        self.frames = frames;
        self
    }

    /// Patrol route for AI characters
    pub fn waypoints(mut self, waypoints: Vec<Vec2>) -> Self {
        self.waypoints = waypoints;
        self
    }

    pub fn spawn_at(mut self, position: Vec2) -> Self {
        self.spawn = position;
        self
    }

    /// Seed of the AI attack choice (defaults to the character id)
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Use these speeds instead of the configuration's
    pub fn movement_override(mut self, movement: MovementOverride) -> Self {
        self.movement_override = Some(movement);
        self
    }

    pub fn build(self, id: CharacterId, physics: &mut PhysicsWorld) -> Character {
        let config = self.config;

        let body = physics.add_rigid_body(presets::character_body(
            self.spawn.x,
            self.spawn.y,
            config.movement.gravity_scale,
        ));
        physics.add_collider(
            presets::character_collider(config.body.width, config.body.height),
            body,
        );

        let name = self.name.unwrap_or_else(|| config.display_name.clone());
        let stats = self
            .stats
            .unwrap_or_else(|| CharacterStats::for_player(config.is_player()));
        let controller = Controller::for_config(
            &config,
            self.waypoints,
            self.seed.unwrap_or(u64::from(id)),
        );

        info!(
            "spawned {} #{} ({:?}) at ({:.1}, {:.1})",
            name, id, config.control, self.spawn.x, self.spawn.y
        );

        Character {
            id,
            name,
            stats,
            body,
            animation: AnimationStates::new(config.clone(), self.frames),
            controller,
            ground: GroundSensor::new(config.ground.coyote_time),
            movement: EffectiveMovement::resolve(&config.movement, self.movement_override.as_ref()),
            facing: 1.0,
            can_double_jump: false,
            position: self.spawn,
            velocity: Vec2::ZERO,
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Action;
    use crate::game::characters::ai::Brain;
    use crate::game::characters::config::CharacterConfig;

    const DT: f32 = 1.0 / 60.0;

    /// Ground slab with its top surface at y = 0
    fn world_with_ground() -> PhysicsWorld {
        let mut world = PhysicsWorld::new();
        let ground = world.add_rigid_body(presets::ground_body(0.0, -0.5));
        world.add_collider(presets::ground_collider(100.0, 1.0), ground);
        world.step();
        world
    }

    fn spawn_player(world: &mut PhysicsWorld, at: Vec2) -> Character {
        CharacterBuilder::new(CharacterConfig::default().into_shared())
            .spawn_at(at)
            .build(0, world)
    }

    fn run_frames(
        character: &mut Character,
        world: &mut PhysicsWorld,
        input: &mut PlayerInput,
        target: Option<Vec2>,
        frames: usize,
    ) {
        for _ in 0..frames {
            character.update(DT, Some(&mut *input), target);
            character.fixed_update(DT, world, target);
            world.step();
            input.end_frame(DT);
        }
    }

    #[test]
    fn test_builder_picks_controller_and_stats() {
        let mut world = PhysicsWorld::new();
        let player = spawn_player(&mut world, Vec2::ZERO);
        assert!(player.is_player());
        assert!(player.stats().is_player);
        assert_eq!(player.name(), "Default");

        let enemy = CharacterBuilder::new(CharacterConfig::enemy().into_shared())
            .name("Grunt")
            .build(1, &mut world);
        assert!(!enemy.is_player());
        assert!(!enemy.stats().is_player);
        assert_eq!(enemy.name(), "Grunt");
    }

    #[test]
    fn test_shared_config_is_not_copied() {
        let mut world = PhysicsWorld::new();
        let config = CharacterConfig::enemy().into_shared();
        let a = CharacterBuilder::new(config.clone()).build(0, &mut world);
        let b = CharacterBuilder::new(config.clone()).build(1, &mut world);
        assert!(std::sync::Arc::ptr_eq(a.config(), b.config()));
    }

    #[test]
    fn test_movement_override() {
        let mut world = PhysicsWorld::new();
        let character = CharacterBuilder::new(CharacterConfig::default().into_shared())
            .movement_override(MovementOverride {
                walk_speed: 1.0,
                run_speed: 2.0,
                jump_force: 5.0,
            })
            .build(0, &mut world);
        assert_eq!(character.movement().walk_speed, 1.0);
        assert_eq!(character.movement().jump_force(true), 5.0);
    }

    #[test]
    fn test_player_settles_and_walks() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 1.0));
        let mut input = PlayerInput::new();

        run_frames(&mut player, &mut world, &mut input, None, 10);
        assert!(player.is_grounded());
        assert_eq!(player.state(), AnimState::Idle);

        input.press(Action::MoveRight);
        run_frames(&mut player, &mut world, &mut input, None, 30);
        assert_eq!(player.state(), AnimState::Walk);
        assert_eq!(player.velocity().x, 3.5);
        assert!(player.position().x > 0.5);
        assert_eq!(player.facing(), 1.0);

        input.press(Action::Run);
        run_frames(&mut player, &mut world, &mut input, None, 2);
        assert_eq!(player.state(), AnimState::Run);
        assert_eq!(player.velocity().x, 6.5);

        input.reset();
        run_frames(&mut player, &mut world, &mut input, None, 2);
        assert_eq!(player.state(), AnimState::Idle);
        assert_eq!(player.velocity().x, 0.0);
    }

    #[test]
    fn test_player_jump_and_land() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 1.0));
        let mut input = PlayerInput::new();
        run_frames(&mut player, &mut world, &mut input, None, 10);

        input.press(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 1);
        assert_eq!(player.state(), AnimState::Jump);
        assert_eq!(player.velocity().y, 11.0);
        assert!(!player.is_grounded());

        input.reset();
        run_frames(&mut player, &mut world, &mut input, None, 150);
        assert!(player.is_grounded());
        assert_eq!(player.state(), AnimState::Idle);
    }

    #[test]
    fn test_double_jump() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 1.0));
        let mut input = PlayerInput::new();
        run_frames(&mut player, &mut world, &mut input, None, 10);

        input.press(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 1);
        input.release(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 10);

        input.press(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 1);
        assert_eq!(player.velocity().y, 8.0);

        // No third jump
        input.release(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 1);
        input.press(Action::Jump);
        run_frames(&mut player, &mut world, &mut input, None, 1);
        assert!(player.velocity().y < 8.0);
    }

    #[test]
    fn test_falling_from_spawn_enters_jump_and_lands() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 4.0));
        let mut input = PlayerInput::new();

        run_frames(&mut player, &mut world, &mut input, None, 5);
        assert_eq!(player.state(), AnimState::Jump);
        assert_eq!(player.animation().shown_frame().map(|f| f.index), Some(4));

        run_frames(&mut player, &mut world, &mut input, None, 120);
        assert_eq!(player.state(), AnimState::Idle);
    }

    #[test]
    fn test_hit_stops_movement() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 1.0));
        let mut input = PlayerInput::new();
        run_frames(&mut player, &mut world, &mut input, None, 10);

        assert!(!player.take_hit(30));
        assert_eq!(player.stats().current_health, 70);
        assert_eq!(player.state(), AnimState::HitBack);

        input.press(Action::MoveRight);
        run_frames(&mut player, &mut world, &mut input, None, 5);
        assert!(player.state().is_incapacitated());
        assert_eq!(player.velocity().x, 0.0);
    }

    #[test]
    fn test_enemy_patrols_toward_first_waypoint() {
        let mut world = world_with_ground();
        let mut enemy = CharacterBuilder::new(CharacterConfig::enemy().into_shared())
            .spawn_at(Vec2::new(0.0, 1.0))
            .waypoints(vec![Vec2::new(-3.0, 1.0), Vec2::new(3.0, 1.0)])
            .build(1, &mut world);
        let mut input = PlayerInput::new();

        run_frames(&mut enemy, &mut world, &mut input, None, 30);
        assert!(enemy.position().x < 0.0);
        assert_eq!(enemy.state(), AnimState::Walk);
        assert_eq!(enemy.facing(), -1.0);
    }

    #[test]
    fn test_enemy_attacks_target_in_range() {
        let mut world = world_with_ground();
        let mut enemy = CharacterBuilder::new(CharacterConfig::enemy().into_shared())
            .spawn_at(Vec2::new(0.0, 1.0))
            .build(1, &mut world);
        let mut input = PlayerInput::new();
        let target = Some(Vec2::new(1.5, 1.0));

        run_frames(&mut enemy, &mut world, &mut input, target, 1);
        assert!(matches!(enemy.state(), AnimState::Push | AnimState::Throw));
        match enemy.controller() {
            Controller::Ai(ai) => {
                assert_eq!(ai.brain.brain(), Brain::AttackHold);
                assert!(ai.steering.prevent_rest);
            }
            Controller::Player(_) => panic!("expected AI controller"),
        }
    }

    #[test]
    fn test_missing_body_is_skipped() {
        let mut world = world_with_ground();
        let mut player = spawn_player(&mut world, Vec2::new(0.0, 1.0));
        world.remove_rigid_body(player.body());

        player.fixed_update(DT, &mut world, None);
        assert_eq!(player.position(), Vec2::new(0.0, 1.0));
    }
}
