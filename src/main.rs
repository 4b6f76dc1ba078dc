use anyhow::Result;
use glam::Vec2;
use log::{info, warn};
use winit::{
    event::{Event, WindowEvent},
    event_loop::{ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowBuilder,
};

use rusted_platformer::engine::assets::{AssetLibrary, AssetLoader};
use rusted_platformer::engine::camera::{Camera, CameraFollow, CameraFollowConfig};
use rusted_platformer::engine::game_loop::GameLoop;
use rusted_platformer::engine::input::{Action, InputManager};
use rusted_platformer::engine::physics::{presets, PhysicsWorld};
use rusted_platformer::game::characters::{
    CharacterBuilder, CharacterConfig, CharacterManager, CharacterStats, SharedConfig,
};

/// Frames between state log lines
const LOG_INTERVAL: u64 = 60;

/// Named configuration from the library, or the built-in one if it is missing
fn config_or(library: &AssetLibrary, name: &str, fallback: CharacterConfig) -> SharedConfig {
    library.config_by_name(name).unwrap_or_else(|| {
        warn!("configuration '{}' not found, using built-in defaults", name);
        fallback.into_shared()
    })
}

fn build_scene(library: &AssetLibrary) -> (PhysicsWorld, CharacterManager) {
    let mut physics = PhysicsWorld::new();

    // 60 units wide, top face at y = 0
    let ground = physics.add_rigid_body(presets::ground_body(0.0, -0.5));
    physics.add_collider(presets::ground_collider(60.0, 1.0), ground);

    let mut manager = CharacterManager::new();

    let player_config = config_or(library, "player", CharacterConfig::default());
    let player_stats = library
        .stats_by_name("player")
        .unwrap_or_else(|| CharacterStats::for_player(true));
    manager.spawn(
        CharacterBuilder::new(player_config)
            .name("Player")
            .stats(player_stats)
            .spawn_at(Vec2::new(0.0, 1.0)),
        &mut physics,
    );

    let enemy_config = config_or(library, "enemy", CharacterConfig::enemy());
    let enemy_stats = library
        .stats_by_name("enemy")
        .unwrap_or_else(|| CharacterStats::for_player(false));
    manager.spawn(
        CharacterBuilder::new(enemy_config)
            .name("Grunt")
            .stats(enemy_stats)
            .waypoints(vec![Vec2::new(10.0, 1.0), Vec2::new(18.0, 1.0)])
            .spawn_at(Vec2::new(14.0, 1.0))
            .seed(42),
        &mut physics,
    );

    (physics, manager)
}

fn log_scene(manager: &CharacterManager, fps: f32) {
    for character in manager.all() {
        info!(
            "{}: {:?} frame {} at ({:.1}, {:.1}) hp {} [{:.0} fps]",
            character.name(),
            character.state(),
            character.animation().current_frame(),
            character.position().x,
            character.position().y,
            character.stats().current_health,
            fps
        );
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Rusted Platformer...");

    let mut library = AssetLibrary::new(AssetLoader::new("assets"));
    match library.load_all() {
        Ok(count) => info!("loaded {} assets", count),
        Err(e) => warn!("could not read assets: {:#}", e),
    }

    let (mut physics, mut manager) = build_scene(&library);
    let mut input = InputManager::default();
    let mut game_loop = GameLoop::new();

    let follow_config = CameraFollowConfig::default();
    let camera_start = Vec2::from(follow_config.follow_offset);
    let mut camera = Camera::new(camera_start, follow_config.default_zoom, 16.0 / 9.0);
    let mut follow = CameraFollow::new(follow_config, camera_start, 7);

    let event_loop = EventLoop::new()?;
    let window = WindowBuilder::new()
        .with_title("Rusted Platformer")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720))
        .with_resizable(true)
        .build(&event_loop)?;

    info!("Window created successfully");
    info!("A/D move, Shift run, Space jump, F throw, E push, J/K strike, H hit back, Esc pause");

    event_loop
        .run(move |event, elwt| {
            elwt.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent {
                    event: WindowEvent::CloseRequested,
                    ..
                } => {
                    info!("Close requested, shutting down...");
                    elwt.exit();
                }
                Event::WindowEvent {
                    event: WindowEvent::Resized(size),
                    ..
                } => {
                    camera.resize(size.width as f32, size.height as f32);
                }
                Event::WindowEvent {
                    event: WindowEvent::KeyboardInput { event, .. },
                    ..
                } => {
                    if let PhysicalKey::Code(key) = event.physical_key {
                        let pressed = event.state.is_pressed();
                        let action = input.handle_key(key, pressed, event.repeat);
                        if pressed && action == Some(Action::Pause) {
                            game_loop.toggle_pause();
                        }
                    }
                }
                Event::AboutToWait => {
                    let timing = game_loop.begin_frame();

                    if !game_loop.is_paused() {
                        manager.update(timing.delta, input.player_mut());
                        for _ in 0..timing.fixed_steps {
                            manager.fixed_update(game_loop.fixed_timestep(), &mut physics);
                            physics.step();
                        }

                        if let Some(player) = manager.player() {
                            follow.late_update(
                                &mut camera,
                                player.position(),
                                Some(player.velocity()),
                                timing.delta,
                            );
                        }
                    }
                    input.end_frame(timing.delta);

                    if game_loop.frame_count() % LOG_INTERVAL == 0 {
                        log_scene(&manager, game_loop.fps());
                    }
                    window.request_redraw();
                }
                _ => {}
            }
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}
