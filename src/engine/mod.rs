// Engine modules: physics, input, camera, assets and frame pacing

pub mod assets;
pub mod camera;
pub mod game_loop;
pub mod input;
pub mod physics;
