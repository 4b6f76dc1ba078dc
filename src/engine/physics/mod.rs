// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, RigidBodyHandle};
pub use collision::CollisionLayer;
pub use world::{GroundProbe, PhysicsWorld};

pub use rapier2d::prelude::Real;
