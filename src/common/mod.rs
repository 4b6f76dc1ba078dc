// Shared helpers: math and tick-driven timers

pub mod math;
pub mod timer;

pub use timer::{Cooldown, Delay};
