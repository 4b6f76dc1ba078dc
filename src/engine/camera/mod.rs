// 2D camera and follow behavior

mod follow;
mod view;

pub use follow::{CameraFollow, CameraFollowConfig};
pub use view::{Camera, Viewport};
