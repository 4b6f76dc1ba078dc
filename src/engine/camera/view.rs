// Orthographic 2D camera

use glam::{Mat4, Vec2};

/// Orthographic camera. `size` is half the visible height in world units.
#[derive(Debug, Clone)]
pub struct Camera {
    position: Vec2,
    size: f32,
    aspect: f32,
    view_proj: Mat4,
}

impl Camera {
    pub fn new(position: Vec2, size: f32, aspect: f32) -> Self {
        let mut camera = Self {
            position,
            size: size.max(0.1),
            aspect,
            view_proj: Mat4::IDENTITY,
        };
        camera.update_view_proj();
        camera
    }

    fn update_view_proj(&mut self) {
        let half = self.half_extents();
        self.view_proj = Mat4::orthographic_rh(
            self.position.x - half.x,
            self.position.x + half.x,
            self.position.y - half.y,
            self.position.y + half.y,
            -100.0,
            100.0,
        );
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
        self.update_view_proj();
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn set_size(&mut self, size: f32) {
        self.size = size.max(0.1);
        self.update_view_proj();
    }

    /// Keep the aspect ratio in sync with the window
    pub fn resize(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect = width / height;
            self.update_view_proj();
        }
    }

    pub fn view_proj_matrix(&self) -> Mat4 {
        self.view_proj
    }

    pub fn half_extents(&self) -> Vec2 {
        Vec2::new(self.size * self.aspect, self.size)
    }

    pub fn viewport_bounds(&self) -> Viewport {
        let half = self.half_extents();
        Viewport {
            min: self.position - half,
            max: self.position + half,
        }
    }
}

/// Visible area in world coordinates
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub min: Vec2,
    pub max: Vec2,
}

impl Viewport {
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_follow_size_and_aspect() {
        let camera = Camera::new(Vec2::new(10.0, 0.0), 5.0, 2.0);
        let bounds = camera.viewport_bounds();
        assert_eq!(bounds.min, Vec2::new(0.0, -5.0));
        assert_eq!(bounds.max, Vec2::new(20.0, 5.0));
        assert!(bounds.contains(Vec2::new(15.0, 4.0)));
        assert!(!bounds.contains(Vec2::new(21.0, 0.0)));
    }

    #[test]
    fn test_size_is_clamped() {
        let mut camera = Camera::new(Vec2::ZERO, 5.0, 1.0);
        camera.set_size(-3.0);
        assert_eq!(camera.size(), 0.1);
    }

    #[test]
    fn test_view_proj_maps_center_to_origin() {
        let mut camera = Camera::new(Vec2::ZERO, 5.0, 16.0 / 9.0);
        camera.set_position(Vec2::new(3.0, 2.0));
        let clip = camera
            .view_proj_matrix()
            .project_point3(glam::Vec3::new(3.0, 2.0, 0.0));
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
    }
}
