//! Orbit camera and perspective projection for the scene view.

use glam::{Mat3, Vec2, Vec3};

use crate::api::config::CameraConfig;

/// Projection result from world space to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position in pixels, origin top-left.
    pub pos: Vec2,
    /// Distance from the camera along the view axis. Smaller is closer.
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

impl Projection {
    /// Whether the point lies in front of the near plane.
    pub fn is_visible(&self) -> bool {
        self.depth >= Camera3D::NEAR
    }
}

/// Orbit camera looking at `target` from `distance`, rotated by azimuth
/// (around Y) and elevation (above the orbital plane).
#[derive(Debug, Clone)]
pub struct Camera3D {
    pub azimuth: f32,
    /// Clamped to ±MAX_ELEVATION to avoid flipping over the pole.
    pub elevation: f32,
    pub distance: f32,
    pub target: Vec3,
    pub screen_width: f32,
    pub screen_height: f32,
    home: CameraConfig,
}

impl Default for Camera3D {
    fn default() -> Self {
        Self::from_config(&CameraConfig::default())
    }
}

impl Camera3D {
    pub const NEAR: f32 = 0.1;
    const MAX_ELEVATION: f32 = 1.4; // ~80 degrees

    pub fn from_config(config: &CameraConfig) -> Self {
        Self {
            azimuth: config.azimuth,
            elevation: config.elevation.clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION),
            distance: config.distance.clamp(config.min_distance, config.max_distance),
            target: Vec3::ZERO,
            screen_width: config.screen_width,
            screen_height: config.screen_height,
            home: config.clone(),
        }
    }

    /// Orbit by a pointer drag delta in pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.azimuth += dx * self.home.orbit_sensitivity;
        self.elevation += dy * self.home.orbit_sensitivity;
        self.elevation = self.elevation.clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
    }

    /// Zoom (positive = in).
    pub fn zoom(&mut self, delta: f32) {
        self.distance *= 1.0 - delta * self.home.zoom_speed;
        self.distance = self.distance.clamp(self.home.min_distance, self.home.max_distance);
    }

    /// Back to the configured pose. Screen size is kept.
    pub fn reset(&mut self) {
        self.azimuth = self.home.azimuth;
        self.elevation = self.home.elevation.clamp(-Self::MAX_ELEVATION, Self::MAX_ELEVATION);
        self.distance = self.home.distance.clamp(self.home.min_distance, self.home.max_distance);
        self.target = Vec3::ZERO;
    }

    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.screen_width = width;
            self.screen_height = height;
        }
    }

    /// Focal length in pixels for the configured vertical field of view.
    pub fn focal_length(&self) -> f32 {
        self.screen_height / (2.0 * (self.home.fov_y * 0.5).tan())
    }

    fn rotation(&self) -> Mat3 {
        Mat3::from_rotation_x(self.elevation) * Mat3::from_rotation_y(-self.azimuth)
    }

    /// World position to camera-relative view space (camera on +Z, looking at -Z).
    fn world_to_view(&self, pos: Vec3) -> Vec3 {
        let rel = self.rotation() * (pos - self.target);
        Vec3::new(rel.x, rel.y, rel.z - self.distance)
    }

    /// World point to screen pixels (origin top-left) plus view depth.
    pub fn project(&self, pos: Vec3) -> Projection {
        let view = self.world_to_view(pos);
        let depth = -view.z;
        let scale = self.focal_length() / depth.max(Self::NEAR);

        Projection {
            pos: Vec2::new(
                self.screen_width * 0.5 + view.x * scale,
                self.screen_height * 0.5 - view.y * scale,
            ),
            depth,
            scale,
        }
    }

    /// Camera position in world space.
    pub fn position(&self) -> Vec3 {
        self.target + self.rotation().transpose() * Vec3::new(0.0, 0.0, self.distance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera = Camera3D::default();
        let proj = camera.project(Vec3::ZERO);
        assert!((proj.pos.x - 400.0).abs() < 1e-3);
        assert!((proj.pos.y - 300.0).abs() < 1e-3);
        assert!((proj.depth - 50.0).abs() < 1e-3);
    }

    #[test]
    fn nearer_points_have_smaller_depth_and_larger_scale() {
        let camera = Camera3D::default();
        let near = camera.project(Vec3::new(0.0, 0.0, 20.0));
        let far = camera.project(Vec3::new(0.0, 0.0, -20.0));
        assert!(near.depth < far.depth);
        assert!(near.scale > far.scale);
    }

    #[test]
    fn positive_elevation_looks_down_on_the_plane() {
        let camera = Camera3D::default();
        assert!(camera.position().y > 0.0);
        // Front of the orbital plane lands below screen center.
        assert!(camera.project(Vec3::new(0.0, 0.0, 20.0)).pos.y > 300.0);
    }

    #[test]
    fn position_is_at_distance_from_target() {
        let mut camera = Camera3D::default();
        camera.orbit(120.0, -40.0);
        assert!((camera.position().length() - camera.distance).abs() < 1e-3);
        let proj = camera.project(camera.position());
        assert!(proj.depth.abs() < 1e-3);
        assert!(!proj.is_visible());
    }

    #[test]
    fn orbit_clamps_elevation() {
        let mut camera = Camera3D::default();
        camera.orbit(0.0, 10_000.0);
        assert!(camera.elevation <= Camera3D::MAX_ELEVATION);
        camera.orbit(0.0, -20_000.0);
        assert!(camera.elevation >= -Camera3D::MAX_ELEVATION);
    }

    #[test]
    fn zoom_clamps_and_reset_restores() {
        let mut camera = Camera3D::default();
        camera.zoom(100.0);
        assert_eq!(camera.distance, 15.0);
        camera.zoom(-1000.0);
        assert_eq!(camera.distance, 200.0);
        camera.reset();
        assert_eq!(camera.distance, 50.0);
        assert_eq!(camera.elevation, 0.5);
    }
}
