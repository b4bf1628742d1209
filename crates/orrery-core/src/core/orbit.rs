//! Circular orbit math: pure functions, no scene state.
//!
//! Angles and radii are f64 so long sessions do not drift; conversion to f32
//! happens only when positions are handed to the camera.

use std::f64::consts::TAU;

use glam::Vec3;

use crate::api::config::SceneConfig;
use crate::api::types::BodyId;

/// Golden angle in radians; consecutive orders land far apart on the circle.
const GOLDEN_ANGLE: f64 = 2.399_963_229_728_653;

/// Per-body motion state owned by the scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitingInstance {
    /// Lookup key into the catalog; the instance holds no body data.
    pub body_id: BodyId,
    /// Orbital order (1 = innermost).
    pub order: u32,
    /// Scene units from the anchor.
    pub orbit_radius: f64,
    /// Radians, kept in [0, 2π).
    pub angular_position: f64,
    /// Radians per second.
    pub angular_velocity: f64,
    /// Self-rotation, radians in [0, 2π).
    pub rotation_phase: f64,
    /// Radians per second.
    pub spin_rate: f64,
}

impl OrbitingInstance {
    /// Fresh instance at `initial_angle` with zero spin phase.
    pub fn new(body_id: BodyId, order: u32, initial_angle: f64, config: &SceneConfig) -> Self {
        Self {
            body_id,
            order,
            orbit_radius: orbit_radius(order, config),
            angular_position: wrap_angle(initial_angle),
            angular_velocity: angular_velocity(order, config),
            rotation_phase: 0.0,
            spin_rate: spin_rate(order, config),
        }
    }

    /// Advance both angles by `dt` seconds, wrapping into [0, 2π).
    pub fn step(&mut self, dt: f64) {
        self.angular_position = wrap_angle(self.angular_position + self.angular_velocity * dt);
        self.rotation_phase = wrap_angle(self.rotation_phase + self.spin_rate * dt);
    }

    /// Position in the orbital plane around `anchor`.
    pub fn world_position(&self, anchor: Vec3) -> Vec3 {
        anchor + circle_point(self.orbit_radius, self.angular_position)
    }
}

/// Orbit radius for an orbital order; strictly increasing in `order`.
pub fn orbit_radius(order: u32, config: &SceneConfig) -> f64 {
    config.base_radius + order as f64 * config.radius_step
}

/// Angular velocity for an orbital order; strictly decreasing in `order`.
pub fn angular_velocity(order: u32, config: &SceneConfig) -> f64 {
    config.base_speed / order.max(1) as f64
}

/// Self-rotation rate; inner bodies spin faster.
pub fn spin_rate(order: u32, config: &SceneConfig) -> f64 {
    config.base_spin / order.max(1) as f64
}

/// Starting angle: golden-angle stagger by order, rotated by a session phase.
pub fn initial_angle(order: u32, session_phase: f64) -> f64 {
    wrap_angle(order as f64 * GOLDEN_ANGLE + session_phase)
}

/// Visual radius from diameter; strictly increasing in diameter.
pub fn visual_radius(diameter_km: f64, config: &SceneConfig) -> f32 {
    config.size_base + diameter_km as f32 * config.size_per_km
}

/// Wrap into [0, 2π).
pub fn wrap_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// x = r cos θ, z = r sin θ, in the y = 0 plane.
pub fn circle_point(radius: f64, angle: f64) -> Vec3 {
    Vec3::new((radius * angle.cos()) as f32, 0.0, (radius * angle.sin()) as f32)
}

/// Closed polyline of `samples` points around an orbit (first point not repeated).
pub fn orbit_path(radius: f64, anchor: Vec3, samples: usize) -> Vec<Vec3> {
    let n = samples.max(3);
    (0..n)
        .map(|i| anchor + circle_point(radius, TAU * i as f64 / n as f64))
        .collect()
}
