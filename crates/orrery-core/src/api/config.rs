use serde::{Deserialize, Serialize};

use crate::error::{ConfigResult, ConfigurationError};

/// Layout and motion constants for the orbital scene.
///
/// Units are scene units (world space around the sun at the origin) and
/// radians per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Orbit radius before the first step (radius = base + order * step).
    pub base_radius: f64,
    /// Orbit radius added per orbital order.
    pub radius_step: f64,
    /// Angular velocity of order 1; order n moves at base_speed / n.
    pub base_speed: f64,
    /// Spin rate of order 1; order n spins at base_spin / n.
    pub base_spin: f64,
    /// Visual radius of the central body.
    pub sun_radius: f32,
    /// Visual radius = size_base + diameter_km * size_per_km.
    pub size_base: f32,
    pub size_per_km: f32,
    /// Hit radius as a multiple of the projected visual radius.
    pub hit_scale: f32,
    /// Ring band for ringed bodies, as multiples of the visual radius.
    pub ring_inner: f32,
    pub ring_outer: f32,
    /// Seeds the per-session phase offset of the initial angular positions.
    pub session_seed: u64,
    /// Points per orbit path polyline.
    pub orbit_samples: usize,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            base_radius: 5.0,
            radius_step: 5.0,
            base_speed: 2.0,
            base_spin: 0.3,
            sun_radius: 5.0,
            size_base: 0.5,
            size_per_km: 1.0 / 50_000.0,
            hit_scale: 1.5,
            ring_inner: 1.5,
            ring_outer: 2.5,
            session_seed: 0x5EED,
            orbit_samples: 64,
        }
    }
}

impl SceneConfig {
    /// Reject values that would break the radius/velocity monotonicity.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.radius_step > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("radius_step must be > 0"));
        }
        if !(self.base_radius >= 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("base_radius must be >= 0"));
        }
        if !(self.base_speed > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("base_speed must be > 0"));
        }
        if !(self.size_base > 0.0) || !(self.size_per_km >= 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("body sizes must be positive"));
        }
        if !(self.hit_scale > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("hit_scale must be > 0"));
        }
        if !(self.ring_outer > self.ring_inner) {
            return Err(ConfigurationError::InvalidSceneConfig("ring_outer must exceed ring_inner"));
        }
        if self.orbit_samples < 3 {
            return Err(ConfigurationError::InvalidSceneConfig("orbit_samples must be >= 3"));
        }
        Ok(())
    }
}

/// Default pose and limits of the orbit camera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub azimuth: f32,
    pub elevation: f32,
    pub distance: f32,
    /// Vertical field of view (radians).
    pub fov_y: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Radians per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Fraction of distance per wheel tick.
    pub zoom_speed: f32,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.5,
            distance: 50.0,
            fov_y: 75.0_f32.to_radians(),
            min_distance: 15.0,
            max_distance: 200.0,
            orbit_sensitivity: 0.008,
            zoom_speed: 0.1,
            screen_width: 800.0,
            screen_height: 600.0,
        }
    }
}

impl CameraConfig {
    /// Reject limits and rates that would produce NaN or inverted projections.
    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.min_distance > 0.0 && self.min_distance <= self.max_distance) {
            return Err(ConfigurationError::InvalidSceneConfig("camera distance limits out of order"));
        }
        if !(self.fov_y > 0.0 && self.fov_y < std::f32::consts::PI) {
            return Err(ConfigurationError::InvalidSceneConfig("fov_y must be in (0, pi)"));
        }
        if !(self.screen_width > 0.0 && self.screen_height > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("screen size must be positive"));
        }
        if !(self.orbit_sensitivity.is_finite() && self.orbit_sensitivity > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("orbit_sensitivity must be > 0"));
        }
        // A full wheel tick must never zoom through zero distance.
        if !(self.zoom_speed.is_finite() && self.zoom_speed > 0.0 && self.zoom_speed < 1.0) {
            return Err(ConfigurationError::InvalidSceneConfig("zoom_speed must be in (0, 1)"));
        }
        if !(self.distance.is_finite() && self.azimuth.is_finite() && self.elevation.is_finite()) {
            return Err(ConfigurationError::InvalidSceneConfig("camera pose must be finite"));
        }
        Ok(())
    }
}

/// Configuration for the whole explorer, provided by the UI at init.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub scene: SceneConfig,
    pub camera: CameraConfig,
    /// Screen-pixel travel before a press becomes a drag instead of a click.
    pub drag_threshold: f32,
    /// Longest frame delta fed to the scene (seconds); longer gaps are clamped.
    pub max_frame_dt: f64,
    /// Maximum events buffered per frame.
    pub max_events: usize,
    /// Seed for quiz shuffles. `None` lets the host pick one per page load.
    pub quiz_seed: Option<u64>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            scene: SceneConfig::default(),
            camera: CameraConfig::default(),
            drag_threshold: 5.0,
            max_frame_dt: 0.1,
            max_events: 32,
            quiz_seed: None,
        }
    }
}

impl ExplorerConfig {
    /// Upper bound for `max_events`; the frame buffer is sized from it.
    pub const MAX_EVENTS_LIMIT: usize = 1024;

    /// Parse a (possibly partial) config document; missing fields keep defaults.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        self.scene.validate()?;
        self.camera.validate()?;
        if !(1..=Self::MAX_EVENTS_LIMIT).contains(&self.max_events) {
            return Err(ConfigurationError::InvalidSceneConfig("max_events must be in 1..=1024"));
        }
        if !(self.drag_threshold.is_finite() && self.drag_threshold >= 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("drag_threshold must be >= 0"));
        }
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(ConfigurationError::InvalidSceneConfig("max_frame_dt must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_config_is_valid() {
        assert!(SceneConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ExplorerConfig::from_json(r#"{ "scene": { "radius_step": 8.0 } }"#).unwrap();
        assert_eq!(cfg.scene.radius_step, 8.0);
        assert_eq!(cfg.scene.base_radius, SceneConfig::default().base_radius);
        assert_eq!(cfg.drag_threshold, 5.0);
    }

    #[test]
    fn inverted_camera_limits_are_rejected() {
        let err = ExplorerConfig::from_json(
            r#"{ "camera": { "min_distance": 300.0, "max_distance": 100.0 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidSceneConfig(_)));
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = ExplorerConfig::from_json(r#"{ "scene": { "radius_step": 0.0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidSceneConfig(_)));
    }

    fn rejected(json: &str) -> bool {
        matches!(ExplorerConfig::from_json(json), Err(ConfigurationError::InvalidSceneConfig(_)))
    }

    #[test]
    fn default_explorer_config_is_valid() {
        assert!(ExplorerConfig::default().validate().is_ok());
    }

    #[test]
    fn event_capacity_is_bounded() {
        assert!(ExplorerConfig::from_json(r#"{ "max_events": 4611686018427387904 }"#).is_err());
        assert!(rejected(r#"{ "max_events": 0 }"#));
        assert!(ExplorerConfig::from_json(r#"{ "max_events": 1024 }"#).is_ok());
    }

    #[test]
    fn frame_and_drag_limits_must_be_usable() {
        assert!(rejected(r#"{ "max_frame_dt": -0.1 }"#));
        assert!(rejected(r#"{ "max_frame_dt": 0.0 }"#));
        assert!(rejected(r#"{ "drag_threshold": -1.0 }"#));
        assert!(ExplorerConfig::from_json(r#"{ "drag_threshold": 0.0 }"#).is_ok());

        // JSON cannot spell NaN, so check the struct path too.
        let cfg = ExplorerConfig { max_frame_dt: f64::NAN, ..ExplorerConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = ExplorerConfig { drag_threshold: f32::INFINITY, ..ExplorerConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn camera_rates_must_be_finite_and_positive() {
        assert!(rejected(r#"{ "camera": { "zoom_speed": 0.0 } }"#));
        assert!(rejected(r#"{ "camera": { "zoom_speed": 1.5 } }"#));
        assert!(rejected(r#"{ "camera": { "orbit_sensitivity": -0.01 } }"#));

        let camera = CameraConfig { zoom_speed: f32::NAN, ..CameraConfig::default() };
        assert!(camera.validate().is_err());
        let camera = CameraConfig { orbit_sensitivity: f32::NAN, ..CameraConfig::default() };
        assert!(camera.validate().is_err());
    }

    #[test]
    fn quiz_seed_is_optional() {
        assert_eq!(ExplorerConfig::default().quiz_seed, None);
        let cfg = ExplorerConfig::from_json(r#"{ "quiz_seed": 42 }"#).unwrap();
        assert_eq!(cfg.quiz_seed, Some(42));
    }

    #[test]
    fn garbage_is_malformed() {
        let err = ExplorerConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigurationError::Malformed(_)));
    }
}
