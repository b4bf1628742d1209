use std::cmp::Ordering;
use std::f64::consts::TAU;

use glam::{Vec2, Vec3};

use crate::api::config::SceneConfig;
use crate::api::types::BodyId;
use crate::assets::model::{validate_bodies, CelestialBody};
use crate::bridge::protocol::BodyInstance;
use crate::components::color::Rgb;
use crate::core::camera::{Camera3D, Projection};
use crate::core::orbit::{self, OrbitingInstance};
use crate::error::ConfigResult;
use crate::systems::rng::Rng;

/// Sun color (0xFDB813).
const SUN_COLOR: Rgb = Rgb::new(0.992, 0.722, 0.075);

/// Render-only attributes derived once from the body record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyVisual {
    pub radius: f32,
    pub color: Rgb,
    pub ring: Option<Rgb>,
}

/// A confirmed click that resolved to a body. The scene never selects on its
/// own; the coordinator decides what to do with the candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionCandidate {
    pub body_id: BodyId,
}

/// One hit-test match, before the tie-break.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub body_id: BodyId,
    pub order: u32,
    pub depth: f32,
}

/// Central body plus one orbiting instance per catalog body.
///
/// A scene only exists after a successful [`OrbitalScene::initialize`], so
/// advancing an uninitialized scene cannot be expressed. Dropping the scene
/// releases all of its instance storage.
#[derive(Debug, Clone)]
pub struct OrbitalScene {
    /// Sorted by orbital order.
    instances: Vec<OrbitingInstance>,
    /// Parallel to `instances`.
    visuals: Vec<BodyVisual>,
    anchor: Vec3,
    config: SceneConfig,
}

impl OrbitalScene {
    /// Build one instance per body. Fails on an empty set or a repeated
    /// orbital order.
    pub fn initialize(bodies: &[CelestialBody], config: &SceneConfig) -> ConfigResult<Self> {
        config.validate()?;
        validate_bodies(bodies)?;

        let mut sorted: Vec<&CelestialBody> = bodies.iter().collect();
        sorted.sort_by_key(|b| b.order_from_sun);

        let session_phase = Rng::new(config.session_seed).next_f64() * TAU;

        let mut instances = Vec::with_capacity(sorted.len());
        let mut visuals = Vec::with_capacity(sorted.len());
        for body in sorted {
            let angle = orbit::initial_angle(body.order_from_sun, session_phase);
            instances.push(OrbitingInstance::new(body.id, body.order_from_sun, angle, config));
            visuals.push(BodyVisual {
                radius: orbit::visual_radius(body.diameter, config),
                color: body.rgb()?,
                ring: body.ring_rgb()?,
            });
        }

        log::info!("Scene initialized: {} orbiting bodies", instances.len());

        Ok(Self {
            instances,
            visuals,
            anchor: Vec3::ZERO,
            config: config.clone(),
        })
    }

    /// Step every body by `dt` seconds. O(bodies), no allocation.
    pub fn advance(&mut self, dt: f64) {
        for inst in &mut self.instances {
            inst.step(dt);
        }
    }

    /// Orbiting instances in orbital order.
    pub fn instances(&self) -> &[OrbitingInstance] {
        &self.instances
    }

    /// Number of orbiting bodies (the sun is not counted).
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// World position of the central body.
    pub fn anchor(&self) -> Vec3 {
        self.anchor
    }

    fn index_of(&self, id: BodyId) -> Option<usize> {
        self.instances.iter().position(|i| i.body_id == id)
    }

    /// Motion state for `id`, if it is part of this scene.
    pub fn instance(&self, id: BodyId) -> Option<&OrbitingInstance> {
        self.index_of(id).map(|i| &self.instances[i])
    }

    /// Size and colours for `id`.
    pub fn visual(&self, id: BodyId) -> Option<&BodyVisual> {
        self.index_of(id).map(|i| &self.visuals[i])
    }

    /// World position of an instance around this scene's anchor.
    pub fn compute_world_position(&self, instance: &OrbitingInstance) -> Vec3 {
        instance.world_position(self.anchor)
    }

    /// Project an instance through `camera`. Pure; the scene is not touched.
    pub fn compute_screen_position(&self, instance: &OrbitingInstance, camera: &Camera3D) -> Projection {
        camera.project(self.compute_world_position(instance))
    }

    /// Body under `pointer`, if any. Among overlapping hits the closest to the
    /// viewer wins, then the highest orbital order.
    pub fn hit_test(&self, pointer: Vec2, camera: &Camera3D) -> Option<BodyId> {
        let hits = self.instances.iter().zip(&self.visuals).filter_map(|(inst, vis)| {
            let proj = self.compute_screen_position(inst, camera);
            if !proj.is_visible() {
                return None;
            }
            let hit_radius = vis.radius * proj.scale * self.config.hit_scale;
            (proj.pos.distance(pointer) < hit_radius).then_some(Hit {
                body_id: inst.body_id,
                order: inst.order,
                depth: proj.depth,
            })
        });
        pick_closest(hits)
    }

    /// Resolve a confirmed click into a selection candidate.
    pub fn confirm_click(&self, pointer: Vec2, camera: &Camera3D) -> Option<SelectionCandidate> {
        let body_id = self.hit_test(pointer, camera)?;
        log::debug!("Selection candidate: body {}", body_id);
        Some(SelectionCandidate { body_id })
    }

    /// Orbit line for a body, in world space.
    pub fn orbit_path(&self, id: BodyId) -> Option<Vec<Vec3>> {
        let inst = self.instance(id)?;
        Some(orbit::orbit_path(inst.orbit_radius, self.anchor, self.config.orbit_samples))
    }

    /// Copy the current frame into `out`, sun included, sorted back to front.
    /// Reuses `out`'s allocation.
    pub fn snapshot(&self, camera: &Camera3D, selected: Option<BodyId>, out: &mut Vec<BodyInstance>) {
        out.clear();

        let sun = camera.project(self.anchor);
        if sun.is_visible() {
            out.push(BodyInstance {
                x: sun.pos.x,
                y: sun.pos.y,
                radius: self.config.sun_radius * sun.scale,
                depth: sun.depth,
                r: SUN_COLOR.r,
                g: SUN_COLOR.g,
                b: SUN_COLOR.b,
                body_id: -1.0,
                flags: BodyInstance::FLAG_SUN as f32,
                ..Default::default()
            });
        }

        for (inst, vis) in self.instances.iter().zip(&self.visuals) {
            let proj = self.compute_screen_position(inst, camera);
            if !proj.is_visible() {
                continue;
            }
            let radius = vis.radius * proj.scale;
            let mut flags = 0;
            if selected == Some(inst.body_id) {
                flags |= BodyInstance::FLAG_SELECTED;
            }
            let ring = vis.ring.unwrap_or(Rgb::new(0.0, 0.0, 0.0));
            let (ring_inner, ring_outer) = if vis.ring.is_some() {
                flags |= BodyInstance::FLAG_RINGS;
                (radius * self.config.ring_inner, radius * self.config.ring_outer)
            } else {
                (0.0, 0.0)
            };

            out.push(BodyInstance {
                x: proj.pos.x,
                y: proj.pos.y,
                radius,
                depth: proj.depth,
                r: vis.color.r,
                g: vis.color.g,
                b: vis.color.b,
                rotation: inst.rotation_phase as f32,
                ring_r: ring.r,
                ring_g: ring.g,
                ring_b: ring.b,
                ring_inner,
                ring_outer,
                body_id: inst.body_id.0 as f32,
                flags: flags as f32,
                _pad: 0.0,
            });
        }

        // Painter's order: farthest first.
        out.sort_unstable_by(|a, b| b.depth.total_cmp(&a.depth));
    }
}

/// Tie-break for overlapping hits: smallest depth, then highest order.
pub fn pick_closest(hits: impl IntoIterator<Item = Hit>) -> Option<BodyId> {
    hits.into_iter()
        .min_by(|a, b| match a.depth.total_cmp(&b.depth) {
            Ordering::Equal => b.order.cmp(&a.order),
            other => other,
        })
        .map(|h| h.body_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::CameraConfig;
    use crate::assets::catalog::{Catalog, MemCatalog};
    use crate::assets::model::fixtures;
    use crate::error::ConfigurationError;

    fn scene(n: u32) -> OrbitalScene {
        OrbitalScene::initialize(&fixtures::bodies(n), &SceneConfig::default()).unwrap()
    }

    #[test]
    fn radius_and_velocity_are_monotonic_in_order() {
        let s = scene(8);
        for pair in s.instances().windows(2) {
            assert!(pair[1].orbit_radius > pair[0].orbit_radius);
            assert!(pair[1].angular_velocity < pair[0].angular_velocity);
        }
    }

    #[test]
    fn advance_is_additive() {
        let mut once = scene(5);
        let mut twice = once.clone();
        once.advance(0.7);
        twice.advance(0.3);
        twice.advance(0.4);
        for (a, b) in once.instances().iter().zip(twice.instances()) {
            assert!((a.angular_position - b.angular_position).abs() < 1e-9);
            assert!((a.rotation_phase - b.rotation_phase).abs() < 1e-9);
        }
    }

    #[test]
    fn angles_stay_wrapped_over_long_runs() {
        let mut s = scene(3);
        for _ in 0..10_000 {
            s.advance(0.1);
        }
        for inst in s.instances() {
            assert!((0.0..TAU).contains(&inst.angular_position));
            assert!((0.0..TAU).contains(&inst.rotation_phase));
        }
    }

    #[test]
    fn initialization_is_deterministic_per_seed() {
        let a = scene(4);
        let b = scene(4);
        assert_eq!(a.instances(), b.instances());

        let cfg = SceneConfig { session_seed: 99, ..SceneConfig::default() };
        let c = OrbitalScene::initialize(&fixtures::bodies(4), &cfg).unwrap();
        assert_ne!(a.instances()[0].angular_position, c.instances()[0].angular_position);
    }

    #[test]
    fn rejects_empty_and_duplicate_orders() {
        let cfg = SceneConfig::default();
        assert_eq!(
            OrbitalScene::initialize(&[], &cfg).unwrap_err(),
            ConfigurationError::EmptyBodySet
        );

        let mut dup = fixtures::bodies(3);
        dup[1].order_from_sun = 1;
        assert!(matches!(
            OrbitalScene::initialize(&dup, &cfg),
            Err(ConfigurationError::DuplicateOrbitalOrder { order: 1, .. })
        ));
    }

    #[test]
    fn world_position_follows_angle() {
        let s = scene(1);
        let mut inst = s.instances()[0];
        inst.angular_position = 0.0;
        let p = s.compute_world_position(&inst);
        assert!((p.x - 10.0).abs() < 1e-5 && p.y == 0.0 && p.z.abs() < 1e-5);
    }

    #[test]
    fn hit_at_body_center_returns_that_body() {
        let catalog = MemCatalog::seeded().unwrap();
        let s = OrbitalScene::initialize(catalog.bodies().unwrap(), &SceneConfig::default()).unwrap();
        let camera = Camera3D::default();
        assert_eq!(s.len(), 8);
        for inst in s.instances() {
            let center = s.compute_screen_position(inst, &camera).pos;
            assert_eq!(s.hit_test(center, &camera), Some(inst.body_id), "body {}", inst.body_id);
        }
    }

    #[test]
    fn overlapping_bodies_resolve_to_the_closer_one() {
        // Edge-on camera on +Z: every body at angle π/2 or 3π/2 projects to
        // the screen centre, in front of or behind the sun.
        let camera = Camera3D::from_config(&CameraConfig { elevation: 0.0, ..CameraConfig::default() });
        let center = Vec2::new(camera.screen_width * 0.5, camera.screen_height * 0.5);
        let front = std::f64::consts::FRAC_PI_2;
        let back = 3.0 * std::f64::consts::FRAC_PI_2;

        // Both in front: order 2 sits nearer the camera.
        let mut s = scene(2);
        s.instances[0].angular_position = front;
        s.instances[1].angular_position = front;
        assert_eq!(s.hit_test(center, &camera), Some(BodyId(2)));

        // Order 2 behind the sun: the lower order is closer and wins.
        s.instances[1].angular_position = back;
        assert_eq!(s.hit_test(center, &camera), Some(BodyId(1)));
    }

    #[test]
    fn far_pointer_hits_nothing() {
        let s = scene(8);
        let camera = Camera3D::default();
        assert_eq!(s.hit_test(Vec2::new(-10_000.0, -10_000.0), &camera), None);
        assert_eq!(s.confirm_click(Vec2::new(-10_000.0, -10_000.0), &camera), None);
    }

    #[test]
    fn tie_break_prefers_closest_then_highest_order() {
        let hit = |id, order, depth| Hit { body_id: BodyId(id), order, depth };
        assert_eq!(pick_closest([hit(1, 1, 30.0), hit(2, 2, 20.0)]), Some(BodyId(2)));
        assert_eq!(pick_closest([hit(5, 5, 20.0), hit(2, 2, 30.0)]), Some(BodyId(5)));
        assert_eq!(pick_closest([hit(3, 3, 25.0), hit(7, 7, 25.0)]), Some(BodyId(7)));
        assert_eq!(pick_closest(std::iter::empty()), None);
    }

    #[test]
    fn snapshot_is_sorted_back_to_front_and_flags_selection() {
        let mut bodies = fixtures::bodies(6);
        bodies[5].has_rings = true;
        let s = OrbitalScene::initialize(&bodies, &SceneConfig::default()).unwrap();
        let camera = Camera3D::default();
        let mut out = Vec::with_capacity(16);

        s.snapshot(&camera, Some(BodyId(3)), &mut out);
        assert_eq!(out.len(), 7);
        for pair in out.windows(2) {
            assert!(pair[0].depth >= pair[1].depth);
        }
        let selected: Vec<_> = out.iter().filter(|i| i.has_flag(BodyInstance::FLAG_SELECTED)).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].body_id, 3.0);

        let ringed = out.iter().find(|i| i.body_id == 6.0).unwrap();
        assert!(ringed.has_flag(BodyInstance::FLAG_RINGS));
        assert!(ringed.ring_outer > ringed.ring_inner && ringed.ring_inner > ringed.radius);
        assert_eq!(out.iter().filter(|i| i.has_flag(BodyInstance::FLAG_SUN)).count(), 1);

        // Second snapshot reuses the allocation.
        let cap = out.capacity();
        s.snapshot(&camera, None, &mut out);
        assert_eq!(out.capacity(), cap);
    }

    #[test]
    fn orbit_path_for_known_body_only() {
        let s = scene(2);
        let path = s.orbit_path(BodyId(2)).unwrap();
        assert_eq!(path.len(), SceneConfig::default().orbit_samples);
        assert!(s.orbit_path(BodyId(9)).is_none());
    }
}
