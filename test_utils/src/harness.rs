//! Headless stepping of a [`LiquidWorld`] against its own colliders.

use bevy::color::LinearRgba;
use decant::config::{ObstacleConfig, SceneConfig, VesselConfig};
use decant::{BoxCollider, ColliderScene, LiquidWorld, ObjectId, TickReport, Vessel};
use glam::Vec3;

/// A liquid world plus the collider scene its pours are cast against.
#[derive(Debug, Clone, Default)]
pub struct LiquidScene {
    pub world: LiquidWorld,
    pub colliders: ColliderScene,
    elapsed: f32,
}

impl LiquidScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds every vessel and obstacle in `config`.
    #[must_use]
    pub fn from_config(config: &SceneConfig) -> Self {
        let mut scene = Self::new();
        for vessel in &config.vessels {
            scene.add_vessel(vessel);
        }
        for obstacle in &config.obstacles {
            scene.add_obstacle(obstacle);
        }
        scene
    }

    /// Registers a vessel and a collider sharing its id.
    pub fn add_vessel(&mut self, config: &VesselConfig) -> ObjectId {
        let id = ObjectId(config.id);
        let pose = config.pose.to_pose();
        self.world.insert(id, Vessel::new(id, config));
        self.colliders.insert(
            id,
            BoxCollider::from_pose(&pose, config.collider_half_extents()),
        );
        id
    }

    pub fn add_obstacle(&mut self, config: &ObstacleConfig) -> ObjectId {
        let id = ObjectId(config.id);
        let mut collider =
            BoxCollider::from_pose(&config.pose.to_pose(), Vec3::from_array(config.half_extents));
        collider.is_trigger = config.is_trigger;
        self.colliders.insert(id, collider);
        id
    }

    /// Steps the world once, advancing the scene clock by `delta_seconds`.
    pub fn step(&mut self, delta_seconds: f32) -> TickReport {
        self.elapsed += delta_seconds;
        self.world.step(delta_seconds, self.elapsed, &self.colliders)
    }

    /// Steps `ticks` times and returns every report.
    pub fn run(&mut self, ticks: usize, delta_seconds: f32) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step(delta_seconds)).collect()
    }

    /// Litres held by `id`.
    ///
    /// # Panics
    /// Panics if no vessel is registered under `id`.
    #[must_use]
    pub fn litres(&self, id: ObjectId) -> f32 {
        self.vessel(id).container.fill_amount()
    }

    /// # Panics
    /// Panics if no vessel is registered under `id`.
    #[must_use]
    pub fn fill(&self, id: ObjectId) -> f32 {
        self.vessel(id).container.fill_percent()
    }

    /// # Panics
    /// Panics if no vessel is registered under `id`.
    #[must_use]
    pub fn color(&self, id: ObjectId) -> LinearRgba {
        self.vessel(id).container.color()
    }

    /// # Panics
    /// Panics if no vessel is registered under `id`.
    #[must_use]
    pub fn vessel(&self, id: ObjectId) -> &Vessel {
        self.world
            .get(id)
            .unwrap_or_else(|| panic!("vessel {id:?} not registered"))
    }
}
