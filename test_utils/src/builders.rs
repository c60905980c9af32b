//! Fluent builders for scene configuration used in tests.

use decant::config::{
    ContainerConfig, ObstacleConfig, PoseConfig, SplitConfig, VesselConfig,
};

/// Builds a [`VesselConfig`] for a unit cube holding one litre.
///
/// # Examples
/// ```
/// use test_utils::VesselBuilder;
/// let config = VesselBuilder::new(7).fill(0.25).tipped(90.0).build();
/// assert_eq!(config.id, 7);
/// assert_eq!(config.pose.rotation_degrees, [0.0, 0.0, 90.0]);
/// ```
#[derive(Debug, Clone)]
pub struct VesselBuilder {
    config: VesselConfig,
}

impl VesselBuilder {
    #[must_use]
    pub fn new(id: u64) -> Self {
        Self {
            config: VesselConfig {
                id,
                name: None,
                pose: PoseConfig::default(),
                liquid_half_extents: [0.5; 3],
                collider_half_extents: None,
                container: ContainerConfig {
                    custom_volume: true,
                    volume: 1.0,
                    ..ContainerConfig::default()
                },
                split: SplitConfig::default(),
                endless: false,
            },
        }
    }

    #[must_use]
    pub fn named(mut self, name: &str) -> Self {
        self.config.name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.config.pose.position = [x, y, z];
        self
    }

    /// Rolls the vessel about the world Z axis.
    #[must_use]
    pub fn tipped(mut self, degrees: f32) -> Self {
        self.config.pose.rotation_degrees = [0.0, 0.0, degrees];
        self
    }

    #[must_use]
    pub fn fill(mut self, percent: f32) -> Self {
        self.config.container.fill_percent = percent;
        self
    }

    #[must_use]
    pub fn volume(mut self, litres: f32) -> Self {
        self.config.container.custom_volume = true;
        self.config.container.volume = litres;
        self
    }

    /// Derives the volume from the liquid bounds instead of fixing it.
    #[must_use]
    pub fn derived_volume(mut self) -> Self {
        self.config.container.custom_volume = false;
        self
    }

    #[must_use]
    pub fn color(mut self, rgba: [f32; 4]) -> Self {
        self.config.container.color = rgba;
        self
    }

    #[must_use]
    pub fn closed(mut self) -> Self {
        self.config.container.is_open = false;
        self
    }

    #[must_use]
    pub fn endless(mut self) -> Self {
        self.config.endless = true;
        self
    }

    #[must_use]
    pub fn mixing_speed(mut self, speed: f32) -> Self {
        self.config.split.mixing_speed = speed;
        self
    }

    #[must_use]
    pub fn max_edge_drops(mut self, drops: u32) -> Self {
        self.config.split.max_edge_drops = drops;
        self
    }

    #[must_use]
    pub fn build(self) -> VesselConfig {
        self.config
    }
}

/// Builds an [`ObstacleConfig`] for a slab.
#[derive(Debug, Clone)]
pub struct ObstacleBuilder {
    config: ObstacleConfig,
}

impl ObstacleBuilder {
    #[must_use]
    pub fn new(id: u64, half_extents: [f32; 3]) -> Self {
        Self {
            config: ObstacleConfig {
                id,
                pose: PoseConfig::default(),
                half_extents,
                is_trigger: false,
            },
        }
    }

    #[must_use]
    pub fn at(mut self, x: f32, y: f32, z: f32) -> Self {
        self.config.pose.position = [x, y, z];
        self
    }

    /// Rolls the slab about the world Z axis.
    #[must_use]
    pub fn tilted(mut self, degrees: f32) -> Self {
        self.config.pose.rotation_degrees = [0.0, 0.0, degrees];
        self
    }

    #[must_use]
    pub fn trigger(mut self) -> Self {
        self.config.is_trigger = true;
        self
    }

    #[must_use]
    pub fn build(self) -> ObstacleConfig {
        self.config
    }
}
