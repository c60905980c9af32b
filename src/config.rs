//! Serde configuration for vessels, obstacles and whole scenes.
//!
//! Values are deserialised from JSON with field defaults matching the tuned
//! behaviour, then sanitised: out-of-range values are clamped and logged
//! rather than rejected, while structural problems (bad JSON, non-finite
//! numbers, unknown references) surface as [`ConfigError`].

use std::fs;
use std::path::{Path, PathBuf};

use glam::{Quat, Vec3};
use hashbrown::HashSet;
use log::warn;
use serde::Deserialize;
use thiserror::Error;

use crate::constants::{
    DEFAULT_BOTTLENECK_RADIUS, DEFAULT_FILL_PERCENT, DEFAULT_INERTNESS, DEFAULT_LIQUID_COLOR,
    DEFAULT_MAX_EDGE_DROPS, DEFAULT_MIXING_SPEED, DEFAULT_SPLIT_SPEED, DEFAULT_VOLUME,
    MAX_MIXING_SPEED, MIN_INERTNESS, MIN_VOLUME,
};
use crate::geometry::{Aabb, VesselPose};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scene file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The text is not a valid scene document.
    #[error("invalid scene JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// A numeric field held `NaN` or an infinity.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending field.
        field: &'static str,
        /// The value found.
        value: f32,
    },
    /// Two scene objects share an id.
    #[error("duplicate object id {0}")]
    DuplicateId(u64),
    /// The scene lists no vessels.
    #[error("scene contains no vessels")]
    EmptyScene,
}

/// Liquid held by one vessel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    /// Capacity in litres; ignored unless `custom_volume` is set.
    pub volume: f32,
    /// Keep `volume` fixed instead of deriving it from the liquid bounds.
    pub custom_volume: bool,
    /// Initial fill level in `[0, 1]`.
    pub fill_percent: f32,
    /// Closed containers never pour.
    pub is_open: bool,
    /// Linear RGBA.
    pub color: [f32; 4],
    /// Damping of the surface wobble; larger is calmer.
    pub inertness: f32,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            volume: DEFAULT_VOLUME,
            custom_volume: false,
            fill_percent: DEFAULT_FILL_PERCENT,
            is_open: true,
            color: DEFAULT_LIQUID_COLOR,
            inertness: DEFAULT_INERTNESS,
        }
    }
}

impl ContainerConfig {
    /// Clamps every field into its usable range.
    pub fn sanitize(&mut self) -> Result<(), ConfigError> {
        finite("volume", self.volume)?;
        finite("fill_percent", self.fill_percent)?;
        finite("inertness", self.inertness)?;
        for channel in self.color {
            finite("color", channel)?;
        }

        if self.volume < MIN_VOLUME {
            warn!("volume {} below floor, clamping to {MIN_VOLUME}", self.volume);
            self.volume = MIN_VOLUME;
        }
        if !(0.0..=1.0).contains(&self.fill_percent) {
            warn!("fill_percent {} outside [0, 1], clamping", self.fill_percent);
            self.fill_percent = self.fill_percent.clamp(0.0, 1.0);
        }
        if self.inertness < MIN_INERTNESS {
            warn!("inertness {} below floor, clamping to {MIN_INERTNESS}", self.inertness);
            self.inertness = MIN_INERTNESS;
        }
        Ok(())
    }
}

/// Pour behaviour of one vessel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SplitConfig {
    /// Local radius of the opening.
    pub bottleneck_radius: f32,
    /// Pour rate multiplier.
    pub split_speed: f32,
    /// Upper bound on obstacle edges followed during one landing search.
    pub max_edge_drops: u32,
    /// Colour convergence factor applied to destinations.
    pub mixing_speed: f32,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            bottleneck_radius: DEFAULT_BOTTLENECK_RADIUS,
            split_speed: DEFAULT_SPLIT_SPEED,
            max_edge_drops: DEFAULT_MAX_EDGE_DROPS,
            mixing_speed: DEFAULT_MIXING_SPEED,
        }
    }
}

impl SplitConfig {
    /// Clamps every field into its usable range.
    pub fn sanitize(&mut self) -> Result<(), ConfigError> {
        finite("bottleneck_radius", self.bottleneck_radius)?;
        finite("split_speed", self.split_speed)?;
        finite("mixing_speed", self.mixing_speed)?;

        if self.bottleneck_radius < 0.0 {
            warn!("negative bottleneck_radius {}, clamping to 0", self.bottleneck_radius);
            self.bottleneck_radius = 0.0;
        }
        if self.split_speed < 0.0 {
            warn!("negative split_speed {}, clamping to 0", self.split_speed);
            self.split_speed = 0.0;
        }
        if !(0.0..=MAX_MIXING_SPEED).contains(&self.mixing_speed) {
            warn!("mixing_speed {} outside [0, {MAX_MIXING_SPEED}], clamping", self.mixing_speed);
            self.mixing_speed = self.mixing_speed.clamp(0.0, MAX_MIXING_SPEED);
        }
        Ok(())
    }
}

/// World placement as written in scene files.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoseConfig {
    /// World position.
    pub position: [f32; 3],
    /// Euler rotation in degrees, applied X then Y then Z.
    pub rotation_degrees: [f32; 3],
    /// Per-axis scale.
    pub scale: [f32; 3],
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            rotation_degrees: [0.0; 3],
            scale: [1.0; 3],
        }
    }
}

impl PoseConfig {
    /// Rotation as a quaternion.
    #[must_use]
    pub fn rotation(&self) -> Quat {
        let [x, y, z] = self.rotation_degrees;
        Quat::from_euler(
            glam::EulerRot::ZYX,
            z.to_radians(),
            y.to_radians(),
            x.to_radians(),
        )
    }

    /// The pose this entry places an object at.
    #[must_use]
    pub fn to_pose(&self) -> VesselPose {
        VesselPose::new(Vec3::from_array(self.position), self.rotation())
            .with_scale(Vec3::from_array(self.scale))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for value in self
            .position
            .iter()
            .chain(&self.rotation_degrees)
            .chain(&self.scale)
        {
            finite("pose", *value)?;
        }
        Ok(())
    }
}

/// One vessel in a scene file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VesselConfig {
    /// Scene-wide object id.
    pub id: u64,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Initial placement.
    #[serde(default)]
    pub pose: PoseConfig,
    /// Half extents of the liquid-bearing box in local space.
    pub liquid_half_extents: [f32; 3],
    /// Half extents of the vessel's collider; defaults to the liquid box.
    #[serde(default)]
    pub collider_half_extents: Option<[f32; 3]>,
    /// Liquid settings.
    #[serde(default)]
    pub container: ContainerConfig,
    /// Pour settings.
    #[serde(default)]
    pub split: SplitConfig,
    /// Refill to the brim every tick.
    #[serde(default)]
    pub endless: bool,
}

impl VesselConfig {
    /// Liquid bounds centred on the vessel origin.
    #[must_use]
    pub fn liquid_bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::from_array(self.liquid_half_extents))
    }

    /// Collider half extents, falling back to the liquid box.
    #[must_use]
    pub fn collider_half_extents(&self) -> Vec3 {
        Vec3::from_array(
            self.collider_half_extents
                .unwrap_or(self.liquid_half_extents),
        )
    }

    /// Display name, falling back to the numeric id.
    #[must_use]
    pub fn label(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("vessel-{}", self.id))
    }
}

/// A static obstacle liquid can run along.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ObstacleConfig {
    /// Scene-wide object id.
    pub id: u64,
    /// Placement.
    #[serde(default)]
    pub pose: PoseConfig,
    /// Half size of the box collider.
    pub half_extents: [f32; 3],
    /// Trigger volumes never stop liquid.
    #[serde(default)]
    pub is_trigger: bool,
}

/// A whole scene: vessels plus obstacles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// At least one vessel.
    pub vessels: Vec<VesselConfig>,
    /// Static colliders.
    #[serde(default)]
    pub obstacles: Vec<ObstacleConfig>,
}

impl SceneConfig {
    /// Parses and sanitises a scene.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON, non-finite numbers, duplicate ids or a scene
    /// without vessels.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant::config::SceneConfig;
    ///
    /// let scene = SceneConfig::from_json_str(
    ///     r#"{ "vessels": [ { "id": 1, "liquid_half_extents": [0.5, 0.5, 0.5] } ] }"#,
    /// )
    /// .unwrap();
    /// assert_eq!(scene.vessels.len(), 1);
    /// assert_eq!(scene.vessels[0].split.max_edge_drops, 4);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let mut scene: Self = serde_json::from_str(json)?;
        scene.sanitize()?;
        Ok(scene)
    }

    /// Reads and parses a scene file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] when the file cannot be read, otherwise whatever
    /// [`Self::from_json_str`] reports.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let file = path.as_ref();
        let json = fs::read_to_string(file).map_err(|source| ConfigError::Io {
            path: file.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    fn sanitize(&mut self) -> Result<(), ConfigError> {
        if self.vessels.is_empty() {
            return Err(ConfigError::EmptyScene);
        }

        let mut seen = HashSet::new();
        for vessel in &mut self.vessels {
            if !seen.insert(vessel.id) {
                return Err(ConfigError::DuplicateId(vessel.id));
            }
            vessel.pose.validate()?;
            for value in vessel
                .liquid_half_extents
                .iter()
                .chain(vessel.collider_half_extents.iter().flatten())
            {
                finite("half_extents", *value)?;
            }
            vessel.container.sanitize()?;
            vessel.split.sanitize()?;
        }
        for obstacle in &self.obstacles {
            if !seen.insert(obstacle.id) {
                return Err(ConfigError::DuplicateId(obstacle.id));
            }
            obstacle.pose.validate()?;
            for value in obstacle.half_extents {
                finite("half_extents", value)?;
            }
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFinite { field, value })
    }
}
