//! ECS component types used by the liquid systems.
//! Includes scene identifiers, vessel configuration, collider shapes and the
//! state mirrored back from the simulation each frame.
use bevy::color::LinearRgba;
use bevy::prelude::*;

use crate::config::{ContainerConfig, SplitConfig};
use crate::container::RenderParams;
use crate::geometry::{Aabb, VesselPose};
use crate::spatial::ObjectId;

/// Identity shared by a scene object's collider and, for vessels, its liquid.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(pub u64);

impl SceneId {
    /// The id used by the collider scene and the liquid world.
    #[must_use]
    pub const fn object(self) -> ObjectId {
        ObjectId(self.0)
    }
}

/// Marks an entity as a liquid vessel and carries its configuration.
///
/// The configuration is read once when the vessel is registered; runtime
/// changes go through [`LiquidInbox`](crate::liquid_sync::LiquidInbox).
#[derive(Component, Debug, Clone, Default, PartialEq)]
#[require(LiquidState, LiquidRender)]
pub struct LiquidVessel {
    /// Initial fill, colour and capacity.
    pub container: ContainerConfig,
    /// Pour tuning.
    pub split: SplitConfig,
    /// Refill to the brim every tick.
    pub endless: bool,
}

/// Local bounds of the vessel's liquid-bearing geometry.
#[derive(Component, Debug, Clone, Copy, PartialEq, Deref)]
pub struct LiquidMesh(pub Aabb);

/// Box collider in the entity's local space.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    /// Half size along each local axis, before scale.
    pub half_extents: Vec3,
    /// Triggers are ignored by the landing search.
    pub is_trigger: bool,
}

impl Collider {
    /// A collider liquid can land on.
    #[must_use]
    pub const fn solid(half_extents: Vec3) -> Self {
        Self {
            half_extents,
            is_trigger: false,
        }
    }
}

/// Simulation values mirrored onto the vessel entity after every step.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct LiquidState {
    /// Fill level in `[0, 1]`.
    pub fill_percent: f32,
    /// Fill level in litres.
    pub litres: f32,
    /// Capacity in litres.
    pub volume: f32,
    /// Whether the vessel poured during the last step.
    pub is_splitting: bool,
    /// Current liquid colour.
    pub color: LinearRgba,
}

/// Values consumed by whatever renders the liquid.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Deref)]
pub struct LiquidRender(pub RenderParams);

/// Reads a vessel pose from a local transform.
#[must_use]
pub fn pose_from_transform(transform: &Transform) -> VesselPose {
    VesselPose::new(transform.translation, transform.rotation).with_scale(transform.scale)
}

/// Builds a transform placing an entity at `pose`.
#[must_use]
pub fn transform_from_pose(pose: &VesselPose) -> Transform {
    Transform {
        translation: pose.position,
        rotation: pose.rotation,
        scale: pose.scale,
    }
}
