//! Registry of vessels stepped together once per tick.
//!
//! [`LiquidWorld`] owns every container and its split controller. Vessels are
//! stepped in insertion order; a pour that lands in another vessel is
//! delivered immediately, so a destination stepped later in the same tick
//! sees the extra liquid now while its own geometry catches up on the next
//! tick.

use bevy::color::LinearRgba;
use bevy::prelude::Resource;
use glam::Vec3;
use hashbrown::{HashMap, HashSet};
use log::debug;

use crate::config::VesselConfig;
use crate::container::{LiquidContainer, Transfer};
use crate::geometry::{Aabb, VesselPose};
use crate::physics::mix_coefficient;
use crate::spatial::{ObjectId, SpatialQuery};
use crate::split::{Pour, SplitController};

/// A container, its controller and the pose it will be stepped with.
#[derive(Debug, Clone)]
pub struct Vessel {
    /// Fill, colour and surface.
    pub container: LiquidContainer,
    /// Pour detection for this vessel's bottleneck.
    pub split: SplitController,
    /// World placement used by the next step.
    pub pose: VesselPose,
    /// Refilled to the brim before every step.
    pub endless: bool,
}

impl Vessel {
    /// Builds a vessel from its scene entry, with its liquid bounds bound.
    #[must_use]
    pub fn new(id: ObjectId, config: &VesselConfig) -> Self {
        let mut container = LiquidContainer::new(&config.container);
        container.bind_liquid_bounds(Some(config.liquid_bounds()));
        Self {
            container,
            split: SplitController::new(id, config.split.clone()),
            pose: config.pose.to_pose(),
            endless: config.endless,
        }
    }

    /// Replaces the pose the vessel is first placed with.
    #[must_use]
    pub const fn with_pose(mut self, pose: VesselPose) -> Self {
        self.pose = pose;
        self
    }

    /// Assembles a vessel from already configured parts.
    #[must_use]
    pub const fn from_parts(
        container: LiquidContainer,
        split: SplitController,
        pose: VesselPose,
    ) -> Self {
        Self {
            container,
            split,
            pose,
            endless: false,
        }
    }
}

/// One-shot splash at a pour position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    /// Vessel that poured.
    pub source: ObjectId,
    /// World-space pour point.
    pub position: Vec3,
    /// Effect size, derived from the flow scale.
    pub scale: f32,
    /// Colour of the poured liquid.
    pub color: LinearRgba,
}

/// Liquid delivered from one vessel into another.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransferRecord {
    /// Vessel that poured.
    pub source: ObjectId,
    /// Vessel the liquid landed in.
    pub destination: ObjectId,
    /// Litres the destination took.
    pub litres: f32,
    /// Colour convergence applied to the destination.
    pub blend: f32,
}

/// Liquid that left a vessel and ended up in no other.
///
/// Raised both for pours that land nowhere and for the excess a full
/// destination could not take.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Loss {
    /// Vessel that poured.
    pub source: ObjectId,
    /// Litres removed from the scene.
    pub litres: f32,
    /// World-space pour point.
    pub position: Vec3,
}

/// What happened during one [`LiquidWorld::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// One per pour, in stepping order.
    pub splashes: Vec<Splash>,
    /// Pours that reached another vessel.
    pub transfers: Vec<TransferRecord>,
    /// Liquid that left the scene.
    pub losses: Vec<Loss>,
}

impl TickReport {
    /// `true` when nothing poured this tick.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.splashes.is_empty() && self.transfers.is_empty() && self.losses.is_empty()
    }
}

#[derive(Resource, Debug, Clone, Default)]
/// Every vessel in the scene, keyed by collider id.
pub struct LiquidWorld {
    vessels: HashMap<ObjectId, Vessel>,
    order: Vec<ObjectId>,
}

impl LiquidWorld {
    /// An empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vessel, replacing any previous one with the same id.
    ///
    /// The vessel is placed and its bottleneck derived straight away so it
    /// can receive liquid on the first tick.
    pub fn insert(&mut self, id: ObjectId, mut vessel: Vessel) {
        vessel.container.place(vessel.pose);
        vessel.split.refresh(&vessel.container);
        if self.vessels.insert(id, vessel).is_none() {
            self.order.push(id);
        }
    }

    /// Unregisters a vessel, returning it if it was known.
    pub fn remove(&mut self, id: ObjectId) -> Option<Vessel> {
        let removed = self.vessels.remove(&id)?;
        self.order.retain(|other| *other != id);
        Some(removed)
    }

    /// Looks up a vessel by id.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&Vessel> {
        self.vessels.get(&id)
    }

    /// Mutable lookup by id.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut Vessel> {
        self.vessels.get_mut(&id)
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: ObjectId) -> bool {
        self.vessels.contains_key(&id)
    }

    /// Ids in stepping order.
    #[must_use]
    pub const fn ids(&self) -> &[ObjectId] {
        self.order.as_slice()
    }

    /// Number of registered vessels.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` when no vessel is registered.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Sets the pose used by the next step. Returns `false` for unknown ids.
    pub fn set_pose(&mut self, id: ObjectId, pose: VesselPose) -> bool {
        self.vessels
            .get_mut(&id)
            .map(|vessel| vessel.pose = pose)
            .is_some()
    }

    /// Rebinds a vessel's liquid geometry. Returns `false` for unknown ids.
    pub fn bind_liquid_bounds(&mut self, id: ObjectId, bounds: Option<Aabb>) -> bool {
        self.vessels
            .get_mut(&id)
            .map(|vessel| vessel.container.bind_liquid_bounds(bounds))
            .is_some()
    }

    /// Litres held across every vessel.
    #[must_use]
    pub fn total_litres(&self) -> f32 {
        self.vessels.values().map(|v| v.container.fill_amount()).sum()
    }

    /// Advances every vessel by one tick.
    pub fn step(
        &mut self,
        delta_seconds: f32,
        elapsed_seconds: f32,
        scene: &dyn SpatialQuery,
    ) -> TickReport {
        let mut report = TickReport::default();
        let receivers: HashSet<ObjectId> = self.vessels.keys().copied().collect();

        for id in self.order.clone() {
            let Some(vessel) = self.vessels.get_mut(&id) else {
                continue;
            };
            if vessel.endless {
                vessel.container.set_fill_percent(1.0);
            }
            vessel
                .container
                .update(vessel.pose, delta_seconds, elapsed_seconds);
            let Some(pour) = vessel
                .split
                .tick(&mut vessel.container, delta_seconds, scene, &receivers)
            else {
                continue;
            };

            report.splashes.push(Splash {
                source: id,
                position: pour.position,
                scale: pour.splash_scale,
                color: pour.color,
            });
            let delivered = self.deliver(&pour);
            let spilled = pour.litres - delivered.map_or(0.0, |record| record.litres);
            report.transfers.extend(delivered);
            if spilled > 0.0 {
                debug!("{spilled:.4} L from {id:?} lost at {}", pour.position);
                report.losses.push(Loss {
                    source: id,
                    litres: spilled,
                    position: pour.position,
                });
            }
        }
        report
    }

    /// Hands a pour to the vessel it landed in.
    ///
    /// The record carries the litres the destination actually took, which is
    /// less than the pour when the destination overflows.
    fn deliver(&mut self, pour: &Pour) -> Option<TransferRecord> {
        let landing = pour.target?;
        let destination = self.vessels.get_mut(&landing.object)?;
        if landing.object == pour.source
            || !destination.split.accepts(landing.point, pour.flow_scale)
        {
            return None;
        }

        let transfer = Transfer {
            litres: pour.litres,
            color: pour.color,
            blend: mix_coefficient(
                pour.split_speed,
                destination.container.volume(),
                pour.mixing_speed,
            ),
        };
        let accepted = destination.container.receive(&transfer);
        debug!(
            "{accepted:.4} of {:.4} L from {:?} into {:?}",
            transfer.litres, pour.source, landing.object
        );
        Some(TransferRecord {
            source: pour.source,
            destination: landing.object,
            litres: accepted,
            blend: transfer.blend,
        })
    }
}
