//! Overflow detection and the landing search for poured liquid.
//!
//! A [`SplitController`] watches one container's opening. Each tick it
//! refreshes the bottleneck geometry from the container, tests whether the
//! liquid surface crosses the opening and, if it does, removes a step of
//! liquid from the container and searches downward for where it lands. The
//! controller never touches the destination itself: it returns a [`Pour`]
//! and leaves delivery to the owner of both vessels.

use bevy::color::LinearRgba;
use glam::Vec3;
use log::{debug, trace};

use crate::config::SplitConfig;
use crate::constants::{EDGE_CAST_DROP, IN_BOUNDS_EPSILON_SQ, SPLASH_SIZE};
use crate::container::LiquidContainer;
use crate::geometry::{lowest_rim_point, plane_plane_intersection, slope_direction, Aabb, Plane};
use crate::physics::{flow_scale, liquid_step, splash_reach};
use crate::spatial::{sort_by_distance, ObjectId, Ray, RayHit, SpatialQuery, VesselLookup};

/// Everything that happened during one pour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pour {
    /// Vessel the liquid left.
    pub source: ObjectId,
    /// World-space point the liquid leaves the source from.
    pub position: Vec3,
    /// Tilt-derived flow multiplier, never below
    /// [`FLOW_SCALE_FLOOR`](crate::constants::FLOW_SCALE_FLOOR).
    pub flow_scale: f32,
    /// Share of the source's fill removed.
    pub liquid_step: f32,
    /// Litres removed from the source.
    pub litres: f32,
    /// Source colour at the time of the pour.
    pub color: LinearRgba,
    /// Size of the splash effect.
    pub splash_scale: f32,
    /// Source pour rate, feeding the destination's mix coefficient.
    pub split_speed: f32,
    /// Source mixing speed, feeding the destination's mix coefficient.
    pub mixing_speed: f32,
    /// First vessel struck by the landing search, if any.
    pub target: Option<RayHit>,
}

/// Pour-point tracking and transport for one container.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitController {
    id: ObjectId,
    config: SplitConfig,
    radius_world: f32,
    bottleneck_plane: Plane,
    bottleneck_pos: Vec3,
    surface_plane: Plane,
    is_splitting: bool,
    current_drop: u32,
    checked: bool,
}

impl SplitController {
    /// Creates a controller for the vessel whose collider is `id`.
    #[must_use]
    pub fn new(id: ObjectId, config: SplitConfig) -> Self {
        Self {
            id,
            config,
            radius_world: 0.0,
            bottleneck_plane: Plane::default(),
            bottleneck_pos: Vec3::ZERO,
            surface_plane: Plane::default(),
            is_splitting: false,
            current_drop: 0,
            checked: false,
        }
    }

    /// Collider id of the vessel this controller watches.
    #[must_use]
    pub const fn id(&self) -> ObjectId {
        self.id
    }

    /// Pour tuning.
    #[must_use]
    pub const fn config(&self) -> &SplitConfig {
        &self.config
    }

    /// Whether a pour started during the current tick.
    #[must_use]
    pub const fn is_splitting(&self) -> bool {
        self.is_splitting
    }

    /// Plane of the opening, relative to the vessel origin.
    #[must_use]
    pub const fn bottleneck_plane(&self) -> Plane {
        self.bottleneck_plane
    }

    /// World-space centre of the opening.
    #[must_use]
    pub const fn bottleneck_pos(&self) -> Vec3 {
        self.bottleneck_pos
    }

    /// Opening radius after scale.
    #[must_use]
    pub const fn radius_world(&self) -> f32 {
        self.radius_world
    }

    /// Liquid surface captured at the last refresh.
    #[must_use]
    pub const fn surface_plane(&self) -> Plane {
        self.surface_plane
    }

    /// Obstacle edges followed by the latest landing search.
    #[must_use]
    pub const fn current_drop(&self) -> u32 {
        self.current_drop
    }

    /// Re-derives the bottleneck and surface from `container` and starts a
    /// new tick.
    pub fn refresh(&mut self, container: &LiquidContainer) {
        let pose = container.pose();
        self.bottleneck_plane = container.liquid_bounds().map_or_else(Plane::default, |bounds| {
            Plane::new(pose.up(), bounds.max().y * pose.scale.y)
        });
        self.bottleneck_pos = self.bottleneck_plane.anchor() + pose.position;
        self.surface_plane = container.generate_surface_plane();
        self.radius_world = self.config.bottleneck_radius * pose.scale.length();
        self.current_drop = 0;
        self.is_splitting = false;
        self.checked = false;
    }

    /// Refreshes geometry and runs the overflow test for one tick.
    pub fn tick(
        &mut self,
        container: &mut LiquidContainer,
        delta_seconds: f32,
        scene: &dyn SpatialQuery,
        vessels: &dyn VesselLookup,
    ) -> Option<Pour> {
        self.refresh(container);
        self.check_splitting(container, delta_seconds, scene, vessels)
    }

    /// Tests for overflow and pours at most once per tick.
    ///
    /// Returns the pour performed by this call. Repeating the call before the
    /// next [`refresh`](Self::refresh) leaves [`is_splitting`](Self::is_splitting)
    /// unchanged and pours nothing.
    pub fn check_splitting(
        &mut self,
        container: &mut LiquidContainer,
        delta_seconds: f32,
        scene: &dyn SpatialQuery,
        vessels: &dyn VesselLookup,
    ) -> Option<Pour> {
        if self.checked {
            return None;
        }
        self.checked = true;
        self.is_splitting = false;

        if container.fill_percent() <= 0.0 || !container.is_open() {
            return None;
        }

        let position = self.pour_position(container)?;
        Some(self.split_logic(container, position, delta_seconds, scene, vessels))
    }

    /// Whether liquid landing at `landing` enters this controller's opening.
    #[must_use]
    pub fn accepts(&self, landing: Vec3, flow_scale: f32) -> bool {
        landing.distance(self.bottleneck_pos) < splash_reach(self.radius_world, flow_scale)
    }

    fn pour_position(&self, container: &LiquidContainer) -> Option<Vec3> {
        let pose = container.pose();
        let line = plane_plane_intersection(&self.bottleneck_plane, &self.surface_plane);
        let overflow_point = line.map_or(Vec3::ZERO, |l| l.point) + pose.position;
        let rim = || lowest_rim_point(self.bottleneck_pos, pose.rotation, self.radius_world);

        if line.is_some() && overflow_point.distance(self.bottleneck_pos) < self.radius_world {
            return Some(rim());
        }
        if self.bottleneck_pos.y >= overflow_point.y {
            return None;
        }

        // Opening sits below the overflow point: the container is upside down.
        if self.bottleneck_plane.normal.dot(self.surface_plane.normal) < 0.0 {
            return Some(self.bottleneck_pos);
        }
        let in_bounds = container
            .world_liquid_bounds()
            .is_some_and(|bounds| bounds.sqr_distance(overflow_point) < IN_BOUNDS_EPSILON_SQ);
        in_bounds.then(rim)
    }

    fn split_logic(
        &mut self,
        container: &mut LiquidContainer,
        position: Vec3,
        delta_seconds: f32,
        scene: &dyn SpatialQuery,
        vessels: &dyn VesselLookup,
    ) -> Pour {
        self.is_splitting = true;

        let flow = flow_scale(container.pose().up());
        let step = liquid_step(
            self.radius_world,
            self.config.split_speed,
            delta_seconds,
            flow,
            container.fill_percent(),
        );
        container.set_fill_percent(container.fill_percent() - step);

        let target = self.find_liquid_container(position, scene, vessels);
        Pour {
            source: self.id,
            position,
            flow_scale: flow,
            liquid_step: step,
            litres: container.volume() * step,
            color: container.color(),
            splash_scale: self.radius_world * flow,
            split_speed: self.config.split_speed,
            mixing_speed: self.config.mixing_speed,
            target,
        }
    }

    /// Follows the liquid down from `start` until it reaches a vessel, runs
    /// out of obstacle edges or falls into nothing.
    fn find_liquid_container(
        &mut self,
        start: Vec3,
        scene: &dyn SpatialQuery,
        vessels: &dyn VesselLookup,
    ) -> Option<RayHit> {
        let mut origin = start;
        let mut ignored = None;

        loop {
            let mut hits = scene.sphere_cast_all(Ray::new(origin, Vec3::NEG_Y), SPLASH_SIZE);
            sort_by_distance(&mut hits);
            let hit = hits.into_iter().find(|candidate| {
                candidate.object != self.id
                    && Some(candidate.object) != ignored
                    && !candidate.is_trigger
            })?;

            if vessels.is_vessel(hit.object) {
                trace!("pour from {:?} lands on vessel {:?}", self.id, hit.object);
                return Some(hit);
            }
            if self.current_drop >= self.config.max_edge_drops {
                debug!(
                    "pour from {:?} dried up after {} edge drops",
                    self.id, self.current_drop
                );
                return None;
            }

            let slope = slope_direction(Vec3::Y, hit.normal);
            let edge = slope_edge(slope, &hit, scene)?;
            self.current_drop += 1;
            trace!("pour from {:?} runs off {:?} at {edge}", self.id, hit.object);
            origin = edge;
            ignored = Some(hit.object);
        }
    }
}

/// Locates where liquid running along `slope` leaves the struck obstacle.
///
/// Casts back toward the obstacle from just outside its bounds; the first
/// contact with the same object is the edge.
fn slope_edge(slope: Vec3, hit: &RayHit, scene: &dyn SpatialQuery) -> Option<Vec3> {
    if slope == Vec3::ZERO {
        return None;
    }
    let bounds = scene.bounds_of(hit.object)?;
    let reach = ideal_cast_distance(&bounds, hit.point, slope);
    let start = hit.point + Vec3::new(0.0, -EDGE_CAST_DROP, 0.0) + slope * reach;

    let mut hits = scene.ray_cast_all(Ray::new(start, -slope));
    sort_by_distance(&mut hits);
    hits.into_iter()
        .find(|back| back.object == hit.object)
        .map(|back| back.point)
}

/// Distance from `point` to the bounds corner lying furthest along `slope`.
fn ideal_cast_distance(bounds: &Aabb, point: Vec3, slope: Vec3) -> f32 {
    let corner = Vec3::select(slope.cmpgt(Vec3::ZERO), bounds.max(), bounds.min());
    point.distance(corner)
}
