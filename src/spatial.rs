//! Contracts for the scene queries the transport step depends on.
//!
//! The simulation never owns colliders. It asks a [`SpatialQuery`] for ray and
//! sphere casts, and identifies struck objects by [`ObjectId`] so it can skip
//! itself and match the same obstacle again during edge searches.

use glam::Vec3;
use hashbrown::HashSet;
use ordered_float::OrderedFloat;

use crate::geometry::Aabb;

/// Opaque identity of a scene object; vessels share the id of their collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(pub u64);

impl From<u64> for ObjectId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl ObjectId {
    /// The raw id.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction, or zero for a degenerate ray.
    pub direction: Vec3,
}

impl Ray {
    /// Builds a ray, normalising `direction` (zero stays zero).
    #[must_use]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point `distance` along the ray.
    #[must_use]
    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// One surface struck by a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Contact point on the struck surface.
    pub point: Vec3,
    /// Outward surface normal at the contact.
    pub normal: Vec3,
    /// Distance travelled along the ray before contact.
    pub distance: f32,
    /// Object whose collider was struck.
    pub object: ObjectId,
    /// Trigger volumes are reported but never stop liquid.
    pub is_trigger: bool,
}

/// Scene query provider used by the landing search.
///
/// Implementations report every struck object; ordering is not required.
#[cfg_attr(test, mockall::automock)]
pub trait SpatialQuery {
    /// Sweeps a sphere of `radius` along `ray`.
    fn sphere_cast_all(&self, ray: Ray, radius: f32) -> Vec<RayHit>;
    /// Casts an infinitely thin ray.
    fn ray_cast_all(&self, ray: Ray) -> Vec<RayHit>;
    /// World-space bounds of an object's collider.
    fn bounds_of(&self, object: ObjectId) -> Option<Aabb>;
}

/// Answers whether a struck object is a vessel that can receive liquid.
pub trait VesselLookup {
    /// `true` when `object` is a registered vessel.
    fn is_vessel(&self, object: ObjectId) -> bool;
}

impl<S: std::hash::BuildHasher> VesselLookup for HashSet<ObjectId, S> {
    fn is_vessel(&self, object: ObjectId) -> bool {
        self.contains(&object)
    }
}

/// Orders hits nearest first.
pub fn sort_by_distance(hits: &mut [RayHit]) {
    hits.sort_by_key(|hit| OrderedFloat(hit.distance));
}
