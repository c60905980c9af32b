//! A small box-collider scene answering [`SpatialQuery`] casts.
//!
//! Colliders are oriented boxes. Ray casts run a slab test in each box's
//! local frame; sphere casts do the same against the box grown by the sweep
//! radius, which is exact on faces and slightly generous at edges and
//! corners. Rays that start inside a box do not report it.

use bevy::prelude::Resource;
use glam::{Quat, Vec3};
use hashbrown::HashMap;

use crate::geometry::{Aabb, VesselPose};
use crate::spatial::{ObjectId, Ray, RayHit, SpatialQuery};

/// An oriented box collider.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxCollider {
    /// World-space centre.
    pub centre: Vec3,
    /// Half size along each local axis, already scaled.
    pub half_extents: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Reported by casts but never stops liquid.
    pub is_trigger: bool,
}

impl BoxCollider {
    /// A solid box; negative extents are taken as their magnitude.
    #[must_use]
    pub fn new(centre: Vec3, half_extents: Vec3, rotation: Quat) -> Self {
        Self {
            centre,
            half_extents: half_extents.abs(),
            rotation,
            is_trigger: false,
        }
    }

    /// Collider matching a vessel's pose, with `half_extents` in local units.
    #[must_use]
    pub fn from_pose(pose: &VesselPose, half_extents: Vec3) -> Self {
        Self::new(pose.position, half_extents * pose.scale, pose.rotation)
    }

    /// Marks the collider as a trigger volume.
    #[must_use]
    pub const fn trigger(mut self) -> Self {
        self.is_trigger = true;
        self
    }

    /// World-space axis-aligned bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, self.half_extents)
            .transformed(&VesselPose::new(self.centre, self.rotation))
    }

    /// Entry distance and outward world normal of `ray` against this box
    /// grown by `margin`.
    fn cast(&self, ray: Ray, margin: f32) -> Option<(f32, Vec3)> {
        let inverse = self.rotation.inverse();
        let origin = inverse * (ray.origin - self.centre);
        let direction = inverse * ray.direction;
        let local = Aabb::from_center_half_extents(Vec3::ZERO, self.half_extents).inflate(margin);
        local
            .ray_entry(origin, direction)
            .map(|(distance, normal)| (distance, self.rotation * normal))
    }
}

/// Box colliders keyed by object id.
#[derive(Resource, Debug, Clone, Default)]
pub struct ColliderScene {
    colliders: HashMap<ObjectId, BoxCollider>,
}

impl ColliderScene {
    /// An empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the collider for `id`.
    pub fn insert(&mut self, id: ObjectId, collider: BoxCollider) -> Option<BoxCollider> {
        self.colliders.insert(id, collider)
    }

    /// Removes the collider for `id`.
    pub fn remove(&mut self, id: ObjectId) -> Option<BoxCollider> {
        self.colliders.remove(&id)
    }

    /// Collider registered for `id`.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&BoxCollider> {
        self.colliders.get(&id)
    }

    /// Removes every collider.
    pub fn clear(&mut self) {
        self.colliders.clear();
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// `true` when the scene holds no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    fn cast_all(&self, ray: Ray, radius: f32) -> Vec<RayHit> {
        if ray.direction == Vec3::ZERO {
            return Vec::new();
        }
        self.colliders
            .iter()
            .filter_map(|(&object, collider)| {
                let (distance, normal) = collider.cast(ray, radius)?;
                Some(RayHit {
                    point: ray.at(distance) - normal * radius,
                    normal,
                    distance,
                    object,
                    is_trigger: collider.is_trigger,
                })
            })
            .collect()
    }
}

impl SpatialQuery for ColliderScene {
    fn sphere_cast_all(&self, ray: Ray, radius: f32) -> Vec<RayHit> {
        self.cast_all(ray, radius.max(0.0))
    }

    fn ray_cast_all(&self, ray: Ray) -> Vec<RayHit> {
        self.cast_all(ray, 0.0)
    }

    fn bounds_of(&self, object: ObjectId) -> Option<Aabb> {
        self.colliders.get(&object).map(BoxCollider::bounds)
    }
}
