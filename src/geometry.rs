//! Geometry helpers for liquid surfaces and bottlenecks.
//!
//! Everything here is a pure function or a plain value type. Planes follow a
//! container-relative convention: `normal * distance` is the plane's anchor
//! point measured from the owning container's world origin.
use std::f32::consts::TAU;

use glam::{Quat, Vec3};

use crate::constants::{PARALLEL_EPSILON, RIM_SAMPLES};

/// An oriented plane stored as a unit normal and a signed offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    /// Unit normal, or zero for the empty plane.
    pub normal: Vec3,
    /// Offset along `normal` from the owning container's origin.
    pub distance: f32,
}

impl Plane {
    /// Builds a plane, normalising `normal`.
    ///
    /// A zero or non-finite normal yields the empty plane, which never
    /// intersects anything.
    #[must_use]
    pub fn new(normal: Vec3, distance: f32) -> Self {
        normal
            .try_normalize()
            .map_or_else(Self::default, |unit| Self {
                normal: unit,
                distance,
            })
    }

    /// Anchor point `normal * distance`, relative to the container origin.
    #[must_use]
    pub fn anchor(&self) -> Vec3 {
        self.normal * self.distance
    }

    /// Returns `true` for the empty plane produced when no geometry is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.normal == Vec3::ZERO
    }
}

/// A point and direction on the line shared by two planes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionLine {
    /// A point on the line.
    pub point: Vec3,
    /// Line direction, not normalised.
    pub direction: Vec3,
}

/// Intersects two planes.
///
/// Returns `None` when the normals are parallel within
/// [`PARALLEL_EPSILON`](crate::constants::PARALLEL_EPSILON) or either plane is
/// empty. The returned point is expressed in the same container-relative frame
/// as the planes.
///
/// # Examples
///
/// ```
/// use decant::geometry::{plane_plane_intersection, Plane};
/// use glam::Vec3;
///
/// let floor = Plane::new(Vec3::Y, 1.0);
/// let wall = Plane::new(Vec3::X, 2.0);
/// let line = plane_plane_intersection(&floor, &wall).unwrap();
/// assert!((line.point - Vec3::new(2.0, 1.0, 0.0)).length() < 1e-5);
///
/// assert!(plane_plane_intersection(&floor, &Plane::new(Vec3::Y, 3.0)).is_none());
/// ```
#[must_use]
pub fn plane_plane_intersection(first: &Plane, second: &Plane) -> Option<IntersectionLine> {
    let direction = first.normal.cross(second.normal);
    let towards_line = second.normal.cross(direction);
    let numerator = first.normal.dot(towards_line);
    if numerator.abs() <= PARALLEL_EPSILON {
        return None;
    }

    let first_to_second = first.anchor() - second.anchor();
    let t = first.normal.dot(first_to_second) / numerator;
    Some(IntersectionLine {
        point: second.anchor() + towards_line * t,
        direction,
    })
}

/// Linearly rescales `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Callers guarantee `in_min != in_max`.
///
/// # Examples
///
/// ```
/// use decant::geometry::map_range;
/// assert!((map_range(5.0, 0.0, 10.0, 0.0, 1.0) - 0.5).abs() < f32::EPSILON);
/// ```
#[must_use]
pub const fn map_range(x: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Direction liquid runs along a surface with the given `normal`.
///
/// Returns zero for a surface perpendicular to `up`, where liquid pools
/// instead of running off.
#[must_use]
pub fn slope_direction(up: Vec3, normal: Vec3) -> Vec3 {
    up.cross(normal).cross(normal).normalize_or_zero()
}

/// Lowest world-space point on a rim of `radius` centred at `centre`.
///
/// The rim is sampled at [`RIM_SAMPLES`] fixed angular steps in the frame
/// given by `rotation`; the minimum-height sample wins. This is an
/// approximation and pour positions depend on the sampling step.
#[must_use]
pub fn lowest_rim_point(centre: Vec3, rotation: Quat, radius: f32) -> Vec3 {
    (0..RIM_SAMPLES)
        .map(|step| {
            let angle = f32::from(step) * TAU / f32::from(RIM_SAMPLES);
            centre + rotation * Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius)
        })
        .min_by(|a, b| a.y.total_cmp(&b.y))
        .unwrap_or(centre)
}

/// World placement of a vessel: position, rotation and lossy scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VesselPose {
    /// World position of the vessel origin.
    pub position: Vec3,
    /// World rotation.
    pub rotation: Quat,
    /// Lossy world scale.
    pub scale: Vec3,
}

impl Default for VesselPose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl VesselPose {
    /// Pose with unit scale.
    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// Replaces the scale.
    #[must_use]
    pub const fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// The vessel's local up axis in world space.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Maps a local point into world space (scale, then rotate, then translate).
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * (local * self.scale)
    }
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    min: Vec3,
    max: Vec3,
}

impl Aabb {
    /// Builds a box from two opposite corners in any order.
    #[must_use]
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Builds a box from its centre and half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Lowest corner.
    #[must_use]
    pub const fn min(&self) -> Vec3 {
        self.min
    }

    /// Highest corner.
    #[must_use]
    pub const fn max(&self) -> Vec3 {
        self.max
    }

    /// Midpoint of the box.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Full extent along each axis.
    #[must_use]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grows the box by `margin` on every side.
    #[must_use]
    pub fn inflate(&self, margin: f32) -> Self {
        Self::new(self.min - Vec3::splat(margin), self.max + Vec3::splat(margin))
    }

    /// The eight corners of the box.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// World-space box enclosing this local box under `pose`.
    #[must_use]
    pub fn transformed(&self, pose: &VesselPose) -> Self {
        let mut corners = self.corners().into_iter().map(|c| pose.transform_point(c));
        let first = corners.next().unwrap_or(pose.position);
        let (min, max) = corners.fold((first, first), |(lo, hi), c| (lo.min(c), hi.max(c)));
        Self { min, max }
    }

    /// Squared distance from `point` to the box; zero inside.
    #[must_use]
    pub fn sqr_distance(&self, point: Vec3) -> f32 {
        (point - point.clamp(self.min, self.max)).length_squared()
    }

    /// Slab test for a ray entering the box from outside.
    ///
    /// Returns the entry distance along `direction` and the outward normal of
    /// the entered face. Rays starting inside the box report no hit.
    #[must_use]
    pub fn ray_entry(&self, origin: Vec3, direction: Vec3) -> Option<(f32, Vec3)> {
        let mut t_enter = f32::NEG_INFINITY;
        let mut t_exit = f32::INFINITY;
        let mut normal = Vec3::ZERO;

        let slabs = origin
            .to_array()
            .into_iter()
            .zip(direction.to_array())
            .zip(self.min.to_array().into_iter().zip(self.max.to_array()))
            .zip([Vec3::X, Vec3::Y, Vec3::Z]);
        for (((o, d), (lo, hi)), axis) in slabs {
            if d.abs() <= f32::EPSILON {
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }
            let inv = d.recip();
            let (near, far, face) = if inv >= 0.0 {
                ((lo - o) * inv, (hi - o) * inv, -1.0)
            } else {
                ((hi - o) * inv, (lo - o) * inv, 1.0)
            };
            if near > t_enter {
                t_enter = near;
                normal = axis * face;
            }
            t_exit = t_exit.min(far);
        }

        if t_enter < 0.0 || t_enter > t_exit {
            return None;
        }
        Some((t_enter, normal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case::floor_and_wall(Plane::new(Vec3::Y, 1.0), Plane::new(Vec3::X, 2.0))]
    #[case::tilted(
        Plane::new(Vec3::new(1.0, 1.0, 0.0), 0.5),
        Plane::new(Vec3::Y, -0.25)
    )]
    #[case::skewed(
        Plane::new(Vec3::new(0.3, 1.0, -0.2), 0.7),
        Plane::new(Vec3::new(-0.1, 0.9, 0.4), 0.1)
    )]
    fn intersection_point_lies_on_both_planes(#[case] first: Plane, #[case] second: Plane) {
        let line = plane_plane_intersection(&first, &second).expect("planes intersect");
        assert_relative_eq!(first.normal.dot(line.point), first.distance, epsilon = 1e-4);
        assert_relative_eq!(second.normal.dot(line.point), second.distance, epsilon = 1e-4);
        assert_relative_eq!(line.direction.dot(first.normal), 0.0, epsilon = 1e-5);
        assert_relative_eq!(line.direction.dot(second.normal), 0.0, epsilon = 1e-5);
    }

    #[rstest]
    #[case::same_direction(Plane::new(Vec3::Y, 0.0), Plane::new(Vec3::Y, 1.0))]
    #[case::opposed(Plane::new(Vec3::Y, 0.5), Plane::new(Vec3::NEG_Y, 0.5))]
    #[case::empty(Plane::default(), Plane::new(Vec3::X, 1.0))]
    fn parallel_or_empty_planes_do_not_intersect(#[case] first: Plane, #[case] second: Plane) {
        assert!(plane_plane_intersection(&first, &second).is_none());
    }

    #[rstest]
    fn plane_new_normalises_and_rejects_zero() {
        let plane = Plane::new(Vec3::new(0.0, 2.0, 0.0), 3.0);
        assert_eq!(plane.normal, Vec3::Y);
        assert_eq!(plane.anchor(), Vec3::new(0.0, 3.0, 0.0));
        assert!(Plane::new(Vec3::ZERO, 1.0).is_empty());
    }

    #[rstest]
    #[case(0.0, 0.1)]
    #[case(1.0, 0.99)]
    #[case(0.5, 0.545)]
    fn map_range_matches_fill_band(#[case] fill: f32, #[case] expected: f32) {
        assert_relative_eq!(map_range(fill, 0.0, 1.0, 0.1, 0.99), expected, epsilon = 1e-6);
    }

    #[rstest]
    fn slope_runs_downhill() {
        let normal = Vec3::new(0.5, 1.0, 0.0).normalize();
        let slope = slope_direction(Vec3::Y, normal);
        assert!(slope.x > 0.0);
        assert!(slope.y < 0.0);
        assert_relative_eq!(slope.dot(normal), 0.0, epsilon = 1e-6);
        assert_eq!(slope_direction(Vec3::Y, Vec3::Y), Vec3::ZERO);
    }

    #[rstest]
    fn lowest_rim_point_of_tipped_rim() {
        let rotation = Quat::from_rotation_z(90_f32.to_radians());
        let lowest = lowest_rim_point(Vec3::ZERO, rotation, 1.0);
        assert_relative_eq!(lowest.y, -1.0, epsilon = 1e-5);

        let flat = lowest_rim_point(Vec3::new(0.0, 2.0, 0.0), Quat::IDENTITY, 1.0);
        assert_relative_eq!(flat.y, 2.0, epsilon = 1e-6);
    }

    #[rstest]
    fn aabb_distance_and_transform() {
        let unit = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5));
        assert_eq!(unit.sqr_distance(Vec3::new(0.1, 0.2, 0.3)), 0.0);
        assert_relative_eq!(unit.sqr_distance(Vec3::new(1.5, 0.0, 0.0)), 1.0);

        let pose = VesselPose::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_z(45_f32.to_radians()),
        );
        let world = unit.transformed(&pose);
        let half = 0.5 * std::f32::consts::SQRT_2;
        assert_relative_eq!(world.max().y, 2.0 + half, epsilon = 1e-5);
        assert_relative_eq!(world.center().x, 1.0, epsilon = 1e-5);
    }

    #[rstest]
    fn ray_entry_reports_face_normal() {
        let unit = Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(1.0));
        let (t, normal) = unit
            .ray_entry(Vec3::new(0.2, 5.0, 0.0), Vec3::NEG_Y)
            .expect("ray hits the top face");
        assert_relative_eq!(t, 4.0);
        assert_eq!(normal, Vec3::Y);

        let (side_t, side_normal) = unit
            .ray_entry(Vec3::new(5.0, 0.2, 0.3), Vec3::NEG_X)
            .expect("ray hits the +x face");
        assert_relative_eq!(side_t, 4.0);
        assert_eq!(side_normal, Vec3::X);

        assert!(unit.ray_entry(Vec3::ZERO, Vec3::NEG_Y).is_none());
        assert!(unit.ray_entry(Vec3::new(3.0, 5.0, 0.0), Vec3::NEG_Y).is_none());
        assert!(unit.ray_entry(Vec3::new(0.0, -5.0, 0.0), Vec3::NEG_Y).is_none());
    }
}
