//! Liquid container state: fill level, volume, colour and surface plane.
//!
//! A [`LiquidContainer`] owns everything about the liquid inside one vessel.
//! Each tick it receives the vessel's pose, recomputes the world-space surface
//! and, unless its volume is fixed, re-derives the volume from the bound
//! liquid geometry. Without bound geometry it stays inert: zero volume, an
//! empty surface plane and a hidden render.

use bevy::color::{LinearRgba, Mix};
use glam::Vec3;
use log::debug;

use crate::config::ContainerConfig;
use crate::constants::{
    MAX_FILL_LEVEL, MIN_FILL_LEVEL, TILT_SURFACE_BIAS, WOBBLE_ROTATION_COEFFICIENT,
};
use crate::geometry::{map_range, Aabb, Plane, VesselPose};
use crate::physics::bounds_volume_litres;

/// Plain values handed to the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderParams {
    /// Liquid surface relative to the vessel position.
    pub surface_plane: Plane,
    /// World-space centre of the liquid surface.
    pub surface_level: Vec3,
    /// Gravity after wobble, for shading the surface.
    pub gravity_direction: Vec3,
    /// Liquid colour.
    pub color: LinearRgba,
    /// Cleared when the container is empty or has no liquid geometry.
    pub visible: bool,
    /// Set while the container is closed.
    pub cap_visible: bool,
}

/// Liquid arriving from another vessel's pour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transfer {
    /// Litres poured.
    pub litres: f32,
    /// Colour of the poured liquid.
    pub color: LinearRgba,
    /// Lerp factor toward `color`, already clamped to `[0, 1]`.
    pub blend: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct Wobble {
    last_position: Vec3,
    last_up: Vec3,
    accumulated: Vec3,
}

impl Wobble {
    fn reset(&mut self, pose: &VesselPose) {
        self.last_position = pose.position;
        self.last_up = pose.up();
        self.accumulated = Vec3::ZERO;
    }

    fn advance(
        &mut self,
        pose: &VesselPose,
        delta_seconds: f32,
        elapsed_seconds: f32,
        inertness: f32,
    ) -> Vec3 {
        let up = pose.up();
        let velocity = (pose.position - self.last_position) / delta_seconds;
        let spin = (up - self.last_up) / delta_seconds;
        self.accumulated += velocity + spin * WOBBLE_ROTATION_COEFFICIENT;
        self.accumulated = self.accumulated.lerp(Vec3::ZERO, delta_seconds.min(1.0));
        self.last_position = pose.position;
        self.last_up = up;

        let wave = (std::f32::consts::TAU * elapsed_seconds).sin() / inertness;
        self.accumulated * wave
    }
}

/// One vessel's liquid.
#[derive(Debug, Clone, PartialEq)]
pub struct LiquidContainer {
    volume: f32,
    custom_volume: bool,
    fill_percent: f32,
    is_open: bool,
    color: LinearRgba,
    inertness: f32,
    gravity_direction: Vec3,
    surface_level: Vec3,
    visible: bool,
    liquid_bounds: Option<Aabb>,
    pose: VesselPose,
    wobble: Wobble,
}

impl LiquidContainer {
    /// Creates a container from validated configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use decant::config::ContainerConfig;
    /// use decant::container::LiquidContainer;
    ///
    /// let mut container = LiquidContainer::new(&ContainerConfig::default());
    /// container.set_fill_amount(0.25);
    /// assert!((container.fill_percent() - 0.25).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn new(config: &ContainerConfig) -> Self {
        let [red, green, blue, alpha] = config.color;
        Self {
            volume: config.volume,
            custom_volume: config.custom_volume,
            fill_percent: config.fill_percent.clamp(0.0, 1.0),
            is_open: config.is_open,
            color: LinearRgba::new(red, green, blue, alpha),
            inertness: config.inertness,
            gravity_direction: Vec3::NEG_Y,
            surface_level: Vec3::ZERO,
            visible: false,
            liquid_bounds: None,
            pose: VesselPose::default(),
            wobble: Wobble::default(),
        }
    }

    /// Binds or unbinds the local bounds of the liquid-bearing geometry.
    pub fn bind_liquid_bounds(&mut self, bounds: Option<Aabb>) {
        self.liquid_bounds = bounds;
        self.refresh_surface();
    }

    /// Local bounds of the liquid geometry, if bound.
    #[must_use]
    pub const fn liquid_bounds(&self) -> Option<Aabb> {
        self.liquid_bounds
    }

    /// World-space bounds of the liquid geometry under the current pose.
    #[must_use]
    pub fn world_liquid_bounds(&self) -> Option<Aabb> {
        self.liquid_bounds.map(|b| b.transformed(&self.pose))
    }

    /// Pose from the last update or placement.
    #[must_use]
    pub const fn pose(&self) -> &VesselPose {
        &self.pose
    }

    /// Places the container without advancing time.
    ///
    /// Also re-seeds the wobble so the jump does not register as motion.
    pub fn place(&mut self, pose: VesselPose) {
        self.pose = pose;
        self.wobble.reset(&pose);
        if !self.custom_volume {
            self.volume = self.calculate_volume();
        }
        self.refresh_surface();
    }

    /// Per-tick update: surface, derived volume and wobble.
    pub fn update(&mut self, pose: VesselPose, delta_seconds: f32, elapsed_seconds: f32) {
        self.pose = pose;
        self.refresh_surface();
        if self.liquid_bounds.is_none() {
            return;
        }

        if !self.custom_volume {
            self.volume = self.calculate_volume();
        }
        if delta_seconds > 0.0 {
            self.update_wobble(delta_seconds, elapsed_seconds);
        }
    }

    /// Fill level in `[0, 1]`.
    #[must_use]
    pub const fn fill_percent(&self) -> f32 {
        self.fill_percent
    }

    /// Sets the fill level and recomputes the surface.
    ///
    /// Values at or below zero (and `NaN`) empty the container, which hides
    /// the render; values above one fill it.
    pub fn set_fill_percent(&mut self, percent: f32) {
        self.fill_percent = if percent > 0.0 { percent.min(1.0) } else { 0.0 };
        self.refresh_surface();
    }

    /// Fill level in litres.
    #[must_use]
    pub const fn fill_amount(&self) -> f32 {
        self.fill_percent * self.volume
    }

    /// Sets the fill level in litres, clamped to the container's capacity.
    ///
    /// The surface catches up on the next [`update`](Self::update).
    pub fn set_fill_amount(&mut self, litres: f32) {
        if self.volume <= 0.0 {
            debug!("ignoring fill amount {litres} for a container without volume");
            return;
        }
        let percent = litres / self.volume;
        self.fill_percent = if percent > 0.0 { percent.min(1.0) } else { 0.0 };
    }

    /// Accepts liquid poured in by another vessel.
    ///
    /// Returns the litres that fit; anything beyond the brim is not taken.
    pub fn receive(&mut self, transfer: &Transfer) -> f32 {
        let room = (self.volume - self.fill_amount()).max(0.0);
        let accepted = transfer.litres.clamp(0.0, room);
        if accepted > 0.0 {
            self.set_fill_amount(self.fill_amount() + accepted);
        }
        self.color = self.color.mix(&transfer.color, transfer.blend);
        accepted
    }

    /// Capacity in litres.
    #[must_use]
    pub const fn volume(&self) -> f32 {
        self.volume
    }

    /// Whether the volume is fixed rather than derived from geometry.
    #[must_use]
    pub const fn custom_volume(&self) -> bool {
        self.custom_volume
    }

    /// Fixes the volume, disabling derivation from geometry.
    pub const fn set_volume(&mut self, litres: f32) {
        self.custom_volume = true;
        self.volume = litres.max(crate::constants::MIN_VOLUME);
    }

    /// Volume of the liquid geometry's bounding box in litres, or zero when
    /// nothing is bound.
    #[must_use]
    pub fn calculate_volume(&self) -> f32 {
        self.liquid_bounds
            .map_or(0.0, |b| bounds_volume_litres(b.size(), self.pose.scale))
    }

    /// Closed containers never pour.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.is_open
    }

    /// Opens or closes the container; closing shows the cap.
    pub const fn set_open(&mut self, open: bool) {
        self.is_open = open;
    }

    /// Liquid colour.
    #[must_use]
    pub const fn color(&self) -> LinearRgba {
        self.color
    }

    /// Replaces the liquid colour outright.
    pub const fn set_color(&mut self, color: LinearRgba) {
        self.color = color;
    }

    /// Direction the liquid settles toward.
    #[must_use]
    pub const fn gravity_direction(&self) -> Vec3 {
        self.gravity_direction
    }

    /// Overrides gravity until the next wobble update.
    pub const fn set_gravity_direction(&mut self, direction: Vec3) {
        self.gravity_direction = direction;
    }

    /// World-space centre of the liquid surface.
    #[must_use]
    pub const fn surface_level(&self) -> Vec3 {
        self.surface_level
    }

    /// Surface plane relative to the container origin.
    ///
    /// The normal always opposes gravity. Empty when no geometry is bound.
    #[must_use]
    pub fn generate_surface_plane(&self) -> Plane {
        if self.liquid_bounds.is_none() {
            return Plane::default();
        }
        Plane::new(
            -self.gravity_direction,
            self.surface_level.y - self.pose.position.y,
        )
    }

    /// Snapshot for the rendering collaborator.
    #[must_use]
    pub fn render_params(&self) -> RenderParams {
        RenderParams {
            surface_plane: self.generate_surface_plane(),
            surface_level: self.surface_level,
            gravity_direction: self.gravity_direction,
            color: self.color,
            visible: self.visible,
            cap_visible: !self.is_open,
        }
    }

    /// Fill level squeezed into the band the surface calculation stays
    /// stable in.
    fn mapped_fill(&self) -> f32 {
        map_range(self.fill_percent, 0.0, 1.0, MIN_FILL_LEVEL, MAX_FILL_LEVEL)
    }

    fn refresh_surface(&mut self) {
        let Some(world) = self.world_liquid_bounds() else {
            self.visible = false;
            return;
        };
        if self.fill_percent <= 0.0 {
            self.visible = false;
            return;
        }

        let (min, max) = (world.min().y, world.max().y);
        let how_low = 1.0 - Vec3::Y.dot(self.pose.up()).abs();
        let tilt = how_low * TILT_SURFACE_BIAS;
        let mapped = self.mapped_fill();
        let height = (mapped + tilt * (1.0 - mapped)) * (max - min) + min;

        let mut level = world.center();
        level.y = height;
        self.surface_level = level;
        self.visible = true;
    }

    fn update_wobble(&mut self, delta_seconds: f32, elapsed_seconds: f32) {
        let wobble = self
            .wobble
            .advance(&self.pose, delta_seconds, elapsed_seconds, self.inertness);

        let mut gravity = if self.fill_percent > MAX_FILL_LEVEL && !self.is_open {
            Vec3::NEG_Y
        } else {
            (Vec3::NEG_Y + wobble).try_normalize().unwrap_or(Vec3::NEG_Y)
        };
        gravity.y = -1.0;
        self.gravity_direction = gravity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ContainerConfig;
    use approx::assert_relative_eq;
    use glam::Quat;
    use rstest::{fixture, rstest};

    fn cube() -> Aabb {
        Aabb::from_center_half_extents(Vec3::ZERO, Vec3::splat(0.5))
    }

    #[fixture]
    fn container() -> LiquidContainer {
        let mut container = LiquidContainer::new(&ContainerConfig {
            custom_volume: true,
            volume: 2.0,
            ..ContainerConfig::default()
        });
        container.bind_liquid_bounds(Some(cube()));
        container.place(VesselPose::default());
        container
    }

    #[rstest]
    #[case::negative(-0.3, 0.0)]
    #[case::nan(f32::NAN, 0.0)]
    #[case::inside(0.4, 0.4)]
    #[case::overfull(1.7, 1.0)]
    fn fill_percent_stays_in_unit_range(
        mut container: LiquidContainer,
        #[case] requested: f32,
        #[case] expected: f32,
    ) {
        container.set_fill_percent(requested);
        assert_eq!(container.fill_percent(), expected);
    }

    #[rstest]
    #[case::half(1.0, 1.0)]
    #[case::overflow(5.0, 2.0)]
    #[case::negative(-1.0, 0.0)]
    fn fill_amount_round_trips_through_percent(
        mut container: LiquidContainer,
        #[case] litres: f32,
        #[case] expected: f32,
    ) {
        container.set_fill_amount(litres);
        assert_relative_eq!(container.fill_amount(), expected, epsilon = 1e-6);
        assert_relative_eq!(
            container.fill_amount(),
            (litres / 2.0).clamp(0.0, 1.0) * 2.0,
            epsilon = 1e-6
        );
    }

    #[rstest]
    fn empty_container_hides_render(mut container: LiquidContainer) {
        assert!(container.render_params().visible);
        container.set_fill_percent(0.0);
        assert!(!container.render_params().visible);
    }

    #[rstest]
    fn volume_derives_from_bounds_and_scale() {
        let mut container = LiquidContainer::new(&ContainerConfig::default());
        container.bind_liquid_bounds(Some(Aabb::from_center_half_extents(
            Vec3::ZERO,
            Vec3::splat(0.05),
        )));
        container.update(
            VesselPose::default().with_scale(Vec3::new(2.0, 1.0, 1.0)),
            0.0,
            0.0,
        );
        assert_relative_eq!(container.volume(), 2.0, epsilon = 1e-4);
    }

    #[rstest]
    fn container_without_geometry_is_inert() {
        let mut container = LiquidContainer::new(&ContainerConfig::default());
        container.update(VesselPose::default(), 0.016, 1.0);
        assert_eq!(container.calculate_volume(), 0.0);
        assert!(container.generate_surface_plane().is_empty());
        assert!(!container.render_params().visible);
    }

    #[rstest]
    fn surface_height_follows_fill(mut container: LiquidContainer) {
        container.set_fill_percent(0.5);
        let expected = map_range(0.5, 0.0, 1.0, MIN_FILL_LEVEL, MAX_FILL_LEVEL) - 0.5;
        assert_relative_eq!(container.surface_level().y, expected, epsilon = 1e-6);

        let plane = container.generate_surface_plane();
        assert_eq!(plane.normal, Vec3::Y);
        assert_relative_eq!(plane.distance, expected, epsilon = 1e-6);
    }

    #[rstest]
    fn surface_normal_opposes_gravity(mut container: LiquidContainer) {
        let gravity = Vec3::new(0.3, -1.0, 0.0);
        container.set_gravity_direction(gravity);
        let plane = container.generate_surface_plane();
        assert_relative_eq!(plane.normal.dot(gravity.normalize()), -1.0, epsilon = 1e-6);
    }

    #[rstest]
    fn tilted_surface_is_biased_upward(mut container: LiquidContainer) {
        container.set_fill_percent(0.5);
        let upright = container.surface_level().y;
        let pose = VesselPose::new(Vec3::ZERO, Quat::from_rotation_z(30_f32.to_radians()));
        container.update(pose, 0.0, 0.0);
        let world = cube().transformed(&pose);
        let mapped = map_range(0.5, 0.0, 1.0, MIN_FILL_LEVEL, MAX_FILL_LEVEL);
        let tilt = (1.0 - 30_f32.to_radians().cos()) * TILT_SURFACE_BIAS;
        let expected = (mapped + tilt * (1.0 - mapped)) * world.size().y + world.min().y;
        assert_relative_eq!(container.surface_level().y, expected, epsilon = 1e-5);
        assert!(expected.abs() > upright.abs());
    }

    #[rstest]
    fn closed_full_container_keeps_gravity_straight(mut container: LiquidContainer) {
        container.set_fill_percent(1.0);
        container.set_open(false);
        let moved = VesselPose::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        container.update(moved, 0.1, 0.3);
        assert_eq!(container.gravity_direction(), Vec3::NEG_Y);
        assert!(container.render_params().cap_visible);
    }

    #[rstest]
    fn moving_open_container_wobbles(mut container: LiquidContainer) {
        let moved = VesselPose::new(Vec3::new(1.0, 0.0, 0.0), Quat::IDENTITY);
        container.update(moved, 0.1, 0.3);
        let gravity = container.gravity_direction();
        assert_eq!(gravity.y, -1.0);
        assert!(gravity.x.abs() > 0.0);
    }

    #[rstest]
    fn receive_adds_litres_and_blends_colour(mut container: LiquidContainer) {
        container.set_fill_amount(0.5);
        container.set_color(LinearRgba::new(0.0, 0.0, 1.0, 1.0));
        let accepted = container.receive(&Transfer {
            litres: 0.25,
            color: LinearRgba::new(1.0, 0.0, 0.0, 1.0),
            blend: 0.25,
        });
        assert_relative_eq!(accepted, 0.25, epsilon = 1e-6);
        assert_relative_eq!(container.fill_amount(), 0.75, epsilon = 1e-6);
        assert_relative_eq!(container.color().red, 0.25, epsilon = 1e-6);
        assert_relative_eq!(container.color().blue, 0.75, epsilon = 1e-6);
    }

    #[rstest]
    #[case::nearly_full(0.9, 0.25, 0.2)]
    #[case::brim_full(1.0, 0.25, 0.0)]
    fn receive_takes_only_what_fits(
        mut container: LiquidContainer,
        #[case] fill: f32,
        #[case] poured: f32,
        #[case] expected: f32,
    ) {
        container.set_fill_percent(fill);
        let accepted = container.receive(&Transfer {
            litres: poured,
            color: LinearRgba::new(1.0, 0.0, 0.0, 1.0),
            blend: 0.5,
        });
        assert_relative_eq!(accepted, expected, epsilon = 1e-6);
        assert_relative_eq!(container.fill_percent(), 1.0, epsilon = 1e-6);
        assert_relative_eq!(container.color().red, 0.5, epsilon = 1e-6);
    }
}
