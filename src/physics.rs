//! Pour physics helper functions.
//!
//! Provides the small formulas behind a pour: how fast a tilted vessel
//! empties, how much of its fill leaves in one tick, how far a splash reaches
//! and how quickly colours converge. They operate on plain numbers so the
//! transport step and standalone unit tests share one definition.

use glam::Vec3;

use crate::constants::{FLOW_SCALE_FLOOR, LITRES_PER_CUBIC_METRE, SPLASH_SIZE};

/// Tilt-derived pour multiplier in roughly `[0.2, 1.2]`.
///
/// An upright vessel yields the floor value; an inverted one the maximum.
///
/// # Examples
///
/// ```
/// use decant::physics::flow_scale;
/// use glam::Vec3;
/// assert!((flow_scale(Vec3::Y) - 0.2).abs() < 1e-6);
/// assert!((flow_scale(Vec3::NEG_Y) - 1.2).abs() < 1e-6);
/// ```
#[must_use]
pub fn flow_scale(up: Vec3) -> f32 {
    let how_low = Vec3::Y.dot(up);
    1.0 - (how_low + 1.0) * 0.5 + FLOW_SCALE_FLOOR
}

/// Share of the fill removed in one tick.
///
/// The step never exceeds `fill_percent`, so a source that runs dry ends at
/// exactly zero.
///
/// # Examples
///
/// ```
/// use decant::physics::liquid_step;
/// let step = liquid_step(0.1, 2.0, 0.5, 1.0, 0.04);
/// assert_eq!(step, 0.04);
/// ```
#[must_use]
pub const fn liquid_step(
    radius_world: f32,
    split_speed: f32,
    delta_seconds: f32,
    flow_scale: f32,
    fill_percent: f32,
) -> f32 {
    let step = radius_world * split_speed * delta_seconds * flow_scale;
    if fill_percent - step < 0.0 {
        fill_percent
    } else {
        step.max(0.0)
    }
}

/// Lerp factor pulling a destination colour toward the poured colour.
///
/// Uses the source's split speed and the destination's volume in litres, so
/// fast pours into small vessels converge quickest. The result is clamped to
/// `[0, 1]`; an empty destination volume yields zero.
#[must_use]
pub const fn mix_coefficient(
    source_split_speed: f32,
    destination_volume: f32,
    mixing_speed: f32,
) -> f32 {
    if destination_volume <= 0.0 {
        return 0.0;
    }
    (source_split_speed / destination_volume * mixing_speed).clamp(0.0, 1.0)
}

/// Distance from a bottleneck centre within which a landing counts as caught.
#[must_use]
pub const fn splash_reach(bottleneck_radius_world: f32, flow_scale: f32) -> f32 {
    bottleneck_radius_world + SPLASH_SIZE * flow_scale
}

/// Volume in litres of a local bounding box under a lossy world scale.
///
/// # Examples
///
/// ```
/// use decant::physics::bounds_volume_litres;
/// use glam::Vec3;
/// let litres = bounds_volume_litres(Vec3::splat(0.1), Vec3::new(1.0, 2.0, 1.0));
/// assert!((litres - 2.0).abs() < 1e-4);
/// ```
#[must_use]
pub fn bounds_volume_litres(bounds_size: Vec3, scale: Vec3) -> f32 {
    (bounds_size * scale).abs().element_product() * LITRES_PER_CUBIC_METRE
}
