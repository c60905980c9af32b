//! Tuning constants shared by the container, transport and scene modules.
//!
//! The fill band, splash size and rim sampling step were calibrated together;
//! changing one usually means retuning the others.

/// Lower bound of the stabilised fill band fed to the surface calculation.
pub const MIN_FILL_LEVEL: f32 = 0.1;
/// Upper bound of the stabilised fill band fed to the surface calculation.
pub const MAX_FILL_LEVEL: f32 = 0.99;
/// Conversion from cubic metres of bounding volume to litres.
pub const LITRES_PER_CUBIC_METRE: f32 = 1000.0;
/// Weight of the tilt compensation term that keeps a tipped surface level-ish.
pub const TILT_SURFACE_BIAS: f32 = 0.1;

/// Sweep radius of the landing search and base size of the splash reach.
pub const SPLASH_SIZE: f32 = 0.025;
/// Planes whose normals are closer to parallel than this never intersect.
pub const PARALLEL_EPSILON: f32 = 1e-6;
/// Squared distance under which an overflow point counts as inside the liquid.
pub const IN_BOUNDS_EPSILON_SQ: f32 = 1e-4;
/// Vertical offset applied to the reversed edge cast so it clips the obstacle.
pub const EDGE_CAST_DROP: f32 = 1e-4;
/// Number of fixed-angle samples taken around the bottleneck rim.
pub const RIM_SAMPLES: u16 = 36;
/// Minimum flow scale, reached when the container stands upright.
pub const FLOW_SCALE_FLOOR: f32 = 0.2;

/// Share of rotational velocity folded into the wobble accumulator.
pub const WOBBLE_ROTATION_COEFFICIENT: f32 = 0.2;
/// Smallest volume accepted from configuration, in litres.
///
/// Keeps percent and litre conversions away from division by zero.
pub const MIN_VOLUME: f32 = 1e-4;
/// Smallest inertness accepted from configuration.
pub const MIN_INERTNESS: f32 = 1e-3;
/// Largest mixing speed accepted from configuration.
pub const MAX_MIXING_SPEED: f32 = 2.0;

/// Capacity in litres when a vessel sets none.
pub const DEFAULT_VOLUME: f32 = 1.0;
/// Initial fill level.
pub const DEFAULT_FILL_PERCENT: f32 = 0.5;
/// Wobble damping.
pub const DEFAULT_INERTNESS: f32 = 50.0;
/// Local radius of the opening.
pub const DEFAULT_BOTTLENECK_RADIUS: f32 = 0.1;
/// Pour rate multiplier.
pub const DEFAULT_SPLIT_SPEED: f32 = 2.0;
/// Obstacle edges followed before a pour is given up.
pub const DEFAULT_MAX_EDGE_DROPS: u32 = 4;
/// Colour convergence factor.
pub const DEFAULT_MIXING_SPEED: f32 = 1.0;
/// Default liquid colour as linear RGBA.
pub const DEFAULT_LIQUID_COLOR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
