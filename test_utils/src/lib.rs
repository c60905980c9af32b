//! Utility helpers for tests.
//!
//! Builders for vessel and obstacle configuration, a headless
//! [`LiquidScene`](harness::LiquidScene) that steps a [`decant::LiquidWorld`]
//! against its own collider scene, and a few shared assertions.

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod harness;

pub use assertions::{assert_fill_in_range, assert_litres_close};
pub use builders::{ObstacleBuilder, VesselBuilder};
pub use harness::LiquidScene;
