//! Canned scenes shared by the integration tests.
//!
//! Positions were laid out so that each pour lands where its name says:
//! the tipped jug's rim sits directly above the cup's opening, and liquid
//! from the tap runs off the ramp's lower edge straight into the bowl.

use decant::config::SceneConfig;
use decant::ObjectId;

use crate::builders::{ObstacleBuilder, VesselBuilder};

pub const JUG: ObjectId = ObjectId(1);
pub const CUP: ObjectId = ObjectId(2);
pub const TAP: ObjectId = ObjectId(3);
pub const BOWL: ObjectId = ObjectId(4);
pub const RAMP: ObjectId = ObjectId(10);
pub const SHELF: ObjectId = ObjectId(11);

/// Tilt at which a half-full unit cube starts pouring from its rim.
pub const POUR_TILT_DEGREES: f32 = 70.0;
pub const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
pub const BLUE: [f32; 4] = [0.0, 0.0, 1.0, 1.0];

/// A half-full red jug tipped over a blue cup holding a fifth of a litre.
#[must_use]
pub fn jug_over_cup() -> SceneConfig {
    SceneConfig {
        vessels: vec![
            VesselBuilder::new(JUG.into_inner())
                .named("jug")
                .tipped(POUR_TILT_DEGREES)
                .fill(0.5)
                .color(RED)
                .mixing_speed(0.05)
                .build(),
            VesselBuilder::new(CUP.into_inner())
                .named("cup")
                .at(-0.529, -2.0, 0.0)
                .fill(0.2)
                .color(BLUE)
                .build(),
        ],
        obstacles: Vec::new(),
    }
}

/// [`jug_over_cup`] without the cup.
#[must_use]
pub fn jug_alone() -> SceneConfig {
    let mut scene = jug_over_cup();
    scene.vessels.retain(|v| v.id == JUG.into_inner());
    scene
}

/// A full tap pouring onto a ramp that slopes down toward an empty bowl.
#[must_use]
pub fn ramp_cascade() -> SceneConfig {
    SceneConfig {
        vessels: vec![
            VesselBuilder::new(TAP.into_inner())
                .named("tap")
                .tipped(POUR_TILT_DEGREES)
                .fill(1.0)
                .color(RED)
                .build(),
            VesselBuilder::new(BOWL.into_inner())
                .named("bowl")
                .at(0.39, -2.0, 0.0)
                .volume(2.0)
                .fill(0.0)
                .color(BLUE)
                .build(),
        ],
        obstacles: vec![ObstacleBuilder::new(RAMP.into_inner(), [0.6, 0.05, 0.5])
            .at(-0.2, -1.0, 0.0)
            .tilted(-15.0)
            .build()],
    }
}

/// [`ramp_cascade`] with the bowl removed, so runoff falls into nothing.
#[must_use]
pub fn ramp_without_bowl() -> SceneConfig {
    let mut scene = ramp_cascade();
    scene.vessels.retain(|v| v.id == TAP.into_inner());
    scene
}

/// The jug pouring onto a level shelf that hides the cup below.
#[must_use]
pub fn jug_over_shelf() -> SceneConfig {
    let mut scene = jug_over_cup();
    scene.obstacles.push(
        ObstacleBuilder::new(SHELF.into_inner(), [0.5, 0.05, 0.5])
            .at(-0.529, -1.0, 0.0)
            .build(),
    );
    scene
}

/// The jug pouring through a trigger volume above the cup.
#[must_use]
pub fn jug_through_trigger() -> SceneConfig {
    let mut scene = jug_over_cup();
    scene.obstacles.push(
        ObstacleBuilder::new(SHELF.into_inner(), [0.5, 0.05, 0.5])
            .at(-0.529, -1.0, 0.0)
            .trigger()
            .build(),
    );
    scene
}
