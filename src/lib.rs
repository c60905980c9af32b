#![cfg_attr(docsrs, feature(doc_cfg))]
//! Library crate simulating liquid in containers.
//! Tracks fill level and surface orientation per vessel, detects pours at the
//! opening and routes poured liquid down onto other vessels, with a Bevy
//! plugin driving it all from the ECS.
pub mod components;
pub mod config;
pub mod constants;
pub mod container;
pub mod geometry;
pub mod liquid_sync;
pub mod logging;
pub mod physics;
pub mod scene;
pub mod spatial;
pub mod spawn_scene;
pub mod split;
pub mod world;
pub use constants::*;

// Re-export commonly used items
pub use components::{Collider, LiquidMesh, LiquidRender, LiquidState, LiquidVessel, SceneId};
pub use config::{ConfigError, ContainerConfig, SceneConfig, SplitConfig, VesselConfig};
pub use container::{LiquidContainer, RenderParams, Transfer};
pub use geometry::{plane_plane_intersection, Aabb, Plane, VesselPose};
pub use liquid_sync::{
    apply_liquid_outputs_system, cache_liquid_state_system, step_liquid_system, LiquidCommand,
    LiquidInbox, LiquidLost, LiquidPlugin, SplashEffect,
};
pub use logging::init as init_logging;
pub use scene::{BoxCollider, ColliderScene};
pub use spatial::{ObjectId, Ray, RayHit, SpatialQuery, VesselLookup};
pub use spawn_scene::spawn_scene;
pub use split::{Pour, SplitController};
pub use world::{LiquidWorld, TickReport, Vessel};

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use decant::prelude::*;
    //! ```

    pub use crate::ColliderScene;
    pub use crate::LiquidContainer;
    pub use crate::LiquidPlugin;
    pub use crate::LiquidWorld;
    pub use crate::SceneConfig;
    pub use crate::SplitController;
    pub use crate::VesselPose;
    pub use ordered_float::OrderedFloat;
}
