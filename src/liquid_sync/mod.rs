//! Synchronisation systems integrating the liquid simulation with Bevy ECS.
//!
//! This module re-exports the plugin, state tracking, inbox and the systems
//! that move data between entities and the [`LiquidWorld`](crate::world::LiquidWorld).

mod inbox;
mod input;
mod output;
mod plugin;
mod state;

pub use inbox::{LiquidCommand, LiquidInbox};
pub use input::cache_liquid_state_system;
pub use output::{apply_liquid_outputs_system, step_liquid_system};
pub use plugin::{LiquidLost, LiquidPlugin, SplashEffect};
pub use state::{IdQueries, LiquidDiagnostics, LiquidSyncState};
