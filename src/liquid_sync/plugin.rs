//! Bevy plugin wiring the liquid systems into the schedule.

use bevy::color::LinearRgba;
use bevy::ecs::prelude::On;
use bevy::prelude::*;
use log::{debug, trace};

use crate::scene::ColliderScene;
use crate::spatial::ObjectId;
use crate::world::LiquidWorld;

use super::{
    apply_liquid_outputs_system, cache_liquid_state_system, step_liquid_system,
    LiquidDiagnostics, LiquidInbox, LiquidSyncState,
};

/// Event raised for every pour so an effect sink can play a splash.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct SplashEffect {
    /// Vessel that poured.
    pub vessel: ObjectId,
    /// Entity carrying the pouring vessel, when it is still mapped.
    pub entity: Option<Entity>,
    /// World-space pour point.
    pub position: Vec3,
    /// Effect size.
    pub scale: f32,
    /// Colour of the poured liquid.
    pub color: LinearRgba,
}

/// Event raised when poured liquid is gone for good.
///
/// Covers pours that reach no vessel and the excess a full destination
/// could not take.
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct LiquidLost {
    /// Vessel that poured.
    pub vessel: ObjectId,
    /// Entity carrying the pouring vessel, when it is still mapped.
    pub entity: Option<Entity>,
    /// Litres removed from the scene.
    pub litres: f32,
    /// Where the liquid left its vessel.
    pub position: Vec3,
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_splash(event: On<SplashEffect>) {
    let SplashEffect {
        vessel,
        position,
        scale,
        ..
    } = event.event();
    trace!("splash from {vessel:?} at {position} (scale {scale:.3})");
}

#[expect(
    clippy::needless_pass_by_value,
    reason = "Observer systems must accept On<T> by value for Events V2."
)]
fn log_liquid_lost(event: On<LiquidLost>) {
    let LiquidLost { vessel, litres, .. } = event.event();
    debug!("{litres:.4} L poured from {vessel:?} was lost");
}

/// Bevy plugin installing the liquid simulation.
///
/// Resources are initialised on build; the cache, step and apply systems run
/// chained in `Update`. Requires a `Time` resource, normally supplied by
/// `MinimalPlugins` or `DefaultPlugins`.
#[derive(Default)]
pub struct LiquidPlugin;

impl Plugin for LiquidPlugin {
    fn build(&self, app: &mut App) {
        app.add_observer(log_splash);
        app.add_observer(log_liquid_lost);

        app.init_resource::<LiquidWorld>()
            .init_resource::<ColliderScene>()
            .init_resource::<LiquidInbox>()
            .init_resource::<LiquidSyncState>()
            .init_resource::<LiquidDiagnostics>();

        app.add_systems(
            Update,
            (
                cache_liquid_state_system,
                step_liquid_system,
                apply_liquid_outputs_system,
            )
                .chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn plugin_initialises_resources() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins);
        app.add_plugins(LiquidPlugin);
        assert!(app.world().contains_resource::<LiquidWorld>());
        assert!(app.world().contains_resource::<ColliderScene>());
        assert!(app.world().contains_resource::<LiquidInbox>());
        app.update();
        let diagnostics = app.world().resource::<LiquidDiagnostics>();
        assert_eq!(diagnostics.ticks, 1);
        assert_eq!(diagnostics.pours, 0);
    }
}
