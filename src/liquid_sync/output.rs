//! Steps the liquid world and mirrors its results back into Bevy ECS.

use bevy::prelude::*;
use log::debug;

use crate::components::{LiquidRender, LiquidState, LiquidVessel, SceneId};
use crate::scene::ColliderScene;
use crate::world::{LiquidWorld, TickReport};

use super::{LiquidDiagnostics, LiquidLost, LiquidSyncState, SplashEffect};

/// Advances every vessel by the frame's delta time.
///
/// Each pour raises a [`SplashEffect`]. Liquid that reaches no vessel, or
/// spills over a full one, also raises [`LiquidLost`].
pub fn step_liquid_system(
    time: Res<Time>,
    mut world: ResMut<LiquidWorld>,
    scene: Res<ColliderScene>,
    state: Res<LiquidSyncState>,
    mut diagnostics: ResMut<LiquidDiagnostics>,
    mut commands: Commands,
) {
    let report = world.step(time.delta_secs(), time.elapsed_secs(), scene.as_ref());
    record(&mut diagnostics, &report);

    for splash in report.splashes {
        commands.trigger(SplashEffect {
            vessel: splash.source,
            entity: state.entity_for_id(splash.source),
            position: splash.position,
            scale: splash.scale,
            color: splash.color,
        });
    }
    for loss in report.losses {
        commands.trigger(LiquidLost {
            vessel: loss.source,
            entity: state.entity_for_id(loss.source),
            litres: loss.litres,
            position: loss.position,
        });
    }
}

fn record(diagnostics: &mut LiquidDiagnostics, report: &TickReport) {
    diagnostics.ticks += 1;
    diagnostics.pours += report.splashes.len() as u64;
    diagnostics.litres_transferred += report.transfers.iter().map(|t| t.litres).sum::<f32>();
    diagnostics.litres_lost += report.losses.iter().map(|l| l.litres).sum::<f32>();
    for transfer in &report.transfers {
        debug!(
            "transfer {:?} -> {:?}: {:.4} L, blend {:.3}",
            transfer.source, transfer.destination, transfer.litres, transfer.blend
        );
    }
}

type LiquidWriteQuery<'w, 's> = Query<
    'w,
    's,
    (
        &'static SceneId,
        &'static mut LiquidState,
        &'static mut LiquidRender,
    ),
    With<LiquidVessel>,
>;

/// Copies container state and render parameters onto vessel entities.
///
/// Components are only written when their value changed so `Changed<T>`
/// filters downstream stay quiet for idle vessels.
pub fn apply_liquid_outputs_system(world: Res<LiquidWorld>, mut query: LiquidWriteQuery) {
    for (id, mut state, mut render) in &mut query {
        let Some(vessel) = world.get(id.object()) else {
            continue;
        };
        let container = &vessel.container;
        state.set_if_neq(LiquidState {
            fill_percent: container.fill_percent(),
            litres: container.fill_amount(),
            volume: container.volume(),
            is_splitting: vessel.split.is_splitting(),
            color: container.color(),
        });
        render.set_if_neq(LiquidRender(container.render_params()));
    }
}
