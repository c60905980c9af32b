//! Caches ECS state into the liquid world before each step.

use bevy::prelude::*;
use log::{debug, warn};

use crate::components::{pose_from_transform, Collider, LiquidMesh, LiquidVessel, SceneId};
use crate::container::LiquidContainer;
use crate::scene::{BoxCollider, ColliderScene};
use crate::spatial::ObjectId;
use crate::split::SplitController;
use crate::world::{LiquidWorld, Vessel};

use super::{IdQueries, LiquidInbox, LiquidSyncState};

type VesselRow<'w> = (
    Entity,
    &'w SceneId,
    &'w LiquidVessel,
    &'w Transform,
    Option<&'w LiquidMesh>,
);

/// Caches vessel poses, colliders and queued commands into the simulation.
///
/// Keeps the id maps in step with spawned and despawned entities, registers
/// new vessels with the [`LiquidWorld`], rebuilds the [`ColliderScene`] from
/// every [`Collider`] and finally applies the [`LiquidInbox`]. Poses are read
/// from local `Transform`s, so vessels are expected to be top-level entities.
#[expect(
    clippy::too_many_arguments,
    reason = "Bevy systems receive each resource and query as a parameter"
)]
pub fn cache_liquid_state_system(
    mut state: ResMut<LiquidSyncState>,
    mut world: ResMut<LiquidWorld>,
    mut scene: ResMut<ColliderScene>,
    mut inbox: ResMut<LiquidInbox>,
    mut id_queries: IdQueries,
    new_vessels: Query<VesselRow<'_>, Added<LiquidVessel>>,
    vessels: Query<(&SceneId, &Transform), With<LiquidVessel>>,
    meshes: Query<(&SceneId, &LiquidMesh), (With<LiquidVessel>, Changed<LiquidMesh>)>,
    colliders: Query<(&SceneId, &Collider, &Transform)>,
) {
    sync::vessel_removals(&state, &mut world, &mut id_queries);
    sync::id_maps(&mut state, &mut id_queries);
    sync::vessel_additions(&mut world, &new_vessels);

    for (id, transform) in &vessels {
        world.set_pose(id.object(), pose_from_transform(transform));
    }
    for (id, mesh) in &meshes {
        world.bind_liquid_bounds(id.object(), Some(mesh.0));
    }

    sync::colliders(&mut scene, &colliders);
    inbox.apply_all(&mut world);
}

mod sync {
    use super::*;

    pub(super) fn vessel_removals(
        state: &LiquidSyncState,
        world: &mut LiquidWorld,
        queries: &mut IdQueries,
    ) {
        for entity in queries.removed_vessels.read() {
            let Some(id) = state.id_for_entity(entity) else {
                continue;
            };
            if world.remove(id).is_some() {
                debug!("vessel {id:?} removed");
            }
        }
    }

    pub(super) fn id_maps(state: &mut LiquidSyncState, queries: &mut IdQueries) {
        for entity in queries.removed.read() {
            if let Some(old_id) = state.rev_map.remove(&entity) {
                state.id_map.remove(&old_id);
            }
        }

        for (entity, id) in queries.changed.iter() {
            let new_id = id.object();
            if let Some(old_id) = state.rev_map.insert(entity, new_id) {
                state.id_map.remove(&old_id);
            }
            handle_id_conflict(state, entity, new_id);
        }

        for (entity, id) in queries.added.iter() {
            handle_id_conflict(state, entity, id.object());
            state.rev_map.insert(entity, id.object());
        }
    }

    /// Removes stale reverse mappings when an id moves to another entity.
    fn handle_id_conflict(state: &mut LiquidSyncState, entity: Entity, id: ObjectId) {
        if let Some(prev_entity) = state.id_map.insert(id, entity) {
            if prev_entity != entity {
                state.rev_map.remove(&prev_entity);
                warn!("scene id {id:?} remapped from {prev_entity:?} to {entity:?}");
            }
        }
    }

    pub(super) fn vessel_additions(
        world: &mut LiquidWorld,
        query: &Query<VesselRow<'_>, Added<LiquidVessel>>,
    ) {
        for (entity, id, vessel, transform, mesh) in query.iter() {
            let object = id.object();
            let mut container = LiquidContainer::new(&vessel.container);
            container.bind_liquid_bounds(mesh.map(|m| m.0));
            let split = SplitController::new(object, vessel.split.clone());
            let mut entry =
                Vessel::from_parts(container, split, pose_from_transform(transform));
            entry.endless = vessel.endless;
            if world.contains(object) {
                warn!("vessel {object:?} re-registered by {entity:?}");
            }
            world.insert(object, entry);
            debug!("vessel {object:?} registered for {entity:?}");
        }
    }

    pub(super) fn colliders(
        scene: &mut ColliderScene,
        query: &Query<(&SceneId, &Collider, &Transform)>,
    ) {
        scene.clear();
        for (id, collider, transform) in query.iter() {
            let mut shape =
                BoxCollider::from_pose(&pose_from_transform(transform), collider.half_extents);
            shape.is_trigger = collider.is_trigger;
            scene.insert(id.object(), shape);
        }
    }
}
