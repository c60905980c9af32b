//! State tracking for liquid synchronisation.

use bevy::ecs::system::SystemParam;
use bevy::prelude::{Added, Changed, Entity, Query, RemovedComponents, Resource};
use hashbrown::HashMap;

use crate::components::{LiquidVessel, SceneId};
use crate::spatial::ObjectId;

/// Bidirectional mapping between scene ids and Bevy entities.
#[derive(Resource, Debug, Default)]
pub struct LiquidSyncState {
    /// Cached mapping from scene ids to Bevy `Entity` values.
    ///
    /// Maintained incrementally by
    /// [`cache_liquid_state_system`](super::cache_liquid_state_system).
    pub(crate) id_map: HashMap<ObjectId, Entity>,
    /// Reverse mapping from Bevy [`Entity`] values to scene ids.
    pub(crate) rev_map: HashMap<Entity, ObjectId>,
}

impl LiquidSyncState {
    /// Looks up the Bevy [`Entity`] for a scene id.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use decant::liquid_sync::LiquidSyncState;
    /// use decant::spatial::ObjectId;
    /// let state = LiquidSyncState::default();
    /// assert!(state.entity_for_id(ObjectId(42)).is_none());
    /// ```
    #[must_use]
    pub fn entity_for_id(&self, id: ObjectId) -> Option<Entity> {
        self.id_map.get(&id).copied()
    }

    /// Looks up the scene id carried by `entity`.
    #[must_use]
    pub fn id_for_entity(&self, entity: Entity) -> Option<ObjectId> {
        self.rev_map.get(&entity).copied()
    }
}

/// Running totals across every step since the plugin was added.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq)]
pub struct LiquidDiagnostics {
    /// Steps run.
    pub ticks: u64,
    /// Pours started.
    pub pours: u64,
    /// Litres taken in by destination vessels.
    pub litres_transferred: f32,
    /// Litres that ended up in no vessel.
    pub litres_lost: f32,
}

#[derive(SystemParam)]
/// Queries required to track `SceneId` and vessel lifecycle changes.
pub struct IdQueries<'w, 's> {
    /// Entities that gained a `SceneId` this frame.
    pub added: Query<'w, 's, (Entity, &'static SceneId), Added<SceneId>>,
    /// Entities whose `SceneId` component changed.
    pub changed: Query<'w, 's, (Entity, &'static SceneId), Changed<SceneId>>,
    /// Entities that lost their `SceneId` component.
    pub removed: RemovedComponents<'w, 's, SceneId>,
    /// Entities that stopped being vessels.
    pub removed_vessels: RemovedComponents<'w, 's, LiquidVessel>,
}
