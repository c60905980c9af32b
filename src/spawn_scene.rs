//! Spawns a configured scene directly into the Bevy ECS.

use bevy::prelude::*;

use crate::components::{transform_from_pose, Collider, LiquidMesh, LiquidVessel, SceneId};
use crate::config::SceneConfig;

/// Spawns every vessel and obstacle in `scene`, returning the new entities
/// in file order (vessels first).
pub fn spawn_scene(world: &mut World, scene: &SceneConfig) -> Vec<Entity> {
    let mut spawned = Vec::with_capacity(scene.vessels.len() + scene.obstacles.len());

    for vessel in &scene.vessels {
        let entity = world
            .spawn((
                Name::new(vessel.label()),
                SceneId(vessel.id),
                transform_from_pose(&vessel.pose.to_pose()),
                LiquidVessel {
                    container: vessel.container.clone(),
                    split: vessel.split.clone(),
                    endless: vessel.endless,
                },
                LiquidMesh(vessel.liquid_bounds()),
                Collider::solid(vessel.collider_half_extents()),
            ))
            .id();
        spawned.push(entity);
    }

    for obstacle in &scene.obstacles {
        let entity = world
            .spawn((
                Name::new(format!("obstacle-{}", obstacle.id)),
                SceneId(obstacle.id),
                transform_from_pose(&obstacle.pose.to_pose()),
                Collider {
                    half_extents: Vec3::from_array(obstacle.half_extents),
                    is_trigger: obstacle.is_trigger,
                },
            ))
            .id();
        spawned.push(entity);
    }

    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LiquidState;
    use rstest::rstest;

    #[rstest]
    fn spawns_vessels_and_obstacles() {
        let scene = SceneConfig::from_json_str(
            r#"{
                "vessels": [ { "id": 1, "name": "jug", "liquid_half_extents": [0.5, 0.5, 0.5] } ],
                "obstacles": [ { "id": 2, "half_extents": [1, 0.1, 1], "is_trigger": true } ]
            }"#,
        )
        .expect("valid scene");
        let mut world = World::new();
        let entities = spawn_scene(&mut world, &scene);

        assert_eq!(entities.len(), 2);
        let jug = world.entity(entities[0]);
        assert_eq!(jug.get::<Name>().map(Name::as_str), Some("jug"));
        assert!(jug.get::<LiquidState>().is_some());
        let obstacle = world.entity(entities[1]);
        assert!(obstacle.get::<LiquidVessel>().is_none());
        assert!(obstacle.get::<Collider>().is_some_and(|c| c.is_trigger));
    }
}
