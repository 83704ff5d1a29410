//! The demo level: a floor, four walls and a mode-transition pole.

use glam::Vec3;
use tether_physics::{HitId, Shape, StaticScene};

pub const GROUND_LAYER: u8 = 0;
pub const PROP_LAYER: u8 = 1;

pub const FLOOR: HitId = HitId(1);
pub const POLE: HitId = HitId(100);

/// Half extent of the walled arena.
const ARENA: f32 = 20.0;
const WALL_HEIGHT: f32 = 4.0;

/// Where the player starts, standing on the floor and facing the pole.
pub const SPAWN_POINT: Vec3 = Vec3::new(0.0, 1.0, 0.0);

pub fn build_scene() -> StaticScene {
    let mut scene = StaticScene::new();
    scene.insert(
        FLOOR,
        GROUND_LAYER,
        Shape::cuboid(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0)),
    );

    let walls = [
        (Vec3::new(-ARENA, 0.0, -ARENA - 1.0), Vec3::new(ARENA, WALL_HEIGHT, -ARENA)),
        (Vec3::new(-ARENA, 0.0, ARENA), Vec3::new(ARENA, WALL_HEIGHT, ARENA + 1.0)),
        (Vec3::new(-ARENA - 1.0, 0.0, -ARENA), Vec3::new(-ARENA, WALL_HEIGHT, ARENA)),
        (Vec3::new(ARENA, 0.0, -ARENA), Vec3::new(ARENA + 1.0, WALL_HEIGHT, ARENA)),
    ];
    for (index, (min, max)) in walls.into_iter().enumerate() {
        scene.insert(HitId(10 + index as u64), GROUND_LAYER, Shape::cuboid(min, max));
    }

    scene.insert(
        POLE,
        PROP_LAYER,
        Shape::cuboid(Vec3::new(-0.5, 0.0, -6.5), Vec3::new(0.5, 3.0, -5.5)),
    );
    tracing::debug!(shapes = scene.len(), "demo scene built");
    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_physics::{LayerMask, Ray, SpatialQuery, nearest_hit};

    #[test]
    fn test_pole_is_ahead_of_spawn() {
        let scene = build_scene();
        let ray = Ray::new(SPAWN_POINT, Vec3::NEG_Z);
        let hits = scene.raycast_all(&ray, 10.0, LayerMask::ALL);
        let hit = nearest_hit(&hits).unwrap();
        assert_eq!(hit.id, POLE);
        assert!((hit.distance - 5.5).abs() < 1e-4);
    }

    #[test]
    fn test_floor_under_spawn() {
        let scene = build_scene();
        let ray = Ray::new(SPAWN_POINT, Vec3::NEG_Y);
        let hits = scene.raycast_all(&ray, 10.0, LayerMask::layer(GROUND_LAYER));
        assert_eq!(nearest_hit(&hits).map(|hit| hit.id), Some(FLOOR));
    }
}
