//! Reductions over raycast results used by the camera modes.

use glam::Vec3;

use crate::query::{HitId, LayerMask, Ray, RayHit, SpatialQuery};

/// Closest a follow camera is allowed to get to its pivot.
pub const CAMERA_FLOOR: f32 = 1.0;

/// Distance kept between the camera and the nearest obstruction.
pub const OBSTRUCTION_BUFFER: f32 = 0.5;

/// Height above the queried position from which the ground ray is cast.
pub const GROUND_RAY_HEIGHT: f32 = 10_000.0;

/// The hit with the smallest distance, if any.
pub fn nearest_hit(hits: &[RayHit]) -> Option<&RayHit> {
    hits.iter().min_by(|a, b| a.distance.total_cmp(&b.distance))
}

/// Distance to the nearest obstruction along `ray`, or `max_distance` when
/// the ray is clear.
pub fn obstruction_distance(
    query: &dyn SpatialQuery,
    ray: &Ray,
    max_distance: f32,
    mask: LayerMask,
) -> f32 {
    query
        .raycast_all(ray, max_distance, mask)
        .iter()
        .fold(max_distance, |shortest, hit| shortest.min(hit.distance))
}

/// Follow-camera distance after pulling in from obstructions.
///
/// Casts from `pivot` along `back` for `camera_distance` and returns
/// `max(CAMERA_FLOOR, shortest - OBSTRUCTION_BUFFER)`. The buffer is applied
/// whether or not anything was hit.
pub fn camera_distance_after_obstruction(
    query: &dyn SpatialQuery,
    pivot: Vec3,
    back: Vec3,
    camera_distance: f32,
    mask: LayerMask,
) -> f32 {
    let ray = Ray::new(pivot, back);
    let shortest = obstruction_distance(query, &ray, camera_distance, mask);
    (shortest - OBSTRUCTION_BUFFER).max(CAMERA_FLOOR)
}

/// Horizontal plane `y = height`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Plane {
    pub height: f32,
}

impl Plane {
    pub fn horizontal(height: f32) -> Self {
        Self { height }
    }

    /// Intersection point with `ray`. `None` when the ray is parallel to the
    /// plane or points away from it.
    pub fn raycast(&self, ray: &Ray) -> Option<Vec3> {
        let dy = ray.direction.y;
        if dy.abs() < 1e-6 {
            return None;
        }
        let t = (self.height - ray.origin.y) / dy;
        (t >= 0.0).then(|| ray.point_at(t))
    }
}

/// Downward ray from high above `position`.
pub fn ground_ray(position: Vec3) -> Ray {
    Ray::new(position + Vec3::Y * GROUND_RAY_HEIGHT, Vec3::NEG_Y)
}

/// Where a ground point came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundSource {
    /// Nearest scene hit on a ground layer.
    Hit(HitId),
    /// The fallback horizontal plane.
    Plane,
    /// Neither was reached; the caller's fallback position.
    Fallback,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundPoint {
    pub point: Vec3,
    pub source: GroundSource,
}

/// Resolve a ground point in three tiers: the nearest scene hit on `mask`,
/// then the plane at `default_height`, then `fallback`.
pub fn resolve_ground(
    query: &dyn SpatialQuery,
    ray: &Ray,
    mask: LayerMask,
    default_height: f32,
    fallback: Vec3,
) -> GroundPoint {
    let hits = query.raycast_all(ray, f32::INFINITY, mask);
    if let Some(hit) = nearest_hit(&hits) {
        return GroundPoint {
            point: hit.point,
            source: GroundSource::Hit(hit.id),
        };
    }
    if let Some(point) = Plane::horizontal(default_height).raycast(ray) {
        return GroundPoint {
            point,
            source: GroundSource::Plane,
        };
    }
    tracing::trace!(?fallback, "ground ray missed scene and plane");
    GroundPoint {
        point: fallback,
        source: GroundSource::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Shape, StaticScene};

    fn scene_with_wall_at(z: f32) -> StaticScene {
        let mut scene = StaticScene::new();
        scene.insert(
            HitId(7),
            0,
            Shape::cuboid(Vec3::new(-10.0, -10.0, z), Vec3::new(10.0, 10.0, z + 1.0)),
        );
        scene
    }

    #[test]
    fn test_obstruction_clamps_camera_distance() {
        let scene = scene_with_wall_at(2.0);
        let d = camera_distance_after_obstruction(&scene, Vec3::ZERO, Vec3::Z, 8.0, LayerMask::ALL);
        assert!((d - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_unobstructed_distance_keeps_buffer() {
        let scene = StaticScene::new();
        let d = camera_distance_after_obstruction(&scene, Vec3::ZERO, Vec3::Z, 8.0, LayerMask::ALL);
        assert!((d - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_close_obstruction_hits_floor() {
        let scene = scene_with_wall_at(0.3);
        let d = camera_distance_after_obstruction(&scene, Vec3::ZERO, Vec3::Z, 8.0, LayerMask::ALL);
        assert_eq!(d, CAMERA_FLOOR);
    }

    #[test]
    fn test_masked_out_obstruction_is_ignored() {
        let scene = scene_with_wall_at(2.0);
        let d = camera_distance_after_obstruction(
            &scene,
            Vec3::ZERO,
            Vec3::Z,
            8.0,
            LayerMask::layer(3),
        );
        assert!((d - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_ground_prefers_scene_hit() {
        let mut scene = StaticScene::new();
        scene.insert(
            HitId(1),
            2,
            Shape::cuboid(Vec3::new(-5.0, 0.0, -5.0), Vec3::new(5.0, 3.0, 5.0)),
        );
        let ground = resolve_ground(
            &scene,
            &ground_ray(Vec3::new(1.0, 0.0, 1.0)),
            LayerMask::ALL,
            0.0,
            Vec3::ZERO,
        );
        assert_eq!(ground.source, GroundSource::Hit(HitId(1)));
        assert!((ground.point.y - 3.0).abs() < 1e-2);
    }

    #[test]
    fn test_ground_falls_back_to_plane() {
        let scene = StaticScene::new();
        let ground = resolve_ground(
            &scene,
            &ground_ray(Vec3::new(4.0, 0.0, -3.0)),
            LayerMask::ALL,
            2.0,
            Vec3::ZERO,
        );
        assert_eq!(ground.source, GroundSource::Plane);
        assert!((ground.point - Vec3::new(4.0, 2.0, -3.0)).length() < 1e-2);
    }

    #[test]
    fn test_parallel_ray_uses_fallback() {
        let scene = StaticScene::new();
        let fallback = Vec3::new(3.0, 1.0, 3.0);
        let ground = resolve_ground(
            &scene,
            &Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::X),
            LayerMask::ALL,
            0.0,
            fallback,
        );
        assert_eq!(ground.source, GroundSource::Fallback);
        assert_eq!(ground.point, fallback);
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray::new(Vec3::new(0.0, 5.0, 0.0), Vec3::Y);
        assert!(Plane::horizontal(0.0).raycast(&ray).is_none());
    }

    #[test]
    fn test_nearest_hit_picks_minimum() {
        let hit = |d: f32, id: u64| RayHit {
            point: Vec3::ZERO,
            distance: d,
            id: HitId(id),
            layer: 0,
        };
        let hits = [hit(4.0, 1), hit(1.5, 2), hit(3.0, 3)];
        assert_eq!(nearest_hit(&hits).map(|h| h.id), Some(HitId(2)));
        assert!(nearest_hit(&[]).is_none());
    }
}
