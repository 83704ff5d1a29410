//! In-memory static geometry implementing [`SpatialQuery`].

use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::query::{HitId, LayerMask, Ray, RayHit, SpatialQuery};

/// Collision shape of a scene object.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Axis-aligned box; `min <= max` on every axis.
    Box { min: Vec3, max: Vec3 },
    Sphere { center: Vec3, radius: f32 },
}

impl Shape {
    /// Axis-aligned box from two corners in any order.
    pub fn cuboid(a: Vec3, b: Vec3) -> Self {
        Shape::Box {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Entry distance of `ray` into the shape, or `None` when the ray misses
    /// it or starts inside it.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        match *self {
            Shape::Box { min, max } => intersect_box(ray, min, max),
            Shape::Sphere { center, radius } => intersect_sphere(ray, center, radius),
        }
    }
}

fn intersect_box(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    for axis in 0..3 {
        let o = ray.origin[axis];
        let d = ray.direction[axis];
        if d.abs() < 1e-12 {
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (min[axis] - o) * inv;
        let mut t1 = (max[axis] - o) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    (t_enter >= 0.0).then_some(t_enter)
}

fn intersect_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    if oc.length_squared() < radius * radius {
        return None;
    }
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

#[derive(Clone, Copy, Debug)]
struct SceneObject {
    id: HitId,
    layer: u8,
    shape: Shape,
}

/// A flat list of static shapes keyed by [`HitId`].
#[derive(Debug, Default)]
pub struct StaticScene {
    objects: Vec<SceneObject>,
    index: FxHashMap<HitId, usize>,
}

impl StaticScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the object with the given id.
    pub fn insert(&mut self, id: HitId, layer: u8, shape: Shape) {
        let object = SceneObject { id, layer, shape };
        if let Some(&slot) = self.index.get(&id) {
            self.objects[slot] = object;
        } else {
            self.index.insert(id, self.objects.len());
            self.objects.push(object);
        }
    }

    /// Remove an object. Returns its shape if it existed.
    pub fn remove(&mut self, id: HitId) -> Option<Shape> {
        let slot = self.index.remove(&id)?;
        let removed = self.objects.swap_remove(slot);
        if let Some(moved) = self.objects.get(slot) {
            self.index.insert(moved.id, slot);
        }
        Some(removed.shape)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn layer_of(&self, id: HitId) -> Option<u8> {
        self.index.get(&id).map(|&slot| self.objects[slot].layer)
    }
}

impl SpatialQuery for StaticScene {
    fn raycast_all(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Vec<RayHit> {
        if ray.direction == glam::Vec3::ZERO {
            return Vec::new();
        }
        let mut hits: Vec<RayHit> = self
            .objects
            .iter()
            .filter(|o| mask.contains(o.layer))
            .filter_map(|o| {
                let t = o.shape.intersect(ray)?;
                (t <= max_distance).then(|| RayHit {
                    point: ray.point_at(t),
                    distance: t,
                    id: o.id,
                    layer: o.layer,
                })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        tracing::trace!(hits = hits.len(), max_distance, "raycast_all");
        hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_scene() -> StaticScene {
        let mut scene = StaticScene::new();
        scene.insert(
            HitId(1),
            0,
            Shape::cuboid(Vec3::new(-5.0, -5.0, 2.0), Vec3::new(5.0, 5.0, 3.0)),
        );
        scene.insert(
            HitId(2),
            1,
            Shape::Sphere {
                center: Vec3::new(0.0, 0.0, 6.0),
                radius: 1.0,
            },
        );
        scene
    }

    #[test]
    fn test_hits_sorted_by_distance() {
        let scene = wall_scene();
        let hits = scene.raycast_all(&Ray::new(Vec3::ZERO, Vec3::Z), 100.0, LayerMask::ALL);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, HitId(1));
        assert!((hits[0].distance - 2.0).abs() < 1e-5);
        assert_eq!(hits[1].id, HitId(2));
        assert!((hits[1].distance - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_mask_filters_layers() {
        let scene = wall_scene();
        let hits = scene.raycast_all(
            &Ray::new(Vec3::ZERO, Vec3::Z),
            100.0,
            LayerMask::layer(1),
        );
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, HitId(2));
    }

    #[test]
    fn test_max_distance_limits_hits() {
        let scene = wall_scene();
        let hits = scene.raycast_all(&Ray::new(Vec3::ZERO, Vec3::Z), 4.0, LayerMask::ALL);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn test_origin_inside_is_ignored() {
        let scene = wall_scene();
        let hits = scene.raycast_all(
            &Ray::new(Vec3::new(0.0, 0.0, 2.5), Vec3::Z),
            100.0,
            LayerMask::layer(0),
        );
        assert!(hits.is_empty());
    }

    #[test]
    fn test_miss_behind_origin() {
        let scene = wall_scene();
        let hits = scene.raycast_all(&Ray::new(Vec3::ZERO, Vec3::NEG_Z), 100.0, LayerMask::ALL);
        assert!(hits.is_empty());
    }

    #[test]
    fn test_remove_keeps_index_consistent() {
        let mut scene = wall_scene();
        scene.insert(
            HitId(3),
            2,
            Shape::Sphere {
                center: Vec3::Y * 10.0,
                radius: 1.0,
            },
        );
        assert!(scene.remove(HitId(1)).is_some());
        assert!(scene.remove(HitId(1)).is_none());
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.layer_of(HitId(3)), Some(2));
        assert_eq!(scene.layer_of(HitId(2)), Some(1));
    }

    #[test]
    fn test_insert_replaces_existing_id() {
        let mut scene = wall_scene();
        scene.insert(HitId(2), 4, Shape::cuboid(Vec3::ZERO, Vec3::ONE));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.layer_of(HitId(2)), Some(4));
    }
}
