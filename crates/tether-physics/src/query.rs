//! Ray, hit and layer types plus the [`SpatialQuery`] trait.

use glam::Vec3;

/// Bit set of collision layers (`0..32`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask containing a single layer.
    pub fn layer(layer: u8) -> Self {
        debug_assert!(layer < 32, "layer index out of range: {layer}");
        LayerMask(1u32 << (layer & 31))
    }

    pub fn from_layers(layers: &[u8]) -> Self {
        layers
            .iter()
            .fold(LayerMask::NONE, |mask, &l| mask.union(LayerMask::layer(l)))
    }

    pub fn contains(self, layer: u8) -> bool {
        layer < 32 && self.0 & (1u32 << layer) != 0
    }

    pub fn union(self, other: LayerMask) -> LayerMask {
        LayerMask(self.0 | other.0)
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

/// Opaque identity of the object a ray hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitId(pub u64);

/// A half-line. The direction is normalized on construction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray. A zero direction stays zero and never hits anything.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray.
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// One intersection reported by a [`SpatialQuery`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RayHit {
    /// World-space hit point.
    pub point: Vec3,
    /// Distance from the ray origin to `point`.
    pub distance: f32,
    /// Identity of the hit object.
    pub id: HitId,
    /// Layer of the hit object.
    pub layer: u8,
}

/// External spatial-query service.
///
/// Implementors return every hit within `max_distance` on layers in `mask`,
/// in any order. Objects containing the ray origin are not reported.
pub trait SpatialQuery {
    fn raycast_all(&self, ray: &Ray, max_distance: f32, mask: LayerMask) -> Vec<RayHit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_membership() {
        let mask = LayerMask::from_layers(&[0, 3]);
        assert!(mask.contains(0));
        assert!(mask.contains(3));
        assert!(!mask.contains(1));
        assert!(!mask.contains(40));
        assert!(LayerMask::ALL.contains(31));
        assert!(!LayerMask::NONE.contains(0));
    }

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, -5.0, 0.0));
        assert_eq!(ray.direction, Vec3::NEG_Y);
        assert_eq!(ray.point_at(2.0), Vec3::new(0.0, -2.0, 0.0));
    }

    #[test]
    fn test_zero_direction_stays_zero() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO);
        assert_eq!(ray.direction, Vec3::ZERO);
    }
}
