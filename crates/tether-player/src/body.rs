//! The character's physical frame and the requests it sends to the external
//! rigid-body layer.

use glam::{Quat, Vec3};
use tether_math::{FORWARD, euler_from_rotation, yaw_rotation};

/// Position and orientation in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// Local point to world space.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// World point to local space.
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.rotation.inverse() * (world - self.position)
    }

    /// Compose a child transform expressed in this frame.
    pub fn mul_transform(&self, child: &Transform) -> Transform {
        Transform {
            position: self.transform_point(child.position),
            rotation: (self.rotation * child.rotation).normalize(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// World transform of a character plus the optional parent frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Body {
    pub transform: Transform,
    pub parent: Option<Transform>,
}

impl Body {
    pub fn at(position: Vec3) -> Self {
        Self {
            transform: Transform::from_position(position),
            parent: None,
        }
    }

    #[must_use]
    pub fn with_parent(mut self, parent: Transform) -> Self {
        self.parent = Some(parent);
        self
    }

    /// Yaw of the root orientation in degrees.
    pub fn yaw(&self) -> f32 {
        euler_from_rotation(self.transform.rotation).y
    }

    /// Turn the root around world up by `degrees`.
    pub fn rotate_yaw(&mut self, degrees: f32) {
        if degrees == 0.0 {
            return;
        }
        self.transform.rotation = (yaw_rotation(degrees) * self.transform.rotation).normalize();
    }
}

/// Work for the external rigid-body layer, drained once per frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PhysicsRequest {
    /// Instant velocity change, world space.
    Impulse(Vec3),
    /// New collider height.
    ColliderHeight(f32),
}
