//! Raycast boundary of the character core.
//!
//! The core does not own scene geometry. It asks a [`SpatialQuery`] for every
//! hit along a ray and reduces the answer with the helpers in [`raycast`]:
//! obstruction shortening for follow cameras and three-tier ground
//! resolution for top-down framing. [`StaticScene`] is a small in-memory
//! implementation used by tests and headless sessions.

pub mod query;
pub mod raycast;
pub mod scene;

pub use query::{HitId, LayerMask, Ray, RayHit, SpatialQuery};
pub use raycast::{
    CAMERA_FLOOR, GROUND_RAY_HEIGHT, GroundPoint, GroundSource, OBSTRUCTION_BUFFER, Plane,
    camera_distance_after_obstruction, ground_ray, nearest_hit, obstruction_distance,
    resolve_ground,
};
pub use scene::{Shape, StaticScene};
