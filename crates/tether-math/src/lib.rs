//! Angle helpers and critically-damped smoothing primitives shared by the
//! character and camera rig crates.
//!
//! All angles are in degrees. Orientation conventions: forward is −Z, up is +Y,
//! positive pitch looks up and positive yaw turns left (counter-clockwise when
//! viewed from above).

mod angle;
mod smoothing;

pub use angle::{
    BACK, FORWARD, delta_degrees, euler_from_direction, euler_from_rotation, rotation_from_euler,
    wrap_degrees, yaw_rotation,
};
pub use smoothing::{damp, damp_angle, damp_euler, damp_vec3};
