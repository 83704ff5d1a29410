//! Time resource for the ECS world.

use bevy_ecs::prelude::*;

/// Frame timing, written by [`SessionSchedules::run`](crate::SessionSchedules::run)
/// before any stage executes.
#[derive(Resource, Debug, Clone, Default)]
pub struct TimeRes {
    /// Seconds since the previous frame.
    pub delta: f32,
    /// Seconds since the session started.
    pub elapsed: f64,
    /// Fixed tick length in seconds.
    pub fixed_dt: f32,
    /// Frames run so far, including the current one.
    pub frame: u64,
    /// Fixed ticks run so far.
    pub fixed_ticks: u64,
}
