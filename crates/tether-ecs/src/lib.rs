//! ECS world setup, session schedules, and shared frame resources.
//!
//! [`SessionSchedules`] drives one frame: input sampling, zero or more fixed
//! ticks, mode updates, then rig smoothing.

mod input;
mod schedule;
mod system_ordering;
mod time;
mod world;

pub use input::InputState;
pub use schedule::{MAX_FIXED_STEPS_PER_FRAME, SessionSchedule, SessionSchedules};
pub use system_ordering::{
    FixedUpdateSet, PostUpdateSet, PreUpdateSet, UpdateSet, configure_fixedupdate_ordering,
    configure_postupdate_ordering, configure_preupdate_ordering, configure_update_ordering,
};
pub use time::TimeRes;
pub use world::{create_world, register_core_resources};
