//! Built-in behavior modes.

mod ai_wander;
mod first_person;
mod free_fly;
mod locomotion;
mod platform;
mod third_person;
mod top_down;

pub use ai_wander::AiWanderMode;
pub use first_person::FirstPersonMode;
pub use free_fly::FreeFlyMode;
pub use locomotion::Locomotion;
pub use platform::{FacingLayout, PlatformMode, facing_layout};
pub use third_person::ThirdPersonMode;
pub use top_down::TopDownMode;

pub const FIRST_PERSON: &str = "first_person";
pub const THIRD_PERSON: &str = "third_person";
pub const TOP_DOWN: &str = "top_down";
pub const PLATFORM: &str = "platform";
pub const FREE_FLY: &str = "free_fly";
pub const AI_WANDER: &str = "ai_wander";

#[cfg(test)]
mod test_support;
