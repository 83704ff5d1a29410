//! Character and camera control.
//!
//! A [`Character`] owns a body, a [`SharedState`] (controller settings,
//! vibration, the dual-stage [`CameraRigState`]) and exactly one live
//! [`BehaviorMode`]. Each frame the mode turns intent into rig destinations
//! and movement; [`Character::smooth`] then damps the rig toward them.
//!
//! Modes are created by name through the [`ModeRegistry`] and replaced at
//! run time by [`switch_character`], which carries the shared state and the
//! resolvable event bindings over to the new instance. The
//! [`ModeTransitionPole`] toggles a character between top-down and the mode
//! it came from, remembering the origin in [`SessionMemory`].

pub mod bindings;
pub mod body;
pub mod character;
pub mod error;
pub mod look;
pub mod mode;
pub mod modes;
pub mod pole;
pub mod registry;
pub mod rig;
pub mod switch;
pub mod systems;
pub mod vibration;


pub use bindings::{Binding, EventBindings};
pub use body::{Body, PhysicsRequest, Transform};
pub use character::{Character, FrameEnv, RigMounts};
pub use error::{InvalidReason, RegistryError, RigError, SwitchError};
pub use look::{LookLayer, PitchWindow, YawTarget, look_vector, rotate_for_view, simple_move};
pub use mode::{BehaviorMode, HandlerSpec, ModeContext, ModeKind, RigRoot, SharedState, previous_as};
pub use pole::{ModeTransitionPole, PoleTargeting, PoleTransition, SessionMemory};
pub use registry::{CHARACTER_BASE, ModeFactory, ModeOrigin, ModeRegistry, NONE_CAMERA};
pub use rig::{CameraRigState, RigChannel, RigPose};
pub use switch::switch_character;
pub use systems::{
    Player, SceneQuery, SwitchRequests, apply_switch_requests_system, event_dispatch_system,
    mode_fixed_system, mode_frame_system, pole_interact_system, pole_targeting_system,
    register_character_systems, register_player_resources, rig_smoothing_system,
    sample_intent_system,
};
pub use vibration::{VibrationDirection, VibrationState};
