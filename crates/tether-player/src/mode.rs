//! The behavior-mode contract and the per-call context handed to modes.

use std::any::Any;

use tether_config::{Config, ControllerSettings};
use tether_input::{EventValue, HandlerSignature, Intent};
use tether_physics::SpatialQuery;

use crate::body::{Body, PhysicsRequest, Transform};
use crate::pole::SessionMemory;
use crate::rig::CameraRigState;
use crate::vibration::VibrationState;

/// Built-in behavior families. Custom modes report [`ModeKind::Custom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ModeKind {
    FirstPerson,
    ThirdPerson,
    TopDown,
    Platform,
    FreeFly,
    AiWander,
    Custom,
}

impl ModeKind {
    /// Whether the pole should restore first-person after leaving top-down.
    pub fn is_first_person(self) -> bool {
        self == ModeKind::FirstPerson
    }
}

/// Frame that anchors the camera rig.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RigRoot {
    #[default]
    Character,
    Parent,
}

/// One entry of a mode's handler table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandlerSpec {
    pub name: &'static str,
    pub signature: HandlerSignature,
}

impl HandlerSpec {
    pub const fn button(name: &'static str) -> Self {
        Self {
            name,
            signature: HandlerSignature::Button,
        }
    }

    pub const fn axis1(name: &'static str) -> Self {
        Self {
            name,
            signature: HandlerSignature::Axis1,
        }
    }

    pub const fn axis2(name: &'static str) -> Self {
        Self {
            name,
            signature: HandlerSignature::Axis2,
        }
    }
}

/// State composed on the character and carried across mode switches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SharedState {
    pub controller: ControllerSettings,
    pub vibration: VibrationState,
    pub rig: CameraRigState,
}

impl SharedState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            controller: config.controller,
            vibration: VibrationState::from_config(&config.vibration),
            rig: CameraRigState::default(),
        }
    }

    /// The fields an incoming mode inherits: controller settings, vibration,
    /// and every destination, current value and velocity of the rig.
    pub fn continuity_copy(&self) -> Self {
        Self {
            controller: self.controller,
            vibration: self.vibration,
            rig: CameraRigState {
                rig: self.rig.rig,
                camera: self.rig.camera,
            },
        }
    }
}

/// Everything a mode hook may read or write for one call.
pub struct ModeContext<'a> {
    pub body: &'a mut Body,
    pub shared: &'a mut SharedState,
    pub query: Option<&'a dyn SpatialQuery>,
    pub session: SessionMemory,
    /// A camera rig is mounted on this mode's anchor.
    pub rig_mounted: bool,
    /// Seconds covered by this call (frame delta or fixed step).
    pub dt: f32,
    /// Session time in seconds.
    pub time: f32,
    pub(crate) physics: &'a mut Vec<PhysicsRequest>,
    pub(crate) switch_request: &'a mut Option<String>,
}

impl ModeContext<'_> {
    pub fn controller(&self) -> &ControllerSettings {
        &self.shared.controller
    }

    pub fn rig(&mut self) -> &mut CameraRigState {
        &mut self.shared.rig
    }

    /// Queue a request for the rigid-body layer.
    pub fn push_physics(&mut self, request: PhysicsRequest) {
        self.physics.push(request);
    }

    /// Ask the character to switch to `mode` once the current hook returns.
    /// A later request in the same hook replaces an earlier one.
    pub fn request_switch(&mut self, mode: impl Into<String>) {
        *self.switch_request = Some(mode.into());
    }

    /// World frame of the rig anchor for `root`. Falls back to the character
    /// when the parent is missing.
    pub fn anchor(&self, root: RigRoot) -> Transform {
        match root {
            RigRoot::Parent => self.body.parent.unwrap_or(self.body.transform),
            RigRoot::Character => self.body.transform,
        }
    }

    /// World pose of the smoothed camera for `root`, without vibration.
    pub fn camera_world(&self, root: RigRoot) -> Transform {
        self.shared.rig.camera_world(&self.anchor(root))
    }
}

/// Contract every behavior mode implements.
///
/// Hooks default to doing nothing so simple modes only override what they
/// need.
pub trait BehaviorMode: Send + Sync + 'static {
    /// Registered name, e.g. `"first_person"`.
    fn name(&self) -> &'static str;

    fn kind(&self) -> ModeKind;

    /// Called once right after attachment, with the outgoing mode if any.
    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, _ctx: &mut ModeContext<'_>) {}

    /// Variable-rate update. Repeated idle intent must not move anything.
    fn on_frame_update(&mut self, _ctx: &mut ModeContext<'_>, _intent: &Intent) {}

    /// Fixed-rate update. Writes the world position only.
    fn on_fixed_update(&mut self, _ctx: &mut ModeContext<'_>) {}

    fn camera_rigging_root(&self) -> RigRoot {
        RigRoot::Character
    }

    /// Modes that never drive a camera return `false`.
    fn requires_camera(&self) -> bool {
        true
    }

    /// Handlers external event bindings may target.
    fn handlers(&self) -> &'static [HandlerSpec] {
        &[]
    }

    /// Run the named handler. Returns `false` if the mode has no such handler.
    fn invoke(&mut self, _handler: &str, _value: EventValue, _ctx: &mut ModeContext<'_>) -> bool {
        false
    }

    /// Length of the targeting ray used for interactable objects.
    fn interaction_reach(&self) -> Option<f32> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl std::fmt::Debug for dyn BehaviorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviorMode")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

/// Downcast the outgoing mode passed to [`BehaviorMode::on_activate`].
pub fn previous_as<T: BehaviorMode>(previous: Option<&dyn BehaviorMode>) -> Option<&T> {
    previous.and_then(|mode| mode.as_any().downcast_ref::<T>())
}
