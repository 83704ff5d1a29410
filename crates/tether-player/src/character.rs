//! The controllable character: body, shared state, the live behavior mode,
//! and its event bindings.

use bevy_ecs::prelude::*;
use tether_config::ControllerSettings;
use tether_input::{InputEvent, Intent};
use tether_math::FORWARD;
use tether_physics::{Ray, SpatialQuery};

use crate::bindings::EventBindings;
use crate::body::{Body, PhysicsRequest, Transform};
use crate::error::{RigError, SwitchError};
use crate::mode::{BehaviorMode, ModeContext, ModeKind, RigRoot, SharedState};
use crate::pole::SessionMemory;
use crate::registry::ModeRegistry;
use crate::rig::CameraRigState;
use crate::switch::switch_character;
use crate::vibration::VibrationDirection;

/// Read-only session services handed to every character call.
#[derive(Clone, Copy)]
pub struct FrameEnv<'a> {
    pub registry: &'a ModeRegistry,
    pub query: Option<&'a dyn SpatialQuery>,
    pub session: SessionMemory,
    /// Session time in seconds.
    pub time: f32,
}

impl<'a> FrameEnv<'a> {
    pub fn new(registry: &'a ModeRegistry) -> Self {
        Self {
            registry,
            query: None,
            session: SessionMemory::default(),
            time: 0.0,
        }
    }

    #[must_use]
    pub fn with_query(mut self, query: &'a dyn SpatialQuery) -> Self {
        self.query = Some(query);
        self
    }
}

/// Which anchors carry a mounted camera rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RigMounts {
    pub character: bool,
    pub parent: bool,
}

impl RigMounts {
    pub const BOTH: RigMounts = RigMounts {
        character: true,
        parent: true,
    };

    pub fn is_mounted(&self, root: RigRoot) -> bool {
        match root {
            RigRoot::Character => self.character,
            RigRoot::Parent => self.parent,
        }
    }
}

/// A controllable agent with exactly one live behavior mode.
#[derive(Component)]
pub struct Character {
    pub(crate) body: Body,
    pub(crate) shared: SharedState,
    pub(crate) mode: Box<dyn BehaviorMode>,
    pub(crate) bindings: EventBindings,
    pub(crate) mounts: RigMounts,
    pub(crate) physics_requests: Vec<PhysicsRequest>,
    /// A missing rig has already been reported for the current mode.
    pub(crate) rig_warned: bool,
}

impl Character {
    /// Create a character running `mode` with the default bindings.
    ///
    /// # Errors
    ///
    /// [`SwitchError::InvalidMode`] if `mode` cannot be instantiated.
    pub fn spawn(env: &FrameEnv<'_>, mode: &str, body: Body) -> Result<Self, SwitchError> {
        let mut instance = env.registry.instantiate(mode).inspect_err(|err| {
            tracing::error!(%err, "cannot spawn character");
        })?;
        let bindings = EventBindings::defaults();
        tracing::debug!(
            mode,
            unresolved = bindings.unresolved(instance.handlers()).count(),
            "default bindings registered"
        );

        let mut body = body;
        let mut shared = SharedState::from_config(env.registry.config());
        let mut physics_requests = Vec::new();
        let mut switch_request = None;
        let mounts = RigMounts::BOTH;
        let mut ctx = ModeContext {
            body: &mut body,
            shared: &mut shared,
            query: env.query,
            session: env.session,
            rig_mounted: mounts.is_mounted(instance.camera_rigging_root()),
            dt: 0.0,
            time: env.time,
            physics: &mut physics_requests,
            switch_request: &mut switch_request,
        };
        instance.on_activate(None, &mut ctx);
        shared.rig.snap();

        let character = Self {
            body,
            shared,
            mode: instance,
            bindings,
            mounts,
            physics_requests,
            rig_warned: false,
        };
        tracing::info!(mode, "character spawned");
        Ok(character)
    }

    /// Run one mode hook with a context over this character, then apply any
    /// switch the hook requested.
    fn run_mode<R>(
        &mut self,
        env: &FrameEnv<'_>,
        dt: f32,
        hook: impl FnOnce(&mut dyn BehaviorMode, &mut ModeContext<'_>) -> R,
    ) -> R {
        let mut switch_request = None;
        let rig_mounted = self.mounts.is_mounted(self.mode.camera_rigging_root());
        let result = {
            let mut ctx = ModeContext {
                body: &mut self.body,
                shared: &mut self.shared,
                query: env.query,
                session: env.session,
                rig_mounted,
                dt,
                time: env.time,
                physics: &mut self.physics_requests,
                switch_request: &mut switch_request,
            };
            hook(self.mode.as_mut(), &mut ctx)
        };
        if let Some(target) = switch_request {
            // The coordinator logs the rejection; the current mode stays live.
            if let Err(err) = self.switch_to(&target, env) {
                tracing::debug!(%err, "requested switch not applied");
            }
        }
        result
    }

    /// Variable-rate update: mode logic, then vibration decay.
    pub fn frame_update(&mut self, intent: &Intent, env: &FrameEnv<'_>, dt: f32) {
        self.run_mode(env, dt, |mode, ctx| mode.on_frame_update(ctx, intent));
        self.shared.vibration.update(dt);
    }

    /// Fixed-rate update.
    pub fn fixed_update(&mut self, env: &FrameEnv<'_>, dt: f32) {
        self.run_mode(env, dt, |mode, ctx| mode.on_fixed_update(ctx));
    }

    /// Advance the camera rig toward its destinations.
    ///
    /// # Errors
    ///
    /// [`RigError::MissingCameraRig`] when the mode needs a camera but none
    /// is mounted on its anchor. The step is skipped and the condition is
    /// logged once per mode.
    pub fn smooth(&mut self, dt: f32) -> Result<(), RigError> {
        if !self.mode.requires_camera() {
            return Ok(());
        }
        self.ensure_rig()?;
        self.shared.rig.step(dt, &self.shared.controller);
        Ok(())
    }

    fn ensure_rig(&mut self) -> Result<(), RigError> {
        let root = self.mode.camera_rigging_root();
        if self.mounts.is_mounted(root) {
            return Ok(());
        }
        let err = RigError::MissingCameraRig(root);
        if !self.rig_warned {
            tracing::warn!(mode = self.mode.name(), %err, "camera update skipped");
            self.rig_warned = true;
        }
        Err(err)
    }

    /// Deliver an external event to every handler bound to it that the live
    /// mode serves. Returns how many handlers ran.
    pub fn dispatch(&mut self, event: &InputEvent, env: &FrameEnv<'_>, dt: f32) -> usize {
        let handlers: Vec<String> = self
            .bindings
            .resolved_handlers_for(&event.action, event.value.signature(), self.mode.handlers())
            .map(str::to_owned)
            .collect();
        let mut invoked = 0;
        for handler in handlers {
            if self.run_mode(env, dt, |mode, ctx| mode.invoke(&handler, event.value, ctx)) {
                invoked += 1;
            } else {
                tracing::debug!(event = %event.action, handler = %handler, "handler not found on mode");
            }
        }
        invoked
    }

    /// Replace the live mode with a new instance of `name`.
    ///
    /// # Errors
    ///
    /// [`SwitchError::InvalidMode`]; the character is left unchanged.
    pub fn switch_to(&mut self, name: &str, env: &FrameEnv<'_>) -> Result<(), SwitchError> {
        switch_character(self, name, env)
    }

    pub fn controller(&self) -> &ControllerSettings {
        &self.shared.controller
    }

    pub fn controller_mut(&mut self) -> &mut ControllerSettings {
        &mut self.shared.controller
    }

    pub fn set_inverse_y(&mut self, inverse_y: bool) {
        self.shared.controller.inverse_y = inverse_y;
    }

    pub fn set_can_move(&mut self, can_move: bool) {
        self.shared.controller.can_move = can_move;
    }

    pub fn set_can_see(&mut self, can_see: bool) {
        self.shared.controller.can_see = can_see;
    }

    /// Start a camera shake of `strength`; it decays on its own.
    pub fn set_vibration(&mut self, strength: f32) {
        self.shared.vibration.set_strength(strength);
    }

    pub fn set_vibration_direction(&mut self, direction: VibrationDirection) {
        self.shared.vibration.set_direction(direction);
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn rig(&self) -> &CameraRigState {
        &self.shared.rig
    }

    pub fn rig_mut(&mut self) -> &mut CameraRigState {
        &mut self.shared.rig
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn mode(&self) -> &dyn BehaviorMode {
        self.mode.as_ref()
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.mode.kind()
    }

    /// Downcast the live mode to edit its tunables.
    pub fn mode_as<T: BehaviorMode>(&self) -> Option<&T> {
        self.mode.as_any().downcast_ref::<T>()
    }

    pub fn mode_as_mut<T: BehaviorMode>(&mut self) -> Option<&mut T> {
        self.mode.as_any_mut().downcast_mut::<T>()
    }

    pub fn bindings(&self) -> &EventBindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut EventBindings {
        &mut self.bindings
    }

    /// Mount or unmount the camera rig on an anchor.
    pub fn mount_rig(&mut self, root: RigRoot, mounted: bool) {
        match root {
            RigRoot::Character => self.mounts.character = mounted,
            RigRoot::Parent => self.mounts.parent = mounted,
        }
        if mounted {
            self.rig_warned = false;
        }
    }

    /// Requests for the rigid-body layer queued since the last drain.
    pub fn drain_physics_requests(&mut self) -> Vec<PhysicsRequest> {
        std::mem::take(&mut self.physics_requests)
    }

    /// World frame anchoring the rig of the live mode.
    pub fn anchor(&self) -> Transform {
        match self.mode.camera_rigging_root() {
            RigRoot::Parent => self.body.parent.unwrap_or(self.body.transform),
            RigRoot::Character => self.body.transform,
        }
    }

    /// World pose of the smoothed camera, without vibration.
    pub fn camera_world_pose(&self) -> Result<Transform, RigError> {
        let root = self.mode.camera_rigging_root();
        if !self.mode.requires_camera() || !self.mounts.is_mounted(root) {
            return Err(RigError::MissingCameraRig(root));
        }
        Ok(self.shared.rig.camera_world(&self.anchor()))
    }

    /// Camera pose handed to rendering: the smoothed pose plus the
    /// world-space vibration offset at `time`.
    pub fn presented_camera_pose(&self, time: f32) -> Result<Transform, RigError> {
        let mut pose = self.camera_world_pose()?;
        pose.position += self.shared.vibration.offset(time);
        Ok(pose)
    }

    pub fn camera_front_ray(&self) -> Result<Ray, RigError> {
        let pose = self.camera_world_pose()?;
        Ok(Ray::new(pose.position, pose.rotation * FORWARD))
    }

    pub fn character_front_ray(&self) -> Ray {
        Ray::new(self.body.transform.position, self.body.transform.forward())
    }

    /// Ray and reach used to target interactable objects, if the live mode
    /// interacts at all.
    pub fn interaction_ray(&self) -> Option<(Ray, f32)> {
        let reach = self.mode.interaction_reach()?;
        let ray = self
            .camera_front_ray()
            .unwrap_or_else(|_| self.character_front_ray());
        Some((ray, reach))
    }
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("mode", &self.mode.name())
            .field("body", &self.body)
            .field("controller", &self.shared.controller)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tether_config::Config;
    use tether_input::{EventValue, IntentButton};

    use crate::modes::{FIRST_PERSON, PLATFORM, THIRD_PERSON, TOP_DOWN, TopDownMode};

    fn registry() -> ModeRegistry {
        let mut config = Config::default();
        config.controller = ControllerSettings::snapping();
        ModeRegistry::with_builtins(config)
    }

    #[test]
    fn test_spawn_settles_rig() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let character = Character::spawn(&env, FIRST_PERSON, Body::default()).unwrap();
        assert_eq!(character.mode_kind(), ModeKind::FirstPerson);
        assert_eq!(character.rig().rig.current, character.rig().rig.destination);
        let handlers = character.mode().handlers();
        let bindings = character.bindings();
        assert_eq!(*bindings, EventBindings::defaults());
        let jump = EventValue::Button(true).signature();
        let zoom = EventValue::Axis1(1.0).signature();
        assert_eq!(bindings.resolved_handlers_for("Jump", jump, handlers).count(), 1);
        assert_eq!(bindings.resolved_handlers_for("Zoom", zoom, handlers).count(), 0);
    }

    #[test]
    fn test_view_switch_button_switches_in_frame() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut character = Character::spawn(&env, FIRST_PERSON, Body::default()).unwrap();
        character.frame_update(&Intent::IDLE.pressing(IntentButton::ViewSwitch), &env, 1.0 / 60.0);
        assert_eq!(character.mode_kind(), ModeKind::ThirdPerson);
    }

    #[test]
    fn test_view_switch_blocked_in_top_down_session() {
        let registry = registry();
        let mut env = FrameEnv::new(&registry);
        env.session.top_down_active = true;
        let mut character = Character::spawn(&env, THIRD_PERSON, Body::default()).unwrap();
        character.frame_update(&Intent::IDLE.pressing(IntentButton::ViewSwitch), &env, 1.0 / 60.0);
        assert_eq!(character.mode_kind(), ModeKind::ThirdPerson);
    }

    #[test]
    fn test_dispatch_runs_bound_handler() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut character = Character::spawn(&env, FIRST_PERSON, Body::default()).unwrap();
        let ran = character.dispatch(&InputEvent::press("Jump"), &env, 1.0 / 60.0);
        assert_eq!(ran, 1);
        assert_eq!(
            character.drain_physics_requests(),
            vec![PhysicsRequest::Impulse(Vec3::Y * 2.0)]
        );
        assert_eq!(character.dispatch(&InputEvent::press("Unbound"), &env, 1.0 / 60.0), 0);
    }

    #[test]
    fn test_zoom_event_in_top_down() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut character = Character::spawn(&env, TOP_DOWN, Body::default()).unwrap();
        let before = character.mode_as::<TopDownMode>().unwrap().distance();
        character.dispatch(&InputEvent::new("Zoom", EventValue::Axis1(1.0)), &env, 0.1);
        let after = character.mode_as::<TopDownMode>().unwrap().distance();
        assert!(after > before);
    }

    #[test]
    fn test_vibration_offsets_presented_pose_only() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut character = Character::spawn(&env, FIRST_PERSON, Body::default()).unwrap();
        character.set_vibration_direction(VibrationDirection::Y);
        character.set_vibration(5.0);
        let time = 0.3;
        let plain = character.camera_world_pose().unwrap();
        let presented = character.presented_camera_pose(time).unwrap();
        let offset = character.shared().vibration.offset(time);
        assert!(offset.length() > 0.0);
        assert!((presented.position - plain.position).abs_diff_eq(offset, 1e-6));
    }

    #[test]
    fn test_vibration_decays_over_frames() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut character = Character::spawn(&env, FIRST_PERSON, Body::default()).unwrap();
        character.set_vibration(1.0);
        for _ in 0..600 {
            character.frame_update(&Intent::IDLE, &env, 1.0 / 60.0);
        }
        assert_eq!(character.shared().vibration.strength, 0.0);
    }

    #[test]
    fn test_platform_camera_follows_parent_frame() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let parent = Transform::from_position(Vec3::new(100.0, 0.0, 0.0));
        let body = Body::at(Vec3::new(102.0, 1.0, 0.0)).with_parent(parent);
        let mut character = Character::spawn(&env, PLATFORM, body).unwrap();
        character.frame_update(&Intent::IDLE, &env, 1.0 / 60.0);
        character.smooth(1.0 / 60.0).unwrap();
        assert_eq!(character.anchor(), parent);
        let camera = character.camera_world_pose().unwrap();
        // Default facing puts the camera on the -Z side, looking along +Z.
        assert!(camera.position.abs_diff_eq(Vec3::new(102.0, 1.0, -5.0), 1e-4));
        assert!((camera.rotation * FORWARD).abs_diff_eq(Vec3::Z, 1e-4));
    }

    #[test]
    fn test_interaction_ray_uses_camera() {
        let registry = registry();
        let env = FrameEnv::new(&registry);
        let mut body = Body::at(Vec3::new(0.0, 1.0, 0.0));
        body.rotate_yaw(90.0);
        let character = Character::spawn(&env, FIRST_PERSON, body).unwrap();
        let (ray, reach) = character.interaction_ray().unwrap();
        assert_eq!(reach, 3.0);
        assert!(ray.direction.abs_diff_eq(Vec3::NEG_X, 1e-4));
        let top_down = Character::spawn(&env, TOP_DOWN, Body::default()).unwrap();
        assert!(top_down.interaction_ray().is_none());
    }
}
