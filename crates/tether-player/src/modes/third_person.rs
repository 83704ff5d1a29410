//! Third-person: a virtual view rotation orbits the camera around the
//! character; the rig pivot is pulled in when geometry blocks the view.

use std::any::Any;

use glam::{Vec2, Vec3};
use tether_config::ThirdPersonConfig;
use tether_input::{EventValue, Intent, IntentButton};
use tether_math::{BACK, euler_from_direction, rotation_from_euler, wrap_degrees};
use tether_physics::{CAMERA_FLOOR, LayerMask, OBSTRUCTION_BUFFER, camera_distance_after_obstruction};

use super::locomotion::Locomotion;
use super::{FIRST_PERSON, THIRD_PERSON};
use crate::look::{PitchWindow, look_vector, simple_move};
use crate::mode::{BehaviorMode, HandlerSpec, ModeContext, ModeKind};

const HANDLERS: &[HandlerSpec] = &[
    HandlerSpec::button("jump"),
    HandlerSpec::button("squat"),
    HandlerSpec::button("run"),
    HandlerSpec::button("view_switch"),
];

#[derive(Debug, Clone)]
pub struct ThirdPersonMode {
    pub config: ThirdPersonConfig,
    pub locomotion: Locomotion,
    /// `(pitch, yaw)` of the virtual camera relative to the character.
    pub view: Vec2,
}

impl ThirdPersonMode {
    pub fn new(config: ThirdPersonConfig) -> Self {
        Self {
            config,
            locomotion: Locomotion::default(),
            view: Vec2::ZERO,
        }
    }

    pub fn pitch_window(&self) -> PitchWindow {
        PitchWindow::symmetric(self.config.degree_bounds)
    }

    /// Back direction of the virtual camera in the character frame.
    pub fn view_back(&self) -> Vec3 {
        rotation_from_euler(self.view) * BACK
    }

    /// Pivot distance along [`Self::view_back`] after obstruction handling.
    pub fn camera_distance(&self, ctx: &ModeContext<'_>) -> f32 {
        match ctx.query {
            Some(query) => {
                let back = ctx.body.transform.rotation * self.view_back();
                camera_distance_after_obstruction(
                    query,
                    ctx.body.transform.position,
                    back,
                    self.config.camera_distance,
                    LayerMask(self.config.hit_layers),
                )
            }
            None => (self.config.camera_distance - OBSTRUCTION_BUFFER).max(CAMERA_FLOOR),
        }
    }

    /// Write rig and camera destinations for the current view.
    fn place_camera(&self, ctx: &mut ModeContext<'_>) {
        let pivot = self.view_back() * self.camera_distance(ctx);
        let look_at = Vec3::new(self.config.view_offset.x, self.config.view_offset.y, 0.0);
        let to_target = look_at - pivot;
        let camera_euler = if to_target.length_squared() > 1e-8 {
            euler_from_direction(to_target)
        } else {
            self.view
        };
        let rig = ctx.rig();
        rig.set_rig_destination(pivot, Vec2::ZERO);
        rig.set_camera_destination(Vec3::ZERO, camera_euler);
    }

    /// Fold the view yaw into the character so it faces where the camera
    /// looks.
    fn transfer_yaw(&mut self, ctx: &mut ModeContext<'_>) {
        ctx.body.rotate_yaw(self.view.y);
        self.view.y = 0.0;
    }

    fn view_switch(&self, ctx: &mut ModeContext<'_>) {
        if !ctx.session.top_down_active {
            ctx.request_switch(FIRST_PERSON);
        }
    }
}

impl Default for ThirdPersonMode {
    fn default() -> Self {
        Self::new(ThirdPersonConfig::default())
    }
}

impl BehaviorMode for ThirdPersonMode {
    fn name(&self) -> &'static str {
        THIRD_PERSON
    }

    fn kind(&self) -> ModeKind {
        ModeKind::ThirdPerson
    }

    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        let inherited_pitch = ctx.shared.rig.rig.destination.euler.x;
        self.view = Vec2::new(self.pitch_window().clamp(inherited_pitch), 0.0);
        self.place_camera(ctx);
    }

    fn on_frame_update(&mut self, ctx: &mut ModeContext<'_>, intent: &Intent) {
        if intent.look_delta != Vec2::ZERO && ctx.controller().can_see {
            let look = look_vector(
                intent.look_delta,
                self.config.view_speed,
                ctx.dt,
                ctx.controller().inverse_y,
            );
            self.view.x = self.pitch_window().clamp(self.view.x + look.y);
            self.view.y = wrap_degrees(self.view.y - look.x);
        }

        self.locomotion
            .apply_buttons(ctx, intent, self.config.stand_height, self.config.squat_height);
        if intent.just_pressed(IntentButton::Jump) {
            self.locomotion.jump(ctx, self.config.jump_force);
        }

        self.locomotion.velocity = if ctx.controller().can_move && intent.move_axis != Vec2::ZERO {
            self.transfer_yaw(ctx);
            let speed = self
                .locomotion
                .speed(self.config.move_speed, self.config.run_multiplier);
            let input = Vec3::new(intent.move_axis.x, 0.0, intent.move_axis.y);
            simple_move(input, Some(ctx.body.yaw())) * speed
        } else {
            Vec3::ZERO
        };

        if ctx.rig_mounted {
            self.place_camera(ctx);
        }

        if intent.just_pressed(IntentButton::ViewSwitch) {
            self.view_switch(ctx);
        }
    }

    fn on_fixed_update(&mut self, ctx: &mut ModeContext<'_>) {
        self.locomotion.integrate(ctx);
    }

    fn handlers(&self) -> &'static [HandlerSpec] {
        HANDLERS
    }

    fn invoke(&mut self, handler: &str, value: EventValue, ctx: &mut ModeContext<'_>) -> bool {
        let pressed = value.is_pressed();
        match handler {
            "jump" if pressed => self.locomotion.jump(ctx, self.config.jump_force),
            "squat" => self.locomotion.set_squat(
                ctx,
                pressed,
                self.config.stand_height,
                self.config.squat_height,
            ),
            "run" => self.locomotion.running = pressed,
            "view_switch" if pressed => self.view_switch(ctx),
            "jump" | "view_switch" => {}
            _ => return false,
        }
        true
    }

    fn interaction_reach(&self) -> Option<f32> {
        Some(self.config.camera_distance + self.config.interact_margin)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
