//! First-person: the rig pivot sits at the eye offset, pitch lives on the
//! rig and yaw turns the character.

use std::any::Any;

use glam::{Vec2, Vec3};
use tether_config::FirstPersonConfig;
use tether_input::{EventValue, Intent, IntentButton};

use super::locomotion::Locomotion;
use super::third_person::ThirdPersonMode;
use super::{FIRST_PERSON, THIRD_PERSON};
use crate::look::{LookLayer, PitchWindow, YawTarget, look_vector, rotate_for_view, simple_move};
use crate::mode::{BehaviorMode, HandlerSpec, ModeContext, ModeKind, previous_as};

const HANDLERS: &[HandlerSpec] = &[
    HandlerSpec::button("jump"),
    HandlerSpec::button("squat"),
    HandlerSpec::button("run"),
    HandlerSpec::button("view_switch"),
];

#[derive(Debug, Clone)]
pub struct FirstPersonMode {
    pub config: FirstPersonConfig,
    pub locomotion: Locomotion,
}

impl FirstPersonMode {
    pub fn new(config: FirstPersonConfig) -> Self {
        Self {
            config,
            locomotion: Locomotion::default(),
        }
    }

    pub fn pitch_window(&self) -> PitchWindow {
        PitchWindow::symmetric(self.config.degree_bounds)
    }

    fn view_switch(&self, ctx: &mut ModeContext<'_>) {
        if !ctx.session.top_down_active {
            ctx.request_switch(THIRD_PERSON);
        }
    }

    fn squat(&mut self, ctx: &mut ModeContext<'_>, on: bool) {
        self.locomotion
            .set_squat(ctx, on, self.config.stand_height, self.config.squat_height);
    }
}

impl Default for FirstPersonMode {
    fn default() -> Self {
        Self::new(FirstPersonConfig::default())
    }
}

impl BehaviorMode for FirstPersonMode {
    fn name(&self) -> &'static str {
        FIRST_PERSON
    }

    fn kind(&self) -> ModeKind {
        ModeKind::FirstPerson
    }

    fn on_activate(&mut self, previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        let window = self.pitch_window();
        let rig = ctx.rig();
        let mut pitch = rig.rig.destination.euler.x;
        let mut inherited_yaw = 0.0;
        if let Some(third) = previous_as::<ThirdPersonMode>(previous) {
            pitch = third.view.x;
            inherited_yaw = third.view.y;
        }
        rig.set_rig_destination(self.config.camera_offset, Vec2::new(window.clamp(pitch), 0.0));
        rig.set_camera_destination(Vec3::ZERO, Vec2::ZERO);
        ctx.body.rotate_yaw(inherited_yaw);
    }

    fn on_frame_update(&mut self, ctx: &mut ModeContext<'_>, intent: &Intent) {
        if ctx.rig_mounted {
            ctx.rig().rig.destination.position = self.config.camera_offset;
            if intent.look_delta != Vec2::ZERO && ctx.controller().can_see {
                let look = look_vector(
                    intent.look_delta,
                    self.config.view_speed,
                    ctx.dt,
                    ctx.controller().inverse_y,
                );
                rotate_for_view(ctx, LookLayer::Rig, self.pitch_window(), look, YawTarget::Root);
            }
        }

        self.locomotion
            .apply_buttons(ctx, intent, self.config.stand_height, self.config.squat_height);
        if intent.just_pressed(IntentButton::Jump) {
            self.locomotion.jump(ctx, self.config.jump_force);
        }

        self.locomotion.velocity = if ctx.controller().can_move && intent.move_axis != Vec2::ZERO {
            let speed = self
                .locomotion
                .speed(self.config.move_speed, self.config.run_multiplier);
            let input = Vec3::new(intent.move_axis.x, 0.0, intent.move_axis.y);
            simple_move(input, Some(ctx.body.yaw())) * speed
        } else {
            Vec3::ZERO
        };

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
            "squat" => self.squat(ctx, pressed),
            "run" => self.locomotion.running = pressed,
            "view_switch" if pressed => self.view_switch(ctx),
            "jump" | "view_switch" => {}
            _ => return false,
        }
        true
    }

    fn interaction_reach(&self) -> Option<f32> {
        Some(self.config.interact_reach)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
