//! Free-fly: first-person look with vertical movement and no collision.

use std::any::Any;

use glam::{Vec2, Vec3};
use tether_config::FreeFlyConfig;
use tether_input::{EventValue, Intent};

use super::FREE_FLY;
use crate::look::{LookLayer, PitchWindow, YawTarget, look_vector, rotate_for_view, simple_move};
use crate::mode::{BehaviorMode, HandlerSpec, ModeContext, ModeKind};

const HANDLERS: &[HandlerSpec] = &[HandlerSpec::axis1("vertical")];

#[derive(Debug, Clone)]
pub struct FreeFlyMode {
    pub config: FreeFlyConfig,
    velocity: Vec3,
    /// Vertical input delivered through the `vertical` handler; added to
    /// the sampled intent axis.
    vertical: f32,
}

impl FreeFlyMode {
    pub fn new(config: FreeFlyConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
            vertical: 0.0,
        }
    }

    pub fn pitch_window(&self) -> PitchWindow {
        PitchWindow::symmetric(self.config.degree_bounds)
    }

    pub fn velocity(&self) -> Vec3 {
        self.velocity
    }
}

impl Default for FreeFlyMode {
    fn default() -> Self {
        Self::new(FreeFlyConfig::default())
    }
}

impl BehaviorMode for FreeFlyMode {
    fn name(&self) -> &'static str {
        FREE_FLY
    }

    fn kind(&self) -> ModeKind {
        ModeKind::FreeFly
    }

    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        let window = self.pitch_window();
        let rig = ctx.rig();
        let pitch = window.clamp(rig.rig.destination.euler.x);
        rig.set_rig_destination(self.config.camera_offset, Vec2::new(pitch, 0.0));
        rig.set_camera_destination(Vec3::ZERO, Vec2::ZERO);
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

        let vertical = (intent.vertical + self.vertical).clamp(-1.0, 1.0);
        let input = Vec3::new(intent.move_axis.x, vertical, intent.move_axis.y);
        self.velocity = if ctx.controller().can_move && input != Vec3::ZERO {
            simple_move(input, Some(ctx.body.yaw())) * self.config.move_speed
        } else {
            Vec3::ZERO
        };
    }

    fn on_fixed_update(&mut self, ctx: &mut ModeContext<'_>) {
        if self.velocity != Vec3::ZERO && ctx.controller().can_move {
            ctx.body.transform.position += self.velocity * ctx.dt;
        }
    }

    fn handlers(&self) -> &'static [HandlerSpec] {
        HANDLERS
    }

    fn invoke(&mut self, handler: &str, value: EventValue, _ctx: &mut ModeContext<'_>) -> bool {
        match (handler, value) {
            ("vertical", EventValue::Axis1(amount)) => {
                self.vertical = amount;
                true
            }
            _ => false,
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
