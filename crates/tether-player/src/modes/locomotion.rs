//! Walking state shared by the first- and third-person modes.

use glam::Vec3;
use tether_input::{Intent, IntentButton};

use crate::body::PhysicsRequest;
use crate::mode::ModeContext;

/// Run/squat flags and the velocity integrated on fixed ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Locomotion {
    pub velocity: Vec3,
    pub running: bool,
    pub squatting: bool,
}

impl Locomotion {
    /// Move speed after the run multiplier. Running has no effect while
    /// squatting.
    pub fn speed(&self, base: f32, run_multiplier: f32) -> f32 {
        if self.running && !self.squatting {
            base * run_multiplier
        } else {
            base
        }
    }

    /// Change the stance, requesting the matching collider height.
    pub fn set_squat(&mut self, ctx: &mut ModeContext<'_>, squat: bool, stand: f32, crouch: f32) {
        if self.squatting == squat {
            return;
        }
        self.squatting = squat;
        let height = if squat { crouch } else { stand };
        ctx.push_physics(PhysicsRequest::ColliderHeight(height));
    }

    pub fn jump(&self, ctx: &mut ModeContext<'_>, force: f32) {
        if ctx.controller().can_move {
            ctx.push_physics(PhysicsRequest::Impulse(Vec3::Y * force));
        }
    }

    /// Apply run and squat edges from the frame intent.
    pub fn apply_buttons(&mut self, ctx: &mut ModeContext<'_>, intent: &Intent, stand: f32, crouch: f32) {
        if intent.just_pressed(IntentButton::Run) {
            self.running = true;
        } else if intent.just_released(IntentButton::Run) {
            self.running = false;
        }
        if intent.just_pressed(IntentButton::Squat) {
            self.set_squat(ctx, true, stand, crouch);
        } else if intent.just_released(IntentButton::Squat) {
            self.set_squat(ctx, false, stand, crouch);
        }
    }

    /// Advance the world position by one fixed step.
    pub fn integrate(&self, ctx: &mut ModeContext<'_>) {
        if self.velocity != Vec3::ZERO && ctx.controller().can_move {
            ctx.body.transform.position += self.velocity * ctx.dt;
        }
    }
}
