//! Platform: a side-view camera locked to one of four facings, anchored on
//! the character's parent frame.

use std::any::Any;

use glam::{Vec2, Vec3};
use tether_config::{Facing, PlatformConfig};
use tether_input::Intent;

use super::PLATFORM;
use crate::mode::{BehaviorMode, ModeContext, ModeKind, RigRoot};

/// Camera placement for one facing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FacingLayout {
    /// Direction from the character to the camera.
    pub offset: Vec3,
    /// Camera yaw looking back at the character, in degrees.
    pub base_yaw: f32,
    /// World axis that moves right on screen.
    pub right: Vec3,
}

/// Table of camera offset, base yaw and screen-right axis per facing.
pub fn facing_layout(facing: Facing) -> FacingLayout {
    match facing {
        Facing::PositiveX => FacingLayout {
            offset: Vec3::X,
            base_yaw: 90.0,
            right: Vec3::NEG_Z,
        },
        Facing::PositiveZ => FacingLayout {
            offset: Vec3::Z,
            base_yaw: 0.0,
            right: Vec3::X,
        },
        Facing::NegativeX => FacingLayout {
            offset: Vec3::NEG_X,
            base_yaw: -90.0,
            right: Vec3::Z,
        },
        Facing::NegativeZ => FacingLayout {
            offset: Vec3::NEG_Z,
            base_yaw: -180.0,
            right: Vec3::NEG_X,
        },
    }
}

#[derive(Debug, Clone)]
pub struct PlatformMode {
    pub config: PlatformConfig,
    velocity: Vec3,
}

impl PlatformMode {
    pub fn new(config: PlatformConfig) -> Self {
        Self {
            config,
            velocity: Vec3::ZERO,
        }
    }

    pub fn layout(&self) -> FacingLayout {
        facing_layout(self.config.facing)
    }

    /// Camera tilt for a look input: `(pitch, yaw)` offsets, each clamped to
    /// the look limit. Not accumulated across frames.
    fn look_offset(&self, look: Vec2, inverse_y: bool) -> Vec2 {
        let mut look = look.normalize_or_zero() * self.config.view_degree;
        if inverse_y {
            look.y = -look.y;
        }
        let limit = self.config.look_limit;
        Vec2::new(look.y.clamp(-limit, limit), -look.x.clamp(-limit, limit))
    }
}

impl Default for PlatformMode {
    fn default() -> Self {
        Self::new(PlatformConfig::default())
    }
}

impl BehaviorMode for PlatformMode {
    fn name(&self) -> &'static str {
        PLATFORM
    }

    fn kind(&self) -> ModeKind {
        ModeKind::Platform
    }

    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        let layout = self.layout();
        ctx.rig().rig.destination.euler = Vec2::ZERO;
        ctx.rig().camera.destination.position = Vec3::ZERO;
        ctx.rig().camera.destination.euler = Vec2::new(0.0, layout.base_yaw);
    }

    fn on_frame_update(&mut self, ctx: &mut ModeContext<'_>, intent: &Intent) {
        let layout = self.layout();
        if ctx.rig_mounted {
            let anchor = ctx.anchor(RigRoot::Parent);
            let local = anchor.inverse_transform_point(ctx.body.transform.position);
            let offset = if ctx.controller().can_see {
                self.look_offset(intent.look_delta, ctx.controller().inverse_y)
            } else {
                Vec2::ZERO
            };
            let rig = ctx.rig();
            rig.set_rig_destination(local + layout.offset * self.config.distance, Vec2::ZERO);
            rig.set_camera_destination(Vec3::ZERO, Vec2::new(0.0, layout.base_yaw) + offset);
        }

        self.velocity = if ctx.controller().can_move && intent.move_axis != Vec2::ZERO {
            let parent = ctx.anchor(RigRoot::Parent).rotation;
            let planar = layout.right * intent.move_axis.x + Vec3::Y * intent.move_axis.y;
            parent * planar * self.config.move_speed
        } else {
            Vec3::ZERO
        };
    }

    fn on_fixed_update(&mut self, ctx: &mut ModeContext<'_>) {
        if self.velocity != Vec3::ZERO && ctx.controller().can_move {
            ctx.body.transform.position += self.velocity * ctx.dt;
        }
    }

    fn camera_rigging_root(&self) -> RigRoot {
        RigRoot::Parent
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
