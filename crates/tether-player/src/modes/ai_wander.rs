//! AI wander: a camera-less mode that walks between random waypoints
//! around the position it was activated at.

use std::any::Any;

use glam::Vec3;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tether_config::AiWanderConfig;
use tether_input::Intent;
use tether_math::{delta_degrees, euler_from_direction};

use super::AI_WANDER;
use crate::mode::{BehaviorMode, ModeContext, ModeKind};

#[derive(Debug, Clone)]
pub struct AiWanderMode {
    pub config: AiWanderConfig,
    rng: Xoshiro256StarStar,
    home: Vec3,
    waypoint: Option<Vec3>,
    idle: f32,
}

impl AiWanderMode {
    pub fn new(config: AiWanderConfig) -> Self {
        let rng = Xoshiro256StarStar::seed_from_u64(config.seed);
        Self {
            config,
            rng,
            home: Vec3::ZERO,
            waypoint: None,
            idle: 0.0,
        }
    }

    pub fn home(&self) -> Vec3 {
        self.home
    }

    pub fn waypoint(&self) -> Option<Vec3> {
        self.waypoint
    }

    /// Pick a point on the horizontal disc of `radius` around home.
    fn next_waypoint(&mut self) -> Vec3 {
        let radius = self.config.radius.max(0.0);
        let angle = self.rng.gen_range(0.0..std::f32::consts::TAU);
        let reach = radius * self.rng.gen_range(0.0f32..=1.0).sqrt();
        self.home + Vec3::new(angle.cos() * reach, 0.0, angle.sin() * reach)
    }
}

impl Default for AiWanderMode {
    fn default() -> Self {
        Self::new(AiWanderConfig::default())
    }
}

impl BehaviorMode for AiWanderMode {
    fn name(&self) -> &'static str {
        AI_WANDER
    }

    fn kind(&self) -> ModeKind {
        ModeKind::AiWander
    }

    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        self.home = ctx.body.transform.position;
        self.waypoint = None;
        self.idle = 0.0;
    }

    /// Face the waypoint being walked to. Intent is ignored.
    fn on_frame_update(&mut self, ctx: &mut ModeContext<'_>, _intent: &Intent) {
        if !ctx.controller().can_move || self.idle > 0.0 {
            return;
        }
        let Some(target) = self.waypoint else {
            return;
        };
        let mut to_target = target - ctx.body.transform.position;
        to_target.y = 0.0;
        if to_target.length() <= self.config.arrive_tolerance {
            return;
        }
        let yaw = euler_from_direction(to_target.normalize()).y;
        ctx.body.rotate_yaw(delta_degrees(ctx.body.yaw(), yaw));
    }

    fn on_fixed_update(&mut self, ctx: &mut ModeContext<'_>) {
        if !ctx.controller().can_move {
            return;
        }
        if self.idle > 0.0 {
            self.idle = (self.idle - ctx.dt).max(0.0);
            return;
        }
        let target = match self.waypoint {
            Some(target) => target,
            None => {
                let target = self.next_waypoint();
                self.waypoint = Some(target);
                tracing::trace!(?target, "wander waypoint");
                target
            }
        };

        let position = ctx.body.transform.position;
        let mut to_target = target - position;
        to_target.y = 0.0;
        let distance = to_target.length();
        if distance <= self.config.arrive_tolerance {
            self.waypoint = None;
            self.idle = self.config.idle_seconds;
            return;
        }

        let step = (self.config.move_speed * ctx.dt).min(distance);
        ctx.body.transform.position += to_target / distance * step;
    }

    fn requires_camera(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
