//! Top-down: the camera trails the rig pivot at a zoomable distance, looking
//! down inside a pitch window. Free look is gated on the look-mode button.

use std::any::Any;

use glam::{Vec2, Vec3};
use tether_config::TopDownConfig;
use tether_input::{EventValue, Intent, IntentButton};
use tether_math::{BACK, FORWARD};
use tether_physics::{
    GroundPoint, GroundSource, LayerMask, Plane, Ray, ground_ray, nearest_hit,
    resolve_ground,
};

use super::TOP_DOWN;
use crate::look::{LookLayer, PitchWindow, YawTarget, look_vector, rotate_for_view, simple_move};
use crate::mode::{BehaviorMode, HandlerSpec, ModeContext, ModeKind, RigRoot};

/// Reach of the ground-marking ray.
const MARK_REACH: f32 = 9999.0;

const HANDLERS: &[HandlerSpec] = &[
    HandlerSpec::axis1("zoom"),
    HandlerSpec::button("look_mode"),
    HandlerSpec::button("mark_ground"),
];

#[derive(Debug, Clone)]
pub struct TopDownMode {
    pub config: TopDownConfig,
    distance: f32,
    look_mode: bool,
    velocity: Vec3,
    ground: Option<GroundPoint>,
    marked: Option<Vec3>,
}

impl TopDownMode {
    pub fn new(config: TopDownConfig) -> Self {
        let distance = config.start_distance;
        Self {
            config,
            distance,
            look_mode: false,
            velocity: Vec3::ZERO,
            ground: None,
            marked: None,
        }
    }

    /// Downward pitch window: `[-(90 - degree_bounds), -min_pitch]`.
    pub fn pitch_window(&self) -> PitchWindow {
        PitchWindow::new(-(90.0 - self.config.degree_bounds), -self.config.min_pitch)
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Set the camera distance, clamped to the zoom range.
    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.config.min_distance, self.config.max_distance);
    }

    /// Ground under the character from the latest frame.
    pub fn ground(&self) -> Option<GroundPoint> {
        self.ground
    }

    /// Point picked by the last `mark_ground`.
    pub fn marked_ground(&self) -> Option<Vec3> {
        self.marked
    }

    pub fn is_look_mode(&self) -> bool {
        self.look_mode
    }

    /// Apply a zoom input of `amount` for one frame.
    pub fn zoom(&mut self, amount: f32, dt: f32) {
        if amount != 0.0 {
            self.set_distance(self.distance + amount * dt * 10.0 * self.config.zoom_speed);
        }
    }

    fn find_ground(&self, ctx: &ModeContext<'_>) -> GroundPoint {
        let position = ctx.body.transform.position;
        let ray = ground_ray(position);
        let mask = LayerMask(self.config.hit_layers);
        let height = self.config.default_ground_height;
        if let Some(query) = ctx.query {
            return resolve_ground(query, &ray, mask, height, position);
        }
        match Plane::horizontal(height).raycast(&ray) {
            Some(point) => GroundPoint {
                point,
                source: GroundSource::Plane,
            },
            None => GroundPoint {
                point: position,
                source: GroundSource::Fallback,
            },
        }
    }

    fn look(&mut self, ctx: &mut ModeContext<'_>, look: Vec2) {
        // Orbiting: horizontal input turns the view the other way.
        let look = Vec2::new(-look.x, look.y);
        rotate_for_view(ctx, LookLayer::Rig, self.pitch_window(), look, YawTarget::Destination);
    }

    fn mark_ground(&mut self, ctx: &ModeContext<'_>) {
        let Some(query) = ctx.query else {
            return;
        };
        let camera = ctx.camera_world(RigRoot::Character);
        let ray = Ray::new(camera.position, camera.rotation * FORWARD);
        let hits = query.raycast_all(&ray, MARK_REACH, LayerMask(self.config.hit_layers));
        self.marked = nearest_hit(&hits).map(|hit| hit.point);
        tracing::debug!(marked = ?self.marked, "top-down ground mark");
    }
}

impl Default for TopDownMode {
    fn default() -> Self {
        Self::new(TopDownConfig::default())
    }
}

impl BehaviorMode for TopDownMode {
    fn name(&self) -> &'static str {
        TOP_DOWN
    }

    fn kind(&self) -> ModeKind {
        ModeKind::TopDown
    }

    fn on_activate(&mut self, _previous: Option<&dyn BehaviorMode>, ctx: &mut ModeContext<'_>) {
        self.distance = self.config.start_distance;
        let window = self.pitch_window();
        let distance = self.distance;
        let rig = ctx.rig();
        let euler = rig.rig.destination.euler;
        rig.set_rig_destination(Vec3::ZERO, Vec2::new(window.clamp(euler.x), euler.y));
        rig.set_camera_destination(BACK * distance, Vec2::ZERO);
    }

    fn on_frame_update(&mut self, ctx: &mut ModeContext<'_>, intent: &Intent) {
        let ground = self.find_ground(ctx);
        self.ground = Some(ground);
        if self.config.force_on_ground {
            ctx.body.transform.position = ground.point;
        }

        if intent.just_pressed(IntentButton::LookMode) {
            self.look_mode = true;
        } else if intent.just_released(IntentButton::LookMode) {
            self.look_mode = false;
        }

        if ctx.rig_mounted && ctx.controller().can_see {
            if self.look_mode && intent.look_delta != Vec2::ZERO {
                let look = look_vector(
                    intent.look_delta,
                    self.config.view_speed,
                    ctx.dt,
                    ctx.controller().inverse_y,
                );
                self.look(ctx, look);
            }
            self.zoom(intent.zoom, ctx.dt);
        }
        if ctx.rig_mounted {
            ctx.rig().camera.destination.position = BACK * self.distance;
        }

        self.velocity = if ctx.controller().can_move && intent.move_axis != Vec2::ZERO {
            let reference = ctx.body.yaw() + ctx.shared.rig.rig.current.euler.y;
            let input = Vec3::new(intent.move_axis.x, 0.0, intent.move_axis.y);
            simple_move(input, Some(reference)) * self.config.move_speed
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

    fn invoke(&mut self, handler: &str, value: EventValue, ctx: &mut ModeContext<'_>) -> bool {
        match (handler, value) {
            ("zoom", EventValue::Axis1(amount)) => {
                if ctx.controller().can_see {
                    self.zoom(amount, ctx.dt);
                }
            }
            ("look_mode", value) => self.look_mode = value.is_pressed(),
            ("mark_ground", value) => {
                if value.is_pressed() {
                    self.mark_ground(ctx);
                }
            }
            _ => return false,
        }
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
