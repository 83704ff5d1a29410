//! Look rotation and movement helpers shared by the modes.

use glam::{Vec2, Vec3};
use tether_math::{wrap_degrees, yaw_rotation};

use crate::mode::ModeContext;

/// Scale a raw look delta by `view_speed * dt * 10`; the vertical component
/// is negated when `inverse_y` is set.
pub fn look_vector(raw: Vec2, view_speed: f32, dt: f32, inverse_y: bool) -> Vec2 {
    let mut look = raw * view_speed * dt * 10.0;
    if inverse_y {
        look.y = -look.y;
    }
    look
}

/// Closed pitch interval in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PitchWindow {
    pub lower: f32,
    pub upper: f32,
}

impl PitchWindow {
    /// `[-90 + guard, 90 - guard]`.
    pub fn symmetric(guard: f32) -> Self {
        Self::new(-90.0 + guard, 90.0 - guard)
    }

    /// Window between two bounds given in any order.
    pub fn new(a: f32, b: f32) -> Self {
        Self {
            lower: a.min(b),
            upper: a.max(b),
        }
    }

    pub fn clamp(&self, pitch: f32) -> f32 {
        pitch.clamp(self.lower, self.upper)
    }

    pub fn contains(&self, pitch: f32) -> bool {
        (self.lower..=self.upper).contains(&pitch)
    }
}

/// Which rig layer receives the pitch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LookLayer {
    Rig,
    Camera,
}

/// Where the yaw goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum YawTarget {
    /// Turn the character's root orientation.
    Root,
    /// Accumulate into the layer's destination yaw.
    Destination,
}

/// Apply a scaled look delta: `x` turns (positive turns right), `y` pitches
/// (positive looks up). Pitch is clamped into `window`.
pub fn rotate_for_view(
    ctx: &mut ModeContext<'_>,
    layer: LookLayer,
    window: PitchWindow,
    look: Vec2,
    yaw: YawTarget,
) {
    let rig = &mut ctx.shared.rig;
    let destination = match layer {
        LookLayer::Rig => &mut rig.rig.destination,
        LookLayer::Camera => &mut rig.camera.destination,
    };
    destination.euler.x = window.clamp(destination.euler.x + look.y);
    match yaw {
        YawTarget::Root => ctx.body.rotate_yaw(-look.x),
        YawTarget::Destination => {
            destination.euler.y = wrap_degrees(destination.euler.y - look.x);
        }
    }
}

/// Direction for an input of `(right, up, forward)`.
///
/// With a reference yaw the planar part is rotated by it and the vertical
/// part stays world up; without one the input is taken in world axes.
pub fn simple_move(input: Vec3, reference_yaw: Option<f32>) -> Vec3 {
    let planar = Vec3::new(input.x, 0.0, -input.z);
    let planar = match reference_yaw {
        Some(yaw) => yaw_rotation(yaw) * planar,
        None => planar,
    };
    planar + Vec3::Y * input.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{Body, PhysicsRequest};
    use crate::mode::SharedState;
    use crate::pole::SessionMemory;

    fn with_ctx(f: impl FnOnce(&mut ModeContext<'_>)) -> (Body, SharedState) {
        let mut body = Body::default();
        let mut shared = SharedState::default();
        let mut physics: Vec<PhysicsRequest> = Vec::new();
        let mut switch = None;
        let mut ctx = ModeContext {
            body: &mut body,
            shared: &mut shared,
            query: None,
            session: SessionMemory::default(),
            rig_mounted: true,
            dt: 1.0 / 60.0,
            time: 0.0,
            physics: &mut physics,
            switch_request: &mut switch,
        };
        f(&mut ctx);
        (body, shared)
    }

    #[test]
    fn test_look_vector_scaling_and_inversion() {
        let look = look_vector(Vec2::new(1.0, 2.0), 5.0, 0.1, true);
        assert!((look.x - 5.0).abs() < 1e-5);
        assert!((look.y + 10.0).abs() < 1e-5);
        let look = look_vector(Vec2::new(1.0, 2.0), 5.0, 0.1, false);
        assert!((look.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_symmetric_window() {
        let window = PitchWindow::symmetric(1.0);
        assert_eq!(window.lower, -89.0);
        assert_eq!(window.upper, 89.0);
        assert_eq!(window.clamp(120.0), 89.0);
        assert_eq!(window.clamp(-120.0), -89.0);
        assert!(window.contains(0.0));
    }

    #[test]
    fn test_symmetric_window_mirrors_clamping() {
        for guard in 1..=30 {
            let window = PitchWindow::symmetric(guard as f32);
            assert_eq!(window.lower, -window.upper);
            for pitch in (-180..=180).step_by(7) {
                let pitch = pitch as f32;
                assert_eq!(window.clamp(-pitch), -window.clamp(pitch), "guard {guard}");
                assert!(window.clamp(pitch).abs() <= 90.0 - guard as f32);
            }
        }
    }

    #[test]
    fn test_window_orders_bounds() {
        let window = PitchWindow::new(-10.0, -89.0);
        assert_eq!(window.lower, -89.0);
        assert_eq!(window.upper, -10.0);
    }

    #[test]
    fn test_root_yaw_turns_body() {
        let (body, shared) = with_ctx(|ctx| {
            rotate_for_view(
                ctx,
                LookLayer::Rig,
                PitchWindow::symmetric(1.0),
                Vec2::new(-30.0, 200.0),
                YawTarget::Root,
            );
        });
        assert!((body.yaw() - 30.0).abs() < 1e-3);
        assert_eq!(shared.rig.rig.destination.euler, Vec2::new(89.0, 0.0));
    }

    #[test]
    fn test_destination_yaw_accumulates() {
        let (body, shared) = with_ctx(|ctx| {
            let window = PitchWindow::symmetric(1.0);
            rotate_for_view(ctx, LookLayer::Camera, window, Vec2::new(10.0, 5.0), YawTarget::Destination);
            rotate_for_view(ctx, LookLayer::Camera, window, Vec2::new(10.0, 5.0), YawTarget::Destination);
        });
        assert_eq!(body.yaw(), 0.0);
        assert_eq!(shared.rig.camera.destination.euler, Vec2::new(10.0, -20.0));
    }

    #[test]
    fn test_simple_move_relative_to_yaw() {
        let forward = simple_move(Vec3::new(0.0, 0.0, 1.0), Some(90.0));
        assert!(forward.abs_diff_eq(Vec3::NEG_X, 1e-5));
        let global = simple_move(Vec3::new(1.0, 1.0, 1.0), None);
        assert_eq!(global, Vec3::new(1.0, 1.0, -1.0));
    }
}
