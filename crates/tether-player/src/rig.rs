//! Dual-stage camera rig: a pivot placed relative to the rig anchor and a
//! camera placed relative to the pivot, each damped toward a destination.

use glam::{Quat, Vec2, Vec3};
use tether_config::ControllerSettings;
use tether_math::{damp_euler, damp_vec3, rotation_from_euler, wrap_degrees};

use crate::body::Transform;

/// Local position and `(pitch, yaw)` rotation in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigPose {
    pub position: Vec3,
    pub euler: Vec2,
}

impl RigPose {
    pub const IDENTITY: RigPose = RigPose {
        position: Vec3::ZERO,
        euler: Vec2::ZERO,
    };

    pub fn new(position: Vec3, euler: Vec2) -> Self {
        Self { position, euler }
    }

    pub fn rotation(&self) -> Quat {
        rotation_from_euler(self.euler)
    }

    fn is_finite(&self) -> bool {
        self.position.is_finite() && self.euler.is_finite()
    }
}

/// One damped layer of the rig.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RigChannel {
    /// Written by the active mode.
    pub destination: RigPose,
    /// Written only by [`CameraRigState::step`].
    pub current: RigPose,
    pub position_velocity: Vec3,
    pub euler_velocity: Vec2,
}

impl RigChannel {
    fn snap(&mut self) {
        self.current = RigPose {
            position: self.destination.position,
            euler: Vec2::new(
                wrap_degrees(self.destination.euler.x),
                wrap_degrees(self.destination.euler.y),
            ),
        };
        self.position_velocity = Vec3::ZERO;
        self.euler_velocity = Vec2::ZERO;
    }

    fn approx_eq(&self, other: &RigChannel, epsilon: f32) -> bool {
        self.destination.position.abs_diff_eq(other.destination.position, epsilon)
            && self.destination.euler.abs_diff_eq(other.destination.euler, epsilon)
            && self.current.position.abs_diff_eq(other.current.position, epsilon)
            && self.current.euler.abs_diff_eq(other.current.euler, epsilon)
            && self.position_velocity.abs_diff_eq(other.position_velocity, epsilon)
            && self.euler_velocity.abs_diff_eq(other.euler_velocity, epsilon)
    }
}

/// Rig pivot and camera layers. Survives mode switches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraRigState {
    /// Pivot, relative to the mode's anchor frame.
    pub rig: RigChannel,
    /// Camera, relative to the pivot.
    pub camera: RigChannel,
}

impl CameraRigState {
    pub fn set_rig_destination(&mut self, position: Vec3, euler: Vec2) {
        self.rig.destination = RigPose::new(position, euler);
    }

    pub fn set_camera_destination(&mut self, position: Vec3, euler: Vec2) {
        self.camera.destination = RigPose::new(position, euler);
    }

    /// Advance current values toward the destinations.
    ///
    /// Order: rig position, rig rotation, camera position, camera rotation.
    /// Each axis uses its own velocity and the matching smoothing time.
    pub fn step(&mut self, dt: f32, settings: &ControllerSettings) {
        debug_assert!(
            self.rig.destination.is_finite() && self.camera.destination.is_finite(),
            "rig destinations must be finite"
        );

        let rig = &mut self.rig;
        rig.current.position = damp_vec3(
            rig.current.position,
            rig.destination.position,
            &mut rig.position_velocity,
            settings.rig_move_smooth,
            dt,
        );
        rig.current.euler = damp_euler(
            rig.current.euler,
            rig.destination.euler,
            &mut rig.euler_velocity,
            settings.rig_rotate_smooth,
            dt,
        );

        let camera = &mut self.camera;
        camera.current.position = damp_vec3(
            camera.current.position,
            camera.destination.position,
            &mut camera.position_velocity,
            settings.camera_move_smooth,
            dt,
        );
        camera.current.euler = damp_euler(
            camera.current.euler,
            camera.destination.euler,
            &mut camera.euler_velocity,
            settings.camera_rotate_smooth,
            dt,
        );
    }

    /// World pose of the smoothed pivot under `anchor`.
    pub fn pivot_world(&self, anchor: &Transform) -> Transform {
        anchor.mul_transform(&Transform {
            position: self.rig.current.position,
            rotation: self.rig.current.rotation(),
        })
    }

    /// World pose of the smoothed camera under `anchor`.
    pub fn camera_world(&self, anchor: &Transform) -> Transform {
        self.pivot_world(anchor).mul_transform(&Transform {
            position: self.camera.current.position,
            rotation: self.camera.current.rotation(),
        })
    }

    /// Jump both layers to their destinations with zero velocity.
    pub fn snap(&mut self) {
        self.rig.snap();
        self.camera.snap();
    }

    /// Field-wise comparison within `epsilon`.
    pub fn approx_eq(&self, other: &CameraRigState, epsilon: f32) -> bool {
        self.rig.approx_eq(&other.rig, epsilon) && self.camera.approx_eq(&other.camera, epsilon)
    }
}
