//! Decaying sinusoidal camera shake.

use glam::Vec3;
use tether_config::VibrationConfig;
use tether_math::damp;

/// Amplitude of the direction presets.
const PRESET_LENGTH: f32 = 0.01;

/// Axis presets for [`VibrationState::set_direction`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VibrationDirection {
    X,
    Y,
    Z,
    XY,
    XZ,
    YZ,
    XYZ,
}

impl VibrationDirection {
    /// Normalized preset axis scaled to the preset amplitude.
    pub fn vector(self) -> Vec3 {
        let axis = match self {
            VibrationDirection::X => Vec3::X,
            VibrationDirection::Y => Vec3::Y,
            VibrationDirection::Z => Vec3::Z,
            VibrationDirection::XY => Vec3::new(1.0, 1.0, 0.0),
            VibrationDirection::XZ => Vec3::new(1.0, 0.0, 1.0),
            VibrationDirection::YZ => Vec3::new(0.0, 1.0, 1.0),
            VibrationDirection::XYZ => Vec3::ONE,
        };
        axis.normalize() * PRESET_LENGTH
    }
}

/// Shake state carried by a character across mode switches.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VibrationState {
    pub direction: Vec3,
    /// Current strength; zero disables the shake.
    pub strength: f32,
    pub frequency: f32,
    pub smooth_time: f32,
    pub tolerance: f32,
    /// Strength decay velocity.
    pub velocity: f32,
}

impl VibrationState {
    pub fn from_config(config: &VibrationConfig) -> Self {
        Self {
            direction: config.direction,
            strength: 0.0,
            frequency: config.frequency,
            smooth_time: config.smooth_time,
            tolerance: config.tolerance,
            velocity: 0.0,
        }
    }

    pub fn set_strength(&mut self, strength: f32) {
        self.strength = strength.max(0.0);
    }

    pub fn set_direction(&mut self, preset: VibrationDirection) {
        self.direction = preset.vector();
    }

    pub fn is_active(&self) -> bool {
        self.strength != 0.0
    }

    /// Decay strength toward zero; below `tolerance` it snaps to zero.
    pub fn update(&mut self, dt: f32) {
        if !self.is_active() {
            return;
        }
        self.strength = damp(self.strength, 0.0, &mut self.velocity, self.smooth_time, dt);
        if self.strength < self.tolerance {
            self.strength = 0.0;
            self.velocity = 0.0;
        }
    }

    /// World-space offset added to the camera position at `time` seconds.
    pub fn offset(&self, time: f32) -> Vec3 {
        if !self.is_active() {
            return Vec3::ZERO;
        }
        self.direction * (time * self.frequency).sin() * self.strength
    }
}

impl Default for VibrationState {
    fn default() -> Self {
        Self::from_config(&VibrationConfig::default())
    }
}
