//! Per-mode tunables. These stay with the mode instance and are not carried
//! across switches.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::config::check_range;
use crate::error::ConfigError;

/// Every layer bit set.
const ALL_LAYERS: u32 = u32::MAX;

/// Tunables for all built-in modes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModesConfig {
    pub first_person: FirstPersonConfig,
    pub third_person: ThirdPersonConfig,
    pub top_down: TopDownConfig,
    pub platform: PlatformConfig,
    pub free_fly: FreeFlyConfig,
    pub ai_wander: AiWanderConfig,
    /// Overrides applied when the mode-transition pole drives the switch.
    pub pole: PoleConfig,
}

/// First-person tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FirstPersonConfig {
    /// Rig pivot offset from the character origin.
    pub camera_offset: Vec3,
    /// Movement speed in units per second.
    pub move_speed: f32,
    /// Look sensitivity.
    pub view_speed: f32,
    /// Pitch guard in degrees: pitch stays within `±(90 - degree_bounds)`.
    pub degree_bounds: f32,
    /// Speed multiplier while running (ignored while squatting).
    pub run_multiplier: f32,
    /// Upward impulse requested on jump.
    pub jump_force: f32,
    /// Collider height while standing.
    pub stand_height: f32,
    /// Collider height while squatting.
    pub squat_height: f32,
    /// Ray length used to target interactable objects.
    pub interact_reach: f32,
}

/// Third-person tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ThirdPersonConfig {
    /// Local offset of the camera's look-at point around the character center.
    pub view_offset: Vec2,
    pub move_speed: f32,
    pub view_speed: f32,
    pub degree_bounds: f32,
    /// Camera distance when nothing obstructs the view.
    pub camera_distance: f32,
    /// Layers that shorten the camera distance.
    pub hit_layers: u32,
    pub run_multiplier: f32,
    pub jump_force: f32,
    pub stand_height: f32,
    pub squat_height: f32,
    /// Added to `camera_distance` to get the interaction ray length.
    pub interact_margin: f32,
}

/// Top-down tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TopDownConfig {
    /// Snap the character onto the ground every frame.
    pub force_on_ground: bool,
    /// Camera distance when the mode activates.
    pub start_distance: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Layers treated as ground.
    pub hit_layers: u32,
    pub move_speed: f32,
    pub view_speed: f32,
    pub zoom_speed: f32,
    /// Pitch guard against looking straight down.
    pub degree_bounds: f32,
    /// Shallowest allowed downward pitch, in degrees.
    pub min_pitch: f32,
    /// Height of the fallback ground plane.
    pub default_ground_height: f32,
}

/// Side-view facing preset of the platform camera.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Facing {
    PositiveX,
    PositiveZ,
    NegativeX,
    #[default]
    NegativeZ,
}

/// Platform tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PlatformConfig {
    /// Camera distance from the character along the facing axis.
    pub distance: f32,
    /// Side the camera sits on.
    pub facing: Facing,
    pub move_speed: f32,
    /// Degrees of camera tilt per unit of look input.
    pub view_degree: f32,
    /// Maximum look tilt in degrees.
    pub look_limit: f32,
}

/// Free-fly tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FreeFlyConfig {
    pub camera_offset: Vec3,
    pub move_speed: f32,
    pub view_speed: f32,
    pub degree_bounds: f32,
}

/// AI wander tunables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AiWanderConfig {
    /// Seed for waypoint selection.
    pub seed: u64,
    /// Waypoints are drawn within this radius of the home position.
    pub radius: f32,
    pub move_speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub arrive_tolerance: f32,
    /// Pause at each waypoint, in seconds.
    pub idle_seconds: f32,
}

/// Overrides applied by the mode-transition pole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PoleConfig {
    /// Top-down camera distance after entering through the pole.
    pub top_down_start_distance: f32,
    /// Downward pitch of the top-down rig after entering through the pole.
    pub top_down_pitch: f32,
    /// Layers the pole targeting ray tests.
    pub target_layers: u32,
}

impl Default for FirstPersonConfig {
    fn default() -> Self {
        Self {
            camera_offset: Vec3::ZERO,
            move_speed: 5.0,
            view_speed: 5.0,
            degree_bounds: 1.0,
            run_multiplier: 1.5,
            jump_force: 2.0,
            stand_height: 2.5,
            squat_height: 1.0,
            interact_reach: 3.0,
        }
    }
}

impl Default for ThirdPersonConfig {
    fn default() -> Self {
        Self {
            view_offset: Vec2::ZERO,
            move_speed: 5.0,
            view_speed: 5.0,
            degree_bounds: 1.0,
            camera_distance: 8.0,
            hit_layers: ALL_LAYERS,
            run_multiplier: 1.5,
            jump_force: 2.0,
            stand_height: 2.5,
            squat_height: 1.0,
            interact_margin: 4.0,
        }
    }
}

impl Default for TopDownConfig {
    fn default() -> Self {
        Self {
            force_on_ground: false,
            start_distance: 5.0,
            min_distance: 3.0,
            max_distance: 50.0,
            hit_layers: ALL_LAYERS,
            move_speed: 5.0,
            view_speed: 5.0,
            zoom_speed: 3.0,
            degree_bounds: 1.0,
            min_pitch: 10.0,
            default_ground_height: 0.0,
        }
    }
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            facing: Facing::NegativeZ,
            move_speed: 5.0,
            view_degree: 5.0,
            look_limit: 40.0,
        }
    }
}

impl Default for FreeFlyConfig {
    fn default() -> Self {
        Self {
            camera_offset: Vec3::ZERO,
            move_speed: 5.0,
            view_speed: 5.0,
            degree_bounds: 1.0,
        }
    }
}

impl Default for AiWanderConfig {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            radius: 10.0,
            move_speed: 2.0,
            arrive_tolerance: 0.25,
            idle_seconds: 1.0,
        }
    }
}

impl Default for PoleConfig {
    fn default() -> Self {
        Self {
            top_down_start_distance: 50.0,
            top_down_pitch: 45.0,
            target_layers: ALL_LAYERS,
        }
    }
}

impl ModesConfig {
    /// Reject tunables outside their documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("first_person.degree_bounds", self.first_person.degree_bounds, 1.0, 30.0)?;
        check_range("third_person.degree_bounds", self.third_person.degree_bounds, 1.0, 30.0)?;
        check_range("top_down.degree_bounds", self.top_down.degree_bounds, 1.0, 30.0)?;
        check_range("free_fly.degree_bounds", self.free_fly.degree_bounds, 1.0, 30.0)?;
        check_range(
            "third_person.camera_distance",
            self.third_person.camera_distance,
            0.0,
            f32::MAX,
        )?;

        let td = &self.top_down;
        check_range("top_down.min_distance", td.min_distance, 0.0, td.max_distance)?;
        check_range("top_down.start_distance", td.start_distance, td.min_distance, td.max_distance)?;
        check_range("top_down.min_pitch", td.min_pitch, 0.0, 90.0 - td.degree_bounds)?;
        check_range("platform.look_limit", self.platform.look_limit, 0.0, 89.0)?;
        check_range("ai_wander.radius", self.ai_wander.radius, 0.0, f32::MAX)?;
        check_range(
            "pole.top_down_pitch",
            self.pole.top_down_pitch,
            td.min_pitch,
            90.0 - td.degree_bounds,
        )
    }
}
