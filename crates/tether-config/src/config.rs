//! Configuration structs with sensible defaults and RON persistence.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::modes::ModesConfig;

/// Upper bound for every smoothing time constant, in seconds.
pub const MAX_SMOOTH_TIME: f32 = 2.0;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Controller flags and camera smoothing, shared by every behavior mode.
    pub controller: ControllerSettings,
    /// Camera shake parameters.
    pub vibration: VibrationConfig,
    /// Per-mode tunables.
    pub modes: ModesConfig,
    /// Frame and fixed-tick cadence of the session.
    pub session: SessionConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Controller flags and smoothing constants.
///
/// Copied verbatim across behavior-mode switches. Smoothing times are in
/// seconds within `[0, 2]`; `0` snaps the value to its destination. Lower
/// values settle faster.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ControllerSettings {
    /// Invert the vertical look axis. Positive pitch looks up, so with this
    /// off a positive vertical look delta raises the view.
    pub inverse_y: bool,
    /// Look input is applied.
    pub can_see: bool,
    /// Movement input is applied.
    pub can_move: bool,
    /// Rig pivot position smoothing time.
    pub rig_move_smooth: f32,
    /// Rig pivot rotation smoothing time.
    pub rig_rotate_smooth: f32,
    /// Camera position smoothing time.
    pub camera_move_smooth: f32,
    /// Camera rotation smoothing time.
    pub camera_rotate_smooth: f32,
}

/// Camera shake parameters. Strength starts at zero and is raised at run time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VibrationConfig {
    /// Shake axis, scaled by its amplitude.
    pub direction: Vec3,
    /// Time for the strength to decay.
    pub smooth_time: f32,
    /// Oscillation frequency in radians per second.
    pub frequency: f32,
    /// Strength below this value snaps to zero.
    pub tolerance: f32,
}

/// Frame and fixed-tick cadence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Physics tick rate (Hz).
    pub fixed_hz: u32,
    /// Simulated render frame rate for headless runs (Hz).
    pub frame_hz: u32,
    /// Number of frames a headless run simulates.
    pub frames: u32,
    /// Mode the character starts in.
    pub start_mode: String,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
    /// Log the camera pose every N frames (0 disables).
    pub pose_log_interval: u32,
}

// --- Default implementations ---

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            inverse_y: false,
            can_see: true,
            can_move: true,
            rig_move_smooth: 0.03,
            rig_rotate_smooth: 0.03,
            camera_move_smooth: 0.03,
            camera_rotate_smooth: 0.03,
        }
    }
}

impl ControllerSettings {
    /// Settings with every smoothing time at zero.
    pub fn snapping() -> Self {
        Self {
            rig_move_smooth: 0.0,
            rig_rotate_smooth: 0.0,
            camera_move_smooth: 0.0,
            camera_rotate_smooth: 0.0,
            ..Self::default()
        }
    }

    /// Check every smoothing time against `[0, 2]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_range("controller.rig_move_smooth", self.rig_move_smooth, 0.0, MAX_SMOOTH_TIME)?;
        check_range("controller.rig_rotate_smooth", self.rig_rotate_smooth, 0.0, MAX_SMOOTH_TIME)?;
        check_range("controller.camera_move_smooth", self.camera_move_smooth, 0.0, MAX_SMOOTH_TIME)?;
        check_range(
            "controller.camera_rotate_smooth",
            self.camera_rotate_smooth,
            0.0,
            MAX_SMOOTH_TIME,
        )
    }
}

impl Default for VibrationConfig {
    fn default() -> Self {
        Self {
            direction: Vec3::Y * 0.01,
            smooth_time: 0.3,
            frequency: 100.0,
            tolerance: 0.1,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60,
            frame_hz: 60,
            frames: 600,
            start_mode: "first_person".to_string(),
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            pose_log_interval: 60,
        }
    }
}

/// Fails with [`ConfigError::OutOfRange`] unless `min <= value <= max`.
pub(crate) fn check_range(
    field: &'static str,
    value: f32,
    min: f32,
    max: f32,
) -> Result<(), ConfigError> {
    if value.is_finite() && value >= min && value <= max {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}

// --- Load / Save / Reload ---

impl Config {
    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join("config.ron");

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            config.validate()?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = Config::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join("config.ron");
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Hot-reload: returns `Some(new_config)` if the file changed, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join("config.ron");
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: Config = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
        new_config.validate()?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }

    /// Reject values outside their documented ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.controller.validate()?;
        check_range("vibration.smooth_time", self.vibration.smooth_time, 0.0, f32::MAX)?;
        check_range("vibration.tolerance", self.vibration.tolerance, 0.0, f32::MAX)?;
        check_range("session.fixed_hz", self.session.fixed_hz as f32, 1.0, 1000.0)?;
        check_range("session.frame_hz", self.session.frame_hz as f32, 1.0, 1000.0)?;
        self.modes.validate()
    }
}
