//! Configuration for the Tether character/camera core.
//!
//! Controller settings and per-mode tunables persist to disk as RON. Supports
//! CLI overrides via clap, hot-reload detection, range validation, and
//! forward/backward compatible serialization.

mod cli;
mod config;
mod error;
mod modes;

pub use cli::CliArgs;
pub use config::{Config, ControllerSettings, DebugConfig, SessionConfig, VibrationConfig};
pub use error::ConfigError;
pub use modes::{
    AiWanderConfig, Facing, FirstPersonConfig, FreeFlyConfig, ModesConfig, PlatformConfig,
    PoleConfig, ThirdPersonConfig, TopDownConfig,
};
