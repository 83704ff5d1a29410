//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Tether command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug)]
#[command(name = "tether", about = "Headless character and camera rig session")]
pub struct CliArgs {
    /// Number of frames to simulate.
    #[arg(long)]
    pub frames: Option<u32>,

    /// Physics tick rate (Hz).
    #[arg(long)]
    pub fixed_hz: Option<u32>,

    /// Behavior mode the character starts in.
    #[arg(long)]
    pub mode: Option<String>,

    /// Invert the vertical look axis.
    #[arg(long)]
    pub inverse_y: Option<bool>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Intent script to play back (RON).
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(frames) = args.frames {
            self.session.frames = frames;
        }
        if let Some(hz) = args.fixed_hz {
            self.session.fixed_hz = hz;
        }
        if let Some(ref mode) = args.mode {
            self.session.start_mode = mode.clone();
        }
        if let Some(inverse) = args.inverse_y {
            self.controller.inverse_y = inverse;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_args() -> CliArgs {
        CliArgs {
            frames: None,
            fixed_hz: None,
            mode: None,
            inverse_y: None,
            log_level: None,
            script: None,
            config: None,
        }
    }

    #[test]
    fn test_cli_override() {
        let mut config = Config::default();
        let args = CliArgs {
            frames: Some(120),
            mode: Some("top_down".to_string()),
            ..empty_args()
        };
        config.apply_cli_overrides(&args);
        assert_eq!(config.session.frames, 120);
        assert_eq!(config.session.start_mode, "top_down");
        // Non-overridden fields retain defaults
        assert_eq!(config.session.fixed_hz, 60);
        assert!(!config.controller.inverse_y);
    }

    #[test]
    fn test_cli_no_override() {
        let original = Config::default();
        let mut config = Config::default();
        config.apply_cli_overrides(&empty_args());
        assert_eq!(config, original);
    }

    #[test]
    fn test_cli_parses_flags() {
        let args = CliArgs::parse_from(["tether", "--frames", "30", "--inverse-y", "true"]);
        assert_eq!(args.frames, Some(30));
        assert_eq!(args.inverse_y, Some(true));
        assert!(args.script.is_none());
    }
}
