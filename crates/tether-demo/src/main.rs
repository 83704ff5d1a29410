//! Headless demo session for the character and camera rig.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p tether-demo` to play the bundled intent script.
//! Run with `cargo run -p tether-demo -- --mode third_person --frames 300` to
//! start elsewhere.

mod scene;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tether_config::{CliArgs, Config, ConfigError};
use tether_player::SwitchError;
use tracing::info;

/// Failures that stop the demo before the first frame.
#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot start session: {0}")]
    StartMode(#[from] SwitchError),
}

fn config_dir(args: &CliArgs) -> PathBuf {
    args.config.clone().unwrap_or_else(|| {
        dirs::config_dir()
            .map(|dir| dir.join("tether"))
            .unwrap_or_else(|| PathBuf::from("."))
    })
}

fn load_config(args: &CliArgs) -> Result<(PathBuf, Config), DemoError> {
    let config_dir = config_dir(args);
    let mut config = Config::load_or_create(&config_dir)?;
    config.apply_cli_overrides(args);
    config.validate()?;
    Ok((config_dir, config))
}

fn run(args: &CliArgs) -> Result<(), DemoError> {
    let (config_dir, config) = load_config(args)?;

    let log_dir = config_dir.join("logs");
    tether_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    let script = session::load_script(args.script.as_deref());
    let summary = session::run(&config, script)?;
    info!(
        frames = summary.frames,
        fixed_ticks = summary.fixed_ticks,
        mode_switches = summary.mode_switches,
        "session finished"
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("tether-demo: {err}");
            ExitCode::FAILURE
        }
    }
}
