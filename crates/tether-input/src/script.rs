//! Scripted intent playback for headless sessions and tests.
//!
//! A script is a RON list of steps. Each step holds axis levels and held
//! buttons for a number of frames and fires its events on the first frame.
//!
//! ```ron
//! (steps: [
//!     (frames: 30, move_axis: (0.0, 1.0)),
//!     (frames: 1, hold: [Interact]),
//!     (frames: 10, events: [(action: "ViewSwitch", value: Button(true))]),
//! ])
//! ```

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::event::InputEvent;
use crate::intent::{IntentButton, IntentSampler};

/// Errors raised while loading an intent script.
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read intent script: {0}")]
    ReadError(#[source] std::io::Error),

    #[error("failed to parse intent script: {0}")]
    ParseError(#[source] ron::error::SpannedError),
}

/// One segment of a script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    /// How many frames the step lasts (at least one is played).
    pub frames: u32,
    pub move_axis: Vec2,
    /// Look delta applied on every frame of the step.
    pub look: Vec2,
    pub zoom: f32,
    pub vertical: f32,
    /// Buttons held for the whole step.
    pub hold: Vec<IntentButton>,
    /// Events dispatched on the first frame of the step.
    pub events: Vec<InputEvent>,
}

/// A sequence of steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntentScript {
    pub steps: Vec<ScriptStep>,
}

impl IntentScript {
    pub fn from_ron(s: &str) -> Result<Self, ScriptError> {
        ron::from_str(s).map_err(ScriptError::ParseError)
    }

    pub fn load(path: &Path) -> Result<Self, ScriptError> {
        let contents = std::fs::read_to_string(path).map_err(ScriptError::ReadError)?;
        let script = Self::from_ron(&contents)?;
        tracing::info!(
            path = %path.display(),
            steps = script.steps.len(),
            frames = script.total_frames(),
            "loaded intent script"
        );
        Ok(script)
    }

    /// Total frames played, counting zero-length steps as one.
    pub fn total_frames(&self) -> u32 {
        self.steps.iter().map(|s| s.frames.max(1)).sum()
    }
}

/// Walks a script frame by frame, feeding an [`IntentSampler`].
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    script: IntentScript,
    step: usize,
    frame_in_step: u32,
}

impl ScriptPlayer {
    pub fn new(script: IntentScript) -> Self {
        Self {
            script,
            step: 0,
            frame_in_step: 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.step >= self.script.steps.len()
    }

    /// Apply the next frame's levels to `sampler` and return the events to
    /// dispatch this frame. Returns `None` once the script is exhausted.
    pub fn advance(&mut self, sampler: &mut IntentSampler) -> Option<Vec<InputEvent>> {
        let step = self.script.steps.get(self.step)?;

        sampler.set_move(step.move_axis);
        sampler.set_vertical(step.vertical);
        sampler.add_look(step.look);
        sampler.add_zoom(step.zoom);
        for button in IntentButton::ALL {
            sampler.set_button(button, step.hold.contains(&button));
        }

        let events = if self.frame_in_step == 0 {
            step.events.clone()
        } else {
            Vec::new()
        };

        self.frame_in_step += 1;
        if self.frame_in_step >= step.frames.max(1) {
            self.step += 1;
            self.frame_in_step = 0;
        }
        Some(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventValue;

    const SCRIPT: &str = r#"(steps: [
        (frames: 2, move_axis: (0.0, 1.0), hold: [Run]),
        (frames: 1, events: [(action: "ViewSwitch", value: Button(true))]),
        (frames: 0, look: (4.0, 0.0)),
    ])"#;

    #[test]
    fn test_parse_and_count() {
        let script = IntentScript::from_ron(SCRIPT).unwrap();
        assert_eq!(script.steps.len(), 3);
        assert_eq!(script.total_frames(), 4);
        assert_eq!(script.steps[1].events[0].value, EventValue::Button(true));
    }

    #[test]
    fn test_playback_levels_and_events() {
        let script = IntentScript::from_ron(SCRIPT).unwrap();
        let mut player = ScriptPlayer::new(script);
        let mut sampler = IntentSampler::new();

        let events = player.advance(&mut sampler).unwrap();
        assert!(events.is_empty());
        let intent = sampler.sample();
        assert_eq!(intent.move_axis, Vec2::Y);
        assert!(intent.just_pressed(IntentButton::Run));

        player.advance(&mut sampler).unwrap();
        let intent = sampler.sample();
        assert!(intent.is_pressed(IntentButton::Run));
        assert!(!intent.just_pressed(IntentButton::Run));

        let events = player.advance(&mut sampler).unwrap();
        assert_eq!(events.len(), 1);
        let intent = sampler.sample();
        assert_eq!(intent.move_axis, Vec2::ZERO);
        assert!(intent.just_released(IntentButton::Run));

        player.advance(&mut sampler).unwrap();
        assert_eq!(sampler.sample().look_delta, Vec2::new(4.0, 0.0));

        assert!(player.is_finished());
        assert!(player.advance(&mut sampler).is_none());
    }

    #[test]
    fn test_invalid_script_fails() {
        assert!(matches!(
            IntentScript::from_ron("(steps: [(frames: \"x\")])"),
            Err(ScriptError::ParseError(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.ron");
        std::fs::write(&path, SCRIPT).unwrap();
        let script = IntentScript::load(&path).unwrap();
        assert_eq!(script.total_frames(), 4);
    }
}
