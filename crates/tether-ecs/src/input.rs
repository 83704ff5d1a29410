//! Per-frame input resource.

use bevy_ecs::prelude::*;
use tether_input::{Intent, InputEvent, IntentSampler};

/// Input for the current frame. The sampler is fed by whatever drives the
/// session; PreUpdate snapshots it into `intent` and the mode systems drain
/// `events`.
#[derive(Resource, Debug, Default)]
pub struct InputState {
    pub sampler: IntentSampler,
    /// Snapshot taken at the start of the frame.
    pub intent: Intent,
    /// Events to dispatch this frame.
    pub events: Vec<InputEvent>,
}

impl InputState {
    /// Snapshot the sampler into `intent`.
    pub fn sample(&mut self) {
        self.intent = self.sampler.sample();
    }

    /// Queue an event for this frame's dispatch.
    pub fn push_event(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Take every queued event.
    pub fn drain_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}
