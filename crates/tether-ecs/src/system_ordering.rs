//! System set definitions and ordering constraints for session stages.
//!
//! Within a frame, input is sampled before modes read it, modes write rig
//! destinations before events and pole interactions may switch them, and
//! smoothing runs after every destination is final.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::Schedule;

/// Sets for systems in the PreUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreUpdateSet {
    /// Feed the intent sampler (scripts, devices).
    Feed,
    /// Snapshot the sampler into this frame's intent.
    Sample,
}

/// Sets for systems in the FixedUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedUpdateSet {
    /// Per-tick hooks of the active modes.
    ModeTick,
    /// Apply queued physics requests to bodies.
    PhysicsSync,
}

/// Sets for systems in the Update stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpdateSet {
    /// Per-frame hooks of the active modes.
    ModeFrame,
    /// Dispatch queued input events to bound handlers.
    Events,
    /// Targeting and interaction with mode-transition poles.
    Interaction,
    /// Apply requested mode switches.
    Switch,
}

/// Sets for systems in the PostUpdate stage.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum PostUpdateSet {
    /// Advance rig and camera toward their destinations.
    Smoothing,
    /// Read final poses (logging, presentation).
    Presentation,
}

/// Configure ordering constraints for the PreUpdate stage.
pub fn configure_preupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(PreUpdateSet::Feed.before(PreUpdateSet::Sample));
}

/// Configure ordering constraints for the FixedUpdate stage.
pub fn configure_fixedupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(FixedUpdateSet::ModeTick.before(FixedUpdateSet::PhysicsSync));
}

/// Configure ordering constraints for the Update stage.
pub fn configure_update_ordering(schedule: &mut Schedule) {
    schedule.configure_sets((
        UpdateSet::ModeFrame.before(UpdateSet::Events),
        UpdateSet::Events.before(UpdateSet::Interaction),
        UpdateSet::Interaction.before(UpdateSet::Switch),
    ));
}

/// Configure ordering constraints for the PostUpdate stage.
pub fn configure_postupdate_ordering(schedule: &mut Schedule) {
    schedule.configure_sets(PostUpdateSet::Smoothing.before(PostUpdateSet::Presentation));
}
