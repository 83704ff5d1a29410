//! Normalized per-frame intent, event payloads for handler bindings, and
//! scripted intent playback.

pub mod event;
pub mod intent;
pub mod script;

pub use event::{EventValue, HandlerSignature, InputEvent};
pub use intent::{ButtonState, Intent, IntentButton, IntentSampler};
pub use script::{IntentScript, ScriptError, ScriptPlayer, ScriptStep};
