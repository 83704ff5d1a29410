//! Payloads delivered to named mode handlers through event bindings.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Shape of the value a handler accepts. A binding only survives a mode
/// switch when the new mode exposes the same handler name with the same
/// signature.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum HandlerSignature {
    Button,
    Axis1,
    Axis2,
}

/// A single event value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EventValue {
    Button(bool),
    Axis1(f32),
    Axis2(Vec2),
}

impl EventValue {
    pub fn signature(&self) -> HandlerSignature {
        match self {
            EventValue::Button(_) => HandlerSignature::Button,
            EventValue::Axis1(_) => HandlerSignature::Axis1,
            EventValue::Axis2(_) => HandlerSignature::Axis2,
        }
    }

    /// True for a pressed button.
    pub fn is_pressed(&self) -> bool {
        matches!(self, EventValue::Button(true))
    }
}

/// An external input event addressed by action name (e.g. `"ViewSwitch"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub action: String,
    pub value: EventValue,
}

impl InputEvent {
    pub fn new(action: impl Into<String>, value: EventValue) -> Self {
        Self {
            action: action.into(),
            value,
        }
    }

    /// A pressed-button event.
    pub fn press(action: impl Into<String>) -> Self {
        Self::new(action, EventValue::Button(true))
    }
}
