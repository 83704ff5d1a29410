//! Frame-coherent intent snapshot.
//!
//! [`IntentSampler`] accumulates raw values from the input layer during a
//! frame. [`IntentSampler::sample`] turns them into an immutable [`Intent`]
//! with press/release edges and clears the per-frame accumulators.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Discrete presses a behavior mode can react to.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum IntentButton {
    Jump,
    Squat,
    Run,
    /// Held to enable free look in modes that gate it (top-down).
    LookMode,
    /// Toggles between first- and third-person.
    ViewSwitch,
    Interact,
}

impl IntentButton {
    /// Every button, in index order.
    pub const ALL: [IntentButton; 6] = [
        IntentButton::Jump,
        IntentButton::Squat,
        IntentButton::Run,
        IntentButton::LookMode,
        IntentButton::ViewSwitch,
        IntentButton::Interact,
    ];

    fn index(self) -> usize {
        match self {
            IntentButton::Jump => 0,
            IntentButton::Squat => 1,
            IntentButton::Run => 2,
            IntentButton::LookMode => 3,
            IntentButton::ViewSwitch => 4,
            IntentButton::Interact => 5,
        }
    }
}

/// Level and edge state of one button for a single frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ButtonState {
    pub pressed: bool,
    pub just_pressed: bool,
    pub just_released: bool,
}

/// Normalized input for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Intent {
    /// Planar move vector, each axis in `[-1, 1]`. `y` is forward.
    pub move_axis: Vec2,
    /// Raw look delta in device units.
    pub look_delta: Vec2,
    /// Zoom delta (positive zooms out).
    pub zoom: f32,
    /// Vertical move axis in `[-1, 1]` (free-fly).
    pub vertical: f32,
    buttons: [ButtonState; 6],
}

impl Intent {
    /// Intent with every axis at zero and no buttons held.
    pub const IDLE: Intent = Intent {
        move_axis: Vec2::ZERO,
        look_delta: Vec2::ZERO,
        zoom: 0.0,
        vertical: 0.0,
        buttons: [ButtonState {
            pressed: false,
            just_pressed: false,
            just_released: false,
        }; 6],
    };

    /// Intent with the given axes and no buttons; the move vector is clamped.
    pub fn with_axes(move_axis: Vec2, look_delta: Vec2) -> Self {
        Self {
            move_axis: clamp_axis(move_axis),
            look_delta,
            ..Self::IDLE
        }
    }

    /// Builder-style: mark `button` as held and just pressed.
    #[must_use]
    pub fn pressing(mut self, button: IntentButton) -> Self {
        self.buttons[button.index()] = ButtonState {
            pressed: true,
            just_pressed: true,
            just_released: false,
        };
        self
    }

    /// Builder-style: mark `button` as held (no edge).
    #[must_use]
    pub fn holding(mut self, button: IntentButton) -> Self {
        self.buttons[button.index()].pressed = true;
        self
    }

    pub fn button(&self, button: IntentButton) -> ButtonState {
        self.buttons[button.index()]
    }

    pub fn is_pressed(&self, button: IntentButton) -> bool {
        self.buttons[button.index()].pressed
    }

    pub fn just_pressed(&self, button: IntentButton) -> bool {
        self.buttons[button.index()].just_pressed
    }

    pub fn just_released(&self, button: IntentButton) -> bool {
        self.buttons[button.index()].just_released
    }

    /// True when no axis is deflected and no button is held or changed.
    pub fn is_idle(&self) -> bool {
        self.move_axis == Vec2::ZERO
            && self.look_delta == Vec2::ZERO
            && self.zoom == 0.0
            && self.vertical == 0.0
            && self.buttons.iter().all(|b| *b == ButtonState::default())
    }
}

fn clamp_axis(v: Vec2) -> Vec2 {
    v.clamp(Vec2::splat(-1.0), Vec2::splat(1.0))
}

/// Accumulates raw input between samples.
#[derive(Debug, Clone, Default)]
pub struct IntentSampler {
    move_axis: Vec2,
    look_delta: Vec2,
    zoom: f32,
    vertical: f32,
    held: [bool; 6],
    prev_held: [bool; 6],
}

impl IntentSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the level of the move axis. Persists until changed.
    pub fn set_move(&mut self, axis: Vec2) {
        self.move_axis = clamp_axis(axis);
    }

    /// Set the level of the vertical axis. Persists until changed.
    pub fn set_vertical(&mut self, value: f32) {
        self.vertical = value.clamp(-1.0, 1.0);
    }

    /// Add a look delta. Cleared on sample.
    pub fn add_look(&mut self, delta: Vec2) {
        self.look_delta += delta;
    }

    /// Add a zoom delta. Cleared on sample.
    pub fn add_zoom(&mut self, delta: f32) {
        self.zoom += delta;
    }

    /// Set the held state of a button.
    pub fn set_button(&mut self, button: IntentButton, down: bool) {
        self.held[button.index()] = down;
    }

    /// Produce this frame's intent and reset per-frame accumulators.
    pub fn sample(&mut self) -> Intent {
        let mut buttons = [ButtonState::default(); 6];
        for (i, state) in buttons.iter_mut().enumerate() {
            let now = self.held[i];
            let before = self.prev_held[i];
            *state = ButtonState {
                pressed: now,
                just_pressed: now && !before,
                just_released: !now && before,
            };
        }
        self.prev_held = self.held;

        let intent = Intent {
            move_axis: self.move_axis,
            look_delta: self.look_delta,
            zoom: self.zoom,
            vertical: self.vertical,
            buttons,
        };
        self.look_delta = Vec2::ZERO;
        self.zoom = 0.0;
        intent
    }
}
