//! External event subscriptions: `event name -> handler name` with the
//! signature the handler must accept.

use tether_input::HandlerSignature;

use crate::mode::HandlerSpec;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub event: String,
    pub handler: String,
    pub signature: HandlerSignature,
}

impl Binding {
    pub fn new(
        event: impl Into<String>,
        handler: impl Into<String>,
        signature: HandlerSignature,
    ) -> Self {
        Self {
            event: event.into(),
            handler: handler.into(),
            signature,
        }
    }

    /// Whether `handlers` has this binding's handler with the same signature.
    pub fn resolves_in(&self, handlers: &[HandlerSpec]) -> bool {
        handlers
            .iter()
            .any(|spec| spec.name == self.handler && spec.signature == self.signature)
    }
}

/// Ordered set of bindings owned by a character.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EventBindings {
    bindings: Vec<Binding>,
}

impl EventBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings for every handler the built-in modes expose.
    pub fn defaults() -> Self {
        use HandlerSignature::{Axis1, Button};
        let mut bindings = Self::new();
        for (event, handler, signature) in [
            ("Jump", "jump", Button),
            ("Squat", "squat", Button),
            ("Run", "run", Button),
            ("ViewSwitch", "view_switch", Button),
            ("Zoom", "zoom", Axis1),
            ("LookMode", "look_mode", Button),
            ("MarkGround", "mark_ground", Button),
            ("Vertical", "vertical", Axis1),
        ] {
            bindings.bind(Binding::new(event, handler, signature));
        }
        bindings
    }

    /// Add a binding; an identical one is not duplicated.
    pub fn bind(&mut self, binding: Binding) {
        if !self.bindings.contains(&binding) {
            self.bindings.push(binding);
        }
    }

    /// Remove every binding of `event`. Returns how many were removed.
    pub fn unbind(&mut self, event: &str) -> usize {
        let before = self.bindings.len();
        self.bindings.retain(|binding| binding.event != event);
        before - self.bindings.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Binding> {
        self.bindings.iter()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Handlers bound to `event` for values of `signature`.
    pub fn handlers_for<'a>(
        &'a self,
        event: &'a str,
        signature: HandlerSignature,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.bindings
            .iter()
            .filter(move |binding| binding.event == event && binding.signature == signature)
            .map(|binding| binding.handler.as_str())
    }

    /// Handlers bound to `event` for values of `signature` that the mode
    /// publishing `handlers` can serve.
    pub fn resolved_handlers_for<'a>(
        &'a self,
        event: &'a str,
        signature: HandlerSignature,
        handlers: &'a [HandlerSpec],
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.bindings
            .iter()
            .filter(move |binding| {
                binding.event == event
                    && binding.signature == signature
                    && binding.resolves_in(handlers)
            })
            .map(|binding| binding.handler.as_str())
    }

    /// Bindings that `handlers` cannot serve. They stay registered and
    /// resolve again once a mode with a matching handler is live.
    pub fn unresolved<'a>(
        &'a self,
        handlers: &'a [HandlerSpec],
    ) -> impl Iterator<Item = &'a Binding> + 'a {
        self.bindings
            .iter()
            .filter(move |binding| !binding.resolves_in(handlers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WALKER: &[HandlerSpec] = &[HandlerSpec::button("jump"), HandlerSpec::axis1("zoom")];

    #[test]
    fn test_resolution_matches_name_and_signature() {
        let mut bindings = EventBindings::new();
        bindings.bind(Binding::new("Jump", "jump", HandlerSignature::Button));
        bindings.bind(Binding::new("Zoom", "zoom", HandlerSignature::Button));
        bindings.bind(Binding::new("Fly", "vertical", HandlerSignature::Axis1));

        let jump: Vec<_> = bindings
            .resolved_handlers_for("Jump", HandlerSignature::Button, WALKER)
            .collect();
        assert_eq!(jump, ["jump"]);
        assert_eq!(
            bindings
                .resolved_handlers_for("Zoom", HandlerSignature::Button, WALKER)
                .count(),
            0
        );
        let unresolved: Vec<_> = bindings.unresolved(WALKER).map(|b| b.event.as_str()).collect();
        assert_eq!(unresolved, ["Zoom", "Fly"]);
        assert_eq!(bindings.len(), 3);
    }

    #[test]
    fn test_bind_is_idempotent_and_unbind_removes() {
        let mut bindings = EventBindings::new();
        bindings.bind(Binding::new("Jump", "jump", HandlerSignature::Button));
        bindings.bind(Binding::new("Jump", "jump", HandlerSignature::Button));
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.unbind("Jump"), 1);
        assert!(bindings.is_empty());
    }

    #[test]
    fn test_handlers_for_filters_signature() {
        let bindings = EventBindings::defaults();
        assert_eq!(bindings.handlers_for("Zoom", HandlerSignature::Axis1).count(), 1);
        assert_eq!(bindings.handlers_for("Zoom", HandlerSignature::Button).count(), 0);
    }
}
