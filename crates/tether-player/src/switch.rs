//! Live behavior-mode replacement.
//!
//! The incoming mode is built and activated against a staged copy of the
//! character's shared state, then committed in one assignment block. The
//! registered bindings are kept as they are; those the incoming handler table
//! cannot serve are reported and skipped until a mode that serves them is
//! live again. A failed lookup leaves the character untouched.

use crate::character::{Character, FrameEnv};
use crate::error::SwitchError;
use crate::mode::ModeContext;

/// Replace `character`'s live mode with a new instance of `name`.
///
/// # Errors
///
/// [`SwitchError::InvalidMode`] when `name` is unknown or abstract.
pub fn switch_character(
    character: &mut Character,
    name: &str,
    env: &FrameEnv<'_>,
) -> Result<(), SwitchError> {
    let mut incoming = env.registry.instantiate(name).inspect_err(|err| {
        tracing::error!(%err, from = character.mode.name(), "mode switch rejected");
    })?;

    let mut staged = character.shared.continuity_copy();
    let mut body = character.body;
    let mut physics = Vec::new();
    let mut chained = None;
    let rig_mounted = character.mounts.is_mounted(incoming.camera_rigging_root());
    let mut ctx = ModeContext {
        body: &mut body,
        shared: &mut staged,
        query: env.query,
        session: env.session,
        rig_mounted,
        dt: 0.0,
        time: env.time,
        physics: &mut physics,
        switch_request: &mut chained,
    };
    incoming.on_activate(Some(character.mode.as_ref()), &mut ctx);
    if let Some(chained) = chained {
        tracing::debug!(mode = name, ignored = %chained, "switch requested during activation");
    }

    let handlers = incoming.handlers();
    let mut unresolved = 0;
    for binding in character.bindings.unresolved(handlers) {
        unresolved += 1;
        tracing::warn!(
            event = %binding.event,
            handler = %binding.handler,
            signature = ?binding.signature,
            mode = name,
            "UnresolvedEventBinding: binding skipped"
        );
    }

    let outgoing = std::mem::replace(&mut character.mode, incoming);
    character.shared = staged;
    character.body = body;
    character.physics_requests.extend(physics);
    character.rig_warned = false;

    tracing::info!(
        from = outgoing.name(),
        to = name,
        unresolved_bindings = unresolved,
        "behavior mode switched"
    );
    Ok(())
}
