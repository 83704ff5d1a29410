//! Owned state for driving a mode hook outside a `Character`.

use tether_physics::SpatialQuery;

use crate::body::{Body, PhysicsRequest};
use crate::mode::{ModeContext, SharedState};
use crate::pole::SessionMemory;

pub(crate) const DT: f32 = 1.0 / 60.0;

pub(crate) struct Harness {
    pub body: Body,
    pub shared: SharedState,
    pub physics: Vec<PhysicsRequest>,
    pub switch_request: Option<String>,
    pub session: SessionMemory,
}

impl Harness {
    pub fn new(body: Body) -> Self {
        Self {
            body,
            shared: SharedState::default(),
            physics: Vec::new(),
            switch_request: None,
            session: SessionMemory::default(),
        }
    }

    /// Run `f` with a mounted rig and a one-frame `dt`.
    pub fn run<R>(
        &mut self,
        query: Option<&dyn SpatialQuery>,
        f: impl FnOnce(&mut ModeContext<'_>) -> R,
    ) -> R {
        let mut ctx = ModeContext {
            body: &mut self.body,
            shared: &mut self.shared,
            query,
            session: self.session,
            rig_mounted: true,
            dt: DT,
            time: 0.0,
            physics: &mut self.physics,
            switch_request: &mut self.switch_request,
        };
        f(&mut ctx)
    }
}
