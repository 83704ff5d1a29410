//! World factory function and core resource registration.

use bevy_ecs::prelude::*;

use crate::{InputState, TimeRes};

/// Registers the core session resources into the given world with default values.
pub fn register_core_resources(world: &mut World) {
    world.insert_resource(TimeRes::default());
    world.insert_resource(InputState::default());
}

/// Creates a world with [`TimeRes`] and [`InputState`] pre-inserted.
pub fn create_world() -> World {
    let mut world = World::new();
    register_core_resources(&mut world);
    world
}
