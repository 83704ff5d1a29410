//! ECS systems driving characters through the session stages.
//!
//! Each system documents its stage and set. Every per-frame call builds a
//! [`FrameEnv`] from the registry, the optional scene query, the session
//! memory and the clock.

use bevy_ecs::prelude::*;
use tether_ecs::{
    FixedUpdateSet, InputState, PostUpdateSet, PreUpdateSet, SessionSchedule, SessionSchedules,
    TimeRes, UpdateSet, configure_fixedupdate_ordering, configure_postupdate_ordering,
    configure_preupdate_ordering, configure_update_ordering,
};
use tether_input::{Intent, IntentButton};
use tether_physics::{HitId, LayerMask, SpatialQuery};

use crate::character::{Character, FrameEnv};
use crate::pole::{ModeTransitionPole, PoleTargeting, SessionMemory};
use crate::registry::ModeRegistry;

/// Scene geometry the modes raycast against.
#[derive(Resource)]
pub struct SceneQuery(pub Box<dyn SpatialQuery + Send + Sync>);

/// Marks the character that receives sampled intent and input events.
#[derive(Component, Debug, Default, Clone, Copy)]
pub struct Player;

/// Mode switches requested from outside the characters (tools, scripts).
#[derive(Resource, Debug, Default)]
pub struct SwitchRequests(pub Vec<(Entity, String)>);

impl SwitchRequests {
    pub fn request(&mut self, character: Entity, mode: impl Into<String>) {
        self.0.push((character, mode.into()));
    }
}

fn frame_env<'a>(
    registry: &'a ModeRegistry,
    scene: Option<&'a SceneQuery>,
    memory: SessionMemory,
    time: &TimeRes,
) -> FrameEnv<'a> {
    FrameEnv {
        registry,
        query: scene.map(|scene| scene.0.as_ref() as &dyn SpatialQuery),
        session: memory,
        time: time.elapsed as f32,
    }
}

/// Insert the resources the character systems read.
pub fn register_player_resources(world: &mut World, registry: ModeRegistry) {
    world.insert_resource(registry);
    world.insert_resource(SessionMemory::default());
    world.insert_resource(SwitchRequests::default());
}

/// Snapshot the intent sampler.
///
/// **Stage:** PreUpdate, [`PreUpdateSet::Sample`].
pub fn sample_intent_system(mut input: ResMut<InputState>) {
    input.sample();
}

/// Run the fixed hook of every character.
///
/// **Stage:** FixedUpdate, [`FixedUpdateSet::ModeTick`].
pub fn mode_fixed_system(
    time: Res<TimeRes>,
    registry: Res<ModeRegistry>,
    scene: Option<Res<SceneQuery>>,
    memory: Res<SessionMemory>,
    mut characters: Query<&mut Character>,
) {
    let env = frame_env(&registry, scene.as_deref(), *memory, &time);
    for mut character in &mut characters {
        character.fixed_update(&env, time.fixed_dt);
    }
}

/// Run the frame hook of every character. The player gets the sampled
/// intent; everyone else idles.
///
/// **Stage:** Update, [`UpdateSet::ModeFrame`].
pub fn mode_frame_system(
    time: Res<TimeRes>,
    input: Res<InputState>,
    registry: Res<ModeRegistry>,
    scene: Option<Res<SceneQuery>>,
    memory: Res<SessionMemory>,
    mut characters: Query<(&mut Character, Has<Player>)>,
) {
    let env = frame_env(&registry, scene.as_deref(), *memory, &time);
    for (mut character, is_player) in &mut characters {
        let intent = if is_player { &input.intent } else { &Intent::IDLE };
        character.frame_update(intent, &env, time.delta);
    }
}

/// Deliver this frame's input events to the player's bound handlers.
///
/// **Stage:** Update, [`UpdateSet::Events`].
pub fn event_dispatch_system(
    time: Res<TimeRes>,
    mut input: ResMut<InputState>,
    registry: Res<ModeRegistry>,
    scene: Option<Res<SceneQuery>>,
    memory: Res<SessionMemory>,
    mut players: Query<&mut Character, With<Player>>,
) {
    let events = input.drain_events();
    if events.is_empty() {
        return;
    }
    let env = frame_env(&registry, scene.as_deref(), *memory, &time);
    for mut character in &mut players {
        for event in &events {
            let ran = character.dispatch(event, &env, time.delta);
            tracing::trace!(event = %event.action, handlers = ran, "event dispatched");
        }
    }
}

/// Cast each player's interaction ray and mark the pole it rests on.
///
/// Players whose mode has no interaction reach leave pole state alone.
///
/// **Stage:** Update, [`UpdateSet::Interaction`].
pub fn pole_targeting_system(
    scene: Option<Res<SceneQuery>>,
    registry: Res<ModeRegistry>,
    mut players: Query<(Entity, &Character, &mut PoleTargeting), With<Player>>,
    mut poles: Query<&mut ModeTransitionPole>,
) {
    let Some(scene) = scene else {
        return;
    };
    let pole_ids: Vec<HitId> = poles.iter().map(|pole| pole.id).collect();
    let mask = LayerMask(registry.config().modes.pole.target_layers);

    for (entity, character, mut targeting) in &mut players {
        let Some((ray, reach)) = character.interaction_ray() else {
            continue;
        };
        let (previous, current) =
            targeting.cast(scene.0.as_ref(), &ray, reach, mask, |id| pole_ids.contains(&id));
        for mut pole in &mut poles {
            if Some(pole.id) == current {
                pole.set_target(Some(entity));
            } else if Some(pole.id) == previous && pole.player == Some(entity) {
                pole.set_target(None);
            }
        }
    }
}

/// Toggle the player through a pole when interact is pressed.
///
/// **Stage:** Update, [`UpdateSet::Interaction`], after targeting.
pub fn pole_interact_system(
    time: Res<TimeRes>,
    input: Res<InputState>,
    registry: Res<ModeRegistry>,
    scene: Option<Res<SceneQuery>>,
    mut memory: ResMut<SessionMemory>,
    poles: Query<&ModeTransitionPole>,
    mut characters: Query<&mut Character>,
) {
    if !input.intent.just_pressed(IntentButton::Interact) {
        return;
    }
    for pole in &poles {
        let Some(entity) = pole.player else {
            continue;
        };
        let Ok(mut character) = characters.get_mut(entity) else {
            continue;
        };
        let env = frame_env(&registry, scene.as_deref(), *memory, &time);
        match pole.interact(&mut character, &mut memory, &env) {
            Ok(Some(transition)) => tracing::debug!(?transition, "pole interaction"),
            Ok(None) => {}
            Err(err) => tracing::error!(%err, "pole interaction failed"),
        }
    }
}

/// Apply externally requested mode switches.
///
/// **Stage:** Update, [`UpdateSet::Switch`].
pub fn apply_switch_requests_system(
    time: Res<TimeRes>,
    registry: Res<ModeRegistry>,
    scene: Option<Res<SceneQuery>>,
    memory: Res<SessionMemory>,
    mut requests: ResMut<SwitchRequests>,
    mut characters: Query<&mut Character>,
) {
    if requests.0.is_empty() {
        return;
    }
    let env = frame_env(&registry, scene.as_deref(), *memory, &time);
    for (entity, mode) in requests.0.drain(..) {
        match characters.get_mut(entity) {
            Ok(mut character) => {
                // The coordinator logs rejected switches at error level.
                if let Err(err) = character.switch_to(&mode, &env) {
                    tracing::debug!(?entity, %err, "external switch request dropped");
                }
            }
            Err(_) => tracing::warn!(?entity, mode = %mode, "switch requested for a missing character"),
        }
    }
}

/// Advance every character's camera rig.
///
/// **Stage:** PostUpdate, [`PostUpdateSet::Smoothing`].
pub fn rig_smoothing_system(time: Res<TimeRes>, mut characters: Query<&mut Character>) {
    for mut character in &mut characters {
        // A missing rig is reported once by the character itself.
        character.smooth(time.delta).ok();
    }
}

/// Configure stage ordering and add every character system.
pub fn register_character_systems(schedules: &mut SessionSchedules) {
    if let Some(schedule) = schedules.get_schedule_mut(&SessionSchedule::PreUpdate) {
        configure_preupdate_ordering(schedule);
    }
    if let Some(schedule) = schedules.get_schedule_mut(&SessionSchedule::FixedUpdate) {
        configure_fixedupdate_ordering(schedule);
    }
    if let Some(schedule) = schedules.get_schedule_mut(&SessionSchedule::Update) {
        configure_update_ordering(schedule);
    }
    if let Some(schedule) = schedules.get_schedule_mut(&SessionSchedule::PostUpdate) {
        configure_postupdate_ordering(schedule);
    }

    schedules.add_system(
        SessionSchedule::PreUpdate,
        sample_intent_system.in_set(PreUpdateSet::Sample),
    );
    schedules.add_system(
        SessionSchedule::FixedUpdate,
        mode_fixed_system.in_set(FixedUpdateSet::ModeTick),
    );
    schedules.add_system(
        SessionSchedule::Update,
        mode_frame_system.in_set(UpdateSet::ModeFrame),
    );
    schedules.add_system(
        SessionSchedule::Update,
        event_dispatch_system.in_set(UpdateSet::Events),
    );
    schedules.add_system(
        SessionSchedule::Update,
        (pole_targeting_system, pole_interact_system)
            .chain()
            .in_set(UpdateSet::Interaction),
    );
    schedules.add_system(
        SessionSchedule::Update,
        apply_switch_requests_system.in_set(UpdateSet::Switch),
    );
    schedules.add_system(
        SessionSchedule::PostUpdate,
        rig_smoothing_system.in_set(PostUpdateSet::Smoothing),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};
    use tether_config::{Config, ControllerSettings};
    use tether_ecs::create_world;
    use tether_physics::{Shape, StaticScene};

    use crate::body::Body;
    use crate::mode::ModeKind;
    use crate::modes::{AI_WANDER, FIRST_PERSON};

    const DT: f64 = 1.0 / 60.0;

    fn session() -> (World, SessionSchedules) {
        let mut config = Config::default();
        config.controller = ControllerSettings::snapping();
        let registry = ModeRegistry::with_builtins(config);
        let mut world = create_world();
        register_player_resources(&mut world, registry);
        let mut schedules = SessionSchedules::new();
        register_character_systems(&mut schedules);
        (world, schedules)
    }

    fn spawn(world: &World, mode: &str, body: Body) -> Character {
        let registry = world.resource::<ModeRegistry>();
        Character::spawn(&FrameEnv::new(registry), mode, body).unwrap()
    }

    #[test]
    fn test_player_walks_forward_under_schedules() {
        let (mut world, mut schedules) = session();
        let character = spawn(&world, FIRST_PERSON, Body::default());
        let entity = world.spawn((character, Player, PoleTargeting::default())).id();

        world.resource_mut::<InputState>().sampler.set_move(Vec2::new(0.0, 1.0));
        for _ in 0..60 {
            schedules.run(&mut world, DT);
        }
        let position = world.get::<Character>(entity).unwrap().body().transform.position;
        assert!(position.z < -4.0, "walked to {position}");
        assert!(position.x.abs() < 1e-3);
    }

    #[test]
    fn test_npc_ignores_player_intent() {
        let (mut world, mut schedules) = session();
        let npc = spawn(&world, FIRST_PERSON, Body::default());
        let entity = world.spawn(npc).id();
        world.resource_mut::<InputState>().sampler.set_move(Vec2::new(1.0, 0.0));
        for _ in 0..10 {
            schedules.run(&mut world, DT);
        }
        let position = world.get::<Character>(entity).unwrap().body().transform.position;
        assert_eq!(position, Vec3::ZERO);
    }

    #[test]
    fn test_ai_wander_runs_on_fixed_ticks() {
        let (mut world, mut schedules) = session();
        let ai = spawn(&world, AI_WANDER, Body::default());
        let entity = world.spawn(ai).id();
        for _ in 0..30 {
            schedules.run(&mut world, DT);
        }
        let character = world.get::<Character>(entity).unwrap();
        assert_eq!(character.mode_kind(), ModeKind::AiWander);
        assert_ne!(character.body().transform.position, Vec3::ZERO);
    }

    #[test]
    fn test_switch_request_applied() {
        let (mut world, mut schedules) = session();
        let character = spawn(&world, FIRST_PERSON, Body::default());
        let entity = world.spawn((character, Player)).id();
        world.resource_mut::<SwitchRequests>().request(entity, "platform");
        world.resource_mut::<SwitchRequests>().request(entity, "no_such_mode");
        schedules.run(&mut world, DT);
        let character = world.get::<Character>(entity).unwrap();
        assert_eq!(character.mode_kind(), ModeKind::Platform);
        assert!(world.resource::<SwitchRequests>().0.is_empty());
    }

    #[test]
    fn test_looking_at_pole_then_interact_enters_top_down() {
        let (mut world, mut schedules) = session();
        let mut scene = StaticScene::new();
        let pole_id = HitId(42);
        scene.insert(
            pole_id,
            0,
            Shape::cuboid(Vec3::new(-0.5, 0.0, -2.5), Vec3::new(0.5, 3.0, -1.5)),
        );
        world.insert_resource(SceneQuery(Box::new(scene)));

        let character = spawn(&world, FIRST_PERSON, Body::at(Vec3::new(0.0, 1.0, 0.0)));
        let player = world.spawn((character, Player, PoleTargeting::default())).id();
        let pole = world.spawn(ModeTransitionPole::new(pole_id)).id();

        schedules.run(&mut world, DT);
        assert_eq!(world.get::<ModeTransitionPole>(pole).unwrap().player, Some(player));

        world
            .resource_mut::<InputState>()
            .sampler
            .set_button(IntentButton::Interact, true);
        schedules.run(&mut world, DT);

        let character = world.get::<Character>(player).unwrap();
        assert_eq!(character.mode_kind(), ModeKind::TopDown);
        assert!(!character.controller().can_move);
        let memory = world.resource::<SessionMemory>();
        assert!(memory.top_down_active);
        assert!(memory.last_mode_was_first_person);
    }
}
