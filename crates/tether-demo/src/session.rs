//! Headless session: world setup, script playback and pose logging.

use std::path::Path;

use bevy_ecs::prelude::*;
use tether_config::Config;
use tether_ecs::{
    FixedUpdateSet, InputState, PostUpdateSet, PreUpdateSet, SessionSchedule, SessionSchedules,
    TimeRes, create_world,
};
use tether_input::{IntentScript, ScriptError, ScriptPlayer};
use tether_player::{
    Body, Character, FrameEnv, ModeRegistry, ModeTransitionPole, PhysicsRequest, Player,
    PoleTargeting, SceneQuery, SwitchError, register_character_systems, register_player_resources,
};

use crate::scene::{POLE, SPAWN_POINT, build_scene};

const BUILTIN_SCRIPT: &str = include_str!("../assets/demo_script.ron");

/// Script being played into the intent sampler.
#[derive(Resource)]
pub struct ScriptPlayback(pub ScriptPlayer);

/// How often the player's pose is logged, in frames.
#[derive(Resource, Debug, Clone, Copy)]
pub struct PoseLogInterval(pub u32);

/// Summary of a finished run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub frames: u32,
    pub fixed_ticks: u64,
    pub mode_switches: u32,
}

/// Mode switches seen by the presentation stage.
#[derive(Resource, Debug, Default)]
struct SwitchCounter(u32);

/// Load the script at `path`, or the bundled one. A broken script file is
/// reported and replaced by the bundled script.
pub fn load_script(path: Option<&Path>) -> IntentScript {
    let loaded = match path {
        Some(path) => IntentScript::load(path),
        None => IntentScript::from_ron(BUILTIN_SCRIPT),
    };
    loaded.unwrap_or_else(|err: ScriptError| {
        tracing::warn!(%err, "falling back to the bundled intent script");
        IntentScript::from_ron(BUILTIN_SCRIPT).unwrap_or_default()
    })
}

/// Feed the next script frame into the sampler.
///
/// **Stage:** PreUpdate, [`PreUpdateSet::Feed`].
fn script_feed_system(mut playback: ResMut<ScriptPlayback>, mut input: ResMut<InputState>) {
    let input = &mut *input;
    if let Some(events) = playback.0.advance(&mut input.sampler) {
        for event in events {
            input.push_event(event);
        }
    }
}

/// Hand physics requests to the (absent) rigid-body layer.
///
/// **Stage:** FixedUpdate, [`FixedUpdateSet::PhysicsSync`].
fn physics_sync_system(mut characters: Query<&mut Character>) {
    for mut character in &mut characters {
        for request in character.drain_physics_requests() {
            match request {
                PhysicsRequest::Impulse(impulse) => tracing::debug!(%impulse, "impulse requested"),
                PhysicsRequest::ColliderHeight(height) => {
                    tracing::debug!(height, "collider height requested");
                }
            }
        }
    }
}

/// Count and log mode switches of the player.
///
/// **Stage:** PostUpdate, [`PostUpdateSet::Presentation`].
fn mode_watch_system(
    players: Query<&Character, With<Player>>,
    mut last_mode: Local<Option<&'static str>>,
    mut switches: ResMut<SwitchCounter>,
) {
    for character in &players {
        let name = character.mode().name();
        if *last_mode == Some(name) {
            continue;
        }
        if last_mode.is_some() {
            switches.0 += 1;
        }
        *last_mode = Some(name);
        let unresolved = character
            .bindings()
            .unresolved(character.mode().handlers())
            .count();
        tracing::info!(mode = name, unresolved_bindings = unresolved, "player mode active");
    }
}

/// Log the presented camera pose every few frames.
///
/// **Stage:** PostUpdate, [`PostUpdateSet::Presentation`].
fn pose_log_system(
    time: Res<TimeRes>,
    interval: Res<PoseLogInterval>,
    players: Query<&Character, With<Player>>,
) {
    if interval.0 == 0 || time.frame % u64::from(interval.0) != 0 {
        return;
    }
    for character in &players {
        let position = character.body().transform.position;
        match character.presented_camera_pose(time.elapsed as f32) {
            Ok(camera) => tracing::info!(
                frame = time.frame,
                mode = character.mode().name(),
                %position,
                camera = %camera.position,
                "pose"
            ),
            Err(err) => tracing::info!(frame = time.frame, %position, %err, "pose without camera"),
        }
    }
}

/// Build the world and schedules, spawn the player and the pole.
pub fn build_session(
    config: &Config,
    script: IntentScript,
) -> Result<(World, SessionSchedules), SwitchError> {
    let mut world = create_world();
    register_player_resources(&mut world, ModeRegistry::with_builtins(config.clone()));
    world.insert_resource(SceneQuery(Box::new(build_scene())));
    world.insert_resource(ScriptPlayback(ScriptPlayer::new(script)));
    world.insert_resource(PoseLogInterval(config.debug.pose_log_interval));
    world.insert_resource(SwitchCounter::default());

    let player = {
        let registry = world.resource::<ModeRegistry>();
        let scene = world.resource::<SceneQuery>();
        let env = FrameEnv::new(registry).with_query(scene.0.as_ref());
        Character::spawn(&env, &config.session.start_mode, Body::at(SPAWN_POINT))?
    };
    world.spawn((player, Player, PoleTargeting::default()));
    world.spawn(ModeTransitionPole::new(POLE));

    let mut schedules = SessionSchedules::with_fixed_hz(config.session.fixed_hz);
    register_character_systems(&mut schedules);
    schedules.add_system(
        SessionSchedule::PreUpdate,
        script_feed_system.in_set(PreUpdateSet::Feed),
    );
    schedules.add_system(
        SessionSchedule::FixedUpdate,
        physics_sync_system.in_set(FixedUpdateSet::PhysicsSync),
    );
    schedules.add_system(
        SessionSchedule::PostUpdate,
        (mode_watch_system, pose_log_system)
            .chain()
            .in_set(PostUpdateSet::Presentation),
    );
    Ok((world, schedules))
}

/// Run `config.session.frames` frames at the configured frame rate.
pub fn run(config: &Config, script: IntentScript) -> Result<RunSummary, SwitchError> {
    let (mut world, mut schedules) = build_session(config, script)?;
    let frame_dt = 1.0 / f64::from(config.session.frame_hz.max(1));
    tracing::info!(
        frames = config.session.frames,
        fixed_hz = config.session.fixed_hz,
        start_mode = %config.session.start_mode,
        "session started"
    );

    for _ in 0..config.session.frames {
        schedules.run(&mut world, frame_dt);
    }

    let time = world.resource::<TimeRes>();
    Ok(RunSummary {
        frames: config.session.frames,
        fixed_ticks: time.fixed_ticks,
        mode_switches: world.resource::<SwitchCounter>().0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tether_player::{ModeKind, SessionMemory};

    #[test]
    fn test_bundled_script_parses() {
        let script = IntentScript::from_ron(BUILTIN_SCRIPT).unwrap();
        assert!(script.total_frames() > 0);
    }

    #[test]
    fn test_missing_script_falls_back() {
        let script = load_script(Some(Path::new("/nonexistent/script.ron")));
        assert_eq!(script, IntentScript::from_ron(BUILTIN_SCRIPT).unwrap());
    }

    #[test]
    fn test_unknown_start_mode_is_rejected() {
        let mut config = Config::default();
        config.session.start_mode = "character_base".into();
        assert!(build_session(&config, IntentScript::default()).is_err());
    }

    #[test]
    fn test_bundled_script_round_trips_through_top_down() {
        let config = Config::default();
        let (mut world, mut schedules) = build_session(&config, load_script(None)).unwrap();
        let mut saw_top_down = false;
        for _ in 0..400 {
            schedules.run(&mut world, 1.0 / 60.0);
            let mut players = world.query_filtered::<&Character, With<Player>>();
            let kind = players.single(&world).mode_kind();
            saw_top_down |= kind == ModeKind::TopDown;
        }
        assert!(saw_top_down);
        assert!(!world.resource::<SessionMemory>().top_down_active);
        assert!(world.resource::<SwitchCounter>().0 >= 3);
    }
}
