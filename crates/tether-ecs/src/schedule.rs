//! Session schedule labels and the ordered schedule runner.

use bevy_ecs::prelude::*;
use bevy_ecs::schedule::{IntoSystemConfigs, ScheduleLabel};

use crate::time::TimeRes;

/// Maximum number of fixed-update steps per frame to prevent spiral-of-death.
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 10;

/// Labels for each session stage.
///
/// Stages run in the order listed, top to bottom, every frame.
#[derive(ScheduleLabel, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionSchedule {
    /// Sample intent and feed scripted input.
    PreUpdate,
    /// Physics-tick hooks of the active modes.
    FixedUpdate,
    /// Frame hooks of the active modes, event dispatch, pole interaction.
    Update,
    /// Rig and camera smoothing, pose logging.
    PostUpdate,
}

impl SessionSchedule {
    const ORDER: [SessionSchedule; 4] = [
        SessionSchedule::PreUpdate,
        SessionSchedule::FixedUpdate,
        SessionSchedule::Update,
        SessionSchedule::PostUpdate,
    ];
}

/// Ordered collection of [`Schedule`]s that drives one session frame.
///
/// `FixedUpdate` uses a time accumulator so it ticks at a stable rate
/// regardless of the frame rate.
pub struct SessionSchedules {
    schedules: Vec<(SessionSchedule, Schedule)>,
    fixed_accumulator: f64,
    fixed_dt: f64,
}

impl SessionSchedules {
    /// Schedules with the default fixed timestep (1/60 s).
    pub fn new() -> Self {
        Self::with_fixed_hz(60)
    }

    /// Schedules ticking `FixedUpdate` at `hz` (clamped to at least 1).
    pub fn with_fixed_hz(hz: u32) -> Self {
        let schedules = SessionSchedule::ORDER
            .into_iter()
            .map(|label| (label, Schedule::new(label)))
            .collect();

        Self {
            schedules,
            fixed_accumulator: 0.0,
            fixed_dt: 1.0 / f64::from(hz.max(1)),
        }
    }

    /// Register a system (or system tuple) into a specific stage.
    pub fn add_system<M>(&mut self, stage: SessionSchedule, system: impl IntoSystemConfigs<M>) {
        if let Some(schedule) = self.get_schedule_mut(&stage) {
            schedule.add_systems(system);
        }
    }

    /// Run all stages in order for one frame.
    ///
    /// Updates [`TimeRes`] if present. `FixedUpdate` may run
    /// 0..=[`MAX_FIXED_STEPS_PER_FRAME`] times; the other stages run once.
    /// Returns the number of fixed steps taken.
    pub fn run(&mut self, world: &mut World, frame_dt: f64) -> u32 {
        let frame_dt = frame_dt.max(0.0);
        if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
            time.delta = frame_dt as f32;
            time.elapsed += frame_dt;
            time.fixed_dt = self.fixed_dt as f32;
            time.frame += 1;
        }

        self.run_stage(SessionSchedule::PreUpdate, world);

        self.fixed_accumulator += frame_dt;
        let mut steps: u32 = 0;
        while self.fixed_accumulator >= self.fixed_dt && steps < MAX_FIXED_STEPS_PER_FRAME {
            self.run_stage(SessionSchedule::FixedUpdate, world);
            self.fixed_accumulator -= self.fixed_dt;
            steps += 1;
        }
        if self.fixed_accumulator >= self.fixed_dt {
            tracing::debug!(
                backlog = self.fixed_accumulator,
                "fixed update fell behind, dropping whole steps"
            );
            self.fixed_accumulator %= self.fixed_dt;
        }
        if let Some(mut time) = world.get_resource_mut::<TimeRes>() {
            time.fixed_ticks += u64::from(steps);
        }

        self.run_stage(SessionSchedule::Update, world);
        self.run_stage(SessionSchedule::PostUpdate, world);
        steps
    }

    /// Returns the current fixed-update accumulator value in seconds.
    pub fn fixed_accumulator(&self) -> f64 {
        self.fixed_accumulator
    }

    /// Returns the fixed timestep in seconds.
    pub fn fixed_dt(&self) -> f64 {
        self.fixed_dt
    }

    /// Returns a mutable reference to the schedule for a given stage.
    ///
    /// Useful for configuring system sets and ordering constraints.
    pub fn get_schedule_mut(&mut self, stage: &SessionSchedule) -> Option<&mut Schedule> {
        self.schedules
            .iter_mut()
            .find(|(label, _)| label == stage)
            .map(|(_, schedule)| schedule)
    }

    /// Force-initialize all schedules, validating the dependency graph.
    pub fn initialize_all(&mut self, world: &mut World) {
        for (_label, schedule) in &mut self.schedules {
            let _ = schedule.initialize(world);
        }
    }

    fn run_stage(&mut self, target: SessionSchedule, world: &mut World) {
        if let Some(schedule) = self.get_schedule_mut(&target) {
            schedule.run(world);
        }
    }
}

impl Default for SessionSchedules {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::create_world;

    #[derive(Resource, Default)]
    struct ExecutionLog {
        stages: Vec<String>,
    }

    fn log_system(stage_name: &'static str) -> impl Fn(ResMut<'_, ExecutionLog>) {
        move |mut log: ResMut<'_, ExecutionLog>| {
            log.stages.push(stage_name.to_string());
        }
    }

    #[derive(Resource, Default)]
    struct FixedCount(u32);

    fn counting_schedules(hz: u32) -> (World, SessionSchedules) {
        let mut world = create_world();
        world.insert_resource(FixedCount::default());
        let mut schedules = SessionSchedules::with_fixed_hz(hz);
        schedules.add_system(
            SessionSchedule::FixedUpdate,
            |mut count: ResMut<'_, FixedCount>| {
                count.0 += 1;
            },
        );
        (world, schedules)
    }

    #[test]
    fn test_schedule_runs_all_stages_in_order() {
        let mut world = create_world();
        world.insert_resource(ExecutionLog::default());

        let mut schedules = SessionSchedules::new();
        schedules.add_system(SessionSchedule::PreUpdate, log_system("PreUpdate"));
        schedules.add_system(SessionSchedule::FixedUpdate, log_system("FixedUpdate"));
        schedules.add_system(SessionSchedule::Update, log_system("Update"));
        schedules.add_system(SessionSchedule::PostUpdate, log_system("PostUpdate"));

        schedules.run(&mut world, 1.0 / 60.0);

        let log = world.resource::<ExecutionLog>();
        assert_eq!(log.stages, vec!["PreUpdate", "FixedUpdate", "Update", "PostUpdate"]);
    }

    #[test]
    fn test_fixed_update_runs_at_correct_rate() {
        let (mut world, mut schedules) = counting_schedules(60);

        // 3 frames at 20 Hz, each ~3x the fixed step
        for _ in 0..3 {
            schedules.run(&mut world, 0.05);
        }

        assert_eq!(world.resource::<FixedCount>().0, 9);
        assert_eq!(world.resource::<TimeRes>().fixed_ticks, 9);
    }

    #[test]
    fn test_fixed_update_skips_when_dt_too_small() {
        let (mut world, mut schedules) = counting_schedules(60);
        assert_eq!(schedules.run(&mut world, 0.001), 0);
        assert_eq!(world.resource::<FixedCount>().0, 0);
    }

    #[test]
    fn test_fixed_steps_are_capped() {
        let (mut world, mut schedules) = counting_schedules(60);
        let steps = schedules.run(&mut world, 1.0);
        assert_eq!(steps, MAX_FIXED_STEPS_PER_FRAME);
        assert!(schedules.fixed_accumulator() < schedules.fixed_dt());
    }

    #[test]
    fn test_negative_frame_dt_is_ignored() {
        let (mut world, mut schedules) = counting_schedules(60);
        schedules.run(&mut world, -1.0);
        let time = world.resource::<TimeRes>();
        assert_eq!(time.delta, 0.0);
        assert_eq!(time.elapsed, 0.0);
        assert_eq!(time.frame, 1);
    }

    #[test]
    fn test_time_resource_advances() {
        let mut world = create_world();
        let mut schedules = SessionSchedules::with_fixed_hz(50);
        schedules.run(&mut world, 0.25);
        schedules.run(&mut world, 0.25);
        let time = world.resource::<TimeRes>();
        assert_eq!(time.delta, 0.25);
        assert!((time.elapsed - 0.5).abs() < 1e-9);
        assert!((time.fixed_dt - 0.02).abs() < 1e-6);
        assert_eq!(time.frame, 2);
    }
}
