//! Mode-transition pole: toggles a character between top-down and the
//! first- or third-person mode it came from.

use bevy_ecs::prelude::*;
use tether_physics::{HitId, LayerMask, Ray, SpatialQuery};

use crate::character::{Character, FrameEnv};
use crate::error::SwitchError;
use crate::mode::ModeKind;
use crate::modes::{FIRST_PERSON, THIRD_PERSON, TOP_DOWN, TopDownMode};

/// Per-session pole bookkeeping. Reset at session start.
#[derive(Resource, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionMemory {
    /// The mode left for top-down was first-person.
    pub last_mode_was_first_person: bool,
    pub top_down_active: bool,
}

impl SessionMemory {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A world object that flips its player in and out of top-down.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ModeTransitionPole {
    /// Scene id the targeting ray reports for this pole.
    pub id: HitId,
    /// Set while a character's look-at ray rests on the pole.
    pub cursor_on: bool,
    /// Character currently interacting with the pole.
    pub player: Option<Entity>,
}

/// What an accepted interaction did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoleTransition {
    EnteredTopDown,
    Restored(ModeKind),
}

impl ModeTransitionPole {
    pub fn new(id: HitId) -> Self {
        Self {
            id,
            cursor_on: false,
            player: None,
        }
    }

    /// Mark or clear the pole as looked at by `player`.
    pub fn set_target(&mut self, player: Option<Entity>) {
        self.cursor_on = player.is_some();
        self.player = player;
    }

    /// Toggle `character` between top-down and its remembered mode.
    ///
    /// Does nothing unless a player is assigned and the cursor rests on the
    /// pole.
    ///
    /// # Errors
    ///
    /// Propagates [`SwitchError`] from the mode switch; memory is left as it
    /// was.
    pub fn interact(
        &self,
        character: &mut Character,
        memory: &mut SessionMemory,
        env: &FrameEnv<'_>,
    ) -> Result<Option<PoleTransition>, SwitchError> {
        if self.player.is_none() || !self.cursor_on {
            return Ok(None);
        }
        let preset = &env.registry.config().modes.pole;

        if !memory.top_down_active {
            let was_first_person = character.mode_kind().is_first_person();
            character.switch_to(TOP_DOWN, env)?;
            if let Some(top_down) = character.mode_as_mut::<TopDownMode>() {
                top_down.set_distance(preset.top_down_start_distance);
            }
            character.rig_mut().rig.destination.euler.x = -preset.top_down_pitch;
            character.set_can_move(false);
            memory.last_mode_was_first_person = was_first_person;
            memory.top_down_active = true;
            tracing::info!(was_first_person, "pole: entered top-down");
            return Ok(Some(PoleTransition::EnteredTopDown));
        }

        let target = if memory.last_mode_was_first_person {
            FIRST_PERSON
        } else {
            THIRD_PERSON
        };
        character.switch_to(target, env)?;
        character.set_can_move(true);
        memory.top_down_active = false;
        tracing::info!(mode = target, "pole: left top-down");
        Ok(Some(PoleTransition::Restored(character.mode_kind())))
    }
}

/// Pole currently under a character's look-at ray.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PoleTargeting {
    pub targeted: Option<HitId>,
}

impl PoleTargeting {
    /// Cast `ray` and target the first pole it hits within `reach`.
    ///
    /// Hits are scanned nearest first; the first one accepted by `is_pole`
    /// becomes the target. Returns `(previous, current)` so the caller can
    /// clear a pole the ray has left.
    pub fn cast(
        &mut self,
        query: &dyn SpatialQuery,
        ray: &Ray,
        reach: f32,
        mask: LayerMask,
        is_pole: impl Fn(HitId) -> bool,
    ) -> (Option<HitId>, Option<HitId>) {
        let current = query
            .raycast_all(ray, reach, mask)
            .into_iter()
            .map(|hit| hit.id)
            .find(|id| is_pole(*id));
        let previous = std::mem::replace(&mut self.targeted, current);
        (previous, current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use tether_physics::{Shape, StaticScene};

    #[test]
    fn test_cast_targets_first_pole_behind_other_geometry() {
        let mut scene = StaticScene::new();
        scene.insert(HitId(1), 0, Shape::cuboid(Vec3::new(-1.0, -1.0, -3.0), Vec3::new(1.0, 1.0, -2.0)));
        scene.insert(HitId(7), 0, Shape::cuboid(Vec3::new(-1.0, -1.0, -6.0), Vec3::new(1.0, 1.0, -5.0)));
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_Z);
        let mut targeting = PoleTargeting::default();

        let (previous, current) = targeting.cast(&scene, &ray, 10.0, LayerMask::ALL, |id| id == HitId(7));
        assert_eq!((previous, current), (None, Some(HitId(7))));

        let (previous, current) = targeting.cast(&scene, &ray, 4.0, LayerMask::ALL, |id| id == HitId(7));
        assert_eq!((previous, current), (Some(HitId(7)), None));
        assert_eq!(targeting.targeted, None);
    }

    #[test]
    fn test_set_target_drives_cursor() {
        let mut pole = ModeTransitionPole::new(HitId(3));
        pole.set_target(Some(Entity::from_raw(4)));
        assert!(pole.cursor_on);
        pole.set_target(None);
        assert!(!pole.cursor_on);
        assert_eq!(pole.player, None);
    }
}
