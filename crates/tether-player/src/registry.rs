//! Explicit name → factory list of behavior modes.

use bevy_ecs::prelude::*;
use tether_config::Config;

use crate::error::{RegistryError, SwitchError};
use crate::mode::BehaviorMode;
use crate::modes::{
    AI_WANDER, AiWanderMode, FIRST_PERSON, FREE_FLY, FirstPersonMode, FreeFlyMode, PLATFORM,
    PlatformMode, THIRD_PERSON, TOP_DOWN, ThirdPersonMode, TopDownMode,
};

/// Builds a fresh mode instance from the session configuration.
pub type ModeFactory = Box<dyn Fn(&Config) -> Box<dyn BehaviorMode> + Send + Sync>;

/// Name of the abstract base every controllable mode derives from.
pub const CHARACTER_BASE: &str = "character_base";
/// Name of the abstract base of camera-less modes.
pub const NONE_CAMERA: &str = "none_camera";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeOrigin {
    BuiltIn,
    Custom,
}

struct RegistryEntry {
    name: String,
    origin: ModeOrigin,
    /// `None` marks an abstract entry that cannot be instantiated.
    factory: Option<ModeFactory>,
}

/// Registered modes plus the configuration their factories read.
#[derive(Resource)]
pub struct ModeRegistry {
    config: Config,
    entries: Vec<RegistryEntry>,
}

impl ModeRegistry {
    /// An empty registry.
    pub fn new(config: Config) -> Self {
        Self {
            config,
            entries: Vec::new(),
        }
    }

    /// The six built-in modes and the two abstract bases.
    pub fn with_builtins(config: Config) -> Self {
        let mut registry = Self::new(config);
        let builtins: [(&str, ModeFactory); 6] = [
            (
                FIRST_PERSON,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(FirstPersonMode::new(c.modes.first_person.clone()))
                }),
            ),
            (
                THIRD_PERSON,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(ThirdPersonMode::new(c.modes.third_person.clone()))
                }),
            ),
            (
                TOP_DOWN,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(TopDownMode::new(c.modes.top_down.clone()))
                }),
            ),
            (
                PLATFORM,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(PlatformMode::new(c.modes.platform.clone()))
                }),
            ),
            (
                FREE_FLY,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(FreeFlyMode::new(c.modes.free_fly.clone()))
                }),
            ),
            (
                AI_WANDER,
                Box::new(|c: &Config| -> Box<dyn BehaviorMode> {
                    Box::new(AiWanderMode::new(c.modes.ai_wander.clone()))
                }),
            ),
        ];
        for (name, factory) in builtins {
            registry.entries.push(RegistryEntry {
                name: name.to_owned(),
                origin: ModeOrigin::BuiltIn,
                factory: Some(factory),
            });
        }
        for name in [CHARACTER_BASE, NONE_CAMERA] {
            registry.entries.push(RegistryEntry {
                name: name.to_owned(),
                origin: ModeOrigin::BuiltIn,
                factory: None,
            });
        }
        registry
    }

    /// Register a custom mode.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if `name` is taken.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> Result<(), RegistryError>
    where
        F: Fn(&Config) -> Box<dyn BehaviorMode> + Send + Sync + 'static,
    {
        self.push(name.into(), Some(Box::new(factory)))
    }

    /// Register a custom abstract entry: listed, but never instantiated.
    pub fn register_abstract(&mut self, name: impl Into<String>) -> Result<(), RegistryError> {
        self.push(name.into(), None)
    }

    fn push(&mut self, name: String, factory: Option<ModeFactory>) -> Result<(), RegistryError> {
        if self.contains(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        tracing::debug!(mode = %name, abstract_entry = factory.is_none(), "registered mode");
        self.entries.push(RegistryEntry {
            name,
            origin: ModeOrigin::Custom,
            factory,
        });
        Ok(())
    }

    fn entry(&self, name: &str) -> Option<&RegistryEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    /// Build a new instance of `name`.
    ///
    /// # Errors
    ///
    /// [`SwitchError::InvalidMode`] for unknown names and abstract entries.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn BehaviorMode>, SwitchError> {
        let entry = self.entry(name).ok_or_else(|| SwitchError::unknown(name))?;
        let factory = entry
            .factory
            .as_ref()
            .ok_or_else(|| SwitchError::is_abstract(name))?;
        Ok(factory(&self.config))
    }

    pub fn origin(&self, name: &str) -> Option<ModeOrigin> {
        self.entry(name).map(|entry| entry.origin)
    }

    pub fn is_abstract(&self, name: &str) -> bool {
        self.entry(name).is_some_and(|entry| entry.factory.is_none())
    }

    /// Registered names in registration order, abstract entries included.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl std::fmt::Debug for ModeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModeRegistry")
            .field("names", &self.names().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InvalidReason;
    use crate::mode::ModeKind;

    #[test]
    fn test_builtins_instantiate_with_their_kind() {
        let registry = ModeRegistry::with_builtins(Config::default());
        let kinds: Vec<_> = [FIRST_PERSON, THIRD_PERSON, TOP_DOWN, PLATFORM, FREE_FLY, AI_WANDER]
            .iter()
            .map(|name| registry.instantiate(name).unwrap().kind())
            .collect();
        assert_eq!(
            kinds,
            [
                ModeKind::FirstPerson,
                ModeKind::ThirdPerson,
                ModeKind::TopDown,
                ModeKind::Platform,
                ModeKind::FreeFly,
                ModeKind::AiWander,
            ]
        );
        assert_eq!(registry.origin(FIRST_PERSON), Some(ModeOrigin::BuiltIn));
    }

    #[test]
    fn test_factories_read_config() {
        let mut config = Config::default();
        config.modes.third_person.camera_distance = 12.0;
        let registry = ModeRegistry::with_builtins(config);
        let mode = registry.instantiate(THIRD_PERSON).unwrap();
        let third = mode.as_any().downcast_ref::<ThirdPersonMode>().unwrap();
        assert_eq!(third.config.camera_distance, 12.0);
    }

    #[test]
    fn test_abstract_and_unknown_are_invalid() {
        let registry = ModeRegistry::with_builtins(Config::default());
        let err = registry.instantiate(NONE_CAMERA).unwrap_err();
        assert_eq!(
            err,
            SwitchError::InvalidMode {
                name: NONE_CAMERA.into(),
                reason: InvalidReason::Abstract
            }
        );
        let err = registry.instantiate("jetpack").unwrap_err();
        assert!(matches!(
            err,
            SwitchError::InvalidMode {
                reason: InvalidReason::Unknown,
                ..
            }
        ));
        assert!(registry.is_abstract(CHARACTER_BASE));
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = ModeRegistry::with_builtins(Config::default());
        registry
            .register("hover", |c: &Config| -> Box<dyn BehaviorMode> {
                Box::new(FreeFlyMode::new(c.modes.free_fly.clone()))
            })
            .unwrap();
        assert_eq!(registry.origin("hover"), Some(ModeOrigin::Custom));
        assert_eq!(registry.instantiate("hover").unwrap().kind(), ModeKind::FreeFly);
        assert_eq!(
            registry.register_abstract(FIRST_PERSON),
            Err(RegistryError::DuplicateName(FIRST_PERSON.into()))
        );
    }
}
