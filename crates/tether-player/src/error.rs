//! Character and mode-switch error types.

/// A mode switch that could not be carried out. The character is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwitchError {
    /// The target name is unknown or names an abstract entry.
    #[error("invalid mode `{name}`: {reason}")]
    InvalidMode { name: String, reason: InvalidReason },
}

impl SwitchError {
    pub fn unknown(name: &str) -> Self {
        Self::InvalidMode {
            name: name.to_owned(),
            reason: InvalidReason::Unknown,
        }
    }

    pub fn is_abstract(name: &str) -> Self {
        Self::InvalidMode {
            name: name.to_owned(),
            reason: InvalidReason::Abstract,
        }
    }
}

/// Why a registry lookup was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    Unknown,
    Abstract,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidReason::Unknown => f.write_str("not registered"),
            InvalidReason::Abstract => f.write_str("abstract entry"),
        }
    }
}

/// Camera work requested while no rig is mounted on the mode's anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("no camera rig mounted on the {0:?} anchor")]
    MissingCameraRig(crate::mode::RigRoot),
}

/// Errors returned while building a [`crate::ModeRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate mode name: {0}")]
    DuplicateName(String),
}
