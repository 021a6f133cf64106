use crate::entity::Tzid;
use crate::split::SplitError;

/// Faults in the world model itself. Handlers never expect these; when one
/// surfaces it becomes `CommandError::Internal`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    NoSuchEntity(Tzid),
    NotAContainer(Tzid),
    AlreadyHeld { child: Tzid, parent: Tzid },
    Cycle { child: Tzid, container: Tzid },
}

impl std::fmt::Display for WorldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorldError::NoSuchEntity(id) => write!(f, "no such entity: {id}"),
            WorldError::NotAContainer(id) => write!(f, "entity {id} cannot hold things"),
            WorldError::AlreadyHeld { child, parent } => {
                write!(f, "entity {child} is already held by {parent}")
            }
            WorldError::Cycle { child, container } => {
                write!(f, "putting {child} into {container} would contain itself")
            }
        }
    }
}

impl std::error::Error for WorldError {}

/// Why a command stopped. Every variant except `Internal` is a normal,
/// user-facing outcome and guarantees the world was left untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Carries the usage hint.
    MissingArgument(String),
    NotFound(String),
    CapabilityMissing(String),
    InsufficientQuantity(String),
    MechanicallyBlocked(String),
    Internal(String),
}

impl CommandError {
    pub fn missing(usage: &str) -> Self {
        CommandError::MissingArgument(usage.to_string())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        CommandError::NotFound(msg.into())
    }

    pub fn capability(msg: impl Into<String>) -> Self {
        CommandError::CapabilityMissing(msg.into())
    }

    pub fn blocked(msg: impl Into<String>) -> Self {
        CommandError::MechanicallyBlocked(msg.into())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CommandError::MissingArgument(_) => "missing_argument",
            CommandError::NotFound(_) => "not_found",
            CommandError::CapabilityMissing(_) => "capability_missing",
            CommandError::InsufficientQuantity(_) => "insufficient_quantity",
            CommandError::MechanicallyBlocked(_) => "mechanically_blocked",
            CommandError::Internal(_) => "internal",
        }
    }

    /// The line shown to the actor.
    pub fn user_message(&self) -> &str {
        match self {
            CommandError::MissingArgument(s)
            | CommandError::NotFound(s)
            | CommandError::CapabilityMissing(s)
            | CommandError::InsufficientQuantity(s)
            | CommandError::MechanicallyBlocked(s) => s,
            CommandError::Internal(_) => "Something went wrong. Nothing happened.",
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::Internal(detail) => write!(f, "internal: {detail}"),
            other => write!(f, "{}: {}", other.as_str(), other.user_message()),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<WorldError> for CommandError {
    fn from(e: WorldError) -> Self {
        CommandError::Internal(e.to_string())
    }
}

impl From<SplitError> for CommandError {
    fn from(e: SplitError) -> Self {
        match e {
            SplitError::NotSplittable => {
                CommandError::CapabilityMissing("You cannot split that item.".to_string())
            }
            SplitError::InsufficientQuantity { .. } => {
                CommandError::InsufficientQuantity("You do not have that many.".to_string())
            }
            SplitError::World(w) => w.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_errors_hide_details_from_players() {
        let e: CommandError = WorldError::NoSuchEntity(Tzid(9)).into();
        assert_eq!(e.as_str(), "internal");
        assert!(!e.user_message().contains("#9"));
        assert!(e.to_string().contains("#9"));
    }

    #[test]
    fn split_errors_map_to_user_conditions() {
        let e: CommandError = SplitError::InsufficientQuantity { have: 1, want: 2 }.into();
        assert_eq!(e.user_message(), "You do not have that many.");
        let e: CommandError = SplitError::NotSplittable.into();
        assert_eq!(e.as_str(), "capability_missing");
    }
}
