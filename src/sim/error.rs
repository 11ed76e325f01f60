//! Simulation error taxonomy

use std::fmt;

use super::entity::EntityId;

/// Errors raised by the simulation core.
///
/// The swept solver never surfaces geometry degeneracies: a zero-length edge
/// or motion simply yields "no intersection". Boundaries are checked once,
/// when a wall is built.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Named-store, content or pixel-cache lookup miss
    MissingKey { tag: String },
    /// Stored value exists but has a different type than requested
    TypeMismatch { tag: String, expected: &'static str },
    /// A named handle points at an entity that is no longer in the level
    StaleEntity { tag: String, id: EntityId },
    /// A collision boundary with too few points or a zero-length edge
    DegenerateGeometry,
    /// Settings could not be read or parsed
    Config(String),
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::MissingKey { tag } => write!(f, "missing key: {}", tag),
            SimError::TypeMismatch { tag, expected } => {
                write!(f, "type mismatch for '{}': expected {}", tag, expected)
            }
            SimError::StaleEntity { tag, id } => {
                write!(f, "'{}' refers to entity {} which is no longer registered", tag, id.0)
            }
            SimError::DegenerateGeometry => write!(f, "degenerate geometry"),
            SimError::Config(msg) => write!(f, "settings error: {}", msg),
        }
    }
}

impl std::error::Error for SimError {}

impl From<serde_json::Error> for SimError {
    fn from(e: serde_json::Error) -> Self {
        SimError::Config(e.to_string())
    }
}

pub type SimResult<T> = Result<T, SimError>;
