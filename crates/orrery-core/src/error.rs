//! Error types for the explorer core.
//!
//! Three families, matching how callers recover:
//! - [`ConfigurationError`]: malformed input data or config, fatal at initialization.
//! - [`UnknownBodyError`]: a selection naming a body that is not loaded; the selection is kept.
//! - [`DataError`]: the upstream catalog could not serve a request.
//!
//! Illegal quiz transitions are not errors at all; see `systems::quiz`.

use thiserror::Error;

use crate::api::types::{BodyId, QuestionId};

/// Result alias for operations that validate input data.
pub type ConfigResult<T> = Result<T, ConfigurationError>;

/// Malformed body set, question set or scene configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("body set is empty")]
    EmptyBodySet,

    #[error("orbital order {order} is used by both body {first} and body {second}")]
    DuplicateOrbitalOrder {
        order: u32,
        first: BodyId,
        second: BodyId,
    },

    #[error("body id {0} appears more than once")]
    DuplicateBodyId(BodyId),

    #[error("body {id} has orbital order 0; orders start at 1")]
    InvalidOrbitalOrder { id: BodyId },

    #[error("orbital orders must be contiguous from 1, expected {expected} but found {found}")]
    NonContiguousOrbitalOrder { expected: u32, found: u32 },

    #[error("body {id} has non-positive diameter {diameter}")]
    InvalidDiameter { id: BodyId, diameter: f64 },

    #[error("body {id} has a ring color but no rings")]
    RingColorWithoutRings { id: BodyId },

    #[error("invalid color {0:?}, expected #RRGGBB or #RGB")]
    InvalidColor(String),

    #[error("question set is empty")]
    EmptyQuestionSet,

    #[error("question {question} names correct option {option} which it does not offer")]
    CorrectOptionMissing { question: QuestionId, option: u32 },

    #[error("invalid scene config: {0}")]
    InvalidSceneConfig(&'static str),

    #[error("malformed document: {0}")]
    Malformed(String),
}

impl From<serde_json::Error> for ConfigurationError {
    fn from(err: serde_json::Error) -> Self {
        ConfigurationError::Malformed(err.to_string())
    }
}

/// A selection request named a body that is not in the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnknownBodyError {
    #[error("no body with id {0}")]
    Id(BodyId),

    #[error("no body named {0:?}")]
    Name(String),
}

/// Catalog access failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    /// Transport or upstream failure; the core waits until data arrives.
    #[error("{resource} unavailable: {reason}")]
    Unavailable {
        resource: &'static str,
        reason: String,
    },

    #[error("{resource} {id} not found")]
    NotFound { resource: &'static str, id: u32 },

    #[error("{resource} named {name:?} not found")]
    NameNotFound { resource: &'static str, name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_values() {
        let err = ConfigurationError::DuplicateOrbitalOrder {
            order: 3,
            first: BodyId(3),
            second: BodyId(9),
        };
        assert_eq!(
            err.to_string(),
            "orbital order 3 is used by both body 3 and body 9"
        );
        assert_eq!(UnknownBodyError::Id(BodyId(42)).to_string(), "no body with id 42");
        let missing = DataError::NameNotFound { resource: "planet", name: "Pluto".into() };
        assert_eq!(missing.to_string(), "planet named \"Pluto\" not found");
    }

    #[test]
    fn json_errors_become_malformed() {
        let err: ConfigurationError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, ConfigurationError::Malformed(_)));
    }
}
