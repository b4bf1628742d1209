use std::fmt;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Identifier of a celestial body in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyId(pub u32);

/// Identifier of a quiz question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(pub u32);

/// Identifier of an answer option, unique within its question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(pub u32);

impl fmt::Display for BodyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An event communicated from Rust to the UI via a flat f32 buffer.
/// `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize)]
pub struct ExplorerEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl ExplorerEvent {
    pub const FLOATS: usize = 4;

    /// A confirmed click resolved to a body. `a` = body id.
    pub const SELECTION_CANDIDATE: f32 = 1.0;
    /// The coordinator's selection changed. `a` = new id, `b` = previous id or -1.
    pub const SELECTION_CHANGED: f32 = 2.0;
    /// A quiz answer was accepted. `a` = option id, `b` = 1 if correct, `c` = score.
    pub const QUIZ_ANSWERED: f32 = 3.0;
    /// The quiz reached its terminal state. `a` = score, `b` = total, `c` = percentage.
    pub const QUIZ_COMPLETED: f32 = 4.0;
    /// Catalog data could not be used. Details via the last-error accessor.
    pub const DATA_ERROR: f32 = 5.0;

    pub fn selection_candidate(id: BodyId) -> Self {
        Self { kind: Self::SELECTION_CANDIDATE, a: id.0 as f32, b: 0.0, c: 0.0 }
    }

    pub fn selection_changed(current: BodyId, previous: Option<BodyId>) -> Self {
        Self {
            kind: Self::SELECTION_CHANGED,
            a: current.0 as f32,
            b: previous.map(|p| p.0 as f32).unwrap_or(-1.0),
            c: 0.0,
        }
    }

    pub fn quiz_answered(option: OptionId, correct: bool, score: u32) -> Self {
        Self {
            kind: Self::QUIZ_ANSWERED,
            a: option.0 as f32,
            b: if correct { 1.0 } else { 0.0 },
            c: score as f32,
        }
    }

    pub fn quiz_completed(score: u32, total: u32, percentage: u32) -> Self {
        Self {
            kind: Self::QUIZ_COMPLETED,
            a: score as f32,
            b: total as f32,
            c: percentage as f32,
        }
    }

    pub fn data_error() -> Self {
        Self { kind: Self::DATA_ERROR, ..Self::default() }
    }
}
