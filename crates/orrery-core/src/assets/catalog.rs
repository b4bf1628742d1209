use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, QuestionId};
use crate::assets::model::{
    validate_body_set, CelestialBody, ExploreContent, FunFact, QuizQuestion,
};
use crate::error::{ConfigResult, DataError};

const SEED_JSON: &str = include_str!("seed.json");

/// Read-only access to the reference data.
///
/// Every call may fail with [`DataError::Unavailable`] when the upstream
/// source is down; lookups additionally fail with [`DataError::NotFound`].
pub trait Catalog {
    /// All bodies, ordered by `order_from_sun`.
    fn bodies(&self) -> Result<&[CelestialBody], DataError>;
    fn body(&self, id: BodyId) -> Result<&CelestialBody, DataError>;
    /// Case-insensitive name lookup.
    fn body_by_name(&self, name: &str) -> Result<&CelestialBody, DataError>;
    fn questions(&self) -> Result<&[QuizQuestion], DataError>;
    fn question(&self, id: QuestionId) -> Result<&QuizQuestion, DataError>;
    fn fun_facts(&self) -> Result<&[FunFact], DataError>;
    fn explore_contents(&self) -> Result<&[ExploreContent], DataError>;
}

/// The whole data set as one JSON document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub planets: Vec<CelestialBody>,
    #[serde(default)]
    pub quiz_questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub fun_facts: Vec<FunFact>,
    #[serde(default)]
    pub explore_contents: Vec<ExploreContent>,
}

/// In-memory catalog over a validated snapshot.
#[derive(Debug, Clone)]
pub struct MemCatalog {
    bodies: Vec<CelestialBody>,
    body_index: HashMap<BodyId, usize>,
    questions: Vec<QuizQuestion>,
    fun_facts: Vec<FunFact>,
    explore_contents: Vec<ExploreContent>,
}

impl MemCatalog {
    /// The built-in reference data set.
    pub fn seeded() -> ConfigResult<Self> {
        Self::from_json(SEED_JSON)
    }

    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let snapshot: CatalogSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: CatalogSnapshot) -> ConfigResult<Self> {
        let CatalogSnapshot { mut planets, quiz_questions, fun_facts, explore_contents } = snapshot;

        validate_body_set(&planets)?;
        for q in &quiz_questions {
            q.validate()?;
        }

        planets.sort_by_key(|b| b.order_from_sun);
        let body_index = planets.iter().enumerate().map(|(i, b)| (b.id, i)).collect();

        log::info!(
            "Catalog loaded: {} bodies, {} questions, {} facts, {} explore items",
            planets.len(),
            quiz_questions.len(),
            fun_facts.len(),
            explore_contents.len()
        );

        Ok(Self {
            bodies: planets,
            body_index,
            questions: quiz_questions,
            fun_facts,
            explore_contents,
        })
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        CatalogSnapshot {
            planets: self.bodies.clone(),
            quiz_questions: self.questions.clone(),
            fun_facts: self.fun_facts.clone(),
            explore_contents: self.explore_contents.clone(),
        }
    }
}

impl Catalog for MemCatalog {
    fn bodies(&self) -> Result<&[CelestialBody], DataError> {
        Ok(&self.bodies)
    }

    fn body(&self, id: BodyId) -> Result<&CelestialBody, DataError> {
        self.body_index
            .get(&id)
            .map(|&i| &self.bodies[i])
            .ok_or(DataError::NotFound { resource: "planet", id: id.0 })
    }

    fn body_by_name(&self, name: &str) -> Result<&CelestialBody, DataError> {
        self.bodies
            .iter()
            .find(|b| b.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| DataError::NameNotFound { resource: "planet", name: name.to_string() })
    }

    fn questions(&self) -> Result<&[QuizQuestion], DataError> {
        Ok(&self.questions)
    }

    fn question(&self, id: QuestionId) -> Result<&QuizQuestion, DataError> {
        self.questions
            .iter()
            .find(|q| q.id == id)
            .ok_or(DataError::NotFound { resource: "question", id: id.0 })
    }

    fn fun_facts(&self) -> Result<&[FunFact], DataError> {
        Ok(&self.fun_facts)
    }

    fn explore_contents(&self) -> Result<&[ExploreContent], DataError> {
        Ok(&self.explore_contents)
    }
}

/// Stands in for the catalog while the upstream source is failing.
#[derive(Debug, Clone)]
pub struct UnavailableCatalog {
    reason: String,
}

impl UnavailableCatalog {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    fn fail<T>(&self, resource: &'static str) -> Result<T, DataError> {
        Err(DataError::Unavailable { resource, reason: self.reason.clone() })
    }
}

impl Catalog for UnavailableCatalog {
    fn bodies(&self) -> Result<&[CelestialBody], DataError> {
        self.fail("planets")
    }

    fn body(&self, _id: BodyId) -> Result<&CelestialBody, DataError> {
        self.fail("planet")
    }

    fn body_by_name(&self, _name: &str) -> Result<&CelestialBody, DataError> {
        self.fail("planet")
    }

    fn questions(&self) -> Result<&[QuizQuestion], DataError> {
        self.fail("quiz questions")
    }

    fn question(&self, _id: QuestionId) -> Result<&QuizQuestion, DataError> {
        self.fail("quiz question")
    }

    fn fun_facts(&self) -> Result<&[FunFact], DataError> {
        self.fail("fun facts")
    }

    fn explore_contents(&self) -> Result<&[ExploreContent], DataError> {
        self.fail("explore contents")
    }
}
