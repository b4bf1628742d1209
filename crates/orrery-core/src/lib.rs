pub mod api;
pub mod core;
pub mod components;
pub mod systems;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod error;

// Re-export key types at crate root for convenience
pub use api::config::{CameraConfig, ExplorerConfig, SceneConfig};
pub use api::nav::Route;
pub use api::routes::{respond, ApiResponse};
pub use api::types::{BodyId, ExplorerEvent, OptionId, QuestionId};
pub use assets::catalog::{Catalog, CatalogSnapshot, MemCatalog, UnavailableCatalog};
pub use assets::model::{
    CelestialBody, ExploreContent, FunFact, PlanetFeature, QuizOption, QuizQuestion,
};
pub use bridge::protocol::{BodyInstance, FrameBuffer, FrameLayout};
pub use components::color::Rgb;
pub use crate::core::camera::{Camera3D, Projection};
pub use crate::core::orbit::OrbitingInstance;
pub use crate::core::scene::{OrbitalScene, SelectionCandidate};
pub use crate::core::selection::{SelectionChange, SelectionCoordinator, SelectionObserver};
pub use crate::core::time::AnimationClock;
pub use error::{ConfigResult, ConfigurationError, DataError, UnknownBodyError};
pub use input::pointer::{PointerAction, PointerEvent, PointerTracker};
pub use systems::quiz::{
    AdvanceOutcome, AnswerOutcome, QuizEngine, QuizSession, QuizState, QuizView, Rejection,
    ScoreTier,
};
pub use systems::rng::Rng;
