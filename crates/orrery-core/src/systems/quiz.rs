//! Quiz progression: shuffled order, one answer per question, running score.
//!
//! Illegal transitions (answering twice, advancing before answering, stepping
//! back from the first question) are rejected with an outcome value and leave
//! the session unchanged. Nothing here panics on bad input.

use serde::Serialize;

use crate::api::types::{OptionId, QuestionId};
use crate::assets::model::{QuizOption, QuizQuestion};
use crate::error::{ConfigResult, ConfigurationError};
use crate::systems::rng::Rng;

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Rejection {
    NoSession,
    Completed,
    AlreadyAnswered,
    NotAnswered,
    UnknownOption,
    AtFirstQuestion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    Rejected(Rejection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceOutcome {
    Advanced,
    Completed { score: u32, total: u32 },
    Rejected(Rejection),
}

/// Externally visible session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    InProgress { current_index: usize, answered: Option<OptionId> },
    Completed { score: u32, total: u32 },
}

/// Result band for a completed quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ScoreTier {
    Stellar,
    Great,
    Good,
    KeepExploring,
}

impl ScoreTier {
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => ScoreTier::Stellar,
            70..=89 => ScoreTier::Great,
            50..=69 => ScoreTier::Good,
            _ => ScoreTier::KeepExploring,
        }
    }

    pub fn headline(self) -> &'static str {
        match self {
            ScoreTier::Stellar | ScoreTier::Great => "Congratulations, Space Explorer!",
            ScoreTier::Good | ScoreTier::KeepExploring => "Nice Try, Cosmic Traveler!",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreTier::Stellar => "Amazing! You're a true astronomer!",
            ScoreTier::Great => "Great job! You know quite a bit about our solar system.",
            ScoreTier::Good => "Good effort! Keep exploring the cosmos.",
            ScoreTier::KeepExploring => "There's a universe of knowledge waiting for you!",
        }
    }
}

/// `round(100 * score / total)`; 0 for an empty quiz.
pub fn completion_percentage(score: u32, total: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    (score as f64 * 100.0 / total as f64).round() as u32
}

/// One run through a shuffled question set.
#[derive(Debug, Clone)]
pub struct QuizSession {
    ordered: Vec<QuizQuestion>,
    current_index: usize,
    answered: Option<OptionId>,
    score: u32,
    /// Per position: already counted toward the score.
    credited: Vec<bool>,
    completed: bool,
}

impl QuizSession {
    fn new(ordered: Vec<QuizQuestion>) -> Self {
        let credited = vec![false; ordered.len()];
        Self {
            ordered,
            current_index: 0,
            answered: None,
            score: 0,
            credited,
            completed: false,
        }
    }

    pub fn total(&self) -> u32 {
        self.ordered.len() as u32
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn ordered_ids(&self) -> Vec<QuestionId> {
        self.ordered.iter().map(|q| q.id).collect()
    }

    pub fn state(&self) -> QuizState {
        if self.completed {
            QuizState::Completed { score: self.score, total: self.total() }
        } else {
            QuizState::InProgress { current_index: self.current_index, answered: self.answered }
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        if self.completed {
            None
        } else {
            self.ordered.get(self.current_index)
        }
    }

    pub fn answered(&self) -> Option<OptionId> {
        self.answered
    }

    /// Whether the recorded answer is correct; `None` until answered.
    pub fn is_correct(&self) -> Option<bool> {
        let question = self.current_question()?;
        self.answered.map(|a| a == question.correct_option_id)
    }

    /// Shown only once the current question has been answered.
    pub fn explanation(&self) -> Option<&str> {
        self.answered?;
        self.current_question().map(|q| q.explanation.as_str())
    }

    /// `(index + 1) / total * 100` in progress, 100 once completed.
    pub fn progress_percentage(&self) -> f64 {
        if self.completed {
            return 100.0;
        }
        (self.current_index + 1) as f64 / self.ordered.len() as f64 * 100.0
    }

    pub fn completion_percentage(&self) -> u32 {
        completion_percentage(self.score, self.total())
    }

    /// Tier of the final result; `None` while in progress.
    pub fn tier(&self) -> Option<ScoreTier> {
        self.completed
            .then(|| ScoreTier::from_percentage(self.completion_percentage()))
    }

    fn answer(&mut self, option: OptionId) -> AnswerOutcome {
        if self.completed {
            return AnswerOutcome::Rejected(Rejection::Completed);
        }
        if self.answered.is_some() {
            return AnswerOutcome::Rejected(Rejection::AlreadyAnswered);
        }
        let Some(question) = self.ordered.get(self.current_index) else {
            return AnswerOutcome::Rejected(Rejection::NoSession);
        };
        if !question.has_option(option) {
            return AnswerOutcome::Rejected(Rejection::UnknownOption);
        }

        self.answered = Some(option);
        if option != question.correct_option_id {
            return AnswerOutcome::Incorrect;
        }
        if !self.credited[self.current_index] {
            self.credited[self.current_index] = true;
            self.score += 1;
        }
        AnswerOutcome::Correct
    }

    fn advance(&mut self) -> AdvanceOutcome {
        if self.completed {
            return AdvanceOutcome::Rejected(Rejection::Completed);
        }
        if self.answered.is_none() {
            return AdvanceOutcome::Rejected(Rejection::NotAnswered);
        }
        if self.current_index + 1 >= self.ordered.len() {
            self.completed = true;
            return AdvanceOutcome::Completed { score: self.score, total: self.total() };
        }
        self.current_index += 1;
        self.answered = None;
        AdvanceOutcome::Advanced
    }

    fn retreat(&mut self) -> Result<(), Rejection> {
        if self.completed {
            return Err(Rejection::Completed);
        }
        if self.current_index == 0 {
            return Err(Rejection::AtFirstQuestion);
        }
        self.current_index -= 1;
        self.answered = None;
        Ok(())
    }
}

/// Owns the shuffle generator and at most one live session.
#[derive(Debug, Clone)]
pub struct QuizEngine {
    rng: Rng,
    session: Option<QuizSession>,
}

impl QuizEngine {
    pub fn new(seed: u64) -> Self {
        Self { rng: Rng::new(seed), session: None }
    }

    /// Begin a session over a fresh permutation of `questions`.
    pub fn start(&mut self, questions: &[QuizQuestion]) -> ConfigResult<()> {
        if questions.is_empty() {
            return Err(ConfigurationError::EmptyQuestionSet);
        }
        for q in questions {
            q.validate()?;
        }

        let mut ordered = questions.to_vec();
        self.rng.shuffle(&mut ordered);
        log::info!("Quiz started with {} questions", ordered.len());
        self.session = Some(QuizSession::new(ordered));
        Ok(())
    }

    /// Throw away the current session and start over with a new shuffle.
    pub fn restart(&mut self, questions: &[QuizQuestion]) -> ConfigResult<()> {
        self.start(questions)
    }

    /// Leave the quiz view; the session is discarded.
    pub fn exit(&mut self) {
        if self.session.take().is_some() {
            log::debug!("Quiz session ended");
        }
    }

    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub fn state(&self) -> Option<QuizState> {
        self.session.as_ref().map(QuizSession::state)
    }

    pub fn answer(&mut self, option: OptionId) -> AnswerOutcome {
        let outcome = match self.session.as_mut() {
            Some(session) => session.answer(option),
            None => AnswerOutcome::Rejected(Rejection::NoSession),
        };
        if let AnswerOutcome::Rejected(reason) = outcome {
            log::debug!("Quiz answer {} rejected: {:?}", option, reason);
        }
        outcome
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        let outcome = match self.session.as_mut() {
            Some(session) => session.advance(),
            None => AdvanceOutcome::Rejected(Rejection::NoSession),
        };
        match outcome {
            AdvanceOutcome::Completed { score, total } => {
                log::info!("Quiz completed: {}/{}", score, total)
            }
            AdvanceOutcome::Rejected(reason) => log::debug!("Quiz advance rejected: {:?}", reason),
            AdvanceOutcome::Advanced => {}
        }
        outcome
    }

    /// Step back one question. Returns false when not allowed.
    pub fn retreat(&mut self) -> bool {
        let result = match self.session.as_mut() {
            Some(session) => session.retreat(),
            None => Err(Rejection::NoSession),
        };
        if let Err(reason) = result {
            log::debug!("Quiz retreat rejected: {:?}", reason);
        }
        result.is_ok()
    }

    pub fn view(&self) -> QuizView {
        QuizView::from_session(self.session.as_ref())
    }
}

/// JSON-friendly projection of the session for the quiz page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizView {
    /// "idle", "inProgress" or "completed".
    pub status: &'static str,
    pub current_index: usize,
    pub total: u32,
    pub score: u32,
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub answered_option_id: Option<OptionId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<ScoreTier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub headline: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// The current question without its answer key.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionView {
    pub id: QuestionId,
    pub question: String,
    pub options: Vec<QuizOption>,
    /// Revealed only after answering.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option_id: Option<OptionId>,
}

impl QuizView {
    fn from_session(session: Option<&QuizSession>) -> Self {
        let Some(s) = session else {
            return Self {
                status: "idle",
                current_index: 0,
                total: 0,
                score: 0,
                progress: 0.0,
                question: None,
                answered_option_id: None,
                correct: None,
                explanation: None,
                percentage: None,
                tier: None,
                headline: None,
                message: None,
            };
        };

        let tier = s.tier();
        Self {
            status: if s.is_completed() { "completed" } else { "inProgress" },
            current_index: s.current_index(),
            total: s.total(),
            score: s.score(),
            progress: s.progress_percentage(),
            question: s.current_question().map(|q| QuestionView {
                id: q.id,
                question: q.prompt.clone(),
                options: q.options.clone(),
                correct_option_id: s.answered().map(|_| q.correct_option_id),
            }),
            answered_option_id: s.answered(),
            correct: s.is_correct(),
            explanation: s.explanation().map(str::to_string),
            percentage: s.is_completed().then(|| s.completion_percentage()),
            tier,
            headline: tier.map(ScoreTier::headline),
            message: tier.map(ScoreTier::message),
        }
    }
}
