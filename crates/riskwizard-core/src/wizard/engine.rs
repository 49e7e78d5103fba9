//! Wizard engine implementation.
//!
//! The engine owns the navigation position and every answer. Completion,
//! gating, and scores are derived from the answers on each query; nothing
//! is cached.
//!
//! ## State Transitions
//!
//! ```text
//! Welcome -> Category(0) -> .. -> Category(N-1) -> Review -> Submitting -> Complete
//! ```
//!
//! Backward movement among Welcome/Category/Review is free, subject to
//! gating. `Review -> Submitting -> Complete` is one-way.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = WizardEngine::new(Catalog::builtin(), respondent);
//! engine.advance();                         // Welcome -> Category(0)
//! engine.set_answer("inventory_q1", 2)?;
//! let view = engine.snapshot();             // hand to a renderer
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::answers::AnswerSet;
use super::position::WizardPosition;
use super::respondent::Respondent;
use super::view::{CategoryView, NavControls, StepStatus, StepView, WizardView};
use crate::catalog::{Catalog, Score};
use crate::error::{Result, WizardError};
use crate::events::Event;
use crate::payload::SubmissionPayload;
use crate::scoring::RiskClass;
use crate::submission::SubmissionOutcome;

/// Core wizard state machine.
///
/// Commands return `Some(Event)` when they changed something and `None`
/// when they were a no-op (locked target, wrong position).
///
/// Restoring from serialized state re-checks the catalog, the answer keys
/// and the position bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "EngineState")]
pub struct WizardEngine {
    catalog: Catalog,
    answers: AnswerSet,
    position: WizardPosition,
    respondent: Respondent,
}

#[derive(Deserialize)]
struct EngineState {
    catalog: Catalog,
    answers: AnswerSet,
    position: WizardPosition,
    respondent: Respondent,
}

impl TryFrom<EngineState> for WizardEngine {
    type Error = WizardError;

    fn try_from(state: EngineState) -> Result<Self, Self::Error> {
        if !state.answers.matches(&state.catalog) {
            return Err(WizardError::AnswersMismatch);
        }
        if let WizardPosition::Category { index } = state.position {
            let len = state.catalog.len();
            if index >= len {
                return Err(WizardError::CategoryOutOfBounds { index, len });
            }
        }
        Ok(Self {
            catalog: state.catalog,
            answers: state.answers,
            position: state.position,
            respondent: state.respondent,
        })
    }
}

impl WizardEngine {
    /// Create an engine at `Welcome` with every question unanswered.
    pub fn new(catalog: Catalog, respondent: Respondent) -> Self {
        let answers = AnswerSet::new(&catalog);
        Self {
            catalog,
            answers,
            position: WizardPosition::Welcome,
            respondent,
        }
    }

    /// Create an engine at `Welcome` with answers taken from a JSON object
    /// mapping question id to score.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or any entry names an
    /// unknown question or an out-of-scale score.
    pub fn from_sheet_json(catalog: Catalog, respondent: Respondent, json: &str) -> Result<Self> {
        let sheet: BTreeMap<String, u8> = serde_json::from_str(json)?;
        let mut engine = Self::new(catalog, respondent);
        for (question_id, score) in &sheet {
            engine.set_answer(question_id, *score)?;
        }
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn position(&self) -> WizardPosition {
        self.position
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn answers(&self) -> &AnswerSet {
        &self.answers
    }

    pub fn respondent(&self) -> &Respondent {
        &self.respondent
    }

    pub fn category_count(&self) -> usize {
        self.catalog.len()
    }

    /// `None` for unknown ids, `Some(None)` when unanswered.
    pub fn answer(&self, question_id: &str) -> Option<Option<Score>> {
        self.answers.get(question_id)
    }

    /// True iff every question in category `index` has an answer.
    /// Out-of-range indices are never complete.
    pub fn is_category_complete(&self, index: usize) -> bool {
        self.catalog.category(index).is_some_and(|category| {
            category
                .questions
                .iter()
                .all(|q| matches!(self.answers.get(&q.id), Some(Some(_))))
        })
    }

    pub fn all_complete(&self) -> bool {
        (0..self.category_count()).all(|i| self.is_category_complete(i))
    }

    /// Welcome is always unlocked; `Category(i)` needs `Category(i-1)`
    /// complete; Review needs every category complete. Submitting and
    /// Complete are never jump targets.
    pub fn is_unlocked(&self, target: WizardPosition) -> bool {
        match target {
            WizardPosition::Welcome => true,
            WizardPosition::Category { index } => {
                index < self.category_count()
                    && (index == 0 || self.is_category_complete(index - 1))
            }
            WizardPosition::Review => self.all_complete(),
            WizardPosition::Submitting | WizardPosition::Complete => false,
        }
    }

    /// Sum of answered values in category `index`, unanswered as 0.
    pub fn category_score(&self, index: usize) -> u32 {
        self.catalog
            .category(index)
            .map(|category| {
                category
                    .questions
                    .iter()
                    .filter_map(|q| self.answers.get(&q.id).flatten())
                    .map(Score::value)
                    .sum()
            })
            .unwrap_or(0)
    }

    pub fn category_max_score(&self, index: usize) -> u32 {
        self.catalog.category(index).map(|c| c.max_score()).unwrap_or(0)
    }

    pub fn total_score(&self) -> u32 {
        self.answers.sum()
    }

    pub fn total_max_score(&self) -> u32 {
        self.catalog.max_score()
    }

    pub fn category_risk(&self, index: usize) -> RiskClass {
        RiskClass::classify(self.category_score(index), self.category_max_score(index))
    }

    pub fn total_risk(&self) -> RiskClass {
        RiskClass::classify(self.total_score(), self.total_max_score())
    }

    /// Snapshot of the submission payload stamped with the current time.
    ///
    /// Callers are expected to have reached Review (all categories
    /// complete); this does not re-validate.
    pub fn build_payload(&self) -> SubmissionPayload {
        self.build_payload_at(Utc::now())
    }

    pub fn build_payload_at(&self, timestamp: DateTime<Utc>) -> SubmissionPayload {
        SubmissionPayload::build(&self.catalog, &self.answers, &self.respondent, timestamp)
    }

    /// Build the view-model a renderer projects onto its display surface.
    pub fn snapshot(&self) -> WizardView {
        let n = self.category_count();
        let current_step = self.position.step_index(n);
        let total_steps = n + 2;

        let steps = (0..total_steps)
            .filter_map(|step| WizardPosition::from_step_index(step, n))
            .map(|target| {
                let step = target.step_index(n);
                let label = match target {
                    WizardPosition::Welcome => "Start".to_string(),
                    WizardPosition::Category { index } => self
                        .catalog
                        .category(index)
                        .map(|c| c.title.clone())
                        .unwrap_or_default(),
                    _ => "Review".to_string(),
                };
                let status = if step < current_step {
                    StepStatus::Completed
                } else if step == current_step {
                    StepStatus::Active
                } else if self.is_unlocked(target) {
                    StepStatus::Available
                } else {
                    StepStatus::Locked
                };
                StepView {
                    target,
                    label,
                    status,
                }
            })
            .collect();

        let categories = self
            .catalog
            .categories()
            .iter()
            .enumerate()
            .map(|(index, category)| CategoryView {
                id: category.id.clone(),
                title: category.title.clone(),
                answered: category
                    .questions
                    .iter()
                    .filter(|q| matches!(self.answers.get(&q.id), Some(Some(_))))
                    .count(),
                question_count: category.questions.len(),
                complete: self.is_category_complete(index),
                score: self.category_score(index),
                max_score: category.max_score(),
                risk: self.category_risk(index),
            })
            .collect();

        WizardView {
            position: self.position,
            progress_pct: (current_step + 1) as f64 / total_steps as f64 * 100.0,
            steps,
            categories,
            total_score: self.total_score(),
            max_score: self.total_max_score(),
            total_risk: self.total_risk(),
            controls: self.controls(),
            email: self.respondent.display_email().to_string(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Move forward one step. From Review this enters `Submitting`; the
    /// caller then delivers [`build_payload`](Self::build_payload) and
    /// reports back through [`finish_submission`](Self::finish_submission).
    pub fn advance(&mut self) -> Option<Event> {
        let last = self.category_count().checked_sub(1)?;
        match self.position {
            WizardPosition::Welcome => self.move_to(WizardPosition::Category { index: 0 }),
            WizardPosition::Category { index } if index < last => {
                self.move_to(WizardPosition::Category { index: index + 1 })
            }
            WizardPosition::Category { .. } => self.move_to(WizardPosition::Review),
            WizardPosition::Review => {
                self.position = WizardPosition::Submitting;
                tracing::info!(
                    total_score = self.total_score(),
                    max_score = self.total_max_score(),
                    "submitting assessment"
                );
                Some(Event::SubmissionStarted {
                    total_score: self.total_score(),
                    max_score: self.total_max_score(),
                    at: Utc::now(),
                })
            }
            WizardPosition::Submitting | WizardPosition::Complete => None,
        }
    }

    pub fn retreat(&mut self) -> Option<Event> {
        let target = match self.position {
            WizardPosition::Category { index: 0 } => WizardPosition::Welcome,
            WizardPosition::Category { index } => WizardPosition::Category { index: index - 1 },
            WizardPosition::Review => WizardPosition::Category {
                index: self.category_count().checked_sub(1)?,
            },
            WizardPosition::Welcome | WizardPosition::Submitting | WizardPosition::Complete => {
                return None;
            }
        };
        self.move_to(target)
    }

    /// Jump directly to an unlocked Welcome, Category or Review step.
    /// Locked targets and jumps out of Submitting/Complete are ignored.
    pub fn jump_to(&mut self, target: WizardPosition) -> Option<Event> {
        if !self.position.is_interactive() {
            return None;
        }
        if target == self.position {
            return None;
        }
        self.move_to(target)
    }

    /// Record `score` for `question_id`, overwriting any prior answer.
    /// Position is unaffected. On error nothing changes.
    pub fn set_answer(&mut self, question_id: &str, score: u8) -> Result<Event, WizardError> {
        let score = Score::new(score)?;
        let previous = self.answers.set(question_id, score)?;
        tracing::debug!(question_id, %score, "answer recorded");
        Ok(Event::AnswerRecorded {
            question_id: question_id.to_string(),
            score,
            previous,
            at: Utc::now(),
        })
    }

    /// Answer question number `number` (1-based) of category `index`.
    pub fn set_answer_at(
        &mut self,
        index: usize,
        number: usize,
        score: u8,
    ) -> Result<Event, WizardError> {
        let len = self.category_count();
        let category = self
            .catalog
            .category(index)
            .ok_or(WizardError::CategoryOutOfBounds { index, len })?;
        let question_id = number
            .checked_sub(1)
            .and_then(|i| category.questions.get(i))
            .map(|q| q.id.clone())
            .ok_or_else(|| WizardError::UnknownQuestion(format!("{}#{number}", category.id)))?;
        self.set_answer(&question_id, score)
    }

    /// Leave `Submitting` for `Complete`. The outcome is recorded on the
    /// event only; completion happens either way.
    pub fn finish_submission(&mut self, outcome: SubmissionOutcome) -> Option<Event> {
        if self.position != WizardPosition::Submitting {
            return None;
        }
        self.position = WizardPosition::Complete;
        Some(Event::SubmissionFinished {
            outcome,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn move_to(&mut self, target: WizardPosition) -> Option<Event> {
        if !self.is_unlocked(target) {
            tracing::debug!(from = %self.position, to = %target, "navigation to locked step ignored");
            return None;
        }
        let from = self.position;
        self.position = target;
        Some(Event::PositionChanged {
            from,
            to: target,
            at: Utc::now(),
        })
    }

    fn controls(&self) -> NavControls {
        let n = self.category_count();
        match self.position {
            WizardPosition::Welcome => NavControls {
                visible: true,
                prev_enabled: false,
                next_enabled: true,
                next_label: "Get Started".to_string(),
            },
            WizardPosition::Category { index } => NavControls {
                visible: true,
                prev_enabled: true,
                next_enabled: self.is_category_complete(index),
                next_label: if index + 1 == n {
                    "Review Answers".to_string()
                } else {
                    "Next Category".to_string()
                },
            },
            WizardPosition::Review => NavControls {
                visible: true,
                prev_enabled: true,
                next_enabled: true,
                next_label: "Submit Assessment".to_string(),
            },
            WizardPosition::Submitting | WizardPosition::Complete => NavControls {
                visible: false,
                prev_enabled: false,
                next_enabled: false,
                next_label: String::new(),
            },
        }
    }
}
