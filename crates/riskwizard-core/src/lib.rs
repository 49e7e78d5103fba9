//! # Risk Wizard Core Library
//!
//! Business logic for the fulfillment risk assessment: a multi-step
//! questionnaire that collects 0-3 scores across fixed categories, totals
//! them, and submits the result to an external webhook. The CLI binary
//! hosts the renderers and the HTTP server over this same library.
//!
//! ## Architecture
//!
//! - **Catalog**: the fixed categories, questions, and score scale
//! - **Wizard Engine**: navigation state machine with completion gating;
//!   every derived value is computed on demand from the answers
//! - **Submission**: payload construction and delivery to a sink, with
//!   completion regardless of delivery outcome
//! - **Config**: TOML configuration plus the remote config lookup
//!
//! ## Key Components
//!
//! - [`WizardEngine`]: Core wizard state machine
//! - [`WizardSession`]: Engine bound to a [`SubmissionSink`]
//! - [`Catalog`]: Question catalog
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod payload;
pub mod provider;
pub mod scoring;
pub mod submission;
pub mod wizard;

pub use catalog::{Catalog, Category, Question, Score, ScoreOption, SCORE_OPTIONS};
pub use config::Config;
pub use error::{CatalogError, ConfigError, CoreError, SubmissionError, WizardError};
pub use events::Event;
pub use payload::{CategoryScore, QuestionDetail, SubmissionPayload};
pub use provider::{fetch_webhook_url, ClientConfig, DEFAULT_WEBHOOK_URL};
pub use scoring::RiskClass;
pub use submission::{HttpSink, StdoutSink, SubmissionOutcome, SubmissionSink, WizardSession};
pub use wizard::{AnswerSet, Respondent, StepStatus, WizardEngine, WizardPosition, WizardView};
