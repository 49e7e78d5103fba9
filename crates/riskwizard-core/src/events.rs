use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Score;
use crate::submission::SubmissionOutcome;
use crate::wizard::WizardPosition;

/// Every state change in the wizard produces an Event.
/// Renderers redraw on them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PositionChanged {
        from: WizardPosition,
        to: WizardPosition,
        at: DateTime<Utc>,
    },
    AnswerRecorded {
        question_id: String,
        score: Score,
        /// Previous value, if the question had already been answered.
        previous: Option<Score>,
        at: DateTime<Utc>,
    },
    /// Entered `Submitting`; the payload is being handed to the sink.
    SubmissionStarted {
        total_score: u32,
        max_score: u32,
        at: DateTime<Utc>,
    },
    /// Left `Submitting` for `Complete`, whatever the sink said.
    SubmissionFinished {
        outcome: SubmissionOutcome,
        at: DateTime<Utc>,
    },
}
