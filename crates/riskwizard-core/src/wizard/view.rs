//! View-model handed to renderers. Pure data; no behaviour.

use serde::Serialize;

use super::position::WizardPosition;
use crate::scoring::RiskClass;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WizardView {
    pub position: WizardPosition,
    /// 0.0 .. 100.0 across Welcome, the categories, and Review.
    pub progress_pct: f64,
    pub steps: Vec<StepView>,
    pub categories: Vec<CategoryView>,
    pub total_score: u32,
    pub max_score: u32,
    pub total_risk: RiskClass,
    pub controls: NavControls,
    /// Respondent email, or a placeholder when absent.
    pub email: String,
}

/// One entry of the progress strip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepView {
    pub target: WizardPosition,
    pub label: String,
    pub status: StepStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Before the current step.
    Completed,
    Active,
    /// Ahead of the current step and reachable by a jump.
    Available,
    Locked,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub answered: usize,
    pub question_count: usize,
    pub complete: bool,
    pub score: u32,
    pub max_score: u32,
    pub risk: RiskClass,
}

/// Previous/Next button state. Hidden once submission has begun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavControls {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
    pub next_label: String,
}
