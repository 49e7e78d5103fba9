use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the respondent currently is in the wizard.
///
/// `Category { index }` always holds a valid offset into the catalog; the
/// engine never constructs one out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum WizardPosition {
    Welcome,
    Category { index: usize },
    Review,
    Submitting,
    Complete,
}

impl WizardPosition {
    /// Position in the progress strip: 0 for Welcome, `i + 1` for
    /// `Category(i)`, `category_count + 1` for Review and everything after.
    pub fn step_index(self, category_count: usize) -> usize {
        match self {
            WizardPosition::Welcome => 0,
            WizardPosition::Category { index } => index.saturating_add(1),
            WizardPosition::Review | WizardPosition::Submitting | WizardPosition::Complete => {
                category_count.saturating_add(1)
            }
        }
    }

    /// Inverse of [`step_index`](Self::step_index) over the navigable steps.
    pub fn from_step_index(step: usize, category_count: usize) -> Option<Self> {
        match step {
            0 => Some(WizardPosition::Welcome),
            s if s <= category_count => Some(WizardPosition::Category { index: s - 1 }),
            s if Some(s) == category_count.checked_add(1) => Some(WizardPosition::Review),
            _ => None,
        }
    }

    /// Whether the respondent can still move around freely.
    pub fn is_interactive(self) -> bool {
        !matches!(self, WizardPosition::Submitting | WizardPosition::Complete)
    }
}

impl fmt::Display for WizardPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WizardPosition::Welcome => f.write_str("welcome"),
            WizardPosition::Category { index } => write!(f, "category-{index}"),
            WizardPosition::Review => f.write_str("review"),
            WizardPosition::Submitting => f.write_str("submitting"),
            WizardPosition::Complete => f.write_str("complete"),
        }
    }
}
