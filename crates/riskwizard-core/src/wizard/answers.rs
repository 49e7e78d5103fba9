use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Score};
use crate::error::WizardError;

/// Question id → answer, one entry per catalog question, in catalog order.
///
/// Keys are fixed at construction and never removed; only values change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSet {
    entries: IndexMap<String, Option<Score>>,
}

impl AnswerSet {
    /// All questions unanswered.
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            entries: catalog.questions().map(|q| (q.id.clone(), None)).collect(),
        }
    }

    /// `None` for unknown ids, `Some(None)` for unanswered questions.
    pub fn get(&self, question_id: &str) -> Option<Option<Score>> {
        self.entries.get(question_id).copied()
    }

    /// Overwrite the answer for `question_id`, returning the previous one.
    pub fn set(&mut self, question_id: &str, score: Score) -> Result<Option<Score>, WizardError> {
        let slot = self
            .entries
            .get_mut(question_id)
            .ok_or_else(|| WizardError::UnknownQuestion(question_id.to_string()))?;
        Ok(slot.replace(score))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Score>)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Sum of all answered values; unanswered count as 0.
    pub fn sum(&self) -> u32 {
        self.entries.values().flatten().map(|s| s.value()).sum()
    }

    /// Whether this set's keys are exactly the catalog's question ids.
    pub fn matches(&self, catalog: &Catalog) -> bool {
        self.entries.len() == catalog.question_count()
            && catalog.questions().all(|q| self.entries.contains_key(&q.id))
    }
}
