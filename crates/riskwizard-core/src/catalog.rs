//! Question catalog and score scale.
//!
//! The catalog is fixed content: an ordered list of categories, each
//! exclusively owning an ordered list of questions. Question ids are unique
//! across the whole catalog. Every question is scored on the shared
//! four-level scale in [`SCORE_OPTIONS`].

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{CatalogError, WizardError};

/// Highest value on the score scale.
pub const MAX_SCORE_PER_QUESTION: u32 = 3;

/// A validated answer value in `0..=3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Score(u8);

impl Score {
    pub const NONE: Score = Score(0);
    pub const MINOR: Score = Score(1);
    pub const MODERATE: Score = Score(2);
    pub const SEVERE: Score = Score(3);

    pub fn new(value: u8) -> Result<Self, WizardError> {
        if u32::from(value) <= MAX_SCORE_PER_QUESTION {
            Ok(Self(value))
        } else {
            Err(WizardError::InvalidScore(value))
        }
    }

    pub fn value(self) -> u32 {
        u32::from(self.0)
    }

    /// Label of the matching entry in [`SCORE_OPTIONS`].
    pub fn label(self) -> &'static str {
        SCORE_OPTIONS[self.0 as usize].label
    }
}

impl TryFrom<u8> for Score {
    type Error = WizardError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Score::new(value)
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> u8 {
        score.0
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One level of the Likert scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreOption {
    pub value: u8,
    pub label: &'static str,
}

pub const SCORE_OPTIONS: [ScoreOption; 4] = [
    ScoreOption { value: 0, label: "Not an issue / N/A" },
    ScoreOption { value: 1, label: "Minor issue" },
    ScoreOption { value: 2, label: "Moderate issue" },
    ScoreOption { value: 3, label: "Severe issue" },
];

/// A single Likert-scored statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub text: String,
}

/// A themed group of questions with its display metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    pub description: String,
    pub header_image: String,
    pub footer_note: String,
    pub questions: Vec<Question>,
}

impl Category {
    pub fn max_score(&self) -> u32 {
        max_score_for(self.questions.len())
    }
}

/// Highest total for `question_count` questions, saturating at `u32::MAX`.
fn max_score_for(question_count: usize) -> u32 {
    u32::try_from(question_count)
        .unwrap_or(u32::MAX)
        .saturating_mul(MAX_SCORE_PER_QUESTION)
}

/// Validated on construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CatalogRepr")]
pub struct Catalog {
    categories: Vec<Category>,
}

#[derive(Deserialize)]
struct CatalogRepr {
    categories: Vec<Category>,
}

impl TryFrom<CatalogRepr> for Catalog {
    type Error = CatalogError;

    fn try_from(repr: CatalogRepr) -> Result<Self, Self::Error> {
        Self::new(repr.categories)
    }
}

impl Catalog {
    /// Build a catalog, checking the id-uniqueness invariants.
    pub fn new(categories: Vec<Category>) -> Result<Self, CatalogError> {
        let catalog = Self { categories };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.categories.is_empty() {
            return Err(CatalogError::Empty);
        }
        let mut category_ids = HashSet::new();
        let mut question_ids = HashSet::new();
        for category in &self.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(CatalogError::DuplicateCategory(category.id.clone()));
            }
            if category.questions.is_empty() {
                return Err(CatalogError::EmptyCategory(category.id.clone()));
            }
            for question in &category.questions {
                if !question_ids.insert(question.id.as_str()) {
                    return Err(CatalogError::DuplicateQuestion(question.id.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, index: usize) -> Option<&Category> {
        self.categories.get(index)
    }

    /// All questions in catalog order.
    pub fn questions(&self) -> impl Iterator<Item = &Question> {
        self.categories.iter().flat_map(|c| c.questions.iter())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions().find(|q| q.id == id)
    }

    /// Index of the category owning `question_id`.
    pub fn category_of(&self, question_id: &str) -> Option<usize> {
        self.categories
            .iter()
            .position(|c| c.questions.iter().any(|q| q.id == question_id))
    }

    pub fn question_count(&self) -> usize {
        self.categories.iter().map(|c| c.questions.len()).sum()
    }

    pub fn max_score(&self) -> u32 {
        self.categories
            .iter()
            .map(Category::max_score)
            .fold(0, u32::saturating_add)
    }

    /// The fulfillment risk assessment shipped with the application.
    pub fn builtin() -> Self {
        Self {
            categories: vec![
                category(
                    "customer_experience",
                    "Customer Experience Impact",
                    "This section measures how fulfillment issues affect your customers and brand reputation.",
                    "/images/customer-experience.png",
                    "Again. No judgment here. The purpose of these questions is to help you diagnose if there is in fact a bigger issue that you can address. In the next section we will address Inventory and Demand control.",
                    [
                        "Fulfillment issues regularly lead to refunds, chargebacks, or churn.",
                        "Retail fulfillment issues result in penalties or strained buyer relationships.",
                        "Customer support is reactive with no root-cause tracking.",
                        "Complaints about packaging, timelines, or damage are frequent.",
                        "Fulfillment issues are eroding brand trust or promise.",
                    ],
                ),
                category(
                    "inventory",
                    "Inventory & Demand Control",
                    "These risks often show up as stockouts, excess inventory, missed retail POs, or reactive purchasing.",
                    "/images/inventory-demand.png",
                    "If you checked two or more items in this section, inventory and demand planning issues may be contributing to cash flow or service-level constraints. Continue through the assessment to see how these risks connect.",
                    [
                        "Inventory visibility is fragmented or manual.",
                        "Demand forecasting is assumption-based beyond a few weeks.",
                        "Allocating inventory across channels forces tradeoffs.",
                        "SKU-level turnover is unclear.",
                        "Dead/slow inventory is detected late, tying up cash.",
                    ],
                ),
                category(
                    "accuracy",
                    "Order Accuracy & Exceptions",
                    "These risks typically surface as reships, chargebacks, strained retail relationships, and rising support costs.",
                    "/images/order-accuracy.png",
                    "If you checked two or more items in this section, order execution issues may be introducing hidden cost or operational friction. Continue through the assessment to understand how this connects to other areas.",
                    [
                        "Frequent order errors requiring reships or credits.",
                        "Retail POs are sometimes non-compliant or late.",
                        "Exceptions are discovered reactively.",
                        "Order resolution requires heavy manual effort.",
                        "Costs of reships/credits are not tracked separately.",
                    ],
                ),
                category(
                    "shipping",
                    "Shipping Cost & Carrier Risk",
                    "These risks usually show up as margin erosion, volatility in shipping spend, or limited flexibility during peak periods.",
                    "/images/shipping-carrier.png",
                    "If two or more items apply here, shipping costs or carrier performance may be constraining margins as volume increases. The remaining sections help clarify whether this risk stands alone or compounds elsewhere.",
                    [
                        "Cost-per-order shipped is unclear or volatile.",
                        "Carrier invoices aren't audited.",
                        "Retail chargebacks inflate shipping costs.",
                        "Carrier performance is not reviewed.",
                        "Limited carrier leverage creates inflexibility.",
                    ],
                ),
                category(
                    "systems",
                    "Systems, Data & Visibility",
                    "These risks often manifest as blind spots, delayed decisions, and an over-reliance on tribal knowledge.",
                    "/images/systems-visibility.png",
                    "If several items apply here, limited visibility may be weakening operational oversight as the business grows. The next section will help determine whether this is a tooling issue or a broader execution gap.",
                    [
                        "Fulfillment systems require spreadsheets or manual fixes.",
                        "Labeling/EDI compliance is handled manually.",
                        "KPIs are scattered or not in a single dashboard.",
                        "Operational issues are identified too late.",
                        "Org relies on tribal knowledge, not systems.",
                    ],
                ),
                category(
                    "relationship",
                    "3PL Relationship & Operational Control",
                    "These risks tend to surface as loss of control, misalignment, and difficulty holding partners accountable.",
                    "/images/3pl-relationship.png",
                    "If two or more items apply here, gaps in partner alignment or control may be affecting execution. Viewed alongside the earlier sections, this can help complete the overall risk picture.",
                    [
                        "SLAs are poorly defined or enforced.",
                        "3PL lacks retail compliance expertise.",
                        "Performance issues lack data or accountability.",
                        "Fees and invoices are hard to verify.",
                        "3PL is misaligned with growth goals.",
                    ],
                ),
            ],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// Question ids follow the `<category>_q<n>` convention, numbered from 1.
fn category<const N: usize>(
    id: &str,
    title: &str,
    description: &str,
    header_image: &str,
    footer_note: &str,
    questions: [&str; N],
) -> Category {
    Category {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        header_image: header_image.to_string(),
        footer_note: footer_note.to_string(),
        questions: questions
            .iter()
            .enumerate()
            .map(|(i, text)| Question {
                id: format!("{id}_q{}", i + 1),
                text: text.to_string(),
            })
            .collect(),
    }
}
