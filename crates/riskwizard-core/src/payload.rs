//! Submission payload sent to the webhook.
//!
//! Built once, at submission time, from the catalog and the answer set.
//! Maximum scores are derived from the catalog so the payload stays correct
//! if the question table changes.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Score};
use crate::wizard::{AnswerSet, Respondent};

/// Final structured submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub email: String,
    pub client_id: String,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    /// Question text → answer, in catalog order.
    pub answers: IndexMap<String, Option<Score>>,
    /// Category id → score breakdown, in catalog order.
    pub category_scores: IndexMap<String, CategoryScore>,
    pub total_score: u32,
    pub max_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    pub score: u32,
    pub max_score: u32,
    /// Question id → answer and text.
    pub questions: IndexMap<String, QuestionDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub score: Option<Score>,
    pub text: String,
}

impl SubmissionPayload {
    pub fn build(
        catalog: &Catalog,
        answers: &AnswerSet,
        respondent: &Respondent,
        timestamp: DateTime<Utc>,
    ) -> Self {
        let answer_of = |id: &str| answers.get(id).flatten();

        let by_text = catalog
            .questions()
            .map(|q| (q.text.clone(), answer_of(&q.id)))
            .collect();

        let category_scores = catalog
            .categories()
            .iter()
            .map(|category| {
                let questions: IndexMap<String, QuestionDetail> = category
                    .questions
                    .iter()
                    .map(|q| {
                        let detail = QuestionDetail {
                            score: answer_of(&q.id),
                            text: q.text.clone(),
                        };
                        (q.id.clone(), detail)
                    })
                    .collect();
                let score = questions
                    .values()
                    .filter_map(|d| d.score)
                    .map(Score::value)
                    .sum();
                let entry = CategoryScore {
                    score,
                    max_score: category.max_score(),
                    questions,
                };
                (category.id.clone(), entry)
            })
            .collect();

        Self {
            email: respondent.email.clone(),
            client_id: respondent.client_id.clone(),
            timestamp,
            answers: by_text,
            category_scores,
            total_score: answers.sum(),
            max_score: catalog.max_score(),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix.
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&at.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap()
    }

    #[test]
    fn json_shape_matches_webhook_contract() {
        let catalog = Catalog::builtin();
        let mut answers = AnswerSet::new(&catalog);
        answers.set("inventory_q2", Score::SEVERE).unwrap();
        let respondent = Respondent::new("ops@acme.test", "C-9");

        let payload = SubmissionPayload::build(&catalog, &answers, &respondent, fixed_time());
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(value["email"], "ops@acme.test");
        assert_eq!(value["clientId"], "C-9");
        assert_eq!(value["timestamp"], "2026-03-04T05:06:07.000Z");
        assert_eq!(value["totalScore"], 3);
        assert_eq!(value["maxScore"], 90);
        assert_eq!(
            value["answers"]["Demand forecasting is assumption-based beyond a few weeks."],
            3
        );
        assert_eq!(value["answers"]["SKU-level turnover is unclear."], json!(null));
        assert_eq!(value["categoryScores"]["inventory"]["score"], 3);
        assert_eq!(value["categoryScores"]["inventory"]["maxScore"], 15);
        assert_eq!(
            value["categoryScores"]["inventory"]["questions"]["inventory_q2"],
            json!({ "score": 3, "text": "Demand forecasting is assumption-based beyond a few weeks." })
        );
        assert_eq!(value["categoryScores"]["shipping"]["score"], 0);
        assert_eq!(value["answers"].as_object().unwrap().len(), 30);
    }

    #[test]
    fn category_order_follows_catalog() {
        let catalog = Catalog::builtin();
        let payload = SubmissionPayload::build(
            &catalog,
            &AnswerSet::new(&catalog),
            &Respondent::default(),
            fixed_time(),
        );
        let ids: Vec<&str> = payload.category_scores.keys().map(String::as_str).collect();
        assert_eq!(
            ids,
            ["customer_experience", "inventory", "accuracy", "shipping", "systems", "relationship"]
        );
    }

    #[test]
    fn parses_back_from_json() {
        let catalog = Catalog::builtin();
        let payload = SubmissionPayload::build(
            &catalog,
            &AnswerSet::new(&catalog),
            &Respondent::new("x@y.z", ""),
            fixed_time(),
        );
        let parsed: SubmissionPayload =
            serde_json::from_str(&payload.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, payload);
    }
}
