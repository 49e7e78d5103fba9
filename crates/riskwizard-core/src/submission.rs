//! Delivery of the finished assessment to the external webhook.
//!
//! Submission is attempted exactly once. Whatever the sink reports, the
//! wizard still moves to `Complete`; a failure is logged and recorded on
//! the `SubmissionFinished` event but never shown to the respondent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::future::Future;
use url::Url;

use crate::error::SubmissionError;
use crate::events::Event;
use crate::payload::SubmissionPayload;
use crate::provider::DEFAULT_WEBHOOK_URL;
use crate::wizard::{WizardEngine, WizardPosition};

/// Receiver of the final payload.
pub trait SubmissionSink {
    /// Deliver `payload`. `Ok` carries the HTTP status (or an equivalent
    /// success code for non-HTTP sinks).
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<u16, SubmissionError>> + Send;
}

/// What happened to the one delivery attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Delivered { status: u16 },
    Failed { reason: String },
}

impl SubmissionOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SubmissionOutcome::Delivered { .. })
    }
}

impl From<Result<u16, SubmissionError>> for SubmissionOutcome {
    fn from(result: Result<u16, SubmissionError>) -> Self {
        match result {
            Ok(status) => SubmissionOutcome::Delivered { status },
            Err(err) => SubmissionOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }
}

/// POSTs the payload as JSON to a webhook URL.
#[derive(Debug, Clone)]
pub struct HttpSink {
    url: Url,
    headers: HashMap<String, String>,
    client: reqwest::Client,
}

impl HttpSink {
    pub fn new(url: &str) -> Result<Self, SubmissionError> {
        let url = Url::parse(url).map_err(|source| SubmissionError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;
        Ok(Self {
            url,
            headers: HashMap::new(),
            client: reqwest::Client::new(),
        })
    }

    /// Like [`new`](Self::new), but an unusable `url` falls back to
    /// [`DEFAULT_WEBHOOK_URL`] with a warning.
    pub fn new_or_default(url: &str) -> Result<Self, SubmissionError> {
        Self::new(url).or_else(|err| {
            tracing::warn!(error = %err, default = DEFAULT_WEBHOOK_URL, "invalid webhook URL, using default");
            Self::new(DEFAULT_WEBHOOK_URL)
        })
    }

    /// Add a custom header sent with every submission.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl SubmissionSink for HttpSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<u16, SubmissionError> {
        let mut request = self.client.post(self.url.clone()).json(payload);
        for (key, value) in &self.headers {
            request = request.header(key, value);
        }
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(status.as_u16())
        } else {
            Err(SubmissionError::Status {
                status: status.as_u16(),
            })
        }
    }
}

/// Prints the payload to stdout instead of sending it anywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl SubmissionSink for StdoutSink {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<u16, SubmissionError> {
        let json = serde_json::to_string_pretty(payload)?;
        println!("{json}");
        Ok(200)
    }
}

/// A wizard engine bound to the sink that receives its result.
///
/// Renderers drive this instead of the bare engine when they want `advance`
/// from Review to carry the submission through to `Complete`.
#[derive(Debug)]
pub struct WizardSession<S> {
    engine: WizardEngine,
    sink: S,
}

impl<S: SubmissionSink> WizardSession<S> {
    pub fn new(engine: WizardEngine, sink: S) -> Self {
        Self { engine, sink }
    }

    pub fn engine(&self) -> &WizardEngine {
        &self.engine
    }

    /// Mutable access for answering and non-submitting navigation.
    pub fn engine_mut(&mut self) -> &mut WizardEngine {
        &mut self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_engine(self) -> WizardEngine {
        self.engine
    }

    /// Advance one step. From Review this runs the whole
    /// `Submitting -> Complete` sequence and returns both events.
    pub async fn advance(&mut self) -> Vec<Event> {
        if self.engine.position() != WizardPosition::Review {
            return self.engine.advance().into_iter().collect();
        }
        let Some(started) = self.engine.advance() else {
            return Vec::new();
        };
        let payload = self.engine.build_payload();
        let outcome = SubmissionOutcome::from(self.sink.submit(&payload).await);
        match &outcome {
            SubmissionOutcome::Delivered { status } => {
                tracing::info!(status, total_score = payload.total_score, "assessment delivered");
            }
            SubmissionOutcome::Failed { reason } => {
                tracing::warn!(%reason, "assessment submission failed; completing anyway");
            }
        }
        let mut events = vec![started];
        events.extend(self.engine.finish_submission(outcome));
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::wizard::Respondent;
    use std::sync::{Arc, Mutex};

    /// Records payloads and answers with a canned result.
    #[derive(Clone, Default)]
    struct RecordingSink {
        seen: Arc<Mutex<Vec<SubmissionPayload>>>,
        fail: bool,
    }

    impl SubmissionSink for RecordingSink {
        async fn submit(&self, payload: &SubmissionPayload) -> Result<u16, SubmissionError> {
            self.seen.lock().unwrap().push(payload.clone());
            if self.fail {
                Err(SubmissionError::Status { status: 502 })
            } else {
                Ok(204)
            }
        }
    }

    fn completed_engine() -> WizardEngine {
        let mut engine = WizardEngine::new(Catalog::builtin(), Respondent::new("e@x.io", "7"));
        let ids: Vec<String> = engine.catalog().questions().map(|q| q.id.clone()).collect();
        for id in ids {
            engine.set_answer(&id, 1).unwrap();
        }
        engine.jump_to(WizardPosition::Review).unwrap();
        engine
    }

    #[tokio::test]
    async fn delivers_once_and_completes() {
        let sink = RecordingSink::default();
        let mut session = WizardSession::new(completed_engine(), sink.clone());
        let events = session.advance().await;

        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::SubmissionStarted { .. }));
        assert!(matches!(
            &events[1],
            Event::SubmissionFinished {
                outcome: SubmissionOutcome::Delivered { status: 204 },
                ..
            }
        ));
        assert_eq!(session.engine().position(), WizardPosition::Complete);

        let seen = sink.seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].total_score, 30);
        assert_eq!(seen[0].email, "e@x.io");
    }

    #[tokio::test]
    async fn failure_still_completes() {
        let sink = RecordingSink {
            fail: true,
            ..Default::default()
        };
        let mut session = WizardSession::new(completed_engine(), sink.clone());
        let events = session.advance().await;

        assert_eq!(session.engine().position(), WizardPosition::Complete);
        assert!(matches!(
            &events[1],
            Event::SubmissionFinished {
                outcome: SubmissionOutcome::Failed { .. },
                ..
            }
        ));
        assert!(session.advance().await.is_empty());
        assert_eq!(sink.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn advance_before_review_does_not_submit() {
        let sink = RecordingSink::default();
        let engine = WizardEngine::new(Catalog::builtin(), Respondent::default());
        let mut session = WizardSession::new(engine, sink.clone());
        let events = session.advance().await;
        assert_eq!(events.len(), 1);
        assert_eq!(
            session.engine().position(),
            WizardPosition::Category { index: 0 }
        );
        assert!(sink.seen.lock().unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_webhook_url() {
        assert!(matches!(
            HttpSink::new("not a url"),
            Err(SubmissionError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn unusable_webhook_url_falls_back_to_default() {
        for bad in ["", "/webhook/risk", "not a url"] {
            let sink = HttpSink::new_or_default(bad).unwrap();
            assert_eq!(sink.url().as_str(), DEFAULT_WEBHOOK_URL);
        }
        let sink = HttpSink::new_or_default("https://hooks.example/risk").unwrap();
        assert_eq!(sink.url().as_str(), "https://hooks.example/risk");
    }

    #[tokio::test]
    async fn stdout_sink_reports_success() {
        let payload = completed_engine().build_payload();
        assert_eq!(StdoutSink.submit(&payload).await.unwrap(), 200);
    }

    #[test]
    fn encode_failure_is_a_failed_outcome() {
        let err = serde_json::from_str::<u8>("x").unwrap_err();
        let outcome = SubmissionOutcome::from(Err(SubmissionError::from(err)));
        assert!(matches!(
            outcome,
            SubmissionOutcome::Failed { ref reason } if reason.starts_with("Failed to encode payload")
        ));
    }

    #[test]
    fn outcome_from_result() {
        assert!(SubmissionOutcome::from(Ok(200)).is_delivered());
        let failed = SubmissionOutcome::from(Err(SubmissionError::Status { status: 500 }));
        assert_eq!(
            failed,
            SubmissionOutcome::Failed {
                reason: "Webhook responded with HTTP 500".into()
            }
        );
    }
}
