//! End-to-end wizard scenarios over the builtin catalog.

use riskwizard_core::{
    Catalog, Event, Respondent, SubmissionError, SubmissionOutcome, SubmissionPayload,
    SubmissionSink, WizardEngine, WizardPosition, WizardSession,
};

struct FixedSink(Result<u16, u16>);

impl SubmissionSink for FixedSink {
    async fn submit(&self, _payload: &SubmissionPayload) -> Result<u16, SubmissionError> {
        self.0.map_err(|status| SubmissionError::Status { status })
    }
}

fn question_ids(engine: &WizardEngine, index: usize) -> Vec<String> {
    engine.catalog().categories()[index]
        .questions
        .iter()
        .map(|q| q.id.clone())
        .collect()
}

#[test]
fn single_severe_answer_scores_three() {
    let mut engine = WizardEngine::new(Catalog::builtin(), Respondent::new("a@b.c", "X1"));
    for index in 0..engine.category_count() {
        for id in question_ids(&engine, index) {
            engine.set_answer(&id, 0).unwrap();
        }
    }
    engine.set_answer("systems_q4", 3).unwrap();

    assert_eq!(engine.total_score(), 3);
    for index in 0..engine.category_count() {
        let expected = if index == 4 { 3 } else { 0 };
        assert_eq!(engine.category_score(index), expected, "category {index}");
    }

    let payload = engine.build_payload();
    assert_eq!(payload.total_score, 3);
    assert_eq!(payload.max_score, 90);
    assert_eq!(payload.category_scores["systems"].score, 3);
    assert_eq!(payload.category_scores["systems"].max_score, 15);
}

#[tokio::test]
async fn walk_every_category_then_submit() {
    for sink_result in [Ok(200), Err(503)] {
        let engine = WizardEngine::new(Catalog::builtin(), Respondent::default());
        let mut session = WizardSession::new(engine, FixedSink(sink_result));

        // Welcome -> Category(0)
        session.advance().await;
        for index in 0..6 {
            assert_eq!(
                session.engine().position(),
                WizardPosition::Category { index }
            );
            for id in question_ids(session.engine(), index) {
                session.engine_mut().set_answer(&id, 2).unwrap();
            }
            session.advance().await;
        }
        assert_eq!(session.engine().position(), WizardPosition::Review);

        let events = session.advance().await;
        assert_eq!(session.engine().position(), WizardPosition::Complete);
        match &events[..] {
            [Event::SubmissionStarted { total_score: 60, .. }, Event::SubmissionFinished { outcome, .. }] => {
                assert_eq!(outcome.is_delivered(), sink_result.is_ok());
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }
}

#[test]
fn completion_is_per_category() {
    let mut engine = WizardEngine::new(Catalog::builtin(), Respondent::default());
    let ids = question_ids(&engine, 1);
    for id in &ids[..4] {
        engine.set_answer(id, 1).unwrap();
    }
    assert!(!engine.is_category_complete(1));
    engine.set_answer(&ids[4], 0).unwrap();
    assert!(engine.is_category_complete(1));
    assert!(!engine.is_category_complete(0));

    // Category 2 unlocks from category 1 alone; category 1 needs category 0.
    assert!(engine.is_unlocked(WizardPosition::Category { index: 2 }));
    assert!(!engine.is_unlocked(WizardPosition::Category { index: 1 }));
    assert!(!engine.is_unlocked(WizardPosition::Review));
}

#[test]
fn review_edit_and_resubmit_path() {
    let mut engine = WizardEngine::new(Catalog::builtin(), Respondent::default());
    let all: Vec<String> = engine.catalog().questions().map(|q| q.id.clone()).collect();
    for id in &all {
        engine.set_answer(id, 1).unwrap();
    }
    engine.jump_to(WizardPosition::Review).unwrap();

    // Clicking a category on the review page jumps back to edit it.
    engine.jump_to(WizardPosition::Category { index: 3 }).unwrap();
    engine.set_answer("shipping_q1", 3).unwrap();
    engine.jump_to(WizardPosition::Review).unwrap();
    assert_eq!(engine.category_score(3), 7);
    assert_eq!(engine.total_score(), 32);

    assert!(engine.advance().is_some());
    assert!(engine
        .finish_submission(SubmissionOutcome::Delivered { status: 200 })
        .is_some());
    assert_eq!(engine.position(), WizardPosition::Complete);
}
