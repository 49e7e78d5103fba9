//! Property tests for scoring and gating invariants.

use proptest::prelude::*;
use riskwizard_core::{Catalog, Respondent, RiskClass, WizardEngine, WizardPosition};

/// One optional answer per builtin question, in catalog order.
fn answer_vectors() -> impl Strategy<Value = Vec<Option<u8>>> {
    prop::collection::vec(prop::option::of(0u8..=3), 30)
}

fn engine_with(answers: &[Option<u8>]) -> WizardEngine {
    let mut engine = WizardEngine::new(Catalog::builtin(), Respondent::default());
    let ids: Vec<String> = engine.catalog().questions().map(|q| q.id.clone()).collect();
    for (id, answer) in ids.iter().zip(answers) {
        if let Some(score) = answer {
            engine.set_answer(id, *score).unwrap();
        }
    }
    engine
}

proptest! {
    #[test]
    fn total_is_sum_of_categories_and_answers(answers in answer_vectors()) {
        let engine = engine_with(&answers);
        let by_category: u32 = (0..engine.category_count()).map(|i| engine.category_score(i)).sum();
        let by_answer: u32 = answers.iter().flatten().map(|&s| u32::from(s)).sum();
        prop_assert_eq!(engine.total_score(), by_category);
        prop_assert_eq!(engine.total_score(), by_answer);
        prop_assert_eq!(engine.build_payload().total_score, by_answer);
    }

    #[test]
    fn completion_iff_every_question_answered(answers in answer_vectors()) {
        let engine = engine_with(&answers);
        for (index, chunk) in answers.chunks(5).enumerate() {
            prop_assert_eq!(engine.is_category_complete(index), chunk.iter().all(Option::is_some));
        }
    }

    #[test]
    fn gating_follows_previous_category(answers in answer_vectors()) {
        let engine = engine_with(&answers);
        prop_assert!(engine.is_unlocked(WizardPosition::Welcome));
        let first_category = WizardPosition::Category { index: 0 };
        prop_assert!(engine.is_unlocked(first_category));
        for index in 1..engine.category_count() {
            prop_assert_eq!(
                engine.is_unlocked(WizardPosition::Category { index }),
                engine.is_category_complete(index - 1)
            );
        }
        prop_assert_eq!(
            engine.is_unlocked(WizardPosition::Review),
            answers.iter().all(Option::is_some)
        );
    }

    #[test]
    fn locked_jumps_never_move(answers in answer_vectors(), target in 0usize..8) {
        let mut engine = engine_with(&answers);
        let target = WizardPosition::from_step_index(target, 6).unwrap();
        let unlocked = engine.is_unlocked(target);
        let event = engine.jump_to(target);
        if unlocked && target != WizardPosition::Welcome {
            prop_assert!(event.is_some());
            prop_assert_eq!(engine.position(), target);
        } else {
            prop_assert!(event.is_none());
            prop_assert_eq!(engine.position(), WizardPosition::Welcome);
        }
    }

    #[test]
    fn risk_class_is_monotonic(max in 1u32..200, a in 0u32..200, b in 0u32..200) {
        let (lo, hi) = (a.min(b).min(max), a.max(b).min(max));
        let rank = |c: RiskClass| match c {
            RiskClass::Low => 0,
            RiskClass::Medium => 1,
            RiskClass::High => 2,
        };
        prop_assert!(rank(RiskClass::classify(lo, max)) <= rank(RiskClass::classify(hi, max)));
    }
}
