//! End-to-end lifecycle tests for the dispute-resolution oracle.

use arbiter_core::test_utils::{funded_oracle, RecordingHandler, STAKE};
use arbiter_core::utils::answer_key;
use arbiter_core::{CallbackRegistry, OracleError, OracleEvent};
use std::cell::RefCell;
use std::rc::Rc;

/// Full lifecycle in which the only answer is falsified and the question
/// ends in forced failure:
///
/// ask(timeout=100) at t=0, answer at t=10 (window closes at t=33), a second
/// answer at t=40 is rejected, the court falsifies at t=50, success
/// resolution at t=100 is rejected, failure resolution at t=200 succeeds and
/// invokes the fail handler.
#[test]
fn falsified_answer_forces_failure_resolution() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut oracle = funded_oracle();
    let mut handlers = CallbackRegistry::new();
    handlers.register("on_success", Box::new(RecordingHandler::succeeding(calls.clone())));
    handlers.register("on_fail", Box::new(RecordingHandler::succeeding(calls.clone())));

    let question_key = oracle
        .ask("alice", b"seed", 100, "on_success", "on_fail", 0)
        .unwrap();

    let a1 = answer_key(b"claimed final state");
    oracle.answer("bob", &question_key, &a1, STAKE, 10).unwrap();

    let err = oracle
        .answer("carol", &question_key, &answer_key(b"late claim"), STAKE, 40)
        .unwrap_err();
    assert!(matches!(err, OracleError::AnswerWindowClosed(_)));

    oracle.falsify("court", &a1, "dave").unwrap();

    let err = oracle
        .resolve_success(&a1, b"claimed final state", 100, &mut handlers)
        .unwrap_err();
    assert!(matches!(err, OracleError::AnswerAlreadyFalsified(_)));

    let err = oracle.resolve_fail(&question_key, 199, &mut handlers).unwrap_err();
    assert!(matches!(err, OracleError::TooEarlyToResolve { .. }));
    oracle.resolve_fail(&question_key, 200, &mut handlers).unwrap();

    // Only the fail handler ran
    assert_eq!(calls.borrow().as_slice(), [format!("failure:{question_key}")]);
    assert!(oracle.get_question(&question_key).is_none());
    assert!(oracle.get_answer(&a1).is_none());

    // Bob's stake went to the prosecutor; nothing refunded on failure
    assert_eq!(oracle.bank().balance("bob"), 1000 - STAKE);
    assert_eq!(oracle.bank().balance("dave"), 1000 + STAKE);
    assert_eq!(oracle.bank().pool(), 0);

    let events = oracle.take_events();
    assert_eq!(
        events.last(),
        Some(&OracleEvent::Resolved {
            question_key,
            successful: false,
        })
    );
}

/// Several answerers race; the court falsifies one, a surviving answer is
/// accepted, and every stake ends up with exactly the right party.
#[test]
fn surviving_answer_wins_race_with_falsification() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut oracle = funded_oracle();
    let mut handlers = CallbackRegistry::new();
    handlers.register("on_success", Box::new(RecordingHandler::succeeding(calls.clone())));
    handlers.register("on_fail", Box::new(RecordingHandler::succeeding(calls.clone())));

    let question_key = oracle
        .ask("alice", b"race seed", 90, "on_success", "on_fail", 0)
        .unwrap();

    let wrong = answer_key(b"wrong result");
    let right = answer_key(b"right result");
    oracle.answer("bob", &question_key, &wrong, STAKE, 1).unwrap();
    oracle.answer("carol", &question_key, &right, STAKE, 2).unwrap();
    assert_eq!(oracle.bank().pool(), 2 * STAKE);

    oracle.falsify("court", &wrong, "dave").unwrap();

    // The falsified answer cannot resolve; the surviving one can
    let err = oracle
        .resolve_success(&wrong, b"wrong result", 90, &mut handlers)
        .unwrap_err();
    assert!(matches!(err, OracleError::AnswerAlreadyFalsified(_)));
    let successful = oracle
        .resolve_success(&right, b"right result", 90, &mut handlers)
        .unwrap();
    assert!(successful);

    assert_eq!(calls.borrow().as_slice(), [format!("success:{question_key}")]);

    // Carol refunded, Bob's stake paid to Dave, pool empty
    assert_eq!(oracle.bank().balance("carol"), 1000);
    assert_eq!(oracle.bank().balance("bob"), 1000 - STAKE);
    assert_eq!(oracle.bank().balance("dave"), 1000 + STAKE);
    assert_eq!(oracle.bank().pool(), 0);

    // Cleanup removed the falsified answer as well
    assert!(oracle.get_answer(&wrong).is_none());
    assert!(oracle.get_answer(&right).is_none());

    // Late falsification finds nothing to falsify
    let err = oracle.falsify("court", &right, "dave").unwrap_err();
    assert!(matches!(err, OracleError::AnswerNotFound(_)));
}

/// The oracle state round-trips through JSON, so a persisted ledger resumes
/// exactly where it left off.
#[test]
fn oracle_state_roundtrips_through_json() {
    let mut oracle = funded_oracle();
    let mut handlers = CallbackRegistry::new();
    handlers.register(
        "on_success",
        Box::new(RecordingHandler::succeeding(Rc::new(RefCell::new(Vec::new())))),
    );

    let question_key = oracle
        .ask("alice", b"persisted seed", 60, "on_success", "on_fail", 0)
        .unwrap();
    let key = answer_key(b"persisted image");
    oracle.answer("bob", &question_key, &key, STAKE, 5).unwrap();

    let json = serde_json::to_string(&oracle).unwrap();
    let mut restored: arbiter_core::Oracle = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.get_question(&question_key), oracle.get_question(&question_key));
    assert_eq!(restored.bank().pool(), STAKE);

    // The restored oracle continues the lifecycle
    let successful = restored
        .resolve_success(&key, b"persisted image", 60, &mut handlers)
        .unwrap();
    assert!(successful);
    assert_eq!(restored.bank().balance("bob"), 1000);
}
