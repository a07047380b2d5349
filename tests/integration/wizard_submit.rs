use crate::support::intake_fixture::{answer_profile_and_declarations, answer_references, IntakeFixture};
use intakeflow::navigation::NavigationPosition;

#[test]
fn submit_attempt_jumps_to_first_incomplete_question() {
    let fixture = IntakeFixture::new();
    let mut session = fixture.session("agency");
    answer_profile_and_declarations(&mut session);

    session.jump_to(2, 1);
    assert_eq!(session.position(), Some(NavigationPosition::new(2, 1)));
    fixture.sink.drain();

    session.submit_attempt();
    assert!(!session.is_completed());
    assert_eq!(session.position(), Some(NavigationPosition::new(0, 0)));
    assert_eq!(session.host().indices.last(), Some(&(0, 0)));
    assert_eq!(session.host().focused, vec![4]);
    assert!(session.error_messages().contains_key(&4));

    let notices = fixture.sink.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].question_id, Some(4));

    let err = session
        .submission()
        .expect_err("incomplete session must not submit");
    assert!(err.to_string().contains("question 4"));

    answer_references(&mut session);
    session.submit_attempt();
    assert!(session.is_completed());
    assert_eq!(session.host().completions, 1);
    assert!(session.submission().is_ok());
}

#[test]
fn editing_after_completion_reopens_the_session() {
    let fixture = IntakeFixture::new();
    let mut session = fixture.session("agency");
    answer_references(&mut session);
    answer_profile_and_declarations(&mut session);
    session.submit_attempt();
    assert!(session.is_completed());

    let cleared = session
        .widget_for_id(6)
        .expect("question 6 exists")
        .toggle_option("Yes")
        .edit();
    // Re-toggling a single-select option leaves it selected.
    assert!(cleared.is_none());

    let rename = session
        .widget_for_id(1)
        .expect("question 1 exists")
        .edit_text(0, "Southwind")
        .edit()
        .expect("rename is accepted");
    session.apply(rename);
    assert!(!session.is_completed());
}

#[test]
fn back_ignores_validation() {
    let fixture = IntakeFixture::new();
    let mut session = fixture.session_at("agency", 1, 0);
    assert_eq!(session.current_question().map(|q| q.id), Some(1));

    session.next();
    assert!(session.error_messages().contains_key(&1));

    session.back();
    assert_eq!(session.position(), Some(NavigationPosition::new(0, 1)));
    assert!(session.error_messages().is_empty());

    session.back();
    session.back();
    assert_eq!(session.position(), Some(NavigationPosition::new(0, 0)));
    assert_eq!(session.host().indices, vec![(0, 1), (0, 0)]);
}
