use std::rc::Rc;

use crate::support::intake_fixture::{answer_references, IntakeFixture, RecordingHost};
use intakeflow::navigation::NavigationPosition;
use intakeflow::session::WizardSession;

#[test]
fn autosaved_session_resumes_where_it_stopped() {
    let fixture = IntakeFixture::new();
    let store = fixture.store();
    let mut session = fixture.session("agency").with_store(fixture.store());

    answer_references(&mut session);
    session.next();
    session.skip();
    assert_eq!(session.position(), Some(NavigationPosition::new(1, 0)));

    let snapshot = store
        .load(session.id())
        .expect("snapshot reads")
        .expect("autosave wrote a snapshot");
    assert_eq!(snapshot.session_id, session.id());
    assert_eq!(snapshot.position, Some(NavigationPosition::new(1, 0)));
    assert_eq!(snapshot.skipped, vec![5]);

    let resumed = WizardSession::resume(
        snapshot,
        fixture.catalog.clone(),
        RecordingHost::default(),
        Rc::clone(&fixture.sink),
        &fixture.harness.config(),
    );
    assert_eq!(resumed.id(), session.id());
    assert_eq!(resumed.position(), Some(NavigationPosition::new(1, 0)));
    assert_eq!(resumed.state().form.slot(4), session.state().form.slot(4));
    assert_eq!(resumed.state().dynamic_for(4), session.state().dynamic_for(4));
    assert!(resumed.state().skipped.contains(&5));
    assert_eq!(resumed.progress(), session.progress());
    assert!(!resumed.is_completed());
}

#[test]
fn explicit_save_writes_hashed_snapshot() {
    let fixture = IntakeFixture::new();
    let mut config = fixture.harness.config();
    config.sessions.autosave = false;
    let form = intakeflow::answers::FormAnswerState::for_catalog(
        "agency",
        fixture.catalog.question_count(),
    );
    let mut session = WizardSession::start(
        fixture.catalog.clone(),
        form,
        0,
        0,
        RecordingHost::default(),
        Rc::clone(&fixture.sink),
        &config,
    )
    .with_store(fixture.store());

    answer_references(&mut session);
    let store = fixture.store();
    assert!(!store.path_for(session.id()).exists());

    let outcome = session
        .save_snapshot()
        .expect("snapshot saves")
        .expect("store is configured");
    assert_eq!(outcome.path, store.path_for(session.id()));
    assert_eq!(outcome.hash.len(), 64);

    assert!(store.remove(session.id()).expect("snapshot removes"));
    assert!(store.load(session.id()).expect("load succeeds").is_none());
}

#[test]
fn out_of_range_indices_are_clamped() {
    let fixture = IntakeFixture::new();
    let session = fixture.session_at("agency", 9, 9);

    assert_eq!(session.position(), Some(NavigationPosition::new(2, 1)));
    assert_eq!(session.current_question().map(|q| q.id), Some(8));
}

#[test]
fn unknown_applicant_type_completes_immediately() {
    let fixture = IntakeFixture::new();
    let session = fixture.session("collective");

    assert!(session.plan().is_empty());
    assert!(session.is_completed());
    assert_eq!(session.position(), None);
    assert!(session.widget().is_none());
    assert_eq!(session.host().completions, 1);
    assert_eq!(session.progress().percent, 100);
}
