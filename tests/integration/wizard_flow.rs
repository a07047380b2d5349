use crate::support::intake_fixture::{answer_references, countries, IntakeFixture};
use intakeflow::answers::AnswerEntry;
use intakeflow::navigation::NavigationPosition;
use intakeflow::notify::NoticeLevel;
use intakeflow::widget::{EditRejection, WidgetOutcome};

#[test]
fn agency_walkthrough_reaches_completion() {
    let fixture = IntakeFixture::new();
    let mut session = fixture.session("agency");

    assert_eq!(session.position(), Some(NavigationPosition::new(0, 0)));
    assert_eq!(session.current_question().map(|q| q.id), Some(4));
    assert_eq!(session.progress().total, 7);

    // References need both records before moving on.
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(0, 0)));
    assert!(session.error_messages().contains_key(&4));
    let notices = fixture.sink.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Warning);
    assert_eq!(notices[0].question_id, Some(4));

    answer_references(&mut session);
    assert!(session.error_messages().is_empty());
    let last_toggle = session.host().toggles.last().expect("edits reach the host");
    assert_eq!(last_toggle.0, 3);
    assert_eq!(last_toggle.2.len(), 2);
    assert!(!last_toggle.3);

    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(0, 1)));

    session.skip();
    assert_eq!(session.position(), Some(NavigationPosition::new(1, 0)));
    assert!(session.state().skipped.contains(&5));
    let cleared = session.host().toggles.last().expect("skip clears the slot");
    assert_eq!(cleared.0, 4);
    assert_eq!(cleared.1, None);
    assert!(cleared.2.is_empty());

    // Agency name is capped at five words.
    let (rejected, accepted) = {
        let mut widget = session.widget().expect("question 1 is current");
        let rejected = widget.edit_text(0, "the northwind creative design studio collective");
        let accepted = widget.edit_text(0, "Northwind Studio").edit();
        (rejected, accepted)
    };
    assert_eq!(
        rejected,
        WidgetOutcome::Rejected(EditRejection::WordLimit {
            max_words: 5,
            words: 6
        })
    );
    session.apply(accepted.expect("short name is accepted"));
    assert_eq!(
        session.state().form.slot(1),
        &[AnswerEntry::free_text("Northwind Studio")]
    );
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(1, 1)));

    // Selecting "Other" requires two descriptions.
    let toggled = session
        .widget()
        .expect("question 2 is current")
        .toggle_option("Other")
        .edit()
        .expect("known option toggles");
    assert_eq!(toggled.option.as_deref(), Some("Other"));
    assert!(toggled.is_multi_select);
    session.apply(toggled);
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(1, 1)));
    assert!(session.error_messages().contains_key(&2));

    let edits = {
        let mut widget = session.widget().expect("question 2 is current");
        assert_eq!(widget.text_placeholder(), Some("Describe the service"));
        assert_eq!(widget.entries().len(), 1);
        let mut edits = Vec::new();
        edits.extend(widget.toggle_option("Branding").edit());
        edits.extend(widget.set_option_text(0, "Photography").edit());
        edits.extend(widget.add_entry().edit());
        edits.extend(widget.set_option_text(1, "Print").edit());
        assert!(matches!(
            widget.add_entry(),
            WidgetOutcome::Rejected(EditRejection::AnswerLimit { max_answers: 2 })
        ));
        edits
    };
    assert_eq!(edits.len(), 4);
    for edit in edits {
        session.apply(edit);
    }
    assert_eq!(
        session.state().form.slot(2),
        &[
            AnswerEntry::option_with_text("Other", "Photography"),
            AnswerEntry::option_with_text("Other", "Print"),
            AnswerEntry::option("Branding"),
        ]
    );
    assert!(!session.error_messages().contains_key(&2));
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(1, 2)));

    // Countries are unavailable until the host resolves the list.
    assert!(session.countries().is_pending());
    {
        let mut widget = session.widget().expect("question 3 is current");
        assert!(widget.country_options().is_empty());
        assert!(matches!(
            widget.toggle_country("Portugal"),
            WidgetOutcome::Rejected(EditRejection::UnknownCountry { .. })
        ));
    }
    session.resolve_countries(countries());
    let region = {
        let mut widget = session.widget().expect("question 3 is current");
        let names: Vec<String> = widget
            .country_options()
            .into_iter()
            .map(|option| option.name)
            .collect();
        assert_eq!(names, vec!["Kenya".to_string(), "Portugal".to_string()]);
        widget.toggle_country("Portugal").edit()
    };
    session.apply(region.expect("resolved country toggles"));
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(2, 0)));

    // Declarations are mandatory.
    session.skip();
    assert_eq!(session.position(), Some(NavigationPosition::new(2, 0)));
    assert_eq!(
        session.error_messages().get(&6).map(String::as_str),
        Some("This question is required and cannot be skipped.")
    );
    let confirm = session
        .widget()
        .expect("question 6 is current")
        .toggle_option("Yes")
        .edit()
        .expect("declaration toggles");
    session.apply(confirm);
    session.next();
    assert_eq!(session.position(), Some(NavigationPosition::new(2, 1)));
    assert_eq!(session.host().completions, 0);

    session.next();
    assert!(session.is_completed());
    assert_eq!(session.host().completions, 1);

    let progress = session.progress();
    assert_eq!(progress.answered, 6);
    assert_eq!(progress.total, 7);

    let payload = session.submission().expect("complete session submits");
    assert_eq!(payload.job_type, "agency");
    assert_eq!(payload.skipped, vec![5]);
    assert_eq!(payload.digest.len(), 64);
}

#[test]
fn freelancer_plan_only_shows_their_questions() {
    let fixture = IntakeFixture::new();
    let mut session = fixture.session("freelancer");

    assert_eq!(session.plan().question_count(), 1);
    assert_eq!(session.current_question().map(|q| q.id), Some(7));

    let edit = session
        .widget()
        .expect("question 7 is current")
        .edit_text(0, "Ada")
        .edit()
        .expect("name is accepted");
    session.apply(edit);
    session.next();

    assert!(session.is_completed());
    assert_eq!(session.host().completions, 1);
    assert!(session.host().indices.is_empty());
}
