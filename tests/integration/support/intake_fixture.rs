use crate::{catalog_fixture_path, IntegrationHarness};
use intakeflow::answers::{AnswerEntry, FormAnswerState};
use intakeflow::catalog::{load_catalog, Catalog};
use intakeflow::notify::RecordingSink;
use intakeflow::reference::Country;
use intakeflow::session::{SnapshotStore, WizardHost, WizardSession};
use std::rc::Rc;

/// Records every callback the wizard makes.
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub toggles: Vec<(usize, Option<String>, Vec<AnswerEntry>, bool)>,
    pub indices: Vec<(usize, usize)>,
    pub completions: usize,
    pub focused: Vec<u32>,
}

impl WizardHost for RecordingHost {
    fn on_option_toggle(
        &mut self,
        question_index: usize,
        option: Option<&str>,
        answers: &[AnswerEntry],
        is_multi_select: bool,
    ) {
        self.toggles.push((
            question_index,
            option.map(str::to_string),
            answers.to_vec(),
            is_multi_select,
        ));
    }

    fn on_indices_change(&mut self, category_index: usize, question_index: usize) {
        self.indices.push((category_index, question_index));
    }

    fn on_complete(&mut self) {
        self.completions += 1;
    }

    fn on_focus_question(&mut self, question_id: u32) {
        self.focused.push(question_id);
    }
}

pub type FixtureSession = WizardSession<RecordingHost, Rc<RecordingSink>>;

pub struct IntakeFixture {
    pub harness: IntegrationHarness,
    pub catalog: Catalog,
    pub sink: Rc<RecordingSink>,
}

impl IntakeFixture {
    pub fn new() -> Self {
        let harness = IntegrationHarness::new();
        let catalog = load_catalog(catalog_fixture_path()).expect("catalog fixture should parse");
        Self {
            harness,
            catalog,
            sink: Rc::new(RecordingSink::new()),
        }
    }

    pub fn session(&self, job_type: &str) -> FixtureSession {
        self.session_at(job_type, 0, 0)
    }

    pub fn session_at(
        &self,
        job_type: &str,
        category_index: usize,
        question_index: usize,
    ) -> FixtureSession {
        let form = FormAnswerState::for_catalog(job_type, self.catalog.question_count());
        WizardSession::start(
            self.catalog.clone(),
            form,
            category_index,
            question_index,
            RecordingHost::default(),
            Rc::clone(&self.sink),
            &self.harness.config(),
        )
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(self.harness.snapshot_dir())
    }
}

pub fn countries() -> Vec<Country> {
    vec![
        Country {
            name: "Kenya".into(),
            code: Some("KE".into()),
        },
        Country {
            name: "Portugal".into(),
            code: Some("PT".into()),
        },
    ]
}

/// Fills both structured references through the widget.
pub fn answer_references(session: &mut FixtureSession) {
    let edits = {
        let mut widget = session.widget_for_id(4).expect("question 4 exists");
        let mut edits = Vec::new();
        edits.extend(widget.edit_field(0, "Company", "Acme").edit());
        edits.extend(widget.edit_field(0, "Email", "ops@acme.test").edit());
        edits.extend(widget.add_entry().edit());
        edits.extend(widget.edit_field(1, "Company", "Globex").edit());
        edits.extend(widget.edit_field(1, "Email", "hi@globex.test").edit());
        edits
    };
    for edit in edits {
        session.apply(edit);
    }
}

/// Answers every agency question except the references.
pub fn answer_profile_and_declarations(session: &mut FixtureSession) {
    session.resolve_countries(countries());
    let edits = {
        let mut edits = Vec::new();
        let mut name = session.widget_for_id(1).expect("question 1 exists");
        edits.extend(name.edit_text(0, "Northwind Studio").edit());
        let mut services = session.widget_for_id(2).expect("question 2 exists");
        edits.extend(services.toggle_option("Branding").edit());
        let mut regions = session.widget_for_id(3).expect("question 3 exists");
        edits.extend(regions.toggle_country("Portugal").edit());
        let mut declaration = session.widget_for_id(6).expect("question 6 exists");
        edits.extend(declaration.toggle_option("Yes").edit());
        edits
    };
    for edit in edits {
        session.apply(edit);
    }
}
