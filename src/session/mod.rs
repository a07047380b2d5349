//! Host-facing driver that owns the wizard state.
//!
//! A `WizardSession` runs events through the pure reducer and routes the
//! resulting effects to the host callbacks and the notification sink. It is
//! single-threaded: every call completes synchronously inside the host's
//! event handler.

pub mod store;
pub mod submission;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use uuid::Uuid;

use crate::answers::{AnswerEntry, CompletionRules, FormAnswerState};
use crate::catalog::{validate_catalog, Catalog, QuestionDefinition};
use crate::config::WizardConfig;
use crate::navigation::{
    first_incomplete, reduce, AnswerEdit, Effect, NavigationPosition, WizardContext, WizardEvent,
    WizardPlan, WizardState,
};
use crate::notify::NotificationSink;
use crate::reference::{Country, CountryDirectory};
use crate::widget::QuestionWidget;

pub use store::{compute_hash, SessionSnapshot, SnapshotStore, SnapshotWriteOutcome};
pub use submission::{Progress, SubmissionPayload};

/// Callbacks through which the wizard reports to the surrounding form.
pub trait WizardHost {
    /// The only channel for answer changes.
    fn on_option_toggle(
        &mut self,
        question_index: usize,
        option: Option<&str>,
        answers: &[AnswerEntry],
        is_multi_select: bool,
    );

    fn on_indices_change(&mut self, category_index: usize, question_index: usize);

    /// Ready to submit. Submission itself belongs to the host.
    fn on_complete(&mut self);

    /// Scroll/focus hint for the first incomplete question.
    fn on_focus_question(&mut self, _question_id: u32) {}
}

pub struct WizardSession<H, S> {
    id: Uuid,
    catalog: Catalog,
    plan: WizardPlan,
    rules: CompletionRules,
    state: WizardState,
    countries: CountryDirectory,
    store: Option<SnapshotStore>,
    autosave: bool,
    host: H,
    sink: S,
}

impl<H: WizardHost, S: NotificationSink> WizardSession<H, S> {
    /// Builds the plan for `form.job_type`, resumes at the given indices and
    /// reports completion straight away when nothing applies.
    pub fn start(
        catalog: Catalog,
        form: FormAnswerState,
        category_index: usize,
        question_index: usize,
        host: H,
        sink: S,
        config: &WizardConfig,
    ) -> Self {
        Self::start_with_id(
            Uuid::new_v4(),
            catalog,
            form,
            category_index,
            question_index,
            host,
            sink,
            config,
        )
    }

    /// Restores a persisted session.
    pub fn resume(
        snapshot: SessionSnapshot,
        catalog: Catalog,
        host: H,
        sink: S,
        config: &WizardConfig,
    ) -> Self {
        let position = snapshot
            .position
            .unwrap_or(NavigationPosition::new(0, 0));
        let form = FormAnswerState {
            job_type: snapshot.job_type,
            answers: snapshot.answers,
        };
        let mut session = Self::start_with_id(
            snapshot.session_id,
            catalog,
            form,
            position.category_index,
            position.question_index,
            host,
            sink,
            config,
        );
        session.state.skipped = snapshot.skipped.into_iter().collect();
        session
    }

    #[allow(clippy::too_many_arguments)]
    fn start_with_id(
        id: Uuid,
        catalog: Catalog,
        form: FormAnswerState,
        category_index: usize,
        question_index: usize,
        host: H,
        sink: S,
        config: &WizardConfig,
    ) -> Self {
        for issue in validate_catalog(&catalog) {
            tracing::warn!(
                question_id = ?issue.question_id,
                reason = ?issue.reason,
                "{}",
                issue.message
            );
        }
        let plan = WizardPlan::build(&catalog, &form.job_type);
        let state = WizardState::new(&catalog, &plan, form, category_index, question_index);
        let mut session = Self {
            id,
            catalog,
            plan,
            rules: config.validation.rules(),
            state,
            countries: CountryDirectory::pending(config.countries.fallback_glyph.clone()),
            store: None,
            autosave: config.sessions.autosave,
            host,
            sink,
        };
        session.dispatch(WizardEvent::Start);
        session
    }

    /// Persists snapshots to `store`, after every event when autosave is on.
    pub fn with_store(mut self, store: SnapshotStore) -> Self {
        self.store = Some(store);
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn plan(&self) -> &WizardPlan {
        &self.plan
    }

    pub fn state(&self) -> &WizardState {
        &self.state
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn position(&self) -> Option<NavigationPosition> {
        self.state.position
    }

    pub fn current_question(&self) -> Option<&QuestionDefinition> {
        self.state
            .current_question_id(&self.plan)
            .and_then(|id| self.catalog.question(id))
    }

    pub fn error_messages(&self) -> &std::collections::BTreeMap<u32, String> {
        &self.state.errors
    }

    pub fn is_completed(&self) -> bool {
        self.state.completed
    }

    /// Completes the asynchronous country fetch.
    pub fn resolve_countries(&mut self, countries: Vec<Country>) {
        self.countries.resolve(countries);
    }

    pub fn countries(&self) -> &CountryDirectory {
        &self.countries
    }

    /// Widget for the question at the current position.
    pub fn widget(&self) -> Option<QuestionWidget<'_>> {
        let question = self.current_question()?;
        Some(self.widget_for(question))
    }

    /// Widget for any question in the catalog (e.g. a single-page review).
    pub fn widget_for_id(&self, question_id: u32) -> Option<QuestionWidget<'_>> {
        let question = self.catalog.question(question_id)?;
        Some(self.widget_for(question))
    }

    fn widget_for<'w>(&'w self, question: &'w QuestionDefinition) -> QuestionWidget<'w> {
        QuestionWidget::new(
            question,
            self.state.form.slot(question.id),
            self.state.dynamic_for(question.id),
            &self.sink,
        )
        .with_countries(&self.countries)
        .with_rules(self.rules)
    }

    pub fn apply(&mut self, edit: AnswerEdit) {
        self.dispatch(WizardEvent::Edit(edit));
    }

    pub fn next(&mut self) {
        self.dispatch(WizardEvent::Next);
    }

    pub fn back(&mut self) {
        self.dispatch(WizardEvent::Back);
    }

    pub fn skip(&mut self) {
        self.dispatch(WizardEvent::Skip);
    }

    pub fn submit_attempt(&mut self) {
        self.dispatch(WizardEvent::SubmitAttempt);
    }

    pub fn jump_to(&mut self, category_index: usize, question_index: usize) {
        self.dispatch(WizardEvent::Resume {
            category_index,
            question_index,
        });
    }

    pub fn dispatch(&mut self, event: WizardEvent) {
        let ctx = WizardContext::new(&self.catalog, &self.plan, self.rules);
        let transition = reduce(&ctx, std::mem::take(&mut self.state), event);
        self.state = transition.state;
        for effect in transition.effects {
            match effect {
                Effect::OptionToggled {
                    question_index,
                    option,
                    answers,
                    is_multi_select,
                } => self.host.on_option_toggle(
                    question_index,
                    option.as_deref(),
                    &answers,
                    is_multi_select,
                ),
                Effect::IndicesChanged(position) => self
                    .host
                    .on_indices_change(position.category_index, position.question_index),
                Effect::Completed => self.host.on_complete(),
                Effect::Notify(notice) => self.sink.notify(&notice),
                Effect::FocusQuestion(question_id) => self.host.on_focus_question(question_id),
            }
        }
        if self.autosave && self.store.is_some() {
            if let Err(err) = self.save_snapshot() {
                tracing::warn!(session_id = %self.id, error = %err, "autosave failed");
            }
        }
    }

    pub fn progress(&self) -> Progress {
        let ctx = WizardContext::new(&self.catalog, &self.plan, self.rules);
        submission::progress(&ctx, &self.state)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            job_type: self.state.form.job_type.clone(),
            position: self.state.position,
            answers: self.state.form.answers.clone(),
            skipped: self.state.skipped.iter().copied().collect(),
            saved_at: Utc::now(),
        }
    }

    pub fn save_snapshot(&self) -> Result<Option<SnapshotWriteOutcome>> {
        match &self.store {
            Some(store) => Ok(Some(store.save(&self.snapshot())?)),
            None => Ok(None),
        }
    }

    /// Final answer set; fails while any applicable question is incomplete.
    pub fn submission(&self) -> Result<SubmissionPayload> {
        let ctx = WizardContext::new(&self.catalog, &self.plan, self.rules);
        if let Some(missing) = first_incomplete(&ctx, &self.state) {
            bail!(
                "Cannot prepare submission: question {} is incomplete ({})",
                missing.question_id,
                missing.reason
            );
        }
        let answers = self.state.form.answers.clone();
        let encoded =
            serde_json::to_vec(&answers).context("Failed serializing submission answers")?;
        let progress = submission::progress(&ctx, &self.state);
        Ok(SubmissionPayload {
            session_id: self.id,
            job_type: self.state.form.job_type.clone(),
            answers,
            skipped: self.state.skipped.iter().copied().collect(),
            answered: progress.answered,
            total: progress.total,
            digest: compute_hash(&encoded),
            prepared_at: Utc::now(),
        })
    }

    pub fn into_host(self) -> H {
        self.host
    }
}
