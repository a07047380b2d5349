//! `(State, Event) -> (State, Effects)` transitions for the wizard.
//!
//! The reducer never performs I/O; host callbacks and notices are returned as
//! [`Effect`]s and dispatched by the session driver.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::answers::{
    evaluate, hydrate, to_dynamic, AnswerEntry, Completion, CompletionRules, DynamicAnswers,
    DynamicEntry, FormAnswerState, IncompleteReason,
};
use crate::catalog::{Catalog, QuestionDefinition};
use crate::notify::Notice;

use super::plan::{NavigationPosition, WizardPlan};

const SKIP_BLOCKED_MESSAGE: &str = "This question is required and cannot be skipped.";

/// Read-only inputs shared by every transition.
#[derive(Debug, Clone, Copy)]
pub struct WizardContext<'a> {
    pub catalog: &'a Catalog,
    pub plan: &'a WizardPlan,
    pub rules: CompletionRules,
}

impl<'a> WizardContext<'a> {
    pub fn new(catalog: &'a Catalog, plan: &'a WizardPlan, rules: CompletionRules) -> Self {
        Self {
            catalog,
            plan,
            rules,
        }
    }

    pub fn evaluate(&self, state: &WizardState, question: &QuestionDefinition) -> Completion {
        evaluate(
            question,
            state.form.slot(question.id),
            state.dynamic_for(question.id),
            &self.rules,
        )
    }
}

/// Answer diff produced by a widget: the full replacement slot for one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEdit {
    pub question_id: u32,
    pub option: Option<String>,
    pub answers: Vec<AnswerEntry>,
    pub is_multi_select: bool,
}

impl AnswerEdit {
    pub fn question_index(&self) -> usize {
        (self.question_id as usize).saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WizardEvent {
    Start,
    Edit(AnswerEdit),
    Next,
    Back,
    Skip,
    SubmitAttempt,
    Resume {
        category_index: usize,
        question_index: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    OptionToggled {
        question_index: usize,
        option: Option<String>,
        answers: Vec<AnswerEntry>,
        is_multi_select: bool,
    },
    IndicesChanged(NavigationPosition),
    Completed,
    Notify(Notice),
    /// Bring the question into view; purely presentational.
    FocusQuestion(u32),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WizardState {
    pub form: FormAnswerState,
    pub dynamic: DynamicAnswers,
    pub position: Option<NavigationPosition>,
    /// Per-question validation messages, cleared by every successful move.
    pub errors: BTreeMap<u32, String>,
    /// Questions explicitly skipped; they count as answered on submit.
    pub skipped: BTreeSet<u32>,
    pub completed: bool,
}

impl WizardState {
    /// Hydrates dynamic answers and clamps the resumed indices onto the plan.
    pub fn new(
        catalog: &Catalog,
        plan: &WizardPlan,
        mut form: FormAnswerState,
        category_index: usize,
        question_index: usize,
    ) -> Self {
        form.ensure_span(catalog.question_count());
        let dynamic = hydrate(catalog, &form);
        Self {
            form,
            dynamic,
            position: plan.clamp(category_index, question_index),
            errors: BTreeMap::new(),
            skipped: BTreeSet::new(),
            completed: false,
        }
    }

    pub fn dynamic_for(&self, question_id: u32) -> &[DynamicEntry] {
        self.dynamic
            .get(&question_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn current_question_id(&self, plan: &WizardPlan) -> Option<u32> {
        self.position.and_then(|position| plan.question_at(position))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: WizardState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn unchanged(state: WizardState) -> Self {
        Self {
            state,
            effects: Vec::new(),
        }
    }
}

/// First incomplete question in display order, ignoring skipped ones.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteQuestion {
    pub question_id: u32,
    pub position: NavigationPosition,
    pub reason: IncompleteReason,
}

pub fn first_incomplete(ctx: &WizardContext<'_>, state: &WizardState) -> Option<IncompleteQuestion> {
    ctx.plan
        .positions()
        .filter(|(_, id)| !state.skipped.contains(id))
        .find_map(|(position, id)| {
            let question = ctx.catalog.question(id)?;
            match ctx.evaluate(state, question) {
                Completion::Complete => None,
                Completion::Incomplete(reason) => Some(IncompleteQuestion {
                    question_id: id,
                    position,
                    reason,
                }),
            }
        })
}

pub fn reduce(ctx: &WizardContext<'_>, state: WizardState, event: WizardEvent) -> Transition {
    tracing::debug!(?event, position = ?state.position, "wizard event");
    match event {
        WizardEvent::Start => start(ctx, state),
        WizardEvent::Edit(edit) => apply_edit(ctx, state, edit),
        WizardEvent::Next => next(ctx, state),
        WizardEvent::Back => back(ctx, state),
        WizardEvent::Skip => skip(ctx, state),
        WizardEvent::SubmitAttempt => finish(ctx, state, Vec::new()),
        WizardEvent::Resume {
            category_index,
            question_index,
        } => resume(ctx, state, category_index, question_index),
    }
}

fn start(ctx: &WizardContext<'_>, mut state: WizardState) -> Transition {
    if ctx.plan.is_empty() {
        state.completed = true;
        return Transition {
            state,
            effects: vec![Effect::Completed],
        };
    }
    Transition::unchanged(state)
}

fn apply_edit(ctx: &WizardContext<'_>, mut state: WizardState, edit: AnswerEdit) -> Transition {
    let Some(question) = ctx.catalog.question(edit.question_id) else {
        tracing::warn!(question_id = edit.question_id, "edit for unknown question ignored");
        return Transition::unchanged(state);
    };
    state.form.set_slot(question.id, edit.answers.clone());
    state
        .dynamic
        .insert(question.id, to_dynamic(question, &edit.answers));
    state.skipped.remove(&question.id);
    state.completed = false;
    if ctx.evaluate(&state, question).is_complete() {
        state.errors.remove(&question.id);
    }
    Transition {
        state,
        effects: vec![Effect::OptionToggled {
            question_index: edit.question_index(),
            option: edit.option,
            answers: edit.answers,
            is_multi_select: edit.is_multi_select,
        }],
    }
}

fn next(ctx: &WizardContext<'_>, state: WizardState) -> Transition {
    let Some((position, question)) = current(ctx, &state) else {
        return finish(ctx, state, Vec::new());
    };
    match ctx.evaluate(&state, question) {
        Completion::Complete => advance(ctx, state, position, Vec::new()),
        Completion::Incomplete(reason) => reject(state, question.id, reason.to_string()),
    }
}

fn back(ctx: &WizardContext<'_>, mut state: WizardState) -> Transition {
    let Some(previous) = state
        .position
        .and_then(|position| ctx.plan.previous_position(position))
    else {
        return Transition::unchanged(state);
    };
    state.errors.clear();
    state.position = Some(previous);
    Transition {
        state,
        effects: vec![Effect::IndicesChanged(previous)],
    }
}

fn skip(ctx: &WizardContext<'_>, mut state: WizardState) -> Transition {
    let Some((position, question)) = current(ctx, &state) else {
        return finish(ctx, state, Vec::new());
    };
    if ctx
        .plan
        .category_at(position)
        .is_some_and(|category| category.is_mandatory)
    {
        return reject(state, question.id, SKIP_BLOCKED_MESSAGE.to_string());
    }
    state.form.clear_slot(question.id);
    state.dynamic.insert(question.id, Vec::new());
    state.skipped.insert(question.id);
    let effects = vec![Effect::OptionToggled {
        question_index: question.slot_index(),
        option: None,
        answers: Vec::new(),
        is_multi_select: question.allows_many(),
    }];
    advance(ctx, state, position, effects)
}

fn resume(
    ctx: &WizardContext<'_>,
    mut state: WizardState,
    category_index: usize,
    question_index: usize,
) -> Transition {
    let position = ctx.plan.clamp(category_index, question_index);
    if position == state.position {
        return Transition::unchanged(state);
    }
    state.position = position;
    state.errors.clear();
    let effects = position.map(Effect::IndicesChanged).into_iter().collect();
    Transition { state, effects }
}

fn current<'c>(
    ctx: &WizardContext<'c>,
    state: &WizardState,
) -> Option<(NavigationPosition, &'c QuestionDefinition)> {
    let position = state.position?;
    let id = ctx.plan.question_at(position)?;
    let question = ctx.catalog.question(id)?;
    Some((position, question))
}

fn reject(mut state: WizardState, question_id: u32, message: String) -> Transition {
    state
        .errors
        .insert(question_id, message.clone());
    Transition {
        state,
        effects: vec![Effect::Notify(
            Notice::warning(message).for_question(question_id),
        )],
    }
}

fn advance(
    ctx: &WizardContext<'_>,
    mut state: WizardState,
    position: NavigationPosition,
    mut effects: Vec<Effect>,
) -> Transition {
    state.errors.clear();
    match ctx.plan.next_position(position) {
        Some(next) => {
            state.position = Some(next);
            effects.push(Effect::IndicesChanged(next));
            Transition { state, effects }
        }
        None => finish(ctx, state, effects),
    }
}

/// Terminal step: complete when nothing is missing, otherwise jump to the
/// first incomplete question.
fn finish(ctx: &WizardContext<'_>, mut state: WizardState, mut effects: Vec<Effect>) -> Transition {
    match first_incomplete(ctx, &state) {
        None => {
            state.errors.clear();
            state.completed = true;
            effects.push(Effect::Completed);
        }
        Some(missing) => {
            let message = missing.reason.to_string();
            state.errors.clear();
            state.errors.insert(missing.question_id, message.clone());
            if state.position != Some(missing.position) {
                state.position = Some(missing.position);
                effects.push(Effect::IndicesChanged(missing.position));
            }
            effects.push(Effect::FocusQuestion(missing.question_id));
            effects.push(Effect::Notify(
                Notice::warning(message).for_question(missing.question_id),
            ));
        }
    }
    Transition { state, effects }
}
