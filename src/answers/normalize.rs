//! Bidirectional mapping between raw answer slots and editable entries.
//!
//! `to_raw(q, r, to_dynamic(q, r)) == r` and `to_dynamic(q, to_raw(q, base, d)) == d`
//! hold for well-formed input: structured records carrying exactly the declared
//! fields, and option-with-text slots where entries sharing a tracked option
//! are contiguous.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::catalog::{Catalog, QuestionDefinition, StructuredField, TextInputOption};

use super::{AnswerEntry, DynamicAnswers, DynamicEntry, FormAnswerState};

/// Editing shape of a question's answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerShape<'a> {
    /// Single free-text answer.
    PlainOpen,
    /// Several free-text answers, optionally with links.
    RepeatedOpen { max_answers: u32, has_links: bool },
    /// Open-ended answers that are records over a fixed field set.
    Structured { fields: &'a [StructuredField] },
    /// Closed options where one (or any) option needs accompanying text.
    OptionWithText { input: &'a TextInputOption },
    Closed,
}

pub fn answer_shape(question: &QuestionDefinition) -> AnswerShape<'_> {
    if question.is_open_ended {
        if let Some(fields) = question.structured_fields() {
            return AnswerShape::Structured { fields };
        }
        let max_answers = question.max_answers.unwrap_or(1);
        if max_answers > 1 || question.has_links {
            return AnswerShape::RepeatedOpen {
                max_answers,
                has_links: question.has_links,
            };
        }
        return AnswerShape::PlainOpen;
    }
    match &question.text_input_option {
        Some(input) => AnswerShape::OptionWithText { input },
        None => AnswerShape::Closed,
    }
}

/// Raw slot -> editable entries.
pub fn to_dynamic(question: &QuestionDefinition, slot: &[AnswerEntry]) -> Vec<DynamicEntry> {
    match answer_shape(question) {
        AnswerShape::PlainOpen | AnswerShape::RepeatedOpen { .. } => {
            slot.iter().map(text_entry).collect()
        }
        AnswerShape::Structured { fields } => slot
            .iter()
            .map(|entry| structured_entry(question.id, fields, entry))
            .collect(),
        AnswerShape::OptionWithText { input } => slot
            .iter()
            .filter(|entry| is_tracked(input, entry))
            .filter_map(|entry| {
                let option = entry.selected_option()?;
                let text = entry.custom_text()?;
                Some(DynamicEntry::option_text(option, text))
            })
            .collect(),
        AnswerShape::Closed => Vec::new(),
    }
}

/// Editable entries -> raw slot. `base` is the current slot; only closed and
/// option-with-text shapes read it.
pub fn to_raw(
    question: &QuestionDefinition,
    base: &[AnswerEntry],
    dynamic: &[DynamicEntry],
) -> Vec<AnswerEntry> {
    match answer_shape(question) {
        AnswerShape::PlainOpen | AnswerShape::RepeatedOpen { .. } => dynamic
            .iter()
            .map(|entry| match entry {
                DynamicEntry::Text { text, link } => AnswerEntry::FreeText {
                    custom_text: text.clone(),
                    link: link.clone(),
                },
                _ => AnswerEntry::free_text(entry.as_text()),
            })
            .collect(),
        AnswerShape::Structured { .. } => dynamic
            .iter()
            .map(|entry| AnswerEntry::free_text(entry.as_text()))
            .collect(),
        AnswerShape::OptionWithText { input } => attach_option_text(input, base, dynamic),
        AnswerShape::Closed => base.to_vec(),
    }
}

/// Derives the editable cache for every question in the catalog.
pub fn hydrate(catalog: &Catalog, form: &FormAnswerState) -> DynamicAnswers {
    catalog
        .questions
        .iter()
        .map(|question| (question.id, to_dynamic(question, form.slot(question.id))))
        .collect()
}

pub(crate) fn is_tracked(input: &TextInputOption, entry: &AnswerEntry) -> bool {
    entry
        .selected_option()
        .is_some_and(|option| input.tracks(option))
}

pub(crate) fn record_json(fields: &BTreeMap<String, String>) -> String {
    let object: Map<String, Value> = fields
        .iter()
        .map(|(key, value)| (key.clone(), Value::String(value.clone())))
        .collect();
    Value::Object(object).to_string()
}

fn text_entry(entry: &AnswerEntry) -> DynamicEntry {
    match entry {
        AnswerEntry::FreeText { custom_text, link } => DynamicEntry::Text {
            text: custom_text.clone(),
            link: link.clone(),
        },
        AnswerEntry::Option {
            option,
            custom_text,
        } => DynamicEntry::text(custom_text.clone().unwrap_or_else(|| option.clone())),
        AnswerEntry::Bare(value) => DynamicEntry::text(value.clone()),
    }
}

fn structured_entry(question_id: u32, fields: &[StructuredField], entry: &AnswerEntry) -> DynamicEntry {
    let raw = match entry {
        AnswerEntry::Bare(value) => value.as_str(),
        other => other.custom_text().unwrap_or_default(),
    };
    if raw.trim().is_empty() {
        return DynamicEntry::blank_record(fields);
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(object)) => DynamicEntry::Structured(
            fields
                .iter()
                .map(|field| {
                    let key = field.key();
                    let value = match object.get(&key) {
                        Some(Value::String(value)) => value.clone(),
                        Some(Value::Null) | None => String::new(),
                        Some(other) => other.to_string(),
                    };
                    (key, value)
                })
                .collect(),
        ),
        Ok(_) => {
            tracing::warn!(question_id, "structured answer is not a JSON object; using an empty record");
            DynamicEntry::blank_record(fields)
        }
        Err(err) => {
            tracing::warn!(question_id, error = %err, "malformed structured answer; using an empty record");
            DynamicEntry::blank_record(fields)
        }
    }
}

fn attach_option_text(
    input: &TextInputOption,
    base: &[AnswerEntry],
    dynamic: &[DynamicEntry],
) -> Vec<AnswerEntry> {
    // Text without an owning option belongs to the first tracked selection.
    let anchor = base
        .iter()
        .find_map(|entry| entry.selected_option().filter(|option| input.tracks(option)));

    let mut emitted: Vec<&str> = Vec::new();
    let mut entries = Vec::with_capacity(base.len() + dynamic.len());
    for entry in base {
        let Some(option) = entry.selected_option().filter(|option| input.tracks(option)) else {
            entries.push(entry.clone());
            continue;
        };
        if emitted.contains(&option) {
            continue;
        }
        emitted.push(option);

        let texts: Vec<String> = dynamic
            .iter()
            .filter(|text| text.owner().or(anchor) == Some(option))
            .map(DynamicEntry::as_text)
            .collect();
        if texts.is_empty() {
            entries.push(AnswerEntry::option(option));
        } else {
            entries.extend(
                texts
                    .into_iter()
                    .map(|text| AnswerEntry::option_with_text(option, text)),
            );
        }
    }
    entries
}
