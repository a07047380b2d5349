//! Per-question completeness rules.
//!
//! Evaluation is pure: it reads the raw slot and the editable entries and never
//! touches either.

use std::fmt;

use crate::catalog::QuestionDefinition;

use super::normalize::{answer_shape, is_tracked, AnswerShape};
use super::{AnswerEntry, DynamicEntry};

const NUMBER_WORDS: [(&str, usize); 10] = [
    ("one", 1),
    ("two", 2),
    ("three", 3),
    ("four", 4),
    ("five", 5),
    ("1", 1),
    ("2", 2),
    ("3", 3),
    ("4", 4),
    ("5", 5),
];

/// Tunables for required-count resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionRules {
    /// Required count when a question declares none.
    pub default_required: usize,
    /// Scan structured questions' text for "one".."five" / "1".."5".
    pub infer_from_text: bool,
}

impl Default for CompletionRules {
    fn default() -> Self {
        Self {
            default_required: 1,
            infer_from_text: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncompleteReason {
    Unanswered,
    MissingAnswers { required: usize, filled: usize },
    IncompleteRecords { required: usize, filled: usize },
    MissingOptionText {
        option: String,
        required: usize,
        filled: usize,
    },
    EmptySelection,
}

impl fmt::Display for IncompleteReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IncompleteReason::Unanswered => {
                write!(f, "Please answer this question before continuing.")
            }
            IncompleteReason::MissingAnswers { required, filled } => write!(
                f,
                "Please provide {required} answer{} ({filled} of {required} filled in).",
                plural(*required)
            ),
            IncompleteReason::IncompleteRecords { required, filled } => write!(
                f,
                "Please complete every field for {required} entr{} ({filled} of {required} complete).",
                if *required == 1 { "y" } else { "ies" }
            ),
            IncompleteReason::MissingOptionText {
                option,
                required,
                filled,
            } => write!(
                f,
                "Please describe your \"{option}\" selection ({filled} of {required} provided)."
            ),
            IncompleteReason::EmptySelection => write!(f, "Please select an option."),
        }
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Complete,
    Incomplete(IncompleteReason),
}

impl Completion {
    pub fn is_complete(&self) -> bool {
        matches!(self, Completion::Complete)
    }

    fn from_counts(filled: usize, required: usize, reason: IncompleteReason) -> Self {
        if filled >= required {
            Completion::Complete
        } else {
            Completion::Incomplete(reason)
        }
    }
}

/// Number of filled answers an open-ended question needs.
pub fn required_answer_count(question: &QuestionDefinition, rules: &CompletionRules) -> usize {
    if let Some(max) = question.max_answers.filter(|max| *max > 0) {
        return max as usize;
    }
    if question.structured_answers.is_some() && rules.infer_from_text {
        if let Some(count) = infer_count(&question.question) {
            return count;
        }
    }
    rules.default_required
}

// Best-effort and English-only; first number word wins.
fn infer_count(text: &str) -> Option<usize> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .find_map(|token| {
            NUMBER_WORDS
                .iter()
                .find(|(word, _)| *word == token)
                .map(|(_, count)| *count)
        })
}

pub fn evaluate(
    question: &QuestionDefinition,
    slot: &[AnswerEntry],
    dynamic: &[DynamicEntry],
    rules: &CompletionRules,
) -> Completion {
    if slot.is_empty() {
        return if question.skippable {
            Completion::Complete
        } else {
            Completion::Incomplete(IncompleteReason::Unanswered)
        };
    }

    match answer_shape(question) {
        AnswerShape::Structured { .. } => {
            let required = required_answer_count(question, rules);
            let filled = dynamic.iter().filter(|entry| entry.is_filled()).count();
            Completion::from_counts(
                filled,
                required,
                IncompleteReason::IncompleteRecords { required, filled },
            )
        }
        AnswerShape::PlainOpen | AnswerShape::RepeatedOpen { .. } => {
            let required = question
                .max_answers
                .filter(|max| *max > 0)
                .map(|max| max as usize)
                .unwrap_or(rules.default_required);
            let filled = dynamic
                .iter()
                .filter(|entry| matches!(entry, DynamicEntry::Text { .. }) && entry.is_filled())
                .count();
            Completion::from_counts(
                filled,
                required,
                IncompleteReason::MissingAnswers { required, filled },
            )
        }
        AnswerShape::OptionWithText { input } => {
            let tracked: Vec<&AnswerEntry> =
                slot.iter().filter(|entry| is_tracked(input, entry)).collect();
            if tracked.is_empty() {
                // Deselected: leftover free text must not block progress.
                return Completion::Complete;
            }
            let required = question
                .text_input_max_answers
                .filter(|max| *max > 0)
                .map(|max| max as usize)
                .unwrap_or(1);
            let filled = tracked
                .iter()
                .filter(|entry| entry.custom_text().is_some_and(|text| !text.trim().is_empty()))
                .count();
            if filled == tracked.len() && filled >= required {
                Completion::Complete
            } else {
                let option = tracked
                    .first()
                    .and_then(|entry| entry.selected_option())
                    .unwrap_or(input.option.as_str())
                    .to_string();
                Completion::Incomplete(IncompleteReason::MissingOptionText {
                    option,
                    required,
                    filled,
                })
            }
        }
        AnswerShape::Closed => {
            if slot.iter().all(AnswerEntry::has_content) {
                Completion::Complete
            } else {
                Completion::Incomplete(IncompleteReason::EmptySelection)
            }
        }
    }
}

pub fn is_complete(
    question: &QuestionDefinition,
    slot: &[AnswerEntry],
    dynamic: &[DynamicEntry],
    rules: &CompletionRules,
) -> bool {
    evaluate(question, slot, dynamic, rules).is_complete()
}
