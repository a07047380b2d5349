//! Answer shapes shared by the wizard, the widget and the host.
//!
//! `FormAnswerState` holds the raw, host-facing answers (one slot per question
//! id). `DynamicAnswers` is the editable view derived from it by the
//! normalizer; the completion evaluator measures filled dynamic entries.

pub mod completion;
pub mod normalize;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use completion::{
    evaluate, is_complete, required_answer_count, Completion, CompletionRules, IncompleteReason,
};
pub use normalize::{answer_shape, hydrate, to_dynamic, to_raw, AnswerShape};

/// One entry inside a question's answer slot.
///
/// The host exchanges entries either as bare strings (legacy) or as
/// `{option, customText, link}` records; both are resolved into this union at
/// the serde boundary. Links are only kept on free-text entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAnswerEntry", into = "RawAnswerEntry")]
pub enum AnswerEntry {
    Bare(String),
    Option {
        option: String,
        custom_text: Option<String>,
    },
    FreeText {
        custom_text: String,
        link: Option<String>,
    },
}

impl AnswerEntry {
    pub fn option(option: impl Into<String>) -> Self {
        AnswerEntry::Option {
            option: option.into(),
            custom_text: None,
        }
    }

    pub fn option_with_text(option: impl Into<String>, text: impl Into<String>) -> Self {
        AnswerEntry::Option {
            option: option.into(),
            custom_text: Some(text.into()),
        }
    }

    pub fn free_text(text: impl Into<String>) -> Self {
        AnswerEntry::FreeText {
            custom_text: text.into(),
            link: None,
        }
    }

    /// Selected option label. Legacy bare strings count as selections.
    pub fn selected_option(&self) -> Option<&str> {
        match self {
            AnswerEntry::Bare(value) => Some(value.as_str()),
            AnswerEntry::Option { option, .. } => Some(option.as_str()),
            AnswerEntry::FreeText { .. } => None,
        }
    }

    pub fn custom_text(&self) -> Option<&str> {
        match self {
            AnswerEntry::Bare(_) => None,
            AnswerEntry::Option { custom_text, .. } => custom_text.as_deref(),
            AnswerEntry::FreeText { custom_text, .. } => Some(custom_text.as_str()),
        }
    }

    pub fn link(&self) -> Option<&str> {
        match self {
            AnswerEntry::FreeText { link, .. } => link.as_deref(),
            _ => None,
        }
    }

    /// Non-empty option or non-empty custom text.
    pub fn has_content(&self) -> bool {
        let option = self
            .selected_option()
            .is_some_and(|option| !option.trim().is_empty());
        let text = self
            .custom_text()
            .is_some_and(|text| !text.trim().is_empty());
        option || text
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawAnswerEntry {
    Bare(String),
    Record {
        #[serde(default)]
        option: Option<String>,
        #[serde(rename = "customText", default, skip_serializing_if = "Option::is_none")]
        custom_text: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        link: Option<String>,
    },
}

impl From<RawAnswerEntry> for AnswerEntry {
    fn from(raw: RawAnswerEntry) -> Self {
        match raw {
            RawAnswerEntry::Bare(value) => AnswerEntry::Bare(value),
            RawAnswerEntry::Record {
                option: Some(option),
                custom_text,
                ..
            } => AnswerEntry::Option {
                option,
                custom_text,
            },
            RawAnswerEntry::Record {
                option: None,
                custom_text,
                link,
            } => AnswerEntry::FreeText {
                custom_text: custom_text.unwrap_or_default(),
                link,
            },
        }
    }
}

impl From<AnswerEntry> for RawAnswerEntry {
    fn from(entry: AnswerEntry) -> Self {
        match entry {
            AnswerEntry::Bare(value) => RawAnswerEntry::Bare(value),
            AnswerEntry::Option {
                option,
                custom_text,
            } => RawAnswerEntry::Record {
                option: Some(option),
                custom_text,
                link: None,
            },
            AnswerEntry::FreeText { custom_text, link } => RawAnswerEntry::Record {
                option: None,
                custom_text: Some(custom_text),
                link,
            },
        }
    }
}

/// Raw answers owned by the wizard, indexed by `question_id - 1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormAnswerState {
    pub job_type: String,
    #[serde(default)]
    pub answers: Vec<Vec<AnswerEntry>>,
}

impl FormAnswerState {
    /// Empty answers spanning `question_count` slots.
    pub fn for_catalog(job_type: impl Into<String>, question_count: usize) -> Self {
        Self {
            job_type: job_type.into(),
            answers: vec![Vec::new(); question_count],
        }
    }

    /// Pads the slot list so every id up to `question_count` is addressable.
    pub fn ensure_span(&mut self, question_count: usize) {
        if self.answers.len() < question_count {
            self.answers.resize_with(question_count, Vec::new);
        }
    }

    pub fn slot(&self, question_id: u32) -> &[AnswerEntry] {
        slot_index(question_id)
            .and_then(|index| self.answers.get(index))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn set_slot(&mut self, question_id: u32, entries: Vec<AnswerEntry>) {
        if let Some(index) = slot_index(question_id) {
            self.ensure_span(index + 1);
            self.answers[index] = entries;
        }
    }

    pub fn clear_slot(&mut self, question_id: u32) {
        self.set_slot(question_id, Vec::new());
    }
}

fn slot_index(question_id: u32) -> Option<usize> {
    (question_id as usize).checked_sub(1)
}

/// Editable form of one answer as used by input widgets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicEntry {
    Text { text: String, link: Option<String> },
    /// Free text owned by one selected option of an option-with-text question.
    OptionText { option: String, text: String },
    /// Field values keyed by lower-cased field name.
    Structured(BTreeMap<String, String>),
}

impl DynamicEntry {
    pub fn text(text: impl Into<String>) -> Self {
        DynamicEntry::Text {
            text: text.into(),
            link: None,
        }
    }

    pub fn option_text(option: impl Into<String>, text: impl Into<String>) -> Self {
        DynamicEntry::OptionText {
            option: option.into(),
            text: text.into(),
        }
    }

    /// Option this entry's text belongs to, if any.
    pub fn owner(&self) -> Option<&str> {
        match self {
            DynamicEntry::OptionText { option, .. } => Some(option.as_str()),
            _ => None,
        }
    }

    pub fn blank_record(fields: &[crate::catalog::StructuredField]) -> Self {
        DynamicEntry::Structured(
            fields
                .iter()
                .map(|field| (field.key(), String::new()))
                .collect(),
        )
    }

    /// Text entries need non-blank text; records need every field non-blank.
    pub fn is_filled(&self) -> bool {
        match self {
            DynamicEntry::Text { text, .. } | DynamicEntry::OptionText { text, .. } => {
                !text.trim().is_empty()
            }
            DynamicEntry::Structured(fields) => {
                !fields.is_empty() && fields.values().all(|value| !value.trim().is_empty())
            }
        }
    }

    /// Flat text of the entry; records are rendered as a JSON object.
    pub fn as_text(&self) -> String {
        match self {
            DynamicEntry::Text { text, .. } | DynamicEntry::OptionText { text, .. } => text.clone(),
            DynamicEntry::Structured(fields) => normalize::record_json(fields),
        }
    }
}

/// Editable answers keyed by question id.
pub type DynamicAnswers = BTreeMap<u32, Vec<DynamicEntry>>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn raw_shapes_resolve_into_variants() {
        let raw = json!([
            "Agency",
            {"option": "Other", "customText": "Boutique studio"},
            {"option": null, "customText": "Acme Ltd", "link": "https://acme.test"},
            {"option": "Yes"}
        ]);
        let entries: Vec<AnswerEntry> = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(entries[0], AnswerEntry::Bare("Agency".into()));
        assert_eq!(entries[1], AnswerEntry::option_with_text("Other", "Boutique studio"));
        assert_eq!(entries[2].link(), Some("https://acme.test"));
        assert_eq!(entries[3], AnswerEntry::option("Yes"));
        assert_eq!(serde_json::to_value(&entries).unwrap(), raw);
    }

    #[test]
    fn slots_span_every_question_id() {
        let mut form = FormAnswerState::for_catalog("agency", 2);
        assert!(form.slot(2).is_empty());
        assert!(form.slot(7).is_empty());
        form.set_slot(5, vec![AnswerEntry::free_text("late")]);
        assert_eq!(form.answers.len(), 5);
        assert_eq!(form.slot(5).len(), 1);
        form.clear_slot(5);
        assert!(form.slot(5).is_empty());
        form.set_slot(0, vec![AnswerEntry::free_text("ignored")]);
        assert_eq!(form.answers.len(), 5);
    }

    #[test]
    fn content_checks_trim_whitespace() {
        assert!(!AnswerEntry::free_text("   ").has_content());
        assert!(AnswerEntry::option("Yes").has_content());
        assert!(!AnswerEntry::Bare(String::new()).has_content());
        assert!(!DynamicEntry::text(" \t").is_filled());
        let record = DynamicEntry::Structured(
            [("name".to_string(), "Ada".to_string()), ("email".to_string(), " ".to_string())]
                .into_iter()
                .collect(),
        );
        assert!(!record.is_filled());
        assert!(!DynamicEntry::Structured(BTreeMap::new()).is_filled());
    }
}
