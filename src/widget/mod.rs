//! Per-question input widget.
//!
//! The widget owns the editing sub-state of a single question (repeatable
//! answer blocks, free text tied to an option) and turns every user edit into
//! an [`AnswerEdit`] for the wizard to apply. It never writes the form state
//! itself.

mod rejection;

pub use rejection::EditRejection;

use crate::answers::{
    answer_shape, required_answer_count, to_dynamic, to_raw, AnswerEntry, AnswerShape, CompletionRules,
    DynamicEntry,
};
use crate::catalog::{QuestionDefinition, TextInputOption};
use crate::navigation::AnswerEdit;
use crate::notify::{Notice, NotificationSink};
use crate::reference::{CountryDirectory, CountryOption};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetOutcome {
    Changed(AnswerEdit),
    Unchanged,
    Rejected(EditRejection),
}

impl WidgetOutcome {
    pub fn edit(self) -> Option<AnswerEdit> {
        match self {
            WidgetOutcome::Changed(edit) => Some(edit),
            _ => None,
        }
    }
}

pub struct QuestionWidget<'a> {
    question: &'a QuestionDefinition,
    slot: Vec<AnswerEntry>,
    entries: Vec<DynamicEntry>,
    sink: &'a dyn NotificationSink,
    countries: Option<&'a CountryDirectory>,
    rules: CompletionRules,
}

impl<'a> QuestionWidget<'a> {
    pub fn new(
        question: &'a QuestionDefinition,
        slot: &[AnswerEntry],
        dynamic: &[DynamicEntry],
        sink: &'a dyn NotificationSink,
    ) -> Self {
        let mut widget = Self {
            question,
            slot: slot.to_vec(),
            entries: dynamic.to_vec(),
            sink,
            countries: None,
            rules: CompletionRules::default(),
        };
        widget.pad_entries();
        widget
    }

    pub fn with_countries(mut self, countries: &'a CountryDirectory) -> Self {
        self.countries = Some(countries);
        self
    }

    pub fn with_rules(mut self, rules: CompletionRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn question(&self) -> &QuestionDefinition {
        self.question
    }

    /// Current raw slot as last produced by this widget.
    pub fn slot(&self) -> &[AnswerEntry] {
        &self.slot
    }

    /// Editable entries; at least one while the question takes free text.
    pub fn entries(&self) -> &[DynamicEntry] {
        &self.entries
    }

    pub fn is_selected(&self, option: &str) -> bool {
        self.slot
            .iter()
            .any(|entry| entry.selected_option() == Some(option))
    }

    /// Selectable labels: the question's options, or the country list.
    pub fn options(&self) -> Vec<String> {
        if self.question.is_country_select {
            return self
                .country_options()
                .into_iter()
                .map(|option| option.name)
                .collect();
        }
        self.question.options.clone()
    }

    pub fn country_options(&self) -> Vec<CountryOption> {
        self.countries
            .map(CountryDirectory::options)
            .unwrap_or_default()
    }

    /// Placeholder shown next to the free-text inputs of a tracked option.
    pub fn text_placeholder(&self) -> Option<&str> {
        self.question
            .text_input_option
            .as_ref()
            .and_then(|input| input.placeholder.as_deref())
    }

    /// Single-select replaces the slot; multi-select adds or removes `option`.
    pub fn toggle_option(&mut self, option: &str) -> WidgetOutcome {
        if self.question.is_open_ended {
            return self.reject(EditRejection::NotEditable);
        }
        if self.question.is_country_select {
            return self.toggle_country(option);
        }
        if !self.question.options.iter().any(|known| known == option) {
            return self.reject(EditRejection::UnknownOption {
                option: option.to_string(),
            });
        }
        self.apply_toggle(option)
    }

    pub fn toggle_country(&mut self, name: &str) -> WidgetOutcome {
        if !self.question.is_country_select {
            return self.reject(EditRejection::NotEditable);
        }
        let known = self.is_selected(name)
            || self
                .countries
                .is_some_and(|directory| directory.contains(name));
        if !known {
            return self.reject(EditRejection::UnknownCountry {
                name: name.to_string(),
            });
        }
        self.apply_toggle(name)
    }

    pub fn edit_text(&mut self, index: usize, text: &str) -> WidgetOutcome {
        match answer_shape(self.question) {
            AnswerShape::PlainOpen | AnswerShape::RepeatedOpen { .. } => {}
            AnswerShape::OptionWithText { .. } if !self.entries.is_empty() => {}
            _ => return self.reject(EditRejection::NotEditable),
        }
        if let Some(rejection) = self.word_limit(text) {
            return self.reject(rejection);
        }
        match self.entries.get_mut(index) {
            Some(DynamicEntry::Text { text: current, .. })
            | Some(DynamicEntry::OptionText { text: current, .. }) => {
                if current.as_str() == text {
                    return WidgetOutcome::Unchanged;
                }
                *current = text.to_string();
            }
            _ => return self.reject(EditRejection::UnknownEntry { index }),
        }
        self.commit(None)
    }

    /// Free text for the selected tracked option.
    pub fn set_option_text(&mut self, index: usize, text: &str) -> WidgetOutcome {
        if self.question.text_input_option.is_none() {
            return self.reject(EditRejection::NotEditable);
        }
        self.edit_text(index, text)
    }

    pub fn edit_link(&mut self, index: usize, link: &str) -> WidgetOutcome {
        if !self.question.has_links || !self.question.is_open_ended {
            return self.reject(EditRejection::NotEditable);
        }
        let link = link.trim();
        let updated = if link.is_empty() {
            None
        } else {
            Some(link.to_string())
        };
        match self.entries.get_mut(index) {
            Some(DynamicEntry::Text { link: current, .. }) => {
                if *current == updated {
                    return WidgetOutcome::Unchanged;
                }
                *current = updated;
            }
            _ => return self.reject(EditRejection::UnknownEntry { index }),
        }
        self.commit(None)
    }

    pub fn edit_field(&mut self, index: usize, field: &str, value: &str) -> WidgetOutcome {
        if !matches!(answer_shape(self.question), AnswerShape::Structured { .. }) {
            return self.reject(EditRejection::NotEditable);
        }
        if let Some(rejection) = self.word_limit(value) {
            return self.reject(rejection);
        }
        let key = field.to_lowercase();
        match self.entries.get_mut(index) {
            Some(DynamicEntry::Structured(fields)) => match fields.get_mut(&key) {
                Some(current) => {
                    if current.as_str() == value {
                        return WidgetOutcome::Unchanged;
                    }
                    *current = value.to_string();
                }
                None => {
                    return self.reject(EditRejection::UnknownField {
                        field: field.to_string(),
                    })
                }
            },
            _ => return self.reject(EditRejection::UnknownEntry { index }),
        }
        self.commit(None)
    }

    /// Appends an empty answer block unless the cap is reached. Option text
    /// blocks go to the first selected tracked option.
    pub fn add_entry(&mut self) -> WidgetOutcome {
        if let AnswerShape::OptionWithText { input } = answer_shape(self.question) {
            return match self.tracked_options(input).into_iter().next() {
                Some(option) => self.add_option_entry(&option),
                None => self.reject(EditRejection::NotEditable),
            };
        }
        let Some(cap) = self.entry_cap() else {
            return self.reject(EditRejection::NotEditable);
        };
        if self.entries.len() >= cap {
            return self.reject(EditRejection::AnswerLimit { max_answers: cap });
        }
        let blank = self.blank_entry();
        self.entries.push(blank);
        self.commit(None)
    }

    /// Another free-text block for `option`, capped per option.
    pub fn add_option_entry(&mut self, option: &str) -> WidgetOutcome {
        let AnswerShape::OptionWithText { input } = answer_shape(self.question) else {
            return self.reject(EditRejection::NotEditable);
        };
        if !self.tracked_options(input).iter().any(|tracked| tracked == option) {
            return self.reject(EditRejection::UnknownOption {
                option: option.to_string(),
            });
        }
        let cap = self.option_text_cap();
        if self.owned_by(option) >= cap {
            return self.reject(EditRejection::AnswerLimit { max_answers: cap });
        }
        let at = self
            .entries
            .iter()
            .rposition(|entry| entry.owner() == Some(option))
            .map_or(self.entries.len(), |index| index + 1);
        self.entries.insert(at, DynamicEntry::option_text(option, ""));
        self.commit(None)
    }

    /// Removes an answer block; the last remaining block (per option, for
    /// option text) is always kept.
    pub fn remove_entry(&mut self, index: usize) -> WidgetOutcome {
        if self.entries.len() <= 1 {
            return WidgetOutcome::Unchanged;
        }
        let Some(entry) = self.entries.get(index) else {
            return self.reject(EditRejection::UnknownEntry { index });
        };
        if entry.owner().is_some_and(|option| self.owned_by(option) <= 1) {
            return WidgetOutcome::Unchanged;
        }
        self.entries.remove(index);
        self.commit(None)
    }

    fn apply_toggle(&mut self, option: &str) -> WidgetOutcome {
        let many = self.question.allows_many();
        let selected = self.is_selected(option);
        if many {
            if selected {
                self.slot
                    .retain(|entry| entry.selected_option() != Some(option));
            } else {
                self.slot.push(AnswerEntry::option(option));
            }
        } else {
            if selected {
                return WidgetOutcome::Unchanged;
            }
            self.slot = vec![AnswerEntry::option(option)];
        }
        // Free-text blocks only live while a tracked option is selected.
        self.entries = to_dynamic(self.question, &self.slot);
        self.pad_entries();
        self.edit(Some(option.to_string()))
    }

    fn commit(&mut self, option: Option<String>) -> WidgetOutcome {
        self.slot = to_raw(self.question, &self.slot, &self.entries);
        self.edit(option)
    }

    fn edit(&self, option: Option<String>) -> WidgetOutcome {
        WidgetOutcome::Changed(AnswerEdit {
            question_id: self.question.id,
            option,
            answers: self.slot.clone(),
            is_multi_select: self.question.allows_many(),
        })
    }

    fn reject(&self, rejection: EditRejection) -> WidgetOutcome {
        self.sink
            .notify(&Notice::warning(rejection.to_string()).for_question(self.question.id));
        WidgetOutcome::Rejected(rejection)
    }

    fn word_limit(&self, text: &str) -> Option<EditRejection> {
        let max_words = self.question.max_words.filter(|max| *max > 0)? as usize;
        let words = text.split_whitespace().count();
        (words > max_words).then_some(EditRejection::WordLimit { max_words, words })
    }

    fn entry_cap(&self) -> Option<usize> {
        match answer_shape(self.question) {
            AnswerShape::PlainOpen => Some(1),
            AnswerShape::RepeatedOpen { max_answers, .. } => Some(max_answers.max(1) as usize),
            AnswerShape::Structured { .. } => {
                Some(required_answer_count(self.question, &self.rules))
            }
            AnswerShape::OptionWithText { .. } | AnswerShape::Closed => None,
        }
    }

    fn blank_entry(&self) -> DynamicEntry {
        match self.question.structured_fields() {
            Some(fields) if self.question.is_open_ended => DynamicEntry::blank_record(fields),
            _ => DynamicEntry::text(""),
        }
    }

    fn option_text_cap(&self) -> usize {
        self.question
            .text_input_max_answers
            .filter(|max| *max > 0)
            .unwrap_or(1) as usize
    }

    /// Selected options that need text, in slot order.
    fn tracked_options(&self, input: &TextInputOption) -> Vec<String> {
        let mut options: Vec<String> = Vec::new();
        for option in self.slot.iter().filter_map(AnswerEntry::selected_option) {
            if input.tracks(option) && !options.iter().any(|known| known == option) {
                options.push(option.to_string());
            }
        }
        options
    }

    fn owned_by(&self, option: &str) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.owner() == Some(option))
            .count()
    }

    fn pad_entries(&mut self) {
        if let AnswerShape::OptionWithText { input } = answer_shape(self.question) {
            self.arrange_option_entries(input);
            return;
        }
        if self.entries.is_empty() && self.entry_cap().is_some() {
            let blank = self.blank_entry();
            self.entries.push(blank);
        }
    }

    /// One group of text blocks per tracked selection, in slot order; a blank
    /// block stands in for a selection without text.
    fn arrange_option_entries(&mut self, input: &TextInputOption) {
        let tracked = self.tracked_options(input);
        let mut entries = std::mem::take(&mut self.entries);
        if let Some(anchor) = tracked.first() {
            for entry in entries.iter_mut() {
                if let DynamicEntry::Text { text, .. } = entry {
                    let text = std::mem::take(text);
                    *entry = DynamicEntry::option_text(anchor.clone(), text);
                }
            }
        }
        for option in &tracked {
            let before = self.entries.len();
            self.entries.extend(
                entries
                    .iter()
                    .filter(|entry| entry.owner() == Some(option.as_str()))
                    .cloned(),
            );
            if self.entries.len() == before {
                self.entries.push(DynamicEntry::option_text(option.clone(), ""));
            }
        }
    }
}
