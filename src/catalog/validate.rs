use std::collections::BTreeSet;

use super::Catalog;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogIssueReason {
    DuplicateQuestionId,
    MissingQuestionId,
    UnknownCategory,
    ConflictingSelectModes,
    EmptyStructuredFields,
    TextInputOnOpenEnded,
    ZeroCap,
}

#[derive(Debug, Clone)]
pub struct CatalogIssue {
    pub question_id: Option<u32>,
    pub category_id: Option<u32>,
    pub reason: CatalogIssueReason,
    pub message: String,
}

impl CatalogIssue {
    fn for_question(question_id: u32, reason: CatalogIssueReason, message: impl Into<String>) -> Self {
        Self {
            question_id: Some(question_id),
            category_id: None,
            reason,
            message: message.into(),
        }
    }
}

/// Checks the structural invariants the wizard relies on. Never fails; every
/// problem found is reported as an issue.
pub fn validate_catalog(catalog: &Catalog) -> Vec<CatalogIssue> {
    let mut issues = Vec::new();
    let mut seen = BTreeSet::new();

    for question in &catalog.questions {
        if question.id == 0 || !seen.insert(question.id) {
            issues.push(CatalogIssue::for_question(
                question.id,
                CatalogIssueReason::DuplicateQuestionId,
                format!("Question id {} is zero or used more than once", question.id),
            ));
        }
        if catalog.category(question.category).is_none() {
            issues.push(CatalogIssue {
                question_id: Some(question.id),
                category_id: Some(question.category),
                reason: CatalogIssueReason::UnknownCategory,
                message: format!(
                    "Question {} references unknown category {}",
                    question.id, question.category
                ),
            });
        }
        if question.is_multi_select && question.is_country_select {
            issues.push(CatalogIssue::for_question(
                question.id,
                CatalogIssueReason::ConflictingSelectModes,
                format!(
                    "Question {} is both multi-select and country-select",
                    question.id
                ),
            ));
        }
        if question
            .structured_fields()
            .is_some_and(|fields| fields.is_empty())
        {
            issues.push(CatalogIssue::for_question(
                question.id,
                CatalogIssueReason::EmptyStructuredFields,
                format!("Question {} declares structured answers without fields", question.id),
            ));
        }
        if question.is_open_ended && question.text_input_option.is_some() {
            issues.push(CatalogIssue::for_question(
                question.id,
                CatalogIssueReason::TextInputOnOpenEnded,
                format!(
                    "Question {} is open-ended but also declares a text input option",
                    question.id
                ),
            ));
        }
        for (label, cap) in [
            ("max_answers", question.max_answers),
            ("max_words", question.max_words),
            ("text_input_max_answers", question.text_input_max_answers),
        ] {
            if cap == Some(0) {
                issues.push(CatalogIssue::for_question(
                    question.id,
                    CatalogIssueReason::ZeroCap,
                    format!("Question {} sets {label} to zero", question.id),
                ));
            }
        }
    }

    let highest = seen.iter().next_back().copied().unwrap_or(0);
    for id in 1..=highest {
        if !seen.contains(&id) {
            issues.push(CatalogIssue::for_question(
                id,
                CatalogIssueReason::MissingQuestionId,
                format!("Question ids are not contiguous: {id} is missing"),
            ));
        }
    }

    issues
}
