//! Question and category definitions supplied by the host application.
//!
//! Definitions are immutable once loaded. Question ids are 1-based and dense so
//! that `answers[id - 1]` always addresses the question's answer slot.

mod loader;
mod validate;

pub use loader::load_catalog;
pub use validate::{validate_catalog, CatalogIssue, CatalogIssueReason};

use serde::{Deserialize, Serialize};

/// Option label that, when used as `text_input_option.option`, requires free
/// text alongside whichever option is selected.
pub const ANY_OPTION: &str = "Any";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredField {
    pub name: String,
    #[serde(rename = "type", default = "default_field_type")]
    pub field_type: String,
}

impl StructuredField {
    /// Key used for this field inside a structured answer record.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

fn default_field_type() -> String {
    "text".to_string()
}

/// Fixed field set each open-ended answer must fill in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StructuredAnswers {
    #[serde(default)]
    pub fields: Vec<StructuredField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextInputOption {
    pub option: String,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl TextInputOption {
    /// Whether selecting `option` requires accompanying free text.
    pub fn tracks(&self, option: &str) -> bool {
        self.option == ANY_OPTION || self.option == option
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDefinition {
    pub id: u32,
    pub category: u32,
    #[serde(default)]
    pub order: i64,
    pub job_type: String,
    /// Display text shown to the applicant.
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub is_open_ended: bool,
    #[serde(default)]
    pub is_multi_select: bool,
    #[serde(default)]
    pub is_country_select: bool,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub max_answers: Option<u32>,
    #[serde(default)]
    pub max_words: Option<u32>,
    #[serde(default)]
    pub structured_answers: Option<StructuredAnswers>,
    #[serde(default)]
    pub text_input_option: Option<TextInputOption>,
    #[serde(default)]
    pub text_input_max_answers: Option<u32>,
    #[serde(default)]
    pub skippable: bool,
    #[serde(default)]
    pub has_links: bool,
}

impl QuestionDefinition {
    /// Zero-based answer slot index for this question.
    pub fn slot_index(&self) -> usize {
        (self.id as usize).saturating_sub(1)
    }

    /// Country select questions behave like multi-select over the country list.
    pub fn allows_many(&self) -> bool {
        self.is_multi_select || self.is_country_select
    }

    pub fn structured_fields(&self) -> Option<&[StructuredField]> {
        self.structured_answers
            .as_ref()
            .map(|structured| structured.fields.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub id: u32,
    pub name: String,
    pub job_type: String,
    /// Declarations in a mandatory category can never be skipped.
    #[serde(default)]
    pub is_mandatory: bool,
}

/// Full set of definitions for one intake form.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub questions: Vec<QuestionDefinition>,
    #[serde(default)]
    pub categories: Vec<CategoryDefinition>,
}

impl Catalog {
    pub fn new(questions: Vec<QuestionDefinition>, categories: Vec<CategoryDefinition>) -> Self {
        Self {
            questions,
            categories,
        }
    }

    pub fn from_json_str(data: &str) -> anyhow::Result<Self> {
        let catalog = serde_json::from_str(data)?;
        Ok(catalog)
    }

    pub fn question(&self, id: u32) -> Option<&QuestionDefinition> {
        self.questions.iter().find(|question| question.id == id)
    }

    pub fn category(&self, id: u32) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Size of the answer slot space, i.e. the highest question id.
    pub fn question_count(&self) -> usize {
        self.questions
            .iter()
            .map(|question| question.id as usize)
            .max()
            .unwrap_or(0)
    }
}
