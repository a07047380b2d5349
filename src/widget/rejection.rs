use std::fmt;

/// Why the widget refused an edit. The prior value is always kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditRejection {
    WordLimit { max_words: usize, words: usize },
    AnswerLimit { max_answers: usize },
    UnknownEntry { index: usize },
    UnknownField { field: String },
    UnknownOption { option: String },
    UnknownCountry { name: String },
    NotEditable,
}

impl fmt::Display for EditRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditRejection::WordLimit { max_words, words } => write!(
                f,
                "Answers are limited to {max_words} words (this one has {words})."
            ),
            EditRejection::AnswerLimit { max_answers } => {
                write!(f, "You can add at most {max_answers} answers.")
            }
            EditRejection::UnknownEntry { index } => write!(f, "No answer block at position {index}."),
            EditRejection::UnknownField { field } => write!(f, "Unknown field \"{field}\"."),
            EditRejection::UnknownOption { option } => {
                write!(f, "\"{option}\" is not one of the available options.")
            }
            EditRejection::UnknownCountry { name } => {
                write!(f, "\"{name}\" is not in the country list.")
            }
            EditRejection::NotEditable => write!(f, "This answer cannot be edited that way."),
        }
    }
}
