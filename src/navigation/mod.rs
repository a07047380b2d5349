//! Wizard navigation: the ordered plan of categories/questions for one
//! applicant type, and the pure reducer that moves through it.

pub mod plan;
pub mod reducer;

pub use plan::{NavigationPosition, PlannedCategory, WizardPlan};
pub use reducer::{
    first_incomplete, reduce, AnswerEdit, Effect, IncompleteQuestion, Transition, WizardContext,
    WizardEvent, WizardState,
};
