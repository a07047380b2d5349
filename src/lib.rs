pub mod answers;
pub mod catalog;
pub mod config;
pub mod navigation;
pub mod notify;
pub mod reference;
pub mod session;
pub mod widget;

// Re-export commonly used types for convenience.
pub use answers::{AnswerEntry, DynamicEntry, FormAnswerState};
pub use catalog::{Catalog, CategoryDefinition, QuestionDefinition};
pub use config::WizardConfig;
pub use navigation::{AnswerEdit, NavigationPosition, WizardEvent, WizardPlan};
pub use notify::{Notice, NotificationSink, RecordingSink, TracingSink};
pub use session::{WizardHost, WizardSession};
pub use widget::{QuestionWidget, WidgetOutcome};
