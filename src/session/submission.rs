//! Progress reporting and the final answer set handed to the host.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::answers::AnswerEntry;
use crate::navigation::{WizardContext, WizardState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub answered: usize,
    pub total: usize,
    pub percent: u8,
}

/// Counts questions in the plan that hold a complete answer or were skipped.
pub fn progress(ctx: &WizardContext<'_>, state: &WizardState) -> Progress {
    let total = ctx.plan.question_count();
    let answered = ctx
        .plan
        .positions()
        .filter(|(_, id)| {
            if state.skipped.contains(id) {
                return true;
            }
            let Some(question) = ctx.catalog.question(*id) else {
                return false;
            };
            !state.form.slot(*id).is_empty() && ctx.evaluate(state, question).is_complete()
        })
        .count();
    let percent = if total == 0 {
        100
    } else {
        ((answered * 100) / total) as u8
    };
    Progress {
        answered,
        total,
        percent,
    }
}

/// Normalized answers for the external submission endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionPayload {
    pub session_id: Uuid,
    pub job_type: String,
    pub answers: Vec<Vec<AnswerEntry>>,
    pub skipped: Vec<u32>,
    pub answered: usize,
    pub total: usize,
    /// SHA-256 of the serialized answers, for duplicate detection by the host.
    pub digest: String,
    pub prepared_at: DateTime<Utc>,
}
