//! Transient user-facing notices (toasts) as an explicit capability.

use std::cell::RefCell;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub question_id: Option<u32>,
}

impl Notice {
    pub fn new(level: NoticeLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            question_id: None,
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeLevel::Error, message)
    }

    pub fn for_question(mut self, question_id: u32) -> Self {
        self.question_id = Some(question_id);
        self
    }
}

/// Receives notices from the widget and the navigation driver.
pub trait NotificationSink {
    fn notify(&self, notice: &Notice);
}

/// Forwards notices to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, notice: &Notice) {
        let question_id = notice.question_id;
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => {
                tracing::info!(?question_id, "{}", notice.message)
            }
            NoticeLevel::Warning => tracing::warn!(?question_id, "{}", notice.message),
            NoticeLevel::Error => tracing::error!(?question_id, "{}", notice.message),
        }
    }
}

/// Keeps every notice in memory so a host can drain and render them.
#[derive(Debug, Default)]
pub struct RecordingSink {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.notices.borrow_mut().drain(..).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, notice: &Notice) {
        self.notices.borrow_mut().push(notice.clone());
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for &S {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}

impl<S: NotificationSink + ?Sized> NotificationSink for std::rc::Rc<S> {
    fn notify(&self, notice: &Notice) {
        (**self).notify(notice)
    }
}
