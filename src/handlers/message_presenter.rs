use std::cell::Cell;
use std::rc::Rc;

use crate::utils::timers::Scheduler;

pub const INVALID_EMAIL_MESSAGE: &str = "Please enter a valid email address.";
pub const SUCCESS_MESSAGE: &str = "✓ You're on the list! Check your email for confirmation.";
pub const FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Error,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Success => "success",
            MessageKind::Error => "error",
        }
    }

    fn background(&self) -> &'static str {
        match self {
            MessageKind::Success => "#00CC66",
            MessageKind::Error => "#FF6B6B",
        }
    }
}

/// Identifies one rendered feedback node, so a delayed removal never takes
/// down a newer message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(pub u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackMessage {
    pub id: MessageId,
    pub text: String,
    pub kind: MessageKind,
}

impl FeedbackMessage {
    pub fn class_name(&self) -> String {
        format!("form-message {}", self.kind.as_str())
    }

    pub fn inline_style(&self) -> String {
        format!(
            "margin-top: 1rem; padding: 0.75rem 1rem; border-radius: 6px; font-size: 0.9rem; \
             text-align: center; background: {}; color: white;",
            self.kind.background()
        )
    }
}

/// The pieces of one signup form the controller and presenter touch.
#[cfg_attr(test, mockall::automock)]
pub trait FormView {
    fn form_id(&self) -> String;
    fn email_value(&self) -> String;
    fn clear_email(&self);
    fn submit_label(&self) -> String;
    fn set_submit_state(&self, enabled: bool, label: &str);
    /// Removes any feedback node in the form, then appends `message`.
    fn replace_message(&self, message: &FeedbackMessage);
    /// Removes the node for `id` if it is still attached.
    fn remove_message(&self, id: MessageId);
}

pub struct MessagePresenter {
    scheduler: Rc<dyn Scheduler>,
    ttl_ms: u32,
    next_id: Cell<u64>,
}

impl MessagePresenter {
    pub fn new(scheduler: Rc<dyn Scheduler>, ttl_ms: u32) -> Self {
        Self {
            scheduler,
            ttl_ms,
            next_id: Cell::new(0),
        }
    }

    /// Shows `text` in the form. Error messages expire after the TTL; success
    /// messages stay until the page navigates away.
    pub fn show(&self, view: &Rc<dyn FormView>, text: &str, kind: MessageKind) -> MessageId {
        let id = MessageId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        view.replace_message(&FeedbackMessage {
            id,
            text: text.to_string(),
            kind,
        });

        if kind != MessageKind::Success {
            let view = view.clone();
            self.scheduler
                .schedule(self.ttl_ms, Box::new(move || view.remove_message(id)));
        }
        id
    }
}
