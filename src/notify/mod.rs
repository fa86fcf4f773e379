//! Run lifecycle notifications
//!
//! Delivery is fire-and-forget: a notifier logs its own failures and never
//! reports them back to the collector.

mod slack;

use std::fmt;

use tracing::info;

pub(crate) use slack::SlackNotifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Event {
    Started(String),
    Progress(String),
    Error(String),
    Completed(String),
}

impl Event {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Event::Started(_) => "started",
            Event::Progress(_) => "progress",
            Event::Error(_) => "error",
            Event::Completed(_) => "completed",
        }
    }

    pub(crate) fn message(&self) -> &str {
        match self {
            Event::Started(m) | Event::Progress(m) | Event::Error(m) | Event::Completed(m) => m,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.message())
    }
}

pub(crate) trait Notifier {
    fn notify(&self, event: &Event);
}

/// Used when no webhook is configured; events only reach the log
#[derive(Debug, Default)]
pub(crate) struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &Event) {
        info!(event = event.kind(), "notify: {}", event.message());
    }
}
