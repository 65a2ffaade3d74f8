use std::rc::Rc;

use serde_json::{json, Value};
use tracing::info;

use crate::models::event::TrackedEvent;

/// Anything that records analytics events. Tracking is best-effort and never
/// fails.
#[cfg_attr(test, mockall::automock)]
pub trait Tracker {
    fn track(&self, event: &TrackedEvent);
}

/// Commands understood by the Matomo `_paq` queue.
#[derive(Debug, Clone, PartialEq)]
pub enum MatomoCommand {
    TrackPageView,
    EnableLinkTracking,
    SetTrackerUrl(String),
    SetSiteId(u32),
    TrackEvent(TrackedEvent),
}

impl MatomoCommand {
    /// The array pushed onto the queue, e.g. `["trackEvent", "FAQ", ...]`.
    pub fn to_args(&self) -> Value {
        match self {
            MatomoCommand::TrackPageView => json!(["trackPageView"]),
            MatomoCommand::EnableLinkTracking => json!(["enableLinkTracking"]),
            MatomoCommand::SetTrackerUrl(url) => json!(["setTrackerUrl", url]),
            MatomoCommand::SetSiteId(id) => json!(["setSiteId", id]),
            MatomoCommand::TrackEvent(event) => {
                json!(["trackEvent", event.category, event.action, event.name])
            }
        }
    }
}

/// Append-only command queue consumed by the collector script.
#[cfg_attr(test, mockall::automock)]
pub trait AnalyticsQueue {
    fn push(&self, command: &MatomoCommand);
}

/// Commands queued before the collector script loads.
pub fn bootstrap_commands(collector_url: &str, site_id: u32) -> Vec<MatomoCommand> {
    vec![
        MatomoCommand::TrackPageView,
        MatomoCommand::EnableLinkTracking,
        MatomoCommand::SetTrackerUrl(format!("{}matomo.php", collector_url)),
        MatomoCommand::SetSiteId(site_id),
    ]
}

pub fn collector_script_url(collector_url: &str) -> String {
    format!("{}matomo.js", collector_url)
}

/// Logs every event and forwards it to the analytics queue when one is
/// installed.
#[derive(Clone, Default)]
pub struct EventTracker {
    queue: Option<Rc<dyn AnalyticsQueue>>,
}

impl EventTracker {
    pub fn new(queue: Option<Rc<dyn AnalyticsQueue>>) -> Self {
        Self { queue }
    }

    pub fn has_queue(&self) -> bool {
        self.queue.is_some()
    }
}

impl Tracker for EventTracker {
    fn track(&self, event: &TrackedEvent) {
        info!(
            category = %event.category,
            action = %event.action,
            name = %event.name,
            "Event tracked"
        );
        if let Some(queue) = &self.queue {
            queue.push(&MatomoCommand::TrackEvent(event.clone()));
        }
    }
}
