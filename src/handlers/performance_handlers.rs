use tracing::info;

use crate::models::event::TrackedEvent;
use crate::tracking::tracker::Tracker;

/// The two navigation timing marks the report needs, in milliseconds since
/// the time origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavigationTiming {
    pub fetch_start: f64,
    pub load_event_end: f64,
}

impl NavigationTiming {
    pub fn load_time_ms(&self) -> f64 {
        self.load_event_end - self.fetch_start
    }
}

/// Logs the page load time and tracks it when it exceeds `slow_threshold_ms`.
/// Returns the load time, or `None` when the browser had no navigation entry.
pub fn report_page_load(
    timing: Option<NavigationTiming>,
    slow_threshold_ms: f64,
    tracker: &dyn Tracker,
) -> Option<f64> {
    let timing = timing?;
    let load_time = timing.load_time_ms();
    let rounded = load_time.round() as i64;
    info!("Page load time: {} ms", rounded);

    if load_time > slow_threshold_ms {
        tracker.track(&TrackedEvent::slow_load(rounded));
    }
    Some(load_time)
}
