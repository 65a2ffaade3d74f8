use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::debug;

use crate::models::event::TrackedEvent;
use crate::tracking::tracker::Tracker;

const FAQ_LABEL_MAX_CHARS: usize = 50;
const UNKNOWN_FORM: &str = "unknown";

/// Scroll geometry sampled on a scroll notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_y: f64,
    pub scroll_height: f64,
    pub viewport_height: f64,
}

impl ScrollMetrics {
    /// Percentage of the scrollable range covered, or `None` when the page
    /// does not scroll.
    pub fn percent(&self) -> Option<f64> {
        let range = self.scroll_height - self.viewport_height;
        if range <= 0.0 {
            return None;
        }
        Some(self.scroll_y / range * 100.0)
    }
}

/// Fires one scroll-depth event per threshold per page load.
pub struct ScrollDepthObserver {
    thresholds: Vec<u8>,
    fired: RefCell<BTreeSet<u8>>,
    tracker: Rc<dyn Tracker>,
}

impl ScrollDepthObserver {
    pub fn new(thresholds: Vec<u8>, tracker: Rc<dyn Tracker>) -> Self {
        Self {
            thresholds,
            fired: RefCell::new(BTreeSet::new()),
            tracker,
        }
    }

    /// Returns the thresholds that fired on this notification.
    pub fn on_scroll(&self, metrics: ScrollMetrics, path: &str) -> Vec<u8> {
        let Some(percent) = metrics.percent() else {
            return Vec::new();
        };
        let mut newly_fired = Vec::new();
        for &threshold in &self.thresholds {
            if percent >= f64::from(threshold) && self.fired.borrow_mut().insert(threshold) {
                self.tracker.track(&TrackedEvent::scroll_depth(threshold, path));
                newly_fired.push(threshold);
            }
        }
        newly_fired
    }

    pub fn fired(&self) -> Vec<u8> {
        self.fired.borrow().iter().copied().collect()
    }
}

/// CTA click; `form_id` is the id of the form owning the button, if any.
pub fn track_cta_click(tracker: &dyn Tracker, form_id: Option<&str>) {
    let form_id = form_id.filter(|id| !id.is_empty()).unwrap_or(UNKNOWN_FORM);
    tracker.track(&TrackedEvent::cta_click(form_id));
}

/// FAQ item toggled. Only openings are tracked. `index` is zero-based.
pub fn track_faq_toggle(tracker: &dyn Tracker, index: usize, open: bool, question: &str) -> bool {
    if !open {
        debug!("FAQ item {} closed", index);
        return false;
    }
    let excerpt: String = question.chars().take(FAQ_LABEL_MAX_CHARS).collect();
    tracker.track(&TrackedEvent::faq_opened(format!("Q{}: {}", index + 1, excerpt)));
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tracking::tracker::MockTracker;
    use mockall::Sequence;

    fn at(scroll_y: f64) -> ScrollMetrics {
        ScrollMetrics {
            scroll_y,
            scroll_height: 3000.0,
            viewport_height: 1000.0,
        }
    }

    #[test]
    fn test_percent_of_scrollable_range() {
        assert_eq!(at(1000.0).percent(), Some(50.0));
        assert_eq!(at(0.0).percent(), Some(0.0));
        let flat = ScrollMetrics {
            scroll_y: 0.0,
            scroll_height: 800.0,
            viewport_height: 800.0,
        };
        assert_eq!(flat.percent(), None);
    }

    #[test]
    fn test_threshold_fires_once_despite_oscillation() {
        let mut tracker = MockTracker::new();
        let mut seq = Sequence::new();
        for action in ["25%", "50%"] {
            tracker
                .expect_track()
                .withf(move |e| e.category == "Scroll Depth" && e.action == action && e.name == "/")
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }
        let observer = ScrollDepthObserver::new(vec![25, 50, 75, 100], Rc::new(tracker));

        assert_eq!(observer.on_scroll(at(1100.0), "/"), vec![25, 50]);
        assert!(observer.on_scroll(at(900.0), "/").is_empty());
        assert!(observer.on_scroll(at(1050.0), "/").is_empty());
        assert!(observer.on_scroll(at(200.0), "/").is_empty());
        assert!(observer.on_scroll(at(1000.0), "/").is_empty());
        assert_eq!(observer.fired(), vec![25, 50]);
    }

    #[test]
    fn test_jump_to_bottom_fires_every_threshold() {
        let mut tracker = MockTracker::new();
        tracker.expect_track().times(4).return_const(());
        let observer = ScrollDepthObserver::new(vec![25, 50, 75, 100], Rc::new(tracker));
        assert_eq!(observer.on_scroll(at(2000.0), "/pricing"), vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_unscrollable_page_fires_nothing() {
        let mut tracker = MockTracker::new();
        tracker.expect_track().never();
        let observer = ScrollDepthObserver::new(vec![25], Rc::new(tracker));
        let metrics = ScrollMetrics {
            scroll_y: 10.0,
            scroll_height: 500.0,
            viewport_height: 900.0,
        };
        assert!(observer.on_scroll(metrics, "/").is_empty());
    }

    #[test]
    fn test_cta_click_uses_owning_form_or_fallback() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_track()
            .withf(|e| *e == TrackedEvent::cta_click("heroForm"))
            .times(1)
            .return_const(());
        tracker
            .expect_track()
            .withf(|e| *e == TrackedEvent::cta_click("unknown"))
            .times(2)
            .return_const(());

        track_cta_click(&tracker, Some("heroForm"));
        track_cta_click(&tracker, None);
        track_cta_click(&tracker, Some(""));
    }

    #[test]
    fn test_faq_tracks_only_openings() {
        let mut tracker = MockTracker::new();
        tracker
            .expect_track()
            .withf(|e| e.category == "FAQ" && e.name == "Q3: Is it free?")
            .times(1)
            .return_const(());

        assert!(!track_faq_toggle(&tracker, 2, false, "Is it free?"));
        assert!(track_faq_toggle(&tracker, 2, true, "Is it free?"));
    }

    #[test]
    fn test_faq_question_truncated_to_fifty_chars() {
        let question = "Why does the early access allocation close before the public launch date?";
        let expected = format!("Q1: {}", &question[..50]);
        let mut tracker = MockTracker::new();
        tracker
            .expect_track()
            .withf(move |e| e.name == expected)
            .times(1)
            .return_const(());

        track_faq_toggle(&tracker, 0, true, question);
    }
}
