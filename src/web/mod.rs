//! Browser entry point: binds the landing page's DOM to the handlers.

pub mod analytics;
pub mod console;
pub mod dom;
pub mod listeners;
pub mod storage;
pub mod timers;

use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use tracing::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::DocumentReadyState;

use crate::api::submission_client::client_for;
use crate::config::LandingConfig;
use crate::handlers::campaign_handlers::capture_campaign;
use crate::handlers::form_handlers::{FormController, FormServices};
use crate::handlers::interaction_handlers::ScrollDepthObserver;
use crate::repositories::campaign_repository::CampaignRepository;
use crate::repositories::submission_repository::SubmissionRepository;
use crate::tracking::tracker::{AnalyticsQueue, EventTracker, Tracker};
use crate::utils::timers::{Navigator, Scheduler};

fn js_err(e: JsValue) -> anyhow::Error {
    anyhow!("{:?}", e)
}

#[wasm_bindgen(start)]
pub fn start() {
    let config = LandingConfig::default();
    console::init(&config.log_filter);

    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        error!("No document to attach to");
        return;
    };
    if document.ready_state() == DocumentReadyState::Loading {
        let on_ready = Closure::once_into_js(move || run(config));
        if let Err(e) =
            document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
        {
            error!("Failed to wait for DOMContentLoaded: {:?}", e);
        }
    } else {
        run(config);
    }
}

fn run(config: LandingConfig) {
    if let Err(e) = boot(&config) {
        error!("Landing page failed to start: {:#}", e);
    }
}

fn boot(config: &LandingConfig) -> Result<()> {
    let window = web_sys::window().context("no window")?;
    let document = window.document().context("no document")?;

    let scheduler: Rc<dyn Scheduler> = Rc::new(timers::BrowserScheduler);
    let navigator = Rc::new(timers::BrowserNavigator::new(window.clone()));
    let store = storage::local_store(&window);

    let queue: Option<Rc<dyn AnalyticsQueue>> = match config.analytics() {
        Some((url, site_id)) => match analytics::install(&window, &document, url, site_id) {
            Ok(queue) => Some(Rc::new(queue) as Rc<dyn AnalyticsQueue>),
            Err(e) => {
                warn!("Analytics collector not installed: {:?}", e);
                None
            }
        },
        None => None,
    };
    let event_tracker = EventTracker::new(queue);
    let telemetry = event_tracker.has_queue();
    let tracker: Rc<dyn Tracker> = Rc::new(event_tracker);

    let registry = dom::collect_forms(&document);
    let form_count = registry.len();
    let services = FormServices {
        client: client_for(config, scheduler.clone(), navigator.current_url()),
        submissions: SubmissionRepository::new(store.clone()),
        tracker: tracker.clone(),
        scheduler: scheduler.clone(),
        navigator,
    };
    let controller = Rc::new(FormController::new(registry, services, config));

    // Each listener group is independent; one failing must not stop the rest.
    let wiring = [
        ("forms", listeners::wire_forms(&document, &controller)),
        (
            "scroll",
            listeners::wire_scroll(
                &window,
                ScrollDepthObserver::new(config.scroll_thresholds.clone(), tracker.clone()),
            ),
        ),
        ("cta", listeners::wire_cta(&document, &tracker)),
        ("faq", listeners::wire_faq(&document, &tracker)),
        (
            "performance",
            listeners::wire_performance(
                &window,
                &document,
                scheduler,
                tracker.clone(),
                config.slow_load_threshold_ms,
            ),
        ),
    ];
    for (name, result) in wiring {
        if let Err(e) = result.map_err(js_err) {
            warn!("Failed to wire {} listeners: {:#}", name, e);
        }
    }

    let query = window.location().search().map_err(js_err)?;
    capture_campaign(&query, &CampaignRepository::new(store), tracker.as_ref());

    info!("🚀 INDIE PLATFORM: SYSTEM_ONLINE ({} forms)", form_count);
    info!("📧 STORAGE_MODE: {}", config.storage_mode().as_str());
    info!("📊 TELEMETRY: {}", if telemetry { "ACTIVE" } else { "LOCAL_ONLY" });
    Ok(())
}
