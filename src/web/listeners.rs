use std::rc::Rc;

use js_sys::Reflect;
use tracing::warn;
use wasm_bindgen::prelude::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, DocumentReadyState, Event, HtmlDetailsElement, Window};

use crate::handlers::form_handlers::FormController;
use crate::handlers::interaction_handlers::{
    track_cta_click, track_faq_toggle, ScrollDepthObserver, ScrollMetrics,
};
use crate::handlers::performance_handlers::{report_page_load, NavigationTiming};
use crate::tracking::tracker::Tracker;
use crate::utils::timers::Scheduler;
use crate::web::dom::{select_all, CTA_SELECTOR, FAQ_ITEM_SELECTOR, FAQ_QUESTION_SELECTOR};

pub fn wire_forms(document: &Document, controller: &Rc<FormController>) -> Result<(), JsValue> {
    for form_id in controller.form_ids() {
        let Some(form) = document.get_element_by_id(&form_id) else {
            continue;
        };
        let controller = controller.clone();
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let controller = controller.clone();
            let form_id = form_id.clone();
            spawn_local(async move {
                controller.submit(&form_id).await;
            });
        });
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
        on_submit.forget();
    }
    Ok(())
}

fn scroll_metrics(window: &Window) -> Option<ScrollMetrics> {
    let root = window.document()?.document_element()?;
    Some(ScrollMetrics {
        scroll_y: window.scroll_y().ok()?,
        scroll_height: f64::from(root.scroll_height()),
        viewport_height: window.inner_height().ok()?.as_f64()?,
    })
}

pub fn wire_scroll(window: &Window, observer: ScrollDepthObserver) -> Result<(), JsValue> {
    let win = window.clone();
    let on_scroll = Closure::<dyn FnMut()>::new(move || {
        let Some(metrics) = scroll_metrics(&win) else {
            return;
        };
        let path = win.location().pathname().unwrap_or_default();
        observer.on_scroll(metrics, &path);
    });
    window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
    on_scroll.forget();
    Ok(())
}

pub fn wire_cta(document: &Document, tracker: &Rc<dyn Tracker>) -> Result<(), JsValue> {
    for button in select_all(document, CTA_SELECTOR) {
        let tracker = tracker.clone();
        let target = button.clone();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            let form_id = target.closest("form").ok().flatten().map(|form| form.id());
            track_cta_click(tracker.as_ref(), form_id.as_deref());
        });
        button.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

pub fn wire_faq(document: &Document, tracker: &Rc<dyn Tracker>) -> Result<(), JsValue> {
    for (index, item) in select_all(document, FAQ_ITEM_SELECTOR).into_iter().enumerate() {
        let Ok(details) = item.dyn_into::<HtmlDetailsElement>() else {
            warn!("FAQ item {} is not a <details> element", index + 1);
            continue;
        };
        let tracker = tracker.clone();
        let target = details.clone();
        let on_toggle = Closure::<dyn FnMut()>::new(move || {
            let question = target
                .query_selector(FAQ_QUESTION_SELECTOR)
                .ok()
                .flatten()
                .and_then(|q| q.text_content())
                .unwrap_or_default();
            track_faq_toggle(tracker.as_ref(), index, target.open(), &question);
        });
        details.add_event_listener_with_callback("toggle", on_toggle.as_ref().unchecked_ref())?;
        on_toggle.forget();
    }
    Ok(())
}

fn navigation_timing(window: &Window) -> Option<NavigationTiming> {
    let entry = window.performance()?.get_entries_by_type("navigation").get(0);
    if entry.is_undefined() {
        return None;
    }
    let read = |field: &str| {
        Reflect::get(&entry, &JsValue::from_str(field))
            .ok()
            .and_then(|value| value.as_f64())
    };
    Some(NavigationTiming {
        fetch_start: read("fetchStart")?,
        load_event_end: read("loadEventEnd")?,
    })
}

/// Reports load time one tick after `load`, or right away if the page
/// finished loading before this module started.
pub fn wire_performance(
    window: &Window,
    document: &Document,
    scheduler: Rc<dyn Scheduler>,
    tracker: Rc<dyn Tracker>,
    slow_threshold_ms: f64,
) -> Result<(), JsValue> {
    let win = window.clone();
    let report = move || {
        let win = win.clone();
        let tracker = tracker.clone();
        scheduler.schedule(
            0,
            Box::new(move || {
                report_page_load(navigation_timing(&win), slow_threshold_ms, tracker.as_ref());
            }),
        );
    };

    if document.ready_state() == DocumentReadyState::Complete {
        report();
        return Ok(());
    }
    let on_load = Closure::once_into_js(report);
    window.add_event_listener_with_callback("load", on_load.unchecked_ref())
}
