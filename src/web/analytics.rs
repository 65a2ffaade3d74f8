use js_sys::{Array, Function, Reflect, JSON};
use tracing::debug;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Node, Window};

use crate::tracking::tracker::{bootstrap_commands, collector_script_url, AnalyticsQueue, MatomoCommand};

const QUEUE_NAME: &str = "_paq";

/// The global `_paq` queue. Once the collector script loads it swaps the array
/// for its own object with a `push` method, so pushes always go through
/// whatever `window._paq.push` currently is.
pub struct PaqQueue {
    window: Window,
}

impl PaqQueue {
    fn push_args(&self, args: &JsValue) -> Result<(), JsValue> {
        let queue = Reflect::get(&self.window, &JsValue::from_str(QUEUE_NAME))?;
        if queue.is_undefined() || queue.is_null() {
            return Ok(());
        }
        let push: Function = Reflect::get(&queue, &JsValue::from_str("push"))?.dyn_into()?;
        push.call1(&queue, args)?;
        Ok(())
    }
}

impl AnalyticsQueue for PaqQueue {
    fn push(&self, command: &MatomoCommand) {
        let result = JSON::parse(&command.to_args().to_string()).and_then(|args| self.push_args(&args));
        if let Err(e) = result {
            debug!("Analytics push dropped: {:?}", e);
        }
    }
}

/// Creates the queue, queues the set-up commands and loads the collector
/// script asynchronously.
pub fn install(
    window: &Window,
    document: &Document,
    collector_url: &str,
    site_id: u32,
) -> Result<PaqQueue, JsValue> {
    let key = JsValue::from_str(QUEUE_NAME);
    let existing = Reflect::get(window, &key)?;
    if existing.is_undefined() || existing.is_null() {
        Reflect::set(window, &key, &Array::new())?;
    }

    let queue = PaqQueue {
        window: window.clone(),
    };
    for command in bootstrap_commands(collector_url, site_id) {
        queue.push(&command);
    }

    let script = document.create_element("script")?;
    script.set_attribute("async", "")?;
    script.set_attribute("src", &collector_script_url(collector_url))?;

    let first: Option<Node> = document.get_elements_by_tag_name("script").item(0).map(Into::into);
    match first.as_ref().and_then(|node| node.parent_node()) {
        Some(parent) => {
            parent.insert_before(&script, first.as_ref())?;
        }
        None => {
            if let Some(root) = document.document_element() {
                root.append_child(&script)?;
            }
        }
    }
    Ok(queue)
}
