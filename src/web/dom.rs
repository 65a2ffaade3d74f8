use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement, NodeList};

use crate::handlers::form_handlers::FormRegistry;
use crate::handlers::message_presenter::{FeedbackMessage, FormView, MessageId};

pub const FORM_SELECTOR: &str = ".email-form";
pub const EMAIL_INPUT_SELECTOR: &str = ".email-input";
pub const CTA_SELECTOR: &str = ".cta-button";
pub const MESSAGE_SELECTOR: &str = ".form-message";
pub const FAQ_ITEM_SELECTOR: &str = ".faq-item";
pub const FAQ_QUESTION_SELECTOR: &str = ".faq-question";

pub fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn select_all(document: &Document, selector: &str) -> Vec<Element> {
    match document.query_selector_all(selector) {
        Ok(list) => elements(&list),
        Err(e) => {
            warn!("Invalid selector {}: {:?}", selector, e);
            Vec::new()
        }
    }
}

/// A signup form bound to its live DOM nodes.
pub struct DomFormView {
    document: Document,
    form: Element,
    input: HtmlInputElement,
    submit: Element,
    current: RefCell<Option<(MessageId, Element)>>,
}

impl DomFormView {
    pub fn bind(document: &Document, form: Element) -> Option<Self> {
        let input = form
            .query_selector(EMAIL_INPUT_SELECTOR)
            .ok()
            .flatten()?
            .dyn_into::<HtmlInputElement>()
            .ok()?;
        let submit = form.query_selector(CTA_SELECTOR).ok().flatten()?;
        Some(Self {
            document: document.clone(),
            form,
            input,
            submit,
            current: RefCell::new(None),
        })
    }
}

impl FormView for DomFormView {
    fn form_id(&self) -> String {
        self.form.id()
    }

    fn email_value(&self) -> String {
        self.input.value()
    }

    fn clear_email(&self) {
        self.input.set_value("");
    }

    fn submit_label(&self) -> String {
        self.submit.text_content().unwrap_or_default()
    }

    fn set_submit_state(&self, enabled: bool, label: &str) {
        if let Err(e) = self.submit.toggle_attribute_with_force("disabled", !enabled) {
            warn!("Failed to toggle submit control: {:?}", e);
        }
        self.submit.set_text_content(Some(label));
    }

    fn replace_message(&self, message: &FeedbackMessage) {
        if let Ok(Some(existing)) = self.form.query_selector(MESSAGE_SELECTOR) {
            existing.remove();
        }
        let node = match self.document.create_element("div") {
            Ok(node) => node,
            Err(e) => {
                warn!("Failed to create feedback node: {:?}", e);
                return;
            }
        };
        node.set_class_name(&message.class_name());
        node.set_text_content(Some(&message.text));
        if let Err(e) = node.set_attribute("style", &message.inline_style()) {
            warn!("Failed to style feedback node: {:?}", e);
        }
        if let Err(e) = self.form.append_child(&node) {
            warn!("Failed to attach feedback node: {:?}", e);
            return;
        }
        *self.current.borrow_mut() = Some((message.id, node));
    }

    fn remove_message(&self, id: MessageId) {
        let mut current = self.current.borrow_mut();
        if matches!(current.as_ref(), Some((current_id, _)) if *current_id == id) {
            if let Some((_, node)) = current.take() {
                node.remove();
            }
        }
    }
}

/// Binds every `.email-form` on the page. Forms with a missing or repeated
/// id get a positional one so each stays addressable.
pub fn collect_forms(document: &Document) -> FormRegistry {
    let mut registry = FormRegistry::new();
    for (index, form) in select_all(document, FORM_SELECTOR).into_iter().enumerate() {
        let current = form.id();
        let id = registry.assign_id(&current, index + 1);
        if id != current {
            warn!("Email form {} has id {:?}; using {:?}", index + 1, current, id);
            form.set_id(&id);
        }
        match DomFormView::bind(document, form) {
            Some(view) => registry.register(Rc::new(view)),
            None => warn!("Skipping email form {} without input or submit control", index + 1),
        }
    }
    registry
}
