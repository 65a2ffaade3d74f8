/// A named analytics event: category, action and a free-form label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedEvent {
    pub category: String,
    pub action: String,
    pub name: String,
}

impl TrackedEvent {
    pub fn new(category: impl Into<String>, action: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            action: action.into(),
            name: name.into(),
        }
    }

    pub fn signup(form_id: &str) -> Self {
        Self::new("Email Signup", "Submit", form_id)
    }

    pub fn scroll_depth(threshold: u8, path: &str) -> Self {
        Self::new("Scroll Depth", format!("{}%", threshold), path)
    }

    pub fn cta_click(form_id: &str) -> Self {
        Self::new("CTA Click", "Button Click", form_id)
    }

    pub fn faq_opened(label: String) -> Self {
        Self::new("FAQ", "Question Opened", label)
    }

    pub fn campaign_visit(campaign: &str) -> Self {
        Self::new("Campaign", "Visit", campaign)
    }

    pub fn slow_load(load_ms: i64) -> Self {
        Self::new("Performance", "Slow Load", format!("{}ms", load_ms))
    }
}
