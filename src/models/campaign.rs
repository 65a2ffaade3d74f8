use serde::{Deserialize, Serialize};

/// Campaign attribution fields recognized in the page URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UtmParam {
    Source,
    Medium,
    Campaign,
    Term,
    Content,
}

impl UtmParam {
    pub const ALL: [UtmParam; 5] = [
        UtmParam::Source,
        UtmParam::Medium,
        UtmParam::Campaign,
        UtmParam::Term,
        UtmParam::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtmParam::Source => "utm_source",
            UtmParam::Medium => "utm_medium",
            UtmParam::Campaign => "utm_campaign",
            UtmParam::Term => "utm_term",
            UtmParam::Content => "utm_content",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|param| param.as_str() == key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_medium: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_campaign: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utm_content: Option<String>,
}

impl UtmParams {
    /// Reads the recognized parameters out of a raw query string (with or
    /// without the leading `?`). A repeated name keeps its first value.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut params = UtmParams::default();
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            if let Some(param) = UtmParam::from_key(&key) {
                let slot = params.slot_mut(param);
                if slot.is_none() {
                    *slot = Some(value.into_owned());
                }
            }
        }
        params
    }

    pub fn get(&self, param: UtmParam) -> Option<&str> {
        match param {
            UtmParam::Source => self.utm_source.as_deref(),
            UtmParam::Medium => self.utm_medium.as_deref(),
            UtmParam::Campaign => self.utm_campaign.as_deref(),
            UtmParam::Term => self.utm_term.as_deref(),
            UtmParam::Content => self.utm_content.as_deref(),
        }
    }

    fn slot_mut(&mut self, param: UtmParam) -> &mut Option<String> {
        match param {
            UtmParam::Source => &mut self.utm_source,
            UtmParam::Medium => &mut self.utm_medium,
            UtmParam::Campaign => &mut self.utm_campaign,
            UtmParam::Term => &mut self.utm_term,
            UtmParam::Content => &mut self.utm_content,
        }
    }

    pub fn is_empty(&self) -> bool {
        UtmParam::ALL.iter().all(|param| self.get(*param).is_none())
    }
}
