pub const DEFAULT_REDIRECT_TARGET: &str = "thank-you.html";
pub const DEFAULT_SCROLL_THRESHOLDS: [u8; 4] = [25, 50, 75, 100];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageMode {
    /// Signups only land in local storage.
    Local,
    /// Signups are posted to the form endpoint and kept locally as a backstop.
    Remote,
}

impl StorageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageMode::Local => "LOCAL",
            StorageMode::Remote => "REMOTE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LandingConfig {
    pub form_endpoint: Option<String>,
    pub matomo_url: Option<String>,
    pub matomo_site_id: Option<u32>,
    pub redirect_target: String,
    pub redirect_delay_ms: u32,
    pub message_ttl_ms: u32,
    pub simulated_latency_ms: u32,
    pub slow_load_threshold_ms: f64,
    pub scroll_thresholds: Vec<u8>,
    pub log_filter: String,
}

impl Default for LandingConfig {
    /// Values baked in at build time, e.g. `MATOMO_URL=... trunk build`.
    fn default() -> Self {
        Self::from_lookup(|key| {
            let value = match key {
                "FORM_ENDPOINT" => option_env!("FORM_ENDPOINT"),
                "MATOMO_URL" => option_env!("MATOMO_URL"),
                "MATOMO_SITE_ID" => option_env!("MATOMO_SITE_ID"),
                "LANDING_LOG" => option_env!("LANDING_LOG"),
                _ => None,
            };
            value.map(str::to_string)
        })
    }
}

impl LandingConfig {
    /// Reads `.env` and the process environment.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let matomo_site_id = non_empty("MATOMO_SITE_ID").and_then(|raw| match raw.parse() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("Ignoring MATOMO_SITE_ID {:?}: {}", raw, e);
                None
            }
        });
        Self {
            form_endpoint: non_empty("FORM_ENDPOINT"),
            matomo_url: non_empty("MATOMO_URL"),
            matomo_site_id,
            redirect_target: DEFAULT_REDIRECT_TARGET.to_string(),
            redirect_delay_ms: 2000,
            message_ttl_ms: 5000,
            simulated_latency_ms: 500,
            slow_load_threshold_ms: 3000.0,
            scroll_thresholds: DEFAULT_SCROLL_THRESHOLDS.to_vec(),
            log_filter: non_empty("LANDING_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }

    pub fn storage_mode(&self) -> StorageMode {
        if self.form_endpoint.is_some() {
            StorageMode::Remote
        } else {
            StorageMode::Local
        }
    }

    /// Collector base URL and site id, when analytics is configured.
    pub fn analytics(&self) -> Option<(&str, u32)> {
        match (self.matomo_url.as_deref(), self.matomo_site_id) {
            (Some(url), Some(site_id)) => Some((url, site_id)),
            _ => None,
        }
    }
}
