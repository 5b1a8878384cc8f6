use log::LevelFilter;
use std::str::FromStr;

pub(crate) const DEFAULT_API_URL: &str = "http://localhost:1337";

/// Runtime configuration injected by the hosting page as `window.ENV`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EnvConfig {
    /// Backend origin, without a trailing slash.
    pub api_url: String,
    pub log_level: LevelFilter,
}

impl EnvConfig {
    pub fn new() -> Self {
        let mut api_url = None;
        let mut log_level = None;

        // Both `window.ENV.API_URL` and the older `window.ENV.api_url` are accepted.
        if let Some(window) = web_sys::window() {
            if let Some(env) = window.get("ENV") {
                if !env.is_undefined() && env.is_object() {
                    let read = |key: &str| {
                        js_sys::Reflect::get(&env, &key.into())
                            .ok()
                            .and_then(|v| v.as_string())
                    };
                    api_url = read("API_URL").or_else(|| read("api_url"));
                    log_level = read("LOG_LEVEL").or_else(|| read("log_level"));
                }
            }
        }

        Self::from_values(api_url, log_level)
    }

    pub fn from_values(api_url: Option<String>, log_level: Option<String>) -> Self {
        let api_url = api_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let log_level = log_level
            .and_then(|l| LevelFilter::from_str(l.trim()).ok())
            .unwrap_or(LevelFilter::Info);

        Self { api_url, log_level }
    }
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self::new()
    }
}
