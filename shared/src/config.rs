//! Where the Run button sends code.
//!
//! Resolution order: browser local storage, compile-time
//! `PETTA_EXECUTION_URL`, then [`DEFAULT_EXECUTION_URL`].

pub const DEFAULT_EXECUTION_URL: &str = "http://localhost:8000/run";

pub const EXECUTION_URL_STORAGE_KEY: &str = "petta-playground-execution-url";

pub const EXECUTION_URL_ENV: &str = "PETTA_EXECUTION_URL";

const RUN_PATH: &str = "/run";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub url: String,
}

impl EndpointConfig {
    /// Picks the first usable candidate. A bare origin like
    /// `http://host:8000` gets `/run` appended.
    pub fn resolve(stored: Option<&str>, compile_time: Option<&str>) -> Self {
        let url = [stored, compile_time]
            .into_iter()
            .flatten()
            .find_map(normalize_url)
            .unwrap_or_else(|| DEFAULT_EXECUTION_URL.to_owned());
        Self { url }
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_EXECUTION_URL.to_owned(),
        }
    }
}

fn normalize_url(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let url = trimmed.trim_end_matches('/');
    let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
    if after_scheme.contains('/') {
        Some(url.to_owned())
    } else {
        Some(format!("{url}{RUN_PATH}"))
    }
}
