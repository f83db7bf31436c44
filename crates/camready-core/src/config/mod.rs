use reqwest::Url;

use crate::error::{CamReadyError, Result};

mod env;

use self::env::{parse_u32_or, parse_u64_at_least, read_non_empty_env};

pub const ENV_BASE_URL: &str = "CAMREADY_BASE_URL";
pub const ENV_HTTP_TIMEOUT_MS: &str = "CAMREADY_HTTP_TIMEOUT_MS";
pub const ENV_PAGE_SIZE: &str = "CAMREADY_PAGE_SIZE";
pub const ENV_FETCH_RETRIES: &str = "CAMREADY_FETCH_RETRIES";

pub const DEFAULT_BASE_URL: &str = "https://api2.openreview.net";
const DEFAULT_HTTP_TIMEOUT_MS: u64 = 30_000;
const DEFAULT_PAGE_SIZE: u64 = 1_000;
const DEFAULT_FETCH_RETRIES: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub base_url: String,
    pub http_timeout_ms: u64,
    pub page_size: u64,
    pub fetch_retries: u32,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http_timeout_ms: DEFAULT_HTTP_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
            fetch_retries: DEFAULT_FETCH_RETRIES,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            read_non_empty_env(ENV_BASE_URL).as_deref(),
            read_non_empty_env(ENV_HTTP_TIMEOUT_MS).as_deref(),
            read_non_empty_env(ENV_PAGE_SIZE).as_deref(),
            read_non_empty_env(ENV_FETCH_RETRIES).as_deref(),
        )
    }

    fn from_values(
        base_url: Option<&str>,
        timeout_ms: Option<&str>,
        page_size: Option<&str>,
        fetch_retries: Option<&str>,
    ) -> Result<Self> {
        let base_url = match base_url {
            Some(raw) => normalize_base_url(raw)?,
            None => DEFAULT_BASE_URL.to_string(),
        };
        Ok(Self {
            base_url,
            http_timeout_ms: parse_u64_at_least(timeout_ms, DEFAULT_HTTP_TIMEOUT_MS, 1),
            page_size: parse_u64_at_least(page_size, DEFAULT_PAGE_SIZE, 1),
            fetch_retries: parse_u32_or(fetch_retries, DEFAULT_FETCH_RETRIES),
        })
    }
}

pub fn normalize_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|err| CamReadyError::Validation(format!("invalid {ENV_BASE_URL}: {err}")))?;
    match url.scheme() {
        "http" | "https" => Ok(trimmed.to_string()),
        other => Err(CamReadyError::Validation(format!(
            "unsupported {ENV_BASE_URL} scheme: {other}"
        ))),
    }
}
