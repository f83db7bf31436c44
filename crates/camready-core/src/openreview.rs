use std::thread;
use std::time::Duration;

use reqwest::Url;
use reqwest::blocking::{Client, Response};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::config::RuntimeConfig;
use crate::error::{CamReadyError, Result};
use crate::models::{PaperId, SubmissionRecord};
use crate::notify::MessageSender;
use crate::retry_policy::{is_retryable, retry_backoff_ms, should_retry};
use crate::submissions::SubmissionSource;

const ERROR_BODY_MAX_CHARS: usize = 200;

/// Authenticated OpenReview API v2 session.
pub struct OpenReviewClient {
    config: RuntimeConfig,
    http: Client,
    token: String,
}

impl std::fmt::Debug for OpenReviewClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenReviewClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotesPage {
    pub records: Vec<SubmissionRecord>,
    pub fetched: usize,
    pub total: Option<u64>,
}

impl OpenReviewClient {
    pub fn login(config: RuntimeConfig, username: &str, password: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()
            .map_err(|err| CamReadyError::Connection(format!("http client setup failed: {err}")))?;

        let url = format!("{}/login", config.base_url);
        let resp = http
            .post(&url)
            .json(&build_login_body(username, password))
            .send()
            .map_err(|err| {
                CamReadyError::Connection(format!("OpenReview connection refused: {err}"))
            })?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(CamReadyError::Connection(format!(
                "OpenReview login rejected with status {status}: {}",
                response_excerpt(resp)
            )));
        }
        let value = resp.json::<Value>().map_err(|err| {
            CamReadyError::Connection(format!("unreadable login response: {err}"))
        })?;
        let token = parse_login_token(&value).ok_or_else(|| {
            CamReadyError::Connection("login response carried no token".to_string())
        })?;
        info!(base_url = %config.base_url, "logged in to OpenReview");

        Ok(Self {
            config,
            http,
            token,
        })
    }

    fn get_with_retry(&self, operation: &str, url: Url) -> Result<Response> {
        let mut attempt = 0;
        loop {
            match self
                .http
                .get(url.clone())
                .bearer_auth(&self.token)
                .send()
            {
                Ok(resp) => return Ok(resp),
                Err(err) => {
                    attempt += 1;
                    if is_retryable(&err) && should_retry(attempt, self.config.fetch_retries) {
                        let wait_ms = retry_backoff_ms(operation, attempt);
                        warn!(
                            operation,
                            attempt,
                            wait_ms,
                            error = %err,
                            "request stalled, retrying"
                        );
                        thread::sleep(Duration::from_millis(wait_ms));
                        continue;
                    }
                    return Err(CamReadyError::Connection(format!("{operation} failed: {err}")));
                }
            }
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, String)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}{path}", self.config.base_url), params)
            .map_err(|err| CamReadyError::Validation(format!("invalid request url: {err}")))
    }
}

impl SubmissionSource for OpenReviewClient {
    fn ensure_venue(&self, venue: &str) -> Result<()> {
        let url = self.endpoint("/groups", &[("id", venue.to_string())])?;
        let resp = self.get_with_retry("groups", url)?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(CamReadyError::NotFound(format!(
                "unable to get group for {venue} (status {status}): {}",
                response_excerpt(resp)
            )));
        }
        let value = resp.json::<Value>()?;
        if !groups_contain(&value, venue) {
            return Err(CamReadyError::NotFound(format!("unable to get group for {venue}")));
        }
        debug!(venue, "venue group verified");
        Ok(())
    }

    fn fetch_submissions(&self, venue: &str) -> Result<Vec<SubmissionRecord>> {
        let page_size = self.config.page_size;
        let mut offset = 0_u64;
        let mut records = Vec::new();
        loop {
            let url = self.endpoint(
                "/notes",
                &[
                    ("content.venueid", venue.to_string()),
                    ("details", "replies".to_string()),
                    ("limit", page_size.to_string()),
                    ("offset", offset.to_string()),
                ],
            )?;
            let resp = self.get_with_retry("notes", url)?;
            if !resp.status().is_success() {
                let status = resp.status();
                return Err(CamReadyError::Connection(format!(
                    "note fetch failed with status {status}: {}",
                    response_excerpt(resp)
                )));
            }
            let page = parse_notes_page(&resp.json::<Value>()?)?;
            debug!(offset, fetched = page.fetched, kept = page.records.len(), "fetched notes page");
            records.extend(page.records);
            offset += page.fetched as u64;
            if is_last_page(page.fetched, page_size, page.total, offset) {
                break;
            }
        }
        info!(venue, submissions = records.len(), "fetched submissions");
        Ok(records)
    }
}

impl MessageSender for OpenReviewClient {
    fn send_message(
        &self,
        subject: &str,
        recipients: &[String],
        body: &str,
        invitation: &str,
    ) -> Result<()> {
        let url = format!("{}/messages", self.config.base_url);
        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&build_message_body(subject, recipients, body, invitation))
            .send()
            .map_err(|err| CamReadyError::Connection(format!("message post failed: {err}")))?;
        if !resp.status().is_success() {
            let status = resp.status();
            return Err(CamReadyError::Internal(format!(
                "message post rejected with status {status}: {}",
                response_excerpt(resp)
            )));
        }
        Ok(())
    }
}

fn response_excerpt(resp: Response) -> String {
    let text = resp.text().unwrap_or_default();
    match text.char_indices().nth(ERROR_BODY_MAX_CHARS) {
        Some((clip_idx, _)) => format!("{}...", &text[..clip_idx]),
        None => text,
    }
}

pub fn build_login_body(username: &str, password: &str) -> Value {
    json!({
        "id": username,
        "password": password,
    })
}

pub fn parse_login_token(value: &Value) -> Option<String> {
    value
        .get("token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
}

pub fn build_message_body(
    subject: &str,
    recipients: &[String],
    body: &str,
    invitation: &str,
) -> Value {
    json!({
        "subject": subject,
        "groups": recipients,
        "message": body,
        "invitation": invitation,
    })
}

fn groups_contain(value: &Value, venue: &str) -> bool {
    value
        .get("groups")
        .and_then(Value::as_array)
        .is_some_and(|groups| {
            groups
                .iter()
                .any(|group| group.get("id").and_then(Value::as_str) == Some(venue))
        })
}

pub fn parse_notes_page(value: &Value) -> Result<NotesPage> {
    let notes = value
        .get("notes")
        .and_then(Value::as_array)
        .ok_or_else(|| CamReadyError::DataFormat("notes response has no notes array".to_string()))?;
    let records = notes.iter().filter_map(parse_note).collect();
    Ok(NotesPage {
        records,
        fetched: notes.len(),
        total: value.get("count").and_then(Value::as_u64),
    })
}

fn parse_note(note: &Value) -> Option<SubmissionRecord> {
    let Some(id) = note.get("id").and_then(Value::as_str) else {
        debug!("skipping note without id");
        return None;
    };
    let number = match note.get("number") {
        Some(Value::Number(raw)) => raw.as_u64().map(PaperId::Numeric),
        Some(Value::String(raw)) => raw.parse::<PaperId>().ok(),
        _ => None,
    };
    let Some(number) = number else {
        debug!(note_id = id, "skipping note without number");
        return None;
    };
    let forum_id = note
        .get("forum")
        .and_then(Value::as_str)
        .unwrap_or(id)
        .to_string();
    let venue_id = note
        .pointer("/content/venueid/value")
        .or_else(|| note.pointer("/content/venueid"))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(SubmissionRecord {
        submission_id: id.to_string(),
        forum_id,
        number,
        venue_id,
    })
}

/// The server may cap `limit` below `page_size`, so a reported `count` wins
/// over the short-page heuristic.
const fn is_last_page(fetched: usize, page_size: u64, total: Option<u64>, offset: u64) -> bool {
    if fetched == 0 {
        return true;
    }
    match total {
        Some(total) => offset >= total,
        None => (fetched as u64) < page_size,
    }
}
