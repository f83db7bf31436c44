const BASE_BACKOFF_MS: u64 = 250;
const MAX_BACKOFF_MS: u64 = 4_000;

/// `attempt` counts failures so far, starting at 1.
pub(crate) const fn should_retry(attempt: u32, max_retries: u32) -> bool {
    attempt <= max_retries
}

pub(crate) fn retry_backoff_ms(operation: &str, attempt: u32) -> u64 {
    let capped_exp = attempt.saturating_sub(1).min(6);
    let baseline = (BASE_BACKOFF_MS << capped_exp).min(MAX_BACKOFF_MS);
    let jitter_bound = (baseline / 4).max(1);
    let jitter_seed = format!("{operation}:{attempt}");
    let hash = blake3::hash(jitter_seed.as_bytes());
    let bytes = hash.as_bytes();
    let rand = u64::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    let jitter = rand % (jitter_bound + 1);
    (baseline + jitter).min(MAX_BACKOFF_MS)
}

/// Only transport-level stalls are worth repeating; status errors are answers.
pub(crate) fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}
