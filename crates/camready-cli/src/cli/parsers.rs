use camready_core::models::AcceptanceTrack;

pub(super) fn parse_track(raw: &str) -> std::result::Result<AcceptanceTrack, String> {
    let value = parse_non_empty(raw)?;
    value
        .parse::<AcceptanceTrack>()
        .map_err(|never| match never {})
}

pub(super) fn parse_non_empty(raw: &str) -> std::result::Result<String, String> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("value must not be empty".to_string());
    }
    Ok(value.to_string())
}
