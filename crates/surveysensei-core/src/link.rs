//! Share links and compact id display.

/// `{origin}/survey/{id}`.
pub fn share_url(origin: &str, survey_id: &str) -> String {
    format!("{}/survey/{}", origin.trim_end_matches('/'), survey_id)
}

/// Ids longer than 12 characters render as first 6, an ellipsis, last 6.
pub fn compact_id(id: &str) -> String {
    let chars: Vec<char> = id.chars().collect();
    if chars.len() <= 12 {
        return id.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 6..].iter().collect();
    format!("{head}…{tail}")
}
