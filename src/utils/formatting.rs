//! Formatting utilities used for CLI and export outputs.

/// Member ids are shown zero-padded to four digits (`0007`).
pub fn pad_member_id(id: i64) -> String {
    format!("{:04}", id)
}

/// Community label, or the given placeholder when absent.
pub fn community_or(label: Option<&str>, placeholder: &str) -> String {
    match label {
        Some(s) if !s.trim().is_empty() => s.to_string(),
        _ => placeholder.to_string(),
    }
}
