const MAX_VISIBLE_CHARS: usize = 80;

/// Trims model inputs for safe logging: transcripts carry statements from
/// real investigations, so logs only ever see a bounded prefix.
pub fn sanitize_transcript(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    if total_chars <= MAX_VISIBLE_CHARS {
        return trimmed.to_string();
    }

    let visible: String = trimmed.chars().take(MAX_VISIBLE_CHARS).collect();
    format!("{}... ({} chars total)", visible, total_chars)
}
