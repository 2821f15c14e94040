/// Truncate a title to `max_len` characters, ending in `...` when shortened
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if title.chars().count() <= max_len {
        return title.to_string();
    }
    let keep = max_len.saturating_sub(3);
    let mut truncated: String = title.chars().take(keep).collect();
    truncated.push_str("...");
    truncated
}

/// Mask a secret, showing only its last four characters
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let tail: String = chars[chars.len().saturating_sub(4)..].iter().collect();
    format!("***{}", tail)
}
