/// Turns an extracted company name into an exchange ticker: trims, drops
/// inner spaces, uppercases and appends `suffix` unless already present.
/// `"tata motors"` with `".NS"` becomes `"TATAMOTORS.NS"`.
pub fn normalize_symbol(raw: &str, suffix: &str) -> String {
    let mut symbol: String = raw.trim().chars().filter(|c| !c.is_whitespace()).collect();
    symbol = symbol.to_uppercase();
    let suffix = suffix.to_uppercase();
    if !suffix.is_empty() && !symbol.ends_with(&suffix) {
        symbol.push_str(&suffix);
    }
    symbol
}

/// Cleans up an extraction reply. Returns `None` for "none"/"null"/empty,
/// otherwise the lowercased name without wrapping quotes or a trailing period.
pub fn parse_extracted_name(reply: &str) -> Option<String> {
    let cleaned = reply
        .trim()
        .trim_matches(|c| c == '"' || c == '\'' || c == '`')
        .trim_end_matches('.')
        .trim();
    match cleaned.to_lowercase().as_str() {
        "" | "none" | "null" => None,
        name => Some(name.to_string()),
    }
}
