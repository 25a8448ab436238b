pub const FALLBACK_FILENAME: &str = "compressed";

const MAX_FILENAME_CHARS: usize = 120;

/// Local file name for a downloaded artifact.
///
/// Keeps only the last path component of the server's suggestion, replaces
/// characters Windows rejects, and falls back to `compressed`.
pub fn safe_filename(suggested: Option<&str>) -> String {
    let base = suggested
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .unwrap_or_default();

    let mut cleaned = String::with_capacity(base.len());
    let mut prev_underscore = false;
    for c in base.chars() {
        let c = if is_forbidden(c) { '_' } else { c };
        if c == '_' && prev_underscore {
            continue;
        }
        prev_underscore = c == '_';
        cleaned.push(c);
    }

    let trimmed = cleaned.trim_matches(&['_', ' ', '.'][..]);
    if trimmed.is_empty() {
        return FALLBACK_FILENAME.to_string();
    }

    let mut name: String = trimmed.chars().take(MAX_FILENAME_CHARS).collect();
    let stem_len = name.find('.').unwrap_or(name.len());
    if is_reserved_windows_name(&name[..stem_len]) {
        name.insert(stem_len, '_');
    }
    name
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}
