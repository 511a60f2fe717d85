/// Uppercases the first character and lowercases the rest.
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// `kill_anyhero` -> `Kill anyhero`.
pub fn humanize(raw: &str) -> String {
    capitalize(&raw.replace('_', " "))
}

/// Inverse of [`humanize`] for category lookups: `Kill anyhero` -> `kill_anyhero`.
pub fn keyword_key(display: &str) -> String {
    display.replace(' ', "_").to_lowercase()
}

pub fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
