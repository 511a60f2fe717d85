//! Take/alternate suffix grammar shared by every branch of the classifier.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::text::is_digits;

pub const DEFAULT_VARIATION: &str = "01";

static ALT_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"_alt_(\d+)$").unwrap());
static NUM_ALT: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(\d+)_alt$").unwrap());
static NUM_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(\d+)_(\d+)$").unwrap());
static NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"_(\d+)$").unwrap());
static ALT_GLUED: Lazy<Regex> = Lazy::new(|| Regex::new(r"_alt\d+$").unwrap());
static ALT_OPT_NUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"_alt(_\d+)?$").unwrap());
static SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d+|alt(?:_\d+)?|short|[a-z])(?:_(?:\d+|alt(?:_\d+)?|short|[a-z]))*$")
        .unwrap()
});
static MATCH_PHASE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(?:pre|post)_game_\d+$").unwrap());

/// Splits one variation suffix off `rest`, returning `(base, variation)`.
///
/// Priority: `_alt_<n>`, `_<n>_alt`, `_<n>_<m>` (both dropped, `m` kept),
/// `_<n>`; otherwise `rest` is returned whole with variation `01`.
pub fn strip_variation(rest: &str) -> (String, String) {
    for pattern in [&*ALT_NUM, &*NUM_ALT] {
        if let Some(caps) = pattern.captures(rest) {
            return (before_match(rest, &caps), caps[1].to_string());
        }
    }
    if let Some(caps) = NUM_NUM.captures(rest) {
        return (before_match(rest, &caps), caps[2].to_string());
    }
    if let Some(caps) = NUM.captures(rest) {
        return (before_match(rest, &caps), caps[1].to_string());
    }
    (rest.to_string(), DEFAULT_VARIATION.to_string())
}

// every suffix pattern is anchored at `$`
fn before_match(rest: &str, caps: &Captures<'_>) -> String {
    rest[..rest.len() - caps[0].len()].to_string()
}

/// Removes chained suffixes such as `_13_alt_01` until none remain.
pub fn strip_all_variations(rest: &str) -> String {
    let mut current = rest.to_string();
    loop {
        let cut = [&*ALT_NUM, &*NUM_ALT, &*ALT_GLUED, &*NUM]
            .iter()
            .find_map(|pattern| pattern.find(&current).map(|m| m.start()));
        match cut {
            Some(start) => current.truncate(start),
            None => return current,
        }
    }
}

/// Drops trailing digit, `short` and `alt*` tokens.
pub fn strip_trailing_tokens<'a>(tokens: &[&'a str]) -> Vec<&'a str> {
    let mut end = tokens.len();
    while end > 0 {
        let token = tokens[end - 1];
        if is_digits(token) || token == "short" || token.starts_with("alt") {
            end -= 1;
        } else {
            break;
        }
    }
    tokens[..end].to_vec()
}

/// Cleans a ping subject candidate before it is checked against the vocabulary.
pub fn clean_candidate(candidate: &str) -> String {
    let mut cleaned = ALT_OPT_NUM.replace(candidate, "").into_owned();
    cleaned = ALT_GLUED.replace(&cleaned, "").into_owned();
    cleaned = NUM_ALT.replace(&cleaned, "").into_owned();
    NUM.replace(&cleaned, "").into_owned()
}

/// Final scrub applied to ping subject and topic text.
pub fn clean_ping_text(text: &str) -> String {
    let mut cleaned = ALT_OPT_NUM.replace(text, "").into_owned();
    cleaned = ALT_GLUED.replace(&cleaned, "").into_owned();
    NUM.replace(&cleaned, "").into_owned()
}

/// Whether `suffix` (text after `<keyword>_`) is made only of variation groups.
pub fn is_variation_suffix(suffix: &str) -> bool {
    SUFFIX.is_match(suffix)
}

/// `pre_game_<n>` / `post_game_<n>`.
pub fn is_match_phase(rest: &str) -> bool {
    MATCH_PHASE.is_match(rest)
}
