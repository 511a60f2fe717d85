//! Supplementary `"key" "value"` dictionary of authored lines.

use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::error::Result;

static ENTRY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^"((?:[^"\\]|\\.)+)"\s+"((?:[^"\\]|\\.)*)"$"#).unwrap()
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    entries: IndexMap<String, String>,
}

impl Dictionary {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Ok(Self::parse(&raw))
    }

    /// Collects every `"key" "value"` line; anything else is ignored.
    /// Keys are lowercased and the first occurrence of a key wins.
    pub fn parse(raw: &str) -> Self {
        let mut entries = IndexMap::new();
        for line in raw.lines() {
            let Some(caps) = ENTRY.captures(line.trim()) else {
                continue;
            };
            let key = unescape(&caps[1]).to_lowercase();
            entries.entry(key).or_insert_with(|| unescape(&caps[2]));
        }
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut entries = IndexMap::new();
        for (key, value) in iter {
            entries
                .entry(key.into().to_lowercase())
                .or_insert_with(|| value.into());
        }
        Self { entries }
    }
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuffixCount {
    pub suffix: String,
    pub count: usize,
}

/// Counts cumulative underscore suffixes (`a_b_c` -> `_c`, `_b_c`) and keeps
/// those seen at least `min_count` times, longest first.
pub fn detect_suffixes<'k>(keys: impl IntoIterator<Item = &'k str>, min_count: usize) -> Vec<SuffixCount> {
    let mut counts: FxHashMap<String, usize> = FxHashMap::default();
    for key in keys {
        let parts: Vec<&str> = key.split('_').collect();
        let mut suffix = String::new();
        for part in parts.iter().skip(1).rev() {
            suffix = format!("_{part}{suffix}");
            *counts.entry(suffix.clone()).or_default() += 1;
        }
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(suffix, count)| SuffixCount { suffix, count })
        .sorted_by(|a, b| {
            b.suffix
                .len()
                .cmp(&a.suffix.len())
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.suffix.cmp(&b.suffix))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
"lang"
{
    "Tokens"
    {
        "Astro_Select_01_Line"    "Ready to fly."
        "astro_select_01_line"    "duplicate ignored"
        "wraith_hunt_02_line"     "She said \"run\".\nThen ran."
        "broken line
    }
}
"#;

    #[test]
    fn parses_pairs_and_skips_structure() {
        let dict = Dictionary::parse(SAMPLE);
        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get("astro_select_01_line"), Some("Ready to fly."));
        assert_eq!(
            dict.get("wraith_hunt_02_line"),
            Some("She said \"run\".\nThen ran.")
        );
        let keys: Vec<&str> = dict.keys().collect();
        assert_eq!(keys, vec!["astro_select_01_line", "wraith_hunt_02_line"]);
    }

    #[test]
    fn suffixes_sorted_by_length_then_count() {
        let keys = [
            "astro_kill_line",
            "bebop_kill_line",
            "wraith_hunt_line",
            "wraith_hunt_caption",
        ];
        let found = detect_suffixes(keys, 2);
        let summary: Vec<(&str, usize)> = found
            .iter()
            .map(|s| (s.suffix.as_str(), s.count))
            .collect();
        assert_eq!(summary, vec![("_kill_line", 2), ("_line", 3)]);
    }

    #[test]
    fn single_token_keys_have_no_suffix() {
        assert!(detect_suffixes(["astro"], 1).is_empty());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lines.txt");
        std::fs::write(&path, "\"k_one\" \"v\"\n").unwrap();
        assert_eq!(Dictionary::load(&path).unwrap().get("k_one"), Some("v"));
    }
}
