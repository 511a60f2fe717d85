//! Text-only entries for dictionary lines that have no extracted audio.

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::classify::Classifier;
use crate::dictionary::Dictionary;
use crate::line::{DecodedLine, RejectionReason};

/// A dictionary line decoded through the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhantomLine {
    pub key: String,
    pub line: DecodedLine,
    pub text: String,
}

#[derive(Debug, Clone, Default)]
pub struct PhantomOutcome {
    pub lines: Vec<PhantomLine>,
    pub rejected: Vec<(String, RejectionReason)>,
}

/// Known suffixes, longest first so `_line_alt` is tried before `_line`.
pub fn ordered_suffixes(known: &[String]) -> Vec<&str> {
    let mut suffixes: Vec<&str> = known
        .iter()
        .map(String::as_str)
        .filter(|suffix| !suffix.is_empty())
        .collect();
    suffixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    suffixes.dedup();
    suffixes
}

/// Synthetic stem for `key`, if it ends with one of `suffixes`.
pub fn strip_known_suffix<'k>(key: &'k str, suffixes: &[&str]) -> Option<&'k str> {
    suffixes
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
        .filter(|stem| !stem.is_empty())
}

/// Dictionary key and text matching a real file's stem.
pub fn text_for<'d>(
    dictionary: &'d Dictionary,
    stem: &str,
    suffixes: &[&str],
) -> Option<(String, &'d str)> {
    let stem = stem.to_lowercase();
    suffixes.iter().find_map(|suffix| {
        let key = format!("{stem}{suffix}");
        let text = dictionary.get(&key)?;
        Some((key, text))
    })
}

/// Decodes every unused dictionary key ending with a known suffix.
///
/// Keys whose synthetic stem equals a real file's stem are skipped, as are
/// repeated stems; rejected stems are returned for diagnostics only.
pub fn synthesize(
    dictionary: &Dictionary,
    used_keys: &FxHashSet<String>,
    real_stems: &FxHashSet<String>,
    suffixes: &[&str],
    classifier: &Classifier<'_>,
) -> PhantomOutcome {
    let mut outcome = PhantomOutcome::default();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for (key, text) in dictionary.iter() {
        if used_keys.contains(key) {
            continue;
        }
        let Some(stem) = strip_known_suffix(key, suffixes) else {
            continue;
        };
        if real_stems.contains(stem) || !seen.insert(stem) {
            continue;
        }
        match classifier.classify(stem) {
            Ok(line) => outcome.lines.push(PhantomLine {
                key: key.to_string(),
                line,
                text: text.to_string(),
            }),
            Err(reason) => {
                debug!(key, %reason, "phantom rejected");
                outcome.rejected.push((key.to_string(), reason));
            }
        }
    }
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alias::AliasTable;
    use crate::taxonomy::Taxonomy;

    fn suffixes() -> Vec<String> {
        vec!["_line".to_string(), "_alt_line".to_string(), "_line".to_string()]
    }

    #[test]
    fn suffixes_are_longest_first_and_unique() {
        let known = suffixes();
        assert_eq!(ordered_suffixes(&known), vec!["_alt_line", "_line"]);
    }

    #[test]
    fn strip_requires_a_stem() {
        let known = suffixes();
        let ordered = ordered_suffixes(&known);
        assert_eq!(strip_known_suffix("astro_hunt_alt_line", &ordered), Some("astro_hunt"));
        assert_eq!(strip_known_suffix("_line", &ordered), None);
        assert_eq!(strip_known_suffix("astro_hunt_caption", &ordered), None);
    }

    #[test]
    fn synthesizes_unused_keys_only() {
        let speakers = AliasTable::from_entries(vec![
            ("Astro", vec!["astro"]),
            ("Wraith", vec!["wraith"]),
        ]);
        let topics = AliasTable::default();
        let taxonomy = Taxonomy::builtin().unwrap();
        let classifier = Classifier::new(&speakers, &topics, &taxonomy.self_keywords);
        let dictionary: Dictionary = [
            ("astro_select_01_line", "Used by a real file."),
            ("astro_hunt_02_line", "Found you."),
            ("astro_hunt_02_alt_line", "Same stem again."),
            ("wraith_select_01_line", "Real stem, unused key."),
            ("foobar_select_01_line", "Unknown speaker."),
            ("astro_hunt_02_caption", "No known suffix."),
        ]
        .into_iter()
        .collect();
        let used: FxHashSet<String> = ["astro_select_01_line".to_string()].into_iter().collect();
        let real: FxHashSet<String> = ["astro_select_01".to_string(), "wraith_select_01".to_string()]
            .into_iter()
            .collect();
        let known = suffixes();
        let ordered = ordered_suffixes(&known);
        let outcome = synthesize(&dictionary, &used, &real, &ordered, &classifier);
        assert_eq!(outcome.lines.len(), 1);
        assert_eq!(outcome.lines[0].key, "astro_hunt_02_line");
        assert_eq!(outcome.lines[0].line.topic, "Hunt");
        assert_eq!(outcome.lines[0].text, "Found you.");
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(
            outcome.rejected[0].1,
            RejectionReason::UnknownSpeaker("Foobar".into())
        );
    }

    #[test]
    fn text_for_prefers_longest_suffix() {
        let dictionary: Dictionary = [
            ("astro_hunt_02_line", "short"),
            ("astro_hunt_02_alt_line", "long"),
        ]
        .into_iter()
        .collect();
        let known = suffixes();
        let ordered = ordered_suffixes(&known);
        let (key, text) = text_for(&dictionary, "Astro_Hunt_02", &ordered).unwrap();
        assert_eq!(key, "astro_hunt_02_alt_line");
        assert_eq!(text, "long");
    }
}
