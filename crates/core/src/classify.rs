//! Filename decoding.
//!
//! A stem is matched against [`CASCADE`], an ordered rule table; the first
//! rule whose predicate holds splits the stem into speaker, remainder and a
//! [`Branch`] describing how subject and topic are pulled out of the
//! remainder. Validation and normalization are shared by every rule.

use tracing::debug;

use crate::alias::AliasTable;
use crate::line::{DecodedLine, RejectionReason, Relationship};
use crate::taxonomy::SELF_SUBJECT;
use crate::text::{capitalize, humanize};
use crate::variation::{
    clean_candidate, clean_ping_text, is_match_phase, is_variation_suffix, strip_all_variations,
    strip_trailing_tokens, strip_variation,
};

/// Raw subject token for self-referential lines.
pub const SELF_TOKEN: &str = "self";

const GENERIC_MIN_TOKENS: usize = 4;
const SELF_PREFIXES: [&str; 3] = ["use_", "effort_", "pain_"];
// never the second half of a two-token speaker name
const MARKER_TOKENS: [&str; 4] = ["bespoke", "ally", "enemy", "ping"];
const MARKERS: [&str; 6] = [
    "_bespoke_ally_",
    "_bespoke_enemy_",
    "_bespoke_",
    "_ally_",
    "_enemy_",
    "_ping_",
];
const PING_MARKER: &str = "_ping_";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    SpiritJar,
    Newscaster,
    ShopkeeperHotdog,
    BespokeAbilityLine,
    BespokeAlly,
    BespokeEnemy,
    Bespoke,
    Ally,
    Enemy,
    Ping,
    SelfKeyword,
    SelfPrefix,
    Generic,
}

/// Evaluation order; the first matching rule wins.
pub const CASCADE: [Rule; 13] = [
    Rule::SpiritJar,
    Rule::Newscaster,
    Rule::ShopkeeperHotdog,
    Rule::BespokeAbilityLine,
    Rule::BespokeAlly,
    Rule::BespokeEnemy,
    Rule::Bespoke,
    Rule::Ally,
    Rule::Enemy,
    Rule::Ping,
    Rule::SelfKeyword,
    Rule::SelfPrefix,
    Rule::Generic,
];

impl Rule {
    pub fn name(self) -> &'static str {
        match self {
            Rule::SpiritJar => "spirit_jar",
            Rule::Newscaster => "newscaster",
            Rule::ShopkeeperHotdog => "shopkeeper_hotdog",
            Rule::BespokeAbilityLine => "bespoke_ability_line",
            Rule::BespokeAlly => "bespoke_ally",
            Rule::BespokeEnemy => "bespoke_enemy",
            Rule::Bespoke => "bespoke",
            Rule::Ally => "ally",
            Rule::Enemy => "enemy",
            Rule::Ping => "ping",
            Rule::SelfKeyword => "self_keyword",
            Rule::SelfPrefix => "self_prefix",
            Rule::Generic => "generic",
        }
    }

    /// Infix marker, relationship and bespoke flag for the marker rules.
    fn marker(self) -> Option<(&'static str, Relationship, bool)> {
        match self {
            Rule::BespokeAlly => Some(("_bespoke_ally_", Relationship::Ally, true)),
            Rule::BespokeEnemy => Some(("_bespoke_enemy_", Relationship::Enemy, true)),
            Rule::Bespoke => Some(("_bespoke_", Relationship::None, true)),
            Rule::Ally => Some(("_ally_", Relationship::Ally, false)),
            Rule::Enemy => Some(("_enemy_", Relationship::Enemy, false)),
            _ => None,
        }
    }

    fn split(self, stem: &str, head: &Head<'_>, classifier: &Classifier<'_>) -> Option<Split> {
        if let Some((marker, relationship, bespoke)) = self.marker() {
            let (before, rest) = split_at_marker(stem, marker)?;
            let speaker = if bespoke {
                format!("{before}_bespoke")
            } else {
                before.to_string()
            };
            // a longer unknown prefix is topic text, not a speaker
            let plausible = before == head.speaker
                || classifier.speakers.is_valid(before)
                || classifier.speakers.is_valid(&speaker);
            if !plausible {
                return None;
            }
            let branch = if bespoke {
                Branch::Bespoke
            } else {
                Branch::Relational
            };
            return Some(Split::new(speaker, rest, branch).with_relationship(relationship));
        }
        match self {
            Rule::SpiritJar => {
                let rest = stem.strip_prefix("spirit_jar_")?;
                let topic = strip_all_variations(rest);
                Some(Split::new("spirit_jar", rest, Branch::fixed(SELF_TOKEN, topic)))
            }
            Rule::Newscaster => {
                let rest = stem.strip_prefix("newscaster_")?;
                let base = strip_all_variations(rest);
                let parts: Vec<&str> = base.split('_').collect();
                let branch = match parts.as_slice() {
                    ["headline", ..] => Branch::fixed(SELF_TOKEN, "headline"),
                    ["seasonal", "headline", ..] => Branch::fixed(SELF_TOKEN, "seasonal_headline"),
                    ["seasonal", character, "unlock", ..] => {
                        Branch::fixed(*character, "seasonal_unlock")
                    }
                    _ => return None,
                };
                Some(Split::new("newscaster", rest, branch))
            }
            Rule::ShopkeeperHotdog => {
                let rest = stem.strip_prefix("shopkeeper_hotdog_")?;
                let base = strip_all_variations(rest);
                if base.is_empty() {
                    return None;
                }
                let parts: Vec<&str> = base.split('_').collect();
                let branch = match parts.as_slice() {
                    ["t4", character, tail @ ..] => {
                        let topic = std::iter::once("t4")
                            .chain(tail.iter().copied())
                            .collect::<Vec<_>>()
                            .join("_");
                        Branch::fixed(*character, topic)
                    }
                    _ => Branch::fixed(SELF_TOKEN, base.clone()),
                };
                Some(Split::new("shopkeeper_hotdog", rest, branch))
            }
            Rule::BespokeAbilityLine => {
                let (speaker, tail) = stem.split_once('_')?;
                let matches = tail == "bespoke_ability_line"
                    || tail.starts_with("bespoke_ability_line_");
                if !matches || !classifier.speakers.is_valid(speaker) {
                    return None;
                }
                Some(Split::new(
                    speaker,
                    tail,
                    Branch::fixed(SELF_TOKEN, "bespoke_ability_line"),
                ))
            }
            Rule::Ping => {
                let (speaker, rest) = split_at_marker(stem, PING_MARKER)?;
                if !classifier.speakers.is_valid(speaker) {
                    return None;
                }
                let branch = if is_match_phase(rest) {
                    Branch::SelfLine
                } else {
                    Branch::Ping
                };
                Some(Split::new(speaker, rest, branch))
            }
            Rule::SelfKeyword => {
                let tail = head.tail;
                let hit = classifier.self_keywords.iter().any(|keyword| {
                    tail == keyword.as_str()
                        || tail
                            .strip_prefix(keyword.as_str())
                            .and_then(|suffix| suffix.strip_prefix('_'))
                            .is_some_and(is_variation_suffix)
                });
                hit.then(|| Split::new(head.speaker, tail, Branch::SelfLine))
            }
            Rule::SelfPrefix => SELF_PREFIXES
                .iter()
                .any(|prefix| head.tail.starts_with(prefix))
                .then(|| Split::new(head.speaker, head.tail, Branch::SelfLine)),
            Rule::Generic => classifier.generic(stem, head),
            _ => None,
        }
    }
}

/// Speaker and remainder around `marker`, provided no other marker occurs
/// earlier in the stem; at equal offsets the cascade order decides.
fn split_at_marker<'s>(stem: &'s str, marker: &str) -> Option<(&'s str, &'s str)> {
    let at = stem.find(marker).filter(|&at| at > 0)?;
    let earliest = MARKERS.iter().filter_map(|m| stem.find(m)).min()?;
    (at == earliest).then(|| (&stem[..at], &stem[at + marker.len()..]))
}

/// How subject and topic are extracted from the variation-stripped remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Branch {
    /// `<topic>_<subject>`, split on the last underscore.
    Bespoke,
    /// `<subject>_<topic>` after an ally/enemy marker.
    Relational,
    Ping,
    SelfLine,
    /// Subject and topic already decided by the rule.
    Fixed { subject: String, topic: String },
}

impl Branch {
    fn fixed(subject: impl Into<String>, topic: impl Into<String>) -> Self {
        Branch::Fixed {
            subject: subject.into(),
            topic: topic.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Split {
    speaker: String,
    rest: String,
    relationship: Relationship,
    branch: Branch,
}

impl Split {
    fn new(speaker: impl Into<String>, rest: impl Into<String>, branch: Branch) -> Self {
        Self {
            speaker: speaker.into(),
            rest: rest.into(),
            relationship: Relationship::None,
            branch,
        }
    }

    fn with_relationship(mut self, relationship: Relationship) -> Self {
        self.relationship = relationship;
        self
    }
}

/// Speaker candidate and the text after it (without the joining underscore).
#[derive(Debug, Clone, Copy)]
struct Head<'s> {
    speaker: &'s str,
    tail: &'s str,
}

/// Decodes stems against a character vocabulary and topic aliases.
#[derive(Debug, Clone, Copy)]
pub struct Classifier<'a> {
    speakers: &'a AliasTable,
    topics: &'a AliasTable,
    self_keywords: &'a [String],
}

impl<'a> Classifier<'a> {
    /// `self_keywords` must already be ordered longest first.
    pub fn new(speakers: &'a AliasTable, topics: &'a AliasTable, self_keywords: &'a [String]) -> Self {
        Self {
            speakers,
            topics,
            self_keywords,
        }
    }

    /// First rule in [`CASCADE`] that accepts `stem`.
    pub fn matching_rule(&self, stem: &str) -> Option<Rule> {
        let stem = stem.to_lowercase();
        let head = self.head(&stem);
        CASCADE
            .iter()
            .copied()
            .find(|rule| rule.split(&stem, &head, self).is_some())
    }

    pub fn classify(&self, stem: &str) -> Result<DecodedLine, RejectionReason> {
        let lowered = stem.to_lowercase();
        let head = self.head(&lowered);
        let matched = CASCADE
            .iter()
            .find_map(|rule| rule.split(&lowered, &head, self).map(|split| (*rule, split)));
        let Some((rule, split)) = matched else {
            debug!(stem, "no rule matched");
            return Err(RejectionReason::NoPatternMatch);
        };
        let outcome = self.finish(split, stem);
        match &outcome {
            Ok(line) => debug!(
                stem,
                rule = rule.name(),
                speaker = %line.speaker,
                subject = %line.subject,
                topic = %line.topic,
                "classified"
            ),
            Err(reason) => debug!(stem, rule = rule.name(), %reason, "rejected"),
        }
        outcome
    }

    /// First token, or the first two when that pair is a known speaker.
    fn head<'s>(&self, stem: &'s str) -> Head<'s> {
        let mut cuts = stem.match_indices('_').map(|(idx, _)| idx);
        let Some(first) = cuts.next() else {
            return Head {
                speaker: stem,
                tail: "",
            };
        };
        let second = cuts.next().unwrap_or(stem.len());
        let pair_token = &stem[first + 1..second];
        if !MARKER_TOKENS.contains(&pair_token) && self.speakers.is_valid(&stem[..second]) {
            Head {
                speaker: &stem[..second],
                tail: stem.get(second + 1..).unwrap_or(""),
            }
        } else {
            Head {
                speaker: &stem[..first],
                tail: &stem[first + 1..],
            }
        }
    }

    /// `speaker_topic_on_subject` or `speaker_topic_subject`.
    fn generic(&self, stem: &str, head: &Head<'_>) -> Option<Split> {
        if stem.split('_').count() < GENERIC_MIN_TOKENS {
            return None;
        }
        let tokens: Vec<&str> = head.tail.split('_').collect();
        let (topic, subject) = match tokens.iter().position(|token| *token == "on") {
            Some(on) => {
                let topic = if on == 0 {
                    "on".to_string()
                } else {
                    tokens[..on].join("_")
                };
                let subject_tokens = strip_trailing_tokens(&tokens[on + 1..]);
                let subject = self
                    .longest_valid_prefix(&subject_tokens)
                    .unwrap_or_else(|| {
                        if subject_tokens.is_empty() {
                            SELF_TOKEN.to_string()
                        } else {
                            subject_tokens.join("_")
                        }
                    });
                (topic, subject)
            }
            None => {
                let subject_tokens = strip_trailing_tokens(&tokens[1..]);
                let subject = self
                    .longest_valid_prefix(&subject_tokens)
                    .unwrap_or_else(|| {
                        if subject_tokens.is_empty() {
                            tokens.get(1).copied().unwrap_or_default().to_string()
                        } else {
                            subject_tokens.join("_")
                        }
                    });
                (tokens[0].to_string(), subject)
            }
        };
        Some(Split::new(head.speaker, head.tail, Branch::fixed(subject, topic)))
    }

    fn longest_valid_prefix(&self, tokens: &[&str]) -> Option<String> {
        (1..=tokens.len())
            .rev()
            .map(|len| tokens[..len].join("_"))
            .find(|candidate| self.speakers.is_valid(candidate))
    }

    fn finish(&self, split: Split, source: &str) -> Result<DecodedLine, RejectionReason> {
        if !self.speakers.is_valid(&split.speaker) {
            return Err(RejectionReason::UnknownSpeaker(capitalize(&split.speaker)));
        }
        let is_ping = split.branch == Branch::Ping;
        let (base, variation) = strip_variation(&split.rest);
        let (subject, topic) = match split.branch {
            Branch::Bespoke => {
                let (topic, subject) = base
                    .rsplit_once('_')
                    .ok_or(RejectionReason::NoPatternMatch)?;
                (subject.to_string(), topic.to_string())
            }
            Branch::Relational => self.relational(&base)?,
            Branch::Ping => self.ping(&base),
            Branch::SelfLine => (SELF_TOKEN.to_string(), strip_all_variations(&split.rest)),
            Branch::Fixed { subject, topic } => (subject, topic),
        };
        if topic.is_empty() || subject.is_empty() {
            return Err(RejectionReason::NoPatternMatch);
        }
        let is_self = subject == SELF_TOKEN;
        if !is_self && !self.speakers.is_valid(&subject) {
            return Err(RejectionReason::UnknownSubject(capitalize(&subject)));
        }
        let mut topic = self.normalize_topic(&topic);
        if let Some(label) = split.relationship.label() {
            topic = format!("{topic} ({label})");
        }
        Ok(DecodedLine {
            speaker: self.speakers.canonicalize(&split.speaker),
            subject: if is_self {
                SELF_SUBJECT.to_string()
            } else {
                self.speakers.canonicalize(&subject)
            },
            topic,
            relationship: split.relationship,
            variation,
            is_ping,
            is_self,
            source_ref: source.to_string(),
        })
    }

    /// Leading subject, preferring the longest known multi-token name.
    fn relational(&self, base: &str) -> Result<(String, String), RejectionReason> {
        let tokens: Vec<&str> = base.split('_').collect();
        if tokens.len() < 2 {
            return Err(RejectionReason::NoPatternMatch);
        }
        let take = (1..tokens.len())
            .rev()
            .find(|&len| self.speakers.is_valid(&tokens[..len].join("_")))
            .unwrap_or(1);
        Ok((
            tokens[..take].join("_"),
            strip_all_variations(&tokens[take..].join("_")),
        ))
    }

    fn ping(&self, base: &str) -> (String, String) {
        let parts: Vec<&str> = base.split('_').collect();
        let valid = |candidate: &str| self.speakers.is_valid(candidate);
        let (subject, topic) = if parts.len() >= 3 && parts[0] == "see" && valid(parts[1]) {
            (parts[1].to_string(), format!("see_{}", parts[2..].join("_")))
        } else {
            let leading = (1..=parts.len()).rev().find_map(|len| {
                let cleaned = clean_candidate(&parts[..len].join("_"));
                valid(&cleaned).then(|| (cleaned, parts[len..].join("_")))
            });
            let trailing = || {
                (1..parts.len()).find_map(|start| {
                    let cleaned = clean_candidate(&parts[start..].join("_"));
                    valid(&cleaned).then(|| (cleaned, parts[..start].join("_")))
                })
            };
            leading
                .or_else(trailing)
                .unwrap_or_else(|| (SELF_TOKEN.to_string(), base.to_string()))
        };
        (clean_ping_text(&subject), clean_ping_text(&topic))
    }

    /// Alias lookup, else underscores to spaces with a capital first letter.
    fn normalize_topic(&self, raw: &str) -> String {
        let raw = match raw.strip_prefix("ping").map(|rest| rest.trim_start_matches('_')) {
            Some(rest) if !rest.is_empty() => format!("ping_{rest}"),
            Some(_) => "ping".to_string(),
            None => raw.to_string(),
        };
        match self.topics.lookup(&raw) {
            Some(canonical) => canonical.to_string(),
            None => humanize(&raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taxonomy::Taxonomy;

    fn speakers() -> AliasTable {
        AliasTable::from_entries(vec![
            ("Astro", vec!["astro"]),
            ("Astro Bespoke", vec!["astro_bespoke"]),
            ("Operative", vec!["operative"]),
            ("Bebop", vec!["bebop"]),
            ("Wraith", vec!["wraith"]),
            ("Lady Geist", vec!["lady_geist", "ghost"]),
            ("Spirit Jar", vec!["spirit_jar"]),
            ("Newscaster", vec!["newscaster"]),
            ("Shopkeeper", vec!["shopkeeper_hotdog"]),
            ("Boss Man", vec!["the_boss_man"]),
        ])
    }

    fn run(stem: &str) -> Result<DecodedLine, RejectionReason> {
        let speakers = speakers();
        let topics = AliasTable::from_entries(vec![("Hero Select", vec!["hs_select"])]);
        let taxonomy = Taxonomy::builtin().unwrap();
        Classifier::new(&speakers, &topics, &taxonomy.self_keywords).classify(stem)
    }

    fn rule_for(stem: &str) -> Option<Rule> {
        let speakers = speakers();
        let topics = AliasTable::default();
        let taxonomy = Taxonomy::builtin().unwrap();
        Classifier::new(&speakers, &topics, &taxonomy.self_keywords).matching_rule(stem)
    }

    #[test]
    fn relationship_marker_line() {
        let line = run("astro_ally_operative_kill_01").unwrap();
        assert_eq!(line.speaker, "Astro");
        assert_eq!(line.subject, "Operative");
        assert_eq!(line.topic, "Kill (ally)");
        assert_eq!(line.relationship, Relationship::Ally);
        assert_eq!(line.variation, "01");
        assert!(!line.is_ping && !line.is_self);
        assert_eq!(line.source_ref, "astro_ally_operative_kill_01");
    }

    #[test]
    fn unmatched_ping_defaults_to_self() {
        let line = run("bebop_ping_attack_enemy_avatar").unwrap();
        assert!(line.is_ping);
        assert!(line.is_self);
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Attack enemy avatar");
        assert_eq!(line.relationship, Relationship::None);
    }

    #[test]
    fn self_keyword_line() {
        let line = run("wraith_select_01").unwrap();
        assert_eq!(line.speaker, "Wraith");
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Select");
        assert_eq!(rule_for("wraith_select_01"), Some(Rule::SelfKeyword));
    }

    #[test]
    fn unknown_speaker_is_rejected() {
        assert_eq!(
            run("foobar_ally_astro_kill_01"),
            Err(RejectionReason::UnknownSpeaker("Foobar".into()))
        );
    }

    #[test]
    fn unknown_subject_is_rejected() {
        assert_eq!(
            run("astro_enemy_foobar_kill_01"),
            Err(RejectionReason::UnknownSubject("Foobar".into()))
        );
    }

    #[test]
    fn two_token_speaker_and_subject() {
        let line = run("lady_geist_enemy_astro_hunt_02").unwrap();
        assert_eq!(line.speaker, "Lady Geist");
        assert_eq!(line.subject, "Astro");
        assert_eq!(line.topic, "Hunt (enemy)");
        assert_eq!(line.variation, "02");

        let line = run("astro_ally_lady_geist_thanks_03_alt").unwrap();
        assert_eq!(line.subject, "Lady Geist");
        assert_eq!(line.topic, "Thanks (ally)");
        assert_eq!(line.variation, "03");
    }

    #[test]
    fn ping_subject_from_leading_window() {
        let line = run("astro_ping_operative_attack_alt_01").unwrap();
        assert!(line.is_ping);
        assert_eq!(line.subject, "Operative");
        assert_eq!(line.topic, "Attack");
    }

    #[test]
    fn ping_subject_from_trailing_window() {
        let line = run("astro_ping_need_help_wraith_02").unwrap();
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "Need help");
    }

    #[test]
    fn see_ping_pins_subject() {
        let line = run("astro_ping_see_wraith_on_roof_01").unwrap();
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "See on roof");
    }

    #[test]
    fn match_phase_ping_is_a_self_line() {
        let line = run("astro_ping_pre_game_01").unwrap();
        assert!(!line.is_ping);
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Pre game");
    }

    #[test]
    fn ping_requires_known_speaker() {
        assert_eq!(
            run("foobar_ping_attack_01"),
            Err(RejectionReason::UnknownSpeaker("Foobar".into()))
        );
        assert_eq!(rule_for("foobar_ping_attack_01"), Some(Rule::Generic));
    }

    #[test]
    fn ping_without_topic_is_skipped() {
        assert_eq!(run("astro_ping_operative_01"), Err(RejectionReason::NoPatternMatch));
    }

    #[test]
    fn self_prefix_lines() {
        let line = run("astro_pain_big_03").unwrap();
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Pain big");
        assert_eq!(rule_for("astro_use_stim_pack_01"), Some(Rule::SelfPrefix));
    }

    #[test]
    fn chained_variations_are_stripped_from_self_topics() {
        let line = run("wraith_select_13_alt_01").unwrap();
        assert_eq!(line.topic, "Select");
        assert_eq!(line.variation, "01");
    }

    #[test]
    fn generic_on_form() {
        let line = run("astro_hunt_on_wraith_01").unwrap();
        assert_eq!(rule_for("astro_hunt_on_wraith_01"), Some(Rule::Generic));
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "Hunt");
        assert_eq!(line.variation, "01");
    }

    #[test]
    fn generic_classic_form_prefers_longest_name() {
        let line = run("astro_taunt_lady_geist_short_01").unwrap();
        assert_eq!(line.subject, "Lady Geist");
        assert_eq!(line.topic, "Taunt");
    }

    #[test]
    fn leading_ping_in_topic_is_rewritten() {
        let line = run("astro_pingcheck_wraith_01").unwrap();
        assert_eq!(line.topic, "Ping check");
    }

    #[test]
    fn bespoke_marker_keys_the_speaker() {
        let line = run("astro_bespoke_ally_tease_wraith_02").unwrap();
        assert_eq!(line.speaker, "Astro Bespoke");
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "Tease (ally)");
        assert_eq!(line.variation, "02");
    }

    #[test]
    fn bespoke_ability_line_is_self() {
        let line = run("astro_bespoke_ability_line_13").unwrap();
        assert_eq!(line.speaker, "Astro");
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Bespoke ability line");
        assert_eq!(rule_for("astro_bespoke_ability_line_13"), Some(Rule::BespokeAbilityLine));
    }

    #[test]
    fn newscaster_forms() {
        let line = run("newscaster_seasonal_wraith_unlock_01").unwrap();
        assert_eq!(line.speaker, "Newscaster");
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "Seasonal unlock");

        let line = run("newscaster_headline_03_alt_01").unwrap();
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Headline");

        assert_eq!(run("newscaster_random_01"), Err(RejectionReason::NoPatternMatch));
    }

    #[test]
    fn shopkeeper_forms() {
        let line = run("shopkeeper_hotdog_t4_wraith_buy_item_02").unwrap();
        assert_eq!(line.speaker, "Shopkeeper");
        assert_eq!(line.subject, "Wraith");
        assert_eq!(line.topic, "T4 buy item");

        let line = run("shopkeeper_hotdog_call_out_01").unwrap();
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Call out");
    }

    #[test]
    fn long_speaker_before_relationship_marker() {
        let line = run("the_boss_man_ally_astro_kill_01").unwrap();
        assert_eq!(rule_for("the_boss_man_ally_astro_kill_01"), Some(Rule::Ally));
        assert_eq!(line.speaker, "Boss Man");
        assert_eq!(line.subject, "Astro");
        assert_eq!(line.relationship, Relationship::Ally);
        assert_eq!(line.topic, "Kill (ally)");
    }

    #[test]
    fn long_speaker_before_ping_marker() {
        let line = run("the_boss_man_ping_attack_01").unwrap();
        assert_eq!(rule_for("the_boss_man_ping_attack_01"), Some(Rule::Ping));
        assert_eq!(line.speaker, "Boss Man");
        assert!(line.is_ping);
        assert_eq!(line.subject, "Self");
        assert_eq!(line.topic, "Attack");
    }

    #[test]
    fn earliest_marker_decides() {
        assert_eq!(rule_for("bebop_ping_attack_enemy_avatar"), Some(Rule::Ping));
        assert_eq!(rule_for("wraith_use_power4_as_enemy_01"), Some(Rule::SelfKeyword));
        let line = run("wraith_use_power4_as_enemy_01").unwrap();
        assert_eq!(line.speaker, "Wraith");
        assert_eq!(line.relationship, Relationship::None);
    }

    #[test]
    fn bare_ping_topic_has_no_trailing_space() {
        let line = run("astro_ping_ping_01").unwrap();
        assert_eq!(line.topic, "Ping");
    }

    #[test]
    fn spirit_jar_topic() {
        let line = run("spirit_jar_voice_line_alt_02").unwrap();
        assert_eq!(line.speaker, "Spirit Jar");
        assert_eq!(line.topic, "Voice line");
        assert_eq!(line.variation, "02");
    }

    #[test]
    fn topic_aliases_apply() {
        let line = run("wraith_hs_select_02").unwrap();
        assert_eq!(line.topic, "Hero Select");
    }

    #[test]
    fn short_stems_do_not_match() {
        assert_eq!(run("astro_01"), Err(RejectionReason::NoPatternMatch));
        assert_eq!(rule_for("astro_01"), None);
    }

    #[test]
    fn uppercase_stems_decode_like_lowercase() {
        let upper = run("ASTRO_ALLY_OPERATIVE_KILL_01").unwrap();
        let lower = run("astro_ally_operative_kill_01").unwrap();
        assert_eq!(upper.topic, lower.topic);
        assert_eq!(upper.subject, lower.subject);
    }
}
