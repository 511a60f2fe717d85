use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::taxonomy::SELF_SUBJECT;
use crate::text::keyword_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relationship {
    #[default]
    None,
    Ally,
    Enemy,
}

impl Relationship {
    pub fn label(self) -> Option<&'static str> {
        match self {
            Relationship::None => None,
            Relationship::Ally => Some("ally"),
            Relationship::Enemy => Some("enemy"),
        }
    }
}

/// A filename decoded into its semantic fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedLine {
    pub speaker: String,
    pub subject: String,
    pub topic: String,
    pub relationship: Relationship,
    pub variation: String,
    pub is_ping: bool,
    pub is_self: bool,
    pub source_ref: String,
}

impl DecodedLine {
    /// Topic without the ` (ally)` / ` (enemy)` decoration.
    pub fn base_topic(&self) -> &str {
        match self.relationship.label() {
            Some(label) => self
                .topic
                .strip_suffix(&format!(" ({label})"))
                .unwrap_or(self.topic.as_str()),
            None => self.topic.as_str(),
        }
    }

    /// Lowercase, underscore-joined key used for category lookups.
    pub fn topic_key(&self) -> String {
        keyword_key(self.base_topic())
    }

    pub fn is_self_subject(&self) -> bool {
        self.subject == SELF_SUBJECT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RejectionReason {
    NoPatternMatch,
    UnknownSpeaker(String),
    UnknownSubject(String),
}

impl RejectionReason {
    /// Vocabulary rejections are "disregarded"; grammar misses are "skipped".
    pub fn is_disregarded(&self) -> bool {
        !matches!(self, RejectionReason::NoPatternMatch)
    }
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::NoPatternMatch => write!(f, "no pattern match"),
            RejectionReason::UnknownSpeaker(token) => write!(f, "unknown speaker {token}"),
            RejectionReason::UnknownSubject(token) => write!(f, "unknown subject {token}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Speaker,
    Subject,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DisregardedName {
    pub token: String,
    pub role: Role,
}

/// Tokens missing from the character vocabulary, in the order they were met.
#[derive(Debug, Clone, Default)]
pub struct DisregardedLog {
    entries: Vec<DisregardedName>,
}

impl DisregardedLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the token carried by a vocabulary rejection; returns whether one was recorded.
    pub fn observe(&mut self, reason: &RejectionReason) -> bool {
        let (token, role) = match reason {
            RejectionReason::UnknownSpeaker(token) => (token, Role::Speaker),
            RejectionReason::UnknownSubject(token) => (token, Role::Subject),
            RejectionReason::NoPatternMatch => return false,
        };
        self.entries.push(DisregardedName {
            token: token.clone(),
            role,
        });
        true
    }

    /// Sorted, de-duplicated view for operator review.
    pub fn unique(&self) -> BTreeSet<DisregardedName> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
