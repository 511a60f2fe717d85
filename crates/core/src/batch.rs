use rayon::prelude::*;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::alias::AliasTable;
use crate::classify::Classifier;
use crate::dictionary::Dictionary;
use crate::line::{DisregardedLog, RejectionReason};
use crate::phantom::{ordered_suffixes, synthesize, text_for};
use crate::placement::{place, Placement};
use crate::taxonomy::Taxonomy;
use crate::tree::{LineRecord, TaxonomyTree};

/// Stem fragments of breathing, grunting and pain sounds.
pub const NONVERBAL_MARKERS: [&str; 9] = [
    "_effort_dash_",
    "_effort_general_",
    "_effort_melee_big_",
    "_effort_melee_small_",
    "_pain_akira_laser_",
    "_pain_big_",
    "_pain_death_",
    "_pain_low_health_",
    "_pain_small_",
];

/// A discovered audio file: its stem and its `/`-separated path relative
/// to the source root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AudioFile {
    pub stem: String,
    pub reference: String,
}

impl AudioFile {
    pub fn new(stem: impl Into<String>, reference: impl Into<String>) -> Self {
        Self {
            stem: stem.into(),
            reference: reference.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOptions {
    #[serde(default)]
    pub exclude_pings: bool,
    #[serde(default)]
    pub exclude_nonverbal: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    pub processed: usize,
    pub accepted: usize,
    pub disregarded: usize,
    pub skipped: usize,
    pub excluded: usize,
    pub phantoms: usize,
}

impl BatchStats {
    /// Share of processed files that made it into the tree.
    pub fn coverage(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.processed as f64
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedFile {
    pub reference: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    pub tree: TaxonomyTree,
    pub stats: BatchStats,
    pub disregarded: DisregardedLog,
    pub skipped: Vec<SkippedFile>,
}

enum Outcome {
    Accepted(Placement),
    Rejected(RejectionReason),
    Excluded,
}

/// One run over a pre-enumerated file list. The tree is built from scratch
/// on every call to [`Batch::run`].
pub struct Batch<'a> {
    taxonomy: &'a Taxonomy,
    classifier: Classifier<'a>,
    options: BatchOptions,
    dictionary: Option<&'a Dictionary>,
    known_suffixes: Vec<&'a str>,
}

impl<'a> Batch<'a> {
    pub fn new(speakers: &'a AliasTable, topics: &'a AliasTable, taxonomy: &'a Taxonomy) -> Self {
        Self {
            taxonomy,
            classifier: Classifier::new(speakers, topics, &taxonomy.self_keywords),
            options: BatchOptions::default(),
            dictionary: None,
            known_suffixes: Vec::new(),
        }
    }

    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_dictionary(mut self, dictionary: &'a Dictionary, known_suffixes: &'a [String]) -> Self {
        self.dictionary = Some(dictionary);
        self.known_suffixes = ordered_suffixes(known_suffixes);
        self
    }

    pub fn run(&self, files: &[AudioFile]) -> BatchReport {
        // classification is independent per file; insertion stays in input order
        let outcomes: Vec<Outcome> = files
            .par_iter()
            .map(|file| self.evaluate(&file.stem))
            .collect();

        let mut tree = TaxonomyTree::new();
        let mut stats = BatchStats::default();
        let mut disregarded = DisregardedLog::new();
        let mut skipped = Vec::new();
        let mut used_keys: FxHashSet<String> = FxHashSet::default();

        for (file, outcome) in files.iter().zip(outcomes) {
            stats.processed += 1;
            match outcome {
                Outcome::Excluded => stats.excluded += 1,
                Outcome::Rejected(reason) => {
                    if disregarded.observe(&reason) {
                        stats.disregarded += 1;
                    } else {
                        stats.skipped += 1;
                        skipped.push(SkippedFile {
                            reference: file.reference.clone(),
                            reason: reason.to_string(),
                        });
                    }
                }
                Outcome::Accepted(placement) => {
                    let text = self.dictionary.and_then(|dictionary| {
                        let (key, text) = text_for(dictionary, &file.stem, &self.known_suffixes)?;
                        used_keys.insert(key);
                        Some(text.to_string())
                    });
                    let record = LineRecord::real(file.reference.clone(), text);
                    match file_record(&mut tree, &placement, record) {
                        Ok(()) => stats.accepted += 1,
                        Err(err) => {
                            warn!(reference = %file.reference, %err, "skipping file");
                            stats.skipped += 1;
                            skipped.push(SkippedFile {
                                reference: file.reference.clone(),
                                reason: err.to_string(),
                            });
                        }
                    }
                }
            }
        }

        if let Some(dictionary) = self.dictionary {
            stats.phantoms = self.file_phantoms(&mut tree, dictionary, &used_keys, files);
        }

        tree.order_self_buckets(self.taxonomy);
        info!(
            processed = stats.processed,
            accepted = stats.accepted,
            disregarded = stats.disregarded,
            skipped = stats.skipped,
            excluded = stats.excluded,
            phantoms = stats.phantoms,
            "batch complete"
        );
        BatchReport {
            tree,
            stats,
            disregarded,
            skipped,
        }
    }

    fn evaluate(&self, stem: &str) -> Outcome {
        if self.options.exclude_nonverbal && is_nonverbal(stem) {
            return Outcome::Excluded;
        }
        match self.classifier.classify(stem) {
            Ok(line) if self.options.exclude_pings && line.is_ping => Outcome::Excluded,
            Ok(line) => Outcome::Accepted(place(&line, self.taxonomy)),
            Err(reason) => Outcome::Rejected(reason),
        }
    }

    fn file_phantoms(
        &self,
        tree: &mut TaxonomyTree,
        dictionary: &Dictionary,
        used_keys: &FxHashSet<String>,
        files: &[AudioFile],
    ) -> usize {
        let real_stems: FxHashSet<String> =
            files.iter().map(|file| file.stem.to_lowercase()).collect();
        let outcome = synthesize(
            dictionary,
            used_keys,
            &real_stems,
            &self.known_suffixes,
            &self.classifier,
        );
        let mut filed = 0;
        for phantom in outcome.lines {
            let stem = phantom.key.as_str();
            if self.options.exclude_nonverbal && is_nonverbal(stem) {
                continue;
            }
            if self.options.exclude_pings && phantom.line.is_ping {
                continue;
            }
            let placement = place(&phantom.line, self.taxonomy);
            match file_record(tree, &placement, LineRecord::phantom(phantom.text)) {
                Ok(()) => filed += 1,
                Err(err) => warn!(key = %phantom.key, %err, "skipping phantom"),
            }
        }
        info!(filed, rejected = outcome.rejected.len(), "phantom pass complete");
        filed
    }
}

/// Inserts at the primary path, then at the mirror path if there is one.
fn file_record(
    tree: &mut TaxonomyTree,
    placement: &Placement,
    record: LineRecord,
) -> crate::error::Result<()> {
    tree.insert(&placement.primary, record.clone())?;
    if let Some(mirror) = &placement.mirror {
        if let Err(err) = tree.insert(mirror, record) {
            warn!(%err, "mirror entry not filed");
        }
    }
    Ok(())
}

pub fn is_nonverbal(stem: &str) -> bool {
    let stem = stem.to_lowercase();
    NONVERBAL_MARKERS.iter().any(|marker| stem.contains(marker))
}
