mod alias;
mod batch;
mod classify;
mod dictionary;
mod error;
mod line;
mod phantom;
mod placement;
mod taxonomy;
mod text;
mod tree;
mod variation;

pub use alias::AliasTable;
pub use batch::{
    is_nonverbal, AudioFile, Batch, BatchOptions, BatchReport, BatchStats, SkippedFile,
    NONVERBAL_MARKERS,
};
pub use classify::{Classifier, Rule, CASCADE, SELF_TOKEN};
pub use dictionary::{detect_suffixes, Dictionary, SuffixCount};
pub use error::{Result, VoxError};
pub use line::{DecodedLine, DisregardedLog, DisregardedName, RejectionReason, Relationship, Role};
pub use phantom::{ordered_suffixes, strip_known_suffix, synthesize, text_for, PhantomLine, PhantomOutcome};
pub use placement::{place, Placement};
pub use taxonomy::{
    Category, CategoryTable, Taxonomy, EFFORT, EMOTIONS, ITEM_USAGE, PAIN, PINGS, SELF_SUBJECT,
};
pub use text::{capitalize, humanize, keyword_key};
pub use tree::{LineRecord, Node, TaxonomyTree};
pub use variation::{strip_all_variations, strip_variation, DEFAULT_VARIATION};
