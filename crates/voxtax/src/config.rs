use std::env;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use voxtax_core::BatchOptions;

pub const DEFAULT_PATTERN: &str = "*.mp3";

/// Everything one `organize` pass needs, whether it came from flags or a run config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizeJob {
    pub source: String,
    pub characters: String,
    pub topics: String,
    pub output: String,
    pub pattern: String,
    pub taxonomy: Option<String>,
    pub dictionary: Option<String>,
    pub known_suffixes: Vec<String>,
    pub report: Option<String>,
    pub options: BatchOptions,
}

#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub source: String,
    pub output: String,
    #[serde(default = "default_pattern")]
    pub pattern: String,
    #[serde(default)]
    pub dictionary: Option<String>,
    #[serde(default)]
    pub report: Option<String>,
}

fn default_pattern() -> String {
    DEFAULT_PATTERN.to_string()
}

#[derive(Debug, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub topics: Option<String>,
    #[serde(default)]
    pub taxonomy: Option<String>,
    #[serde(default)]
    pub known_suffixes: Vec<String>,
    #[serde(default)]
    pub exclude_pings: bool,
    #[serde(default)]
    pub exclude_nonverbal: bool,
    pub jobs: Vec<JobConfig>,
}

impl RunConfig {
    /// Expands each job with the shared tables and options; alias table
    /// paths fall back to `VOXTAX_CHARACTERS` / `VOXTAX_TOPICS`.
    pub fn organize_jobs(&self) -> Result<Vec<OrganizeJob>> {
        let characters = table_path(self.characters.as_deref(), "characters", "VOXTAX_CHARACTERS")?;
        let topics = table_path(self.topics.as_deref(), "topics", "VOXTAX_TOPICS")?;
        let options = BatchOptions {
            exclude_pings: self.exclude_pings,
            exclude_nonverbal: self.exclude_nonverbal,
        };
        Ok(self
            .jobs
            .iter()
            .map(|job| OrganizeJob {
                source: job.source.clone(),
                characters: characters.clone(),
                topics: topics.clone(),
                output: job.output.clone(),
                pattern: job.pattern.clone(),
                taxonomy: self.taxonomy.clone(),
                dictionary: job.dictionary.clone(),
                known_suffixes: self.known_suffixes.clone(),
                report: job.report.clone(),
                options,
            })
            .collect())
    }
}

fn table_path(configured: Option<&str>, field: &str, var: &str) -> Result<String> {
    if let Some(path) = configured.filter(|path| !path.trim().is_empty()) {
        return Ok(path.to_string());
    }
    env::var(var)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .ok_or_else(|| anyhow!("run config is missing `{field}` and {var} is not set"))
}
