use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use voxtax_core::{AliasTable, AudioFile, Batch, Dictionary, Taxonomy};

use crate::config::OrganizeJob;
use crate::ingest::discover_files;
use crate::logging;
use crate::model::{write_json, RunReport};

/// Vocabulary and taxonomy shared by every file of a run.
pub struct Tables {
    pub speakers: AliasTable,
    pub topics: AliasTable,
    pub taxonomy: Taxonomy,
}

impl Tables {
    pub fn load(characters: &str, topics: &str, taxonomy: Option<&str>) -> Result<Self> {
        let speakers = AliasTable::load(Path::new(characters))
            .with_context(|| format!("failed to load character aliases {characters}"))?;
        let topics = AliasTable::load(Path::new(topics))
            .with_context(|| format!("failed to load topic aliases {topics}"))?;
        let taxonomy = match taxonomy {
            Some(path) => Taxonomy::load(Path::new(path))
                .with_context(|| format!("failed to load taxonomy {path}"))?,
            None => Taxonomy::builtin().context("built-in taxonomy is invalid")?,
        };
        Ok(Self {
            speakers,
            topics,
            taxonomy,
        })
    }
}

pub fn run(job: OrganizeJob) -> Result<()> {
    run_with(job, discover_files)
}

fn run_with<F>(job: OrganizeJob, discover_fn: F) -> Result<()>
where
    F: Fn(&Path, &str) -> Result<Vec<AudioFile>>,
{
    let source = PathBuf::from(&job.source);
    if !source.exists() {
        return Err(anyhow!("source path {} does not exist", source.display()));
    }
    let tables = Tables::load(&job.characters, &job.topics, job.taxonomy.as_deref())?;
    let dictionary = job
        .dictionary
        .as_deref()
        .map(|path| {
            Dictionary::load(Path::new(path))
                .with_context(|| format!("failed to load dictionary {path}"))
        })
        .transpose()?;
    if let Some(dictionary) = &dictionary {
        if dictionary.is_empty() {
            logging::stage("phantom", "dictionary has no \"key\" \"value\" lines");
        } else {
            logging::stage("phantom", format!("loaded {} dictionary entries", dictionary.len()));
        }
    }
    if dictionary.is_some() && job.known_suffixes.is_empty() {
        logging::stage(
            "phantom",
            "dictionary given without --suffix; no keys can be matched",
        );
    }

    let files = discover_fn(&source, &job.pattern)?;
    logging::stage(
        "discover",
        format!(
            "{} files matched '{}' under {}",
            files.len(),
            job.pattern,
            source.display()
        ),
    );

    let mut batch = Batch::new(&tables.speakers, &tables.topics, &tables.taxonomy)
        .with_options(job.options);
    if let Some(dictionary) = &dictionary {
        batch = batch.with_dictionary(dictionary, &job.known_suffixes);
    }
    let report = batch.run(&files);
    let stats = report.stats;
    logging::stage(
        "classify",
        format!(
            "processed {} accepted {} disregarded {} skipped {} excluded {} ({:.1}% coverage)",
            stats.processed,
            stats.accepted,
            stats.disregarded,
            stats.skipped,
            stats.excluded,
            stats.coverage() * 100.0
        ),
    );
    if dictionary.is_some() {
        logging::stage("phantom", format!("filed {} text-only entries", stats.phantoms));
    }
    let unique = report.disregarded.unique();
    if !unique.is_empty() {
        let names: Vec<&str> = unique.iter().map(|name| name.token.as_str()).collect();
        logging::stage(
            "classify",
            format!("disregarded names: {}", names.join(", ")),
        );
    }

    let output = Path::new(&job.output);
    write_json(output, &report.tree)?;
    logging::stage("write", format!("tree written to {}", output.display()));
    if let Some(path) = &job.report {
        write_json(Path::new(path), &RunReport::from_batch(&job.source, &report))?;
        logging::stage("write", format!("report written to {path}"));
    }
    Ok(())
}
