use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use voxtax_core::{detect_suffixes, place, Classifier, Dictionary};

use crate::model::Classification;
use crate::organize::Tables;

pub fn classify(
    stems: Vec<String>,
    characters: String,
    topics: String,
    taxonomy: Option<String>,
) -> Result<()> {
    let tables = Tables::load(&characters, &topics, taxonomy.as_deref())?;
    let stdout = io::stdout();
    classify_to(&stems, &tables, &mut stdout.lock())
}

fn classify_to<W: Write>(stems: &[String], tables: &Tables, out: &mut W) -> Result<()> {
    let classifier = Classifier::new(
        &tables.speakers,
        &tables.topics,
        &tables.taxonomy.self_keywords,
    );
    let results: Vec<Classification> = stems
        .iter()
        .map(|stem| {
            let rule = classifier.matching_rule(stem).map(|rule| rule.name());
            match classifier.classify(stem) {
                Ok(line) => Classification {
                    stem: stem.clone(),
                    rule,
                    placement: Some(place(&line, &tables.taxonomy)),
                    line: Some(line),
                    rejection: None,
                },
                Err(reason) => Classification {
                    stem: stem.clone(),
                    rule,
                    line: None,
                    placement: None,
                    rejection: Some(reason.to_string()),
                },
            }
        })
        .collect();
    serde_json::to_writer_pretty(&mut *out, &results)?;
    writeln!(out)?;
    Ok(())
}

pub fn suffixes(dictionary: String, min: usize) -> Result<()> {
    let dict = Dictionary::load(Path::new(&dictionary))
        .with_context(|| format!("failed to load dictionary {dictionary}"))?;
    let stdout = io::stdout();
    suffixes_to(&dict, min, &mut stdout.lock())
}

fn suffixes_to<W: Write>(dictionary: &Dictionary, min: usize, out: &mut W) -> Result<()> {
    let found = detect_suffixes(dictionary.keys(), min);
    if found.is_empty() {
        writeln!(out, "no suffix occurs at least {min} times")?;
    }
    for entry in found {
        writeln!(out, "{:<40} {}", entry.suffix, entry.count)?;
    }
    Ok(())
}
