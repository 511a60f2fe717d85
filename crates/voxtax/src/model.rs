use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use voxtax_core::{BatchReport, BatchStats, DecodedLine, DisregardedName, Placement, SkippedFile};

/// Operator-facing summary written next to the tree.
#[derive(Debug, Serialize)]
pub struct RunReport<'a> {
    pub source: &'a str,
    pub stats: BatchStats,
    pub coverage: f64,
    pub disregarded: Vec<DisregardedName>,
    pub skipped: &'a [SkippedFile],
    pub topics: Vec<String>,
}

impl<'a> RunReport<'a> {
    pub fn from_batch(source: &'a str, report: &'a BatchReport) -> Self {
        Self {
            source,
            stats: report.stats,
            coverage: report.stats.coverage(),
            disregarded: report.disregarded.unique().into_iter().collect(),
            skipped: &report.skipped,
            topics: report.tree.topics(),
        }
    }
}

/// One decoded stem as printed by `voxtax classify`.
#[derive(Debug, Serialize)]
pub struct Classification {
    pub stem: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<DecodedLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placement: Option<Placement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection: Option<String>,
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body + "\n").with_context(|| format!("failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_json_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out/report.json");
        write_json(&path, &serde_json::json!({"ok": true})).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with("}\n"));
        assert!(raw.contains("\"ok\": true"));
    }
}
