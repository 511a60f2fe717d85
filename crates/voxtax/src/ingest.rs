use std::path::Path;

use anyhow::{anyhow, Result};
use glob::Pattern;
use voxtax_core::AudioFile;
use walkdir::WalkDir;

/// Walks `root` for files matching the comma-separated `pattern`, sorted by
/// path so leaf order is reproducible between runs.
pub fn discover_files(root: &Path, pattern: &str) -> Result<Vec<AudioFile>> {
    let patterns = build_patterns(pattern)?;
    let mut found = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or_else(|_| entry.path());
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        if !patterns.is_empty() && !patterns.iter().any(|pat| pat.matches(&rel_str.to_lowercase())) {
            continue;
        }
        let Some(stem) = entry.path().file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        found.push(AudioFile::new(stem, rel_str));
    }
    found.sort_by(|a, b| a.reference.cmp(&b.reference));
    Ok(found)
}

fn build_patterns(pattern: &str) -> Result<Vec<Pattern>> {
    let mut patterns = Vec::new();
    for raw in pattern.split(',') {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }
        let normalized = if trimmed.contains('/') {
            trimmed.to_lowercase()
        } else {
            format!("**/{}", trimmed.to_lowercase())
        };
        patterns.push(Pattern::new(&normalized).map_err(|e| anyhow!(e.msg))?);
    }
    Ok(patterns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn build_patterns_expands_bare_globs() {
        let patterns = build_patterns("*.mp3, heroes/*.WAV").unwrap();
        let rendered: Vec<&str> = patterns.iter().map(|p| p.as_str()).collect();
        assert_eq!(rendered, vec!["**/*.mp3", "heroes/*.wav"]);
    }

    #[test]
    fn discover_files_sorts_and_filters() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("wraith")).unwrap();
        fs::write(dir.path().join("wraith/wraith_select_01.MP3"), "x").unwrap();
        fs::write(dir.path().join("astro_hunt_01.mp3"), "x").unwrap();
        fs::write(dir.path().join("astro_hunt_01.txt"), "x").unwrap();

        let files = discover_files(dir.path(), "*.mp3").unwrap();
        let refs: Vec<&str> = files.iter().map(|f| f.reference.as_str()).collect();
        assert_eq!(refs, vec!["astro_hunt_01.mp3", "wraith/wraith_select_01.MP3"]);
        assert_eq!(files[1].stem, "wraith_select_01");
    }
}
