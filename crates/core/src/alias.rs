use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use serde_json::Value;

use crate::error::{Result, VoxError};
use crate::text::capitalize;

/// Canonical name -> alias list, loaded once per run.
///
/// Lookups are case-insensitive. When two canonical entries claim the same
/// alias, the one declared first in the file owns it.
#[derive(Debug, Clone, Default)]
pub struct AliasTable {
    entries: IndexMap<String, Vec<String>>,
    owners: FxHashMap<String, usize>,
}

impl AliasTable {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw, path)
    }

    /// Parses a JSON alias document; `origin` is only used for error reporting.
    pub fn from_json_str(raw: &str, origin: &Path) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        let malformed = |reason: String| VoxError::MalformedAliasFile {
            path: PathBuf::from(origin),
            reason,
        };
        let Value::Object(map) = value else {
            return Err(malformed("root is not a JSON object".to_string()));
        };
        let mut entries = IndexMap::with_capacity(map.len());
        for (canonical, aliases) in map {
            let Value::Array(items) = aliases else {
                return Err(malformed(format!("value for {canonical:?} is not a list")));
            };
            let mut list = Vec::with_capacity(items.len());
            for item in items {
                match item {
                    Value::String(alias) => list.push(alias.to_lowercase()),
                    other => {
                        return Err(malformed(format!(
                            "alias {other} under {canonical:?} is not a string"
                        )))
                    }
                }
            }
            entries.insert(canonical, list);
        }
        Ok(Self::from_entries(entries))
    }

    pub fn from_entries<I, S, A>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<A>)>,
        S: Into<String>,
        A: AsRef<str>,
    {
        let entries: IndexMap<String, Vec<String>> = entries
            .into_iter()
            .map(|(name, aliases)| {
                let aliases = aliases
                    .iter()
                    .map(|alias| alias.as_ref().to_lowercase())
                    .collect();
                (name.into(), aliases)
            })
            .collect();
        let mut owners = FxHashMap::default();
        for (idx, aliases) in entries.values().enumerate() {
            for alias in aliases {
                owners.entry(alias.clone()).or_insert(idx);
            }
        }
        Self { entries, owners }
    }

    /// Owning canonical name for `token`, if any alias matches.
    pub fn lookup(&self, token: &str) -> Option<&str> {
        let idx = *self.owners.get(&token.to_lowercase())?;
        self.entries.get_index(idx).map(|(name, _)| name.as_str())
    }

    /// Canonical display name, or the capitalized token when no alias matches.
    pub fn canonicalize(&self, token: &str) -> String {
        match self.lookup(token) {
            Some(name) => name.to_string(),
            None => capitalize(token),
        }
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.owners.contains_key(&token.to_lowercase())
    }

    /// Flattened lowercase alias set.
    pub fn valid_names(&self) -> FxHashSet<&str> {
        self.owners.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
