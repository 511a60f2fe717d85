use std::fs;
use std::path::Path;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use tracing::warn;

use crate::error::{Result, VoxError};

const BUILTIN_TAXONOMY: &str = include_str!("../assets/taxonomy.yaml");
const SUPPORTED_VERSION: u32 = 1;

pub const PINGS: &str = "Pings";
pub const SELF_SUBJECT: &str = "Self";
pub const ITEM_USAGE: &str = "Item Usage";
pub const EMOTIONS: &str = "Emotions";
pub const PAIN: &str = "Pain";
pub const EFFORT: &str = "Effort";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub keywords: FxHashSet<String>,
}

/// Ordered keyword table; the first category containing a keyword wins.
#[derive(Debug, Clone, Default)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories }
    }

    pub fn resolve(&self, keyword: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.keywords.contains(keyword))
            .map(|category| category.name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|category| category.name.as_str())
    }

    /// Keywords claimed by more than one category, with the owning and shadowed names.
    pub fn shadowed_keywords(&self) -> Vec<(String, String, String)> {
        let mut owners: FxHashMap<&str, &str> = FxHashMap::default();
        let mut shadowed = Vec::new();
        for category in &self.categories {
            let mut keywords: Vec<&String> = category.keywords.iter().collect();
            keywords.sort();
            for keyword in keywords {
                match owners.get(keyword.as_str()) {
                    Some(owner) => shadowed.push((
                        keyword.clone(),
                        owner.to_string(),
                        category.name.clone(),
                    )),
                    None => {
                        owners.insert(keyword.as_str(), category.name.as_str());
                    }
                }
            }
        }
        shadowed
    }
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    version: u32,
    #[serde(default)]
    priority_topics: Vec<String>,
    #[serde(default)]
    self_keywords: Vec<String>,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
    #[serde(default)]
    ping_categories: Vec<CategoryEntry>,
}

#[derive(Debug, Deserialize)]
struct CategoryEntry {
    name: String,
    #[serde(default)]
    keywords: Vec<String>,
}

/// Keyword tables and grammar vocabulary driving classification and placement.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub categories: CategoryTable,
    pub ping_categories: CategoryTable,
    pub self_keywords: Vec<String>,
    pub priority_topics: Vec<String>,
}

impl Taxonomy {
    /// The taxonomy embedded in the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_TAXONOMY)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self> {
        let file: TaxonomyFile = serde_yaml::from_str(raw)?;
        if file.version != SUPPORTED_VERSION {
            return Err(VoxError::MalformedTaxonomy(format!(
                "unsupported taxonomy version {} (expected {SUPPORTED_VERSION})",
                file.version
            )));
        }
        let categories = build_table("categories", file.categories)?;
        let ping_categories = build_table("ping_categories", file.ping_categories)?;
        let mut self_keywords: Vec<String> = file
            .self_keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        self_keywords.sort();
        self_keywords.dedup();
        // longest first so `use_power4_as_enemy` is tried before `use_power4`
        self_keywords.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        Ok(Self {
            categories,
            ping_categories,
            self_keywords,
            priority_topics: file.priority_topics,
        })
    }

    /// Categories of a Self bucket in post-pass order: declared table order,
    /// then the fixed buckets the table does not declare.
    pub fn self_category_order(&self) -> Vec<&str> {
        let mut order: Vec<&str> = self.categories.names().collect();
        for fixed in [ITEM_USAGE, EMOTIONS] {
            if !order.contains(&fixed) {
                order.push(fixed);
            }
        }
        order
    }
}

fn build_table(label: &str, entries: Vec<CategoryEntry>) -> Result<CategoryTable> {
    let mut categories: Vec<Category> = Vec::with_capacity(entries.len());
    for entry in entries {
        let name = entry.name.trim().to_string();
        if name.is_empty() {
            return Err(VoxError::MalformedTaxonomy(format!(
                "{label} contains a category without a name"
            )));
        }
        if categories.iter().any(|existing| existing.name == name) {
            return Err(VoxError::MalformedTaxonomy(format!(
                "{label} declares {name:?} twice"
            )));
        }
        let keywords = entry
            .keywords
            .into_iter()
            .map(|keyword| keyword.trim().to_lowercase())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        categories.push(Category { name, keywords });
    }
    let table = CategoryTable::new(categories);
    for (keyword, owner, shadowed) in table.shadowed_keywords() {
        warn!("{label}: keyword {keyword:?} in {shadowed:?} is shadowed by {owner:?}");
    }
    Ok(table)
}
