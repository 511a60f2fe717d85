use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, VoxError};
use crate::taxonomy::{Taxonomy, PINGS, SELF_SUBJECT};

/// One filed line. Real entries carry a relative audio path; phantom
/// entries have an empty reference and the dictionary text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRecord {
    pub reference: String,
    pub phantom: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl LineRecord {
    pub fn real(reference: impl Into<String>, text: Option<String>) -> Self {
        Self {
            reference: reference.into(),
            phantom: false,
            text,
        }
    }

    pub fn phantom(text: impl Into<String>) -> Self {
        Self {
            reference: String::new(),
            phantom: true,
            text: Some(text.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Branch(IndexMap<String, Node>),
    Leaf(Vec<LineRecord>),
}

impl Node {
    fn record_count(&self) -> usize {
        match self {
            Node::Branch(children) => children.values().map(Node::record_count).sum(),
            Node::Leaf(records) => records.len(),
        }
    }
}

/// `speaker -> subject -> [category ->] topic -> records`, keys kept in
/// insertion order. Nodes only come into existence with their first record,
/// so no leaf is ever empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct TaxonomyTree {
    root: IndexMap<String, Node>,
}

impl TaxonomyTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `record` to the leaf at `path`, creating branches on the way.
    ///
    /// Fails without touching the tree when a key on the path is already a
    /// leaf, or the final key is already a branch.
    pub fn insert(&mut self, path: &[String], record: LineRecord) -> Result<()> {
        let conflict = || VoxError::TreeConflict {
            path: path.join("/"),
        };
        let Some((leaf_key, branch_keys)) = path.split_last() else {
            return Err(conflict());
        };
        if branch_keys.is_empty() || self.conflicts(branch_keys, leaf_key) {
            return Err(conflict());
        }
        let mut level = &mut self.root;
        for key in branch_keys {
            let node = level
                .entry(key.clone())
                .or_insert_with(|| Node::Branch(IndexMap::new()));
            level = match node {
                Node::Branch(children) => children,
                Node::Leaf(_) => return Err(conflict()),
            };
        }
        match level
            .entry(leaf_key.clone())
            .or_insert_with(|| Node::Leaf(Vec::new()))
        {
            Node::Leaf(records) => records.push(record),
            Node::Branch(_) => return Err(conflict()),
        }
        Ok(())
    }

    fn conflicts(&self, branch_keys: &[String], leaf_key: &str) -> bool {
        let mut level = &self.root;
        for key in branch_keys {
            match level.get(key) {
                Some(Node::Branch(children)) => level = children,
                Some(Node::Leaf(_)) => return true,
                None => return false,
            }
        }
        matches!(level.get(leaf_key), Some(Node::Branch(_)))
    }

    pub fn get(&self, path: &[&str]) -> Option<&Node> {
        let (first, rest) = path.split_first()?;
        let mut node = self.root.get(*first)?;
        for key in rest {
            match node {
                Node::Branch(children) => node = children.get(*key)?,
                Node::Leaf(_) => return None,
            }
        }
        Some(node)
    }

    pub fn leaf(&self, path: &[&str]) -> Option<&[LineRecord]> {
        match self.get(path)? {
            Node::Leaf(records) => Some(records),
            Node::Branch(_) => None,
        }
    }

    pub fn speakers(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn record_count(&self) -> usize {
        self.root.values().map(Node::record_count).sum()
    }

    /// Every category and topic label below the subject level, sorted.
    pub fn topics(&self) -> Vec<String> {
        fn walk(children: &IndexMap<String, Node>, depth: usize, out: &mut BTreeSet<String>) {
            for (key, node) in children {
                if depth >= 2 {
                    out.insert(key.clone());
                }
                if let Node::Branch(grandchildren) = node {
                    walk(grandchildren, depth + 1, out);
                }
            }
        }
        let mut labels = BTreeSet::new();
        walk(&self.root, 0, &mut labels);
        labels.into_iter().collect()
    }

    /// Reorders every `Self` bucket: priority topics in their listed order,
    /// remaining topics alphabetically, categories in table order, `Pings` last.
    /// Category contents keep their insertion order.
    pub fn order_self_buckets(&mut self, taxonomy: &Taxonomy) {
        let categories = taxonomy.self_category_order();
        for speaker in self.root.values_mut() {
            let Node::Branch(subjects) = speaker else {
                continue;
            };
            if let Some(Node::Branch(bucket)) = subjects.get_mut(SELF_SUBJECT) {
                bucket.sort_by(|k1, v1, k2, v2| {
                    let left = self_rank(k1, v1, &taxonomy.priority_topics, &categories);
                    let right = self_rank(k2, v2, &taxonomy.priority_topics, &categories);
                    left.cmp(&right).then_with(|| k1.cmp(k2))
                });
            }
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn self_rank(key: &str, node: &Node, priority: &[String], categories: &[&str]) -> (u8, usize) {
    if let Some(pos) = priority.iter().position(|topic| topic == key) {
        return (0, pos);
    }
    if key == PINGS {
        return (3, 0);
    }
    match node {
        Node::Leaf(_) => (1, 0),
        Node::Branch(_) => (
            2,
            categories
                .iter()
                .position(|name| *name == key)
                .unwrap_or(usize::MAX),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(raw: &str) -> Vec<String> {
        raw.split('/').map(str::to_string).collect()
    }

    #[test]
    fn insert_creates_branches_and_appends() {
        let mut tree = TaxonomyTree::new();
        tree.insert(&path("Astro/Self/Combat/Kill"), LineRecord::real("a/1.mp3", None))
            .unwrap();
        tree.insert(&path("Astro/Self/Combat/Kill"), LineRecord::real("a/2.mp3", None))
            .unwrap();
        let records = tree.leaf(&["Astro", "Self", "Combat", "Kill"]).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].reference, "a/2.mp3");
        assert_eq!(tree.record_count(), 2);
    }

    #[test]
    fn conflicting_insert_leaves_tree_untouched() {
        let mut tree = TaxonomyTree::new();
        tree.insert(&path("Astro/Self/Kill"), LineRecord::real("a.mp3", None))
            .unwrap();
        let before = tree.clone();
        let err = tree
            .insert(&path("Astro/Self/Kill/Extra"), LineRecord::real("b.mp3", None))
            .unwrap_err();
        assert!(matches!(err, VoxError::TreeConflict { .. }));
        let err = tree
            .insert(&path("Astro/Self"), LineRecord::real("c.mp3", None))
            .unwrap_err();
        assert!(matches!(err, VoxError::TreeConflict { .. }));
        assert_eq!(tree, before);
    }

    #[test]
    fn self_bucket_ordering() {
        let taxonomy = Taxonomy::builtin().unwrap();
        let mut tree = TaxonomyTree::new();
        for raw in [
            "Astro/Self/Pings/Attack",
            "Astro/Self/Combat/Kill",
            "Astro/Self/Taunt",
            "Astro/Self/Post game",
            "Astro/Self/Hero Selection/Select",
            "Astro/Self/Angry words",
            "Astro/Self/Item Usage/Use item",
            "Astro/Self/Pre game",
            "Astro/Operative/Kill",
        ] {
            tree.insert(&path(raw), LineRecord::real(raw, None)).unwrap();
        }
        tree.order_self_buckets(&taxonomy);
        let Some(Node::Branch(bucket)) = tree.get(&["Astro", "Self"]) else {
            panic!("missing Self bucket");
        };
        let keys: Vec<&str> = bucket.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "Pre game",
                "Post game",
                "Angry words",
                "Taunt",
                "Hero Selection",
                "Combat",
                "Item Usage",
                "Pings"
            ]
        );
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut tree = TaxonomyTree::new();
        tree.insert(&path("Zed/Self/Hunt"), LineRecord::real("z.mp3", None))
            .unwrap();
        tree.insert(&path("Astro/Self/Hunt"), LineRecord::phantom("Got you."))
            .unwrap();
        let json = tree.to_json_pretty().unwrap();
        assert!(json.find("Zed").unwrap() < json.find("Astro").unwrap());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["Astro"]["Self"]["Hunt"][0]["phantom"], true);
        assert_eq!(value["Astro"]["Self"]["Hunt"][0]["text"], "Got you.");
        assert!(value["Zed"]["Self"]["Hunt"][0].get("text").is_none());
    }

    #[test]
    fn topics_are_sorted_labels_below_subject() {
        let mut tree = TaxonomyTree::new();
        tree.insert(&path("Astro/Self/Combat/Kill"), LineRecord::real("a", None))
            .unwrap();
        tree.insert(&path("Bebop/Astro/Hunt"), LineRecord::real("b", None))
            .unwrap();
        assert_eq!(tree.topics(), vec!["Combat", "Hunt", "Kill"]);
    }
}
