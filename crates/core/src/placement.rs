use serde::Serialize;

use crate::line::DecodedLine;
use crate::taxonomy::{Taxonomy, EFFORT, EMOTIONS, ITEM_USAGE, PAIN, PINGS, SELF_SUBJECT};

/// Tree paths for one decoded line: where it is filed, and for a true
/// self-ping the mirrored copy under the `Self` subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub primary: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mirror: Option<Vec<String>>,
}

impl Placement {
    pub fn paths(&self) -> impl Iterator<Item = &[String]> {
        std::iter::once(self.primary.as_slice()).chain(self.mirror.as_deref())
    }
}

pub fn place(line: &DecodedLine, taxonomy: &Taxonomy) -> Placement {
    let key = line.topic_key();
    let categories = if line.is_ping {
        let mut levels = vec![PINGS];
        levels.extend(taxonomy.ping_categories.resolve(&key));
        levels
    } else {
        category_levels(&key, taxonomy)
    };
    let path_for = |subject: &str| -> Vec<String> {
        [line.speaker.as_str(), subject]
            .into_iter()
            .chain(categories.iter().copied())
            .chain(std::iter::once(line.topic.as_str()))
            .map(str::to_string)
            .collect()
    };
    let mirror = (line.is_ping && line.subject == line.speaker && !line.is_self_subject())
        .then(|| path_for(SELF_SUBJECT));
    Placement {
        primary: path_for(&line.subject),
        mirror,
    }
}

fn category_levels<'t>(key: &str, taxonomy: &'t Taxonomy) -> Vec<&'t str> {
    if key.starts_with("use_") && !key.starts_with("use_power") {
        return vec![ITEM_USAGE];
    }
    if key == "pain" || key.starts_with("pain_") {
        return vec![EMOTIONS, PAIN];
    }
    if key == "effort" || key.starts_with("effort_") {
        return vec![EMOTIONS, EFFORT];
    }
    taxonomy.categories.resolve(key).into_iter().collect()
}
