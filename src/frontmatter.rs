//! YAML front matter at the top of markdown documents.
//!
//! ```text
//! ---
//! title: Sleep basics
//! tags: [sleep, routines]
//! category: guides
//! audience: [parent, clinician]
//! ---
//! # Sleep basics
//! ...
//! ```
//!
//! Scalar-or-list fields accept either form (`tags: sleep` or
//! `tags: [sleep]`). Keys this crate does not use are ignored, since other
//! layers of the site read the same block.

use crate::types::Category;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeSet;

/// Fields the index compiler reads from a document's front matter.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub permalink: Option<String>,
    #[serde(deserialize_with = "string_or_seq")]
    pub tags: BTreeSet<String>,
    #[serde(deserialize_with = "category")]
    pub category: Category,
    #[serde(deserialize_with = "string_or_seq")]
    pub audience: BTreeSet<String>,
}

impl FrontMatter {
    /// Parse a front matter block. An empty block yields the defaults.
    pub fn from_yaml(block: &str) -> Result<Self, serde_yaml::Error> {
        let trimmed = block.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(trimmed)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

fn non_empty(values: impl IntoIterator<Item = String>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

fn string_or_seq<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => BTreeSet::new(),
        Some(OneOrMany::One(value)) => non_empty([value]),
        Some(OneOrMany::Many(values)) => non_empty(values),
    })
}

fn category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Category::default(),
        Some(OneOrMany::One(label)) => Category::One(label.trim().to_string()),
        Some(OneOrMany::Many(labels)) => Category::Many(non_empty(labels)),
    })
}

/// Split a document into its front matter block and body.
///
/// The block must open on the very first line with `---` and close with a
/// line containing only `---`. Without an opening fence, or with an opening
/// fence that is never closed, the whole document is body.
pub fn split(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let Some(rest) = content
        .strip_prefix("---\n")
        .or_else(|| content.strip_prefix("---\r\n"))
    else {
        return (None, content);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return (Some(block), body);
        }
        offset += line.len();
    }
    (None, content)
}
