//! Shared types handed from the index compiler to the emit stage.
//!
//! [`IndexRecord`] is the exact shape the external ranking engine's build
//! step loads. Field names and order are part of that contract.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A document's category: a single label or a set of labels.
///
/// Serialized untagged so single-valued categories stay plain strings in the
/// emitted index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    One(String),
    Many(BTreeSet<String>),
}

impl Default for Category {
    fn default() -> Self {
        Category::One(String::new())
    }
}

impl Category {
    pub fn is_empty(&self) -> bool {
        match self {
            Category::One(label) => label.is_empty(),
            Category::Many(labels) => labels.is_empty(),
        }
    }
}

/// One published document, as read from a content group.
#[derive(Debug, Clone, PartialEq)]
pub struct ContentItem {
    pub title: String,
    /// Plain text of the body, used for ranking only.
    pub body: String,
    pub url: String,
    pub tags: BTreeSet<String>,
    pub category: Category,
    pub audience: BTreeSet<String>,
    /// Group identifier the document was selected by.
    pub group: String,
}

/// Denormalized projection of a [`ContentItem`] fed to the ranking engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexRecord {
    pub title: String,
    pub content: String,
    pub url: String,
    pub tags: BTreeSet<String>,
    pub category: Category,
    pub audience: BTreeSet<String>,
    pub section: String,
}

impl From<ContentItem> for IndexRecord {
    fn from(item: ContentItem) -> Self {
        Self {
            title: item.title,
            content: item.body,
            url: item.url,
            tags: item.tags,
            category: item.category,
            audience: item.audience,
            section: item.group,
        }
    }
}

/// Ordered index records for one build. Serializes as a plain JSON array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchIndex {
    pub records: Vec<IndexRecord>,
}

impl SearchIndex {
    /// Records belonging to `section`, in index order.
    pub fn section<'a>(&'a self, section: &'a str) -> impl Iterator<Item = &'a IndexRecord> {
        self.records.iter().filter(move |r| r.section == section)
    }
}
