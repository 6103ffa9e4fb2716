//! Content scanning and search index compilation.
//!
//! Build-time half of the site. Walks the content root once per configured
//! group, parses every selected markdown document, and produces the ordered
//! [`SearchIndex`] that the emit stage writes for the ranking engine.
//!
//! ## Directory Structure
//!
//! ```text
//! content/                         # Content root
//! ├── config.toml                  # Groups and output settings
//! ├── articles/                    # glob = "articles/**/*.md"
//! │   ├── 010-sleep-basics.md      # → /articles/sleep-basics/
//! │   ├── 020-night-waking.md
//! │   └── research/
//! │       └── 010-melatonin.md     # → /articles/melatonin/
//! └── resources/                   # glob = "resources/*.md"
//!     └── printable.md             # permalink: /resources/checklist/
//! ```
//!
//! ## Ordering
//!
//! Records appear group by group in declaration order. Within a group the
//! walk is sorted by file name at every directory level, so an `NNN-` prefix
//! controls position.
//!
//! ## Validation
//!
//! - Every document needs a title (front matter, or the first `# heading`).
//! - Every document needs a URL (`permalink`, or a slug derived from the
//!   file name).
//! - URLs are unique across the whole build.
//!
//! A broken document never aborts the scan of the others: all problems are
//! collected and reported together with the offending paths.

use crate::config::{self, GroupConfig, SiteConfig};
use crate::frontmatter::{self, FrontMatter};
use crate::naming;
use crate::types::{ContentItem, IndexRecord, SearchIndex};
use globset::GlobMatcher;
use pulldown_cmark::{Event, HeadingLevel, Parser, Tag, TagEnd};
use rayon::prelude::*;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid glob for group '{group}': {source}")]
    Glob {
        group: String,
        source: globset::Error,
    },
    #[error("{} invalid document(s):\n{}", .0.len(), DocumentIssues(.0))]
    InvalidDocuments(Vec<DocumentIssue>),
}

/// What is wrong with a single document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed front matter: {0}")]
    FrontMatter(#[from] serde_yaml::Error),
    #[error("missing title (no front matter title and no '# ' heading)")]
    MissingTitle,
    #[error("missing URL (no permalink and no slug in file name)")]
    MissingUrl,
    #[error("duplicate URL {url} (already used by {})", .first.display())]
    DuplicateUrl { url: String, first: PathBuf },
}

/// A document-level error tagged with the document path.
#[derive(Debug)]
pub struct DocumentIssue {
    /// Path relative to the content root.
    pub path: PathBuf,
    pub error: DocumentError,
}

impl fmt::Display for DocumentIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.error)
    }
}

struct DocumentIssues<'a>(&'a [DocumentIssue]);

impl fmt::Display for DocumentIssues<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  {issue}")?;
        }
        Ok(())
    }
}

/// Load `config.toml` from `root` and compile the index it describes.
pub fn scan(root: &Path) -> Result<(SiteConfig, SearchIndex), ScanError> {
    let config = config::load_config(root)?;
    let index = compile(root, &config)?;
    Ok((config, index))
}

/// Compile the ordered search index for every group in `config`.
pub fn compile(root: &Path, config: &SiteConfig) -> Result<SearchIndex, ScanError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config::effective_threads(&config.processing))
        .build()
        .ok();

    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut origins: HashMap<String, PathBuf> = HashMap::new();

    for group in &config.groups {
        let paths = discover(root, group)?;
        info!(group = %group.name, documents = paths.len(), "scanning group");

        let parse_all = || {
            paths
                .par_iter()
                .map(|rel| (rel, read_document(root, rel, &group.name)))
                .collect::<Vec<_>>()
        };
        let parsed = match &pool {
            Some(pool) => pool.install(parse_all),
            None => parse_all(),
        };

        for (rel, result) in parsed {
            match result {
                Ok(item) => match origins.get(&item.url) {
                    Some(first) => issues.push(DocumentIssue {
                        path: rel.clone(),
                        error: DocumentError::DuplicateUrl {
                            url: item.url,
                            first: first.clone(),
                        },
                    }),
                    None => {
                        origins.insert(item.url.clone(), rel.clone());
                        records.push(IndexRecord::from(item));
                    }
                },
                Err(error) => issues.push(DocumentIssue {
                    path: rel.clone(),
                    error,
                }),
            }
        }
    }

    if !issues.is_empty() {
        return Err(ScanError::InvalidDocuments(issues));
    }
    Ok(SearchIndex { records })
}

/// Paths (relative to `root`) selected by the group's glob, in walk order.
pub fn discover(root: &Path, group: &GroupConfig) -> Result<Vec<PathBuf>, ScanError> {
    let matcher = group_matcher(group)?;
    let mut selected = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.file_name()))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(rel) = entry.path().strip_prefix(root) else {
            continue;
        };
        if matcher.is_match(rel) {
            selected.push(rel.to_path_buf());
        } else {
            debug!(path = %rel.display(), group = %group.name, "not selected");
        }
    }
    Ok(selected)
}

fn group_matcher(group: &GroupConfig) -> Result<GlobMatcher, ScanError> {
    config::group_glob(&group.glob)
        .map(|g| g.compile_matcher())
        .map_err(|source| ScanError::Glob {
            group: group.name.clone(),
            source,
        })
}

fn is_hidden(name: &std::ffi::OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}

/// Read and parse one document into a [`ContentItem`].
pub fn read_document(root: &Path, rel: &Path, group: &str) -> Result<ContentItem, DocumentError> {
    let content = fs::read_to_string(root.join(rel))?;
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    parse_document(&content, &stem, group)
}

/// Parse document text. `stem` is the file stem used for URL derivation.
pub fn parse_document(content: &str, stem: &str, group: &str) -> Result<ContentItem, DocumentError> {
    let (block, body) = frontmatter::split(content);
    let front = match block {
        Some(block) => FrontMatter::from_yaml(block)?,
        None => FrontMatter::default(),
    };

    let (heading, text) = plain_text_and_heading(body);
    let title = front
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or(heading)
        .ok_or(DocumentError::MissingTitle)?;

    let url = front
        .permalink
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .or_else(|| naming::derive_url(group, stem))
        .ok_or(DocumentError::MissingUrl)?;

    Ok(ContentItem {
        title,
        body: text,
        url,
        tags: front.tags,
        category: front.category,
        audience: front.audience,
        group: group.to_string(),
    })
}

/// Render markdown to plain text for ranking: markup and raw HTML dropped,
/// block boundaries become single spaces.
pub fn plain_text(markdown: &str) -> String {
    plain_text_and_heading(markdown).1
}

/// Plain text plus the text of the first level-one heading, from one parse.
/// Lines inside code blocks are never headings.
fn plain_text_and_heading(markdown: &str) -> (Option<String>, String) {
    let mut text = String::with_capacity(markdown.len());
    let mut heading: Option<String> = None;
    let mut in_h1 = false;
    let mut current = String::new();

    for event in Parser::new(markdown) {
        match &event {
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if heading.is_none() => {
                in_h1 = true;
                current.clear();
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) if in_h1 => {
                in_h1 = false;
                let title = current.split_whitespace().collect::<Vec<_>>().join(" ");
                if !title.is_empty() {
                    heading = Some(title);
                }
            }
            _ => {}
        }
        match event {
            Event::Text(t) | Event::Code(t) => {
                if in_h1 {
                    current.push_str(&t);
                }
                text.push_str(&t);
            }
            Event::SoftBreak
            | Event::HardBreak
            | Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::BlockQuote(_)
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }
    (heading, text.split_whitespace().collect::<Vec<_>>().join(" "))
}
