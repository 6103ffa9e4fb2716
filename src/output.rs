//! CLI output formatting for the build commands.
//!
//! # Information-First Display
//!
//! Every document is shown by its positional index and title, with its URL
//! and facet data as indented context lines. The output reads as a content
//! inventory rather than a file listing.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Groups
//! 001 articles (3 documents)
//!     Glob: articles/**/*.md
//!     001 Sleep basics
//!         URL: /articles/sleep-basics/
//!         Audience: clinician, parent
//!     002 Night waking
//!         URL: /articles/night-waking/
//!
//! Index
//!     5 records
//! ```
//!
//! ## Emit
//!
//! ```text
//! Index → search-index.json (5 records)
//! Runtime → assets/js/lunr.min.js
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::config::SiteConfig;
use crate::generate::EmitReport;
use crate::types::{Category, IndexRecord, SearchIndex};
use std::collections::BTreeSet;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    if count == 1 {
        format!("{count} {one}")
    } else {
        format!("{count} {many}")
    }
}

fn join_set(values: &BTreeSet<String>) -> String {
    values.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
}

/// Context lines under a record header. Empty fields are omitted.
fn record_context(record: &IndexRecord, depth: usize) -> Vec<String> {
    let pad = indent(depth);
    let mut lines = vec![format!("{pad}URL: {}", record.url)];
    if !record.audience.is_empty() {
        lines.push(format!("{pad}Audience: {}", join_set(&record.audience)));
    }
    match &record.category {
        Category::One(label) if !label.is_empty() => {
            lines.push(format!("{pad}Category: {label}"));
        }
        Category::Many(labels) if !labels.is_empty() => {
            lines.push(format!("{pad}Category: {}", join_set(labels)));
        }
        _ => {}
    }
    if !record.tags.is_empty() {
        lines.push(format!("{pad}Tags: {}", join_set(&record.tags)));
    }
    lines
}

/// Format scan output: every group with its documents, then totals.
pub fn format_scan_output(config: &SiteConfig, index: &SearchIndex) -> Vec<String> {
    let mut lines = vec!["Groups".to_string()];

    for (g, group) in config.groups.iter().enumerate() {
        let records: Vec<&IndexRecord> = index.section(&group.name).collect();
        lines.push(format!(
            "{} {} ({})",
            format_index(g + 1),
            group.name,
            plural(records.len(), "document", "documents")
        ));
        lines.push(format!("{}Glob: {}", indent(1), group.glob));
        for (i, record) in records.iter().enumerate() {
            lines.push(format!("{}{} {}", indent(1), format_index(i + 1), record.title));
            lines.extend(record_context(record, 2));
        }
    }

    lines.push(String::new());
    lines.push("Index".to_string());
    lines.push(format!(
        "{}{}",
        indent(1),
        plural(index.records.len(), "record", "records")
    ));
    lines
}

/// Print scan output to stdout.
pub fn print_scan_output(config: &SiteConfig, index: &SearchIndex) {
    for line in format_scan_output(config, index) {
        println!("{}", line);
    }
}

/// Format the files written by the emit stage.
pub fn format_emit_output(report: &EmitReport) -> Vec<String> {
    let mut lines = vec![format!(
        "Index → {} ({})",
        report.index_path.display(),
        plural(report.records, "record", "records")
    )];
    if let Some(runtime) = &report.runtime_library {
        lines.push(format!("Runtime → {}", runtime.display()));
    }
    lines
}

/// Print emit output to stdout.
pub fn print_emit_output(report: &EmitReport) {
    for line in format_emit_output(report) {
        println!("{}", line);
    }
}
