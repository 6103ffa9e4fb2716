//! # facetsite
//!
//! Tooling for a static content site with a client-side search box and
//! faceted filtering. It has two halves that never run in the same process.
//!
//! # Build Time: Index Compiler
//!
//! Markdown documents are grouped into named collections by glob, parsed for
//! YAML front matter, flattened to plain text and written out as one JSON
//! array that a ranking engine loads in the browser:
//!
//! ```text
//! content/config.toml  ─┐
//! content/**/*.md      ─┴─ scan ─→ SearchIndex ─ generate ─→ dist/search-index.json
//!                                                            dist/assets/js/<runtime>
//! ```
//!
//! Every document problem in a run is collected and reported together; a run
//! with any broken document writes nothing.
//!
//! # View Time: Page Controllers
//!
//! The rendered pages carry a filter panel, a collapsible navigation, a theme
//! toggle, a policy dialog and section links. The controllers for these are
//! written against the small capability traits in [`host`] so they can be
//! driven by a browser binding or, in tests, by in-memory mocks. [`page`]
//! wires them together and routes events.
//!
//! Facet selection semantics live in [`facets`] as a pure predicate:
//! AND across facets, OR within a facet, an empty facet matches everything.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.toml` loading, stock defaults, merging and validation |
//! | [`scan`] | Group discovery, document parsing, index compilation |
//! | [`frontmatter`] | YAML front matter split and schema |
//! | [`naming`] | `NNN-slug` file stems and derived URLs |
//! | [`types`] | Content items and index records |
//! | [`generate`] | Writes the index and copies the ranking runtime |
//! | [`output`] | CLI output formatting |
//! | [`host`] | Storage, window and element capabilities |
//! | [`facets`] | Facet keys, selections, query strings, the visibility predicate |
//! | [`store`] | Persisted filter selection |
//! | [`filters`] | Filter panel controller |
//! | [`context`] | Section scroll context and back link |
//! | [`theme`] | Light/dark preference |
//! | [`navigation`] | Navigation collapse and header metrics |
//! | [`modal`] | Policy dialog |
//! | [`page`] | Startup wiring and event dispatch |
//!
//! # Persisted Keys
//!
//! | Storage | Key | Owner |
//! |---------|-----|-------|
//! | local | `repository-filters` | [`store`] |
//! | local | `site-theme` | [`theme`] |
//! | local | `site-nav-collapsed` | [`navigation`] |
//! | session | `section-context` | [`context`] |
//!
//! Anything unreadable under these keys is treated as absent.

pub mod config;
pub mod context;
pub mod facets;
pub mod filters;
pub mod frontmatter;
pub mod generate;
pub mod host;
pub mod modal;
pub mod naming;
pub mod navigation;
pub mod output;
pub mod page;
pub mod scan;
pub mod store;
pub mod theme;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
