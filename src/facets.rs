//! Facet selection model and the visibility predicate.
//!
//! Pure code: no storage, no DOM. The filter controller in
//! [`crate::filters`] wires this to the page.
//!
//! ## Matching
//!
//! AND across facets, OR within a facet. An item matches a facet when it
//! carries at least one of the selected values; a facet with nothing selected
//! matches everything. An item is visible when it matches every facet.
//!
//! ## Names
//!
//! Each facet goes by three names depending on where it appears:
//!
//! | Facet | control / storage key | URL param | item `data-*` |
//! |-------|-----------------------|-----------|---------------|
//! | Audience | `audience` | `audience` | `audience` |
//! | Evidence level | `evidenceLevel` | `evidence` | `evidence` |
//! | Age range | `ageRange` | `age` | `age` |
//!
//! Values inside a URL param or `data-*` attribute are joined with
//! [`VALUE_DELIMITER`]. A value containing the delimiter cannot be expressed.

use maud::{Markup, html};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const VALUE_DELIMITER: char = ',';

/// Bytes left unescaped in query values, matching `URLSearchParams`.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'*');

/// One independent filter dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Facet {
    Audience,
    EvidenceLevel,
    AgeRange,
}

impl Facet {
    pub const ALL: [Facet; 3] = [Facet::Audience, Facet::EvidenceLevel, Facet::AgeRange];

    /// Checkbox `name` and persisted JSON key.
    pub fn key(self) -> &'static str {
        match self {
            Facet::Audience => "audience",
            Facet::EvidenceLevel => "evidenceLevel",
            Facet::AgeRange => "ageRange",
        }
    }

    pub fn query_param(self) -> &'static str {
        match self {
            Facet::Audience => "audience",
            Facet::EvidenceLevel => "evidence",
            Facet::AgeRange => "age",
        }
    }

    /// `data-*` attribute on filterable items.
    pub fn data_key(self) -> &'static str {
        match self {
            Facet::Audience => "audience",
            Facet::EvidenceLevel => "evidence",
            Facet::AgeRange => "age",
        }
    }

    /// Label used in the active-filter summary.
    pub fn label(self) -> &'static str {
        match self {
            Facet::Audience => "Audience",
            Facet::EvidenceLevel => "Evidence",
            Facet::AgeRange => "Age",
        }
    }

    pub fn from_key(key: &str) -> Option<Facet> {
        Facet::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// Split a delimited list, dropping blank fragments.
pub fn split_values(raw: &str) -> BTreeSet<String> {
    raw.split(VALUE_DELIMITER)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
        .collect()
}

/// Selected values per facet.
///
/// Serializes to the persisted form
/// `{"audience":[...],"evidenceLevel":[...],"ageRange":[...]}`; missing keys
/// read back as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterSelection {
    pub audience: BTreeSet<String>,
    pub evidence_level: BTreeSet<String>,
    pub age_range: BTreeSet<String>,
}

impl FilterSelection {
    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Audience => &self.audience,
            Facet::EvidenceLevel => &self.evidence_level,
            Facet::AgeRange => &self.age_range,
        }
    }

    pub fn values_mut(&mut self, facet: Facet) -> &mut BTreeSet<String> {
        match facet {
            Facet::Audience => &mut self.audience,
            Facet::EvidenceLevel => &mut self.evidence_level,
            Facet::AgeRange => &mut self.age_range,
        }
    }

    pub fn insert(&mut self, facet: Facet, value: impl Into<String>) {
        self.values_mut(facet).insert(value.into());
    }

    /// True when no facet has a selection.
    pub fn is_empty(&self) -> bool {
        Facet::ALL.iter().all(|f| self.values(*f).is_empty())
    }

    /// Facets with at least one selected value, in display order.
    pub fn active(&self) -> impl Iterator<Item = (Facet, &BTreeSet<String>)> {
        Facet::ALL
            .into_iter()
            .map(|f| (f, self.values(f)))
            .filter(|(_, values)| !values.is_empty())
    }

    /// Query string without the leading `?`. Facets with no selection are
    /// omitted, so an empty selection yields `""`.
    pub fn to_query(&self) -> String {
        self.active()
            .map(|(facet, values)| {
                let joined = values
                    .iter()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(&VALUE_DELIMITER.to_string());
                format!(
                    "{}={}",
                    facet.query_param(),
                    utf8_percent_encode(&joined, QUERY_VALUE)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Parse `location.search` (with or without the leading `?`).
    ///
    /// Unrelated params are ignored; for a repeated param the first wins.
    pub fn from_query(search: &str) -> Self {
        let mut selection = Self::default();
        let mut seen = BTreeSet::new();
        for pair in search.trim_start_matches('?').split('&') {
            let (name, raw) = pair.split_once('=').unwrap_or((pair, ""));
            let Some(facet) = Facet::ALL
                .into_iter()
                .find(|f| f.query_param() == decode_component(name))
            else {
                continue;
            };
            if !seen.insert(facet) {
                continue;
            }
            *selection.values_mut(facet) = split_values(&decode_component(raw));
        }
        selection
    }

    /// `path?query`, or the bare path when nothing is selected.
    pub fn href(&self, path: &str) -> String {
        let query = self.to_query();
        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }

    /// `Audience: a, b | Evidence: x | Age: y`. Empty when nothing is
    /// selected.
    pub fn summary(&self) -> String {
        self.active()
            .map(|(facet, values)| {
                let list = values.iter().map(String::as_str).collect::<Vec<_>>();
                format!("{}: {}", facet.label(), list.join(", "))
            })
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
}

/// Facet values carried by one rendered content item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFacets {
    pub audience: BTreeSet<String>,
    pub evidence: BTreeSet<String>,
    pub age: BTreeSet<String>,
}

impl ItemFacets {
    /// Build from a `data-*` lookup (`data-audience`, `data-evidence`,
    /// `data-age`). Missing attributes are empty.
    pub fn from_data(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |facet: Facet| {
            lookup(facet.data_key())
                .map(|raw| split_values(&raw))
                .unwrap_or_default()
        };
        Self {
            audience: read(Facet::Audience),
            evidence: read(Facet::EvidenceLevel),
            age: read(Facet::AgeRange),
        }
    }

    pub fn values(&self, facet: Facet) -> &BTreeSet<String> {
        match facet {
            Facet::Audience => &self.audience,
            Facet::EvidenceLevel => &self.evidence,
            Facet::AgeRange => &self.age,
        }
    }
}

/// Visibility decision for one item.
pub fn evaluate(item: &ItemFacets, selection: &FilterSelection) -> bool {
    Facet::ALL.into_iter().all(|facet| {
        let wanted = selection.values(facet);
        wanted.is_empty() || !wanted.is_disjoint(item.values(facet))
    })
}

/// Active-filter banner prepended to the main content area.
///
/// The button carries `data-action="clear-filters"`; the host routes its
/// click to [`crate::page::Target::BannerClear`].
pub fn banner(selection: &FilterSelection) -> Option<Markup> {
    if selection.is_empty() {
        return None;
    }
    Some(html! {
        div.filter-active-banner {
            strong { "Active Filters:" }
            " " (selection.summary()) " "
            button type="button" data-action="clear-filters" { "Clear Filters" }
        }
    })
}
