//! Document filename parsing for the optional `NNN-slug` ordering convention.
//!
//! Authors may prefix document filenames with a number to control their
//! position within a group (`010-sleep-basics.md` sorts before
//! `020-night-waking.md`). The prefix only affects walk order; it never
//! leaks into the public URL:
//!
//! - `010-sleep-basics.md` → slug `sleep-basics`
//! - `sleep-basics.md`     → slug `sleep-basics`
//! - `010.md`              → no slug (a permalink is required)

/// URL slug of a document file stem: the stem with any `NNN-` ordering
/// prefix stripped. Empty when the stem is number-only.
pub fn slug(stem: &str) -> &str {
    if let Some((prefix, rest)) = stem.split_once('-')
        && prefix.parse::<u32>().is_ok()
    {
        return rest;
    }
    if stem.parse::<u32>().is_ok() {
        return "";
    }
    stem
}

/// Derive the canonical URL for a document in `group` from its file stem.
///
/// Returns `None` when the stem carries no usable slug.
pub fn derive_url(group: &str, stem: &str) -> Option<String> {
    let name = slug(stem).trim();
    if name.is_empty() {
        return None;
    }
    Some(format!("/{group}/{name}/"))
}
