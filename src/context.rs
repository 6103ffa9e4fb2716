//! Section scroll context across a listing → detail → listing round trip.
//!
//! Clicking a section entry link on a listing page stores where the visitor
//! was. Two independent paths read it back:
//!
//! - **Restore**: when the listing page itself loads again at the stored
//!   path, it scrolls to the stored offset and deletes the context.
//! - **Back link**: a detail page that finds a context reveals a
//!   "Back to {section}" button that navigates to the stored path. This path
//!   does not delete the context; the listing page consumes it on arrival.
//!
//! One context exists per browsing session; recording a new one replaces it.

use crate::host::{ElementHandle, KeyValueStore, Window};
use serde::{Deserialize, Serialize};
use std::rc::Rc;
use tracing::error;

pub const SECTION_CONTEXT_KEY: &str = "section-context";

/// What a listing page needs to put the visitor back where they were.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SectionContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scroll_position: Option<f64>,
}

/// Stored context state. A consumed context is indistinguishable from none.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextState {
    Empty,
    Pending(SectionContext),
}

/// Session-scoped context, read and written through session storage.
#[derive(Clone)]
pub struct ContextManager {
    session: Rc<dyn KeyValueStore>,
    window: Rc<dyn Window>,
}

impl ContextManager {
    pub fn new(session: Rc<dyn KeyValueStore>, window: Rc<dyn Window>) -> Self {
        Self { session, window }
    }

    pub fn state(&self) -> ContextState {
        match self.read() {
            Some(context) => ContextState::Pending(context),
            None => ContextState::Empty,
        }
    }

    /// Entry link activated: capture its section and the current position.
    pub fn record(&self, link: &ElementHandle) -> SectionContext {
        let context = SectionContext {
            section_id: link.data("section"),
            section_title: link.data("sectionTitle"),
            section_url: Some(self.window.pathname()),
            scroll_position: Some(self.window.scroll_y()),
        };
        match serde_json::to_string(&context) {
            Ok(json) => self.session.set_item(SECTION_CONTEXT_KEY, &json),
            Err(e) => error!("failed to store section context: {e}"),
        }
        context
    }

    /// Listing page loaded: scroll back and consume the context when it was
    /// recorded on this path. Returns the offset scrolled to.
    pub fn restore_scroll(&self) -> Option<f64> {
        let context = self.read()?;
        if context.section_url.as_deref() != Some(self.window.pathname().as_str()) {
            return None;
        }
        let top = context.scroll_position.unwrap_or(0.0);
        self.window.scroll_to(top);
        self.session.remove_item(SECTION_CONTEXT_KEY);
        Some(top)
    }

    fn read(&self) -> Option<SectionContext> {
        let raw = self.session.get_item(SECTION_CONTEXT_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(context) => Some(context),
            Err(e) => {
                error!("failed to read section context: {e}");
                None
            }
        }
    }
}

/// "Back to {section}" affordance on a detail page.
pub struct BackLink {
    target: String,
    window: Rc<dyn Window>,
}

impl BackLink {
    /// Reveal the back link when a context with a section URL is pending.
    ///
    /// Returns `None`, leaving the wrapper untouched, when there is nothing
    /// to go back to.
    pub fn init(
        wrapper: &ElementHandle,
        button: &ElementHandle,
        contexts: &ContextManager,
    ) -> Option<Self> {
        let ContextState::Pending(context) = contexts.state() else {
            return None;
        };
        let target = context.section_url.filter(|url| !url.is_empty())?;
        let title = context
            .section_title
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "section".to_string());

        wrapper.set_hidden(false);
        button.set_text(&format!("← Back to {title}"));
        Some(Self {
            target,
            window: contexts.window.clone(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    /// Button activated. The stored context is left in place.
    pub fn follow(&self) {
        self.window.assign(&self.target);
    }
}
