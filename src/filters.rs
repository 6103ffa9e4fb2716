//! Filter panel controller.
//!
//! Connects the pure selection model in [`crate::facets`] to the rendered
//! filter controls, local storage and the page URL:
//!
//! - **apply**: checked controls → storage + query string, then reload.
//! - **clear**: uncheck everything, drop storage, reload the bare path.
//! - **restore**: on load, check the controls named by the stored selection.
//! - **filter**: on load, hide items that fail the URL's selection and show
//!   the active-filter banner.
//!
//! After `apply` the stored and URL selections are equal. Both reloads are
//! full navigations, so nothing here outlives the call that navigates.

use crate::facets::{self, Facet, FilterSelection, ItemFacets};
use crate::host::{CheckboxHandle, ElementHandle, Window};
use crate::store::FilterStore;
use std::rc::Rc;
use tracing::debug;

/// Filter controls found on the page. Every handle is optional.
#[derive(Default, Clone)]
pub struct FilterControls {
    pub toggle: Option<ElementHandle>,
    pub panel: Option<ElementHandle>,
    pub close: Option<ElementHandle>,
    pub apply: Option<ElementHandle>,
    pub clear: Option<ElementHandle>,
    pub options: Vec<CheckboxHandle>,
}

pub struct FilterEngine {
    controls: FilterControls,
    store: FilterStore,
    window: Rc<dyn Window>,
}

impl FilterEngine {
    pub fn new(controls: FilterControls, store: FilterStore, window: Rc<dyn Window>) -> Self {
        Self {
            controls,
            store,
            window,
        }
    }

    /// Filter toggle button: flip the panel. No-op without both elements.
    pub fn toggle_panel(&self) {
        if self.controls.toggle.is_none() {
            return;
        }
        if let Some(panel) = &self.controls.panel {
            panel.set_hidden(!panel.is_hidden());
        }
    }

    /// Filter close button: hide the panel.
    pub fn close_panel(&self) {
        if self.controls.close.is_none() {
            return;
        }
        if let Some(panel) = &self.controls.panel {
            panel.set_hidden(true);
        }
    }

    pub fn has_apply_button(&self) -> bool {
        self.controls.apply.is_some()
    }

    pub fn has_clear_button(&self) -> bool {
        self.controls.clear.is_some()
    }

    /// Selection currently expressed by the checked controls.
    ///
    /// Controls whose name is not a facet key are ignored.
    pub fn selected(&self) -> FilterSelection {
        let mut selection = FilterSelection::default();
        for option in self.controls.options.iter().filter(|o| o.is_checked()) {
            if let Some(facet) = Facet::from_key(&option.name()) {
                selection.insert(facet, option.value());
            }
        }
        selection
    }

    /// Persist the checked controls and reload with them in the URL.
    pub fn apply(&self) -> String {
        self.apply_selection(&self.selected())
    }

    /// Persist `selection` and reload with it in the URL. Returns the target.
    pub fn apply_selection(&self, selection: &FilterSelection) -> String {
        self.store.save(selection);
        let href = selection.href(&self.window.pathname());
        debug!(%href, "applying filters");
        self.window.assign(&href);
        href
    }

    /// Uncheck every control, forget the stored selection, reload bare.
    pub fn clear(&self) -> String {
        for option in &self.controls.options {
            option.set_checked(false);
        }
        self.store.clear();
        self.navigate_bare()
    }

    /// Reload the current path without a query string.
    pub fn navigate_bare(&self) -> String {
        let href = self.window.pathname();
        self.window.assign(&href);
        href
    }

    /// Check the controls named by the stored selection.
    ///
    /// Stored values with no matching control are ignored. Controls not named
    /// are left as rendered. Returns the stored selection when one was read.
    pub fn restore_saved(&self) -> Option<FilterSelection> {
        let saved = self.store.load()?;
        for option in &self.controls.options {
            let Some(facet) = Facet::from_key(&option.name()) else {
                continue;
            };
            if saved.values(facet).contains(&option.value()) {
                option.set_checked(true);
            }
        }
        Some(saved)
    }

    /// Apply the URL's selection to the rendered items.
    ///
    /// Skipped entirely (everything stays visible, no banner) when the URL
    /// carries no facet values. Otherwise sets each item's visibility and
    /// prepends the banner to `main` when present. Returns the selection
    /// that was applied.
    pub fn filter_items(
        &self,
        items: &[ElementHandle],
        main: Option<&ElementHandle>,
    ) -> Option<FilterSelection> {
        let search = self.window.search();
        if search.is_empty() {
            return None;
        }
        let selection = FilterSelection::from_query(&search);
        if selection.is_empty() {
            return None;
        }

        let mut shown = 0;
        for item in items {
            let facets = ItemFacets::from_data(|key| item.data(key));
            let visible = facets::evaluate(&facets, &selection);
            item.set_display(visible);
            shown += usize::from(visible);
        }
        debug!(shown, total = items.len(), "filtered content items");

        if let (Some(main), Some(banner)) = (main, facets::banner(&selection)) {
            main.prepend_html(&banner.into_string());
        }
        Some(selection)
    }
}
