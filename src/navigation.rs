//! Site navigation collapse and header metrics.

use crate::host::{ClickModifiers, ElementHandle, KeyValueStore, Window};
use std::rc::Rc;

pub const NAV_STATE_KEY: &str = "site-nav-collapsed";
pub const COLLAPSED_CLASS: &str = "collapsed";
pub const EXPANDED_CLASS: &str = "is-expanded";
pub const HEADER_HEIGHT_PROPERTY: &str = "--header-height";

/// Collapsible site navigation: a toggle button, the nav element carrying the
/// collapsed class and an optional text label. State is persisted on every
/// change.
pub struct NavCollapse {
    toggle: ElementHandle,
    nav: ElementHandle,
    label: Option<ElementHandle>,
    local: Rc<dyn KeyValueStore>,
}

impl NavCollapse {
    /// Render the stored state. Only a stored `"true"` starts collapsed.
    ///
    /// The initial render is persisted as well, so the key always reflects
    /// what is on screen.
    pub fn init(
        toggle: ElementHandle,
        nav: ElementHandle,
        label: Option<ElementHandle>,
        local: Rc<dyn KeyValueStore>,
    ) -> Self {
        let collapsed = local.get_item(NAV_STATE_KEY).as_deref() == Some("true");
        let menu = Self {
            toggle,
            nav,
            label,
            local,
        };
        menu.set_collapsed(collapsed);
        menu
    }

    pub fn is_collapsed(&self) -> bool {
        self.nav.has_class(COLLAPSED_CLASS)
    }

    pub fn set_collapsed(&self, collapsed: bool) {
        self.nav.toggle_class(COLLAPSED_CLASS, collapsed);
        self.toggle
            .set_attribute("aria-expanded", if collapsed { "false" } else { "true" });
        self.toggle.set_attribute(
            "aria-label",
            if collapsed {
                "Expand navigation"
            } else {
                "Collapse navigation"
            },
        );
        self.toggle.toggle_class(EXPANDED_CLASS, !collapsed);
        if let Some(label) = &self.label {
            label.set_text(if collapsed { "Show Menu" } else { "Hide Menu" });
        }
        self.local
            .set_item(NAV_STATE_KEY, if collapsed { "true" } else { "false" });
    }

    pub fn on_toggle(&self) {
        self.set_collapsed(!self.is_collapsed());
    }

    /// Nav or quick link activated. Links opening elsewhere leave the menu
    /// as it is.
    pub fn on_link_click(&self, click: ClickModifiers) {
        if !click.opens_elsewhere() {
            self.set_collapsed(true);
        }
    }
}

/// Publishes the header's height as a CSS custom property.
pub struct HeaderMetrics {
    header: ElementHandle,
    window: Rc<dyn Window>,
}

impl HeaderMetrics {
    pub fn new(header: ElementHandle, window: Rc<dyn Window>) -> Self {
        Self { header, window }
    }

    /// Run at startup and on every resize.
    pub fn update(&self) -> f64 {
        let height = self.header.offset_height();
        self.window
            .set_root_property(HEADER_HEIGHT_PROPERTY, &format!("{height}px"));
        height
    }
}
