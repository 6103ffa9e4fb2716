//! Page bootstrap and event routing.
//!
//! The host looks up whatever elements the rendered page has, hands them to
//! [`Page::init`] once, then forwards events through [`Page::dispatch`].
//! Each feature is set up independently: a page without a filter panel still
//! gets its theme, a detail page without entry links still gets its back link.
//!
//! Startup order:
//!
//! 1. theme (resolved, not persisted)
//! 2. header metrics and navigation collapse
//! 3. scroll restore on listing pages, then the back link on detail pages
//! 4. policy modal
//! 5. stored filters checked in the panel, then items filtered by the URL

use crate::context::{BackLink, ContextManager};
use crate::filters::{FilterControls, FilterEngine};
use crate::host::{ClickModifiers, ColorSchemeQuery, ElementHandle, KeyValueStore, Window};
use crate::modal::PolicyModal;
use crate::navigation::{HeaderMetrics, NavCollapse};
use crate::store::FilterStore;
use crate::theme::ThemeManager;
use std::rc::Rc;
use tracing::debug;

/// Browser capabilities shared by every feature.
#[derive(Clone)]
pub struct Host {
    pub local: Rc<dyn KeyValueStore>,
    pub session: Rc<dyn KeyValueStore>,
    pub window: Rc<dyn Window>,
    pub color_scheme: Option<Rc<dyn ColorSchemeQuery>>,
}

/// Elements found on the rendered page. Anything absent is `None` or empty.
#[derive(Default, Clone)]
pub struct PageElements {
    pub filters: FilterControls,
    /// `.main-content`, where the active-filter banner goes.
    pub main: Option<ElementHandle>,
    /// Elements carrying `data-audience` / `data-evidence` / `data-age`.
    pub items: Vec<ElementHandle>,

    pub header: Option<ElementHandle>,
    pub nav_toggle: Option<ElementHandle>,
    pub site_nav: Option<ElementHandle>,
    pub nav_panel: Option<ElementHandle>,
    pub nav_label: Option<ElementHandle>,

    pub theme_toggle: Option<ElementHandle>,

    pub policy_link: Option<ElementHandle>,
    pub policy_modal: Option<ElementHandle>,
    pub policy_close: Option<ElementHandle>,
    pub policy_backdrop: Option<ElementHandle>,

    /// `.section-entry-link` elements, addressed by index in [`Target`].
    pub entry_links: Vec<ElementHandle>,
    /// `.section-page` marker present.
    pub section_page: bool,
    pub back_wrapper: Option<ElementHandle>,
    pub back_button: Option<ElementHandle>,
}

/// What a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    FilterToggle,
    FilterClose,
    ApplyFilters,
    ClearFilters,
    /// The button inside the active-filter banner.
    BannerClear,
    NavToggle,
    /// A `.nav-link` or quick link inside the site navigation.
    NavLink,
    ThemeToggle,
    PolicyLink,
    PolicyClose,
    PolicyBackdrop,
    BackButton,
    SectionEntryLink(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    Click {
        target: Target,
        modifiers: ClickModifiers,
    },
    /// Document keydown with `event.key`.
    KeyDown(String),
    Resize,
    /// `prefers-color-scheme` changed.
    ColorSchemeChange,
}

impl PageEvent {
    pub fn click(target: Target) -> Self {
        PageEvent::Click {
            target,
            modifiers: ClickModifiers::default(),
        }
    }
}

/// Every feature wired up on one page.
pub struct Page {
    filters: FilterEngine,
    contexts: ContextManager,
    back_link: Option<BackLink>,
    theme: ThemeManager,
    nav: Option<NavCollapse>,
    header: Option<HeaderMetrics>,
    policy: Option<PolicyModal>,
    entry_links: Vec<ElementHandle>,
    has_banner: bool,
}

impl Page {
    pub fn init(host: Host, elements: PageElements) -> Self {
        let theme = ThemeManager::new(
            host.local.clone(),
            host.window.clone(),
            host.color_scheme.clone(),
            elements.theme_toggle.clone(),
        );
        theme.init();

        let header = elements
            .header
            .clone()
            .map(|header| HeaderMetrics::new(header, host.window.clone()));
        if let Some(header) = &header {
            header.update();
        }

        let nav = match (&elements.nav_toggle, &elements.site_nav, &elements.nav_panel) {
            (Some(toggle), Some(site_nav), Some(_)) => Some(NavCollapse::init(
                toggle.clone(),
                site_nav.clone(),
                elements.nav_label.clone(),
                host.local.clone(),
            )),
            _ => {
                debug!("navigation collapse not present");
                None
            }
        };

        let contexts = ContextManager::new(host.session.clone(), host.window.clone());
        if elements.section_page {
            contexts.restore_scroll();
        }
        let back_link = match (&elements.back_wrapper, &elements.back_button) {
            (Some(wrapper), Some(button)) => BackLink::init(wrapper, button, &contexts),
            _ => None,
        };

        let policy = PolicyModal::init(
            elements.policy_link.as_ref(),
            elements.policy_modal.clone(),
            elements.policy_close.as_ref(),
            elements.policy_backdrop.as_ref(),
            host.window.clone(),
        );

        let filters = FilterEngine::new(
            elements.filters.clone(),
            FilterStore::new(host.local.clone()),
            host.window.clone(),
        );
        filters.restore_saved();
        let has_banner = filters
            .filter_items(&elements.items, elements.main.as_ref())
            .is_some()
            && elements.main.is_some();

        Self {
            filters,
            contexts,
            back_link,
            theme,
            nav,
            header,
            policy,
            entry_links: elements.entry_links,
            has_banner,
        }
    }

    pub fn contexts(&self) -> &ContextManager {
        &self.contexts
    }

    pub fn back_link(&self) -> Option<&BackLink> {
        self.back_link.as_ref()
    }

    /// Route one event. Returns whether the event's default action must be
    /// prevented.
    pub fn dispatch(&self, event: &PageEvent) -> bool {
        match event {
            PageEvent::Click { target, modifiers } => self.click(*target, *modifiers),
            PageEvent::KeyDown(key) => {
                if let Some(policy) = &self.policy {
                    policy.on_key(key);
                }
                false
            }
            PageEvent::Resize => {
                if let Some(header) = &self.header {
                    header.update();
                }
                false
            }
            PageEvent::ColorSchemeChange => {
                self.theme.on_system_change();
                false
            }
        }
    }

    fn click(&self, target: Target, modifiers: ClickModifiers) -> bool {
        match target {
            Target::FilterToggle => self.filters.toggle_panel(),
            Target::FilterClose => self.filters.close_panel(),
            Target::ApplyFilters => {
                if self.filters.has_apply_button() {
                    self.filters.apply();
                }
            }
            Target::ClearFilters => {
                if self.filters.has_clear_button() {
                    self.filters.clear();
                }
            }
            Target::BannerClear => {
                if self.has_banner {
                    self.filters.navigate_bare();
                }
            }
            Target::NavToggle => {
                if let Some(nav) = &self.nav {
                    nav.on_toggle();
                }
            }
            Target::NavLink => {
                if let Some(nav) = &self.nav {
                    nav.on_link_click(modifiers);
                }
            }
            Target::ThemeToggle => {
                self.theme.toggle();
            }
            Target::PolicyLink => {
                if let Some(policy) = &self.policy {
                    policy.open();
                    return true;
                }
            }
            Target::PolicyClose => {
                if let Some(policy) = &self.policy {
                    policy.on_close_button();
                }
            }
            Target::PolicyBackdrop => {
                if let Some(policy) = &self.policy {
                    policy.on_backdrop();
                }
            }
            Target::BackButton => {
                if let Some(back) = &self.back_link {
                    back.follow();
                    return true;
                }
            }
            Target::SectionEntryLink(index) => {
                if let Some(link) = self.entry_links.get(index) {
                    self.contexts.record(link);
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{ContextState, SECTION_CONTEXT_KEY};
    use crate::host::CheckboxHandle;
    use crate::store::{FILTERS_KEY, MemoryStorage};
    use crate::test_helpers::*;
    use crate::theme::THEME_KEY;
    use pretty_assertions::assert_eq;

    /// One browsing session: storage survives across page loads.
    struct Session {
        local: Rc<MemoryStorage>,
        session: Rc<MemoryStorage>,
        scheme: Rc<MockColorScheme>,
    }

    impl Session {
        fn new() -> Self {
            Self {
                local: Rc::new(MemoryStorage::new()),
                session: Rc::new(MemoryStorage::new()),
                scheme: MockColorScheme::new(Some(false)),
            }
        }

        fn host(&self, window: &Rc<MockWindow>) -> Host {
            Host {
                local: self.local.clone(),
                session: self.session.clone(),
                window: window.clone(),
                color_scheme: Some(self.scheme.clone()),
            }
        }
    }

    #[test]
    fn bare_page_initialises_without_elements() {
        let s = Session::new();
        let window = MockWindow::at("/", "");
        let page = Page::init(s.host(&window), PageElements::default());

        assert_eq!(
            window.root_attribute("data-theme").as_deref(),
            Some("light")
        );
        for target in [
            Target::FilterToggle,
            Target::ApplyFilters,
            Target::ClearFilters,
            Target::BannerClear,
            Target::NavToggle,
            Target::PolicyLink,
            Target::BackButton,
            Target::SectionEntryLink(3),
        ] {
            assert!(!page.dispatch(&PageEvent::click(target)));
        }
        assert!(window.navigations.borrow().is_empty());
        assert!(s.session.is_empty());
    }

    #[test]
    fn listing_to_detail_and_back_restores_scroll() {
        let s = Session::new();

        // Listing page: visitor scrolls, then opens the second entry
        let listing = MockWindow::at("/sections/sleep/", "");
        let entries: Vec<ElementHandle> = vec![
            MockElement::with_data(&[("section", "sleep"), ("sectionTitle", "Sleep")]),
            MockElement::with_data(&[("section", "sleep"), ("sectionTitle", "Sleep")]),
        ];
        let page = Page::init(
            s.host(&listing),
            PageElements {
                entry_links: entries,
                section_page: true,
                ..Default::default()
            },
        );
        listing.scroll_y.set(820.0);
        assert!(!page.dispatch(&PageEvent::click(Target::SectionEntryLink(1))));
        assert!(matches!(page.contexts().state(), ContextState::Pending(_)));

        // Detail page: back link offered
        let detail = MockWindow::at("/articles/sleep-basics/", "");
        let wrapper = MockElement::hidden();
        let button = MockElement::new();
        let page = Page::init(
            s.host(&detail),
            PageElements {
                back_wrapper: Some(wrapper.clone()),
                back_button: Some(button.clone()),
                ..Default::default()
            },
        );
        assert!(!wrapper.hidden.get());
        assert_eq!(button.text(), "← Back to Sleep");
        assert!(page.dispatch(&PageEvent::click(Target::BackButton)));
        assert_eq!(detail.last_navigation().as_deref(), Some("/sections/sleep/"));
        assert!(s.session.get_item(SECTION_CONTEXT_KEY).is_some());

        // Listing again: scroll restored once
        let listing = MockWindow::at("/sections/sleep/", "");
        Page::init(
            s.host(&listing),
            PageElements {
                section_page: true,
                ..Default::default()
            },
        );
        assert_eq!(listing.scrolled_to.borrow().as_slice(), &[820.0]);
        assert!(s.session.is_empty());

        let listing = MockWindow::at("/sections/sleep/", "");
        Page::init(
            s.host(&listing),
            PageElements {
                section_page: true,
                ..Default::default()
            },
        );
        assert!(listing.scrolled_to.borrow().is_empty());
    }

    #[test]
    fn restore_only_runs_on_section_pages() {
        let s = Session::new();
        let window = MockWindow::at("/sections/sleep/", "");
        s.session.set_item(
            SECTION_CONTEXT_KEY,
            r#"{"sectionUrl":"/sections/sleep/","scrollPosition":40}"#,
        );
        Page::init(s.host(&window), PageElements::default());
        assert!(window.scrolled_to.borrow().is_empty());
        assert!(!s.session.is_empty());
    }

    type FilterPage = (
        Page,
        Vec<Rc<MockCheckbox>>,
        Vec<Rc<MockElement>>,
        Rc<MockElement>,
    );

    fn filter_page(window: &Rc<MockWindow>, s: &Session) -> FilterPage {
        let boxes = filter_checkboxes();
        let items = vec![
            MockElement::with_data(&[("audience", "clinician")]),
            MockElement::with_data(&[("audience", "parent, clinician")]),
            MockElement::with_data(&[("audience", "parent")]),
        ];
        let main = MockElement::new();
        let page = Page::init(
            s.host(window),
            PageElements {
                filters: FilterControls {
                    toggle: Some(MockElement::new()),
                    panel: Some(MockElement::hidden()),
                    close: Some(MockElement::new()),
                    apply: Some(MockElement::new()),
                    clear: Some(MockElement::new()),
                    options: boxes.iter().map(|b| b.clone() as CheckboxHandle).collect(),
                },
                main: Some(main.clone()),
                items: items.iter().map(|i| i.clone() as ElementHandle).collect(),
                ..Default::default()
            },
        );
        (page, boxes, items, main)
    }

    #[test]
    fn apply_then_reload_filters_and_restores_panel() {
        let s = Session::new();
        let window = MockWindow::at("/library/", "");
        let (page, boxes, items, main) = filter_page(&window, &s);
        assert!(items.iter().all(|i| i.displayed.get()));
        assert!(main.prepended.borrow().is_empty());

        boxes[0].checked.set(true);
        page.dispatch(&PageEvent::click(Target::ApplyFilters));
        let href = window.last_navigation().unwrap();
        assert_eq!(href, "/library/?audience=parent");

        window.follow(&href);
        let (page, boxes, items, main) = filter_page(&window, &s);
        assert_eq!(checked(&boxes), vec!["audience=parent"]);
        let visible: Vec<bool> = items.iter().map(|i| i.displayed.get()).collect();
        assert_eq!(visible, vec![false, true, true]);
        assert_eq!(main.prepended.borrow().len(), 1);
        assert!(main.prepended.borrow()[0].contains("Audience: parent"));

        page.dispatch(&PageEvent::click(Target::BannerClear));
        assert_eq!(window.last_navigation().as_deref(), Some("/library/"));
        // Banner clear only drops the URL filter
        assert!(s.local.get_item(FILTERS_KEY).is_some());

        page.dispatch(&PageEvent::click(Target::ClearFilters));
        assert!(s.local.get_item(FILTERS_KEY).is_none());
        assert!(checked(&boxes).is_empty());
    }

    #[test]
    fn theme_follows_os_until_toggled() {
        let s = Session::new();
        let window = MockWindow::at("/", "");
        let toggle = MockElement::new();
        let page = Page::init(
            s.host(&window),
            PageElements {
                theme_toggle: Some(toggle.clone()),
                ..Default::default()
            },
        );
        assert_eq!(toggle.text(), "🌙");

        s.scheme.dark.set(Some(true));
        page.dispatch(&PageEvent::ColorSchemeChange);
        assert_eq!(window.root_attribute("data-theme").as_deref(), Some("dark"));
        assert!(s.local.get_item(THEME_KEY).is_none());

        page.dispatch(&PageEvent::click(Target::ThemeToggle));
        assert_eq!(s.local.get_item(THEME_KEY).as_deref(), Some("light"));
        s.scheme.dark.set(Some(true));
        page.dispatch(&PageEvent::ColorSchemeChange);
        assert_eq!(window.root_attribute("data-theme").as_deref(), Some("light"));
    }

    #[test]
    fn navigation_and_header_wiring() {
        let s = Session::new();
        let window = MockWindow::at("/", "");
        let header = MockElement::new();
        header.height.set(64.0);
        let site_nav = MockElement::new();
        let page = Page::init(
            s.host(&window),
            PageElements {
                header: Some(header.clone()),
                nav_toggle: Some(MockElement::new()),
                site_nav: Some(site_nav.clone()),
                nav_panel: Some(MockElement::new()),
                ..Default::default()
            },
        );
        assert_eq!(
            window.root_properties.borrow().get("--header-height").map(String::as_str),
            Some("64px")
        );
        header.height.set(80.0);
        page.dispatch(&PageEvent::Resize);
        assert_eq!(
            window.root_properties.borrow().get("--header-height").map(String::as_str),
            Some("80px")
        );

        let ctrl_click = PageEvent::Click {
            target: Target::NavLink,
            modifiers: ClickModifiers {
                ctrl: true,
                ..Default::default()
            },
        };
        page.dispatch(&ctrl_click);
        assert!(!site_nav.classes.borrow().contains("collapsed"));
        page.dispatch(&PageEvent::click(Target::NavLink));
        assert!(site_nav.classes.borrow().contains("collapsed"));
    }

    #[test]
    fn navigation_needs_its_panel() {
        let s = Session::new();
        let window = MockWindow::at("/", "");
        let site_nav = MockElement::new();
        let page = Page::init(
            s.host(&window),
            PageElements {
                nav_toggle: Some(MockElement::new()),
                site_nav: Some(site_nav.clone()),
                ..Default::default()
            },
        );
        page.dispatch(&PageEvent::click(Target::NavToggle));
        assert!(site_nav.classes.borrow().is_empty());
        assert!(s.local.is_empty());
    }

    #[test]
    fn policy_modal_wiring() {
        let s = Session::new();
        let window = MockWindow::at("/", "");
        let modal = MockElement::hidden();
        let page = Page::init(
            s.host(&window),
            PageElements {
                policy_link: Some(MockElement::new()),
                policy_modal: Some(modal.clone()),
                policy_backdrop: Some(MockElement::new()),
                ..Default::default()
            },
        );
        assert!(page.dispatch(&PageEvent::click(Target::PolicyLink)));
        assert!(!modal.hidden.get());
        assert_eq!(*window.body_overflow.borrow(), "hidden");

        page.dispatch(&PageEvent::KeyDown("Escape".into()));
        assert!(modal.hidden.get());
        assert_eq!(*window.body_overflow.borrow(), "");
    }
}
