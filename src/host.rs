//! Browser capabilities the view-time controllers are written against.
//!
//! Controllers never touch a concrete DOM. The page host hands them these
//! handles once at startup ([`crate::page::Page::init`]) and forwards events
//! back in. Every method takes `&self`: handles are shared references to
//! host-owned objects, mutated in place the way DOM nodes are, and all calls
//! happen on the single UI thread.

use std::rc::Rc;

/// `localStorage` / `sessionStorage`.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str);
    fn remove_item(&self, key: &str);
}

/// The window, its location, and the document root.
pub trait Window {
    /// `location.pathname`.
    fn pathname(&self) -> String;
    /// `location.search`, including the leading `?` (empty when absent).
    fn search(&self) -> String;
    /// Full navigation to `href`. Ends the current page.
    fn assign(&self, href: &str);
    fn scroll_y(&self) -> f64;
    fn scroll_to(&self, top: f64);
    /// Attribute on the document root element (`<html>`).
    fn root_attribute(&self, name: &str) -> Option<String>;
    fn set_root_attribute(&self, name: &str, value: &str);
    /// CSS custom property on the document root.
    fn set_root_property(&self, name: &str, value: &str);
    /// `document.body.style.overflow`.
    fn set_body_overflow(&self, value: &str);
}

/// A rendered element the controllers read from or mutate.
pub trait Element {
    fn is_hidden(&self) -> bool;
    fn set_hidden(&self, hidden: bool);
    fn set_text(&self, text: &str);
    fn set_attribute(&self, name: &str, value: &str);
    /// `data-*` attribute, keyed without the prefix (`"sectionTitle"`).
    fn data(&self, key: &str) -> Option<String>;
    fn has_class(&self, class: &str) -> bool;
    fn toggle_class(&self, class: &str, on: bool);
    /// `style.display`: `""` shows, `"none"` hides.
    fn set_display(&self, visible: bool);
    fn offset_height(&self) -> f64;
    /// Insert trusted markup as the element's first child.
    fn prepend_html(&self, html: &str);
}

/// A filter option checkbox (`.filter-option input[type=checkbox]`).
pub trait Checkbox {
    /// `name` attribute: the facet key.
    fn name(&self) -> String;
    /// `value` attribute: the facet value.
    fn value(&self) -> String;
    fn is_checked(&self) -> bool;
    fn set_checked(&self, checked: bool);
}

/// `matchMedia('(prefers-color-scheme: dark)')`.
pub trait ColorSchemeQuery {
    /// `None` when the host cannot answer.
    fn prefers_dark(&self) -> Option<bool>;
}

pub type ElementHandle = Rc<dyn Element>;
pub type CheckboxHandle = Rc<dyn Checkbox>;

/// Mouse button and modifier state of a click.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickModifiers {
    /// `event.button`: 0 primary, 1 middle.
    pub button: u16,
    pub meta: bool,
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl ClickModifiers {
    /// A click the browser will handle itself (new tab, new window, ...).
    pub fn opens_elsewhere(&self) -> bool {
        self.button == 1 || self.meta || self.ctrl || self.shift || self.alt
    }
}
