//! Light/dark theme preference.
//!
//! Priority: a stored choice, then the OS preference, then light. Only an
//! explicit [`ThemeManager::apply`] (or toggle) persists; until then the
//! page follows the OS live.

use crate::host::{ColorSchemeQuery, ElementHandle, KeyValueStore, Window};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

pub const THEME_KEY: &str = "site-theme";
pub const THEME_ATTRIBUTE: &str = "data-theme";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// Only the exact stored words are accepted.
    pub fn parse(raw: &str) -> Option<Theme> {
        match raw {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn opposite(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Toggle glyph shown while this theme is active.
    pub fn glyph(self) -> &'static str {
        match self {
            Theme::Light => "🌙",
            Theme::Dark => "☀️",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct ThemeManager {
    local: Rc<dyn KeyValueStore>,
    window: Rc<dyn Window>,
    scheme: Option<Rc<dyn ColorSchemeQuery>>,
    toggle: Option<ElementHandle>,
}

impl ThemeManager {
    pub fn new(
        local: Rc<dyn KeyValueStore>,
        window: Rc<dyn Window>,
        scheme: Option<Rc<dyn ColorSchemeQuery>>,
        toggle: Option<ElementHandle>,
    ) -> Self {
        Self {
            local,
            window,
            scheme,
            toggle,
        }
    }

    /// Stored theme, ignoring anything that is not `light` or `dark`.
    pub fn stored(&self) -> Option<Theme> {
        self.local
            .get_item(THEME_KEY)
            .and_then(|raw| Theme::parse(&raw))
    }

    pub fn resolve(&self) -> Theme {
        if let Some(theme) = self.stored() {
            return theme;
        }
        match self.scheme.as_ref().and_then(|s| s.prefers_dark()) {
            Some(true) => Theme::Dark,
            _ => Theme::Light,
        }
    }

    /// Theme currently on the document root, if any.
    pub fn active(&self) -> Option<Theme> {
        self.window
            .root_attribute(THEME_ATTRIBUTE)
            .and_then(|raw| Theme::parse(&raw))
    }

    /// Explicit choice: render and persist.
    pub fn apply(&self, theme: Theme) {
        self.render(theme);
        self.local.set_item(THEME_KEY, theme.as_str());
    }

    /// Show `theme` without persisting it.
    pub fn render(&self, theme: Theme) {
        self.window.set_root_attribute(THEME_ATTRIBUTE, theme.as_str());
        if let Some(toggle) = &self.toggle {
            toggle.set_attribute(
                "aria-label",
                &format!("Switch to {} mode", theme.opposite()),
            );
            toggle.set_text(theme.glyph());
        }
    }

    pub fn toggle(&self) -> Theme {
        let next = self.active().unwrap_or_else(|| self.resolve()).opposite();
        self.apply(next);
        next
    }

    /// Startup: show the resolved theme.
    pub fn init(&self) -> Theme {
        let theme = self.resolve();
        self.render(theme);
        theme
    }

    /// OS preference changed. Ignored once the visitor has chosen.
    pub fn on_system_change(&self) -> Option<Theme> {
        if self.stored().is_some() {
            debug!("ignoring OS theme change, preference is stored");
            return None;
        }
        let theme = self.resolve();
        self.render(theme);
        Some(theme)
    }
}
