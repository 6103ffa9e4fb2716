//! Policy modal dialog.

use crate::host::{ElementHandle, Window};
use std::rc::Rc;

/// The policy dialog and the link that opens it. The close button and the
/// backdrop are optional.
pub struct PolicyModal {
    modal: ElementHandle,
    window: Rc<dyn Window>,
    has_close: bool,
    has_backdrop: bool,
}

impl PolicyModal {
    /// `None` unless both the opening link and the dialog exist.
    pub fn init(
        link: Option<&ElementHandle>,
        modal: Option<ElementHandle>,
        close: Option<&ElementHandle>,
        backdrop: Option<&ElementHandle>,
        window: Rc<dyn Window>,
    ) -> Option<Self> {
        link?;
        Some(Self {
            modal: modal?,
            window,
            has_close: close.is_some(),
            has_backdrop: backdrop.is_some(),
        })
    }

    pub fn is_open(&self) -> bool {
        !self.modal.is_hidden()
    }

    /// Link activated. The caller suppresses the link's navigation.
    pub fn open(&self) {
        self.modal.set_hidden(false);
        self.window.set_body_overflow("hidden");
    }

    pub fn close(&self) {
        self.modal.set_hidden(true);
        self.window.set_body_overflow("");
    }

    pub fn on_close_button(&self) {
        if self.has_close {
            self.close();
        }
    }

    pub fn on_backdrop(&self) {
        if self.has_backdrop {
            self.close();
        }
    }

    /// Document keydown. Returns whether the key closed the dialog.
    pub fn on_key(&self, key: &str) -> bool {
        if key == "Escape" && self.is_open() {
            self.close();
            true
        } else {
            false
        }
    }
}
