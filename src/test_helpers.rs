//! Shared test utilities for the facetsite test suite.
//!
//! Two halves:
//!
//! - **Content fixtures**: a small content tree written into a temp dir, plus
//!   lookups over the compiled index that panic with a clear message on miss.
//! - **Host mocks**: in-memory [`Window`], [`Element`], [`Checkbox`] and
//!   [`ColorSchemeQuery`] implementations that record what the controllers
//!   did to them.
//!
//! ```rust
//! let tmp = setup_content();
//! let (_, index) = scan(tmp.path()).unwrap();
//! let record = find_record(&index, "/articles/sleep-basics/");
//!
//! let window = MockWindow::at("/library/", "?audience=parent");
//! let item = MockElement::with_data(&[("audience", "parent")]);
//! ```

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::rc::Rc;
use tempfile::TempDir;

use crate::host::{Checkbox, ColorSchemeQuery, Element, Window};
use crate::types::{IndexRecord, SearchIndex};

// =========================================================================
// Content fixtures
// =========================================================================

const FIXTURE_CONFIG: &str = r#"
[[groups]]
name = "articles"
glob = "articles/**/*.md"

[[groups]]
name = "resources"
glob = "resources/*.md"
"#;

/// Write `content` to `root/rel`, creating parent directories.
pub fn write_doc(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Build the standard two-group content tree in a temp directory.
///
/// ```text
/// config.toml
/// articles/010-sleep-basics.md         front matter: title, tags, category, audience
/// articles/020-night-waking.md         heading title only
/// articles/research/010-melatonin.md   category set
/// resources/010-first-steps.md         heading title only, no facets
/// resources/printable.md               permalink /resources/checklist/
/// ```
pub fn setup_content() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write_doc(root, "config.toml", FIXTURE_CONFIG);
    write_doc(
        root,
        "articles/010-sleep-basics.md",
        "---\ntitle: Sleep basics\ntags: [sleep, routines]\ncategory: guides\naudience: [parent, clinician]\n---\n# Sleep basics\n\nShort naps are **normal** in the first months.\n",
    );
    write_doc(
        root,
        "articles/020-night-waking.md",
        "---\naudience: parent\n---\n# Night waking\n\nWhat to expect.\n",
    );
    write_doc(
        root,
        "articles/research/010-melatonin.md",
        "---\ntitle: Melatonin\ncategory: [research, sleep]\naudience: [clinician]\n---\nEvidence summary.\n",
    );
    write_doc(
        root,
        "resources/010-first-steps.md",
        "# First steps\n\nA plain document.\n",
    );
    write_doc(
        root,
        "resources/printable.md",
        "---\ntitle: Checklist\npermalink: /resources/checklist/\ntags: print\n---\n- [ ] bedtime\n",
    );
    tmp
}

/// Find a record by URL. Panics if not found.
pub fn find_record<'a>(index: &'a SearchIndex, url: &str) -> &'a IndexRecord {
    index
        .records
        .iter()
        .find(|r| r.url == url)
        .unwrap_or_else(|| {
            let urls = record_urls(index);
            panic!("record '{url}' not found. Available: {urls:?}")
        })
}

/// All record URLs in index order.
pub fn record_urls(index: &SearchIndex) -> Vec<&str> {
    index.records.iter().map(|r| r.url.as_str()).collect()
}

// =========================================================================
// Host mocks
// =========================================================================

/// Window whose navigation, scrolling and root mutations are recorded.
#[derive(Debug, Default)]
pub struct MockWindow {
    pub pathname: RefCell<String>,
    pub search: RefCell<String>,
    pub scroll_y: Cell<f64>,
    pub navigations: RefCell<Vec<String>>,
    pub scrolled_to: RefCell<Vec<f64>>,
    pub root_attributes: RefCell<BTreeMap<String, String>>,
    pub root_properties: RefCell<BTreeMap<String, String>>,
    pub body_overflow: RefCell<String>,
}

impl MockWindow {
    pub fn at(pathname: &str, search: &str) -> Rc<Self> {
        Rc::new(Self {
            pathname: RefCell::new(pathname.to_string()),
            search: RefCell::new(search.to_string()),
            ..Default::default()
        })
    }

    /// Last `assign` target, if any.
    pub fn last_navigation(&self) -> Option<String> {
        self.navigations.borrow().last().cloned()
    }

    /// Simulate the reload the browser performs after `assign(href)`.
    pub fn follow(&self, href: &str) {
        let (path, query) = match href.split_once('?') {
            Some((p, q)) => (p.to_string(), format!("?{q}")),
            None => (href.to_string(), String::new()),
        };
        *self.pathname.borrow_mut() = path;
        *self.search.borrow_mut() = query;
    }
}

impl Window for MockWindow {
    fn pathname(&self) -> String {
        self.pathname.borrow().clone()
    }

    fn search(&self) -> String {
        self.search.borrow().clone()
    }

    fn assign(&self, href: &str) {
        self.navigations.borrow_mut().push(href.to_string());
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn scroll_to(&self, top: f64) {
        self.scroll_y.set(top);
        self.scrolled_to.borrow_mut().push(top);
    }

    fn root_attribute(&self, name: &str) -> Option<String> {
        self.root_attributes.borrow().get(name).cloned()
    }

    fn set_root_attribute(&self, name: &str, value: &str) {
        self.root_attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn set_root_property(&self, name: &str, value: &str) {
        self.root_properties
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn set_body_overflow(&self, value: &str) {
        *self.body_overflow.borrow_mut() = value.to_string();
    }
}

/// Element with observable state.
#[derive(Debug, Default)]
pub struct MockElement {
    pub hidden: Cell<bool>,
    pub text: RefCell<String>,
    pub attributes: RefCell<BTreeMap<String, String>>,
    pub data: RefCell<BTreeMap<String, String>>,
    pub classes: RefCell<BTreeSet<String>>,
    pub displayed: Cell<bool>,
    pub height: Cell<f64>,
    pub prepended: RefCell<Vec<String>>,
}

impl MockElement {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            displayed: Cell::new(true),
            ..Default::default()
        })
    }

    pub fn hidden() -> Rc<Self> {
        let el = Self::new();
        el.hidden.set(true);
        el
    }

    /// Element carrying `data-*` attributes.
    pub fn with_data(pairs: &[(&str, &str)]) -> Rc<Self> {
        let el = Self::new();
        el.data
            .borrow_mut()
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        el
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    pub fn text(&self) -> String {
        self.text.borrow().clone()
    }
}

impl Element for MockElement {
    fn is_hidden(&self) -> bool {
        self.hidden.get()
    }

    fn set_hidden(&self, hidden: bool) {
        self.hidden.set(hidden);
    }

    fn set_text(&self, text: &str) {
        *self.text.borrow_mut() = text.to_string();
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.attributes
            .borrow_mut()
            .insert(name.to_string(), value.to_string());
    }

    fn data(&self, key: &str) -> Option<String> {
        self.data.borrow().get(key).cloned()
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }

    fn toggle_class(&self, class: &str, on: bool) {
        let mut classes = self.classes.borrow_mut();
        if on {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn set_display(&self, visible: bool) {
        self.displayed.set(visible);
    }

    fn offset_height(&self) -> f64 {
        self.height.get()
    }

    fn prepend_html(&self, html: &str) {
        self.prepended.borrow_mut().insert(0, html.to_string());
    }
}

/// Filter option checkbox.
#[derive(Debug)]
pub struct MockCheckbox {
    pub name: String,
    pub value: String,
    pub checked: Cell<bool>,
}

impl MockCheckbox {
    pub fn new(name: &str, value: &str) -> Rc<Self> {
        Rc::new(Self {
            name: name.to_string(),
            value: value.to_string(),
            checked: Cell::new(false),
        })
    }
}

impl Checkbox for MockCheckbox {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn value(&self) -> String {
        self.value.clone()
    }

    fn is_checked(&self) -> bool {
        self.checked.get()
    }

    fn set_checked(&self, checked: bool) {
        self.checked.set(checked);
    }
}

/// The standard filter panel: two audiences, two evidence levels, two ages.
pub fn filter_checkboxes() -> Vec<Rc<MockCheckbox>> {
    vec![
        MockCheckbox::new("audience", "parent"),
        MockCheckbox::new("audience", "clinician"),
        MockCheckbox::new("evidenceLevel", "high"),
        MockCheckbox::new("evidenceLevel", "moderate"),
        MockCheckbox::new("ageRange", "0-2"),
        MockCheckbox::new("ageRange", "3-5"),
    ]
}

/// `name=value` of every checked box, in panel order.
pub fn checked(boxes: &[Rc<MockCheckbox>]) -> Vec<String> {
    boxes
        .iter()
        .filter(|b| b.checked.get())
        .map(|b| format!("{}={}", b.name, b.value))
        .collect()
}

/// OS colour-scheme preference that tests can flip.
#[derive(Debug, Default)]
pub struct MockColorScheme {
    pub dark: Cell<Option<bool>>,
}

impl MockColorScheme {
    pub fn new(dark: Option<bool>) -> Rc<Self> {
        Rc::new(Self {
            dark: Cell::new(dark),
        })
    }
}

impl ColorSchemeQuery for MockColorScheme {
    fn prefers_dark(&self) -> Option<bool> {
        self.dark.get()
    }
}
