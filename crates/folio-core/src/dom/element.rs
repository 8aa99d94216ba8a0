//! A single element in the page tree.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable index of an element inside a [`Document`](super::Document) arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// Vertical layout box of an element, in page coordinates.
///
/// Only the vertical axis matters to the scroll and visibility logic, so the
/// horizontal extent is not modelled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBox {
    /// Distance from the top of the page
    pub offset_top: f64,
    /// Rendered height
    pub offset_height: f64,
}

impl LayoutBox {
    pub fn new(offset_top: f64, offset_height: f64) -> Self {
        Self {
            offset_top,
            offset_height,
        }
    }

    /// Bottom edge (exclusive)
    pub fn bottom(&self) -> f64 {
        self.offset_top + self.offset_height
    }

    /// Whether `y` falls within `[top, bottom)`.
    pub fn contains(&self, y: f64) -> bool {
        y >= self.offset_top && y < self.bottom()
    }
}

/// An element: tag, identity, classes, attributes, inline styles and content.
///
/// Content is either plain text (`text`) or pre-rendered markup (`markup`).
/// Setting one clears the other, mirroring how `textContent`/`innerHTML`
/// replace each other.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    pub tag: String,
    pub id: Option<String>,
    classes: Vec<String>,
    attributes: BTreeMap<String, String>,
    styles: BTreeMap<String, String>,
    text: String,
    markup: Option<String>,
    value: String,
    disabled: bool,
    pub layout: LayoutBox,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Builders
    // ═══════════════════════════════════════════════════════════════════════

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Add one or more space-separated classes.
    pub fn with_class(mut self, classes: &str) -> Self {
        for class in classes.split_whitespace() {
            self.add_class(class);
        }
        self
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.set_text(text);
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    pub fn with_layout(mut self, offset_top: f64, offset_height: f64) -> Self {
        self.layout = LayoutBox::new(offset_top, offset_height);
        self
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Classes
    // ═══════════════════════════════════════════════════════════════════════

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }

    /// Toggle a class, or force it on/off. Returns whether the class is now present.
    pub fn toggle_class(&mut self, class: &str, force: Option<bool>) -> bool {
        let on = force.unwrap_or(!self.has_class(class));
        if on {
            self.add_class(class);
        } else {
            self.remove_class(class);
        }
        on
    }

    /// Replace the whole class list with a space-separated string.
    pub fn set_class_name(&mut self, class_name: &str) {
        self.classes.clear();
        for class in class_name.split_whitespace() {
            self.add_class(class);
        }
    }

    pub fn class_name(&self) -> String {
        self.classes.join(" ")
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Attributes and styles
    // ═══════════════════════════════════════════════════════════════════════

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        self.attributes.insert(name.to_string(), value.into());
    }

    /// Read a `data-*` attribute by its suffix (`data("project-title")`).
    pub fn data(&self, name: &str) -> Option<&str> {
        self.attr(&format!("data-{name}"))
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles.get(property).map(String::as_str)
    }

    pub fn set_style(&mut self, property: &str, value: impl Into<String>) {
        self.styles.insert(property.to_string(), value.into());
    }

    /// `display: none` counts as hidden; anything else (including unset) is shown.
    pub fn is_displayed(&self) -> bool {
        self.style("display") != Some("none")
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Content
    // ═══════════════════════════════════════════════════════════════════════

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.markup = None;
    }

    pub fn push_char(&mut self, ch: char) {
        self.text.push(ch);
    }

    pub fn markup(&self) -> Option<&str> {
        self.markup.as_deref()
    }

    /// Form control value (`input.value`).
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    pub fn set_disabled(&mut self, disabled: bool) {
        self.disabled = disabled;
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Replace content with markup. Children are detached by the document.
    pub(super) fn set_markup_raw(&mut self, markup: impl Into<String>) {
        self.markup = Some(markup.into());
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_list_is_a_set() {
        let mut el = Element::new("div").with_class("a b a");
        assert_eq!(el.class_name(), "a b");
        el.add_class("b");
        assert_eq!(el.class_name(), "a b");
    }

    #[test]
    fn test_toggle_class() {
        let mut el = Element::new("div");
        assert!(el.toggle_class("active", None));
        assert!(!el.toggle_class("active", None));
        assert!(el.toggle_class("active", Some(true)));
        assert!(el.toggle_class("active", Some(true)));
        assert!(!el.toggle_class("active", Some(false)));
        assert!(!el.has_class("active"));
    }

    #[test]
    fn test_text_and_markup_replace_each_other() {
        let mut el = Element::new("div").with_text("plain");
        el.set_markup_raw("<b>bold</b>");
        assert_eq!(el.text(), "");
        assert_eq!(el.markup(), Some("<b>bold</b>"));
        el.set_text("again");
        assert_eq!(el.markup(), None);
    }

    #[test]
    fn test_data_attribute() {
        let el = Element::new("article").with_attr("data-project-title", "Churn");
        assert_eq!(el.data("project-title"), Some("Churn"));
        assert_eq!(el.data("missing"), None);
    }

    #[test]
    fn test_layout_contains_is_half_open() {
        let layout = LayoutBox::new(100.0, 50.0);
        assert!(layout.contains(100.0));
        assert!(layout.contains(149.9));
        assert!(!layout.contains(150.0));
        assert!(!layout.contains(99.9));
    }
}
