//! Arena-backed page tree plus the browser viewport.

use std::sync::Arc;

use parking_lot::RwLock;

use super::element::{Element, NodeId};

/// Shared handle to the page. Locks are never held across an `.await`.
pub type SharedDocument = Arc<RwLock<Document>>;

/// Browser window state relevant to the page scripts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// `window.scrollY`
    pub scroll_y: f64,
    /// `window.innerWidth`
    pub width: f64,
    /// `window.innerHeight`
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scroll_y: 0.0,
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// The page tree.
///
/// Detaching a subtree (clearing a container, replacing content with markup)
/// frees its nodes, and later appends reuse the freed slots. A `NodeId` of a
/// detached node resolves to `None` until its slot is handed out again, so
/// components must not keep ids of nodes they clear.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Option<Element>>,
    free: Vec<usize>,
    root: NodeId,
    body: NodeId,
    pub viewport: Viewport,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document containing only `<html>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: vec![Some(Element::new("html"))],
            free: Vec::new(),
            root: NodeId(0),
            body: NodeId(0),
            viewport: Viewport::default(),
        };
        doc.body = doc.append(doc.root, Element::new("body"));
        doc
    }

    pub fn into_shared(self) -> SharedDocument {
        Arc::new(RwLock::new(self))
    }

    /// `document.documentElement`
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn get(&self, id: NodeId) -> Option<&Element> {
        self.nodes.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        self.nodes.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Number of arena slots, live or free.
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Number of live nodes, attached or not.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    /// Apply `f` to an element if it exists. Missing nodes are a no-op.
    pub fn update(&mut self, id: NodeId, f: impl FnOnce(&mut Element)) {
        if let Some(el) = self.get_mut(id) {
            f(el);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Tree mutation
    // ═══════════════════════════════════════════════════════════════════════

    /// Insert `element` as the last child of `parent` and return its id.
    pub fn append(&mut self, parent: NodeId, mut element: Element) -> NodeId {
        element.parent = Some(parent);
        element.children.clear();
        let id = match self.free.pop() {
            Some(slot) => {
                self.nodes[slot] = Some(element);
                NodeId(slot)
            }
            None => {
                self.nodes.push(Some(element));
                NodeId(self.nodes.len() - 1)
            }
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.push(id);
        }
        id
    }

    /// Remove every child of `parent` (`innerHTML = ''`) and free the
    /// detached subtrees.
    pub fn clear_children(&mut self, parent: NodeId) {
        let mut stack = match self.get_mut(parent) {
            Some(p) => std::mem::take(&mut p.children),
            None => return,
        };
        while let Some(id) = stack.pop() {
            if let Some(el) = self.nodes.get_mut(id.0).and_then(Option::take) {
                stack.extend(el.children);
                self.free.push(id.0);
            }
        }
    }

    /// Replace an element's content with markup, detaching its children.
    pub fn set_markup(&mut self, id: NodeId, markup: impl Into<String>) {
        self.clear_children(id);
        if let Some(el) = self.get_mut(id) {
            el.set_markup_raw(markup);
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════

    /// All attached nodes below `from` (inclusive), in document order.
    pub fn descendants(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            let Some(el) = self.get(id) else { continue };
            out.push(id);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    /// `document.getElementById`
    pub fn by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.get(n).is_some_and(|el| el.id.as_deref() == Some(id)))
    }

    /// `document.querySelectorAll('.class')`
    pub fn by_class(&self, class: &str) -> Vec<NodeId> {
        self.find_all(self.root, |el| el.has_class(class))
    }

    /// `document.querySelector('.class')`
    pub fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.find_first(self.root, |el| el.has_class(class))
    }

    /// First descendant of `scope` (inclusive) with the class.
    pub fn find_class_within(&self, scope: NodeId, class: &str) -> Option<NodeId> {
        self.find_first(scope, |el| el.has_class(class))
    }

    pub fn find_all(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|&n| self.get(n).is_some_and(&pred))
            .collect()
    }

    pub fn find_first(&self, scope: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|&n| self.get(n).is_some_and(&pred))
    }

    /// `element.closest('.class')`: the node itself or its nearest ancestor.
    pub fn closest(&self, id: NodeId, class: &str) -> Option<NodeId> {
        self.closest_matching(id, |el| el.has_class(class))
    }

    /// The node itself or its nearest ancestor satisfying `pred`.
    pub fn closest_matching(&self, id: NodeId, pred: impl Fn(&Element) -> bool) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            let el = self.get(node)?;
            if pred(el) {
                return Some(node);
            }
            current = el.parent;
        }
        None
    }

    /// Whether `id` is `ancestor` or sits somewhere below it.
    pub fn is_within(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ancestor {
                return true;
            }
            current = self.get(node).and_then(|el| el.parent);
        }
        false
    }

    /// `element.nextElementSibling`
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent?;
        let siblings = &self.get(parent)?.children;
        let pos = siblings.iter().position(|&s| s == id)?;
        siblings.get(pos + 1).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Document, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let list = doc.append(body, Element::new("ul").with_id("list").with_class("menu"));
        let a = doc.append(list, Element::new("li").with_class("item").with_text("a"));
        let b = doc.append(list, Element::new("li").with_class("item").with_text("b"));
        (doc, list, a, b)
    }

    #[test]
    fn test_queries_follow_document_order() {
        let (doc, list, a, b) = sample();
        assert_eq!(doc.by_id("list"), Some(list));
        assert_eq!(doc.by_class("item"), vec![a, b]);
        assert_eq!(doc.first_by_class("item"), Some(a));
        assert_eq!(doc.next_sibling(a), Some(b));
        assert_eq!(doc.next_sibling(b), None);
        assert_eq!(doc.closest(b, "menu"), Some(list));
        assert!(doc.is_within(b, list));
        assert!(!doc.is_within(list, b));
    }

    #[test]
    fn test_clear_children_frees_subtree() {
        let (mut doc, list, a, b) = sample();
        let nested = doc.append(a, Element::new("span").with_class("item"));
        assert_eq!(doc.live_nodes(), 6);

        doc.clear_children(list);
        assert!(doc.by_class("item").is_empty());
        assert!(doc.get(list).unwrap().children().is_empty());
        for freed in [a, b, nested] {
            assert!(doc.get(freed).is_none());
        }
        assert_eq!(doc.live_nodes(), 3);
    }

    #[test]
    fn test_freed_slots_are_reused() {
        let (mut doc, list, _, _) = sample();
        let baseline = doc.arena_len();
        for round in 0..10 {
            doc.clear_children(list);
            for i in 0..2 {
                let li = doc.append(list, Element::new("li").with_class("item"));
                doc.append(li, Element::new("span").with_text(format!("{round}-{i}")));
            }
            assert!(doc.arena_len() <= baseline + 2, "arena grew on round {round}");
        }
        assert_eq!(doc.by_class("item").len(), 2);
        assert_eq!(doc.live_nodes(), 7);
    }

    #[test]
    fn test_set_markup_replaces_children() {
        let (mut doc, list, a, _) = sample();
        doc.set_markup(list, "<li>x</li>");
        let el = doc.get(list).unwrap();
        assert_eq!(el.markup(), Some("<li>x</li>"));
        assert!(el.children().is_empty());
        assert!(doc.get(a).is_none());
    }

    #[test]
    fn test_update_missing_node_is_noop() {
        let mut doc = Document::new();
        doc.update(NodeId(999), |el| el.add_class("x"));
    }
}
