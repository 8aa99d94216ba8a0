//! Scroll-position reactor.
//!
//! Runs on every scroll event, unthrottled:
//! - picks the section under `scrollY + header height + offset` and marks
//!   its navigation link as the only active one
//! - toggles `scrolled` on the header past a small threshold
//! - fades the scroll hint out once the visitor has scrolled a bit
//!
//! When the probe position falls between sections (or past the last one)
//! the previously active link stays active. Links are only ever cleared
//! when another section matches.

use tracing::trace;

use crate::config::ScrollConfig;
use crate::dom::{Document, NodeId, SharedDocument};

pub const ACTIVE_CLASS: &str = "active";
pub const SCROLLED_CLASS: &str = "scrolled";

/// Height of the fixed header, or `fallback` when missing or collapsed.
pub fn header_height(doc: &Document, header: Option<NodeId>, fallback: f64) -> f64 {
    header
        .and_then(|h| doc.get(h))
        .map(|el| el.layout.offset_height)
        .filter(|&h| h > 0.0)
        .unwrap_or(fallback)
}

pub struct ScrollReactor {
    doc: SharedDocument,
    header: Option<NodeId>,
    hint: Option<NodeId>,
    links: Vec<NodeId>,
    config: ScrollConfig,
}

impl ScrollReactor {
    pub fn attach(doc: SharedDocument, config: &ScrollConfig) -> Self {
        let (header, hint, links) = {
            let d = doc.read();
            (
                d.first_by_class("navbar"),
                d.first_by_class("scroll-indicator"),
                d.by_class("nav-link"),
            )
        };
        Self {
            doc,
            header,
            hint,
            links,
            config: config.clone(),
        }
    }

    pub fn header_height(&self) -> f64 {
        header_height(&self.doc.read(), self.header, self.config.fallback_header_height)
    }

    /// Record the new scroll position and update everything that depends on it.
    pub fn on_scroll(&self, y: f64) {
        self.doc.write().viewport.scroll_y = y;
        self.update_active_link();
        self.update_scroll_hint();
        self.update_header_style();
    }

    /// Returns the section that matched, if any.
    pub fn update_active_link(&self) -> Option<NodeId> {
        let mut doc = self.doc.write();
        let probe = doc.viewport.scroll_y
            + header_height(&doc, self.header, self.config.fallback_header_height)
            + self.config.active_offset;

        let root = doc.root();
        let sections = doc.find_all(root, |el| el.tag == "section" && el.id.is_some());

        let mut matched = None;
        for section in sections {
            let Some(el) = doc.get(section) else { continue };
            if !el.layout.contains(probe) {
                continue;
            }
            let href = format!("#{}", el.id.as_deref().unwrap_or_default());
            for &link in &self.links {
                doc.update(link, |l| {
                    l.remove_class(ACTIVE_CLASS);
                    if l.attr("href") == Some(href.as_str()) {
                        l.add_class(ACTIVE_CLASS);
                    }
                });
            }
            matched = Some(section);
        }
        trace!(probe, ?matched, "Active section");
        matched
    }

    pub fn update_header_style(&self) {
        let Some(header) = self.header else { return };
        let mut doc = self.doc.write();
        let scrolled = doc.viewport.scroll_y > self.config.header_scrolled_after;
        doc.update(header, |el| {
            el.toggle_class(SCROLLED_CLASS, Some(scrolled));
        });
    }

    pub fn update_scroll_hint(&self) {
        let Some(hint) = self.hint else { return };
        let mut doc = self.doc.write();
        let opacity = if doc.viewport.scroll_y > self.config.hint_hidden_after {
            "0"
        } else {
            "1"
        };
        doc.update(hint, |el| el.set_style("opacity", opacity));
    }

    /// Currently active navigation link
    pub fn active_link(&self) -> Option<NodeId> {
        let doc = self.doc.read();
        self.links
            .iter()
            .copied()
            .find(|&l| doc.get(l).is_some_and(|el| el.has_class(ACTIVE_CLASS)))
    }
}
