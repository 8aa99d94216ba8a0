//! Mobile navigation drawer and in-page anchor scrolling.

use tracing::debug;

use crate::config::ScrollConfig;
use crate::dom::{NodeId, SharedDocument};
use crate::scroll::{header_height, ACTIVE_CLASS};

/// Body class that locks page scrolling while an overlay is open
pub const BODY_LOCK_CLASS: &str = "modal-open";

pub struct Navigation {
    doc: SharedDocument,
    toggle: Option<NodeId>,
    menu: Option<NodeId>,
    header: Option<NodeId>,
    config: ScrollConfig,
}

impl Navigation {
    pub fn attach(doc: SharedDocument, config: &ScrollConfig) -> Self {
        let (toggle, menu, header) = {
            let d = doc.read();
            (
                d.first_by_class("nav-toggle"),
                d.first_by_class("nav-menu"),
                d.first_by_class("navbar"),
            )
        };
        Self {
            doc,
            toggle,
            menu,
            header,
            config: config.clone(),
        }
    }

    pub fn toggle_element(&self) -> Option<NodeId> {
        self.toggle
    }

    pub fn is_open(&self) -> bool {
        let doc = self.doc.read();
        self.menu
            .and_then(|m| doc.get(m))
            .is_some_and(|el| el.has_class(ACTIVE_CLASS))
    }

    /// Open the drawer if closed, close it if open.
    pub fn toggle(&self) {
        let (Some(toggle), Some(menu)) = (self.toggle, self.menu) else {
            return;
        };
        let mut doc = self.doc.write();
        let expanded = doc
            .get(toggle)
            .and_then(|el| el.attr("aria-expanded"))
            .is_some_and(|v| v == "true");
        let open = !expanded;
        doc.update(toggle, |el| el.set_attr("aria-expanded", open.to_string()));
        doc.update(menu, |el| {
            el.toggle_class(ACTIVE_CLASS, None);
        });
        let body = doc.body();
        doc.update(body, |el| {
            el.toggle_class(BODY_LOCK_CLASS, Some(open));
        });
        debug!(open, "Navigation toggled");
    }

    pub fn close(&self) {
        let (Some(toggle), Some(menu)) = (self.toggle, self.menu) else {
            return;
        };
        let mut doc = self.doc.write();
        doc.update(toggle, |el| el.set_attr("aria-expanded", "false"));
        doc.update(menu, |el| el.remove_class(ACTIVE_CLASS));
        let body = doc.body();
        doc.update(body, |el| el.remove_class(BODY_LOCK_CLASS));
    }

    /// Record the new window size; wide viewports force the drawer shut.
    ///
    /// Returns `true` when the breakpoint closed the drawer.
    pub fn on_resize(&self, width: f64, height: f64) -> bool {
        {
            let mut doc = self.doc.write();
            doc.viewport.width = width;
            doc.viewport.height = height;
        }
        if width > self.config.drawer_breakpoint {
            let was_open = self.is_open();
            self.close();
            return was_open;
        }
        false
    }

    /// Scroll position for an in-page link, or `None` when the link is not
    /// an anchor or its target does not exist.
    pub fn anchor_target(&self, link: NodeId) -> Option<f64> {
        let doc = self.doc.read();
        let href = doc.get(link)?.attr("href")?;
        let id = href.strip_prefix('#')?;
        let target = doc.by_id(id)?;
        let offset = doc.get(target)?.layout.offset_top;
        Some(offset - header_height(&doc, self.header, self.config.fallback_header_height))
    }
}
