//! Skills section tabs.

use tracing::debug;

use crate::dom::{NodeId, SharedDocument};
use crate::scroll::ACTIVE_CLASS;

pub struct SkillTabs {
    doc: SharedDocument,
    tabs: Vec<NodeId>,
}

impl SkillTabs {
    pub fn attach(doc: SharedDocument) -> Self {
        let tabs = doc.read().by_class("tab-link");
        Self { doc, tabs }
    }

    pub fn is_tab(&self, id: NodeId) -> bool {
        self.tabs.contains(&id)
    }

    /// Activate the first tab and the first pane.
    pub fn init(&self) {
        let mut doc = self.doc.write();
        let (Some(tab), Some(pane)) = (doc.first_by_class("tab-link"), doc.first_by_class("tab-pane"))
        else {
            return;
        };
        doc.update(tab, |el| el.add_class(ACTIVE_CLASS));
        doc.update(pane, |el| el.add_class(ACTIVE_CLASS));
    }

    /// Make `tab` and its `data-tab` pane the only active ones.
    pub fn switch_to(&self, tab: NodeId) {
        let mut doc = self.doc.write();
        let pane_id = doc.get(tab).and_then(|el| el.data("tab")).map(str::to_string);
        let panes = doc.by_class("tab-pane");

        for &t in &self.tabs {
            doc.update(t, |el| el.remove_class(ACTIVE_CLASS));
        }
        for pane in panes {
            doc.update(pane, |el| el.remove_class(ACTIVE_CLASS));
        }

        doc.update(tab, |el| el.add_class(ACTIVE_CLASS));
        let target = pane_id.as_deref().and_then(|id| doc.by_id(id));
        if let Some(target) = target {
            doc.update(target, |el| el.add_class(ACTIVE_CLASS));
        } else {
            debug!(pane = ?pane_id, "Tab has no matching pane");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    fn page() -> (SharedDocument, Vec<NodeId>, Vec<NodeId>) {
        let mut doc = Document::new();
        let body = doc.body();
        let tabs = vec![
            doc.append(body, Element::new("button").with_class("tab-link").with_attr("data-tab", "ml")),
            doc.append(body, Element::new("button").with_class("tab-link").with_attr("data-tab", "viz")),
            doc.append(body, Element::new("button").with_class("tab-link").with_attr("data-tab", "gone")),
        ];
        let panes = vec![
            doc.append(body, Element::new("div").with_id("ml").with_class("tab-pane")),
            doc.append(body, Element::new("div").with_id("viz").with_class("tab-pane")),
        ];
        (doc.into_shared(), tabs, panes)
    }

    fn active(doc: &SharedDocument, ids: &[NodeId]) -> Vec<bool> {
        let d = doc.read();
        ids.iter().map(|&n| d.get(n).unwrap().has_class(ACTIVE_CLASS)).collect()
    }

    #[test]
    fn test_init_activates_first() {
        let (doc, tabs, panes) = page();
        SkillTabs::attach(doc.clone()).init();
        assert_eq!(active(&doc, &tabs), vec![true, false, false]);
        assert_eq!(active(&doc, &panes), vec![true, false]);
    }

    #[test]
    fn test_switch() {
        let (doc, tabs, panes) = page();
        let skill_tabs = SkillTabs::attach(doc.clone());
        skill_tabs.init();
        skill_tabs.switch_to(tabs[1]);
        assert_eq!(active(&doc, &tabs), vec![false, true, false]);
        assert_eq!(active(&doc, &panes), vec![false, true]);
    }

    #[test]
    fn test_switch_to_missing_pane_clears_panes() {
        let (doc, tabs, panes) = page();
        let skill_tabs = SkillTabs::attach(doc.clone());
        skill_tabs.init();
        skill_tabs.switch_to(tabs[2]);
        assert_eq!(active(&doc, &tabs), vec![false, false, true]);
        assert_eq!(active(&doc, &panes), vec![false, false]);
    }
}
