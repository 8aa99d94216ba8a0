//! Scroll-triggered reveal animations.
//!
//! Every target element is marked `animated-element` (hidden/offset by the
//! stylesheet) and observed. The first time enough of it is on screen it
//! gains `is-visible` and is dropped from the observed set. Reveals are
//! one-way: nothing ever removes `is-visible`.

use std::collections::HashSet;

use tracing::debug;

use crate::config::RevealConfig;
use crate::dom::{LayoutBox, NodeId, SharedDocument, Viewport};

pub const ANIMATED_CLASS: &str = "animated-element";
pub const VISIBLE_CLASS: &str = "is-visible";

/// Visible fraction of `layout` inside the viewport, after shrinking the
/// viewport's bottom edge by `bottom_margin` pixels.
///
/// Zero-height elements count as fully visible when their top edge is in range.
pub fn intersection_ratio(layout: &LayoutBox, viewport: &Viewport, bottom_margin: f64) -> f64 {
    let view_top = viewport.scroll_y;
    let view_bottom = viewport.scroll_y + viewport.height - bottom_margin;
    if view_bottom <= view_top {
        return 0.0;
    }
    if layout.offset_height <= 0.0 {
        let inside = layout.offset_top >= view_top && layout.offset_top <= view_bottom;
        return if inside { 1.0 } else { 0.0 };
    }
    let visible = layout.bottom().min(view_bottom) - layout.offset_top.max(view_top);
    (visible.max(0.0) / layout.offset_height).min(1.0)
}

/// Observer over the reveal targets.
pub struct RevealEngine {
    doc: SharedDocument,
    observed: Vec<NodeId>,
    revealed: HashSet<NodeId>,
    threshold: f64,
    bottom_margin: f64,
}

impl RevealEngine {
    /// Collect and mark every element carrying one of the target classes.
    pub fn attach(doc: SharedDocument, config: &RevealConfig) -> Self {
        let observed = {
            let mut d = doc.write();
            let root = d.root();
            let targets = d.find_all(root, |el| {
                config.targets.iter().any(|class| el.has_class(class))
            });
            for &target in &targets {
                d.update(target, |el| el.add_class(ANIMATED_CLASS));
            }
            targets
        };
        debug!(count = observed.len(), "Reveal targets observed");
        Self {
            doc,
            observed,
            revealed: HashSet::new(),
            threshold: config.threshold,
            bottom_margin: config.bottom_margin_px,
        }
    }

    pub fn is_observing(&self, id: NodeId) -> bool {
        self.observed.contains(&id)
    }

    pub fn is_revealed(&self, id: NodeId) -> bool {
        self.revealed.contains(&id)
    }

    /// Elements still waiting to be revealed
    pub fn pending(&self) -> &[NodeId] {
        &self.observed
    }

    pub fn revealed_count(&self) -> usize {
        self.revealed.len()
    }

    /// Handle one intersection entry. Returns `true` if this revealed the element.
    pub fn on_intersection(&mut self, target: NodeId, ratio: f64) -> bool {
        if !self.is_observing(target) {
            return false;
        }
        if ratio <= 0.0 || ratio < self.threshold {
            return false;
        }
        self.observed.retain(|&n| n != target);
        self.revealed.insert(target);
        self.doc
            .write()
            .update(target, |el| el.add_class(VISIBLE_CLASS));
        debug!(%target, ratio, "Element revealed");
        true
    }

    /// Recompute intersections for all observed elements against the
    /// document's current viewport. Returns the newly revealed elements.
    pub fn check_viewport(&mut self) -> Vec<NodeId> {
        let entries: Vec<(NodeId, f64)> = {
            let doc = self.doc.read();
            self.observed
                .iter()
                .filter_map(|&id| {
                    let el = doc.get(id)?;
                    Some((id, intersection_ratio(&el.layout, &doc.viewport, self.bottom_margin)))
                })
                .collect()
        };
        entries
            .into_iter()
            .filter(|&(id, ratio)| self.on_intersection(id, ratio))
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    fn viewport(scroll_y: f64) -> Viewport {
        Viewport {
            scroll_y,
            width: 1280.0,
            height: 800.0,
        }
    }

    #[test]
    fn test_ratio_full_partial_none() {
        let vp = viewport(0.0);
        assert_eq!(intersection_ratio(&LayoutBox::new(100.0, 100.0), &vp, 0.0), 1.0);
        assert_eq!(intersection_ratio(&LayoutBox::new(750.0, 100.0), &vp, 0.0), 0.5);
        assert_eq!(intersection_ratio(&LayoutBox::new(900.0, 100.0), &vp, 0.0), 0.0);
    }

    #[test]
    fn test_bottom_margin_shrinks_viewport() {
        let vp = viewport(0.0);
        // 760..860 is 40px visible without margin, 0 with the 50px inset.
        let layout = LayoutBox::new(760.0, 100.0);
        assert!(intersection_ratio(&layout, &vp, 0.0) > 0.0);
        assert_eq!(intersection_ratio(&layout, &vp, 50.0), 0.0);
    }

    #[test]
    fn test_zero_height_element() {
        let vp = viewport(0.0);
        assert_eq!(intersection_ratio(&LayoutBox::new(10.0, 0.0), &vp, 50.0), 1.0);
        assert_eq!(intersection_ratio(&LayoutBox::new(900.0, 0.0), &vp, 50.0), 0.0);
    }

    fn page() -> (SharedDocument, NodeId, NodeId, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let near = doc.append(body, Element::new("div").with_class("skill-item").with_layout(100.0, 200.0));
        let far = doc.append(body, Element::new("div").with_class("project-card").with_layout(2000.0, 400.0));
        let other = doc.append(body, Element::new("div").with_class("unrelated").with_layout(0.0, 10.0));
        (doc.into_shared(), near, far, other)
    }

    #[test]
    fn test_attach_marks_only_targets() {
        let (doc, near, far, other) = page();
        let engine = RevealEngine::attach(doc.clone(), &RevealConfig::default());
        let d = doc.read();
        assert!(d.get(near).unwrap().has_class(ANIMATED_CLASS));
        assert!(d.get(far).unwrap().has_class(ANIMATED_CLASS));
        assert!(!d.get(other).unwrap().has_class(ANIMATED_CLASS));
        assert_eq!(engine.pending(), &[near, far]);
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let (doc, near, ..) = page();
        let mut engine = RevealEngine::attach(doc.clone(), &RevealConfig::default());

        assert!(!engine.on_intersection(near, 0.05), "below threshold");
        assert!(engine.on_intersection(near, 0.2));
        assert!(!engine.on_intersection(near, 1.0), "already revealed");
        assert!(!engine.is_observing(near));
        assert!(engine.is_revealed(near));
        assert!(doc.read().get(near).unwrap().has_class(VISIBLE_CLASS));
        assert_eq!(engine.revealed_count(), 1);
    }

    #[test]
    fn test_check_viewport_follows_scroll() {
        let (doc, near, far, _) = page();
        let mut engine = RevealEngine::attach(doc.clone(), &RevealConfig::default());

        assert_eq!(engine.check_viewport(), vec![near]);
        assert_eq!(engine.check_viewport(), Vec::<NodeId>::new());

        doc.write().viewport.scroll_y = 1500.0;
        assert_eq!(engine.check_viewport(), vec![far]);
        assert!(engine.pending().is_empty());

        // Scrolling back up never un-reveals.
        doc.write().viewport.scroll_y = 0.0;
        engine.check_viewport();
        assert!(doc.read().get(far).unwrap().has_class(VISIBLE_CLASS));
    }

    #[test]
    fn test_unobserved_element_ignored() {
        let (doc, _, _, other) = page();
        let mut engine = RevealEngine::attach(doc, &RevealConfig::default());
        assert!(!engine.on_intersection(other, 1.0));
    }
}
