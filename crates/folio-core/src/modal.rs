//! Project detail modal.
//!
//! Project cards carry their details as `data-project-*` attributes. Opening
//! the modal reads them fresh into a [`ProjectRecord`] and fills the overlay;
//! nothing is cached between openings.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dom::{Element, NodeId, SharedDocument};
use crate::nav::BODY_LOCK_CLASS;
use crate::scroll::ACTIVE_CLASS;

/// Icon used for technologies without a dedicated one
pub const DEFAULT_TECH_ICON: &str = "fas fa-microchip";

/// Icon font class for a technology name (case and surrounding space ignored).
pub fn tech_icon(name: &str) -> &'static str {
    match name.trim().to_lowercase().as_str() {
        "python" => "devicon-python-plain colored",
        "random forest" => "fas fa-sitemap",
        "xgboost" => "fas fa-rocket",
        "tableau" => "fas fa-chart-bar",
        "scikit-learn" => "devicon-scikitlearn-plain colored",
        "pandas" => "devicon-pandas-original colored",
        "tensorflow" => "devicon-tensorflow-original colored",
        "lstm" => "fas fa-brain",
        "nlp" => "fas fa-comments",
        "api" => "fas fa-cogs",
        "keras" => "devicon-keras-plain colored",
        "power bi" => "fas fa-chart-pie",
        "sql server" => "devicon-microsoftsqlserver-plain colored",
        "real-time" => "fas fa-bolt",
        "healthcare" => "fas fa-heart-pulse",
        "dax" => "fas fa-table-cells",
        _ => DEFAULT_TECH_ICON,
    }
}

/// Details of one project, as read from its card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub title: String,
    pub image_src: String,
    pub long_description: String,
    pub github_link: String,
    pub live_link: String,
    pub technologies: Vec<String>,
}

impl ProjectRecord {
    /// Read the `data-project-*` attributes. Missing attributes read as empty,
    /// and blank technology entries are skipped.
    pub fn from_card(card: &Element) -> Self {
        let field = |name: &str| card.data(name).unwrap_or_default().to_string();
        let technologies = card
            .data("project-tech")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();
        Self {
            title: field("project-title"),
            image_src: field("project-image-src"),
            long_description: field("project-long-desc"),
            github_link: field("project-github-link"),
            live_link: field("project-live-link"),
            technologies,
        }
    }
}

pub struct ProjectModal {
    doc: SharedDocument,
    modal: NodeId,
    close_button: Option<NodeId>,
}

impl ProjectModal {
    /// Bind to `#project-modal`; `None` when the page has no modal.
    pub fn attach(doc: SharedDocument) -> Option<Self> {
        let (modal, close_button) = {
            let d = doc.read();
            (d.by_id("project-modal"), d.first_by_class("modal-close-btn"))
        };
        let Some(modal) = modal else {
            debug!("No project modal on page");
            return None;
        };
        Some(Self {
            doc,
            modal,
            close_button,
        })
    }

    pub fn element(&self) -> NodeId {
        self.modal
    }

    pub fn is_open(&self) -> bool {
        self.doc
            .read()
            .get(self.modal)
            .is_some_and(|el| el.has_class(ACTIVE_CLASS))
    }

    /// The card a click should open, if any.
    ///
    /// Opens on the card's details button, or on its image unless the click
    /// landed on one of the action buttons overlaid on the image.
    pub fn card_for_click(&self, target: NodeId) -> Option<NodeId> {
        let doc = self.doc.read();
        let card = doc.closest(target, "project-card")?;
        if doc.closest(target, "btn-details").is_some() {
            return Some(card);
        }
        if doc.closest(target, "project-image").is_some()
            && doc.closest(target, "project-action-btn").is_none()
        {
            return Some(card);
        }
        None
    }

    /// Fill the modal from `card` and show it. Returns the record shown.
    pub fn open(&self, card: NodeId) -> Option<ProjectRecord> {
        let mut doc = self.doc.write();
        let record = ProjectRecord::from_card(doc.get(card)?);

        let ids = [
            "modal-title",
            "modal-img",
            "modal-desc",
            "modal-github",
            "modal-live",
            "modal-tech",
        ];
        let [title, img, desc, github, live, tech] = ids.map(|id| doc.by_id(id));

        if let Some(n) = title {
            doc.update(n, |el| el.set_text(record.title.clone()));
        }
        if let Some(n) = img {
            doc.update(n, |el| {
                el.set_attr("src", record.image_src.clone());
                el.set_attr("alt", format!("Screenshot of {}", record.title));
            });
        }
        if let Some(n) = desc {
            doc.update(n, |el| el.set_text(record.long_description.clone()));
        }
        if let Some(n) = github {
            doc.update(n, |el| el.set_attr("href", record.github_link.clone()));
        }
        if let Some(n) = live {
            doc.update(n, |el| el.set_attr("href", record.live_link.clone()));
        }
        if let Some(container) = tech {
            doc.clear_children(container);
            doc.append(
                container,
                Element::new("h4")
                    .with_class("tech-title")
                    .with_text("Technologies Used"),
            );
            let icons = doc.append(container, Element::new("div").with_class("tech-icons"));
            for name in &record.technologies {
                doc.append(
                    icons,
                    Element::new("i")
                        .with_class(tech_icon(name))
                        .with_attr("title", name.clone()),
                );
            }
        }

        doc.update(self.modal, |el| {
            el.add_class(ACTIVE_CLASS);
            el.set_attr("aria-hidden", "false");
        });
        let body = doc.body();
        doc.update(body, |el| el.add_class(BODY_LOCK_CLASS));
        debug!(title = %record.title, "Project modal opened");
        Some(record)
    }

    pub fn close(&self) {
        let mut doc = self.doc.write();
        doc.update(self.modal, |el| {
            el.remove_class(ACTIVE_CLASS);
            el.set_attr("aria-hidden", "true");
        });
        let body = doc.body();
        doc.update(body, |el| el.remove_class(BODY_LOCK_CLASS));
    }

    /// Close on the close button or on the backdrop itself. Returns whether it closed.
    pub fn on_click(&self, target: NodeId) -> bool {
        let on_close_button = self
            .close_button
            .is_some_and(|btn| self.doc.read().is_within(target, btn));
        if target == self.modal || on_close_button {
            self.close();
            return true;
        }
        false
    }

    /// Escape closes an open modal.
    pub fn on_key(&self, key: &str) -> bool {
        if key == "Escape" && self.is_open() {
            self.close();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;

    struct Page {
        doc: SharedDocument,
        modal: NodeId,
        close: NodeId,
        card: NodeId,
        details: NodeId,
        image: NodeId,
        action: NodeId,
        dialog: NodeId,
    }

    fn page() -> Page {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.append(
            body,
            Element::new("article")
                .with_class("project-card")
                .with_attr("data-project-title", "Churn Model")
                .with_attr("data-project-image-src", "img/churn.png")
                .with_attr("data-project-long-desc", "Predicts churn.")
                .with_attr("data-project-github-link", "https://github.com/x/churn")
                .with_attr("data-project-live-link", "https://churn.example")
                .with_attr("data-project-tech", "Python, XGBoost ,Rust"),
        );
        let image = doc.append(card, Element::new("div").with_class("project-image"));
        let action = doc.append(image, Element::new("a").with_class("project-action-btn"));
        let details = doc.append(card, Element::new("button").with_class("btn-details"));

        let modal = doc.append(body, Element::new("div").with_id("project-modal").with_attr("aria-hidden", "true"));
        let dialog = doc.append(modal, Element::new("div").with_class("modal-content"));
        let close = doc.append(dialog, Element::new("button").with_class("modal-close-btn"));
        doc.append(dialog, Element::new("h3").with_id("modal-title"));
        doc.append(dialog, Element::new("img").with_id("modal-img"));
        doc.append(dialog, Element::new("p").with_id("modal-desc"));
        doc.append(dialog, Element::new("a").with_id("modal-github"));
        doc.append(dialog, Element::new("a").with_id("modal-live"));
        doc.append(dialog, Element::new("div").with_id("modal-tech"));
        Page {
            doc: doc.into_shared(),
            modal,
            close,
            card,
            details,
            image,
            action,
            dialog,
        }
    }

    #[test]
    fn test_tech_icon_lookup() {
        assert_eq!(tech_icon(" Python "), "devicon-python-plain colored");
        assert_eq!(tech_icon("POWER BI"), "fas fa-chart-pie");
        assert_eq!(tech_icon("Rust"), DEFAULT_TECH_ICON);
    }

    #[test]
    fn test_record_from_card() {
        let p = page();
        let d = p.doc.read();
        let record = ProjectRecord::from_card(d.get(p.card).unwrap());
        assert_eq!(record.title, "Churn Model");
        assert_eq!(record.technologies, vec!["Python", "XGBoost", "Rust"]);
    }

    #[test]
    fn test_click_routing() {
        let p = page();
        let modal = ProjectModal::attach(p.doc.clone()).unwrap();
        assert_eq!(modal.card_for_click(p.details), Some(p.card));
        assert_eq!(modal.card_for_click(p.image), Some(p.card));
        assert_eq!(modal.card_for_click(p.action), None);
        assert_eq!(modal.card_for_click(p.card), None);
    }

    #[test]
    fn test_open_fills_fields() {
        let p = page();
        let modal = ProjectModal::attach(p.doc.clone()).unwrap();
        modal.open(p.card).unwrap();
        assert!(modal.is_open());

        let d = p.doc.read();
        let by_id = |id: &str| d.get(d.by_id(id).unwrap()).unwrap();
        assert_eq!(by_id("modal-title").text(), "Churn Model");
        assert_eq!(by_id("modal-img").attr("alt"), Some("Screenshot of Churn Model"));
        assert_eq!(by_id("modal-img").attr("src"), Some("img/churn.png"));
        assert_eq!(by_id("modal-github").attr("href"), Some("https://github.com/x/churn"));
        assert_eq!(by_id("modal-live").attr("href"), Some("https://churn.example"));
        assert_eq!(d.get(p.modal).unwrap().attr("aria-hidden"), Some("false"));
        assert!(d.get(d.body()).unwrap().has_class(BODY_LOCK_CLASS));

        let icons: Vec<(String, String)> = d
            .find_all(d.by_id("modal-tech").unwrap(), |el| el.tag == "i")
            .into_iter()
            .map(|n| {
                let el = d.get(n).unwrap();
                (el.class_name(), el.attr("title").unwrap().to_string())
            })
            .collect();
        assert_eq!(
            icons,
            vec![
                ("devicon-python-plain colored".to_string(), "Python".to_string()),
                ("fas fa-rocket".to_string(), "XGBoost".to_string()),
                (DEFAULT_TECH_ICON.to_string(), "Rust".to_string()),
            ]
        );
    }

    #[test]
    fn test_reopen_replaces_tech_list() {
        let p = page();
        let modal = ProjectModal::attach(p.doc.clone()).unwrap();
        modal.open(p.card).unwrap();
        let arena = p.doc.read().arena_len();
        for _ in 0..5 {
            modal.close();
            modal.open(p.card).unwrap();
        }
        let d = p.doc.read();
        assert_eq!(d.arena_len(), arena);
        assert_eq!(d.by_class("tech-title").len(), 1);
        assert_eq!(d.find_all(d.root(), |el| el.tag == "i").len(), 3);
    }

    #[test]
    fn test_blank_tech_list_renders_no_icons() {
        let p = page();
        p.doc
            .write()
            .update(p.card, |el| el.set_attr("data-project-tech", ""));
        let modal = ProjectModal::attach(p.doc.clone()).unwrap();

        let record = modal.open(p.card).unwrap();
        assert!(record.technologies.is_empty());

        let d = p.doc.read();
        let icons = d.first_by_class("tech-icons").unwrap();
        assert!(d.get(icons).unwrap().children().is_empty());
        assert_eq!(d.by_class("tech-title").len(), 1);

        let mut card = d.get(p.card).unwrap().clone();
        card.set_attr("data-project-tech", "SQL, ,Python,");
        assert_eq!(ProjectRecord::from_card(&card).technologies, vec!["SQL", "Python"]);
    }

    #[test]
    fn test_close_paths() {
        let p = page();
        let modal = ProjectModal::attach(p.doc.clone()).unwrap();

        modal.open(p.card);
        assert!(!modal.on_click(p.dialog), "clicks inside the dialog keep it open");
        assert!(modal.on_click(p.modal), "backdrop closes");
        assert!(!modal.is_open());

        modal.open(p.card);
        assert!(modal.on_click(p.close));
        assert_eq!(p.doc.read().get(p.modal).unwrap().attr("aria-hidden"), Some("true"));

        modal.open(p.card);
        assert!(!modal.on_key("Enter"));
        assert!(modal.on_key("Escape"));
        assert!(!modal.on_key("Escape"), "already closed");
    }
}
