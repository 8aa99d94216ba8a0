//! The demo page used by `folio run`, plus a scripted visitor tour.

use std::time::Duration;

use folio_core::reveal::VISIBLE_CLASS;
use folio_core::scroll::ACTIVE_CLASS;
use folio_core::theme::THEME_ATTRIBUTE;
use folio_core::{Document, Element, EventBus, NodeId, PageEvent, SharedDocument};
use serde_json::json;

/// Handles the tour needs to click on
pub struct DemoPage {
    pub doc: SharedDocument,
    pub theme_toggle: NodeId,
    pub nav_toggle: NodeId,
    pub projects_link: NodeId,
    pub second_tab: NodeId,
    pub details: NodeId,
}

struct Project<'a> {
    title: &'a str,
    desc: &'a str,
    tech: &'a str,
    slug: &'a str,
}

const PROJECTS: &[Project<'static>] = &[
    Project {
        title: "Customer Churn Prediction",
        desc: "Gradient-boosted model flagging customers likely to leave.",
        tech: "Python, XGBoost, Scikit-learn",
        slug: "churn",
    },
    Project {
        title: "Sales Dashboard",
        desc: "Interactive sales reporting with drill-down by region.",
        tech: "Power BI, DAX, SQL Server",
        slug: "sales-dashboard",
    },
    Project {
        title: "Sentiment Monitor",
        desc: "Real-time review sentiment from an LSTM classifier.",
        tech: "TensorFlow, LSTM, NLP, API",
        slug: "sentiment",
    },
];

/// Build a full portfolio page with plausible layout boxes.
pub fn build_demo_page() -> DemoPage {
    let mut doc = Document::new();
    let body = doc.body();

    // Header
    let header = doc.append(body, Element::new("nav").with_class("navbar").with_layout(0.0, 70.0));
    let nav_toggle = doc.append(
        header,
        Element::new("button")
            .with_class("nav-toggle")
            .with_attr("aria-expanded", "false"),
    );
    let menu = doc.append(header, Element::new("ul").with_class("nav-menu"));
    let mut projects_link = nav_toggle;
    for section in ["home", "about", "skills", "projects", "contact"] {
        let link = doc.append(
            menu,
            Element::new("a")
                .with_class("nav-link")
                .with_attr("href", format!("#{section}"))
                .with_text(section),
        );
        if section == "projects" {
            projects_link = link;
        }
    }
    let theme_toggle = doc.append(header, Element::new("button").with_class("theme-toggle"));
    doc.append(theme_toggle, Element::new("i").with_class("fas fa-moon"));

    // Hero
    let hero = doc.append(body, Element::new("section").with_id("home").with_layout(0.0, 900.0));
    doc.append(hero, Element::new("div").with_id("particles-js"));
    doc.append(hero, Element::new("span").with_class("typing-text"));
    doc.append(hero, Element::new("div").with_class("scroll-indicator").with_layout(820.0, 40.0));

    // About, with the code editor
    let about = doc.append(body, Element::new("section").with_id("about").with_layout(900.0, 900.0));
    doc.append(about, Element::new("h2").with_class("section-title").with_layout(960.0, 60.0));
    doc.append(about, Element::new("div").with_class("about-text").with_layout(1040.0, 300.0));
    let editor = doc.append(about, Element::new("div").with_class("code-editor").with_layout(1360.0, 400.0));
    doc.append(editor, Element::new("div").with_class("line-numbers"));
    doc.append(editor, Element::new("div").with_class("code-content"));

    // Skills
    let skills = doc.append(body, Element::new("section").with_id("skills").with_layout(1800.0, 700.0));
    doc.append(skills, Element::new("h2").with_class("section-title").with_layout(1860.0, 60.0));
    let mut second_tab = skills;
    for (i, pane) in ["ml", "viz", "eng"].iter().enumerate() {
        let tab = doc.append(
            skills,
            Element::new("button").with_class("tab-link").with_attr("data-tab", *pane),
        );
        if i == 1 {
            second_tab = tab;
        }
    }
    for (i, pane) in ["ml", "viz", "eng"].iter().enumerate() {
        let pane = doc.append(skills, Element::new("div").with_id(*pane).with_class("tab-pane"));
        let top = 2000.0 + i as f64 * 20.0;
        doc.append(pane, Element::new("div").with_class("skill-item").with_layout(top, 80.0));
    }

    // Projects
    let projects = doc.append(body, Element::new("section").with_id("projects").with_layout(2500.0, 1100.0));
    doc.append(projects, Element::new("h2").with_class("section-title").with_layout(2560.0, 60.0));
    let mut details = projects;
    for (i, project) in PROJECTS.iter().enumerate() {
        let card = doc.append(
            projects,
            Element::new("article")
                .with_class("project-card")
                .with_layout(2660.0 + i as f64 * 300.0, 280.0)
                .with_attr("data-project-title", project.title)
                .with_attr("data-project-image-src", format!("assets/img/{}.png", project.slug))
                .with_attr("data-project-long-desc", project.desc)
                .with_attr("data-project-github-link", format!("https://github.com/folio/{}", project.slug))
                .with_attr("data-project-live-link", format!("https://{}.folio.dev", project.slug))
                .with_attr("data-project-tech", project.tech),
        );
        let image = doc.append(card, Element::new("div").with_class("project-image"));
        doc.append(
            image,
            Element::new("a")
                .with_class("project-action-btn")
                .with_attr("href", format!("https://github.com/folio/{}", project.slug)),
        );
        let button = doc.append(card, Element::new("button").with_class("btn-details"));
        if i == 0 {
            details = button;
        }
    }

    // Contact
    let contact = doc.append(body, Element::new("section").with_id("contact").with_layout(3600.0, 900.0));
    doc.append(contact, Element::new("div").with_class("contact-item").with_layout(3700.0, 80.0));
    let form = doc.append(
        contact,
        Element::new("form")
            .with_class("contact-form")
            .with_attr("action", "https://formsubmit.co/ajax/folio@example.com")
            .with_layout(3800.0, 500.0),
    );
    for (name, tag, kind) in [
        ("name", "input", "text"),
        ("email", "input", "email"),
        ("message", "textarea", "text"),
    ] {
        let class = if tag == "textarea" { "form-textarea" } else { "form-input" };
        doc.append(
            form,
            Element::new(tag)
                .with_class(class)
                .with_attr("name", name)
                .with_attr("type", kind)
                .with_attr("required", ""),
        );
        doc.append(form, Element::new("span").with_class("error-message"));
    }
    let submit = doc.append(form, Element::new("button").with_class("form-submit"));
    doc.append(submit, Element::new("span").with_class("submit-text").with_text("Send"));
    doc.append(submit, Element::new("span").with_class("submit-loading"));
    doc.append(form, Element::new("div").with_class("form-status"));

    // Modal
    let modal = doc.append(
        body,
        Element::new("div")
            .with_id("project-modal")
            .with_attr("aria-hidden", "true"),
    );
    let dialog = doc.append(modal, Element::new("div").with_class("modal-content"));
    doc.append(dialog, Element::new("button").with_class("modal-close-btn"));
    doc.append(dialog, Element::new("h3").with_id("modal-title"));
    doc.append(dialog, Element::new("img").with_id("modal-img"));
    doc.append(dialog, Element::new("p").with_id("modal-desc"));
    doc.append(dialog, Element::new("a").with_id("modal-github"));
    doc.append(dialog, Element::new("a").with_id("modal-live"));
    doc.append(dialog, Element::new("div").with_id("modal-tech"));

    DemoPage {
        doc: doc.into_shared(),
        theme_toggle,
        nav_toggle,
        projects_link,
        second_tab,
        details,
    }
}

/// Emit a visitor's walk through the page, pausing between steps.
pub async fn play_tour(bus: &EventBus, page: &DemoPage, step: Duration) {
    let steps = [
        PageEvent::Ready,
        PageEvent::Scroll { y: 600.0 },
        PageEvent::Scroll { y: 1200.0 },
        PageEvent::Click {
            target: page.second_tab,
        },
        PageEvent::Click {
            target: page.theme_toggle,
        },
        PageEvent::Click {
            target: page.nav_toggle,
        },
        PageEvent::Click {
            target: page.projects_link,
        },
        PageEvent::Click {
            target: page.details,
        },
        PageEvent::KeyDown {
            key: "Escape".into(),
        },
    ];
    for event in steps {
        bus.emit(event);
        tokio::time::sleep(step).await;
    }
}

/// Snapshot of the page after a run
pub fn summarize(doc: &SharedDocument) -> serde_json::Value {
    let d = doc.read();
    let root = d.root();
    let text_of = |class: &str| {
        d.first_by_class(class)
            .and_then(|n| d.get(n))
            .map(|el| el.text().to_string())
            .unwrap_or_default()
    };
    let active_link = d
        .by_class("nav-link")
        .into_iter()
        .filter_map(|n| d.get(n))
        .find(|el| el.has_class(ACTIVE_CLASS))
        .and_then(|el| el.attr("href"))
        .map(str::to_string);
    let active_tab = d
        .by_class("tab-link")
        .into_iter()
        .filter_map(|n| d.get(n))
        .find(|el| el.has_class(ACTIVE_CLASS))
        .and_then(|el| el.data("tab"))
        .map(str::to_string);
    let code_lines = d
        .first_by_class("code-content")
        .and_then(|n| d.get(n))
        .map_or(0, |el| el.children().len());
    let theme_icon = d
        .first_by_class("theme-toggle")
        .and_then(|n| d.get(n))
        .and_then(|toggle| toggle.children().first().copied())
        .and_then(|n| d.get(n))
        .map(|icon| icon.class_name());
    let modal_open = d
        .by_id("project-modal")
        .and_then(|n| d.get(n))
        .is_some_and(|el| el.has_class(ACTIVE_CLASS));

    json!({
        "theme": d.get(root).and_then(|el| el.attr(THEME_ATTRIBUTE)),
        "scroll_y": d.viewport.scroll_y,
        "active_link": active_link,
        "active_tab": active_tab,
        "revealed": d.by_class(VISIBLE_CLASS).len(),
        "code_lines": code_lines,
        "theme_icon": theme_icon,
        "typing_text": text_of("typing-text"),
        "modal_open": modal_open,
    })
}
