//! Page controller.
//!
//! [`PortfolioApp`] owns every component and routes [`PageEvent`]s to them.
//!
//! ```text
//!   EventSource ──► PortfolioApp::run
//!                        │
//!     ┌──────────┬───────┼──────────┬───────────┬──────────┐
//!     ▼          ▼       ▼          ▼           ▼          ▼
//!   Theme     Scroll   Reveal    Navigation   Modal     ContactForm
//!   Store     Reactor  Engine    + Tabs                  (spawned submits)
//!
//!   Background loops: Typewriter (from start), CodeAnimator (once visible)
//! ```
//!
//! Startup work happens at the top of [`PortfolioApp::run`]. Event handling
//! itself is synchronous; only form submissions and the animation loops run
//! as tasks. Everything spawned is cancelled when `run` returns.

use std::sync::Arc;

use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

use crate::code::{CodeAnimator, VisibilityGate};
use crate::config::PageConfig;
use crate::dom::{NodeId, SharedDocument};
use crate::events::{EventSource, PageEvent};
use crate::form::{ContactForm, FormTransport, SubmitOutcome};
use crate::modal::ProjectModal;
use crate::nav::Navigation;
use crate::particles::ParticleRenderer;
use crate::reveal::{intersection_ratio, RevealEngine};
use crate::scroll::ScrollReactor;
use crate::storage::PreferenceStore;
use crate::tabs::SkillTabs;
use crate::task::LoopHandle;
use crate::theme::ThemeStore;
use crate::typewriter::Typewriter;

/// External collaborators the page needs
#[derive(Clone)]
pub struct Services {
    pub preferences: Arc<dyn PreferenceStore>,
    pub particles: Arc<dyn ParticleRenderer>,
    pub transport: Arc<dyn FormTransport>,
}

pub struct PortfolioApp {
    doc: SharedDocument,
    theme: Arc<ThemeStore>,
    nav: Navigation,
    scroll: ScrollReactor,
    tabs: SkillTabs,
    reveal: RevealEngine,
    modal: Option<ProjectModal>,
    form: Option<Arc<ContactForm>>,
    typewriter: Option<Typewriter>,
    code: Option<CodeAnimator>,
    code_gate: Option<VisibilityGate>,
    system_prefers_dark: bool,
    loops: Vec<LoopHandle>,
    submissions: Vec<JoinHandle<SubmitOutcome>>,
}

impl PortfolioApp {
    /// Discover the page's elements and build every component.
    ///
    /// Components whose elements are missing are left out; nothing here fails.
    pub fn new(doc: SharedDocument, config: &PageConfig, services: Services) -> Self {
        let theme = Arc::new(ThemeStore::new(
            doc.clone(),
            services.preferences,
            services.particles,
            config.theme.clone(),
        ));
        let code = CodeAnimator::attach(doc.clone(), &config.code);
        let code_gate = code.as_ref().map(CodeAnimator::gate);

        Self {
            nav: Navigation::attach(doc.clone(), &config.scroll),
            scroll: ScrollReactor::attach(doc.clone(), &config.scroll),
            tabs: SkillTabs::attach(doc.clone()),
            reveal: RevealEngine::attach(doc.clone(), &config.reveal),
            modal: ProjectModal::attach(doc.clone()),
            form: ContactForm::attach(doc.clone(), &config.form, services.transport).map(Arc::new),
            typewriter: Typewriter::attach(doc.clone(), &config.typewriter),
            code,
            code_gate,
            system_prefers_dark: false,
            loops: Vec::new(),
            submissions: Vec::new(),
            theme,
            doc,
        }
    }

    /// Report the system colour scheme the page starts under.
    pub fn with_system_dark(mut self, prefers_dark: bool) -> Self {
        self.system_prefers_dark = prefers_dark;
        self
    }

    pub fn theme(&self) -> &Arc<ThemeStore> {
        &self.theme
    }

    pub fn document(&self) -> &SharedDocument {
        &self.doc
    }

    pub fn reveal(&self) -> &RevealEngine {
        &self.reveal
    }

    /// Whether the code animation has been started
    pub fn code_started(&self) -> bool {
        self.code_gate.as_ref().is_some_and(VisibilityGate::has_fired)
    }

    /// Names of the loops currently running
    pub fn running_loops(&self) -> Vec<&'static str> {
        self.loops
            .iter()
            .filter(|l| !l.is_finished())
            .map(LoopHandle::name)
            .collect()
    }

    /// Run until `cancel` fires or the source closes.
    pub async fn run<S: EventSource + Sync>(&mut self, source: &S, cancel: CancellationToken) {
        let events = source.subscribe();
        self.run_events(events, cancel).await;
    }

    /// Like [`run`](Self::run) with an already-subscribed receiver, so
    /// callers can queue events before the controller is polled.
    pub async fn run_events(
        &mut self,
        mut events: broadcast::Receiver<PageEvent>,
        cancel: CancellationToken,
    ) {
        self.start(&cancel);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("Controller cancelled");
                    break;
                }
                event = events.recv() => match event {
                    Ok(event) => self.handle(event, &cancel),
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(skipped, "Controller fell behind, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Event source closed");
                        break;
                    }
                },
            }
        }

        self.shutdown().await;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Startup
    // ═══════════════════════════════════════════════════════════════════════

    fn start(&mut self, cancel: &CancellationToken) {
        let theme = self.theme.init(self.system_prefers_dark);
        self.tabs.init();
        self.scroll.update_active_link();
        self.scroll.update_header_style();
        self.reveal.check_viewport();

        if let Some(typewriter) = self.typewriter.take() {
            self.loops
                .push(LoopHandle::spawn("typewriter", cancel, move |token| typewriter.run(token)));
        }
        self.check_code_gate(cancel);

        info!(%theme, "Page ready");
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Event dispatch
    // ═══════════════════════════════════════════════════════════════════════

    fn handle(&mut self, event: PageEvent, cancel: &CancellationToken) {
        trace!(%event, "Page event");
        match event {
            PageEvent::Ready => {}
            PageEvent::Click { target } => self.on_click(target, cancel),
            PageEvent::Scroll { y } => self.on_scroll(y, cancel),
            PageEvent::Resize { width, height } => {
                self.nav.on_resize(width, height);
                self.reveal.check_viewport();
                self.check_code_gate(cancel);
            }
            PageEvent::Intersection { target, ratio } => {
                self.reveal.on_intersection(target, ratio);
                let fired = self
                    .code_gate
                    .as_mut()
                    .is_some_and(|gate| gate.target() == target && gate.observe(ratio));
                if fired {
                    self.start_code_animation(cancel);
                }
            }
            PageEvent::KeyDown { key } => {
                if let Some(modal) = &self.modal {
                    modal.on_key(&key);
                }
            }
            PageEvent::ColorSchemeChanged { dark } => {
                self.system_prefers_dark = dark;
                self.theme.on_system_preference_change(dark);
            }
            PageEvent::FieldBlur { field } => {
                if let Some(form) = self.form.as_ref().filter(|f| f.owns_field(field)) {
                    form.on_blur(field);
                }
            }
            PageEvent::FieldInput { field, value } => {
                if let Some(form) = self.form.as_ref().filter(|f| f.owns_field(field)) {
                    form.on_input(field, &value);
                }
            }
            PageEvent::Submit { form } => self.on_submit(form),
        }
    }

    fn on_click(&mut self, target: NodeId, cancel: &CancellationToken) {
        if let Some(modal) = &self.modal {
            if modal.on_click(target) {
                return;
            }
        }

        let (nav_toggle, theme_toggle, nav_link, tab, anchor) = {
            let doc = self.doc.read();
            (
                doc.closest(target, "nav-toggle"),
                doc.closest(target, "theme-toggle"),
                doc.closest(target, "nav-link"),
                doc.closest(target, "tab-link"),
                doc.closest_matching(target, |el| {
                    el.tag == "a" && el.attr("href").is_some_and(|h| h.starts_with('#'))
                }),
            )
        };

        if nav_toggle.is_some() {
            self.nav.toggle();
        }
        if theme_toggle.is_some() {
            let theme = self.theme.toggle_theme();
            debug!(%theme, "Theme toggled from page");
        }
        if nav_link.is_some() {
            self.nav.close();
        }
        if let Some(tab) = tab.filter(|&t| self.tabs.is_tab(t)) {
            self.tabs.switch_to(tab);
        }
        if let Some(y) = anchor.and_then(|link| self.nav.anchor_target(link)) {
            self.on_scroll(y.max(0.0), cancel);
            self.nav.close();
        }
        if let Some(modal) = &self.modal {
            if let Some(card) = modal.card_for_click(target) {
                modal.open(card);
            }
        }
    }

    fn on_scroll(&mut self, y: f64, cancel: &CancellationToken) {
        self.scroll.on_scroll(y);
        self.reveal.check_viewport();
        self.check_code_gate(cancel);
    }

    fn on_submit(&mut self, form_id: NodeId) {
        let Some(form) = self.form.as_ref().filter(|f| f.element() == form_id) else {
            debug!(form = %form_id, "Submit for unknown form ignored");
            return;
        };
        self.submissions.retain(|s| !s.is_finished());
        let form = Arc::clone(form);
        self.submissions
            .push(tokio::spawn(async move { form.submit().await }));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Code animation gate
    // ═══════════════════════════════════════════════════════════════════════

    /// Feed the gate the editor's current on-screen ratio.
    fn check_code_gate(&mut self, cancel: &CancellationToken) {
        let Some(gate) = self.code_gate.as_mut() else { return };
        if gate.has_fired() {
            return;
        }
        let ratio = {
            let doc = self.doc.read();
            let Some(el) = doc.get(gate.target()) else { return };
            intersection_ratio(&el.layout, &doc.viewport, 0.0)
        };
        if gate.observe(ratio) {
            self.start_code_animation(cancel);
        }
    }

    fn start_code_animation(&mut self, cancel: &CancellationToken) {
        let Some(animator) = self.code.take() else { return };
        info!("Code editor visible, starting animation");
        self.loops
            .push(LoopHandle::spawn("code-animation", cancel, move |token| animator.run(token)));
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Shutdown
    // ═══════════════════════════════════════════════════════════════════════

    async fn shutdown(&mut self) {
        for handle in self.loops.drain(..) {
            handle.stop().await;
        }
        for submission in self.submissions.drain(..) {
            submission.abort();
        }
        self.theme.shutdown();
        debug!("Controller stopped");
    }
}
