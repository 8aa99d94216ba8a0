//! Theme preference and the store that applies it.
//!
//! ## Resolution order
//!
//! ```text
//! persisted "portfolio-theme"  ──► used if present (explicit user choice, sticky)
//!          │ absent
//!          ▼
//! system prefers dark?         ──► Dark / Light
//! ```
//!
//! Only [`ThemeStore::set_theme`] (and [`ThemeStore::toggle_theme`], which
//! calls it) persists. The initial apply and system-preference changes do
//! not, so the system preference keeps tracking until the user picks a theme.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::config::ThemeConfig;
use crate::dom::{NodeId, SharedDocument};
use crate::error::FolioError;
use crate::particles::{ParticleConfig, ParticleHandle, ParticleRenderer};
use crate::storage::PreferenceStore;

/// Document-level attribute carrying the active theme
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Visual palette applied document-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    #[default]
    Light,
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreference::Light => "light",
            ThemePreference::Dark => "dark",
        }
    }

    pub fn inverse(&self) -> Self {
        match self {
            ThemePreference::Light => ThemePreference::Dark,
            ThemePreference::Dark => ThemePreference::Light,
        }
    }

    pub fn from_system(prefers_dark: bool) -> Self {
        if prefers_dark {
            ThemePreference::Dark
        } else {
            ThemePreference::Light
        }
    }

    /// Icon shown on the toggle: the theme you would switch *to*.
    pub fn toggle_icon_class(&self) -> &'static str {
        match self {
            ThemePreference::Dark => "fas fa-sun",
            ThemePreference::Light => "fas fa-moon",
        }
    }
}

impl fmt::Display for ThemePreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemePreference {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(ThemePreference::Light),
            "dark" => Ok(ThemePreference::Dark),
            other => Err(FolioError::InvalidPreference(other.to_string())),
        }
    }
}

/// Owns the theme preference and the single live particle instance.
pub struct ThemeStore {
    doc: SharedDocument,
    store: Arc<dyn PreferenceStore>,
    renderer: Arc<dyn ParticleRenderer>,
    config: ThemeConfig,
    toggle_icon: Option<NodeId>,
    particles: Mutex<Option<Box<dyn ParticleHandle>>>,
    theme_tx: watch::Sender<ThemePreference>,
}

impl ThemeStore {
    pub fn new(
        doc: SharedDocument,
        store: Arc<dyn PreferenceStore>,
        renderer: Arc<dyn ParticleRenderer>,
        config: ThemeConfig,
    ) -> Self {
        let toggle_icon = {
            let d = doc.read();
            d.first_by_class("theme-toggle")
                .and_then(|toggle| d.find_first(toggle, |el| el.tag == "i"))
        };
        if toggle_icon.is_none() {
            debug!("No theme toggle icon on page");
        }
        let (theme_tx, _) = watch::channel(ThemePreference::default());
        Self {
            doc,
            store,
            renderer,
            config,
            toggle_icon,
            particles: Mutex::new(None),
            theme_tx,
        }
    }

    /// The persisted preference, if any. Storage failures read as "none".
    pub fn persisted(&self) -> Option<ThemePreference> {
        match self.store.get(&self.config.storage_key) {
            Ok(Some(raw)) => match raw.parse() {
                Ok(pref) => Some(pref),
                Err(e) => {
                    warn!("Ignoring stored theme: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read theme preference: {}", e);
                None
            }
        }
    }

    /// Persisted value if present, else the system preference.
    pub fn initial_theme(&self, system_prefers_dark: bool) -> ThemePreference {
        self.persisted()
            .unwrap_or_else(|| ThemePreference::from_system(system_prefers_dark))
    }

    /// Resolve and apply the initial theme without persisting it.
    pub fn init(&self, system_prefers_dark: bool) -> ThemePreference {
        let theme = self.initial_theme(system_prefers_dark);
        self.apply(theme, true);
        theme
    }

    /// Explicit user choice: persist, then apply.
    pub fn set_theme(&self, theme: ThemePreference) {
        if let Err(e) = self.store.set(&self.config.storage_key, theme.as_str()) {
            warn!("Failed to persist theme preference: {}", e);
        }
        self.apply(theme, false);
    }

    /// Flip whatever theme the document currently shows.
    pub fn toggle_theme(&self) -> ThemePreference {
        let next = self.applied().inverse();
        info!(theme = %next, "Theme toggled");
        self.set_theme(next);
        next
    }

    /// System dark-mode preference changed. Ignored once the user has chosen.
    pub fn on_system_preference_change(&self, prefers_dark: bool) -> Option<ThemePreference> {
        if self.persisted().is_some() {
            debug!("System theme change ignored, user preference is set");
            return None;
        }
        let theme = ThemePreference::from_system(prefers_dark);
        self.apply(theme, false);
        Some(theme)
    }

    /// Theme read back from the document attribute (light when unset).
    pub fn applied(&self) -> ThemePreference {
        let doc = self.doc.read();
        doc.get(doc.root())
            .and_then(|root| root.attr(THEME_ATTRIBUTE))
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default()
    }

    /// Last applied theme
    pub fn current(&self) -> ThemePreference {
        *self.theme_tx.borrow()
    }

    /// Subscribe to theme changes
    pub fn subscribe(&self) -> watch::Receiver<ThemePreference> {
        self.theme_tx.subscribe()
    }

    /// Whether a particle instance is currently live
    pub fn has_live_particles(&self) -> bool {
        self.particles.lock().is_some()
    }

    /// Destroy the live particle instance, if any.
    pub fn shutdown(&self) {
        if let Some(handle) = self.particles.lock().take() {
            handle.destroy();
        }
    }

    fn apply(&self, theme: ThemePreference, initial: bool) {
        {
            let mut doc = self.doc.write();
            let root = doc.root();
            doc.update(root, |el| {
                el.set_attr(THEME_ATTRIBUTE, theme.as_str());
                if !initial {
                    el.set_style("transition", "background-color 0.3s ease, color 0.3s ease");
                }
            });
            if let Some(icon) = self.toggle_icon {
                doc.update(icon, |el| el.set_class_name(theme.toggle_icon_class()));
            }
        }
        self.reload_particles(theme);
        self.theme_tx.send_replace(theme);
        debug!(theme = %theme, initial, "Theme applied");
    }

    fn reload_particles(&self, theme: ThemePreference) {
        let mut slot = self.particles.lock();
        if let Some(previous) = slot.take() {
            previous.destroy();
        }
        let config = ParticleConfig::for_theme(theme);
        match self.renderer.load(&self.config.particles_container, &config) {
            Ok(handle) => *slot = Some(handle),
            Err(e) => warn!("Particle background unavailable: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};
    use crate::error::FolioResult;
    use crate::storage::MemoryPreferenceStore;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingRenderer {
        live: Arc<AtomicUsize>,
        loads: AtomicUsize,
    }

    struct CountingHandle(Arc<AtomicUsize>);

    impl ParticleHandle for CountingHandle {
        fn destroy(self: Box<Self>) {
            self.0.fetch_sub(1, Ordering::SeqCst);
        }
    }

    impl ParticleRenderer for CountingRenderer {
        fn load(&self, _: &str, _: &ParticleConfig) -> FolioResult<Box<dyn ParticleHandle>> {
            let live = self.live.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(live, 1, "previous instance must be destroyed first");
            self.loads.fetch_add(1, Ordering::SeqCst);
            Ok(Box::new(CountingHandle(self.live.clone())))
        }
    }

    fn page() -> (SharedDocument, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let toggle = doc.append(body, Element::new("button").with_class("theme-toggle"));
        let icon = doc.append(toggle, Element::new("i").with_class("fas fa-moon"));
        (doc.into_shared(), icon)
    }

    fn store_with(
        prefs: MemoryPreferenceStore,
        renderer: Arc<CountingRenderer>,
    ) -> (ThemeStore, SharedDocument, NodeId) {
        let (doc, icon) = page();
        let store = ThemeStore::new(doc.clone(), Arc::new(prefs), renderer, ThemeConfig::default());
        (store, doc, icon)
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("dark".parse::<ThemePreference>().unwrap(), ThemePreference::Dark);
        assert!("sepia".parse::<ThemePreference>().is_err());
        assert_eq!(ThemePreference::Light.to_string(), "light");
    }

    #[test]
    fn test_initial_theme_prefers_persisted_value() {
        let prefs = MemoryPreferenceStore::new();
        let (store, _, _) = store_with(prefs.clone(), Arc::default());
        assert_eq!(store.initial_theme(true), ThemePreference::Dark);
        assert_eq!(store.initial_theme(false), ThemePreference::Light);

        prefs.set("portfolio-theme", "light").unwrap();
        assert_eq!(store.initial_theme(true), ThemePreference::Light);
    }

    #[test]
    fn test_garbage_persisted_value_falls_back_to_system() {
        let prefs = MemoryPreferenceStore::new();
        prefs.set("portfolio-theme", "neon").unwrap();
        let (store, _, _) = store_with(prefs, Arc::default());
        assert_eq!(store.initial_theme(true), ThemePreference::Dark);
    }

    #[test]
    fn test_set_theme_updates_document_icon_and_storage() {
        let prefs = MemoryPreferenceStore::new();
        let (store, doc, icon) = store_with(prefs.clone(), Arc::default());

        store.set_theme(ThemePreference::Dark);

        let d = doc.read();
        let root = d.get(d.root()).unwrap();
        assert_eq!(root.attr(THEME_ATTRIBUTE), Some("dark"));
        assert!(root.style("transition").is_some());
        assert_eq!(d.get(icon).unwrap().class_name(), "fas fa-sun");
        assert_eq!(prefs.get("portfolio-theme").unwrap().as_deref(), Some("dark"));
    }

    #[test]
    fn test_init_does_not_persist_or_animate() {
        let prefs = MemoryPreferenceStore::new();
        let (store, doc, _) = store_with(prefs.clone(), Arc::default());
        assert_eq!(store.init(true), ThemePreference::Dark);
        assert_eq!(prefs.get("portfolio-theme").unwrap(), None);
        let d = doc.read();
        assert_eq!(d.get(d.root()).unwrap().style("transition"), None);
    }

    #[test]
    fn test_toggle_flips_applied_theme() {
        let (store, _, _) = store_with(MemoryPreferenceStore::new(), Arc::default());
        store.init(false);
        assert_eq!(store.toggle_theme(), ThemePreference::Dark);
        assert_eq!(store.toggle_theme(), ThemePreference::Light);
        assert_eq!(store.current(), ThemePreference::Light);
    }

    #[test]
    fn test_system_change_only_applies_without_user_choice() {
        let prefs = MemoryPreferenceStore::new();
        let (store, _, _) = store_with(prefs, Arc::default());
        store.init(false);

        assert_eq!(store.on_system_preference_change(true), Some(ThemePreference::Dark));
        assert_eq!(store.applied(), ThemePreference::Dark);

        store.set_theme(ThemePreference::Light);
        assert_eq!(store.on_system_preference_change(true), None);
        assert_eq!(store.applied(), ThemePreference::Light);
    }

    #[test]
    fn test_at_most_one_particle_instance() {
        let renderer = Arc::new(CountingRenderer::default());
        let (store, _, _) = store_with(MemoryPreferenceStore::new(), renderer.clone());
        store.init(false);
        for _ in 0..5 {
            store.toggle_theme();
        }
        assert_eq!(renderer.loads.load(Ordering::SeqCst), 6);
        assert_eq!(renderer.live.load(Ordering::SeqCst), 1);
        store.shutdown();
        assert_eq!(renderer.live.load(Ordering::SeqCst), 0);
        assert!(!store.has_live_particles());
    }

    #[test]
    fn test_subscribers_see_changes() {
        let (store, _, _) = store_with(MemoryPreferenceStore::new(), Arc::default());
        let mut rx = store.subscribe();
        store.set_theme(ThemePreference::Dark);
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), ThemePreference::Dark);
    }

    struct UnavailableRenderer;

    impl ParticleRenderer for UnavailableRenderer {
        fn load(&self, container: &str, _: &ParticleConfig) -> FolioResult<Box<dyn ParticleHandle>> {
            Err(FolioError::Particles(format!("no container #{container}")))
        }
    }

    #[test]
    fn test_renderer_failure_still_applies_theme() {
        let (doc, _) = page();
        let store = ThemeStore::new(
            doc.clone(),
            Arc::new(MemoryPreferenceStore::new()),
            Arc::new(UnavailableRenderer),
            ThemeConfig::default(),
        );
        store.set_theme(ThemePreference::Dark);
        assert_eq!(store.applied(), ThemePreference::Dark);
        assert!(!store.has_live_particles());
    }

    #[test]
    fn test_missing_toggle_is_tolerated() {
        let doc = Document::new().into_shared();
        let store = ThemeStore::new(
            doc.clone(),
            Arc::new(MemoryPreferenceStore::new()),
            Arc::new(CountingRenderer::default()),
            ThemeConfig::default(),
        );
        store.set_theme(ThemePreference::Dark);
        assert_eq!(store.applied(), ThemePreference::Dark);
    }
}
