//! Folio Core Library
//!
//! Interactive behaviour for a single-page personal portfolio, modelled
//! headlessly over an in-memory page tree.
//!
//! ## Overview
//!
//! The page is a [`Document`] of elements with class lists, attributes,
//! inline styles and layout boxes. Components bind to the elements they need
//! when constructed and react to typed [`PageEvent`]s:
//!
//! - **Theme**: light/dark preference, persisted on explicit choice, with a
//!   particle background rebuilt on every change
//! - **Typing effects**: a looping hero typewriter and a scripted code-editor
//!   animation that starts once the editor is on screen
//! - **Scroll**: active navigation link, header style, scroll hint, reveal
//!   animations
//! - **Contact form**: inline validation and asynchronous submission
//! - **Project modal**: details read from the clicked card
//!
//! Missing elements disable the matching component; nothing panics.
//!
//! ## Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use folio_core::{
//!     Document, EventBus, HttpTransport, MemoryPreferenceStore, PageConfig, PageEvent,
//!     PortfolioApp, Services, TracingParticleRenderer,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let doc = Document::new().into_shared();
//!     let config = PageConfig::default();
//!     let services = Services {
//!         preferences: Arc::new(MemoryPreferenceStore::new()),
//!         particles: Arc::new(TracingParticleRenderer),
//!         transport: Arc::new(HttpTransport::new(std::time::Duration::from_secs(15))?),
//!     };
//!
//!     let bus = EventBus::new();
//!     let cancel = CancellationToken::new();
//!     let mut app = PortfolioApp::new(doc, &config, services);
//!
//!     bus.emit(PageEvent::Scroll { y: 640.0 });
//!     app.run(&bus, cancel).await;
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod code;
pub mod config;
pub mod dom;
pub mod error;
pub mod events;
pub mod form;
pub mod modal;
pub mod nav;
pub mod particles;
pub mod reveal;
pub mod scroll;
pub mod storage;
pub mod tabs;
pub mod task;
pub mod theme;
pub mod typewriter;

// Re-exports
pub use app::{PortfolioApp, Services};
pub use code::{default_script, CodeAnimator, CodeLine, VisibilityGate};
pub use config::{
    CodeAnimationConfig, FormConfig, PageConfig, RevealConfig, ScrollConfig, ThemeConfig,
    TypewriterConfig,
};
pub use dom::{Document, Element, LayoutBox, NodeId, SharedDocument, Viewport};
pub use error::{FolioError, FolioResult};
pub use events::{EventBus, EventSource, PageEvent};
pub use form::{
    ContactForm, FieldValidation, FormState, FormTransport, HttpTransport, SubmitOutcome,
    TransportResponse,
};
pub use modal::{tech_icon, ProjectModal, ProjectRecord};
pub use nav::Navigation;
pub use particles::{ParticleConfig, ParticleHandle, ParticleRenderer, TracingParticleRenderer};
pub use reveal::RevealEngine;
pub use scroll::ScrollReactor;
pub use storage::{MemoryPreferenceStore, PreferenceStore, RedbPreferenceStore};
pub use tabs::SkillTabs;
pub use task::{sleep_or_cancel, LoopHandle};
pub use theme::{ThemePreference, ThemeStore};
pub use typewriter::{Frame, Typewriter, TypewriterState};
