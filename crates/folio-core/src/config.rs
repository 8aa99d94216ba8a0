//! Page configuration.
//!
//! Every tunable the page scripts use lives here, with defaults matching the
//! shipped page. A JSON file can override any subset:
//!
//! ```json
//! { "typewriter": { "phrases": ["Engineer"] }, "scroll": { "drawer_breakpoint": 900 } }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::code::{default_script, CodeLine};
use crate::error::{FolioError, FolioResult};

/// Root configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub theme: ThemeConfig,
    pub typewriter: TypewriterConfig,
    pub code: CodeAnimationConfig,
    pub reveal: RevealConfig,
    pub scroll: ScrollConfig,
    pub form: FormConfig,
}

impl PageConfig {
    /// Load from a JSON file. Missing fields fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> FolioResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> FolioResult<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the components cannot work with.
    pub fn validate(&self) -> FolioResult<()> {
        for (name, value) in [
            ("reveal.threshold", self.reveal.threshold),
            ("code.start_threshold", self.code.start_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(FolioError::Config(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if self.code.jitter_ms > self.code.char_delay_ms {
            return Err(FolioError::Config(format!(
                "code.jitter_ms ({}) exceeds code.char_delay_ms ({})",
                self.code.jitter_ms, self.code.char_delay_ms
            )));
        }
        if self.theme.storage_key.is_empty() {
            return Err(FolioError::Config("theme.storage_key is empty".into()));
        }
        Ok(())
    }
}

/// Theme persistence and particle container
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Key under which the preference is stored
    pub storage_key: String,
    /// Element id the particle renderer draws into
    pub particles_container: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "portfolio-theme".to_string(),
            particles_container: "particles-js".to_string(),
        }
    }
}

/// Hero typewriter timings and phrases
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypewriterConfig {
    pub phrases: Vec<String>,
    pub type_delay_ms: u64,
    pub delete_delay_ms: u64,
    /// Pause once a phrase is fully typed
    pub hold_full_ms: u64,
    /// Pause once a phrase is fully deleted
    pub hold_empty_ms: u64,
}

impl Default for TypewriterConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Data Scientist".to_string(),
                "Cientista de Dados".to_string(),
                "Graduando em Engenharia Elétrica".to_string(),
            ],
            type_delay_ms: 100,
            delete_delay_ms: 50,
            hold_full_ms: 2000,
            hold_empty_ms: 500,
        }
    }
}

/// Code editor animation script and timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeAnimationConfig {
    pub lines: Vec<CodeLine>,
    pub char_delay_ms: u64,
    /// Uniform jitter applied to each character delay, in both directions
    pub jitter_ms: u64,
    pub line_pause_ms: u64,
    pub blank_line_pause_ms: u64,
    /// Pause after the last line before fading out
    pub hold_ms: u64,
    pub fade_ms: u64,
    /// Visible fraction of the editor that starts the animation
    pub start_threshold: f64,
}

impl Default for CodeAnimationConfig {
    fn default() -> Self {
        Self {
            lines: default_script(),
            char_delay_ms: 40,
            jitter_ms: 25,
            line_pause_ms: 150,
            blank_line_pause_ms: 50,
            hold_ms: 3000,
            fade_ms: 500,
            start_threshold: 0.5,
        }
    }
}

/// Scroll-reveal observer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Classes whose elements are revealed on first sight
    pub targets: Vec<String>,
    pub threshold: f64,
    /// Bottom inset of the observation root, in pixels
    pub bottom_margin_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            targets: [
                "skill-item",
                "project-card",
                "contact-item",
                "about-text",
                "section-title",
                "contact-form",
                "about-image",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            threshold: 0.1,
            bottom_margin_px: 50.0,
        }
    }
}

/// Scroll reactor thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Header height used when the header element is missing
    pub fallback_header_height: f64,
    /// Extra offset added below the header when picking the active section
    pub active_offset: f64,
    /// Scroll distance after which the header is marked `scrolled`
    pub header_scrolled_after: f64,
    /// Scroll distance after which the scroll hint fades out
    pub hint_hidden_after: f64,
    /// Viewport width above which the mobile drawer is force-closed
    pub drawer_breakpoint: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            fallback_header_height: 64.0,
            active_offset: 20.0,
            header_scrolled_after: 20.0,
            hint_hidden_after: 100.0,
            drawer_breakpoint: 768.0,
        }
    }
}

/// Contact form settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Overrides the form's `action` attribute when set
    pub endpoint: Option<String>,
    /// How long a status message stays visible
    pub status_visible_ms: u64,
    /// Request timeout
    pub timeout_ms: u64,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            status_visible_ms: 5000,
            timeout_ms: 15_000,
        }
    }
}

pub(crate) fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}
