//! Hero typewriter: types a phrase, holds, deletes it, moves to the next.
//!
//! ```text
//!  typing ──(full length, hold 2000ms)──► deleting
//!    ▲                                        │
//!    └──(empty, next phrase, hold 500ms)──────┘
//! ```
//!
//! Character positions count Unicode scalar values, so accented phrases
//! ("Elétrica") never split inside a code point.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::{ms, TypewriterConfig};
use crate::dom::{NodeId, SharedDocument};
use crate::task::sleep_or_cancel;

/// One rendered step of the animation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Text to show after this tick
    pub text: String,
    /// Delay before the next tick
    pub delay: Duration,
}

/// Cursor over the phrase list.
#[derive(Debug, Clone, PartialEq)]
pub struct TypewriterState {
    phrases: Vec<String>,
    phrase_index: usize,
    char_index: usize,
    is_deleting: bool,
}

impl TypewriterState {
    /// Returns `None` for an empty phrase list.
    pub fn new(phrases: Vec<String>) -> Option<Self> {
        if phrases.is_empty() {
            return None;
        }
        Some(Self {
            phrases,
            phrase_index: 0,
            char_index: 0,
            is_deleting: false,
        })
    }

    pub fn phrase_index(&self) -> usize {
        self.phrase_index
    }

    pub fn char_index(&self) -> usize {
        self.char_index
    }

    pub fn is_deleting(&self) -> bool {
        self.is_deleting
    }

    pub fn current_phrase(&self) -> &str {
        &self.phrases[self.phrase_index]
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }

    /// Advance one tick and return what to display.
    pub fn tick(&mut self, timing: &TypewriterConfig) -> Frame {
        let len = self.current_phrase().chars().count();

        let mut delay = if self.is_deleting {
            self.char_index = self.char_index.saturating_sub(1);
            timing.delete_delay_ms
        } else {
            self.char_index = (self.char_index + 1).min(len);
            timing.type_delay_ms
        };
        let text: String = self.current_phrase().chars().take(self.char_index).collect();

        if !self.is_deleting && self.char_index == len {
            self.is_deleting = true;
            delay = timing.hold_full_ms;
        } else if self.is_deleting && self.char_index == 0 {
            self.is_deleting = false;
            self.phrase_index = (self.phrase_index + 1) % self.phrases.len();
            delay = timing.hold_empty_ms;
        }

        Frame {
            text,
            delay: ms(delay),
        }
    }
}

/// Drives a [`TypewriterState`] into the `typing-text` element.
pub struct Typewriter {
    doc: SharedDocument,
    target: NodeId,
    state: TypewriterState,
    timing: TypewriterConfig,
}

impl Typewriter {
    /// Bind to the page. `None` when the element or phrases are missing.
    pub fn attach(doc: SharedDocument, config: &TypewriterConfig) -> Option<Self> {
        let target = doc.read().first_by_class("typing-text");
        let Some(target) = target else {
            debug!("No typing-text element, typewriter disabled");
            return None;
        };
        let Some(state) = TypewriterState::new(config.phrases.clone()) else {
            debug!("No phrases configured, typewriter disabled");
            return None;
        };
        Some(Self {
            doc,
            target,
            state,
            timing: config.clone(),
        })
    }

    /// Run until cancelled.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let frame = self.state.tick(&self.timing);
            self.doc.write().update(self.target, |el| el.set_text(frame.text));
            if !sleep_or_cancel(&cancel, frame.delay).await {
                break;
            }
        }
        debug!(phrase = self.state.phrase_index(), "Typewriter stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{Document, Element};

    fn state(phrases: &[&str]) -> TypewriterState {
        TypewriterState::new(phrases.iter().map(|s| s.to_string()).collect()).unwrap()
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(TypewriterState::new(Vec::new()).is_none());
    }

    #[test]
    fn test_types_holds_deletes_and_advances() {
        let timing = TypewriterConfig::default();
        let mut s = state(&["ab", "c"]);

        assert_eq!(s.tick(&timing), Frame { text: "a".into(), delay: ms(100) });
        assert_eq!(s.tick(&timing), Frame { text: "ab".into(), delay: ms(2000) });
        assert!(s.is_deleting());
        assert_eq!(s.tick(&timing), Frame { text: "a".into(), delay: ms(50) });
        assert_eq!(s.tick(&timing), Frame { text: "".into(), delay: ms(500) });
        assert!(!s.is_deleting());
        assert_eq!(s.phrase_index(), 1);
        assert_eq!(s.tick(&timing), Frame { text: "c".into(), delay: ms(2000) });
        assert_eq!(s.tick(&timing), Frame { text: "".into(), delay: ms(500) });
        assert_eq!(s.phrase_index(), 0, "index wraps");
    }

    #[test]
    fn test_multibyte_phrase() {
        let timing = TypewriterConfig::default();
        let mut s = state(&["é!"]);
        assert_eq!(s.tick(&timing).text, "é");
        assert_eq!(s.tick(&timing).text, "é!");
    }

    #[test]
    fn test_empty_phrase_stays_in_bounds() {
        let timing = TypewriterConfig::default();
        let mut s = state(&["", "x"]);
        let frame = s.tick(&timing);
        assert_eq!(frame.text, "");
        assert_eq!(s.char_index(), 0);
        assert!(s.is_deleting());
        s.tick(&timing);
        assert_eq!(s.phrase_index(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_writes_into_element_until_cancelled() {
        let mut doc = Document::new();
        let target = doc.append(doc.body(), Element::new("span").with_class("typing-text"));
        let doc = doc.into_shared();

        let config = TypewriterConfig {
            phrases: vec!["hey".into()],
            ..Default::default()
        };
        let writer = Typewriter::attach(doc.clone(), &config).unwrap();
        let cancel = CancellationToken::new();
        let task = tokio::spawn(writer.run(cancel.clone()));

        // Ticks at t=0 ("h"), 100 ("he"), 200 ("hey", then hold 2000).
        tokio::time::sleep(ms(250)).await;
        assert_eq!(doc.read().get(target).unwrap().text(), "hey");

        // Deleting starts at t=2200, next deletion at t=2250.
        tokio::time::sleep(ms(1980)).await;
        assert_eq!(doc.read().get(target).unwrap().text(), "he");

        cancel.cancel();
        task.await.unwrap();
    }

    #[test]
    fn test_attach_requires_element() {
        let doc = Document::new().into_shared();
        assert!(Typewriter::attach(doc, &TypewriterConfig::default()).is_none());
    }
}
