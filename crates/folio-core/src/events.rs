//! Page events and the event source the controller listens to.
//!
//! ## Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PageEvent: everything the browser would report to the page     │
//! │  ├── Ready: DOM content loaded                                  │
//! │  ├── Click / KeyDown: user input                                │
//! │  ├── Scroll / Resize: window geometry changed                   │
//! │  ├── Intersection: an observed element crossed the viewport     │
//! │  ├── ColorSchemeChanged: system dark-mode preference flipped    │
//! │  └── FieldBlur / FieldInput / Submit: contact form activity     │
//! │                                                                 │
//! │  EventSource: anything that can hand out a receiver of events   │
//! │  └── EventBus: broadcast-backed implementation                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use tokio::sync::broadcast;

use crate::dom::NodeId;

/// Default capacity for the event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events delivered to the page controller
#[derive(Debug, Clone, PartialEq)]
pub enum PageEvent {
    /// Document finished loading
    Ready,
    /// Element was clicked
    Click {
        /// Innermost element under the pointer
        target: NodeId,
    },
    /// Window scrolled to a new vertical offset
    Scroll {
        /// New `scrollY`
        y: f64,
    },
    /// Window was resized
    Resize {
        /// New inner width
        width: f64,
        /// New inner height
        height: f64,
    },
    /// Key pressed anywhere in the document
    KeyDown {
        /// Key name, as in `KeyboardEvent.key`
        key: String,
    },
    /// Externally computed intersection for an element
    Intersection {
        /// Observed element
        target: NodeId,
        /// Visible fraction in `[0, 1]`
        ratio: f64,
    },
    /// `prefers-color-scheme: dark` changed
    ColorSchemeChanged {
        /// Whether the system now prefers dark
        dark: bool,
    },
    /// A form field lost focus
    FieldBlur {
        /// The field
        field: NodeId,
    },
    /// A form field's value changed
    FieldInput {
        /// The field
        field: NodeId,
        /// New value
        value: String,
    },
    /// A form was submitted
    Submit {
        /// The form element
        form: NodeId,
    },
}

impl PageEvent {
    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PageEvent::Ready => "ready",
            PageEvent::Click { .. } => "click",
            PageEvent::Scroll { .. } => "scroll",
            PageEvent::Resize { .. } => "resize",
            PageEvent::KeyDown { .. } => "keydown",
            PageEvent::Intersection { .. } => "intersection",
            PageEvent::ColorSchemeChanged { .. } => "color-scheme",
            PageEvent::FieldBlur { .. } => "blur",
            PageEvent::FieldInput { .. } => "input",
            PageEvent::Submit { .. } => "submit",
        }
    }
}

impl fmt::Display for PageEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageEvent::Click { target } => write!(f, "click({})", target),
            PageEvent::Scroll { y } => write!(f, "scroll({})", y),
            PageEvent::Resize { width, height } => write!(f, "resize({}x{})", width, height),
            PageEvent::KeyDown { key } => write!(f, "keydown({})", key),
            PageEvent::Intersection { target, ratio } => {
                write!(f, "intersection({}, {:.2})", target, ratio)
            }
            PageEvent::ColorSchemeChanged { dark } => write!(f, "color-scheme(dark={})", dark),
            PageEvent::FieldBlur { field } => write!(f, "blur({})", field),
            PageEvent::FieldInput { field, .. } => write!(f, "input({})", field),
            PageEvent::Submit { form } => write!(f, "submit({})", form),
            PageEvent::Ready => write!(f, "ready"),
        }
    }
}

/// Something the controller can subscribe to for page events.
///
/// The browser binding implements this over real DOM listeners; tests and
/// the headless runner use [`EventBus`].
pub trait EventSource {
    /// Get a fresh receiver. Events emitted before subscribing are not seen.
    fn subscribe(&self) -> broadcast::Receiver<PageEvent>;
}

/// Broadcast-backed event source.
///
/// Cloning shares the same channel.
#[derive(Debug, Clone)]
pub struct EventBus {
    event_tx: broadcast::Sender<PageEvent>,
}

impl EventBus {
    /// Create a new bus with the default capacity
    pub fn new() -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { event_tx }
    }

    /// Emit an event to all subscribers.
    ///
    /// Returns the number of receivers that will see it; zero when nobody
    /// is listening, which is not an error.
    pub fn emit(&self, event: PageEvent) -> usize {
        self.event_tx.send(event).unwrap_or(0)
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for EventBus {
    fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.event_tx.subscribe()
    }
}
