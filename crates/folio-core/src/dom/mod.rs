//! Headless page model.
//!
//! The page scripts only ever need a small slice of the browser DOM:
//! class lists, attributes, inline styles, text/markup content, a vertical
//! layout box per element and the window's scroll position. This module
//! models exactly that, so every component can be driven and inspected
//! without a browser.
//!
//! ```text
//! Document
//! ├── nodes: Vec<Option<Element>>  (arena, indexed by NodeId; freed slots reused)
//! ├── root  ── <html data-theme=…>
//! │            └── <body> …
//! └── viewport: scroll_y / width / height
//! ```

mod document;
mod element;

pub use document::{Document, SharedDocument, Viewport};
pub use element::{Element, LayoutBox, NodeId};
