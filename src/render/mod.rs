//! HTML output rendering for presentations.
//!
//! This module lays slides out on a fixed virtual scene in native pixel
//! coordinates, scales the scene to a container width, and emits
//! absolutely positioned HTML.
//!
//! # Example
//!
//! ```no_run
//! use deckview::{parse_file, render::*};
//!
//! let presentation = parse_file("slides.pptx")?;
//!
//! // Markup for embedding in an existing page
//! let fragment = to_html(&presentation, &RenderOptions::default());
//!
//! // A standalone page
//! let page = to_html_page(&presentation, &RenderOptions::new().with_container_width(640.0));
//! # Ok::<(), deckview::Error>(())
//! ```

mod html;
mod options;
mod scene;

pub use html::{escape_html, to_embed_page, to_html, to_html_page};
pub use options::RenderOptions;
pub use scene::{SceneRect, SlideScene};
