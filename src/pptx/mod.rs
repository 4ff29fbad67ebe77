//! PPTX (PowerPoint) presentation parser.
//!
//! This module provides parsing for Microsoft PowerPoint presentations in
//! the Office Open XML (.pptx) format: deck size, slide shapes with their
//! geometry, and inlined image payloads.

mod media;
mod parser;

pub use media::{data_uri, mime_for_part, DEFAULT_MAX_IMAGE_BYTES};
pub use parser::{PptxParser, DEFAULT_FONT_SIZE_PT};
