//! Intermediate presentation model.
//!
//! This module defines the data structures that represent a parsed deck in
//! a renderer-agnostic way. The parser converts slide XML into these
//! structures, and the render module converts them to HTML output.

mod presentation;
mod shape;

pub use presentation::*;
pub use shape::*;
