use crate::model::Shape;
use crate::units::emu_to_px;
use serde::{Deserialize, Serialize};

/// Default deck width in EMUs when `ppt/presentation.xml` declares no size.
pub const DEFAULT_SLIDE_WIDTH_EMU: u64 = 9_144_000;

/// Default deck height in EMUs when `ppt/presentation.xml` declares no size.
pub const DEFAULT_SLIDE_HEIGHT_EMU: u64 = 5_143_500;

/// Deck-wide slide dimensions in EMUs.
///
/// Every slide in a deck shares one size; it is declared once in the
/// presentation part rather than per slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationSize {
    pub width_emu: u64,
    pub height_emu: u64,
}

impl Default for PresentationSize {
    fn default() -> Self {
        Self {
            width_emu: DEFAULT_SLIDE_WIDTH_EMU,
            height_emu: DEFAULT_SLIDE_HEIGHT_EMU,
        }
    }
}

impl PresentationSize {
    /// Native slide width in CSS pixels.
    pub fn width_px(&self) -> f64 {
        emu_to_px(self.width_emu)
    }

    /// Native slide height in CSS pixels.
    pub fn height_px(&self) -> f64 {
        emu_to_px(self.height_emu)
    }
}

/// Document metadata from `docProps/core.xml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<String>,
}

/// One slide with its shapes in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    /// Number taken from the part filename (`slide3.xml` is 3), so decks
    /// with gaps keep their original numbering.
    pub index: u32,
    pub shapes: Vec<Shape>,
}

/// A fully parsed presentation: size, ordered slides, and metadata.
///
/// This is the hand-off point between parsing and rendering. It is plain
/// data; feeding the same archive through the parser twice produces equal
/// values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub size: PresentationSize,
    pub slides: Vec<Slide>,
    pub metadata: Metadata,
}

impl Presentation {
    /// Extract all text content as plain text, slides separated by a blank
    /// line.
    pub fn plain_text(&self) -> String {
        let mut slides_text = Vec::new();
        for slide in &self.slides {
            let mut lines = Vec::new();
            for shape in &slide.shapes {
                if let Shape::Text(text) = shape {
                    lines.extend(text.lines.iter().cloned());
                }
            }
            if !lines.is_empty() {
                slides_text.push(lines.join("\n"));
            }
        }
        slides_text.join("\n\n")
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON.
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
