use serde::{Deserialize, Serialize};

/// Placement and extent of a shape on the slide, in EMUs.
///
/// Coordinates come straight from the slide XML transform; conversion to
/// pixels happens at render time so the model stays lossless.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeGeometry {
    pub x_emu: u64,
    pub y_emu: u64,
    pub width_emu: u64,
    pub height_emu: u64,
}

/// A text shape: one or more paragraphs positioned on the slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextShape {
    pub geometry: ShapeGeometry,
    /// Paragraph texts in document order, whitespace-collapsed.
    pub lines: Vec<String>,
    /// Font size applied to the whole shape, in points.
    ///
    /// Taken from the first run that declares an explicit size; shapes
    /// mixing sizes render at that single size. Defaults to 18pt when no
    /// run declares one.
    pub font_size_pt: f64,
}

/// A picture shape carrying its image payload inline.
///
/// Pictures whose payload cannot be materialized from the archive are
/// dropped during extraction, so every image shape in the model is
/// renderable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageShape {
    pub geometry: ShapeGeometry,
    /// `data:` URI with the base64-encoded image bytes.
    pub image_source: String,
    /// Alternative text from the drawing's non-visual properties.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt_label: Option<String>,
}

/// A positioned element extracted from a slide, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Text(TextShape),
    Image(ImageShape),
}

impl Shape {
    /// The shape's placement on the slide.
    pub fn geometry(&self) -> ShapeGeometry {
        match self {
            Shape::Text(text) => text.geometry,
            Shape::Image(image) => image.geometry,
        }
    }
}
