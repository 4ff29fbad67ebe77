//! PPTX parser implementation.

use crate::container::{PptxContainer, RelationshipMap};
use crate::error::{Error, Result};
use crate::model::{
    ImageShape, Presentation, PresentationSize, Shape, ShapeGeometry, Slide, TextShape,
};
use crate::pptx::media;
use log::{debug, warn};
use quick_xml::events::BytesStart;
use std::path::Path;

/// Font size applied when no run in a text shape declares one, in points.
pub const DEFAULT_FONT_SIZE_PT: f64 = 18.0;

const PRESENTATION_PART: &str = "ppt/presentation.xml";
const SLIDE_PART_PREFIX: &str = "ppt/slides/slide";

/// Parser for PPTX (PowerPoint) presentations.
///
/// # Example
///
/// ```no_run
/// use deckview::PptxParser;
///
/// let parser = PptxParser::open("slides.pptx")?;
/// let presentation = parser.parse()?;
/// println!("{} slides", presentation.slides.len());
/// # Ok::<(), deckview::Error>(())
/// ```
pub struct PptxParser {
    container: PptxContainer,
    max_image_bytes: usize,
}

impl PptxParser {
    /// Open a PPTX file for parsing.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::from_container(PptxContainer::open(path)?))
    }

    /// Create a parser from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        Ok(Self::from_container(PptxContainer::from_bytes(data)?))
    }

    /// Create a parser from an already opened container.
    pub fn from_container(container: PptxContainer) -> Self {
        Self {
            container,
            max_image_bytes: media::DEFAULT_MAX_IMAGE_BYTES,
        }
    }

    /// Set the largest media part that gets inlined as a data URI.
    ///
    /// Parts over the limit are not inlined, and the picture shapes that
    /// reference them are dropped.
    pub fn with_max_image_bytes(mut self, limit: usize) -> Self {
        self.max_image_bytes = limit;
        self
    }

    /// Get a reference to the container.
    pub fn container(&self) -> &PptxContainer {
        &self.container
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slide_parts().len()
    }

    /// Parse the presentation into its model.
    ///
    /// Slides that fail to parse are logged and skipped; the rest of the
    /// deck still comes through.
    pub fn parse(&self) -> Result<Presentation> {
        let size = self.parse_size();
        let metadata = self.container.core_metadata();

        let mut slides = Vec::new();
        for (index, part) in self.slide_parts() {
            match self.parse_slide(&part) {
                Ok(shapes) => slides.push(Slide { index, shapes }),
                Err(e) => warn!("skipping slide {}: {}", index, e),
            }
        }

        Ok(Presentation {
            size,
            slides,
            metadata,
        })
    }

    /// Slide parts in ascending slide-number order.
    ///
    /// The number comes from the part filename, so a deck whose slides
    /// were reordered or deleted keeps its surviving numbering.
    fn slide_parts(&self) -> Vec<(u32, String)> {
        let mut parts: Vec<(u32, String)> = self
            .container
            .list_parts_with_prefix(SLIDE_PART_PREFIX)
            .into_iter()
            .filter_map(|part| slide_index(&part).map(|index| (index, part)))
            .collect();
        parts.sort_by_key(|(index, _)| *index);
        parts
    }

    /// Parse the deck-wide slide size from `ppt/presentation.xml`.
    ///
    /// A missing part, a missing `p:sldSz` element, or an unparsable
    /// declaration all fall back to the default size.
    fn parse_size(&self) -> PresentationSize {
        let xml = match self.container.read_xml(PRESENTATION_PART) {
            Ok(xml) => xml,
            Err(_) => {
                debug!("presentation part missing, using default slide size");
                return PresentationSize::default();
            }
        };

        match Self::read_slide_size(&xml) {
            Ok(Some(size)) => size,
            Ok(None) => {
                debug!("no usable sldSz declaration, using default slide size");
                PresentationSize::default()
            }
            Err(e) => {
                warn!("could not parse {}: {}", PRESENTATION_PART, e);
                PresentationSize::default()
            }
        }
    }

    fn read_slide_size(xml: &str) -> Result<Option<PresentationSize>> {
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(ref e))
                | Ok(quick_xml::events::Event::Start(ref e))
                    if e.name().local_name().as_ref() == b"sldSz" =>
                {
                    let mut width = None;
                    let mut height = None;

                    for attr in e.attributes().flatten() {
                        match attr.key.local_name().as_ref() {
                            b"cx" => {
                                width = String::from_utf8_lossy(&attr.value).parse::<u64>().ok()
                            }
                            b"cy" => {
                                height = String::from_utf8_lossy(&attr.value).parse::<u64>().ok()
                            }
                            _ => {}
                        }
                    }

                    if let (Some(width_emu), Some(height_emu)) = (width, height) {
                        if width_emu > 0 && height_emu > 0 {
                            return Ok(Some(PresentationSize {
                                width_emu,
                                height_emu,
                            }));
                        }
                    }
                    return Ok(None);
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(None)
    }

    /// Parse one slide part into its shapes.
    fn parse_slide(&self, part: &str) -> Result<Vec<Shape>> {
        let rels = self.container.part_relationships(part)?;
        let xml = self.container.read_xml(part)?;
        self.extract_shapes(&xml, &rels)
    }

    /// Extract positioned shapes from slide XML in document order.
    ///
    /// Text lives in `p:sp/p:txBody/a:p/a:r/a:t`, pictures in
    /// `p:pic/p:blipFill/a:blip`. Shapes without an `a:xfrm` transform
    /// have no placement and are dropped, as are pictures whose image
    /// cannot be inlined; every shape that comes back is renderable.
    fn extract_shapes(&self, xml: &str, rels: &RelationshipMap) -> Result<Vec<Shape>> {
        let mut shapes = Vec::new();
        let mut reader = quick_xml::Reader::from_str(xml);
        // Don't trim text - preserve whitespace from xml:space="preserve" elements
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        let mut in_sp = false;
        let mut in_pic = false;
        let mut in_sp_pr = false;
        let mut in_xfrm = false;
        let mut in_tx_body = false;
        let mut in_paragraph = false;
        let mut in_run = false;
        let mut in_text = false;
        let mut in_blip_fill = false;

        let mut offset: Option<(u64, u64)> = None;
        let mut extent: Option<(u64, u64)> = None;
        let mut lines: Vec<String> = Vec::new();
        let mut paragraph = String::new();
        let mut font_size_pt: Option<f64> = None;
        let mut rel_id: Option<String> = None;
        let mut name_attr: Option<String> = None;
        let mut descr_attr: Option<String> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => {
                    let local_name = e.name().local_name();
                    match local_name.as_ref() {
                        // p:sp - text shape
                        b"sp" => {
                            in_sp = true;
                            offset = None;
                            extent = None;
                            lines.clear();
                            paragraph.clear();
                            font_size_pt = None;
                            name_attr = None;
                            descr_attr = None;
                        }
                        // p:pic - picture shape
                        b"pic" => {
                            in_pic = true;
                            offset = None;
                            extent = None;
                            rel_id = None;
                            name_attr = None;
                            descr_attr = None;
                        }
                        b"spPr" if in_sp || in_pic => in_sp_pr = true,
                        // a:xfrm - the shape's placement transform
                        b"xfrm" if in_sp_pr => in_xfrm = true,
                        b"txBody" if in_sp => in_tx_body = true,
                        // a:p - paragraph
                        b"p" if in_tx_body => {
                            in_paragraph = true;
                            paragraph.clear();
                        }
                        // a:r - text run
                        b"r" if in_paragraph => in_run = true,
                        // a:t - text element
                        b"t" if in_run => in_text = true,
                        b"blipFill" if in_pic => in_blip_fill = true,
                        b"off" if in_xfrm => offset = Some(emu_pair(e, b"x", b"y")),
                        b"ext" if in_xfrm => extent = Some(emu_pair(e, b"cx", b"cy")),
                        // p:cNvPr - carries the shape name and alt text
                        b"cNvPr" if in_sp || in_pic => {
                            if let Some(name) = local_attr(e, b"name") {
                                name_attr = Some(name);
                            }
                            if let Some(descr) = local_attr(e, b"descr") {
                                descr_attr = Some(descr);
                            }
                        }
                        // a:blip - r:embed holds the image relationship id
                        b"blip" if in_blip_fill => {
                            if let Some(embed) = local_attr(e, b"embed") {
                                rel_id = Some(embed);
                            }
                        }
                        // first explicit run size wins for the whole shape
                        b"rPr" | b"endParaRPr" if in_tx_body && font_size_pt.is_none() => {
                            font_size_pt = run_font_size(e);
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Empty(ref e)) => {
                    let local_name = e.name().local_name();
                    match local_name.as_ref() {
                        // Handle self-closing off/ext
                        b"off" if in_xfrm => offset = Some(emu_pair(e, b"x", b"y")),
                        b"ext" if in_xfrm => extent = Some(emu_pair(e, b"cx", b"cy")),
                        // Handle self-closing cNvPr
                        b"cNvPr" if in_sp || in_pic => {
                            if let Some(name) = local_attr(e, b"name") {
                                name_attr = Some(name);
                            }
                            if let Some(descr) = local_attr(e, b"descr") {
                                descr_attr = Some(descr);
                            }
                        }
                        // Handle self-closing blip
                        b"blip" if in_blip_fill => {
                            if let Some(embed) = local_attr(e, b"embed") {
                                rel_id = Some(embed);
                            }
                        }
                        b"rPr" | b"endParaRPr" if in_tx_body && font_size_pt.is_none() => {
                            font_size_pt = run_font_size(e);
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Text(ref e)) => {
                    if in_text {
                        let text = e.unescape().unwrap_or_default();
                        paragraph.push_str(&text);
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => {
                    let local_name = e.name().local_name();
                    match local_name.as_ref() {
                        b"t" => in_text = false,
                        b"r" => in_run = false,
                        b"p" if in_paragraph => {
                            let collapsed =
                                paragraph.split_whitespace().collect::<Vec<_>>().join(" ");
                            if !collapsed.is_empty() {
                                lines.push(collapsed);
                            }
                            paragraph.clear();
                            in_paragraph = false;
                        }
                        b"txBody" => in_tx_body = false,
                        b"xfrm" => in_xfrm = false,
                        b"spPr" => in_sp_pr = false,
                        b"blipFill" => in_blip_fill = false,
                        b"sp" if in_sp => {
                            match (offset.take(), extent.take()) {
                                (Some((x_emu, y_emu)), Some((width_emu, height_emu)))
                                    if !lines.is_empty() =>
                                {
                                    shapes.push(Shape::Text(TextShape {
                                        geometry: ShapeGeometry {
                                            x_emu,
                                            y_emu,
                                            width_emu,
                                            height_emu,
                                        },
                                        lines: std::mem::take(&mut lines),
                                        font_size_pt: font_size_pt
                                            .unwrap_or(DEFAULT_FONT_SIZE_PT),
                                    }));
                                }
                                _ => {
                                    if !lines.is_empty() {
                                        debug!("dropping text shape without a transform");
                                    }
                                    lines.clear();
                                }
                            }
                            in_sp = false;
                        }
                        b"pic" if in_pic => {
                            let embed = rel_id.take();
                            if let (Some((x_emu, y_emu)), Some((width_emu, height_emu))) =
                                (offset.take(), extent.take())
                            {
                                match embed.and_then(|id| self.inline_image(rels, &id)) {
                                    Some(image_source) => {
                                        let alt_label = descr_attr
                                            .take()
                                            .or_else(|| name_attr.take())
                                            .filter(|s| !s.is_empty());
                                        shapes.push(Shape::Image(ImageShape {
                                            geometry: ShapeGeometry {
                                                x_emu,
                                                y_emu,
                                                width_emu,
                                                height_emu,
                                            },
                                            image_source,
                                            alt_label,
                                        }));
                                    }
                                    None => {
                                        debug!("dropping picture shape without a usable image")
                                    }
                                }
                            } else {
                                debug!("dropping picture shape without a transform");
                            }
                            in_pic = false;
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(shapes)
    }

    /// Materialize an image relationship as a data URI.
    ///
    /// Unresolvable ids, missing media parts, and parts over the inline
    /// cap all yield `None`, and the caller drops the picture shape
    /// rather than emit a broken image.
    fn inline_image(&self, rels: &RelationshipMap, rel_id: &str) -> Option<String> {
        let part = match rels.get(rel_id) {
            Some(part) => part,
            None => {
                debug!("image relationship {} has no archive target", rel_id);
                return None;
            }
        };

        let bytes = match self.container.read_binary(part) {
            Ok(bytes) => bytes,
            Err(_) => {
                debug!("media part {} missing from archive", part);
                return None;
            }
        };

        if bytes.len() > self.max_image_bytes {
            warn!(
                "media part {} is {} bytes, over the {} byte inline cap",
                part,
                bytes.len(),
                self.max_image_bytes
            );
            return None;
        }

        Some(media::data_uri(part, &bytes))
    }
}

/// Slide number from a part name like `ppt/slides/slide12.xml`.
fn slide_index(part: &str) -> Option<u32> {
    let digits = part
        .strip_prefix(SLIDE_PART_PREFIX)?
        .strip_suffix(".xml")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

fn local_attr(e: &BytesStart<'_>, name: &[u8]) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == name {
            return Some(String::from_utf8_lossy(&attr.value).to_string());
        }
    }
    None
}

/// Read a pair of EMU attributes; absent attributes count as zero.
fn emu_pair(e: &BytesStart<'_>, first: &[u8], second: &[u8]) -> (u64, u64) {
    let a = local_attr(e, first).map(|v| clamp_emu(&v)).unwrap_or(0);
    let b = local_attr(e, second).map(|v| clamp_emu(&v)).unwrap_or(0);
    (a, b)
}

/// Parse an EMU attribute value, clamping negatives to zero.
fn clamp_emu(value: &str) -> u64 {
    value.parse::<i64>().map(|v| v.max(0) as u64).unwrap_or(0)
}

/// Font size from an `sz` attribute, declared in hundredths of a point.
fn run_font_size(e: &BytesStart<'_>) -> Option<f64> {
    let sz = local_attr(e, b"sz")?;
    let hundredths = sz.parse::<f64>().ok()?;
    if hundredths > 0.0 {
        Some(hundredths / 100.0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::SimpleFileOptions;

    fn deck(parts: &[(&str, &[u8])]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }

    const PRESENTATION_XML: &[u8] = br#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:sldSz cx="9144000" cy="6858000"/>
</p:presentation>"#;

    fn text_slide(body: &str) -> Vec<u8> {
        format!(
            r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"
       xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:cSld><p:spTree>{}</p:spTree></p:cSld>
</p:sld>"#,
            body
        )
        .into_bytes()
    }

    #[test]
    fn test_slide_index() {
        assert_eq!(slide_index("ppt/slides/slide1.xml"), Some(1));
        assert_eq!(slide_index("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_index("ppt/slides/slide.xml"), None);
        assert_eq!(slide_index("ppt/slides/slideA.xml"), None);
        assert_eq!(slide_index("ppt/notesSlides/notesSlide1.xml"), None);
    }

    #[test]
    fn test_parse_minimal_deck() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="914400" y="914400"/><a:ext cx="4572000" cy="1143000"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>Hello World</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        assert_eq!(presentation.size.width_emu, 9_144_000);
        assert_eq!(presentation.size.height_emu, 6_858_000);
        assert_eq!(presentation.slides.len(), 1);
        assert_eq!(presentation.slides[0].index, 1);

        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => {
                assert_eq!(text.geometry.x_emu, 914_400);
                assert_eq!(text.geometry.y_emu, 914_400);
                assert_eq!(text.geometry.width_emu, 4_572_000);
                assert_eq!(text.geometry.height_emu, 1_143_000);
                assert_eq!(text.lines, vec!["Hello World"]);
                assert_eq!(text.font_size_pt, DEFAULT_FONT_SIZE_PT);
            }
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_default_size_when_declaration_missing() {
        let bare = br#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"/>"#;
        let data = deck(&[("ppt/presentation.xml", bare)]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        assert_eq!(presentation.size, PresentationSize::default());
        assert!(presentation.slides.is_empty());
    }

    #[test]
    fn test_missing_presentation_part_defaults_size() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>Hello</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        // no ppt/presentation.xml at all
        let data = deck(&[("ppt/slides/slide1.xml", &slide)]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        assert_eq!(presentation.size.width_emu, 9_144_000);
        assert_eq!(presentation.size.height_emu, 5_143_500);
        // the slide still comes through
        assert_eq!(presentation.slides.len(), 1);
        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => assert_eq!(text.lines, vec!["Hello"]),
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_shape_without_transform_is_skipped() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr/>
  <p:txBody><a:p><a:r><a:t>Floating text</a:t></a:r></a:p></p:txBody>
</p:sp>
<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>Anchored</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        let shapes = &presentation.slides[0].shapes;

        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Text(text) => assert_eq!(text.lines, vec!["Anchored"]),
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_pic_without_transform_is_skipped() {
        let slide = text_slide(
            r#"<p:pic>
  <p:nvPicPr><p:cNvPr id="4" name="Picture 3"/></p:nvPicPr>
  <p:blipFill><a:blip r:embed="rId1"/></p:blipFill>
  <p:spPr/>
</p:pic>"#,
        );
        let rels = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
</Relationships>"#;
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
            ("ppt/slides/_rels/slide1.xml.rels", rels),
            ("ppt/media/image1.png", b"pngbytes"),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        // resolvable image, but nowhere to place it
        assert!(presentation.slides[0].shapes.is_empty());
    }

    #[test]
    fn test_first_run_size_wins() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr>
  <p:txBody>
    <a:p><a:r><a:rPr sz="3200"/><a:t>Big </a:t></a:r><a:r><a:rPr sz="1600"/><a:t>Small</a:t></a:r></a:p>
  </p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => {
                assert_eq!(text.font_size_pt, 32.0);
                assert_eq!(text.lines, vec!["Big Small"]);
            }
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_whitespace_collapses_within_paragraph() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr>
  <p:txBody>
    <a:p><a:r><a:t>  Hello </a:t></a:r><a:r><a:t>  world  </a:t></a:r></a:p>
    <a:p><a:r><a:t>   </a:t></a:r></a:p>
  </p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => {
                // whitespace-only paragraphs contribute no line
                assert_eq!(text.lines, vec!["Hello world"]);
            }
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_image_inlined_as_data_uri() {
        let slide = text_slide(
            r#"<p:pic>
  <p:nvPicPr><p:cNvPr id="4" name="Picture 3" descr="A chart"/></p:nvPicPr>
  <p:blipFill><a:blip r:embed="rId2"/></p:blipFill>
  <p:spPr><a:xfrm><a:off x="100" y="200"/><a:ext cx="300" cy="400"/></a:xfrm></p:spPr>
</p:pic>"#,
        );
        let rels = br#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
</Relationships>"#;
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
            ("ppt/slides/_rels/slide1.xml.rels", rels),
            ("ppt/media/image1.png", b"pngbytes"),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        match &presentation.slides[0].shapes[0] {
            Shape::Image(image) => {
                assert_eq!(image.geometry.x_emu, 100);
                assert_eq!(image.geometry.height_emu, 400);
                assert!(image.image_source.starts_with("data:image/png;base64,"));
                assert_eq!(image.alt_label.as_deref(), Some("A chart"));
            }
            other => panic!("expected an image shape, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolved_image_drops_shape() {
        let slide = text_slide(
            r#"<p:pic>
  <p:nvPicPr><p:cNvPr id="4" name="Picture 3"/></p:nvPicPr>
  <p:blipFill><a:blip r:embed="rId9"/></p:blipFill>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr>
</p:pic>
<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>still here</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        let shapes = &presentation.slides[0].shapes;

        // the broken picture never makes it into the model
        assert_eq!(shapes.len(), 1);
        match &shapes[0] {
            Shape::Text(text) => assert_eq!(text.lines, vec!["still here"]),
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_image_is_skipped() {
        let slide = text_slide(
            r#"<p:pic>
  <p:blipFill><a:blip r:embed="rId1"/></p:blipFill>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="10" cy="10"/></a:xfrm></p:spPr>
</p:pic>"#,
        );
        let rels = br#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/big.png"/>
</Relationships>"#;
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
            ("ppt/slides/_rels/slide1.xml.rels", rels),
            ("ppt/media/big.png", &[0u8; 64]),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap().with_max_image_bytes(16);
        let presentation = parser.parse().unwrap();

        // over the cap means no shape at all, the slide itself survives
        assert_eq!(presentation.slides.len(), 1);
        assert!(presentation.slides[0].shapes.is_empty());
    }

    #[test]
    fn test_slides_sorted_numerically() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>x</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        // archive order is scrambled on purpose
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide10.xml", &slide),
            ("ppt/slides/slide2.xml", &slide),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        let order: Vec<u32> = presentation.slides.iter().map(|s| s.index).collect();
        assert_eq!(order, vec![1, 2, 10]);
    }

    #[test]
    fn test_slide_count() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>x</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
            ("ppt/slides/slide2.xml", &slide),
            ("ppt/slides/_rels/slide1.xml.rels", b"<Relationships/>"),
            ("ppt/notesSlides/notesSlide1.xml", b"<p:notes/>"),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        // rels and notes parts don't count as slides
        assert_eq!(parser.slide_count(), 2);
    }

    #[test]
    fn test_corrupt_slide_is_isolated() {
        let good = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>fine</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &good),
            ("ppt/slides/slide2.xml", b"<p:sld><a:open></a:mismatch></p:sld>"),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        assert_eq!(presentation.slides.len(), 1);
        assert_eq!(presentation.slides[0].index, 1);
    }

    #[test]
    fn test_parse_is_deterministic() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="5" y="6"/><a:ext cx="7" cy="8"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>stable</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let first = PptxParser::from_bytes(data.clone()).unwrap().parse().unwrap();
        let second = PptxParser::from_bytes(data).unwrap().parse().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_negative_offset_clamps_to_zero() {
        assert_eq!(clamp_emu("-914400"), 0);
        assert_eq!(clamp_emu("914400"), 914_400);
        assert_eq!(clamp_emu("garbage"), 0);
    }

    #[test]
    fn test_missing_transform_attributes_read_as_zero() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="914400"/><a:ext cx="4572000"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:t>Partial</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();

        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => {
                assert_eq!(text.geometry.x_emu, 914_400);
                assert_eq!(text.geometry.y_emu, 0);
                assert_eq!(text.geometry.width_emu, 4_572_000);
                assert_eq!(text.geometry.height_emu, 0);
            }
            other => panic!("expected a text shape, got {:?}", other),
        }
    }

    #[test]
    fn test_run_font_size_units() {
        let slide = text_slide(
            r#"<p:sp>
  <p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="1" cy="1"/></a:xfrm></p:spPr>
  <p:txBody><a:p><a:r><a:rPr lang="en-US" sz="2400" b="1"/><a:t>Heading</a:t></a:r></a:p></p:txBody>
</p:sp>"#,
        );
        let data = deck(&[
            ("ppt/presentation.xml", PRESENTATION_XML),
            ("ppt/slides/slide1.xml", &slide),
        ]);

        let parser = PptxParser::from_bytes(data).unwrap();
        let presentation = parser.parse().unwrap();
        match &presentation.slides[0].shapes[0] {
            Shape::Text(text) => assert_eq!(text.font_size_pt, 24.0),
            other => panic!("expected a text shape, got {:?}", other),
        }
    }
}
