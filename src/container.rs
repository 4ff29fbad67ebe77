//! ZIP container abstraction for presentation archives.

use crate::error::{Error, Result};
use crate::model::Metadata;
use log::debug;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Map from relationship id to the resolved archive path of its target.
///
/// Built per part from the sidecar `.rels` manifest. External targets
/// (web URLs and the like) are not archive parts and are excluded, so a
/// failed lookup covers both "unknown id" and "not materialized in the
/// archive".
#[derive(Debug, Clone, Default)]
pub struct RelationshipMap {
    targets: HashMap<String, String>,
}

impl RelationshipMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the resolved archive path for a relationship id.
    pub fn get(&self, id: &str) -> Option<&str> {
        self.targets.get(id).map(String::as_str)
    }

    /// Number of resolvable relationships.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the part declared no resolvable relationships.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    fn insert(&mut self, id: String, target: String) {
        self.targets.insert(id, target);
    }
}

/// Resolve a relationship target against the directory of its base part.
///
/// Archive paths are not URLs and not OS paths; resolution is plain
/// segment arithmetic on `/`-separated names. A leading `/` makes the
/// target absolute from the archive root, `.` segments are dropped, and
/// `..` pops one directory (saturating at the root).
pub fn resolve_part_path(base_part: &str, target: &str) -> String {
    let target = target.replace('\\', "/");

    let mut segments: Vec<&str> = Vec::new();
    let relative = match target.strip_prefix('/') {
        Some(stripped) => stripped,
        None => {
            if let Some(pos) = base_part.rfind('/') {
                segments.extend(base_part[..pos].split('/'));
            }
            target.as_str()
        }
    };

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            name => segments.push(name),
        }
    }

    segments.join("/")
}

/// Decode XML bytes handling UTF-8 (with or without BOM) and UTF-16 LE/BE.
///
/// Conforming producers write UTF-8, but decks written by older or
/// non-standard tools show up in UTF-16 often enough to matter.
pub fn decode_xml_bytes(bytes: &[u8]) -> Result<String> {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        // UTF-8 BOM
        return String::from_utf8(bytes[3..].to_vec())
            .map_err(|e| Error::XmlParse(format!("invalid UTF-8 text: {}", e)));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        // UTF-16 LE BOM
        let content = decode_utf16_le(&bytes[2..])?;
        return Ok(rewrite_encoding_declaration(&content));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE BOM
        let content = decode_utf16_be(&bytes[2..])?;
        return Ok(rewrite_encoding_declaration(&content));
    }

    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => Ok(s),
        Err(_) => {
            // No BOM and not UTF-8. ASCII-heavy UTF-16 shows null bytes in
            // alternating positions; use that to pick an endianness.
            if bytes.len() >= 4 && bytes[1] == 0 && bytes[3] == 0 {
                Ok(rewrite_encoding_declaration(&decode_utf16_le(bytes)?))
            } else if bytes.len() >= 4 && bytes[0] == 0 && bytes[2] == 0 {
                Ok(rewrite_encoding_declaration(&decode_utf16_be(bytes)?))
            } else {
                Ok(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

/// Rewrite a UTF-16 encoding declaration after decoding to a Rust String.
///
/// The decoded text is UTF-8 by construction; leaving the declaration as
/// UTF-16 would make quick-xml reinterpret the buffer.
fn rewrite_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end) = content.find("?>") {
            let (decl, rest) = content.split_at(end + 2);
            let decl = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{}{}", decl, rest);
        }
    }
    content.to_string()
}

fn decode_utf16_le(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| u16::from_le_bytes([bytes[i], bytes[i + 1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("invalid UTF-16 text: {}", e)))
}

fn decode_utf16_be(bytes: &[u8]) -> Result<String> {
    let len = bytes.len() & !1;
    let units = (0..len)
        .step_by(2)
        .map(|i| u16::from_be_bytes([bytes[i], bytes[i + 1]]));
    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| Error::XmlParse(format!("invalid UTF-16 text: {}", e)))
}

/// Presentation archive opened for part access.
///
/// Wraps the ZIP central directory and provides XML text, binary part
/// reads, and relationship manifests.
pub struct PptxContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl PptxContainer {
    /// Open a presentation archive from a file path.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use deckview::container::PptxContainer;
    ///
    /// let container = PptxContainer::open("slides.pptx")?;
    /// # Ok::<(), deckview::Error>(())
    /// ```
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref())?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a presentation archive from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = zip::ZipArchive::new(cursor)?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Open a presentation archive from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read an XML part as a string, handling UTF-8 and UTF-16 encodings.
    pub fn read_xml(&self, part: &str) -> Result<String> {
        let bytes = self.read_binary(part)?;
        decode_xml_bytes(&bytes)
    }

    /// Read a binary part from the archive.
    pub fn read_binary(&self, part: &str) -> Result<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive
            .by_name(part)
            .map_err(|_| Error::MissingPart(part.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    /// Check whether a part exists in the archive.
    pub fn exists(&self, part: &str) -> bool {
        let archive = self.archive.borrow();
        let result = archive.file_names().any(|n| n == part);
        result
    }

    /// List part names matching a prefix.
    pub fn list_parts_with_prefix(&self, prefix: &str) -> Vec<String> {
        let archive = self.archive.borrow();
        archive
            .file_names()
            .filter(|n| n.starts_with(prefix))
            .map(String::from)
            .collect()
    }

    /// Parse the sidecar relationship manifest of a part.
    ///
    /// The manifest lives at the conventional sibling location,
    /// `<dir>/_rels/<file>.rels`. A missing manifest yields an empty map;
    /// the part simply has no internal references. Targets are resolved
    /// against the part's directory as they are read.
    pub fn part_relationships(&self, part: &str) -> Result<RelationshipMap> {
        let rels_path = match part.rfind('/') {
            Some(pos) => format!("{}/_rels/{}.rels", &part[..pos], &part[pos + 1..]),
            None => format!("_rels/{}.rels", part),
        };

        let content = match self.read_xml(&rels_path) {
            Ok(c) => c,
            Err(_) => return Ok(RelationshipMap::new()),
        };
        if content.trim().is_empty() {
            return Ok(RelationshipMap::new());
        }

        let mut rels = RelationshipMap::new();
        let mut reader = quick_xml::Reader::from_str(&content);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Empty(e)) | Ok(quick_xml::events::Event::Start(e))
                    if e.name().local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut target = String::new();
                    let mut external = false;

                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            b"TargetMode" => {
                                external = String::from_utf8_lossy(&attr.value).to_lowercase()
                                    == "external"
                            }
                            _ => {}
                        }
                    }

                    if id.is_empty() || target.is_empty() {
                        continue;
                    }
                    if external {
                        debug!("skipping external relationship {} -> {}", id, target);
                        continue;
                    }
                    rels.insert(id, resolve_part_path(part, &target));
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::XmlParse(e.to_string())),
                _ => {}
            }
            buf.clear();
        }

        Ok(rels)
    }

    /// Parse document metadata from `docProps/core.xml`.
    ///
    /// A missing or unreadable part yields empty metadata.
    pub fn core_metadata(&self) -> Metadata {
        let mut meta = Metadata::default();

        if let Ok(xml) = self.read_xml("docProps/core.xml") {
            let mut reader = quick_xml::Reader::from_str(&xml);
            reader.config_mut().trim_text(true);

            let mut buf = Vec::new();
            let mut current_element: Option<String> = None;

            loop {
                match reader.read_event_into(&mut buf) {
                    Ok(quick_xml::events::Event::Start(e)) => {
                        let name = e.name();
                        current_element =
                            Some(String::from_utf8_lossy(name.local_name().as_ref()).to_string());
                    }
                    Ok(quick_xml::events::Event::Text(e)) => {
                        if let Some(ref elem) = current_element {
                            let text = e.unescape().unwrap_or_default().to_string();
                            match elem.as_str() {
                                "title" => meta.title = Some(text),
                                "creator" => meta.author = Some(text),
                                "created" => meta.created = Some(text),
                                "modified" => meta.modified = Some(text),
                                _ => {}
                            }
                        }
                    }
                    Ok(quick_xml::events::Event::End(_)) => {
                        current_element = None;
                    }
                    Ok(quick_xml::events::Event::Eof) => break,
                    Err(_) => break,
                    _ => {}
                }
                buf.clear();
            }
        }

        meta
    }
}

impl std::fmt::Debug for PptxContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let archive = self.archive.borrow();
        f.debug_struct("PptxContainer")
            .field("parts", &archive.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    fn archive_with(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut buffer = Vec::new();
        let mut zip = zip::ZipWriter::new(Cursor::new(&mut buffer));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
        for (name, content) in parts {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        buffer
    }

    #[test]
    fn test_resolve_part_path() {
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "../media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "slide2.xml"),
            "ppt/slides/slide2.xml"
        );
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "/ppt/media/image1.png"),
            "ppt/media/image1.png"
        );
        assert_eq!(
            resolve_part_path("ppt/presentation.xml", "slides/slide1.xml"),
            "ppt/slides/slide1.xml"
        );
    }

    #[test]
    fn test_resolve_part_path_edge_cases() {
        // `.` segments are dropped, `..` saturates at the root
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "./../media/img.png"),
            "ppt/media/img.png"
        );
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "../../../media/img.png"),
            "media/img.png"
        );
        // backslashes from non-conforming producers
        assert_eq!(
            resolve_part_path("ppt/slides/slide1.xml", "..\\media\\image1.png"),
            "ppt/media/image1.png"
        );
        // base part without a directory
        assert_eq!(resolve_part_path("part.xml", "other.xml"), "other.xml");
    }

    #[test]
    fn test_relationship_map_from_archive() {
        let data = archive_with(&[(
            "ppt/slides/_rels/slide1.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="../media/image1.png"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink" Target="https://example.com/" TargetMode="External"/>
</Relationships>"#,
        )]);

        let container = PptxContainer::from_bytes(data).unwrap();
        let rels = container.part_relationships("ppt/slides/slide1.xml").unwrap();

        assert_eq!(rels.get("rId1"), Some("ppt/media/image1.png"));
        // external targets are not archive parts
        assert_eq!(rels.get("rId2"), None);
        assert_eq!(rels.len(), 1);
    }

    #[test]
    fn test_missing_rels_is_empty_map() {
        let data = archive_with(&[("ppt/slides/slide1.xml", "<p:sld/>")]);
        let container = PptxContainer::from_bytes(data).unwrap();
        let rels = container.part_relationships("ppt/slides/slide1.xml").unwrap();
        assert!(rels.is_empty());
    }

    #[test]
    fn test_container_part_access() {
        let data = archive_with(&[
            ("ppt/presentation.xml", "<p:presentation/>"),
            ("ppt/slides/slide1.xml", "<p:sld/>"),
            ("ppt/media/image1.png", "not really a png"),
        ]);
        let container = PptxContainer::from_bytes(data).unwrap();

        assert!(container.exists("ppt/presentation.xml"));
        assert!(!container.exists("ppt/slides/slide2.xml"));

        let slides = container.list_parts_with_prefix("ppt/slides/");
        assert_eq!(slides, vec!["ppt/slides/slide1.xml".to_string()]);

        let bytes = container.read_binary("ppt/media/image1.png").unwrap();
        assert_eq!(bytes, b"not really a png");

        assert!(matches!(
            container.read_binary("ppt/media/missing.png"),
            Err(Error::MissingPart(_))
        ));
    }

    #[test]
    fn test_invalid_bytes_are_archive_error() {
        let result = PptxContainer::from_bytes(b"definitely not a zip".to_vec());
        assert!(matches!(result, Err(Error::Archive(_))));
    }

    #[test]
    fn test_utf16_decoding() {
        // UTF-16 LE with BOM
        let utf16_le = b"\xFF\xFE<\0?\0x\0m\0l\0>\0";
        assert_eq!(decode_xml_bytes(utf16_le).unwrap(), "<?xml>");

        // UTF-16 BE with BOM
        let utf16_be = b"\xFE\xFF\0<\0?\0x\0m\0l\0>";
        assert_eq!(decode_xml_bytes(utf16_be).unwrap(), "<?xml>");

        // UTF-8 BOM
        let utf8_bom = b"\xEF\xBB\xBF<?xml>";
        assert_eq!(decode_xml_bytes(utf8_bom).unwrap(), "<?xml>");

        // plain UTF-8
        assert_eq!(decode_xml_bytes(b"<?xml>").unwrap(), "<?xml>");
    }

    #[test]
    fn test_utf16_declaration_rewrite() {
        let decoded = rewrite_encoding_declaration("<?xml version=\"1.0\" encoding=\"UTF-16\"?><a/>");
        assert_eq!(decoded, "<?xml version=\"1.0\" encoding=\"UTF-8\"?><a/>");
    }

    #[test]
    fn test_core_metadata() {
        let data = archive_with(&[(
            "docProps/core.xml",
            r#"<?xml version="1.0"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties"
                   xmlns:dc="http://purl.org/dc/elements/1.1/"
                   xmlns:dcterms="http://purl.org/dc/terms/">
  <dc:title>Quarterly Update</dc:title>
  <dc:creator>Jordan</dc:creator>
  <dcterms:created>2024-01-02T03:04:05Z</dcterms:created>
  <dcterms:modified>2024-02-03T04:05:06Z</dcterms:modified>
</cp:coreProperties>"#,
        )]);

        let container = PptxContainer::from_bytes(data).unwrap();
        let meta = container.core_metadata();
        assert_eq!(meta.title.as_deref(), Some("Quarterly Update"));
        assert_eq!(meta.author.as_deref(), Some("Jordan"));
        assert_eq!(meta.created.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(meta.modified.as_deref(), Some("2024-02-03T04:05:06Z"));
    }

    #[test]
    fn test_core_metadata_missing_part() {
        let data = archive_with(&[("ppt/presentation.xml", "<p:presentation/>")]);
        let container = PptxContainer::from_bytes(data).unwrap();
        let meta = container.core_metadata();
        assert!(meta.title.is_none());
        assert!(meta.author.is_none());
    }
}
