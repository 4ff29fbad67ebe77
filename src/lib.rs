//! # deckview
//!
//! Client-side PPTX presentation preview: parse a deck, lay its slides
//! out on a fixed virtual scene, and render width-fitted HTML.
//!
//! ## Quick Start
//!
//! ```no_run
//! use deckview::{parse_file, render};
//!
//! // Full parsing with access to structure
//! let presentation = parse_file("slides.pptx")?;
//! println!("{} slides", presentation.slides.len());
//!
//! // Render a standalone page
//! let options = render::RenderOptions::new().with_container_width(640.0);
//! let html = render::to_html_page(&presentation, &options);
//! std::fs::write("preview.html", html)?;
//! # Ok::<(), deckview::Error>(())
//! ```
//!
//! ## Remote documents
//!
//! ```no_run
//! use deckview::{preview, FetchPolicy, HostedViewer, Preview, PreviewSession};
//!
//! # async fn run() -> Result<(), deckview::Error> {
//! let session = PreviewSession::new();
//! let token = session.begin();
//! let viewer = HostedViewer::parse("https://viewer.example.com/embed")?;
//!
//! let source = "https://cdn.example.com/deck.pptx";
//! match preview(source, &FetchPolicy::new(), Some(&viewer), &token).await? {
//!     Preview::Hosted { embed_url } => println!("frame {}", embed_url),
//!     Preview::Local(presentation) => println!("{} slides", presentation.slides.len()),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `fetch` (default): remote document download and the [`preview`]
//!   entry point

pub mod container;
pub mod error;
pub mod model;
pub mod pptx;
pub mod render;
pub mod session;
pub mod units;
pub mod viewer;

#[cfg(feature = "fetch")]
pub mod fetch;

// Re-exports
pub use container::{PptxContainer, RelationshipMap};
pub use error::{Error, Result};
pub use model::{
    ImageShape, Metadata, Presentation, PresentationSize, Shape, ShapeGeometry, Slide, TextShape,
    DEFAULT_SLIDE_HEIGHT_EMU, DEFAULT_SLIDE_WIDTH_EMU,
};
pub use pptx::{PptxParser, DEFAULT_FONT_SIZE_PT};
pub use render::{RenderOptions, SceneRect, SlideScene};
pub use session::{PreviewSession, SessionToken};
pub use units::{emu_to_px, pt_to_px};
pub use viewer::{select_mode, HostedViewer, ViewerMode};

#[cfg(feature = "fetch")]
pub use fetch::{fetch_bytes, FetchPolicy, DEFAULT_FETCH_TIMEOUT};

use std::path::Path;

/// Parse a presentation file.
///
/// # Example
///
/// ```no_run
/// use deckview::parse_file;
///
/// let presentation = parse_file("slides.pptx")?;
/// println!("{} slides", presentation.slides.len());
/// # Ok::<(), deckview::Error>(())
/// ```
pub fn parse_file(path: impl AsRef<Path>) -> Result<Presentation> {
    PptxParser::open(path)?.parse()
}

/// Parse a presentation from bytes.
///
/// # Example
///
/// ```no_run
/// use deckview::parse_bytes;
///
/// let data = std::fs::read("slides.pptx")?;
/// let presentation = parse_bytes(&data)?;
/// # Ok::<(), deckview::Error>(())
/// ```
pub fn parse_bytes(data: &[u8]) -> Result<Presentation> {
    PptxParser::from_bytes(data.to_vec())?.parse()
}

/// Extract plain text from a presentation.
///
/// # Example
///
/// ```no_run
/// use deckview::extract_text;
///
/// let text = extract_text("slides.pptx")?;
/// println!("{}", text);
/// # Ok::<(), deckview::Error>(())
/// ```
pub fn extract_text(path: impl AsRef<Path>) -> Result<String> {
    let presentation = parse_file(path)?;
    Ok(presentation.plain_text())
}

/// Convert a presentation file to an HTML fragment.
///
/// # Example
///
/// ```no_run
/// use deckview::to_html;
///
/// let html = to_html("slides.pptx")?;
/// # Ok::<(), deckview::Error>(())
/// ```
pub fn to_html(path: impl AsRef<Path>) -> Result<String> {
    let presentation = parse_file(path)?;
    Ok(render::to_html(&presentation, &RenderOptions::default()))
}

/// Convert a presentation file to an HTML fragment with options.
///
/// # Example
///
/// ```no_run
/// use deckview::{to_html_with_options, render::RenderOptions};
///
/// let options = RenderOptions::new().with_container_width(480.0);
/// let html = to_html_with_options("slides.pptx", &options)?;
/// # Ok::<(), deckview::Error>(())
/// ```
pub fn to_html_with_options(path: impl AsRef<Path>, options: &RenderOptions) -> Result<String> {
    let presentation = parse_file(path)?;
    Ok(render::to_html(&presentation, options))
}

/// Result of previewing one document source.
#[cfg(feature = "fetch")]
#[derive(Debug, Clone)]
pub enum Preview {
    /// The source is publicly reachable; frame the hosted viewer at this
    /// URL instead of rendering locally.
    Hosted { embed_url: url::Url },
    /// The deck was fetched and parsed locally, ready for
    /// [`render::to_html`].
    Local(Presentation),
}

/// Preview a document source end to end.
///
/// Picks hosted or local mode, downloads the document when the source is
/// a URL, and parses it. The token is checked after the download and
/// after parsing, so a superseded request stops instead of publishing a
/// stale deck.
#[cfg(feature = "fetch")]
pub async fn preview(
    source: &str,
    policy: &FetchPolicy,
    viewer: Option<&HostedViewer>,
    token: &SessionToken,
) -> Result<Preview> {
    if let ViewerMode::Hosted(embed_url) = select_mode(source, viewer) {
        return Ok(Preview::Hosted { embed_url });
    }

    let bytes = match url::Url::parse(source) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {
            fetch_bytes(&url, policy).await?
        }
        _ => std::fs::read(source)?,
    };
    token.ensure_current()?;

    let presentation = parse_bytes(&bytes)?;
    token.ensure_current()?;

    Ok(Preview::Local(presentation))
}
