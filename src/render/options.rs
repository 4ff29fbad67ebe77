//! Rendering options configuration.

/// Options for rendering presentations.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Width of the container the deck renders into, in CSS pixels.
    ///
    /// Slides keep their aspect ratio by scaling the whole scene to this
    /// width.
    pub container_width: f64,

    /// Page title for standalone output; falls back to the document
    /// title, then to a generic one.
    pub title: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            container_width: 960.0,
            title: None,
        }
    }
}

impl RenderOptions {
    /// Create new render options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container width in CSS pixels.
    pub fn with_container_width(mut self, width: f64) -> Self {
        self.container_width = width;
        self
    }

    /// Set the page title for standalone output.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
