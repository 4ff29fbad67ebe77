//! Error types for the deckview library.

use std::io;
use thiserror::Error;

/// Result type alias for deckview operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while previewing a presentation.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The document bytes could not be retrieved over the network.
    #[error("could not fetch document: {0}")]
    Fetch(String),

    /// Bytes were obtained but do not form a valid presentation archive.
    #[error("could not read presentation archive: {0}")]
    Archive(String),

    /// Error parsing XML content of a required part.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// A required archive part is missing.
    #[error("missing archive part: {0}")]
    MissingPart(String),

    /// The document reference is not a usable source.
    #[error("invalid document source: {0}")]
    InvalidSource(String),

    /// A newer preview superseded this one.
    #[error("preview cancelled by a newer request")]
    Cancelled,
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::Archive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Error::InvalidSource(err.to_string())
    }
}

#[cfg(feature = "fetch")]
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Fetch(err.to_string())
    }
}
