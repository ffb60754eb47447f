use std::path::PathBuf;
use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during geometry processing
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("XML parse error: {0}")]
    XmlParse(String),

    #[error("Malformed geometry: {0}")]
    MalformedGeometry(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

impl Error {
    /// Check if this error came from invalid coordinate data
    pub fn is_malformed_geometry(&self) -> bool {
        matches!(self, Error::MalformedGeometry(_))
    }
}

// Keep the parser's error kind so callers can match on one enum
impl From<citygml_lite_core::Error> for Error {
    fn from(err: citygml_lite_core::Error) -> Self {
        match err {
            citygml_lite_core::Error::Io { path, source } => Error::Io { path, source },
            citygml_lite_core::Error::XmlParse(msg) => Error::XmlParse(msg),
            citygml_lite_core::Error::MalformedGeometry(msg) => Error::MalformedGeometry(msg),
        }
    }
}
