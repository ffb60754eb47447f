// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for document parsing and geometry lookup
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading a CityGML document
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
}

impl Error {
    /// Check if this error came from invalid coordinate data
    pub fn is_malformed_geometry(&self) -> bool {
        matches!(self, Error::MalformedGeometry(_))
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}
