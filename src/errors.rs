//! Error types for registro
//!
//! [`RegistroError`] covers the failures that come from outside the form
//! itself: files and the department lookup. User input problems are not
//! errors in this sense; they are reported through
//! [`crate::form::ValidationError`] and [`crate::schema::editor::DraftErrors`].

use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum RegistroError {
    /// Reading or writing a file failed
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A schema file could not be parsed
    SchemaParse { path: PathBuf, message: String },

    /// The department request failed or returned something unexpected
    Fetch { url: String, message: String },
}

impl fmt::Display for RegistroError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistroError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            RegistroError::SchemaParse { path, message } => {
                write!(f, "Invalid schema file {}: {}", path.display(), message)
            }
            RegistroError::Fetch { url, message } => {
                write!(f, "Failed to fetch departments from {}: {}", url, message)
            }
        }
    }
}

impl std::error::Error for RegistroError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistroError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
