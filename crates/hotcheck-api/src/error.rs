//! Error handling for hotcheck

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for convenience
pub type HotcheckResult<T> = Result<T, HotcheckError>;

/// Errors raised while validating that a module is imported dynamically
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum HotcheckError {
    /// The parent source file could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The import statements of a source file could not be analyzed
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// The specifier is not reached through a dynamic `import()` from the parent
    #[error(
        "The import \"{specifier}\" is not imported dynamically from {parent}.\nYou must use a dynamic import() to make it reloadable (HMR)."
    )]
    NotDynamicallyImported {
        specifier: String,
        /// Parent path rendered relative to the project root
        parent: String,
    },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl HotcheckError {
    /// Create a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a new parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new "not dynamically imported" error
    pub fn not_dynamically_imported(
        specifier: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self::NotDynamicallyImported {
            specifier: specifier.into(),
            parent: parent.into(),
        }
    }

    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether this error reports a violated dynamic-import invariant rather
    /// than an unreadable or unparseable file
    pub fn is_not_dynamically_imported(&self) -> bool {
        matches!(self, Self::NotDynamicallyImported { .. })
    }
}
