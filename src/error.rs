//! Global error handling for codecat
//!
//! One error type covers both directions. Errors are either fatal (the whole
//! join or split stops) or scoped to a single file, which the caller logs
//! before moving on.

use std::io;
use std::path::Path;

use thiserror::Error;

/// Global error type for codecat operations
#[derive(Error, Debug)]
pub enum CodecatError {
    /// File system errors on an individual file or directory
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failure writing the bundle stream or a reconstructed file sink
    #[error("Output error: {0}")]
    Output(#[source] io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Project manifest missing or unreadable when it is required
    #[error("Manifest error: {0}")]
    Manifest(String),

    /// A dialect needs a namespace root that could not be resolved
    #[error("Missing namespace root: {0}")]
    MissingNamespaceRoot(String),

    /// The import clause of a source file could not be parsed
    #[error("Import parse error in {path}: {reason}")]
    ImportParse { path: String, reason: String },

    /// Bundle stream does not start with the format marker
    #[error("Invalid stream: {0}")]
    InvalidStream(String),

    /// Tree-sitter grammar could not be loaded
    #[error("Grammar error: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CodecatError {
    /// Whether this error must abort the whole run rather than one file
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Output(_)
                | Self::Config(_)
                | Self::Manifest(_)
                | Self::MissingNamespaceRoot(_)
                | Self::InvalidStream(_)
                | Self::Language(_)
        )
    }

    /// Build an import parse error for `path`
    pub fn import_parse(path: &Path, reason: impl Into<String>) -> Self {
        Self::ImportParse {
            path: path.display().to_string(),
            reason: reason.into(),
        }
    }
}

/// Specialized Result type for codecat operations
pub type Result<T> = std::result::Result<T, CodecatError>;

/// Creates a CodecatError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::CodecatError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for attaching a path or other context to IO errors
pub trait ResultExt<T> {
    /// Wrap the error with context, keeping its kind
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T> ResultExt<T> for std::result::Result<T, io::Error> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            CodecatError::Io(io::Error::new(e.kind(), format!("{}: {}", context, e)))
        })
    }
}

// Lets callers working in io::Result use `?` on codecat operations
impl From<CodecatError> for io::Error {
    fn from(err: CodecatError) -> Self {
        match err {
            CodecatError::Io(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other.to_string()),
        }
    }
}
