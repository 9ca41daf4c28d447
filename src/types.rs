/*!
 * Core types and data structures for codecat
 */

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use strum::{Display, EnumString};

/// Source dialects whose imports are followed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum DialectKind {
    /// Go: package clause plus quoted import paths
    Go,
    /// Kotlin, including `.kts` scripts: dotted import lines
    Kotlin,
}

impl DialectKind {
    /// File extensions owned by this dialect
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Go => &["go"],
            Self::Kotlin => &["kt", "kts"],
        }
    }

    /// Detect the dialect from a file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "go" => Some(Self::Go),
            "kt" | "kts" => Some(Self::Kotlin),
            _ => None,
        }
    }

    /// Detect the dialect of a path
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Filesystem metadata carried into a framed record
#[derive(Debug, Clone)]
pub struct Metadata {
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
}

/// A file selected for the bundle, read exactly once
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Canonical absolute path, the file's identity
    pub abs_path: PathBuf,
    /// Path relative to the invocation root, as written into the stream
    pub display_path: String,
    /// File metadata
    pub metadata: Metadata,
    /// Raw content
    pub content: Vec<u8>,
    /// Dialect of the path the file was reached by, not of its target
    pub dialect: Option<DialectKind>,
}

/// A raw import identifier as written in a source file
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImportReference(pub String);

impl ImportReference {
    pub fn new(reference: impl Into<String>) -> Self {
        Self(reference.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ImportReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Base namespace of the project and the directory it corresponds to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceRoot {
    /// Module path or base package
    pub name: String,
    /// Directory holding the files of `name` itself
    pub dir: PathBuf,
}

impl NamespaceRoot {
    pub fn new(name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dir: dir.into(),
        }
    }
}
