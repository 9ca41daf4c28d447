/*!
 * Source dialects: import extraction and import-to-directory mapping
 */

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::types::{DialectKind, ImportReference, NamespaceRoot};

pub mod go;
pub mod kotlin;

pub use go::GoDialect;
pub use kotlin::KotlinDialect;

/// Package a file declares for itself and the imports it lists
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportClause {
    pub package: Option<String>,
    pub imports: Vec<ImportReference>,
}

/// What the resolver needs to know about one family of source files
pub trait Dialect: Send + Sync {
    fn kind(&self) -> DialectKind;

    /// Extensions of files this dialect expands, without the dot
    fn extensions(&self) -> &'static [&'static str] {
        self.kind().extensions()
    }

    /// Raw import identifiers in declaration order, duplicates kept
    fn extract_imports(&self, path: &Path, content: &[u8]) -> Result<Vec<ImportReference>>;

    /// Declared package and imports from a single pass over the file
    ///
    /// Dialects without a package declaration report `None` for it.
    fn inspect(&self, path: &Path, content: &[u8]) -> Result<ImportClause> {
        Ok(ImportClause {
            package: None,
            imports: self.extract_imports(path, content)?,
        })
    }

    /// Directory holding the files of `reference`, `None` when foreign
    fn map_import(&self, reference: &ImportReference, root: &NamespaceRoot) -> Option<PathBuf>;
}

struct Registration {
    dialect: Box<dyn Dialect>,
    root: Option<NamespaceRoot>,
}

/// Registered dialects, each with its resolved namespace root
#[derive(Default)]
pub struct DialectRegistry {
    entries: Vec<Registration>,
}

impl DialectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a dialect; a later registration of the same kind replaces it
    pub fn register(&mut self, dialect: Box<dyn Dialect>, root: Option<NamespaceRoot>) {
        let kind = dialect.kind();
        self.entries.retain(|entry| entry.dialect.kind() != kind);
        self.entries.push(Registration { dialect, root });
    }

    /// Dialect registered for `kind`
    pub fn get(&self, kind: DialectKind) -> Option<&dyn Dialect> {
        self.lookup(kind).map(|entry| entry.dialect.as_ref())
    }

    /// Namespace root registered for `kind`
    pub fn root(&self, kind: DialectKind) -> Option<&NamespaceRoot> {
        self.lookup(kind).and_then(|entry| entry.root.as_ref())
    }

    /// Dialect owning the extension of `path`
    pub fn for_path(&self, path: &Path) -> Option<&dyn Dialect> {
        DialectKind::from_path(path).and_then(|kind| self.get(kind))
    }

    fn lookup(&self, kind: DialectKind) -> Option<&Registration> {
        self.entries.iter().find(|entry| entry.dialect.kind() == kind)
    }
}
