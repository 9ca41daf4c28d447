/*!
 * Kotlin and Kotlin script: imports come from a line scan
 *
 * Lines are matched one at a time. Imports split across lines or hidden in
 * block comments are not recognized, and import-shaped lines inside
 * multi-line strings are.
 */

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dialect::Dialect;
use crate::error::Result;
use crate::namespace;
use crate::types::{DialectKind, ImportReference, NamespaceRoot};

static IMPORT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*import\s+([A-Za-z_][A-Za-z0-9_]*(?:\.[A-Za-z_][A-Za-z0-9_]*)*)(?:\.\*)?(?:\s+as\s+[A-Za-z_][A-Za-z0-9_]*)?\s*;?\s*$",
    )
    .expect("import line pattern is valid")
});

#[derive(Debug, Default, Clone, Copy)]
pub struct KotlinDialect;

impl KotlinDialect {
    pub fn new() -> Self {
        Self
    }
}

/// Dotted identifiers of every import line, in file order
pub fn scan_imports(content: &[u8]) -> Vec<ImportReference> {
    let text = String::from_utf8_lossy(content);
    text.lines()
        .filter_map(|line| IMPORT_LINE.captures(line))
        .map(|caps| ImportReference::new(&caps[1]))
        .collect()
}

impl Dialect for KotlinDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Kotlin
    }

    fn extract_imports(&self, _path: &Path, content: &[u8]) -> Result<Vec<ImportReference>> {
        Ok(scan_imports(content))
    }

    /// Imports usually name a class or function, so a path that is not a
    /// directory falls back to the enclosing package directory.
    fn map_import(&self, reference: &ImportReference, root: &NamespaceRoot) -> Option<PathBuf> {
        let dir = namespace::map_to_directory(reference, root, '.')?;
        if dir.is_dir() || dir == root.dir {
            return Some(dir);
        }
        dir.parent().map(Path::to_path_buf)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn imports_of(src: &str) -> Vec<String> {
        scan_imports(src.as_bytes()).into_iter().map(|i| i.0).collect()
    }

    #[test]
    fn test_import_forms() {
        let src = "package com.acme.app\n\
                   \n\
                   import com.acme.core.Engine\n\
                   import com.acme.util.*\n\
                   import kotlin.math.max as maximum\n\
                   import java.io.File;\n\
                   \timport com.acme.io.Reader\n";
        assert_eq!(
            imports_of(src),
            vec![
                "com.acme.core.Engine",
                "com.acme.util",
                "kotlin.math.max",
                "java.io.File",
                "com.acme.io.Reader",
            ]
        );
    }

    #[test]
    fn test_commented_and_multiline_imports_not_recognized() {
        let src = "// import com.acme.hidden.Thing\n\
                   /* import com.acme.block.Thing */\n\
                   import com.acme\n\
                   .split.Thing\n";
        assert_eq!(imports_of(src), vec!["com.acme"]);
    }

    #[test]
    fn test_import_inside_raw_string_still_matches() {
        let src = "val text = \"\"\"\nimport com.acme.fake.Thing\n\"\"\"\n";
        assert_eq!(imports_of(src), vec!["com.acme.fake.Thing"]);
    }

    #[test]
    fn test_map_import_to_package_dir() -> std::io::Result<()> {
        let dir = tempdir()?;
        fs::create_dir_all(dir.path().join("core"))?;
        let root = NamespaceRoot::new("com.acme", dir.path());
        let dialect = KotlinDialect::new();

        // package import maps straight to its directory
        assert_eq!(
            dialect.map_import(&ImportReference::new("com.acme.core"), &root),
            Some(dir.path().join("core"))
        );
        // class import falls back to its package
        assert_eq!(
            dialect.map_import(&ImportReference::new("com.acme.core.Engine"), &root),
            Some(dir.path().join("core"))
        );
        assert_eq!(
            dialect.map_import(&ImportReference::new("com.acme.App"), &root),
            Some(dir.path().to_path_buf())
        );
        assert_eq!(
            dialect.map_import(&ImportReference::new("com.acme"), &root),
            Some(dir.path().to_path_buf())
        );
        assert_eq!(dialect.map_import(&ImportReference::new("org.other.Thing"), &root), None);
        Ok(())
    }
}
