/*!
 * Go: imports come from the parsed import clause
 *
 * Only the leading package clause and import declarations are inspected.
 * Syntax errors further down the file do not matter; an error inside the
 * clause fails the file.
 */

use std::path::{Path, PathBuf};

use tracing::debug;
use tree_sitter::{Node, Parser, Tree};

use crate::dialect::{Dialect, ImportClause};
use crate::error::{CodecatError, Result};
use crate::namespace;
use crate::types::{DialectKind, ImportReference, NamespaceRoot};

#[derive(Debug, Default, Clone, Copy)]
pub struct GoDialect;

impl GoDialect {
    pub fn new() -> Self {
        Self
    }
}

impl Dialect for GoDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Go
    }

    fn extract_imports(&self, path: &Path, content: &[u8]) -> Result<Vec<ImportReference>> {
        Ok(parse_import_clause(path, content)?.imports)
    }

    fn inspect(&self, path: &Path, content: &[u8]) -> Result<ImportClause> {
        parse_import_clause(path, content)
    }

    fn map_import(&self, reference: &ImportReference, root: &NamespaceRoot) -> Option<PathBuf> {
        namespace::map_to_directory(reference, root, '/')
    }
}

fn parse(path: &Path, content: &[u8]) -> Result<Tree> {
    let mut parser = Parser::new();
    parser.set_language(&tree_sitter_go::LANGUAGE.into())?;
    parser
        .parse(content, None)
        .ok_or_else(|| CodecatError::import_parse(path, "parser produced no tree"))
}

fn line_of(node: &Node) -> usize {
    node.start_position().row + 1
}

/// Parse the package clause and import declarations of a Go file
pub fn parse_import_clause(path: &Path, content: &[u8]) -> Result<ImportClause> {
    let tree = parse(path, content)?;
    let root = tree.root_node();
    let mut clause = ImportClause::default();

    let mut cursor = root.walk();
    for node in root.named_children(&mut cursor) {
        match node.kind() {
            "comment" => continue,
            "package_clause" => {
                if node.has_error() {
                    return Err(CodecatError::import_parse(
                        path,
                        format!("malformed package clause at line {}", line_of(&node)),
                    ));
                }
                clause.package = node
                    .named_child(0)
                    .and_then(|name| name.utf8_text(content).ok())
                    .map(str::to_string);
            }
            "import_declaration" => {
                if clause.package.is_none() {
                    return Err(CodecatError::import_parse(
                        path,
                        format!("import before package clause at line {}", line_of(&node)),
                    ));
                }
                if node.has_error() {
                    return Err(CodecatError::import_parse(
                        path,
                        format!("malformed import declaration at line {}", line_of(&node)),
                    ));
                }
                collect_specs(&node, content, &mut clause.imports);
            }
            _ if node.is_error() => {
                let text = node.utf8_text(content).unwrap_or_default().trim_start();
                if text.starts_with("import") || text.starts_with("package") {
                    return Err(CodecatError::import_parse(
                        path,
                        format!("syntax error in import clause at line {}", line_of(&node)),
                    ));
                }
                break;
            }
            _ => break,
        }
    }

    if clause.package.is_none() {
        return Err(CodecatError::import_parse(path, "missing package clause"));
    }
    Ok(clause)
}

fn collect_specs(node: &Node, content: &[u8], out: &mut Vec<ImportReference>) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "import_spec" => {
                let literal = child
                    .child_by_field_name("path")
                    .and_then(|lit| lit.utf8_text(content).ok());
                match literal.and_then(unquote) {
                    Some(import) => out.push(ImportReference::new(import)),
                    None => debug!(line = line_of(&child), "skipping unquotable import path"),
                }
            }
            "import_spec_list" => collect_specs(&child, content, out),
            _ => {}
        }
    }
}

/// Strip quotes from an import path literal
///
/// Escapes are not valid in import paths, so literals containing them are
/// rejected rather than decoded.
fn unquote(literal: &str) -> Option<String> {
    if let Some(inner) = literal.strip_prefix('`').and_then(|s| s.strip_suffix('`')) {
        return Some(inner.to_string());
    }
    let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
    if inner.contains('\\') {
        return None;
    }
    Some(inner.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn imports_of(src: &str) -> Vec<String> {
        parse_import_clause(Path::new("test.go"), src.as_bytes())
            .unwrap()
            .imports
            .into_iter()
            .map(|i| i.0)
            .collect()
    }

    #[test]
    fn test_single_and_grouped_imports() {
        let src = r#"// Package main is the entry point.
package main

import "fmt"

import (
	"os"
	u "example.com/proj/util"
	_ "example.com/proj/driver"
	. "example.com/proj/dsl"
)

func main() {}
"#;
        assert_eq!(
            imports_of(src),
            vec![
                "fmt",
                "os",
                "example.com/proj/util",
                "example.com/proj/driver",
                "example.com/proj/dsl",
            ]
        );
    }

    #[test]
    fn test_raw_string_import() {
        let src = "package main\n\nimport `example.com/proj/raw`\n";
        assert_eq!(imports_of(src), vec!["example.com/proj/raw"]);
    }

    #[test]
    fn test_duplicates_kept() {
        let src = "package main\n\nimport \"fmt\"\nimport f \"fmt\"\n";
        assert_eq!(imports_of(src), vec!["fmt", "fmt"]);
    }

    #[test]
    fn test_package_name() {
        let src = "//go:build linux\n\npackage util\n\nfunc Helper() {}\n";
        let clause = parse_import_clause(Path::new("util/a.go"), src.as_bytes()).unwrap();
        assert_eq!(clause.package.as_deref(), Some("util"));
        assert!(clause.imports.is_empty());
    }

    #[test]
    fn test_errors_after_clause_ignored() {
        let src = "package main\n\nimport \"example.com/proj/util\"\n\nvar = = 5\n\nfunc main( {\n";
        assert_eq!(imports_of(src), vec!["example.com/proj/util"]);
    }

    #[test]
    fn test_malformed_import_clause_fails() {
        let src = "package main\n\nimport (\n\t\"fmt\"\n\t123\n)\n\nfunc main() {}\n";
        let err = parse_import_clause(Path::new("bad.go"), src.as_bytes()).unwrap_err();
        assert!(matches!(err, CodecatError::ImportParse { .. }));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_missing_package_clause_fails() {
        let src = "import \"fmt\"\n";
        assert!(parse_import_clause(Path::new("bad.go"), src.as_bytes()).is_err());
    }

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"fmt\"").as_deref(), Some("fmt"));
        assert_eq!(unquote("`a/b`").as_deref(), Some("a/b"));
        assert_eq!(unquote("\"a\\tb\""), None);
        assert_eq!(unquote("\""), None);
    }

    #[test]
    fn test_map_import() {
        let root = NamespaceRoot::new("example.com/proj", "/work");
        let dialect = GoDialect::new();
        assert_eq!(
            dialect.map_import(&ImportReference::new("example.com/proj/util"), &root),
            Some(PathBuf::from("/work/util"))
        );
        assert_eq!(dialect.map_import(&ImportReference::new("fmt"), &root), None);
    }
}
