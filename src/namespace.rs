/*!
 * Mapping import identifiers onto directories under a namespace root
 */

use std::path::PathBuf;

use crate::types::{ImportReference, NamespaceRoot};

/// Part of `reference` below `root`, split on `separator`
///
/// `None` means the reference is foreign. An exact match yields an empty
/// list. Prefix membership is per segment, so `example.com/projx` is not
/// inside `example.com/proj`.
pub fn member_segments<'a>(
    reference: &'a str,
    root: &str,
    separator: char,
) -> Option<Vec<&'a str>> {
    if reference == root {
        return Some(Vec::new());
    }
    let rest = reference.strip_prefix(root)?.strip_prefix(separator)?;
    if rest.is_empty() {
        return None;
    }
    Some(rest.split(separator).filter(|s| !s.is_empty()).collect())
}

/// Directory of `reference` under `root`, or `None` for foreign imports
pub fn map_to_directory(
    reference: &ImportReference,
    root: &NamespaceRoot,
    separator: char,
) -> Option<PathBuf> {
    let segments = member_segments(reference.as_str(), &root.name, separator)?;
    let mut dir = root.dir.clone();
    for segment in segments {
        dir.push(segment);
    }
    Some(dir)
}
