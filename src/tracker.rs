/*!
 * At-most-once bookkeeping for the join direction
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Canonical paths already emitted in the current join run
///
/// Callers pass canonical (symlink-resolved) paths, so two spellings of the
/// same file collapse to one entry.
#[derive(Debug, Default)]
pub struct ProcessedSet {
    seen: HashSet<PathBuf>,
}

impl ProcessedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Query-and-mark: true the first time a path is seen, false afterwards
    pub fn should_process(&mut self, canonical: &Path) -> bool {
        self.seen.insert(canonical.to_path_buf())
    }

    /// Query without marking
    pub fn contains(&self, canonical: &Path) -> bool {
        self.seen.contains(canonical)
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
