/*!
 * Exclusion rules applied before a file is emitted
 */

use glob_match::glob_match;

/// Path globs and namespace names that keep files out of the bundle
#[derive(Debug, Clone, Default)]
pub struct ExclusionFilter {
    path_patterns: Vec<String>,
    namespaces: Vec<String>,
}

impl ExclusionFilter {
    pub fn new(path_patterns: Vec<String>, namespaces: Vec<String>) -> Self {
        Self {
            path_patterns,
            namespaces,
        }
    }

    /// True if the display path matches any configured glob
    ///
    /// Matching uses `/` separators regardless of platform.
    pub fn is_excluded_by_path(&self, display_path: &str) -> bool {
        if self.path_patterns.is_empty() {
            return false;
        }
        let normalized = display_path.replace('\\', "/");
        self.path_patterns
            .iter()
            .any(|pattern| glob_match(pattern, &normalized))
    }

    /// True if the file's declared namespace is listed exactly
    pub fn is_excluded_by_namespace(&self, namespace: &str) -> bool {
        self.namespaces.iter().any(|name| name == namespace)
    }

    /// Whether declared namespaces need to be extracted at all
    pub fn has_namespace_rules(&self) -> bool {
        !self.namespaces.is_empty()
    }
}
