/*!
 * Dependency closure: from seed files to a framed bundle stream
 */

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::JoinConfig;
use crate::dialect::{DialectRegistry, GoDialect, ImportClause, KotlinDialect};
use crate::error::{CodecatError, Result, ResultExt};
use crate::filter::ExclusionFilter;
use crate::manifest;
use crate::tracker::ProcessedSet;
use crate::types::{DialectKind, Metadata, NamespaceRoot, SourceFile};
use crate::utils::{absolutize, canonicalize, list_candidate_files, relative_path};
use crate::writer::StreamWriter;

/// Outcome counters for one join run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinSummary {
    /// Display paths in emission order
    pub emitted: Vec<String>,
    /// Content bytes written, framing excluded
    pub content_bytes: u64,
    /// Files skipped by a path glob
    pub excluded_by_path: usize,
    /// Files skipped by their declared package
    pub excluded_by_namespace: usize,
    /// Files or directories skipped after an error
    pub errors: usize,
}

/// Walks the import closure of seed files and writes each file once
pub struct Resolver {
    root: PathBuf,
    filter: ExclusionFilter,
    registry: DialectRegistry,
    processed: ProcessedSet,
    summary: JoinSummary,
    /// Why the Go module could not be read, reported if a Go file needs it
    module_error: Option<String>,
}

impl Resolver {
    /// Build a resolver with explicit namespace roots
    ///
    /// `root` must be absolute; it anchors display paths and the Go module.
    pub fn new(
        root: impl Into<PathBuf>,
        filter: ExclusionFilter,
        go_root: Option<NamespaceRoot>,
        kotlin_root: Option<NamespaceRoot>,
    ) -> Self {
        let mut registry = DialectRegistry::new();
        registry.register(Box::new(GoDialect::new()), go_root);
        registry.register(Box::new(KotlinDialect::new()), kotlin_root);

        Self {
            root: root.into(),
            filter,
            registry,
            processed: ProcessedSet::new(),
            summary: JoinSummary::default(),
            module_error: None,
        }
    }

    /// Build a resolver from configuration, resolving namespace roots
    ///
    /// Missing manifests are not an error here; they only become fatal once
    /// a file of that dialect needs its root.
    pub fn from_config(config: &JoinConfig) -> Result<Self> {
        let root = canonicalize(&config.root)
            .with_context(|| format!("invocation root {}", config.root.display()))?;

        let mut module_error = None;
        let go_module = match &config.module {
            Some(module) => Some(module.clone()),
            None => match manifest::read_go_module(&root) {
                Ok(module) => Some(module),
                Err(e) => {
                    debug!(error = %e, "no Go module");
                    module_error = Some(e.to_string());
                    None
                }
            },
        };

        let base_package = match &config.base_package {
            Some(package) => Some(package.clone()),
            None => manifest::detect_base_package(&root).map(|found| found.name),
        };

        let kotlin_dir = absolutize(&config.kotlin_source_dir(), &root);
        let filter = ExclusionFilter::new(
            config.exclude_patterns.clone(),
            config.exclude_packages.clone(),
        );

        let mut resolver = Self::new(
            root.clone(),
            filter,
            go_module.map(|name| NamespaceRoot::new(name, root.clone())),
            base_package.map(|name| NamespaceRoot::new(name, kotlin_dir)),
        );
        resolver.module_error = module_error;
        Ok(resolver)
    }

    /// Fail if `path` belongs to a dialect whose namespace root is unknown
    pub fn require_namespace_root(&self, path: &Path) -> Result<()> {
        match DialectKind::from_path(path) {
            Some(kind) => self.require_root_for(kind, path),
            None => Ok(()),
        }
    }

    fn require_root_for(&self, kind: DialectKind, path: &Path) -> Result<()> {
        if self.registry.get(kind).is_none() || self.registry.root(kind).is_some() {
            return Ok(());
        }
        let hint = match kind {
            DialectKind::Go => "pass --module or run from a directory with a go.mod",
            DialectKind::Kotlin => {
                "pass --base-package or declare a group in build.gradle.kts, build.gradle or pom.xml"
            }
        };
        let mut message = format!("{} needs a {} namespace root: {}", path.display(), kind, hint);
        if let (DialectKind::Go, Some(reason)) = (kind, &self.module_error) {
            message.push_str(&format!(" ({})", reason));
        }
        Err(CodecatError::MissingNamespaceRoot(message))
    }

    /// Emit `seed` and everything reachable from it that is not yet emitted
    ///
    /// Per-file failures are logged and skipped; only fatal errors return.
    pub fn process<W: Write>(&mut self, seed: &Path, sink: &mut StreamWriter<W>) -> Result<()> {
        let mut stack = vec![seed.to_path_buf()];

        while let Some(path) = stack.pop() {
            match self.visit(&path, sink) {
                Ok(children) => stack.extend(children.into_iter().rev()),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file");
                    self.summary.errors += 1;
                }
            }
        }
        Ok(())
    }

    /// Emit one file and return the candidate files of its internal imports
    fn visit<W: Write>(&mut self, path: &Path, sink: &mut StreamWriter<W>) -> Result<Vec<PathBuf>> {
        let canonical = match canonicalize(path) {
            Ok(canonical) => canonical,
            Err(_) => crate::bail!(PathNotFound, "{}", path.display()),
        };
        let display_path = self.display_path(path, &canonical);

        if self.filter.is_excluded_by_path(&display_path) {
            debug!(path = %display_path, "excluded by path pattern");
            self.summary.excluded_by_path += 1;
            return Ok(Vec::new());
        }
        if self.processed.contains(&canonical) {
            return Ok(Vec::new());
        }

        let file = load_source_file(path, canonical, display_path)?;

        // The dialect follows the spelling the file was reached by
        let dialect = match file.dialect {
            Some(kind) => {
                self.require_root_for(kind, path)?;
                self.registry.get(kind)
            }
            None => None,
        };
        let clause = dialect.map(|dialect| dialect.inspect(path, &file.content));

        if self.filter.has_namespace_rules() {
            if let Some(Ok(ImportClause {
                package: Some(namespace),
                ..
            })) = &clause
            {
                if self.filter.is_excluded_by_namespace(namespace) {
                    debug!(path = %file.display_path, %namespace, "excluded by package");
                    self.summary.excluded_by_namespace += 1;
                    return Ok(Vec::new());
                }
            }
        }

        if !self.processed.should_process(&file.abs_path) {
            return Ok(Vec::new());
        }
        sink.write_file(&file).map_err(CodecatError::Output)?;
        self.summary.emitted.push(file.display_path.clone());
        self.summary.content_bytes += file.content.len() as u64;
        debug!(path = %file.display_path, size = file.metadata.size, "emitted");

        let (Some(dialect), Some(clause)) = (dialect, clause) else {
            return Ok(Vec::new());
        };
        let imports = clause?.imports;
        let Some(root) = self.registry.root(dialect.kind()) else {
            return Ok(Vec::new());
        };

        let mut children = Vec::new();
        for import in &imports {
            let Some(dir) = dialect.map_import(import, root) else {
                continue;
            };
            match list_candidate_files(&dir, dialect.extensions()) {
                Ok(files) => children.extend(files),
                Err(e) => {
                    warn!(import = %import, dir = %dir.display(), error = %e, "cannot list import directory");
                    self.summary.errors += 1;
                }
            }
        }
        Ok(children)
    }

    /// Path relative to the invocation root, as written into the stream
    ///
    /// The spelling the file was reached by is preferred; the canonical path
    /// is used when only it lies under the root.
    fn display_path(&self, path: &Path, canonical: &Path) -> String {
        let absolute = absolutize(path, &self.root);
        let shown = if !absolute.starts_with(&self.root) && canonical.starts_with(&self.root) {
            relative_path(canonical, &self.root)
        } else {
            relative_path(&absolute, &self.root)
        };
        shown.to_string_lossy().to_string()
    }

    /// Canonical paths emitted so far
    #[cfg(test)]
    pub(crate) fn processed(&self) -> &ProcessedSet {
        &self.processed
    }

    pub fn summary(&self) -> &JoinSummary {
        &self.summary
    }

    pub fn into_summary(self) -> JoinSummary {
        self.summary
    }
}

fn load_source_file(path: &Path, abs_path: PathBuf, display_path: String) -> Result<SourceFile> {
    let fs_metadata = fs::metadata(&abs_path)?;
    if fs_metadata.is_dir() {
        crate::bail!(InvalidArgument, "{} is a directory", path.display());
    }
    let content = fs::read(&abs_path)?;

    Ok(SourceFile {
        dialect: DialectKind::from_path(path),
        metadata: Metadata {
            size: content.len() as u64,
            modified: fs_metadata.modified()?,
        },
        abs_path,
        display_path,
        content,
    })
}

/// Expand seed patterns into paths, anchored at `root`
///
/// Invalid patterns and patterns without matches are logged and skipped.
pub fn expand_patterns(patterns: &[String], root: &Path) -> Vec<PathBuf> {
    let mut seeds = Vec::new();
    for pattern in patterns {
        let anchored = if Path::new(pattern).is_absolute() {
            pattern.clone()
        } else {
            format!(
                "{}/{}",
                glob::Pattern::escape(&root.to_string_lossy()),
                pattern
            )
        };

        let paths = match glob::glob(&anchored) {
            Ok(paths) => paths,
            Err(e) => {
                warn!(%pattern, error = %e, "invalid glob pattern");
                continue;
            }
        };

        let before = seeds.len();
        for entry in paths {
            match entry {
                Ok(path) => seeds.push(path),
                Err(e) => warn!(%pattern, error = %e, "cannot read glob match"),
            }
        }
        if seeds.len() == before {
            warn!(%pattern, "no matches found for pattern");
        }
    }
    seeds
}

/// Join the closure of the configured patterns into `out`
///
/// Nothing is written when no file qualifies.
pub fn join<W: Write>(config: &JoinConfig, out: W) -> Result<JoinSummary> {
    let mut resolver = Resolver::from_config(config)?;
    let seeds = expand_patterns(&config.patterns, &resolver.root);

    for seed in &seeds {
        resolver.require_namespace_root(seed)?;
    }

    let mut sink = StreamWriter::new(out);
    for seed in &seeds {
        resolver.process(seed, &mut sink)?;
    }
    sink.finish().map_err(CodecatError::Output)?;

    let summary = resolver.into_summary();
    info!(
        files = summary.emitted.len(),
        bytes = summary.content_bytes,
        errors = summary.errors,
        "join complete"
    );
    Ok(summary)
}
