/*!
 * Configuration handling for codecat
 */

use std::env;
use std::path::PathBuf;

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use clap_complete::Shell;

use crate::ensure;
use crate::error::Result;

/// Command-line arguments for codecat
#[derive(Parser, Debug, Clone)]
#[clap(
    name = "codecat",
    version = env!("CARGO_PKG_VERSION"),
    about = "Bundle source files and their in-project imports into one text stream",
    long_about = "Joins source files, plus every file reachable through imports inside the same Go module or Kotlin base package, into one delimited text stream on stdout. Split turns such a stream back into a file tree."
)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Option<Command>,

    /// Generate shell completions
    #[clap(long = "generate", value_enum)]
    pub generate: Option<Shell>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[clap(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Join files and their internal imports into a single stream on stdout
    Join(JoinArgs),
    /// Recreate files from a joined stream
    Split(SplitArgs),
}

#[derive(ClapArgs, Debug, Clone)]
pub struct JoinArgs {
    /// Files or glob patterns to start from
    #[clap(required = true)]
    pub patterns: Vec<String>,

    /// Comma-separated globs of relative paths to leave out
    #[clap(long = "exclude", value_delimiter = ',')]
    pub exclude: Vec<String>,

    /// Comma-separated Go package names to leave out
    #[clap(long = "exclude-package", value_delimiter = ',')]
    pub exclude_packages: Vec<String>,

    /// Go module path (default: read from go.mod)
    #[clap(long)]
    pub module: Option<String>,

    /// Kotlin base package (default: detected from build manifests)
    #[clap(long)]
    pub base_package: Option<String>,

    /// Directory that corresponds to the Kotlin base package
    #[clap(long)]
    pub source_root: Option<PathBuf>,

    /// Print a summary table to stderr
    #[clap(long)]
    pub stats: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct SplitArgs {
    /// Input stream to split (default: stdin)
    #[clap(long = "in")]
    pub input: Option<PathBuf>,

    /// Output directory (default: current directory)
    #[clap(long = "out")]
    pub output: Option<PathBuf>,

    /// Print a summary table to stderr
    #[clap(long)]
    pub stats: bool,
}

/// Settings for one join run
#[derive(Clone, Debug)]
pub struct JoinConfig {
    /// Invocation root: patterns are anchored and display paths relative here
    pub root: PathBuf,

    /// Seed files or globs
    pub patterns: Vec<String>,

    /// Path exclusion globs
    pub exclude_patterns: Vec<String>,

    /// Go package names to exclude
    pub exclude_packages: Vec<String>,

    /// Explicit Go module path
    pub module: Option<String>,

    /// Explicit Kotlin base package
    pub base_package: Option<String>,

    /// Kotlin source root, relative to `root` unless absolute
    pub source_root: Option<PathBuf>,

    /// Print a summary table
    pub stats: bool,
}

impl JoinConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: JoinArgs) -> Result<Self> {
        Ok(Self {
            root: env::current_dir()?,
            patterns: args.patterns,
            exclude_patterns: args.exclude,
            exclude_packages: args.exclude_packages,
            module: args.module,
            base_package: args.base_package,
            source_root: args.source_root,
            stats: args.stats,
        })
    }

    /// Configuration rooted at `root` with no exclusions or overrides
    pub fn new(root: impl Into<PathBuf>, patterns: Vec<String>) -> Self {
        Self {
            root: root.into(),
            patterns,
            exclude_patterns: Vec::new(),
            exclude_packages: Vec::new(),
            module: None,
            base_package: None,
            source_root: None,
            stats: false,
        }
    }

    /// Directory corresponding to the Kotlin base package
    pub fn kotlin_source_dir(&self) -> PathBuf {
        match &self.source_root {
            Some(dir) => self.root.join(dir),
            None => self.root.clone(),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        ensure!(!self.patterns.is_empty(), Config, "join needs at least one file or pattern");
        ensure!(
            self.root.is_dir(),
            Config,
            "invocation root is not a directory: {}",
            self.root.display()
        );
        if let Some(module) = &self.module {
            ensure!(!module.trim().is_empty(), Config, "--module must not be empty");
        }
        if let Some(package) = &self.base_package {
            ensure!(!package.trim().is_empty(), Config, "--base-package must not be empty");
        }
        if self.source_root.is_some() {
            let dir = self.kotlin_source_dir();
            ensure!(dir.is_dir(), Config, "source root not found: {}", dir.display());
        }
        Ok(())
    }
}

/// Settings for one split run
#[derive(Clone, Debug)]
pub struct SplitConfig {
    /// Stream to read, stdin when absent
    pub input: Option<PathBuf>,

    /// Directory every file is written beneath
    pub output_root: PathBuf,

    /// Print a summary table
    pub stats: bool,
}

impl SplitConfig {
    /// Create configuration from command-line arguments
    pub fn from_args(args: SplitArgs) -> Result<Self> {
        let output_root = match args.output {
            Some(dir) => dir,
            None => env::current_dir()?,
        };
        Ok(Self {
            input: args.input,
            output_root,
            stats: args.stats,
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            ensure!(input.is_file(), Config, "input file not found: {}", input.display());
        }
        ensure!(
            !self.output_root.is_file(),
            Config,
            "output path is a file: {}",
            self.output_root.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_join() {
        let args = Args::try_parse_from([
            "codecat",
            "join",
            "main.go",
            "cmd/*.go",
            "--exclude",
            "*_test.go,vendor/**",
            "--exclude-package",
            "mocks",
            "--module",
            "example.com/proj",
        ])
        .unwrap();

        match args.command {
            Some(Command::Join(join)) => {
                assert_eq!(join.patterns, vec!["main.go", "cmd/*.go"]);
                assert_eq!(join.exclude, vec!["*_test.go", "vendor/**"]);
                assert_eq!(join.exclude_packages, vec!["mocks"]);
                assert_eq!(join.module.as_deref(), Some("example.com/proj"));
                assert!(join.base_package.is_none());
            }
            other => panic!("expected join, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_split() {
        let args =
            Args::try_parse_from(["codecat", "-v", "split", "--in", "bundle.txt", "--out", "out"])
                .unwrap();
        assert_eq!(args.verbose, 1);
        match args.command {
            Some(Command::Split(split)) => {
                assert_eq!(split.input, Some(PathBuf::from("bundle.txt")));
                assert_eq!(split.output, Some(PathBuf::from("out")));
            }
            other => panic!("expected split, got {other:?}"),
        }
    }

    #[test]
    fn test_join_requires_pattern() {
        assert!(Args::try_parse_from(["codecat", "join"]).is_err());
    }

    #[test]
    fn test_join_validate() {
        let dir = tempdir().unwrap();
        let mut config = JoinConfig::new(dir.path(), vec!["*.go".to_string()]);
        assert!(config.validate().is_ok());

        config.source_root = Some(PathBuf::from("src/main/kotlin"));
        assert!(config.validate().is_err());
        fs::create_dir_all(dir.path().join("src/main/kotlin")).unwrap();
        assert!(config.validate().is_ok());

        config.module = Some("  ".to_string());
        assert!(config.validate().is_err());

        let empty = JoinConfig::new(dir.path(), vec![]);
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_split_validate() {
        let dir = tempdir().unwrap();
        let config = SplitConfig {
            input: Some(dir.path().join("missing.txt")),
            output_root: dir.path().to_path_buf(),
            stats: false,
        };
        assert!(config.validate().is_err());
    }
}
