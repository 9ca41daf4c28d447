/*!
 * codecat - bundle source files with their in-project imports
 *
 * `join` follows Go and Kotlin imports that stay inside the project and
 * writes every reached file, once, into a single delimited text stream.
 * `split` turns such a stream back into a file tree, confined to an output
 * directory.
 */

pub mod config;
pub mod dialect;
pub mod error;
pub mod filter;
pub mod frame;
pub mod logging;
pub mod manifest;
pub mod namespace;
pub mod report;
pub mod resolver;
pub mod splitter;
pub mod tracker;
pub mod types;
pub mod utils;
pub mod writer;


// Re-export main components for easier access
pub use config::{JoinConfig, SplitConfig};
pub use error::{CodecatError, Result};
pub use filter::ExclusionFilter;
pub use report::{ReportFormat, Reporter};
pub use resolver::{join, JoinSummary, Resolver};
pub use splitter::{SplitSummary, Splitter};
pub use tracker::ProcessedSet;
pub use types::{DialectKind, ImportReference, Metadata, NamespaceRoot, SourceFile};
pub use writer::StreamWriter;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
