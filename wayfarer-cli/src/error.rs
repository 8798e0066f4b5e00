//! Error types emitted by the Wayfarer CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;
use wayfarer_core::{SeedError, SqliteStoreError, StoreError};

/// Errors emitted by the Wayfarer CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without leading dashes.
        field: &'static str,
        /// Environment variable carrying the option.
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
    },
    /// Reading a seed file or inspecting a path failed.
    #[error("failed to read {field} path {path:?}: {source}")]
    ReadSource {
        /// Flag naming the path.
        field: &'static str,
        /// Offending path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Creating the directory for the database failed.
    #[error("failed to prepare database directory for {path:?}: {source}")]
    PrepareDatabase {
        /// Database path.
        path: Utf8PathBuf,
        /// Underlying IO failure.
        #[source]
        source: std::io::Error,
    },
    /// Opening the database failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteStoreError),
    /// A storage operation failed.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Seed datasets could not be parsed.
    #[error(transparent)]
    Seed(#[from] SeedError),
    /// A requested record does not exist.
    #[error("{kind} {id} does not exist")]
    NotFound {
        /// Record kind, such as `map` or `POI`.
        kind: &'static str,
        /// Requested id.
        id: u64,
    },
    /// Serializing command output failed.
    #[error("failed to serialize output: {0}")]
    SerializeOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
