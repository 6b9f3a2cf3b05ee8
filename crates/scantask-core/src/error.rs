use std::path::PathBuf;
use thiserror::Error;

/// Error taxonomy for the scan task.
///
/// Only orchestration failures live here. A scanner or parser process that
/// runs to completion with a non-zero exit code is not an error; its exit
/// code is data consumed by the outcome resolver.
#[derive(Debug, Error)]
pub enum TaskError {
    #[error("missing required input: {0}")]
    MissingInput(&'static str),

    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    #[error("no IaC template files found under '{0}'")]
    NoTemplates(PathBuf),

    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid template search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
