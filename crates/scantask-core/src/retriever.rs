use crate::config::{RESULTS_FILE, SARIF_FILE};
use crate::error::TaskError;
use crate::process::{run_buffered, ProcessResult};
use std::path::{Path, PathBuf};

/// The result file pair a completed scan left behind.
///
/// Created by the external scanner, read-only from here on.
#[derive(Debug, Clone)]
pub struct ScanArtifact {
    pub results_file: PathBuf,
    pub sarif_file: Option<PathBuf>,
}

/// What the retriever found after a successful scan.
#[derive(Debug)]
pub enum Retrieval {
    /// No results file at the well-known path: the scan completed without
    /// findings to report. Not an error, and no parser was spawned.
    NoResults,
    /// A results file exists and the parser has been run against it.
    Parsed {
        artifact: ScanArtifact,
        parser: ProcessResult,
    },
}

/// Check the well-known results location and, when a results file exists,
/// run the external parser against it with fully buffered output.
///
/// The parser's exit code is overloaded by contract: 0 means it ran and
/// found no actionable findings, non-zero means findings were detected.
/// An execution failure of the parser itself is indistinguishable from
/// findings through this channel; that ambiguity belongs to the external
/// collaborator and is preserved here.
pub async fn retrieve(results_dir: &Path, parser_cmd: &str) -> Result<Retrieval, TaskError> {
    let results_file = results_dir.join(RESULTS_FILE);
    if !results_file.is_file() {
        return Ok(Retrieval::NoResults);
    }

    let sarif_file = Some(results_dir.join(SARIF_FILE)).filter(|path| path.is_file());

    let parser = run_buffered(
        parser_cmd,
        &[results_file.to_string_lossy().into_owned()],
    )
    .await?;

    Ok(Retrieval::Parsed {
        artifact: ScanArtifact {
            results_file,
            sarif_file,
        },
        parser,
    })
}
