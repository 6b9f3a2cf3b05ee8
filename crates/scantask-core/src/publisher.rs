use crate::error::TaskError;
use crate::retriever::ScanArtifact;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Record of a successfully staged and registered artifact.
#[derive(Debug, Clone)]
pub struct PublishedArtifact {
    pub artifact_name: String,
    pub staging_dir: PathBuf,
    pub files: Vec<PathBuf>,
}

/// Copy the result files into the staging directory and register it with
/// the enclosing CI system as a named artifact.
///
/// Registration happens through an `artifact.upload` logging command written
/// to `log`, which the hosting agent interprets. Registering the same
/// artifact name twice duplicates it on the agent side, so this must be
/// called at most once per run.
pub fn publish(
    artifact: &ScanArtifact,
    staging_dir: &Path,
    artifact_name: &str,
    log: &mut impl Write,
) -> Result<PublishedArtifact, TaskError> {
    std::fs::create_dir_all(staging_dir)?;

    let mut staged = Vec::new();
    for source in std::iter::once(&artifact.results_file).chain(artifact.sarif_file.iter()) {
        let file_name = source
            .file_name()
            .ok_or_else(|| TaskError::PathNotFound(source.clone()))?;
        let target = staging_dir.join(file_name);
        std::fs::copy(source, &target)?;
        staged.push(target);
    }

    writeln!(
        log,
        "##vso[artifact.upload containerfolder={name};artifactname={name}]{path}",
        name = artifact_name,
        path = staging_dir.display(),
    )?;

    Ok(PublishedArtifact {
        artifact_name: artifact_name.to_string(),
        staging_dir: staging_dir.to_path_buf(),
        files: staged,
    })
}
