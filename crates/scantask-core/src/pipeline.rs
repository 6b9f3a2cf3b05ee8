use crate::config::ScanConfig;
use crate::error::TaskError;
use crate::outcome::{self, ResolvedOutcome};
use crate::process::StreamSource;
use crate::publisher::{self, PublishedArtifact};
use crate::retriever::{self, Retrieval};
use crate::{invoker, templates};
use std::io::Write;
use std::path::PathBuf;

/// Operational knobs that are not scan inputs: which external programs to
/// run and where files live.
#[derive(Debug, Clone)]
pub struct TaskSettings {
    pub scanner_cmd: String,
    pub parser_cmd: String,
    /// Well-known location the scanner writes `results.json` to.
    pub results_dir: PathBuf,
    pub staging_dir: PathBuf,
    pub artifact_name: String,
}

/// Everything observed during one run, for reporting.
#[derive(Debug)]
pub struct TaskRun {
    pub resolved: ResolvedOutcome,
    pub scanner_exit: i32,
    pub parser_exit: Option<i32>,
    pub artifact: Option<PublishedArtifact>,
}

/// Run the whole task: validate, invoke the scanner, retrieve and parse
/// results, publish the artifact, resolve the outcome.
///
/// Strictly sequential; each step starts only after the previous one's
/// terminal condition is observed. Relayed subprocess lines go through
/// `on_line`, agent logging commands through `log`. Validation failures
/// return `Err` before any subprocess is spawned.
pub async fn run(
    config: &ScanConfig,
    settings: &TaskSettings,
    mut on_line: impl FnMut(StreamSource, &str),
    log: &mut impl Write,
) -> Result<TaskRun, TaskError> {
    config.validate()?;

    let templates = templates::find_templates(&config.template_dir)?;
    if templates.is_empty() {
        return Err(TaskError::NoTemplates(config.template_dir.clone()));
    }

    let scanner_exit = invoker::run_scanner(config, &settings.scanner_cmd, &mut on_line).await?;
    if scanner_exit != 0 {
        return Ok(TaskRun {
            resolved: outcome::resolve(scanner_exit, None, config.fail_on_findings),
            scanner_exit,
            parser_exit: None,
            artifact: None,
        });
    }

    let retrieval = retriever::retrieve(&settings.results_dir, &settings.parser_cmd).await?;
    let (parser_exit, artifact) = match retrieval {
        Retrieval::NoResults => (None, None),
        Retrieval::Parsed { artifact, parser } => {
            // Publish before the outcome is reported so the result bundle
            // survives a failing run.
            let published = publisher::publish(
                &artifact,
                &settings.staging_dir,
                &settings.artifact_name,
                log,
            )?;

            for line in parser.stdout.lines() {
                on_line(StreamSource::Stdout, line);
            }
            for line in parser.stderr.lines() {
                on_line(StreamSource::Stderr, line);
            }

            (Some(parser.exit_code), Some(published))
        }
    };

    Ok(TaskRun {
        resolved: outcome::resolve(scanner_exit, parser_exit, config.fail_on_findings),
        scanner_exit,
        parser_exit,
        artifact,
    })
}
