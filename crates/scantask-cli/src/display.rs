use colored::*;
use scantask_core::outcome::Outcome;
use scantask_core::pipeline::TaskRun;
use serde::Serialize;

/// Machine-readable run summary for `--format json`.
#[derive(Serialize)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub message: String,
    pub scanner_exit: i32,
    pub parser_exit: Option<i32>,
    pub artifact_name: Option<String>,
    pub staged_files: Vec<String>,
}

pub fn summary(run: &TaskRun) -> RunSummary {
    RunSummary {
        outcome: run.resolved.outcome,
        message: run.resolved.message.clone(),
        scanner_exit: run.scanner_exit,
        parser_exit: run.parser_exit,
        artifact_name: run.artifact.as_ref().map(|a| a.artifact_name.clone()),
        staged_files: run
            .artifact
            .as_ref()
            .map(|a| {
                a.files
                    .iter()
                    .map(|f| f.display().to_string())
                    .collect()
            })
            .unwrap_or_default(),
    }
}

/// Print the run summary to the terminal.
pub fn print_run_summary(run: &TaskRun) {
    println!();
    println!(
        "{}",
        format!(" scantask v{} — scan run summary", env!("CARGO_PKG_VERSION")).bold()
    );
    println!();

    let status = match run.resolved.outcome {
        Outcome::Succeeded => "SUCCEEDED".green().bold(),
        Outcome::SucceededWithIssues => "SUCCEEDED WITH ISSUES".yellow().bold(),
        Outcome::Failed => "FAILED".red().bold(),
    };
    println!(" {} {}", "|-".dimmed(), status);
    println!(" {} {}", "|-".dimmed(), run.resolved.message);
    println!(" {} Scanner exit code: {}", "|-".dimmed(), run.scanner_exit);

    match run.parser_exit {
        Some(code) => println!(" {} Parser exit code: {}", "|-".dimmed(), code),
        None => println!(" {} Parser: not run (no results file)", "|-".dimmed()),
    }

    match &run.artifact {
        Some(artifact) => {
            println!(
                " {} Artifact '{}' staged at {}",
                "|-".dimmed(),
                artifact.artifact_name.cyan(),
                artifact.staging_dir.display()
            );
            for file in &artifact.files {
                println!("    {} {}", "|-".dimmed(), file.display());
            }
        }
        None => println!(" {} No artifact published", "|-".dimmed()),
    }
    println!();
}
