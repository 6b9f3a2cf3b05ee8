mod display;

use anyhow::{Context, Result};
use clap::Parser;
use scantask_core::config::{default_scan_name, ScanConfig};
use scantask_core::pipeline::{self, TaskSettings};
use scantask_core::process::StreamSource;
use scantask_core::redact::redact_line;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scantask",
    version,
    about = "scantask — IaC security scan pipeline task",
    long_about = "Validates inputs, runs the external IaC scanner, parses its results, \
publishes them as a build artifact, and resolves the pipeline outcome."
)]
struct Cli {
    /// Base URL of the scanning service
    #[arg(long)]
    base_url: String,

    /// Service account username
    #[arg(long)]
    username: String,

    /// Service account password; prefer the QUALYS_PASSWORD environment
    /// variable so the secret never appears in a process listing
    #[arg(long, env = "QUALYS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Directory containing the IaC templates to scan
    #[arg(long)]
    template_dir: PathBuf,

    /// Scan name; derived from the build id or a timestamp if omitted
    #[arg(long)]
    scan_name: Option<String>,

    /// Seconds between scan-status polls (passed through to the scanner)
    #[arg(long, default_value = "30")]
    poll_interval: u64,

    /// Seconds before the scanner gives up polling (passed through)
    #[arg(long, default_value = "1800")]
    poll_timeout: u64,

    /// Custom CA bundle for TLS-inspected environments
    #[arg(long)]
    ca_bundle: Option<PathBuf>,

    /// Fail the pipeline when findings are detected
    #[arg(long, default_value = "true", action = clap::ArgAction::Set)]
    fail_on_findings: bool,

    /// External scanner program
    #[arg(long, default_value = "qualys-iac-scan")]
    scanner_cmd: String,

    /// External result parser program
    #[arg(long, default_value = "iac-result-parser")]
    parser_cmd: String,

    /// Directory the scanner writes results.json into
    #[arg(long, default_value = ".")]
    results_dir: PathBuf,

    /// Artifact staging directory; defaults to the agent staging directory
    #[arg(long)]
    staging_dir: Option<PathBuf>,

    /// Name the results bundle is registered under
    #[arg(long, default_value = "iac-scan-results")]
    artifact_name: String,

    /// Output format for the run summary (text, json)
    #[arg(short, long, default_value = "text")]
    format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ScanConfig {
        base_url: cli.base_url,
        username: cli.username,
        password: cli.password,
        template_dir: cli.template_dir,
        scan_name: cli.scan_name.unwrap_or_else(default_scan_name),
        poll_interval_secs: cli.poll_interval,
        poll_timeout_secs: cli.poll_timeout,
        ca_bundle: cli.ca_bundle,
        fail_on_findings: cli.fail_on_findings,
    };

    let settings = TaskSettings {
        scanner_cmd: cli.scanner_cmd,
        parser_cmd: cli.parser_cmd,
        results_dir: cli.results_dir,
        staging_dir: cli.staging_dir.unwrap_or_else(default_staging_dir),
        artifact_name: cli.artifact_name,
    };

    let password = config.password.clone();
    let mut stdout = std::io::stdout();
    let run = pipeline::run(
        &config,
        &settings,
        |source, line| {
            let line = redact_line(line, &password);
            match source {
                StreamSource::Stdout => println!("{line}"),
                StreamSource::Stderr => eprintln!("{line}"),
            }
        },
        &mut stdout,
    )
    .await
    .context("IaC scan task failed")?;

    match cli.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&display::summary(&run))?),
        _ => display::print_run_summary(&run),
    }

    // Tell the hosting agent how to record this run.
    println!(
        "##vso[task.complete result={};]{}",
        run.resolved.outcome.result_keyword(),
        run.resolved.message
    );

    if run.resolved.outcome.is_failure() {
        std::process::exit(1);
    }
    Ok(())
}

fn default_staging_dir() -> PathBuf {
    match std::env::var("BUILD_ARTIFACTSTAGINGDIRECTORY") {
        Ok(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => PathBuf::from("artifact-staging"),
    }
}
