use crate::error::TaskError;
use std::path::PathBuf;

/// File the scanner writes its structured findings to, relative to the
/// results directory.
pub const RESULTS_FILE: &str = "results.json";

/// Optional SARIF-format companion file written next to the results file.
pub const SARIF_FILE: &str = "results.sarif";

/// Immutable input bundle for one scan run.
///
/// Constructed once from task inputs and never mutated. The scanner child
/// process receives it through [`ScanConfig::scanner_env`].
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub template_dir: PathBuf,
    pub scan_name: String,
    pub poll_interval_secs: u64,
    pub poll_timeout_secs: u64,
    pub ca_bundle: Option<PathBuf>,
    pub fail_on_findings: bool,
}

impl ScanConfig {
    /// Validate required inputs before anything is spawned.
    ///
    /// A failure here means the task stops with zero side effects.
    pub fn validate(&self) -> Result<(), TaskError> {
        if self.base_url.trim().is_empty() {
            return Err(TaskError::MissingInput("base-url"));
        }
        if self.username.trim().is_empty() {
            return Err(TaskError::MissingInput("username"));
        }
        if self.password.is_empty() {
            return Err(TaskError::MissingInput("password"));
        }
        if !self.template_dir.is_dir() {
            return Err(TaskError::PathNotFound(self.template_dir.clone()));
        }
        if let Some(bundle) = &self.ca_bundle {
            if !bundle.is_file() {
                return Err(TaskError::PathNotFound(bundle.clone()));
            }
        }
        Ok(())
    }

    /// The full environment handed to the scanner child process.
    ///
    /// This is the single place where config fields map to environment keys;
    /// `QUALYS_CUSTOM_CA_BUNDLE` is omitted entirely when no bundle is set.
    pub fn scanner_env(&self) -> Vec<(&'static str, String)> {
        let mut env = vec![
            ("QUALYS_BASE_URL", self.base_url.clone()),
            ("QUALYS_USERNAME", self.username.clone()),
            ("QUALYS_PASSWORD", self.password.clone()),
            (
                "IAC_TEMPLATE_DIR",
                self.template_dir.to_string_lossy().into_owned(),
            ),
            ("SCAN_NAME", self.scan_name.clone()),
            ("POLL_INTERVAL", self.poll_interval_secs.to_string()),
            ("POLL_TIMEOUT", self.poll_timeout_secs.to_string()),
        ];
        if let Some(bundle) = &self.ca_bundle {
            env.push((
                "QUALYS_CUSTOM_CA_BUNDLE",
                bundle.to_string_lossy().into_owned(),
            ));
        }
        env
    }
}

/// Derive a scan name when the user did not provide one: prefer the CI build
/// identifier, fall back to a timestamp.
pub fn default_scan_name() -> String {
    match std::env::var("BUILD_BUILDID") {
        Ok(build_id) if !build_id.trim().is_empty() => format!("iac-scan-{}", build_id.trim()),
        _ => format!("iac-scan-{}", chrono::Local::now().format("%Y%m%d%H%M%S")),
    }
}
