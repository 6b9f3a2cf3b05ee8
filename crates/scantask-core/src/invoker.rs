use crate::config::ScanConfig;
use crate::error::TaskError;
use crate::process::{run_streamed, StreamSource};

/// Launch the external scanner with the scan configuration mapped into its
/// environment, relaying its output line-by-line, and return its exit code.
///
/// The scanner owns polling and retries; poll interval and timeout are
/// passed through in the environment, not enforced here. A non-zero exit
/// code is fatal for the run: callers must skip all downstream steps.
pub async fn run_scanner(
    config: &ScanConfig,
    scanner_cmd: &str,
    on_line: impl FnMut(StreamSource, &str),
) -> Result<i32, TaskError> {
    run_streamed(scanner_cmd, &[], &config.scanner_env(), on_line).await
}
