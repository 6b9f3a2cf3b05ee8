use crate::error::TaskError;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

/// Which stream of a child process a relayed line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamSource {
    Stdout,
    Stderr,
}

/// Terminal result of a buffered child process invocation.
#[derive(Debug, Clone)]
pub struct ProcessResult {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run a child process, relaying its stdout and stderr line-by-line as they
/// arrive, and return its exit code.
///
/// Both pipes are drained concurrently with a select loop so a child that
/// fills one pipe before exiting cannot deadlock against us. The child is
/// only waited on after both streams reach EOF.
pub async fn run_streamed(
    program: &str,
    args: &[String],
    envs: &[(&'static str, String)],
    mut on_line: impl FnMut(StreamSource, &str),
) -> Result<i32, TaskError> {
    let mut command = Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    for (key, value) in envs {
        command.env(key, value);
    }

    let mut child = command.spawn().map_err(|source| TaskError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let stdout = child.stdout.take().expect("stdout was piped");
    let stderr = child.stderr.take().expect("stderr was piped");
    let mut stdout_lines = BufReader::new(stdout).lines();
    let mut stderr_lines = BufReader::new(stderr).lines();

    let mut stdout_open = true;
    let mut stderr_open = true;
    while stdout_open || stderr_open {
        let next = tokio::select! {
            line = stdout_lines.next_line(), if stdout_open => (StreamSource::Stdout, line),
            line = stderr_lines.next_line(), if stderr_open => (StreamSource::Stderr, line),
        };
        match next {
            (source, Ok(Some(line))) => on_line(source, &line),
            (StreamSource::Stdout, Ok(None)) => stdout_open = false,
            (StreamSource::Stderr, Ok(None)) => stderr_open = false,
            (_, Err(error)) => {
                // A dead pipe must not leave the child behind as an orphan:
                // kill it and reap before surfacing the read failure.
                let _ = child.start_kill();
                let _ = child.wait().await;
                return Err(error.into());
            }
        }
    }

    let status = child.wait().await?;
    Ok(status.code().unwrap_or(-1))
}

/// Run a child process to completion, capturing stdout and stderr whole.
pub async fn run_buffered(
    program: &str,
    args: &[String],
) -> Result<ProcessResult, TaskError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(|source| TaskError::Spawn {
            program: program.to_string(),
            source,
        })?;

    Ok(ProcessResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> (String, Vec<String>) {
        ("sh".to_string(), vec!["-c".to_string(), script.to_string()])
    }

    #[tokio::test]
    async fn test_run_streamed_relays_both_streams() {
        let (program, args) = sh("echo out-line; echo err-line >&2; exit 0");
        let mut lines = Vec::new();
        let code = run_streamed(&program, &args, &[], |source, line| {
            lines.push((source, line.to_string()));
        })
        .await
        .unwrap();

        assert_eq!(code, 0);
        assert!(lines.contains(&(StreamSource::Stdout, "out-line".to_string())));
        assert!(lines.contains(&(StreamSource::Stderr, "err-line".to_string())));
    }

    #[tokio::test]
    async fn test_run_streamed_returns_nonzero_exit() {
        let (program, args) = sh("exit 7");
        let code = run_streamed(&program, &args, &[], |_, _| {}).await.unwrap();
        assert_eq!(code, 7);
    }

    #[tokio::test]
    async fn test_run_streamed_passes_environment() {
        let (program, args) = sh("echo $SCANTASK_TEST_VALUE");
        let mut lines = Vec::new();
        run_streamed(
            &program,
            &args,
            &[("SCANTASK_TEST_VALUE", "marker-123".to_string())],
            |_, line| lines.push(line.to_string()),
        )
        .await
        .unwrap();
        assert_eq!(lines, vec!["marker-123".to_string()]);
    }

    #[tokio::test]
    async fn test_run_streamed_does_not_deadlock_on_large_output() {
        // Well past any OS pipe buffer, written before the child exits.
        let (program, args) = sh("i=0; while [ $i -lt 20000 ]; do echo line-$i; i=$((i+1)); done");
        let mut count = 0usize;
        let code = run_streamed(&program, &args, &[], |_, _| count += 1)
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(count, 20000);
    }

    #[tokio::test]
    async fn test_run_streamed_kills_child_on_read_failure() {
        // An invalid UTF-8 line fails the stream read mid-run; the child
        // must be killed and reaped, so it never reaches the touch.
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("survived");
        let (program, args) = sh(&format!(
            "printf '\\377\\n'; sleep 2; touch {}",
            marker.display()
        ));

        let err = run_streamed(&program, &args, &[], |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::TaskError::Io(_)));

        tokio::time::sleep(std::time::Duration::from_secs(3)).await;
        assert!(!marker.exists(), "child was left running after read error");
    }

    #[tokio::test]
    async fn test_run_streamed_spawn_failure() {
        let err = run_streamed("/this/does/not/exist", &[], &[], |_, _| {})
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::TaskError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_run_buffered_captures_output_and_exit() {
        let (program, args) = sh("echo captured; echo warned >&2; exit 3");
        let result = run_buffered(&program, &args).await.unwrap();
        assert_eq!(result.exit_code, 3);
        assert!(!result.success());
        assert_eq!(result.stdout.trim(), "captured");
        assert_eq!(result.stderr.trim(), "warned");
    }
}
