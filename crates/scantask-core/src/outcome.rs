use serde::Serialize;

/// Terminal pipeline state for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    Succeeded,
    SucceededWithIssues,
    Failed,
}

impl Outcome {
    /// Result keyword understood by the agent's `task.complete` command.
    pub fn result_keyword(&self) -> &'static str {
        match self {
            Outcome::Succeeded => "Succeeded",
            Outcome::SucceededWithIssues => "SucceededWithIssues",
            Outcome::Failed => "Failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failed)
    }
}

/// A terminal state plus the human-readable line that goes with it.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedOutcome {
    pub outcome: Outcome,
    pub message: String,
}

/// Map the run's observed exit codes to a terminal state.
///
/// `parser_exit` is `None` when no results file existed and the parser was
/// never spawned. Terminal states only; nothing here retries.
pub fn resolve(
    scanner_exit: i32,
    parser_exit: Option<i32>,
    fail_on_findings: bool,
) -> ResolvedOutcome {
    if scanner_exit != 0 {
        return ResolvedOutcome {
            outcome: Outcome::Failed,
            message: format!("Scanner failed with exit code {scanner_exit}."),
        };
    }

    match parser_exit {
        None => ResolvedOutcome {
            outcome: Outcome::Succeeded,
            message: "Scan completed without findings to report.".to_string(),
        },
        Some(0) => ResolvedOutcome {
            outcome: Outcome::Succeeded,
            message: "Scan completed; no actionable findings.".to_string(),
        },
        Some(code) if fail_on_findings => ResolvedOutcome {
            outcome: Outcome::Failed,
            message: format!("Findings detected (parser exit code {code})."),
        },
        Some(code) => ResolvedOutcome {
            outcome: Outcome::SucceededWithIssues,
            message: format!(
                "Findings detected (parser exit code {code}); fail-on-findings is disabled."
            ),
        },
    }
}
