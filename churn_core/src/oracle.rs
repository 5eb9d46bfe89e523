use crate::executor::RunStatus;
use md5;

/// Default severity assigned to abnormal runs detected by `ExitCodeOracle`.
const DEFAULT_ABNORMAL_RUN_SEVERITY: u8 = 10;

/// A candidate run the oracle considers interesting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BugReport {
    /// The candidate input that triggered the abnormal run.
    pub input: String,
    /// Human-readable description of what went wrong.
    pub description: String,
    /// MD5 hex digest of the input, useful for tracking recurring findings.
    pub input_hash: String,
    /// Numerical severity; scale defined by the oracle that produced it.
    pub severity: u8,
}

/// An `Oracle` examines the outcome of a target run to decide whether it
/// counts as a finding.
pub trait Oracle: Send + Sync {
    /// Examines the run `status` for `input`, returning `Some(BugReport)` if
    /// the run is abnormal and `None` otherwise.
    fn examine(&self, input: &str, status: &RunStatus) -> Option<BugReport>;
}

/// The closed-world oracle for command fuzzing: any non-zero exit, timeout,
/// or launch/communication failure is a finding.
#[derive(Debug, Default)]
pub struct ExitCodeOracle;

impl ExitCodeOracle {
    pub fn new() -> Self {
        ExitCodeOracle
    }
}

impl Oracle for ExitCodeOracle {
    fn examine(&self, input: &str, status: &RunStatus) -> Option<BugReport> {
        let description = match status {
            RunStatus::Ok => return None,
            RunStatus::NonZeroExit(code) => format!("Target exited with code {code}"),
            RunStatus::Timeout => "Target timed out and was killed".to_string(),
            RunStatus::LaunchError(msg) => format!("Failed to execute target: {msg}"),
        };

        let input_digest = md5::compute(input.as_bytes());
        Some(BugReport {
            input: input.to_string(),
            description,
            input_hash: format!("{input_digest:x}"),
            severity: DEFAULT_ABNORMAL_RUN_SEVERITY,
        })
    }
}
