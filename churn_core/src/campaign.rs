use crate::executor::ShellExecutor;
use crate::oracle::Oracle;
use crate::reporter::Reporter;

/// Aggregate result of one fuzzing batch.
///
/// This is the explicit accumulator the batch fold threads through: no
/// shared mutable "did anything fail" flag, just counts carried from one
/// candidate to the next.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    /// Number of candidates actually executed (always the full batch).
    pub executed: usize,
    /// Number of runs the oracle classified as abnormal.
    pub failures: usize,
}

impl BatchReport {
    /// True iff at least one run was abnormal; this maps to the harness's
    /// own non-zero exit code.
    pub fn any_failed(&self) -> bool {
        self.failures > 0
    }
}

/// Runs every candidate against the target, strictly in order, one fresh
/// process per candidate.
///
/// The batch never short-circuits: an abnormal or broken run is recorded and
/// the loop moves on, so the transcript covers all candidates even when an
/// early one fails. Callers pass the seed first, followed by the mutation
/// chain, neither reordered nor deduplicated.
pub fn run_batch(
    executor: &ShellExecutor,
    candidates: &[String],
    oracle: &dyn Oracle,
    reporter: &mut dyn Reporter,
) -> BatchReport {
    candidates
        .iter()
        .fold(BatchReport::default(), |mut report, candidate| {
            let outcome = executor.execute(candidate);
            reporter.report_run(candidate, &outcome);

            if let Some(bug_report) = oracle.examine(candidate, &outcome.status) {
                reporter.report_bug(&bug_report);
                report.failures += 1;
            }

            report.executed += 1;
            report
        })
}
