use crate::executor::{RunOutcome, RunStatus};
use crate::oracle::BugReport;

/// Surface for the per-run transcript.
///
/// The batch loop calls `report_run` once per candidate, in candidate order,
/// as soon as that candidate's run completes; `report_bug` follows for runs
/// the oracle flagged. Implementations decide where the transcript goes.
pub trait Reporter {
    fn report_run(&mut self, input: &str, outcome: &RunOutcome);
    fn report_bug(&mut self, report: &BugReport);
}

/// Prints the transcript to stdout, with launch/communication errors echoed
/// to stderr alongside the offending input.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutReporter;

impl Reporter for StdoutReporter {
    fn report_run(&mut self, input: &str, outcome: &RunOutcome) {
        println!("Input: {input}");
        println!("Output: {}", outcome.combined_output);
        if let RunStatus::LaunchError(msg) = &outcome.status {
            eprintln!("Error executing command with input: {input} ({msg})");
        }
    }

    fn report_bug(&mut self, report: &BugReport) {
        println!("!!! Abnormal run detected !!!");
        println!("  Input: {:?}", report.input);
        println!("  Description: {}", report.description);
        println!("  Hash: {}", report.input_hash);
    }
}
