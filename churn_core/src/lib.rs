pub mod campaign;
pub mod config;
pub mod executor;
pub mod mutator;
pub mod oracle;
pub mod reporter;

pub use campaign::{BatchReport, run_batch};
pub use config::ChurnConfig;
pub use executor::{RunOutcome, RunStatus, ShellCommandConfig, ShellExecutor};
pub use mutator::{MutationError, MutationOp, generate_chain};
pub use oracle::{BugReport, ExitCodeOracle, Oracle};
pub use reporter::{Reporter, StdoutReporter};
