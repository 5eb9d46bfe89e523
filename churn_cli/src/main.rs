use churn_core::campaign::run_batch;
use churn_core::config::ChurnConfig;
use churn_core::executor::{ShellCommandConfig, ShellExecutor};
use churn_core::mutator::{MutationOp, generate_chain};
use churn_core::oracle::ExitCodeOracle;
use churn_core::reporter::StdoutReporter;

use clap::Parser;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Shell command to fuzz; spawned fresh for every candidate input.
    command: String,
    #[clap(short, long, value_parser)]
    config_file: Option<PathBuf>,
    /// Number of mutated candidates to derive from the seed.
    #[clap(long)]
    chain_length: Option<usize>,
    /// Seed input at the root of the mutation chain.
    #[clap(long)]
    seed_input: Option<String>,
    /// Fixed RNG seed for a reproducible run.
    #[clap(long)]
    rng_seed: Option<u64>,
    /// Per-process deadline in milliseconds before the target is killed.
    #[clap(long)]
    timeout_ms: Option<u64>,
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    let mut config = match cli.config_file {
        Some(config_path) => {
            println!("Loading configuration from specified path: {config_path:?}",);
            ChurnConfig::load_from_file(&config_path)?
        }
        None => {
            let default_config_path = PathBuf::from("churn.toml");
            if default_config_path.exists() {
                println!(
                    "No config file specified via CLI, loading default: {default_config_path:?}",
                );
                ChurnConfig::load_from_file(&default_config_path)?
            } else {
                ChurnConfig::default()
            }
        }
    };

    if let Some(chain_length) = cli.chain_length {
        config.fuzzer.chain_length = chain_length;
    }
    if let Some(seed_input) = cli.seed_input {
        config.fuzzer.seed_input = seed_input;
    }
    if let Some(rng_seed) = cli.rng_seed {
        config.fuzzer.rng_seed = Some(rng_seed);
    }
    if let Some(timeout_ms) = cli.timeout_ms {
        config.executor.timeout_ms = timeout_ms;
    }

    let mut rng = match config.fuzzer.rng_seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::seed_from_u64(rand::random()),
    };

    let executor = ShellExecutor::new(ShellCommandConfig {
        command_line: cli.command,
        working_dir: config.executor.working_dir.clone(),
        timeout: Duration::from_millis(config.executor.timeout_ms),
    });
    println!("Command: {:?}", executor.command_tokens());

    let chain = generate_chain(
        &config.fuzzer.seed_input,
        &MutationOp::ALL,
        config.fuzzer.chain_length,
        &mut rng,
    )?;

    // The seed always runs first, followed by the chain in derivation order.
    let mut candidates = Vec::with_capacity(chain.len() + 1);
    candidates.push(config.fuzzer.seed_input.clone());
    candidates.extend(chain);

    let oracle = ExitCodeOracle::new();
    let mut reporter = StdoutReporter;
    let report = run_batch(&executor, &candidates, &oracle, &mut reporter);

    println!(
        "Runs: {}, Abnormal: {}",
        report.executed, report.failures
    );

    if report.any_failed() {
        std::process::exit(1);
    }
    Ok(())
}
