use serde::Deserialize;
use std::path::PathBuf;

/// The built-in seed input, the root of every mutation chain unless
/// overridden by config or CLI.
pub const DEFAULT_SEED_INPUT: &str = "<html a=\"value\">...</html>";

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct FuzzerSettings {
    #[serde(default = "default_seed_input")]
    pub seed_input: String,
    #[serde(default = "default_chain_length")]
    pub chain_length: usize,
    /// Optional fixed RNG seed for reproducible chains; a fresh random seed
    /// is drawn when absent.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

fn default_seed_input() -> String {
    DEFAULT_SEED_INPUT.to_string()
}

pub fn default_chain_length() -> usize {
    10
}

impl Default for FuzzerSettings {
    fn default() -> Self {
        Self {
            seed_input: default_seed_input(),
            chain_length: default_chain_length(),
            rng_seed: None,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ExecutorSettings {
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_working_dir")]
    pub working_dir: PathBuf,
}

fn default_timeout_ms() -> u64 {
    2000
}

fn default_working_dir() -> PathBuf {
    PathBuf::from("./")
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            working_dir: default_working_dir(),
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "kebab-case")]
#[serde(deny_unknown_fields)]
pub struct ChurnConfig {
    #[serde(default)]
    pub fuzzer: FuzzerSettings,
    #[serde(default)]
    pub executor: ExecutorSettings,
}

impl ChurnConfig {
    pub fn load_from_file(path: &PathBuf) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file at {:?}: {}", path, e))?;

        let config: ChurnConfig = toml::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse TOML from config file {:?}: {}", path, e)
        })?;

        Ok(config)
    }
}
