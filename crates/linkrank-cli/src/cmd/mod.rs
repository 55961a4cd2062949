pub mod corpus;
pub mod rank;

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Args;
use linkrank_core::config::load_config;
use linkrank_core::{DanglingPolicy, RankConfig};

/// Configuration file picked up from the corpus directory when `--config`
/// is not given.
pub const LOCAL_CONFIG_FILE: &str = "linkrank.toml";

/// Corpus location and ranking parameters shared by the ranking commands.
///
/// Each flag overrides the matching key of the configuration file.
#[derive(Args, Debug, Clone, Default)]
pub struct RankArgs {
    /// Directory of `.html` pages.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Probability of following a link rather than teleporting.
    #[arg(long, value_name = "D")]
    pub damping: Option<f64>,

    /// Number of random-walk steps to sample.
    #[arg(long, value_name = "N")]
    pub samples: Option<usize>,

    /// Stop iterating once no page moves by this much in a sweep.
    #[arg(long, value_name = "EPS")]
    pub tolerance: Option<f64>,

    /// Give up iterating after this many sweeps.
    #[arg(long, value_name = "N")]
    pub max_sweeps: Option<usize>,

    /// Treatment of pages without outbound links: `drop` or `redistribute`.
    #[arg(long, value_name = "POLICY")]
    pub dangling: Option<DanglingPolicy>,

    /// Seed for the random walk; omitted means a fresh seed per run.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Read parameters from this TOML file instead of `<DIR>/linkrank.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl RankArgs {
    /// Layer defaults, the configuration file, and flags, then validate.
    pub fn resolve_config(&self) -> anyhow::Result<RankConfig> {
        let mut config = match &self.config {
            Some(path) => {
                anyhow::ensure!(path.is_file(), "config file {} not found", path.display());
                load_config(path)?
            }
            None => load_config(&self.dir.join(LOCAL_CONFIG_FILE))?,
        };

        if let Some(damping) = self.damping {
            config.damping_factor = damping;
        }
        if let Some(samples) = self.samples {
            config.sample_count = samples;
        }
        if let Some(tolerance) = self.tolerance {
            config.convergence_tolerance = tolerance;
        }
        if let Some(max_sweeps) = self.max_sweeps {
            config.max_sweeps = max_sweeps;
        }
        if let Some(dangling) = self.dangling {
            config.dangling = dangling;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }

        config.validate().context("invalid ranking parameters")?;
        Ok(config)
    }
}
