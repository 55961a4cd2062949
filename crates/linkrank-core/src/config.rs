//! Estimator configuration.
//!
//! Values come from built-in defaults, optionally overridden by a TOML file:
//!
//! ```toml
//! damping_factor = 0.85
//! sample_count = 10000
//! convergence_tolerance = 0.001
//! max_sweeps = 1000
//! dangling = "redistribute"
//! seed = 42
//! ```
//!
//! Every key is optional. Ranges are enforced by the `validate_*` functions;
//! [`RankConfig::validate`] runs all of them, the estimators run the ones
//! covering the parameters they take.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::RankError;

/// Probability of following a link rather than jumping to a random page.
pub const DEFAULT_DAMPING: f64 = 0.85;
/// Number of random-walk draws.
pub const DEFAULT_SAMPLES: usize = 10_000;
/// Per-page stopping threshold for the iterative solver.
pub const DEFAULT_TOLERANCE: f64 = 0.001;
/// Sweep cap for the iterative solver.
pub const DEFAULT_MAX_SWEEPS: usize = 1_000;

/// How the iterative solver treats rank held by pages without links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DanglingPolicy {
    /// Discard dangling mass each sweep. Ranks may sum to less than 1.
    Drop,
    /// Spread dangling mass uniformly over every page. This is PageRank in
    /// the strict sense and matches the sampler's transition model.
    #[default]
    Redistribute,
}

impl DanglingPolicy {
    /// Return the config-file spelling of this policy.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drop => "drop",
            Self::Redistribute => "redistribute",
        }
    }
}

impl fmt::Display for DanglingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DanglingPolicy {
    type Err = RankError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "drop" => Ok(Self::Drop),
            "redistribute" => Ok(Self::Redistribute),
            other => Err(RankError::invalid_parameter(
                "dangling",
                format!("expected `drop` or `redistribute`, got `{other}`"),
            )),
        }
    }
}

/// Configuration shared by both estimators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankConfig {
    #[serde(default = "default_damping")]
    pub damping_factor: f64,
    #[serde(default = "default_samples")]
    pub sample_count: usize,
    #[serde(default = "default_tolerance")]
    pub convergence_tolerance: f64,
    #[serde(default = "default_max_sweeps")]
    pub max_sweeps: usize,
    #[serde(default)]
    pub dangling: DanglingPolicy,
    /// Seed for the sampler's generator. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping_factor: default_damping(),
            sample_count: default_samples(),
            convergence_tolerance: default_tolerance(),
            max_sweeps: default_max_sweeps(),
            dangling: DanglingPolicy::default(),
            seed: None,
        }
    }
}

impl RankConfig {
    /// Check every parameter against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidParameter`] naming the first bad value.
    pub fn validate(&self) -> crate::error::Result<()> {
        validate_damping(self.damping_factor)?;
        validate_sample_count(self.sample_count)?;
        validate_tolerance(self.convergence_tolerance)?;
        validate_max_sweeps(self.max_sweeps)?;
        Ok(())
    }
}

/// Reject a damping factor outside `[0, 1]` (including NaN).
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] for an out-of-range value.
pub fn validate_damping(damping: f64) -> crate::error::Result<()> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(RankError::invalid_parameter(
            "damping_factor",
            format!("must be within [0, 1], got {damping}"),
        ))
    }
}

/// Reject a sample count of zero.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] when `n == 0`.
pub fn validate_sample_count(n: usize) -> crate::error::Result<()> {
    if n == 0 {
        return Err(RankError::invalid_parameter(
            "sample_count",
            "must be at least 1",
        ));
    }
    Ok(())
}

/// Reject a tolerance that is not a positive, finite number.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] for zero, negative or non-finite values.
pub fn validate_tolerance(tolerance: f64) -> crate::error::Result<()> {
    if tolerance.is_finite() && tolerance > 0.0 {
        return Ok(());
    }
    Err(RankError::invalid_parameter(
        "convergence_tolerance",
        format!("must be a positive number, got {tolerance}"),
    ))
}

/// Reject a sweep cap of zero.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] when `max_sweeps == 0`.
pub fn validate_max_sweeps(max_sweeps: usize) -> crate::error::Result<()> {
    if max_sweeps == 0 {
        return Err(RankError::invalid_parameter(
            "max_sweeps",
            "must be at least 1",
        ));
    }
    Ok(())
}

/// Load a [`RankConfig`] from a TOML file.
///
/// A missing file yields the defaults. The loaded config is validated.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid TOML, or holds
/// an out-of-range value.
pub fn load_config(path: &Path) -> Result<RankConfig> {
    if !path.exists() {
        return Ok(RankConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = toml::from_str::<RankConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

const fn default_damping() -> f64 {
    DEFAULT_DAMPING
}

const fn default_samples() -> usize {
    DEFAULT_SAMPLES
}

const fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

const fn default_max_sweeps() -> usize {
    DEFAULT_MAX_SWEEPS
}
