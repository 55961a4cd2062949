//! Error taxonomy shared by the corpus model and the estimators.
//!
//! Every variant is a precondition failure: it is detected before (or at
//! the very start of) a computation and surfaced to the caller as-is.
//! Nothing in the workspace retries or returns partial results.

use thiserror::Error;

/// Result alias used by the corpus model and the rank estimators.
pub type Result<T> = std::result::Result<T, RankError>;

/// Errors raised while building a corpus or estimating ranks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// The corpus violates one of its invariants (empty, dangling
    /// reference, self-link) or a page outside the corpus was requested.
    #[error("invalid graph: {reason}")]
    InvalidGraph {
        /// Human-readable description of the violated invariant.
        reason: String,
    },

    /// A configuration value is outside its accepted range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        /// Name of the offending parameter (as it appears in config files).
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },

    /// The iterative solver hit its sweep cap before every page settled.
    #[error("iteration did not converge after {sweeps} sweeps (max delta={max_delta:.6})")]
    NonConvergence {
        /// Number of sweeps performed.
        sweeps: usize,
        /// Largest per-page change observed in the final sweep.
        max_delta: f64,
    },
}

impl RankError {
    /// Create an invalid graph error.
    pub fn invalid_graph(reason: impl Into<String>) -> Self {
        Self::InvalidGraph {
            reason: reason.into(),
        }
    }

    /// Create an invalid parameter error.
    pub fn invalid_parameter(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// Create a non-convergence error.
    #[must_use]
    pub const fn non_convergence(sweeps: usize, max_delta: f64) -> Self {
        Self::NonConvergence { sweeps, max_delta }
    }

    /// Returns `true` if this error reports a solver that ran out of sweeps.
    #[must_use]
    pub const fn is_non_convergence(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }
}
