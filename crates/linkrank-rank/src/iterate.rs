//! PageRank by fixed-point (power) iteration.
//!
//! # Algorithm
//!
//! Every page starts at `1/N`. Each sweep recomputes every page from the
//! previous vector only:
//!
//! ```text
//! PR'(p) = (1 - d) / N + d * Σ PR(i) / |L(i)|   for each i linking to p
//! ```
//!
//! With [`DanglingPolicy::Redistribute`] each sweep also adds
//! `d * Σ PR(j) / N` over dangling pages `j`, which is the stationary
//! distribution of the transition model the sampler walks. With
//! [`DanglingPolicy::Drop`] that mass is discarded and the result can sum
//! to less than 1 on corpora with dangling pages.
//!
//! # Convergence
//!
//! A page is settled once `|PR'(p) - PR(p)| < tolerance`. Iteration stops
//! when every page settles in the same sweep. After `max_sweeps` sweeps
//! without that happening the solver returns
//! [`RankError::NonConvergence`].

#![allow(clippy::cast_precision_loss)]

use linkrank_core::config::{validate_damping, validate_max_sweeps, validate_tolerance};
use linkrank_core::{Corpus, DanglingPolicy, RankConfig, RankError, Result};
use petgraph::Direction;
use petgraph::graph::NodeIndex;
use tracing::{debug, info, instrument};

use crate::distribution::{PageDistribution, RankEstimate};

// ---------------------------------------------------------------------------
// Reverse index
// ---------------------------------------------------------------------------

/// For each page, the pages that link to it (by dense index, ascending).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReverseIndex {
    inbound: Vec<Vec<usize>>,
}

impl ReverseIndex {
    /// Derive the reverse index of `corpus`.
    #[must_use]
    pub fn build(corpus: &Corpus) -> Self {
        let graph = corpus.graph();
        let inbound = (0..corpus.page_count())
            .map(|p| {
                let mut sources: Vec<usize> = graph
                    .neighbors_directed(NodeIndex::new(p), Direction::Incoming)
                    .map(NodeIndex::index)
                    .collect();
                // Fixed summation order keeps sweeps bit-for-bit reproducible.
                sources.sort_unstable();
                sources
            })
            .collect();
        Self { inbound }
    }

    /// Return the pages linking to the page at `index`.
    #[must_use]
    pub fn inbound(&self, index: usize) -> &[usize] {
        self.inbound.get(index).map(Vec::as_slice).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Result type
// ---------------------------------------------------------------------------

/// Outcome of a converged iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct IterationReport {
    /// Converged rank of every page.
    pub estimate: RankEstimate,
    /// Number of sweeps performed (including the final, settled one).
    pub sweeps: usize,
    /// Largest per-page change in the final sweep.
    pub max_delta: f64,
}

// ---------------------------------------------------------------------------
// Solver
// ---------------------------------------------------------------------------

/// Compute PageRank by iterating the recurrence until every page settles.
///
/// Uses `damping_factor`, `convergence_tolerance`, `max_sweeps` and
/// `dangling` from `config`. Pure: identical inputs give bit-identical
/// output.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] for an out-of-range damping,
/// tolerance or sweep cap, [`RankError::InvalidGraph`] for an empty corpus,
/// and [`RankError::NonConvergence`] if the cap is reached.
#[instrument(skip(corpus, config), fields(pages = corpus.page_count()))]
pub fn iterate(corpus: &Corpus, config: &RankConfig) -> Result<IterationReport> {
    validate_damping(config.damping_factor)?;
    validate_tolerance(config.convergence_tolerance)?;
    validate_max_sweeps(config.max_sweeps)?;
    corpus.ensure_non_empty()?;

    let n = corpus.page_count();
    let reverse = ReverseIndex::build(corpus);

    let mut ranks = vec![1.0 / n as f64; n];
    let mut new_ranks = vec![0.0_f64; n];
    let mut max_delta = f64::INFINITY;

    for sweeps in 1..=config.max_sweeps {
        max_delta = sweep(
            corpus,
            &reverse,
            &ranks,
            &mut new_ranks,
            config.damping_factor,
            config.dangling,
        );
        std::mem::swap(&mut ranks, &mut new_ranks);
        debug!(sweep = sweeps, max_delta, "sweep complete");

        if max_delta < config.convergence_tolerance {
            info!(sweeps, dangling = %config.dangling, "iteration converged");
            return Ok(IterationReport {
                estimate: PageDistribution::from_dense(corpus, &ranks),
                sweeps,
                max_delta,
            });
        }
    }

    Err(RankError::non_convergence(config.max_sweeps, max_delta))
}

/// Apply one synchronous sweep of the recurrence.
///
/// Reads only `ranks`, writes every slot of `new_ranks`, and returns the
/// largest per-page absolute change. Both slices must have one slot per
/// page. Parameters are assumed to be validated.
pub fn sweep(
    corpus: &Corpus,
    reverse: &ReverseIndex,
    ranks: &[f64],
    new_ranks: &mut [f64],
    damping: f64,
    dangling: DanglingPolicy,
) -> f64 {
    debug_assert_eq!(ranks.len(), corpus.page_count());
    debug_assert_eq!(new_ranks.len(), ranks.len());
    let n = ranks.len() as f64;

    let dangling_share = match dangling {
        DanglingPolicy::Drop => 0.0,
        DanglingPolicy::Redistribute => {
            let mass: f64 = (0..ranks.len())
                .filter(|&i| corpus.is_dangling(i))
                .map(|i| ranks[i])
                .sum();
            damping * mass / n
        }
    };
    let base = (1.0 - damping) / n + dangling_share;

    let mut max_delta = 0.0_f64;
    for (p, slot) in new_ranks.iter_mut().enumerate() {
        // Every inbound page links to `p`, so its out-degree is at least 1.
        let inbound: f64 = reverse
            .inbound(p)
            .iter()
            .map(|&i| ranks[i] / corpus.out_degree(i) as f64)
            .sum();
        *slot = damping.mul_add(inbound, base);
        max_delta = max_delta.max((*slot - ranks[p]).abs());
    }

    max_delta
}
