//! The random surfer's transition model.
//!
//! From page `p` with outbound links `L` in a corpus of `N` pages:
//!
//! ```text
//! P(p → q) = (1 - d) / N + d / |L|   if q ∈ L
//! P(p → q) = (1 - d) / N             otherwise
//! P(p → q) = 1 / N                   for every q, if L is empty
//! ```
//!
//! A surfer on a dangling page teleports uniformly instead of stalling, so
//! no probability mass leaves the system.

#![allow(clippy::cast_precision_loss)]

use linkrank_core::config::validate_damping;
use linkrank_core::{Corpus, RankError, Result};
use petgraph::Direction;
use petgraph::graph::NodeIndex;

use crate::distribution::{PageDistribution, TransitionDistribution};

/// Return the distribution over next pages for a surfer on `page`.
///
/// Pure and deterministic: one entry per page, summing to 1.0.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] if `damping` is outside `[0, 1]`
/// and [`RankError::InvalidGraph`] if the corpus is empty or `page` is not
/// one of its pages.
pub fn transition(corpus: &Corpus, page: &str, damping: f64) -> Result<TransitionDistribution> {
    validate_damping(damping)?;
    corpus.ensure_non_empty()?;
    let index = corpus
        .page_index(page)
        .ok_or_else(|| RankError::invalid_graph(format!("page `{page}` is not in the corpus")))?;

    let mut row = vec![0.0; corpus.page_count()];
    transition_row(corpus, index, damping, &mut row);
    Ok(PageDistribution::from_dense(corpus, &row))
}

/// Fill `row` with the transition distribution out of the page at `index`.
///
/// This is the allocation-free form of [`transition`] used by the
/// estimators. `row` must have one slot per page; parameters are assumed
/// to be validated by the caller.
pub fn transition_row(corpus: &Corpus, index: usize, damping: f64, row: &mut [f64]) {
    debug_assert_eq!(row.len(), corpus.page_count());
    let n = row.len() as f64;

    let degree = corpus.out_degree(index);
    if degree == 0 {
        row.fill(1.0 / n);
        return;
    }

    row.fill((1.0 - damping) / n);
    let share = damping / degree as f64;
    for target in corpus
        .graph()
        .neighbors_directed(NodeIndex::new(index), Direction::Outgoing)
    {
        row[target.index()] += share;
    }
}
