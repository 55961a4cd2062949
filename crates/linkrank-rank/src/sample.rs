//! Monte-Carlo PageRank: follow the transition model for `n` steps and
//! count where the surfer lands.
//!
//! The walk starts on a page chosen uniformly at random. Each step draws
//! the next page from [`transition_row`] of the current page and counts it;
//! the estimate is `visits / n`. The starting page itself is not counted.
//!
//! The generator is passed in by the caller. Seeding it (for example with
//! `StdRng::seed_from_u64`) makes the estimate reproducible.
//!
//! A page's weighted sampler is built from its transition row on the first
//! visit and reused afterwards, so the draw on every step comes from
//! exactly the distribution [`crate::transition::transition`] returns for
//! that page.

#![allow(clippy::cast_precision_loss)]

use linkrank_core::config::{validate_damping, validate_sample_count};
use linkrank_core::{Corpus, RankError, Result};
use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use tracing::{debug, info, instrument};

use crate::distribution::{PageDistribution, RankEstimate};
use crate::transition::transition_row;

/// Estimate PageRank by sampling `n` steps of a random surfer.
///
/// # Errors
///
/// Returns [`RankError::InvalidParameter`] if `damping` is outside `[0, 1]`
/// or `n` is zero, and [`RankError::InvalidGraph`] for an empty corpus.
#[instrument(skip(corpus, rng), fields(pages = corpus.page_count()))]
pub fn sample<R: Rng>(
    corpus: &Corpus,
    damping: f64,
    n: usize,
    rng: &mut R,
) -> Result<RankEstimate> {
    validate_damping(damping)?;
    validate_sample_count(n)?;
    corpus.ensure_non_empty()?;

    let mut table = WalkTable::new(corpus, damping);
    let mut counts = vec![0_usize; corpus.page_count()];

    let mut current = rng.gen_range(0..corpus.page_count());
    for _ in 0..n {
        current = table.sampler(current)?.sample(rng);
        counts[current] += 1;
    }

    debug!(rows_built = table.rows_built(), "walk finished");

    let total = n as f64;
    let estimate: Vec<f64> = counts.iter().map(|&c| c as f64 / total).collect();
    info!(samples = n, "sampling complete");

    Ok(PageDistribution::from_dense(corpus, &estimate))
}

/// Lazily built per-page weighted samplers over the transition model.
struct WalkTable<'a> {
    corpus: &'a Corpus,
    damping: f64,
    samplers: Vec<Option<WeightedIndex<f64>>>,
    row: Vec<f64>,
}

impl<'a> WalkTable<'a> {
    fn new(corpus: &'a Corpus, damping: f64) -> Self {
        let pages = corpus.page_count();
        Self {
            corpus,
            damping,
            samplers: (0..pages).map(|_| None).collect(),
            row: vec![0.0; pages],
        }
    }

    /// Return the sampler for the page at `index`, building it on first use.
    fn sampler(&mut self, index: usize) -> Result<&WeightedIndex<f64>> {
        match &mut self.samplers[index] {
            Some(sampler) => Ok(&*sampler),
            slot @ None => {
                transition_row(self.corpus, index, self.damping, &mut self.row);
                let sampler = WeightedIndex::new(&self.row).map_err(|err| {
                    RankError::invalid_parameter(
                        "damping_factor",
                        format!("transition weights for page {index} are unusable: {err}"),
                    )
                })?;
                Ok(&*slot.insert(sampler))
            }
        }
    }

    fn rows_built(&self) -> usize {
        self.samplers.iter().filter(|s| s.is_some()).count()
    }
}
