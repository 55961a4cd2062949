#![forbid(unsafe_code)]
//! linkrank-rank library.
//!
//! Two independent PageRank estimators over a [`linkrank_core::Corpus`]:
//!
//! - [`sample::sample`] walks the transition model with a caller-owned
//!   random generator and normalizes visit counts.
//! - [`iterate::iterate`] runs synchronous power iteration until every
//!   page's rank settles within the configured tolerance.
//!
//! Both return a [`RankEstimate`] keyed by page id. For a well-formed corpus
//! the two estimates are numerically close but not identical.
//!
//! ```rust,ignore
//! use linkrank_core::{Corpus, RankConfig};
//! use linkrank_rank::{iterate, sample};
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! let corpus = Corpus::from_links([("a", vec!["b"]), ("b", vec!["a"])])?;
//! let config = RankConfig::default();
//! let mut rng = StdRng::seed_from_u64(42);
//! let sampled = sample(&corpus, config.damping_factor, config.sample_count, &mut rng)?;
//! let iterated = iterate(&corpus, &config)?.estimate;
//! ```

pub mod distribution;
pub mod iterate;
pub mod sample;
pub mod transition;

pub use distribution::{PageDistribution, RankEstimate, TransitionDistribution};
pub use iterate::{IterationReport, ReverseIndex, iterate, sweep};
pub use sample::sample;
pub use transition::{transition, transition_row};
