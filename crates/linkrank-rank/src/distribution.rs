//! Page-keyed probability vectors.
//!
//! Estimators compute on dense `Vec<f64>`s indexed by corpus page index and
//! convert to a [`PageDistribution`] on return, so callers only ever see
//! page ids.

use std::collections::BTreeMap;
use std::ops::Index;

use linkrank_core::Corpus;
use serde::Serialize;

/// A probability for every page of a corpus, iterated in page id order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PageDistribution {
    scores: BTreeMap<String, f64>,
}

/// Where the random surfer goes next from a given page.
pub type TransitionDistribution = PageDistribution;

/// Estimated PageRank of every page.
pub type RankEstimate = PageDistribution;

impl PageDistribution {
    /// Key a dense vector by the corpus page ids.
    ///
    /// `values[i]` belongs to the page at index `i`; extra values are ignored.
    #[must_use]
    pub fn from_dense(corpus: &Corpus, values: &[f64]) -> Self {
        let scores = corpus
            .pages()
            .zip(values.iter().copied())
            .map(|(page, value)| (page.to_string(), value))
            .collect();
        Self { scores }
    }

    /// Lay this distribution back out as a dense vector over `corpus`.
    ///
    /// Pages missing from the distribution get `0.0`.
    #[must_use]
    pub fn to_dense(&self, corpus: &Corpus) -> Vec<f64> {
        corpus
            .pages()
            .map(|page| self.get(page).unwrap_or(0.0))
            .collect()
    }

    /// Return the probability of `page`, if present.
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.scores.get(page).copied()
    }

    /// Iterate `(page, probability)` pairs in page id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.scores.iter().map(|(page, &score)| (page.as_str(), score))
    }

    /// Return the number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Return `true` if the distribution covers no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Return the sum of all probabilities.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.scores.values().sum()
    }

    /// Return pages ordered by descending probability (ties by page id).
    #[must_use]
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut rows: Vec<(&str, f64)> = self.iter().collect();
        rows.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        rows
    }

    /// Return the largest per-page absolute difference from `other`.
    ///
    /// A page present on only one side counts with its full value.
    #[must_use]
    pub fn max_abs_difference(&self, other: &Self) -> f64 {
        let left = self
            .iter()
            .map(|(page, score)| (score - other.get(page).unwrap_or(0.0)).abs());
        let right_only = other
            .iter()
            .filter(|(page, _)| !self.scores.contains_key(*page))
            .map(|(_, score)| score.abs());
        left.chain(right_only).fold(0.0, f64::max)
    }

    /// Borrow the underlying page → probability map.
    #[must_use]
    pub const fn as_map(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }
}

impl Index<&str> for PageDistribution {
    type Output = f64;

    fn index(&self, page: &str) -> &Self::Output {
        &self.scores[page]
    }
}
