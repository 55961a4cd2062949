//! The closed link graph every estimator runs over.
//!
//! # Overview
//!
//! A [`Corpus`] maps each page id to the set of pages it links to. It is
//! built once, validated at construction, and only ever read afterwards.
//!
//! ## Invariants
//!
//! - The corpus has at least one page.
//! - Every link target is itself a page of the corpus.
//! - No page links to itself.
//!
//! [`Corpus::from_links`] rejects input breaking any of these with
//! [`RankError::InvalidGraph`].
//!
//! ## Dense indices
//!
//! Pages are inserted into the underlying [`DiGraph`] in sorted id order, so
//! node index `i` is the `i`-th page id. Estimators work on `Vec<f64>`
//! indexed this way and key their results by id only at the end.
//!
//! ## Fingerprint
//!
//! [`Corpus::content_hash`] is a BLAKE3 hash of the sorted edge list (and
//! page list), so two runs over the same corpus report the same value.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::{RankError, Result};

// ---------------------------------------------------------------------------
// Corpus
// ---------------------------------------------------------------------------

/// A validated, immutable corpus of linked pages.
///
/// Nodes are page ids; an edge `A → B` means "page A links to page B".
#[derive(Debug, Clone)]
pub struct Corpus {
    /// Directed link graph. Node `i` holds the `i`-th page id in sorted order.
    graph: DiGraph<String, ()>,
    /// Mapping from page id to its node.
    node_map: HashMap<String, NodeIndex>,
    /// Outbound link count per node index.
    out_degrees: Vec<usize>,
    /// BLAKE3 fingerprint of the page and edge sets.
    content_hash: String,
}

impl Corpus {
    /// Build a corpus from `(page, outbound links)` pairs.
    ///
    /// Repeated pages have their link sets merged; duplicate links collapse.
    ///
    /// # Errors
    ///
    /// Returns [`RankError::InvalidGraph`] if no pages are given, if a page
    /// links to itself, or if a link targets a page that is not a key.
    pub fn from_links<I, K, L, T>(links: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut pages: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (page, targets) in links {
            pages
                .entry(page.into())
                .or_default()
                .extend(targets.into_iter().map(Into::into));
        }

        if pages.is_empty() {
            return Err(RankError::invalid_graph("corpus has no pages"));
        }

        for (page, targets) in &pages {
            if targets.contains(page) {
                return Err(RankError::invalid_graph(format!(
                    "page `{page}` links to itself"
                )));
            }
            if let Some(missing) = targets.iter().find(|t| !pages.contains_key(*t)) {
                return Err(RankError::invalid_graph(format!(
                    "page `{page}` links to `{missing}`, which is not in the corpus"
                )));
            }
        }

        Ok(Self::assemble(&pages))
    }

    /// Lay out an already-validated page map as a graph.
    fn assemble(pages: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let mut graph = DiGraph::<String, ()>::with_capacity(
            pages.len(),
            pages.values().map(BTreeSet::len).sum(),
        );
        let mut node_map = HashMap::with_capacity(pages.len());

        for page in pages.keys() {
            let idx = graph.add_node(page.clone());
            node_map.insert(page.clone(), idx);
        }

        let mut out_degrees = Vec::with_capacity(pages.len());
        for (page, targets) in pages {
            let from = node_map[page];
            for target in targets {
                graph.add_edge(from, node_map[target], ());
            }
            out_degrees.push(targets.len());
        }

        let content_hash = compute_corpus_hash(pages);

        Self {
            graph,
            node_map,
            out_degrees,
            content_hash,
        }
    }

    /// Fail with [`RankError::InvalidGraph`] if the corpus has no pages.
    ///
    /// Estimators call this before dividing by the page count.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty corpus.
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.graph.node_count() == 0 {
            return Err(RankError::invalid_graph("corpus has no pages"));
        }
        Ok(())
    }

    /// Return the number of pages.
    #[must_use]
    pub fn page_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the total number of links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate page ids in index (sorted) order.
    pub fn pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.graph.node_weights().map(String::as_str)
    }

    /// Look up the dense index of a page.
    #[must_use]
    pub fn page_index(&self, page: &str) -> Option<usize> {
        self.node_map.get(page).copied().map(NodeIndex::index)
    }

    /// Return the page id stored at a dense index.
    #[must_use]
    pub fn page_id(&self, index: usize) -> Option<&str> {
        self.graph
            .node_weight(NodeIndex::new(index))
            .map(String::as_str)
    }

    /// Return the outbound links of `page`, sorted, or `None` for an unknown page.
    #[must_use]
    pub fn links(&self, page: &str) -> Option<Vec<&str>> {
        let idx = *self.node_map.get(page)?;
        let mut targets: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Outgoing)
            .filter_map(|n| self.graph.node_weight(n).map(String::as_str))
            .collect();
        targets.sort_unstable();
        Some(targets)
    }

    /// Return the outbound link count of the page at `index` (0 if out of range).
    #[must_use]
    pub fn out_degree(&self, index: usize) -> usize {
        self.out_degrees.get(index).copied().unwrap_or(0)
    }

    /// Return `true` if the page at `index` has no outbound links.
    #[must_use]
    pub fn is_dangling(&self, index: usize) -> bool {
        self.out_degree(index) == 0
    }

    /// Return the ids of every page without outbound links, sorted.
    #[must_use]
    pub fn dangling_pages(&self) -> Vec<&str> {
        (0..self.page_count())
            .filter(|&i| self.is_dangling(i))
            .filter_map(|i| self.page_id(i))
            .collect()
    }

    /// Return the underlying link graph.
    #[must_use]
    pub const fn graph(&self) -> &DiGraph<String, ()> {
        &self.graph
    }

    /// Return the BLAKE3 fingerprint of this corpus (`blake3:<hex>`).
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Return the corpus as a sorted `page → links` map.
    #[must_use]
    pub fn to_links(&self) -> BTreeMap<&str, Vec<&str>> {
        self.pages()
            .filter_map(|page| self.links(page).map(|links| (page, links)))
            .collect()
    }
}

impl Default for Corpus {
    /// An empty corpus. Every estimator rejects it with
    /// [`RankError::InvalidGraph`].
    fn default() -> Self {
        Self::assemble(&BTreeMap::new())
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Compute a BLAKE3 hash over the sorted pages and their sorted links.
fn compute_corpus_hash(pages: &BTreeMap<String, BTreeSet<String>>) -> String {
    let mut hasher = blake3::Hasher::new();
    for (page, targets) in pages {
        hasher.update(page.as_bytes());
        hasher.update(b"\x00");
        for target in targets {
            hasher.update(target.as_bytes());
            hasher.update(b"\x01");
        }
        hasher.update(b"\x02");
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(links: &[(&str, &[&str])]) -> Corpus {
        Corpus::from_links(links.iter().map(|(p, ls)| (*p, ls.iter().copied())))
            .expect("valid corpus")
    }

    #[test]
    fn pages_are_indexed_in_sorted_order() {
        let c = corpus(&[
            ("c.html", &[]),
            ("a.html", &["c.html"]),
            ("b.html", &["a.html"]),
        ]);
        let pages: Vec<&str> = c.pages().collect();
        assert_eq!(pages, vec!["a.html", "b.html", "c.html"]);
        assert_eq!(c.page_index("a.html"), Some(0));
        assert_eq!(c.page_index("c.html"), Some(2));
        assert_eq!(c.page_id(1), Some("b.html"));
        assert_eq!(c.page_id(3), None);
    }

    #[test]
    fn counts_and_degrees() {
        let c = corpus(&[("A", &["B", "C"]), ("B", &["A"]), ("C", &[])]);
        assert_eq!(c.page_count(), 3);
        assert_eq!(c.link_count(), 3);
        assert_eq!(c.out_degree(0), 2);
        assert_eq!(c.out_degree(1), 1);
        assert!(c.is_dangling(2));
        assert_eq!(c.dangling_pages(), vec!["C"]);
    }

    #[test]
    fn links_are_sorted() {
        let c = corpus(&[("A", &["C", "B"]), ("B", &[]), ("C", &[])]);
        assert_eq!(c.links("A"), Some(vec!["B", "C"]));
        assert_eq!(c.links("B"), Some(vec![]));
        assert_eq!(c.links("Z"), None);
    }

    #[test]
    fn repeated_pages_merge_links() {
        let c = Corpus::from_links(vec![
            ("A", vec!["B"]),
            ("A", vec!["C"]),
            ("B", vec![]),
            ("C", vec![]),
        ])
        .expect("valid corpus");
        assert_eq!(c.links("A"), Some(vec!["B", "C"]));
    }

    #[test]
    fn empty_corpus_is_rejected() {
        let err = Corpus::from_links(Vec::<(String, Vec<String>)>::new())
            .expect_err("corpus should be rejected");
        assert!(matches!(err, RankError::InvalidGraph { .. }));
    }

    #[test]
    fn self_link_is_rejected() {
        let err =
            Corpus::from_links(vec![("A", vec!["A"])]).expect_err("corpus should be rejected");
        assert!(err.to_string().contains("links to itself"));
    }

    #[test]
    fn link_outside_corpus_is_rejected() {
        let err =
            Corpus::from_links(vec![("A", vec!["B"])]).expect_err("corpus should be rejected");
        assert!(matches!(err, RankError::InvalidGraph { .. }));
        assert!(err.to_string().contains("`B`"));
    }

    #[test]
    fn default_corpus_is_empty_and_fails_fast() {
        let c = Corpus::default();
        assert_eq!(c.page_count(), 0);
        assert!(c.ensure_non_empty().is_err());
    }

    #[test]
    fn content_hash_depends_only_on_structure() {
        let a = corpus(&[("A", &["B"]), ("B", &["A"])]);
        let b = corpus(&[("B", &["A"]), ("A", &["B"])]);
        let c = corpus(&[("A", &["B"]), ("B", &[])]);
        assert!(a.content_hash().starts_with("blake3:"));
        assert_eq!(a.content_hash(), b.content_hash());
        assert_ne!(a.content_hash(), c.content_hash());
    }

    #[test]
    fn to_links_round_trips_structure() {
        let c = corpus(&[("A", &["B", "C"]), ("B", &["A"]), ("C", &[])]);
        let links = c.to_links();
        assert_eq!(links["A"], vec!["B", "C"]);
        assert_eq!(links["C"], Vec::<&str>::new());
    }
}
