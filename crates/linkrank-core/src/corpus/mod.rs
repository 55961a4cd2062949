//! The corpus: a closed graph of pages and the links between them.
//!
//! ## Pipeline
//!
//! ```text
//! directory of *.html files
//!        ↓  crawl::crawl()
//! page id → set(page id), self-links and external targets removed
//!        ↓  build::Corpus::from_links()
//! Corpus (validated, dense page indices, BLAKE3 fingerprint)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust,ignore
//! use linkrank_core::corpus::crawl;
//!
//! let corpus = crawl::crawl(Path::new("corpus0"))?;
//! println!("pages={} links={} hash={}",
//!     corpus.page_count(), corpus.link_count(), corpus.content_hash());
//! ```

pub mod build;
pub mod crawl;

pub use build::Corpus;
pub use crawl::{crawl, extract_links};
