//! `linkrank corpus`: show the link graph the crawler extracted.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Args;
use linkrank_core::Corpus;
use linkrank_core::corpus::crawl;
use serde::Serialize;

use super::rank::CorpusSummary;
use crate::output::{OutputMode, pretty_kv, pretty_rule, render_mode};

/// Arguments for `linkrank corpus`.
#[derive(Args, Debug, Clone)]
pub struct CorpusArgs {
    /// Directory of `.html` pages.
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct PageEntry {
    pub page: String,
    pub links: Vec<String>,
    pub dangling: bool,
}

/// Report payload for `linkrank corpus`.
#[derive(Debug, Serialize)]
pub struct CorpusReport {
    pub corpus: CorpusSummary,
    pub dangling: usize,
    pub pages: Vec<PageEntry>,
}

impl From<&Corpus> for CorpusReport {
    fn from(corpus: &Corpus) -> Self {
        let pages: Vec<PageEntry> = corpus
            .to_links()
            .into_iter()
            .map(|(page, links)| PageEntry {
                page: page.to_string(),
                dangling: links.is_empty(),
                links: links.into_iter().map(str::to_string).collect(),
            })
            .collect();
        Self {
            corpus: CorpusSummary::from(corpus),
            dangling: pages.iter().filter(|p| p.dangling).count(),
            pages,
        }
    }
}

/// Execute `linkrank corpus`.
pub fn run_corpus(args: &CorpusArgs, output: OutputMode) -> anyhow::Result<()> {
    let corpus = crawl(&args.dir)?;
    render_mode(output, &CorpusReport::from(&corpus), write_text, write_pretty)
}

fn write_pretty(report: &CorpusReport, w: &mut dyn Write) -> io::Result<()> {
    pretty_kv(w, "pages", report.corpus.pages.to_string())?;
    pretty_kv(w, "links", report.corpus.links.to_string())?;
    pretty_kv(w, "dangling", report.dangling.to_string())?;
    pretty_kv(w, "fingerprint", &report.corpus.fingerprint)?;
    pretty_rule(w)?;
    for entry in &report.pages {
        if entry.dangling {
            writeln!(w, "  {} -> (dangling)", entry.page)?;
        } else {
            writeln!(w, "  {} -> {}", entry.page, entry.links.join(", "))?;
        }
    }
    Ok(())
}

fn write_text(report: &CorpusReport, w: &mut dyn Write) -> io::Result<()> {
    for entry in &report.pages {
        if entry.links.is_empty() {
            writeln!(w, "{}\t", entry.page)?;
        }
        for target in &entry.links {
            writeln!(w, "{}\t{target}", entry.page)?;
        }
    }
    Ok(())
}
