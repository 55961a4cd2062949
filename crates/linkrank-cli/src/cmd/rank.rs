//! `linkrank rank|sample|iterate`: crawl a directory and estimate PageRank.

use std::io::{self, Write};

use linkrank_core::corpus::crawl;
use linkrank_core::{Corpus, DanglingPolicy, RankConfig};
use linkrank_rank::{RankEstimate, iterate, sample};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::info;

use super::RankArgs;
use crate::output::{OutputMode, pretty_estimate, render_mode, text_estimate};

/// Which estimators a command runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Both,
    Sampling,
    Iteration,
}

impl Method {
    const fn samples(self) -> bool {
        matches!(self, Self::Both | Self::Sampling)
    }

    const fn iterates(self) -> bool {
        matches!(self, Self::Both | Self::Iteration)
    }
}

/// Identity of the ranked corpus.
#[derive(Debug, Serialize)]
pub struct CorpusSummary {
    pub pages: usize,
    pub links: usize,
    pub fingerprint: String,
}

impl From<&Corpus> for CorpusSummary {
    fn from(corpus: &Corpus) -> Self {
        Self {
            pages: corpus.page_count(),
            links: corpus.link_count(),
            fingerprint: corpus.content_hash().to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SamplingSection {
    pub samples: usize,
    pub damping_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub ranks: RankEstimate,
}

#[derive(Debug, Serialize)]
pub struct IterationSection {
    pub sweeps: usize,
    pub max_delta: f64,
    pub damping_factor: f64,
    pub convergence_tolerance: f64,
    pub dangling: DanglingPolicy,
    pub ranks: RankEstimate,
}

/// Report payload for the ranking commands.
#[derive(Debug, Serialize)]
pub struct RankReport {
    pub corpus: CorpusSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampling: Option<SamplingSection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iteration: Option<IterationSection>,
}

/// Execute a ranking command.
pub fn run_rank(args: &RankArgs, method: Method, output: OutputMode) -> anyhow::Result<()> {
    let config = args.resolve_config()?;
    let corpus = crawl(&args.dir)?;
    let report = rank_corpus(&corpus, &config, method)?;
    render_mode(output, &report, write_text, write_pretty)
}

/// Run the requested estimators over an already crawled corpus.
pub fn rank_corpus(
    corpus: &Corpus,
    config: &RankConfig,
    method: Method,
) -> anyhow::Result<RankReport> {
    let sampling = if method.samples() {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let ranks = sample(corpus, config.damping_factor, config.sample_count, &mut rng)?;
        Some(SamplingSection {
            samples: config.sample_count,
            damping_factor: config.damping_factor,
            seed: config.seed,
            ranks,
        })
    } else {
        None
    };

    let iteration = if method.iterates() {
        let report = iterate(corpus, config)?;
        Some(IterationSection {
            sweeps: report.sweeps,
            max_delta: report.max_delta,
            damping_factor: config.damping_factor,
            convergence_tolerance: config.convergence_tolerance,
            dangling: config.dangling,
            ranks: report.estimate,
        })
    } else {
        None
    };

    info!(pages = corpus.page_count(), ?method, "ranking complete");

    Ok(RankReport {
        corpus: CorpusSummary::from(corpus),
        sampling,
        iteration,
    })
}

fn write_pretty(report: &RankReport, w: &mut dyn Write) -> io::Result<()> {
    if let Some(sampling) = &report.sampling {
        let heading = format!("PageRank Results from Sampling (n = {})", sampling.samples);
        pretty_estimate(w, &heading, &sampling.ranks)?;
    }
    if let Some(iteration) = &report.iteration {
        if report.sampling.is_some() {
            writeln!(w)?;
        }
        pretty_estimate(w, "PageRank Results from Iteration", &iteration.ranks)?;
    }
    Ok(())
}

fn write_text(report: &RankReport, w: &mut dyn Write) -> io::Result<()> {
    if let Some(sampling) = &report.sampling {
        text_estimate(w, "sampling", &sampling.ranks)?;
    }
    if let Some(iteration) = &report.iteration {
        text_estimate(w, "iteration", &iteration.ranks)?;
    }
    Ok(())
}
