//! E2E CLI tests covering:
//! - `linkrank rank` pretty/text/JSON output over a crawled directory
//! - `linkrank sample` / `linkrank iterate` running one estimator each
//! - `linkrank corpus` link graph listing
//! - configuration layering (`linkrank.toml`, `--config`, flags)
//! - failure exits (empty corpus, bad parameters, non-convergence)
//!
//! Each test runs the binary as a subprocess against a temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the linkrank binary with quiet logs.
fn linkrank_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("linkrank"));
    cmd.env("LINKRANK_LOG", "error");
    cmd.env_remove("FORMAT");
    cmd
}

fn write_page(dir: &Path, name: &str, links: &[&str]) {
    let anchors: String = links
        .iter()
        .map(|l| format!("<li><a href=\"{l}\">{l}</a></li>\n"))
        .collect();
    let html = format!("<!DOCTYPE html>\n<html><body><ul>\n{anchors}</ul></body></html>\n");
    fs::write(dir.join(name), html).expect("write page");
}

/// 1 → 2, 2 → {1, 3}, 3 → {2, 4}, 4 → 2.
fn four_page_corpus() -> TempDir {
    let tmp = TempDir::new().expect("tempdir");
    write_page(tmp.path(), "1.html", &["2.html"]);
    write_page(tmp.path(), "2.html", &["1.html", "3.html"]);
    write_page(tmp.path(), "3.html", &["2.html", "4.html"]);
    write_page(tmp.path(), "4.html", &["2.html"]);
    tmp
}

fn run_json(args: &[&str]) -> Value {
    let output = linkrank_cmd().args(args).output().expect("linkrank should not crash");
    assert!(
        output.status.success(),
        "linkrank failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--format json should produce valid JSON")
}

fn dir_arg(tmp: &TempDir) -> &str {
    tmp.path().to_str().expect("utf8 temp path")
}

// ---------------------------------------------------------------------------
// rank
// ---------------------------------------------------------------------------

#[test]
fn rank_pretty_prints_both_sections() {
    let tmp = four_page_corpus();
    linkrank_cmd()
        .args(["rank", dir_arg(&tmp), "--seed", "1", "--format", "pretty"])
        .assert()
        .success()
        .stdout(predicate::str::contains("PageRank Results from Sampling (n = 10000)"))
        .stdout(predicate::str::contains("PageRank Results from Iteration"))
        .stdout(predicate::str::contains("  2.html: 0.4"))
        .stdout(predicate::str::contains("sum probabilities = 1.0000"));
}

#[test]
fn rank_text_is_default_when_piped() {
    let tmp = four_page_corpus();
    let output = linkrank_cmd()
        .args(["rank", dir_arg(&tmp), "--seed", "1"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    let rows: Vec<Vec<&str>> = stdout.lines().map(|l| l.split('\t').collect()).collect();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| r.len() == 3));
    assert_eq!(rows[0][..2], ["sampling", "1.html"]);
    assert_eq!(rows[4][..2], ["iteration", "1.html"]);
}

#[test]
fn rank_json_reports_corpus_and_both_estimates() {
    let tmp = four_page_corpus();
    let json = run_json(&["rank", dir_arg(&tmp), "--seed", "7", "--json"]);

    assert_eq!(json["corpus"]["pages"], 4);
    assert_eq!(json["corpus"]["links"], 6);
    assert!(json["corpus"]["fingerprint"]
        .as_str()
        .is_some_and(|f| f.starts_with("blake3:")));

    let iterated = json["iteration"]["ranks"]["2.html"].as_f64().expect("iteration rank");
    let sampled = json["sampling"]["ranks"]["2.html"].as_f64().expect("sampling rank");
    assert!((iterated - 0.4292).abs() < 0.002, "iterated={iterated}");
    assert!((sampled - iterated).abs() < 0.05, "sampled={sampled}");
    assert_eq!(json["sampling"]["seed"], 7);
    assert_eq!(json["iteration"]["dangling"], "redistribute");
}

#[test]
fn seeded_runs_are_identical() {
    let tmp = four_page_corpus();
    let args = ["sample", dir_arg(&tmp), "--seed", "99", "--samples", "500", "--json"];
    assert_eq!(run_json(&args), run_json(&args));
}

// ---------------------------------------------------------------------------
// sample / iterate
// ---------------------------------------------------------------------------

#[test]
fn sample_only_omits_iteration() {
    let tmp = four_page_corpus();
    let json = run_json(&["sample", dir_arg(&tmp), "--samples", "200", "--seed", "3", "--json"]);
    assert!(json.get("iteration").is_none());
    assert_eq!(json["sampling"]["samples"], 200);
}

#[test]
fn iterate_only_omits_sampling() {
    let tmp = four_page_corpus();
    let json = run_json(&["iterate", dir_arg(&tmp), "--json"]);
    assert!(json.get("sampling").is_none());
    assert!(json["iteration"]["sweeps"].as_u64().is_some_and(|s| s > 1));
}

#[test]
fn drop_policy_flag_reaches_solver() {
    let tmp = TempDir::new().expect("tempdir");
    write_page(tmp.path(), "a.html", &["b.html", "c.html"]);
    write_page(tmp.path(), "b.html", &["a.html"]);
    write_page(tmp.path(), "c.html", &[]);

    let json = run_json(&["iterate", dir_arg(&tmp), "--dangling", "drop", "--json"]);
    let ranks = json["iteration"]["ranks"].as_object().expect("ranks");
    let total: f64 = ranks.values().filter_map(Value::as_f64).sum();
    assert!(total < 0.5, "total={total}");
}

// ---------------------------------------------------------------------------
// corpus
// ---------------------------------------------------------------------------

#[test]
fn corpus_lists_filtered_links() {
    let tmp = TempDir::new().expect("tempdir");
    write_page(tmp.path(), "a.html", &["a.html", "b.html", "https://example.com/"]);
    write_page(tmp.path(), "b.html", &[]);
    fs::write(tmp.path().join("notes.txt"), "<a href=\"a.html\">").expect("write");

    let json = run_json(&["corpus", dir_arg(&tmp), "--json"]);
    assert_eq!(json["corpus"]["pages"], 2);
    assert_eq!(json["pages"][0]["links"], serde_json::json!(["b.html"]));
    assert_eq!(json["pages"][1]["dangling"], true);
}

// ---------------------------------------------------------------------------
// configuration
// ---------------------------------------------------------------------------

#[test]
fn local_config_file_sets_sample_count() {
    let tmp = four_page_corpus();
    fs::write(tmp.path().join("linkrank.toml"), "sample_count = 321\nseed = 5\n").expect("write");
    let json = run_json(&["sample", dir_arg(&tmp), "--json"]);
    assert_eq!(json["sampling"]["samples"], 321);
    assert_eq!(json["sampling"]["seed"], 5);
}

#[test]
fn flag_overrides_config_file() {
    let tmp = four_page_corpus();
    let config_dir = TempDir::new().expect("tempdir");
    let config = config_dir.path().join("custom.toml");
    fs::write(&config, "sample_count = 321\n").expect("write");
    let json = run_json(&[
        "sample",
        dir_arg(&tmp),
        "--config",
        config.to_str().expect("utf8"),
        "--samples",
        "123",
        "--seed",
        "1",
        "--json",
    ]);
    assert_eq!(json["sampling"]["samples"], 123);
}

// ---------------------------------------------------------------------------
// failures
// ---------------------------------------------------------------------------

#[test]
fn empty_directory_fails() {
    let tmp = TempDir::new().expect("tempdir");
    linkrank_cmd()
        .args(["rank", dir_arg(&tmp)])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corpus has no pages"));
}

#[test]
fn missing_directory_fails() {
    let tmp = TempDir::new().expect("tempdir");
    let missing = tmp.path().join("missing");
    linkrank_cmd()
        .args(["iterate", missing.to_str().expect("utf8")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing"));
}

#[test]
fn out_of_range_damping_fails() {
    let tmp = four_page_corpus();
    linkrank_cmd()
        .args(["rank", dir_arg(&tmp), "--damping", "1.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("damping_factor"));
}

#[test]
fn sweep_cap_reports_non_convergence() {
    let tmp = four_page_corpus();
    linkrank_cmd()
        .args(["iterate", dir_arg(&tmp), "--max-sweeps", "1", "--tolerance", "1e-12"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("did not converge after 1 sweeps"));
}

#[test]
fn logs_stay_off_stdout() {
    let tmp = four_page_corpus();
    let output = linkrank_cmd()
        .env("LINKRANK_LOG", "linkrank=debug")
        .args(["iterate", dir_arg(&tmp), "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    serde_json::from_slice::<Value>(&output.stdout).expect("stdout is pure JSON");
    assert!(!output.stderr.is_empty());
}
