//! 進捗表示・最終サマリ・JSON レポートの出力

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;

use crate::driver::{ComparisonOutcome, RunSummary, Status};
use crate::scenario::Scenario;

const RULE_WIDTH: usize = 80;

fn rule(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))
}

pub fn write_header(out: &mut dyn Write, left: &str, right: &str) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "COMPREHENSIVE {left} vs {right} COMPARISON TEST")?;
    rule(out)?;
    writeln!(out)
}

pub fn write_scenario_start(out: &mut dyn Write, scenario: &Scenario) -> io::Result<()> {
    writeln!(out, "Testing: {}", scenario.description)?;
    writeln!(out, "  Parameters: {scenario}")?;
    out.flush()
}

pub fn write_scenario_result(out: &mut dyn Write, outcome: &ComparisonOutcome) -> io::Result<()> {
    let mark = match outcome.status {
        Status::Pass => '✓',
        Status::Fail => '✗',
    };
    writeln!(out, "  {mark} {}: {}", outcome.status.label(), outcome.message)?;
    writeln!(out)?;
    out.flush()
}

pub fn write_summary(
    out: &mut dyn Write,
    summary: &RunSummary,
    left: &str,
    right: &str,
) -> io::Result<()> {
    rule(out)?;
    writeln!(out, "SUMMARY")?;
    rule(out)?;
    writeln!(out, "Total tests: {}", summary.total())?;
    writeln!(out, "Passed: {}", summary.passed())?;
    writeln!(out, "Failed: {}", summary.failed())?;
    writeln!(out)?;

    if summary.failed() > 0 {
        writeln!(out, "Failed tests:")?;
        for o in summary.failures() {
            writeln!(out, "  - {}", o.scenario.description)?;
            writeln!(out, "    {}", o.message)?;
        }
        writeln!(out)?;
    }

    if summary.all_passed() {
        writeln!(out, "ALL TESTS PASSED! {left} and {right} implementations are identical.")?;
    } else {
        writeln!(out, "{} test(s) failed. See details above.", summary.failed())?;
    }
    rule(out)?;
    out.flush()
}

/// シナリオ一覧（`--list`）
pub fn write_matrix(out: &mut dyn Write, scenarios: &[Scenario]) -> io::Result<()> {
    for (i, s) in scenarios.iter().enumerate() {
        writeln!(out, "{:>3}. {}  [{s}]", i + 1, s.description)?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    timestamp: String,
    left: &'a str,
    right: &'a str,
    tolerance: f64,
    total: usize,
    passed: usize,
    failed: usize,
    outcomes: &'a [ComparisonOutcome],
}

/// 機械可読な run レポートを書き出す
pub fn write_json_report(
    path: &Path,
    summary: &RunSummary,
    left: &str,
    right: &str,
    tolerance: f64,
) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);
    let report = JsonReport {
        kind: "summary",
        timestamp: Local::now().to_rfc3339(),
        left,
        right,
        tolerance,
        total: summary.total(),
        passed: summary.passed(),
        failed: summary.failed(),
        outcomes: summary.outcomes(),
    };
    serde_json::to_writer_pretty(&mut w, &report)?;
    w.write_all(b"\n")?;
    w.flush()?;
    Ok(())
}
