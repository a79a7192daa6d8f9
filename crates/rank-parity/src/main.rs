//! rank_matrix の 2 実装（既定: Python / R）を同一パラメータで実行し、出力を比較する。
//!
//! # 使用例
//!
//! compare ディレクトリ（スクリプトとデータセットがある場所）を base にして既定マトリクスを実行:
//! ```shell
//! cargo run -p rank-parity --release -- --base-dir compare
//! ```
//!
//! 設定ファイルで実装・シナリオを差し替え、JSON レポートも出す:
//! ```shell
//! cargo run -p rank-parity --release -- \
//!   --config parity.toml --base-dir compare \
//!   --timeout-secs 600 --json "runs/parity/$(date +%Y%m%d_%H%M%S).json"
//! ```
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Result, bail};
use clap::Parser;

use rank_parity::report;
use rank_parity::{FsArtifactStore, Harness, HarnessConfig, ProcessRunner};

#[derive(Parser, Debug)]
#[command(author, version, about = "cross-implementation equivalence test for rank_matrix")]
struct Cli {
    /// Harness config (TOML). Defaults to the built-in Python vs R matrix
    #[arg(long)]
    config: Option<PathBuf>,

    /// Working directory for both implementations and their artifacts
    #[arg(long, default_value = ".")]
    base_dir: PathBuf,

    /// Per-invocation timeout in seconds (overrides config; 0 disables)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Print the scenario matrix and exit
    #[arg(long)]
    list: bool,
}

fn main() -> Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => HarnessConfig::load(path)?,
        None => HarnessConfig::default(),
    };
    if cli.timeout_secs.is_some() {
        cfg.timeout_secs = cli.timeout_secs;
    }

    if cli.list {
        report::write_matrix(&mut io::stdout().lock(), &cfg.scenarios)?;
        return Ok(ExitCode::SUCCESS);
    }

    if !cli.base_dir.is_dir() {
        bail!("base directory not found: {}", cli.base_dir.display());
    }

    let timeout: Option<Duration> = cfg.timeout();
    let runner = ProcessRunner::with_timeout(timeout);
    let store = FsArtifactStore::new(&cli.base_dir);
    let harness = Harness::with_runner(
        &runner,
        &store,
        &cli.base_dir,
        cfg.left.clone(),
        cfg.right.clone(),
    );

    let summary = harness.run(&cfg.scenarios, &mut io::stdout().lock());

    if let Some(path) = &cli.json {
        report::write_json_report(
            path,
            &summary,
            &cfg.left.label,
            &cfg.right.label,
            harness.comparator().tolerance(),
        )?;
        log::info!("json report: {}", path.display());
    }

    Ok(ExitCode::from(summary.exit_code()))
}
