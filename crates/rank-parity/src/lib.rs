//! rank_matrix の 2 実装を同一パラメータで駆動し、出力表の構造・数値の一致を検証するハーネス。
//!
//! 構成（葉から順に）:
//!
//! - [`runner`] / [`invoke`]: 外部実装の起動と位置引数プロトコル
//! - [`artifact`] / [`loader`] / [`matrix`]: 一時成果物 CSV の読み込み
//! - [`compare`]: 行・列の整列と許容誤差付き数値比較
//! - [`driver`] / [`report`]: テストマトリクスの逐次実行と集計・表示

pub mod artifact;
pub mod compare;
pub mod config;
pub mod driver;
pub mod error;
pub mod invoke;
pub mod loader;
pub mod matrix;
pub mod report;
pub mod runner;
pub mod scenario;

pub use artifact::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};
pub use compare::{Comparator, TOLERANCE, compare};
pub use config::HarnessConfig;
pub use driver::{ComparisonOutcome, Harness, RunSummary, Status};
pub use error::{
    ConfigError, InvocationError, LoadError, NumericMismatch, ScenarioError, StructuralMismatch,
};
pub use invoke::{Implementation, Invoker, RawResult};
pub use loader::load;
pub use matrix::LabeledMatrix;
pub use runner::{ExternalRunner, ProcessOutput, ProcessRunner};
pub use scenario::{Scenario, default_matrix};
