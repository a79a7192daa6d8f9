//! Error types for a single scenario run
//!
//! Every variant is recovered at scenario level and rendered into a FAIL
//! outcome; only [`ConfigError`] is fatal to the whole run.

use std::path::PathBuf;

/// 外部実装の起動失敗
#[derive(Debug, thiserror::Error)]
pub enum InvocationError {
    /// runtime コマンド自体を起動できなかった
    #[error("{label} error: failed to launch `{runtime}`: {source}")]
    Launch {
        label: String,
        runtime: String,
        #[source]
        source: std::io::Error,
    },

    /// 非ゼロ終了（シグナル終了時は status = None）
    #[error("{label} error: {stderr}")]
    Failed {
        label: String,
        status: Option<i32>,
        stderr: String,
    },

    #[error("{label} error: {detail}")]
    TimedOut { label: String, detail: String },
}

/// 成果物の読み込み失敗
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("artifact {path} not found")]
    Missing { path: PathBuf },

    #[error("artifact {path} is empty ({reason})")]
    Empty { path: PathBuf, reason: &'static str },

    #[error("artifact {path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 行ラベル集合 / 列ラベル集合の不一致
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StructuralMismatch {
    #[error("Row indices don't match! {left} has {left_rows} rows, {right} has {right_rows} rows")]
    Rows {
        left: String,
        right: String,
        left_rows: usize,
        right_rows: usize,
    },

    #[error("Column names don't match! {left}: {left_columns:?}, {right}: {right_columns:?}")]
    Columns {
        left: String,
        right: String,
        left_columns: Vec<String>,
        right_columns: Vec<String>,
    },
}

/// 許容誤差を超えた数値差
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Values differ (max diff: {}): {detail}", sci(.max_abs_diff))]
pub struct NumericMismatch {
    /// 全セル中の最大絶対偏差（片側のみ非有限なら inf）
    pub max_abs_diff: f64,
    pub mismatched_cells: usize,
    /// 診断文（[`crate::compare::DIAGNOSTIC_LIMIT`] 文字で切り詰め済み）
    pub detail: String,
}

/// `%.2e` 形式（指数部は符号付き 2 桁以上）。非有限値は `inf` / `nan`。
fn sci(v: &f64) -> String {
    let s = format!("{v:.2e}");
    let Some((mantissa, exp)) = s.split_once('e') else {
        return s;
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return s;
    };
    let sign = if exp < 0 { '-' } else { '+' };
    format!("{mantissa}e{sign}{:02}", exp.abs())
}

/// 1 シナリオ内で発生しうる失敗の全種別
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error(transparent)]
    Invocation(#[from] InvocationError),

    #[error("Load error: {0}")]
    Load(#[from] LoadError),

    #[error(transparent)]
    StructuralMismatch(#[from] StructuralMismatch),

    #[error(transparent)]
    NumericMismatch(#[from] NumericMismatch),

    /// load/compare 中の想定外の失敗（panic を含む）
    #[error("Comparison error: {0}")]
    Comparison(String),
}

/// 設定の読み込み・検証エラー（run 全体を中断する唯一の種別）
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("scenario list is empty")]
    NoScenarios,

    #[error("scenario {index} has an empty dataset identifier")]
    EmptyDataset { index: usize },

    #[error("side label must not be empty")]
    EmptyLabel,

    #[error("both sides write the same artifact `{0}`")]
    ArtifactCollision(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_max_diff_uses_two_digit_exponent() {
        assert_eq!(sci(&1.0e-7), "1.00e-07");
        assert_eq!(sci(&0.5), "5.00e-01");
        assert_eq!(sci(&0.0), "0.00e+00");
        assert_eq!(sci(&1.5e123), "1.50e+123");
        assert_eq!(sci(&f64::INFINITY), "inf");
        let m = NumericMismatch {
            max_abs_diff: 2.5e-3,
            mismatched_cells: 1,
            detail: "x".into(),
        };
        assert_eq!(m.to_string(), "Values differ (max diff: 2.50e-03): x");
    }
}
