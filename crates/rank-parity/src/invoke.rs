//! 外部実装の起動（位置引数プロトコル）

use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::InvocationError;
use crate::runner::{ExternalRunner, ProcessOutput};
use crate::scenario::Scenario;

/// 比較対象となる片側の実装
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Implementation {
    /// レポート表示名（例: "Python"）
    pub label: String,
    /// 実行環境コマンド（例: "python3", "Rscript"）
    pub runtime: String,
    /// base ディレクトリからの相対パスまたは絶対パス
    pub script: PathBuf,
    /// 実装が書き出す成果物のファイル名
    pub artifact: String,
}

impl Implementation {
    pub fn new(
        label: impl Into<String>,
        runtime: impl Into<String>,
        script: impl Into<PathBuf>,
        artifact: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            runtime: runtime.into(),
            script: script.into(),
            artifact: artifact.into(),
        }
    }

    pub fn python() -> Self {
        Self::new("Python", "python3", "run_python_parameterized.py", "temp_python_output.csv")
    }

    /// 参照順序側
    pub fn r() -> Self {
        Self::new("R", "Rscript", "run_r_parameterized.R", "temp_r_output.csv")
    }

    /// `<script> <dataset> <True|False> <N|None>`
    pub fn command_args(&self, scenario: &Scenario) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        args.push(self.script.to_string_lossy().into_owned());
        args.extend(scenario.positional_args());
        args
    }
}

/// 正常終了した起動の出力（成果物は読まない）
#[derive(Debug, Clone, Default)]
pub struct RawResult {
    pub stdout: String,
    pub stderr: String,
}

/// base ディレクトリを作業ディレクトリとして外部実装を起動する。
pub struct Invoker<'a> {
    runner: &'a dyn ExternalRunner,
    base_dir: PathBuf,
}

impl<'a> Invoker<'a> {
    pub fn new(runner: &'a dyn ExternalRunner, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn invoke(
        &self,
        side: &Implementation,
        scenario: &Scenario,
    ) -> Result<RawResult, InvocationError> {
        let args = side.command_args(scenario);
        debug!("{}: {} {}", side.label, side.runtime, args.join(" "));

        let output = self
            .runner
            .execute(&side.runtime, &args, &self.base_dir)
            .map_err(|source| launch_error(side, source))?;
        into_result(side, output)
    }
}

fn launch_error(side: &Implementation, source: io::Error) -> InvocationError {
    if source.kind() == io::ErrorKind::TimedOut {
        // ProcessRunner は TimedOut をタイムアウト専用に使う
        return InvocationError::TimedOut {
            label: side.label.clone(),
            detail: source.to_string(),
        };
    }
    InvocationError::Launch {
        label: side.label.clone(),
        runtime: side.runtime.clone(),
        source,
    }
}

fn into_result(side: &Implementation, output: ProcessOutput) -> Result<RawResult, InvocationError> {
    if !output.success() {
        return Err(InvocationError::Failed {
            label: side.label.clone(),
            status: output.status,
            stderr: output.stderr.trim_end().to_string(),
        });
    }
    Ok(RawResult {
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
