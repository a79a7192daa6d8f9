//! テストマトリクスの逐次実行と結果集計

use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};

use log::{info, warn};
use serde::Serialize;

use crate::artifact::ArtifactStore;
use crate::compare::{Comparator, DIAGNOSTIC_LIMIT, IDENTICAL, truncate_chars};
use crate::error::ScenarioError;
use crate::invoke::{Implementation, Invoker};
use crate::loader;
use crate::report;
use crate::runner::ExternalRunner;
use crate::scenario::Scenario;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pass,
    Fail,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Pass => "PASS",
            Status::Fail => "FAIL",
        }
    }
}

/// 1 シナリオの判定結果（生成後は不変）
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonOutcome {
    #[serde(flatten)]
    pub scenario: Scenario,
    pub status: Status,
    pub message: String,
}

impl ComparisonOutcome {
    pub fn from_result(scenario: &Scenario, result: Result<(), ScenarioError>) -> Self {
        let (status, message) = match result {
            Ok(()) => (Status::Pass, IDENTICAL.to_string()),
            Err(e) => (Status::Fail, e.to_string()),
        };
        Self {
            scenario: scenario.clone(),
            status,
            message,
        }
    }

    pub fn passed(&self) -> bool {
        self.status == Status::Pass
    }
}

/// 実行全体の集計
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    outcomes: Vec<ComparisonOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: ComparisonOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[ComparisonOutcome] {
        &self.outcomes
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.passed()
    }

    pub fn failures(&self) -> impl Iterator<Item = &ComparisonOutcome> {
        self.outcomes.iter().filter(|o| !o.passed())
    }

    pub fn all_passed(&self) -> bool {
        self.failed() == 0
    }

    /// 全件 PASS なら 0、それ以外は 1
    pub fn exit_code(&self) -> u8 {
        if self.all_passed() { 0 } else { 1 }
    }
}

/// 2 実装を同一パラメータで起動し、成果物を比較するドライバ
pub struct Harness<'a> {
    invoker: Invoker<'a>,
    store: &'a dyn ArtifactStore,
    left: Implementation,
    right: Implementation,
    comparator: Comparator,
}

impl<'a> Harness<'a> {
    pub fn new(
        invoker: Invoker<'a>,
        store: &'a dyn ArtifactStore,
        left: Implementation,
        right: Implementation,
    ) -> Self {
        let comparator = Comparator::new(left.label.clone(), right.label.clone());
        Self {
            invoker,
            store,
            left,
            right,
            comparator,
        }
    }

    /// runner と base ディレクトリから組み立てる
    pub fn with_runner(
        runner: &'a dyn ExternalRunner,
        store: &'a dyn ArtifactStore,
        base_dir: impl Into<std::path::PathBuf>,
        left: Implementation,
        right: Implementation,
    ) -> Self {
        Self::new(Invoker::new(runner, base_dir), store, left, right)
    }

    pub fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// 全シナリオを宣言順に実行する。
    ///
    /// 個々のシナリオの失敗は FAIL として記録され、残りのシナリオは必ず実行される。
    /// 進捗出力先への書き込みに失敗した場合は以降の出力を止めるだけで、集計は最後まで行う。
    pub fn run(&self, scenarios: &[Scenario], out: &mut dyn Write) -> RunSummary {
        info!(
            "running {} scenarios ({} vs {}) in {}",
            scenarios.len(),
            self.left.label,
            self.right.label,
            self.invoker.base_dir().display()
        );
        let mut progress = Progress::new(out);
        progress.emit(|w| report::write_header(w, &self.left.label, &self.right.label));

        let mut summary = RunSummary::default();
        for scenario in scenarios {
            progress.emit(|w| report::write_scenario_start(w, scenario));
            let outcome = ComparisonOutcome::from_result(scenario, self.run_scenario(scenario));
            if !outcome.passed() {
                warn!("{}: {}", scenario.description, outcome.message);
            }
            progress.emit(|w| report::write_scenario_result(w, &outcome));
            summary.push(outcome);
        }

        info!("finished: {}/{} passed", summary.passed(), summary.total());
        progress.emit(|w| report::write_summary(w, &summary, &self.left.label, &self.right.label));
        summary
    }

    pub fn run_scenario(&self, scenario: &Scenario) -> Result<(), ScenarioError> {
        // 前回クラッシュ時の残骸を読まないよう起動前に消しておく
        loader::discard(self.store, &self.left.artifact);
        loader::discard(self.store, &self.right.artifact);

        let result = self
            .invoker
            .invoke(&self.left, scenario)
            .and_then(|_| self.invoker.invoke(&self.right, scenario))
            .map_err(ScenarioError::from)
            .and_then(|_| {
                panic::catch_unwind(AssertUnwindSafe(|| self.load_and_compare())).unwrap_or_else(
                    |payload| {
                        Err(ScenarioError::Comparison(truncate_chars(
                            &panic_message(payload.as_ref()),
                            DIAGNOSTIC_LIMIT,
                        )))
                    },
                )
            });

        loader::discard(self.store, &self.left.artifact);
        loader::discard(self.store, &self.right.artifact);
        result
    }

    fn load_and_compare(&self) -> Result<(), ScenarioError> {
        let left = loader::load(self.store, &self.left.artifact)?;
        let right = loader::load(self.store, &self.right.artifact)?;
        self.comparator.compare(&left, &right)
    }
}

/// 進捗出力。最初の書き込み失敗で以降の出力を止める。
struct Progress<'w> {
    out: Option<&'w mut dyn Write>,
}

impl<'w> Progress<'w> {
    fn new(out: &'w mut dyn Write) -> Self {
        Self { out: Some(out) }
    }

    fn emit(&mut self, f: impl FnOnce(&mut dyn Write) -> io::Result<()>) {
        let Some(out) = self.out.as_deref_mut() else {
            return;
        };
        if let Err(e) = f(out) {
            warn!("progress output disabled: {e}");
            self.out = None;
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
