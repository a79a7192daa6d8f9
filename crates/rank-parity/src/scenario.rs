//! テストマトリクスのシナリオ定義

use std::fmt;
use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

/// 1 つのパラメータ組み合わせ（dataset × full × N）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub dataset: String,
    #[serde(default)]
    pub full: bool,
    /// 有効ユニバースサイズ。`None` は無制限
    #[serde(default, rename = "N", alias = "limit")]
    pub limit: Option<NonZeroU64>,
    pub description: String,
}

impl Scenario {
    pub fn new(
        dataset: impl Into<String>,
        full: bool,
        limit: Option<u64>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            dataset: dataset.into(),
            full,
            limit: limit.and_then(NonZeroU64::new),
            description: description.into(),
        }
    }

    /// 外部スクリプトへ渡す full 引数（"True" / "False"）
    pub fn full_arg(&self) -> &'static str {
        if self.full { "True" } else { "False" }
    }

    /// 外部スクリプトへ渡す N 引数（数値文字列 / "None"）
    pub fn limit_arg(&self) -> String {
        self.limit.map_or_else(|| "None".to_string(), |n| n.to_string())
    }

    /// dataset, full, N の 3 つの位置引数
    pub fn positional_args(&self) -> [String; 3] {
        [self.dataset.clone(), self.full_arg().to_string(), self.limit_arg()]
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dataset={}, full={}, N={}",
            self.dataset,
            self.full_arg(),
            self.limit_arg()
        )
    }
}

/// 既定のテストマトリクス。
///
/// cellCycleKO の N=6178 は参照実装のパッケージ例が `N = length(ref)` を使うことに合わせた値。
pub fn default_matrix() -> Vec<Scenario> {
    vec![
        Scenario::new("letters", false, None, "Basic letters, full=False, N=None"),
        Scenario::new("letters", true, None, "Letters, full=True, N=None"),
        Scenario::new("letters", false, Some(15), "Letters, full=False, N=15"),
        Scenario::new("letters", false, Some(20), "Letters, full=False, N=20"),
        Scenario::new("cellCycleKO", false, None, "cellCycleKO, full=False, N=None"),
        Scenario::new("cellCycleKO", true, None, "cellCycleKO, full=True, N=None"),
        Scenario::new("cellCycleKO", false, Some(6178), "cellCycleKO, full=False, N=6178"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_args_render_python_literals() {
        let s = Scenario::new("letters", true, None, "x");
        assert_eq!(s.positional_args(), ["letters", "True", "None"]);

        let s = Scenario::new("cellCycleKO", false, Some(6178), "y");
        assert_eq!(s.positional_args(), ["cellCycleKO", "False", "6178"]);
    }

    #[test]
    fn test_zero_limit_is_treated_as_unbounded() {
        let s = Scenario::new("letters", false, Some(0), "z");
        assert_eq!(s.limit, None);
        assert_eq!(s.limit_arg(), "None");
    }

    #[test]
    fn test_default_matrix_shape() {
        let m = default_matrix();
        assert_eq!(m.len(), 7);
        assert_eq!(m.iter().filter(|s| s.dataset == "letters").count(), 4);
        assert_eq!(m[6].limit.map(NonZeroU64::get), Some(6178));
        assert_eq!(m[0].to_string(), "dataset=letters, full=False, N=None");
    }
}
