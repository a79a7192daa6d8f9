//! 2 つの [`LabeledMatrix`] の整列と差分判定。
//!
//! 判定は次の順に行い、最初の失敗で打ち切る。
//!
//! 1. 行ラベル集合の一致
//! 2. 左側の行を右側の行順へ並べ替え
//! 3. 列ラベル集合の一致
//! 4. 左側の列を右側の列順へ並べ替え
//! 5. 全セルの絶対誤差が許容値以内か
//!
//! 右側を参照順序とするため、左側の出力順に依存せず診断が再現する。

use crate::error::{NumericMismatch, ScenarioError, StructuralMismatch};
use crate::matrix::LabeledMatrix;

/// 既定の絶対許容誤差
pub const TOLERANCE: f64 = 1e-12;

/// 診断文の最大文字数
pub const DIAGNOSTIC_LIMIT: usize = 100;

pub const IDENTICAL: &str = "Identical results";

/// 左右の表示名と許容誤差を持つ比較器
#[derive(Debug, Clone)]
pub struct Comparator {
    left: String,
    right: String,
    tolerance: f64,
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new("left", "right")
    }
}

impl Comparator {
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            tolerance: TOLERANCE,
        }
    }

    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    pub fn compare(
        &self,
        left: &LabeledMatrix,
        right: &LabeledMatrix,
    ) -> Result<(), ScenarioError> {
        if left.row_set() != right.row_set() {
            return Err(StructuralMismatch::Rows {
                left: self.left.clone(),
                right: self.right.clone(),
                left_rows: left.rows().len(),
                right_rows: right.rows().len(),
            }
            .into());
        }
        let left = left
            .reorder_rows(right.rows())
            .ok_or_else(|| ScenarioError::Comparison("row alignment failed".to_string()))?;

        if left.column_set() != right.column_set() {
            return Err(StructuralMismatch::Columns {
                left: self.left.clone(),
                right: self.right.clone(),
                left_columns: left.columns().to_vec(),
                right_columns: right.columns().to_vec(),
            }
            .into());
        }
        let left = left
            .reorder_columns(right.columns())
            .ok_or_else(|| ScenarioError::Comparison("column alignment failed".to_string()))?;

        match self.numeric_mismatch(&left, right) {
            Some(m) => Err(m.into()),
            None => Ok(()),
        }
    }

    /// 整列済みの 2 行列を比較する
    fn numeric_mismatch(
        &self,
        left: &LabeledMatrix,
        right: &LabeledMatrix,
    ) -> Option<NumericMismatch> {
        let (_, width) = right.shape();
        let mut max_abs_diff = 0.0f64;
        let mut mismatched_cells = 0usize;
        let mut first: Option<usize> = None;

        for (i, (&a, &b)) in left.values().iter().zip(right.values()).enumerate() {
            let d = deviation(a, b);
            max_abs_diff = max_abs_diff.max(d);
            if d > self.tolerance {
                mismatched_cells += 1;
                if first.is_none() {
                    first = Some(i);
                }
            }
        }

        let i = first?;
        let (r, c) = (i / width, i % width);
        let detail = format!(
            "{mismatched_cells} of {} cells differ beyond {:e}; first at [{}, {}]: {}={:?}, {}={:?}",
            right.values().len(),
            self.tolerance,
            right.rows()[r],
            right.columns()[c],
            self.left,
            left.get(r, c),
            self.right,
            right.get(r, c),
        );
        Some(NumericMismatch {
            max_abs_diff,
            mismatched_cells,
            detail: truncate_chars(&detail, DIAGNOSTIC_LIMIT),
        })
    }
}

/// 既定の比較器（"left" / "right"、許容誤差 1e-12）で比較する
pub fn compare(left: &LabeledMatrix, right: &LabeledMatrix) -> Result<(), ScenarioError> {
    Comparator::default().compare(left, right)
}

/// 2 値の偏差。NaN 同士・同符号の無限大同士は 0、片側だけ非有限なら inf。
fn deviation(a: f64, b: f64) -> f64 {
    if a == b || (a.is_nan() && b.is_nan()) {
        return 0.0;
    }
    if a.is_finite() && b.is_finite() {
        (a - b).abs()
    } else {
        f64::INFINITY
    }
}

/// 文字境界を保って先頭 `limit` 文字に切り詰める
pub fn truncate_chars(s: &str, limit: usize) -> String {
    match s.char_indices().nth(limit) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
