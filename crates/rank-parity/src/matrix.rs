//! 行ラベル・列ラベル付きの数値行列と CSV 入出力

use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};

/// 行・列ラベル付き 2 次元数値表（row-major）。
///
/// 行ラベル・列ラベルはそれぞれ一意。比較時は集合として扱う。
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledMatrix {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Vec<f64>,
}

/// 行列構築時の形状エラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    #[error("duplicate row label '{0}'")]
    DuplicateRow(String),
    #[error("duplicate column label '{0}'")]
    DuplicateColumn(String),
    #[error("expected {expected} cells, got {actual}")]
    Size { expected: usize, actual: usize },
}

/// CSV 解析エラー（LoadError へ変換される）
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("no header row")]
    NoHeader,
    #[error("no value columns")]
    NoColumns,
    #[error("no data rows")]
    NoRows,
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("cell [{row}, {column}] is not a number: '{raw}'")]
    Number { row: String, column: String, raw: String },
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl LabeledMatrix {
    pub fn new(
        rows: Vec<String>,
        columns: Vec<String>,
        values: Vec<f64>,
    ) -> Result<Self, ShapeError> {
        if let Some(dup) = first_duplicate(&rows) {
            return Err(ShapeError::DuplicateRow(dup));
        }
        if let Some(dup) = first_duplicate(&columns) {
            return Err(ShapeError::DuplicateColumn(dup));
        }
        let expected = rows.len() * columns.len();
        if values.len() != expected {
            return Err(ShapeError::Size {
                expected,
                actual: values.len(),
            });
        }
        Ok(Self {
            rows,
            columns,
            values,
        })
    }

    /// 単一列の行列を作る（テストや小さな成果物向け）
    pub fn from_column(column: &str, cells: &[(&str, f64)]) -> Result<Self, ShapeError> {
        Self::new(
            cells.iter().map(|(r, _)| r.to_string()).collect(),
            vec![column.to_string()],
            cells.iter().map(|&(_, v)| v).collect(),
        )
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.columns.len())
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[row * self.columns.len() + column]
    }

    pub fn row_set(&self) -> HashSet<&str> {
        self.rows.iter().map(String::as_str).collect()
    }

    pub fn column_set(&self) -> HashSet<&str> {
        self.columns.iter().map(String::as_str).collect()
    }

    /// 行を `order` の並びに並べ替える。`order` がこの行列の行集合と一致しなければ `None`。
    pub fn reorder_rows(&self, order: &[String]) -> Option<Self> {
        let index = positions(&self.rows);
        if order.len() != self.rows.len() {
            return None;
        }
        let width = self.columns.len();
        let mut values = Vec::with_capacity(self.values.len());
        for label in order {
            let r = *index.get(label.as_str())?;
            values.extend_from_slice(&self.values[r * width..(r + 1) * width]);
        }
        Some(Self {
            rows: order.to_vec(),
            columns: self.columns.clone(),
            values,
        })
    }

    /// 列を `order` の並びに並べ替える。
    pub fn reorder_columns(&self, order: &[String]) -> Option<Self> {
        let index = positions(&self.columns);
        if order.len() != self.columns.len() {
            return None;
        }
        let picks: Vec<usize> = order
            .iter()
            .map(|label| index.get(label.as_str()).copied())
            .collect::<Option<_>>()?;
        let mut values = Vec::with_capacity(self.values.len());
        for r in 0..self.rows.len() {
            values.extend(picks.iter().map(|&c| self.get(r, c)));
        }
        Some(Self {
            rows: self.rows.clone(),
            columns: order.to_vec(),
            values,
        })
    }

    /// 先頭列を行ラベル、ヘッダ行を列名とする CSV を読む。
    ///
    /// 空セルと `NA` は NaN として読む（pandas / R の欠損表現）。
    pub fn read_csv<R: Read>(reader: R) -> Result<Self, ParseError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(false)
            .from_reader(reader);
        let mut records = rdr.records();

        let header = match records.next() {
            Some(rec) => rec?,
            None => return Err(ParseError::NoHeader),
        };
        let columns: Vec<String> = header.iter().skip(1).map(str::to_string).collect();
        if columns.is_empty() {
            return Err(ParseError::NoColumns);
        }

        let mut rows = Vec::new();
        let mut values = Vec::new();
        for rec in records {
            let rec = rec?;
            let label = rec.get(0).unwrap_or_default().to_string();
            for (raw, column) in rec.iter().skip(1).zip(&columns) {
                let v = parse_cell(raw).ok_or_else(|| ParseError::Number {
                    row: label.clone(),
                    column: column.clone(),
                    raw: raw.to_string(),
                })?;
                values.push(v);
            }
            rows.push(label);
        }
        if rows.is_empty() {
            return Err(ParseError::NoRows);
        }
        Ok(Self::new(rows, columns, values)?)
    }

    /// pandas の `to_csv()` と同じ形（先頭ヘッダセルは空）で書き出す。
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut w = csv::Writer::from_writer(writer);
        w.write_record(std::iter::once("").chain(self.columns.iter().map(String::as_str)))?;
        for (r, label) in self.rows.iter().enumerate() {
            let mut record = Vec::with_capacity(self.columns.len() + 1);
            record.push(label.clone());
            for c in 0..self.columns.len() {
                // `{:?}` は f64 を往復可能な最短表現で出す
                record.push(format!("{:?}", self.get(r, c)));
            }
            w.write_record(&record)?;
        }
        w.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

fn parse_cell(raw: &str) -> Option<f64> {
    let t = raw.trim();
    if t.is_empty() || t == "NA" {
        return Some(f64::NAN);
    }
    t.parse::<f64>().ok()
}

fn positions(labels: &[String]) -> HashMap<&str, usize> {
    labels.iter().enumerate().map(|(i, l)| (l.as_str(), i)).collect()
}

fn first_duplicate(labels: &[String]) -> Option<String> {
    let mut seen = HashSet::new();
    labels.iter().find(|l| !seen.insert(l.as_str())).cloned()
}
