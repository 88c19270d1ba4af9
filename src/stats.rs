//! Statistics Module
//!
//! 表データから派生する集計（記述統計量、欠損数、一意な値）を計算するモジュール。
//! すべての計算は読み取り専用で、入力の表を変更しません。

use std::collections::HashSet;

use crate::table::{Column, Table};
use crate::types::CellValue;

/// 記述統計量の行ラベル（出力順）
pub const SUMMARY_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// 数値列1本分の記述統計量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// 欠損していない値の数
    pub count: usize,
    pub mean: f64,
    /// 標本標準偏差（n-1で割る）
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// 値のスライスから統計量を計算
    ///
    /// 値が1つもない場合、`count`以外はすべてNaNになります。
    /// 値が1つの場合、`std`はNaNになります。
    pub fn from_values(values: &[f64]) -> Self {
        let count = values.len();
        if count == 0 {
            return Self {
                count,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                q25: f64::NAN,
                median: f64::NAN,
                q75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = sorted.iter().sum::<f64>() / count as f64;
        let std = if count < 2 {
            f64::NAN
        } else {
            let sq: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
            (sq / (count - 1) as f64).sqrt()
        };

        Self {
            count,
            mean,
            std,
            min: sorted[0],
            q25: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q75: quantile(&sorted, 0.75),
            max: sorted[count - 1],
        }
    }

    /// `SUMMARY_LABELS`と同じ順序の値
    pub fn values(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

/// ソート済みの値から線形補間で分位点を計算
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let fraction = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// 数値列ごとの記述統計量を計算
///
/// 数値列が1本もない場合は空のリストを返します。
pub fn describe(table: &Table) -> Vec<(String, Summary)> {
    table
        .numeric_columns()
        .into_iter()
        .map(|column| {
            let values: Vec<f64> = column.values.iter().filter_map(CellValue::as_f64).collect();
            (column.name.clone(), Summary::from_values(&values))
        })
        .collect()
}

/// 欠損値を含む列とその欠損数（列順）
pub fn missing_counts(table: &Table) -> Vec<(String, usize)> {
    table
        .columns()
        .iter()
        .map(|c| (c.name.clone(), c.missing_count()))
        .filter(|(_, count)| *count > 0)
        .collect()
}

/// 欠損値を除いた一意な値（初出順）
pub fn unique_values(column: &Column) -> Vec<&CellValue> {
    let mut seen = HashSet::new();
    let mut uniques = Vec::new();
    for value in &column.values {
        if !value.is_missing() && seen.insert(value.key()) {
            uniques.push(value);
        }
    }
    uniques
}

/// 列名がキーワードのいずれかを含むか（大文字小文字を区別しない）
///
/// キーワードは小文字であることを前提とします。
pub fn name_matches(name: &str, keywords: &[String]) -> bool {
    let lowered = name.to_lowercase();
    keywords.iter().any(|kw| lowered.contains(kw.as_str()))
}
