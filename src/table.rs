//! Table Module
//!
//! シートの内容を列指向の表構造として保持するモジュール。
//! ヘッダー行の解釈、列名の重複解消、シートを跨いだ結合を提供します。

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;

use crate::types::{CellValue, Dtype};

/// 名前付きの列
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// 列名
    pub name: String,

    /// 列の値（行順）
    pub values: Vec<CellValue>,
}

impl Column {
    /// 新しい列を生成
    pub fn new(name: impl Into<String>, values: Vec<CellValue>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// 観測値から推論したデータ型
    pub fn dtype(&self) -> Dtype {
        Dtype::infer(&self.values)
    }

    /// 欠損値の数
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_missing()).count()
    }
}

/// シート1枚分の表データ
///
/// すべての列は同じ長さ（行数）を持ちます。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    height: usize,
}

impl Table {
    /// 列のリストから表を構築
    ///
    /// 長さが揃っていない列は欠損値で末尾を埋めます。
    pub fn from_columns(mut columns: Vec<Column>) -> Self {
        let height = columns.iter().map(|c| c.values.len()).max().unwrap_or(0);
        for column in &mut columns {
            column.values.resize(height, CellValue::Missing);
        }
        Self { columns, height }
    }

    /// 行のリストから表を構築
    ///
    /// 最初の空でない行をヘッダー行として扱い、以降の空行はスキップします。
    ///
    /// # ヘッダーの規則
    ///
    /// - 空のヘッダーセルは `Unnamed: <列番号>` になる
    /// - 数値などの非文字列ヘッダーは表示文字列を列名とする
    /// - 重複する列名には `.1`, `.2`, ... が付与される
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut rows = rows
            .into_iter()
            .filter(|row| row.iter().any(|v| !v.is_missing()));

        let header = match rows.next() {
            Some(header) => header,
            None => return Self::default(),
        };

        let names = dedupe_names(
            (0..width)
                .map(|idx| header_name(header.get(idx), idx))
                .collect(),
        );

        let mut columns: Vec<Column> = names
            .into_iter()
            .map(|name| Column::new(name, Vec::new()))
            .collect();

        let mut height = 0;
        for row in rows {
            let mut row = row.into_iter();
            for column in &mut columns {
                column.values.push(row.next().unwrap_or(CellValue::Missing));
            }
            height += 1;
        }

        Self { columns, height }
    }

    /// 行数
    pub fn height(&self) -> usize {
        self.height
    }

    /// 列数
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// 行が1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.height == 0
    }

    /// すべての列
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// 名前で列を取得
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// 先頭 `n` 行だけを持つ表
    pub fn head(&self, n: usize) -> Table {
        let height = self.height.min(n);
        let columns = self
            .columns
            .iter()
            .map(|c| Column::new(c.name.clone(), c.values[..height].to_vec()))
            .collect();
        Self { columns, height }
    }

    /// 数値型の列
    pub fn numeric_columns(&self) -> Vec<&Column> {
        self.columns
            .iter()
            .filter(|c| c.dtype().is_numeric())
            .collect()
    }

    /// すべての行に同じ文字列を持つ列を付与する
    ///
    /// 同名の列が既に存在する場合は置き換えます。
    pub fn with_constant_column(mut self, name: &str, value: &str) -> Table {
        let values = vec![CellValue::Text(value.to_string()); self.height];
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => column.values = values,
            None => self.columns.push(Column::new(name, values)),
        }
        self
    }

    /// 複数の表を行方向に連結する
    ///
    /// 列は初出順の和集合となり、存在しないセルは欠損値で埋められます。
    /// 行順は入力の順序と各表内の順序を保持します。
    pub fn concat(tables: Vec<Table>) -> Table {
        let mut merged: IndexMap<String, Vec<CellValue>> = IndexMap::new();
        let mut height = 0;

        for table in tables {
            for column in table.columns {
                merged
                    .entry(column.name)
                    .or_insert_with(|| vec![CellValue::Missing; height])
                    .extend(column.values);
            }
            height += table.height;
            for values in merged.values_mut() {
                values.resize(height, CellValue::Missing);
            }
        }

        let columns = merged
            .into_iter()
            .map(|(name, values)| Column::new(name, values))
            .collect();
        Self { columns, height }
    }
}

/// ヘッダーセルから列名を決定
fn header_name(cell: Option<&CellValue>, idx: usize) -> String {
    match cell {
        None | Some(CellValue::Missing) => format!("Unnamed: {}", idx),
        Some(CellValue::Text(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// 重複する列名に連番の接尾辞を付与
fn dedupe_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut result = Vec::with_capacity(names.len());

    for name in names {
        let mut candidate = name.clone();
        while seen.contains(&candidate) {
            let count = counts.entry(name.clone()).or_insert(0);
            *count += 1;
            candidate = format!("{}.{}", name, count);
        }
        seen.insert(candidate.clone());
        result.push(candidate);
    }

    result
}
