//! Source Module
//!
//! calamineを使用したワークブック読み込みの実装。
//! シート単位で全データをメモリに読み込み、`Table`に変換します。

use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use crate::error::InspectError;
use crate::table::Table;
use crate::types::CellValue;

/// シート単位で表を読み出せるデータソース
///
/// レポート処理はこのトレイト越しにワークブックへアクセスします。
pub trait SheetSource {
    /// ワークブック内の順序どおりのシート名
    fn sheet_names(&self) -> Vec<String>;

    /// シートを読み込み、表に変換する
    fn load_table(&mut self, sheet_name: &str) -> Result<Table, InspectError>;
}

/// calamineのワークブックをラップしたデータソース
///
/// 形式はファイル内容から自動判別されます（xlsx / xlsb / xls / ods）。
pub struct WorkbookSource<RS: Read + Seek> {
    workbook: Sheets<RS>,
}

impl WorkbookSource<BufReader<File>> {
    /// ファイルパスからワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookSource)` - ワークブックのオープンに成功した場合
    /// * `Err(InspectError::Parse)` - ファイルが存在しない、破損している、未対応の形式の場合
    pub fn open(path: impl AsRef<Path>) -> Result<Self, InspectError> {
        let workbook = open_workbook_auto(path)?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek + Clone> WorkbookSource<RS> {
    /// リーダーからワークブックを開く
    ///
    /// メモリ上のバイト列は `Cursor<Vec<u8>>` で渡してください。
    pub fn from_reader(reader: RS) -> Result<Self, InspectError> {
        let workbook = open_workbook_auto_from_rs(reader)?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek> SheetSource for WorkbookSource<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn load_table(&mut self, sheet_name: &str) -> Result<Table, InspectError> {
        if !self.workbook.sheet_names().iter().any(|n| n == sheet_name) {
            return Err(InspectError::SheetNotFound(sheet_name.to_string()));
        }

        let range = self.workbook.worksheet_range(sheet_name)?;
        let table = Table::from_rows(range_rows(&range));

        log::debug!(
            "loaded sheet '{}': {} rows x {} columns",
            sheet_name,
            table.height(),
            table.width()
        );

        Ok(table)
    }
}

/// calamineの範囲を行のリストに変換
///
/// 使用範囲がA列より右から始まる場合、左側を欠損値の列で埋めます。
fn range_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let leading_cols = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    range
        .rows()
        .map(|row| {
            let mut values = Vec::with_capacity(leading_cols + row.len());
            values.resize(leading_cols, CellValue::Missing);
            values.extend(row.iter().map(convert_cell));
            values
        })
        .collect()
}

/// calamineのセル値を`CellValue`に変換
///
/// - 整数値の浮動小数点数は整数として扱う
/// - 空文字列は欠損値として扱う
/// - エラー値・ISO形式の日時文字列は文字列として扱う
/// - 期間（duration）は日数の浮動小数点数として扱う
pub(crate) fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => float_value(*f),
        Data::String(s) if s.is_empty() => CellValue::Missing,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => CellValue::Float(dt.as_f64()),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => CellValue::DateTime(datetime),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Missing,
    }
}

// 2^53 を超える値は整数へ正確に変換できない
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

fn float_value(f: f64) -> CellValue {
    if f.is_finite() && f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT {
        CellValue::Int(f as i64)
    } else {
        CellValue::Float(f)
    }
}
