//! Render Module
//!
//! 表データを固定幅のテキスト表として出力するモジュール。
//! 先頭列に行ラベル（行番号または統計量名）を左揃えで、データ列を右揃えで出力します。

use std::borrow::Cow;
use std::io::Write;

use chrono::Timelike;
use unicode_width::UnicodeWidthStr;

use crate::error::InspectError;
use crate::stats::{Summary, SUMMARY_LABELS};
use crate::table::Table;
use crate::types::{CellValue, Dtype, DATETIME_FORMAT};

/// 列間の区切り
const COLUMN_GAP: &str = "  ";

/// 浮動小数点数の最大表示桁数（小数部）
const MAX_PRECISION: usize = 6;

/// 出力用に文字列化されたテキスト表
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextGrid {
    /// 列見出し
    header: Vec<String>,

    /// 行ラベルと各セルの表示文字列
    rows: Vec<(String, Vec<String>)>,
}

impl TextGrid {
    /// 表から行番号付きのテキスト表を構築
    pub fn from_table(table: &Table) -> Self {
        let header = table
            .columns()
            .iter()
            .map(|c| escape_control(&c.name).into_owned())
            .collect();
        let formatted: Vec<Vec<String>> = table
            .columns()
            .iter()
            .map(|c| format_column(&c.values, c.dtype()))
            .collect();

        let rows = (0..table.height())
            .map(|row_idx| {
                let cells = formatted.iter().map(|col| col[row_idx].clone()).collect();
                (row_idx.to_string(), cells)
            })
            .collect();

        Self { header, rows }
    }

    /// 記述統計量からテキスト表を構築
    ///
    /// 行は`SUMMARY_LABELS`、列は数値列に対応します。
    pub fn from_summaries(summaries: &[(String, Summary)]) -> Self {
        let header = summaries.iter().map(|(name, _)| name.clone()).collect();
        let formatted: Vec<Vec<String>> = summaries
            .iter()
            .map(|(_, summary)| format_floats(&summary.values()))
            .collect();

        let rows = SUMMARY_LABELS
            .iter()
            .enumerate()
            .map(|(row_idx, label)| {
                let cells = formatted.iter().map(|col| col[row_idx].clone()).collect();
                (label.to_string(), cells)
            })
            .collect();

        Self { header, rows }
    }

    /// テキスト表を出力
    ///
    /// 幅は表示幅（全角文字は2）で計算します。
    pub fn render<W: Write>(&self, writer: &mut W) -> Result<(), InspectError> {
        let label_width = self
            .rows
            .iter()
            .map(|(label, _)| label.width())
            .max()
            .unwrap_or(0);
        let col_widths = self.calculate_column_widths();

        write!(writer, "{}", " ".repeat(label_width))?;
        for (name, &width) in self.header.iter().zip(&col_widths) {
            write!(writer, "{}{}", COLUMN_GAP, pad_left(name, width))?;
        }
        writeln!(writer)?;

        for (label, cells) in &self.rows {
            write!(writer, "{}", pad_right(label, label_width))?;
            for (cell, &width) in cells.iter().zip(&col_widths) {
                write!(writer, "{}{}", COLUMN_GAP, pad_left(cell, width))?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }

    /// 列幅を計算（見出しとセルの最大表示幅）
    fn calculate_column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.width()).collect();

        for (_, cells) in &self.rows {
            for (col_idx, cell) in cells.iter().enumerate() {
                widths[col_idx] = widths[col_idx].max(cell.width());
            }
        }

        widths
    }
}

fn pad_left(s: &str, width: usize) -> String {
    format!("{}{}", " ".repeat(width.saturating_sub(s.width())), s)
}

fn pad_right(s: &str, width: usize) -> String {
    format!("{}{}", s, " ".repeat(width.saturating_sub(s.width())))
}

/// 列の値をデータ型に応じて文字列化
pub(crate) fn format_column(values: &[CellValue], dtype: Dtype) -> Vec<String> {
    match dtype {
        Dtype::Float64 => {
            let floats: Vec<f64> = values
                .iter()
                .map(|v| v.as_f64().unwrap_or(f64::NAN))
                .collect();
            format_floats(&floats)
        }
        Dtype::DateTime => format_datetimes(values),
        _ => values
            .iter()
            .map(|v| escape_control(&v.to_string()).into_owned())
            .collect(),
    }
}

/// 改行・復帰・タブを`\n`・`\r`・`\t`に置き換える
///
/// 1つのセルが必ず1行に収まるようにします。
pub(crate) fn escape_control(s: &str) -> Cow<'_, str> {
    if !s.contains(&['\n', '\r', '\t'][..]) {
        return Cow::Borrowed(s);
    }

    let mut escaped = String::with_capacity(s.len() + 4);
    for ch in s.chars() {
        match ch {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}

/// 浮動小数点数の列を共通の桁数で文字列化
///
/// 小数部は1〜6桁で、列内のすべての値を6桁精度で表現できる最小の桁数を使用します。
pub(crate) fn format_floats(values: &[f64]) -> Vec<String> {
    let precision = values
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| decimals_needed(*v))
        .max()
        .unwrap_or(1)
        .max(1);

    values
        .iter()
        .map(|v| {
            if v.is_nan() {
                "NaN".to_string()
            } else if v.is_infinite() {
                let sign = if *v > 0.0 { "" } else { "-" };
                format!("{}inf", sign)
            } else {
                format!("{:.*}", precision, v)
            }
        })
        .collect()
}

/// 6桁精度で表したときに必要な小数部の桁数
fn decimals_needed(v: f64) -> usize {
    let fixed = format!("{:.*}", MAX_PRECISION, v);
    match fixed.split_once('.') {
        Some((_, fraction)) => fraction.trim_end_matches('0').len(),
        None => 0,
    }
}

/// 日時の列を文字列化
///
/// すべての値が0時0分0秒であれば日付のみを出力します。欠損値は`NaT`です。
fn format_datetimes(values: &[CellValue]) -> Vec<String> {
    let date_only = values.iter().all(|v| match v {
        CellValue::DateTime(dt) => dt.num_seconds_from_midnight() == 0 && dt.nanosecond() == 0,
        _ => true,
    });
    let format = if date_only { "%Y-%m-%d" } else { DATETIME_FORMAT };

    values
        .iter()
        .map(|v| match v {
            CellValue::DateTime(dt) => dt.format(format).to_string(),
            CellValue::Missing => "NaT".to_string(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn render_to_string(grid: &TextGrid) -> String {
        let mut output = Vec::new();
        grid.render(&mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_format_floats_common_precision() {
        assert_eq!(format_floats(&[1.0, 2.0]), vec!["1.0", "2.0"]);
        assert_eq!(format_floats(&[1.5, 2.25]), vec!["1.50", "2.25"]);
        assert_eq!(
            format_floats(&[3.0, 1.5275252316519468]),
            vec!["3.000000", "1.527525"]
        );
    }

    #[test]
    fn test_format_floats_nan_and_inf() {
        assert_eq!(
            format_floats(&[f64::NAN, 1.0, f64::INFINITY, f64::NEG_INFINITY]),
            vec!["NaN", "1.0", "inf", "-inf"]
        );
        assert_eq!(format_floats(&[f64::NAN]), vec!["NaN"]);
    }

    #[test]
    fn test_format_column_float_with_missing() {
        let values = vec![CellValue::Int(1), CellValue::Missing, CellValue::Int(3)];
        assert_eq!(
            format_column(&values, Dtype::Float64),
            vec!["1.0", "NaN", "3.0"]
        );
    }

    #[test]
    fn test_format_column_object() {
        let values = vec![text("a"), CellValue::Int(2), CellValue::Missing];
        assert_eq!(format_column(&values, Dtype::Object), vec!["a", "2", "NaN"]);
    }

    #[test]
    fn test_escape_control() {
        assert_eq!(escape_control("plain"), "plain");
        assert!(matches!(escape_control("plain"), Cow::Borrowed(_)));
        assert_eq!(escape_control("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_control("a\r\nb\tc"), "a\\r\\nb\\tc");
    }

    #[test]
    fn test_render_multiline_cell_stays_on_one_row() {
        let table = Table::from_columns(vec![Column::new(
            "name",
            vec![text("line1\nline2"), text("x")],
        )]);
        let rendered = render_to_string(&TextGrid::from_table(&table));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(
            lines,
            vec!["           name", "0  line1\\nline2", "1             x"]
        );
    }

    #[test]
    fn test_format_datetimes() {
        let midnight = NaiveDate::from_ymd_opt(2024, 2, 29)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let afternoon = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(15, 30, 0)
            .unwrap();

        let dates = vec![CellValue::DateTime(midnight), CellValue::Missing];
        assert_eq!(
            format_column(&dates, Dtype::DateTime),
            vec!["2024-02-29", "NaT"]
        );

        let mixed = vec![CellValue::DateTime(midnight), CellValue::DateTime(afternoon)];
        assert_eq!(
            format_column(&mixed, Dtype::DateTime),
            vec!["2024-02-29 00:00:00", "2024-03-01 15:30:00"]
        );
    }

    #[test]
    fn test_render_table_alignment() {
        let table = Table::from_columns(vec![
            Column::new("name", vec![text("a"), text("long")]),
            Column::new("n", vec![CellValue::Int(1), CellValue::Int(22)]),
        ]);

        let rendered = render_to_string(&TextGrid::from_table(&table));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines, vec!["   name   n", "0     a   1", "1  long  22"]);
    }

    #[test]
    fn test_render_uses_display_width() {
        let table = Table::from_columns(vec![Column::new("品名", vec![text("ab")])]);
        let rendered = render_to_string(&TextGrid::from_table(&table));
        let lines: Vec<&str> = rendered.lines().collect();

        // "品名"は表示幅4
        assert_eq!(lines[0], "   品名");
        assert_eq!(lines[1], "0    ab");
    }

    #[test]
    fn test_render_row_labels_are_indices() {
        let table = Table::from_columns(vec![Column::new(
            "v",
            (0..12).map(CellValue::Int).collect(),
        )]);
        let rendered = render_to_string(&TextGrid::from_table(&table));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 13);
        assert!(lines[1].starts_with("0 "));
        assert!(lines[12].starts_with("11"));
    }

    #[test]
    fn test_render_summaries() {
        let summaries = vec![(
            "qty".to_string(),
            Summary::from_values(&[1.0, 2.0, 3.0]),
        )];
        let rendered = render_to_string(&TextGrid::from_summaries(&summaries));
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 9);
        assert_eq!(lines[0], "       qty");
        assert_eq!(lines[1], "count  3.0");
        assert_eq!(lines[2], "mean   2.0");
        assert_eq!(lines[3], "std    1.0");
        assert_eq!(lines[5], "25%    1.5");
        assert_eq!(lines[8], "max    3.0");
    }
}
