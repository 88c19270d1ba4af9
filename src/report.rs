//! Report Module
//!
//! シート単位のレポートと結合分析の各セクションを出力するモジュール。

use std::io::Write;

use crate::error::InspectError;
use crate::render::{escape_control, TextGrid};
use crate::stats::{describe, missing_counts, name_matches, unique_values};
use crate::table::Table;
use crate::types::Dtype;

/// 大見出しの罫線
pub(crate) fn major_rule() -> String {
    "=".repeat(50)
}

/// 小見出しの罫線
pub(crate) fn minor_rule() -> String {
    "-".repeat(40)
}

/// シート名のリストを `['A', 'B']` 形式で整形
///
/// `'`を含み`"`を含まない名前は`"O'Brien"`のように二重引用符で囲みます。
/// 両方を含む場合は`'`をエスケープします。
pub(crate) fn format_name_list(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| quote_name(n)).collect();
    format!("[{}]", quoted.join(", "))
}

fn quote_name(name: &str) -> String {
    let name = escape_control(name);
    if !name.contains('\'') {
        format!("'{}'", name)
    } else if !name.contains('"') {
        format!("\"{}\"", name)
    } else {
        format!("'{}'", name.replace('\'', "\\'"))
    }
}

/// 読み込み済みシートのレポートを出力
///
/// # 出力順
///
/// 1. 行数と列数
/// 2. 列名
/// 3. 先頭 `sample_rows` 行
/// 4. 各列のデータ型
/// 5. 数値列の記述統計量（数値列がある場合のみ）
/// 6. 欠損値の数（欠損値がある列のみ。なければセクションごと省略）
///
/// 行が1つもない場合は空である旨のみを出力します。
pub(crate) fn write_sheet_report<W: Write>(
    table: &Table,
    sample_rows: usize,
    out: &mut W,
) -> Result<(), InspectError> {
    if table.is_empty() {
        writeln!(out, "Sheet is empty")?;
        return Ok(());
    }

    writeln!(
        out,
        "Shape: {} rows, {} columns",
        table.height(),
        table.width()
    )?;

    writeln!(out)?;
    writeln!(out, "Columns:")?;
    for column in table.columns() {
        writeln!(out, "  - {}", column.name)?;
    }

    writeln!(out)?;
    writeln!(out, "First {} rows:", sample_rows)?;
    TextGrid::from_table(&table.head(sample_rows)).render(out)?;

    writeln!(out)?;
    writeln!(out, "Data types:")?;
    for column in table.columns() {
        writeln!(out, "  {}: {}", column.name, column.dtype())?;
    }

    let summaries = describe(table);
    if !summaries.is_empty() {
        writeln!(out)?;
        writeln!(out, "Numeric column statistics:")?;
        TextGrid::from_summaries(&summaries).render(out)?;
    }

    let missing = missing_counts(table);
    if !missing.is_empty() {
        writeln!(out)?;
        writeln!(out, "Missing values:")?;
        for (name, count) in missing {
            writeln!(out, "  {}: {} missing values", name, count)?;
        }
    }

    Ok(())
}

/// 結合表の概要とキーワードに一致する列の一意な値を出力
pub(crate) fn write_combined_report<W: Write>(
    combined: &Table,
    keywords: &[String],
    unique_limit: usize,
    out: &mut W,
) -> Result<(), InspectError> {
    writeln!(out, "Total records: {}", combined.height())?;
    writeln!(out, "Total columns: {}", combined.width())?;

    let candidates = combined
        .columns()
        .iter()
        .filter(|c| c.dtype() == Dtype::Object && name_matches(&c.name, keywords));

    for column in candidates {
        let uniques = unique_values(column);
        writeln!(out)?;
        writeln!(
            out,
            "Unique values in column '{}' ({} items):",
            column.name,
            uniques.len()
        )?;
        for value in uniques.iter().take(unique_limit) {
            writeln!(out, "  - {}", escape_control(&value.to_string()))?;
        }
        if uniques.len() > unique_limit {
            writeln!(out, "  ... and {} more values", uniques.len() - unique_limit)?;
        }
    }

    Ok(())
}
