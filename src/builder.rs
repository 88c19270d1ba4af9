//! Builder Module
//!
//! Fluent Builder APIを提供し、`Inspector`インスタンスを段階的に構築する。

use std::io::{BufWriter, Write};
use std::path::Path;

use crate::api::{
    DEFAULT_KEYWORDS, DEFAULT_SAMPLE_ROWS, DEFAULT_SOURCE_COLUMN, DEFAULT_UNIQUE_LIMIT,
};
use crate::error::InspectError;
use crate::report::{
    format_name_list, major_rule, minor_rule, write_combined_report, write_sheet_report,
};
use crate::source::{SheetSource, WorkbookSource};
use crate::table::Table;

/// 解析処理の設定を保持する内部構造体
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct InspectorConfig {
    /// サンプルとして表示する先頭行数
    pub sample_rows: usize,

    /// 一意な値を表示する上限
    pub unique_limit: usize,

    /// 列名の照合に使うキーワード（小文字）
    pub keywords: Vec<String>,

    /// 結合表に付与するシート名の列
    pub source_column: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            sample_rows: DEFAULT_SAMPLE_ROWS,
            unique_limit: DEFAULT_UNIQUE_LIMIT,
            keywords: DEFAULT_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            source_column: DEFAULT_SOURCE_COLUMN.to_string(),
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetscope::InspectorBuilder;
///
/// # fn main() -> Result<(), sheetscope::InspectError> {
/// let inspector = InspectorBuilder::new()
///     .with_sample_rows(10)
///     .with_keywords(["sku", "article"])
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct InspectorBuilder {
    config: InspectorConfig,
}

impl InspectorBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - サンプル行数: 5
    /// - 一意な値の表示上限: 20
    /// - キーワード: `DEFAULT_KEYWORDS`
    /// - シート名の列: `source_sheet`
    pub fn new() -> Self {
        Self::default()
    }

    /// サンプルとして表示する先頭行数を指定する
    pub fn with_sample_rows(mut self, rows: usize) -> Self {
        self.config.sample_rows = rows;
        self
    }

    /// 一意な値を表示する上限を指定する
    ///
    /// 上限を超えた分は件数のみ出力されます。
    pub fn with_unique_limit(mut self, limit: usize) -> Self {
        self.config.unique_limit = limit;
        self
    }

    /// 列名の照合に使うキーワードを置き換える
    ///
    /// 照合は大文字小文字を区別しない部分一致です。
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.keywords = keywords
            .into_iter()
            .map(|kw| kw.as_ref().to_lowercase())
            .collect();
        self
    }

    /// 結合表に付与するシート名の列名を指定する
    pub fn with_source_column(mut self, name: impl Into<String>) -> Self {
        self.config.source_column = name.into();
        self
    }

    /// 設定を検証し、`Inspector`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `InspectError::Config(String)`: 設定の検証に失敗した場合
    ///   * サンプル行数または一意な値の表示上限が0
    ///   * キーワードが空、または空文字列のキーワードを含む
    ///   * シート名の列名が空
    pub fn build(self) -> Result<Inspector, InspectError> {
        if self.config.sample_rows == 0 {
            return Err(InspectError::Config(
                "sample rows must be at least 1".to_string(),
            ));
        }

        if self.config.unique_limit == 0 {
            return Err(InspectError::Config(
                "unique value limit must be at least 1".to_string(),
            ));
        }

        if self.config.keywords.is_empty() {
            return Err(InspectError::Config(
                "at least one keyword is required".to_string(),
            ));
        }

        if self.config.keywords.iter().any(|kw| kw.trim().is_empty()) {
            return Err(InspectError::Config(
                "keywords must not be empty".to_string(),
            ));
        }

        if self.config.source_column.trim().is_empty() {
            return Err(InspectError::Config(
                "source column name must not be empty".to_string(),
            ));
        }

        Ok(Inspector::new(self.config))
    }
}

/// ワークブック解析のファサード
///
/// ワークブックを開き、シートごとのレポートと全シートの結合分析をテキストで出力します。
/// ワークブックやシートの読み込みに失敗しても処理は中断されず、失敗内容がレポートに
/// 出力されます。呼び出し元に返るエラーはレポートの書き込み失敗のみです。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetscope::InspectorBuilder;
///
/// # fn main() -> Result<(), sheetscope::InspectError> {
/// let inspector = InspectorBuilder::new().build()?;
/// let mut report = Vec::new();
/// inspector.inspect("materials.xlsx", &mut report)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Inspector {
    config: InspectorConfig,
}

impl Inspector {
    pub(crate) fn new(config: InspectorConfig) -> Self {
        Self { config }
    }

    /// サンプルとして表示する先頭行数
    pub fn sample_rows(&self) -> usize {
        self.config.sample_rows
    }

    /// 一意な値を表示する上限
    pub fn unique_limit(&self) -> usize {
        self.config.unique_limit
    }

    /// 列名の照合に使うキーワード（小文字）
    pub fn keywords(&self) -> &[String] {
        &self.config.keywords
    }

    /// 結合表に付与するシート名の列名
    pub fn source_column(&self) -> &str {
        &self.config.source_column
    }

    /// ファイルを解析し、レポートを書き込む
    ///
    /// # 処理フロー
    ///
    /// 1. ファイルの存在確認（存在しなければその旨のみ出力して終了）
    /// 2. ワークブックを開き、シート一覧を出力
    /// 3. 各シートのレポート
    /// 4. ワークブックを開き直して全シートを結合し、キーワードに一致する列を分析
    pub fn inspect<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        out: &mut W,
    ) -> Result<(), InspectError> {
        let path = path.as_ref();

        if !path.exists() {
            writeln!(out, "File {} not found!", path.display())?;
            return Ok(());
        }

        writeln!(out, "Analyzing file: {}", path.display())?;
        writeln!(out, "{}", major_rule())?;

        self.inspect_source(|| WorkbookSource::open(path), out)
    }

    /// ファイルを解析し、レポートを標準出力に書き込む
    pub fn inspect_stdout<P: AsRef<Path>>(&self, path: P) -> Result<(), InspectError> {
        let stdout = std::io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        self.inspect(path, &mut writer)?;
        writer.flush()?;
        Ok(())
    }

    /// 任意のデータソースを解析し、レポートを書き込む
    ///
    /// `open`はシートごとのレポート用と結合分析用に1回ずつ呼ばれます。
    /// 2回目の読み込みは1回目の結果に依存しません。
    ///
    /// # 使用例
    ///
    /// ```rust,no_run
    /// use std::io::Cursor;
    /// use sheetscope::{InspectorBuilder, WorkbookSource};
    ///
    /// # fn main() -> Result<(), sheetscope::InspectError> {
    /// let inspector = InspectorBuilder::new().build()?;
    /// let bytes: Vec<u8> = std::fs::read("materials.xlsx")?;
    /// let mut report = Vec::new();
    /// inspector.inspect_source(
    ///     || WorkbookSource::from_reader(Cursor::new(bytes.clone())),
    ///     &mut report,
    /// )?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn inspect_source<S, F, W>(&self, open: F, out: &mut W) -> Result<(), InspectError>
    where
        S: SheetSource,
        F: Fn() -> Result<S, InspectError>,
        W: Write,
    {
        let mut source = match open() {
            Ok(source) => source,
            Err(e) => {
                log::error!("failed to open workbook: {}", e);
                writeln!(out, "Failed to analyze file: {}", e)?;
                return Ok(());
            }
        };

        let sheet_names = source.sheet_names();
        writeln!(out, "Sheet count: {}", sheet_names.len())?;
        writeln!(out, "Sheet names: {}", format_name_list(&sheet_names))?;
        writeln!(out)?;

        for (idx, sheet_name) in sheet_names.iter().enumerate() {
            writeln!(out, "SHEET {}: {}", idx + 1, sheet_name)?;
            writeln!(out, "{}", minor_rule())?;

            match source.load_table(sheet_name) {
                Ok(table) => write_sheet_report(&table, self.config.sample_rows, out)?,
                Err(e) => {
                    log::warn!("failed to read sheet '{}': {}", sheet_name, e);
                    writeln!(out, "Error reading sheet {}: {}", sheet_name, e)?;
                }
            }

            writeln!(out)?;
            writeln!(out, "{}", major_rule())?;
            writeln!(out)?;
        }
        drop(source);

        writeln!(out, "COMBINED ANALYSIS")?;
        writeln!(out, "{}", minor_rule())?;

        if let Some(combined) = self.combine(&open, &sheet_names) {
            write_combined_report(
                &combined,
                &self.config.keywords,
                self.config.unique_limit,
                out,
            )?;
        }

        Ok(())
    }

    /// ワークブックを開き直し、全シートを1つの表に結合する
    ///
    /// 読み込みに失敗したシートと行のないシートは黙って除外します。
    /// 結合できるシートが1枚もなければ`None`を返します。
    fn combine<S, F>(&self, open: &F, sheet_names: &[String]) -> Option<Table>
    where
        S: SheetSource,
        F: Fn() -> Result<S, InspectError>,
    {
        let mut source = match open() {
            Ok(source) => source,
            Err(e) => {
                log::debug!("skipping combined analysis, reopen failed: {}", e);
                return None;
            }
        };

        let tables: Vec<Table> = sheet_names
            .iter()
            .filter_map(|sheet_name| match source.load_table(sheet_name) {
                Ok(table) if table.is_empty() => None,
                Ok(table) => Some(table.with_constant_column(&self.config.source_column, sheet_name)),
                Err(e) => {
                    log::debug!("skipping sheet '{}' in combined analysis: {}", sheet_name, e);
                    None
                }
            })
            .collect();

        if tables.is_empty() {
            return None;
        }

        let combined = Table::concat(tables);
        log::debug!(
            "combined table: {} rows x {} columns",
            combined.height(),
            combined.width()
        );
        Some(combined)
    }
}
