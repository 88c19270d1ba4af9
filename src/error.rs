//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetscopeクレート全体で使用するエラー型
///
/// ワークブックのオープン、シートの読み込み、レポート出力中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（レポートの書き込み失敗など）
/// - `Parse`: ワークブックの解析中に発生したエラー（calamine由来）
/// - `SheetNotFound`: 指定されたシートがワークブックに存在しない
/// - `Config`: 設定の検証に失敗したエラー
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetscope::InspectError;
/// use std::fs::File;
///
/// fn open_report(path: &str) -> Result<(), InspectError> {
///     let _file = File::open(path)?;  // Ioエラーが自動的に変換される
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum InspectError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックまたはシートの解析中に発生したエラー
    ///
    /// ファイル形式が不正、破損したファイル、サポートされていない形式などが
    /// 原因となります。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// シートが見つからない
    #[error("Sheet '{0}' not found")]
    SheetNotFound(String),

    /// 設定の検証に失敗したエラー
    ///
    /// `InspectorBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use sheetscope::{InspectorBuilder, InspectError};
    ///
    /// let result = InspectorBuilder::new().with_sample_rows(0).build();
    ///
    /// match result {
    ///     Err(InspectError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),
}
