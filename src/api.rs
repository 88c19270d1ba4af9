//! Public API Defaults
//!
//! `InspectorBuilder`の既定値として使用する公開定数を定義するモジュール。

/// 引数なしで起動したときに解析するワークブック
pub const DEFAULT_WORKBOOK_PATH: &str =
    "/Users/ablagovestnov/CursorProjects/ai-renovation/materials.xlsx";

/// サンプルとして表示する先頭行数
pub const DEFAULT_SAMPLE_ROWS: usize = 5;

/// 一意な値を表示する上限
pub const DEFAULT_UNIQUE_LIMIT: usize = 20;

/// 結合表に付与するシート名の列
pub const DEFAULT_SOURCE_COLUMN: &str = "source_sheet";

/// 品目・資材・商品名らしい列を見つけるためのキーワード（小文字）
///
/// 「名称」「品名」「資材」「商品」と英語の`name`に相当します。
pub const DEFAULT_KEYWORDS: [&str; 5] = ["название", "наименование", "материал", "товар", "name"];
