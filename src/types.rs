//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use std::fmt;

use chrono::NaiveDateTime;

/// タイムスタンプの表示形式
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// セルの値を表す列挙型
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 整数
    Int(i64),

    /// 浮動小数点数
    Float(f64),

    /// 文字列
    Text(String),

    /// 論理値
    Bool(bool),

    /// 日時
    DateTime(NaiveDateTime),

    /// 欠損値（空セル）
    Missing,
}

impl CellValue {
    /// 欠損値かどうかを判定
    pub fn is_missing(&self) -> bool {
        matches!(self, CellValue::Missing)
    }

    /// 数値として取得（整数・浮動小数点数のみ）
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Int(i) => Some(*i as f64),
            CellValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// 一意性判定用のキー
    pub(crate) fn key(&self) -> ValueKey<'_> {
        match self {
            CellValue::Int(i) => ValueKey::Int(*i),
            CellValue::Float(f) => ValueKey::Float(f.to_bits()),
            CellValue::Text(s) => ValueKey::Text(s),
            CellValue::Bool(b) => ValueKey::Bool(*b),
            CellValue::DateTime(dt) => ValueKey::DateTime(*dt),
            CellValue::Missing => ValueKey::Missing,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{:.1}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Bool(true) => f.write_str("True"),
            CellValue::Bool(false) => f.write_str("False"),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMAT)),
            CellValue::Missing => f.write_str("NaN"),
        }
    }
}

/// `CellValue`のハッシュ可能な表現
///
/// 浮動小数点数はビット列で比較する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum ValueKey<'a> {
    Int(i64),
    Float(u64),
    Text(&'a str),
    Bool(bool),
    DateTime(NaiveDateTime),
    Missing,
}

/// 列のデータ型（観測値から推論される）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dtype {
    /// 欠損のない整数列
    Int64,

    /// 浮動小数点数列（欠損を含む整数列、全欠損列を含む）
    Float64,

    /// 欠損のない論理値列
    Bool,

    /// 日時列
    DateTime,

    /// 文字列・混在列
    Object,
}

impl Dtype {
    /// 列の値からデータ型を推論する
    ///
    /// # 推論規則
    ///
    /// - 値が存在しない（または全て欠損） → `Float64`
    /// - 全て整数で欠損なし → `Int64`
    /// - 全て数値（欠損を含む整数列を含む） → `Float64`
    /// - 全て論理値で欠損なし → `Bool`
    /// - 全て日時（欠損可） → `DateTime`
    /// - それ以外 → `Object`
    pub fn infer(values: &[CellValue]) -> Self {
        let mut ints = 0usize;
        let mut floats = 0usize;
        let mut bools = 0usize;
        let mut datetimes = 0usize;
        let mut missing = 0usize;

        for value in values {
            match value {
                CellValue::Int(_) => ints += 1,
                CellValue::Float(_) => floats += 1,
                CellValue::Bool(_) => bools += 1,
                CellValue::DateTime(_) => datetimes += 1,
                CellValue::Missing => missing += 1,
                CellValue::Text(_) => {}
            }
        }

        let present = values.len() - missing;
        if present == 0 {
            Dtype::Float64
        } else if ints == present && missing == 0 {
            Dtype::Int64
        } else if ints + floats == present {
            Dtype::Float64
        } else if bools == present && missing == 0 {
            Dtype::Bool
        } else if datetimes == present {
            Dtype::DateTime
        } else {
            Dtype::Object
        }
    }

    /// 数値型（統計量の計算対象）かどうか
    pub fn is_numeric(self) -> bool {
        matches!(self, Dtype::Int64 | Dtype::Float64)
    }

    /// 表示名
    pub fn as_str(self) -> &'static str {
        match self {
            Dtype::Int64 => "int64",
            Dtype::Float64 => "float64",
            Dtype::Bool => "bool",
            Dtype::DateTime => "datetime64[ns]",
            Dtype::Object => "object",
        }
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn date(y: i32, m: u32, d: u32) -> CellValue {
        CellValue::DateTime(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_cell_value_is_missing() {
        assert!(CellValue::Missing.is_missing());
        assert!(!CellValue::Int(0).is_missing());
        assert!(!text("").is_missing());
    }

    #[test]
    fn test_cell_value_display() {
        assert_eq!(CellValue::Int(42).to_string(), "42");
        assert_eq!(CellValue::Float(2.5).to_string(), "2.5");
        assert_eq!(CellValue::Float(3.0).to_string(), "3.0");
        assert_eq!(text("Кирпич").to_string(), "Кирпич");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Bool(false).to_string(), "False");
        assert_eq!(date(2024, 3, 1).to_string(), "2024-03-01 00:00:00");
        assert_eq!(CellValue::Missing.to_string(), "NaN");
    }

    #[test]
    fn test_as_f64() {
        assert_eq!(CellValue::Int(7).as_f64(), Some(7.0));
        assert_eq!(CellValue::Float(0.5).as_f64(), Some(0.5));
        assert_eq!(CellValue::Bool(true).as_f64(), None);
        assert_eq!(text("1").as_f64(), None);
    }

    #[test]
    fn test_infer_int64() {
        let values = vec![CellValue::Int(1), CellValue::Int(2)];
        assert_eq!(Dtype::infer(&values), Dtype::Int64);
    }

    #[test]
    fn test_infer_int_with_missing_is_float() {
        let values = vec![CellValue::Int(1), CellValue::Missing];
        assert_eq!(Dtype::infer(&values), Dtype::Float64);
    }

    #[test]
    fn test_infer_mixed_numeric_is_float() {
        let values = vec![CellValue::Int(1), CellValue::Float(1.5)];
        assert_eq!(Dtype::infer(&values), Dtype::Float64);
    }

    #[test]
    fn test_infer_all_missing_is_float() {
        assert_eq!(Dtype::infer(&[]), Dtype::Float64);
        assert_eq!(
            Dtype::infer(&[CellValue::Missing, CellValue::Missing]),
            Dtype::Float64
        );
    }

    #[test]
    fn test_infer_bool() {
        let values = vec![CellValue::Bool(true), CellValue::Bool(false)];
        assert_eq!(Dtype::infer(&values), Dtype::Bool);

        let with_missing = vec![CellValue::Bool(true), CellValue::Missing];
        assert_eq!(Dtype::infer(&with_missing), Dtype::Object);
    }

    #[test]
    fn test_infer_datetime() {
        let values = vec![date(2024, 1, 1), CellValue::Missing];
        assert_eq!(Dtype::infer(&values), Dtype::DateTime);
    }

    #[test]
    fn test_infer_object() {
        assert_eq!(Dtype::infer(&[text("a"), CellValue::Int(1)]), Dtype::Object);
        assert_eq!(Dtype::infer(&[text("a"), CellValue::Missing]), Dtype::Object);
    }

    #[test]
    fn test_dtype_names() {
        assert_eq!(Dtype::Int64.to_string(), "int64");
        assert_eq!(Dtype::Float64.to_string(), "float64");
        assert_eq!(Dtype::Bool.to_string(), "bool");
        assert_eq!(Dtype::DateTime.to_string(), "datetime64[ns]");
        assert_eq!(Dtype::Object.to_string(), "object");
    }

    #[test]
    fn test_is_numeric() {
        assert!(Dtype::Int64.is_numeric());
        assert!(Dtype::Float64.is_numeric());
        assert!(!Dtype::Bool.is_numeric());
        assert!(!Dtype::Object.is_numeric());
        assert!(!Dtype::DateTime.is_numeric());
    }

    #[test]
    fn test_value_key_distinguishes_types() {
        assert_ne!(CellValue::Int(1).key(), text("1").key());
        assert_eq!(text("a").key(), text("a").key());
        assert_eq!(CellValue::Float(0.5).key(), CellValue::Float(0.5).key());
    }
}
