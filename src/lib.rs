//! sheetscope - Pure-Rust spreadsheet inventory tool
//!
//! This crate reads a spreadsheet workbook (XLSX, XLSB, XLS, ODS) and writes a
//! human-readable inventory of its contents: per-sheet shape, column names, sample
//! rows, inferred data types, descriptive statistics and missing-value counts,
//! followed by a cross-sheet analysis that lists the unique values of columns whose
//! names look like item or material identifiers.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use sheetscope::InspectorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create an inspector with default settings
//!     let inspector = InspectorBuilder::new().build()?;
//!
//!     // Print the report to stdout
//!     inspector.inspect_stdout("materials.xlsx")?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use sheetscope::InspectorBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let inspector = InspectorBuilder::new()
//!         .with_sample_rows(10)
//!         .with_unique_limit(50)
//!         .with_keywords(["sku", "article", "артикул"])
//!         .build()?;
//!
//!     let mut report = Vec::new();
//!     inspector.inspect("materials.xlsx", &mut report)?;
//!     println!("{}", String::from_utf8(report)?);
//!
//!     Ok(())
//! }
//! ```
//!
//! Workbook and sheet failures never abort the report: they are written into it.
//! The only error returned to the caller is a failure to write the report itself.

mod api;
mod builder;
mod error;
mod render;
mod report;
mod source;
mod stats;
mod table;
mod types;

// 公開API
pub use api::{
    DEFAULT_KEYWORDS, DEFAULT_SAMPLE_ROWS, DEFAULT_SOURCE_COLUMN, DEFAULT_UNIQUE_LIMIT,
    DEFAULT_WORKBOOK_PATH,
};
pub use builder::{Inspector, InspectorBuilder};
pub use error::InspectError;
pub use source::{SheetSource, WorkbookSource};
pub use stats::{describe, missing_counts, name_matches, unique_values, Summary, SUMMARY_LABELS};
pub use table::{Column, Table};
pub use types::{CellValue, Dtype};
