//! sheetscope command-line entry point
//!
//! Prints the workbook inventory to stdout. The process always exits normally;
//! problems with the workbook are part of the printed report.

use std::path::PathBuf;

use clap::Parser;
use sheetscope::{
    InspectError, Inspector, InspectorBuilder, DEFAULT_SAMPLE_ROWS, DEFAULT_UNIQUE_LIMIT,
    DEFAULT_WORKBOOK_PATH,
};

#[derive(Parser, Debug)]
#[command(name = "sheetscope", version, about = "Print an inventory of a spreadsheet workbook")]
struct Cli {
    /// Workbook to inspect
    #[arg(default_value = DEFAULT_WORKBOOK_PATH)]
    path: PathBuf,

    /// Number of leading rows shown per sheet
    #[arg(long, default_value_t = DEFAULT_SAMPLE_ROWS)]
    sample_rows: usize,

    /// Maximum unique values listed per matching column
    #[arg(long, default_value_t = DEFAULT_UNIQUE_LIMIT)]
    unique_limit: usize,

    /// Column-name keyword (repeatable; replaces the built-in set)
    #[arg(long = "keyword", value_name = "KEYWORD")]
    keywords: Vec<String>,
}

fn build_inspector(cli: &Cli) -> Result<Inspector, InspectError> {
    let mut builder = InspectorBuilder::new()
        .with_sample_rows(cli.sample_rows)
        .with_unique_limit(cli.unique_limit);

    if !cli.keywords.is_empty() {
        builder = builder.with_keywords(&cli.keywords);
    }

    builder.build()
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let inspector = match build_inspector(&cli) {
        Ok(inspector) => inspector,
        Err(e) => {
            log::error!("invalid options: {}", e);
            return;
        }
    };

    if let Err(e) = inspector.inspect_stdout(&cli.path) {
        log::error!("failed to write report: {}", e);
    }
}
