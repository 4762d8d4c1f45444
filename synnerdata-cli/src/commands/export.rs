//! `export` command

use std::path::Path;
use std::path::PathBuf;

use clap::Args;

use super::TableArgs;
use super::table_config;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::print_success;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Output workbook; `.xlsx` is appended when missing
    #[arg(long)]
    pub out: PathBuf,

    /// Worksheet name
    #[arg(long)]
    pub sheet: Option<String>,
}

pub fn execute(args: &ExportArgs, config: &CliConfig) -> Result<(), CliError> {
    let path = run(args, config)?;
    print_success(&format!("Exported to {}", path.display()));
    Ok(())
}

fn run(args: &ExportArgs, config: &CliConfig) -> Result<PathBuf, CliError> {
    let mut table_config = table_config(config);
    if let Some(sheet) = &args.sheet {
        table_config = table_config.with_sheet_name(sheet.clone());
    }
    let table = args.table.load(&table_config)?;

    let (dir, filename) = split_out(&args.out);
    let export = table.export(&filename)?;
    Ok(export.save(&dir)?)
}

/// Splits `--out` into the target directory and file name.
fn split_out(out: &Path) -> (PathBuf, String) {
    let dir = match out.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let filename = out
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    (dir, filename)
}
