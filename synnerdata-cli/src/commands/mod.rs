//! CLI command definitions and dispatch.

pub mod export;
pub mod fetch;
pub mod view;

use std::path::Path;
use std::path::PathBuf;

use clap::Args;
use clap::Parser;
use clap::Subcommand;
use synnerdata_lib::model::Row;
use synnerdata_lib::table::Column;
use synnerdata_lib::table::DataTable;
use synnerdata_lib::table::FilterKind;
use synnerdata_lib::table::FilterValue;
use synnerdata_lib::table::Schema;
use synnerdata_lib::table::SortState;
use synnerdata_lib::table::TableConfig;

use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::OutputFormat;

/// Synnerdata command-line tool
#[derive(Debug, Parser)]
#[command(name = "synnerdata", version, about = "Synnerdata HR data tables from the command line")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show one page of a filtered, sorted table
    View(view::ViewArgs),
    /// Export every filtered row to an XLSX workbook
    Export(export::ExportArgs),
    /// Download a resource listing as JSON rows
    Fetch(fetch::FetchArgs),
}

impl Cli {
    pub async fn execute(&self, config: &CliConfig) -> Result<(), CliError> {
        match &self.command {
            Commands::View(args) => view::execute(args, config, self.format),
            Commands::Export(args) => export::execute(args, config),
            Commands::Fetch(args) => fetch::execute(args, config).await,
        }
    }
}

// =============================================================================
// Shared table arguments
// =============================================================================

/// Row source, schema and view-state shared by `view` and `export`.
#[derive(Debug, Clone, Args)]
pub struct TableArgs {
    /// JSON file holding an array of row objects
    #[arg(long)]
    pub rows: PathBuf,

    /// JSON file holding the column definitions
    #[arg(long)]
    pub schema: PathBuf,

    /// Column filter as key=value; multi-select columns take key=v1,v2
    #[arg(long = "filter", value_parser = parse_filter)]
    pub filters: Vec<(String, String)>,

    /// Global search text
    #[arg(long)]
    pub search: Option<String>,

    /// Sort column as key or key:desc
    #[arg(long, value_parser = parse_sort)]
    pub sort: Option<SortState>,
}

impl TableArgs {
    /// Loads rows and schema and applies the filter, search and sort
    /// arguments.
    pub fn load(&self, config: &TableConfig) -> Result<DataTable, CliError> {
        let columns: Vec<Column> = read_json(&self.schema)?;
        let schema = Schema::new(columns)?;
        let rows = Row::list_from_json(read_json(&self.rows)?)?;
        log::debug!("loaded {} rows from {}", rows.len(), self.rows.display());

        let mut table = DataTable::with_config(schema, rows, config.clone())?;
        for (key, raw) in &self.filters {
            let value = filter_value(table.schema(), key, raw)?;
            table.set_filter(key, value)?;
        }
        if let Some(search) = &self.search {
            table.set_search(search.as_str());
        }
        if let Some(sort) = &self.sort {
            table.set_sort(sort.clone())?;
        }
        Ok(table)
    }
}

/// Table configuration from the config file.
pub fn table_config(config: &CliConfig) -> TableConfig {
    match config.page_size {
        Some(size) => TableConfig::default().with_page_size(size),
        None => TableConfig::default(),
    }
}

fn filter_value(schema: &Schema, key: &str, raw: &str) -> Result<FilterValue, CliError> {
    let column = schema.require(key)?;
    Ok(match column.filter {
        FilterKind::MultiSelect => FilterValue::set(
            raw.split(',')
                .map(str::trim)
                .filter(|v| !v.is_empty()),
        ),
        FilterKind::Exact | FilterKind::Substring => FilterValue::text(raw),
    })
}

fn parse_filter(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", arg)),
    }
}

fn parse_sort(arg: &str) -> Result<SortState, String> {
    let (key, direction) = match arg.rsplit_once(':') {
        Some((key, direction)) => (key, Some(direction)),
        None => (arg, None),
    };
    if key.trim().is_empty() {
        return Err("sort column is empty".to_string());
    }
    match direction.map(str::to_ascii_lowercase).as_deref() {
        None | Some("asc") => Ok(SortState::asc(key.trim())),
        Some("desc") => Ok(SortState::desc(key.trim())),
        Some(other) => Err(format!("unknown sort direction '{}'", other)),
    }
}

pub(crate) fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}
