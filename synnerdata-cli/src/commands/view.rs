//! `view` command

use clap::Args;
use synnerdata_lib::table::DataTable;

use super::TableArgs;
use super::table_config;
use crate::config::CliConfig;
use crate::error::CliError;
use crate::output::FacetView;
use crate::output::OutputFormat;
use crate::output::render_page;

#[derive(Debug, Args)]
pub struct ViewArgs {
    #[command(flatten)]
    pub table: TableArgs,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Columns to hide
    #[arg(long = "hide", value_delimiter = ',')]
    pub hidden: Vec<String>,

    /// Print value counts of the faceted columns
    #[arg(long)]
    pub facets: bool,
}

pub fn execute(args: &ViewArgs, config: &CliConfig, format: OutputFormat) -> Result<(), CliError> {
    let table = build(args, config)?;
    print!("{}", render(&table, args.facets, format));
    Ok(())
}

fn build(args: &ViewArgs, config: &CliConfig) -> Result<DataTable, CliError> {
    let mut table = args.table.load(&table_config(config))?;
    if let Some(size) = args.page_size {
        table.set_page_size(size)?;
    }
    for key in &args.hidden {
        table.set_column_visible(key, false)?;
    }
    if args.page == 0 {
        return Err(CliError::InvalidArgument("pages start at 1".to_string()));
    }
    table.set_page(args.page - 1);
    Ok(table)
}

fn render(table: &DataTable, with_facets: bool, format: OutputFormat) -> String {
    let headers: Vec<String> = table
        .visible_columns()
        .into_iter()
        .filter(|c| !c.is_actions())
        .map(|c| c.header())
        .collect();
    let cells = table.rendered_page();
    let view = table.derive();

    let facets: Vec<FacetView<'_>> = if with_facets {
        view.facets
            .iter()
            .filter_map(|(key, facet)| {
                let column = table.schema().column(key)?;
                Some(FacetView {
                    column: key,
                    options: facet.options(column),
                })
            })
            .collect()
    } else {
        Vec::new()
    };

    let mut out = render_page(&headers, &cells, &view.page, &facets, format);
    if format == OutputFormat::Json && !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
