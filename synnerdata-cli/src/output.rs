//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use synnerdata_lib::table::FacetOption;
use synnerdata_lib::table::PageSlice;
use tabled::builder::Builder;
use tabled::settings::Style;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

#[derive(Serialize)]
struct PageJson<'a> {
    page: usize,
    page_count: usize,
    total: usize,
    rows: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    facets: Vec<FacetJson<'a>>,
}

#[derive(Serialize)]
struct FacetJson<'a> {
    column: &'a str,
    options: Vec<OptionJson<'a>>,
}

#[derive(Serialize)]
struct OptionJson<'a> {
    value: &'a str,
    label: &'a str,
    count: usize,
}

/// Facets of one column, ready to print.
pub struct FacetView<'a> {
    pub column: &'a str,
    pub options: Vec<FacetOption>,
}

/// Renders one page of display cells.
pub fn render_page(
    headers: &[String],
    cells: &[Vec<String>],
    page: &PageSlice<'_>,
    facets: &[FacetView<'_>],
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::Table => render_table(headers, cells, page, facets),
        OutputFormat::Json => render_json(headers, cells, page, facets),
    }
}

fn render_table(
    headers: &[String],
    cells: &[Vec<String>],
    page: &PageSlice<'_>,
    facets: &[FacetView<'_>],
) -> String {
    let mut out = String::new();

    if cells.is_empty() {
        out.push_str("Nenhum resultado encontrado.\n");
    } else {
        let mut builder = Builder::default();
        builder.push_record(headers.iter().cloned());
        for row in cells {
            builder.push_record(row.iter().cloned());
        }
        let mut table = builder.build();
        table.with(Style::rounded());
        out.push_str(&table.to_string());
        out.push('\n');
    }

    out.push_str(&format!(
        "Página {} de {} ({} registros)\n",
        page.page_index + 1,
        page.page_count.max(1),
        page.total_rows
    ));

    for view in facets {
        let options: Vec<String> = view
            .options
            .iter()
            .map(|o| format!("{} ({})", o.label, o.count))
            .collect();
        out.push_str(&format!("{}: {}\n", view.column, options.join(", ")));
    }
    out
}

fn render_json(
    headers: &[String],
    cells: &[Vec<String>],
    page: &PageSlice<'_>,
    facets: &[FacetView<'_>],
) -> String {
    let rows = cells
        .iter()
        .map(|row| {
            headers
                .iter()
                .cloned()
                .zip(row.iter().cloned().map(serde_json::Value::String))
                .collect()
        })
        .collect();

    let facets = facets
        .iter()
        .map(|view| FacetJson {
            column: view.column,
            options: view
                .options
                .iter()
                .map(|o| OptionJson {
                    value: &o.value,
                    label: &o.label,
                    count: o.count,
                })
                .collect(),
        })
        .collect();

    let json = PageJson {
        page: page.page_index + 1,
        page_count: page.page_count,
        total: page.total_rows,
        rows,
        facets,
    };
    serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string())
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}
