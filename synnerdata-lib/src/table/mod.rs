//! Generic data-table engine
//!
//! A table is a [`Schema`] (validated column descriptors), a set of
//! [`Row`](crate::model::Row)s and a [`ViewState`]. The displayed rows are
//! derived on demand:
//!
//! ```text
//! rows ─▶ filter ─▶ sort ─▶ paginate ─▶ render
//!            │
//!            ├─▶ facets
//!            └─▶ export
//! ```
//!
//! Each stage is a plain function over borrowed rows, and [`DataTable`] ties
//! them together with the state mutations a table UI needs.

mod column;
mod config;
mod export;
mod facet;
mod filter;
mod page;
mod render;
mod schema;
mod sort;
mod view;

pub use column::*;
pub use config::TableConfig;
pub use export::*;
pub use facet::*;
pub use filter::*;
pub use page::*;
pub use render::NO;
pub use render::YES;
pub use render::format_currency;
pub use render::format_date;
pub use render::format_datetime;
pub use render::yes_no;
pub use schema::*;
pub use sort::*;
pub use view::*;
