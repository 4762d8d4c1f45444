//! Row model

mod resource;
mod row;
mod row_serde;
mod value;

pub use resource::*;
pub use row::*;
pub use value::*;
