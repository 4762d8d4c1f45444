//! Synnerdata client library
//!
//! The data-table engine behind the Synnerdata HR dashboard (filtering,
//! sorting, facets, pagination and XLSX export over API rows) and a
//! session-aware async client for the Synnerdata REST API.

pub mod api;
pub mod auth;
pub mod error;
pub mod model;
pub mod notice;
pub mod response;
pub mod table;

mod client;

pub use client::*;
pub use notice::Notice;
