//! paperfolio: static academic portfolio generator.
//!
//! Renders a sorted, filterable publications list, per-paper detail pages,
//! and a CV/portfolio showcase page from embedded data.

pub mod catalog;
pub mod config;
pub mod context;
pub mod data;
pub mod error;
pub mod models;
pub mod site;
pub mod sizes;

pub use catalog::{Catalog, Filter};
pub use config::{load_settings, Config, Settings};
pub use context::SiteContext;
pub use error::{Result, SiteError};
