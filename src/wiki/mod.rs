//! Wiki-specific modules for page retrieval, parsing, and data models.

pub mod client;
pub mod error;
pub mod models;
pub mod parser;
pub mod selectors;

pub use client::{PageSource, WikiClient};
pub use error::ScrapeError;
pub use models::{Unit, UnitDetail};
pub use parser::{parse_unit_page, parse_unit_table};
