//! prismata-crawler - Prismata wiki unit crawler
//!
//! Scrapes the unit listing table and per-unit detail pages of a
//! gamepedia-style wiki into one nested record per unit, exportable as
//! JSON or CSV.

pub mod commands;
pub mod config;
pub mod export;
pub mod wiki;

pub use config::Config;
pub use wiki::models::{Unit, UnitDetail};
pub use wiki::ScrapeError;
