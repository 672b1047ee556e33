//! CLI command implementations.

pub mod fetch;

pub use fetch::{FetchCommand, Include};
