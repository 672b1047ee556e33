//! Error taxonomy for fetching and parsing.

use thiserror::Error;

/// Failures surfaced by the parsing pipeline and the fetch orchestration.
///
/// Parse-level failures stay local: they are returned as values and never
/// cross the module boundary as panics. Callers decide whether to retry,
/// skip, or abort the whole run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScrapeError {
    /// Markup does not contain the structure the parser expects.
    #[error("Invalid format.")]
    Format,

    /// A change log date label that does not parse as "Month Day, Year".
    /// Fatal for the detail page it appears on.
    #[error("Invalid change log date: {0}")]
    ChangeDate(String),

    /// The configured listing location returned no content.
    #[error("Invalid URL configuration.")]
    UrlConfig,
}
