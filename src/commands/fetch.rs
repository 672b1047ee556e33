//! Unit fetch orchestration: listing, filter, per-unit detail, merge.

use crate::config::Config;
use crate::wiki::client::{PageSource, WikiClient};
use crate::wiki::error::ScrapeError;
use crate::wiki::models::Unit;
use crate::wiki::parser;
use anyhow::{Context, Result};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, warn};

/// Which units to keep from the listing.
#[derive(Debug, Clone)]
pub enum Include {
    /// Keep every unit in the listing.
    All,
    /// Keep only units whose name is in the set.
    Names(BTreeSet<String>),
}

impl Include {
    /// Builds a selection from CLI-style arguments: no names or the literal
    /// `all` keeps everything.
    pub fn from_names(names: &[String]) -> Self {
        if names.is_empty() || names.iter().any(|name| name == "all") {
            Include::All
        } else {
            Include::Names(names.iter().cloned().collect())
        }
    }

    fn keeps(&self, name: &str) -> bool {
        match self {
            Include::All => true,
            Include::Names(names) => names.contains(name),
        }
    }
}

/// Fetches the unit listing and enriches each retained unit with its detail
/// page.
pub struct FetchCommand {
    config: Config,
}

impl FetchCommand {
    /// Creates a new fetch command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Runs the fetch against the configured wiki.
    pub async fn execute(&self, include: &Include) -> Result<BTreeMap<String, Unit>> {
        let client = WikiClient::new(&self.config).context("Failed to create HTTP client")?;

        Ok(self.execute_with_client(&client, include).await?)
    }

    /// Runs the fetch with a provided page source (for testing).
    ///
    /// Per-unit detail failures are swallowed: the unit keeps its listing
    /// fields and the run continues. Only listing-level failures abort.
    pub async fn execute_with_client(
        &self,
        client: &impl PageSource,
        include: &Include,
    ) -> Result<BTreeMap<String, Unit>, ScrapeError> {
        info!("Fetching units from {}{}", self.config.base_url, self.config.units_path);

        let listing = client.fetch(&self.config.units_path).await;
        if listing.is_empty() {
            return Err(ScrapeError::UrlConfig);
        }

        let mut units: BTreeMap<String, Unit> = parser::parse_unit_table(&listing)?
            .into_iter()
            .filter(|(name, _)| include.keeps(name))
            .collect();

        for (name, unit) in units.iter_mut() {
            client.throttle().await;

            let page = client.fetch(&unit.links.path).await;
            if page.is_empty() {
                warn!("No content for {}, keeping listing fields", name);
                continue;
            }

            match parser::parse_unit_page(&page) {
                Ok(detail) => *unit = unit.merged_with(&detail),
                Err(e) => warn!("Detail parse failed for {} ({}), keeping listing fields", name, e),
            }
        }

        info!("Total units fetched: {}", units.len());
        Ok(units)
    }
}
